//! Clinical report narration client
//!
//! Calls an OpenAI-compatible chat-completion endpoint to turn the
//! structured assessment into clinician-facing prose. Without an API
//! key (or on any transport failure) it falls back to a deterministic
//! local formatting of the same content, so report generation always
//! succeeds. The narrative is presentation, not decision-making.

use serde::{Deserialize, Serialize};
use serde_json::json;

use pulmo_engine::advisory::{imaging_interpretation, AgeAdjustedFlags, Contributor};
use pulmo_engine::TriageLevel;

/// Environment variable carrying the chat-completion API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Request parameters for one clinical summary.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub triage_level: TriageLevel,
    pub final_score: f64,
    pub age_group: &'a str,
    pub image_probability: f64,
    pub contributors: &'a [Contributor],
    pub age_adjusted_flags: &'a AgeAdjustedFlags,
    pub next_steps_summary: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize, Serialize)]
struct ChatMessage {
    content: String,
}

/// Report narration client
pub struct ReportClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ReportClient {
    /// Create a client against the configured endpoint, reading the API
    /// key from the environment.
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: std::env::var(API_KEY_ENV).ok(),
        }
    }

    /// Whether the remote narration path is configured.
    pub fn has_remote(&self) -> bool {
        self.api_key.is_some()
    }

    /// Narrate the protocol steps for the patient's age bracket.
    pub async fn narrate_next_steps(
        &self,
        triage_level: TriageLevel,
        next_steps: &[String],
        age_group: &str,
    ) -> String {
        let fallback = format!(
            "For {} patient at {} level: {}",
            age_group,
            triage_level.report_label(),
            next_steps.join(" ")
        );

        let Some(api_key) = &self.api_key else {
            return fallback;
        };

        let step_list = next_steps
            .iter()
            .map(|s| format!("- {}", s))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "You are assisting with clinical documentation for a pediatric patient.\n\n\
             Patient age group: {}\n\n\
             Triage level: {}\n\n\
             The following actions have already been determined:\n{}\n\n\
             Rewrite these actions as a concise, human-readable clinical action summary \
             appropriate for the given pediatric age group.\n\n\
             Rules:\n\
             - Use complete sentences and natural clinical language\n\
             - Do NOT add, remove, or alter any actions\n\
             - Do NOT provide new medical advice\n\
             - Do NOT mention AI, models, or decision systems",
            age_group,
            triage_level.report_label(),
            step_list
        );

        match self
            .chat(
                api_key,
                "You write clear pediatric clinical summaries.",
                &prompt,
                120,
            )
            .await
        {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Report narration failed, using fallback: {}", e);
                fallback
            }
        }
    }

    /// Compose the clinical summary (impression + rationale).
    pub async fn generate_clinical_report(&self, ctx: &ReportContext<'_>) -> String {
        let flags_text = format!(
            "HeartRate: {}; RespRate: {}",
            ctx.age_adjusted_flags.heart_rate, ctx.age_adjusted_flags.resp_rate
        );

        let fallback = format!(
            "Clinical Impression: {} patient presenting with {} risk profile (score {:.2}).\n\n\
             Key Rationale: Assessment based on vital signs trending and physiological \
             indicators. Age-adjusted findings show {}.",
            ctx.age_group,
            ctx.triage_level.report_label(),
            ctx.final_score,
            flags_text
        );

        let Some(api_key) = &self.api_key else {
            return fallback;
        };

        let imaging_text = match imaging_interpretation(ctx.image_probability) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Imaging probability rejected for report: {}", e);
                return fallback;
            }
        };

        let vitals_summary = ctx
            .contributors
            .iter()
            .take(3)
            .map(|c| {
                format!(
                    "{} (impact {:.2})",
                    c.feature.replace('_', " "),
                    c.contribution
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let prompt = format!(
            "You are a clinical decision support assistant.\n\n\
             Patient age group: {}\n\
             Age-adjusted observations: {}\n\n\
             Assessment:\n\
             - Triage category: {} (risk score {:.2})\n\
             - Imaging assessment: {}\n\
             - Key physiological contributors: {}\n\n\
             Recommended clinical actions:\n{}\n\n\
             TASK:\n\
             Write a concise clinical summary including:\n\
             1. Clinical Impression\n\
             2. Key Rationale\n\n\
             CONSTRAINTS:\n\
             - Under 120 words\n\
             - Use professional pediatric clinical language\n\
             - Do NOT mention AI, algorithms, or models\n\
             - Do NOT describe anatomical locations or imaging regions\n\
             - Do NOT introduce new medical actions\n\
             - Do NOT include recommended actions or next steps in the summary",
            ctx.age_group,
            flags_text,
            ctx.triage_level.report_label(),
            ctx.final_score,
            imaging_text,
            vitals_summary,
            ctx.next_steps_summary
        );

        match self
            .chat(
                api_key,
                "You generate conservative, clinician-facing summaries only.",
                &prompt,
                200,
            )
            .await
        {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Report generation failed, using fallback: {}", e);
                fallback
            }
        }
    }

    async fn chat(
        &self,
        api_key: &str,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> anyhow::Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": 0.25,
            "max_tokens": max_tokens,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("Empty completion response"))?;
        Ok(content)
    }
}
