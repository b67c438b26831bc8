//! Clinical report generation API handler
//!
//! POST /api/generate-report

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use pulmo_common::events::PulmoEvent;
use pulmo_engine::advisory::{self, AgeAdjustedFlags, Contributor};
use pulmo_engine::confidence::validate_probability;
use pulmo_engine::triage;

use crate::error::ApiResult;
use crate::services::report_client::{ReportClient, ReportContext};
use crate::AppState;

const REPORT_DISCLAIMER: &str = "This report is for educational and research purposes only. \
     All triage decisions must be validated by qualified healthcare professionals.";

/// POST /api/generate-report request
///
/// Carries the vitals analysis output forward, the way the original UI
/// chains the two calls.
#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub vitals_probability: f64,
    pub age_group: String,
    #[serde(default)]
    pub image_probability: f64,
    pub shap_contributors: Vec<Contributor>,
    pub age_adjusted_flags: AgeAdjustedFlags,
    pub risk_factors_text: Vec<String>,
}

/// POST /api/generate-report response
#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    /// Severity label for report styling
    pub triage_level: String,
    /// Refined protocol steps
    pub next_steps: Vec<String>,
    /// Narrated action summary
    pub next_steps_summary: String,
    /// Clinical impression and rationale
    pub clinical_report: String,
    /// Educational-use disclaimer
    pub disclaimer: String,
}

/// POST /api/generate-report
///
/// Derives the report severity from the vitals probability, refines the
/// protocol with the reported risk drivers, and narrates both through
/// the report client (remote when configured, deterministic fallback
/// otherwise).
pub async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<GenerateReportRequest>,
) -> ApiResult<Json<GenerateReportResponse>> {
    validate_probability("vitals_probability", request.vitals_probability)?;
    validate_probability("image_probability", request.image_probability)?;

    let triage_level = triage::from_vitals_probability(request.vitals_probability)?;
    let next_steps = advisory::refine_protocol(triage_level, &request.risk_factors_text);

    let client = ReportClient::new(&state.config.report_endpoint, &state.config.report_model);

    let next_steps_summary = client
        .narrate_next_steps(triage_level, &next_steps, &request.age_group)
        .await;

    let clinical_report = client
        .generate_clinical_report(&ReportContext {
            triage_level,
            final_score: request.vitals_probability,
            age_group: &request.age_group,
            image_probability: request.image_probability,
            contributors: &request.shap_contributors,
            age_adjusted_flags: &request.age_adjusted_flags,
            next_steps_summary: &next_steps_summary,
        })
        .await;

    state
        .event_bus
        .emit(PulmoEvent::ReportGenerated {
            triage_level: triage_level.report_label().to_string(),
            timestamp: Utc::now(),
        })
        .ok();

    tracing::info!(triage = %triage_level, remote = client.has_remote(), "Report generated");

    Ok(Json(GenerateReportResponse {
        triage_level: triage_level.report_label().to_string(),
        next_steps,
        next_steps_summary,
        clinical_report,
        disclaimer: REPORT_DISCLAIMER.to_string(),
    }))
}

/// Build report routes
pub fn report_routes() -> Router<AppState> {
    Router::new().route("/api/generate-report", post(generate_report))
}
