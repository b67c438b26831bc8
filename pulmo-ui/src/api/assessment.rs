//! Assessment API handler
//!
//! GET /api/assessment: evaluate the fusion/triage engine over the
//! current inputs.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use pulmo_common::events::PulmoEvent;
use pulmo_engine::{advisory, assess, Assessment};

use crate::error::ApiResult;
use crate::services::VitalsModelClient;
use crate::AppState;

/// Which path supplies the vitals probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalsSource {
    /// Local fallback scorer (no external process)
    #[default]
    Heuristic,
    /// External tabular-risk model
    Model,
}

/// GET /api/assessment query parameters
#[derive(Debug, Default, Deserialize)]
pub struct AssessmentQuery {
    #[serde(default)]
    pub source: VitalsSource,
}

/// GET /api/assessment response
#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    #[serde(flatten)]
    pub assessment: Assessment,
    /// Protocol steps refined by the detected risk drivers
    pub next_steps: Vec<String>,
}

/// GET /api/assessment
///
/// Reads the current vitals snapshot and the latest imaging result,
/// evaluates the engine, and broadcasts the outcome. Until an X-ray
/// has been analyzed the imaging probability is 0, matching the
/// original display's initial state.
pub async fn get_assessment(
    State(state): State<AppState>,
    Query(query): Query<AssessmentQuery>,
) -> ApiResult<Json<AssessmentResponse>> {
    let vitals = state.vitals.read().await.clone();
    let age_group = *state.age_group.read().await;
    let imaging_probability = state
        .imaging
        .read()
        .await
        .as_ref()
        .map(|imaging| imaging.probability)
        .unwrap_or(0.0);

    let model_probability = match query.source {
        VitalsSource::Heuristic => None,
        VitalsSource::Model => {
            let client =
                VitalsModelClient::new(&state.config.python_bin, &state.config.models_dir);
            match client.analyze(&vitals, age_group).await {
                Ok(analysis) => Some(analysis.vitals_probability),
                Err(e) => {
                    // A model failure must not degrade into the
                    // heuristic silently; the caller asked for the
                    // model path and gets the failure.
                    state.record_error(e.to_string()).await;
                    return Err(e.into());
                }
            }
        }
    };

    let assessment = assess(imaging_probability, &vitals, model_probability, age_group)?;
    let next_steps = advisory::refine_protocol(assessment.triage_level, &assessment.risk_factors);

    state
        .event_bus
        .emit(PulmoEvent::AssessmentCompleted {
            triage_level: assessment.triage_level.label().to_string(),
            final_score: assessment.fusion.final_score,
            timestamp: Utc::now(),
        })
        .ok();

    tracing::info!(
        triage = %assessment.triage_level,
        final_score = assessment.fusion.final_score,
        "Assessment completed"
    );

    Ok(Json(AssessmentResponse {
        assessment,
        next_steps,
    }))
}

/// Build assessment routes
pub fn assessment_routes() -> Router<AppState> {
    Router::new().route("/api/assessment", get(get_assessment))
}
