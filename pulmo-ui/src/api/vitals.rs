//! Vitals state and analysis API handlers
//!
//! GET/PUT /api/vitals, POST /api/vitals/simulate, POST /api/analyze-vitals

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use pulmo_common::events::PulmoEvent;
use pulmo_engine::pattern::{classify_pattern, VitalsPattern};
use pulmo_engine::{AgeGroup, VitalsSnapshot};

use crate::error::ApiResult;
use crate::services::{Scenario, VitalsAnalysis, VitalsModelClient};
use crate::AppState;

/// GET /api/vitals response
#[derive(Debug, Serialize)]
pub struct VitalsStateResponse {
    pub vitals: VitalsSnapshot,
    pub age_group: AgeGroup,
}

/// PUT /api/vitals request
#[derive(Debug, Deserialize)]
pub struct UpdateVitalsRequest {
    pub vitals: VitalsSnapshot,
    /// Optional new age bracket; unchanged when absent
    pub age_group: Option<AgeGroup>,
}

/// POST /api/vitals/simulate request
#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    /// Scenario to step; unchanged when absent
    pub scenario: Option<Scenario>,
}

/// POST /api/vitals/simulate response
#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub vitals: VitalsSnapshot,
    pub scenario: Scenario,
    pub pattern: VitalsPattern,
    pub pattern_message: String,
}

/// POST /api/analyze-vitals request
///
/// Analyzes the supplied snapshot, or the current state when absent.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeVitalsRequest {
    pub vitals: Option<VitalsSnapshot>,
    pub age_group: Option<AgeGroup>,
}

/// GET /api/vitals
pub async fn get_vitals(State(state): State<AppState>) -> Json<VitalsStateResponse> {
    let vitals = state.vitals.read().await.clone();
    let age_group = *state.age_group.read().await;
    Json(VitalsStateResponse { vitals, age_group })
}

/// PUT /api/vitals
///
/// Replace the current snapshot. The engine never reads ambient state;
/// this is the single place the "current vitals" input lives.
pub async fn update_vitals(
    State(state): State<AppState>,
    Json(request): Json<UpdateVitalsRequest>,
) -> ApiResult<Json<VitalsStateResponse>> {
    request.vitals.validate()?;

    *state.vitals.write().await = request.vitals.clone();
    if let Some(age_group) = request.age_group {
        *state.age_group.write().await = age_group;
    }

    state
        .event_bus
        .emit(PulmoEvent::VitalsUpdated {
            timestamp: Utc::now(),
        })
        .ok();

    tracing::debug!("Vitals snapshot updated");

    let age_group = *state.age_group.read().await;
    Ok(Json(VitalsStateResponse {
        vitals: request.vitals,
        age_group,
    }))
}

/// POST /api/vitals/simulate
///
/// Advance the simulated stream one step and adopt the result as the
/// current snapshot.
pub async fn simulate_vitals(
    State(state): State<AppState>,
    Json(request): Json<SimulateRequest>,
) -> ApiResult<Json<SimulateResponse>> {
    let (vitals, scenario) = {
        let mut simulator = state.simulator.write().await;
        if let Some(scenario) = request.scenario {
            simulator.set_scenario(scenario);
        }
        (simulator.step(), simulator.scenario())
    };

    *state.vitals.write().await = vitals.clone();

    state
        .event_bus
        .emit(PulmoEvent::VitalsUpdated {
            timestamp: Utc::now(),
        })
        .ok();

    let pattern = classify_pattern(&vitals);

    Ok(Json(SimulateResponse {
        vitals,
        scenario,
        pattern,
        pattern_message: pattern.message().to_string(),
    }))
}

/// POST /api/analyze-vitals
///
/// Run the external tabular-risk model. Any model failure surfaces as a
/// gateway error; the caller never receives a silently-defaulted
/// probability.
pub async fn analyze_vitals(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeVitalsRequest>,
) -> ApiResult<Json<VitalsAnalysis>> {
    let vitals = match request.vitals {
        Some(vitals) => {
            vitals.validate()?;
            vitals
        }
        None => state.vitals.read().await.clone(),
    };
    let age_group = match request.age_group {
        Some(age_group) => age_group,
        None => *state.age_group.read().await,
    };

    tracing::info!(age_group = %age_group, "Analyzing vitals with external model");

    let client = VitalsModelClient::new(&state.config.python_bin, &state.config.models_dir);
    let analysis = match client.analyze(&vitals, age_group).await {
        Ok(analysis) => analysis,
        Err(e) => {
            state.record_error(e.to_string()).await;
            return Err(e.into());
        }
    };

    Ok(Json(analysis))
}

/// Build vitals routes
pub fn vitals_routes() -> Router<AppState> {
    Router::new()
        .route("/api/vitals", get(get_vitals).put(update_vitals))
        .route("/api/vitals/simulate", post(simulate_vitals))
        .route("/api/analyze-vitals", post(analyze_vitals))
}
