//! pulmo-ui library interface
//!
//! Exposes `AppState` and `build_router` so integration tests can drive
//! the router in-process without binding a socket.

pub mod api;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use pulmo_common::config::ServiceConfig;
use pulmo_common::events::EventBus;
use pulmo_engine::{AgeGroup, VitalsSnapshot};

use crate::services::simulator::VitalsSimulator;

/// Result of the most recent X-ray analysis, held for the gate inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagingState {
    /// Classifier label ("PNEUMONIA" / "NORMAL")
    pub label: String,
    /// Pneumonia-pattern probability
    pub probability: f64,
    /// Confidence of the probability
    pub confidence: f64,
    /// When the analysis completed
    pub analyzed_at: DateTime<Utc>,
}

/// Application state shared across handlers
///
/// The engine itself is stateless; this holds the *inputs*, the
/// current vitals snapshot and the latest imaging result, which the
/// original UI kept in context providers. Handlers read a snapshot at
/// call time and pass it to the engine explicitly.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration loaded at startup
    pub config: Arc<ServiceConfig>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Current vitals snapshot
    pub vitals: Arc<RwLock<VitalsSnapshot>>,
    /// Current patient age bracket
    pub age_group: Arc<RwLock<AgeGroup>>,
    /// Latest imaging analysis, if any
    pub imaging: Arc<RwLock<Option<ImagingState>>>,
    /// Simulated data stream state
    pub simulator: Arc<RwLock<VitalsSimulator>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(config: ServiceConfig, event_bus: EventBus) -> Self {
        Self {
            config: Arc::new(config),
            event_bus,
            vitals: Arc::new(RwLock::new(VitalsSnapshot::default())),
            age_group: Arc::new(RwLock::new(AgeGroup::Preschool)),
            imaging: Arc::new(RwLock::new(None)),
            simulator: Arc::new(RwLock::new(VitalsSimulator::new())),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Record an error for the health diagnostics endpoint.
    pub async fn record_error(&self, message: impl Into<String>) {
        *self.last_error.write().await = Some(message.into());
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::ui_routes())
        .merge(api::vitals_routes())
        .merge(api::xray_routes())
        .merge(api::assessment_routes())
        .merge(api::report_routes())
        .merge(api::health_routes())
        .route("/events", get(api::event_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
