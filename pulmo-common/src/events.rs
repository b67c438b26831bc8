//! Event types and broadcast bus for SSE streaming

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// PulmoTriage event types broadcast to SSE subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PulmoEvent {
    /// The current vitals snapshot changed (manual edit or simulator step)
    VitalsUpdated {
        timestamp: DateTime<Utc>,
    },

    /// An uploaded X-ray finished analysis
    ImagingAnalyzed {
        label: String,
        probability: f64,
        timestamp: DateTime<Utc>,
    },

    /// A full engine evaluation completed
    AssessmentCompleted {
        triage_level: String,
        final_score: f64,
        timestamp: DateTime<Utc>,
    },

    /// A clinical report was generated
    ReportGenerated {
        triage_level: String,
        timestamp: DateTime<Utc>,
    },
}

impl PulmoEvent {
    /// SSE event name for this variant.
    pub fn event_type(&self) -> &'static str {
        match self {
            PulmoEvent::VitalsUpdated { .. } => "VitalsUpdated",
            PulmoEvent::ImagingAnalyzed { .. } => "ImagingAnalyzed",
            PulmoEvent::AssessmentCompleted { .. } => "AssessmentCompleted",
            PulmoEvent::ReportGenerated { .. } => "ReportGenerated",
        }
    }
}

/// Broadcast bus carrying [`PulmoEvent`]s to all SSE subscribers.
///
/// Thin wrapper over a tokio broadcast channel; cloning shares the
/// underlying sender.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PulmoEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber
    /// before old events are dropped.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<PulmoEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers.
    ///
    /// Returns the subscriber count, or an error when nobody is
    /// listening; callers typically ignore that case with `.ok()`.
    pub fn emit(
        &self,
        event: PulmoEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<PulmoEvent>> {
        self.tx.send(event)
    }
}
