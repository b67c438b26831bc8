//! X-ray upload and analysis API handlers
//!
//! POST /api/analyze-xray (multipart), GET /api/xray

use axum::{
    extract::{Multipart, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;

use pulmo_common::events::PulmoEvent;
use pulmo_engine::confidence::confidence;

use crate::error::{ApiError, ApiResult};
use crate::services::XrayModelClient;
use crate::{AppState, ImagingState};

/// POST /api/analyze-xray response
#[derive(Debug, Serialize)]
pub struct XrayAnalysisResponse {
    /// Classifier label
    pub label: String,
    /// Pneumonia-pattern probability
    pub probability: f64,
    /// Confidence of the probability
    pub confidence: f64,
    /// Base64 PNG of the annotated overlay
    pub image: String,
}

/// GET /api/xray response
#[derive(Debug, Serialize)]
pub struct ImagingStateResponse {
    /// Latest analysis, absent until an image has been processed
    pub imaging: Option<ImagingState>,
}

/// GET /api/xray
pub async fn get_imaging(State(state): State<AppState>) -> Json<ImagingStateResponse> {
    let imaging = state.imaging.read().await.clone();
    Json(ImagingStateResponse { imaging })
}

/// POST /api/analyze-xray
///
/// Accepts a multipart form with an `image` field, runs the external
/// classifier, and stores the result as the current imaging input.
pub async fn analyze_xray(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<XrayAnalysisResponse>> {
    let mut image_bytes: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some("image") {
            let file_name = field.file_name().unwrap_or("upload.jpeg").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
            image_bytes = Some((file_name, bytes.to_vec()));
        }
    }

    let (file_name, bytes) =
        image_bytes.ok_or_else(|| ApiError::BadRequest("Missing image field".to_string()))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Empty image upload".to_string()));
    }

    // Scratch file for the classifier; extension preserved so the
    // image loader recognizes the format.
    let extension = std::path::Path::new(&file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpeg");
    let temp_image =
        std::env::temp_dir().join(format!("xray_{}.{}", uuid::Uuid::new_v4(), extension));
    tokio::fs::write(&temp_image, &bytes).await?;

    tracing::info!(file = %file_name, size = bytes.len(), "Analyzing uploaded X-ray");

    let client = XrayModelClient::new(&state.config.python_bin, &state.config.models_dir);
    let analysis = client.analyze(&temp_image).await;

    let _ = std::fs::remove_file(&temp_image);

    let analysis = match analysis {
        Ok(analysis) => analysis,
        Err(e) => {
            state.record_error(e.to_string()).await;
            return Err(e.into());
        }
    };

    let image_confidence = confidence(analysis.probability);

    *state.imaging.write().await = Some(ImagingState {
        label: analysis.label.clone(),
        probability: analysis.probability,
        confidence: image_confidence,
        analyzed_at: Utc::now(),
    });

    state
        .event_bus
        .emit(PulmoEvent::ImagingAnalyzed {
            label: analysis.label.clone(),
            probability: analysis.probability,
            timestamp: Utc::now(),
        })
        .ok();

    Ok(Json(XrayAnalysisResponse {
        label: analysis.label,
        probability: analysis.probability,
        confidence: image_confidence,
        image: analysis.image,
    }))
}

/// Build X-ray routes
pub fn xray_routes() -> Router<AppState> {
    Router::new()
        .route("/api/xray", get(get_imaging))
        .route("/api/analyze-xray", post(analyze_xray))
}
