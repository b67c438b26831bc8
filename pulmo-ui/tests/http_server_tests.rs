//! HTTP server & routing integration tests
//!
//! Drives the router in-process. None of these tests require the
//! external model scripts: model-backed routes are exercised for their
//! failure contract, everything else runs the local paths.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pulmo_common::config::ServiceConfig;
use pulmo_common::events::EventBus;
use pulmo_ui::{build_router, AppState};

fn test_app_state() -> AppState {
    let config = ServiceConfig {
        // Point at a directory that cannot exist so model-backed routes
        // fail deterministically.
        models_dir: "/nonexistent/pulmo-test-models".into(),
        ..ServiceConfig::default()
    };
    AppState::new(config, EventBus::new(100))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn root_route_serves_html() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "pulmo-ui");
}

#[tokio::test]
async fn vitals_roundtrip_through_state() {
    let state = test_app_state();

    let update = json!({
        "vitals": {
            "Temperature_C": 38.5, "Temperature_trend": 0.7,
            "SpO2_percent": 92.0, "SpO2_trend": -2.5,
            "HeartRate_bpm": 130.0, "HeartRate_trend": 10.0,
            "RespRate_bpm": 38.0, "RespRate_trend": 8.0,
            "Cough": 1, "Retractions": 1
        },
        "age_group": "toddler"
    });

    let response = build_router(state.clone())
        .oneshot(json_request(Method::PUT, "/api/vitals", update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = build_router(state)
        .oneshot(
            Request::builder()
                .uri("/api/vitals")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["vitals"]["Temperature_C"], 38.5);
    assert_eq!(body["vitals"]["Cough"], 1);
    assert_eq!(body["age_group"], "toddler");
}

#[tokio::test]
async fn invalid_vitals_are_rejected() {
    let app = build_router(test_app_state());

    // Cough = 3 violates the 0/1 indicator encoding.
    let update = json!({
        "vitals": {
            "Temperature_C": 37.0, "Temperature_trend": 0.0,
            "SpO2_percent": 98.0, "SpO2_trend": 0.0,
            "HeartRate_bpm": 100.0, "HeartRate_trend": 0.0,
            "RespRate_bpm": 25.0, "RespRate_trend": 0.0,
            "Cough": 3, "Retractions": 0
        }
    });

    let response = app
        .oneshot(json_request(Method::PUT, "/api/vitals", update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn simulate_updates_current_vitals() {
    let state = test_app_state();

    let response = build_router(state.clone())
        .oneshot(json_request(
            Method::POST,
            "/api/vitals/simulate",
            json!({"scenario": "pneumonia"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["scenario"], "pneumonia");
    assert_eq!(body["pattern"], "Pneumonia");
    assert!(body["vitals"]["Temperature_C"].as_f64().unwrap() >= 38.2);

    // The stepped snapshot became the current state.
    let response = build_router(state)
        .oneshot(
            Request::builder()
                .uri("/api/vitals")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["vitals"]["SpO2_percent"].as_f64().unwrap() <= 94.0);
}

#[tokio::test]
async fn assessment_uses_heuristic_without_model() {
    let state = test_app_state();

    // Distressed vitals; imaging still at its initial 0.
    let update = json!({
        "vitals": {
            "Temperature_C": 39.0, "Temperature_trend": 0.5,
            "SpO2_percent": 85.0, "SpO2_trend": -3.0,
            "HeartRate_bpm": 130.0, "HeartRate_trend": 10.0,
            "RespRate_bpm": 40.0, "RespRate_trend": 5.0,
            "Cough": 1, "Retractions": 1
        }
    });
    build_router(state.clone())
        .oneshot(json_request(Method::PUT, "/api/vitals", update))
        .await
        .unwrap();

    let response = build_router(state)
        .oneshot(
            Request::builder()
                .uri("/api/assessment")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["vitals_source"], "heuristic");
    assert_eq!(body["vitals_probability"], 1.0);
    // Imaging probability 0 is fully confident in "no pneumonia":
    // imaging keeps the lead and pulls the score down.
    assert_eq!(body["fusion"]["imaging_weight"], 0.6);
    assert_eq!(body["abnormalities"], "Present");
    assert!(body["risk_factors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "Low SpO2 (oxygen saturation)"));
    assert!(body["next_steps"].as_array().is_some());
}

#[tokio::test]
async fn model_backed_assessment_fails_loudly_without_script() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/assessment?source=model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Never a silent fallback to the heuristic.
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "MODEL_ERROR");
}

#[tokio::test]
async fn analyze_vitals_propagates_model_failure() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(json_request(Method::POST, "/api/analyze-vitals", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "MODEL_ERROR");
}

#[tokio::test]
async fn generate_report_runs_on_fallback_path() {
    // Ensure the remote narration path is off regardless of the
    // developer's environment.
    std::env::remove_var("GROQ_API_KEY");

    let app = build_router(test_app_state());

    let request = json!({
        "vitals_probability": 0.82,
        "age_group": "Preschool",
        "image_probability": 0.9,
        "shap_contributors": [
            {"feature": "RespRate_trend", "contribution": 1.96}
        ],
        "age_adjusted_flags": {"HeartRate": "Normal for age", "RespRate": "High for age"},
        "risk_factors_text": ["Declining oxygen saturation over time indicates hypoxemia"]
    });

    let response = app
        .oneshot(json_request(Method::POST, "/api/generate-report", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["triage_level"], "CRITICAL");
    let steps: Vec<&str> = body["next_steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert!(steps.contains(&"Initiate high-flow oxygen therapy"));
    assert!(steps.contains(&"Continuous oxygen saturation monitoring"));
    assert!(body["clinical_report"]
        .as_str()
        .unwrap()
        .contains("Clinical Impression"));
    assert!(body["disclaimer"]
        .as_str()
        .unwrap()
        .contains("educational"));
}

#[tokio::test]
async fn generate_report_rejects_bad_probability() {
    let app = build_router(test_app_state());

    let request = json!({
        "vitals_probability": 1.4,
        "age_group": "Preschool",
        "shap_contributors": [],
        "age_adjusted_flags": {"HeartRate": "Normal for age", "RespRate": "Normal for age"},
        "risk_factors_text": []
    });

    let response = app
        .oneshot(json_request(Method::POST, "/api/generate-report", request))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn xray_state_is_empty_before_upload() {
    let app = build_router(test_app_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/xray")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["imaging"].is_null());
}

#[tokio::test]
async fn analyze_xray_requires_image_field() {
    let app = build_router(test_app_state());

    let boundary = "pulmo-test-boundary";
    let multipart_body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
    );

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/analyze-xray")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
