/// Router-level integration tests
/// Exercises the HTTP surface with `tower::ServiceExt::oneshot`, without
/// binding a socket.
use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

use deposit_scoring_api::artifact::{EncodedColumn, ScoringArtifact};
use deposit_scoring_api::config::Config;
use deposit_scoring_api::handlers::{self, AppState};
use deposit_scoring_api::scoring::ScoringModel;

fn test_config() -> Config {
    Config {
        model_path: "missing-artifact.json".to_string(),
        port: 3000,
        score_cache_ttl_secs: 300,
        score_cache_capacity: 100,
    }
}

fn test_artifact() -> ScoringArtifact {
    ScoringArtifact {
        name: "test-logreg".to_string(),
        version: "0.0.1".to_string(),
        trained_at: chrono::Utc::now(),
        columns: vec![
            EncodedColumn::Numeric {
                source: "age".to_string(),
                mean: 40.0,
                std: 10.0,
            },
            EncodedColumn::Indicator {
                source: "poutcome".to_string(),
                level: "success".to_string(),
            },
        ],
        coefficients: vec![0.5, 1.2],
        intercept: -1.0,
        threshold: 0.5,
    }
}

fn app(model: Option<ScoringModel>) -> Router {
    let state = Arc::new(AppState {
        config: test_config(),
        model: model.map(Arc::new),
        score_cache: Cache::builder()
            .time_to_live(Duration::from_secs(300))
            .max_capacity(100)
            .build(),
    });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/predict", post(handlers::predict))
        .route("/api/v1/model", get(handlers::model_info))
        .with_state(state)
}

fn valid_payload() -> Value {
    json!({
        "age": 35,
        "job": "admin.",
        "marital": "married",
        "education": "university.degree",
        "default": "no",
        "housing": "yes",
        "loan": "no",
        "contact": "cellular",
        "month": "may",
        "day_of_week": "thu",
        "campaign": 2,
        "pdays": 999,
        "previous": 0,
        "poutcome": "nonexistent",
        "emp_var_rate": 1.1,
        "cons_price_idx": 93.994,
        "cons_conf_idx": -36.4,
        "euribor3m": 4.857,
        "nr_employed": 5191.0
    })
}

fn predict_request(payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/predict")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_missing_model() {
    let response = app(None)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], false);
}

#[tokio::test]
async fn predict_without_model_is_unavailable() {
    // No artifact loaded: the prediction operation must not be functional.
    let app = app(None);

    let response = app
        .clone()
        .oneshot(predict_request(&valid_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("not found"));
    assert!(body["hint"].as_str().is_some());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn predict_happy_path() {
    let response = app(Some(ScoringModel::new(test_artifact())))
        .oneshot(predict_request(&valid_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let probability = body["probability"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&probability));
    assert!(body["label"] == 0 || body["label"] == 1);
    assert!(["HIGH", "MEDIUM", "LOW"].contains(&body["tier"].as_str().unwrap()));
    assert_eq!(body["recommendation"].as_array().unwrap().len(), 3);
    assert_eq!(body["cached"], false);
    assert_eq!(body["model_version"], "0.0.1");
    assert!(body["request_id"].as_str().is_some());
}

#[tokio::test]
async fn repeat_submission_is_served_from_cache() {
    let app = app(Some(ScoringModel::new(test_artifact())));

    let first = body_json(
        app.clone()
            .oneshot(predict_request(&valid_payload()))
            .await
            .unwrap(),
    )
    .await;
    let second = body_json(
        app.oneshot(predict_request(&valid_payload()))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(first["cached"], false);
    assert_eq!(second["cached"], true);
    assert_eq!(first["probability"], second["probability"]);
    assert_eq!(first["tier"], second["tier"]);
    // A cache hit is still its own request.
    assert_ne!(first["request_id"], second["request_id"]);
}

#[tokio::test]
async fn out_of_range_field_is_rejected() {
    let app = app(Some(ScoringModel::new(test_artifact())));

    let mut payload = valid_payload();
    payload["age"] = json!(17);

    let response = app.oneshot(predict_request(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("age"));
}

#[tokio::test]
async fn unknown_category_is_rejected_at_deserialization() {
    let app = app(Some(ScoringModel::new(test_artifact())));

    let mut payload = valid_payload();
    payload["job"] = json!("astronaut");

    let response = app.oneshot(predict_request(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn schema_mismatch_surfaces_prediction_error() {
    // Artifact trained against a column this service does not expose.
    let mut stale = test_artifact();
    stale.columns.push(EncodedColumn::Numeric {
        source: "duration".to_string(),
        mean: 250.0,
        std: 200.0,
    });
    stale.coefficients.push(0.9);

    let app = app(Some(ScoringModel::new(stale)));

    let response = app
        .clone()
        .oneshot(predict_request(&valid_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("duration"));
}

#[tokio::test]
async fn failed_requests_leave_scoring_state_intact() {
    let app = app(Some(ScoringModel::new(test_artifact())));

    let first = body_json(
        app.clone()
            .oneshot(predict_request(&valid_payload()))
            .await
            .unwrap(),
    )
    .await;

    // A rejected request in between must not disturb anything.
    let mut bad = valid_payload();
    bad["campaign"] = json!(0);
    let response = app
        .clone()
        .oneshot(predict_request(&bad))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let again = body_json(
        app.oneshot(predict_request(&valid_payload()))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(again["cached"], true);
    assert_eq!(first["probability"], again["probability"]);
}

#[tokio::test]
async fn model_info_reports_artifact_metadata() {
    let response = app(Some(ScoringModel::new(test_artifact())))
        .oneshot(
            Request::builder()
                .uri("/api/v1/model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "test-logreg");
    assert_eq!(body["version"], "0.0.1");
    assert_eq!(body["columns"], 2);
    assert_eq!(body["threshold"], 0.5);
}
