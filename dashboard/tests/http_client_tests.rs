//! HTTP client tests against a local axum mock backend.
//!
//! These cover the wire contract of `HttpTrafficApi` and `HttpDirectionsApi`:
//! request shapes, and how each kind of response maps to a `FetchError` kind.

mod support;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, RawQuery};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};

use rushradar::client::{HttpDirectionsApi, HttpTrafficApi};
use rushradar::date_range::DateRange;
use rushradar::map::Coordinate;
use rushradar::models::TrafficClassification;
use rushradar::{DirectionsApi, ErrorKind, TrafficApi};

use support::{closed_address, samples, spawn_backend};

fn api(base_url: &str) -> HttpTrafficApi {
    HttpTrafficApi::new(base_url, Duration::from_secs(5)).unwrap()
}

fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

// =========================================================
// Successful responses
// =========================================================

#[tokio::test]
async fn test_recent_data_returns_samples_verbatim() {
    let app = Router::new().route("/api/get-recent-data", get(|| async { Json(samples(48)) }));
    let base = spawn_backend(app).await;

    let data = api(&base).recent_data().await.unwrap();

    assert_eq!(data.len(), 48);
    assert_eq!(data[3]["Total"], json!(103));
}

#[tokio::test]
async fn test_predict_sends_horizon_and_body() {
    let seen: Arc<Mutex<Option<(String, usize)>>> = Arc::new(Mutex::new(None));
    let recorder = seen.clone();
    let app = Router::new().route(
        "/api/predict",
        post(
            move |Query(query): Query<HashMap<String, String>>, Json(body): Json<Value>| {
                let recorder = recorder.clone();
                async move {
                    let horizon = query.get("horizon").cloned().unwrap_or_default();
                    let count = body["recent_data"].as_array().map(Vec::len).unwrap_or(0);
                    *recorder.lock().unwrap() = Some((horizon, count));
                    Json(json!({
                        "predicted_total_traffic": 4321.4,
                        "traffic_classification": "Heavy"
                    }))
                }
            },
        ),
    );
    let base = spawn_backend(app).await;
    let recent: Vec<Value> = samples(48).as_array().unwrap().clone();

    let prediction = api(&base).predict("2hr", &recent).await.unwrap();

    assert_eq!(prediction.predicted_total_traffic, 4321.4);
    assert_eq!(prediction.traffic_classification, TrafficClassification::Heavy);
    assert_eq!(*seen.lock().unwrap(), Some(("2hr".to_string(), 48)));
}

#[tokio::test]
async fn test_trends_query_and_lenient_dates() {
    let seen: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let recorder = seen.clone();
    let app = Router::new().route(
        "/api/trends",
        get(move |RawQuery(query): RawQuery| {
            let recorder = recorder.clone();
            async move {
                *recorder.lock().unwrap() = query;
                Json(json!({
                    "daily": [
                        {"Date": "Thu, 11 Jan 2024 00:00:00 GMT", "Predicted_Traffic": 1200.5},
                        {"Date": "2024-01-12", "Predicted_Traffic": null},
                        {"Date": "2024-01-13T00:00:00"}
                    ],
                    "weekly": [{"Date": "2024-01-11", "Predicted_Traffic": 8000}]
                }))
            }
        }),
    );
    let base = spawn_backend(app).await;
    let range = DateRange {
        start: jan(11),
        end: jan(17),
    };

    let trend = api(&base).trends(&range).await.unwrap();

    assert_eq!(
        seen.lock().unwrap().as_deref(),
        Some("start=2024-01-11&end=2024-01-17")
    );
    assert_eq!(trend.daily.len(), 3);
    assert_eq!(trend.daily[0].date, jan(11));
    assert_eq!(trend.daily[0].predicted_traffic, 1200.5);
    assert_eq!(trend.daily[1].predicted_traffic, 0.0);
    assert_eq!(trend.daily[2].date, jan(13));
    assert_eq!(trend.weekly.as_ref().map(Vec::len), Some(1));
    assert!(trend.monthly.is_none());
}

#[tokio::test]
async fn test_config_api_key() {
    let app = Router::new().route(
        "/api/config",
        get(|| async { Json(json!({"api_key": "pk.abc"})) }),
    );
    let base = spawn_backend(app).await;

    let config = api(&base).config().await.unwrap();
    assert_eq!(config.api_key.as_deref(), Some("pk.abc"));
}

// =========================================================
// Error mapping
// =========================================================

#[tokio::test]
async fn test_error_body_with_failure_status_is_backend_reported() {
    let app = Router::new().route(
        "/api/predict",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Not enough recent data"})),
            )
        }),
    );
    let base = spawn_backend(app).await;

    let err = api(&base).predict("15min", &[]).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::BackendReported);
    assert_eq!(err.message, "Not enough recent data");
    assert_eq!(err.user_message(), "Not enough recent data");
    assert_eq!(err.context.status, Some(400));
    assert_eq!(err.context.operation.as_deref(), Some("predict"));
}

#[tokio::test]
async fn test_error_body_with_ok_status_is_backend_reported() {
    let app = Router::new().route(
        "/api/trends",
        get(|| async { Json(json!({"error": "Model not trained"})) }),
    );
    let base = spawn_backend(app).await;
    let range = DateRange {
        start: jan(11),
        end: jan(11),
    };

    let err = api(&base).trends(&range).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::BackendReported);
    assert_eq!(err.message, "Model not trained");
    assert_eq!(err.context.status, Some(200));
}

#[tokio::test]
async fn test_failure_status_without_error_body_is_transport() {
    let app = Router::new().route(
        "/api/get-recent-data",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
    );
    let base = spawn_backend(app).await;

    let err = api(&base).recent_data().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(err.message.contains("500"));
    assert_eq!(err.user_message(), "Network Error");
    assert_eq!(err.context.status, Some(500));
}

#[tokio::test]
async fn test_malformed_payload_is_transport() {
    let app = Router::new().route(
        "/api/predict",
        post(|| async { Json(json!({"predicted_total_traffic": "lots"})) }),
    );
    let base = spawn_backend(app).await;

    let err = api(&base).predict("1hr", &[]).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(err.message.starts_with("Malformed response payload"));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport() {
    let base = closed_address().await;

    let err = api(&base).config().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert_eq!(err.context.endpoint.as_deref(), Some("/api/config"));
}

#[tokio::test]
async fn test_slow_backend_is_timeout() {
    let app = Router::new().route(
        "/api/get-recent-data",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(samples(48))
        }),
    );
    let base = spawn_backend(app).await;
    let api = HttpTrafficApi::new(base, Duration::from_millis(200)).unwrap();

    let err = api.recent_data().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Timeout);
    assert_eq!(err.user_message(), "Request timed out");
}

// =========================================================
// Directions
// =========================================================

#[tokio::test]
async fn test_directions_path_and_token() {
    let seen: Arc<Mutex<Option<(String, HashMap<String, String>)>>> = Arc::new(Mutex::new(None));
    let recorder = seen.clone();
    let app = Router::new().fallback(
        move |uri: Uri, Query(query): Query<HashMap<String, String>>| {
            let recorder = recorder.clone();
            async move {
                *recorder.lock().unwrap() = Some((uri.path().to_string(), query));
                Json(json!({
                    "routes": [{
                        "geometry": {
                            "coordinates": [[77.7497, 12.9698], [77.72, 12.96], [77.6963, 12.9569]]
                        }
                    }]
                }))
            }
        },
    );
    let base = spawn_backend(app).await;
    let directions = HttpDirectionsApi::new(base, Duration::from_secs(5)).unwrap();

    let path = directions
        .route(
            Coordinate::new(77.7497, 12.9698),
            Coordinate::new(77.6963, 12.9569),
            "pk.token",
        )
        .await
        .unwrap();

    assert_eq!(path.len(), 3);
    assert_eq!(path[1], Coordinate::new(77.72, 12.96));
    let (request_path, query) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(
        request_path,
        "/directions/v5/mapbox/driving-traffic/77.7497,12.9698;77.6963,12.9569"
    );
    assert_eq!(query.get("geometries").map(String::as_str), Some("geojson"));
    assert_eq!(query.get("access_token").map(String::as_str), Some("pk.token"));
}

#[tokio::test]
async fn test_directions_without_routes_is_error() {
    let app = Router::new().fallback(|| async { Json(json!({"routes": []})) });
    let base = spawn_backend(app).await;
    let directions = HttpDirectionsApi::new(base, Duration::from_secs(5)).unwrap();

    let err = directions
        .route(
            Coordinate::new(77.7497, 12.9698),
            Coordinate::new(77.6963, 12.9569),
            "pk.token",
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
}
