//! reqwest-backed implementations of [`TrafficApi`] and [`DirectionsApi`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{DirectionsApi, TrafficApi};
use crate::date_range::DateRange;
use crate::error::{DashboardError, DashboardResult, ErrorContext, FetchError, FetchOutcome};
use crate::map::Coordinate;
use crate::models::{
    BackendConfig, ErrorBody, PredictRequest, PredictionResult, RawSample, TrendResult,
};

fn build_client(timeout: Duration) -> DashboardResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DashboardError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

fn send_error(err: reqwest::Error, context: ErrorContext) -> FetchError {
    if err.is_timeout() {
        FetchError::timeout(format!("Request timed out: {}", err)).with_context(context)
    } else {
        FetchError::transport(format!("Request failed: {}", err)).with_context(context)
    }
}

/// Read a response body and decode it as `T`.
///
/// Non-2xx responses and 2xx responses carrying an `error` field become
/// `BackendReported` when the error text is present, `Transport` otherwise.
async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    context: ErrorContext,
) -> FetchOutcome<T> {
    let status = response.status();
    let context = context.with_status(status.as_u16());
    let body = response
        .text()
        .await
        .map_err(|e| send_error(e, context.clone()))?;

    if let Ok(ErrorBody { error }) = serde_json::from_str::<ErrorBody>(&body) {
        return Err(FetchError::backend_reported(error).with_context(context));
    }

    if !status.is_success() {
        return Err(FetchError::transport(format!(
            "HTTP {}: {}",
            status,
            body.trim()
        ))
        .with_context(context));
    }

    serde_json::from_str(&body).map_err(|e| {
        FetchError::transport(format!("Malformed response payload: {}", e))
            .with_context(context.with_details(truncate(&body, 200)))
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// HTTP client for the prediction/trend backend.
#[derive(Debug, Clone)]
pub struct HttpTrafficApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTrafficApi {
    /// Create a client rooted at `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DashboardResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            client: build_client(timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TrafficApi for HttpTrafficApi {
    async fn recent_data(&self) -> FetchOutcome<Vec<RawSample>> {
        let path = "/api/get-recent-data";
        let context = ErrorContext::new("get_recent_data").with_endpoint(path);
        debug!("Fetching recent data from backend");

        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| send_error(e, context.clone()))?;
        decode(response, context).await
    }

    async fn predict(
        &self,
        horizon_id: &str,
        recent_data: &[RawSample],
    ) -> FetchOutcome<PredictionResult> {
        let path = "/api/predict";
        let context = ErrorContext::new("predict")
            .with_endpoint(path)
            .with_details(format!("horizon={}", horizon_id));
        debug!(horizon = horizon_id, samples = recent_data.len(), "Requesting prediction");

        let response = self
            .client
            .post(self.url(path))
            .query(&[("horizon", horizon_id)])
            .json(&PredictRequest { recent_data })
            .send()
            .await
            .map_err(|e| send_error(e, context.clone()))?;
        decode(response, context).await
    }

    async fn trends(&self, range: &DateRange) -> FetchOutcome<TrendResult> {
        let path = "/api/trends";
        let context = ErrorContext::new("get_trend")
            .with_endpoint(path)
            .with_details(range.to_string());
        debug!(range = %range, "Fetching trends");

        let response = self
            .client
            .get(self.url(path))
            .query(&[("start", range.start_param()), ("end", range.end_param())])
            .send()
            .await
            .map_err(|e| send_error(e, context.clone()))?;
        decode(response, context).await
    }

    async fn config(&self) -> FetchOutcome<BackendConfig> {
        let path = "/api/config";
        let context = ErrorContext::new("get_config").with_endpoint(path);

        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| send_error(e, context.clone()))?;
        decode(response, context).await
    }
}

/// Mapbox-compatible driving directions client.
#[derive(Debug, Clone)]
pub struct HttpDirectionsApi {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    geometry: LineGeometry,
}

#[derive(Debug, Deserialize)]
struct LineGeometry {
    coordinates: Vec<[f64; 2]>,
}

impl HttpDirectionsApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DashboardResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl DirectionsApi for HttpDirectionsApi {
    async fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
        api_key: &str,
    ) -> FetchOutcome<Vec<Coordinate>> {
        let path = format!(
            "/directions/v5/mapbox/driving-traffic/{},{};{},{}",
            start.lng, start.lat, end.lng, end.lat
        );
        let context = ErrorContext::new("get_route").with_endpoint(path.clone());
        debug!("Fetching route from directions service");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[("geometries", "geojson"), ("access_token", api_key)])
            .send()
            .await
            .map_err(|e| send_error(e, context.clone()))?;
        let body: DirectionsResponse = decode(response, context.clone()).await?;

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::transport("No routes returned").with_context(context))?;
        Ok(route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coordinate { lng, lat })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpTrafficApi::new("http://127.0.0.1:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://127.0.0.1:5000");
        assert_eq!(api.url("/api/config"), "http://127.0.0.1:5000/api/config");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }
}
