//! Backend access for the dashboard.
//!
//! Two layers:
//!
//! - [`TrafficApi`] is the transport seam. One method per remote endpoint,
//!   each performing exactly one round trip and normalizing every failure into
//!   a [`FetchError`]. [`HttpTrafficApi`] implements it over HTTP; tests plug
//!   in scripted fakes.
//! - [`BackendClient`] wraps a `TrafficApi` with the dashboard's fetch policy:
//!   the minimum recent-sample window checked before `predict`, the request
//!   timeout, and empty-trend detection.
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │  DashboardOrchestrator                      │
//! └───────────────────┬────────────────────────┘
//!                     │
//! ┌───────────────────▼────────────────────────┐
//! │  BackendClient (window guard, timeout)      │
//! └───────────────────┬────────────────────────┘
//!                     │
//! ┌───────────────────▼────────────────────────┐
//! │  TrafficApi (HttpTrafficApi / fakes)        │
//! └────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::date_range::DateRange;
use crate::error::{ErrorContext, FetchError, FetchOutcome};
use crate::map::Coordinate;
use crate::models::{BackendConfig, PredictionResult, RawSample, TrendResult};

#[cfg(feature = "http-client")]
pub mod http;

#[cfg(feature = "http-client")]
pub use http::{HttpDirectionsApi, HttpTrafficApi};

/// Samples the prediction model needs as context.
pub const MIN_RECENT_SAMPLES: usize = 48;

/// Default bound on a single backend call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote prediction/trend service.
///
/// Implementations must be `Send + Sync`; the orchestrator shares one instance
/// across selection tasks.
#[async_trait]
pub trait TrafficApi: Send + Sync {
    /// `GET /api/get-recent-data`
    async fn recent_data(&self) -> FetchOutcome<Vec<RawSample>>;

    /// `POST /api/predict?horizon=...`
    async fn predict(
        &self,
        horizon_id: &str,
        recent_data: &[RawSample],
    ) -> FetchOutcome<PredictionResult>;

    /// `GET /api/trends?start=...&end=...`
    async fn trends(&self, range: &DateRange) -> FetchOutcome<TrendResult>;

    /// `GET /api/config`
    async fn config(&self) -> FetchOutcome<BackendConfig>;
}

/// Road routing service used to draw the route overlay along real streets.
#[async_trait]
pub trait DirectionsApi: Send + Sync {
    /// Path from `start` to `end` as a polyline.
    async fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
        api_key: &str,
    ) -> FetchOutcome<Vec<Coordinate>>;
}

/// Policy layer over a [`TrafficApi`].
#[derive(Clone)]
pub struct BackendClient {
    api: Arc<dyn TrafficApi>,
    timeout: Duration,
    min_recent_samples: usize,
}

impl BackendClient {
    pub fn new(api: Arc<dyn TrafficApi>) -> Self {
        Self {
            api,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            min_recent_samples: MIN_RECENT_SAMPLES,
        }
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn min_recent_samples(&self) -> usize {
        self.min_recent_samples
    }

    /// Fetch the recent observations used as prediction context.
    pub async fn get_recent_data(&self) -> FetchOutcome<Vec<RawSample>> {
        self.bounded("get_recent_data", self.api.recent_data()).await
    }

    /// Request a short-term prediction.
    ///
    /// Fails fast with `InsufficientData`, without a network call, when
    /// `recent_data` is shorter than the prediction window.
    pub async fn predict(
        &self,
        horizon_id: &str,
        recent_data: &[RawSample],
    ) -> FetchOutcome<PredictionResult> {
        if recent_data.len() < self.min_recent_samples {
            let err = FetchError::insufficient_data(self.min_recent_samples, recent_data.len())
                .with_context(ErrorContext::new("predict").with_details(horizon_id.to_string()));
            warn!("{}", err);
            return Err(err);
        }
        self.bounded("predict", self.api.predict(horizon_id, recent_data))
            .await
    }

    /// Fetch recent data, then predict from it.
    pub async fn traffic_prediction(&self, horizon_id: &str) -> FetchOutcome<PredictionResult> {
        let recent_data = self.get_recent_data().await?;
        debug!(
            horizon = horizon_id,
            samples = recent_data.len(),
            "Recent data received"
        );
        self.predict(horizon_id, &recent_data).await
    }

    /// Fetch daily (and optionally weekly/monthly) forecasts for `range`.
    ///
    /// A successful response without daily entries is reported as `EmptyTrend`.
    pub async fn get_trend(&self, range: &DateRange) -> FetchOutcome<TrendResult> {
        let result = self.bounded("get_trend", self.api.trends(range)).await?;
        if result.daily.is_empty() {
            let err = FetchError::empty_trend(format!("No daily trend entries for {}", range))
                .with_operation("get_trend");
            warn!("{}", err);
            return Err(err);
        }
        Ok(result)
    }

    /// Fetch the frontend configuration (map provider key).
    pub async fn get_config(&self) -> FetchOutcome<BackendConfig> {
        self.bounded("get_config", self.api.config()).await
    }

    async fn bounded<T, F>(&self, operation: &str, call: F) -> FetchOutcome<T>
    where
        F: Future<Output = FetchOutcome<T>>,
    {
        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::timeout(format!(
                "{} did not complete within {:?}",
                operation, self.timeout
            ))),
        };

        outcome.map_err(|err| {
            let err = if err.context.operation.is_none() {
                err.with_operation(operation)
            } else {
                err
            };
            warn!("{}", err);
            err
        })
    }
}
