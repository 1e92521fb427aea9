//! # RushRadar Dashboard
//!
//! Selection, fetch and render orchestration for the RushRadar traffic
//! prediction dashboard.
//!
//! The user picks a time horizon. Short-term horizons (15 min to 3 hours) ask
//! the backend for a prediction built from the most recent traffic samples;
//! long-term horizons (next day, week, month) ask for a forecast trend over a
//! calendar window. Three surfaces are kept consistent with the latest
//! selection: stat cards, a route overlay on a map, and a trend chart.
//!
//! ## Architecture
//!
//! ```text
//!   click ──► DashboardOrchestrator ──► BackendClient ──► TrafficApi (HTTP)
//!                    │
//!                    ▼
//!               Presenters ──► StatsSurface / MapSurface / ChartSurface / SelectionSurface
//! ```
//!
//! - [`catalog`]: the selectable horizons and their kinds
//! - [`date_range`]: calendar windows for trend queries
//! - [`client`]: backend transport trait, HTTP implementation and fetch policy
//! - [`orchestrator`]: the selection state machine and stale-result guard
//! - [`presenters`]: idempotent renders onto the surfaces
//! - [`surfaces`]: surface traits and in-memory implementations
//! - [`config`], [`theme`], [`map`]: configuration, theme preference, map mode
//!
//! ## Features
//!
//! - `http-client` (default): reqwest implementations of the backend and
//!   directions APIs
//! - `console` (default): the `rushradar` console front end

pub mod catalog;
pub mod client;
pub mod config;
pub mod date_range;
pub mod error;
pub mod map;
pub mod models;
pub mod orchestrator;
pub mod presenters;
pub mod state;
pub mod surfaces;
pub mod theme;

pub use catalog::{HorizonDescriptor, HorizonKind, RangeCatalog, TrendAggregate};
pub use client::{BackendClient, DirectionsApi, TrafficApi};
pub use config::DashboardConfig;
pub use error::{DashboardError, DashboardResult, ErrorKind, FetchError, FetchOutcome};
pub use orchestrator::{DashboardBuilder, DashboardOrchestrator, SelectionOutcome};
pub use presenters::Presenters;
pub use theme::{Theme, ThemeStore};
