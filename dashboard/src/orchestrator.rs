//! Selection-driven dashboard orchestration.
//!
//! [`DashboardOrchestrator::on_selection_changed`] is the single place that
//! decides what selecting a horizon means:
//!
//! ```text
//!  click ──► select (sync): label, highlight, loading cards, reset route
//!                │
//!                ├─ ShortTerm ──► recent data ──► predict ──┐
//!                │                                          ├─► generation still current?
//!                └─ LongTerm ───► trends(start, end) ───────┘        │ yes: render
//!                                                                     │ no:  drop
//! ```
//!
//! Branching depends only on the horizon's kind and trend window, never on
//! its id. Selection state and presenters sit behind one lock, so the
//! generation check and the render that follows it are atomic with respect to
//! other selections. The lock is never held across an await.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::catalog::{HorizonDescriptor, HorizonKind, RangeCatalog, DEFAULT_HORIZON_ID};
use crate::client::{BackendClient, DirectionsApi};
use crate::date_range::{window_for, Clock, LocalClock};
use crate::error::{DashboardResult, FetchError};
use crate::map::{self, MapMode};
use crate::presenters::Presenters;
use crate::state::{Generation, SelectionState};
use crate::theme::Theme;

/// How a selection's fetch was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// The result was rendered.
    Rendered,
    /// The fetch failed and the error state was rendered.
    Failed(FetchError),
    /// A newer selection was made while this one was in flight; nothing rendered.
    Superseded {
        generation: Generation,
        current: Generation,
    },
}

impl SelectionOutcome {
    pub fn is_superseded(&self) -> bool {
        matches!(self, SelectionOutcome::Superseded { .. })
    }
}

struct DashboardInner {
    selection: SelectionState,
    presenters: Presenters,
}

/// Owns selection state and presenters; drives them from backend results.
pub struct DashboardOrchestrator {
    catalog: RangeCatalog,
    client: BackendClient,
    directions: Option<Arc<dyn DirectionsApi>>,
    clock: Arc<dyn Clock>,
    inner: Mutex<DashboardInner>,
}

impl DashboardOrchestrator {
    pub fn builder(client: BackendClient, presenters: Presenters) -> DashboardBuilder {
        DashboardBuilder::new(client, presenters)
    }

    pub fn catalog(&self) -> &RangeCatalog {
        &self.catalog
    }

    pub fn current_horizon_id(&self) -> String {
        self.inner.lock().selection.current_horizon_id().to_string()
    }

    pub fn generation(&self) -> Generation {
        self.inner.lock().selection.generation()
    }

    /// Run `f` with the presenters locked. Do not await inside.
    pub fn with_presenters<R>(&self, f: impl FnOnce(&mut Presenters) -> R) -> R {
        f(&mut self.inner.lock().presenters)
    }

    pub fn apply_theme(&self, theme: Theme) {
        self.inner.lock().presenters.selection.show_theme(theme);
    }

    /// Startup sequence.
    ///
    /// Builds the selector, resolves the map mode from `/api/config`, draws
    /// the markers and the route overlay, then loads the current horizon.
    pub async fn initialize(&self) -> DashboardResult<SelectionOutcome> {
        self.inner.lock().presenters.selection.setup(&self.catalog);

        let mode = match self.client.get_config().await {
            Ok(config) => MapMode::from_config(&config),
            Err(e) => {
                warn!("Error fetching map API key from backend; using tile-only map: {}", e);
                MapMode::TileOnly
            }
        };
        info!(mode = mode.name(), "Map mode selected");

        let path = map::route_path(
            &mode,
            self.directions.as_deref(),
            map::WHITEFIELD,
            map::MARATHAHALLI,
        )
        .await;

        let current = {
            let mut inner = self.inner.lock();
            inner
                .presenters
                .route
                .initialize(&mode, &map::fixed_markers(), &path);
            inner.selection.current_horizon_id().to_string()
        };

        self.on_selection_changed(&current).await
    }

    /// React to the user picking `horizon_id`.
    ///
    /// Selection-dependent labels update before the first await. The returned
    /// outcome says whether this call's fetch ended up on screen.
    ///
    /// # Errors
    /// Returns [`crate::error::DashboardError::UnknownHorizon`] without
    /// changing any state when the id is not in the catalog.
    pub async fn on_selection_changed(&self, horizon_id: &str) -> DashboardResult<SelectionOutcome> {
        let horizon = self.catalog.require(horizon_id)?.clone();
        let range = match horizon.kind {
            HorizonKind::LongTerm => Some(window_for(&horizon, self.clock.today())?),
            HorizonKind::ShortTerm => None,
        };

        let generation = self.begin(&horizon);
        info!(
            horizon = %horizon.id,
            kind = %horizon.kind,
            generation = %generation,
            "Handling selection"
        );

        let outcome = match range {
            None => {
                let result = self.client.traffic_prediction(&horizon.id).await;
                self.finish(generation, |p| match &result {
                    Ok(prediction) => {
                        p.stats.render_prediction(prediction);
                        p.route.render(prediction.traffic_classification);
                        None
                    }
                    Err(e) => {
                        p.stats.render_error(HorizonKind::ShortTerm, &e.user_message());
                        p.route.reset();
                        Some(e.clone())
                    }
                })
            }
            Some(range) => {
                let aggregate = horizon
                    .trend
                    .map(|w| w.aggregate)
                    .unwrap_or(crate::catalog::TrendAggregate::Daily);
                let result = self.client.get_trend(&range).await;
                self.finish(generation, |p| match &result {
                    Ok(trend) => {
                        p.stats.render_trend(trend, aggregate);
                        p.chart.render(&trend.daily);
                        None
                    }
                    Err(e) => {
                        p.stats.render_error(HorizonKind::LongTerm, &e.user_message());
                        p.chart.clear();
                        Some(e.clone())
                    }
                })
            }
        };

        Ok(outcome)
    }

    /// Synchronous half of a selection.
    fn begin(&self, horizon: &HorizonDescriptor) -> Generation {
        let mut inner = self.inner.lock();
        let generation = inner.selection.select(&horizon.id);
        let presenters = &mut inner.presenters;
        presenters.selection.select(horizon);

        match horizon.kind {
            HorizonKind::ShortTerm => {
                presenters.chart.hide();
                presenters.stats.render_loading(HorizonKind::ShortTerm);
                presenters.route.reset();
            }
            HorizonKind::LongTerm => {
                presenters.chart.show();
                presenters.route.reset();
                presenters.stats.render_loading(HorizonKind::LongTerm);
            }
        }
        generation
    }

    /// Apply `render` if `generation` is still current.
    ///
    /// `render` returns the error it displayed, if any.
    fn finish<F>(&self, generation: Generation, render: F) -> SelectionOutcome
    where
        F: FnOnce(&mut Presenters) -> Option<FetchError>,
    {
        let mut inner = self.inner.lock();
        let current = inner.selection.generation();
        if current != generation {
            debug!(
                generation = %generation,
                current = %current,
                "Discarding stale selection result"
            );
            return SelectionOutcome::Superseded {
                generation,
                current,
            };
        }

        match render(&mut inner.presenters) {
            None => SelectionOutcome::Rendered,
            Some(err) => SelectionOutcome::Failed(err),
        }
    }
}

/// Builder for [`DashboardOrchestrator`].
pub struct DashboardBuilder {
    client: BackendClient,
    presenters: Presenters,
    catalog: RangeCatalog,
    directions: Option<Arc<dyn DirectionsApi>>,
    clock: Arc<dyn Clock>,
    default_horizon: String,
}

impl DashboardBuilder {
    pub fn new(client: BackendClient, presenters: Presenters) -> Self {
        Self {
            client,
            presenters,
            catalog: RangeCatalog::standard(),
            directions: None,
            clock: Arc::new(LocalClock),
            default_horizon: DEFAULT_HORIZON_ID.to_string(),
        }
    }

    pub fn catalog(mut self, catalog: RangeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn directions(mut self, directions: Arc<dyn DirectionsApi>) -> Self {
        self.directions = Some(directions);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn default_horizon(mut self, horizon_id: impl Into<String>) -> Self {
        self.default_horizon = horizon_id.into();
        self
    }

    /// # Errors
    /// Fails when the default horizon is not in the catalog.
    pub fn build(self) -> DashboardResult<DashboardOrchestrator> {
        self.catalog.require(&self.default_horizon)?;

        Ok(DashboardOrchestrator {
            catalog: self.catalog,
            client: self.client,
            directions: self.directions,
            clock: self.clock,
            inner: Mutex::new(DashboardInner {
                selection: SelectionState::new(self.default_horizon),
                presenters: self.presenters,
            }),
        })
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod orchestrator_tests;
