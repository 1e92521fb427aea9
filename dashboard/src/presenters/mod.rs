//! Presenters translate dashboard results into surface updates.
//!
//! Each presenter owns one surface and exposes idempotent render operations.
//! [`Presenters`] bundles the four so the orchestrator can update them under
//! a single lock.

pub mod chart;
pub mod route;
pub mod selection;
pub mod stats;

pub use chart::TrendChartPresenter;
pub use route::RoutePresenter;
pub use selection::SelectionPresenter;
pub use stats::{StatCards, StatsPresenter};

use crate::surfaces::memory::MemorySurfaces;
use crate::surfaces::{ChartSurface, MapSurface, SelectionSurface, StatsSurface};

pub struct Presenters {
    pub stats: StatsPresenter,
    pub route: RoutePresenter,
    pub chart: TrendChartPresenter,
    pub selection: SelectionPresenter,
}

impl Presenters {
    pub fn new(
        stats: Box<dyn StatsSurface>,
        map: Box<dyn MapSurface>,
        chart: Box<dyn ChartSurface>,
        selection: Box<dyn SelectionSurface>,
    ) -> Self {
        Self {
            stats: StatsPresenter::new(stats),
            route: RoutePresenter::new(map),
            chart: TrendChartPresenter::new(chart),
            selection: SelectionPresenter::new(selection),
        }
    }

    /// Presenters over clones of in-memory surfaces.
    pub fn in_memory(surfaces: &MemorySurfaces) -> Self {
        Self::new(
            Box::new(surfaces.stats.clone()),
            Box::new(surfaces.map.clone()),
            Box::new(surfaces.chart.clone()),
            Box::new(surfaces.selection.clone()),
        )
    }

    pub fn with_peak_hours(mut self, peak_hours: impl Into<String>) -> Self {
        self.stats = self.stats.with_peak_hours(peak_hours);
        self
    }
}
