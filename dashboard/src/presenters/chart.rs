//! Trend chart lifecycle.
//!
//! At most one chart instance is alive at any time. [`TrendChartPresenter::render`]
//! destroys the previous instance before creating the next one; two live
//! instances would draw overlapping canvases.

use crate::models::TrendPoint;
use crate::surfaces::{ChartHandle, ChartSpec, ChartSurface};

pub const SERIES_LABEL: &str = "Predicted Daily Traffic";
pub const SERIES_COLOR: &str = "#3b82f6";

pub struct TrendChartPresenter {
    surface: Box<dyn ChartSurface>,
    live: Option<ChartHandle>,
    visible: bool,
}

impl TrendChartPresenter {
    pub fn new(surface: Box<dyn ChartSurface>) -> Self {
        Self {
            surface,
            live: None,
            visible: false,
        }
    }

    pub fn has_chart(&self) -> bool {
        self.live.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.set_visible(true);
    }

    pub fn hide(&mut self) {
        self.set_visible(false);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.surface.set_visible(visible);
    }

    /// Replace the chart with one plotting `daily`.
    pub fn render(&mut self, daily: &[TrendPoint]) {
        self.clear();
        let spec = ChartSpec {
            series_label: SERIES_LABEL.to_string(),
            color: SERIES_COLOR.to_string(),
            points: daily.iter().map(|p| (p.date, p.predicted_traffic)).collect(),
        };
        self.live = Some(self.surface.create_chart(&spec));
    }

    /// Destroy the live chart, if any.
    pub fn clear(&mut self) {
        if let Some(chart) = self.live.take() {
            self.surface.destroy_chart(chart);
        }
    }
}
