//! UI capability surfaces driven by the presenters.
//!
//! Each trait is the narrow slice of a UI toolkit the dashboard needs: text
//! fields for the stat cards, a map that can hold markers and one recolorable
//! line, a chart host that creates and destroys line charts, and the horizon
//! selector. Presenters own their surface as a boxed trait object.
//!
//! [`memory`] provides in-memory implementations that record the visible state;
//! the console front end and the tests render from them.

use chrono::NaiveDate;

use crate::catalog::HorizonDescriptor;
use crate::map::{Coordinate, MapMode, Marker};
use crate::theme::Theme;

pub mod memory;

/// Opaque reference to a chart instance created by a [`ChartSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(pub u64);

/// Opaque reference to a line drawn on a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteHandle(pub u64);

/// Opaque reference to a selector button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonHandle(pub u64);

/// The three stat cards.
pub trait StatsSurface: Send {
    fn set_count(&mut self, text: &str);
    fn set_classification(&mut self, text: &str);
    fn set_peak(&mut self, text: &str);
    fn set_peak_label(&mut self, text: &str);
}

/// Map with fixed markers and one route line.
pub trait MapSurface: Send {
    fn set_mode(&mut self, mode: &MapMode);
    fn place_marker(&mut self, marker: &Marker);
    fn draw_route(&mut self, path: &[Coordinate], color: &str) -> RouteHandle;
    fn set_route_color(&mut self, route: RouteHandle, color: &str);
}

/// Everything needed to draw one line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub series_label: String,
    pub color: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Host for the trend chart.
pub trait ChartSurface: Send {
    /// Show or hide the chart container.
    fn set_visible(&mut self, visible: bool);
    fn create_chart(&mut self, spec: &ChartSpec) -> ChartHandle;
    fn destroy_chart(&mut self, chart: ChartHandle);
}

/// Horizon selector, selection label and theme toggle.
pub trait SelectionSurface: Send {
    fn add_button(&mut self, horizon: &HorizonDescriptor) -> ButtonHandle;
    /// `tag` is the kind style (`short`/`long`) applied while active.
    fn set_button_active(&mut self, button: ButtonHandle, active: bool, tag: &str);
    fn set_selected_label(&mut self, label: &str);
    fn set_theme(&mut self, theme: Theme);
}
