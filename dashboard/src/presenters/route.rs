//! Route overlay coloring.

use tracing::debug;

use crate::map::{Coordinate, MapMode, Marker};
use crate::models::TrafficClassification;
use crate::surfaces::{MapSurface, RouteHandle};

/// Color of the route when no classification applies.
pub const NEUTRAL_COLOR: &str = "#888888";

/// Line color for a classification; `None` is neutral.
pub fn route_color(classification: Option<TrafficClassification>) -> &'static str {
    match classification {
        Some(TrafficClassification::Light) => "#22c55e",
        Some(TrafficClassification::Normal) => "#facc15",
        Some(TrafficClassification::Heavy) => "#ef4444",
        Some(TrafficClassification::Extreme) => "#b91c1c",
        None => NEUTRAL_COLOR,
    }
}

/// Owns the single route overlay and its color.
///
/// The overlay is drawn once by [`RoutePresenter::initialize`]. Color changes
/// requested before that are remembered and applied when it is drawn.
pub struct RoutePresenter {
    surface: Box<dyn MapSurface>,
    route: Option<RouteHandle>,
    color: &'static str,
}

impl RoutePresenter {
    pub fn new(surface: Box<dyn MapSurface>) -> Self {
        Self {
            surface,
            route: None,
            color: NEUTRAL_COLOR,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.route.is_some()
    }

    pub fn current_color(&self) -> &'static str {
        self.color
    }

    /// Set the map mode, place markers and draw the overlay.
    ///
    /// Later calls are ignored; the overlay is never recreated.
    pub fn initialize(&mut self, mode: &MapMode, markers: &[Marker], path: &[Coordinate]) {
        if self.route.is_some() {
            debug!("Route overlay already initialized");
            return;
        }
        self.surface.set_mode(mode);
        for marker in markers {
            self.surface.place_marker(marker);
        }
        self.route = Some(self.surface.draw_route(path, self.color));
    }

    pub fn render(&mut self, classification: TrafficClassification) {
        self.apply(route_color(Some(classification)));
    }

    pub fn reset(&mut self) {
        self.apply(NEUTRAL_COLOR);
    }

    fn apply(&mut self, color: &'static str) {
        self.color = color;
        if let Some(route) = self.route {
            self.surface.set_route_color(route, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{fixed_markers, MARATHAHALLI, WHITEFIELD};
    use crate::surfaces::memory::MemoryMap;

    fn initialized() -> (RoutePresenter, MemoryMap) {
        let map = MemoryMap::new();
        let mut route = RoutePresenter::new(Box::new(map.clone()));
        route.initialize(&MapMode::TileOnly, &fixed_markers(), &[WHITEFIELD, MARATHAHALLI]);
        (route, map)
    }

    #[test]
    fn test_initialize_draws_neutral_once() {
        let (mut route, map) = initialized();
        assert_eq!(map.route_count(), 1);
        assert_eq!(map.markers().len(), 2);
        assert_eq!(map.route_color().as_deref(), Some(NEUTRAL_COLOR));

        route.initialize(&MapMode::TileOnly, &fixed_markers(), &[WHITEFIELD, MARATHAHALLI]);
        assert_eq!(map.route_count(), 1);
        assert_eq!(map.markers().len(), 2);
    }

    #[test]
    fn test_render_and_reset() {
        let (mut route, map) = initialized();
        route.render(TrafficClassification::Extreme);
        assert_eq!(map.route_color().as_deref(), Some("#b91c1c"));

        route.reset();
        assert_eq!(map.route_color().as_deref(), Some(NEUTRAL_COLOR));
        assert_eq!(route.current_color(), NEUTRAL_COLOR);
    }

    #[test]
    fn test_color_before_initialize_is_applied_on_draw() {
        let map = MemoryMap::new();
        let mut route = RoutePresenter::new(Box::new(map.clone()));
        route.render(TrafficClassification::Light);
        assert_eq!(map.route_count(), 0);

        route.initialize(&MapMode::TileOnly, &[], &[WHITEFIELD, MARATHAHALLI]);
        assert_eq!(map.route_color().as_deref(), Some("#22c55e"));
    }

    #[test]
    fn test_color_table() {
        assert_eq!(route_color(Some(TrafficClassification::Light)), "#22c55e");
        assert_eq!(route_color(Some(TrafficClassification::Normal)), "#facc15");
        assert_eq!(route_color(Some(TrafficClassification::Heavy)), "#ef4444");
        assert_eq!(route_color(None), NEUTRAL_COLOR);
    }
}
