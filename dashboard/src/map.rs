//! Map setup: render mode, fixed markers and the route path.
//!
//! The route overlay runs between two fixed points. With a usable map
//! provider key the path follows roads via the directions service; without
//! one, or when routing fails, it is a straight two-point line.

use tracing::{info, warn};

use crate::client::DirectionsApi;
use crate::models::BackendConfig;

/// Placeholder shipped in the default backend config.
const API_KEY_PLACEHOLDER: &str = "YOUR_MAPBOX_API_KEY";

/// A WGS84 position in (longitude, latitude) order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Route start.
pub const WHITEFIELD: Coordinate = Coordinate::new(77.7497, 12.9698);
/// Route end.
pub const MARATHAHALLI: Coordinate = Coordinate::new(77.6963, 12.9569);

/// A named pin on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: &'static str,
    pub position: Coordinate,
    pub color: &'static str,
}

/// The two route endpoints.
pub fn fixed_markers() -> [Marker; 2] {
    [
        Marker {
            name: "Whitefield",
            position: WHITEFIELD,
            color: "#22c55e",
        },
        Marker {
            name: "Marathahalli",
            position: MARATHAHALLI,
            color: "#ef4444",
        },
    ]
}

/// How the map is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapMode {
    /// Vector tiles and road routing, authenticated with the provider key.
    Vector { api_key: String },
    /// Plain raster tiles; no key, no routing.
    TileOnly,
}

impl MapMode {
    /// Pick the mode from the backend's `/api/config` answer.
    pub fn from_config(config: &BackendConfig) -> Self {
        match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && !key.contains(API_KEY_PLACEHOLDER) => MapMode::Vector {
                api_key: key.to_string(),
            },
            _ => MapMode::TileOnly,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MapMode::Vector { .. } => "vector",
            MapMode::TileOnly => "tile-only",
        }
    }
}

/// Resolve the polyline for the route overlay.
///
/// Never fails: any routing problem yields the straight `start`-`end` line.
pub async fn route_path(
    mode: &MapMode,
    directions: Option<&dyn DirectionsApi>,
    start: Coordinate,
    end: Coordinate,
) -> Vec<Coordinate> {
    let straight = vec![start, end];

    let (api_key, directions) = match (mode, directions) {
        (MapMode::Vector { api_key }, Some(directions)) => (api_key, directions),
        (MapMode::Vector { .. }, None) => {
            info!("No directions service configured; using straight route line");
            return straight;
        }
        (MapMode::TileOnly, _) => return straight,
    };

    match directions.route(start, end, api_key).await {
        Ok(path) if path.len() >= 2 => {
            info!(points = path.len(), "Routed path received");
            path
        }
        Ok(_) => {
            warn!("Directions service returned a degenerate path; using straight line");
            straight
        }
        Err(e) => {
            warn!("Error fetching route: {}", e);
            straight
        }
    }
}
