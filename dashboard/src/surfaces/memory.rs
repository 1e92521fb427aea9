//! In-memory surfaces that record what would be visible on screen.
//!
//! Every surface is a cheap cloneable handle over shared state: hand one clone
//! to a presenter and keep another to inspect or print the board.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    ButtonHandle, ChartHandle, ChartSpec, ChartSurface, MapSurface, RouteHandle,
    SelectionSurface, StatsSurface,
};
use crate::catalog::{HorizonDescriptor, HorizonKind};
use crate::map::{Coordinate, MapMode, Marker};
use crate::presenters::stats::StatCards;
use crate::theme::Theme;

// =============================================================================
// Stats
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryStats {
    cards: Arc<Mutex<StatCards>>,
}

impl MemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> StatCards {
        self.cards.lock().clone()
    }
}

impl StatsSurface for MemoryStats {
    fn set_count(&mut self, text: &str) {
        self.cards.lock().count = text.to_string();
    }

    fn set_classification(&mut self, text: &str) {
        self.cards.lock().classification = text.to_string();
    }

    fn set_peak(&mut self, text: &str) {
        self.cards.lock().peak = text.to_string();
    }

    fn set_peak_label(&mut self, text: &str) {
        self.cards.lock().peak_label = text.to_string();
    }
}

// =============================================================================
// Map
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RouteLine {
    pub path: Vec<Coordinate>,
    pub color: String,
}

#[derive(Debug, Default)]
struct MapState {
    mode: Option<MapMode>,
    markers: Vec<Marker>,
    routes: BTreeMap<u64, RouteLine>,
    next_id: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryMap {
    state: Arc<Mutex<MapState>>,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Option<MapMode> {
        self.state.lock().mode.clone()
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.state.lock().markers.clone()
    }

    /// Number of lines ever drawn that are still on the map.
    pub fn route_count(&self) -> usize {
        self.state.lock().routes.len()
    }

    /// Color of the first route line, if one was drawn.
    pub fn route_color(&self) -> Option<String> {
        self.state
            .lock()
            .routes
            .values()
            .next()
            .map(|line| line.color.clone())
    }

    pub fn route(&self) -> Option<RouteLine> {
        self.state.lock().routes.values().next().cloned()
    }
}

impl MapSurface for MemoryMap {
    fn set_mode(&mut self, mode: &MapMode) {
        self.state.lock().mode = Some(mode.clone());
    }

    fn place_marker(&mut self, marker: &Marker) {
        self.state.lock().markers.push(marker.clone());
    }

    fn draw_route(&mut self, path: &[Coordinate], color: &str) -> RouteHandle {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.routes.insert(
            id,
            RouteLine {
                path: path.to_vec(),
                color: color.to_string(),
            },
        );
        RouteHandle(id)
    }

    fn set_route_color(&mut self, route: RouteHandle, color: &str) {
        if let Some(line) = self.state.lock().routes.get_mut(&route.0) {
            line.color = color.to_string();
        }
    }
}

// =============================================================================
// Chart
// =============================================================================

#[derive(Debug, Default)]
struct ChartState {
    visible: bool,
    live: BTreeMap<u64, ChartSpec>,
    created: u64,
    destroyed: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryChart {
    state: Arc<Mutex<ChartState>>,
}

impl MemoryChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    /// Chart instances created and not yet destroyed.
    pub fn live_count(&self) -> usize {
        self.state.lock().live.len()
    }

    pub fn created_total(&self) -> u64 {
        self.state.lock().created
    }

    pub fn destroyed_total(&self) -> u64 {
        self.state.lock().destroyed
    }

    /// The most recently created live chart.
    pub fn current(&self) -> Option<ChartSpec> {
        self.state.lock().live.values().next_back().cloned()
    }
}

impl ChartSurface for MemoryChart {
    fn set_visible(&mut self, visible: bool) {
        self.state.lock().visible = visible;
    }

    fn create_chart(&mut self, spec: &ChartSpec) -> ChartHandle {
        let mut state = self.state.lock();
        let id = state.created;
        state.created += 1;
        state.live.insert(id, spec.clone());
        ChartHandle(id)
    }

    fn destroy_chart(&mut self, chart: ChartHandle) {
        let mut state = self.state.lock();
        if state.live.remove(&chart.0).is_some() {
            state.destroyed += 1;
        }
    }
}

// =============================================================================
// Selection
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonState {
    pub horizon_id: String,
    pub label: String,
    pub kind: HorizonKind,
    pub active: bool,
    pub tag: Option<String>,
}

#[derive(Debug, Default)]
struct SelectionState {
    buttons: Vec<ButtonState>,
    label: String,
    theme: Theme,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySelection {
    state: Arc<Mutex<SelectionState>>,
}

impl MemorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_label(&self) -> String {
        self.state.lock().label.clone()
    }

    pub fn buttons(&self) -> Vec<ButtonState> {
        self.state.lock().buttons.clone()
    }

    /// Ids of buttons currently highlighted.
    pub fn active_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .buttons
            .iter()
            .filter(|b| b.active)
            .map(|b| b.horizon_id.clone())
            .collect()
    }

    pub fn theme(&self) -> Theme {
        self.state.lock().theme
    }
}

impl SelectionSurface for MemorySelection {
    fn add_button(&mut self, horizon: &HorizonDescriptor) -> ButtonHandle {
        let mut state = self.state.lock();
        state.buttons.push(ButtonState {
            horizon_id: horizon.id.clone(),
            label: horizon.label.clone(),
            kind: horizon.kind,
            active: false,
            tag: None,
        });
        ButtonHandle((state.buttons.len() - 1) as u64)
    }

    fn set_button_active(&mut self, button: ButtonHandle, active: bool, tag: &str) {
        if let Some(state) = self.state.lock().buttons.get_mut(button.0 as usize) {
            state.active = active;
            state.tag = active.then(|| tag.to_string());
        }
    }

    fn set_selected_label(&mut self, label: &str) {
        self.state.lock().label = label.to_string();
    }

    fn set_theme(&mut self, theme: Theme) {
        self.state.lock().theme = theme;
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// One handle per surface, for building presenters and reading the board.
#[derive(Debug, Clone, Default)]
pub struct MemorySurfaces {
    pub stats: MemoryStats,
    pub map: MemoryMap,
    pub chart: MemoryChart,
    pub selection: MemorySelection,
}

impl MemorySurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            selected_label: self.selection.selected_label(),
            theme: self.selection.theme(),
            cards: self.stats.cards(),
            map_mode: self.map.mode(),
            route_color: self.map.route_color(),
            chart_visible: self.chart.is_visible(),
            chart: self.chart.current(),
        }
    }
}

/// Everything visible on the dashboard at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub selected_label: String,
    pub theme: Theme,
    pub cards: StatCards,
    pub map_mode: Option<MapMode>,
    pub route_color: Option<String>,
    pub chart_visible: bool,
    pub chart: Option<ChartSpec>,
}

impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}] theme: {} {}",
            self.selected_label,
            self.theme,
            self.theme.toggle_glyph()
        )?;
        writeln!(
            f,
            "  Predicted: {} | Status: {} | {}: {}",
            self.cards.count, self.cards.classification, self.cards.peak_label, self.cards.peak
        )?;
        writeln!(
            f,
            "  Route: {} ({})",
            self.route_color.as_deref().unwrap_or("-"),
            self.map_mode.as_ref().map(MapMode::name).unwrap_or("uninitialized")
        )?;
        match (&self.chart, self.chart_visible) {
            (_, false) => write!(f, "  Chart: hidden"),
            (None, true) => write!(f, "  Chart: empty"),
            (Some(chart), true) => {
                write!(f, "  Chart: {} ({} points", chart.series_label, chart.points.len())?;
                if let (Some(first), Some(last)) = (chart.points.first(), chart.points.last()) {
                    write!(f, ", {}..{}", first.0, last.0)?;
                }
                write!(f, ")")
            }
        }
    }
}
