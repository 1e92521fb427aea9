//! Horizon selector highlighting and the active-selection label.
//!
//! Buttons are created once by [`SelectionPresenter::setup`] and tracked by
//! horizon id, so highlighting never depends on button text.

use std::collections::HashMap;

use tracing::warn;

use crate::catalog::{HorizonDescriptor, HorizonKind, RangeCatalog};
use crate::surfaces::{ButtonHandle, SelectionSurface};
use crate::theme::Theme;

pub struct SelectionPresenter {
    surface: Box<dyn SelectionSurface>,
    buttons: HashMap<String, (ButtonHandle, HorizonKind)>,
    active: Option<String>,
}

impl SelectionPresenter {
    pub fn new(surface: Box<dyn SelectionSurface>) -> Self {
        Self {
            surface,
            buttons: HashMap::new(),
            active: None,
        }
    }

    pub fn is_set_up(&self) -> bool {
        !self.buttons.is_empty()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Create one button per catalog entry. Runs once.
    pub fn setup(&mut self, catalog: &RangeCatalog) {
        if self.is_set_up() {
            return;
        }
        for horizon in catalog.iter() {
            let button = self.surface.add_button(horizon);
            self.buttons
                .insert(horizon.id.clone(), (button, horizon.kind));
        }
    }

    /// Highlight `horizon` and show its label.
    pub fn select(&mut self, horizon: &HorizonDescriptor) {
        if let Some(previous) = self.active.take() {
            if let Some((button, kind)) = self.buttons.get(&previous) {
                self.surface.set_button_active(*button, false, kind.tag());
            }
        }

        match self.buttons.get(&horizon.id) {
            Some((button, kind)) => self.surface.set_button_active(*button, true, kind.tag()),
            None if self.is_set_up() => warn!(horizon = %horizon.id, "No button for horizon"),
            None => {}
        }

        self.surface.set_selected_label(&horizon.label);
        self.active = Some(horizon.id.clone());
    }

    pub fn show_theme(&mut self, theme: Theme) {
        self.surface.set_theme(theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfaces::memory::MemorySelection;

    #[test]
    fn test_select_moves_highlight() {
        let catalog = RangeCatalog::standard();
        let surface = MemorySelection::new();
        let mut selection = SelectionPresenter::new(Box::new(surface.clone()));
        selection.setup(&catalog);
        selection.setup(&catalog);
        assert_eq!(surface.buttons().len(), catalog.len());

        selection.select(catalog.get("15min").unwrap());
        assert_eq!(surface.active_ids(), vec!["15min".to_string()]);

        selection.select(catalog.get("weekly").unwrap());
        assert_eq!(surface.active_ids(), vec!["weekly".to_string()]);
        assert_eq!(surface.selected_label(), "Weekly");

        let weekly = surface
            .buttons()
            .into_iter()
            .find(|b| b.horizon_id == "weekly")
            .unwrap();
        assert_eq!(weekly.tag.as_deref(), Some("long"));
    }

    #[test]
    fn test_buttons_with_same_label_tracked_by_id() {
        let catalog = RangeCatalog::new(vec![
            HorizonDescriptor::short_term("a", "Same"),
            HorizonDescriptor::short_term("b", "Same"),
        ])
        .unwrap();
        let surface = MemorySelection::new();
        let mut selection = SelectionPresenter::new(Box::new(surface.clone()));
        selection.setup(&catalog);

        selection.select(catalog.get("b").unwrap());
        assert_eq!(surface.active_ids(), vec!["b".to_string()]);
    }

    #[test]
    fn test_show_theme() {
        let surface = MemorySelection::new();
        let mut selection = SelectionPresenter::new(Box::new(surface.clone()));
        selection.show_theme(Theme::Light);
        assert_eq!(surface.theme(), Theme::Light);
    }
}
