//! Recording implementations of the view ports, used by the command-line host
//! and by tests. They keep what a browser would have drawn.

use crate::error::WorkoutError;
use crate::types::{Coords, WorkoutKind};
use crate::view::{Bounds, FormInput, ListItem, MapView, Marker, Surface};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Coords,
    pub zoom: u8,
    pub animated: bool,
}

#[derive(Debug, Default)]
pub struct TerminalMap {
    pub viewport: Option<Viewport>,
    pub fitted: Option<Bounds>,
    pub tile_layers: Vec<String>,
    pub markers: Vec<Marker>,
}

impl MapView for TerminalMap {
    fn set_view(&mut self, center: Coords, zoom: u8, animate: bool) {
        self.viewport = Some(Viewport {
            center,
            zoom,
            animated: animate,
        });
    }

    fn add_tile_layer(&mut self, url: &str, _attribution: &str) {
        self.tile_layers.push(url.to_string());
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.viewport = Some(Viewport {
            center: bounds.center(),
            zoom: self.viewport.map_or(0, |v| v.zoom),
            animated: false,
        });
        self.fitted = Some(bounds);
    }
}

#[derive(Debug, Default)]
pub struct TerminalSurface {
    pub items: Vec<ListItem>,
    pub form: Option<FormInput>,
    pub kind_fields: Option<WorkoutKind>,
    pub error: Option<String>,
    pub alerts: Vec<String>,
}

impl TerminalSurface {
    /// Tab-separated rows, one per list item.
    pub fn rows(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| {
                let figures: Vec<String> = item
                    .details
                    .iter()
                    .map(|d| format!("{} {}", d.value, d.unit))
                    .collect();
                format!("{}\t{}\t{}", item.id, item.title, figures.join("\t"))
            })
            .collect()
    }

    pub fn html(&self) -> String {
        self.items.iter().map(ListItem::to_html).collect()
    }
}

impl Surface for TerminalSurface {
    fn clear_list(&mut self) {
        self.items.clear();
    }

    fn append_item(&mut self, item: ListItem) {
        self.items.push(item);
    }

    fn show_form(&mut self, prefill: &FormInput) {
        self.form = Some(prefill.clone());
    }

    fn hide_form(&mut self) {
        self.form = None;
    }

    fn show_kind_fields(&mut self, kind: WorkoutKind) {
        self.kind_fields = Some(kind);
    }

    fn show_error(&mut self, error: &WorkoutError) {
        self.error = Some(error.to_string());
    }

    fn hide_error(&mut self) {
        self.error = None;
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
