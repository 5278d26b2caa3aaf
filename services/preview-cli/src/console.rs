//! A rendering engine that records what the preview hands it.

use map_preview::{MapEngine, Popup, SourceSpec, StyleLayer};

#[derive(Debug, Default)]
pub struct ConsoleEngine {
    pub sources: Vec<SourceSpec>,
    pub layers: Vec<StyleLayer>,
    pub popup: Option<Popup>,
}

impl MapEngine for ConsoleEngine {
    fn add_source(&mut self, source: &SourceSpec) {
        self.sources.push(source.clone());
    }

    fn add_layer(&mut self, layer: &StyleLayer) {
        self.layers.push(layer.clone());
    }

    fn show_popup(&mut self, popup: Popup) {
        self.popup = Some(popup);
    }
}
