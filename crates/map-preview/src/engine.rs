//! Adapter boundary to the map rendering engine.

use preview_common::BoundingBox;
use serde::Serialize;

use crate::compositor::{SourceSpec, StyleLayer};
use crate::popup::Popup;

/// The operations the preview needs from a rendering engine.
///
/// Implementations wrap a concrete engine instance. The preview never reads
/// engine state other than `is_attached`.
pub trait MapEngine {
    fn add_source(&mut self, source: &SourceSpec);

    /// Layers added later draw above layers added earlier.
    fn add_layer(&mut self, layer: &StyleLayer);

    /// Show `popup`, closing any popup that is already open.
    fn show_popup(&mut self, popup: Popup);

    /// False once the engine's host element has been torn down.
    fn is_attached(&self) -> bool {
        true
    }
}

/// Options for constructing the engine around a scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapOptions {
    pub style: String,
    pub access_token: String,
    pub bounds: BoundingBox,
    pub min_zoom: f64,
    pub max_zoom: f64,
}
