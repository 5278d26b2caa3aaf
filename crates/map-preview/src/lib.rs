//! Map preview for catalog datasets.
//!
//! Composes raster and vector layers into rendering-engine sources and style
//! layers, and turns map clicks into popups. The rendering engine is reached
//! only through [`MapEngine`]; point samples come from a [`PointSampler`].

pub mod client;
pub mod compositor;
pub mod engine;
pub mod interaction;
pub mod popup;
pub mod widget;

pub use client::{PointQueryClient, PointSampler};
pub use compositor::{
    Composition, LayerCompositor, SourceData, SourceSpec, StyleLayer, StyleLayerType,
};
pub use engine::{MapEngine, MapOptions};
pub use interaction::{ClickEvent, InteractionController, RenderedFeature};
pub use popup::{escape_html, Popup};
pub use widget::MapPreview;
