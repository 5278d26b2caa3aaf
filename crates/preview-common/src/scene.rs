//! Scene: the ordered layer list and view parameters owned by one widget.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{BoundingBox, LayerDescriptor, PreviewError, PreviewResult};

/// Highest zoom level the rendering engine accepts.
pub const MAX_ZOOM_LIMIT: f64 = 24.0;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Global view parameters for a scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// Initial geographic extent
    pub bounds: BoundingBox,

    #[serde(rename = "minzoom", default)]
    pub min_zoom: f64,

    #[serde(rename = "maxzoom", default = "default_max_zoom")]
    pub max_zoom: f64,
}

fn default_max_zoom() -> f64 {
    22.0
}

impl MapView {
    pub fn validate(&self) -> PreviewResult<()> {
        self.bounds
            .validate()
            .map_err(|e| PreviewError::ConfigParseError(e.to_string()))?;

        if !(0.0..=MAX_ZOOM_LIMIT).contains(&self.min_zoom)
            || !(0.0..=MAX_ZOOM_LIMIT).contains(&self.max_zoom)
        {
            return Err(PreviewError::ConfigParseError(format!(
                "zoom range {}..{} outside 0..{}",
                self.min_zoom, self.max_zoom, MAX_ZOOM_LIMIT
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(PreviewError::ConfigParseError(format!(
                "minzoom {} is greater than maxzoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }
}

/// Ordered layers plus view parameters; read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    view: MapView,
    layers: Vec<LayerDescriptor>,
}

impl Scene {
    /// Build a scene, rejecting invalid views and duplicate layer names.
    pub fn new(view: MapView, layers: Vec<LayerDescriptor>) -> PreviewResult<Self> {
        view.validate()?;

        let mut seen = HashSet::new();
        for layer in &layers {
            if layer.name.is_empty() {
                return Err(PreviewError::ConfigParseError(
                    "layer name must not be empty".to_string(),
                ));
            }
            if !seen.insert(layer.name.as_str()) {
                return Err(PreviewError::ConfigParseError(format!(
                    "duplicate layer name '{}'",
                    layer.name
                )));
            }
        }

        Ok(Self { view, layers })
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    /// Layers in drawing order (later layers above earlier ones).
    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Find a layer by name.
    pub fn get(&self, name: &str) -> Option<&LayerDescriptor> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// The layer to sample on click: only when the scene is exactly one raster layer.
    pub fn point_query_layer(&self) -> Option<&LayerDescriptor> {
        match self.layers.as_slice() {
            [only] if only.is_raster() => Some(only),
            _ => None,
        }
    }

    /// Names of vector layers, in scene order.
    pub fn vector_layer_ids(&self) -> Vec<String> {
        self.layers
            .iter()
            .filter(|l| l.is_vector())
            .map(|l| l.name.clone())
            .collect()
    }
}
