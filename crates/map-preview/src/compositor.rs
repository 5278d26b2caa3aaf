//! Scene composition: layer descriptors to engine sources and style layers.

use colormap::{BuildStrategy, ColorRamp, ColormapBuilder, RasterStyle};
use preview_common::{LayerDescriptor, LayerKind, PreviewError, PreviewResult, Scene};
use serde::Serialize;
use serde_json::{json, Value};
use tile_protocol::{ColormapParam, SourcePolicy, TileRequestBuilder};
use tracing::{debug, info, warn};

use crate::engine::MapEngine;

/// Raster opacity at zoom 0.
pub const RASTER_OPACITY_MIN: f64 = 0.75;

/// Zoom level at which rasters become fully opaque.
pub const RASTER_OPACITY_FULL_ZOOM: f64 = 12.0;

/// A data source registered with the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSpec {
    pub id: String,
    #[serde(flatten)]
    pub data: SourceData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceData {
    /// Raster tiles described by a tilejson URL
    Raster { url: String },
    /// Inline or remote GeoJSON
    Geojson { data: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleLayerType {
    Raster,
    Fill,
}

/// A style layer drawing one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleLayer {
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: StyleLayerType,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paint: Option<Value>,
}

impl StyleLayer {
    fn raster(id: &str) -> Self {
        Self {
            id: id.to_string(),
            layer_type: StyleLayerType::Raster,
            source: id.to_string(),
            paint: Some(json!({
                "raster-opacity": [
                    "interpolate", ["linear"], ["zoom"],
                    0, RASTER_OPACITY_MIN,
                    RASTER_OPACITY_FULL_ZOOM, 1.0
                ]
            })),
        }
    }

    fn fill(id: &str) -> Self {
        Self {
            id: id.to_string(),
            layer_type: StyleLayerType::Fill,
            source: id.to_string(),
            paint: None,
        }
    }
}

/// Sources and style layers aligned 1:1 with the scene's layers.
///
/// Entries are `None` where the layer could not be rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Composition {
    pub sources: Vec<Option<SourceSpec>>,
    pub layers: Vec<Option<StyleLayer>>,
}

impl Composition {
    /// Number of layers that will be drawn.
    pub fn rendered_count(&self) -> usize {
        self.layers.iter().flatten().count()
    }

    /// Add every source, then every style layer, in scene order.
    ///
    /// Returns the number of style layers added.
    pub fn register<E: MapEngine + ?Sized>(&self, engine: &mut E) -> usize {
        for source in self.sources.iter().flatten() {
            engine.add_source(source);
        }
        let mut added = 0;
        for layer in self.layers.iter().flatten() {
            engine.add_layer(layer);
            added += 1;
        }
        added
    }

    /// Rendered layer ids, topmost first, as a legend lists them.
    pub fn legend_targets(&self) -> Vec<String> {
        self.layers
            .iter()
            .rev()
            .flatten()
            .map(|layer| layer.id.clone())
            .collect()
    }
}

/// Turns a scene into engine sources and style layers.
#[derive(Debug, Clone)]
pub struct LayerCompositor {
    tiles: TileRequestBuilder,
    colormaps: ColormapBuilder,
    strategy: BuildStrategy,
    policy: SourcePolicy,
}

impl LayerCompositor {
    pub fn new(
        tiles: TileRequestBuilder,
        ramp: ColorRamp,
        strategy: BuildStrategy,
        policy: SourcePolicy,
    ) -> Self {
        Self {
            tiles,
            colormaps: ColormapBuilder::new(ramp),
            strategy,
            policy,
        }
    }

    /// Compose every layer of the scene.
    ///
    /// Layers that fail are logged and left as `None`; the rest of the scene
    /// is unaffected.
    pub fn compose(&self, scene: &Scene) -> Composition {
        let mut composition = Composition::default();

        for layer in scene.layers() {
            match self.compose_layer(layer) {
                Ok((source, style)) => {
                    composition.sources.push(Some(source));
                    composition.layers.push(Some(style));
                }
                Err(e) => {
                    warn!(layer = %layer.name, error = %e, "Skipping layer");
                    composition.sources.push(None);
                    composition.layers.push(None);
                }
            }
        }

        info!(
            layers = scene.len(),
            rendered = composition.rendered_count(),
            "Composed scene"
        );
        composition
    }

    /// Source and style layer for a single layer.
    pub fn compose_layer(
        &self,
        layer: &LayerDescriptor,
    ) -> PreviewResult<(SourceSpec, StyleLayer)> {
        match &layer.kind {
            LayerKind::Raster => {
                let url = self.raster_url(layer)?;
                Ok((
                    SourceSpec {
                        id: layer.name.clone(),
                        data: SourceData::Raster { url },
                    },
                    StyleLayer::raster(&layer.name),
                ))
            }
            LayerKind::Vector => {
                let data = layer.require_source_url()?.to_string();
                Ok((
                    SourceSpec {
                        id: layer.name.clone(),
                        data: SourceData::Geojson { data },
                    },
                    StyleLayer::fill(&layer.name),
                ))
            }
            LayerKind::Unsupported(kind) => Err(PreviewError::UnsupportedLayerKind {
                layer: layer.name.clone(),
                kind: kind.clone(),
            }),
        }
    }

    /// Colormap and rescale window for a raster layer.
    pub fn raster_style(&self, layer: &LayerDescriptor) -> PreviewResult<RasterStyle> {
        if !layer.is_raster() {
            return Err(PreviewError::invalid_layer(
                &layer.name,
                format!("'{}' layers have no raster style", layer.kind),
            ));
        }
        let stats = layer.require_stats()?;
        let style = self.colormaps.build(self.strategy, stats);
        debug!(
            layer = %layer.name,
            bins = style.colormap.len(),
            rescale = %style.rescale.to_param(),
            "Built raster style"
        );
        Ok(style)
    }

    /// Tilejson URL for a raster layer.
    pub fn raster_url(&self, layer: &LayerDescriptor) -> PreviewResult<String> {
        self.policy.check(layer)?;
        let style = self.raster_style(layer)?;
        self.tiles
            .build(layer, &ColormapParam::Explicit(style.colormap), style.rescale)
    }
}
