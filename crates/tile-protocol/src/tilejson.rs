//! TileJSON request construction for raster layers.
//!
//! A raster layer is rendered by pointing the map engine at the tile service's
//! tilejson endpoint with the layer's visual encoding in the query string:
//!
//! ```text
//! {base}/cog/WebMercatorQuad/tilejson.json
//!     ?tile_scale=2&url=...&bidx=1&rescale=low,high
//!     &colormap={...}&colormap_type=linear&format=png
//! ```
//!
//! Keys are always emitted in that order and every value is percent-encoded
//! on its own, so identical inputs give byte-identical URLs.

use colormap::Colormap;
use preview_common::{LayerDescriptor, PreviewError, PreviewResult, RescaleRange};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

pub const TILEJSON_ENDPOINT: &str = "/cog/WebMercatorQuad/tilejson.json";

/// Tiles are requested at 512x512 for high-DPI displays.
pub const TILE_SCALE: u32 = 2;

/// Raster band sampled for rendering.
pub const BAND_INDEX: u32 = 1;

/// Output image format for tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileFormat {
    /// Lossless with alpha; required for translucent colormap bins
    #[default]
    Png,
    Webp,
    Jpeg,
}

impl TileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Webp => "webp",
            TileFormat::Jpeg => "jpeg",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "png" => Some(TileFormat::Png),
            "webp" => Some(TileFormat::Webp),
            "jpeg" | "jpg" => Some(TileFormat::Jpeg),
            _ => None,
        }
    }
}

/// How the colormap is passed to the tile service.
#[derive(Debug, Clone, PartialEq)]
pub enum ColormapParam {
    /// A bin-to-RGBA table, interpolated linearly by the service
    Explicit(Colormap),
    /// One of the service's built-in palettes
    Named(String),
}

/// Source URL prefixes the tile service will read from.
///
/// The service rejects datasets outside its allow-list; checking here keeps
/// such layers out of the scene instead of rendering broken tiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePolicy {
    prefixes: Vec<String>,
}

impl SourcePolicy {
    /// Allow every source.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    pub fn is_allowed(&self, source_url: &str) -> bool {
        self.prefixes.is_empty()
            || self
                .prefixes
                .iter()
                .any(|p| source_url.starts_with(p.as_str()))
    }

    /// `InvalidLayerConfig` if the layer's source is missing or not allowed.
    pub fn check(&self, layer: &LayerDescriptor) -> PreviewResult<()> {
        let source = layer.require_source_url()?;
        if !self.is_allowed(source) {
            return Err(PreviewError::invalid_layer(
                &layer.name,
                format!("source '{}' is not served by the tile service", source),
            ));
        }
        Ok(())
    }
}

/// Builds tilejson URLs against one tile service.
#[derive(Debug, Clone)]
pub struct TileRequestBuilder {
    base: String,
    format: TileFormat,
}

impl TileRequestBuilder {
    /// Create a builder for the tile service at `base_url`.
    ///
    /// The endpoint path and query are appended to the base, so a base that
    /// already carries a query or fragment is rejected.
    pub fn new(base_url: &str) -> PreviewResult<Self> {
        let parsed = Url::parse(base_url)?;
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(PreviewError::ConfigParseError(format!(
                "tile service URL '{}' must not carry a query or fragment",
                base_url
            )));
        }
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            format: TileFormat::default(),
        })
    }

    pub fn with_format(mut self, format: TileFormat) -> Self {
        self.format = format;
        self
    }

    /// Assemble the tilejson URL for one raster layer.
    pub fn build(
        &self,
        layer: &LayerDescriptor,
        colormap: &ColormapParam,
        rescale: RescaleRange,
    ) -> PreviewResult<String> {
        let source = layer.require_source_url()?;
        let mut url = Url::parse(&format!("{}{}", self.base, TILEJSON_ENDPOINT))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("tile_scale", &TILE_SCALE.to_string())
                .append_pair("url", source)
                .append_pair("bidx", &BAND_INDEX.to_string())
                .append_pair("rescale", &rescale.to_param());

            match colormap {
                ColormapParam::Explicit(cm) => {
                    query
                        .append_pair("colormap", &cm.to_json())
                        .append_pair("colormap_type", "linear");
                }
                ColormapParam::Named(name) => {
                    query.append_pair("colormap_name", name);
                }
            }

            query.append_pair("format", self.format.as_str());
        }

        let url = String::from(url);
        debug!(layer = %layer.name, url = %url, "Built tilejson URL");
        Ok(url)
    }
}

/// Tile-source descriptor returned by the tilejson endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilejson: Option<String>,

    /// Tile URL templates with `{z}/{x}/{y}` placeholders
    pub tiles: Vec<String>,

    /// `[west, south, east, north]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[f64; 4]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
}
