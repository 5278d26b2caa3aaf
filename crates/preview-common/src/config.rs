//! Host configuration blobs.
//!
//! The host passes two JSON blobs to every widget: a per-widget one with the
//! view and layer list, and a global one with service endpoints. Both arrive
//! with single quotes instead of double quotes; `from_legacy_str` undoes that
//! before strict parsing. New inputs should use `from_json`, and `parse`
//! accepts either form.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;
use url::Url;

use crate::{LayerDescriptor, MapView, PreviewError, PreviewResult, Scene};

pub const DEFAULT_TITILER_URL: &str = "https://titiler-897938321824.us-west1.run.app";
pub const DEFAULT_MAPBOX_STYLE: &str = "mapbox://styles/mapbox/light-v11";

/// Swap single quotes for double quotes in a legacy host blob.
pub fn normalize_legacy_json(s: &str) -> String {
    s.replace('\'', "\"")
}

/// Per-widget configuration: `{map: {bounds, minzoom, maxzoom}, layers: [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetConfig {
    pub map: MapView,
    #[serde(default)]
    pub layers: Vec<LayerDescriptor>,
}

impl WidgetConfig {
    /// Parse strict JSON.
    pub fn from_json(json: &str) -> PreviewResult<Self> {
        let config: WidgetConfig = serde_json::from_str(json)?;
        config.map.validate()?;
        debug!(layers = config.layers.len(), "Parsed widget configuration");
        Ok(config)
    }

    /// Parse a single-quoted legacy blob.
    pub fn from_legacy_str(blob: &str) -> PreviewResult<Self> {
        Self::from_json(&normalize_legacy_json(blob))
    }

    /// Parse strict JSON, falling back to the legacy form.
    ///
    /// Strict input is never rewritten, so apostrophes inside names and URLs
    /// survive. The legacy quote swap only runs when strict parsing fails.
    pub fn parse(blob: &str) -> PreviewResult<Self> {
        match Self::from_json(blob) {
            Ok(config) => Ok(config),
            Err(strict) if blob.contains('\'') => {
                debug!(error = %strict, "Retrying widget configuration as legacy blob");
                Self::from_legacy_str(blob)
            }
            Err(strict) => Err(strict),
        }
    }

    /// Validate and take ownership as a Scene.
    pub fn into_scene(self) -> PreviewResult<Scene> {
        Scene::new(self.map, self.layers)
    }
}

/// Global configuration: tile service and basemap settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Base URL of the tile service
    pub titiler_url: String,

    /// Basemap access token
    #[serde(default)]
    pub mapbox_api_key: String,

    /// Basemap style URL
    #[serde(default = "default_mapbox_style")]
    pub mapbox_style: String,

    /// Source URL prefixes the tile service accepts; empty allows everything
    #[serde(default)]
    pub allowed_source_prefixes: Vec<String>,
}

fn default_mapbox_style() -> String {
    DEFAULT_MAPBOX_STYLE.to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            titiler_url: DEFAULT_TITILER_URL.to_string(),
            mapbox_api_key: String::new(),
            mapbox_style: default_mapbox_style(),
            allowed_source_prefixes: Vec::new(),
        }
    }
}

impl GlobalConfig {
    /// Parse strict JSON.
    pub fn from_json(json: &str) -> PreviewResult<Self> {
        let config: GlobalConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a single-quoted legacy blob.
    pub fn from_legacy_str(blob: &str) -> PreviewResult<Self> {
        Self::from_json(&normalize_legacy_json(blob))
    }

    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> PreviewResult<Self> {
        let defaults = Self::default();
        let config = Self {
            titiler_url: env::var("TITILER_URL").unwrap_or(defaults.titiler_url),
            mapbox_api_key: env::var("MAPBOX_API_KEY").unwrap_or(defaults.mapbox_api_key),
            mapbox_style: env::var("MAPBOX_STYLE").unwrap_or(defaults.mapbox_style),
            allowed_source_prefixes: env::var("ALLOWED_SOURCE_PREFIXES")
                .map(|v| split_prefixes(&v))
                .unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PreviewResult<()> {
        let url = Url::parse(&self.titiler_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PreviewError::ConfigParseError(format!(
                "titiler_url must be http(s), got '{}'",
                self.titiler_url
            )));
        }
        Ok(())
    }
}

fn split_prefixes(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
