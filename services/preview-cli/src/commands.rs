//! Subcommand implementations. Each returns what the caller prints.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use colormap::{BuildStrategy, ColorRamp};
use map_preview::{ClickEvent, MapPreview, PointQueryClient};
use preview_common::{GlobalConfig, LayerDescriptor, LngLat};
use serde_json::{json, Value};
use tracing::info;

use crate::console::ConsoleEngine;

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Settings {
    pub global: GlobalConfig,
    pub ramp: ColorRamp,
    pub strategy: BuildStrategy,
}

pub fn load_preview(config: &Path, settings: &Settings) -> Result<MapPreview<PointQueryClient>> {
    let blob = fs::read_to_string(config)
        .with_context(|| format!("Failed to read widget config {}", config.display()))?;
    let preview = MapPreview::with_http_client(&blob, &settings.global)
        .with_context(|| format!("Invalid widget config {}", config.display()))?
        .with_style(settings.ramp.clone(), settings.strategy)?;
    Ok(preview)
}

/// Registered sources and layers, the layers that were skipped, and the
/// legend order.
pub fn compose(preview: &MapPreview<PointQueryClient>) -> Result<Value> {
    let mut engine = ConsoleEngine::default();
    let composition = preview.on_load(&mut engine);

    let skipped: Vec<&str> = preview
        .scene()
        .layers()
        .iter()
        .zip(&composition.layers)
        .filter(|(_, style)| style.is_none())
        .map(|(layer, _)| layer.name.as_str())
        .collect();

    Ok(json!({
        "map": preview.map_options(),
        "sources": engine.sources,
        "layers": engine.layers,
        "skipped": skipped,
        "legend": composition.legend_targets(),
    }))
}

/// Rescale window and colormap of one raster layer.
pub fn colormap(
    preview: &MapPreview<PointQueryClient>,
    layer: &str,
    expand: bool,
) -> Result<Value> {
    let layer = find_layer(preview, layer)?;
    let mut style = preview.compositor().raster_style(layer)?;
    if expand {
        style.colormap = style.colormap.expand_linear();
    }
    Ok(serde_json::to_value(&style)?)
}

/// Popup HTML for a click at `at`, or `None` when the query came back empty.
pub async fn point(preview: &MapPreview<PointQueryClient>, at: LngLat) -> Result<Option<String>> {
    if !preview.controller().point_query_enabled() {
        bail!("Point queries need a scene with exactly one raster layer");
    }

    let mut engine = ConsoleEngine::default();
    let shown = preview.on_click(&mut engine, &ClickEvent::at(at)).await;
    info!(shown, lng = at.lng, lat = at.lat, "Point query finished");
    Ok(engine.popup.map(|popup| popup.html))
}

/// Fetch the tilejson document the engine would load for a raster layer.
pub async fn inspect(preview: &MapPreview<PointQueryClient>, layer: &str) -> Result<Value> {
    let layer = find_layer(preview, layer)?;
    let url = preview.compositor().raster_url(layer)?;
    info!(layer = %layer.name, url = %url, "Fetching tilejson");

    let doc = preview
        .controller()
        .sampler()
        .tilejson(&url)
        .await
        .with_context(|| format!("Failed to fetch tilejson for '{}'", layer.name))?;
    Ok(json!({ "url": url, "tilejson": doc }))
}

fn find_layer<'a>(
    preview: &'a MapPreview<PointQueryClient>,
    name: &str,
) -> Result<&'a LayerDescriptor> {
    preview
        .scene()
        .get(name)
        .ok_or_else(|| anyhow!("No layer named '{}' in the scene", name))
}
