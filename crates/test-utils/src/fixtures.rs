//! Common test fixtures for map-preview tests.
//!
//! The reference raster is a digital elevation model with statistics
//! `min 0, max 1000, p2 50, p20 200, p40 400, p60 600, p80 800, p98 950`.

use preview_common::{BoundingBox, LayerDescriptor, MapView, PixelStats, Scene};
use serde_json::{json, Value};

/// Source URL prefix the tile service accepts.
pub const ALLOWED_PREFIX: &str = "https://storage.googleapis.com/natcap-data-cache";

/// Source URL of the reference raster.
pub const DEM_URL: &str = "https://storage.googleapis.com/natcap-data-cache/global/dem.tif";

/// Tile service base used in URL tests.
pub const TITILER_URL: &str = "https://titiler.example.org";

/// Statistics of the reference raster.
pub fn dem_stats() -> PixelStats {
    PixelStats {
        min: 0.0,
        max: 1000.0,
        p2: 50.0,
        p20: 200.0,
        p40: 400.0,
        p60: 600.0,
        p80: 800.0,
        p98: 950.0,
    }
}

/// Statistics where every value is identical (e.g. a constant mask).
pub fn degenerate_stats(value: f64) -> PixelStats {
    PixelStats {
        min: value,
        max: value,
        p2: value,
        p20: value,
        p40: value,
        p60: value,
        p80: value,
        p98: value,
    }
}

/// Statistics of a zero-inflated layer: most pixels sit at the minimum.
pub fn zero_heavy_stats() -> PixelStats {
    PixelStats {
        min: 0.0,
        max: 100.0,
        p2: 0.0,
        p20: 0.0,
        p40: 0.0,
        p60: 1.0,
        p80: 10.0,
        p98: 80.0,
    }
}

pub fn dem_layer() -> LayerDescriptor {
    LayerDescriptor::raster("dem", DEM_URL, dem_stats())
}

pub fn raster_layer(name: &str) -> LayerDescriptor {
    LayerDescriptor::raster(name, format!("{}/{}.tif", ALLOWED_PREFIX, name), dem_stats())
}

pub fn vector_layer(name: &str) -> LayerDescriptor {
    LayerDescriptor::vector(name, format!("https://example.org/{}.geojson", name))
}

pub fn test_view() -> MapView {
    MapView {
        bounds: BoundingBox::new(-120.5, 35.0, -119.0, 36.5),
        min_zoom: 0.0,
        max_zoom: 14.0,
    }
}

/// Build a scene from layers with the standard test view.
pub fn scene_of(layers: Vec<LayerDescriptor>) -> Scene {
    Scene::new(test_view(), layers).expect("fixture scene is valid")
}

/// Host JSON for the reference raster.
pub fn dem_layer_json() -> Value {
    json!({
        "name": "dem",
        "type": "raster",
        "url": DEM_URL,
        "pixel_min_value": 0,
        "pixel_max_value": 1000,
        "pixel_percentile_2": 50,
        "pixel_percentile_20": 200,
        "pixel_percentile_40": 400,
        "pixel_percentile_60": 600,
        "pixel_percentile_80": 800,
        "pixel_percentile_98": 950
    })
}

pub fn vector_layer_json(name: &str) -> Value {
    json!({
        "name": name,
        "type": "vector",
        "url": format!("https://example.org/{}.geojson", name)
    })
}

/// Strict-JSON widget blob wrapping `layers`.
pub fn widget_config_json(layers: &[Value]) -> String {
    json!({
        "map": {
            "bounds": [[-120.5, 35.0], [-119.0, 36.5]],
            "minzoom": 0,
            "maxzoom": 14
        },
        "layers": layers
    })
    .to_string()
}

/// The same blob in the host's single-quoted serialization.
pub fn legacy_widget_blob(layers: &[Value]) -> String {
    widget_config_json(layers).replace('"', "'")
}

/// Global blob pointing at `titiler_url`.
pub fn global_config_json(titiler_url: &str) -> String {
    json!({
        "titiler_url": titiler_url,
        "mapbox_api_key": "pk.test",
        "mapbox_style": "mapbox://styles/mapbox/light-v11"
    })
    .to_string()
}
