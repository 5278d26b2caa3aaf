//! Common types shared across the catalog map-preview crates.

pub mod bbox;
pub mod config;
pub mod error;
pub mod layer;
pub mod scene;

pub use bbox::BoundingBox;
pub use config::{normalize_legacy_json, GlobalConfig, WidgetConfig};
pub use error::{ErrorScope, PreviewError, PreviewResult};
pub use layer::{LayerDescriptor, LayerKind, PixelStats, RescaleRange, STAT_PERCENTILES};
pub use scene::{LngLat, MapView, Scene};
