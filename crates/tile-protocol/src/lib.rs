//! Tile service request/response protocol.
//!
//! Supports:
//! - TileJSON requests for Cloud Optimized GeoTIFF sources
//!   (`/cog/WebMercatorQuad/tilejson.json`)
//! - Point value queries (`/cog/point/{lng},{lat}`)

pub mod point;
pub mod tilejson;

pub use point::{point_query_url, PointQueryResult};
pub use tilejson::{ColormapParam, SourcePolicy, TileFormat, TileJson, TileRequestBuilder};
