//! Point value queries against the tile service.

use preview_common::{LngLat, PreviewResult};
use serde::{Deserialize, Serialize};
use url::Url;

pub const POINT_ENDPOINT: &str = "/cog/point";

/// Build `{base}/cog/point/{lng},{lat}?url={source}`.
pub fn point_query_url(base_url: &str, source_url: &str, at: LngLat) -> PreviewResult<String> {
    let base = base_url.trim_end_matches('/');
    let mut url = Url::parse(&format!("{}{}/{},{}", base, POINT_ENDPOINT, at.lng, at.lat))?;
    url.query_pairs_mut().append_pair("url", source_url);
    Ok(url.into())
}

/// Response body of a point query.
///
/// The service returns one value per band plus a few descriptive fields we
/// do not use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointQueryResult {
    /// Band values at the queried location, in band order
    pub values: Vec<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<[f64; 2]>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub band_names: Vec<String>,
}

impl PointQueryResult {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            coordinates: None,
            band_names: Vec::new(),
        }
    }

    /// Value of the first band, the only one the preview shows.
    pub fn first_value(&self) -> Option<f64> {
        self.values.first().copied()
    }
}
