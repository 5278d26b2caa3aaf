//! HTTP client for the tile service's point and tilejson endpoints.

use async_trait::async_trait;
use preview_common::{LayerDescriptor, LngLat, PreviewError, PreviewResult};
use reqwest::Client;
use tile_protocol::{point_query_url, PointQueryResult, TileJson};
use tracing::{debug, instrument, warn};

/// Samples raster values at a coordinate.
///
/// Failures are reported as `None`; callers treat a missing sample as
/// nothing to show.
#[async_trait]
pub trait PointSampler: Send + Sync {
    async fn sample(&self, layer: &LayerDescriptor, at: LngLat) -> Option<PointQueryResult>;
}

/// Tile service client backed by reqwest.
#[derive(Debug, Clone)]
pub struct PointQueryClient {
    client: Client,
    base_url: String,
}

impl PointQueryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured client, e.g. one with a request timeout.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Query the band values of `layer` at `at`.
    #[instrument(skip(self, layer), fields(layer = %layer.name))]
    pub async fn query(
        &self,
        layer: &LayerDescriptor,
        at: LngLat,
    ) -> PreviewResult<PointQueryResult> {
        let source = layer.require_source_url()?;
        let url = point_query_url(&self.base_url, source, at)?;
        debug!(url = %url, "Point query");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(network_failure)?;

        response
            .json::<PointQueryResult>()
            .await
            .map_err(network_failure)
    }

    /// Fetch and decode a tilejson document.
    pub async fn tilejson(&self, url: &str) -> PreviewResult<TileJson> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(network_failure)?;

        response.json::<TileJson>().await.map_err(network_failure)
    }
}

#[async_trait]
impl PointSampler for PointQueryClient {
    async fn sample(&self, layer: &LayerDescriptor, at: LngLat) -> Option<PointQueryResult> {
        match self.query(layer, at).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(
                    layer = %layer.name,
                    lng = at.lng,
                    lat = at.lat,
                    error = %e,
                    "Point query failed"
                );
                None
            }
        }
    }
}

fn network_failure(err: reqwest::Error) -> PreviewError {
    match err.status() {
        Some(status) => PreviewError::NetworkFailure(format!("HTTP {}", status)),
        None => PreviewError::NetworkFailure(err.to_string()),
    }
}
