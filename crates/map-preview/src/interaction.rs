//! Click handling: feature popups for vector layers, value popups for a
//! lone raster layer.
//!
//! The two handlers never overlap. Feature popups only consider features
//! from the scene's vector layers; value popups are enabled only when the
//! scene holds exactly one layer and it is a raster, which implies there are
//! no vector layers to hit.

use std::collections::HashSet;

use indexmap::IndexMap;
use preview_common::{LayerDescriptor, LngLat, Scene};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::client::PointSampler;
use crate::engine::MapEngine;
use crate::popup::{features_html, point_value_html, Popup};

/// A feature the engine reports under the cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedFeature {
    /// Id of the style layer the feature was drawn by
    pub layer_id: String,
    /// Attributes in their original order
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

/// A map click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub lng_lat: LngLat,
    #[serde(default)]
    pub features: Vec<RenderedFeature>,
}

impl ClickEvent {
    pub fn at(lng_lat: LngLat) -> Self {
        Self {
            lng_lat,
            features: Vec::new(),
        }
    }

    pub fn with_features(mut self, features: Vec<RenderedFeature>) -> Self {
        self.features = features;
        self
    }
}

pub struct InteractionController<S> {
    vector_ids: HashSet<String>,
    point_layer: Option<LayerDescriptor>,
    sampler: S,
}

impl<S: PointSampler> InteractionController<S> {
    pub fn new(scene: &Scene, sampler: S) -> Self {
        Self {
            vector_ids: scene.vector_layer_ids().into_iter().collect(),
            point_layer: scene.point_query_layer().cloned(),
            sampler,
        }
    }

    pub fn point_query_enabled(&self) -> bool {
        self.point_layer.is_some()
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Popup listing the clicked vector features, if any were hit.
    pub fn vector_popup(&self, event: &ClickEvent) -> Option<Popup> {
        let hits: Vec<&RenderedFeature> = event
            .features
            .iter()
            .filter(|f| self.vector_ids.contains(&f.layer_id))
            .collect();
        if hits.is_empty() {
            return None;
        }
        Some(Popup::new(event.lng_lat, features_html(hits)))
    }

    /// Popup with the sampled value at `at`, if point queries are enabled
    /// and the sample succeeded.
    pub async fn point_popup(&self, at: LngLat) -> Option<Popup> {
        let layer = self.point_layer.as_ref()?;
        let result = self.sampler.sample(layer, at).await?;
        let value = result.first_value()?;
        Some(Popup::new(at, point_value_html(&layer.name, value)))
    }

    /// Run both handlers for one click and show what they produce.
    ///
    /// Returns the number of popups shown.
    pub async fn handle_click<E: MapEngine + ?Sized>(
        &self,
        engine: &mut E,
        event: &ClickEvent,
    ) -> usize {
        let mut shown = 0;

        if let Some(popup) = self.vector_popup(event) {
            shown += show(engine, popup);
        }
        if let Some(popup) = self.point_popup(event.lng_lat).await {
            shown += show(engine, popup);
        }

        shown
    }
}

fn show<E: MapEngine + ?Sized>(engine: &mut E, popup: Popup) -> usize {
    if !engine.is_attached() {
        debug!("Engine detached, dropping popup");
        return 0;
    }
    engine.show_popup(popup);
    1
}
