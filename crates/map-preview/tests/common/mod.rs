//! Test doubles for the rendering engine and the point sampler.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use map_preview::{MapEngine, PointSampler, Popup, SourceSpec, StyleLayer};
use preview_common::{LayerDescriptor, LngLat};
use tile_protocol::PointQueryResult;

/// One call made on the engine, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    AddSource(String),
    AddLayer(String),
}

/// Records everything the preview does to the engine.
#[derive(Debug, Default)]
pub struct SpyEngine {
    pub calls: Vec<EngineCall>,
    pub sources: Vec<SourceSpec>,
    pub layers: Vec<StyleLayer>,
    /// Number of popups constructed and shown
    pub popups_shown: usize,
    /// The popup currently open
    pub open_popup: Option<Popup>,
    /// Shared so the engine can be torn down mid-click
    pub detached: Arc<AtomicBool>,
}

impl SpyEngine {
    pub fn detached() -> Self {
        let engine = Self::default();
        engine.detached.store(true, Ordering::SeqCst);
        engine
    }

    /// Flag that detaches this engine when set.
    pub fn detach_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.detached)
    }

    pub fn layer_order(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.id.clone()).collect()
    }
}

impl MapEngine for SpyEngine {
    fn add_source(&mut self, source: &SourceSpec) {
        self.calls.push(EngineCall::AddSource(source.id.clone()));
        self.sources.push(source.clone());
    }

    fn add_layer(&mut self, layer: &StyleLayer) {
        self.calls.push(EngineCall::AddLayer(layer.id.clone()));
        self.layers.push(layer.clone());
    }

    fn show_popup(&mut self, popup: Popup) {
        self.popups_shown += 1;
        self.open_popup = Some(popup);
    }

    fn is_attached(&self) -> bool {
        !self.detached.load(Ordering::SeqCst)
    }
}

/// Returns a fixed result and counts how often it was asked.
#[derive(Debug, Clone, Default)]
pub struct FakeSampler {
    pub result: Option<PointQueryResult>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeSampler {
    pub fn returning(values: Vec<f64>) -> Self {
        Self {
            result: Some(PointQueryResult::new(values)),
            calls: Arc::default(),
        }
    }

    /// A sampler whose every query fails.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PointSampler for FakeSampler {
    async fn sample(&self, _layer: &LayerDescriptor, _at: LngLat) -> Option<PointQueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Detaches the engine while its query is in flight, then answers.
#[derive(Debug, Clone)]
pub struct DetachingSampler {
    pub inner: FakeSampler,
    pub detach: Arc<AtomicBool>,
}

#[async_trait]
impl PointSampler for DetachingSampler {
    async fn sample(&self, layer: &LayerDescriptor, at: LngLat) -> Option<PointQueryResult> {
        self.detach.store(true, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.inner.sample(layer, at).await
    }
}
