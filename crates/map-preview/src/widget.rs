//! The map preview widget: one scene, one engine, injected collaborators.

use colormap::{BuildStrategy, ColorRamp};
use preview_common::{GlobalConfig, PreviewResult, Scene, WidgetConfig};
use tile_protocol::{SourcePolicy, TileRequestBuilder};
use tracing::info;

use crate::client::{PointQueryClient, PointSampler};
use crate::compositor::{Composition, LayerCompositor};
use crate::engine::{MapEngine, MapOptions};
use crate::interaction::{ClickEvent, InteractionController};

pub struct MapPreview<S> {
    scene: Scene,
    global: GlobalConfig,
    compositor: LayerCompositor,
    controller: InteractionController<S>,
}

impl<S: PointSampler> MapPreview<S> {
    /// Build a widget from its host configuration blob, strict JSON or the
    /// single-quoted legacy form.
    ///
    /// Fails with `ConfigParseError` if the blob or the global configuration
    /// is malformed; nothing is rendered in that case.
    pub fn new(widget_config: &str, global: &GlobalConfig, sampler: S) -> PreviewResult<Self> {
        let scene = WidgetConfig::parse(widget_config)?.into_scene()?;
        Self::from_scene(scene, global, sampler)
    }

    /// Build a widget from an already parsed scene.
    pub fn from_scene(scene: Scene, global: &GlobalConfig, sampler: S) -> PreviewResult<Self> {
        global.validate()?;

        let compositor = LayerCompositor::new(
            TileRequestBuilder::new(&global.titiler_url)?,
            ColorRamp::default(),
            BuildStrategy::default(),
            SourcePolicy::new(global.allowed_source_prefixes.clone()),
        );
        let controller = InteractionController::new(&scene, sampler);

        info!(
            layers = scene.len(),
            point_query = controller.point_query_enabled(),
            "Map preview initialized"
        );

        Ok(Self {
            scene,
            global: global.clone(),
            compositor,
            controller,
        })
    }

    /// Replace the color ramp and colormap strategy used for rasters.
    pub fn with_style(mut self, ramp: ColorRamp, strategy: BuildStrategy) -> PreviewResult<Self> {
        self.compositor = LayerCompositor::new(
            TileRequestBuilder::new(&self.global.titiler_url)?,
            ramp,
            strategy,
            SourcePolicy::new(self.global.allowed_source_prefixes.clone()),
        );
        Ok(self)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn compositor(&self) -> &LayerCompositor {
        &self.compositor
    }

    pub fn controller(&self) -> &InteractionController<S> {
        &self.controller
    }

    /// Options for constructing the engine.
    pub fn map_options(&self) -> MapOptions {
        let view = self.scene.view();
        MapOptions {
            style: self.global.mapbox_style.clone(),
            access_token: self.global.mapbox_api_key.clone(),
            bounds: view.bounds,
            min_zoom: view.min_zoom,
            max_zoom: view.max_zoom,
        }
    }

    /// Compose the scene and register it with the engine once it has loaded.
    pub fn on_load<E: MapEngine + ?Sized>(&self, engine: &mut E) -> Composition {
        let composition = self.compositor.compose(&self.scene);
        let added = composition.register(engine);
        info!(added, "Registered layers");
        composition
    }

    pub async fn on_click<E: MapEngine + ?Sized>(
        &self,
        engine: &mut E,
        event: &ClickEvent,
    ) -> usize {
        self.controller.handle_click(engine, event).await
    }
}

impl MapPreview<PointQueryClient> {
    /// Widget whose point queries go to the configured tile service.
    pub fn with_http_client(widget_config: &str, global: &GlobalConfig) -> PreviewResult<Self> {
        let client = PointQueryClient::new(global.titiler_url.clone());
        Self::new(widget_config, global, client)
    }
}
