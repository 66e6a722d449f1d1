use std::sync::Arc;

use crate::{
    assets::{cache::OverlayCache, photo::Photo, source::AssetSource},
    catalog::model::{Catalog, PartOption},
    foundation::{config::EngineConfig, error::CarfitResult},
    generation::{
        orchestrator::{AttemptEpoch, GenerationOrchestrator, GenerationState, PendingAttempt},
        outcome::GenerationOutcome,
        transport::{GenerationTransport, TransportError},
        wire::GenerationResponse,
    },
    render::{
        compositor::{Compositor, PreviewScene},
        live::{LivePreview, LiveStackCompositor},
        raster::{RasterCompositor, RasterPreview},
    },
    selection::{state::SelectionChange, store::SelectionStore},
};

/// One user's configuring session: photo, selection, previews and the generation slot.
///
/// Every call that changes the selection or the photo invalidates the generation result, so a
/// result is never shown against a selection it was not produced for.
#[derive(Debug)]
pub struct Configurator {
    store: SelectionStore,
    photo: Option<Photo>,
    cache: Arc<OverlayCache>,
    live: LiveStackCompositor,
    raster: RasterCompositor,
    generation: GenerationOrchestrator,
}

impl Configurator {
    /// Session over `catalog`, reading overlays through `source`.
    pub fn new(catalog: Arc<Catalog>, source: Arc<dyn AssetSource>, config: &EngineConfig) -> Self {
        Self::with_cache(catalog, Arc::new(OverlayCache::new(source)), config)
    }

    /// Session sharing an existing overlay cache, so decodes survive across sessions.
    pub fn with_cache(
        catalog: Arc<Catalog>,
        cache: Arc<OverlayCache>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            store: SelectionStore::new(catalog, config.contract),
            photo: None,
            live: LiveStackCompositor::new(Arc::clone(&cache)),
            raster: RasterCompositor::new(Arc::clone(&cache)).with_settings(config.raster.clone()),
            cache,
            generation: GenerationOrchestrator::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.store.catalog()
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    pub fn overlay_cache(&self) -> &Arc<OverlayCache> {
        &self.cache
    }

    /// Replace the base photo, keeping the selection.
    pub fn set_photo(&mut self, photo: Photo) {
        tracing::debug!(w = photo.width(), h = photo.height(), "photo set");
        self.photo = Some(photo);
        self.generation.invalidate();
    }

    /// Begin over with a new photo: the selection and any result are discarded.
    pub fn start_new_photo(&mut self, photo: Photo) {
        self.store.clear_all();
        self.set_photo(photo);
    }

    pub fn toggle(&mut self, category_id: &str, part_id: &str) -> CarfitResult<SelectionChange> {
        let change = self.store.toggle(category_id, part_id)?;
        if change.is_change() {
            self.generation.invalidate();
        }
        Ok(change)
    }

    pub fn clear_category(&mut self, category_id: &str) -> bool {
        let cleared = self.store.clear_category(category_id);
        if cleared {
            self.generation.invalidate();
        }
        cleared
    }

    /// Back to the initial state: no selection, no photo, no result.
    pub fn clear_all(&mut self) {
        self.store.clear_all();
        self.photo = None;
        self.generation.invalidate();
        tracing::debug!("session cleared");
    }

    pub fn selected_parts(&self) -> Vec<&PartOption> {
        self.store.selected_parts()
    }

    pub fn total_price(&self) -> u64 {
        self.store.total_price()
    }

    pub fn selection_count(&self) -> usize {
        self.store.selection_count()
    }

    pub fn is_selected(&self, part_id: &str) -> bool {
        self.store.is_selected(part_id)
    }

    /// Layered preview of the current selection, or `None` without a photo.
    pub fn live_preview(&mut self) -> CarfitResult<Option<LivePreview>> {
        let Some(photo) = &self.photo else {
            return Ok(None);
        };
        let scene = PreviewScene::from_selection(photo, &self.store);
        self.live.compose(&scene).map(Some)
    }

    /// Flattened raster preview of the current selection, or `None` without a photo.
    pub fn raster_preview(&mut self) -> CarfitResult<Option<RasterPreview>> {
        let Some(photo) = &self.photo else {
            return Ok(None);
        };
        let scene = PreviewScene::from_selection(photo, &self.store);
        self.raster.compose(&scene).map(Some)
    }

    /// Apply a new viewport width and re-render the raster preview.
    pub fn resize(&mut self, max_width: Option<u32>) -> CarfitResult<Option<RasterPreview>> {
        self.raster.set_max_width(max_width);
        self.raster_preview()
    }

    pub fn generation_state(&self) -> &GenerationState {
        self.generation.state()
    }

    pub fn outcome(&self) -> Option<&GenerationOutcome> {
        self.generation.outcome()
    }

    /// Start an attempt whose request the caller submits itself.
    pub fn begin_generation(&mut self) -> Option<PendingAttempt> {
        self.generation
            .begin(self.photo.as_ref(), &self.store, self.cache.source().as_ref())
    }

    /// Deliver the response of attempt `epoch`. Returns `false` if it was stale.
    pub fn resolve_generation(
        &mut self,
        epoch: AttemptEpoch,
        result: Result<GenerationResponse, TransportError>,
    ) -> bool {
        self.generation.resolve(epoch, result)
    }

    /// Run one attempt against `transport` and return the resulting state.
    pub async fn generate(&mut self, transport: &dyn GenerationTransport) -> &GenerationState {
        self.generation
            .generate(
                self.photo.as_ref(),
                &self.store,
                self.cache.source().as_ref(),
                transport,
            )
            .await
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
