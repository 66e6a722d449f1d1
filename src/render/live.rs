use std::sync::Arc;

use crate::{
    assets::{cache::OverlayCache, decode::PreparedImage},
    foundation::{
        core::{CategoryId, PartId},
        error::CarfitResult,
    },
    render::{
        blend::over_in_place,
        compositor::{BaseCache, Compositor, FrameRGBA, PreviewScene, SkippedLayer},
    },
};

/// One overlay of a live preview.
#[derive(Clone, Debug)]
pub struct LiveLayer {
    pub part_id: PartId,
    pub category_id: CategoryId,
    /// Stacking index; hosts map this to their native z-order.
    pub z: i32,
    /// Full-frame transparent overlay, authored to match the base composition.
    pub image: Arc<PreparedImage>,
}

/// A display list: the base photo at the bottom and overlays above it in paint order.
///
/// Hosts with native layering stack these directly and scale them with their container; hosts
/// without it call [`LivePreview::flatten`].
#[derive(Clone, Debug)]
pub struct LivePreview {
    pub base: Arc<PreparedImage>,
    pub layers: Vec<LiveLayer>,
    pub skipped: Vec<SkippedLayer>,
}

impl LivePreview {
    /// Part ids bottom to top.
    pub fn paint_order(&self) -> Vec<&PartId> {
        self.layers.iter().map(|l| &l.part_id).collect()
    }

    /// Stretch each overlay to the base size and composite everything into one frame.
    pub fn flatten(&self) -> CarfitResult<FrameRGBA> {
        let mut frame = FrameRGBA::from_prepared(&self.base);
        for layer in &self.layers {
            let fitted = layer.image.resized(frame.width, frame.height)?;
            over_in_place(&mut frame.data, &fitted.rgba8_premul, 1.0)?;
        }
        Ok(frame)
    }
}

/// Real-time preview strategy: no repositioning, no rasterization, only cached decodes.
#[derive(Debug)]
pub struct LiveStackCompositor {
    cache: Arc<OverlayCache>,
    base: BaseCache,
}

impl LiveStackCompositor {
    pub fn new(cache: Arc<OverlayCache>) -> Self {
        Self {
            cache,
            base: BaseCache::default(),
        }
    }

    pub fn cache(&self) -> &Arc<OverlayCache> {
        &self.cache
    }
}

impl Compositor for LiveStackCompositor {
    type Output = LivePreview;

    #[tracing::instrument(skip_all, fields(layers = scene.layers.len()))]
    fn compose(&mut self, scene: &PreviewScene<'_>) -> CarfitResult<LivePreview> {
        let base = self.base.get_or_decode(scene.photo)?;

        let mut layers = Vec::with_capacity(scene.layers.len());
        let mut skipped = Vec::new();
        for part in &scene.layers {
            match self.cache.get_or_decode(part) {
                Ok(image) => layers.push(LiveLayer {
                    part_id: part.id.clone(),
                    category_id: part.category_id.clone(),
                    z: part.stacking_index,
                    image,
                }),
                Err(e) => {
                    tracing::warn!(part = %part.id, error = %e, "live layer skipped");
                    skipped.push(SkippedLayer {
                        part_id: part.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(LivePreview {
            base,
            layers,
            skipped,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/live.rs"]
mod tests;
