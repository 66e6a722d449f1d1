use std::sync::Arc;

use crate::{
    assets::{cache::OverlayCache, decode::PreparedImage},
    catalog::model::AnchorSpec,
    foundation::{
        config::RasterSettings,
        core::{PartId, Point, Rect, Size, premultiply},
        error::CarfitResult,
    },
    render::{
        blend::blit_over,
        compositor::{BaseCache, Compositor, FrameRGBA, PreviewScene, SkippedLayer},
    },
};

/// A flattened preview plus a report of what was drawn.
#[derive(Clone, Debug)]
pub struct RasterPreview {
    pub frame: FrameRGBA,
    /// Part ids in the order they were painted.
    pub drawn: Vec<PartId>,
    pub skipped: Vec<SkippedLayer>,
}

/// Rectangle an overlay of size `overlay` occupies on a `surface`-sized raster.
///
/// The drawn width is `scale_norm * surface.width`, the height keeps the overlay's aspect ratio,
/// and the rectangle is centered on `(x_norm * surface.width, y_norm * surface.height)`.
pub fn overlay_placement(anchor: AnchorSpec, surface: Size, overlay: Size) -> Rect {
    let width = anchor.scale_norm * surface.width;
    let height = if overlay.width > 0.0 {
        width * overlay.height / overlay.width
    } else {
        0.0
    };
    let center = Point::new(
        anchor.x_norm * surface.width,
        anchor.y_norm * surface.height,
    );
    Rect::from_center_size(center, Size::new(width, height))
}

/// Anchor-based strategy producing an exportable raster.
#[derive(Debug)]
pub struct RasterCompositor {
    cache: Arc<OverlayCache>,
    settings: RasterSettings,
    base: BaseCache,
}

impl RasterCompositor {
    pub fn new(cache: Arc<OverlayCache>) -> Self {
        Self {
            cache,
            settings: RasterSettings::default(),
            base: BaseCache::default(),
        }
    }

    pub fn with_settings(mut self, settings: RasterSettings) -> Self {
        self.settings = settings;
        self.set_max_width(self.settings.max_width);
        self
    }

    pub fn settings(&self) -> &RasterSettings {
        &self.settings
    }

    /// Change the maximum surface width, e.g. after the viewport was resized.
    pub fn set_max_width(&mut self, max_width: Option<u32>) {
        self.settings.max_width = max_width.filter(|w| *w > 0);
    }

    fn surface_for(&self, base: &PreparedImage) -> CarfitResult<PreparedImage> {
        match self.settings.max_width {
            Some(max_w) if base.width > max_w => {
                let h = (f64::from(base.height) * f64::from(max_w) / f64::from(base.width))
                    .round()
                    .max(1.0) as u32;
                base.resized(max_w, h)
            }
            _ => Ok(base.clone()),
        }
    }
}

impl Compositor for RasterCompositor {
    type Output = RasterPreview;

    #[tracing::instrument(skip_all, fields(layers = scene.layers.len()))]
    fn compose(&mut self, scene: &PreviewScene<'_>) -> CarfitResult<RasterPreview> {
        let base = self.base.get_or_decode(scene.photo)?;
        let base = self.surface_for(&base)?;

        let mut frame = FrameRGBA::filled(
            base.width,
            base.height,
            premultiply(self.settings.clear_rgba),
        );
        blit_over(&mut frame, &base, 0, 0);

        let surface = Size::new(f64::from(frame.width), f64::from(frame.height));
        let mut drawn = Vec::with_capacity(scene.layers.len());
        let mut skipped = Vec::new();

        for part in &scene.layers {
            let overlay = match self.cache.get_or_decode(part) {
                Ok(img) => img,
                Err(e) => {
                    tracing::warn!(part = %part.id, error = %e, "raster layer skipped");
                    skipped.push(SkippedLayer {
                        part_id: part.id.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let anchor = scene.catalog.anchor_for(part.category_id.as_str());
            let rect = overlay_placement(
                anchor,
                surface,
                Size::new(f64::from(overlay.width), f64::from(overlay.height)),
            );
            let w = rect.width().round().max(1.0) as u32;
            let h = rect.height().round().max(1.0) as u32;
            let scaled = overlay.resized(w, h)?;
            blit_over(
                &mut frame,
                &scaled,
                rect.x0.round() as i64,
                rect.y0.round() as i64,
            );
            drawn.push(part.id.clone());
        }

        tracing::debug!(
            drawn = drawn.len(),
            skipped = skipped.len(),
            w = frame.width,
            h = frame.height,
            "raster preview composed"
        );
        Ok(RasterPreview {
            frame,
            drawn,
            skipped,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
