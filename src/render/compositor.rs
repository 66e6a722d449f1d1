use std::{io::Cursor, sync::Arc};

use anyhow::Context as _;

use crate::{
    assets::{decode::PreparedImage, photo::Photo},
    catalog::model::{Catalog, PartOption},
    foundation::{
        core::{PartId, Rgba8Premul, unpremultiply},
        error::{CarfitError, CarfitResult},
    },
    selection::store::SelectionStore,
};

/// A rendered preview as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// A frame with every pixel set to `px`.
    pub fn filled(width: u32, height: u32, px: Rgba8Premul) -> Self {
        Self {
            width,
            height,
            data: px.repeat(width as usize * height as usize),
            premultiplied: true,
        }
    }

    /// Copy a prepared image into a new frame.
    pub fn from_prepared(image: &PreparedImage) -> Self {
        Self {
            width: image.width,
            height: image.height,
            data: image.rgba8_premul.as_ref().clone(),
            premultiplied: true,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba8Premul {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Straight-alpha copy suitable for saving.
    pub fn to_rgba_image(&self) -> CarfitResult<image::RgbaImage> {
        let data = if self.premultiplied {
            self.data
                .chunks_exact(4)
                .flat_map(|p| unpremultiply([p[0], p[1], p[2], p[3]]))
                .collect()
        } else {
            self.data.clone()
        };
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| CarfitError::asset("frame buffer does not match its dimensions"))
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> CarfitResult<Vec<u8>> {
        let img = self.to_rgba_image()?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode preview png")?;
        Ok(buf)
    }
}

/// A layer that could not be drawn, and why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLayer {
    pub part_id: PartId,
    pub reason: String,
}

/// Everything a compositor needs for one render: the base photo and the layers in paint order.
#[derive(Clone, Debug)]
pub struct PreviewScene<'a> {
    pub catalog: &'a Catalog,
    pub photo: &'a Photo,
    /// Ascending `stacking_index`; the first entry is painted directly over the photo.
    pub layers: Vec<&'a PartOption>,
}

impl<'a> PreviewScene<'a> {
    /// Scene for the store's current selection.
    pub fn from_selection(photo: &'a Photo, store: &'a SelectionStore) -> Self {
        Self {
            catalog: store.catalog(),
            photo,
            layers: store.selected_layers(),
        }
    }
}

/// A strategy that turns a [`PreviewScene`] into something displayable.
///
/// Implementations must visit `scene.layers` front to back in the given order; later layers
/// occlude earlier ones.
pub trait Compositor {
    type Output;

    fn compose(&mut self, scene: &PreviewScene<'_>) -> CarfitResult<Self::Output>;
}

/// Decoded base photo, reused while the same photo is composed repeatedly.
#[derive(Clone, Debug, Default)]
pub(crate) struct BaseCache {
    entry: Option<(Photo, Arc<PreparedImage>)>,
}

impl BaseCache {
    pub(crate) fn get_or_decode(&mut self, photo: &Photo) -> CarfitResult<Arc<PreparedImage>> {
        if let Some((cached, decoded)) = &self.entry
            && cached == photo
        {
            return Ok(Arc::clone(decoded));
        }
        let decoded = Arc::new(photo.decode()?);
        self.entry = Some((photo.clone(), Arc::clone(&decoded)));
        Ok(decoded)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
