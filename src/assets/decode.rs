use std::sync::Arc;

use crate::foundation::{
    core::premultiply,
    error::{CarfitError, CarfitResult},
};

/// Decoded raster in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }

    /// Pixel at `(x, y)`; callers keep coordinates in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.rgba8_premul[idx..idx + 4];
        [p[0], p[1], p[2], p[3]]
    }

    /// Resample to `width` x `height`. Returns a clone when the size already matches.
    pub fn resized(&self, width: u32, height: u32) -> CarfitResult<Self> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let src = image::RgbaImage::from_raw(
            self.width,
            self.height,
            self.rgba8_premul.as_ref().clone(),
        )
        .ok_or_else(|| CarfitError::asset("prepared image buffer does not match its size"))?;
        // Premultiplied data filters without dark fringes.
        let out = image::imageops::resize(
            &src,
            width.max(1),
            height.max(1),
            image::imageops::FilterType::Triangle,
        );
        let (width, height) = out.dimensions();
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(out.into_raw()),
        })
    }
}

/// Decode any format `image` understands into a [`PreparedImage`].
pub fn decode_image(bytes: &[u8]) -> CarfitResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CarfitError::asset_decode("<memory>", e))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CarfitError::asset_decode("<memory>", "image has zero size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// MIME type of an encoded image, sniffed from its magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let out = premultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
