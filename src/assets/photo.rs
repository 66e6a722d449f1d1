use std::{io::Cursor, path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    assets::decode::{PreparedImage, decode_image, sniff_mime},
    foundation::error::{CarfitError, CarfitResult},
};

/// The user's vehicle photo: encoded bytes plus what was learned from the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Photo {
    bytes: Arc<Vec<u8>>,
    mime_type: &'static str,
    width: u32,
    height: u32,
}

impl Photo {
    /// Wrap encoded bytes, sniffing the format and probing the dimensions.
    pub fn from_bytes(bytes: Vec<u8>) -> CarfitResult<Self> {
        let mime_type = sniff_mime(&bytes)
            .ok_or_else(|| CarfitError::asset_decode("<photo>", "unrecognized image format"))?;
        let (width, height) = image::ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .context("probe photo format")?
            .into_dimensions()
            .map_err(|e| CarfitError::asset_decode("<photo>", e))?;
        if width == 0 || height == 0 {
            return Err(CarfitError::asset_decode("<photo>", "image has zero size"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            mime_type,
            width,
            height,
        })
    }

    pub fn from_path(path: &Path) -> CarfitResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fully decode into premultiplied pixels.
    pub fn decode(&self) -> CarfitResult<PreparedImage> {
        decode_image(&self.bytes)
    }
}
