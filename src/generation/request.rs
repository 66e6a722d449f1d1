use std::sync::Arc;

use crate::{
    assets::{decode::sniff_mime, photo::Photo, source::AssetSource},
    catalog::model::PartOption,
    foundation::{
        core::{CategoryId, PartId},
        error::CarfitResult,
    },
    generation::wire::{WirePart, WireRequest, data_uri, oxford_join},
    selection::store::SelectionStore,
};

/// Encoded image bytes with their MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub bytes: Arc<Vec<u8>>,
}

impl EncodedImage {
    pub fn to_data_uri(&self) -> String {
        data_uri(&self.mime_type, &self.bytes)
    }
}

/// Text the provider gets about one selected part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartPayload {
    pub id: PartId,
    pub name: String,
    pub category_id: CategoryId,
    pub description: String,
}

impl From<&PartOption> for PartPayload {
    fn from(p: &PartOption) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            category_id: p.category_id.clone(),
            description: p.description.clone(),
        }
    }
}

/// One generation submission, built fresh per attempt.
///
/// Only the primary part's overlay travels as an image; the others are described in text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub base_photo: EncodedImage,
    /// Every selected part, exclusive categories first.
    pub parts: Vec<PartPayload>,
    /// The bottom-most selected layer.
    pub primary: PartPayload,
    pub primary_overlay: EncodedImage,
}

impl GenerationRequest {
    /// Assemble a request from the current selection.
    ///
    /// Returns `Ok(None)` when nothing is selected. Fails if the primary overlay cannot be read.
    pub fn assemble(
        photo: &Photo,
        store: &SelectionStore,
        source: &dyn AssetSource,
    ) -> CarfitResult<Option<Self>> {
        let Some(primary) = store.selected_layers().first().copied() else {
            return Ok(None);
        };

        let overlay_bytes = source.read_bytes(&primary.overlay_ref)?;
        let overlay_mime = sniff_mime(&overlay_bytes).unwrap_or("image/png");

        Ok(Some(Self {
            base_photo: EncodedImage {
                mime_type: photo.mime_type().to_string(),
                bytes: Arc::new(photo.bytes().to_vec()),
            },
            parts: store
                .selected_parts()
                .into_iter()
                .map(PartPayload::from)
                .collect(),
            primary: PartPayload::from(primary),
            primary_overlay: EncodedImage {
                mime_type: overlay_mime.to_string(),
                bytes: Arc::new(overlay_bytes),
            },
        }))
    }

    /// Descriptions of every selected part, oxford-comma joined.
    pub fn combined_description(&self) -> String {
        let texts: Vec<&str> = self.parts.iter().map(|p| p.description.as_str()).collect();
        oxford_join(&texts)
    }

    /// JSON body for the HTTP transport.
    pub fn to_wire(&self) -> WireRequest {
        WireRequest {
            car_image: self.base_photo.to_data_uri(),
            part_image: self.primary_overlay.to_data_uri(),
            part_name: self.primary.name.clone(),
            part_category: self.primary.category_id.to_string(),
            part_description: self.combined_description(),
            all_parts: self
                .parts
                .iter()
                .map(|p| WirePart {
                    id: p.id.to_string(),
                    name: p.name.clone(),
                    category: p.category_id.to_string(),
                    description: p.description.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generation/request.rs"]
mod tests;
