use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    assets::{
        decode::{PreparedImage, decode_image},
        source::AssetSource,
    },
    catalog::model::PartOption,
    foundation::{
        core::PartId,
        error::{CarfitError, CarfitResult},
    },
};

#[derive(Default)]
struct CacheInner {
    entries: HashMap<PartId, Arc<PreparedImage>>,
    decode_counts: HashMap<PartId, u32>,
}

/// Process-wide cache of decoded overlays keyed by part id.
///
/// Entries are only ever added. One mutex guards the map so the cache can be shared by hosts that
/// render from more than one thread; decode failures are not cached and are retried on next use.
pub struct OverlayCache {
    source: Arc<dyn AssetSource>,
    inner: Mutex<CacheInner>,
}

impl std::fmt::Debug for OverlayCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("OverlayCache")
            .field("entries", &inner.entries.len())
            .finish()
    }
}

impl OverlayCache {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// The source overlays are read from.
    pub fn source(&self) -> &Arc<dyn AssetSource> {
        &self.source
    }

    /// Decoded overlay for `part`, decoding it on first use.
    pub fn get_or_decode(&self, part: &PartOption) -> CarfitResult<Arc<PreparedImage>> {
        let mut inner = self.lock();
        if let Some(hit) = inner.entries.get(&part.id) {
            return Ok(Arc::clone(hit));
        }

        *inner.decode_counts.entry(part.id.clone()).or_insert(0) += 1;
        let bytes = self.source.read_bytes(&part.overlay_ref)?;
        let decoded = decode_image(&bytes).map_err(|e| match e {
            CarfitError::AssetDecode { reason, .. } => {
                CarfitError::asset_decode(part.overlay_ref.clone(), reason)
            }
            other => other,
        })?;

        let decoded = Arc::new(decoded);
        inner.entries.insert(part.id.clone(), Arc::clone(&decoded));
        tracing::debug!(part = %part.id, w = decoded.width, h = decoded.height, "overlay decoded");
        Ok(decoded)
    }

    /// True if `part_id` has a decoded entry.
    pub fn contains(&self, part_id: &str) -> bool {
        self.lock().entries.contains_key(part_id)
    }

    /// Number of decode attempts made for `part_id`.
    pub fn decode_count(&self, part_id: &str) -> u32 {
        self.lock().decode_counts.get(part_id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // The map is append-only, so a poisoned guard still holds consistent entries.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
