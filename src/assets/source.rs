use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;

use crate::foundation::error::{CarfitError, CarfitResult};

/// Supplies raw bytes for thumbnail and overlay references.
pub trait AssetSource: Send + Sync {
    /// Read the encoded bytes behind `reference`.
    fn read_bytes(&self, reference: &str) -> CarfitResult<Vec<u8>>;
}

/// Normalize and validate a catalog-relative asset reference.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> CarfitResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CarfitError::asset("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(CarfitError::asset("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CarfitError::asset("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CarfitError::asset("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Reads assets from a directory on disk.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsAssetSource {
    fn read_bytes(&self, reference: &str) -> CarfitResult<Vec<u8>> {
        let norm = normalize_rel_path(reference)?;
        let path = self.root.join(&norm);
        let bytes =
            std::fs::read(&path).with_context(|| format!("read asset '{}'", path.display()))?;
        Ok(bytes)
    }
}

/// In-memory asset map, for hosts that already hold the bytes.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    entries: HashMap<String, Arc<Vec<u8>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under the normalized form of `reference`.
    pub fn insert(&mut self, reference: &str, bytes: Vec<u8>) -> CarfitResult<()> {
        let norm = normalize_rel_path(reference)?;
        self.entries.insert(norm, Arc::new(bytes));
        Ok(())
    }

    /// Builder-style [`MemorySource::insert`].
    pub fn with(mut self, reference: &str, bytes: Vec<u8>) -> CarfitResult<Self> {
        self.insert(reference, bytes)?;
        Ok(self)
    }
}

impl AssetSource for MemorySource {
    fn read_bytes(&self, reference: &str) -> CarfitResult<Vec<u8>> {
        let norm = normalize_rel_path(reference)?;
        self.entries
            .get(&norm)
            .map(|b| b.as_ref().clone())
            .ok_or_else(|| CarfitError::asset(format!("no asset registered for '{norm}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
