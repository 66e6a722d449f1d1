use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::Context as _;

use crate::foundation::{
    core::{CategoryId, PartId},
    error::{CarfitError, CarfitResult},
};

/// Selection rule applied to every option of a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// At most one option active; choosing another replaces it.
    Exclusive,
    /// Any number of options active at once.
    Additive,
}

/// A group of interchangeable or combinable parts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PartCategory {
    pub id: CategoryId,
    pub selection_mode: SelectionMode,
    pub label: String,
    /// Default stacking index for options that do not declare their own.
    pub stacking_band: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// One purchasable part with its preview assets.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PartOption {
    pub id: PartId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    /// Display price, non-negative.
    pub price: u64,
    pub thumbnail_ref: String,
    /// Full-resolution transparent overlay, relative to the assets root.
    pub overlay_ref: String,
    /// Paint order: lower values are drawn first (further back).
    pub stacking_index: i32,
}

/// Where a category's overlay lands on a flattened raster.
///
/// `x_norm`/`y_norm` place the overlay center relative to the surface size; `scale_norm` is the
/// overlay width relative to the surface width.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnchorSpec {
    pub x_norm: f64,
    pub y_norm: f64,
    pub scale_norm: f64,
}

impl AnchorSpec {
    /// Centered, full-width placement.
    pub const FULL_FRAME: Self = Self {
        x_norm: 0.5,
        y_norm: 0.5,
        scale_norm: 1.0,
    };

    fn validate(&self, category: &CategoryId) -> CarfitResult<()> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.x_norm) || !in_unit(self.y_norm) {
            return Err(CarfitError::catalog(format!(
                "anchor for category '{category}' must have x_norm/y_norm in [0,1]"
            )));
        }
        if !self.scale_norm.is_finite() || self.scale_norm <= 0.0 {
            return Err(CarfitError::catalog(format!(
                "anchor for category '{category}' must have finite scale_norm > 0"
            )));
        }
        Ok(())
    }
}

impl Default for AnchorSpec {
    fn default() -> Self {
        Self::FULL_FRAME
    }
}

/// Part entry as written in a catalog file; `stacking_index` may be left to the category band.
#[derive(Clone, Debug, serde::Deserialize)]
struct PartEntry {
    id: PartId,
    category_id: CategoryId,
    name: String,
    description: String,
    price: u64,
    thumbnail_ref: String,
    overlay_ref: String,
    #[serde(default)]
    stacking_index: Option<i32>,
}

#[derive(Clone, Debug, serde::Deserialize)]
struct CatalogFile {
    categories: Vec<PartCategory>,
    parts: Vec<PartEntry>,
    #[serde(default)]
    anchors: BTreeMap<CategoryId, AnchorSpec>,
}

/// Immutable, validated catalog of categories and part options.
#[derive(Clone, Debug)]
pub struct Catalog {
    categories: Vec<PartCategory>,
    parts: Vec<PartOption>,
    anchors: BTreeMap<CategoryId, AnchorSpec>,
    category_pos: HashMap<CategoryId, usize>,
    part_pos: HashMap<PartId, usize>,
}

impl Catalog {
    /// Build a catalog, checking id uniqueness and category references.
    pub fn new(
        categories: Vec<PartCategory>,
        parts: Vec<PartOption>,
        anchors: BTreeMap<CategoryId, AnchorSpec>,
    ) -> CarfitResult<Self> {
        let mut category_pos = HashMap::with_capacity(categories.len());
        for (idx, cat) in categories.iter().enumerate() {
            if cat.id.as_str().trim().is_empty() {
                return Err(CarfitError::catalog("category id must be non-empty"));
            }
            if category_pos.insert(cat.id.clone(), idx).is_some() {
                return Err(CarfitError::catalog(format!(
                    "duplicate category id '{}'",
                    cat.id
                )));
            }
        }

        let mut part_pos = HashMap::with_capacity(parts.len());
        for (idx, part) in parts.iter().enumerate() {
            if part.id.as_str().trim().is_empty() {
                return Err(CarfitError::catalog("part id must be non-empty"));
            }
            if !category_pos.contains_key(&part.category_id) {
                return Err(CarfitError::catalog(format!(
                    "part '{}' references missing category '{}'",
                    part.id, part.category_id
                )));
            }
            if part_pos.insert(part.id.clone(), idx).is_some() {
                return Err(CarfitError::catalog(format!(
                    "duplicate part id '{}'",
                    part.id
                )));
            }
        }

        for (cat, anchor) in &anchors {
            if !category_pos.contains_key(cat) {
                return Err(CarfitError::catalog(format!(
                    "anchor references missing category '{cat}'"
                )));
            }
            anchor.validate(cat)?;
        }

        Ok(Self {
            categories,
            parts,
            anchors,
            category_pos,
            part_pos,
        })
    }

    /// Parse and validate a catalog JSON document.
    pub fn from_json_str(json: &str) -> CarfitResult<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| CarfitError::serde(format!("catalog: {e}")))?;
        Self::from_file_model(file)
    }

    /// Read a catalog JSON file from disk.
    pub fn from_json_file(path: &Path) -> CarfitResult<Self> {
        let f = File::open(path).with_context(|| format!("open catalog '{}'", path.display()))?;
        let file: CatalogFile = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| CarfitError::serde(format!("catalog '{}': {e}", path.display())))?;
        Self::from_file_model(file)
    }

    fn from_file_model(file: CatalogFile) -> CarfitResult<Self> {
        let bands: HashMap<&CategoryId, i32> = file
            .categories
            .iter()
            .map(|c| (&c.id, c.stacking_band))
            .collect();

        let parts = file
            .parts
            .into_iter()
            .map(|p| {
                let stacking_index = match p.stacking_index {
                    Some(z) => z,
                    None => *bands.get(&p.category_id).ok_or_else(|| {
                        CarfitError::catalog(format!(
                            "part '{}' references missing category '{}'",
                            p.id, p.category_id
                        ))
                    })?,
                };
                Ok(PartOption {
                    id: p.id,
                    category_id: p.category_id,
                    name: p.name,
                    description: p.description,
                    price: p.price,
                    thumbnail_ref: p.thumbnail_ref,
                    overlay_ref: p.overlay_ref,
                    stacking_index,
                })
            })
            .collect::<CarfitResult<Vec<_>>>()?;

        Self::new(file.categories, parts, file.anchors)
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> &[PartCategory] {
        &self.categories
    }

    /// All parts in declaration order.
    pub fn parts(&self) -> &[PartOption] {
        &self.parts
    }

    pub fn category(&self, id: &str) -> Option<&PartCategory> {
        self.category_pos.get(id).map(|&i| &self.categories[i])
    }

    pub fn part(&self, id: &str) -> Option<&PartOption> {
        self.part_pos.get(id).map(|&i| &self.parts[i])
    }

    /// Position of a category in declaration order.
    pub fn category_position(&self, id: &str) -> Option<usize> {
        self.category_pos.get(id).copied()
    }

    /// Position of a part in declaration order; used to break stacking ties.
    pub fn declaration_index(&self, id: &str) -> Option<usize> {
        self.part_pos.get(id).copied()
    }

    /// Options of one category, in declaration order.
    pub fn parts_in<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a PartOption> {
        self.parts
            .iter()
            .filter(move |p| p.category_id.as_str() == category_id)
    }

    /// True if `part_id` exists and belongs to `category_id`.
    pub fn is_option_of(&self, category_id: &str, part_id: &str) -> bool {
        self.part(part_id)
            .is_some_and(|p| p.category_id.as_str() == category_id)
    }

    /// Anchor for a category, falling back to [`AnchorSpec::FULL_FRAME`].
    pub fn anchor_for(&self, category_id: &str) -> AnchorSpec {
        self.anchors
            .get(category_id)
            .copied()
            .unwrap_or(AnchorSpec::FULL_FRAME)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/model.rs"]
mod tests;
