use crate::{catalog::model::Catalog, foundation::error::CarfitResult};

const BUILTIN_CATALOG_JSON: &str = include_str!("../../data/catalog.json");

impl Catalog {
    /// The stock product line: body wraps, wheels, body accents and roof storage.
    pub fn builtin() -> CarfitResult<Self> {
        Self::from_json_str(BUILTIN_CATALOG_JSON)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/builtin.rs"]
mod tests;
