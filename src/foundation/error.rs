/// Convenience result alias used across the crate.
pub type CarfitResult<T> = Result<T, CarfitError>;

/// Top-level error type for catalog, selection, asset and configuration failures.
///
/// Generation-attempt failures are not represented here: they are folded into
/// [`crate::GenerationOutcome::Failure`] by the orchestrator.
#[derive(thiserror::Error, Debug)]
pub enum CarfitError {
    /// The catalog violates one of its structural invariants.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// A part id was toggled under a category it does not belong to (or does not exist).
    #[error("invalid selection: part '{part}' is not an option of category '{category}'")]
    InvalidSelection {
        /// Category the caller addressed.
        category: String,
        /// Part id the caller tried to toggle.
        part: String,
    },

    /// An asset reference could not be resolved or read.
    #[error("asset error: {0}")]
    Asset(String),

    /// Asset bytes were read but could not be decoded into an image.
    #[error("asset decode error for '{reference}': {reason}")]
    AssetDecode {
        /// Asset reference (overlay path or part id).
        reference: String,
        /// Decoder message.
        reason: String,
    },

    /// Engine configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CarfitError {
    /// Build a [`CarfitError::Catalog`].
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Build a [`CarfitError::InvalidSelection`].
    pub fn invalid_selection(category: impl Into<String>, part: impl Into<String>) -> Self {
        Self::InvalidSelection {
            category: category.into(),
            part: part.into(),
        }
    }

    /// Build a [`CarfitError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CarfitError::AssetDecode`].
    pub fn asset_decode(reference: impl Into<String>, reason: impl ToString) -> Self {
        Self::AssetDecode {
            reference: reference.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`CarfitError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CarfitError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for [`CarfitError::InvalidSelection`].
    pub fn is_invalid_selection(&self) -> bool {
        matches!(self, Self::InvalidSelection { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
