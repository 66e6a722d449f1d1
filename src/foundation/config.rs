use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::{CarfitError, CarfitResult};

/// Default transport timeout applied by [`crate::HttpTransport`].
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Placeholder shown by the demo transport.
pub const DEFAULT_DEMO_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1544636331-e26879cd4d9b?w=800";

/// How the selection store reacts to an id/category mismatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractPolicy {
    /// Surface [`CarfitError::InvalidSelection`] to the caller.
    Strict,
    /// Log the violation and treat the call as a no-op.
    Lenient,
}

impl Default for ContractPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Settings for the flattened raster preview.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// If set, the base photo is downscaled so the surface is at most this wide.
    pub max_width: Option<u32>,
    /// Color the surface is cleared to before the base photo is drawn.
    pub clear_rgba: [u8; 4],
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            max_width: None,
            clear_rgba: [0, 0, 0, 255],
        }
    }
}

/// Where and how generation requests are sent.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Full URL of the generation endpoint. `None` selects the demo transport.
    pub endpoint: Option<String>,
    /// Client-side timeout for one request.
    pub request_timeout_ms: u64,
    /// Image returned by the demo transport.
    pub demo_image_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            demo_image_url: DEFAULT_DEMO_IMAGE_URL.to_string(),
        }
    }
}

/// Engine-wide configuration, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root directory overlay and thumbnail references are resolved against.
    pub assets_root: PathBuf,
    /// Reaction to selection contract violations.
    pub contract: ContractPolicy,
    /// Raster preview settings.
    pub raster: RasterSettings,
    /// Generation provider settings.
    pub provider: ProviderConfig,
}

impl EngineConfig {
    /// Read and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> CarfitResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| CarfitError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> CarfitResult<()> {
        if self.provider.request_timeout_ms == 0 {
            return Err(CarfitError::config("provider.request_timeout_ms must be > 0"));
        }
        if self.raster.max_width == Some(0) {
            return Err(CarfitError::config("raster.max_width must be > 0 when set"));
        }
        if let Some(endpoint) = &self.provider.endpoint {
            let parsed = reqwest::Url::parse(endpoint)
                .map_err(|e| CarfitError::config(format!("provider.endpoint '{endpoint}': {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(CarfitError::config(format!(
                    "provider.endpoint '{endpoint}' must use http or https"
                )));
            }
        }
        if self.provider.demo_image_url.trim().is_empty() {
            return Err(CarfitError::config("provider.demo_image_url must be non-empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
