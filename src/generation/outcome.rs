use crate::{
    assets::decode::sniff_mime,
    generation::{
        transport::TransportError,
        wire::{
            GenerationResponse, STATUS_DEMO, STATUS_RATE_LIMITED, STATUS_SUCCESS,
            STATUS_TEXT_RESPONSE, decode_image_payload,
        },
    },
};

/// Image shown in place of a generated one when the provider only answered in text.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1544636331-e26879cd4d9b?w=800";

/// The one message every [`GenerationOutcome::Failure`] carries.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "We couldn't generate a preview right now. Please try again.";

pub const DEFAULT_RATE_LIMIT_MESSAGE: &str =
    "Too many generation requests. Please wait a moment and try again.";

pub const DEFAULT_DEMO_MESSAGE: &str =
    "Demo mode: showing a sample image instead of a generated preview.";

pub const DEFAULT_TEXT_MESSAGE: &str = "The provider described the result instead of drawing it.";

/// A generated image, either inline or hosted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeneratedImage {
    Inline { mime_type: String, bytes: Vec<u8> },
    Url(String),
}

/// Terminal result of one generation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success {
        image: GeneratedImage,
        message: Option<String>,
    },
    Demo {
        image_url: String,
        message: String,
    },
    RateLimited {
        message: String,
    },
    /// Soft failure: show [`PLACEHOLDER_IMAGE_URL`] next to the text.
    TextOnly {
        message: String,
    },
    Failure {
        message: String,
    },
}

impl GenerationOutcome {
    pub fn failure() -> Self {
        Self::Failure {
            message: GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Map a provider response onto an outcome. Anything that does not fit a known shape is a
    /// [`GenerationOutcome::Failure`].
    pub fn classify(response: GenerationResponse) -> Self {
        let GenerationResponse {
            status,
            image_base64,
            image_url,
            message,
        } = response;
        let image_url = image_url.filter(|u| !u.trim().is_empty());
        let message = message.filter(|m| !m.trim().is_empty());

        match status.as_deref() {
            Some(STATUS_SUCCESS) => {
                if let Some(b64) = image_base64.as_deref() {
                    return match decode_image_payload(b64) {
                        Ok((mime, bytes)) => {
                            let mime_type = mime
                                .or_else(|| sniff_mime(&bytes).map(str::to_string))
                                .unwrap_or_else(|| "image/png".to_string());
                            Self::Success {
                                image: GeneratedImage::Inline { mime_type, bytes },
                                message,
                            }
                        }
                        Err(reason) => {
                            tracing::warn!(%reason, "success response with unusable image");
                            Self::failure()
                        }
                    };
                }
                match image_url {
                    Some(url) => Self::Success {
                        image: GeneratedImage::Url(url),
                        message,
                    },
                    None => {
                        tracing::warn!("success response without an image");
                        Self::failure()
                    }
                }
            }
            Some(STATUS_DEMO) => match image_url {
                Some(image_url) => Self::Demo {
                    image_url,
                    message: message.unwrap_or_else(|| DEFAULT_DEMO_MESSAGE.to_string()),
                },
                None => {
                    tracing::warn!("demo response without an image url");
                    Self::failure()
                }
            },
            Some(STATUS_RATE_LIMITED) => Self::RateLimited {
                message: message.unwrap_or_else(|| DEFAULT_RATE_LIMIT_MESSAGE.to_string()),
            },
            Some(STATUS_TEXT_RESPONSE) => Self::TextOnly {
                message: message.unwrap_or_else(|| DEFAULT_TEXT_MESSAGE.to_string()),
            },
            other => {
                tracing::warn!(status = ?other, "unrecognized response status");
                Self::failure()
            }
        }
    }

    /// Like [`GenerationOutcome::classify`], folding transport errors into `Failure`.
    pub fn from_transport(result: Result<GenerationResponse, TransportError>) -> Self {
        match result {
            Ok(response) => Self::classify(response),
            Err(e) => {
                tracing::warn!(error = %e, "generation transport failed");
                Self::failure()
            }
        }
    }

    /// Short lowercase name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Demo { .. } => "demo",
            Self::RateLimited { .. } => "rate_limited",
            Self::TextOnly { .. } => "text_only",
            Self::Failure { .. } => "failure",
        }
    }

    /// User-facing message. Only `Success` may have none.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. } => message.as_deref(),
            Self::Demo { message, .. }
            | Self::RateLimited { message }
            | Self::TextOnly { message }
            | Self::Failure { message } => Some(message),
        }
    }

    /// URL the display layer should show, if the outcome has one.
    pub fn display_url(&self) -> Option<&str> {
        match self {
            Self::Success {
                image: GeneratedImage::Url(url),
                ..
            } => Some(url),
            Self::Demo { image_url, .. } => Some(image_url),
            Self::TextOnly { .. } => Some(PLACEHOLDER_IMAGE_URL),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generation/outcome.rs"]
mod tests;
