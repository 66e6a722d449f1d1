use async_trait::async_trait;
use thiserror::Error;

use crate::{
    foundation::config::ProviderConfig,
    generation::{
        outcome::DEFAULT_RATE_LIMIT_MESSAGE,
        request::GenerationRequest,
        wire::{GenerationResponse, STATUS_DEMO, STATUS_RATE_LIMITED},
    },
};

/// Message the demo transport attaches to its placeholder.
pub const DEMO_TRANSPORT_MESSAGE: &str =
    "Demo mode: configure a generation endpoint for real AI previews.";

#[derive(Debug, Error)]
/// Enumerates transport-level failures of one submission.
pub enum TransportError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Sends one [`GenerationRequest`] and returns the provider's raw response.
///
/// Timeouts, retries and HTTP mechanics belong to the implementation.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn submit(&self, request: &GenerationRequest)
    -> Result<GenerationResponse, TransportError>;
}

/// JSON-over-HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, request_timeout_ms: u64) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(request_timeout_ms.max(1)))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationTransport for HttpTransport {
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint, parts = request.parts.len()))]
    async fn submit(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, TransportError> {
        let body = request.to_wire();
        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        let raw = response.text().await?;
        tracing::debug!(status = status.as_u16(), bytes = raw.len(), "provider responded");

        if status.is_success() {
            return Ok(serde_json::from_str(&raw)?);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            // A throttled provider may still send a JSON body with its own guidance.
            return Ok(serde_json::from_str::<GenerationResponse>(&raw)
                .ok()
                .filter(|r| r.status.is_some())
                .unwrap_or_else(|| {
                    GenerationResponse::with_status(STATUS_RATE_LIMITED, DEFAULT_RATE_LIMIT_MESSAGE)
                }));
        }
        Err(TransportError::HttpStatus {
            status: status.as_u16(),
            body: raw,
        })
    }
}

/// Stand-in provider used when no endpoint is configured: always answers `demo`.
#[derive(Debug, Clone)]
pub struct DemoTransport {
    image_url: String,
}

impl DemoTransport {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
        }
    }
}

#[async_trait]
impl GenerationTransport for DemoTransport {
    async fn submit(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, TransportError> {
        tracing::info!(parts = request.parts.len(), "demo transport answering");
        Ok(GenerationResponse {
            status: Some(STATUS_DEMO.to_string()),
            image_url: Some(self.image_url.clone()),
            message: Some(DEMO_TRANSPORT_MESSAGE.to_string()),
            image_base64: None,
        })
    }
}

/// Transport for a provider config: HTTP when an endpoint is set, demo otherwise.
pub fn transport_for(
    config: &ProviderConfig,
) -> Result<Box<dyn GenerationTransport>, TransportError> {
    match &config.endpoint {
        Some(endpoint) => Ok(Box::new(HttpTransport::new(
            endpoint.clone(),
            config.request_timeout_ms,
        )?)),
        None => Ok(Box::new(DemoTransport::new(config.demo_image_url.clone()))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generation/transport.rs"]
mod tests;
