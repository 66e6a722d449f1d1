use base64::Engine as _;

/// `status` value for a ready image.
pub const STATUS_SUCCESS: &str = "success";
/// `status` value for the provider's sample mode.
pub const STATUS_DEMO: &str = "demo";
/// `status` value for throttling.
pub const STATUS_RATE_LIMITED: &str = "rate_limited";
/// `status` value for a text answer instead of an image.
pub const STATUS_TEXT_RESPONSE: &str = "text_response";

/// One selected part as described to the provider.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WirePart {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
}

/// JSON body POSTed to the generation endpoint.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WireRequest {
    /// Base photo as a data URI.
    pub car_image: String,
    /// Primary part overlay as a data URI.
    pub part_image: String,
    pub part_name: String,
    pub part_category: String,
    /// Every selected part's text, oxford-comma joined.
    pub part_description: String,
    pub all_parts: Vec<WirePart>,
}

/// JSON body returned by the generation endpoint. Every field is optional on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenerationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GenerationResponse {
    /// A response carrying only a status and a message.
    pub fn with_status(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: Some(status.to_string()),
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// `data:<mime>;base64,<payload>`.
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime_type};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Decode an `image_base64` field, which may be raw base64 or a data URI.
///
/// Returns the MIME type declared by the data URI, if any, and the decoded bytes.
pub fn decode_image_payload(payload: &str) -> Result<(Option<String>, Vec<u8>), String> {
    let payload = payload.trim();
    let (mime, b64) = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (header, body) = rest
                .split_once(',')
                .ok_or_else(|| "data URI has no payload".to_string())?;
            let Some(mime) = header.strip_suffix(";base64") else {
                return Err("data URI is not base64-encoded".to_string());
            };
            let mime = (!mime.is_empty()).then(|| mime.to_string());
            (mime, body)
        }
        None => (None, payload),
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|e| format!("invalid base64 image: {e}"))?;
    if bytes.is_empty() {
        return Err("image payload is empty".to_string());
    }
    Ok((mime, bytes))
}

/// English list join: `a`, `a and b`, `a, b, and c`.
pub fn oxford_join<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [a, b] => format!("{} and {}", a.as_ref(), b.as_ref()),
        [head @ .., last] => {
            let mut out = head
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(", and ");
            out.push_str(last.as_ref());
            out
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generation/wire.rs"]
mod tests;
