use super::*;

fn response(status: Option<&str>) -> GenerationResponse {
    GenerationResponse {
        status: status.map(str::to_string),
        ..GenerationResponse::default()
    }
}

#[test]
fn success_with_inline_image() {
    let mut r = response(Some("success"));
    r.image_base64 = Some("data:image/jpeg;base64,aGk=".to_string());
    r.message = Some("done".to_string());
    let out = GenerationOutcome::classify(r);
    assert_eq!(
        out,
        GenerationOutcome::Success {
            image: GeneratedImage::Inline {
                mime_type: "image/jpeg".to_string(),
                bytes: b"hi".to_vec(),
            },
            message: Some("done".to_string()),
        }
    );
    assert_eq!(out.kind(), "success");
    assert_eq!(out.display_url(), None);
}

#[test]
fn success_prefers_inline_then_url() {
    let mut r = response(Some("success"));
    r.image_url = Some("https://cdn.example/x.png".to_string());
    let out = GenerationOutcome::classify(r);
    assert_eq!(out.display_url(), Some("https://cdn.example/x.png"));
    assert_eq!(out.message(), None);
}

#[test]
fn success_without_usable_image_is_failure() {
    assert_eq!(
        GenerationOutcome::classify(response(Some("success"))),
        GenerationOutcome::failure()
    );

    let mut r = response(Some("success"));
    r.image_base64 = Some("!!!".to_string());
    r.image_url = Some("https://cdn.example/x.png".to_string());
    assert_eq!(GenerationOutcome::classify(r), GenerationOutcome::failure());
}

#[test]
fn demo_needs_an_url_and_gets_a_default_message() {
    let mut r = response(Some("demo"));
    r.image_url = Some("https://img.example/demo.jpg".to_string());
    let out = GenerationOutcome::classify(r);
    assert_eq!(out.kind(), "demo");
    assert_eq!(out.message(), Some(DEFAULT_DEMO_MESSAGE));
    assert_eq!(out.display_url(), Some("https://img.example/demo.jpg"));

    assert_eq!(
        GenerationOutcome::classify(response(Some("demo"))),
        GenerationOutcome::failure()
    );
}

#[test]
fn rate_limited_keeps_provider_message() {
    let out = GenerationOutcome::classify(GenerationResponse::with_status(
        "rate_limited",
        "slow down",
    ));
    assert_eq!(
        out,
        GenerationOutcome::RateLimited {
            message: "slow down".to_string()
        }
    );

    let out = GenerationOutcome::classify(response(Some("rate_limited")));
    assert_eq!(out.message(), Some(DEFAULT_RATE_LIMIT_MESSAGE));
}

#[test]
fn text_response_uses_placeholder_image() {
    let out = GenerationOutcome::classify(GenerationResponse::with_status(
        "text_response",
        "A black car with a roof box.",
    ));
    assert_eq!(out.kind(), "text_only");
    assert_eq!(out.message(), Some("A black car with a roof box."));
    assert_eq!(out.display_url(), Some(PLACEHOLDER_IMAGE_URL));
}

#[test]
fn unknown_or_missing_status_is_generic_failure() {
    for status in [None, Some("mocked"), Some("gemini_response"), Some("")] {
        let out = GenerationOutcome::classify(GenerationResponse {
            status: status.map(str::to_string),
            message: Some("internal detail".to_string()),
            image_url: Some("https://x".to_string()),
            ..GenerationResponse::default()
        });
        assert_eq!(out.message(), Some(GENERIC_FAILURE_MESSAGE));
    }
}

#[test]
fn transport_errors_do_not_leak() {
    let out = GenerationOutcome::from_transport(Err(TransportError::InvalidResponse(
        "secret upstream detail".to_string(),
    )));
    assert_eq!(out, GenerationOutcome::failure());
}
