use super::*;

#[test]
fn oxford_join_handles_every_arity() {
    assert_eq!(oxford_join::<&str>(&[]), "");
    assert_eq!(oxford_join(&["a"]), "a");
    assert_eq!(oxford_join(&["a", "b"]), "a and b");
    assert_eq!(oxford_join(&["a", "b", "c"]), "a, b, and c");
    assert_eq!(oxford_join(&["a", "b", "c", "d"]), "a, b, c, and d");
}

#[test]
fn data_uri_is_self_describing() {
    assert_eq!(data_uri("image/png", b"hi"), "data:image/png;base64,aGk=");
}

#[test]
fn image_payload_accepts_raw_base64_and_data_uri() {
    let (mime, bytes) = decode_image_payload("aGk=").unwrap();
    assert_eq!(mime, None);
    assert_eq!(bytes, b"hi");

    let (mime, bytes) = decode_image_payload("data:image/jpeg;base64,aGk=").unwrap();
    assert_eq!(mime.as_deref(), Some("image/jpeg"));
    assert_eq!(bytes, b"hi");
}

#[test]
fn image_payload_rejects_garbage() {
    assert!(decode_image_payload("***").is_err());
    assert!(decode_image_payload("").is_err());
    assert!(decode_image_payload("data:image/png,aGk=").is_err());
    assert!(decode_image_payload("data:image/png;base64").is_err());
}

#[test]
fn request_serializes_with_wire_field_names() {
    let req = WireRequest {
        car_image: "data:image/jpeg;base64,AA==".to_string(),
        part_image: "data:image/png;base64,AA==".to_string(),
        part_name: "Sport Black Alloy".to_string(),
        part_category: "wheels".to_string(),
        part_description: "black wheels".to_string(),
        all_parts: vec![WirePart {
            id: "wheel_sport_black_01".to_string(),
            name: "Sport Black Alloy".to_string(),
            category: "wheels".to_string(),
            description: "black wheels".to_string(),
        }],
    };
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["part_category"], "wheels");
    assert_eq!(v["all_parts"][0]["category"], "wheels");
    assert_eq!(v["all_parts"][0]["id"], "wheel_sport_black_01");
    assert!(v.get("car_image").is_some());
    assert!(v.get("part_image").is_some());
}

#[test]
fn response_fields_are_all_optional() {
    let r: GenerationResponse = serde_json::from_str("{}").unwrap();
    assert_eq!(r, GenerationResponse::default());

    let r: GenerationResponse =
        serde_json::from_str(r#"{"status":"rate_limited","message":"slow down","extra":1}"#)
            .unwrap();
    assert_eq!(r.status.as_deref(), Some(STATUS_RATE_LIMITED));
    assert_eq!(r.message.as_deref(), Some("slow down"));
}
