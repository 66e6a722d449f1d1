use std::collections::HashMap;

use super::*;

#[test]
fn ids_borrow_as_str_for_map_lookups() {
    let mut prices = HashMap::new();
    prices.insert(PartId::new("wheel_sport_black_01"), 299u64);
    assert_eq!(prices.get("wheel_sport_black_01"), Some(&299));
    assert_eq!(CategoryId::from("roof").to_string(), "roof");
}

#[test]
fn ids_serialize_transparently() {
    let id = PartId::new("body_frontlip_black_01");
    assert_eq!(
        serde_json::to_string(&id).unwrap(),
        "\"body_frontlip_black_01\""
    );
    let back: PartId = serde_json::from_str("\"x\"").unwrap();
    assert_eq!(back.as_str(), "x");
}

#[test]
fn premultiply_zero_alpha_clears_color() {
    assert_eq!(premultiply([200, 100, 50, 0]), [0, 0, 0, 0]);
    assert_eq!(premultiply([200, 100, 50, 255]), [200, 100, 50, 255]);
}

#[test]
fn unpremultiply_inverts_opaque_and_half_alpha() {
    assert_eq!(unpremultiply([10, 20, 30, 255]), [10, 20, 30, 255]);
    let p = premultiply([200, 100, 50, 128]);
    let s = unpremultiply(p);
    assert!((i16::from(s[0]) - 200).abs() <= 1);
    assert!((i16::from(s[1]) - 100).abs() <= 1);
    assert!((i16::from(s[2]) - 50).abs() <= 2);
    assert_eq!(s[3], 128);
}
