use std::{collections::BTreeMap, io::Cursor};

use crate::{
    assets::source::MemorySource,
    catalog::model::{Catalog, PartCategory, SelectionMode},
    foundation::config::ContractPolicy,
};

use super::*;

fn png(px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn option(id: &str, cat: &str, z: i32, text: &str) -> PartOption {
    PartOption {
        id: PartId::new(id),
        category_id: CategoryId::new(cat),
        name: format!("{id} name"),
        description: text.to_string(),
        price: 100,
        thumbnail_ref: format!("{id}_thumb.png"),
        overlay_ref: format!("{id}.png"),
        stacking_index: z,
    }
}

fn store() -> SelectionStore {
    let cat = |id: &str, mode, band| PartCategory {
        id: CategoryId::new(id),
        selection_mode: mode,
        label: id.to_string(),
        stacking_band: band,
        description: String::new(),
        icon: String::new(),
    };
    let catalog = Catalog::new(
        vec![
            cat("body", SelectionMode::Additive, 30),
            cat("roof", SelectionMode::Exclusive, 40),
            cat("wrap", SelectionMode::Exclusive, 10),
        ],
        vec![
            option("B1", "body", 31, "a front lip"),
            option("B2", "body", 30, "side skirts"),
            option("R1", "roof", 42, "a roof box"),
            option("W1", "wrap", 10, "a satin wrap"),
        ],
        BTreeMap::new(),
    )
    .unwrap();
    SelectionStore::new(Arc::new(catalog), ContractPolicy::Strict)
}

fn source() -> MemorySource {
    MemorySource::new()
        .with("B1.png", png([1, 1, 1, 255]))
        .unwrap()
        .with("B2.png", png([2, 2, 2, 255]))
        .unwrap()
        .with("R1.png", png([3, 3, 3, 255]))
        .unwrap()
}

fn photo() -> Photo {
    Photo::from_bytes(png([0, 0, 0, 255])).unwrap()
}

#[test]
fn empty_selection_builds_nothing() {
    let store = store();
    assert!(
        GenerationRequest::assemble(&photo(), &store, &source())
            .unwrap()
            .is_none()
    );
}

#[test]
fn primary_is_lowest_layer_and_text_covers_all_parts() {
    let mut store = store();
    store.toggle("roof", "R1").unwrap();
    store.toggle("body", "B1").unwrap();
    store.toggle("body", "B2").unwrap();

    let req = GenerationRequest::assemble(&photo(), &store, &source())
        .unwrap()
        .unwrap();
    assert_eq!(req.primary.id, "B2");
    assert_eq!(req.primary_overlay.mime_type, "image/png");
    assert_eq!(req.primary_overlay.bytes.as_slice(), png([2, 2, 2, 255]));
    assert_eq!(
        req.parts.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
        vec!["R1", "B1", "B2"]
    );
    assert_eq!(
        req.combined_description(),
        "a roof box, a front lip, and side skirts"
    );

    let wire = req.to_wire();
    assert_eq!(wire.part_name, "B2 name");
    assert_eq!(wire.part_category, "body");
    assert!(wire.car_image.starts_with("data:image/png;base64,"));
    assert!(wire.part_image.starts_with("data:image/png;base64,"));
    assert_eq!(wire.all_parts.len(), 3);
    assert_eq!(wire.all_parts[0].category, "roof");
}

#[test]
fn unreadable_primary_overlay_fails_assembly() {
    let mut store = store();
    store.toggle("wrap", "W1").unwrap();
    assert!(GenerationRequest::assemble(&photo(), &store, &source()).is_err());
}
