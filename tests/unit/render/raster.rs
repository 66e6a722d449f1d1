use std::{collections::BTreeMap, io::Cursor};

use crate::{
    assets::{photo::Photo, source::MemorySource},
    catalog::model::{Catalog, PartCategory, PartOption, SelectionMode},
    foundation::core::CategoryId,
};

use super::*;

fn png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn part(id: &str, cat: &str, z: i32) -> PartOption {
    PartOption {
        id: PartId::new(id),
        category_id: CategoryId::new(cat),
        name: id.to_string(),
        description: String::new(),
        price: 1,
        thumbnail_ref: format!("{id}_thumb.png"),
        overlay_ref: format!("{id}.png"),
        stacking_index: z,
    }
}

/// `roof` anchors a half-width overlay in the top-left quadrant; `wrap` has no anchor.
fn catalog() -> Catalog {
    let cat = |id: &str, band| PartCategory {
        id: CategoryId::new(id),
        selection_mode: SelectionMode::Exclusive,
        label: id.to_string(),
        stacking_band: band,
        description: String::new(),
        icon: String::new(),
    };
    let mut anchors = BTreeMap::new();
    anchors.insert(
        CategoryId::new("roof"),
        AnchorSpec {
            x_norm: 0.25,
            y_norm: 0.25,
            scale_norm: 0.5,
        },
    );
    Catalog::new(
        vec![cat("wrap", 10), cat("roof", 40)],
        vec![
            part("WRAP", "wrap", 10),
            part("ROOF", "roof", 40),
            part("BROKEN", "roof", 41),
        ],
        anchors,
    )
    .unwrap()
}

fn cache() -> Arc<OverlayCache> {
    let source = MemorySource::new()
        .with("WRAP.png", png(4, 4, [255, 0, 0, 255]))
        .unwrap()
        .with("ROOF.png", png(4, 4, [0, 255, 0, 255]))
        .unwrap()
        .with("BROKEN.png", b"garbage".to_vec())
        .unwrap();
    Arc::new(OverlayCache::new(Arc::new(source)))
}

fn photo(width: u32, height: u32) -> Photo {
    Photo::from_bytes(png(width, height, [0, 0, 255, 255])).unwrap()
}

#[test]
fn placement_centers_and_keeps_aspect() {
    let anchor = AnchorSpec {
        x_norm: 0.5,
        y_norm: 0.25,
        scale_norm: 0.5,
    };
    let rect = overlay_placement(anchor, Size::new(200.0, 100.0), Size::new(40.0, 20.0));
    assert_eq!(rect.width(), 100.0);
    assert_eq!(rect.height(), 50.0);
    assert_eq!(rect.center(), Point::new(100.0, 25.0));
    assert_eq!(rect.x0, 50.0);
    assert_eq!(rect.y0, 0.0);
}

#[test]
fn full_frame_placement_covers_surface() {
    let rect = overlay_placement(
        AnchorSpec::FULL_FRAME,
        Size::new(8.0, 8.0),
        Size::new(3.0, 3.0),
    );
    assert_eq!(rect, Rect::new(0.0, 0.0, 8.0, 8.0));
}

#[test]
fn anchored_layer_only_covers_its_rect() {
    let catalog = catalog();
    let photo = photo(8, 8);
    let mut compositor = RasterCompositor::new(cache());
    let scene = PreviewScene {
        catalog: &catalog,
        photo: &photo,
        layers: vec![catalog.part("ROOF").unwrap()],
    };

    let out = compositor.compose(&scene).unwrap();
    assert_eq!((out.frame.width, out.frame.height), (8, 8));
    assert_eq!(out.drawn, vec![PartId::new("ROOF")]);
    assert_eq!(out.frame.pixel(1, 1), [0, 255, 0, 255]);
    assert_eq!(out.frame.pixel(6, 6), [0, 0, 255, 255]);
}

#[test]
fn later_layers_occlude_earlier_ones() {
    let catalog = catalog();
    let photo = photo(8, 8);
    let mut compositor = RasterCompositor::new(cache());
    let scene = PreviewScene {
        catalog: &catalog,
        photo: &photo,
        layers: vec![
            catalog.part("WRAP").unwrap(),
            catalog.part("ROOF").unwrap(),
        ],
    };

    let out = compositor.compose(&scene).unwrap();
    assert_eq!(out.drawn, vec![PartId::new("WRAP"), PartId::new("ROOF")]);
    assert_eq!(out.frame.pixel(1, 1), [0, 255, 0, 255]);
    assert_eq!(out.frame.pixel(6, 6), [255, 0, 0, 255]);
}

#[test]
fn broken_overlay_is_reported_and_rest_still_drawn() {
    let catalog = catalog();
    let photo = photo(8, 8);
    let mut compositor = RasterCompositor::new(cache());
    let scene = PreviewScene {
        catalog: &catalog,
        photo: &photo,
        layers: vec![
            catalog.part("WRAP").unwrap(),
            catalog.part("BROKEN").unwrap(),
        ],
    };

    let out = compositor.compose(&scene).unwrap();
    assert_eq!(out.drawn, vec![PartId::new("WRAP")]);
    assert_eq!(out.skipped.len(), 1);
    assert_eq!(out.skipped[0].part_id, "BROKEN");
}

#[test]
fn max_width_downscales_surface() {
    let catalog = catalog();
    let photo = photo(16, 8);
    let mut compositor = RasterCompositor::new(cache()).with_settings(RasterSettings {
        max_width: Some(8),
        ..RasterSettings::default()
    });
    let scene = PreviewScene {
        catalog: &catalog,
        photo: &photo,
        layers: Vec::new(),
    };
    let out = compositor.compose(&scene).unwrap();
    assert_eq!((out.frame.width, out.frame.height), (8, 4));

    compositor.set_max_width(None);
    let out = compositor.compose(&scene).unwrap();
    assert_eq!((out.frame.width, out.frame.height), (16, 8));

    compositor.set_max_width(Some(0));
    assert_eq!(compositor.settings().max_width, None);
}
