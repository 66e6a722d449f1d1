use crate::catalog::model::SelectionMode;

use super::*;

#[test]
fn builtin_catalog_parses_and_validates() {
    let catalog = Catalog::builtin().unwrap();
    let ids: Vec<&str> = catalog.categories().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["wrap", "wheels", "body", "roof"]);
    assert_eq!(catalog.parts().len(), 11);
}

#[test]
fn builtin_modes_match_product_rules() {
    let catalog = Catalog::builtin().unwrap();
    let mode = |id: &str| catalog.category(id).unwrap().selection_mode;
    assert_eq!(mode("wrap"), SelectionMode::Exclusive);
    assert_eq!(mode("wheels"), SelectionMode::Exclusive);
    assert_eq!(mode("body"), SelectionMode::Additive);
    assert_eq!(mode("roof"), SelectionMode::Exclusive);
}

#[test]
fn builtin_roof_parts_paint_after_wraps() {
    let catalog = Catalog::builtin().unwrap();
    let max_wrap = catalog
        .parts_in("wrap")
        .map(|p| p.stacking_index)
        .max()
        .unwrap();
    let min_roof = catalog
        .parts_in("roof")
        .map(|p| p.stacking_index)
        .min()
        .unwrap();
    assert_eq!(max_wrap, 10);
    assert!((40..50).contains(&min_roof));
}

#[test]
fn builtin_band_default_applies_to_unindexed_parts() {
    let catalog = Catalog::builtin().unwrap();
    assert_eq!(
        catalog.part("wheel_lux_silver_02").unwrap().stacking_index,
        20
    );
    assert_eq!(
        catalog.part("roof_rack_silver_02").unwrap().stacking_index,
        40
    );
    assert_eq!(catalog.part("roof_box_black_01").unwrap().stacking_index, 42);
}
