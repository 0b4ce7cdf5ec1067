use super::*;
use crate::composition::params::Category;

fn intrinsics(w: u32, h: u32) -> ImageIntrinsics {
    ImageIntrinsics::new(w, h).unwrap()
}

#[test]
fn wide_image_caps_radius_and_forces_padding() {
    let mut p = EditorParameters {
        corner_radius_px: 50.0,
        padding_percent: 3.0,
        ..EditorParameters::default()
    };
    let fired = auto_adjust(&mut p, intrinsics(1200, 600), &LayoutConfig::default());
    assert!(fired.radius_capped);
    assert!(fired.padding_forced);
    assert!(p.corner_radius_px <= 25.0);
    assert_eq!(p.padding_percent, 15.0);
}

#[test]
fn radius_below_cap_is_left_alone() {
    let mut p = EditorParameters {
        corner_radius_px: 8.0,
        ..EditorParameters::default()
    };
    auto_adjust(&mut p, intrinsics(1920, 400), &LayoutConfig::default());
    assert_eq!(p.corner_radius_px, 8.0);
    // 400 < 600: padding untouched.
    assert_eq!(p.padding_percent, 0.0);
}

#[test]
fn small_square_image_changes_nothing() {
    let mut p = EditorParameters {
        corner_radius_px: 44.0,
        padding_percent: 7.0,
        ..EditorParameters::default()
    };
    let before = p.clone();
    let fired = auto_adjust(&mut p, intrinsics(300, 300), &LayoutConfig::default());
    assert!(!fired.any());
    assert_eq!(p, before);
}

#[test]
fn tall_image_triggers_both_rules() {
    let mut p = EditorParameters {
        corner_radius_px: 40.0,
        ..EditorParameters::default()
    };
    // W' = 600 * 400 / 900 < 600, but height > H.
    let fired = auto_adjust(&mut p, intrinsics(400, 900), &LayoutConfig::default());
    assert!(fired.radius_capped && fired.padding_forced);
    assert_eq!(p.corner_radius_px, 25.0);
}

#[test]
fn padding_target_follows_active_category() {
    let mut p = EditorParameters {
        active_category: Category::StockWallpaper,
        ..EditorParameters::default()
    };
    auto_adjust(&mut p, intrinsics(800, 600), &LayoutConfig::default());
    assert_eq!(p.padding_percent, 10.0);
}

#[test]
fn exact_reference_height_square_only_forces_padding() {
    let mut p = EditorParameters {
        corner_radius_px: 40.0,
        ..EditorParameters::default()
    };
    // W' = 600, not > 600; height == H, not > H.
    let fired = auto_adjust(&mut p, intrinsics(600, 600), &LayoutConfig::default());
    assert!(!fired.radius_capped);
    assert!(fired.padding_forced);
    assert_eq!(p.corner_radius_px, 40.0);
}
