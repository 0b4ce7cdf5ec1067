use super::*;

#[test]
fn defaults_match_session_start_values() {
    let p = EditorParameters::default();
    assert_eq!(p.padding_percent, 0.0);
    assert_eq!(p.corner_radius_px, 10.0);
    assert_eq!(p.shadow_size_px, 20.0);
    assert_eq!(p.shadow_intensity, 0.1);
    assert_eq!(p.active_category, Category::Gradient);
    assert!(!p.show_window_chrome);
    assert!(p.is_within_bounds());
}

#[test]
fn apply_clamps_numeric_fields() {
    let mut p = EditorParameters::default();
    assert!(p.apply(ParamChange::Numeric {
        field: NumericField::CornerRadius,
        value: 80.0,
    }));
    assert_eq!(p.corner_radius_px, 50.0);

    p.apply(ParamChange::Numeric {
        field: NumericField::ShadowIntensity,
        value: -1.0,
    });
    assert_eq!(p.shadow_intensity, 0.0);

    p.apply(ParamChange::Numeric {
        field: NumericField::ContainerWidth,
        value: f64::NAN,
    });
    assert_eq!(p.container_width_percent, 50.0);
}

#[test]
fn apply_reports_no_change_for_identical_value() {
    let mut p = EditorParameters::default();
    assert!(!p.apply(ParamChange::Numeric {
        field: NumericField::CornerRadius,
        value: 10.0,
    }));
    assert!(!p.apply(ParamChange::WindowChrome(false)));
    assert!(p.apply(ParamChange::WindowChrome(true)));
}

#[test]
fn category_switch_reclamps_padding() {
    let mut p = EditorParameters::default();
    p.apply(ParamChange::Numeric {
        field: NumericField::Padding,
        value: 28.0,
    });
    assert_eq!(p.padding_percent, 28.0);

    p.apply(ParamChange::Category(Category::StockWallpaper));
    assert_eq!(p.padding_percent, 20.0);
    assert!(p.is_within_bounds());
}

#[test]
fn clamped_pulls_deserialized_values_into_range() {
    let p: EditorParameters =
        serde_json::from_str(r#"{ "corner_radius_px": 99, "background_blur_px": -3 }"#).unwrap();
    assert!(!p.is_within_bounds());
    let c = p.clamped();
    assert_eq!(c.corner_radius_px, 50.0);
    assert_eq!(c.background_blur_px, 0.0);
    assert_eq!(c.shadow_size_px, 20.0);
}

#[test]
fn intrinsics_reject_zero_dimensions() {
    assert!(ImageIntrinsics::new(0, 10).is_err());
    assert_eq!(ImageIntrinsics::new(1200, 600).unwrap().aspect(), 2.0);
}

#[test]
fn category_parse_accepts_cli_spellings() {
    assert_eq!(Category::parse("macOS").unwrap(), Category::MacOsWallpaper);
    assert_eq!(Category::parse("gradients").unwrap(), Category::Gradient);
    assert!(Category::parse("plaid").is_err());
}
