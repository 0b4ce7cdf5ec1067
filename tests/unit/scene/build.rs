use std::io::Cursor;

use super::*;
use crate::composition::params::{Category, ParamChange};
use crate::foundation::core::Viewport;
use crate::layout::config::LayoutConfig;

fn shot(w: u32, h: u32) -> Screenshot {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([40, 80, 120, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    Screenshot::decode(&buf).unwrap()
}

fn kinds(node: &RenderNode) -> Vec<&'static str> {
    node.layers.iter().map(|l| l.kind()).collect()
}

#[test]
fn layers_follow_paint_order() {
    let engine = LayoutEngine::default();
    let mut params = EditorParameters::default();
    params.apply(ParamChange::WindowChrome(true));
    let s = shot(400, 300);
    let geometry = engine.compute_geometry(&params, Some(s.intrinsics));

    let node = build_scene(
        &engine,
        &params,
        &geometry,
        Some(&s),
        &mut WallpaperCache::default(),
    )
    .unwrap();
    assert_eq!(
        kinds(&node),
        vec![
            "background",
            "shadow",
            "frame",
            "window_chrome",
            "stylesheet_link"
        ]
    );
    assert_eq!(node.visual_layers().count(), 4);
}

#[test]
fn empty_session_shows_placeholder_in_content_box() {
    let engine = LayoutEngine::default();
    let params = EditorParameters::default();
    let geometry = engine.compute_geometry(&params, None);

    let node = build_scene(
        &engine,
        &params,
        &geometry,
        None,
        &mut WallpaperCache::default(),
    )
    .unwrap();
    assert_eq!(
        kinds(&node),
        vec!["background", "placeholder", "stylesheet_link"]
    );
    let Layer::Placeholder(p) = &node.layers[1] else {
        panic!("expected placeholder");
    };
    assert_eq!(p.rect, geometry.content_rect);
}

#[test]
fn zero_intensity_drops_the_shadow_layer() {
    let engine = LayoutEngine::default();
    let mut params = EditorParameters::default();
    params.shadow_intensity = 0.0;
    let s = shot(200, 100);
    let geometry = engine.compute_geometry(&params, Some(s.intrinsics));
    let node = build_scene(
        &engine,
        &params,
        &geometry,
        Some(&s),
        &mut WallpaperCache::default(),
    )
    .unwrap();
    assert!(!kinds(&node).contains(&"shadow"));
}

#[test]
fn rendered_size_matches_geometry_container() {
    for (vw, vh, mode) in [
        (1280.0, 800.0, HeightMode::Fixed),
        (1920.0, 1080.0, HeightMode::Percent),
        (600.0, 900.0, HeightMode::Fixed),
    ] {
        let engine = LayoutEngine::new(
            LayoutConfig::default().with_height_mode(mode),
            Viewport::new(vw, vh).unwrap(),
        );
        let mut params = EditorParameters::default();
        params.container_width_percent = 80.0;
        let geometry = engine.compute_geometry(&params, None);
        let node = build_scene(
            &engine,
            &params,
            &geometry,
            None,
            &mut WallpaperCache::default(),
        )
        .unwrap();
        let size = node.rendered_size();
        assert!((size.width - geometry.container.width).abs() < 1e-9);
        assert!((size.height - geometry.container.height).abs() < 1e-9);
        assert_eq!(node.style.overflow, Overflow::Hidden);
    }
}

#[test]
fn wallpaper_category_adds_black_underlay() {
    let engine = LayoutEngine::default();
    let mut params = EditorParameters::default();
    params.apply(ParamChange::Category(Category::MacOsWallpaper));
    params.apply(ParamChange::Background(BackgroundSpec::ImageUrl(
        "https://example.com/wall.jpg".into(),
    )));
    let geometry = engine.compute_geometry(&params, None);
    let node = build_scene(
        &engine,
        &params,
        &geometry,
        None,
        &mut WallpaperCache::default(),
    )
    .unwrap();

    let Layer::Background(bg) = &node.layers[0] else {
        panic!("expected background first");
    };
    assert_eq!(bg.underlay, Some(Rgba8Premul::opaque(0, 0, 0)));
    assert!(matches!(
        &bg.fill,
        BackgroundFill::Wallpaper {
            pixels: crate::assets::store::WallpaperPixels::Unreadable(_),
            ..
        }
    ));
}

#[test]
fn malformed_gradient_is_rejected() {
    let engine = LayoutEngine::default();
    let mut params = EditorParameters::default();
    params.background = BackgroundSpec::Gradient("radial-gradient(red, blue)".into());
    let geometry = engine.compute_geometry(&params, None);
    let err = build_scene(
        &engine,
        &params,
        &geometry,
        None,
        &mut WallpaperCache::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        crate::foundation::error::ShotframeError::Validation(_)
    ));
}

#[test]
fn frame_radius_never_exceeds_half_the_short_side() {
    let engine = LayoutEngine::default();
    let mut params = EditorParameters::default();
    params.corner_radius_px = 50.0;
    let s = shot(60, 20);
    let geometry = engine.compute_geometry(&params, Some(s.intrinsics));
    let node = build_scene(
        &engine,
        &params,
        &geometry,
        Some(&s),
        &mut WallpaperCache::default(),
    )
    .unwrap();
    let frame = node
        .layers
        .iter()
        .find_map(|l| match l {
            Layer::Frame(f) => Some(f),
            _ => None,
        })
        .unwrap();
    assert!((frame.radius_px - 10.0).abs() < 1e-9);
}
