use super::*;
use crate::foundation::core::Size;
use crate::scene::node::{Length, NodeStyle};

fn node(w: f64, h: f64, radius: f64, layers: Vec<Layer>) -> RenderNode {
    RenderNode {
        style: NodeStyle {
            width: Length::Px(w),
            height: Length::Px(h),
            max_width: None,
            max_height: None,
            border_radius_px: radius,
            overflow: Overflow::Hidden,
        },
        parent_box: Size::new(w, h),
        layers,
    }
}

fn flat_background(w: f64, h: f64, css: &str) -> Layer {
    Layer::Background(BackgroundLayer {
        fill: BackgroundFill::Gradient(LinearGradient::parse(css).unwrap()),
        underlay: None,
        wrapper_rect: Rect::new(-10.0, -10.0, w + 10.0, h + 10.0),
        scale: 1.1,
        blur_px: 0.0,
    })
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn solid_image(w: u32, h: u32, rgba: [u8; 4]) -> Arc<PreparedImage> {
    Arc::new(PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(rgba.repeat((w * h) as usize)),
    })
}

#[test]
fn output_is_scaled_and_flat_gradient_fills_everything() {
    let mut cpu = CpuCompositor::new(RenderSettings::default());
    let n = node(
        40.0,
        30.0,
        0.0,
        vec![flat_background(
            40.0,
            30.0,
            "linear-gradient(#336699, #336699)",
        )],
    );
    let frame = cpu.capture(&n, 2.0).unwrap();
    assert_eq!((frame.width, frame.height), (80, 60));
    assert!(frame.premultiplied);
    assert!(
        frame
            .data
            .chunks_exact(4)
            .all(|p| p == [0x33, 0x66, 0x99, 0xFF])
    );
}

#[test]
fn horizontal_gradient_runs_left_to_right() {
    let mut cpu = CpuCompositor::new(RenderSettings::default());
    let n = node(
        100.0,
        20.0,
        0.0,
        vec![flat_background(
            100.0,
            20.0,
            "linear-gradient(to right, #000000, #ffffff)",
        )],
    );
    let frame = cpu.capture(&n, 1.0).unwrap();
    let left = px(&frame, 2, 10);
    let right = px(&frame, 97, 10);
    assert!(left[0] < right[0]);
    assert_eq!(left[3], 255);
}

#[test]
fn frame_draws_the_screenshot_into_its_rect() {
    let mut cpu = CpuCompositor::new(RenderSettings::default());
    let n = node(
        40.0,
        40.0,
        0.0,
        vec![
            flat_background(40.0, 40.0, "linear-gradient(#0000ff, #0000ff)"),
            Layer::Frame(FrameLayer {
                rect: Rect::new(10.0, 10.0, 30.0, 30.0),
                radius_px: 0.0,
                image: solid_image(10, 10, [255, 0, 0, 255]),
            }),
        ],
    );
    let frame = cpu.capture(&n, 1.0).unwrap();
    let inside = px(&frame, 20, 20);
    assert!(inside[0] >= 250 && inside[2] <= 5 && inside[3] == 255, "{inside:?}");
    assert_eq!(px(&frame, 3, 3), [0, 0, 255, 255]);
}

#[test]
fn rounded_container_clears_its_corners() {
    let mut cpu = CpuCompositor::new(RenderSettings::default());
    let n = node(
        40.0,
        40.0,
        12.0,
        vec![flat_background(
            40.0,
            40.0,
            "linear-gradient(#ffffff, #ffffff)",
        )],
    );
    let frame = cpu.capture(&n, 1.0).unwrap();
    assert_eq!(px(&frame, 0, 0)[3], 0);
    assert_eq!(px(&frame, 20, 20)[3], 255);
}

#[test]
fn shadow_is_knocked_out_under_its_border_box() {
    let mut cpu = CpuCompositor::new(RenderSettings::default());
    let n = node(
        60.0,
        60.0,
        0.0,
        vec![Layer::Shadow(ShadowLayer {
            rect: Rect::new(10.0, 10.0, 50.0, 40.0),
            radius_px: 0.0,
            offset_y_px: 6.0,
            sigma_px: 2.0,
            color: Rgba8Premul::black_with_alpha(1.0),
        })],
    );
    let frame = cpu.capture(&n, 1.0).unwrap();
    assert_eq!(px(&frame, 30, 25)[3], 0);
    assert!(px(&frame, 30, 43)[3] > 0);
    assert_eq!(px(&frame, 30, 2)[3], 0);
}

#[test]
fn unreadable_wallpaper_fails_the_capture() {
    let mut cpu = CpuCompositor::new(RenderSettings::default());
    let n = node(
        20.0,
        20.0,
        0.0,
        vec![Layer::Background(BackgroundLayer {
            fill: BackgroundFill::Wallpaper {
                source: "https://example.com/a.jpg".into(),
                pixels: WallpaperPixels::Unreadable("remote".into()),
            },
            underlay: Some(Rgba8Premul::opaque(0, 0, 0)),
            wrapper_rect: Rect::new(-10.0, -10.0, 30.0, 30.0),
            scale: 1.1,
            blur_px: 0.0,
        })],
    );
    let err = cpu.capture(&n, 1.0).unwrap_err();
    assert!(err.to_string().contains("could not be read"));
}

#[test]
fn wallpaper_cover_fits_without_gaps() {
    let mut cpu = CpuCompositor::new(RenderSettings::default());
    let n = node(
        50.0,
        20.0,
        0.0,
        vec![Layer::Background(BackgroundLayer {
            fill: BackgroundFill::Wallpaper {
                source: "mem://green".into(),
                pixels: WallpaperPixels::Ready(solid_image(8, 8, [0, 200, 0, 255])),
            },
            underlay: Some(Rgba8Premul::opaque(0, 0, 0)),
            wrapper_rect: Rect::new(-10.0, -10.0, 60.0, 30.0),
            scale: 1.1,
            blur_px: 4.0,
        })],
    );
    let frame = cpu.capture(&n, 1.0).unwrap();
    for (x, y) in [(0, 0), (49, 0), (0, 19), (49, 19), (25, 10)] {
        let p = px(&frame, x, y);
        assert!(p[0] <= 2 && p[1].abs_diff(200) <= 2 && p[3] == 255, "pixel ({x},{y}): {p:?}");
    }
}

#[test]
fn invalid_scale_and_oversized_targets_are_rejected() {
    let mut cpu = CpuCompositor::new(RenderSettings::default());
    let n = node(40.0, 40.0, 0.0, Vec::new());
    assert!(cpu.capture(&n, 0.0).is_err());
    assert!(cpu.capture(&n, f64::NAN).is_err());
    assert!(cpu.capture(&n, 5000.0).is_err());
}

#[test]
fn clear_color_shows_through_an_empty_node() {
    let mut cpu = CpuCompositor::new(RenderSettings {
        clear_rgba: Some([10, 20, 30, 255]),
    });
    let frame = cpu.capture(&node(4.0, 4.0, 0.0, Vec::new()), 1.0).unwrap();
    assert_eq!(px(&frame, 1, 1), [10, 20, 30, 255]);
}

#[test]
fn frame_wider_than_a_pixmap_is_resampled_to_its_rect() {
    let mut cpu = CpuCompositor::new(RenderSettings::default());
    let n = node(
        40.0,
        40.0,
        0.0,
        vec![
            flat_background(40.0, 40.0, "linear-gradient(#0000ff, #0000ff)"),
            Layer::Frame(FrameLayer {
                rect: Rect::new(0.0, 10.0, 40.0, 30.0),
                radius_px: 0.0,
                image: solid_image(70_000, 2, [255, 0, 0, 255]),
            }),
        ],
    );
    let frame = cpu.capture(&n, 2.0).unwrap();
    assert_eq!((frame.width, frame.height), (80, 80));
    let inside = px(&frame, 40, 40);
    assert!(inside[0] >= 250 && inside[2] <= 5 && inside[3] == 255, "{inside:?}");
    assert_eq!(px(&frame, 40, 4), [0, 0, 255, 255]);
}
