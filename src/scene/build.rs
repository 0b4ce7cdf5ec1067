use crate::{
    assets::{decode::Screenshot, store::WallpaperCache},
    composition::{
        background::{BackgroundSpec, LinearGradient},
        params::{CONTAINER_WIDTH_BOUNDS, EditorParameters},
    },
    foundation::core::{Rect, Rgba8Premul, Size},
    foundation::error::ShotframeResult,
    layout::{
        config::HeightMode,
        engine::{LayoutEngine, RenderGeometry},
    },
    scene::node::{
        BackgroundFill, BackgroundLayer, FrameLayer, Layer, Length, NodeStyle, Overflow,
        PlaceholderLayer, RenderNode, ShadowLayer, WindowChromeLayer,
    },
};

/// Corner rounding of the container in the live view. Export squares it off.
pub const LIVE_CONTAINER_RADIUS_PX: f64 = 8.0;

pub const EDITOR_STYLESHEET_HREF: &str = "styles/editor.css";

const CHROME_BAR: Rgba8Premul = Rgba8Premul {
    r: 0xE5,
    g: 0xE7,
    b: 0xEB,
    a: 0xFF,
};
const CHROME_DOTS: [Rgba8Premul; 3] = [
    Rgba8Premul {
        r: 0xEF,
        g: 0x44,
        b: 0x44,
        a: 0xFF,
    },
    Rgba8Premul {
        r: 0xEA,
        g: 0xB3,
        b: 0x08,
        a: 0xFF,
    },
    Rgba8Premul {
        r: 0x22,
        g: 0xC5,
        b: 0x5E,
        a: 0xFF,
    },
];

/// Assemble the styled container and its layers for one composition.
///
/// Wallpaper pixels are resolved here through `wallpapers`, so the node is self-contained
/// and capturing it does no IO. A malformed gradient is a validation error.
pub fn build_scene(
    engine: &LayoutEngine,
    params: &EditorParameters,
    geometry: &RenderGeometry,
    screenshot: Option<&Screenshot>,
    wallpapers: &mut WallpaperCache,
) -> ShotframeResult<RenderNode> {
    let mut layers = Vec::with_capacity(6);

    let fill = match &params.background {
        BackgroundSpec::Gradient(css) => BackgroundFill::Gradient(LinearGradient::parse(css)?),
        BackgroundSpec::ImageUrl(source) => BackgroundFill::Wallpaper {
            source: source.clone(),
            pixels: wallpapers.resolve(source),
        },
    };
    layers.push(Layer::Background(BackgroundLayer {
        fill,
        underlay: params
            .active_category
            .is_wallpaper()
            .then(|| Rgba8Premul::opaque(0, 0, 0)),
        wrapper_rect: geometry.background.wrapper_rect,
        scale: geometry.background.scale,
        blur_px: geometry.background.blur_px,
    }));

    match (screenshot, geometry.image_rect) {
        (Some(shot), Some(rect)) => {
            let radius_px = fit_radius(rect, geometry.frame_corner_radius_px);
            if geometry.shadow.is_visible() {
                layers.push(Layer::Shadow(ShadowLayer {
                    rect,
                    radius_px,
                    offset_y_px: geometry.shadow.offset_y_px,
                    sigma_px: geometry.shadow.sigma(),
                    color: Rgba8Premul::black_with_alpha(geometry.shadow.intensity),
                }));
            }
            layers.push(Layer::Frame(FrameLayer {
                rect,
                radius_px,
                image: shot.image.clone(),
            }));
            if let Some(bar) = geometry.chrome_rect {
                layers.push(Layer::WindowChrome(WindowChromeLayer {
                    rect: bar,
                    top_radius_px: radius_px,
                    bar: CHROME_BAR,
                    dots: CHROME_DOTS,
                    dot_diameter_px: 12.0,
                    dot_gap_px: 8.0,
                    inset_px: 8.0,
                }));
            }
        }
        _ => {
            let rect = geometry.content_rect;
            layers.push(Layer::Placeholder(PlaceholderLayer {
                rect,
                radius_px: fit_radius(rect, geometry.frame_corner_radius_px),
                fill: Rgba8Premul::from_straight_rgba(255, 255, 255, 51),
            }));
        }
    }

    layers.push(Layer::StylesheetLink {
        href: EDITOR_STYLESHEET_HREF.to_string(),
    });

    let cfg = &engine.config;
    let style = NodeStyle {
        width: Length::Percent(CONTAINER_WIDTH_BOUNDS.clamp(params.container_width_percent)),
        height: Length::Px(geometry.container.height),
        max_width: Some(cfg.max_width_px),
        max_height: match cfg.height_mode {
            HeightMode::Fixed => None,
            HeightMode::Percent => Some(cfg.max_height_px),
        },
        border_radius_px: LIVE_CONTAINER_RADIUS_PX,
        overflow: Overflow::Hidden,
    };

    let node = RenderNode {
        style,
        parent_box: Size::new(engine.viewport.width, engine.viewport.height),
        layers,
    };
    tracing::debug!(
        layers = ?node.layers.iter().map(Layer::kind).collect::<Vec<_>>(),
        cached_wallpapers = wallpapers.len(),
        width = geometry.container.width,
        height = geometry.container.height,
        "scene built"
    );
    Ok(node)
}

/// Corner radius no larger than half the shorter side.
fn fit_radius(rect: Rect, radius: f64) -> f64 {
    radius.min(rect.width() * 0.5).min(rect.height() * 0.5).max(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/build.rs"]
mod tests;
