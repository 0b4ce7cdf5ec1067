use crate::{
    composition::params::{
        BACKGROUND_BLUR_BOUNDS, CONTAINER_HEIGHT_BOUNDS, CONTAINER_WIDTH_BOUNDS,
        CORNER_RADIUS_BOUNDS, EditorParameters, ImageIntrinsics, SHADOW_INTENSITY_BOUNDS,
        SHADOW_SIZE_BOUNDS,
    },
    foundation::core::{Rect, Size, Viewport},
    layout::config::{HeightMode, LayoutConfig},
};

/// Drop shadow resolved from CSS `0 Npx 2Npx rgba(0,0,0,i)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ShadowGeometry {
    pub offset_y_px: f64,
    pub blur_radius_px: f64,
    pub intensity: f64,
}

impl ShadowGeometry {
    /// Gaussian standard deviation; a CSS blur radius is twice the sigma.
    pub fn sigma(&self) -> f64 {
        self.blur_radius_px * 0.5
    }

    pub fn is_visible(&self) -> bool {
        self.intensity > 0.0
    }
}

/// Oversized wrapper the background is painted into so blur never samples an empty edge.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BackgroundOverscan {
    pub inset_px: f64,
    /// Always `>= 1.0`; applied about the container centre.
    pub scale: f64,
    pub blur_px: f64,
    /// Container rect inflated by `inset_px` on all four sides.
    pub wrapper_rect: Rect,
}

/// Concrete geometry for one composition, in container-local logical pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderGeometry {
    pub frame_corner_radius_px: f64,
    pub frame_padding_percent: f64,
    /// Resolved padding on every side (CSS percentage padding resolves against width).
    pub padding_px: f64,
    pub container: Size,
    pub content_rect: Rect,
    /// Where the screenshot is drawn; `None` before an image is loaded.
    pub image_rect: Option<Rect>,
    /// Title bar over the top of the screenshot when window chrome is on.
    pub chrome_rect: Option<Rect>,
    pub shadow: ShadowGeometry,
    pub background: BackgroundOverscan,
}

impl RenderGeometry {
    pub fn container_rect(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.container)
    }
}

/// Turns editor parameters and image intrinsics into [`RenderGeometry`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutEngine {
    pub config: LayoutConfig,
    pub viewport: Viewport,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig, viewport: Viewport) -> Self {
        Self { config, viewport }
    }

    /// Pure and infallible; the same inputs always give the same geometry.
    #[tracing::instrument(level = "trace", skip(self, params))]
    pub fn compute_geometry(
        &self,
        params: &EditorParameters,
        intrinsics: Option<ImageIntrinsics>,
    ) -> RenderGeometry {
        let container = self.container_size(params);
        let frame_padding_percent = params.padding_bounds().clamp(params.padding_percent);
        let padding_px = container.width * frame_padding_percent / 100.0;

        let container_rect = Rect::from_origin_size((0.0, 0.0), container);
        let content_rect = inset_rect(container_rect, padding_px);

        let image_rect = intrinsics.map(|i| contain_centered(content_rect, i));
        let chrome_rect = match image_rect {
            Some(r) if params.show_window_chrome => Some(Rect::new(
                r.x0,
                r.y0,
                r.x1,
                r.y0 + self.config.chrome_bar_height_px.min(r.height()),
            )),
            _ => None,
        };

        let shadow_size = SHADOW_SIZE_BOUNDS.clamp(params.shadow_size_px);
        let shadow = ShadowGeometry {
            offset_y_px: shadow_size,
            blur_radius_px: shadow_size * 2.0,
            intensity: SHADOW_INTENSITY_BOUNDS.clamp(params.shadow_intensity),
        };

        let inset = self.config.overscan_inset_px.max(0.0);
        let background = BackgroundOverscan {
            inset_px: inset,
            scale: self.config.overscan_scale.max(1.0),
            blur_px: BACKGROUND_BLUR_BOUNDS.clamp(params.background_blur_px),
            wrapper_rect: container_rect.inflate(inset, inset),
        };

        let geometry = RenderGeometry {
            frame_corner_radius_px: CORNER_RADIUS_BOUNDS.clamp(params.corner_radius_px),
            frame_padding_percent,
            padding_px,
            container,
            content_rect,
            image_rect,
            chrome_rect,
            shadow,
            background,
        };
        tracing::trace!(?geometry.container, ?geometry.image_rect, "geometry computed");
        geometry
    }

    fn container_size(&self, params: &EditorParameters) -> Size {
        let cfg = &self.config;
        let width_pct = CONTAINER_WIDTH_BOUNDS.clamp(params.container_width_percent);
        let height_pct = CONTAINER_HEIGHT_BOUNDS.clamp(params.container_height_percent);

        let width = (self.viewport.width * width_pct / 100.0).min(cfg.max_width_px);
        let mut height = match cfg.height_mode {
            HeightMode::Fixed => cfg.reference_height_px,
            HeightMode::Percent => {
                (self.viewport.height * height_pct / 100.0).min(cfg.max_height_px)
            }
        };
        if self.viewport.width < cfg.narrow_breakpoint_px && width > 0.0 {
            height = height.min(cfg.narrow_max_area_px / width);
        }
        Size::new(width.max(0.0), height.max(0.0))
    }
}

fn inset_rect(r: Rect, by: f64) -> Rect {
    let by_x = by.min(r.width() * 0.5);
    let by_y = by.min(r.height() * 0.5);
    Rect::new(r.x0 + by_x, r.y0 + by_y, r.x1 - by_x, r.y1 - by_y)
}

/// Fit `intrinsics` inside `area` preserving aspect ratio, never upscaling, centred.
fn contain_centered(area: Rect, intrinsics: ImageIntrinsics) -> Rect {
    let iw = f64::from(intrinsics.width_px);
    let ih = f64::from(intrinsics.height_px);
    let scale = (area.width() / iw).min(area.height() / ih).min(1.0).max(0.0);
    let w = iw * scale;
    let h = ih * scale;
    let c = area.center();
    Rect::new(c.x - w * 0.5, c.y - h * 0.5, c.x + w * 0.5, c.y + h * 0.5)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
