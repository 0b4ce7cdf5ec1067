use std::sync::Arc;

use kurbo::{Circle, PathEl, RoundedRect, RoundedRectRadii, Shape};
use rayon::prelude::*;

use crate::{
    assets::store::{PreparedImage, WallpaperPixels},
    composition::background::LinearGradient,
    foundation::{
        core::{Affine, Point, Rect, Rgba8Premul},
        error::{ShotframeError, ShotframeResult},
        math::rgba8_len,
    },
    render::{
        backend::{CaptureBackend, FrameRGBA, RenderSettings},
        blur::blur_rgba8_premul,
        composite::{knockout_in_place, mask_in_place, over_in_place},
    },
    scene::node::{
        BackgroundFill, BackgroundLayer, FrameLayer, Layer, Overflow, PlaceholderLayer,
        RenderNode, ShadowLayer, WindowChromeLayer,
    },
};

/// Paints render nodes with `vello_cpu`, then blurs and composites in premultiplied RGBA8.
pub struct CpuCompositor {
    settings: RenderSettings,
    ctx: Option<vello_cpu::RenderContext>,
}

/// Device-pixel canvas for one capture.
#[derive(Clone, Copy, Debug)]
struct Target {
    width: u16,
    height: u16,
    scale: f64,
}

impl Target {
    fn base(&self) -> Affine {
        Affine::scale(self.scale)
    }

    fn len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height) * 4
    }
}

impl CpuCompositor {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ctx: None,
        }
    }

    /// Run `f` on a cleared context of the target size and return the rasterized pixels.
    fn paint<F>(&mut self, target: Target, f: F) -> Vec<u8>
    where
        F: FnOnce(&mut vello_cpu::RenderContext),
    {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == target.width && ctx.height() == target.height => ctx,
            _ => vello_cpu::RenderContext::new(target.width, target.height),
        };
        ctx.reset();
        ctx.set_transform(affine_to_cpu(target.base()));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        f(&mut ctx);

        let mut pixmap = vello_cpu::Pixmap::new(target.width, target.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);
        pixmap.data_as_u8_slice().to_vec()
    }

    fn draw_background(
        &mut self,
        target: Target,
        container: Rect,
        bg: &BackgroundLayer,
    ) -> ShotframeResult<Vec<u8>> {
        let centre = container.center();
        let content = scale_rect_about(bg.wrapper_rect, centre, bg.scale.max(1.0));

        let mut pixels = match &bg.fill {
            BackgroundFill::Gradient(g) => paint_gradient(target, content, g),
            BackgroundFill::Wallpaper { source, pixels } => match pixels {
                WallpaperPixels::Ready(img) => {
                    let (iw, ih) = (f64::from(img.width), f64::from(img.height));
                    let s = (content.width() / iw).max(content.height() / ih);
                    let img = drawable(img, iw * s * target.scale, ih * s * target.scale)?;
                    let paint = image_paint(&img)?;
                    let (iw, ih) = (f64::from(img.width), f64::from(img.height));
                    let s = (content.width() / iw).max(content.height() / ih);
                    let origin = Point::new(
                        content.center().x - iw * s * 0.5,
                        content.center().y - ih * s * 0.5,
                    );
                    let paint_xf = Affine::translate(origin.to_vec2()) * Affine::scale(s);
                    self.paint(target, |ctx| {
                        ctx.set_paint(paint);
                        ctx.set_paint_transform(affine_to_cpu(paint_xf));
                        ctx.fill_rect(&rect_to_cpu(content));
                    })
                }
                WallpaperPixels::Unreadable(reason) => {
                    return Err(ShotframeError::Other(anyhow::anyhow!(
                        "background image '{source}' could not be read: {reason}"
                    )));
                }
            },
        };

        if let Some(under) = bg.underlay {
            let mut base = solid(target, under);
            over_in_place(&mut base, &pixels, 1.0)?;
            pixels = base;
        }

        let sigma = (bg.blur_px * target.scale) as f32;
        if sigma > 0.0 {
            pixels = blur_rgba8_premul(
                &pixels,
                u32::from(target.width),
                u32::from(target.height),
                sigma,
            )?;
        }
        Ok(pixels)
    }

    fn draw_shadow(&mut self, target: Target, shadow: &ShadowLayer) -> ShotframeResult<Vec<u8>> {
        let cast = shadow.rect + kurbo::Vec2::new(0.0, shadow.offset_y_px);
        let color = shadow.color;
        let mut pixels = self.paint(target, |ctx| {
            ctx.set_paint(straight_color(color));
            ctx.fill_path(&shape_to_cpu(&RoundedRect::from_rect(cast, shadow.radius_px)));
        });

        let sigma = (shadow.sigma_px * target.scale) as f32;
        if sigma > 0.0 {
            pixels = blur_rgba8_premul(
                &pixels,
                u32::from(target.width),
                u32::from(target.height),
                sigma,
            )?;
        }

        // An outer box-shadow is never visible under its own border box.
        let border_box = RoundedRect::from_rect(shadow.rect, shadow.radius_px);
        let border_box = self.coverage(target, &border_box);
        knockout_in_place(&mut pixels, &border_box)?;
        Ok(pixels)
    }

    fn draw_frame(&mut self, target: Target, frame: &FrameLayer) -> ShotframeResult<Vec<u8>> {
        let image = drawable(
            &frame.image,
            frame.rect.width() * target.scale,
            frame.rect.height() * target.scale,
        )?;
        let paint = image_paint(&image)?;
        let sx = frame.rect.width() / f64::from(image.width);
        let sy = frame.rect.height() / f64::from(image.height);
        let paint_xf =
            Affine::translate(frame.rect.origin().to_vec2()) * Affine::scale_non_uniform(sx, sy);
        let shape = RoundedRect::from_rect(frame.rect, frame.radius_px);
        Ok(self.paint(target, |ctx| {
            ctx.set_paint(paint);
            ctx.set_paint_transform(affine_to_cpu(paint_xf));
            ctx.fill_path(&shape_to_cpu(&shape));
        }))
    }

    fn draw_chrome(&mut self, target: Target, chrome: &WindowChromeLayer) -> Vec<u8> {
        let r = chrome.top_radius_px;
        let bar = RoundedRect::from_rect(chrome.rect, RoundedRectRadii::new(r, r, 0.0, 0.0));
        let d = chrome.dot_diameter_px;
        let cy = chrome.rect.center().y;
        let dots: Vec<(Circle, Rgba8Premul)> = chrome
            .dots
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let cx = chrome.rect.x0
                    + chrome.inset_px
                    + d * 0.5
                    + i as f64 * (d + chrome.dot_gap_px);
                (Circle::new((cx, cy), d * 0.5), c)
            })
            .collect();
        let bar_color = chrome.bar;

        self.paint(target, |ctx| {
            ctx.set_paint(straight_color(bar_color));
            ctx.fill_path(&shape_to_cpu(&bar));
            for (circle, c) in &dots {
                ctx.set_paint(straight_color(*c));
                ctx.fill_path(&shape_to_cpu(circle));
            }
        })
    }

    fn draw_placeholder(&mut self, target: Target, p: &PlaceholderLayer) -> Vec<u8> {
        let shape = RoundedRect::from_rect(p.rect, p.radius_px);
        let fill = p.fill;
        self.paint(target, |ctx| {
            ctx.set_paint(straight_color(fill));
            ctx.fill_path(&shape_to_cpu(&shape));
        })
    }

    /// Opaque white wherever `shape` covers, for masking.
    fn coverage(&mut self, target: Target, shape: &impl Shape) -> Vec<u8> {
        let path = shape_to_cpu(shape);
        self.paint(target, |ctx| {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            ctx.fill_path(&path);
        })
    }
}

impl CaptureBackend for CpuCompositor {
    #[tracing::instrument(level = "debug", skip(self, node), fields(layers = node.layers.len()))]
    fn capture(&mut self, node: &RenderNode, scale: f64) -> ShotframeResult<FrameRGBA> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ShotframeError::validation("capture scale must be finite and > 0"));
        }
        let size = node.rendered_size();
        let target = Target {
            width: device_extent(size.width, scale, "width")?,
            height: device_extent(size.height, scale, "height")?,
            scale,
        };
        let len = rgba8_len(u32::from(target.width), u32::from(target.height))
            .ok_or_else(|| anyhow::anyhow!("capture buffer size overflow"))?;
        debug_assert_eq!(len, target.len());

        let container = Rect::from_origin_size((0.0, 0.0), size);
        let mut frame = match self.settings.clear_rgba {
            Some([r, g, b, a]) => solid(target, Rgba8Premul::from_straight_rgba(r, g, b, a)),
            None => vec![0u8; len],
        };

        for layer in node.visual_layers() {
            let pixels = match layer {
                Layer::Background(bg) => self.draw_background(target, container, bg)?,
                Layer::Shadow(s) => self.draw_shadow(target, s)?,
                Layer::Frame(f) => self.draw_frame(target, f)?,
                Layer::WindowChrome(c) => self.draw_chrome(target, c),
                Layer::Placeholder(p) => self.draw_placeholder(target, p),
                Layer::StylesheetLink { .. } => continue,
            };
            over_in_place(&mut frame, &pixels, 1.0)?;
        }

        if node.style.overflow == Overflow::Hidden && node.style.border_radius_px > 0.0 {
            let clip = self.coverage(
                target,
                &RoundedRect::from_rect(container, node.style.border_radius_px),
            );
            mask_in_place(&mut frame, &clip)?;
        }

        Ok(FrameRGBA {
            width: u32::from(target.width),
            height: u32::from(target.height),
            data: frame,
            premultiplied: true,
        })
    }
}

fn device_extent(logical: f64, scale: f64, axis: &str) -> ShotframeResult<u16> {
    let px = (logical * scale).round();
    if px.is_nan() || px < 1.0 {
        return Err(ShotframeError::validation(format!(
            "rendered {axis} is empty at scale {scale}"
        )));
    }
    if px > f64::from(u16::MAX) {
        return Err(ShotframeError::Other(anyhow::anyhow!(
            "rendered {axis} {px} exceeds u16"
        )));
    }
    Ok(px as u16)
}

fn solid(target: Target, c: Rgba8Premul) -> Vec<u8> {
    c.to_array().repeat(target.len() / 4)
}

/// Evaluate a CSS linear gradient laid out over `area` for every device pixel.
fn paint_gradient(target: Target, area: Rect, g: &LinearGradient) -> Vec<u8> {
    let angle = g.angle_deg(area.width(), area.height()).to_radians();
    let (dir_x, dir_y) = (angle.sin(), -angle.cos());
    let line_len = (area.width() * dir_x).abs() + (area.height() * dir_y).abs();
    let line_len = if line_len > f64::EPSILON { line_len } else { 1.0 };
    let c = area.center();
    let width = usize::from(target.width);

    let mut out = vec![0u8; target.len()];
    out.par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let ly = (y as f64 + 0.5) / target.scale;
            for x in 0..width {
                let lx = (x as f64 + 0.5) / target.scale;
                let t = ((lx - c.x) * dir_x + (ly - c.y) * dir_y) / line_len + 0.5;
                row[x * 4..x * 4 + 4].copy_from_slice(&g.sample(t));
            }
        });
    out
}

fn scale_rect_about(r: Rect, centre: Point, s: f64) -> Rect {
    let p0 = centre + (Point::new(r.x0, r.y0) - centre) * s;
    let p1 = centre + (Point::new(r.x1, r.y1) - centre) * s;
    Rect::from_points(p0, p1)
}

/// `vello_cpu` paints take straight-alpha colour.
fn straight_color(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    let mut px = c.to_array();
    crate::foundation::math::unpremultiply_rgba8_in_place(&mut px);
    vello_cpu::peniko::Color::from_rgba8(px[0], px[1], px[2], px[3])
}

/// Pixmap sides are `u16`; images past that are resampled to the device size they are drawn at.
fn drawable(
    img: &Arc<PreparedImage>,
    draw_w: f64,
    draw_h: f64,
) -> ShotframeResult<Arc<PreparedImage>> {
    let limit = u32::from(u16::MAX);
    if img.width <= limit && img.height <= limit {
        return Ok(Arc::clone(img));
    }
    let side = |v: f64| (v.ceil() as u32).clamp(1, limit);
    let (w, h) = (side(draw_w), side(draw_h));
    let src = image::RgbaImage::from_raw(img.width, img.height, img.rgba8_premul.to_vec())
        .ok_or_else(|| anyhow::anyhow!("prepared image byte length mismatch"))?;
    // Samples stay premultiplied through the resize.
    let resized = image::imageops::resize(&src, w, h, image::imageops::FilterType::Triangle);
    tracing::debug!(
        from_w = img.width,
        from_h = img.height,
        to_w = w,
        to_h = h,
        "oversized image resampled"
    );
    Ok(Arc::new(PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(resized.into_raw()),
    }))
}

fn image_paint(img: &Arc<PreparedImage>) -> ShotframeResult<vello_cpu::Image> {
    let pixmap = image_premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ShotframeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| anyhow::anyhow!("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| anyhow::anyhow!("image height exceeds u16"))?;
    if Some(rgba8_premul.len()) != rgba8_len(width, height) {
        return Err(anyhow::anyhow!("prepared image byte length mismatch").into());
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(rgba8_premul.len() / 4);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn shape_to_cpu(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
