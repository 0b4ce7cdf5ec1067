use std::sync::Arc;

use crate::{
    assets::store::{PreparedImage, WallpaperPixels},
    composition::background::LinearGradient,
    foundation::core::{Rect, Rgba8Premul, Size},
};

/// A CSS-like length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f64),
    /// Percentage of the parent box along the same axis.
    Percent(f64),
}

impl Length {
    pub fn resolve(self, basis: f64) -> f64 {
        match self {
            Length::Px(v) => v,
            Length::Percent(p) => basis * p / 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    #[default]
    Hidden,
    Visible,
}

/// Sizing and clipping style of the captured container.
///
/// These are exactly the properties the exporter overrides and restores.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
    pub width: Length,
    pub height: Length,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    pub border_radius_px: f64,
    pub overflow: Overflow,
}

#[derive(Clone, Debug)]
pub enum BackgroundFill {
    Gradient(LinearGradient),
    Wallpaper {
        source: String,
        pixels: WallpaperPixels,
    },
}

#[derive(Clone, Debug)]
pub struct BackgroundLayer {
    pub fill: BackgroundFill,
    /// Painted under the fill (black for wallpaper categories).
    pub underlay: Option<Rgba8Premul>,
    /// Oversized rect the fill is laid out in, container-local.
    pub wrapper_rect: Rect,
    /// Scale about the container centre, applied before blur.
    pub scale: f64,
    /// CSS `filter: blur()` radius in logical px.
    pub blur_px: f64,
}

#[derive(Clone, Debug)]
pub struct ShadowLayer {
    /// Border box casting the shadow (before offset).
    pub rect: Rect,
    pub radius_px: f64,
    pub offset_y_px: f64,
    pub sigma_px: f64,
    pub color: Rgba8Premul,
}

#[derive(Clone, Debug)]
pub struct FrameLayer {
    pub rect: Rect,
    pub radius_px: f64,
    pub image: Arc<PreparedImage>,
}

#[derive(Clone, Debug)]
pub struct WindowChromeLayer {
    pub rect: Rect,
    /// Top corners follow the frame's radius so the bar stays inside the rounded frame.
    pub top_radius_px: f64,
    pub bar: Rgba8Premul,
    pub dots: [Rgba8Premul; 3],
    pub dot_diameter_px: f64,
    pub dot_gap_px: f64,
    pub inset_px: f64,
}

/// Empty-state panel shown in the content box until a screenshot is loaded.
#[derive(Clone, Debug)]
pub struct PlaceholderLayer {
    pub rect: Rect,
    pub radius_px: f64,
    pub fill: Rgba8Premul,
}

/// One entry in the container's paint order.
#[derive(Clone, Debug)]
pub enum Layer {
    Background(BackgroundLayer),
    Shadow(ShadowLayer),
    Frame(FrameLayer),
    WindowChrome(WindowChromeLayer),
    Placeholder(PlaceholderLayer),
    /// Linked stylesheet carried by the live view; contributes no pixels.
    StylesheetLink { href: String },
}

impl Layer {
    /// `false` for entries that only matter to the live view.
    pub fn is_visual(&self) -> bool {
        !matches!(self, Layer::StylesheetLink { .. })
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Layer::Background(_) => "background",
            Layer::Shadow(_) => "shadow",
            Layer::Frame(_) => "frame",
            Layer::WindowChrome(_) => "window_chrome",
            Layer::Placeholder(_) => "placeholder",
            Layer::StylesheetLink { .. } => "stylesheet_link",
        }
    }
}

/// The styled container the exporter captures, with its layers in paint order.
#[derive(Clone, Debug)]
pub struct RenderNode {
    pub style: NodeStyle,
    /// Box the container's percentage lengths resolve against.
    pub parent_box: Size,
    pub layers: Vec<Layer>,
}

impl RenderNode {
    /// The box the container actually occupies: styled lengths resolved against the parent,
    /// then capped by max-width/max-height.
    pub fn rendered_size(&self) -> Size {
        let mut w = self.style.width.resolve(self.parent_box.width);
        let mut h = self.style.height.resolve(self.parent_box.height);
        if let Some(max) = self.style.max_width {
            w = w.min(max);
        }
        if let Some(max) = self.style.max_height {
            h = h.min(max);
        }
        Size::new(w.max(0.0), h.max(0.0))
    }

    pub fn visual_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.is_visual())
    }

    /// Copy of this node with non-visual layers dropped.
    pub fn without_non_visual(&self) -> Self {
        Self {
            style: self.style.clone(),
            parent_box: self.parent_box,
            layers: self.visual_layers().cloned().collect(),
        }
    }
}
