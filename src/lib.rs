//! Shotframe frames screenshots: it places an image on a gradient or wallpaper background,
//! rounds and shadows it, and exports the composition as a lossless PNG.
//!
//! The flow is session-oriented:
//!
//! - Create an [`EditorSession`] and feed it control events ([`ParamChange`])
//! - Load a screenshot; parameters are auto-adjusted once for its aspect ratio
//! - Read the derived [`RenderGeometry`], or build the [`RenderNode`] scene
//! - Export through a [`CompositionExporter`] into a [`RasterImage`]
#![forbid(unsafe_code)]

mod assets;
mod composition;
mod export;
mod foundation;
mod layout;
mod render;
mod scene;
mod session;

pub use crate::foundation::core::{
    Affine, BezPath, Point, Rect, Rgba8Premul, RoundedRect, Size, Vec2, Viewport,
};
pub use crate::foundation::error::{ShotframeError, ShotframeResult};

pub use crate::assets::decode::{Screenshot, decode_image, load_image};
pub use crate::assets::store::{PreparedImage, WallpaperCache, WallpaperPixels};
pub use crate::composition::background::{
    BackgroundSpec, ColorStop, GradientDirection, LinearGradient, parse_color,
};
pub use crate::composition::params::{
    BACKGROUND_BLUR_BOUNDS, Bounds, CONTAINER_HEIGHT_BOUNDS, CONTAINER_WIDTH_BOUNDS,
    CORNER_RADIUS_BOUNDS, Category, EditorParameters, ImageIntrinsics, NumericField, ParamChange,
    SHADOW_INTENSITY_BOUNDS, SHADOW_SIZE_BOUNDS,
};
pub use crate::composition::presets::{DEFAULT_GRADIENT, GRADIENT_PRESETS, gradient_preset};
pub use crate::export::exporter::{CompositionExporter, EXPORT_TIMEOUT_ENV, ExportOpts};
pub use crate::export::raster::{EXPORT_FILE_NAME, RasterImage};
pub use crate::layout::auto_adjust::{AutoAdjustment, auto_adjust};
pub use crate::layout::config::{HeightMode, LayoutConfig};
pub use crate::layout::engine::{BackgroundOverscan, LayoutEngine, RenderGeometry, ShadowGeometry};
pub use crate::render::backend::{
    BackendKind, CaptureBackend, FrameRGBA, RenderSettings, create_backend,
};
pub use crate::render::blur::blur_rgba8_premul;
pub use crate::render::cpu::CpuCompositor;
pub use crate::scene::build::{EDITOR_STYLESHEET_HREF, LIVE_CONTAINER_RADIUS_PX, build_scene};
pub use crate::scene::node::{
    BackgroundFill, BackgroundLayer, FrameLayer, Layer, Length, NodeStyle, Overflow,
    PlaceholderLayer, RenderNode, ShadowLayer, WindowChromeLayer,
};
pub use crate::session::editor::EditorSession;
