use std::path::PathBuf;

use crate::{
    assets::{
        decode::{Screenshot, load_image},
        store::WallpaperCache,
    },
    composition::{
        background::{BackgroundSpec, LinearGradient},
        params::{EditorParameters, ParamChange},
    },
    export::{exporter::CompositionExporter, raster::RasterImage},
    foundation::{core::Viewport, error::ShotframeResult},
    layout::{
        auto_adjust::{AutoAdjustment, auto_adjust},
        config::LayoutConfig,
        engine::{LayoutEngine, RenderGeometry},
    },
    scene::{build::build_scene, node::RenderNode},
};

/// One editing session: parameters, the loaded screenshot and the geometry derived from them.
///
/// Geometry is recomputed after every change so it always matches the current state.
pub struct EditorSession {
    engine: LayoutEngine,
    params: EditorParameters,
    screenshot: Option<Screenshot>,
    geometry: RenderGeometry,
    wallpapers: WallpaperCache,
}

impl EditorSession {
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_viewport(config, Viewport::default())
    }

    pub fn with_viewport(config: LayoutConfig, viewport: Viewport) -> Self {
        let engine = LayoutEngine::new(config, viewport);
        let params = EditorParameters::default();
        let geometry = engine.compute_geometry(&params, None);
        Self {
            engine,
            params,
            screenshot: None,
            geometry,
            wallpapers: WallpaperCache::default(),
        }
    }

    /// Relative wallpaper paths resolve against `root`.
    pub fn with_wallpaper_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.wallpapers = WallpaperCache::new(root);
        self
    }

    /// Start from explicit parameters instead of the defaults. Values are clamped.
    pub fn with_params(mut self, params: EditorParameters) -> ShotframeResult<Self> {
        if let BackgroundSpec::Gradient(css) = &params.background {
            LinearGradient::parse(css)?;
        }
        self.params = params.clamped();
        self.recompute();
        Ok(self)
    }

    pub fn params(&self) -> &EditorParameters {
        &self.params
    }

    pub fn geometry(&self) -> &RenderGeometry {
        &self.geometry
    }

    pub fn screenshot(&self) -> Option<&Screenshot> {
        self.screenshot.as_ref()
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn wallpapers_mut(&mut self) -> &mut WallpaperCache {
        &mut self.wallpapers
    }

    /// Apply one control event. Malformed gradients are rejected and leave the session as it
    /// was; numeric values are clamped. Returns whether anything changed.
    pub fn apply(&mut self, change: ParamChange) -> ShotframeResult<bool> {
        if let ParamChange::Background(BackgroundSpec::Gradient(css)) = &change {
            LinearGradient::parse(css)?;
        }
        let changed = self.params.apply(change);
        if changed {
            self.recompute();
        }
        Ok(changed)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.engine.viewport = viewport;
        self.recompute();
    }

    /// Decode and install a new screenshot, then run the one-shot auto-adjust.
    ///
    /// A decode failure leaves the session untouched.
    pub async fn load_image(&mut self, bytes: Vec<u8>) -> ShotframeResult<AutoAdjustment> {
        let screenshot = load_image(bytes).await?;
        Ok(self.install(screenshot))
    }

    /// Synchronous variant of [`EditorSession::load_image`].
    pub fn load_image_blocking(&mut self, bytes: &[u8]) -> ShotframeResult<AutoAdjustment> {
        let screenshot = Screenshot::decode(bytes)?;
        Ok(self.install(screenshot))
    }

    fn install(&mut self, screenshot: Screenshot) -> AutoAdjustment {
        let adjusted = auto_adjust(&mut self.params, screenshot.intrinsics, &self.engine.config);
        self.screenshot = Some(screenshot);
        self.recompute();
        adjusted
    }

    /// The styled container the exporter captures.
    pub fn scene(&mut self) -> ShotframeResult<RenderNode> {
        build_scene(
            &self.engine,
            &self.params,
            &self.geometry,
            self.screenshot.as_ref(),
            &mut self.wallpapers,
        )
    }

    pub async fn export(&mut self, exporter: &CompositionExporter) -> ShotframeResult<RasterImage> {
        let mut node = self.scene()?;
        exporter.export(&mut node).await
    }

    fn recompute(&mut self) {
        self.geometry = self
            .engine
            .compute_geometry(&self.params, self.screenshot.as_ref().map(|s| s.intrinsics));
        tracing::debug!(
            width = self.geometry.container.width,
            height = self.geometry.container.height,
            "geometry recomputed"
        );
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
