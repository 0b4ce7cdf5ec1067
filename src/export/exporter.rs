use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    export::raster::RasterImage,
    foundation::{
        core::Size,
        error::{ShotframeError, ShotframeResult},
    },
    render::backend::{BackendKind, CaptureBackend, RenderSettings, create_backend},
    scene::node::{Length, NodeStyle, Overflow, RenderNode},
};

pub const EXPORT_TIMEOUT_ENV: &str = "SHOTFRAME_EXPORT_TIMEOUT_MS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Export settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportOpts {
    /// Device pixels per logical pixel.
    pub scale_factor: f64,
    /// Upper bound on a single capture.
    pub timeout: Duration,
}

impl Default for ExportOpts {
    fn default() -> Self {
        let timeout = std::env::var(EXPORT_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self {
            scale_factor: 2.0,
            timeout,
        }
    }
}

impl ExportOpts {
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Scoped override of a node's style for capture.
///
/// Drop puts the previous style back, whichever way the capture ends.
pub(crate) struct StyleOverride<'a> {
    node: &'a mut RenderNode,
    saved: Option<NodeStyle>,
}

impl<'a> StyleOverride<'a> {
    /// Pin the node to `size` in px, lift max caps, square the corners and let overflow show.
    pub(crate) fn apply(node: &'a mut RenderNode, size: Size) -> Self {
        let capture_style = NodeStyle {
            width: Length::Px(size.width),
            height: Length::Px(size.height),
            max_width: None,
            max_height: None,
            border_radius_px: 0.0,
            overflow: Overflow::Visible,
        };
        let saved = std::mem::replace(&mut node.style, capture_style);
        Self {
            node,
            saved: Some(saved),
        }
    }

    pub(crate) fn node(&self) -> &RenderNode {
        self.node
    }
}

impl Drop for StyleOverride<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.node.style = saved;
        }
    }
}

/// Captures a render node into a PNG at a device scale factor.
///
/// At most one capture runs per exporter; later calls wait their turn.
pub struct CompositionExporter {
    opts: ExportOpts,
    backend: Arc<tokio::sync::Mutex<Box<dyn CaptureBackend>>>,
}

impl CompositionExporter {
    /// CPU backend, default options.
    pub fn new() -> ShotframeResult<Self> {
        Self::with_opts(ExportOpts::default())
    }

    pub fn with_opts(opts: ExportOpts) -> ShotframeResult<Self> {
        let backend = create_backend(BackendKind::Cpu, &RenderSettings::default())?;
        Ok(Self::with_backend(backend, opts))
    }

    pub fn with_backend(backend: Box<dyn CaptureBackend>, opts: ExportOpts) -> Self {
        Self {
            opts,
            backend: Arc::new(tokio::sync::Mutex::new(backend)),
        }
    }

    pub fn opts(&self) -> &ExportOpts {
        &self.opts
    }

    pub async fn export(&self, node: &mut RenderNode) -> ShotframeResult<RasterImage> {
        self.export_with_scale(node, self.opts.scale_factor).await
    }

    /// Snapshot the node's box, capture it with export styles applied, then restore.
    #[tracing::instrument(skip(self, node), fields(layers = node.layers.len()))]
    pub async fn export_with_scale(
        &self,
        node: &mut RenderNode,
        scale: f64,
    ) -> ShotframeResult<RasterImage> {
        let started = Instant::now();
        let result = self.capture(node, scale).await;
        match &result {
            Ok(img) => tracing::info!(
                width = img.width,
                height = img.height,
                bytes = img.png.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "export complete"
            ),
            Err(e) => tracing::warn!(error = %e, "export failed"),
        }
        result
    }

    async fn capture(&self, node: &mut RenderNode, scale: f64) -> ShotframeResult<RasterImage> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ShotframeError::export(
                "invalid scale factor",
                anyhow::anyhow!("scale must be finite and > 0, got {scale}"),
            ));
        }

        let mut backend = self.backend.clone().lock_owned().await;

        let size = node.rendered_size();
        let guard = StyleOverride::apply(node, size);
        let subject = guard.node().without_non_visual();
        let task = tokio::task::spawn_blocking(move || backend.capture(&subject, scale));

        let frame = match tokio::time::timeout(self.opts.timeout, task).await {
            Err(elapsed) => Err(ShotframeError::export(
                format!("capture timed out after {:?}", self.opts.timeout),
                elapsed,
            )),
            Ok(Err(join)) => Err(ShotframeError::export("capture task failed", join)),
            Ok(Ok(captured)) => captured.map_err(|e| e.into_export("capture failed")),
        };
        drop(guard);

        RasterImage::from_frame(frame?).map_err(|e| e.into_export("png encode failed"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
