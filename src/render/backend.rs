use crate::{foundation::error::ShotframeResult, scene::node::RenderNode};

/// Captured pixels of one render node.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Rasterizes a render node at a device scale factor.
///
/// The node's style already carries the export overrides when this is called. Output is
/// `round(w * scale) x round(h * scale)` of the node's rendered box.
pub trait CaptureBackend: Send {
    fn capture(&mut self, node: &RenderNode, scale: f64) -> ShotframeResult<FrameRGBA>;
}

#[derive(Clone, Copy, Debug, Default)]
pub enum BackendKind {
    #[default]
    Cpu,
}

#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Fill under everything; `None` leaves uncovered pixels transparent.
    pub clear_rgba: Option<[u8; 4]>,
}

pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> ShotframeResult<Box<dyn CaptureBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuCompositor::new(
            settings.clone(),
        ))),
    }
}
