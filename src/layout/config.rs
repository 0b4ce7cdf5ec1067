/// How the container's height is resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightMode {
    /// Always the reference height.
    #[default]
    Fixed,
    /// `container_height_percent` of the viewport height, capped at `max_height_px`.
    Percent,
}

impl HeightMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Some(HeightMode::Fixed),
            "percent" | "%" => Some(HeightMode::Percent),
            _ => None,
        }
    }
}

/// Constants of the adaptive layout. All lengths are logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed container height and the `H` of the auto-adjust rule.
    pub reference_height_px: f64,
    /// Auto-adjust caps the corner radius when the image, scaled to the reference height,
    /// would be wider than this.
    pub wide_threshold_px: f64,
    pub max_width_px: f64,
    pub max_height_px: f64,
    pub height_mode: HeightMode,
    /// Viewports narrower than this bound the container height by area.
    pub narrow_breakpoint_px: f64,
    pub narrow_max_area_px: f64,
    /// Extra background extent beyond the visible frame, per edge.
    pub overscan_inset_px: f64,
    /// Scale applied to the background content before blurring.
    pub overscan_scale: f64,
    /// Height of the optional window title bar.
    pub chrome_bar_height_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reference_height_px: 600.0,
            wide_threshold_px: 600.0,
            max_width_px: 1280.0,
            max_height_px: 1280.0,
            height_mode: HeightMode::Fixed,
            narrow_breakpoint_px: 768.0,
            narrow_max_area_px: 240_000.0,
            overscan_inset_px: 10.0,
            overscan_scale: 1.1,
            chrome_bar_height_px: 28.0,
        }
    }
}

impl LayoutConfig {
    pub fn with_height_mode(mut self, mode: HeightMode) -> Self {
        self.height_mode = mode;
        self
    }
}
