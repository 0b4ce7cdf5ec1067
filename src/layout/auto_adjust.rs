use crate::{
    composition::params::{CORNER_RADIUS_BOUNDS, EditorParameters, ImageIntrinsics},
    layout::config::LayoutConfig,
};

/// Which one-shot corrections fired for a freshly loaded image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct AutoAdjustment {
    /// Corner radius was capped at half its maximum.
    pub radius_capped: bool,
    /// Padding was forced to half its maximum.
    pub padding_forced: bool,
}

impl AutoAdjustment {
    pub fn any(self) -> bool {
        self.radius_capped || self.padding_forced
    }
}

/// Correct parameters once per image load so extreme aspect ratios don't look broken.
///
/// Threshold rules, not a continuous fit: with `H` the reference height and
/// `W' = H * width / height`,
/// - `W' > wide_threshold` or `height > H` caps the corner radius at half its maximum;
/// - `height >= H` sets padding to exactly half of the active category's maximum.
///
/// This mutates `params`; it is deliberately not part of
/// [`LayoutEngine::compute_geometry`](crate::LayoutEngine::compute_geometry).
#[tracing::instrument(skip(params, config))]
pub fn auto_adjust(
    params: &mut EditorParameters,
    intrinsics: ImageIntrinsics,
    config: &LayoutConfig,
) -> AutoAdjustment {
    let h_ref = config.reference_height_px;
    let height = f64::from(intrinsics.height_px);
    let scaled_width = h_ref * intrinsics.aspect();

    let mut out = AutoAdjustment::default();

    if scaled_width > config.wide_threshold_px || height > h_ref {
        params.corner_radius_px = params
            .corner_radius_px
            .min(CORNER_RADIUS_BOUNDS.half_max());
        out.radius_capped = true;
    }

    if height >= h_ref {
        params.padding_percent = params.padding_bounds().half_max();
        out.padding_forced = true;
    }

    if out.any() {
        tracing::info!(
            scaled_width,
            corner_radius_px = params.corner_radius_px,
            padding_percent = params.padding_percent,
            "auto-adjusted parameters for image"
        );
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/auto_adjust.rs"]
mod tests;
