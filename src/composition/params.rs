use crate::{
    composition::background::BackgroundSpec,
    composition::presets::DEFAULT_GRADIENT,
    foundation::error::{ShotframeError, ShotframeResult},
};

/// Closed numeric range of a control.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp into the range; NaN maps to `min`.
    pub fn clamp(self, v: f64) -> f64 {
        if v.is_nan() {
            return self.min;
        }
        v.clamp(self.min, self.max)
    }

    pub fn contains(self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }

    /// Half of the upper bound, the coarse target used by auto-adjust.
    pub fn half_max(self) -> f64 {
        self.max * 0.5
    }
}

pub const CORNER_RADIUS_BOUNDS: Bounds = Bounds::new(0.0, 50.0);
pub const SHADOW_SIZE_BOUNDS: Bounds = Bounds::new(0.0, 50.0);
pub const SHADOW_INTENSITY_BOUNDS: Bounds = Bounds::new(0.0, 1.0);
pub const BACKGROUND_BLUR_BOUNDS: Bounds = Bounds::new(0.0, 20.0);
pub const CONTAINER_WIDTH_BOUNDS: Bounds = Bounds::new(50.0, 100.0);
pub const CONTAINER_HEIGHT_BOUNDS: Bounds = Bounds::new(50.0, 100.0);

/// Background catalogue the user is browsing; it also selects the padding range.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Gradient,
    #[serde(rename = "macos_wallpaper")]
    MacOsWallpaper,
    StockWallpaper,
}

impl Category {
    pub fn padding_bounds(self) -> Bounds {
        match self {
            Category::Gradient | Category::MacOsWallpaper => Bounds::new(0.0, 30.0),
            Category::StockWallpaper => Bounds::new(0.0, 20.0),
        }
    }

    /// Wallpaper categories paint black behind the image so letterboxing never shows through.
    pub fn is_wallpaper(self) -> bool {
        !matches!(self, Category::Gradient)
    }

    pub fn parse(s: &str) -> ShotframeResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gradient" | "gradients" => Ok(Category::Gradient),
            "macos" | "macos_wallpaper" | "macos-wallpaper" => Ok(Category::MacOsWallpaper),
            "stock" | "stock_wallpaper" | "stock-wallpaper" | "wallpaper" => {
                Ok(Category::StockWallpaper)
            }
            other => Err(ShotframeError::validation(format!(
                "unknown category '{other}'"
            ))),
        }
    }
}

/// Decoded pixel dimensions of the uploaded screenshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ImageIntrinsics {
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageIntrinsics {
    pub fn new(width_px: u32, height_px: u32) -> ShotframeResult<Self> {
        if width_px == 0 || height_px == 0 {
            return Err(ShotframeError::validation(
                "image intrinsics must be non-zero",
            ));
        }
        Ok(Self {
            width_px,
            height_px,
        })
    }

    pub fn aspect(self) -> f64 {
        f64::from(self.width_px) / f64::from(self.height_px)
    }
}

/// Everything the user can change from the control surface.
///
/// Owned by the editing session and never persisted. Values are kept inside their bounds by
/// [`EditorParameters::apply`] and [`EditorParameters::clamped`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorParameters {
    pub background: BackgroundSpec,
    pub padding_percent: f64,
    pub corner_radius_px: f64,
    pub shadow_size_px: f64,
    pub shadow_intensity: f64,
    pub background_blur_px: f64,
    pub container_width_percent: f64,
    pub container_height_percent: f64,
    pub active_category: Category,
    /// Draw a title bar with traffic-light dots over the top edge of the screenshot.
    pub show_window_chrome: bool,
}

impl Default for EditorParameters {
    fn default() -> Self {
        Self {
            background: BackgroundSpec::Gradient(DEFAULT_GRADIENT.to_string()),
            padding_percent: 0.0,
            corner_radius_px: 10.0,
            shadow_size_px: 20.0,
            shadow_intensity: 0.1,
            background_blur_px: 0.0,
            container_width_percent: 100.0,
            container_height_percent: 100.0,
            active_category: Category::Gradient,
            show_window_chrome: false,
        }
    }
}

/// Numeric controls exposed by the control surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Padding,
    CornerRadius,
    ShadowSize,
    ShadowIntensity,
    BackgroundBlur,
    ContainerWidth,
    ContainerHeight,
}

impl NumericField {
    pub const ALL: [NumericField; 7] = [
        NumericField::Padding,
        NumericField::CornerRadius,
        NumericField::ShadowSize,
        NumericField::ShadowIntensity,
        NumericField::BackgroundBlur,
        NumericField::ContainerWidth,
        NumericField::ContainerHeight,
    ];

    pub fn bounds(self, category: Category) -> Bounds {
        match self {
            NumericField::Padding => category.padding_bounds(),
            NumericField::CornerRadius => CORNER_RADIUS_BOUNDS,
            NumericField::ShadowSize => SHADOW_SIZE_BOUNDS,
            NumericField::ShadowIntensity => SHADOW_INTENSITY_BOUNDS,
            NumericField::BackgroundBlur => BACKGROUND_BLUR_BOUNDS,
            NumericField::ContainerWidth => CONTAINER_WIDTH_BOUNDS,
            NumericField::ContainerHeight => CONTAINER_HEIGHT_BOUNDS,
        }
    }
}

/// A `{field, newValue}` event from the control surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamChange {
    Numeric { field: NumericField, value: f64 },
    Category(Category),
    Background(BackgroundSpec),
    WindowChrome(bool),
}

impl EditorParameters {
    pub fn get(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Padding => self.padding_percent,
            NumericField::CornerRadius => self.corner_radius_px,
            NumericField::ShadowSize => self.shadow_size_px,
            NumericField::ShadowIntensity => self.shadow_intensity,
            NumericField::BackgroundBlur => self.background_blur_px,
            NumericField::ContainerWidth => self.container_width_percent,
            NumericField::ContainerHeight => self.container_height_percent,
        }
    }

    fn slot_mut(&mut self, field: NumericField) -> &mut f64 {
        match field {
            NumericField::Padding => &mut self.padding_percent,
            NumericField::CornerRadius => &mut self.corner_radius_px,
            NumericField::ShadowSize => &mut self.shadow_size_px,
            NumericField::ShadowIntensity => &mut self.shadow_intensity,
            NumericField::BackgroundBlur => &mut self.background_blur_px,
            NumericField::ContainerWidth => &mut self.container_width_percent,
            NumericField::ContainerHeight => &mut self.container_height_percent,
        }
    }

    pub fn padding_bounds(&self) -> Bounds {
        self.active_category.padding_bounds()
    }

    /// Apply one control event, clamping numeric values to the field's bounds.
    ///
    /// Returns `true` when the parameters actually changed.
    pub fn apply(&mut self, change: ParamChange) -> bool {
        let before = self.clone();
        match change {
            ParamChange::Numeric { field, value } => {
                let bounds = field.bounds(self.active_category);
                *self.slot_mut(field) = bounds.clamp(value);
            }
            ParamChange::Category(category) => {
                self.active_category = category;
                self.padding_percent = category.padding_bounds().clamp(self.padding_percent);
            }
            ParamChange::Background(spec) => self.background = spec,
            ParamChange::WindowChrome(on) => self.show_window_chrome = on,
        }
        *self != before
    }

    /// Copy with every numeric field pulled inside its bounds.
    pub fn clamped(&self) -> Self {
        let mut out = self.clone();
        for field in NumericField::ALL {
            let bounds = field.bounds(out.active_category);
            let v = bounds.clamp(out.get(field));
            *out.slot_mut(field) = v;
        }
        out
    }

    pub fn is_within_bounds(&self) -> bool {
        NumericField::ALL
            .iter()
            .all(|&f| f.bounds(self.active_category).contains(self.get(f)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/params.rs"]
mod tests;
