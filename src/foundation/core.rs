use crate::foundation::error::{ShotframeError, ShotframeResult};

pub use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Size, Vec2};

/// Logical space available to the composition container (the browser viewport's analogue).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> ShotframeResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ShotframeError::validation(
                "viewport dimensions must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x800`.
    pub fn parse(s: &str) -> ShotframeResult<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| ShotframeError::validation(format!("viewport '{s}' is not WxH")))?;
        let w = w
            .trim()
            .parse::<f64>()
            .map_err(|e| ShotframeError::validation(format!("viewport width: {e}")))?;
        let h = h
            .trim()
            .parse::<f64>()
            .map_err(|e| ShotframeError::validation(format!("viewport height: {e}")))?;
        Self::new(w, h)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Black at `intensity` opacity, the colour of a CSS `rgba(0,0,0,i)` shadow.
    pub fn black_with_alpha(intensity: f64) -> Self {
        let a = (intensity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r: 0, g: 0, b: 0, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
