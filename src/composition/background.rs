use crate::{
    foundation::core::Rgba8Premul,
    foundation::error::{ShotframeError, ShotframeResult},
};

/// What fills the area behind the framed screenshot.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundSpec {
    /// A CSS `linear-gradient(...)` string.
    Gradient(String),
    /// A wallpaper location: a local path or `file://` URL. Remote URLs are accepted here but
    /// cannot be read back when the composition is captured.
    ImageUrl(String),
}

impl BackgroundSpec {
    /// Interpret a CSS background value: `url(...)` becomes a wallpaper, anything else a
    /// gradient.
    pub fn from_css(value: &str) -> Self {
        let v = value.trim();
        match v.strip_prefix("url(").and_then(|s| s.strip_suffix(')')) {
            Some(inner) => {
                BackgroundSpec::ImageUrl(inner.trim().trim_matches(['"', '\'']).to_string())
            }
            None => BackgroundSpec::Gradient(v.to_string()),
        }
    }
}

/// Direction of a linear gradient's line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientDirection {
    /// CSS angle: 0deg points up, 90deg points right.
    Angle(f64),
    /// `to <vertical> <horizontal>`; the resulting angle depends on the box aspect.
    Corner { right: bool, bottom: bool },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub color: Rgba8Premul,
    /// Position along the gradient line in [0, 1] after fix-up.
    pub offset: f64,
}

/// Parsed `linear-gradient(...)`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub direction: GradientDirection,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn parse(css: &str) -> ShotframeResult<Self> {
        let css = css.trim();
        let body = css
            .strip_prefix("linear-gradient(")
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| {
                ShotframeError::validation(format!("unsupported background '{css}'"))
            })?;

        let args = split_top_level(body);
        let mut args = args.iter().map(|s| s.trim()).peekable();

        let direction = match args.peek().and_then(|first| parse_direction(first)) {
            Some(d) => {
                args.next();
                d?
            }
            None => GradientDirection::Angle(180.0),
        };

        let mut raw = Vec::<(Rgba8Premul, Option<f64>)>::new();
        for arg in args {
            if arg.is_empty() {
                return Err(ShotframeError::validation("empty gradient color stop"));
            }
            raw.push(parse_stop(arg)?);
        }
        if raw.len() < 2 {
            return Err(ShotframeError::validation(
                "linear-gradient needs at least two color stops",
            ));
        }

        Ok(Self {
            direction,
            stops: resolve_stop_offsets(&raw),
        })
    }

    /// Gradient angle in degrees for a box of the given size.
    pub fn angle_deg(&self, width: f64, height: f64) -> f64 {
        match self.direction {
            GradientDirection::Angle(a) => a,
            GradientDirection::Corner { right, bottom } => {
                let sx = if right { 1.0 } else { -1.0 };
                let sy = if bottom { 1.0 } else { -1.0 };
                // Perpendicular to the diagonal through the two other corners.
                let dx = sx * height;
                let dy = sy * width;
                dx.atan2(-dy).to_degrees()
            }
        }
    }

    /// Premultiplied colour at gradient-line position `t`.
    pub fn sample(&self, t: f64) -> [u8; 4] {
        let first = self.stops[0];
        if t <= first.offset {
            return first.color.to_array();
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let u = if span <= f64::EPSILON {
                    1.0
                } else {
                    (t - a.offset) / span
                };
                let ca = a.color.to_array();
                let cb = b.color.to_array();
                let mut out = [0u8; 4];
                for c in 0..4 {
                    let v = f64::from(ca[c]) + (f64::from(cb[c]) - f64::from(ca[c])) * u;
                    out[c] = v.round().clamp(0.0, 255.0) as u8;
                }
                return out;
            }
        }
        self.stops[self.stops.len() - 1].color.to_array()
    }
}

fn parse_direction(arg: &str) -> Option<ShotframeResult<GradientDirection>> {
    let lower = arg.to_ascii_lowercase();
    if let Some(sides) = lower.strip_prefix("to ") {
        let mut right = None;
        let mut bottom = None;
        for word in sides.split_whitespace() {
            match word {
                "left" => right = Some(false),
                "right" => right = Some(true),
                "top" => bottom = Some(false),
                "bottom" => bottom = Some(true),
                other => {
                    return Some(Err(ShotframeError::validation(format!(
                        "unknown gradient side '{other}'"
                    ))));
                }
            }
        }
        let dir = match (right, bottom) {
            (Some(r), Some(b)) => GradientDirection::Corner {
                right: r,
                bottom: b,
            },
            (Some(true), None) => GradientDirection::Angle(90.0),
            (Some(false), None) => GradientDirection::Angle(270.0),
            (None, Some(true)) => GradientDirection::Angle(180.0),
            (None, Some(false)) => GradientDirection::Angle(0.0),
            (None, None) => {
                return Some(Err(ShotframeError::validation("gradient 'to' without side")));
            }
        };
        return Some(Ok(dir));
    }

    let units = [("deg", 1.0), ("turn", 360.0), ("rad", 180.0 / std::f64::consts::PI)];
    for (suffix, factor) in units {
        if let Some(num) = lower.strip_suffix(suffix) {
            return Some(
                num.trim()
                    .parse::<f64>()
                    .map(|v| GradientDirection::Angle(v * factor))
                    .map_err(|e| ShotframeError::validation(format!("gradient angle: {e}"))),
            );
        }
    }
    None
}

fn parse_stop(arg: &str) -> ShotframeResult<(Rgba8Premul, Option<f64>)> {
    // The colour may itself contain spaces (`rgb(1, 2, 3)`), so the position is the
    // trailing token only when it ends in '%'.
    if let Some((color, pos)) = arg.rsplit_once(char::is_whitespace)
        && let Some(pct) = pos.trim().strip_suffix('%')
    {
        let pct = pct
            .parse::<f64>()
            .map_err(|e| ShotframeError::validation(format!("stop position '{pos}': {e}")))?;
        return Ok((parse_color(color)?, Some(pct / 100.0)));
    }
    Ok((parse_color(arg)?, None))
}

/// Parse a CSS colour (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`, a few names).
pub fn parse_color(s: &str) -> ShotframeResult<Rgba8Premul> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    if let Some(body) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|b| b.strip_suffix(')'))
    {
        let parts: Vec<&str> = body
            .split([',', '/', ' '])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(ShotframeError::validation(format!("bad color '{s}'")));
        }
        let channel = |p: &str| -> ShotframeResult<u8> {
            let v = match p.strip_suffix('%') {
                Some(pct) => pct.parse::<f64>().map(|v| v * 2.55),
                None => p.parse::<f64>(),
            }
            .map_err(|e| ShotframeError::validation(format!("color channel '{p}': {e}")))?;
            Ok(v.round().clamp(0.0, 255.0) as u8)
        };
        let a = match parts.get(3) {
            Some(p) => {
                let v = match p.strip_suffix('%') {
                    Some(pct) => pct.parse::<f64>().map(|v| v / 100.0),
                    None => p.parse::<f64>(),
                }
                .map_err(|e| ShotframeError::validation(format!("alpha '{p}': {e}")))?;
                (v.clamp(0.0, 1.0) * 255.0).round() as u8
            }
            None => 255,
        };
        return Ok(Rgba8Premul::from_straight_rgba(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            a,
        ));
    }
    match lower.as_str() {
        "transparent" => Ok(Rgba8Premul::transparent()),
        "black" => Ok(Rgba8Premul::opaque(0, 0, 0)),
        "white" => Ok(Rgba8Premul::opaque(255, 255, 255)),
        "red" => Ok(Rgba8Premul::opaque(255, 0, 0)),
        "green" => Ok(Rgba8Premul::opaque(0, 128, 0)),
        "blue" => Ok(Rgba8Premul::opaque(0, 0, 255)),
        "gray" | "grey" => Ok(Rgba8Premul::opaque(128, 128, 128)),
        _ => Err(ShotframeError::validation(format!("unsupported color '{s}'"))),
    }
}

fn parse_hex(hex: &str) -> ShotframeResult<Rgba8Premul> {
    let bad = || ShotframeError::validation(format!("bad hex color '#{hex}'"));
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad());
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    let rgba = match hex.len() {
        3 => [nibble(0), nibble(1), nibble(2), Ok(255)],
        4 => [nibble(0), nibble(1), nibble(2), nibble(3)],
        6 => [byte(0), byte(2), byte(4), Ok(255)],
        8 => [byte(0), byte(2), byte(4), byte(6)],
        _ => return Err(bad()),
    };
    let [r, g, b, a] = rgba;
    let (r, g, b, a) = (
        r.map_err(|_| bad())?,
        g.map_err(|_| bad())?,
        b.map_err(|_| bad())?,
        a.map_err(|_| bad())?,
    );
    Ok(Rgba8Premul::from_straight_rgba(r, g, b, a))
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                out.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}

/// CSS stop fix-up: first/last default to 0/1, positions never decrease, and runs of
/// unpositioned stops are spread evenly between their positioned neighbours.
fn resolve_stop_offsets(raw: &[(Rgba8Premul, Option<f64>)]) -> Vec<ColorStop> {
    let n = raw.len();
    let mut pos: Vec<Option<f64>> = raw.iter().map(|(_, p)| *p).collect();
    if pos[0].is_none() {
        pos[0] = Some(0.0);
    }
    if pos[n - 1].is_none() {
        pos[n - 1] = Some(1.0);
    }

    let mut max_so_far = f64::NEG_INFINITY;
    for p in pos.iter_mut().flatten() {
        if *p < max_so_far {
            *p = max_so_far;
        }
        max_so_far = *p;
    }

    let mut i = 0;
    while i < n {
        if pos[i].is_some() {
            i += 1;
            continue;
        }
        let prev = i - 1;
        let mut next = i;
        while pos[next].is_none() {
            next += 1;
        }
        let (a, b) = (pos[prev].unwrap_or(0.0), pos[next].unwrap_or(1.0));
        let gaps = (next - prev) as f64;
        for (k, slot) in pos.iter_mut().enumerate().take(next).skip(i) {
            *slot = Some(a + (b - a) * ((k - prev) as f64) / gaps);
        }
        i = next;
    }

    raw.iter()
        .zip(pos)
        .map(|((color, _), p)| ColorStop {
            color: *color,
            offset: p.unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/composition/background.rs"]
mod tests;
