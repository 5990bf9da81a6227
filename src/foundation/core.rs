use crate::foundation::error::{PosterError, PosterResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Uniform scale factor between design units and device pixels.
///
/// Every length-valued input (position, size, border radius, line height, font size) is
/// multiplied by the ratio when a drawing call is issued. Angles and style strings pass through.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PixelRatio(f64);

impl PixelRatio {
    /// Create a validated ratio (finite and `> 0`).
    pub fn new(ratio: f64) -> PosterResult<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(PosterError::validation(format!(
                "pixel ratio must be finite and > 0, got {ratio}"
            )));
        }
        Ok(Self(ratio))
    }

    /// Raw ratio value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Convert a design-unit length into device pixels.
    pub fn scale(self, length: f64) -> f64 {
        length * self.0
    }

    /// Scale every `<number>px` token of a CSS font shorthand.
    ///
    /// `"bold 20px Arial"` at ratio 2 becomes `"bold 40px Arial"`. Anything that is not a
    /// pixel size (weights, family names, `em` sizes) is kept verbatim.
    pub fn scale_font(self, font: &str) -> String {
        let bytes = font.as_bytes();
        let mut out = String::with_capacity(font.len() + 4);
        let mut i = 0;
        let mut copied = 0;
        while i < bytes.len() {
            if !bytes[i].is_ascii_digit() {
                i += 1;
                continue;
            }
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                i += 1;
            }
            if !font[i..].starts_with("px") {
                continue;
            }
            let Ok(size) = font[start..i].parse::<f64>() else {
                continue;
            };
            out.push_str(&font[copied..start]);
            out.push_str(&format_px(self.scale(size)));
            copied = i;
        }
        out.push_str(&font[copied..]);
        out
    }
}

impl Default for PixelRatio {
    fn default() -> Self {
        Self(1.0)
    }
}

fn format_px(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Convert a rotation in degrees into radians, wrapping at a full turn first.
pub fn rotation_radians(degrees: f64) -> f64 {
    (degrees % 360.0).to_radians()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
