use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color with normalized `0..=1` channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    pub a: f64,
}

impl Color {
    /// Opaque black, the fallback for unparseable fill styles.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Build a color from normalized channels.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS color string (hex, `rgb()`, `hsl()`, `hwb()`, named colors, `transparent`).
    pub fn parse(s: &str) -> Result<Self, String> {
        let parsed = csscolorparser::parse(s.trim()).map_err(|e| format!("\"{s}\": {e}"))?;
        let [r, g, b, a] = parsed.to_array();
        Ok(Self::rgba(f64::from(r), f64::from(g), f64::from(b), f64::from(a)))
    }

    /// Straight-alpha RGBA8 bytes.
    pub fn to_rgba8(self) -> [u8; 4] {
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }

    /// Premultiplied RGBA8 bytes.
    pub fn to_rgba8_premul(self) -> [u8; 4] {
        let a = self.a.clamp(0.0, 1.0);
        [
            to_u8(self.r.clamp(0.0, 1.0) * a),
            to_u8(self.g.clamp(0.0, 1.0) * a),
            to_u8(self.b.clamp(0.0, 1.0) * a),
            to_u8(a),
        ]
    }

    /// Linear interpolation between two colors in straight-alpha space.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
