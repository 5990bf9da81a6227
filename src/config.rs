use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::foundation::color::Color;
use crate::foundation::core::PixelRatio;
use crate::foundation::error::{PosterError, PosterResult};

/// Canvas settings of a poster.
///
/// `width` and `height` are in logical pixels; the drawing surface is `pixel_ratio` times larger.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PosterConfig {
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,
    pub width: f64,
    pub height: f64,
    /// Painted under every item; transparent when absent.
    #[serde(default)]
    pub background: Option<Color>,
    /// Font files registered for text, first one is the fallback family.
    #[serde(default)]
    pub fonts: Vec<PathBuf>,
}

fn default_pixel_ratio() -> f64 {
    1.0
}

impl PosterConfig {
    pub fn new(pixel_ratio: f64, width: f64, height: f64) -> Self {
        Self {
            pixel_ratio,
            width,
            height,
            background: None,
            fonts: Vec::new(),
        }
    }

    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PosterResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| PosterError::validation(format!("parse poster config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PosterResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PosterError::validation(format!("open poster config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> PosterResult<()> {
        PixelRatio::new(self.pixel_ratio)?;
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(PosterError::validation(format!(
                    "canvas {name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Surface size in device pixels, rounded to whole pixels.
    pub fn device_size(&self) -> PosterResult<(u32, u32)> {
        self.validate()?;
        let to_px = |v: f64| {
            let px = (v * self.pixel_ratio).round();
            if px < 1.0 || px > f64::from(u32::MAX) {
                return Err(PosterError::context_creation(format!(
                    "device size {px} is out of range"
                )));
            }
            Ok(px as u32)
        };
        Ok((to_px(self.width)?, to_px(self.height)?))
    }

    /// Build surface options, reading font files relative to `base_dir`.
    pub fn surface_opts(&self, base_dir: &Path) -> PosterResult<SurfaceOpts> {
        let mut opts =
            SurfaceOpts::default().with_clear_rgba(self.background.map(Color::to_rgba8));
        for rel in &self.fonts {
            let path = base_dir.join(rel);
            let bytes = std::fs::read(&path).map_err(|e| {
                PosterError::validation(format!("read font '{}': {e}", path.display()))
            })?;
            opts = opts.with_font(bytes);
        }
        Ok(opts)
    }
}

/// Options for [`crate::CpuSurface`].
#[derive(Clone, Debug, Default)]
pub struct SurfaceOpts {
    /// Straight-alpha RGBA painted at the start of every paint pass.
    pub clear_rgba: Option<[u8; 4]>,
    /// Raw TTF/OTF files to register for text shaping.
    pub fonts: Vec<Vec<u8>>,
}

impl SurfaceOpts {
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }

    pub fn with_font(mut self, font_bytes: Vec<u8>) -> Self {
        self.fonts.push(font_bytes);
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
