use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::assets::loader::ResourceLoader;
use crate::config::PosterConfig;
use crate::engine::PosterRender;
use crate::foundation::error::{PosterError, PosterResult};
use crate::model::descriptor::{FitMode, Paint};
use crate::render::surface::DrawingSurface;
use crate::text::style::TextStyle;

/// JSON poster description: a canvas plus the `add_*` calls to replay, in paint order.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PosterDocument {
    pub canvas: PosterConfig,
    #[serde(default)]
    pub items: Vec<DocumentItem>,
}

/// One `add_*` call, in design units.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentItem {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: Paint,
        #[serde(default)]
        border_radius: f64,
    },
    Image {
        source: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        fit_mode: FitMode,
        #[serde(default)]
        border_radius: f64,
        #[serde(default)]
        rotate: f64,
    },
    Text {
        text: String,
        style: TextStyle,
        x: f64,
        y: f64,
        width: f64,
        #[serde(default)]
        rotate: f64,
    },
    /// QR code image; `source` is the already generated image reference.
    QrCode {
        source: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        rotate: f64,
    },
}

impl DocumentItem {
    fn kind(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Image { .. } => "image",
            Self::Text { .. } => "text",
            Self::QrCode { .. } => "qr_code",
        }
    }

    fn numbers(&self) -> Vec<f64> {
        match self {
            Self::Rect {
                x,
                y,
                width,
                height,
                border_radius,
                ..
            } => vec![*x, *y, *width, *height, *border_radius],
            Self::Image {
                x,
                y,
                width,
                height,
                border_radius,
                rotate,
                ..
            } => vec![*x, *y, *width, *height, *border_radius, *rotate],
            Self::Text {
                style,
                x,
                y,
                width,
                rotate,
                ..
            } => {
                let mut v = vec![*x, *y, *width, *rotate];
                v.extend(style.line_height);
                v
            }
            Self::QrCode {
                x,
                y,
                width,
                height,
                rotate,
                ..
            } => vec![*x, *y, *width, *height, *rotate],
        }
    }
}

impl PosterDocument {
    /// Parse and validate a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PosterResult<Self> {
        let doc: Self = serde_json::from_reader(r)
            .map_err(|e| PosterError::validation(format!("parse poster document JSON: {e}")))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse and validate a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PosterResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PosterError::validation(format!("open poster document '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> PosterResult<()> {
        self.canvas.validate()?;
        for (i, item) in self.items.iter().enumerate() {
            if item.numbers().iter().any(|v| !v.is_finite()) {
                return Err(PosterError::validation(format!(
                    "item {i} ({}) has a non-finite number",
                    item.kind()
                )));
            }
        }
        Ok(())
    }

    /// Create a CPU engine for the canvas; relative sources resolve against `base_dir`.
    pub fn engine(&self, base_dir: &Path) -> PosterResult<PosterRender> {
        PosterRender::from_config(&self.canvas, base_dir)
    }

    /// Replay every item onto `engine`. Returns the number of queued descriptors.
    pub fn apply<S: DrawingSurface, L: ResourceLoader>(
        &self,
        engine: &mut PosterRender<S, L>,
    ) -> usize {
        let before = engine.descriptors().len();
        for item in &self.items {
            match item {
                DocumentItem::Rect {
                    x,
                    y,
                    width,
                    height,
                    style,
                    border_radius,
                } => engine.add_rect(*x, *y, *width, *height, style.clone(), *border_radius),
                DocumentItem::Image {
                    source,
                    x,
                    y,
                    width,
                    height,
                    fit_mode,
                    border_radius,
                    rotate,
                } => engine.add_image(
                    source.as_str(),
                    *x,
                    *y,
                    *width,
                    *height,
                    *fit_mode,
                    *border_radius,
                    *rotate,
                ),
                DocumentItem::Text {
                    text,
                    style,
                    x,
                    y,
                    width,
                    rotate,
                } => {
                    engine.add_text(text, style, *x, *y, *width, *rotate);
                }
                DocumentItem::QrCode {
                    source,
                    x,
                    y,
                    width,
                    height,
                    rotate,
                } => {
                    engine.add_qr_code(source.as_str(), *x, *y, *width, *height, *rotate);
                }
            }
        }
        engine.descriptors().len() - before
    }
}

#[cfg(test)]
#[path = "../tests/unit/document.rs"]
mod tests;
