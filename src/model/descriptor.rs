use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::foundation::core::Point;
use crate::foundation::error::{PosterError, PosterResult};

/// Policy for mapping a source image into a target box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Keep the source aspect ratio and fit the whole image inside the box.
    Contain,
    /// Keep the source aspect ratio and fill the whole box, overflowing if needed.
    Cover,
    /// Stretch the image to the box, ignoring its aspect ratio.
    #[default]
    Full,
}

/// Horizontal alignment of laid-out text lines inside their container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// No shift.
    #[default]
    Left,
    /// Shift by half the free space.
    Center,
    /// Shift by the full free space.
    Right,
}

/// One color stop of a [`LinearGradient`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    /// Position along the gradient axis in `0..=1`.
    pub offset: f64,
    /// CSS color string.
    pub color: String,
}

/// Linear gradient handle. Endpoints are in device pixels and are never scaled.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinearGradient {
    /// Gradient axis start.
    pub start: Point,
    /// Gradient axis end.
    pub end: Point,
    /// Color stops, sorted by offset when painted.
    pub stops: Vec<GradientStop>,
}

/// Fill for rectangles: a CSS color string or a gradient.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Paint {
    /// CSS color string, passed to the drawing surface uninterpreted.
    Css(String),
    /// Linear gradient.
    LinearGradient(LinearGradient),
}

impl From<&str> for Paint {
    fn from(value: &str) -> Self {
        Self::Css(value.to_owned())
    }
}

impl From<String> for Paint {
    fn from(value: String) -> Self {
        Self::Css(value)
    }
}

impl From<LinearGradient> for Paint {
    fn from(value: LinearGradient) -> Self {
        Self::LinearGradient(value)
    }
}

/// Opaque per-call key of a QR code descriptor. Only used to look up its loaded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QrId(pub(crate) u64);

impl std::fmt::Display for QrId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "qr-{:x}", self.0)
    }
}

type SharedPayload = Shared<BoxFuture<'static, Result<String, Arc<PosterError>>>>;

/// Image source of a QR code, available now or resolved later.
///
/// A deferred payload is shared, so a failed render can be retried without losing it.
#[derive(Clone)]
pub enum QrPayload {
    /// Source string that is already known.
    Ready(String),
    /// Future yielding the source string.
    Deferred(SharedPayload),
}

impl QrPayload {
    /// Wrap a future that yields the image source string of a QR code.
    pub fn deferred<F>(fut: F) -> Self
    where
        F: Future<Output = PosterResult<String>> + Send + 'static,
    {
        Self::Deferred(fut.map(|r| r.map_err(Arc::new)).boxed().shared())
    }

    /// Wait for the image source string.
    pub async fn resolve(&self) -> PosterResult<String> {
        match self {
            Self::Ready(s) => Ok(s.clone()),
            Self::Deferred(fut) => fut
                .clone()
                .await
                .map_err(|e| PosterError::load("qr payload", e.as_ref())),
        }
    }
}

impl std::fmt::Debug for QrPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(s) => f
                .debug_tuple("Ready")
                .field(&s.chars().take(32).collect::<String>())
                .finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<&str> for QrPayload {
    fn from(value: &str) -> Self {
        Self::Ready(value.to_owned())
    }
}

impl From<String> for QrPayload {
    fn from(value: String) -> Self {
        Self::Ready(value)
    }
}

/// Image draw instruction. Geometry is in device pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageItem {
    /// URL, file path or inline `data:` payload. Empty sources are skipped.
    pub source: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fit_mode: FitMode,
    pub border_radius: f64,
    /// Degrees.
    pub rotate: f64,
}

/// A single laid-out text fragment. Never contains emphasis markup.
#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    /// Baseline origin x.
    pub x: f64,
    /// Baseline origin y.
    pub y: f64,
    /// CSS font shorthand, already scaled to device pixels.
    pub font: String,
    pub fill_style: String,
    pub text: String,
    /// Degrees.
    pub rotate: f64,
}

/// QR code draw instruction; composited as a stretched image without rounding.
#[derive(Clone, Debug)]
pub struct QrCodeItem {
    pub id: QrId,
    pub payload: QrPayload,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees.
    pub rotate: f64,
}

impl QrCodeItem {
    /// The image instruction this QR code paints as.
    pub fn as_image(&self) -> ImageItem {
        ImageItem {
            source: String::new(),
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            fit_mode: FitMode::Full,
            border_radius: 0.0,
            rotate: self.rotate,
        }
    }
}

/// Filled rectangle instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct RectItem {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub style: Paint,
    pub border_radius: f64,
}

/// A single queued drawing instruction.
#[derive(Clone, Debug)]
pub enum RenderDescriptor {
    Image(ImageItem),
    Text(TextItem),
    QrCode(QrCodeItem),
    Rect(RectItem),
}

impl RenderDescriptor {
    /// Short tag used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Image(_) => "image",
            Self::Text(_) => "text",
            Self::QrCode(_) => "qr_code",
            Self::Rect(_) => "rect",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/descriptor.rs"]
mod tests;
