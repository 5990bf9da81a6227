//! Queue-based poster and share-card compositor.
//!
//! A [`PosterRender`] collects drawing calls (rectangles, fitted images, wrapped text, QR code
//! images) into an ordered queue, then renders them in one pass:
//!
//! 1. **Queue**: `add_*` calls scale design units by the pixel ratio and append descriptors.
//!    Text is laid out immediately (emphasis runs, wrapping, ellipsis, alignment).
//! 2. **Resolve**: every distinct image source and QR payload is loaded concurrently; the
//!    pass fails as a whole if any load fails, leaving the queue untouched.
//! 3. **Composite**: descriptors are painted in queue order on a [`DrawingSurface`].
//! 4. **Export**: the surface is encoded as PNG and the queue is cleared.
//!
//! The default surface, [`CpuSurface`], rasterizes with `vello_cpu` and shapes text with
//! `parley` using caller-provided font files.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod document;
mod engine;
mod foundation;
mod geometry;
mod model;
mod render;
mod text;

pub use assets::decode::{DecodedImage, decode_image, encode_png, png_data_url};
pub use assets::loader::{DefaultLoader, ResourceLoader, decode_data_url};
pub use assets::resolver::{ResourceKey, ResourceTable, resolve_resources};
pub use config::{PosterConfig, SurfaceOpts};
pub use document::{DocumentItem, PosterDocument};
pub use engine::PosterRender;
pub use foundation::color::Color;
pub use foundation::core::{
    Affine, BezPath, PixelRatio, Point, Rect, Size, Vec2, rotation_radians,
};
pub use foundation::error::{PosterError, PosterResult};
pub use geometry::fit::resolve_fit;
pub use geometry::rounded::{effective_radius, rounded_rect_path};
pub use model::descriptor::{
    FitMode, GradientStop, ImageItem, LinearGradient, Paint, QrCodeItem, QrId, QrPayload,
    RectItem, RenderDescriptor, TextAlign, TextItem,
};
pub use model::queue::RenderQueue;
pub use render::compositor::composite;
pub use render::cpu::CpuSurface;
pub use render::surface::DrawingSurface;
pub use text::font::{DEFAULT_FONT_PX, FontSpec, ShapedLine, TextShaper};
pub use text::layout::{LINE_HEIGHT_REFERENCE, TextBlock, TextMeasure, layout_text, shrink_to_fit};
pub use text::runs::{StyledRun, split_emphasis, styled_runs};
pub use text::style::{HighlightStyle, TextStyle};
