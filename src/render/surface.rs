use crate::assets::decode::DecodedImage;
use crate::foundation::core::{BezPath, Rect};
use crate::foundation::error::PosterResult;
use crate::model::descriptor::Paint;
use crate::text::layout::TextMeasure;

/// Fixed-size raster target the compositor paints on.
///
/// Mirrors a 2D canvas context: a current transform and clip that are pushed and popped with
/// [`save`](Self::save)/[`restore`](Self::restore), fills issued in device pixels, and
/// synchronous text measurement (through [`TextMeasure`]) for layout.
///
/// Style and font strings are handed over as given; interpreting them is up to the surface.
pub trait DrawingSurface: TextMeasure {
    /// Size in device pixels.
    fn size(&self) -> (u32, u32);

    /// Start a paint pass: reset transform and clip, and clear to the background.
    fn begin(&mut self);

    fn save(&mut self);

    /// Pop the state pushed by the matching [`save`](Self::save). Unbalanced calls are ignored.
    fn restore(&mut self);

    /// Rotate the whole coordinate space around the current origin.
    fn rotate(&mut self, radians: f64);

    /// Intersect the clip with `path`, given in current coordinates.
    fn clip(&mut self, path: &BezPath);

    fn fill_path(&mut self, path: &BezPath, paint: &Paint);

    /// Draw `text` with its alphabetic baseline starting at `(x, y)`.
    fn fill_text(&mut self, text: &str, font: &str, fill_style: &str, x: f64, y: f64);

    /// Draw `image` stretched onto `dest`.
    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) -> PosterResult<()>;

    /// Finish the pass and encode the pixels as PNG.
    fn export_png(&mut self) -> PosterResult<Vec<u8>>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
pub(crate) mod tests;
