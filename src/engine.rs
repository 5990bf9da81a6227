use std::path::Path;

use crate::assets::decode::png_data_url;
use crate::assets::loader::{DefaultLoader, ResourceLoader};
use crate::assets::resolver::resolve_resources;
use crate::config::{PosterConfig, SurfaceOpts};
use crate::foundation::core::PixelRatio;
use crate::foundation::error::PosterResult;
use crate::model::descriptor::{
    FitMode, ImageItem, Paint, QrCodeItem, QrId, QrPayload, RectItem, RenderDescriptor,
};
use crate::model::queue::RenderQueue;
use crate::render::compositor::composite;
use crate::render::cpu::CpuSurface;
use crate::render::surface::DrawingSurface;
use crate::text::layout::{TextBlock, layout_text};
use crate::text::style::TextStyle;

/// Poster composition engine.
///
/// `add_*` calls take design units, scale them by the pixel ratio and queue drawing
/// instructions. [`render`](Self::render) loads every referenced image concurrently, paints
/// the queue in order, and exports the surface. A failed render leaves the queue untouched.
pub struct PosterRender<S = CpuSurface, L = DefaultLoader> {
    ratio: PixelRatio,
    surface: S,
    loader: L,
    queue: RenderQueue,
    next_qr: u64,
}

impl PosterRender<CpuSurface, DefaultLoader> {
    /// Create an engine drawing on a `width*pixel_ratio x height*pixel_ratio` CPU surface.
    ///
    /// Relative file sources are read from the working directory.
    pub fn create(pixel_ratio: f64, width: f64, height: f64) -> PosterResult<Self> {
        Self::from_config(&PosterConfig::new(pixel_ratio, width, height), Path::new("."))
    }

    /// Create an engine from a config. Fonts and relative file sources resolve against
    /// `base_dir`.
    pub fn from_config(config: &PosterConfig, base_dir: &Path) -> PosterResult<Self> {
        let (w, h) = config.device_size()?;
        let opts: SurfaceOpts = config.surface_opts(base_dir)?;
        let surface = CpuSurface::new(w, h, opts)?;
        Self::with_parts(config.pixel_ratio, surface, DefaultLoader::new(base_dir))
    }
}

impl<S: DrawingSurface, L: ResourceLoader> PosterRender<S, L> {
    /// Assemble an engine from an existing surface and loader.
    pub fn with_parts(pixel_ratio: f64, surface: S, loader: L) -> PosterResult<Self> {
        Ok(Self {
            ratio: PixelRatio::new(pixel_ratio)?,
            surface,
            loader,
            queue: RenderQueue::new(),
            next_qr: 1,
        })
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.ratio.get()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Instructions queued since the last successful render, in paint order.
    pub fn descriptors(&self) -> &[RenderDescriptor] {
        self.queue.as_slice()
    }

    /// Queue a filled, optionally rounded rectangle.
    pub fn add_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: impl Into<Paint>,
        border_radius: f64,
    ) {
        let r = self.ratio;
        self.queue.push(RenderDescriptor::Rect(RectItem {
            x: r.scale(x),
            y: r.scale(y),
            width: r.scale(width),
            height: r.scale(height),
            style: style.into(),
            border_radius: r.scale(border_radius),
        }));
    }

    /// Queue an image. `source` is a URL, a file path or a `data:` URL.
    #[allow(clippy::too_many_arguments)]
    pub fn add_image(
        &mut self,
        source: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fit_mode: FitMode,
        border_radius: f64,
        rotate: f64,
    ) {
        let r = self.ratio;
        self.queue.push(RenderDescriptor::Image(ImageItem {
            source: source.into(),
            x: r.scale(x),
            y: r.scale(y),
            width: r.scale(width),
            height: r.scale(height),
            fit_mode,
            border_radius: r.scale(border_radius),
            rotate,
        }));
    }

    /// Queue a QR code image whose source is known now or later. Returns its key.
    pub fn add_qr_code(
        &mut self,
        payload: impl Into<QrPayload>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotate: f64,
    ) -> QrId {
        let id = QrId(self.next_qr);
        self.next_qr += 1;
        let r = self.ratio;
        self.queue.push(RenderDescriptor::QrCode(QrCodeItem {
            id,
            payload: payload.into(),
            x: r.scale(x),
            y: r.scale(y),
            width: r.scale(width),
            height: r.scale(height),
            rotate,
        }));
        id
    }

    /// Lay out `text` inside a box of `width` starting at baseline `(x, y)`.
    ///
    /// Returns the number of text fragments queued, which may be zero.
    pub fn add_text(
        &mut self,
        text: &str,
        style: &TextStyle,
        x: f64,
        y: f64,
        width: f64,
        rotate: f64,
    ) -> usize {
        let r = self.ratio;
        let font = r.scale_font(&style.font);
        let (highlight_font, highlight_fill) = match &style.highlight {
            Some(h) => (r.scale_font(&h.font), h.fill_style.as_str()),
            None => (font.clone(), style.fill_style.as_str()),
        };
        let block = TextBlock {
            text,
            font: &font,
            fill_style: &style.fill_style,
            highlight_font: &highlight_font,
            highlight_fill_style: highlight_fill,
            line_height: style.line_height.map(|h| r.scale(h)),
            align: style.align,
            ellipsis: &style.text_ellipsis,
            lines: style.lines,
            x: r.scale(x),
            y: r.scale(y),
            width: r.scale(width),
            rotate,
        };

        let items = layout_text(&mut self.surface, &block);
        let count = items.len();
        tracing::debug!(fragments = count, "text laid out");
        self.queue.extend(items.into_iter().map(RenderDescriptor::Text));
        count
    }

    /// Load resources, paint the queue, and return the poster as PNG bytes.
    ///
    /// The queue is emptied only when the whole pass succeeded.
    #[tracing::instrument(skip_all, fields(items = self.queue.len()))]
    pub async fn render(&mut self) -> PosterResult<Vec<u8>> {
        let resources = resolve_resources(self.queue.as_slice(), &self.loader).await?;
        tracing::debug!(resources = resources.len(), "resources resolved");

        composite(self.queue.as_slice(), &resources, &mut self.surface)?;
        let png = self.surface.export_png()?;

        self.queue.clear();
        tracing::debug!(bytes = png.len(), "poster rendered");
        Ok(png)
    }

    /// Like [`render`](Self::render), returning a `data:image/png;base64,` URL.
    pub async fn render_data_url(&mut self) -> PosterResult<String> {
        let png = self.render().await?;
        Ok(png_data_url(&png))
    }
}

impl<S, L> std::fmt::Debug for PosterRender<S, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosterRender")
            .field("pixel_ratio", &self.ratio.get())
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
