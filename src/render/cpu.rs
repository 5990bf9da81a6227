use std::sync::Arc;

use kurbo::Shape;

use crate::assets::decode::{DecodedImage, encode_png};
use crate::config::SurfaceOpts;
use crate::foundation::color::Color;
use crate::foundation::core::{Affine, BezPath, Point, Rect};
use crate::foundation::error::{PosterError, PosterResult};
use crate::model::descriptor::{LinearGradient, Paint};
use crate::render::surface::DrawingSurface;
use crate::text::font::TextShaper;
use crate::text::layout::TextMeasure;

#[derive(Clone, Copy, Debug)]
struct DrawState {
    transform: Affine,
    clip_depth: usize,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            clip_depth: 0,
        }
    }
}

/// CPU raster surface backed by `vello_cpu`, with `parley` text shaping.
///
/// Draw calls are recorded into a render context and rasterized on
/// [`export_png`](DrawingSurface::export_png).
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    clear_rgba: Option<[u8; 4]>,
    state: DrawState,
    stack: Vec<DrawState>,
    shaper: TextShaper,
}

impl CpuSurface {
    /// Create a surface of `width x height` device pixels.
    pub fn new(width: u32, height: u32, opts: SurfaceOpts) -> PosterResult<Self> {
        let to_u16 = |v: u32, name: &str| -> PosterResult<u16> {
            match u16::try_from(v) {
                Ok(px) if px > 0 => Ok(px),
                _ => Err(PosterError::context_creation(format!(
                    "surface {name} {v} is outside 1..={}",
                    u16::MAX
                ))),
            }
        };
        let w = to_u16(width, "width")?;
        let h = to_u16(height, "height")?;

        let mut shaper = TextShaper::new();
        for font in opts.fonts {
            shaper.register_font(font)?;
        }

        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            clear_rgba: opts.clear_rgba,
            state: DrawState::default(),
            stack: Vec::new(),
            shaper,
        })
    }

    fn canvas_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    fn pop_clips_to(&mut self, depth: usize) {
        while self.state.clip_depth > depth {
            self.ctx.pop_layer();
            self.state.clip_depth -= 1;
        }
    }

    fn prepare_draw(&mut self) {
        self.ctx.set_transform(affine_to_cpu(self.state.transform));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    fn gradient_paint(
        &self,
        gradient: &LinearGradient,
        bounds: Rect,
    ) -> PosterResult<Option<(vello_cpu::Image, Point)>> {
        // Only the part of the path that can reach the canvas is rasterized.
        let visible = self
            .state
            .transform
            .inverse()
            .transform_rect_bbox(self.canvas_rect());
        let area = bounds.intersect(visible).expand();
        if area.width() < 1.0 || area.height() < 1.0 {
            return Ok(None);
        }
        let (w, h) = (area.width() as u32, area.height() as u32);

        let ramp = GradientRamp::new(gradient);
        let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
        for y in 0..h {
            for x in 0..w {
                let p = Point::new(
                    area.x0 + f64::from(x) + 0.5,
                    area.y0 + f64::from(y) + 0.5,
                );
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&ramp.at(p).to_rgba8_premul());
            }
        }
        let pixmap = pixmap_from_premul_bytes(&bytes, w, h)?;
        Ok(Some((
            vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            area.origin(),
        )))
    }
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl TextMeasure for CpuSurface {
    fn measure_text(&mut self, text: &str, font: &str) -> f64 {
        self.shaper.measure(text, font)
    }
}

impl DrawingSurface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn begin(&mut self) {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.state = DrawState::default();
        self.stack.clear();
        if let Some([r, g, b, a]) = self.clear_rgba {
            self.prepare_draw();
            self.ctx
                .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            self.ctx.fill_rect(&rect_to_cpu(self.canvas_rect()));
        }
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        let Some(prev) = self.stack.pop() else {
            return;
        };
        self.pop_clips_to(prev.clip_depth);
        self.state = prev;
    }

    fn rotate(&mut self, radians: f64) {
        self.state.transform = self.state.transform * Affine::rotate(radians);
    }

    fn clip(&mut self, path: &BezPath) {
        self.prepare_draw();
        self.ctx.push_clip_layer(&bezpath_to_cpu(path));
        self.state.clip_depth += 1;
    }

    fn fill_path(&mut self, path: &BezPath, paint: &Paint) {
        self.prepare_draw();
        match paint {
            Paint::Css(style) => {
                let [r, g, b, a] = parse_fill(style).to_rgba8();
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            }
            Paint::LinearGradient(gradient) => {
                match self.gradient_paint(gradient, path.bounding_box()) {
                    Ok(Some((image, origin))) => {
                        self.ctx.set_paint(image);
                        self.ctx
                            .set_paint_transform(vello_cpu::kurbo::Affine::translate((
                                origin.x, origin.y,
                            )));
                    }
                    Ok(None) => return,
                    Err(e) => {
                        tracing::warn!(error = %e, "gradient fill skipped");
                        return;
                    }
                }
            }
        }
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    fn fill_text(&mut self, text: &str, font: &str, fill_style: &str, x: f64, y: f64) {
        let Some(line) = self.shaper.shape(text, font) else {
            return;
        };
        self.prepare_draw();
        let [r, g, b, a] = parse_fill(fill_style).to_rgba8();
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));

        for layout_line in line.layout.lines() {
            for item in layout_line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let baseline = run.baseline();
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: x as f32 + g.x,
                    y: y as f32 + g.y - baseline,
                });
                self.ctx
                    .glyph_run(&line.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) -> PosterResult<()> {
        if image.width == 0 || image.height == 0 || dest.area() == 0.0 {
            return Ok(());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));

        let placement = self.state.transform
            * Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);
        self.ctx.set_transform(affine_to_cpu(placement));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        Ok(())
    }

    fn export_png(&mut self) -> PosterResult<Vec<u8>> {
        self.stack.clear();
        self.pop_clips_to(0);
        self.state = DrawState::default();

        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        encode_png(
            self.pixmap.data_as_u8_slice(),
            u32::from(self.width),
            u32::from(self.height),
        )
    }
}

fn parse_fill(style: &str) -> Color {
    Color::parse(style).unwrap_or_else(|e| {
        tracing::warn!(style, error = %e, "unparseable fill style, using black");
        Color::BLACK
    })
}

/// Color lookup along a linear gradient, clamped at both ends.
struct GradientRamp {
    start: Point,
    axis: kurbo::Vec2,
    len2: f64,
    stops: Vec<(f64, Color)>,
}

impl GradientRamp {
    fn new(gradient: &LinearGradient) -> Self {
        let mut stops: Vec<(f64, Color)> = gradient
            .stops
            .iter()
            .map(|s| (s.offset.clamp(0.0, 1.0), parse_fill(&s.color)))
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        let axis = gradient.end - gradient.start;
        Self {
            start: gradient.start,
            axis,
            len2: axis.hypot2(),
            stops,
        }
    }

    fn at(&self, p: Point) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::TRANSPARENT;
        };
        let t = if self.len2 > 0.0 {
            ((p - self.start).dot(self.axis) / self.len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        for pair in self.stops.windows(2) {
            let ((o0, c0), (o1, c1)) = (pair[0], pair[1]);
            if t <= o1 {
                let span = o1 - o0;
                let local = if span > 0.0 { (t - o0) / span } else { 1.0 };
                return c0.lerp(c1, local);
            }
        }
        last.1
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> PosterResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PosterError::geometry("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PosterError::geometry("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(PosterError::geometry("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
