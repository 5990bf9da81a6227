use super::*;

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Begin,
    Save,
    Restore,
    Rotate(f64),
    Clip(Rect),
    FillPath(Rect, Paint),
    FillText {
        text: String,
        font: String,
        fill_style: String,
        x: f64,
        y: f64,
    },
    DrawImage {
        width: u32,
        height: u32,
        dest: Rect,
    },
    Export,
}

/// Surface double that records calls. Every char advances by the font's px size.
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    pub(crate) ops: Vec<Op>,
}

pub(crate) fn font_px(font: &str) -> f64 {
    font.split_whitespace()
        .find_map(|tok| tok.strip_suffix("px")?.parse::<f64>().ok())
        .unwrap_or(10.0)
}

impl TextMeasure for RecordingSurface {
    fn measure_text(&mut self, text: &str, font: &str) -> f64 {
        text.chars().count() as f64 * font_px(font)
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (100, 100)
    }

    fn begin(&mut self) {
        self.ops.push(Op::Begin);
    }

    fn save(&mut self) {
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }

    fn rotate(&mut self, radians: f64) {
        self.ops.push(Op::Rotate(radians));
    }

    fn clip(&mut self, path: &BezPath) {
        use kurbo::Shape;
        self.ops.push(Op::Clip(path.bounding_box()));
    }

    fn fill_path(&mut self, path: &BezPath, paint: &Paint) {
        use kurbo::Shape;
        self.ops.push(Op::FillPath(path.bounding_box(), paint.clone()));
    }

    fn fill_text(&mut self, text: &str, font: &str, fill_style: &str, x: f64, y: f64) {
        self.ops.push(Op::FillText {
            text: text.to_owned(),
            font: font.to_owned(),
            fill_style: fill_style.to_owned(),
            x,
            y,
        });
    }

    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) -> PosterResult<()> {
        self.ops.push(Op::DrawImage {
            width: image.width,
            height: image.height,
            dest,
        });
        Ok(())
    }

    fn export_png(&mut self) -> PosterResult<Vec<u8>> {
        self.ops.push(Op::Export);
        Ok(b"png".to_vec())
    }
}

#[test]
fn recorder_measures_by_font_size() {
    let mut s = RecordingSurface::default();
    assert_eq!(s.measure_text("abc", "bold 20px Arial"), 60.0);
    assert_eq!(s.measure_text("测", "12.5px sans"), 12.5);
    assert_eq!(s.measure_text("ab", "serif"), 20.0);
}
