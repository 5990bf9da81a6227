use std::collections::VecDeque;

use crate::model::descriptor::{TextAlign, TextItem};
use crate::text::runs::{StyledRun, styled_runs};

/// Glyph used to derive a default line height: full-width, about as wide as it is tall.
pub const LINE_HEIGHT_REFERENCE: &str = "测";

/// Synchronous text-width measurement, provided by the drawing surface.
pub trait TextMeasure {
    /// Advance width of `text` set in the CSS font shorthand `font`, in device pixels.
    fn measure_text(&mut self, text: &str, font: &str) -> f64;
}

/// One `add_text` call after scaling to device pixels.
#[derive(Clone, Debug)]
pub struct TextBlock<'a> {
    pub text: &'a str,
    pub font: &'a str,
    pub fill_style: &'a str,
    pub highlight_font: &'a str,
    pub highlight_fill_style: &'a str,
    /// `None` or a non-positive value measures [`LINE_HEIGHT_REFERENCE`] in `font`.
    pub line_height: Option<f64>,
    pub align: TextAlign,
    pub ellipsis: &'a str,
    pub lines: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub rotate: f64,
}

/// Lay out a text block into positioned single-style fragments.
///
/// Runs are packed greedily into lines of `block.width`. A run that does not fit is split at
/// the widest fitting prefix and the remainder starts the next line. On the last allowed line
/// the overflowing run is cut to leave room for the ellipsis, and nothing after it is laid out.
/// If no prefix of that run fits, the line ends without an ellipsis.
pub fn layout_text<M: TextMeasure + ?Sized>(
    measure: &mut M,
    block: &TextBlock<'_>,
) -> Vec<TextItem> {
    let line_height = match block.line_height {
        Some(h) if h > 0.0 => h,
        _ => measure.measure_text(LINE_HEIGHT_REFERENCE, block.font),
    };
    let max_lines = block.lines.max(1);

    let mut pending: VecDeque<StyledRun> = styled_runs(
        measure,
        block.text,
        (block.font, block.fill_style),
        (block.highlight_font, block.highlight_fill_style),
    )
    .into();

    let mut out = Vec::new();
    let mut line = LineBuffer::new(block.width, block.align);
    let mut current_width = 0.0;
    let mut current_line = 1;
    let mut current_y = block.y;

    while let Some(run) = pending.pop_front() {
        let fragment = |text: String, offset: f64, y: f64| TextItem {
            x: block.x + offset,
            y,
            font: run.font.clone(),
            fill_style: run.fill_style.clone(),
            text,
            rotate: block.rotate,
        };

        if current_width + run.width <= block.width {
            line.push(fragment(run.text.clone(), current_width, current_y));
            current_width += run.width;
            continue;
        }

        let remaining = block.width - current_width;
        if current_line >= max_lines {
            let ellipsis_width = if block.ellipsis.is_empty() {
                0.0
            } else {
                measure.measure_text(block.ellipsis, &run.font)
            };
            let (kept, _) =
                shrink_to_fit(measure, &run.text, &run.font, remaining - ellipsis_width);
            // An empty prefix means the line is already full: no lone ellipsis past the box.
            if !kept.is_empty() {
                let kept_width = measure.measure_text(kept, &run.font);
                line.push(fragment(
                    format!("{kept}{}", block.ellipsis),
                    current_width,
                    current_y,
                ));
                current_width += kept_width + ellipsis_width;
            }
            line.flush(current_width, &mut out);
            return out;
        }

        let (kept, rest) = shrink_to_fit(measure, &run.text, &run.font, remaining);
        if !kept.is_empty() {
            let kept_width = measure.measure_text(kept, &run.font);
            line.push(fragment(kept.to_owned(), current_width, current_y));
            current_width += kept_width;
        }
        line.flush(current_width, &mut out);

        if !rest.is_empty() {
            let width = measure.measure_text(rest, &run.font);
            pending.push_front(StyledRun {
                text: rest.to_owned(),
                font: run.font.clone(),
                fill_style: run.fill_style.clone(),
                width,
            });
        }
        current_y += line_height;
        current_width = 0.0;
        current_line += 1;
    }

    line.flush(current_width, &mut out);
    out
}

/// Cut `text` from the end until it is at most `limit` wide; returns `(kept, rest)`.
///
/// Each step removes either the whole trailing run of ASCII letters and periods or a single
/// other character, so Latin words are never broken. At least one step is always taken.
pub fn shrink_to_fit<'t, M: TextMeasure + ?Sized>(
    measure: &mut M,
    text: &'t str,
    font: &str,
    limit: f64,
) -> (&'t str, &'t str) {
    let mut kept = text;
    while let Some(last) = kept.chars().next_back() {
        kept = if is_word_char(last) {
            kept.trim_end_matches(is_word_char)
        } else {
            &kept[..kept.len() - last.len_utf8()]
        };
        if kept.is_empty() || measure.measure_text(kept, font) <= limit {
            break;
        }
    }
    (kept, &text[kept.len()..])
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '.'
}

/// Fragments of the line being built. They join the output only once the line width is known.
struct LineBuffer {
    container_width: f64,
    align: TextAlign,
    items: Vec<TextItem>,
}

impl LineBuffer {
    fn new(container_width: f64, align: TextAlign) -> Self {
        Self {
            container_width,
            align,
            items: Vec::new(),
        }
    }

    fn push(&mut self, item: TextItem) {
        self.items.push(item);
    }

    fn flush(&mut self, content_width: f64, out: &mut Vec<TextItem>) {
        let offset = self.container_width - content_width;
        let shift = match self.align {
            _ if offset <= 0.0 => 0.0,
            TextAlign::Left => 0.0,
            TextAlign::Center => offset / 2.0,
            TextAlign::Right => offset,
        };
        out.extend(self.items.drain(..).map(|mut item| {
            item.x += shift;
            item
        }));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
