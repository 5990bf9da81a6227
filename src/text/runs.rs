use crate::text::layout::TextMeasure;

/// A maximal piece of text sharing one font and fill, with its measured width.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub font: String,
    pub fill_style: String,
    pub width: f64,
}

/// Split `text` on `**emphasis**` markers.
///
/// A marker pair needs at least one non-asterisk character between the opening and closing
/// `**`. Markers are stripped; empty plain pieces are dropped. Each item is `(piece, emphasized)`.
pub fn split_emphasis(text: &str) -> Vec<(&str, bool)> {
    let mut out = Vec::new();
    let mut cursor = 0;
    let mut search = 0;

    while let Some(rel) = text[search..].find("**") {
        let open = search + rel;
        let body_start = open + 2;
        let body_end = text[body_start..].find('*').map(|i| body_start + i);
        match body_end {
            Some(end) if end > body_start && text[end..].starts_with("**") => {
                if open > cursor {
                    out.push((&text[cursor..open], false));
                }
                out.push((&text[body_start..end], true));
                cursor = end + 2;
                search = cursor;
            }
            _ => search = open + 1,
        }
    }

    if cursor < text.len() {
        out.push((&text[cursor..], false));
    }
    out
}

/// Split and measure `text` into styled runs.
pub fn styled_runs<M: TextMeasure + ?Sized>(
    measure: &mut M,
    text: &str,
    base: (&str, &str),
    highlight: (&str, &str),
) -> Vec<StyledRun> {
    split_emphasis(text)
        .into_iter()
        .map(|(piece, emphasized)| {
            let (font, fill_style) = if emphasized { highlight } else { base };
            StyledRun {
                text: piece.to_owned(),
                font: font.to_owned(),
                fill_style: fill_style.to_owned(),
                width: measure.measure_text(piece, font),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/text/runs.rs"]
mod tests;
