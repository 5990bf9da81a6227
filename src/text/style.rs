use crate::model::descriptor::TextAlign;

/// Font and fill used for `**emphasized**` spans.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HighlightStyle {
    pub font: String,
    pub fill_style: String,
}

/// Styling of one `add_text` call, in design units.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    /// CSS font shorthand, e.g. `"bold 20px Arial"`.
    pub font: String,
    /// CSS color string.
    pub fill_style: String,
    /// Distance between baselines. Defaults to the width of a full-width glyph in `font`.
    #[serde(default)]
    pub line_height: Option<f64>,
    #[serde(default)]
    pub align: TextAlign,
    /// Appended to the last line when the text is cut.
    #[serde(default)]
    pub text_ellipsis: String,
    /// Maximum number of lines.
    #[serde(default = "one_line")]
    pub lines: u32,
    /// Style of `**...**` spans. Falls back to the base style.
    #[serde(default)]
    pub highlight: Option<HighlightStyle>,
}

fn one_line() -> u32 {
    1
}

impl TextStyle {
    /// Single-line, left-aligned style without ellipsis or highlight.
    pub fn new(font: impl Into<String>, fill_style: impl Into<String>) -> Self {
        Self {
            font: font.into(),
            fill_style: fill_style.into(),
            line_height: None,
            align: TextAlign::Left,
            text_ellipsis: String::new(),
            lines: 1,
            highlight: None,
        }
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_lines(mut self, lines: u32) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.text_ellipsis = ellipsis.into();
        self
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = Some(line_height);
        self
    }

    pub fn with_highlight(
        mut self,
        font: impl Into<String>,
        fill_style: impl Into<String>,
    ) -> Self {
        self.highlight = Some(HighlightStyle {
            font: font.into(),
            fill_style: fill_style.into(),
        });
        self
    }
}
