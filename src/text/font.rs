use std::borrow::Cow;
use std::collections::HashSet;

use crate::foundation::error::{PosterError, PosterResult};

/// Size used when a font string carries no `px` size, as a canvas does.
pub const DEFAULT_FONT_PX: f32 = 10.0;

/// The parts of a CSS font shorthand the shaper uses.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub size_px: f32,
    /// Family names in preference order, quotes stripped.
    pub families: Vec<String>,
}

impl FontSpec {
    /// Parse `[style] [weight] <size>px[/<line-height>] <family>[, <family>]*`.
    ///
    /// Style and weight keywords are accepted and ignored. Malformed strings never fail: a missing
    /// size falls back to [`DEFAULT_FONT_PX`] and a missing family list to an empty one.
    pub fn parse(font: &str) -> Self {
        let mut rest = font.trim();
        let mut size_px = None;
        while let Some((token, tail)) = split_token(rest) {
            rest = tail;
            let size = token.split('/').next().unwrap_or(token);
            if let Some(px) = size.strip_suffix("px").and_then(|n| n.parse::<f32>().ok()) {
                size_px = Some(px);
                break;
            }
        }

        let (size_px, family_list) = match size_px {
            Some(px) if px.is_finite() && px > 0.0 => (px, rest),
            Some(_) => (DEFAULT_FONT_PX, rest),
            None => (DEFAULT_FONT_PX, ""),
        };
        let families = family_list
            .split(',')
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').to_owned())
            .filter(|f| !f.is_empty())
            .collect();
        Self { size_px, families }
    }
}

fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], &s[i..])),
        None => Some((s, "")),
    }
}

struct RegisteredFamily {
    name: String,
    data: vello_cpu::peniko::FontData,
}

/// A shaped single line plus the font it should be drawn with.
pub struct ShapedLine {
    pub layout: parley::Layout<()>,
    pub font: vello_cpu::peniko::FontData,
}

/// Parley contexts plus the families registered from caller-provided font files.
///
/// No system fonts are consulted; a family name that was not registered falls back to the
/// first registered family.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    families: Vec<RegisteredFamily>,
    warned: HashSet<String>,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: Vec::new(),
            warned: HashSet::new(),
        }
    }

    /// Register every family found in `font_bytes` (TTF/OTF). Returns the family names.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> PosterResult<Vec<String>> {
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.clone()),
            0,
        );
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        if families.is_empty() {
            return Err(PosterError::validation(
                "no font families registered from font bytes",
            ));
        }

        let mut names = Vec::with_capacity(families.len());
        for (id, _) in families {
            let name = self
                .font_ctx
                .collection
                .family_name(id)
                .ok_or_else(|| PosterError::validation("registered font family has no name"))?
                .to_owned();
            tracing::debug!(family = %name, "font registered");
            self.families.push(RegisteredFamily {
                name: name.clone(),
                data: data.clone(),
            });
            names.push(name);
        }
        Ok(names)
    }

    /// Names of all registered families, in registration order.
    pub fn family_names(&self) -> impl Iterator<Item = &str> {
        self.families.iter().map(|f| f.name.as_str())
    }

    fn pick_family(&mut self, spec: &FontSpec) -> Option<usize> {
        let found = spec.families.iter().find_map(|wanted| {
            self.families
                .iter()
                .position(|f| f.name.eq_ignore_ascii_case(wanted))
        });
        if found.is_some() {
            return found;
        }
        let key = spec.families.join(",");
        if self.families.is_empty() {
            if self.warned.insert(key) {
                tracing::warn!("no fonts registered; text is neither measured nor drawn");
            }
            return None;
        }
        if self.warned.insert(key) {
            tracing::warn!(
                requested = ?spec.families,
                fallback = %self.families[0].name,
                "unknown font family, using fallback"
            );
        }
        Some(0)
    }

    /// Shape `text` on one unbroken line.
    pub fn shape(&mut self, text: &str, font: &str) -> Option<ShapedLine> {
        let spec = FontSpec::parse(font);
        let family = self.pick_family(&spec)?;
        let RegisteredFamily { name, data } = &self.families[family];

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(spec.size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Some(ShapedLine {
            layout,
            font: data.clone(),
        })
    }

    /// Advance width of `text` including trailing whitespace; zero without fonts.
    pub fn measure(&mut self, text: &str, font: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        self.shape(text, font)
            .map(|line| f64::from(line.layout.full_width()))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
