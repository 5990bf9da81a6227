use super::*;

/// Every char advances by the font's pixel size.
struct MonoMeasure;

impl TextMeasure for MonoMeasure {
    fn measure_text(&mut self, text: &str, font: &str) -> f64 {
        let px = font
            .split_whitespace()
            .find_map(|t| t.strip_suffix("px")?.parse::<f64>().ok())
            .unwrap_or(10.0);
        text.chars().count() as f64 * px
    }
}

fn block<'a>(text: &'a str, font: &'a str, width: f64) -> TextBlock<'a> {
    TextBlock {
        text,
        font,
        fill_style: "#000",
        highlight_font: font,
        highlight_fill_style: "#000",
        line_height: None,
        align: TextAlign::Left,
        ellipsis: "",
        lines: 1,
        x: 0.0,
        y: 0.0,
        width,
        rotate: 0.0,
    }
}

fn texts(items: &[TextItem]) -> Vec<&str> {
    items.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn highlight_then_plain_on_one_line() {
    let mut b = block("**VIP** user", "20px sans", 200.0);
    b.highlight_font = "bold 20px sans";
    b.highlight_fill_style = "#f00";
    let items = layout_text(&mut MonoMeasure, &b);

    assert_eq!(texts(&items), vec!["VIP", " user"]);
    assert_eq!(items[0].font, "bold 20px sans");
    assert_eq!(items[0].fill_style, "#f00");
    assert_eq!(items[1].font, "20px sans");
    assert_eq!(items[1].fill_style, "#000");
    assert_eq!(items[0].x, 0.0);
    assert_eq!(items[1].x, items[0].x + 60.0);
    assert!(items.iter().all(|t| t.y == 0.0));
}

#[test]
fn wraps_at_word_boundaries_and_truncates_last_line() {
    let mut b = block("aaaa bbbb cccc dddd eeee", "10px mono", 100.0);
    b.lines = 2;
    b.ellipsis = "...";
    b.y = 50.0;
    let items = layout_text(&mut MonoMeasure, &b);

    assert_eq!(texts(&items), vec!["aaaa bbbb ", "cccc ..."]);
    assert_eq!(items[0].y, 50.0);
    // Default line height is the width of one full-width glyph.
    assert_eq!(items[1].y, 60.0);
    assert!(items[1].text.ends_with("..."));
    assert_eq!(items[1].x, 0.0);
}

#[test]
fn never_emits_more_lines_than_allowed() {
    let long = "word ".repeat(40);
    let mut b = block(&long, "10px mono", 100.0);
    b.lines = 3;
    b.line_height = Some(14.0);
    let items = layout_text(&mut MonoMeasure, &b);

    let mut ys: Vec<f64> = items.iter().map(|t| t.y).collect();
    ys.dedup();
    assert_eq!(ys, vec![0.0, 14.0, 28.0]);
}

#[test]
fn latin_word_moves_to_next_line_whole() {
    let mut b = block("hello world", "10px mono", 80.0);
    b.lines = 2;
    let items = layout_text(&mut MonoMeasure, &b);
    assert_eq!(texts(&items), vec!["hello ", "world"]);
    assert_eq!(items[1].x, 0.0);
    assert_eq!(items[1].y, 10.0);
}

#[test]
fn unbreakable_word_on_last_line_is_dropped_with_no_ellipsis() {
    let mut b = block("abcdefghijkl", "10px mono", 50.0);
    b.ellipsis = "…";
    let items = layout_text(&mut MonoMeasure, &b);
    assert!(items.is_empty());
}

#[test]
fn full_last_line_gets_no_ellipsis_outside_the_box() {
    let mut b = block("**aaaaa**bbbbb", "10px mono", 50.0);
    b.ellipsis = "...";
    let items = layout_text(&mut MonoMeasure, &b);
    assert_eq!(texts(&items), vec!["aaaaa"]);
    assert_eq!(items[0].x, 0.0);
    assert!(items.iter().all(|t| t.x + 10.0 * t.text.len() as f64 <= 50.0));
}

#[test]
fn digits_are_cut_per_character() {
    let b = block("1234567890123", "10px mono", 100.0);
    let items = layout_text(&mut MonoMeasure, &b);
    assert_eq!(texts(&items), vec!["1234567890"]);
}

#[test]
fn center_alignment_splits_free_space_evenly() {
    let mut b = block("**VIP** user", "20px sans", 200.0);
    b.align = TextAlign::Center;
    let items = layout_text(&mut MonoMeasure, &b);

    assert_eq!(items[0].x, 20.0);
    assert_eq!(items[1].x, 80.0);
    let content = 60.0 + 100.0;
    let left = items[0].x;
    let right = 200.0 - (items[1].x + 100.0);
    assert_eq!(left, right);
    assert_eq!(left + content + right, 200.0);
}

#[test]
fn right_alignment_uses_full_offset() {
    let mut b = block("ab", "10px mono", 100.0);
    b.align = TextAlign::Right;
    b.x = 5.0;
    let items = layout_text(&mut MonoMeasure, &b);
    assert_eq!(items[0].x, 85.0);
}

#[test]
fn full_or_overflowing_lines_are_not_shifted() {
    let mut b = block("1234567890123", "10px mono", 100.0);
    b.align = TextAlign::Center;
    let items = layout_text(&mut MonoMeasure, &b);
    assert_eq!(items[0].x, 0.0);

    let mut b = block("12", "10px mono", 10.0);
    b.align = TextAlign::Right;
    let items = layout_text(&mut MonoMeasure, &b);
    assert_eq!(texts(&items), vec!["1"]);
    assert_eq!(items[0].x, 0.0);
}

#[test]
fn each_line_is_aligned_independently() {
    let mut b = block("aaaa bb", "10px mono", 60.0);
    b.lines = 2;
    b.align = TextAlign::Center;
    let items = layout_text(&mut MonoMeasure, &b);
    assert_eq!(texts(&items), vec!["aaaa ", "bb"]);
    assert_eq!(items[0].x, 5.0);
    assert_eq!(items[1].x, 20.0);
}

#[test]
fn empty_text_emits_nothing() {
    let b = block("", "10px mono", 100.0);
    assert!(layout_text(&mut MonoMeasure, &b).is_empty());
}

#[test]
fn shrink_to_fit_always_takes_a_step() {
    let (kept, rest) = shrink_to_fit(&mut MonoMeasure, "ab", "10px mono", 1000.0);
    assert_eq!((kept, rest), ("", "ab"));

    let (kept, rest) = shrink_to_fit(&mut MonoMeasure, "v1.2 ok", "10px mono", 40.0);
    assert_eq!((kept, rest), ("v1.2", " ok"));
}

#[test]
fn rotation_is_copied_to_every_fragment() {
    let mut b = block("aaaa bb", "10px mono", 60.0);
    b.lines = 2;
    b.rotate = 30.0;
    let items = layout_text(&mut MonoMeasure, &b);
    assert!(items.iter().all(|t| t.rotate == 30.0));
}
