use super::*;

fn system_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

#[test]
fn parses_size_and_families() {
    let spec = FontSpec::parse("bold 20px/1.5 'PingFang SC', \"Helvetica Neue\" ,sans-serif");
    assert_eq!(spec.size_px, 20.0);
    assert_eq!(spec.families, ["PingFang SC", "Helvetica Neue", "sans-serif"]);

    let spec = FontSpec::parse("12.5px Arial");
    assert_eq!(spec.size_px, 12.5);
    assert_eq!(spec.families, ["Arial"]);
}

#[test]
fn malformed_font_strings_fall_back() {
    assert_eq!(
        FontSpec::parse("Arial"),
        FontSpec {
            size_px: DEFAULT_FONT_PX,
            families: vec![]
        }
    );
    assert_eq!(FontSpec::parse("0px x").size_px, DEFAULT_FONT_PX);
    assert!(FontSpec::parse("14px").families.is_empty());
    assert_eq!(FontSpec::parse("").size_px, DEFAULT_FONT_PX);
}

#[test]
fn without_fonts_nothing_is_shaped() {
    let mut shaper = TextShaper::new();
    assert!(shaper.shape("hello", "20px sans").is_none());
    assert_eq!(shaper.measure("hello", "20px sans"), 0.0);
}

#[test]
fn rejects_bytes_that_are_not_a_font() {
    let mut shaper = TextShaper::new();
    assert!(shaper.register_font(b"not a font".to_vec()).is_err());
    assert_eq!(shaper.family_names().count(), 0);
}

#[test]
fn measures_with_local_font_if_present() {
    let Some(bytes) = system_font() else {
        return;
    };
    let mut shaper = TextShaper::new();
    let names = shaper.register_font(bytes).unwrap();
    assert!(!names.is_empty());

    let one = shaper.measure("W", "20px whatever");
    let two = shaper.measure("WW", "20px whatever");
    assert!(one > 0.0);
    assert!((two - 2.0 * one).abs() < 0.5);
    assert!(shaper.measure("W", "40px whatever") > one * 1.5);
    // Trailing spaces count, as on a canvas.
    assert!(shaper.measure("W ", "20px whatever") > one);
}
