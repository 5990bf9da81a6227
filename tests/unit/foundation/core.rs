use super::*;

#[test]
fn pixel_ratio_rejects_non_positive_and_non_finite() {
    assert!(PixelRatio::new(0.0).is_err());
    assert!(PixelRatio::new(-1.0).is_err());
    assert!(PixelRatio::new(f64::NAN).is_err());
    assert!(PixelRatio::new(f64::INFINITY).is_err());
    assert_eq!(PixelRatio::new(2.0).unwrap().get(), 2.0);
}

#[test]
fn scale_multiplies_lengths() {
    let r = PixelRatio::new(2.0).unwrap();
    assert_eq!(r.scale(10.0), 20.0);
    assert_eq!(r.scale(0.0), 0.0);
}

#[test]
fn scale_font_rewrites_pixel_sizes_only() {
    let r = PixelRatio::new(2.0).unwrap();
    assert_eq!(r.scale_font("20px Arial"), "40px Arial");
    assert_eq!(r.scale_font("bold 13px \"Noto Sans\""), "bold 26px \"Noto Sans\"");
    assert_eq!(r.scale_font("italic 1.5em serif"), "italic 1.5em serif");
    assert_eq!(r.scale_font("600 12.5px/20px Inter"), "600 25px/40px Inter");
}

#[test]
fn scale_font_keeps_fractional_results() {
    let r = PixelRatio::new(1.5).unwrap();
    assert_eq!(r.scale_font("15px sans"), "22.5px sans");
}

#[test]
fn rotation_wraps_before_converting() {
    assert!((rotation_radians(450.0) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert_eq!(rotation_radians(0.0), 0.0);
}
