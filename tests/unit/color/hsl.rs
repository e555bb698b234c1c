use super::*;

#[test]
fn primaries_convert_to_expected_hues() {
    assert_eq!(rgb_to_hsl(Rgb8::new(255, 0, 0)), Hsl::new(0.0, 100.0, 50.0));
    assert_eq!(rgb_to_hsl(Rgb8::new(0, 255, 0)), Hsl::new(120.0, 100.0, 50.0));
    assert_eq!(rgb_to_hsl(Rgb8::new(0, 0, 255)), Hsl::new(240.0, 100.0, 50.0));
}

#[test]
fn grays_have_no_saturation() {
    let hsl = rgb_to_hsl(Rgb8::new(64, 64, 64));
    assert_eq!(hsl.h, 0.0);
    assert_eq!(hsl.s, 0.0);
    assert_eq!(hsl_to_rgb(hsl), Rgb8::new(64, 64, 64));
}

#[test]
fn hsl_roundtrip_stays_within_one_step() {
    for hex in ["#6366f1", "#ec4899", "#84cc16", "#0ea5e9", "#ca8a04"] {
        let rgb = hex_to_rgb(hex);
        let back = hsl_to_rgb(rgb_to_hsl(rgb));
        assert!((i16::from(rgb.r) - i16::from(back.r)).abs() <= 1, "{hex}");
        assert!((i16::from(rgb.g) - i16::from(back.g)).abs() <= 1, "{hex}");
        assert!((i16::from(rgb.b) - i16::from(back.b)).abs() <= 1, "{hex}");
    }
}

#[test]
fn hue_difference_wraps() {
    assert_eq!(hue_difference(350.0, 10.0), 20.0);
    assert_eq!(hue_difference(10.0, 350.0), 20.0);
    assert_eq!(hue_difference(0.0, 180.0), 180.0);
}

#[test]
fn hsl_blend_takes_the_short_arc() {
    let a = Hsl::new(350.0, 50.0, 50.0);
    let b = Hsl::new(10.0, 70.0, 30.0);
    let mid = lerp_hsl(a, b, 0.5);
    assert!(mid.h.abs() < 1e-9 || (mid.h - 360.0).abs() < 1e-9);
    assert_eq!(mid.s, 60.0);
    assert_eq!(mid.l, 40.0);
}

#[test]
fn hsl_hex_blend_endpoints() {
    assert_eq!(interpolate_color_hsl("#ff0000", "#0000ff", 0.0), "#ff0000");
    assert_eq!(interpolate_color_hsl("#ff0000", "#0000ff", 1.0), "#0000ff");
}

#[test]
fn contrast_of_black_on_white_is_21() {
    let ratio = contrast_ratio(Rgb8::BLACK, Rgb8::WHITE);
    assert!((ratio - 21.0).abs() < 1e-9);
    assert!(meets_wcag_aa(Rgb8::BLACK, Rgb8::WHITE));
    assert!(!meets_wcag_aa(Rgb8::new(200, 200, 200), Rgb8::WHITE));
}
