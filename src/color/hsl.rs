use crate::color::rgb::{Rgb8, hex_to_rgb};

/// Hue in degrees `0..360`, saturation and lightness in percent `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Components rounded to whole degrees/percent.
    pub fn rounded(self) -> Self {
        Self::new(self.h.round(), self.s.round(), self.l.round())
    }
}

pub fn rgb_to_hsl(c: Rgb8) -> Hsl {
    let r = f64::from(c.r) / 255.0;
    let g = f64::from(c.g) / 255.0;
    let b = f64::from(c.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    Hsl::new(h * 60.0, s * 100.0, l * 100.0)
}

pub fn hsl_to_rgb(hsl: Hsl) -> Rgb8 {
    let h = hsl.h.rem_euclid(360.0) / 360.0;
    let s = (hsl.s / 100.0).clamp(0.0, 1.0);
    let l = (hsl.l / 100.0).clamp(0.0, 1.0);

    let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    if s == 0.0 {
        let v = to_u8(l);
        return Rgb8::new(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;
    Rgb8::new(
        to_u8(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_u8(hue_to_channel(p, q, h)),
        to_u8(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Rounded HSL of a hex color; malformed input reads as black.
pub fn hex_to_hsl(hex: &str) -> Hsl {
    rgb_to_hsl(hex_to_rgb(hex)).rounded()
}

/// Angular distance between two hues, `0..=180`.
pub fn hue_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Blend along the shorter hue arc; saturation and lightness blend linearly.
pub fn lerp_hsl(a: Hsl, b: Hsl, t: f64) -> Hsl {
    let dh = (b.h - a.h + 180.0).rem_euclid(360.0) - 180.0;
    Hsl::new(
        (a.h + dh * t).rem_euclid(360.0),
        a.s + (b.s - a.s) * t,
        a.l + (b.l - a.l) * t,
    )
}

/// Hex-in, hex-out HSL blend.
pub fn interpolate_color_hsl(a: &str, b: &str, t: f64) -> String {
    let a = rgb_to_hsl(hex_to_rgb(a));
    let b = rgb_to_hsl(hex_to_rgb(b));
    hsl_to_rgb(lerp_hsl(a, b, t)).to_hex()
}

/// WCAG 2 relative luminance.
pub fn relative_luminance(c: Rgb8) -> f64 {
    let lin = |v: u8| {
        let v = f64::from(v) / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * lin(c.r) + 0.7152 * lin(c.g) + 0.0722 * lin(c.b)
}

/// `(lighter + 0.05) / (darker + 0.05)`, in `1..=21`.
pub fn contrast_ratio(a: Rgb8, b: Rgb8) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

pub fn meets_wcag_aa(foreground: Rgb8, background: Rgb8) -> bool {
    contrast_ratio(foreground, background) >= 4.5
}

#[cfg(test)]
#[path = "../../tests/unit/color/hsl.rs"]
mod tests;
