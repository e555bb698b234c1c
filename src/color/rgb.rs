//! Hex/RGB conversion and the linear channel blend the theme cycle runs on.

use crate::animation::lerp::{Lerp, lerp_u8};
use crate::foundation::error::{InkfolioError, InkfolioResult};

/// An opaque 8-bit sRGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Strict `#rrggbb` parse; the leading `#` is optional.
    pub fn from_hex(hex: &str) -> InkfolioResult<Self> {
        parse_hex6(hex).ok_or_else(|| InkfolioError::color(format!("not a #RRGGBB color: {hex:?}")))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba::new(self, alpha)
    }

    /// True when all three channels are equal.
    pub fn is_gray(self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

impl Lerp for Rgb8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
        }
    }
}

/// Color plus straight (non-premultiplied) alpha in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub rgb: Rgb8,
    pub alpha: f64,
}

impl Rgba {
    pub fn new(rgb: Rgb8, alpha: f64) -> Self {
        Self {
            rgb,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Same color with alpha multiplied by `factor`.
    pub fn fade(self, factor: f64) -> Self {
        Self::new(self.rgb, self.alpha * factor)
    }

    /// CSS `rgba(r, g, b, a)` notation.
    pub fn css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}

/// Parse a six-digit hex color. Malformed input yields black rather than an error.
pub fn hex_to_rgb(hex: &str) -> Rgb8 {
    parse_hex6(hex).unwrap_or(Rgb8::BLACK)
}

/// Round each channel, clamp it into `0..=255`, and format as `#rrggbb`.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    Rgb8::new(channel(r), channel(g), channel(b)).to_hex()
}

/// Blend two hex colors channel by channel: `a + (b - a) * t`.
pub fn interpolate_color(a: &str, b: &str, t: f64) -> String {
    let a = hex_to_rgb(a);
    let b = hex_to_rgb(b);
    let mix = |x: u8, y: u8| f64::from(x) + (f64::from(y) - f64::from(x)) * t;
    rgb_to_hex(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Like [`hex_to_rgb`] but also accepts `#rgb` shorthand and reports failure.
pub fn parse_hex_loose(hex: &str) -> Option<Rgb8> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
        return parse_hex6(&expanded);
    }
    parse_hex6(digits)
}

fn parse_hex6(hex: &str) -> Option<Rgb8> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb8::new(byte(0)?, byte(2)?, byte(4)?))
}

fn channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/color/rgb.rs"]
mod tests;
