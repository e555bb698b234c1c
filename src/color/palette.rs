use crate::color::hsl::{hex_to_hsl, hue_difference, interpolate_color_hsl};
use crate::color::rgb::{Rgb8, interpolate_color};
use crate::foundation::error::{InkfolioError, InkfolioResult};

/// One palette entry; every field is a `#RRGGBB` string.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: String,
    pub primary_light: String,
    pub primary_dark: String,
    pub accent: String,
}

impl ThemeColors {
    pub fn new(primary: &str, primary_light: &str, primary_dark: &str, accent: &str) -> Self {
        Self {
            primary: primary.to_string(),
            primary_light: primary_light.to_string(),
            primary_dark: primary_dark.to_string(),
            accent: accent.to_string(),
        }
    }

    pub fn get(&self, property: ThemeProperty) -> &str {
        match property {
            ThemeProperty::Primary => &self.primary,
            ThemeProperty::PrimaryLight => &self.primary_light,
            ThemeProperty::PrimaryDark => &self.primary_dark,
            ThemeProperty::Accent => &self.accent,
        }
    }

    pub fn validate(&self) -> InkfolioResult<()> {
        for property in ThemeProperty::ALL {
            Rgb8::from_hex(self.get(property)).map_err(|_| {
                InkfolioError::color(format!(
                    "{} must be a #RRGGBB color, got {:?}",
                    property.key(),
                    self.get(property)
                ))
            })?;
        }
        Ok(())
    }
}

/// The four color slots of a theme record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeProperty {
    Primary,
    PrimaryLight,
    PrimaryDark,
    Accent,
}

impl ThemeProperty {
    pub const ALL: [ThemeProperty; 4] = [
        ThemeProperty::Primary,
        ThemeProperty::PrimaryLight,
        ThemeProperty::PrimaryDark,
        ThemeProperty::Accent,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::PrimaryLight => "primaryLight",
            Self::PrimaryDark => "primaryDark",
            Self::Accent => "accent",
        }
    }

    /// Custom property written on the document root.
    pub fn css_var(self) -> &'static str {
        match self {
            Self::Primary => "--theme-primary",
            Self::PrimaryLight => "--theme-primary-light",
            Self::PrimaryDark => "--theme-primary-dark",
            Self::Accent => "--theme-accent",
        }
    }
}

// primary, primaryLight, primaryDark, accent
const COLOR_PALETTE: [[&str; 4]; 12] = [
    ["#6366f1", "#818cf8", "#4f46e5", "#c7d2fe"],
    ["#8b5cf6", "#a78bfa", "#7c3aed", "#ddd6fe"],
    ["#ec4899", "#f472b6", "#db2777", "#fbcfe8"],
    ["#f43f5e", "#fb7185", "#e11d48", "#fecdd3"],
    ["#f97316", "#fb923c", "#ea580c", "#fed7aa"],
    ["#eab308", "#facc15", "#ca8a04", "#fef08a"],
    ["#84cc16", "#a3e635", "#65a30d", "#d9f99d"],
    ["#22c55e", "#4ade80", "#16a34a", "#bbf7d0"],
    ["#14b8a6", "#2dd4bf", "#0d9488", "#99f6e4"],
    ["#06b6d4", "#22d3ee", "#0891b2", "#a5f3fc"],
    ["#0ea5e9", "#38bdf8", "#0284c7", "#bae6fd"],
    ["#3b82f6", "#60a5fa", "#2563eb", "#bfdbfe"],
];

/// The built-in 12-entry cycle, indigo through blue.
pub fn default_palette() -> Vec<ThemeColors> {
    COLOR_PALETTE
        .iter()
        .map(|[p, l, d, a]| ThemeColors::new(p, l, d, a))
        .collect()
}

pub fn validate_palette(palette: &[ThemeColors]) -> InkfolioResult<()> {
    if palette.is_empty() {
        return Err(InkfolioError::validation("palette must not be empty"));
    }
    for (i, theme) in palette.iter().enumerate() {
        theme
            .validate()
            .map_err(|e| InkfolioError::color(format!("palette[{i}]: {e}")))?;
    }
    Ok(())
}

/// Greedy nearest-neighbour walk over primary hues, starting at the first entry.
pub fn sort_by_hue_similarity(palette: &[ThemeColors]) -> Vec<ThemeColors> {
    let mut remaining: Vec<(f64, &ThemeColors)> = palette
        .iter()
        .map(|t| (hex_to_hsl(&t.primary).h, t))
        .collect();
    let mut out = Vec::with_capacity(remaining.len());
    if remaining.is_empty() {
        return out;
    }

    let (mut hue, first) = remaining.remove(0);
    out.push(first.clone());
    while !remaining.is_empty() {
        let mut best = 0;
        for (i, (h, _)) in remaining.iter().enumerate() {
            if hue_difference(hue, *h) < hue_difference(hue, remaining[best].0) {
                best = i;
            }
        }
        let (h, theme) = remaining.remove(best);
        hue = h;
        out.push(theme.clone());
    }
    out
}

/// How two palette colors are blended during a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendModel {
    #[default]
    LinearRgb,
    /// Shortest-arc hue blend; opt-in.
    Hsl,
}

impl BlendModel {
    pub fn blend(self, a: &str, b: &str, t: f64) -> String {
        match self {
            Self::LinearRgb => interpolate_color(a, b, t),
            Self::Hsl => interpolate_color_hsl(a, b, t),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/palette.rs"]
mod tests;
