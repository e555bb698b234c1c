use crate::foundation::caps::Capabilities;
use crate::foundation::storage::{KeyValueStore, read_or_none, write_quietly};
use crate::theme::sink::ThemeSink;

/// Storage key for the persisted light/dark choice.
pub const COLOR_MODE_KEY: &str = "colorMode";
/// Root attribute stylesheets key off.
pub const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Stored choice, else the device's light-scheme preference, else dark.
    pub fn resolve(store: &dyn KeyValueStore, caps: &dyn Capabilities) -> Self {
        if let Some(mode) = read_or_none(store, COLOR_MODE_KEY).and_then(|v| Self::parse(&v)) {
            return mode;
        }
        if caps.prefers_light() {
            Self::Light
        } else {
            Self::Dark
        }
    }

    pub fn apply(self, sink: &mut dyn ThemeSink) {
        sink.set_attribute(THEME_ATTRIBUTE, self.as_str());
    }

    pub fn persist(self, store: &mut dyn KeyValueStore) {
        write_quietly(store, COLOR_MODE_KEY, self.as_str());
    }

    /// Flip, persist and apply in one step; returns the new mode.
    pub fn toggle(self, store: &mut dyn KeyValueStore, sink: &mut dyn ThemeSink) -> Self {
        let next = self.toggled();
        next.persist(store);
        next.apply(sink);
        tracing::debug!(mode = next.as_str(), "color mode toggled");
        next
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/mode.rs"]
mod tests;
