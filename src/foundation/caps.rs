//! Device capability detection.
//!
//! Browser feature checks (`matchMedia`, `navigator.deviceMemory`, touch points)
//! are optional and may be missing. They are gathered once into a
//! [`DeviceProfile`] and consumed through the typed [`Capabilities`] trait, whose
//! default methods document each fallback.

/// Viewport width at or below which the layout counts as small.
pub const SMALL_VIEWPORT_MAX_WIDTH: f64 = 768.0;

const MOBILE_UA_TOKENS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Raw device signals. Every probe is optional; `None` means the platform did not
/// expose it.
pub trait Capabilities {
    fn prefers_reduced_motion(&self) -> Option<bool>;
    fn coarse_pointer(&self) -> Option<bool>;
    fn prefers_light_scheme(&self) -> Option<bool>;
    fn viewport_width(&self) -> Option<f64>;
    fn has_touch(&self) -> Option<bool>;
    fn user_agent(&self) -> Option<&str>;
    fn hardware_concurrency(&self) -> Option<u32>;
    fn device_memory_gb(&self) -> Option<f64>;

    /// Missing `matchMedia` reads as "no preference".
    fn reduces_motion(&self) -> bool {
        self.prefers_reduced_motion().unwrap_or(false)
    }

    /// Missing pointer media query reads as a fine pointer.
    fn is_coarse_pointer(&self) -> bool {
        self.coarse_pointer().unwrap_or(false)
    }

    /// Unknown width is treated as a large viewport.
    fn is_small_viewport(&self) -> bool {
        self.viewport_width()
            .is_some_and(|w| w <= SMALL_VIEWPORT_MAX_WIDTH)
    }

    fn prefers_light(&self) -> bool {
        self.prefers_light_scheme().unwrap_or(false)
    }

    /// Touch plus small screen, or a mobile user agent.
    fn is_mobile(&self) -> bool {
        let touch_small = self.has_touch().unwrap_or(false) && self.is_small_viewport();
        let mobile_ua = self.user_agent().is_some_and(|ua| {
            let ua = ua.to_ascii_lowercase();
            MOBILE_UA_TOKENS.iter().any(|t| ua.contains(t))
        });
        touch_small || mobile_ua
    }

    /// Two or fewer cores (unknown counts as 2), at most 4 GB reported memory, or
    /// a mobile device.
    fn is_low_performance(&self) -> bool {
        let low_cores = self.hardware_concurrency().unwrap_or(2) <= 2;
        let low_memory = self.device_memory_gb().is_some_and(|gb| gb <= 4.0);
        low_cores || low_memory || self.is_mobile()
    }

    /// Any of reduced motion, coarse pointer or a small viewport.
    fn prefers_static_theme(&self) -> bool {
        self.reduces_motion() || self.is_coarse_pointer() || self.is_small_viewport()
    }
}

/// One-time snapshot of device signals, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub prefers_reduced_motion: Option<bool>,
    pub coarse_pointer: Option<bool>,
    pub prefers_light_scheme: Option<bool>,
    pub viewport_width: Option<f64>,
    pub has_touch: Option<bool>,
    pub user_agent: Option<String>,
    pub hardware_concurrency: Option<u32>,
    pub device_memory_gb: Option<f64>,
}

impl DeviceProfile {
    /// A capable desktop: many cores, plenty of memory, wide fine-pointer screen.
    pub fn desktop() -> Self {
        Self {
            prefers_reduced_motion: Some(false),
            coarse_pointer: Some(false),
            prefers_light_scheme: Some(false),
            viewport_width: Some(1440.0),
            has_touch: Some(false),
            user_agent: Some("Mozilla/5.0 (X11; Linux x86_64)".to_string()),
            hardware_concurrency: Some(8),
            device_memory_gb: Some(16.0),
        }
    }

    pub fn phone() -> Self {
        Self {
            prefers_reduced_motion: Some(false),
            coarse_pointer: Some(true),
            prefers_light_scheme: Some(false),
            viewport_width: Some(390.0),
            has_touch: Some(true),
            user_agent: Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)".to_string()),
            hardware_concurrency: Some(6),
            device_memory_gb: None,
        }
    }
}

impl Capabilities for DeviceProfile {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.prefers_reduced_motion
    }

    fn coarse_pointer(&self) -> Option<bool> {
        self.coarse_pointer
    }

    fn prefers_light_scheme(&self) -> Option<bool> {
        self.prefers_light_scheme
    }

    fn viewport_width(&self) -> Option<f64> {
        self.viewport_width
    }

    fn has_touch(&self) -> Option<bool> {
        self.has_touch
    }

    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    fn hardware_concurrency(&self) -> Option<u32> {
        self.hardware_concurrency
    }

    fn device_memory_gb(&self) -> Option<f64> {
        self.device_memory_gb
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/caps.rs"]
mod tests;
