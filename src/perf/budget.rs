use crate::foundation::caps::Capabilities;

/// Per-device caps for the intro's effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroBudget {
    pub max_raindrops: u32,
    pub max_smoke_particles: u32,
    pub max_splash_particles: u32,
    pub enable_reflection: bool,
    pub enable_mouse_interaction: bool,
}

impl IntroBudget {
    pub const DESKTOP: IntroBudget = IntroBudget {
        max_raindrops: 300,
        max_smoke_particles: 500,
        max_splash_particles: 100,
        enable_reflection: true,
        enable_mouse_interaction: true,
    };

    pub const LOW_PERFORMANCE: IntroBudget = IntroBudget {
        max_raindrops: 150,
        max_smoke_particles: 250,
        max_splash_particles: 50,
        enable_reflection: true,
        enable_mouse_interaction: true,
    };

    pub const MOBILE: IntroBudget = IntroBudget {
        max_raindrops: 100,
        max_smoke_particles: 150,
        max_splash_particles: 30,
        enable_reflection: false,
        enable_mouse_interaction: false,
    };

    /// Mobile wins over low-performance, which wins over desktop.
    pub fn for_device(caps: &dyn Capabilities) -> Self {
        if caps.is_mobile() {
            Self::MOBILE
        } else if caps.is_low_performance() {
            Self::LOW_PERFORMANCE
        } else {
            Self::DESKTOP
        }
    }
}

impl Default for IntroBudget {
    fn default() -> Self {
        Self::DESKTOP
    }
}
