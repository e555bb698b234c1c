//! Virtual camera rising from ground level to eye level.

use crate::animation::ease::{Ease, ease_in_out_cubic};
use crate::animation::lerp::Lerp;
use crate::foundation::core::Millis;

/// `y` is 0 at the ground and 100 at eye level; `blur` is in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraState {
    pub y: f64,
    pub scale: f64,
    pub blur: f64,
}

impl CameraState {
    pub const GROUND: CameraState = CameraState {
        y: 0.0,
        scale: 1.2,
        blur: 2.0,
    };
    pub const RISING: CameraState = CameraState {
        y: 50.0,
        scale: 1.1,
        blur: 1.0,
    };
    pub const EYE_LEVEL: CameraState = CameraState {
        y: 100.0,
        scale: 1.0,
        blur: 0.0,
    };
    pub const SMOKE_ZOOM: CameraState = CameraState {
        y: 100.0,
        scale: 2.0,
        blur: 0.0,
    };
}

impl Lerp for CameraState {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            y: a.y + (b.y - a.y) * t,
            scale: a.scale + (b.scale - a.scale) * t,
            blur: a.blur + (b.blur - a.blur) * t,
        }
    }
}

/// Ground-to-eye-level state at rise `progress`, eased in-out cubic.
pub fn interpolate_camera_state(progress: f64) -> CameraState {
    let eased = ease_in_out_cubic(progress.clamp(0.0, 1.0));
    CameraState::lerp(&CameraState::GROUND, &CameraState::EYE_LEVEL, eased)
}

/// Vertical content shift in percent: 30 at the ground, 0 at eye level.
pub fn camera_y_to_shift_pct(camera_y: f64) -> f64 {
    (100.0 - camera_y) / 100.0 * 30.0
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraPhase {
    #[default]
    Idle,
    InkRain,
    CameraRise,
    SilhouetteSmoke,
    SmokeZoom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraEvent {
    RiseComplete,
}

/// What the scene container applies: `translateY(..%) scale(..)` plus a blur filter.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CameraTransform {
    pub translate_y_pct: f64,
    pub scale: f64,
    pub blur_px: f64,
}

const RETARGET_MS: Millis = 100.0;

/// Phase-driven camera with short eased hops between targets.
#[derive(Clone, Debug)]
pub struct CameraRig {
    rise_ms: Millis,
    phase: CameraPhase,
    rise_start: Option<Millis>,
    rise_reported: bool,
    target: CameraState,
    displayed: CameraState,
    hop_from: CameraState,
    hop_start: Millis,
}

impl CameraRig {
    pub fn new(rise_ms: Millis) -> Self {
        Self {
            rise_ms: rise_ms.max(1.0),
            phase: CameraPhase::Idle,
            rise_start: None,
            rise_reported: false,
            target: CameraState::GROUND,
            displayed: CameraState::GROUND,
            hop_from: CameraState::GROUND,
            hop_start: 0.0,
        }
    }

    pub fn phase(&self) -> CameraPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: CameraPhase, now: Millis) {
        if phase == self.phase {
            return;
        }
        tracing::debug!(?phase, "camera phase");
        self.phase = phase;
        match phase {
            CameraPhase::CameraRise => {
                self.rise_start = Some(now);
                self.rise_reported = false;
            }
            CameraPhase::Idle | CameraPhase::InkRain => {
                self.rise_start = None;
                self.retarget(CameraState::GROUND, now);
            }
            CameraPhase::SmokeZoom => {
                self.rise_start = None;
                self.retarget(CameraState::SMOKE_ZOOM, now);
            }
            CameraPhase::SilhouetteSmoke => {}
        }
    }

    /// Advance to `now`; reports rise completion once per rise.
    pub fn tick(&mut self, now: Millis) -> Option<CameraEvent> {
        let mut event = None;
        if let Some(start) = self.rise_start {
            let progress = ((now - start) / self.rise_ms).clamp(0.0, 1.0);
            // The rise is already eased; follow it directly.
            self.follow(interpolate_camera_state(progress), now);
            if progress >= 1.0 {
                self.rise_start = None;
                if !self.rise_reported {
                    self.rise_reported = true;
                    event = Some(CameraEvent::RiseComplete);
                }
            }
            return event;
        }

        let t = (now - self.hop_start) / RETARGET_MS;
        self.displayed = CameraState::lerp(&self.hop_from, &self.target, Ease::CINEMATIC.apply(t));
        event
    }

    /// Eased state as currently shown.
    pub fn state(&self) -> CameraState {
        self.displayed
    }

    pub fn target(&self) -> CameraState {
        self.target
    }

    pub fn transform(&self) -> CameraTransform {
        CameraTransform {
            translate_y_pct: camera_y_to_shift_pct(self.displayed.y),
            scale: self.displayed.scale,
            blur_px: self.displayed.blur,
        }
    }

    fn follow(&mut self, state: CameraState, now: Millis) {
        self.target = state;
        self.displayed = state;
        self.hop_from = state;
        self.hop_start = now;
    }

    fn retarget(&mut self, target: CameraState, now: Millis) {
        if target == self.target {
            return;
        }
        self.hop_from = self.displayed;
        self.hop_start = now;
        self.target = target;
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(4000.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/camera.rs"]
mod tests;
