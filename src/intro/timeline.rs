use crate::effects::camera::CameraPhase;
use crate::foundation::core::Millis;
use crate::foundation::error::{InkfolioError, InkfolioResult};
use crate::foundation::math::window_progress;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntroPhase {
    #[default]
    InkRain,
    CameraRise,
    SilhouetteSmoke,
    SmokeInhale,
    SmokeExhale,
    SmokeZoom,
    SmokeDisperse,
    Transition,
    Completed,
}

impl IntroPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InkRain => "ink-rain",
            Self::CameraRise => "camera-rise",
            Self::SilhouetteSmoke => "silhouette-smoke",
            Self::SmokeInhale => "smoke-inhale",
            Self::SmokeExhale => "smoke-exhale",
            Self::SmokeZoom => "smoke-zoom",
            Self::SmokeDisperse => "smoke-disperse",
            Self::Transition => "transition",
            Self::Completed => "completed",
        }
    }

    /// Camera staging for this phase; everything after the rise holds eye level
    /// except the zoom.
    pub fn camera_phase(self) -> CameraPhase {
        match self {
            Self::InkRain => CameraPhase::InkRain,
            Self::CameraRise => CameraPhase::CameraRise,
            Self::SmokeZoom => CameraPhase::SmokeZoom,
            _ => CameraPhase::SilhouetteSmoke,
        }
    }

    pub fn rain_active(self) -> bool {
        !matches!(self, Self::Transition | Self::Completed)
    }
}

impl std::fmt::Display for IntroPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timeline entry. Entries may overlap; the latest started one wins.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseConfig {
    pub phase: IntroPhase,
    pub start_time: Millis,
    pub duration: Millis,
}

impl PhaseConfig {
    pub const fn new(phase: IntroPhase, start_time: Millis, duration: Millis) -> Self {
        Self {
            phase,
            start_time,
            duration,
        }
    }

    pub fn end_time(&self) -> Millis {
        self.start_time + self.duration
    }

    /// Fraction of this entry's window covered at `elapsed`.
    pub fn progress(&self, elapsed: Millis) -> f64 {
        window_progress(elapsed, self.start_time, self.duration)
    }
}

pub const INTRO_TIMELINE: [PhaseConfig; 8] = [
    PhaseConfig::new(IntroPhase::InkRain, 0.0, 4500.0),
    PhaseConfig::new(IntroPhase::CameraRise, 500.0, 4000.0),
    PhaseConfig::new(IntroPhase::SilhouetteSmoke, 4000.0, 1500.0),
    PhaseConfig::new(IntroPhase::SmokeInhale, 4500.0, 800.0),
    PhaseConfig::new(IntroPhase::SmokeExhale, 5300.0, 1500.0),
    PhaseConfig::new(IntroPhase::SmokeZoom, 6500.0, 1500.0),
    PhaseConfig::new(IntroPhase::SmokeDisperse, 8000.0, 1000.0),
    PhaseConfig::new(IntroPhase::Transition, 9000.0, 1000.0),
];

/// Latest end across all entries; `0` for an empty timeline.
pub fn total_duration(timeline: &[PhaseConfig]) -> Millis {
    timeline.iter().map(PhaseConfig::end_time).fold(0.0, f64::max)
}

/// The last entry whose start is at or before `elapsed`, defaulting to ink rain.
pub fn current_phase(elapsed: Millis, timeline: &[PhaseConfig]) -> IntroPhase {
    timeline
        .iter()
        .rev()
        .find(|c| elapsed >= c.start_time)
        .map_or(IntroPhase::InkRain, |c| c.phase)
}

pub fn find_phase(timeline: &[PhaseConfig], phase: IntroPhase) -> Option<&PhaseConfig> {
    timeline.iter().find(|c| c.phase == phase)
}

/// Progress through `phase`'s window, or `0` when the timeline lacks it.
pub fn phase_progress(elapsed: Millis, timeline: &[PhaseConfig], phase: IntroPhase) -> f64 {
    find_phase(timeline, phase).map_or(0.0, |c| c.progress(elapsed))
}

pub fn validate_timeline(timeline: &[PhaseConfig]) -> InkfolioResult<()> {
    if timeline.is_empty() {
        return Err(InkfolioError::timeline("timeline is empty"));
    }
    for (i, c) in timeline.iter().enumerate() {
        if c.phase == IntroPhase::Completed {
            return Err(InkfolioError::timeline(format!(
                "timeline[{i}]: `completed` is terminal and cannot be scheduled"
            )));
        }
        if !c.start_time.is_finite() || c.start_time < 0.0 {
            return Err(InkfolioError::timeline(format!(
                "timeline[{i}] ({}): start time must be finite and >= 0",
                c.phase
            )));
        }
        if !c.duration.is_finite() || c.duration <= 0.0 {
            return Err(InkfolioError::timeline(format!(
                "timeline[{i}] ({}): duration must be finite and > 0",
                c.phase
            )));
        }
    }
    if timeline.windows(2).any(|w| w[1].start_time < w[0].start_time) {
        return Err(InkfolioError::timeline(
            "timeline entries must be ordered by start time",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/intro/timeline.rs"]
mod tests;
