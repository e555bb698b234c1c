//! Rolling frame-rate estimate and the adaptive particle multiplier.

use std::collections::VecDeque;

use crate::foundation::caps::Capabilities;
use crate::foundation::core::Millis;

pub const MULTIPLIER_FLOOR: f64 = 0.2;
pub const MULTIPLIER_CEILING: f64 = 1.0;

const DECREASE_STEP: f64 = 0.1;
const INCREASE_STEP: f64 = 0.05;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub target_fps: f64,
    pub min_fps: f64,
    pub max_particles: u32,
    pub min_particles: u32,
    pub adaptive_enabled: bool,
    pub max_samples: usize,
    pub cooldown_ms: Millis,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            target_fps: 120.0,
            min_fps: 30.0,
            max_particles: 300,
            min_particles: 50,
            adaptive_enabled: true,
            max_samples: 60,
            cooldown_ms: 1000.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceState {
    pub current_fps: f64,
    pub average_fps: f64,
    pub recommended_particle_multiplier: f64,
    pub is_mobile: bool,
    pub is_low_performance: bool,
}

#[derive(Clone, Debug)]
pub struct PerformanceMonitor {
    config: PerformanceConfig,
    samples: VecDeque<Millis>,
    multiplier: f64,
    initial_multiplier: f64,
    last_adjustment: Millis,
    is_mobile: bool,
    is_low_performance: bool,
}

impl PerformanceMonitor {
    /// Start at 0.3 on mobile, 0.5 on low-performance hardware, else 1.0.
    pub fn new(config: PerformanceConfig, caps: &dyn Capabilities) -> Self {
        let is_mobile = caps.is_mobile();
        let is_low_performance = caps.is_low_performance();
        let initial_multiplier = if is_mobile {
            0.3
        } else if is_low_performance {
            0.5
        } else {
            1.0
        };
        Self {
            samples: VecDeque::with_capacity(config.max_samples.max(2)),
            config,
            multiplier: initial_multiplier,
            initial_multiplier,
            last_adjustment: 0.0,
            is_mobile,
            is_low_performance,
        }
    }

    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    pub fn record_frame(&mut self, timestamp: Millis) {
        self.samples.push_back(timestamp);
        while self.samples.len() > self.config.max_samples.max(2) {
            self.samples.pop_front();
        }
    }

    /// `(n - 1) / seconds spanned`; the target rate until two distinct samples exist.
    pub fn current_fps(&self) -> f64 {
        let (Some(&oldest), Some(&newest)) = (self.samples.front(), self.samples.back()) else {
            return self.config.target_fps;
        };
        if self.samples.len() < 2 {
            return self.config.target_fps;
        }
        let duration = newest - oldest;
        if duration == 0.0 {
            return self.config.target_fps;
        }
        (self.samples.len() - 1) as f64 / (duration / 1000.0)
    }

    /// The sample window is already an average; kept as a separate reading.
    pub fn average_fps(&self) -> f64 {
        self.current_fps()
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Adjust at most once per cooldown: -0.1 below `min_fps`, +0.05 above 80% of
    /// target, otherwise unchanged.
    pub fn update_and_get_multiplier(&mut self, timestamp: Millis) -> f64 {
        if !self.config.adaptive_enabled {
            return self.multiplier;
        }
        if timestamp - self.last_adjustment < self.config.cooldown_ms {
            return self.multiplier;
        }

        let fps = self.current_fps();
        if fps < self.config.min_fps {
            self.multiplier = (self.multiplier - DECREASE_STEP).max(MULTIPLIER_FLOOR);
            self.last_adjustment = timestamp;
            tracing::debug!(fps, multiplier = self.multiplier, "lowering particle budget");
        } else if fps > self.config.target_fps * 0.8 && self.multiplier < MULTIPLIER_CEILING {
            self.multiplier = (self.multiplier + INCREASE_STEP).min(MULTIPLIER_CEILING);
            self.last_adjustment = timestamp;
            tracing::debug!(fps, multiplier = self.multiplier, "raising particle budget");
        }
        self.multiplier
    }

    pub fn recommended_particle_count(&self, base: u32) -> u32 {
        let adjusted = (f64::from(base) * self.multiplier).round() as u32;
        adjusted.clamp(self.config.min_particles, self.config.max_particles.max(self.config.min_particles))
    }

    pub fn state(&self) -> PerformanceState {
        PerformanceState {
            current_fps: self.current_fps(),
            average_fps: self.average_fps(),
            recommended_particle_multiplier: self.multiplier,
            is_mobile: self.is_mobile,
            is_low_performance: self.is_low_performance,
        }
    }

    /// Forget all samples and return to the device-derived multiplier.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.last_adjustment = 0.0;
        self.multiplier = self.initial_multiplier;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/perf/monitor.rs"]
mod tests;
