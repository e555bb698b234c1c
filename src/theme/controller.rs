//! Timer-driven cross-fade through the theme palette.
//!
//! Each cycle holds the current colors steady for `cycle_ms - transition_ms`, then
//! blends toward the next entry for the remaining `transition_ms`. When the blend
//! completes the index advances and the next cycle starts with no gap.

use std::sync::Arc;

use crate::color::palette::{BlendModel, ThemeColors, ThemeProperty, validate_palette};
use crate::foundation::caps::Capabilities;
use crate::foundation::clock::Clock;
use crate::foundation::core::Millis;
use crate::foundation::error::{InkfolioError, InkfolioResult};
use crate::foundation::storage::{KeyValueStore, read_or_none, write_quietly};
use crate::theme::sink::ThemeSink;

/// Storage key for the persisted palette position.
pub const THEME_INDEX_KEY: &str = "themeIndex";
/// Custom property announcing the blend window to CSS transitions.
pub const TRANSITION_DURATION_VAR: &str = "--theme-transition-duration";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    pub cycle_ms: Millis,
    pub transition_ms: Millis,
    pub blend: BlendModel,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            cycle_ms: 3000.0,
            transition_ms: 1200.0,
            blend: BlendModel::LinearRgb,
        }
    }
}

impl CycleConfig {
    pub fn validate(&self) -> InkfolioResult<()> {
        if !(self.cycle_ms.is_finite() && self.cycle_ms > 0.0) {
            return Err(InkfolioError::validation("cycle_ms must be finite and > 0"));
        }
        if !(self.transition_ms.is_finite() && self.transition_ms > 0.0) {
            return Err(InkfolioError::validation(
                "transition_ms must be finite and > 0",
            ));
        }
        if self.transition_ms > self.cycle_ms {
            return Err(InkfolioError::validation(
                "transition_ms must not exceed cycle_ms",
            ));
        }
        Ok(())
    }

    pub fn steady_ms(&self) -> Millis {
        self.cycle_ms - self.transition_ms
    }
}

/// Serializable snapshot of the controller.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeCycleState {
    pub color_index: usize,
    pub transition_progress: f64,
    pub is_transitioning: bool,
    pub is_paused: bool,
}

pub struct ThemeCycleController {
    palette: Vec<ThemeColors>,
    config: CycleConfig,
    clock: Arc<dyn Clock>,
    sink: Box<dyn ThemeSink>,
    store: Option<Box<dyn KeyValueStore>>,

    color_index: usize,
    transition_progress: f64,
    is_transitioning: bool,
    is_paused: bool,
    running: bool,
    // Timestamp the current cycle started at.
    cycle_origin: Millis,
    // Position inside the cycle captured at pause time.
    paused_offset: Millis,
}

impl ThemeCycleController {
    /// Build a stopped controller. The initial pause state is a one-time snapshot
    /// of the device's motion signals.
    pub fn new(
        palette: Vec<ThemeColors>,
        config: CycleConfig,
        clock: Arc<dyn Clock>,
        sink: Box<dyn ThemeSink>,
        caps: &dyn Capabilities,
    ) -> InkfolioResult<Self> {
        validate_palette(&palette)?;
        config.validate()?;
        let is_paused = caps.prefers_static_theme();
        Ok(Self {
            palette,
            config,
            clock,
            sink,
            store: None,
            color_index: 0,
            transition_progress: 0.0,
            is_transitioning: false,
            is_paused,
            running: false,
            cycle_origin: 0.0,
            paused_offset: 0.0,
        })
    }

    /// Attach persistent storage and restore a previously stored index when it is
    /// in range.
    pub fn with_store(mut self, store: Box<dyn KeyValueStore>) -> Self {
        let restored = read_or_none(store.as_ref(), THEME_INDEX_KEY)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&i| i < self.palette.len());
        if let Some(i) = restored {
            tracing::debug!(index = i, "restored theme index");
            self.color_index = i;
        }
        self.store = Some(store);
        self
    }

    pub fn start(&mut self) {
        let now = self.clock.now_ms();
        self.running = true;
        self.cycle_origin = now;
        self.paused_offset = 0.0;
        self.sink.set_property(
            TRANSITION_DURATION_VAR,
            &format!("{}ms", self.config.transition_ms),
        );
        self.publish();
    }

    /// Stop driving the cycle. State is kept; `start` begins a fresh cycle.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance the cycle to `now`. No-op while stopped or paused.
    pub fn tick(&mut self, now: Millis) {
        if !self.running || self.is_paused {
            return;
        }

        let mut elapsed = now - self.cycle_origin;
        if elapsed < 0.0 {
            return;
        }
        let cycles = (elapsed / self.config.cycle_ms).floor();
        if cycles >= 1.0 {
            self.cycle_origin += cycles * self.config.cycle_ms;
            elapsed -= cycles * self.config.cycle_ms;
            self.advance(cycles as u64);
        }

        let steady = self.config.steady_ms();
        if elapsed >= steady {
            self.is_transitioning = true;
            self.transition_progress =
                ((elapsed - steady) / self.config.transition_ms).clamp(0.0, 1.0);
        } else {
            self.is_transitioning = false;
            self.transition_progress = 0.0;
        }
        self.publish();
    }

    /// Jump to `index` (any integer, wrapped into the palette) and restart the cycle.
    #[tracing::instrument(skip(self))]
    pub fn set_color_index(&mut self, index: i64) {
        let n = self.palette.len() as i64;
        self.color_index = index.rem_euclid(n) as usize;
        self.transition_progress = 0.0;
        self.is_transitioning = false;
        self.cycle_origin = self.clock.now_ms();
        self.paused_offset = 0.0;
        self.persist_index();
        self.publish();
    }

    pub fn pause_cycling(&mut self) {
        if self.is_paused {
            return;
        }
        self.paused_offset = (self.clock.now_ms() - self.cycle_origin).max(0.0);
        self.is_paused = true;
    }

    pub fn resume_cycling(&mut self) {
        if !self.is_paused {
            return;
        }
        self.cycle_origin = self.clock.now_ms() - self.paused_offset;
        self.is_paused = false;
    }

    /// Current color of `property`, blended toward the next entry mid-transition.
    pub fn interpolated_color(&self, property: ThemeProperty) -> String {
        let current = self.current_colors().get(property);
        if !self.is_transitioning || self.transition_progress == 0.0 {
            return current.to_string();
        }
        let next = self.next_colors().get(property);
        self.config
            .blend
            .blend(current, next, self.transition_progress)
    }

    pub fn current_colors(&self) -> &ThemeColors {
        &self.palette[self.color_index]
    }

    pub fn next_colors(&self) -> &ThemeColors {
        &self.palette[(self.color_index + 1) % self.palette.len()]
    }

    pub fn previous_colors(&self) -> &ThemeColors {
        let n = self.palette.len();
        &self.palette[(self.color_index + n - 1) % n]
    }

    pub fn palette(&self) -> &[ThemeColors] {
        &self.palette
    }

    pub fn state(&self) -> ThemeCycleState {
        ThemeCycleState {
            color_index: self.color_index,
            transition_progress: self.transition_progress,
            is_transitioning: self.is_transitioning,
            is_paused: self.is_paused,
        }
    }

    // One store write however many cycles were skipped.
    fn advance(&mut self, cycles: u64) {
        let n = self.palette.len() as u64;
        self.color_index = ((self.color_index as u64 + cycles % n) % n) as usize;
        self.transition_progress = 0.0;
        self.is_transitioning = false;
        tracing::debug!(index = self.color_index, "theme advanced");
        self.persist_index();
    }

    fn persist_index(&mut self) {
        let index = self.color_index.to_string();
        if let Some(store) = self.store.as_deref_mut() {
            write_quietly(store, THEME_INDEX_KEY, &index);
        }
    }

    fn publish(&mut self) {
        for property in ThemeProperty::ALL {
            let value = self.interpolated_color(property);
            self.sink.set_property(property.css_var(), &value);
        }
    }
}

impl std::fmt::Debug for ThemeCycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeCycleController")
            .field("state", &self.state())
            .field("running", &self.running)
            .field("palette_len", &self.palette.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/controller.rs"]
mod tests;
