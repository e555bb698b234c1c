//! Frame-by-frame director of the cinematic intro.
//!
//! [`CinematicIntro::tick`] derives the timeline phase from elapsed time, then
//! pushes the phase-local parameters (camera height, glow, smoke phase, focus,
//! particle budget) into the effects and advances them one frame. Rendering is a
//! separate pass over up to three surfaces, back to front.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::effects::camera::{CameraRig, CameraTransform, interpolate_camera_state};
use crate::effects::ink_rain::{InkRain, RainConfig};
use crate::effects::silhouette::{
    IDLE_GLOW, Silhouette, SilhouetteConfig, SmokingCycle, SmokingPhase,
};
use crate::effects::smoke::{SmokeConfig, SmokeEffect, SmokeEvent, SmokePhase};
use crate::effects::surface::Surface;
use crate::foundation::caps::Capabilities;
use crate::foundation::clock::{FrameScheduler, TickHandle};
use crate::foundation::core::{Millis, Point, Viewport};
use crate::foundation::error::InkfolioResult;
use crate::foundation::math::derive_seed;
use crate::foundation::storage::KeyValueStore;
use crate::intro::session;
use crate::intro::timeline::{
    INTRO_TIMELINE, IntroPhase, PhaseConfig, current_phase, find_phase, phase_progress,
    total_duration, validate_timeline,
};
use crate::perf::budget::IntroBudget;
use crate::perf::monitor::{PerformanceConfig, PerformanceMonitor};

/// Shown at the bottom of the overlay.
pub const SKIP_HINT: &str = "点击或按任意键跳过";

/// Multiplier movement below this keeps the current raindrop count.
const MULTIPLIER_HYSTERESIS: f64 = 0.05;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub timeline: Vec<PhaseConfig>,
    /// Hard stop; defaults to the timeline's total duration.
    pub duration_ms: Option<Millis>,
    pub skip_on_revisit: bool,
    pub skip_fade_ms: Millis,
    pub backlight_intensity: f64,
    pub camera_rise_ms: Millis,
    /// Smoke emitter as viewport fractions.
    pub emitter: Point,
    pub seed: u64,
    pub rain: RainConfig,
    pub smoke: SmokeConfig,
    pub silhouette: SilhouetteConfig,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            timeline: INTRO_TIMELINE.to_vec(),
            duration_ms: None,
            skip_on_revisit: true,
            skip_fade_ms: 300.0,
            backlight_intensity: 0.6,
            camera_rise_ms: 4000.0,
            emitter: Point::new(0.55, 0.45),
            seed: 0x1d2f_0a11,
            rain: RainConfig::default(),
            smoke: SmokeConfig::default(),
            silhouette: SilhouetteConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IntroInput {
    Click,
    KeyDown,
    /// Pointer position relative to the intro container.
    MouseMove(Point),
}

/// Snapshot of one intro frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroFrame {
    pub elapsed_ms: Millis,
    pub phase: IntroPhase,
    pub camera: CameraTransform,
    pub camera_y: f64,
    pub silhouette_visible: bool,
    pub smoking_phase: SmokingPhase,
    pub cigarette_glow: f64,
    pub smoke_phase: SmokePhase,
    pub focus: f64,
    pub multiplier: f64,
    pub raindrops: u32,
    pub smoke_particles: usize,
    pub overlay_opacity: f64,
    pub skipping: bool,
    pub completed: bool,
}

/// Layer targets for [`CinematicIntro::render`]; a missing layer is skipped.
#[derive(Default)]
pub struct IntroSurfaces<'a> {
    pub rain: Option<&'a mut dyn Surface>,
    pub figure: Option<&'a mut dyn Surface>,
    pub smoke: Option<&'a mut dyn Surface>,
}

type CompleteFn = Box<dyn FnOnce()>;

pub struct CinematicIntro {
    config: IntroConfig,
    total_ms: Millis,
    budget: IntroBudget,
    monitor: PerformanceMonitor,
    multiplier: f64,
    raindrops: u32,

    camera: CameraRig,
    rain: InkRain,
    silhouette: Silhouette,
    smoking: SmokingCycle,
    smoke: SmokeEffect,

    store: Box<dyn KeyValueStore>,
    on_complete: Option<CompleteFn>,

    phase: IntroPhase,
    start: Option<Millis>,
    skip_started: Option<Millis>,
    completed: bool,
    camera_y: f64,
    smoke_phase: SmokePhase,
    focus: f64,
    mouse: Option<Point>,
    disperse_done: bool,
    last_elapsed: Millis,
}

impl CinematicIntro {
    pub fn new(
        config: IntroConfig,
        viewport: Viewport,
        caps: &dyn Capabilities,
        store: Box<dyn KeyValueStore>,
    ) -> InkfolioResult<Self> {
        validate_timeline(&config.timeline)?;
        let total_ms = config
            .duration_ms
            .unwrap_or_else(|| total_duration(&config.timeline));

        let budget = IntroBudget::for_device(caps);
        let monitor = PerformanceMonitor::new(
            PerformanceConfig {
                max_particles: budget.max_raindrops,
                ..PerformanceConfig::default()
            },
            caps,
        );

        let rain = InkRain::new(
            RainConfig {
                max_drops: budget.max_raindrops,
                enable_reflection: budget.enable_reflection,
                max_splashes: budget.max_splash_particles as usize,
                ..config.rain.clone()
            },
            viewport,
            derive_seed(config.seed, "ink-rain"),
        );
        let mut smoke = SmokeEffect::new(
            SmokeConfig {
                max_particles: budget.max_smoke_particles as usize,
                ..config.smoke.clone()
            },
            viewport,
            derive_seed(config.seed, "smoke"),
        );
        smoke.set_emitter(config.emitter);

        let mut silhouette = Silhouette::new(config.silhouette.clone())?;
        silhouette.set_backlight_intensity(config.backlight_intensity);

        tracing::debug!(?budget, total_ms, "intro prepared");
        Ok(Self {
            total_ms,
            budget,
            monitor,
            multiplier: 1.0,
            raindrops: budget.max_raindrops,
            camera: CameraRig::new(config.camera_rise_ms),
            rain,
            silhouette,
            smoking: SmokingCycle::new(config.silhouette.clone()),
            smoke,
            store,
            on_complete: None,
            phase: IntroPhase::InkRain,
            start: None,
            skip_started: None,
            completed: false,
            camera_y: 0.0,
            smoke_phase: SmokePhase::Idle,
            focus: 1.0,
            mouse: None,
            disperse_done: false,
            last_elapsed: 0.0,
            config,
        })
    }

    /// Called once, after the intro has fully completed (skip or natural end).
    pub fn on_complete(&mut self, callback: impl FnOnce() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Begin at `now`. Returns `false` when the intro was already played this
    /// session and completed immediately instead.
    #[tracing::instrument(skip(self))]
    pub fn mount(&mut self, now: Millis) -> bool {
        if self.config.skip_on_revisit && session::has_played(self.store.as_ref()) {
            tracing::debug!("intro already played this session");
            self.complete();
            return false;
        }
        self.start = Some(now);
        self.rain.set_active(true);
        true
    }

    /// Advance one frame.
    pub fn tick(&mut self, now: Millis) -> IntroFrame {
        if self.completed {
            return self.frame(now);
        }
        if let Some(skip_at) = self.skip_started {
            if now - skip_at >= self.config.skip_fade_ms {
                self.complete();
            }
            return self.frame(now);
        }
        let Some(start) = self.start else {
            return self.frame(now);
        };

        let elapsed = (now - start).max(0.0);
        self.last_elapsed = elapsed;
        self.adapt_particles(now);

        let scheduled = current_phase(elapsed, &self.config.timeline);
        let mut phase = scheduled;
        if phase == IntroPhase::SmokeDisperse && self.disperse_done {
            phase = IntroPhase::Transition;
        }
        if phase != self.phase {
            tracing::debug!(from = %self.phase, to = %phase, elapsed, "intro phase");
            self.phase = phase;
        }

        self.stage_camera(elapsed, now);
        self.stage_figure(elapsed, now);
        let finished = self.stage_smoke(scheduled, elapsed);

        self.rain.set_active(phase.rain_active());
        self.rain.update();
        if self.smoke.update(now) == Some(SmokeEvent::DisperseComplete)
            && self.phase == IntroPhase::SmokeDisperse
        {
            self.disperse_done = true;
            self.phase = IntroPhase::Transition;
        }

        if finished || elapsed >= self.total_ms {
            self.complete();
        }
        self.frame(now)
    }

    /// Start the skip fade. Ignored while already skipping or once completed.
    #[tracing::instrument(skip(self))]
    pub fn skip(&mut self, now: Millis) -> bool {
        if self.skip_started.is_some() || self.completed {
            return false;
        }
        tracing::info!(elapsed = self.last_elapsed, "intro skipped");
        self.skip_started = Some(now);
        true
    }

    pub fn handle_input(&mut self, input: IntroInput, now: Millis) {
        match input {
            IntroInput::Click | IntroInput::KeyDown => {
                self.skip(now);
            }
            IntroInput::MouseMove(pos) => {
                if self.budget.enable_mouse_interaction {
                    self.mouse = Some(pos);
                }
            }
        }
    }

    /// Overlay opacity: fades to zero across the skip window, zero once done.
    pub fn overlay_opacity(&self, now: Millis) -> f64 {
        if self.completed {
            return 0.0;
        }
        match self.skip_started {
            Some(at) => {
                let fade = self.config.skip_fade_ms.max(1.0);
                (1.0 - (now - at) / fade).clamp(0.0, 1.0)
            }
            None => 1.0,
        }
    }

    pub fn render(&self, surfaces: IntroSurfaces<'_>, now: Millis) {
        if self.completed {
            return;
        }
        self.rain.render(surfaces.rain, now);
        self.silhouette.render(surfaces.figure);
        self.smoke.render(surfaces.smoke);
    }

    /// Rebuild the particle pools for a new viewport size.
    pub fn resize(&mut self, viewport: Viewport) {
        tracing::debug!(width = viewport.width, height = viewport.height, "intro resize");
        self.rain.resize(viewport);
        self.smoke.resize(viewport);
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn is_skipping(&self) -> bool {
        self.skip_started.is_some()
    }

    pub fn budget(&self) -> IntroBudget {
        self.budget
    }

    pub fn total_duration(&self) -> Millis {
        self.total_ms
    }

    pub fn camera_transform(&self) -> CameraTransform {
        self.camera.transform()
    }

    pub fn rain(&self) -> &InkRain {
        &self.rain
    }

    pub fn smoke(&self) -> &SmokeEffect {
        &self.smoke
    }

    pub fn silhouette(&self) -> &Silhouette {
        &self.silhouette
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Register `intro` on `scheduler`; the callback cancels itself once the intro
    /// completes. The completion callback runs inside that tick and must not borrow
    /// `intro` again.
    pub fn drive(intro: Rc<RefCell<Self>>, scheduler: &mut FrameScheduler) -> TickHandle {
        let canceller = scheduler.canceller();
        let own_handle: Rc<Cell<Option<TickHandle>>> = Rc::new(Cell::new(None));
        let handle_slot = Rc::clone(&own_handle);
        let handle = scheduler.on_tick(move |now| {
            let done = {
                let mut intro = intro.borrow_mut();
                intro.tick(now);
                intro.is_complete()
            };
            if done && let Some(h) = handle_slot.get() {
                canceller.cancel(h);
            }
        });
        own_handle.set(Some(handle));
        handle
    }

    fn adapt_particles(&mut self, now: Millis) {
        self.monitor.record_frame(now);
        let next = self.monitor.update_and_get_multiplier(now);
        if (next - self.multiplier).abs() > MULTIPLIER_HYSTERESIS {
            self.multiplier = next;
            self.raindrops = (f64::from(self.budget.max_raindrops) * next).round() as u32;
            let smoke_cap = (f64::from(self.budget.max_smoke_particles) * next).round() as usize;
            tracing::debug!(
                multiplier = next,
                raindrops = self.raindrops,
                smoke_cap,
                "intro particle budget"
            );
            self.rain.set_max_drops(self.raindrops);
            self.smoke.set_max_particles(smoke_cap);
        }
    }

    fn stage_camera(&mut self, elapsed: Millis, now: Millis) {
        let rise = find_phase(&self.config.timeline, IntroPhase::CameraRise);
        let rise_start = rise.map_or(0.0, |c| c.start_time);
        if self.phase == IntroPhase::CameraRise || elapsed >= rise_start {
            let progress =
                ((elapsed - rise_start).max(0.0) / self.config.camera_rise_ms.max(1.0)).min(1.0);
            self.camera_y = interpolate_camera_state(progress).y;
            self.rain.set_camera_y(self.camera_y);
        }
        self.camera.set_phase(self.phase.camera_phase(), now);
        self.camera.tick(now);
    }

    fn stage_figure(&mut self, elapsed: Millis, now: Millis) {
        let reveal = find_phase(&self.config.timeline, IntroPhase::SilhouetteSmoke)
            .map_or(0.0, |c| c.start_time);
        if elapsed >= reveal {
            self.silhouette.set_visible(true);
        }

        match self.phase {
            IntroPhase::SmokeInhale => {
                if !self.smoking.is_running() && self.silhouette.smoking_phase() == SmokingPhase::Idle
                {
                    self.smoking.start(now);
                }
                self.silhouette.set_smoking_phase(SmokingPhase::Inhale, now);
            }
            IntroPhase::SmokeExhale => {
                self.silhouette.set_smoking_phase(SmokingPhase::Exhale, now);
            }
            _ => {}
        }
        self.smoking.tick(now);
        self.silhouette.tick(now);
        let glow = if self.smoking.is_running() {
            self.smoking.glow()
        } else {
            IDLE_GLOW
        };
        self.silhouette.set_cigarette_glow(glow);
    }

    // Parameters follow the scheduled phase even when the reported one moved ahead.
    // Returns true when the closing transition has fully played.
    fn stage_smoke(&mut self, scheduled: IntroPhase, elapsed: Millis) -> bool {
        let timeline = &self.config.timeline;
        let mut finished = false;
        match scheduled {
            IntroPhase::SmokeExhale => self.smoke_phase = SmokePhase::Exhale,
            IntroPhase::SmokeZoom => {
                self.smoke_phase = SmokePhase::Zoom;
                let p = phase_progress(elapsed, timeline, IntroPhase::SmokeZoom);
                self.focus = 1.0 - p * 0.8;
            }
            IntroPhase::SmokeDisperse => {
                self.smoke_phase = SmokePhase::Disperse;
                let p = phase_progress(elapsed, timeline, IntroPhase::SmokeDisperse);
                self.focus = 0.2 + p * 0.8;
            }
            IntroPhase::Transition => {
                let p = phase_progress(elapsed, timeline, IntroPhase::Transition);
                self.focus = p;
                finished = p >= 1.0;
            }
            _ => {}
        }

        self.smoke.set_phase(self.smoke_phase);
        self.smoke.set_active(self.smoke_phase != SmokePhase::Idle);
        self.smoke.set_focus(self.focus);
        self.smoke.set_mouse(self.mouse);
        finished
    }

    fn complete(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.phase = IntroPhase::Completed;
        self.skip_started = None;
        self.rain.set_active(false);
        self.smoke.set_active(false);
        self.smoke.set_phase(SmokePhase::Idle);
        session::mark_played(self.store.as_mut());
        tracing::info!(elapsed = self.last_elapsed, "intro complete");
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
    }

    fn frame(&self, now: Millis) -> IntroFrame {
        IntroFrame {
            elapsed_ms: self.last_elapsed,
            phase: self.phase,
            camera: self.camera.transform(),
            camera_y: self.camera_y,
            silhouette_visible: self.silhouette.is_visible(),
            smoking_phase: self.silhouette.smoking_phase(),
            cigarette_glow: self.silhouette.effective_glow(),
            smoke_phase: self.smoke.phase(),
            focus: self.focus,
            multiplier: self.multiplier,
            raindrops: self.raindrops,
            smoke_particles: self.smoke.particles().len(),
            overlay_opacity: self.overlay_opacity(now),
            skipping: self.skip_started.is_some(),
            completed: self.completed,
        }
    }
}

impl std::fmt::Debug for CinematicIntro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CinematicIntro")
            .field("phase", &self.phase)
            .field("start", &self.start)
            .field("skip_started", &self.skip_started)
            .field("completed", &self.completed)
            .field("budget", &self.budget)
            .field("multiplier", &self.multiplier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/intro/orchestrator.rs"]
mod tests;
