//! Exhaled smoke: cone emission, noise turbulence, mouse repulsion and the final
//! radial disperse that clears the screen.

use std::f64::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::rgb::{Rgb8, Rgba};
use crate::effects::noise::PerlinNoise;
use crate::effects::pool::Pool;
use crate::effects::surface::Surface;
use crate::foundation::core::{Millis, Point, Vec2, Viewport};
use crate::foundation::math::Fnv1a64;

/// Base puff colors, white through mid gray.
pub const SMOKE_COLORS: [Rgba; 5] = [
    Rgba {
        rgb: Rgb8::new(255, 255, 255),
        alpha: 0.8,
    },
    Rgba {
        rgb: Rgb8::new(220, 220, 220),
        alpha: 0.7,
    },
    Rgba {
        rgb: Rgb8::new(180, 180, 180),
        alpha: 0.6,
    },
    Rgba {
        rgb: Rgb8::new(140, 140, 140),
        alpha: 0.5,
    },
    Rgba {
        rgb: Rgb8::new(100, 100, 100),
        alpha: 0.4,
    },
];

const PUFF_SEGMENTS: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmokePhase {
    #[default]
    Idle,
    Exhale,
    Float,
    Zoom,
    Disperse,
}

impl SmokePhase {
    pub fn emits(self) -> bool {
        matches!(self, Self::Exhale | Self::Float | Self::Zoom)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExhaleParams {
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub spread: f64,
    pub size_min: f64,
    pub size_max: f64,
    /// Particles per frame at density 1.
    pub emission_rate: f64,
    pub cone_angle: f64,
}

impl Default for ExhaleParams {
    fn default() -> Self {
        Self {
            velocity_x: 3.0,
            velocity_y: -2.0,
            spread: 0.4,
            size_min: 8.0,
            size_max: 20.0,
            emission_rate: 15.0,
            cone_angle: PI / 4.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FloatParams {
    pub velocity_decay: f64,
    pub turbulence_strength: f64,
    pub size_growth: f64,
    pub opacity_decay: f64,
}

impl Default for FloatParams {
    fn default() -> Self {
        Self {
            velocity_decay: 0.985,
            turbulence_strength: 0.6,
            size_growth: 1.008,
            opacity_decay: 0.992,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DisperseParams {
    pub force: f64,
    /// Clear-zone radius cap, as a multiple of half the longest viewport side.
    pub max_radius: f64,
    pub duration_ms: Millis,
    pub fade_speed: f64,
}

impl Default for DisperseParams {
    fn default() -> Self {
        Self {
            force: 8.0,
            max_radius: 1.8,
            duration_ms: 1000.0,
            fade_speed: 0.02,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MouseParams {
    pub influence_radius: f64,
    pub push_force: f64,
    pub turbulence_boost: f64,
}

impl Default for MouseParams {
    fn default() -> Self {
        Self {
            influence_radius: 100.0,
            push_force: 3.0,
            turbulence_boost: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    pub max_particles: usize,
    pub exhale: ExhaleParams,
    pub float: FloatParams,
    /// Outward push while zooming.
    pub zoom_velocity_boost: f64,
    pub disperse: DisperseParams,
    pub mouse: MouseParams,
    pub min_life: f64,
    pub max_life: f64,
    pub rotation_speed: f64,
    pub turbulence_min: f64,
    pub turbulence_max: f64,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            max_particles: 500,
            exhale: ExhaleParams::default(),
            float: FloatParams::default(),
            zoom_velocity_boost: 0.3,
            disperse: DisperseParams::default(),
            mouse: MouseParams::default(),
            min_life: 150.0,
            max_life: 300.0,
            rotation_speed: 0.02,
            turbulence_min: 0.3,
            turbulence_max: 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SmokeParticle {
    pub pos: Point,
    pub vel: Vec2,
    pub size: f64,
    pub opacity: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub life: f64,
    pub max_life: f64,
    pub turbulence: f64,
    pub noise_offset: f64,
    pub color_index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmokeEvent {
    DisperseComplete,
}

/// A puff leaving `emitter` up and to the right inside the exhale cone.
pub fn create_smoke_particle(rng: &mut impl Rng, emitter: Point, config: &SmokeConfig) -> SmokeParticle {
    let ex = &config.exhale;
    let angle = -PI / 6.0 + (rng.random::<f64>() - 0.5) * ex.cone_angle;
    let mut vx = angle.cos() * ex.velocity_x * (0.8 + rng.random::<f64>() * 0.4);
    let mut vy = angle.sin() * ex.velocity_y.abs() - rng.random::<f64>() * 1.5;
    vx += (rng.random::<f64>() - 0.5) * ex.spread;
    vy += (rng.random::<f64>() - 0.5) * ex.spread;

    SmokeParticle {
        pos: Point::new(
            emitter.x + (rng.random::<f64>() - 0.5) * 10.0,
            emitter.y + (rng.random::<f64>() - 0.5) * 5.0,
        ),
        vel: Vec2::new(vx, vy),
        size: ex.size_min + rng.random::<f64>() * (ex.size_max - ex.size_min),
        opacity: 0.6 + rng.random::<f64>() * 0.3,
        rotation: rng.random::<f64>() * TAU,
        rotation_speed: (rng.random::<f64>() * 2.0 - 1.0) * config.rotation_speed,
        life: config.min_life + rng.random::<f64>() * (config.max_life - config.min_life),
        max_life: config.max_life,
        turbulence: config.turbulence_min
            + rng.random::<f64>() * (config.turbulence_max - config.turbulence_min),
        noise_offset: rng.random::<f64>() * 1000.0,
        color_index: rng.random_range(0..SMOKE_COLORS.len()),
    }
}

/// Every base color has channels within 10 of each other.
pub fn verify_smoke_grayscale() -> bool {
    SMOKE_COLORS
        .iter()
        .all(|c| c.rgb.r.abs_diff(c.rgb.g) <= 10 && c.rgb.g.abs_diff(c.rgb.b) <= 10)
}

#[derive(Debug)]
pub struct SmokeEffect {
    config: SmokeConfig,
    viewport: Viewport,
    rng: StdRng,
    noise: PerlinNoise,
    particles: Pool<SmokeParticle>,
    phase: SmokePhase,
    active: bool,
    /// Emitter position as fractions of the viewport.
    emitter: Point,
    density: f64,
    focus: f64,
    mouse: Option<Point>,
    disperse_start: Option<Millis>,
    disperse_radius: f64,
    disperse_reported: bool,
}

impl SmokeEffect {
    pub fn new(config: SmokeConfig, viewport: Viewport, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = PerlinNoise::new(rng.random_range(1..10_000));
        Self {
            particles: Pool::with_cap(config.max_particles),
            config,
            viewport,
            rng,
            noise,
            phase: SmokePhase::Idle,
            active: false,
            emitter: Point::new(0.55, 0.45),
            density: 1.0,
            focus: 1.0,
            mouse: None,
            disperse_start: None,
            disperse_radius: 0.0,
            disperse_reported: false,
        }
    }

    pub fn set_phase(&mut self, phase: SmokePhase) {
        if phase != self.phase {
            tracing::debug!(?phase, particles = self.particles.len(), "smoke phase");
            self.phase = phase;
        }
    }

    pub fn phase(&self) -> SmokePhase {
        self.phase
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_emitter(&mut self, fraction: Point) {
        self.emitter = fraction;
    }

    pub fn set_density(&mut self, density: f64) {
        self.density = density.max(0.0);
    }

    /// `1` is sharp; lower values blur the canvas while zooming.
    pub fn set_focus(&mut self, focus: f64) {
        self.focus = focus.clamp(0.0, 1.0);
    }

    pub fn set_mouse(&mut self, mouse: Option<Point>) {
        self.mouse = mouse;
    }

    pub fn set_max_particles(&mut self, max: usize) {
        self.particles.set_cap(max);
    }

    /// Particles live in viewport pixels, so a new size starts from an empty pool.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.particles.clear();
    }

    pub fn particles(&self) -> &Pool<SmokeParticle> {
        &self.particles
    }

    pub fn disperse_radius(&self) -> f64 {
        self.disperse_radius
    }

    pub fn emitter_px(&self) -> Point {
        self.viewport.denormalize(self.emitter)
    }

    /// Whole-canvas blur in pixels: `(1 - focus) * 5` while zooming, else none.
    pub fn canvas_blur(&self) -> f64 {
        if self.phase == SmokePhase::Zoom {
            (1.0 - self.focus) * 5.0
        } else {
            0.0
        }
    }

    /// Advance one frame at `now`.
    pub fn update(&mut self, now: Millis) -> Option<SmokeEvent> {
        if !self.active && self.phase == SmokePhase::Idle {
            self.particles.clear();
            return None;
        }

        if self.phase.emits() {
            self.emit();
        }

        let mut event = None;
        if self.phase == SmokePhase::Disperse {
            let start = *self.disperse_start.get_or_insert(now);
            let elapsed = now - start;
            let d = &self.config.disperse;
            self.disperse_radius = (elapsed / d.duration_ms).min(d.max_radius);
            if elapsed > d.duration_ms && self.particles.is_empty() && !self.disperse_reported {
                self.disperse_reported = true;
                tracing::debug!("smoke dispersed");
                event = Some(SmokeEvent::DisperseComplete);
            }
        } else {
            self.disperse_start = None;
            self.disperse_radius = 0.0;
            self.disperse_reported = false;
        }

        let ctx = StepContext {
            config: &self.config,
            noise: &self.noise,
            time: now,
            phase: self.phase,
            center: self.viewport.center(),
            clear_radius: self.disperse_radius * self.viewport.longest_side() * 0.5,
            disperse_radius: self.disperse_radius,
            mouse: self.mouse.filter(|_| self.phase != SmokePhase::Disperse),
        };
        let rng = &mut self.rng;
        self.particles.update(|p| ctx.step(p, rng));
        event
    }

    pub fn render(&self, surface: Option<&mut dyn Surface>) {
        let Some(surface) = surface else {
            return;
        };
        if !self.active && self.phase == SmokePhase::Idle {
            return;
        }

        surface.clear();
        let canvas_blur = self.canvas_blur();
        surface.set_blur(canvas_blur);
        for p in &self.particles {
            if self.phase == SmokePhase::Zoom {
                surface.set_blur(canvas_blur + 2.0 + p.size * 0.1);
            }
            let color = SMOKE_COLORS[p.color_index].rgb.with_alpha(p.opacity);
            surface.fill_polygon(&puff_outline(p), color);
        }

        if self.phase == SmokePhase::Disperse && self.disperse_radius > 0.0 {
            let clear = self.disperse_radius * self.viewport.longest_side() * 0.5;
            surface.set_blur(0.0);
            surface.erase_radial(self.viewport.center(), clear * 0.3, clear);
        }
    }

    fn emit(&mut self) {
        if self.particles.len() >= self.particles.cap() {
            return;
        }
        let boost = if self.phase == SmokePhase::Zoom { 2.0 } else { 1.0 };
        let count = (self.config.exhale.emission_rate * self.density * boost).floor() as usize;
        let emitter = self.emitter_px();
        for _ in 0..count {
            if self.particles.is_full() {
                break;
            }
            let at = if self.phase == SmokePhase::Zoom {
                Point::new(
                    self.rng.random::<f64>() * self.viewport.width,
                    self.rng.random::<f64>() * self.viewport.height,
                )
            } else {
                emitter
            };
            let particle = create_smoke_particle(&mut self.rng, at, &self.config);
            self.particles.push(particle);
        }
    }
}

struct StepContext<'a> {
    config: &'a SmokeConfig,
    noise: &'a PerlinNoise,
    time: Millis,
    phase: SmokePhase,
    center: Point,
    clear_radius: f64,
    disperse_radius: f64,
    mouse: Option<Point>,
}

impl StepContext<'_> {
    /// One physics step; returns whether the particle survives.
    fn step(&self, p: &mut SmokeParticle, rng: &mut StdRng) -> bool {
        let c = self.config;

        let t = self.time * 0.001;
        let nx = self.noise.noise2d(p.pos.x * 0.01 + p.noise_offset, t) * p.turbulence;
        let ny = self.noise.noise2d(p.pos.y * 0.01 + p.noise_offset + 100.0, t) * p.turbulence;
        p.vel.x += nx * c.float.turbulence_strength;
        p.vel.y += ny * c.float.turbulence_strength - 0.05;
        p.vel *= c.float.velocity_decay;

        if let Some(mouse) = self.mouse {
            let d = p.pos - mouse;
            let dist = d.hypot();
            let m = &c.mouse;
            if dist > 0.0 && dist < m.influence_radius {
                let closeness = 1.0 - dist / m.influence_radius;
                let dir = d / dist;
                p.vel += dir * (closeness * m.push_force);

                let boost = closeness * m.turbulence_boost;
                p.turbulence = (p.turbulence + boost * 0.1).min(2.0);

                let perp = Vec2::new(-dir.y, dir.x);
                let swirl = closeness * 0.5;
                p.vel.x += perp.x * swirl * (rng.random::<f64>() - 0.5);
                p.vel.y += perp.y * swirl * (rng.random::<f64>() - 0.5);
                p.rotation_speed += (rng.random::<f64>() - 0.5) * 0.01 * boost;
            }
        }

        match self.phase {
            SmokePhase::Zoom => {
                p.size *= 1.015;
                let d = p.pos - self.center;
                let dist = d.hypot();
                if dist > 0.0 {
                    p.vel += d / dist * (c.zoom_velocity_boost * 0.05);
                }
                p.opacity *= 0.998;
                p.life = p.life.max(50.0);
            }
            SmokePhase::Disperse => {
                let d = p.pos - self.center;
                let dist = d.hypot();
                let inside = dist < self.clear_radius;
                if dist > 0.0 {
                    let force = c.disperse.force * (1.0 + self.disperse_radius * 2.0);
                    let multiplier = if inside { 3.0 } else { 1.0 };
                    p.vel += d / dist * (force * 0.15 * multiplier);
                }
                p.opacity -= c.disperse.fade_speed * if inside { 3.0 } else { 1.0 };
                if dist < self.clear_radius * 0.5 {
                    p.opacity -= 0.05;
                }
            }
            _ => {}
        }

        p.pos += p.vel;
        p.rotation += p.rotation_speed;
        p.size *= c.float.size_growth;
        p.opacity *= c.float.opacity_decay;
        p.life -= 1.0;

        p.life > 0.0 && p.opacity > 0.01
    }
}

// Irregular octagon; the per-vertex radius jitter is a stable hash of the particle.
fn puff_outline(p: &SmokeParticle) -> Vec<Point> {
    (0..PUFF_SEGMENTS)
        .map(|i| {
            let mut h = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
            h.write_u64(p.noise_offset.to_bits());
            h.write_u64(i as u64);
            let jitter = (h.finish() >> 11) as f64 / (1u64 << 53) as f64;
            let r = p.size * (0.7 + jitter * 0.3);
            let angle = i as f64 / PUFF_SEGMENTS as f64 * TAU + p.rotation;
            p.pos + Vec2::new(angle.cos() * r, angle.sin() * r)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/smoke.rs"]
mod tests;
