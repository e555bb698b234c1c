//! Grayscale ink rain with ground splashes, ripples and a mirrored reflection.
//!
//! Simulation runs in world space where the ground sits at a fixed fraction of
//! the viewport height. The camera only shifts the rendered image: as it rises
//! the ground slides down by up to 30% of the viewport.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::rgb::{Rgb8, Rgba, hex_to_rgb};
use crate::effects::pool::Pool;
use crate::effects::surface::Surface;
use crate::foundation::core::{Millis, Point, Vec2, Viewport};

pub const RAINDROP_COLORS: [&str; 5] = ["#1a1a1a", "#2d2d2d", "#404040", "#595959", "#737373"];

const RIPPLE_COLOR: Rgb8 = Rgb8::new(0x4a, 0x4a, 0x4a);
const GROUND_COLOR: Rgb8 = Rgb8::new(50, 50, 50);

const SPLASH_LIFE: u32 = 30;
const SPLASH_GRAVITY: f64 = 0.15;
const SPLASH_SPEED: f64 = 3.0;
const RIPPLE_MAX_RADIUS: f64 = 30.0;
const RIPPLE_SPEED: f64 = 2.0;
const RIPPLE_FADE: f64 = 0.02;

const REFLECTION_OPACITY: f64 = 0.4;
const REFLECTION_AMPLITUDE: f64 = 3.0;
const REFLECTION_FREQUENCY: f64 = 0.1;
const REFLECTION_LENGTH: f64 = 0.7;

/// Largest downward shift of the scene, as a fraction of viewport height.
pub const MAX_CAMERA_SHIFT: f64 = 0.3;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RainConfig {
    /// Ground line as a percentage of viewport height.
    pub ground_level_pct: f64,
    pub max_drops: u32,
    /// Density factor in `0..=1`.
    pub intensity: f64,
    pub enable_reflection: bool,
    pub max_splashes: usize,
    pub max_ripples: usize,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            ground_level_pct: 85.0,
            max_drops: 300,
            intensity: 1.0,
            enable_reflection: true,
            max_splashes: 100,
            max_ripples: 50,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RainDrop {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub speed: f64,
    pub opacity: f64,
    pub thickness: f64,
    pub angle: f64,
    pub color_index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplashParticle {
    pub pos: Point,
    pub vel: Vec2,
    pub size: f64,
    pub opacity: f64,
    pub life: u32,
    pub max_life: u32,
    pub color_index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ripple {
    pub center: Point,
    pub radius: f64,
    pub max_radius: f64,
    pub opacity: f64,
    pub speed: f64,
}

/// A drop reaching the ground above the given x.
pub fn spawn_raindrop(rng: &mut impl Rng, width: f64, ground_y: f64) -> RainDrop {
    RainDrop {
        x: rng.random::<f64>() * width,
        y: rng.random::<f64>() * ground_y * 0.3 - ground_y * 0.3,
        length: rng.random_range(10.0..40.0),
        speed: rng.random_range(8.0..20.0),
        opacity: rng.random_range(0.3..0.9),
        thickness: rng.random_range(1.0..3.0),
        angle: (rng.random::<f64>() - 0.5) * 0.1,
        color_index: rng.random_range(0..RAINDROP_COLORS.len()),
    }
}

/// Six to ten droplets thrown upward from `at`.
pub fn spawn_splash(rng: &mut impl Rng, at: Point) -> Vec<SplashParticle> {
    let count: usize = rng.random_range(6..=10);
    (0..count)
        .map(|_| {
            let angle = std::f64::consts::PI + (rng.random::<f64>() - 0.5) * std::f64::consts::PI;
            let speed = SPLASH_SPEED * (0.5 + rng.random::<f64>() * 0.5);
            SplashParticle {
                pos: at,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed * 1.5),
                size: rng.random_range(1.0..4.0),
                opacity: rng.random_range(0.5..0.9),
                life: SPLASH_LIFE,
                max_life: SPLASH_LIFE,
                color_index: rng.random_range(0..RAINDROP_COLORS.len()),
            }
        })
        .collect()
}

/// One to three concentric rings, each starting wider and fainter than the last.
pub fn spawn_ripples(rng: &mut impl Rng, at: Point) -> Vec<Ripple> {
    let count: u32 = rng.random_range(1..=3);
    (0..count)
        .map(|i| Ripple {
            center: at,
            radius: 2.0 + f64::from(i) * 3.0,
            max_radius: RIPPLE_MAX_RADIUS + rng.random::<f64>() * 10.0,
            opacity: 0.6 - f64::from(i) * 0.15,
            speed: RIPPLE_SPEED * (0.8 + rng.random::<f64>() * 0.4),
        })
        .collect()
}

/// True when every channel pair of a `#rrggbb` color differs by at most `tolerance`.
pub fn is_grayscale(color: &str, tolerance: u8) -> bool {
    if !color.starts_with('#') {
        return false;
    }
    Rgb8::from_hex(color).is_ok_and(|c| {
        c.r.abs_diff(c.g) <= tolerance
            && c.g.abs_diff(c.b) <= tolerance
            && c.r.abs_diff(c.b) <= tolerance
    })
}

pub fn verify_grayscale_colors() -> bool {
    RAINDROP_COLORS.iter().all(|c| is_grayscale(c, 10))
}

#[derive(Debug)]
pub struct InkRain {
    config: RainConfig,
    viewport: Viewport,
    rng: StdRng,
    drops: Vec<RainDrop>,
    splashes: Pool<SplashParticle>,
    ripples: Pool<Ripple>,
    camera_y: f64,
    active: bool,
    palette: [Rgb8; 5],
}

impl InkRain {
    pub fn new(config: RainConfig, viewport: Viewport, seed: u64) -> Self {
        let mut rain = Self {
            splashes: Pool::with_cap(config.max_splashes),
            ripples: Pool::with_cap(config.max_ripples),
            config,
            viewport,
            rng: StdRng::seed_from_u64(seed),
            drops: Vec::new(),
            camera_y: 0.0,
            active: true,
            palette: RAINDROP_COLORS.map(hex_to_rgb),
        };
        rain.init_drops();
        rain
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    /// Ground line in world space.
    pub fn ground_y(&self) -> f64 {
        self.viewport.height * self.config.ground_level_pct / 100.0
    }

    /// Render-time shift for the current camera height (`0` ground, `100` eye level).
    pub fn camera_offset(&self) -> f64 {
        self.camera_y / 100.0 * self.viewport.height * MAX_CAMERA_SHIFT
    }

    pub fn set_camera_y(&mut self, camera_y: f64) {
        self.camera_y = camera_y.clamp(0.0, 100.0);
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_reflection(&mut self, enabled: bool) {
        self.config.enable_reflection = enabled;
    }

    /// Change the drop budget; the pool is rebuilt when it actually changes.
    pub fn set_max_drops(&mut self, max_drops: u32) {
        if max_drops != self.config.max_drops {
            self.config.max_drops = max_drops;
            self.init_drops();
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.init_drops();
    }

    pub fn drops(&self) -> &[RainDrop] {
        &self.drops
    }

    pub fn splashes(&self) -> &Pool<SplashParticle> {
        &self.splashes
    }

    pub fn ripples(&self) -> &Pool<Ripple> {
        &self.ripples
    }

    /// Advance one frame. Returns how many drops landed.
    pub fn update(&mut self) -> usize {
        if !self.active {
            return 0;
        }
        let ground = self.ground_y();
        let mut landed = 0;
        for i in 0..self.drops.len() {
            if self.step_drop(i, ground) {
                landed += 1;
            }
        }

        self.splashes.update(|p| {
            p.pos += p.vel;
            p.vel.y += SPLASH_GRAVITY;
            p.life = p.life.saturating_sub(1);
            p.opacity = f64::from(p.life) / f64::from(p.max_life) * 0.9;
            p.life > 0
        });
        self.ripples.update(|r| {
            r.radius += r.speed;
            r.opacity -= RIPPLE_FADE;
            r.opacity > 0.0 && r.radius < r.max_radius
        });
        landed
    }

    pub fn render(&self, surface: Option<&mut dyn Surface>, time: Millis) {
        let Some(surface) = surface else {
            return;
        };
        if !self.active {
            return;
        }

        let offset = self.camera_offset();
        let ground = self.ground_y() + offset;
        surface.clear();
        if ground < self.viewport.height {
            surface.fill_band(ground, 5.0, GROUND_COLOR.with_alpha(0.3));
        }

        for drop in &self.drops {
            let color = self.palette[drop.color_index];
            let start = Point::new(drop.x, drop.y + offset);
            let (sin, cos) = drop.angle.sin_cos();
            let end = start + Vec2::new(-drop.length * sin, drop.length * cos);
            surface.stroke_line(start, end, drop.thickness, color.with_alpha(drop.opacity));

            if self.config.enable_reflection && start.y < ground {
                let mirrored_y = ground + (ground - start.y);
                let distortion =
                    (time * REFLECTION_FREQUENCY + drop.x * 0.01).sin() * REFLECTION_AMPLITUDE;
                let from = Point::new(drop.x + distortion, mirrored_y);
                let len = drop.length * REFLECTION_LENGTH;
                let to = from + Vec2::new(-len * sin, -len * cos);
                surface.stroke_line(
                    from,
                    to,
                    drop.thickness,
                    color.with_alpha(drop.opacity * REFLECTION_OPACITY),
                );
            }
        }

        let shift = Vec2::new(0.0, offset);
        for p in &self.splashes {
            let color: Rgba = self.palette[p.color_index].with_alpha(p.opacity);
            surface.fill_circle(p.pos + shift, p.size, color);
        }
        for r in &self.ripples {
            surface.stroke_ellipse(
                r.center + shift,
                Vec2::new(r.radius, r.radius * 0.3),
                1.0,
                RIPPLE_COLOR.with_alpha(r.opacity),
            );
        }
    }

    // Moves drop `i`; on landing spawns the splash and ripples and replaces the drop.
    fn step_drop(&mut self, i: usize, ground: f64) -> bool {
        let drop = &mut self.drops[i];
        drop.y += drop.speed;
        drop.x += drop.angle.sin() * drop.speed * 0.5;
        if drop.y < ground {
            return false;
        }

        let at = Point::new(drop.x, ground);
        let splash = spawn_splash(&mut self.rng, at);
        let ripples = spawn_ripples(&mut self.rng, at);
        self.splashes.extend(splash);
        self.ripples.extend(ripples);
        self.drops[i] = spawn_raindrop(&mut self.rng, self.viewport.width, ground);
        true
    }

    fn init_drops(&mut self) {
        let ground = self.ground_y();
        let intensity = self.config.intensity.clamp(0.0, 1.0);
        let target = (f64::from(self.config.max_drops) * intensity).floor() as usize;
        let width = self.viewport.width;
        let rng = &mut self.rng;
        self.drops = (0..target)
            .map(|_| {
                let mut drop = spawn_raindrop(rng, width, ground);
                drop.y = rng.random::<f64>() * ground;
                drop
            })
            .collect();
        tracing::debug!(drops = target, "rain initialised");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/ink_rain.rs"]
mod tests;
