//! Backlit profile figure with a smoking cycle driving the cigarette glow.

use kurbo::{BezPath, PathEl};

use crate::animation::ease::ease_in_out_cubic;
use crate::color::rgb::Rgb8;
use crate::effects::surface::Surface;
use crate::foundation::core::{Millis, Point, Viewport};
use crate::foundation::error::{InkfolioError, InkfolioResult};

const SILHOUETTE_PATH: &str = "M 180 50 C 175 45, 165 40, 155 42 C 145 44, 138 48, 132 55 \
    C 126 62, 122 72, 120 85 C 118 95, 118 105, 120 115 C 122 125, 126 132, 132 138 L 135 142 \
    C 138 148, 142 155, 148 160 L 155 165 C 158 168, 160 172, 160 178 C 160 182, 158 186, 154 190 \
    L 148 195 C 144 198, 142 202, 142 208 L 142 215 C 142 222, 145 228, 150 232 L 158 238 \
    C 165 242, 172 248, 178 258 L 185 275 C 190 288, 195 300, 200 320 L 200 400 L 100 400 \
    L 100 320 C 105 300, 110 285, 118 270 C 125 258, 132 250, 140 245 L 142 215 L 142 208 \
    C 142 202, 140 198, 136 195 L 130 190 C 126 186, 124 182, 124 178 C 124 172, 126 168, 130 165 \
    L 138 160 C 144 155, 148 148, 150 142 L 152 138 C 156 132, 158 125, 158 115 \
    C 158 105, 156 95, 152 85 C 148 72, 142 62, 135 55 C 128 48, 120 44, 112 42 \
    C 104 40, 95 42, 88 48 C 82 54, 78 62, 76 72 C 74 82, 75 92, 78 100 C 82 110, 88 118, 95 125 \
    L 100 130 C 105 135, 108 142, 110 150 L 112 160 C 114 170, 118 178, 125 185 L 135 195 \
    C 142 200, 148 208, 152 218 L 155 230 C 158 242, 162 255, 168 268 L 180 50 Z";

const HAIR_PATH: &str = "M 180 50 C 175 35, 160 25, 145 28 C 130 31, 118 40, 112 55 \
    C 108 65, 106 78, 108 90 L 120 85 C 118 75, 120 65, 126 58 C 132 51, 142 46, 155 44 \
    C 168 42, 178 46, 180 50 Z";

const CIGARETTE_PATH: &str = "M 162 192 L 210 180 L 212 184 L 164 196 Z";

/// Artwork coordinate space.
pub const VIEW_BOX: (f64, f64) = (300.0, 450.0);
pub const CIGARETTE_TIP: Point = Point::new(211.0, 182.0);
pub const MOUTH_POSITION: Point = Point::new(160.0, 194.0);
// Chest expansion pivots here.
const CHEST_ORIGIN_Y: f64 = 270.0;
const FLATTEN_TOLERANCE: f64 = 0.25;

const FIGURE_COLOR: Rgb8 = Rgb8::new(0x0a, 0x0a, 0x0a);
const BACKLIGHT_COLOR: Rgb8 = Rgb8::WHITE;
const GLOW_COLOR: Rgb8 = Rgb8::new(0xff, 0x6b, 0x35);
const IDLE_COLOR: Rgb8 = Rgb8::new(0x8b, 0x45, 0x13);
const EMBER_COLOR: Rgb8 = Rgb8::new(0xff, 0xaa, 0x00);

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SilhouetteConfig {
    pub backlight_blur: f64,
    pub backlight_opacity: f64,
    pub glow_radius: f64,
    pub max_glow_radius: f64,
    pub inhale_ms: Millis,
    pub exhale_delay_ms: Millis,
    pub exhale_ms: Millis,
    pub chest_expansion: f64,
}

impl Default for SilhouetteConfig {
    fn default() -> Self {
        Self {
            backlight_blur: 20.0,
            backlight_opacity: 0.6,
            glow_radius: 8.0,
            max_glow_radius: 12.0,
            inhale_ms: 800.0,
            exhale_delay_ms: 200.0,
            exhale_ms: 1500.0,
            chest_expansion: 1.02,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmokingPhase {
    #[default]
    Idle,
    Inhale,
    Exhale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SilhouetteEvent {
    ExhaleStarted,
    CycleComplete,
}

/// Idle glow of the cigarette tip.
pub const IDLE_GLOW: f64 = 0.2;

/// One inhale/hold/exhale pass with eased glow.
///
/// Timeline from `start`: inhale ramps the glow 0.2 -> 1.0, a hold keeps it at
/// 1.0 for the exhale delay, a 100 ms hand-off switches to exhale, then the glow
/// eases down toward 0.3 until `inhale_ms + exhale_ms`, after which the cycle
/// returns to idle.
#[derive(Clone, Debug)]
pub struct SmokingCycle {
    config: SilhouetteConfig,
    start: Option<Millis>,
    phase: SmokingPhase,
    glow: f64,
    exhale_announced: bool,
}

impl SmokingCycle {
    pub fn new(config: SilhouetteConfig) -> Self {
        Self {
            config,
            start: None,
            phase: SmokingPhase::Idle,
            glow: IDLE_GLOW,
            exhale_announced: false,
        }
    }

    pub fn start(&mut self, now: Millis) {
        self.start = Some(now);
        self.phase = SmokingPhase::Inhale;
        self.exhale_announced = false;
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some()
    }

    pub fn phase(&self) -> SmokingPhase {
        self.phase
    }

    pub fn glow(&self) -> f64 {
        self.glow
    }

    pub fn tick(&mut self, now: Millis) -> Option<SilhouetteEvent> {
        let start = self.start?;
        let c = &self.config;
        let elapsed = (now - start).max(0.0);
        let hold_end = c.inhale_ms + c.exhale_delay_ms;
        let handoff_end = hold_end + 100.0;
        let cycle_end = c.inhale_ms + c.exhale_ms;

        if elapsed < c.inhale_ms {
            self.glow = IDLE_GLOW + ease_in_out_cubic(elapsed / c.inhale_ms) * 0.8;
            None
        } else if elapsed < hold_end {
            self.glow = 1.0;
            None
        } else if elapsed < handoff_end {
            self.phase = SmokingPhase::Exhale;
            if self.exhale_announced {
                None
            } else {
                self.exhale_announced = true;
                Some(SilhouetteEvent::ExhaleStarted)
            }
        } else if elapsed < cycle_end {
            self.phase = SmokingPhase::Exhale;
            let span = (c.exhale_ms - c.exhale_delay_ms - 100.0).max(1.0);
            let p = ((elapsed - handoff_end) / span).min(1.0);
            self.glow = 1.0 - ease_in_out_cubic(p) * 0.7;
            None
        } else {
            self.start = None;
            self.phase = SmokingPhase::Idle;
            self.glow = IDLE_GLOW;
            Some(SilhouetteEvent::CycleComplete)
        }
    }
}

/// The figure itself: visibility, backlight, chest scale and cigarette glow.
#[derive(Clone, Debug)]
pub struct Silhouette {
    config: SilhouetteConfig,
    body: Vec<Vec<Point>>,
    hair: Vec<Vec<Point>>,
    cigarette: Vec<Vec<Point>>,

    visible: bool,
    backlight_intensity: f64,
    smoking_phase: SmokingPhase,
    chest_scale: f64,
    internal_glow: f64,
    external_glow: f64,
    exhale_triggered: bool,
    exhale_due: Option<Millis>,
}

impl Silhouette {
    pub fn new(config: SilhouetteConfig) -> InkfolioResult<Self> {
        Ok(Self {
            config,
            body: flatten_svg(SILHOUETTE_PATH)?,
            hair: flatten_svg(HAIR_PATH)?,
            cigarette: flatten_svg(CIGARETTE_PATH)?,
            visible: false,
            backlight_intensity: 0.6,
            smoking_phase: SmokingPhase::Idle,
            chest_scale: 1.0,
            internal_glow: IDLE_GLOW,
            external_glow: 0.0,
            exhale_triggered: false,
            exhale_due: None,
        })
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_backlight_intensity(&mut self, intensity: f64) {
        self.backlight_intensity = intensity.clamp(0.0, 1.0);
    }

    /// Externally driven tip glow; `0` falls back to the phase default.
    pub fn set_cigarette_glow(&mut self, glow: f64) {
        self.external_glow = glow.clamp(0.0, 1.0);
    }

    /// Switch smoking phase. Entering exhale schedules a one-shot
    /// [`SilhouetteEvent::ExhaleStarted`] after the exhale delay; any further phase
    /// change before then cancels it. Returning to idle after an exhale reports
    /// [`SilhouetteEvent::CycleComplete`].
    pub fn set_smoking_phase(
        &mut self,
        phase: SmokingPhase,
        now: Millis,
    ) -> Option<SilhouetteEvent> {
        if phase == self.smoking_phase {
            return None;
        }
        self.smoking_phase = phase;
        self.exhale_due = None;
        match phase {
            SmokingPhase::Inhale => {
                self.chest_scale = self.config.chest_expansion;
                self.internal_glow = 1.0;
                self.exhale_triggered = false;
                None
            }
            SmokingPhase::Exhale => {
                self.chest_scale = 1.0;
                self.internal_glow = 0.3;
                if !self.exhale_triggered {
                    self.exhale_triggered = true;
                    self.exhale_due = Some(now + self.config.exhale_delay_ms);
                }
                None
            }
            SmokingPhase::Idle => {
                self.chest_scale = 1.0;
                self.internal_glow = IDLE_GLOW;
                if self.exhale_triggered {
                    self.exhale_triggered = false;
                    Some(SilhouetteEvent::CycleComplete)
                } else {
                    None
                }
            }
        }
    }

    pub fn tick(&mut self, now: Millis) -> Option<SilhouetteEvent> {
        match self.exhale_due {
            Some(due) if now >= due => {
                self.exhale_due = None;
                Some(SilhouetteEvent::ExhaleStarted)
            }
            _ => None,
        }
    }

    pub fn smoking_phase(&self) -> SmokingPhase {
        self.smoking_phase
    }

    pub fn chest_scale(&self) -> f64 {
        self.chest_scale
    }

    pub fn effective_glow(&self) -> f64 {
        if self.external_glow > 0.0 {
            self.external_glow
        } else {
            self.internal_glow
        }
    }

    pub fn backlight_blur(&self) -> f64 {
        self.config.backlight_blur * self.backlight_intensity
    }

    pub fn backlight_opacity(&self) -> f64 {
        self.config.backlight_opacity * self.backlight_intensity
    }

    pub fn render(&self, surface: Option<&mut dyn Surface>) {
        let Some(surface) = surface else {
            return;
        };
        if !self.visible {
            return;
        }

        let map = ArtMapping::fit(surface.size());
        let glow = self.effective_glow();

        surface.fill_radial(
            map.point(Point::new(150.0, 200.0)),
            180.0 * map.scale,
            BACKLIGHT_COLOR.with_alpha(0.1 * self.backlight_intensity),
            BACKLIGHT_COLOR.with_alpha(0.0),
        );

        surface.set_blur(self.backlight_blur());
        let backlight = BACKLIGHT_COLOR.with_alpha(self.backlight_opacity());
        for poly in &self.body {
            surface.fill_polygon(&self.place(&map, poly), backlight);
        }
        surface.set_blur(0.0);

        for poly in self.hair.iter().chain(&self.body) {
            surface.fill_polygon(&self.place(&map, poly), FIGURE_COLOR.with_alpha(1.0));
        }
        for poly in &self.cigarette {
            surface.fill_polygon(&self.place(&map, poly), IDLE_COLOR.with_alpha(1.0));
        }

        let tip = map.point(self.chest(CIGARETTE_TIP));
        let glow_radius = (3.0 + glow * 3.0).min(self.config.max_glow_radius) * map.scale;
        surface.set_blur(self.config.glow_radius * glow * map.scale);
        surface.fill_circle(tip, glow_radius, GLOW_COLOR.with_alpha(glow));
        surface.set_blur(0.0);
        surface.fill_circle(tip, 2.0 * map.scale, EMBER_COLOR.with_alpha(0.5 + glow * 0.5));
    }

    fn chest(&self, p: Point) -> Point {
        Point::new(p.x, CHEST_ORIGIN_Y + (p.y - CHEST_ORIGIN_Y) * self.chest_scale)
    }

    fn place(&self, map: &ArtMapping, poly: &[Point]) -> Vec<Point> {
        poly.iter().map(|&p| map.point(self.chest(p))).collect()
    }
}

// Centers the artwork, at most 80% of the viewport height.
struct ArtMapping {
    scale: f64,
    origin: Point,
}

impl ArtMapping {
    fn fit(viewport: Viewport) -> Self {
        let (w, h) = VIEW_BOX;
        let scale = (viewport.width / w).min(viewport.height * 0.8 / h);
        let origin = Point::new(
            (viewport.width - w * scale) / 2.0,
            (viewport.height - h * scale) / 2.0,
        );
        Self { scale, origin }
    }

    fn point(&self, p: Point) -> Point {
        Point::new(self.origin.x + p.x * self.scale, self.origin.y + p.y * self.scale)
    }
}

fn flatten_svg(d: &str) -> InkfolioResult<Vec<Vec<Point>>> {
    let path = BezPath::from_svg(d)
        .map_err(|e| InkfolioError::validation(format!("invalid silhouette path: {e}")))?;
    let mut polys: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            if current.len() > 2 {
                polys.push(std::mem::take(&mut current));
            }
            current.clear();
            current.push(p);
        }
        PathEl::LineTo(p) => current.push(p),
        PathEl::ClosePath => {
            if current.len() > 2 {
                polys.push(std::mem::take(&mut current));
            }
            current.clear();
        }
        _ => {}
    });
    if current.len() > 2 {
        polys.push(current);
    }
    Ok(polys)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/silhouette.rs"]
mod tests;
