//! Drawing abstraction the effects render into.
//!
//! Effects describe each frame as a handful of primitive calls. A real backend
//! (canvas, GPU) implements [`Surface`]; [`DrawList`] records the calls so frames
//! can be inspected, counted or serialized.

use crate::color::rgb::Rgba;
use crate::foundation::core::{Point, Vec2, Viewport};

pub trait Surface {
    fn size(&self) -> Viewport;

    fn clear(&mut self);

    /// Gaussian blur applied to everything drawn until the next call; `0` disables it.
    fn set_blur(&mut self, radius_px: f64);

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);

    fn stroke_ellipse(&mut self, center: Point, radii: Vec2, width: f64, color: Rgba);

    fn fill_polygon(&mut self, points: &[Point], color: Rgba);

    /// Radial gradient from `inner` at the center to `outer` at `radius`.
    fn fill_radial(&mut self, center: Point, radius: f64, inner: Rgba, outer: Rgba);

    /// Horizontal band, transparent at `y ± half_height` and `color` at `y`.
    fn fill_band(&mut self, y: f64, half_height: f64, color: Rgba);

    /// Clear existing pixels through a soft radial mask (`destination-out`): fully
    /// erased inside `inner_radius`, untouched beyond `outer_radius`.
    fn erase_radial(&mut self, center: Point, inner_radius: f64, outer_radius: f64);
}

/// One recorded [`Surface`] call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCmd {
    Clear,
    SetBlur {
        radius_px: f64,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Rgba,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgba,
    },
    Ellipse {
        center: Point,
        radii: Vec2,
        width: f64,
        color: Rgba,
    },
    Polygon {
        points: Vec<Point>,
        color: Rgba,
    },
    Radial {
        center: Point,
        radius: f64,
        inner: Rgba,
        outer: Rgba,
    },
    Band {
        y: f64,
        half_height: f64,
        color: Rgba,
    },
    Erase {
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
    },
}

/// Recording surface.
#[derive(Clone, Debug)]
pub struct DrawList {
    viewport: Viewport,
    commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Hand over the recorded commands and start a fresh frame.
    pub fn take(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.commands)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Count of commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&DrawCmd) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for DrawList {
    fn size(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.commands.push(DrawCmd::Clear);
    }

    fn set_blur(&mut self, radius_px: f64) {
        self.commands.push(DrawCmd::SetBlur { radius_px });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        self.commands.push(DrawCmd::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_ellipse(&mut self, center: Point, radii: Vec2, width: f64, color: Rgba) {
        self.commands.push(DrawCmd::Ellipse {
            center,
            radii,
            width,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        self.commands.push(DrawCmd::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_radial(&mut self, center: Point, radius: f64, inner: Rgba, outer: Rgba) {
        self.commands.push(DrawCmd::Radial {
            center,
            radius,
            inner,
            outer,
        });
    }

    fn fill_band(&mut self, y: f64, half_height: f64, color: Rgba) {
        self.commands.push(DrawCmd::Band {
            y,
            half_height,
            color,
        });
    }

    fn erase_radial(&mut self, center: Point, inner_radius: f64, outer_radius: f64) {
        self.commands.push(DrawCmd::Erase {
            center,
            inner_radius,
            outer_radius,
        });
    }
}
