use crate::foundation::error::{InkfolioError, InkfolioResult};

pub use kurbo::{Point, Rect, Vec2};

/// Milliseconds on a monotonic timeline (animation-frame timestamps).
pub type Millis = f64;

/// CSS-pixel size of the surface an effect draws into.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> InkfolioResult<Self> {
        if !(width.is_finite() && height.is_finite()) {
            return Err(InkfolioError::validation("viewport size must be finite"));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(InkfolioError::validation("viewport size must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn longest_side(self) -> f64 {
        self.width.max(self.height)
    }

    /// Map a point given in 0..1 fractions of the viewport to pixels.
    pub fn denormalize(self, p: Point) -> Point {
        Point::new(p.x * self.width, p.y * self.height)
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
