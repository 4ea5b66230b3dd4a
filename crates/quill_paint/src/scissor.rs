//! Scissor rectangles
//!
//! A scissor is a rectangle in some transformed space, stored as the
//! transform of its center plus half extents. The sink clips against it in
//! device space, so rotated scissors stay exact.

use serde::{Deserialize, Serialize};

use crate::primitives::Rect;
use crate::transform::Transform2D;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scissor {
    pub transform: Transform2D,
    /// Half width and half height; negative means "no scissor"
    pub extent: [f32; 2],
}

impl Default for Scissor {
    fn default() -> Self {
        Self::NONE
    }
}

impl Scissor {
    pub const NONE: Scissor = Scissor {
        transform: Transform2D {
            a: 0.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 0.0,
            f: 0.0,
        },
        extent: [-1.0, -1.0],
    };

    /// Scissor covering `(x, y, w, h)` in the space described by `transform`
    pub fn new(x: f32, y: f32, w: f32, h: f32, transform: &Transform2D) -> Self {
        let w = w.max(0.0);
        let h = h.max(0.0);
        let center = Transform2D::translate(x + w * 0.5, y + h * 0.5);
        Self {
            transform: center.multiply(transform),
            extent: [w * 0.5, h * 0.5],
        }
    }

    pub fn is_active(&self) -> bool {
        self.extent[0] >= 0.0
    }

    /// Intersect with `(x, y, w, h)` given in `transform` space.
    ///
    /// The current scissor is projected into `transform` space as an
    /// axis-aligned box first; under relative rotation this over-estimates.
    pub fn intersect(&self, x: f32, y: f32, w: f32, h: f32, transform: &Transform2D) -> Self {
        if !self.is_active() {
            return Self::new(x, y, w, h, transform);
        }

        let (inv, _) = transform.inverse_or_identity();
        let p = self.transform.multiply(&inv);
        let [ex, ey] = self.extent;
        let tex = ex * p.a.abs() + ey * p.c.abs();
        let tey = ex * p.b.abs() + ey * p.d.abs();

        let previous = Rect::new(p.e - tex, p.f - tey, tex * 2.0, tey * 2.0);
        let rect = previous.intersect(&Rect::new(x, y, w, h));
        Self::new(rect.x, rect.y, rect.width, rect.height, transform)
    }
}
