//! Paints: what a fill or stroke is colored with
//!
//! Every paint is evaluated by the render sink in the paint's own space. The
//! sink computes a signed distance to a rounded box of half size `extent`
//! and corner `radius`, then blends `inner_color` to `outer_color` over
//! `feather` units. Solid colors, gradients and image patterns are all
//! expressed through this one shape.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::transform::Transform2D;

/// Handle of a texture owned by the render sink
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(pub u32);

/// Paint descriptor handed to the render sink
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub transform: Transform2D,
    pub extent: [f32; 2],
    pub radius: f32,
    pub feather: f32,
    pub inner_color: Color,
    pub outer_color: Color,
    pub image: Option<ImageId>,
}

impl Default for Paint {
    fn default() -> Self {
        Self::color(Color::BLACK)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::color(color)
    }
}

impl Paint {
    /// Solid color paint
    pub fn color(color: Color) -> Self {
        Self {
            transform: Transform2D::identity(),
            extent: [0.0, 0.0],
            radius: 0.0,
            feather: 1.0,
            inner_color: color,
            outer_color: color,
            image: None,
        }
    }

    /// Linear gradient from `(sx, sy)` to `(ex, ey)`.
    ///
    /// Modelled as a huge box whose edge sits on the start point, so the
    /// feather spans exactly the gradient line.
    pub fn linear_gradient(
        sx: f32,
        sy: f32,
        ex: f32,
        ey: f32,
        inner_color: Color,
        outer_color: Color,
    ) -> Self {
        const LARGE: f32 = 1e5;

        let mut dx = ex - sx;
        let mut dy = ey - sy;
        let d = (dx * dx + dy * dy).sqrt();
        if d > 0.0001 {
            dx /= d;
            dy /= d;
        } else {
            dx = 0.0;
            dy = 1.0;
        }

        Self {
            transform: Transform2D::new(dy, -dx, dx, dy, sx - dx * LARGE, sy - dy * LARGE),
            extent: [LARGE, LARGE + d * 0.5],
            radius: 0.0,
            feather: d.max(1.0),
            inner_color,
            outer_color,
            image: None,
        }
    }

    /// Radial gradient centered at `(cx, cy)` fading between the two radii
    pub fn radial_gradient(
        cx: f32,
        cy: f32,
        inner_radius: f32,
        outer_radius: f32,
        inner_color: Color,
        outer_color: Color,
    ) -> Self {
        let r = (inner_radius + outer_radius) * 0.5;
        let f = outer_radius - inner_radius;

        Self {
            transform: Transform2D::translate(cx, cy),
            extent: [r, r],
            radius: r,
            feather: f.max(1.0),
            inner_color,
            outer_color,
            image: None,
        }
    }

    /// Feathered rounded box, commonly used for drop shadows
    #[allow(clippy::too_many_arguments)]
    pub fn box_gradient(
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        feather: f32,
        inner_color: Color,
        outer_color: Color,
    ) -> Self {
        Self {
            transform: Transform2D::translate(x + w * 0.5, y + h * 0.5),
            extent: [w * 0.5, h * 0.5],
            radius,
            feather: feather.max(1.0),
            inner_color,
            outer_color,
            image: None,
        }
    }

    /// Image pattern with its top-left at `(ox, oy)`, one tile `w` x `h`,
    /// rotated by `angle` radians around the origin.
    pub fn image_pattern(
        ox: f32,
        oy: f32,
        w: f32,
        h: f32,
        angle: f32,
        image: ImageId,
        alpha: f32,
    ) -> Self {
        let mut transform = Transform2D::rotate(angle);
        transform.e = ox;
        transform.f = oy;
        let tint = Color::new(1.0, 1.0, 1.0, alpha);

        Self {
            transform,
            extent: [w, h],
            radius: 0.0,
            feather: 0.0,
            inner_color: tint,
            outer_color: tint,
            image: Some(image),
        }
    }

    /// Multiply both colors' alpha by `alpha`
    pub fn fade(mut self, alpha: f32) -> Self {
        self.inner_color = self.inner_color.fade(alpha);
        self.outer_color = self.outer_color.fade(alpha);
        self
    }
}
