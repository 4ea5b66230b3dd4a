//! 2D affine transforms
//!
//! A `Transform2D` is the 2x3 matrix
//!
//! ```text
//! [a c e]
//! [b d f]
//! [0 0 1]
//! ```
//!
//! so a point maps to `(a*x + c*y + e, b*x + d*y + f)`.

use serde::{Deserialize, Serialize};

/// 2D affine transform
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: x,
            f: y,
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn scale_uniform(s: f32) -> Self {
        Self::scale(s, s)
    }

    /// Rotation by `angle` radians
    pub fn rotate(angle: f32) -> Self {
        let cos = angle.cos();
        let sin = angle.sin();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Skew along the x axis by `angle` radians
    pub fn skew_x(angle: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: angle.tan(),
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Skew along the y axis by `angle` radians
    pub fn skew_y(angle: f32) -> Self {
        Self {
            a: 1.0,
            b: angle.tan(),
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self` followed by `other`: points are mapped by `self` first.
    pub fn multiply(&self, other: &Transform2D) -> Transform2D {
        Transform2D {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// `other` followed by `self`: points are mapped by `other` first.
    pub fn premultiply(&self, other: &Transform2D) -> Transform2D {
        other.multiply(self)
    }

    pub fn determinant(&self) -> f64 {
        self.a as f64 * self.d as f64 - self.c as f64 * self.b as f64
    }

    /// Inverse transform, or `None` when the matrix is (nearly) singular.
    pub fn inverse(&self) -> Option<Transform2D> {
        let det = self.determinant();
        if det > -1e-6 && det < 1e-6 {
            return None;
        }
        let inv_det = 1.0 / det;
        let (a, b, c, d, e, f) = (
            self.a as f64,
            self.b as f64,
            self.c as f64,
            self.d as f64,
            self.e as f64,
            self.f as f64,
        );
        Some(Transform2D {
            a: (d * inv_det) as f32,
            b: (-b * inv_det) as f32,
            c: (-c * inv_det) as f32,
            d: (a * inv_det) as f32,
            e: ((c * f - d * e) * inv_det) as f32,
            f: ((b * e - a * f) * inv_det) as f32,
        })
    }

    /// Inverse transform, substituting identity for a singular matrix.
    ///
    /// The flag is `false` when the substitution happened.
    pub fn inverse_or_identity(&self) -> (Transform2D, bool) {
        match self.inverse() {
            Some(inv) => (inv, true),
            None => {
                tracing::trace!(transform = ?self, "singular transform, using identity inverse");
                (Transform2D::identity(), false)
            }
        }
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Mean of the x and y axis scale factors
    pub fn average_scale(&self) -> f32 {
        let sx = (self.a * self.a + self.c * self.c).sqrt();
        let sy = (self.b * self.b + self.d * self.d).sqrt();
        (sx + sy) * 0.5
    }

    pub fn to_array(&self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

pub fn deg_to_rad(deg: f32) -> f32 {
    deg / 180.0 * std::f32::consts::PI
}

pub fn rad_to_deg(rad: f32) -> f32 {
    rad / std::f32::consts::PI * 180.0
}
