//! Quill Paint
//!
//! The state types a vector-graphics context carries alongside its paths.
//!
//! # Features
//!
//! - RGBA colors with HSL construction and interpolation
//! - 2x3 affine transforms with inversion and composition
//! - Paints: solid colors, linear/radial/box gradients and image patterns
//! - Scissor rectangles expressed in transformed space
//! - Porter-Duff composite operations lowered to blend factors

pub mod color;
pub mod composite;
pub mod paint;
pub mod primitives;
pub mod scissor;
pub mod transform;

pub use color::Color;
pub use composite::{BlendFactor, CompositeOperation, CompositeOperationState};
pub use paint::{ImageId, Paint};
pub use primitives::{Bounds, Point, Rect};
pub use scissor::Scissor;
pub use transform::{deg_to_rad, rad_to_deg, Transform2D};
