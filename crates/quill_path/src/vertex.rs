//! Output vertices and stroke styles

use bytemuck::{Pod, Zeroable};

/// A device-space vertex with coverage coordinates.
///
/// `u` ramps across the antialiasing fringe (0 outside, 1 inside). For
/// strokes `v` runs along the stroke; fills only use 1.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self { x, y, u, v }
    }
}

/// How the ends of open sub-paths are drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// How consecutive segments meet at a corner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}
