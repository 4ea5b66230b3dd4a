//! Flattened path storage
//!
//! The cache owns three growable buffers (points, sub-paths, vertices) that
//! are cleared, never shrunk, between paths. Sub-paths refer to points and
//! vertices by index range so the buffers can reallocate freely while
//! geometry is being produced.

use std::ops::Range;

use bitflags::bitflags;
use quill_paint::Bounds;

use crate::command::Winding;
use crate::vertex::Vertex;

bitflags! {
    /// Per-point classification produced by flattening and join analysis
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointFlags: u8 {
        /// Point came from a command end, not from curve subdivision
        const CORNER = 0x01;
        /// Path turns left at this point
        const LEFT = 0x02;
        /// Outer side needs a bevel or round join
        const BEVEL = 0x04;
        /// Inner side overlaps too much for a miter
        const INNER_BEVEL = 0x08;
    }
}

/// Device-space sample on a flattened sub-path.
///
/// `dx, dy` is the unit direction to the next point and `len` the distance
/// to it. `dmx, dmy` is the extrusion (miter) vector, filled in by join
/// analysis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathPoint {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub len: f32,
    pub dmx: f32,
    pub dmy: f32,
    pub flags: PointFlags,
}

impl PathPoint {
    pub fn new(x: f32, y: f32, flags: PointFlags) -> Self {
        Self {
            x,
            y,
            flags,
            ..Default::default()
        }
    }

    /// Whether the outer side of this point needs extra join vertices
    pub fn needs_bevel(&self) -> bool {
        self.flags.intersects(PointFlags::BEVEL | PointFlags::INNER_BEVEL)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubPath {
    pub first: usize,
    pub count: usize,
    pub closed: bool,
    pub winding: Winding,
    /// Points flagged BEVEL or INNER_BEVEL by the last join analysis
    pub bevel_count: usize,
    /// Every point turns left; overridden by `expand_fill` with the fill-level decision
    pub convex: bool,
    pub fill: Range<usize>,
    pub stroke: Range<usize>,
}

impl SubPath {
    pub(crate) fn new(first: usize) -> Self {
        Self {
            first,
            count: 0,
            closed: false,
            winding: Winding::SOLID,
            bevel_count: 0,
            convex: false,
            fill: 0..0,
            stroke: 0..0,
        }
    }

    pub fn points(&self) -> Range<usize> {
        self.first..self.first + self.count
    }
}

/// Tolerances derived from the device pixel ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    /// Flatness limit for curve subdivision
    pub tess: f32,
    /// Points closer than this are merged
    pub dist: f32,
    /// Width of the antialiasing fringe
    pub fringe: f32,
}

impl Tolerances {
    pub fn for_pixel_ratio(ratio: f32) -> Self {
        Self {
            tess: 0.25 / ratio,
            dist: 0.01 / ratio,
            fringe: 1.0 / ratio,
        }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::for_pixel_ratio(1.0)
    }
}

/// Geometry for one sub-path as handed to a render sink
#[derive(Clone, Copy, Debug)]
pub struct DrawPath<'a> {
    pub fill: &'a [Vertex],
    pub stroke: &'a [Vertex],
    pub closed: bool,
    /// After a fill: the whole fill may skip the stencil pass
    pub convex: bool,
    pub winding: Winding,
}

#[derive(Debug, Default)]
pub struct PathCache {
    pub(crate) points: Vec<PathPoint>,
    pub(crate) subpaths: Vec<SubPath>,
    pub(crate) verts: Vec<Vertex>,
    pub(crate) bounds: Bounds,
    /// Command buffer revision the points were flattened from
    pub(crate) revision: Option<u64>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the flattened path; buffers keep their capacity
    pub fn clear(&mut self) {
        self.points.clear();
        self.subpaths.clear();
        self.verts.clear();
        self.bounds = Bounds::EMPTY;
        self.revision = None;
    }

    pub fn is_current(&self, revision: u64) -> bool {
        self.revision == Some(revision)
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    pub fn subpath_points(&self, subpath: &SubPath) -> &[PathPoint] {
        &self.points[subpath.points()]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.verts
    }

    pub fn fill_vertices(&self, subpath: &SubPath) -> &[Vertex] {
        &self.verts[subpath.fill.clone()]
    }

    pub fn stroke_vertices(&self, subpath: &SubPath) -> &[Vertex] {
        &self.verts[subpath.stroke.clone()]
    }

    /// Device-space bounds of every flattened point
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// True when the path is a single convex solid sub-path
    pub fn is_convex_fill(&self) -> bool {
        matches!(self.subpaths.as_slice(), [sp] if sp.convex && sp.winding == Winding::SOLID)
    }

    /// Borrowed per-sub-path geometry for the render sink
    pub fn draw_paths(&self) -> impl Iterator<Item = DrawPath<'_>> + '_ {
        self.subpaths.iter().map(move |sp| DrawPath {
            fill: &self.verts[sp.fill.clone()],
            stroke: &self.verts[sp.stroke.clone()],
            closed: sp.closed,
            convex: sp.convex,
            winding: sp.winding,
        })
    }
}
