//! Fill expansion
//!
//! Produces, per sub-path, a triangle-fan interior and (with antialiasing)
//! a closed fringe strip around it. A single convex solid sub-path gets
//! only half a fringe, so it can be drawn without stencilling.

use tracing::trace;

use crate::cache::{PathCache, PointFlags};
use crate::error::{try_grow, Result};
use crate::joins::bevel_join;
use crate::vertex::{LineJoin, Vertex};

/// Result of expanding a fill
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillExpansion {
    /// Vertices reserved before expansion; never exceeded
    pub vertex_budget: usize,
    /// The path can be drawn as a plain fan without stencilling
    pub convex: bool,
}

impl PathCache {
    /// Upper bound on the vertices `expand_fill` writes for the current
    /// join analysis.
    pub fn fill_vertex_budget(&self, fringe: bool) -> usize {
        self.subpaths
            .iter()
            .map(|sp| {
                let mut n = sp.count + sp.bevel_count + 1;
                if fringe {
                    n += (sp.count + sp.bevel_count * 5 + 1) * 2;
                }
                n
            })
            .sum()
    }

    /// Expand the flattened path into fill geometry.
    ///
    /// `w` is the fringe width to extrude (0 disables antialiasing) and
    /// `fringe_width` the device fringe the inset is derived from.
    pub fn expand_fill(
        &mut self,
        w: f32,
        line_join: LineJoin,
        miter_limit: f32,
        fringe_width: f32,
    ) -> Result<FillExpansion> {
        let has_fringe = w > 0.0;
        self.calculate_joins(w, line_join, miter_limit);

        let budget = self.fill_vertex_budget(has_fringe);
        self.verts.clear();
        try_grow(&mut self.verts, budget, "fill vertices")?;

        let convex = self.is_convex_fill();
        let woff = 0.5 * fringe_width;

        let PathCache {
            points,
            subpaths,
            verts,
            ..
        } = self;

        for sp in subpaths.iter_mut() {
            let pts = &points[sp.points()];
            let n = pts.len();
            // Sinks read convexity per sub-path; it must match the stencil decision
            sp.convex = convex;

            // Interior, inset by half the fringe when antialiasing
            let start = verts.len();
            if has_fringe {
                for i in 0..n {
                    let p0 = &pts[(i + n - 1) % n];
                    let p1 = &pts[i];
                    if p1.flags.contains(PointFlags::BEVEL) {
                        if p1.flags.contains(PointFlags::LEFT) {
                            verts.push(Vertex::new(
                                p1.x + p1.dmx * woff,
                                p1.y + p1.dmy * woff,
                                0.5,
                                1.0,
                            ));
                        } else {
                            verts.push(Vertex::new(
                                p1.x + p0.dy * woff,
                                p1.y - p0.dx * woff,
                                0.5,
                                1.0,
                            ));
                            verts.push(Vertex::new(
                                p1.x + p1.dy * woff,
                                p1.y - p1.dx * woff,
                                0.5,
                                1.0,
                            ));
                        }
                    } else {
                        verts.push(Vertex::new(
                            p1.x + p1.dmx * woff,
                            p1.y + p1.dmy * woff,
                            0.5,
                            1.0,
                        ));
                    }
                }
            } else {
                verts.extend(pts.iter().map(|p| Vertex::new(p.x, p.y, 0.5, 1.0)));
            }
            sp.fill = start..verts.len();

            // Fringe strip
            let start = verts.len();
            if has_fringe && n > 0 {
                let (lw, lu) = if convex { (woff, 0.5) } else { (w + woff, 0.0) };
                let rw = w - woff;
                let ru = 1.0;

                for i in 0..n {
                    let p0 = &pts[(i + n - 1) % n];
                    let p1 = &pts[i];
                    if p1.needs_bevel() {
                        bevel_join(verts, p0, p1, lw, rw, lu, ru);
                    } else {
                        verts.push(Vertex::new(p1.x + p1.dmx * lw, p1.y + p1.dmy * lw, lu, 1.0));
                        verts.push(Vertex::new(p1.x - p1.dmx * rw, p1.y - p1.dmy * rw, ru, 1.0));
                    }
                }

                let (v0, v1) = (verts[start], verts[start + 1]);
                verts.push(Vertex::new(v0.x, v0.y, lu, 1.0));
                verts.push(Vertex::new(v1.x, v1.y, ru, 1.0));
            }
            sp.stroke = start..verts.len();
        }

        debug_assert!(self.verts.len() <= budget);
        trace!(
            vertices = self.verts.len(),
            budget,
            convex,
            "Expanded fill"
        );

        Ok(FillExpansion {
            vertex_budget: budget,
            convex,
        })
    }
}
