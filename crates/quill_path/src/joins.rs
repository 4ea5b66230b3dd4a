//! Join analysis and join geometry
//!
//! `calculate_joins` classifies every flattened point for a given
//! extrusion width. The emitters below turn a classified point into the
//! triangle-strip vertices shared by fill fringes and strokes.

use std::f32::consts::PI;

use crate::cache::{PathCache, PathPoint, PointFlags};
use crate::math::cross;
use crate::vertex::{LineJoin, Vertex};

/// Upper bound on the miter scale, keeps near-reversals finite
const MAX_MITER_SCALE: f32 = 600.0;

impl PathCache {
    /// Compute extrusion vectors and join flags for half-width `w`.
    ///
    /// Also counts the points needing bevel geometry and decides convexity
    /// per sub-path. Directions must already be set by flattening.
    pub fn calculate_joins(&mut self, w: f32, line_join: LineJoin, miter_limit: f32) {
        let iw = if w > 0.0 { 1.0 / w } else { 0.0 };
        let PathCache {
            points, subpaths, ..
        } = self;

        for sp in subpaths.iter_mut() {
            let pts = &mut points[sp.points()];
            let n = pts.len();
            let mut left_turns = 0;
            sp.bevel_count = 0;

            for i in 0..n {
                let p0 = pts[(i + n - 1) % n];
                let p1 = &mut pts[i];

                p1.dmx = (p0.dy + p1.dy) * 0.5;
                p1.dmy = (-p0.dx - p1.dx) * 0.5;
                let dmr2 = p1.dmx * p1.dmx + p1.dmy * p1.dmy;
                if dmr2 > 1e-6 {
                    let scale = (1.0 / dmr2).min(MAX_MITER_SCALE);
                    p1.dmx *= scale;
                    p1.dmy *= scale;
                }

                p1.flags &= PointFlags::CORNER;

                let turn = cross(p0.dx, p0.dy, p1.dx, p1.dy);
                if turn > 0.0 {
                    left_turns += 1;
                    p1.flags |= PointFlags::LEFT;
                }

                // Inner side: the miter would reach past the shorter segment
                let limit = (p0.len.min(p1.len) * iw).max(1.01);
                if dmr2 * limit * limit < 1.0 {
                    p1.flags |= PointFlags::INNER_BEVEL;
                }

                if p1.flags.contains(PointFlags::CORNER)
                    && (dmr2 * miter_limit * miter_limit < 1.0
                        || matches!(line_join, LineJoin::Bevel | LineJoin::Round))
                {
                    p1.flags |= PointFlags::BEVEL;
                }

                if p1.needs_bevel() {
                    sp.bevel_count += 1;
                }
            }

            // Convex only when every point turns left; hole rings turn right
            sp.convex = n > 0 && left_turns == n;
        }
    }
}

/// Offset points on one side of `p1`: the two segment normals when the
/// inner side bevels, the miter point twice otherwise.
fn choose_bevel(p0: &PathPoint, p1: &PathPoint, w: f32) -> [(f32, f32); 2] {
    if p1.flags.contains(PointFlags::INNER_BEVEL) {
        [
            (p1.x + p0.dy * w, p1.y - p0.dx * w),
            (p1.x + p1.dy * w, p1.y - p1.dx * w),
        ]
    } else {
        let m = (p1.x + p1.dmx * w, p1.y + p1.dmy * w);
        [m, m]
    }
}

/// Emit a bevel join at `p1`; at most ten vertices.
pub(crate) fn bevel_join(
    dst: &mut Vec<Vertex>,
    p0: &PathPoint,
    p1: &PathPoint,
    lw: f32,
    rw: f32,
    lu: f32,
    ru: f32,
) {
    let (dlx0, dly0) = (p0.dy, -p0.dx);
    let (dlx1, dly1) = (p1.dy, -p1.dx);

    if p1.flags.contains(PointFlags::LEFT) {
        let [(lx0, ly0), (lx1, ly1)] = choose_bevel(p0, p1, lw);
        let r0 = (p1.x - dlx0 * rw, p1.y - dly0 * rw);
        let r1 = (p1.x - dlx1 * rw, p1.y - dly1 * rw);

        dst.push(Vertex::new(lx0, ly0, lu, 1.0));
        dst.push(Vertex::new(r0.0, r0.1, ru, 1.0));

        if p1.flags.contains(PointFlags::BEVEL) {
            dst.push(Vertex::new(lx0, ly0, lu, 1.0));
            dst.push(Vertex::new(r0.0, r0.1, ru, 1.0));
            dst.push(Vertex::new(lx1, ly1, lu, 1.0));
            dst.push(Vertex::new(r1.0, r1.1, ru, 1.0));
        } else {
            let rx0 = p1.x - p1.dmx * rw;
            let ry0 = p1.y - p1.dmy * rw;
            dst.push(Vertex::new(p1.x, p1.y, 0.5, 1.0));
            dst.push(Vertex::new(r0.0, r0.1, ru, 1.0));
            dst.push(Vertex::new(rx0, ry0, ru, 1.0));
            dst.push(Vertex::new(rx0, ry0, ru, 1.0));
            dst.push(Vertex::new(p1.x, p1.y, 0.5, 1.0));
            dst.push(Vertex::new(r1.0, r1.1, ru, 1.0));
        }

        dst.push(Vertex::new(lx1, ly1, lu, 1.0));
        dst.push(Vertex::new(r1.0, r1.1, ru, 1.0));
    } else {
        let [(rx0, ry0), (rx1, ry1)] = choose_bevel(p0, p1, -rw);
        let l0 = (p1.x + dlx0 * lw, p1.y + dly0 * lw);
        let l1 = (p1.x + dlx1 * lw, p1.y + dly1 * lw);

        dst.push(Vertex::new(l0.0, l0.1, lu, 1.0));
        dst.push(Vertex::new(rx0, ry0, ru, 1.0));

        if p1.flags.contains(PointFlags::BEVEL) {
            dst.push(Vertex::new(l0.0, l0.1, lu, 1.0));
            dst.push(Vertex::new(rx0, ry0, ru, 1.0));
            dst.push(Vertex::new(l1.0, l1.1, lu, 1.0));
            dst.push(Vertex::new(rx1, ry1, ru, 1.0));
        } else {
            let lx0 = p1.x + p1.dmx * lw;
            let ly0 = p1.y + p1.dmy * lw;
            dst.push(Vertex::new(l0.0, l0.1, lu, 1.0));
            dst.push(Vertex::new(p1.x, p1.y, 0.5, 1.0));
            dst.push(Vertex::new(lx0, ly0, lu, 1.0));
            dst.push(Vertex::new(lx0, ly0, lu, 1.0));
            dst.push(Vertex::new(l1.0, l1.1, lu, 1.0));
            dst.push(Vertex::new(p1.x, p1.y, 0.5, 1.0));
        }

        dst.push(Vertex::new(l1.0, l1.1, lu, 1.0));
        dst.push(Vertex::new(rx1, ry1, ru, 1.0));
    }
}

/// Emit a round join at `p1` with up to `ncap` fan steps on the outer side.
#[allow(clippy::too_many_arguments)]
pub(crate) fn round_join(
    dst: &mut Vec<Vertex>,
    p0: &PathPoint,
    p1: &PathPoint,
    lw: f32,
    rw: f32,
    lu: f32,
    ru: f32,
    ncap: usize,
) {
    let (dlx0, dly0) = (p0.dy, -p0.dx);
    let (dlx1, dly1) = (p1.dy, -p1.dx);
    let steps = |sweep: f32| ((sweep / PI * ncap as f32).ceil() as usize).clamp(2, ncap.max(2));

    if p1.flags.contains(PointFlags::LEFT) {
        let [(lx0, ly0), (lx1, ly1)] = choose_bevel(p0, p1, lw);
        let a0 = (-dly0).atan2(-dlx0);
        let mut a1 = (-dly1).atan2(-dlx1);
        if a1 > a0 {
            a1 -= PI * 2.0;
        }

        dst.push(Vertex::new(lx0, ly0, lu, 1.0));
        dst.push(Vertex::new(p1.x - dlx0 * rw, p1.y - dly0 * rw, ru, 1.0));

        let n = steps(a0 - a1);
        for i in 0..n {
            let u = i as f32 / (n - 1) as f32;
            let a = a0 + u * (a1 - a0);
            dst.push(Vertex::new(p1.x, p1.y, 0.5, 1.0));
            dst.push(Vertex::new(p1.x + a.cos() * rw, p1.y + a.sin() * rw, ru, 1.0));
        }

        dst.push(Vertex::new(lx1, ly1, lu, 1.0));
        dst.push(Vertex::new(p1.x - dlx1 * rw, p1.y - dly1 * rw, ru, 1.0));
    } else {
        let [(rx0, ry0), (rx1, ry1)] = choose_bevel(p0, p1, -rw);
        let a0 = dly0.atan2(dlx0);
        let mut a1 = dly1.atan2(dlx1);
        if a1 < a0 {
            a1 += PI * 2.0;
        }

        dst.push(Vertex::new(p1.x + dlx0 * rw, p1.y + dly0 * rw, lu, 1.0));
        dst.push(Vertex::new(rx0, ry0, ru, 1.0));

        let n = steps(a1 - a0);
        for i in 0..n {
            let u = i as f32 / (n - 1) as f32;
            let a = a0 + u * (a1 - a0);
            dst.push(Vertex::new(p1.x + a.cos() * lw, p1.y + a.sin() * lw, lu, 1.0));
            dst.push(Vertex::new(p1.x, p1.y, 0.5, 1.0));
        }

        dst.push(Vertex::new(p1.x + dlx1 * rw, p1.y + dly1 * rw, lu, 1.0));
        dst.push(Vertex::new(rx1, ry1, ru, 1.0));
    }
}
