//! Stroke expansion
//!
//! Each sub-path becomes one triangle strip: a cap (open paths), a pair of
//! vertices per point or a join for flagged points, then a closing pair or
//! an end cap. The antialiasing fringe is folded into the strip by
//! widening it by half a fringe and ramping `u` across it.

use std::f32::consts::PI;

use tracing::trace;

use crate::cache::{PathCache, PathPoint};
use crate::error::{try_grow, Result};
use crate::joins::{bevel_join, round_join};
use crate::math::{curve_divs, normalize};
use crate::vertex::{LineCap, LineJoin, Vertex};

/// Result of expanding a stroke
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrokeExpansion {
    /// Vertices reserved before expansion; never exceeded
    pub vertex_budget: usize,
    /// Segments per half circle used for round caps and joins
    pub cap_divisions: usize,
}

/// Parameters shared by the cap emitters
#[derive(Clone, Copy)]
struct CapStyle {
    w: f32,
    aa: f32,
    u0: f32,
    u1: f32,
    ncap: usize,
}

fn butt_cap_start(dst: &mut Vec<Vertex>, p: &PathPoint, dx: f32, dy: f32, d: f32, s: CapStyle) {
    let CapStyle { w, aa, u0, u1, .. } = s;
    let px = p.x - dx * d;
    let py = p.y - dy * d;
    let (dlx, dly) = (dy, -dx);
    dst.push(Vertex::new(px + dlx * w - dx * aa, py + dly * w - dy * aa, u0, 0.0));
    dst.push(Vertex::new(px - dlx * w - dx * aa, py - dly * w - dy * aa, u1, 0.0));
    dst.push(Vertex::new(px + dlx * w, py + dly * w, u0, 1.0));
    dst.push(Vertex::new(px - dlx * w, py - dly * w, u1, 1.0));
}

fn butt_cap_end(dst: &mut Vec<Vertex>, p: &PathPoint, dx: f32, dy: f32, d: f32, s: CapStyle) {
    let CapStyle { w, aa, u0, u1, .. } = s;
    let px = p.x + dx * d;
    let py = p.y + dy * d;
    let (dlx, dly) = (dy, -dx);
    dst.push(Vertex::new(px + dlx * w, py + dly * w, u0, 1.0));
    dst.push(Vertex::new(px - dlx * w, py - dly * w, u1, 1.0));
    dst.push(Vertex::new(px + dlx * w + dx * aa, py + dly * w + dy * aa, u0, 0.0));
    dst.push(Vertex::new(px - dlx * w + dx * aa, py - dly * w + dy * aa, u1, 0.0));
}

fn round_cap_start(dst: &mut Vec<Vertex>, p: &PathPoint, dx: f32, dy: f32, s: CapStyle) {
    let CapStyle { w, u0, u1, ncap, .. } = s;
    let (dlx, dly) = (dy, -dx);
    for i in 0..ncap {
        let a = i as f32 / (ncap - 1) as f32 * PI;
        let ax = a.cos() * w;
        let ay = a.sin() * w;
        dst.push(Vertex::new(p.x - dlx * ax - dx * ay, p.y - dly * ax - dy * ay, u0, 1.0));
        dst.push(Vertex::new(p.x, p.y, 0.5, 1.0));
    }
    dst.push(Vertex::new(p.x + dlx * w, p.y + dly * w, u0, 1.0));
    dst.push(Vertex::new(p.x - dlx * w, p.y - dly * w, u1, 1.0));
}

fn round_cap_end(dst: &mut Vec<Vertex>, p: &PathPoint, dx: f32, dy: f32, s: CapStyle) {
    let CapStyle { w, u0, u1, ncap, .. } = s;
    let (dlx, dly) = (dy, -dx);
    dst.push(Vertex::new(p.x + dlx * w, p.y + dly * w, u0, 1.0));
    dst.push(Vertex::new(p.x - dlx * w, p.y - dly * w, u1, 1.0));
    for i in 0..ncap {
        let a = i as f32 / (ncap - 1) as f32 * PI;
        let ax = a.cos() * w;
        let ay = a.sin() * w;
        dst.push(Vertex::new(p.x, p.y, 0.5, 1.0));
        dst.push(Vertex::new(p.x - dlx * ax + dx * ay, p.y - dly * ax + dy * ay, u0, 1.0));
    }
}

fn direction(from: &PathPoint, to: &PathPoint) -> (f32, f32) {
    let mut dx = to.x - from.x;
    let mut dy = to.y - from.y;
    normalize(&mut dx, &mut dy);
    (dx, dy)
}

impl PathCache {
    /// Upper bound on the vertices `expand_stroke` writes for the current
    /// join analysis.
    pub fn stroke_vertex_budget(&self, ncap: usize, line_cap: LineCap, line_join: LineJoin) -> usize {
        self.subpaths
            .iter()
            .map(|sp| {
                let mut n = match line_join {
                    LineJoin::Round => (sp.count + sp.bevel_count * (ncap + 2) + 1) * 2,
                    _ => (sp.count + sp.bevel_count * 5 + 1) * 2,
                };
                if !sp.closed {
                    n += match line_cap {
                        LineCap::Round => (ncap * 2 + 2) * 2,
                        _ => (3 + 3) * 2,
                    };
                }
                n
            })
            .sum()
    }

    /// Expand the flattened path into stroke strips of half-width `w`.
    ///
    /// `fringe` is the antialiasing width (0 disables it) and `tess_tol`
    /// controls how finely round caps and joins are divided.
    pub fn expand_stroke(
        &mut self,
        w: f32,
        fringe: f32,
        line_cap: LineCap,
        line_join: LineJoin,
        miter_limit: f32,
        tess_tol: f32,
    ) -> Result<StrokeExpansion> {
        let aa = fringe;
        let ncap = curve_divs(w, PI, tess_tol);
        let w = w + aa * 0.5;
        let (u0, u1) = if aa == 0.0 { (0.5, 0.5) } else { (0.0, 1.0) };

        self.calculate_joins(w, line_join, miter_limit);

        let budget = self.stroke_vertex_budget(ncap, line_cap, line_join);
        self.verts.clear();
        try_grow(&mut self.verts, budget, "stroke vertices")?;

        let style = CapStyle {
            w,
            aa,
            u0,
            u1,
            ncap,
        };

        let PathCache {
            points,
            subpaths,
            verts,
            ..
        } = self;

        for sp in subpaths.iter_mut() {
            let pts = &points[sp.points()];
            let n = pts.len();
            let start = verts.len();
            sp.fill = start..start;

            if n < 2 {
                sp.stroke = start..start;
                continue;
            }

            let joined = if sp.closed { 0..n } else { 1..n - 1 };

            if !sp.closed {
                let (dx, dy) = direction(&pts[0], &pts[1]);
                match line_cap {
                    LineCap::Butt => butt_cap_start(verts, &pts[0], dx, dy, -aa * 0.5, style),
                    LineCap::Square => butt_cap_start(verts, &pts[0], dx, dy, w - aa, style),
                    LineCap::Round => round_cap_start(verts, &pts[0], dx, dy, style),
                }
            }

            for i in joined {
                let p0 = &pts[(i + n - 1) % n];
                let p1 = &pts[i];
                if p1.needs_bevel() {
                    match line_join {
                        LineJoin::Round => round_join(verts, p0, p1, w, w, u0, u1, ncap),
                        _ => bevel_join(verts, p0, p1, w, w, u0, u1),
                    }
                } else {
                    verts.push(Vertex::new(p1.x + p1.dmx * w, p1.y + p1.dmy * w, u0, 1.0));
                    verts.push(Vertex::new(p1.x - p1.dmx * w, p1.y - p1.dmy * w, u1, 1.0));
                }
            }

            if sp.closed {
                let (v0, v1) = (verts[start], verts[start + 1]);
                verts.push(Vertex::new(v0.x, v0.y, u0, 1.0));
                verts.push(Vertex::new(v1.x, v1.y, u1, 1.0));
            } else {
                let (p0, p1) = (&pts[n - 2], &pts[n - 1]);
                let (dx, dy) = direction(p0, p1);
                match line_cap {
                    LineCap::Butt => butt_cap_end(verts, p1, dx, dy, -aa * 0.5, style),
                    LineCap::Square => butt_cap_end(verts, p1, dx, dy, w - aa, style),
                    LineCap::Round => round_cap_end(verts, p1, dx, dy, style),
                }
            }

            sp.stroke = start..verts.len();
        }

        debug_assert!(self.verts.len() <= budget);
        trace!(
            vertices = self.verts.len(),
            budget,
            ncap,
            "Expanded stroke"
        );

        Ok(StrokeExpansion {
            vertex_budget: budget,
            cap_divisions: ncap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Tolerances;
    use crate::command::CommandBuffer;
    use quill_paint::Transform2D;

    fn line(buf: &mut CommandBuffer) {
        let id = Transform2D::identity();
        buf.move_to(0.0, 0.0, &id).unwrap();
        buf.line_to(100.0, 0.0, &id).unwrap();
    }

    fn stroke(buf: &CommandBuffer, w: f32, cap: LineCap, join: LineJoin) -> (PathCache, StrokeExpansion) {
        let tol = Tolerances::default();
        let mut cache = PathCache::new();
        cache.flatten(buf, &tol).unwrap();
        let out = cache
            .expand_stroke(w, tol.fringe, cap, join, 10.0, tol.tess)
            .unwrap();
        (cache, out)
    }

    #[test]
    fn test_round_caps_on_single_segment() {
        let mut buf = CommandBuffer::new();
        line(&mut buf);
        let (cache, out) = stroke(&buf, 1.0, LineCap::Round, LineJoin::Miter);

        let ncap = out.cap_divisions;
        assert_eq!(ncap, 3);
        let sp = &cache.subpaths()[0];
        assert!(sp.fill.is_empty());
        // Each end contributes its fan plus the two edge vertices
        assert_eq!(cache.stroke_vertices(sp).len(), (ncap * 2 + 2) * 2);
        assert!(cache.vertices().len() <= out.vertex_budget);
    }

    #[test]
    fn test_cap_divisions_grow_with_width() {
        let mut buf = CommandBuffer::new();
        line(&mut buf);
        let mut previous = 0;
        for w in [0.5, 1.0, 4.0, 16.0, 64.0] {
            let (_, out) = stroke(&buf, w, LineCap::Round, LineJoin::Miter);
            assert!(out.cap_divisions >= previous);
            previous = out.cap_divisions;
        }
        assert!(previous > 3);
    }

    #[test]
    fn test_butt_cap_extends_into_fringe() {
        let mut buf = CommandBuffer::new();
        line(&mut buf);
        let (cache, _) = stroke(&buf, 2.0, LineCap::Butt, LineJoin::Miter);
        let verts = cache.stroke_vertices(&cache.subpaths()[0]);
        assert_eq!(verts.len(), 8);
        // Half-width widened by half a fringe, cap pulled back by half a fringe
        assert!((verts[2].x - 0.5).abs() < 1e-5);
        assert!((verts[2].y.abs() - 2.5).abs() < 1e-5);
        assert_eq!(verts[0].v, 0.0);
        assert_eq!(verts[2].v, 1.0);
    }

    #[test]
    fn test_square_cap_extends_by_width() {
        let mut buf = CommandBuffer::new();
        line(&mut buf);
        let (cache, _) = stroke(&buf, 2.0, LineCap::Square, LineJoin::Miter);
        let verts = cache.stroke_vertices(&cache.subpaths()[0]);
        // Start pulled back by w - aa = 1.5
        assert!((verts[2].x + 1.5).abs() < 1e-5);
        // End pushed out by the same
        assert!((verts[4].x - 101.5).abs() < 1e-5);
    }

    #[test]
    fn test_closed_stroke_loops_back() {
        let mut buf = CommandBuffer::new();
        buf.rect(0.0, 0.0, 50.0, 50.0, &Transform2D::identity()).unwrap();
        let (cache, out) = stroke(&buf, 2.0, LineCap::Butt, LineJoin::Miter);
        let verts = cache.stroke_vertices(&cache.subpaths()[0]);
        assert_eq!(verts.len(), 4 * 2 + 2);
        let n = verts.len();
        assert_eq!((verts[n - 2].x, verts[n - 2].y), (verts[0].x, verts[0].y));
        assert_eq!((verts[n - 1].x, verts[n - 1].y), (verts[1].x, verts[1].y));
        assert!(n <= out.vertex_budget);
    }

    #[test]
    fn test_budget_formula_for_open_round_path() {
        let mut buf = CommandBuffer::new();
        let id = Transform2D::identity();
        buf.move_to(0.0, 0.0, &id).unwrap();
        buf.line_to(50.0, 0.0, &id).unwrap();
        buf.line_to(50.0, 50.0, &id).unwrap();
        buf.line_to(0.0, 60.0, &id).unwrap();
        let (cache, out) = stroke(&buf, 3.0, LineCap::Round, LineJoin::Bevel);

        let sp = &cache.subpaths()[0];
        let ncap = out.cap_divisions;
        let expected = (sp.count + 5 * sp.bevel_count + 1) * 2 + (ncap * 2 + 2) * 2;
        assert_eq!(out.vertex_budget, expected);
        assert!(cache.stroke_vertices(sp).len() <= expected);
    }

    #[test]
    fn test_round_join_budget() {
        let mut buf = CommandBuffer::new();
        buf.rect(0.0, 0.0, 40.0, 40.0, &Transform2D::identity()).unwrap();
        let (cache, out) = stroke(&buf, 8.0, LineCap::Butt, LineJoin::Round);
        let sp = &cache.subpaths()[0];
        assert_eq!(sp.bevel_count, 4);
        assert!(cache.stroke_vertices(sp).len() <= out.vertex_budget);
    }

    #[test]
    fn test_no_antialias_flattens_coverage() {
        let mut buf = CommandBuffer::new();
        line(&mut buf);
        let tol = Tolerances::default();
        let mut cache = PathCache::new();
        cache.flatten(&buf, &tol).unwrap();
        cache
            .expand_stroke(1.0, 0.0, LineCap::Butt, LineJoin::Miter, 10.0, tol.tess)
            .unwrap();
        assert!(cache.vertices().iter().all(|v| v.u == 0.5));
    }

    #[test]
    fn test_single_point_open_path_is_skipped() {
        let mut buf = CommandBuffer::new();
        buf.move_to(5.0, 5.0, &Transform2D::identity()).unwrap();
        let (cache, _) = stroke(&buf, 1.0, LineCap::Round, LineJoin::Miter);
        assert!(cache.stroke_vertices(&cache.subpaths()[0]).is_empty());
    }
}
