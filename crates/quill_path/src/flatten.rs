//! Curve flattening
//!
//! Walks the command stream once, subdividing cubic curves until they are
//! flat within the tessellation tolerance, then fixes up each sub-path:
//! coincident end points close it, orientation is corrected to match the
//! declared winding, and per-point directions and bounds are computed.

use quill_paint::{Bounds, Point};
use tracing::trace;

use crate::cache::{PathCache, PathPoint, PointFlags, SubPath, Tolerances};
use crate::command::{Command, CommandBuffer, Winding};
use crate::error::{try_grow, Result};
use crate::math::{normalize, pt_equals, triarea2};

/// Subdivision depth limit for a single curve
const MAX_BEZIER_LEVEL: u32 = 10;

/// Signed area of a closed polygon; positive for the solid orientation
pub fn signed_area(points: &[PathPoint]) -> f32 {
    let Some(a) = points.first() else {
        return 0.0;
    };
    let area: f32 = points
        .windows(2)
        .skip(1)
        .map(|w| triarea2(a.x, a.y, w[0].x, w[0].y, w[1].x, w[1].y))
        .sum();
    area * 0.5
}

impl PathCache {
    /// Flatten `commands` into polylines.
    ///
    /// Does nothing when the cache already holds this revision of the
    /// command buffer.
    pub fn flatten(&mut self, commands: &CommandBuffer, tol: &Tolerances) -> Result<()> {
        if self.is_current(commands.revision()) {
            trace!(revision = commands.revision(), "Reusing flattened path");
            return Ok(());
        }
        self.clear();

        for cmd in commands.commands() {
            match *cmd {
                Command::MoveTo(p) => {
                    self.add_subpath()?;
                    self.add_point(p, PointFlags::CORNER, tol.dist)?;
                }
                Command::LineTo(p) => self.add_point(p, PointFlags::CORNER, tol.dist)?,
                Command::BezierTo { c1, c2, end } => {
                    if let Some(last) = self.points.last() {
                        let start = Point::new(last.x, last.y);
                        self.tessellate_bezier(
                            [start, c1, c2, end],
                            0,
                            PointFlags::CORNER,
                            tol,
                        )?;
                    }
                }
                Command::Close => {
                    if let Some(sp) = self.subpaths.last_mut() {
                        sp.closed = true;
                    }
                }
                Command::Winding(winding) => {
                    if let Some(sp) = self.subpaths.last_mut() {
                        sp.winding = winding;
                    }
                }
            }
        }

        self.finish_subpaths(tol.dist);
        self.revision = Some(commands.revision());

        trace!(
            subpaths = self.subpaths.len(),
            points = self.points.len(),
            "Flattened path"
        );
        Ok(())
    }

    fn add_subpath(&mut self) -> Result<()> {
        try_grow(&mut self.subpaths, 1, "sub-paths")?;
        self.subpaths.push(SubPath::new(self.points.len()));
        Ok(())
    }

    /// Append a point to the current sub-path, merging it into the previous
    /// point when they coincide.
    fn add_point(&mut self, p: Point, flags: PointFlags, dist_tol: f32) -> Result<()> {
        let Some(sp) = self.subpaths.last_mut() else {
            return Ok(());
        };

        if sp.count > 0 {
            if let Some(last) = self.points.last_mut() {
                if pt_equals(last.x, last.y, p.x, p.y, dist_tol) {
                    last.flags |= flags;
                    return Ok(());
                }
            }
        }

        try_grow(&mut self.points, 1, "path points")?;
        self.points.push(PathPoint::new(p.x, p.y, flags));
        sp.count += 1;
        Ok(())
    }

    /// Recursive de Casteljau subdivision. Only the end of the whole curve
    /// carries `flags`; interior samples are unflagged.
    fn tessellate_bezier(
        &mut self,
        [p1, p2, p3, p4]: [Point; 4],
        level: u32,
        flags: PointFlags,
        tol: &Tolerances,
    ) -> Result<()> {
        if level > MAX_BEZIER_LEVEL {
            return Ok(());
        }

        let mid = |a: Point, b: Point| Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
        let p12 = mid(p1, p2);
        let p23 = mid(p2, p3);
        let p34 = mid(p3, p4);
        let p123 = mid(p12, p23);

        let dx = p4.x - p1.x;
        let dy = p4.y - p1.y;
        let d2 = ((p2.x - p4.x) * dy - (p2.y - p4.y) * dx).abs();
        let d3 = ((p3.x - p4.x) * dy - (p3.y - p4.y) * dx).abs();

        if (d2 + d3) * (d2 + d3) < tol.tess * (dx * dx + dy * dy) {
            return self.add_point(p4, flags, tol.dist);
        }

        let p234 = mid(p23, p34);
        let p1234 = mid(p123, p234);

        self.tessellate_bezier([p1, p12, p123, p1234], level + 1, PointFlags::empty(), tol)?;
        self.tessellate_bezier([p1234, p234, p34, p4], level + 1, flags, tol)
    }

    fn finish_subpaths(&mut self, dist_tol: f32) {
        let PathCache {
            points,
            subpaths,
            bounds,
            ..
        } = self;
        *bounds = Bounds::EMPTY;

        for sp in subpaths.iter_mut() {
            let pts = &points[sp.points()];
            if let [first, .., last] = pts {
                if pt_equals(first.x, first.y, last.x, last.y, dist_tol) {
                    sp.count -= 1;
                    sp.closed = true;
                }
            }

            let pts = &mut points[sp.points()];
            if pts.len() > 2 {
                let area = signed_area(pts);
                let reverse = match sp.winding {
                    Winding::Ccw => area < 0.0,
                    Winding::Cw => area > 0.0,
                };
                if reverse {
                    pts.reverse();
                }
            }

            let n = pts.len();
            for i in 0..n {
                let next = pts[(i + 1) % n];
                let p = &mut pts[i];
                p.dx = next.x - p.x;
                p.dy = next.y - p.y;
                p.len = normalize(&mut p.dx, &mut p.dy);
                bounds.include(p.x, p.y);
            }
        }
    }
}
