//! Shape helpers that expand to plain commands
//!
//! Every helper here appends through [`CommandBuffer::append`], so the
//! flattener never sees anything but move/line/bezier/close/winding.

use std::f32::consts::PI;

use quill_paint::{Point, Transform2D};
use smallvec::SmallVec;

use crate::command::{Command, CommandBuffer, Winding};
use crate::error::Result;
use crate::math::{cross, dist_pt_seg, normalize, pt_equals};

/// Control point distance for approximating a quarter circle with a cubic
pub const KAPPA90: f32 = 0.552_284_8;

/// Arcs are split into at most this many cubic segments
const MAX_ARC_SEGMENTS: usize = 5;

/// Fillet centers further than this from the corner are treated as straight
const MAX_ARC_TO_DISTANCE: f32 = 10_000.0;

fn pt(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

fn bezier(c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> Command {
    Command::BezierTo {
        c1: pt(c1x, c1y),
        c2: pt(c2x, c2y),
        end: pt(x, y),
    }
}

fn sign(v: f32) -> f32 {
    if v >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

impl CommandBuffer {
    /// Circular arc around `(cx, cy)` from angle `a0` to `a1`.
    ///
    /// `Winding::Cw` sweeps towards increasing angles. The first point is
    /// connected with a line when the path already has commands.
    #[allow(clippy::too_many_arguments)]
    pub fn arc(
        &mut self,
        cx: f32,
        cy: f32,
        r: f32,
        a0: f32,
        a1: f32,
        dir: Winding,
        transform: &Transform2D,
    ) -> Result<()> {
        let mut da = a1 - a0;
        match dir {
            Winding::Cw => {
                if da.abs() >= PI * 2.0 {
                    da = PI * 2.0;
                } else {
                    while da < 0.0 {
                        da += PI * 2.0;
                    }
                }
            }
            Winding::Ccw => {
                if da.abs() >= PI * 2.0 {
                    da = -PI * 2.0;
                } else {
                    while da > 0.0 {
                        da -= PI * 2.0;
                    }
                }
            }
        }

        let divs = ((da.abs() / (PI * 0.5) + 0.5) as usize).clamp(1, MAX_ARC_SEGMENTS);
        let hda = (da / divs as f32) / 2.0;
        let mut kappa = (4.0 / 3.0 * (1.0 - hda.cos()) / hda.sin()).abs();
        if dir == Winding::Ccw {
            kappa = -kappa;
        }

        let connect = !self.is_empty();
        let mut cmds: SmallVec<[Command; MAX_ARC_SEGMENTS + 1]> = SmallVec::new();
        let (mut px, mut py, mut ptanx, mut ptany) = (0.0, 0.0, 0.0, 0.0);
        for i in 0..=divs {
            let a = a0 + da * (i as f32 / divs as f32);
            let dx = a.cos();
            let dy = a.sin();
            let x = cx + dx * r;
            let y = cy + dy * r;
            let tanx = -dy * r * kappa;
            let tany = dx * r * kappa;

            if i == 0 {
                cmds.push(if connect {
                    Command::LineTo(pt(x, y))
                } else {
                    Command::MoveTo(pt(x, y))
                });
            } else {
                cmds.push(bezier(px + ptanx, py + ptany, x - tanx, y - tany, x, y));
            }
            px = x;
            py = y;
            ptanx = tanx;
            ptany = tany;
        }

        self.append(&cmds, transform)
    }

    /// Fillet of radius `radius` tangent to the lines last-point → `(x1, y1)`
    /// and `(x1, y1)` → `(x2, y2)`.
    ///
    /// Ignored on an empty path. Degenerate corners become a line to
    /// `(x1, y1)`. `dist_tol` is the point-equality tolerance.
    #[allow(clippy::too_many_arguments)]
    pub fn arc_to(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        radius: f32,
        transform: &Transform2D,
        dist_tol: f32,
    ) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        let Point { x: x0, y: y0 } = self.last_point();
        if pt_equals(x0, y0, x1, y1, dist_tol)
            || pt_equals(x1, y1, x2, y2, dist_tol)
            || dist_pt_seg(x1, y1, x0, y0, x2, y2) < dist_tol * dist_tol
            || radius < dist_tol
        {
            return self.line_to(x1, y1, transform);
        }

        let (mut dx0, mut dy0) = (x0 - x1, y0 - y1);
        let (mut dx1, mut dy1) = (x2 - x1, y2 - y1);
        normalize(&mut dx0, &mut dy0);
        normalize(&mut dx1, &mut dy1);
        let a = (dx0 * dx1 + dy0 * dy1).clamp(-1.0, 1.0).acos();
        let d = radius / (a / 2.0).tan();

        if d.is_nan() || d > MAX_ARC_TO_DISTANCE {
            return self.line_to(x1, y1, transform);
        }

        if cross(dx0, dy0, dx1, dy1) > 0.0 {
            let cx = x1 + dx0 * d + dy0 * radius;
            let cy = y1 + dy0 * d - dx0 * radius;
            let a0 = dx0.atan2(-dy0);
            let a1 = (-dx1).atan2(dy1);
            self.arc(cx, cy, radius, a0, a1, Winding::Cw, transform)
        } else {
            let cx = x1 + dx0 * d - dy0 * radius;
            let cy = y1 + dy0 * d + dx0 * radius;
            let a0 = (-dx0).atan2(dy0);
            let a1 = dx1.atan2(-dy1);
            self.arc(cx, cy, radius, a0, a1, Winding::Ccw, transform)
        }
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, transform: &Transform2D) -> Result<()> {
        self.append(
            &[
                Command::MoveTo(pt(x, y)),
                Command::LineTo(pt(x, y + h)),
                Command::LineTo(pt(x + w, y + h)),
                Command::LineTo(pt(x + w, y)),
                Command::Close,
            ],
            transform,
        )
    }

    pub fn rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        r: f32,
        transform: &Transform2D,
    ) -> Result<()> {
        self.rounded_rect_varying(x, y, w, h, r, r, r, r, transform)
    }

    /// Rounded rectangle with a radius per corner, clockwise from top-left.
    ///
    /// Radii are clamped to half the rectangle size. Falls back to a plain
    /// rectangle when every radius is below 0.1.
    #[allow(clippy::too_many_arguments)]
    pub fn rounded_rect_varying(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top_left: f32,
        top_right: f32,
        bottom_right: f32,
        bottom_left: f32,
        transform: &Transform2D,
    ) -> Result<()> {
        if top_left < 0.1 && top_right < 0.1 && bottom_right < 0.1 && bottom_left < 0.1 {
            return self.rect(x, y, w, h, transform);
        }

        let half_w = w.abs() * 0.5;
        let half_h = h.abs() * 0.5;
        let (sw, sh) = (sign(w), sign(h));
        let rx_bl = bottom_left.min(half_w) * sw;
        let ry_bl = bottom_left.min(half_h) * sh;
        let rx_br = bottom_right.min(half_w) * sw;
        let ry_br = bottom_right.min(half_h) * sh;
        let rx_tr = top_right.min(half_w) * sw;
        let ry_tr = top_right.min(half_h) * sh;
        let rx_tl = top_left.min(half_w) * sw;
        let ry_tl = top_left.min(half_h) * sh;
        let k = 1.0 - KAPPA90;

        self.append(
            &[
                Command::MoveTo(pt(x, y + ry_tl)),
                Command::LineTo(pt(x, y + h - ry_bl)),
                bezier(x, y + h - ry_bl * k, x + rx_bl * k, y + h, x + rx_bl, y + h),
                Command::LineTo(pt(x + w - rx_br, y + h)),
                bezier(
                    x + w - rx_br * k,
                    y + h,
                    x + w,
                    y + h - ry_br * k,
                    x + w,
                    y + h - ry_br,
                ),
                Command::LineTo(pt(x + w, y + ry_tr)),
                bezier(x + w, y + ry_tr * k, x + w - rx_tr * k, y, x + w - rx_tr, y),
                Command::LineTo(pt(x + rx_tl, y)),
                bezier(x + rx_tl * k, y, x, y + ry_tl * k, x, y + ry_tl),
                Command::Close,
            ],
            transform,
        )
    }

    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, transform: &Transform2D) -> Result<()> {
        let k = KAPPA90;
        self.append(
            &[
                Command::MoveTo(pt(cx - rx, cy)),
                bezier(cx - rx, cy + ry * k, cx - rx * k, cy + ry, cx, cy + ry),
                bezier(cx + rx * k, cy + ry, cx + rx, cy + ry * k, cx + rx, cy),
                bezier(cx + rx, cy - ry * k, cx + rx * k, cy - ry, cx, cy - ry),
                bezier(cx - rx * k, cy - ry, cx - rx, cy - ry * k, cx - rx, cy),
                Command::Close,
            ],
            transform,
        )
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, transform: &Transform2D) -> Result<()> {
        self.ellipse(cx, cy, r, r, transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 0.01;

    #[test]
    fn test_rect_commands() {
        let mut buf = CommandBuffer::new();
        buf.rect(10.0, 20.0, 30.0, 40.0, &Transform2D::identity()).unwrap();
        assert_eq!(
            buf.commands(),
            &[
                Command::MoveTo(pt(10.0, 20.0)),
                Command::LineTo(pt(10.0, 60.0)),
                Command::LineTo(pt(40.0, 60.0)),
                Command::LineTo(pt(40.0, 20.0)),
                Command::Close,
            ]
        );
    }

    #[test]
    fn test_small_radii_fall_back_to_rect() {
        let mut buf = CommandBuffer::new();
        buf.rounded_rect(0.0, 0.0, 10.0, 10.0, 0.05, &Transform2D::identity())
            .unwrap();
        assert_eq!(buf.len(), 5);
        assert!(buf
            .commands()
            .iter()
            .all(|c| !matches!(c, Command::BezierTo { .. })));
    }

    #[test]
    fn test_rounded_rect_clamps_radius() {
        let mut buf = CommandBuffer::new();
        buf.rounded_rect(0.0, 0.0, 10.0, 4.0, 100.0, &Transform2D::identity())
            .unwrap();
        // Radius clamps to half the height vertically
        assert_eq!(buf.commands()[0], Command::MoveTo(pt(0.0, 2.0)));
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn test_circle_is_four_beziers() {
        let mut buf = CommandBuffer::new();
        buf.circle(50.0, 50.0, 10.0, &Transform2D::identity()).unwrap();
        let beziers = buf
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::BezierTo { .. }))
            .count();
        assert_eq!(beziers, 4);
        assert_eq!(buf.commands()[0], Command::MoveTo(pt(40.0, 50.0)));
        assert_eq!(buf.commands()[5], Command::Close);
    }

    #[test]
    fn test_arc_starts_with_move_on_empty_path() {
        let mut buf = CommandBuffer::new();
        let id = Transform2D::identity();
        buf.arc(0.0, 0.0, 10.0, 0.0, PI, Winding::Cw, &id).unwrap();
        assert!(matches!(buf.commands()[0], Command::MoveTo(_)));
        // Half circle is two quarter segments
        assert_eq!(buf.len(), 3);

        buf.arc(0.0, 0.0, 10.0, 0.0, PI, Winding::Cw, &id).unwrap();
        assert!(matches!(buf.commands()[3], Command::LineTo(_)));
    }

    #[test]
    fn test_full_arc_segment_count_is_capped() {
        let mut buf = CommandBuffer::new();
        buf.arc(0.0, 0.0, 10.0, 0.0, 100.0, Winding::Cw, &Transform2D::identity())
            .unwrap();
        // Sweep clamps to one turn, four quarter segments
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn test_arc_to_on_empty_path_is_ignored() {
        let mut buf = CommandBuffer::new();
        buf.arc_to(10.0, 0.0, 10.0, 10.0, 5.0, &Transform2D::identity(), TOL)
            .unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_arc_to_collinear_is_a_line() {
        let mut buf = CommandBuffer::new();
        let id = Transform2D::identity();
        buf.move_to(0.0, 0.0, &id).unwrap();
        buf.arc_to(10.0, 0.0, 20.0, 0.0, 5.0, &id, TOL).unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.commands()[1], Command::LineTo(pt(10.0, 0.0)));
    }

    #[test]
    fn test_arc_to_tiny_radius_is_a_line() {
        let mut buf = CommandBuffer::new();
        let id = Transform2D::identity();
        buf.move_to(0.0, 0.0, &id).unwrap();
        buf.arc_to(10.0, 0.0, 10.0, 10.0, 0.001, &id, TOL).unwrap();
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_arc_to_corner_is_tangent() {
        let mut buf = CommandBuffer::new();
        let id = Transform2D::identity();
        buf.move_to(0.0, 0.0, &id).unwrap();
        buf.arc_to(10.0, 0.0, 10.0, 10.0, 5.0, &id, TOL).unwrap();
        // Line to the first tangent point, then one quarter curve
        assert_eq!(buf.len(), 3);
        match buf.commands()[1] {
            Command::LineTo(p) => assert!((p.x - 5.0).abs() < 1e-3 && p.y.abs() < 1e-3),
            other => panic!("expected line, got {:?}", other),
        }
        match buf.commands()[2] {
            Command::BezierTo { end, .. } => {
                assert!((end.x - 10.0).abs() < 1e-3 && (end.y - 5.0).abs() < 1e-3)
            }
            other => panic!("expected bezier, got {:?}", other),
        }
    }
}
