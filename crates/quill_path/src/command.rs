//! Path command stream
//!
//! Commands are transformed to device space as they are appended. The
//! buffer also remembers the last end point in *user* space, which the
//! relative shape helpers (quad_to, arc_to) build on.

use quill_paint::{Point, Transform2D};

use crate::error::{try_grow, Result};

/// Fill rule of a sub-path, expressed as its required orientation.
///
/// Solid shapes are counter-clockwise and holes clockwise; the flattener
/// reverses sub-paths whose area disagrees with the declaration. Arcs use
/// the same type for their sweep direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Winding {
    #[default]
    Ccw,
    Cw,
}

impl Winding {
    pub const SOLID: Winding = Winding::Ccw;
    pub const HOLE: Winding = Winding::Cw;
}

/// One path command, coordinates in device space
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    MoveTo(Point),
    LineTo(Point),
    BezierTo { c1: Point, c2: Point, end: Point },
    Close,
    Winding(Winding),
}

impl Command {
    fn transformed(self, transform: &Transform2D) -> Self {
        let map = |p: Point| {
            let (x, y) = transform.transform_point(p.x, p.y);
            Point::new(x, y)
        };
        match self {
            Command::MoveTo(p) => Command::MoveTo(map(p)),
            Command::LineTo(p) => Command::LineTo(map(p)),
            Command::BezierTo { c1, c2, end } => Command::BezierTo {
                c1: map(c1),
                c2: map(c2),
                end: map(end),
            },
            other => other,
        }
    }

    fn end_point(&self) -> Option<Point> {
        match *self {
            Command::MoveTo(p) | Command::LineTo(p) => Some(p),
            Command::BezierTo { end, .. } => Some(end),
            Command::Close | Command::Winding(_) => None,
        }
    }
}

/// Append-only command list for the path being built
#[derive(Debug, Default, Clone)]
pub struct CommandBuffer {
    commands: Vec<Command>,
    last: Point,
    revision: u64,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every command and start a new path
    pub fn clear(&mut self) {
        self.commands.clear();
        self.last = Point::ZERO;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Changes whenever the command list changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Last end point, in the user space it was given in
    pub fn last_point(&self) -> Point {
        self.last
    }

    /// Append user-space commands, transforming them with `transform`
    pub fn append(&mut self, commands: &[Command], transform: &Transform2D) -> Result<()> {
        if commands.is_empty() {
            return Ok(());
        }
        try_grow(&mut self.commands, commands.len(), "path commands")?;

        if let Some(end) = commands.iter().rev().find_map(Command::end_point) {
            self.last = end;
        }
        self.commands
            .extend(commands.iter().map(|cmd| cmd.transformed(transform)));
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }

    pub fn move_to(&mut self, x: f32, y: f32, transform: &Transform2D) -> Result<()> {
        self.append(&[Command::MoveTo(Point::new(x, y))], transform)
    }

    pub fn line_to(&mut self, x: f32, y: f32, transform: &Transform2D) -> Result<()> {
        self.append(&[Command::LineTo(Point::new(x, y))], transform)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bezier_to(
        &mut self,
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
        transform: &Transform2D,
    ) -> Result<()> {
        self.append(
            &[Command::BezierTo {
                c1: Point::new(c1x, c1y),
                c2: Point::new(c2x, c2y),
                end: Point::new(x, y),
            }],
            transform,
        )
    }

    /// Quadratic curve from the last point, stored as the equivalent cubic
    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32, transform: &Transform2D) -> Result<()> {
        let x0 = self.last.x;
        let y0 = self.last.y;
        self.bezier_to(
            x0 + 2.0 / 3.0 * (cx - x0),
            y0 + 2.0 / 3.0 * (cy - y0),
            x + 2.0 / 3.0 * (cx - x),
            y + 2.0 / 3.0 * (cy - y),
            x,
            y,
            transform,
        )
    }

    pub fn close(&mut self) -> Result<()> {
        self.append(&[Command::Close], &Transform2D::identity())
    }

    /// Declare the orientation of the current sub-path
    pub fn winding(&mut self, winding: Winding) -> Result<()> {
        self.append(&[Command::Winding(winding)], &Transform2D::identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_transforms_to_device_space() {
        let mut buf = CommandBuffer::new();
        let t = Transform2D::translate(10.0, 20.0);
        buf.move_to(1.0, 2.0, &t).unwrap();
        assert_eq!(buf.commands()[0], Command::MoveTo(Point::new(11.0, 22.0)));
        // Last point stays in user space
        assert_eq!(buf.last_point(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_revision_bumps_on_every_change() {
        let mut buf = CommandBuffer::new();
        let r0 = buf.revision();
        buf.move_to(0.0, 0.0, &Transform2D::identity()).unwrap();
        let r1 = buf.revision();
        assert_ne!(r0, r1);
        buf.close().unwrap();
        let r2 = buf.revision();
        assert_ne!(r1, r2);
        buf.clear();
        assert_ne!(r2, buf.revision());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_close_keeps_last_point() {
        let mut buf = CommandBuffer::new();
        buf.line_to(5.0, 6.0, &Transform2D::identity()).unwrap();
        buf.close().unwrap();
        buf.winding(Winding::HOLE).unwrap();
        assert_eq!(buf.last_point(), Point::new(5.0, 6.0));
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_quad_to_elevates_to_cubic() {
        let mut buf = CommandBuffer::new();
        let id = Transform2D::identity();
        buf.move_to(0.0, 0.0, &id).unwrap();
        buf.quad_to(30.0, 30.0, 60.0, 0.0, &id).unwrap();
        match buf.commands()[1] {
            Command::BezierTo { c1, c2, end } => {
                assert!((c1.x - 20.0).abs() < 1e-4 && (c1.y - 20.0).abs() < 1e-4);
                assert!((c2.x - 40.0).abs() < 1e-4 && (c2.y - 20.0).abs() < 1e-4);
                assert_eq!(end, Point::new(60.0, 0.0));
            }
            other => panic!("expected bezier, got {:?}", other),
        }
    }
}
