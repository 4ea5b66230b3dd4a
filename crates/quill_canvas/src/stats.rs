//! Per-frame draw statistics

use serde::{Deserialize, Serialize};

/// Counters accumulated between `begin_frame` and the next `begin_frame`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub fill_triangles: usize,
    pub stroke_triangles: usize,
    pub text_triangles: usize,
}

impl FrameStats {
    pub fn total_triangles(&self) -> usize {
        self.fill_triangles + self.stroke_triangles + self.text_triangles
    }
}

/// Triangles in a strip or fan of `n` vertices
pub(crate) fn strip_triangles(n: usize) -> usize {
    n.saturating_sub(2)
}
