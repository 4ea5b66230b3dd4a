//! Recorded draw calls and frames

use quill_paint::{Bounds, CompositeOperationState, Paint, Scissor};
use quill_path::{DrawPath, Vertex, Winding};
use serde::{Deserialize, Serialize};

/// Copy vertices out of the borrowed sink slice as `[x, y, u, v]` rows
pub(crate) fn copy_vertices(vertices: &[Vertex]) -> Vec<[f32; 4]> {
    bytemuck::cast_slice::<Vertex, [f32; 4]>(vertices).to_vec()
}

/// Owned copy of one sub-path's geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedPath {
    /// Fill fan vertices, `[x, y, u, v]`
    pub fill: Vec<[f32; 4]>,
    /// Stroke or fringe strip vertices, `[x, y, u, v]`
    pub stroke: Vec<[f32; 4]>,
    pub closed: bool,
    pub convex: bool,
    /// True for sub-paths declared as holes
    pub hole: bool,
}

impl RecordedPath {
    pub(crate) fn from_draw_path(path: &DrawPath<'_>) -> Self {
        Self {
            fill: copy_vertices(path.fill),
            stroke: copy_vertices(path.stroke),
            closed: path.closed,
            convex: path.convex,
            hole: path.winding == Winding::HOLE,
        }
    }
}

/// One call received by the sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Fill {
        paint: Paint,
        composite: CompositeOperationState,
        scissor: Scissor,
        fringe: f32,
        bounds: Bounds,
        paths: Vec<RecordedPath>,
    },
    Stroke {
        paint: Paint,
        composite: CompositeOperationState,
        scissor: Scissor,
        fringe: f32,
        stroke_width: f32,
        paths: Vec<RecordedPath>,
    },
    Triangles {
        paint: Paint,
        composite: CompositeOperationState,
        scissor: Scissor,
        fringe: f32,
        vertices: Vec<[f32; 4]>,
    },
}

impl DrawCommand {
    pub fn paint(&self) -> &Paint {
        match self {
            DrawCommand::Fill { paint, .. }
            | DrawCommand::Stroke { paint, .. }
            | DrawCommand::Triangles { paint, .. } => paint,
        }
    }

    /// Sub-paths of a fill or stroke; empty for triangle batches
    pub fn paths(&self) -> &[RecordedPath] {
        match self {
            DrawCommand::Fill { paths, .. } | DrawCommand::Stroke { paths, .. } => paths,
            DrawCommand::Triangles { .. } => &[],
        }
    }

    /// Total vertices carried by this call
    pub fn vertex_count(&self) -> usize {
        match self {
            DrawCommand::Triangles { vertices, .. } => vertices.len(),
            _ => self
                .paths()
                .iter()
                .map(|p| p.fill.len() + p.stroke.len())
                .sum(),
        }
    }
}

/// Viewport announced at frame start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

/// Calls between a frame's start and its flush.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub viewport: Option<Viewport>,
    pub calls: Vec<DrawCommand>,
}

impl RecordedFrame {
    pub fn fills(&self) -> impl Iterator<Item = &DrawCommand> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { .. }))
    }

    pub fn strokes(&self) -> impl Iterator<Item = &DrawCommand> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCommand::Stroke { .. }))
    }

    pub fn vertex_count(&self) -> usize {
        self.calls.iter().map(DrawCommand::vertex_count).sum()
    }

    /// Pretty-printed JSON of the whole frame
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
