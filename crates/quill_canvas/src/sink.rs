//! Render sink interface
//!
//! The canvas produces geometry; a sink turns it into pixels. Any backend
//! (software rasterizer, GPU API, recorder) implements [`RenderSink`].
//!
//! Fills with `convex == false` expect the two-pass stencil protocol: the
//! fill fan is written to the stencil buffer without color, a bounding
//! quad is then drawn with the paint where the stencil is set, and the
//! fringe strip is composited on top.

use bitflags::bitflags;
use quill_paint::{Bounds, CompositeOperationState, ImageId, Paint, Scissor};
use quill_path::{DrawPath, Vertex};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Pixel format of a texture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureKind {
    /// One byte per pixel coverage, used for glyph atlases
    Alpha,
    Rgba,
}

impl TextureKind {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureKind::Alpha => 1,
            TextureKind::Rgba => 4,
        }
    }
}

bitflags! {
    /// Sampling and storage options for images
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ImageFlags: u32 {
        const GENERATE_MIPMAPS = 1 << 0;
        const REPEAT_X = 1 << 1;
        const REPEAT_Y = 1 << 2;
        const FLIP_Y = 1 << 3;
        const PREMULTIPLIED = 1 << 4;
        const NEAREST = 1 << 5;
    }
}

/// Backend that consumes finished geometry
pub trait RenderSink {
    /// Create a texture, optionally initialized with `data`.
    fn create_texture(
        &mut self,
        kind: TextureKind,
        width: u32,
        height: u32,
        flags: ImageFlags,
        data: Option<&[u8]>,
    ) -> Result<ImageId>;

    fn delete_texture(&mut self, image: ImageId) -> Result<()>;

    /// Replace the `width` x `height` region at `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    fn update_texture(
        &mut self,
        image: ImageId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<()>;

    fn texture_size(&self, image: ImageId) -> Result<(u32, u32)>;

    /// Called at frame start with the logical size and pixel ratio.
    fn viewport(&mut self, width: f32, height: f32, device_pixel_ratio: f32);

    /// Drop everything queued since the frame started.
    fn cancel(&mut self);

    /// Submit everything queued since the frame started.
    fn flush(&mut self);

    #[allow(clippy::too_many_arguments)]
    fn render_fill(
        &mut self,
        paint: &Paint,
        composite: CompositeOperationState,
        scissor: &Scissor,
        fringe: f32,
        bounds: Bounds,
        paths: &[DrawPath<'_>],
    );

    #[allow(clippy::too_many_arguments)]
    fn render_stroke(
        &mut self,
        paint: &Paint,
        composite: CompositeOperationState,
        scissor: &Scissor,
        fringe: f32,
        stroke_width: f32,
        paths: &[DrawPath<'_>],
    );

    /// Draw pre-tessellated triangles, three vertices each.
    fn render_triangles(
        &mut self,
        paint: &Paint,
        composite: CompositeOperationState,
        scissor: &Scissor,
        vertices: &[Vertex],
        fringe: f32,
    );

    /// Release backend resources; called when the canvas is dropped.
    fn delete(&mut self) {}
}
