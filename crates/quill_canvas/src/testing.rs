//! In-crate sink used by the unit tests

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use quill_paint::{Bounds, CompositeOperationState, ImageId, Paint, Scissor};
use quill_path::{DrawPath, Vertex};

use crate::error::{CanvasError, Result};
use crate::sink::{ImageFlags, RenderSink, TextureKind};

#[derive(Clone, Debug)]
pub(crate) struct PathCounts {
    pub fill: usize,
    pub stroke: usize,
    pub convex: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct DrawCall {
    pub paint: Paint,
    pub fringe: f32,
    pub bounds: Option<Bounds>,
    pub stroke_width: Option<f32>,
    pub paths: Vec<PathCounts>,
}

fn counts(paths: &[DrawPath<'_>]) -> Vec<PathCounts> {
    paths
        .iter()
        .map(|p| PathCounts {
            fill: p.fill.len(),
            stroke: p.stroke.len(),
            convex: p.convex,
        })
        .collect()
}

#[derive(Default)]
pub(crate) struct CountingSink {
    pub viewport: Option<(f32, f32, f32)>,
    pub textures: HashMap<ImageId, (u32, u32)>,
    pub next_id: u32,
    pub fills: Vec<DrawCall>,
    pub strokes: Vec<DrawCall>,
    pub triangles: Vec<usize>,
    pub cancels: usize,
    pub flushes: usize,
    pub deleted: Option<Rc<Cell<bool>>>,
}

impl RenderSink for CountingSink {
    fn create_texture(
        &mut self,
        _kind: TextureKind,
        width: u32,
        height: u32,
        _flags: ImageFlags,
        _data: Option<&[u8]>,
    ) -> Result<ImageId> {
        self.next_id += 1;
        let id = ImageId(self.next_id);
        self.textures.insert(id, (width, height));
        Ok(id)
    }

    fn delete_texture(&mut self, image: ImageId) -> Result<()> {
        self.textures
            .remove(&image)
            .map(|_| ())
            .ok_or(CanvasError::UnknownImage(image))
    }

    fn update_texture(
        &mut self,
        image: ImageId,
        _x: u32,
        _y: u32,
        _width: u32,
        _height: u32,
        _data: &[u8],
    ) -> Result<()> {
        self.texture_size(image).map(|_| ())
    }

    fn texture_size(&self, image: ImageId) -> Result<(u32, u32)> {
        self.textures
            .get(&image)
            .copied()
            .ok_or(CanvasError::UnknownImage(image))
    }

    fn viewport(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.viewport = Some((width, height, device_pixel_ratio));
    }

    fn cancel(&mut self) {
        self.cancels += 1;
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }

    fn render_fill(
        &mut self,
        paint: &Paint,
        _composite: CompositeOperationState,
        _scissor: &Scissor,
        fringe: f32,
        bounds: Bounds,
        paths: &[DrawPath<'_>],
    ) {
        self.fills.push(DrawCall {
            paint: *paint,
            fringe,
            bounds: Some(bounds),
            stroke_width: None,
            paths: counts(paths),
        });
    }

    fn render_stroke(
        &mut self,
        paint: &Paint,
        _composite: CompositeOperationState,
        _scissor: &Scissor,
        fringe: f32,
        stroke_width: f32,
        paths: &[DrawPath<'_>],
    ) {
        self.strokes.push(DrawCall {
            paint: *paint,
            fringe,
            bounds: None,
            stroke_width: Some(stroke_width),
            paths: counts(paths),
        });
    }

    fn render_triangles(
        &mut self,
        _paint: &Paint,
        _composite: CompositeOperationState,
        _scissor: &Scissor,
        vertices: &[Vertex],
        _fringe: f32,
    ) {
        self.triangles.push(vertices.len());
    }

    fn delete(&mut self) {
        if let Some(flag) = &self.deleted {
            flag.set(true);
        }
    }
}
