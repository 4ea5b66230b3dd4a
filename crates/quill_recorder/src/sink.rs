//! Recording render sink

use std::collections::BTreeMap;

use quill_canvas::{CanvasError, ImageFlags, RenderSink, Result, TextureKind};
use quill_paint::{Bounds, CompositeOperationState, ImageId, Paint, Scissor};
use quill_path::{DrawPath, Vertex};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::frame::{copy_vertices, DrawCommand, RecordedFrame, RecordedPath, Viewport};

/// Texture contents held by the recorder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedTexture {
    pub kind: TextureKind,
    pub width: u32,
    pub height: u32,
    /// Raw [`ImageFlags`] bits
    pub flags: u32,
    /// Tightly packed rows, zeroed when created without data
    pub data: Vec<u8>,
}

impl RecordedTexture {
    fn row_bytes(&self) -> usize {
        self.width as usize * self.kind.bytes_per_pixel()
    }

    pub fn image_flags(&self) -> ImageFlags {
        ImageFlags::from_bits_truncate(self.flags)
    }
}

fn texture_len(kind: TextureKind, width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(CanvasError::InvalidImageSize { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(kind.bytes_per_pixel()))
        .ok_or(CanvasError::InvalidImageSize { width, height })
}

/// A [`RenderSink`] that keeps every call in memory.
///
/// Calls accumulate in a pending frame; `flush` completes it and `cancel`
/// drops it. Texture ids start at 1.
#[derive(Debug, Default)]
pub struct RecordingSink {
    textures: BTreeMap<ImageId, RecordedTexture>,
    next_texture: u32,
    pending: RecordedFrame,
    frames: Vec<RecordedFrame>,
    cancelled: usize,
    deleted: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed frames, oldest first
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Calls recorded since the last flush or cancel
    pub fn pending(&self) -> &RecordedFrame {
        &self.pending
    }

    pub fn take_frames(&mut self) -> Vec<RecordedFrame> {
        std::mem::take(&mut self.frames)
    }

    pub fn texture(&self, image: ImageId) -> Option<&RecordedTexture> {
        self.textures.get(&image)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of frames dropped through `cancel`
    pub fn cancelled_frames(&self) -> usize {
        self.cancelled
    }

    /// True once the owning canvas released the sink
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn texture_mut(&mut self, image: ImageId) -> Result<&mut RecordedTexture> {
        self.textures
            .get_mut(&image)
            .ok_or(CanvasError::UnknownImage(image))
    }
}

impl RenderSink for RecordingSink {
    fn create_texture(
        &mut self,
        kind: TextureKind,
        width: u32,
        height: u32,
        flags: ImageFlags,
        data: Option<&[u8]>,
    ) -> Result<ImageId> {
        let len = texture_len(kind, width, height)?;
        let data = match data {
            Some(bytes) if bytes.len() != len => {
                return Err(CanvasError::ImageDataSize {
                    expected: len,
                    actual: bytes.len(),
                })
            }
            Some(bytes) => bytes.to_vec(),
            None => vec![0; len],
        };

        self.next_texture += 1;
        let id = ImageId(self.next_texture);
        self.textures.insert(
            id,
            RecordedTexture {
                kind,
                width,
                height,
                flags: flags.bits(),
                data,
            },
        );
        debug!(?id, ?kind, width, height, "Texture created");
        Ok(id)
    }

    fn delete_texture(&mut self, image: ImageId) -> Result<()> {
        self.textures
            .remove(&image)
            .map(|_| debug!(?image, "Texture deleted"))
            .ok_or(CanvasError::UnknownImage(image))
    }

    fn update_texture(
        &mut self,
        image: ImageId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<()> {
        let texture = self.texture_mut(image)?;
        let fits_x = x.checked_add(width).is_some_and(|r| r <= texture.width);
        let fits_y = y.checked_add(height).is_some_and(|b| b <= texture.height);
        if !fits_x || !fits_y {
            return Err(CanvasError::InvalidImageSize { width, height });
        }
        let expected = texture_len(texture.kind, width, height)?;
        if data.len() != expected {
            return Err(CanvasError::ImageDataSize {
                expected,
                actual: data.len(),
            });
        }

        let bpp = texture.kind.bytes_per_pixel();
        let stride = texture.row_bytes();
        let src_row = width as usize * bpp;
        for (row, src) in data.chunks_exact(src_row).enumerate() {
            let start = (y as usize + row) * stride + x as usize * bpp;
            texture.data[start..start + src_row].copy_from_slice(src);
        }
        Ok(())
    }

    fn texture_size(&self, image: ImageId) -> Result<(u32, u32)> {
        self.textures
            .get(&image)
            .map(|t| (t.width, t.height))
            .ok_or(CanvasError::UnknownImage(image))
    }

    fn viewport(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.pending.viewport = Some(Viewport {
            width,
            height,
            device_pixel_ratio,
        });
    }

    fn cancel(&mut self) {
        trace!(calls = self.pending.calls.len(), "Dropping pending calls");
        self.pending = RecordedFrame::default();
        self.cancelled += 1;
    }

    fn flush(&mut self) {
        let frame = std::mem::take(&mut self.pending);
        debug!(
            calls = frame.calls.len(),
            vertices = frame.vertex_count(),
            "Frame recorded"
        );
        self.frames.push(frame);
    }

    fn render_fill(
        &mut self,
        paint: &Paint,
        composite: CompositeOperationState,
        scissor: &Scissor,
        fringe: f32,
        bounds: Bounds,
        paths: &[DrawPath<'_>],
    ) {
        self.pending.calls.push(DrawCommand::Fill {
            paint: *paint,
            composite,
            scissor: *scissor,
            fringe,
            bounds,
            paths: paths.iter().map(RecordedPath::from_draw_path).collect(),
        });
    }

    fn render_stroke(
        &mut self,
        paint: &Paint,
        composite: CompositeOperationState,
        scissor: &Scissor,
        fringe: f32,
        stroke_width: f32,
        paths: &[DrawPath<'_>],
    ) {
        self.pending.calls.push(DrawCommand::Stroke {
            paint: *paint,
            composite,
            scissor: *scissor,
            fringe,
            stroke_width,
            paths: paths.iter().map(RecordedPath::from_draw_path).collect(),
        });
    }

    fn render_triangles(
        &mut self,
        paint: &Paint,
        composite: CompositeOperationState,
        scissor: &Scissor,
        vertices: &[Vertex],
        fringe: f32,
    ) {
        self.pending.calls.push(DrawCommand::Triangles {
            paint: *paint,
            composite,
            scissor: *scissor,
            fringe,
            vertices: copy_vertices(vertices),
        });
    }

    fn delete(&mut self) {
        debug!(textures = self.textures.len(), "Recording sink released");
        self.textures.clear();
        self.deleted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_ids_start_at_one() {
        let mut sink = RecordingSink::new();
        let a = sink
            .create_texture(TextureKind::Rgba, 2, 2, ImageFlags::empty(), None)
            .unwrap();
        let b = sink
            .create_texture(TextureKind::Alpha, 4, 1, ImageFlags::REPEAT_X, None)
            .unwrap();
        assert_eq!(a, ImageId(1));
        assert_eq!(b, ImageId(2));
        assert_eq!(sink.texture(a).unwrap().data.len(), 16);
        assert_eq!(sink.texture(b).unwrap().image_flags(), ImageFlags::REPEAT_X);
    }

    #[test]
    fn test_create_rejects_wrong_data_length() {
        let mut sink = RecordingSink::new();
        let err = sink
            .create_texture(TextureKind::Rgba, 2, 2, ImageFlags::empty(), Some(&[0; 3]))
            .unwrap_err();
        assert!(matches!(
            err,
            CanvasError::ImageDataSize {
                expected: 16,
                actual: 3
            }
        ));
        assert_eq!(sink.texture_count(), 0);
    }

    #[test]
    fn test_update_writes_sub_region() {
        let mut sink = RecordingSink::new();
        let id = sink
            .create_texture(TextureKind::Alpha, 3, 3, ImageFlags::empty(), None)
            .unwrap();
        sink.update_texture(id, 1, 1, 2, 2, &[1, 2, 3, 4]).unwrap();
        assert_eq!(sink.texture(id).unwrap().data, vec![0, 0, 0, 0, 1, 2, 0, 3, 4]);

        let err = sink.update_texture(id, 2, 2, 2, 2, &[0; 4]).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidImageSize { .. }));
    }

    #[test]
    fn test_unknown_texture() {
        let mut sink = RecordingSink::new();
        assert!(matches!(
            sink.delete_texture(ImageId(7)),
            Err(CanvasError::UnknownImage(ImageId(7)))
        ));
        assert!(sink.texture_size(ImageId(7)).is_err());
    }

    #[test]
    fn test_cancel_drops_pending_calls() {
        let mut sink = RecordingSink::new();
        let verts = [Vertex::default(); 3];
        sink.viewport(10.0, 10.0, 1.0);
        sink.render_triangles(
            &Paint::color(quill_paint::Color::BLACK),
            quill_paint::CompositeOperation::SourceOver.into(),
            &Scissor::NONE,
            &verts,
            1.0,
        );
        assert_eq!(sink.pending().calls.len(), 1);

        sink.cancel();
        assert!(sink.pending().calls.is_empty());
        sink.flush();
        assert_eq!(sink.frames().len(), 1);
        assert!(sink.frames()[0].calls.is_empty());
        assert_eq!(sink.cancelled_frames(), 1);
    }
}
