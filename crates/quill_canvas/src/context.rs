//! Canvas - the drawing context
//!
//! Owns the render state stack, the path being built, the flattened path
//! cache and the render sink. Path building and the draw drivers live in
//! [`crate::draw`]; this module covers frames, state and images.

use quill_paint::{
    BlendFactor, Color, CompositeOperation, CompositeOperationState, ImageId, Paint, Scissor,
    Transform2D,
};
use quill_path::{CommandBuffer, LineCap, LineJoin, PathCache, Tolerances};
use tracing::{debug, warn};

use crate::config::CanvasConfig;
use crate::error::{CanvasError, Result};
use crate::sink::{ImageFlags, RenderSink, TextureKind};
use crate::state::{State, StateStack};
use crate::stats::FrameStats;

pub struct Canvas<R: RenderSink> {
    pub(crate) sink: R,
    pub(crate) config: CanvasConfig,
    pub(crate) states: StateStack,
    pub(crate) commands: CommandBuffer,
    pub(crate) cache: PathCache,
    pub(crate) tolerances: Tolerances,
    pub(crate) device_pixel_ratio: f32,
    pub(crate) stats: FrameStats,
    sink_released: bool,
}

impl<R: RenderSink> Canvas<R> {
    pub fn new(sink: R) -> Self {
        Self::with_config(sink, CanvasConfig::default())
    }

    pub fn with_config(sink: R, config: CanvasConfig) -> Self {
        let ratio = config.device_pixel_ratio;
        Self {
            sink,
            states: StateStack::new(config.max_states),
            commands: CommandBuffer::new(),
            cache: PathCache::new(),
            tolerances: Tolerances::for_pixel_ratio(ratio),
            device_pixel_ratio: ratio,
            stats: FrameStats::default(),
            config,
            sink_released: false,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    /// Hand the sink back to the caller without calling its `delete` hook.
    pub fn into_sink(mut self) -> R
    where
        R: Default,
    {
        self.sink_released = true;
        std::mem::take(&mut self.sink)
    }

    pub fn frame_stats(&self) -> FrameStats {
        self.stats
    }

    pub fn tolerances(&self) -> Tolerances {
        self.tolerances
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// The flattened geometry of the last fill or stroke
    pub fn path_cache(&self) -> &PathCache {
        &self.cache
    }

    pub fn commands(&self) -> &CommandBuffer {
        &self.commands
    }

    pub fn state(&self) -> &State {
        self.states.current()
    }

    fn set_device_pixel_ratio(&mut self, ratio: f32) {
        if ratio != self.device_pixel_ratio {
            debug!(ratio, "Device pixel ratio changed");
        }
        self.device_pixel_ratio = ratio;
        self.tolerances = Tolerances::for_pixel_ratio(ratio);
    }

    // === Frames ===

    /// Start a frame: resets the state stack, tolerances and statistics.
    pub fn begin_frame(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        debug!(width, height, device_pixel_ratio, "Begin frame");

        self.states.clear();
        self.set_device_pixel_ratio(device_pixel_ratio);
        self.sink.viewport(width, height, device_pixel_ratio);
        self.stats = FrameStats::default();
    }

    pub fn cancel_frame(&mut self) {
        debug!("Cancel frame");
        self.sink.cancel();
    }

    pub fn end_frame(&mut self) {
        debug!(
            draw_calls = self.stats.draw_calls,
            fill_triangles = self.stats.fill_triangles,
            stroke_triangles = self.stats.stroke_triangles,
            text_triangles = self.stats.text_triangles,
            "End frame"
        );
        self.sink.flush();
    }

    // === State stack ===

    pub fn save(&mut self) {
        if !self.states.save() {
            warn!(max_states = self.config.max_states, "State stack full, save ignored");
        }
    }

    pub fn restore(&mut self) {
        if !self.states.restore() {
            warn!("Nothing to restore");
        }
    }

    pub fn reset(&mut self) {
        self.states.reset();
    }

    // === Render styles ===

    pub fn shape_anti_alias(&mut self, enabled: bool) {
        self.states.current_mut().shape_anti_alias = enabled;
    }

    pub fn stroke_width(&mut self, width: f32) {
        self.states.current_mut().stroke_width = width;
    }

    pub fn miter_limit(&mut self, limit: f32) {
        self.states.current_mut().miter_limit = limit;
    }

    pub fn line_cap(&mut self, cap: LineCap) {
        self.states.current_mut().line_cap = cap;
    }

    pub fn line_join(&mut self, join: LineJoin) {
        self.states.current_mut().line_join = join;
    }

    pub fn global_alpha(&mut self, alpha: f32) {
        self.states.current_mut().alpha = alpha;
    }

    pub fn stroke_color(&mut self, color: Color) {
        self.states.current_mut().stroke = Paint::color(color);
    }

    /// Set the stroke paint; its transform is taken relative to the current one.
    pub fn stroke_paint(&mut self, paint: Paint) {
        let state = self.states.current_mut();
        state.stroke = paint;
        state.stroke.transform = paint.transform.multiply(&state.transform);
    }

    pub fn fill_color(&mut self, color: Color) {
        self.states.current_mut().fill = Paint::color(color);
    }

    /// Set the fill paint; its transform is taken relative to the current one.
    pub fn fill_paint(&mut self, paint: Paint) {
        let state = self.states.current_mut();
        state.fill = paint;
        state.fill.transform = paint.transform.multiply(&state.transform);
    }

    // === Transforms ===

    fn premultiply_transform(&mut self, t: Transform2D) {
        let state = self.states.current_mut();
        state.transform = state.transform.premultiply(&t);
    }

    /// Apply `[a c e; b d f]` before the current transform
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.premultiply_transform(Transform2D::new(a, b, c, d, e, f));
    }

    pub fn reset_transform(&mut self) {
        self.states.current_mut().transform = Transform2D::identity();
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.premultiply_transform(Transform2D::translate(x, y));
    }

    pub fn rotate(&mut self, angle: f32) {
        self.premultiply_transform(Transform2D::rotate(angle));
    }

    pub fn skew_x(&mut self, angle: f32) {
        self.premultiply_transform(Transform2D::skew_x(angle));
    }

    pub fn skew_y(&mut self, angle: f32) {
        self.premultiply_transform(Transform2D::skew_y(angle));
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.premultiply_transform(Transform2D::scale(x, y));
    }

    pub fn current_transform(&self) -> Transform2D {
        self.states.current().transform
    }

    // === Scissoring ===

    pub fn scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let state = self.states.current_mut();
        state.scissor = Scissor::new(x, y, w, h, &state.transform);
    }

    /// Intersect the current scissor with a rectangle in the current space.
    ///
    /// Exact only when both rectangles share an orientation.
    pub fn intersect_scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let state = self.states.current_mut();
        state.scissor = state.scissor.intersect(x, y, w, h, &state.transform);
    }

    pub fn reset_scissor(&mut self) {
        self.states.current_mut().scissor = Scissor::NONE;
    }

    // === Compositing ===

    pub fn global_composite_operation(&mut self, op: CompositeOperation) {
        self.states.current_mut().composite = op.into();
    }

    pub fn global_composite_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.states.current_mut().composite = CompositeOperationState::new(src, dst);
    }

    pub fn global_composite_blend_func_separate(
        &mut self,
        src_rgb: BlendFactor,
        dst_rgb: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) {
        self.states.current_mut().composite =
            CompositeOperationState::separate(src_rgb, dst_rgb, src_alpha, dst_alpha);
    }

    // === Images ===

    fn check_rgba_len(width: u32, height: u32, data: &[u8]) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidImageSize { width, height });
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(TextureKind::Rgba.bytes_per_pixel()))
            .ok_or(CanvasError::InvalidImageSize { width, height })?;
        if data.len() != expected {
            return Err(CanvasError::ImageDataSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(())
    }

    /// Create an RGBA image from tightly packed pixel data
    pub fn create_image_rgba(
        &mut self,
        width: u32,
        height: u32,
        flags: ImageFlags,
        data: &[u8],
    ) -> Result<ImageId> {
        Self::check_rgba_len(width, height, data)?;
        let image = self
            .sink
            .create_texture(TextureKind::Rgba, width, height, flags, Some(data))
            .map_err(|e| {
                warn!(error = %e, width, height, "Failed to create image");
                e
            })?;
        debug!(?image, width, height, "Created image");
        Ok(image)
    }

    /// Replace the full contents of an RGBA image
    pub fn update_image(&mut self, image: ImageId, data: &[u8]) -> Result<()> {
        let (width, height) = self.image_size(image)?;
        Self::check_rgba_len(width, height, data)?;
        self.sink
            .update_texture(image, 0, 0, width, height, data)
            .map_err(|e| {
                warn!(error = %e, ?image, "Failed to update image");
                e
            })
    }

    pub fn image_size(&self, image: ImageId) -> Result<(u32, u32)> {
        self.sink.texture_size(image)
    }

    pub fn delete_image(&mut self, image: ImageId) -> Result<()> {
        self.sink.delete_texture(image).map_err(|e| {
            warn!(error = %e, ?image, "Failed to delete image");
            e
        })
    }
}

impl<R: RenderSink> Drop for Canvas<R> {
    fn drop(&mut self) {
        if !self.sink_released {
            self.sink.delete();
        }
    }
}
