//! Quill Canvas
//!
//! An immediate-mode vector drawing context. Paths are declared against the
//! current transform, then filled or stroked with the current paint; the
//! resulting antialiased geometry is handed to a [`RenderSink`].
//!
//! # Example
//!
//! ```ignore
//! use quill_canvas::{Canvas, CanvasConfig};
//! use quill_paint::Color;
//!
//! let mut canvas = Canvas::with_config(sink, CanvasConfig::default());
//! canvas.begin_frame(800.0, 600.0, 2.0);
//!
//! canvas.begin_path();
//! canvas.rounded_rect(10.0, 10.0, 200.0, 100.0, 8.0);
//! canvas.fill_color(Color::rgb(0.2, 0.4, 0.9));
//! canvas.fill();
//!
//! canvas.end_frame();
//! ```

pub mod config;
pub mod context;
pub mod draw;
pub mod error;
pub mod sink;
pub mod state;
pub mod stats;

#[cfg(test)]
mod testing;

pub use config::CanvasConfig;
pub use context::Canvas;
pub use error::{CanvasError, Result};
pub use sink::{ImageFlags, RenderSink, TextureKind};
pub use state::{State, StateStack};
pub use stats::FrameStats;

// Re-exported so callers only need this crate for everyday drawing
pub use quill_paint::{
    BlendFactor, Color, CompositeOperation, CompositeOperationState, ImageId, Paint, Scissor,
    Transform2D,
};
pub use quill_path::{LineCap, LineJoin, Vertex, Winding};
