//! Quill Recorder
//!
//! A [`RenderSink`](quill_canvas::RenderSink) that records instead of
//! rendering. Every fill, stroke and triangle batch is copied into an owned
//! [`RecordedFrame`] that tests can inspect or export as JSON.
//!
//! ```ignore
//! use quill_canvas::Canvas;
//! use quill_recorder::RecordingSink;
//!
//! let mut canvas = Canvas::new(RecordingSink::new());
//! canvas.begin_frame(100.0, 100.0, 1.0);
//! canvas.begin_path();
//! canvas.circle(50.0, 50.0, 20.0);
//! canvas.fill();
//! canvas.end_frame();
//!
//! let json = canvas.sink().last_frame().unwrap().to_json()?;
//! ```

pub mod frame;
pub mod sink;

pub use frame::{DrawCommand, RecordedFrame, RecordedPath, Viewport};
pub use sink::{RecordedTexture, RecordingSink};
