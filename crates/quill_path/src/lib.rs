//! Quill path pipeline
//!
//! Turns a stream of path commands into triangle geometry with analytic
//! antialiasing. No multisampling is needed: every edge gets a fringe whose
//! `u` coordinate ramps coverage from 1 to 0 over about one device pixel.
//!
//! # Pipeline
//!
//! ```text
//! CommandBuffer        move/line/bezier/close/winding, already in device space
//!        │
//!        ▼
//! PathCache::flatten   curves → polylines, winding fixed up, bounds
//!        │
//!        ▼
//! calculate_joins      extrusion vectors, bevel flags, convexity
//!        │
//!        ├──────────────────────┐
//!        ▼                      ▼
//! expand_fill            expand_stroke
//!        │                      │
//!        └──────────┬───────────┘
//!                   ▼
//!             DrawPath slices → render sink
//! ```
//!
//! The cache is reused between a fill and a stroke of the same path; it is
//! invalidated by the command buffer's revision, never by transform changes.

pub mod cache;
pub mod command;
pub mod error;
pub mod fill;
pub mod flatten;
pub mod joins;
pub mod math;
pub mod shapes;
pub mod stroke;
pub mod vertex;

pub use cache::{DrawPath, PathCache, PathPoint, PointFlags, SubPath, Tolerances};
pub use command::{Command, CommandBuffer, Winding};
pub use error::{PathError, Result};
pub use fill::FillExpansion;
pub use stroke::StrokeExpansion;
pub use vertex::{LineCap, LineJoin, Vertex};
