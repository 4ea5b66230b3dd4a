//! Canvas error types

use quill_paint::ImageId;
use quill_path::PathError;
use thiserror::Error;

/// Errors surfaced by the canvas and its render sinks
#[derive(Error, Debug)]
pub enum CanvasError {
    /// Configuration could not be parsed
    #[error("Invalid canvas configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The sink does not know this image
    #[error("Unknown image: {0:?}")]
    UnknownImage(ImageId),

    /// Zero-sized images are rejected
    #[error("Invalid image size: {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    /// Pixel data does not match the image dimensions
    #[error("Image data has {actual} bytes, expected {expected}")]
    ImageDataSize { expected: usize, actual: usize },

    /// Path building or expansion failed
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Result type for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;
