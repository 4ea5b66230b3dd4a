//! Path pipeline error types

use thiserror::Error;

/// Errors raised while building or expanding a path
///
/// Buffer growth is the only thing that can fail; numerically degenerate
/// input is always substituted, never reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Growing one of the scratch buffers failed
    #[error("Failed to reserve space for {requested} {what}")]
    Alloc {
        what: &'static str,
        requested: usize,
    },
}

/// Result type for path operations
pub type Result<T> = std::result::Result<T, PathError>;

/// Make room for `additional` more items without panicking on exhaustion
pub(crate) fn try_grow<T>(buf: &mut Vec<T>, additional: usize, what: &'static str) -> Result<()> {
    buf.try_reserve(additional).map_err(|_| PathError::Alloc {
        what,
        requested: buf.len().saturating_add(additional),
    })
}
