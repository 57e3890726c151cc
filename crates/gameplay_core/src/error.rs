//! Error types for the core library

use thiserror::Error;

/// Handle resolution errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandleError {
    /// The slot was freed, and possibly reused by another value
    #[error("Handle is stale (already freed)")]
    Stale,

    /// The index was never allocated by this map
    #[error("Handle index out of bounds")]
    OutOfBounds,
}

/// Result type alias
pub type Result<T> = core::result::Result<T, HandleError>;
