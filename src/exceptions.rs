//! Error types for framedb

use std::fmt;

/// Main error type for frame store and session operations
#[derive(Debug)]
pub enum StoreError {
    /// Backing store file missing, unopenable, or not a valid store
    StoreUnavailable(String),

    /// Requested frame does not exist in the store
    FrameNotFound(String),

    /// Frame exists but carries no annotation
    AnnotationNotFound(String),

    /// Navigation cursor has passed the last frame
    Exhausted,

    /// IO error
    Io(std::io::Error),

    /// Payload encoding/decoding error
    Encoding(String),

    /// JSON serialization error
    Json(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::StoreUnavailable(msg) => write!(f, "Store unavailable: {msg}"),
            StoreError::FrameNotFound(name) => write!(f, "Frame not found: {name}"),
            StoreError::AnnotationNotFound(name) => {
                write!(f, "No annotation for frame: {name}")
            }
            StoreError::Exhausted => write!(f, "Session exhausted: no frame under cursor"),
            StoreError::Io(err) => write!(f, "IO error: {err}"),
            StoreError::Encoding(msg) => write!(f, "Encoding error: {msg}"),
            StoreError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Encoding(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Json(err)
    }
}

/// Result type for framedb operations
pub type Result<T> = std::result::Result<T, StoreError>;
