//! Error types for the bifcache library.

use std::path::PathBuf;
use thiserror::Error;

use crate::bif::DataType;

/// Main error type for bifcache operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid magic bytes at start of file
    #[error("Invalid file: magic bytes do not match")]
    InvalidMagic,

    /// Unsupported file format version
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),

    /// File is truncated or corrupted
    #[error("Unexpected end of file at position {0}")]
    UnexpectedEof(u64),

    /// Invalid data structure in file
    #[error("Invalid file structure: {0}")]
    InvalidStructure(String),

    /// Loaded state failed validation
    #[error("Unable to load the content of the file \"{0}\"")]
    InvalidState(PathBuf),

    /// Channel not found by name
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// Channel exists but has a different data type than requested
    #[error("Channel \"{name}\" type mismatch: expected {expected}, got {actual}")]
    ChannelTypeMismatch {
        name: String,
        expected: DataType,
        actual: DataType,
    },

    /// Two channels disagree on the element count within one tile
    #[error(
        "Tile data count mismatch at tile {tile} depth {depth}: \
         {name_a}[{count_a}] {name_b}[{count_b}]"
    )]
    CountMismatch {
        tile: usize,
        depth: usize,
        name_a: String,
        count_a: usize,
        name_b: String,
        count_b: usize,
    },

    /// Write operation failed
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Archive is frozen (finalized)
    #[error("Archive is frozen and cannot be modified")]
    Frozen,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// JSON payload error (dictionary channels, archive metadata)
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// True for errors that are local to one component (the run continues).
    pub fn is_component_local(&self) -> bool {
        matches!(
            self,
            Self::ChannelNotFound(_) | Self::ChannelTypeMismatch { .. } | Self::CountMismatch { .. }
        )
    }
}

/// Result type alias for bifcache operations.
pub type Result<T> = std::result::Result<T, Error>;
