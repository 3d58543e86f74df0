//! # Error Types

use std::path::PathBuf;

use crate::regex::ErrorWrapper;

/// Errors from bytemerge operations.
#[derive(Debug, thiserror::Error)]
pub enum BytemergeError {
    /// Vocab size is below the base vocabulary (special tokens + 256 bytes).
    #[error("vocab size ({size}) must be >= {base} (special tokens + 256 bytes)")]
    VocabSizeTooSmall {
        /// The vocab size that was too small.
        size: usize,

        /// The base vocabulary size.
        base: usize,
    },

    /// Vocab size exceeds the capacity of the token id type.
    #[error("vocab size ({size}) exceeds token id capacity")]
    VocabSizeOverflow {
        /// The vocab size that exceeded the capacity.
        size: usize,
    },

    /// A special token is empty or repeated.
    #[error("invalid special token {token:?}: {reason}")]
    InvalidSpecialToken {
        /// The offending token.
        token: String,

        /// Why it was rejected.
        reason: &'static str,
    },

    /// The word split pattern failed to compile, or failed while matching.
    #[error("pattern error: {0}")]
    Pattern(#[from] ErrorWrapper),

    /// The corpus could not be opened or read.
    #[error("corpus {path:?} is unreadable: {source}")]
    Input {
        /// The corpus path.
        path: PathBuf,

        /// The underlying error.
        source: std::io::Error,
    },

    /// A chunk boundary provider returned unusable offsets.
    #[error("invalid chunk boundaries: {0}")]
    ChunkBoundaries(String),

    /// A frequency does not fit the configured count type.
    #[error("count overflow: {value}")]
    CountOverflow {
        /// The value which failed to convert.
        value: i128,
    },

    /// The pair table or location index disagrees with the word table.
    #[error("pair index inconsistency: {0}")]
    IndexInconsistency(String),

    /// The job was cancelled.
    #[error("cancelled")]
    Cancelled,

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Parse error (base64, integer, etc.)
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for bytemerge operations.
pub type BMResult<T> = core::result::Result<T, BytemergeError>;
