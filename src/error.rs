//! Error types for the block editor core.

use std::io;
use std::panic::Location;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for block-editor core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File open/read/seek/write failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The manifest listing datafiles could not be read.
    #[error("Manifest error: {message}")]
    Manifest { message: String },

    /// A header field was read past the end of the block buffer.
    #[error("Parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// A fixed-size slice was shorter than a structural reader needed.
    #[error("Buffer too small: need {needed} bytes, have {available} at {location}")]
    BufferTooSmall {
        needed: usize,
        available: usize,
        location: &'static Location<'static>,
    },

    /// Malformed hex, out-of-range NUMBER/DATE arithmetic, or unsupported charset.
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Command syntax invalid (conflicting flags, missing argument).
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// `save` was invoked without edit mode, or no block is loaded yet.
    #[error("State error: {message}")]
    State { message: String },
}

impl Error {
    /// Create a manifest error.
    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
        }
    }

    /// Create a parse error anchored at a byte offset.
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a state error.
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }
}

/// Require a slice to have at least `needed` bytes, at `caller`'s location.
#[track_caller]
pub(crate) fn require_len(slice: &[u8], needed: usize) -> Result<()> {
    if slice.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            available: slice.len(),
            location: Location::caller(),
        });
    }
    Ok(())
}
