//! Error type shared by constructors and collaborator boundaries.
//!
//! Block processing itself never fails: arithmetic edge cases degrade to
//! leaving samples untouched and out-of-range parameters are clamped. Errors
//! only surface while configuring components or talking to the outside world.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A size, count or duration that must be positive was not.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two buffers expected to share a length did not.
    #[error("invalid parameter: size mismatch (expected {expected}, got {actual})")]
    SizeMismatch { expected: usize, actual: usize },

    /// A file or device could not be opened for reading or writing.
    #[error("resource unavailable: {}", path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A stereo operation was requested on a configuration without two channels.
    #[error("channel mismatch: expected {expected} channels, configured for {actual}")]
    ChannelMismatch { expected: u16, actual: u16 },

    /// Playback was asked to start past the end of the source.
    #[error("seek out of range: frame {requested} requested, {available} available")]
    SeekOutOfRange { requested: usize, available: usize },
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidParameter(msg.into())
    }

    pub(crate) fn unavailable(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::ResourceUnavailable {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
