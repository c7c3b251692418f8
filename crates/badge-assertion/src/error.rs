//! Assertion errors.

use std::path::PathBuf;

use badge_core::{BadgeError, ErrorKind};
use thiserror::Error;

/// Failures while building, saving or loading an assertion.
#[derive(Error, Debug)]
pub enum AssertionError {
    /// The instance has no recipient; an assertion cannot name nobody.
    #[error("badge instance has no recipient")]
    MissingRecipient,

    /// The issued identifier is not 32 lowercase hex characters.
    #[error("malformed issued id: {0:?}")]
    InvalidIssuedId(String),

    /// A core value could not be rendered (e.g. an out-of-range date).
    #[error(transparent)]
    Core(#[from] BadgeError),

    /// JSON serialization failed.
    #[error("cannot serialize assertion: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssertionError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRecipient | Self::InvalidIssuedId(_) => ErrorKind::Validation,
            Self::Core(e) => e.kind(),
            Self::Serialization(_) | Self::Io { .. } => ErrorKind::Io,
        }
    }
}
