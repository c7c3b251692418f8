//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error kinds shared by every crate in the workspace. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! Three kinds cover every failure the issuer can report:
//!
//! - `NotFound`: unknown or unavailable badge identifier.
//! - `Validation`: missing or invalid email, proof, or recipient.
//! - `Io`: manifest unreadable or malformed, assertion write failure.
//!
//! Crate-specific error enums map themselves onto [`ErrorKind`] so the
//! outer surfaces can decide on a response without matching every variant.

use thiserror::Error;

/// The coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown or unavailable badge.
    NotFound,
    /// Missing or invalid input.
    Validation,
    /// Filesystem or data-format failure.
    Io,
}

impl ErrorKind {
    /// Returns the machine-readable kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION_ERROR",
            Self::Io => "IO_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum BadgeError {
    /// The referenced badge does not exist.
    #[error("badge not found: {0}")]
    NotFound(String),

    /// Input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BadgeError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Serialization(_) | Self::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_classified() {
        assert_eq!(BadgeError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            BadgeError::Validation("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            BadgeError::Serialization("x".into()).kind(),
            ErrorKind::Io
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(BadgeError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn display_carries_context() {
        let err = BadgeError::NotFound("does-not-exist".into());
        assert!(format!("{err}").contains("does-not-exist"));
        assert_eq!(ErrorKind::Validation.to_string(), "VALIDATION_ERROR");
    }
}
