//! Catalog errors.

use std::path::PathBuf;

use badge_core::ErrorKind;
use thiserror::Error;

use crate::manifest::ManifestError;

/// Failures while resolving or loading a badge.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No source knows the badge identifier.
    #[error("badge not found: {0}")]
    NotFound(String),

    /// The template directory has neither `manifest.json` nor `manifest.xml`.
    #[error("no manifest in template directory {}", .0.display())]
    ManifestMissing(PathBuf),

    /// The manifest exists but could not be parsed.
    #[error("malformed manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    /// Filesystem failure while reading the catalog.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ManifestMissing(_) | Self::Manifest { .. } | Self::Io { .. } => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(CatalogError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            CatalogError::ManifestMissing(PathBuf::from("/tmp/x")).kind(),
            ErrorKind::Io
        );
        let err = CatalogError::Manifest {
            path: PathBuf::from("m.json"),
            source: ManifestError::Bom,
        };
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("m.json"));
    }
}
