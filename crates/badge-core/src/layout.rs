//! # On-Disk Layout
//!
//! Badge templates and issued assertions live at fixed paths under the
//! application root. Existing baking and verification tooling expects this
//! layout, so the relative paths below are a storage contract:
//!
//! ```text
//! <app_root>/data/badges/catalog/<badgeID>/manifest.json | manifest.xml
//! <app_root>/data/badges/catalog/<badgeID>/badge.png      (optional)
//! <app_root>/data/badges/catalog/<badgeID>/criteria.html  (optional)
//! <app_root>/data/assertions/<issuedID>.json
//! ```

use std::path::{Path, PathBuf};

/// Application-relative directory holding one subdirectory per template badge.
pub const CATALOG_RELATIVE_DIR: &str = "data/badges/catalog";

/// Application-relative directory holding issued assertion documents.
pub const ASSERTIONS_RELATIVE_DIR: &str = "data/assertions";

/// Resolves the storage directories under an application root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    app_root: PathBuf,
}

impl DataLayout {
    /// Create a layout rooted at `app_root`.
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
        }
    }

    /// The application root directory.
    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    /// Directory containing the template badge subdirectories.
    pub fn catalog_dir(&self) -> PathBuf {
        self.app_root.join(CATALOG_RELATIVE_DIR)
    }

    /// Directory containing issued assertion documents.
    pub fn assertions_dir(&self) -> PathBuf {
        self.app_root.join(ASSERTIONS_RELATIVE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_hang_off_app_root() {
        let layout = DataLayout::new("/srv/issuer");
        assert_eq!(
            layout.catalog_dir(),
            PathBuf::from("/srv/issuer/data/badges/catalog")
        );
        assert_eq!(
            layout.assertions_dir(),
            PathBuf::from("/srv/issuer/data/assertions")
        );
        assert_eq!(layout.app_root(), Path::new("/srv/issuer"));
    }
}
