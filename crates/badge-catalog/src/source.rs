//! # Badge Sources
//!
//! A [`BadgeSource`] knows a set of badge identifiers and can produce the
//! definition and proof policy of each. Two sources ship with the issuer:
//!
//! - [`CodeDefinedSource`]: definitions compiled into the binary, such as
//!   the example badge.
//! - [`TemplateSource`]: one directory per badge under
//!   `data/badges/catalog/`, described by a manifest file.
//!
//! Adding a new kind of badge means adding a new implementation; the
//! catalog does not change.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use badge_core::layout::CATALOG_RELATIVE_DIR;
use badge_core::{BadgeDefinition, BadgeId};
use parking_lot::RwLock;

use crate::error::CatalogError;
use crate::manifest::Manifest;
use crate::proof::ProofPolicy;

/// A provider of badge definitions.
pub trait BadgeSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Identifiers this source can currently issue, in listing order.
    fn badge_ids(&self) -> Result<Vec<BadgeId>, CatalogError>;

    /// Whether `badge_id` belongs to this source.
    fn is_available(&self, badge_id: &str) -> bool;

    /// The static definition of `badge_id`.
    fn definition(&self, badge_id: &str) -> Result<BadgeDefinition, CatalogError>;

    /// The admission rule for `badge_id`.
    fn proof_policy(&self, badge_id: &str) -> Result<ProofPolicy, CatalogError>;

    /// Drop any cached data. Sources without caches ignore this.
    fn refresh(&self) {}
}

// ---------------------------------------------------------------------------
// Code-defined badges
// ---------------------------------------------------------------------------

/// Identifier of the built-in example badge.
pub const EXAMPLE_BADGE_ID: &str = "0817c9045c8f4861b478348719dbff91";

/// Proof token of the built-in example badge.
pub const EXAMPLE_BADGE_PROOF: &str = "b9d5a32cc3b14ce08eb078eb43adc0be";

/// Badges defined in code.
#[derive(Debug, Clone)]
pub struct CodeDefinedSource {
    badges: Vec<BadgeDefinition>,
}

impl CodeDefinedSource {
    /// A source holding exactly `badges`, listed in the given order.
    pub fn new(badges: Vec<BadgeDefinition>) -> Self {
        Self { badges }
    }

    /// The badges that ship with the issuer.
    pub fn builtin() -> Self {
        Self::new(vec![example_badge()])
    }

    fn find(&self, badge_id: &str) -> Option<&BadgeDefinition> {
        if badge_id.is_empty() {
            return None;
        }
        self.badges.iter().find(|b| b.badge_id.as_str() == badge_id)
    }
}

/// The example badge: awarded for interacting with the issuer demo.
pub fn example_badge() -> BadgeDefinition {
    BadgeDefinition {
        badge_name: Some("Example Badge".to_string()),
        description: Some("Interacted with a badge example.".to_string()),
        image_url: Some("data/badges/example/badge.png".to_string()),
        criteria_url: Some("data/badges/example/criteria.html".to_string()),
        issuer_name: Some("Example Academy".to_string()),
        proof_token: Some(EXAMPLE_BADGE_PROOF.to_string()),
        ..BadgeDefinition::empty(BadgeId::new(EXAMPLE_BADGE_ID))
    }
}

impl BadgeSource for CodeDefinedSource {
    fn name(&self) -> &str {
        "code"
    }

    fn badge_ids(&self) -> Result<Vec<BadgeId>, CatalogError> {
        Ok(self.badges.iter().map(|b| b.badge_id.clone()).collect())
    }

    fn is_available(&self, badge_id: &str) -> bool {
        self.find(badge_id).is_some()
    }

    fn definition(&self, badge_id: &str) -> Result<BadgeDefinition, CatalogError> {
        self.find(badge_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(badge_id.to_string()))
    }

    fn proof_policy(&self, badge_id: &str) -> Result<ProofPolicy, CatalogError> {
        self.find(badge_id)
            .map(|b| ProofPolicy::from_token(b.proof_token.as_deref()))
            .ok_or_else(|| CatalogError::NotFound(badge_id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Template badges
// ---------------------------------------------------------------------------

/// Strip every character that is not ASCII alphanumeric, `~`, `_` or `-`.
///
/// The result names the template directory of a badge, so it can never
/// contain a path separator or `..`.
pub fn sanitize_badge_id(badge_id: &str) -> String {
    badge_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '~' | '_' | '-'))
        .collect()
}

/// Badges described by manifest files under the catalog directory.
///
/// Parsed manifests are cached until [`BadgeSource::refresh`] is called.
#[derive(Debug)]
pub struct TemplateSource {
    catalog_dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<Manifest>>>,
}

impl TemplateSource {
    /// A source reading templates from `catalog_dir`.
    pub fn new(catalog_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog_dir: catalog_dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The directory holding one subdirectory per template.
    pub fn catalog_dir(&self) -> &Path {
        &self.catalog_dir
    }

    /// Sanitized directory name of `badge_id`, or `None` if nothing is left.
    fn dir_name(badge_id: &str) -> Option<String> {
        let name = sanitize_badge_id(badge_id);
        (!name.is_empty()).then_some(name)
    }

    fn manifest(&self, dir_name: &str) -> Result<Arc<Manifest>, CatalogError> {
        if let Some(hit) = self.cache.read().get(dir_name) {
            tracing::debug!(template = dir_name, "manifest cache hit");
            return Ok(Arc::clone(hit));
        }

        let manifest = Arc::new(Manifest::load(&self.catalog_dir.join(dir_name))?);
        self.cache
            .write()
            .insert(dir_name.to_string(), Arc::clone(&manifest));
        Ok(manifest)
    }

    fn resolve(&self, badge_id: &str) -> Result<(String, Arc<Manifest>), CatalogError> {
        let dir_name = Self::dir_name(badge_id)
            .filter(|name| self.catalog_dir.join(name).is_dir())
            .ok_or_else(|| CatalogError::NotFound(badge_id.to_string()))?;
        let manifest = self.manifest(&dir_name)?;
        Ok((dir_name, manifest))
    }
}

impl BadgeSource for TemplateSource {
    fn name(&self) -> &str {
        "template"
    }

    fn badge_ids(&self) -> Result<Vec<BadgeId>, CatalogError> {
        let entries = match std::fs::read_dir(&self.catalog_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(dir = %self.catalog_dir.display(), "no template catalog directory");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(CatalogError::Io {
                    path: self.catalog_dir.clone(),
                    source,
                })
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CatalogError::Io {
                path: self.catalog_dir.clone(),
                source,
            })?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            names.push(name);
        }
        names.sort();

        Ok(names.into_iter().map(BadgeId::new).collect())
    }

    fn is_available(&self, badge_id: &str) -> bool {
        Self::dir_name(badge_id).is_some_and(|name| self.catalog_dir.join(name).is_dir())
    }

    fn definition(&self, badge_id: &str) -> Result<BadgeDefinition, CatalogError> {
        let (dir_name, manifest) = self.resolve(badge_id)?;
        let template_dir = self.catalog_dir.join(&dir_name);

        let mut def = manifest
            .apply_to(BadgeDefinition::empty(BadgeId::new(badge_id)))
            .map_err(|source| CatalogError::Manifest {
                path: template_dir,
                source,
            })?;

        let template_url = format!("{CATALOG_RELATIVE_DIR}/{dir_name}");
        def.image_url
            .get_or_insert_with(|| format!("{template_url}/badge.png"));
        def.criteria_url
            .get_or_insert_with(|| format!("{template_url}/criteria.html"));

        Ok(def)
    }

    fn proof_policy(&self, badge_id: &str) -> Result<ProofPolicy, CatalogError> {
        let (_, manifest) = self.resolve(badge_id)?;
        Ok(ProofPolicy::from_token(manifest.proof_token()))
    }

    fn refresh(&self) {
        let dropped = {
            let mut cache = self.cache.write();
            let n = cache.len();
            cache.clear();
            n
        };
        tracing::debug!(dropped, "template manifest cache cleared");
    }
}
