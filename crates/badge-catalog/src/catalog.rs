//! # Badge Catalog
//!
//! [`BadgeCatalog`] is the registry of [`BadgeSource`]s. Lookups walk the
//! sources in registration order and the first source that claims an
//! identifier owns it, so code-defined badges shadow templates with the same
//! identifier.
//!
//! The catalog is also the default [`ProofValidator`]: it asks the owning
//! source for the badge's [`ProofPolicy`](crate::ProofPolicy) and fails
//! closed when there is none.

use std::collections::HashSet;

use badge_core::{
    BadgeDefinition, BadgeId, BadgeInstance, BadgeSummary, DataLayout, IssuedId, UserId,
};
use serde::Serialize;

use crate::error::CatalogError;
use crate::proof::ProofValidator;
use crate::source::{BadgeSource, CodeDefinedSource, TemplateSource};

/// Optional per-issuance values for [`BadgeCatalog::create`].
#[derive(Debug, Clone, Default)]
pub struct InstanceOptions {
    /// Instance identifier; generated when absent.
    pub issued_id: Option<IssuedId>,
    /// Recipient identifier.
    pub user_id: Option<UserId>,
    /// Issue time; the current time when absent.
    pub issued_unix_time: Option<i64>,
    /// Recipient-specific evidence page.
    pub evidence_url: Option<String>,
}

/// One entry of [`BadgeCatalog::list_badge_names`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeName {
    #[serde(rename = "badgeID")]
    pub badge_id: BadgeId,
    #[serde(rename = "badgeName")]
    pub badge_name: Option<String>,
}

/// Registry of badge sources.
pub struct BadgeCatalog {
    sources: Vec<Box<dyn BadgeSource>>,
}

impl std::fmt::Debug for BadgeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeCatalog")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl BadgeCatalog {
    /// The standard catalog: built-in badges first, then templates under
    /// the layout's catalog directory.
    pub fn new(layout: &DataLayout) -> Self {
        let sources: Vec<Box<dyn BadgeSource>> = vec![
            Box::new(CodeDefinedSource::builtin()),
            Box::new(TemplateSource::new(layout.catalog_dir())),
        ];
        Self::with_sources(sources)
    }

    /// A catalog over an explicit list of sources, consulted in order.
    pub fn with_sources(sources: Vec<Box<dyn BadgeSource>>) -> Self {
        Self { sources }
    }

    fn source_for(&self, badge_id: &str) -> Option<&dyn BadgeSource> {
        self.sources
            .iter()
            .find(|s| s.is_available(badge_id))
            .map(Box::as_ref)
    }

    /// Whether any source can issue `badge_id`.
    pub fn is_badge_available(&self, badge_id: &str) -> bool {
        self.source_for(badge_id).is_some()
    }

    /// Every issuable identifier, source by source.
    ///
    /// An identifier claimed by an earlier source is not repeated.
    pub fn list_badge_ids(&self) -> Result<Vec<BadgeId>, CatalogError> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for source in &self.sources {
            for id in source.badge_ids()? {
                if seen.insert(id.clone()) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    /// Public summaries of every issuable badge, in listing order.
    ///
    /// Badges whose definition cannot be loaded are skipped.
    pub fn list_badges(&self) -> Result<Vec<BadgeSummary>, CatalogError> {
        let mut badges = Vec::new();
        for id in self.list_badge_ids()? {
            match self.definition(id.as_str()) {
                Ok(def) => badges.push(def.summary()),
                Err(e) => tracing::warn!(badge = %id, error = %e, "skipping badge"),
            }
        }
        Ok(badges)
    }

    /// Identifier and name of every listed badge.
    pub fn list_badge_names(&self) -> Result<Vec<BadgeName>, CatalogError> {
        Ok(self
            .list_badges()?
            .into_iter()
            .map(|b| BadgeName {
                badge_id: BadgeId::new(b.badge_id),
                badge_name: b.badge_name,
            })
            .collect())
    }

    /// The definition of `badge_id`.
    pub fn definition(&self, badge_id: &str) -> Result<BadgeDefinition, CatalogError> {
        self.source_for(badge_id)
            .ok_or_else(|| CatalogError::NotFound(badge_id.to_string()))?
            .definition(badge_id)
    }

    /// Create an instance of `badge_id` for one issuance.
    pub fn create(
        &self,
        badge_id: &str,
        options: InstanceOptions,
    ) -> Result<BadgeInstance, CatalogError> {
        let definition = self.definition(badge_id)?;
        Ok(BadgeInstance::new(
            definition,
            options.issued_id,
            options.user_id,
            options.issued_unix_time,
            options.evidence_url,
        ))
    }

    /// Drop cached template data in every source.
    pub fn refresh(&self) {
        for source in &self.sources {
            source.refresh();
        }
        tracing::info!("badge catalog refreshed");
    }
}

impl ProofValidator for BadgeCatalog {
    fn is_valid_proof(&self, proof: &str, _email: &str, badge_id: &str) -> bool {
        let Some(source) = self.source_for(badge_id) else {
            return false;
        };
        match source.proof_policy(badge_id) {
            Ok(policy) => policy.admits(proof),
            Err(e) => {
                tracing::warn!(badge = badge_id, error = %e, "cannot load proof policy");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::source::{EXAMPLE_BADGE_ID, EXAMPLE_BADGE_PROOF};

    fn catalog_with(templates: &[(&str, Option<&str>)]) -> (tempfile::TempDir, BadgeCatalog) {
        let root = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(root.path());
        for (name, manifest) in templates {
            let dir = layout.catalog_dir().join(name);
            std::fs::create_dir_all(&dir).unwrap();
            if let Some(m) = manifest {
                std::fs::write(dir.join("manifest.json"), m).unwrap();
            }
        }
        let catalog = BadgeCatalog::new(&layout);
        (root, catalog)
    }

    fn ids(catalog: &BadgeCatalog) -> Vec<String> {
        catalog
            .list_badge_ids()
            .unwrap()
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn code_defined_badges_come_first() {
        let (_root, catalog) = catalog_with(&[("b", Some("{}")), ("a", Some("{}"))]);
        assert_eq!(ids(&catalog), [EXAMPLE_BADGE_ID, "a", "b"]);
    }

    #[test]
    fn broken_templates_are_skipped_in_listing() {
        let (_root, catalog) = catalog_with(&[
            ("good", Some(r#"{"badgeName":"Good"}"#)),
            ("bad", Some("[]")),
            ("bare", None),
        ]);
        let names = catalog.list_badge_names().unwrap();
        let listed: Vec<&str> = names.iter().map(|n| n.badge_id.as_str()).collect();
        assert_eq!(listed, [EXAMPLE_BADGE_ID, "good"]);
        assert_eq!(names[1].badge_name.as_deref(), Some("Good"));
    }

    #[test]
    fn unknown_badge_is_unavailable_and_not_creatable() {
        let (_root, catalog) = catalog_with(&[]);
        assert!(!catalog.is_badge_available("does-not-exist"));
        assert!(matches!(
            catalog.create("does-not-exist", InstanceOptions::default()),
            Err(CatalogError::NotFound(_))
        ));
        assert!(!catalog.is_valid_proof("", "a@b.c", "does-not-exist"));
    }

    #[test]
    fn create_copies_definition_and_options() {
        let (_root, catalog) = catalog_with(&[]);
        let instance = catalog
            .create(
                EXAMPLE_BADGE_ID,
                InstanceOptions {
                    user_id: Some(UserId::new("sha256$abc")),
                    evidence_url: Some("evidence.html".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(instance.definition.badge_name.as_deref(), Some("Example Badge"));
        assert!(instance.issued_id.is_well_formed());
        assert_eq!(instance.user_id.as_ref().map(UserId::as_str), Some("sha256$abc"));
        assert_eq!(instance.evidence_url.as_deref(), Some("evidence.html"));
    }

    #[test]
    fn proof_validation_per_source() {
        let (_root, catalog) = catalog_with(&[
            ("locked", Some(r#"{"proof":"open-sesame"}"#)),
            ("open", Some("{}")),
            ("empty", Some(r#"{"proof":""}"#)),
            ("broken", Some("nope")),
        ]);
        assert!(catalog.is_valid_proof(EXAMPLE_BADGE_PROOF, "x@y.z", EXAMPLE_BADGE_ID));
        assert!(!catalog.is_valid_proof("wrong", "x@y.z", EXAMPLE_BADGE_ID));
        assert!(catalog.is_valid_proof("open-sesame", "x@y.z", "locked"));
        assert!(!catalog.is_valid_proof("", "x@y.z", "locked"));
        assert!(catalog.is_valid_proof("", "x@y.z", "open"));
        assert!(catalog.is_valid_proof("", "x@y.z", "empty"));
        assert!(!catalog.is_valid_proof("anything", "x@y.z", "empty"));
        assert!(!catalog.is_valid_proof("", "x@y.z", "broken"));
    }

    #[test]
    fn code_defined_badge_shadows_template() {
        let (_root, catalog) =
            catalog_with(&[(EXAMPLE_BADGE_ID, Some(r#"{"badgeName":"Impostor"}"#))]);
        assert_eq!(ids(&catalog), [EXAMPLE_BADGE_ID]);
        let def = catalog.definition(EXAMPLE_BADGE_ID).unwrap();
        assert_eq!(def.badge_name.as_deref(), Some("Example Badge"));
    }

    #[test]
    fn refresh_reloads_templates() {
        let (root, catalog) = catalog_with(&[("t", Some(r#"{"badgeName":"v1"}"#))]);
        assert_eq!(catalog.definition("t").unwrap().badge_name.as_deref(), Some("v1"));
        let manifest = Path::new(root.path()).join("data/badges/catalog/t/manifest.json");
        std::fs::write(manifest, r#"{"badgeName":"v2"}"#).unwrap();
        catalog.refresh();
        assert_eq!(catalog.definition("t").unwrap().badge_name.as_deref(), Some("v2"));
    }
}
