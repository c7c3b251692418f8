//! # badge-catalog: Issuable Badges
//!
//! Answers two questions for the issuer: which badges exist, and what does
//! a given badge look like.
//!
//! - **Sources** (`source.rs`): the [`BadgeSource`] trait and its two
//!   implementations. [`CodeDefinedSource`] holds badges compiled into the
//!   binary; [`TemplateSource`] resolves badges from manifest files under
//!   `data/badges/catalog/`.
//!
//! - **Manifests** (`manifest.rs`): flat field maps read from
//!   `manifest.json` or `manifest.xml`, merged over template defaults.
//!
//! - **Proof** (`proof.rs`): per-badge [`ProofPolicy`] values and the
//!   [`ProofValidator`] seam the issuance pipeline consults.
//!
//! - **Catalog** (`catalog.rs`): [`BadgeCatalog`], the registry of sources
//!   that enumerates badges and creates instances.
//!
//! ## Crate Policy
//!
//! - Depends only on `badge-core` internally.
//! - Malformed manifest data never produces a partially populated badge.

pub mod catalog;
pub mod error;
pub mod manifest;
pub mod proof;
pub mod source;

pub use catalog::{BadgeCatalog, BadgeName, InstanceOptions};
pub use error::CatalogError;
pub use manifest::{Manifest, ManifestError};
pub use proof::{ProofPolicy, ProofValidator};
pub use source::{
    example_badge, sanitize_badge_id, BadgeSource, CodeDefinedSource, TemplateSource,
    EXAMPLE_BADGE_ID, EXAMPLE_BADGE_PROOF,
};
