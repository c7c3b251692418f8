//! # Issuance Pipeline
//!
//! One call to [`Issuer::issue`] runs the whole issue sequence for a claim:
//!
//! ```text
//! email? → badge? → available? → proof valid? → user id → issued id
//!        → create instance → build assertion → save → assertion URL
//! ```
//!
//! The first failing stage ends the run and is reported as an
//! [`IssueError`] whose [`debug_message`](IssueError::debug_message) is the
//! text shown to clients when debug mode is on.

use std::sync::Arc;

use badge_catalog::{BadgeCatalog, CatalogError, InstanceOptions, ProofValidator};
use badge_core::{create_issued_id, email_to_user_id, ErrorKind, IssuedId, UrlContext, UserId};
use thiserror::Error;

use crate::builder::AssertionBuilder;
use crate::document::AssertionDocument;
use crate::error::AssertionError;
use crate::store::AssertionStore;

/// A claim on a badge.
#[derive(Debug, Clone, Default)]
pub struct IssueRequest {
    /// Claimant email address.
    pub email: Option<String>,
    /// Identifier of the badge being claimed.
    pub badge_id: Option<String>,
    /// Proof that the claimant earned the badge.
    pub proof: Option<String>,
    /// Recipient-specific evidence URL.
    pub evidence_url: Option<String>,
}

/// A successfully issued badge.
#[derive(Debug, Clone)]
pub struct Issued {
    /// Where the assertion can be fetched.
    pub assertion_url: String,
    /// Identifier of the issued instance.
    pub issued_id: IssuedId,
    /// Recipient identifier written into the assertion.
    pub user_id: UserId,
    /// The persisted document.
    pub document: AssertionDocument,
}

/// The stage at which issuance stopped.
#[derive(Error, Debug)]
pub enum IssueError {
    #[error("missing email")]
    MissingEmail,
    #[error("missing badge id")]
    MissingBadgeId,
    #[error("badge not available: {0}")]
    UnknownBadge(String),
    #[error("invalid proof for badge {0}")]
    InvalidProof(String),
    #[error("cannot derive a recipient id from the email")]
    BadUserId,
    #[error("cannot derive an issued id")]
    BadIssuedId,
    #[error("cannot create badge instance: {0}")]
    CreateBadge(#[source] CatalogError),
    #[error("cannot build assertion: {0}")]
    CreateAssertion(#[source] AssertionError),
    #[error("cannot save assertion: {0}")]
    Save(#[source] AssertionError),
}

impl IssueError {
    /// Client-facing diagnostic for this stage.
    pub fn debug_message(&self) -> &'static str {
        match self {
            Self::MissingEmail => "Missing email!",
            Self::MissingBadgeId => "Missing badge ID!",
            Self::UnknownBadge(_) => "Bad badge ID!",
            Self::InvalidProof(_) => "Invalid proof!",
            Self::BadUserId => "Bad user ID!",
            Self::BadIssuedId => "Bad issued ID!",
            Self::CreateBadge(_) => "Cannot create badge data!",
            Self::CreateAssertion(_) => "Cannot create badge assertion!",
            Self::Save(_) => "Cannot save issued-badge data!",
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownBadge(_) => ErrorKind::NotFound,
            Self::MissingEmail
            | Self::MissingBadgeId
            | Self::InvalidProof(_)
            | Self::BadUserId
            | Self::BadIssuedId => ErrorKind::Validation,
            Self::CreateBadge(e) => e.kind(),
            Self::CreateAssertion(e) | Self::Save(e) => e.kind(),
        }
    }
}

/// Runs the issue sequence against a catalog and an assertion store.
#[derive(Clone)]
pub struct Issuer {
    catalog: Arc<BadgeCatalog>,
    validator: Arc<dyn ProofValidator>,
    store: AssertionStore,
}

impl std::fmt::Debug for Issuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Issuer")
            .field("catalog", &self.catalog)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Issuer {
    /// An issuer that validates proof with the catalog's own policies.
    pub fn new(catalog: Arc<BadgeCatalog>, store: AssertionStore) -> Self {
        let validator: Arc<dyn ProofValidator> = catalog.clone();
        Self {
            catalog,
            validator,
            store,
        }
    }

    /// Replace the proof validator.
    pub fn with_validator(mut self, validator: Arc<dyn ProofValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// The catalog badges are issued from.
    pub fn catalog(&self) -> &Arc<BadgeCatalog> {
        &self.catalog
    }

    /// The store assertions are written to.
    pub fn store(&self) -> &AssertionStore {
        &self.store
    }

    /// Issue a badge for `request`.
    ///
    /// With `qualified`, the assertion carries root-prefixed and absolute
    /// URLs and the returned assertion URL is absolute.
    pub fn issue(
        &self,
        request: &IssueRequest,
        ctx: &UrlContext,
        qualified: bool,
    ) -> Result<Issued, IssueError> {
        let email = non_empty(&request.email).ok_or(IssueError::MissingEmail)?;
        let badge_id = non_empty(&request.badge_id).ok_or(IssueError::MissingBadgeId)?;

        if !self.catalog.is_badge_available(badge_id) {
            return Err(IssueError::UnknownBadge(badge_id.to_string()));
        }

        let proof = request.proof.as_deref().unwrap_or_default();
        if !self.validator.is_valid_proof(proof, email, badge_id) {
            return Err(IssueError::InvalidProof(badge_id.to_string()));
        }

        let user_id = email_to_user_id(email).ok_or(IssueError::BadUserId)?;
        let issued_id =
            create_issued_id(badge_id, Some(&user_id)).ok_or(IssueError::BadIssuedId)?;

        let mut instance = self
            .catalog
            .create(
                badge_id,
                InstanceOptions {
                    issued_id: Some(issued_id.clone()),
                    user_id: Some(user_id.clone()),
                    issued_unix_time: None,
                    evidence_url: non_empty(&request.evidence_url).map(str::to_string),
                },
            )
            .map_err(IssueError::CreateBadge)?;

        let builder = AssertionBuilder::new(ctx);
        let document = builder
            .create_assertion_json(&mut instance, qualified)
            .map_err(IssueError::CreateAssertion)?;
        let assertion_url = self
            .store
            .save(&mut instance, &builder, qualified)
            .map_err(IssueError::Save)?;

        tracing::info!(badge = badge_id, issued_id = %issued_id, "badge issued");

        Ok(Issued {
            assertion_url,
            issued_id,
            user_id,
            document,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
