//! # badge-core: Foundational Types for the Badge Issuer
//!
//! Every other crate in the workspace depends on `badge-core`; it depends on
//! nothing internal.
//!
//! ## Contents
//!
//! - **Badge model** ([`BadgeDefinition`], [`BadgeSummary`], [`BadgeInstance`]):
//!   what a badge is, its public catalog projection, and one issuance of it.
//!
//! - **Identity** ([`email_to_user_id`], [`create_issued_id`]): the salted
//!   recipient hash and the opaque per-issuance identifier.
//!
//! - **URL qualification** ([`UrlContext`]): turns application-relative paths
//!   into root-relative or absolute URLs for one request.
//!
//! - **Configuration** ([`IssuerConfig`], [`DataLayout`]): where badge
//!   templates and assertions live on disk and how the service is reached.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `badge-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod badge;
pub mod config;
pub mod digest;
pub mod error;
pub mod identity;
pub mod layout;
pub mod qualify;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use badge::{BadgeDefinition, BadgeInstance, BadgeSummary};
pub use config::{ConfigError, IssuerConfig};
pub use digest::HashAlgorithm;
pub use error::{BadgeError, ErrorKind};
pub use identity::{
    create_issued_id, email_to_user_id, email_to_user_id_with, BadgeId, IssuedId, UserId,
    APPLICATION_SALT, USER_ID_SEPARATOR,
};
pub use layout::DataLayout;
pub use qualify::UrlContext;
pub use temporal::{format_date, now_unix};
