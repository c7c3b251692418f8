//! # badge-assertion: Assertion Documents and Issuance
//!
//! Turns a [`BadgeInstance`](badge_core::BadgeInstance) into the JSON
//! assertion document that badge viewers fetch, writes it to disk, and runs
//! the full issue sequence.
//!
//! - **Document** (`document.rs`): [`AssertionDocument`], the serialized
//!   shape of an assertion.
//! - **Builder** (`builder.rs`): [`AssertionBuilder`] fills defaults,
//!   qualifies URLs for the current request and renders the document.
//! - **Store** (`store.rs`): [`AssertionStore`] persists documents under
//!   `data/assertions/<issuedID>.json`.
//! - **Issuance** (`issuance.rs`): [`Issuer`] chains availability, proof,
//!   identity, creation, building and persistence, stopping at the first
//!   failure.
//!
//! ## Crate Policy
//!
//! - A document is written only after it has been fully built.
//! - No reader ever observes a partially written document.

pub mod builder;
pub mod document;
pub mod error;
pub mod issuance;
pub mod store;

pub use builder::AssertionBuilder;
pub use document::{AssertionDocument, BadgeClass, IssuerInfo, ASSERTION_VERSION};
pub use error::AssertionError;
pub use issuance::{IssueError, IssueRequest, Issued, Issuer};
pub use store::AssertionStore;
