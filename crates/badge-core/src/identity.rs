//! # Identity Derivation
//!
//! Newtype wrappers for the three identifier namespaces of the issuer, and
//! the two derivations that produce them:
//!
//! - [`email_to_user_id`] turns a claimant email into a recipient
//!   identifier of the form `<algorithm>$<hex digest>`. The digest covers
//!   the normalized email followed by [`APPLICATION_SALT`].
//! - [`create_issued_id`] produces a 32-hex-character identifier for one
//!   issued badge instance. It doubles as the assertion file name.
//!
//! ## Weak Salt
//!
//! The recipient hash uses one process-wide salt for every recipient, which
//! leaves identifiers open to dictionary attacks on common addresses. The
//! salt is kept because it is published in every assertion (`salt` field)
//! and existing verifiers recompute the hash from it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::digest::HashAlgorithm;

/// Salt appended to the normalized email before hashing.
pub const APPLICATION_SALT: &str = "projectwhitecard";

/// Separator between the algorithm name and the digest in a [`UserId`].
pub const USER_ID_SEPARATOR: char = '$';

/// Identifier of a badge type (a template on which instances are based).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeId(String);

/// Identifier of a badge recipient, typically a salted email hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of one issued badge instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuedId(String);

impl BadgeId {
    /// Wrap a badge identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty identifier.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl UserId {
    /// Wrap an already-derived recipient identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty identifier.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this identifier was produced by the salted hash scheme.
    ///
    /// Signalled by the `$` separator, e.g. `sha256$2ad891a6...`.
    pub fn is_salted_hash(&self) -> bool {
        self.0.contains(USER_ID_SEPARATOR)
    }
}

impl IssuedId {
    /// Length of a generated identifier in hex characters.
    pub const LEN: usize = 32;

    /// Wrap an issued-instance identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifier has the generated shape (32 lowercase hex).
    ///
    /// Only such identifiers are safe to use as file names.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == Self::LEN
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }
}

impl std::fmt::Display for BadgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for IssuedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BadgeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Convert an email address to a recipient identifier using SHA-256.
///
/// Returns `None` when the email is absent or blank after trimming.
pub fn email_to_user_id<'a>(email: impl Into<Option<&'a str>>) -> Option<UserId> {
    email_to_user_id_with(email, HashAlgorithm::Sha256)
}

/// Convert an email address to a recipient identifier with the given hash.
///
/// The email is trimmed and lowercased, so `" Someone@Example.com "` and
/// `"someone@example.com"` map to the same identifier.
pub fn email_to_user_id_with<'a>(
    email: impl Into<Option<&'a str>>,
    algorithm: HashAlgorithm,
) -> Option<UserId> {
    let normalized = email.into()?.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    let digest = algorithm.hex_digest(format!("{normalized}{APPLICATION_SALT}").as_bytes());
    Some(UserId(format!(
        "{}{USER_ID_SEPARATOR}{digest}",
        algorithm.as_str()
    )))
}

static ISSUE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate an identifier for a new badge instance.
///
/// The seed `badge_id[@user_id]` is combined with a nonce built from the
/// process id, the current time, a process-wide counter and random bits,
/// then reduced through MD5. MD5 only provides a fixed-length opaque token
/// here; nothing relies on it for security.
///
/// Returns `None` when `badge_id` is empty.
pub fn create_issued_id(badge_id: &str, user_id: Option<&UserId>) -> Option<IssuedId> {
    if badge_id.is_empty() {
        return None;
    }

    let mut seed = badge_id.to_string();
    if let Some(user) = user_id.filter(|u| !u.is_empty()) {
        seed.push('@');
        seed.push_str(user.as_str());
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let counter = ISSUE_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nonce = format!(
        "{:08x}{:05x}.{:x}.{:x}.{:016x}",
        now.as_secs(),
        now.subsec_micros(),
        std::process::id(),
        counter,
        rand::random::<u64>()
    );

    let digest = md5::compute(format!("{seed}{nonce}").as_bytes());
    Some(IssuedId(format!("{digest:x}")))
}
