//! # Proof Policies
//!
//! Whether a claimant may receive a badge is decided per badge by a
//! [`ProofPolicy`] value. The issuance pipeline only sees the
//! [`ProofValidator`] trait, so a deployment can plug in a different check
//! without touching the pipeline.
//!
//! The built-in policies are placeholders: a shared token compared for
//! equality, or no check at all.

use subtle::ConstantTimeEq;

/// Admission rule for one badge.
#[derive(Clone, PartialEq, Eq)]
pub enum ProofPolicy {
    /// The claimant must present exactly this token.
    Token(String),
    /// Any proof is accepted, including an empty one.
    Open,
}

impl ProofPolicy {
    /// `Token` whenever a token is configured, even an empty one; `Open`
    /// only when there is none.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) => Self::Token(t.to_string()),
            None => Self::Open,
        }
    }

    /// Whether `proof` satisfies this policy.
    pub fn admits(&self, proof: &str) -> bool {
        match self {
            Self::Token(expected) => constant_time_eq(proof, expected),
            Self::Open => true,
        }
    }
}

impl std::fmt::Debug for ProofPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token([REDACTED])"),
            Self::Open => f.write_str("Open"),
        }
    }
}

/// Decides whether a claim on a badge is admissible.
pub trait ProofValidator: Send + Sync {
    /// Returns `true` when `proof` entitles `email` to `badge_id`.
    ///
    /// Unknown badges and policies that cannot be loaded must yield `false`.
    fn is_valid_proof(&self, proof: &str, email: &str, badge_id: &str) -> bool;
}

fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}
