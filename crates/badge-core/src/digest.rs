//! # Hash Algorithms
//!
//! The named one-way hash functions that may produce a recipient
//! identifier. The algorithm name is embedded in the identifier itself
//! (`sha256$<hex>`), so the names here are part of the persisted format.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::BadgeError;

/// A one-way hash function usable for recipient identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256, the default.
    #[default]
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl HashAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Hash `data` and return the lowercase hex digest.
    pub fn hex_digest(&self, data: &[u8]) -> String {
        match self {
            Self::Sha256 => to_hex(&Sha256::digest(data)),
            Self::Sha384 => to_hex(&Sha384::digest(data)),
            Self::Sha512 => to_hex(&Sha512::digest(data)),
        }
    }

    /// Length in hex characters of a digest produced by this algorithm.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = BadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            other => Err(BadgeError::Validation(format!(
                "unsupported hash algorithm: {other:?}"
            ))),
        }
    }
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        // SHA256(""): NIST test vector.
        assert_eq!(
            HashAlgorithm::Sha256.hex_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_lengths_match_algorithm() {
        for alg in [
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
        ] {
            assert_eq!(alg.hex_digest(b"abc").len(), alg.hex_len());
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("SHA512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha512);
        assert_eq!("".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert!("md4".parse::<HashAlgorithm>().is_err());
    }
}
