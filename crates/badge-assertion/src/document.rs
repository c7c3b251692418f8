//! # Assertion Document
//!
//! The JSON published for one issued badge. Field order in the serialized
//! output follows declaration order:
//!
//! ```json
//! {
//!   "recipient": "sha256$2ad891a6...",
//!   "salt": "projectwhitecard",
//!   "evidence": "https://example.com/evidence/42.html",
//!   "expires": "2030-01-01",
//!   "issued_on": "2012-06-15",
//!   "badge": {
//!     "version": "0.5.0",
//!     "name": "Example Badge",
//!     "image": "/data/badges/example/badge.png",
//!     "description": "Interacted with a badge example.",
//!     "criteria": "https://example.com/data/badges/example/criteria.html",
//!     "issuer": { "origin": "https://example.com", "name": "Example Academy" }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Version of the assertion format written by this issuer.
pub const ASSERTION_VERSION: &str = "0.5.0";

/// One badge assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionDocument {
    /// Recipient identifier, usually a salted email hash.
    pub recipient: String,
    /// Salt used for `recipient`; present only for hashed recipients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    /// Recipient-specific evidence URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    /// Expiry date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    /// Issue date, `YYYY-MM-DD`.
    pub issued_on: String,
    /// The badge being asserted.
    pub badge: BadgeClass,
}

/// The badge section of an assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeClass {
    pub version: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub criteria: String,
    pub issuer: IssuerInfo,
}

/// The issuer section of an assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerInfo {
    pub origin: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> AssertionDocument {
        AssertionDocument {
            recipient: "sha256$00".into(),
            salt: Some("projectwhitecard".into()),
            evidence: None,
            expires: None,
            issued_on: "2012-06-15".into(),
            badge: BadgeClass {
                version: ASSERTION_VERSION.into(),
                name: "N".into(),
                image: "i.png".into(),
                description: "D".into(),
                criteria: "c.html".into(),
                issuer: IssuerInfo {
                    origin: "http://example.com".into(),
                    name: "I".into(),
                    org: None,
                    contact: Some("ops@example.com".into()),
                },
            },
        }
    }

    #[test]
    fn serialized_field_order_is_stable() {
        let json = serde_json::to_string(&doc()).unwrap();
        let order = [
            "\"recipient\"",
            "\"salt\"",
            "\"issued_on\"",
            "\"badge\"",
            "\"version\"",
            "\"name\"",
            "\"image\"",
            "\"description\"",
            "\"criteria\"",
            "\"issuer\"",
            "\"origin\"",
            "\"contact\"",
        ];
        let positions: Vec<usize> = order.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let json = serde_json::to_value(doc()).unwrap();
        assert!(json.get("evidence").is_none());
        assert!(json.get("expires").is_none());
        assert!(json["badge"]["issuer"].get("org").is_none());
        assert_eq!(json["badge"]["issuer"]["contact"], "ops@example.com");
    }
}
