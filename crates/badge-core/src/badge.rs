//! # Badge Model
//!
//! - [`BadgeDefinition`]: what a badge type is. Loaded once from code or a
//!   template manifest and never mutated afterwards.
//! - [`BadgeSummary`]: the public projection of a definition shown in the
//!   catalog. Policy data such as the proof token is not part of it.
//! - [`BadgeInstance`]: one issuance of a badge to one recipient. Lives for
//!   the duration of an issue request; durability comes only from the
//!   persisted assertion document.

use serde::{Deserialize, Serialize};

use crate::identity::{create_issued_id, BadgeId, IssuedId, UserId};
use crate::temporal::now_unix;

/// Static definition of a badge type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeDefinition {
    /// Stable identifier of the badge type.
    pub badge_id: BadgeId,
    /// Human-readable name.
    pub badge_name: Option<String>,
    /// Description of the badge.
    pub description: Option<String>,
    /// URL of the badge image (PNG).
    pub image_url: Option<String>,
    /// URL describing the criteria for earning the badge.
    pub criteria_url: Option<String>,
    /// Base URL containing the issuer's domain name.
    pub issuer_origin_url: Option<String>,
    /// Human-readable name of the issuing agent.
    pub issuer_name: Option<String>,
    /// Organization on whose behalf the badge is issued.
    pub issuer_organization: Option<String>,
    /// Human-monitored contact address of the issuer.
    pub issuer_email: Option<String>,
    /// Expiry as a Unix timestamp; `0` means the badge never expires.
    pub expires_unix_time: i64,
    /// Token a claimant must present, when the badge requires one.
    pub proof_token: Option<String>,
}

impl BadgeDefinition {
    /// A definition carrying only an identifier; every other field unset.
    pub fn empty(badge_id: BadgeId) -> Self {
        Self {
            badge_id,
            badge_name: None,
            description: None,
            image_url: None,
            criteria_url: None,
            issuer_origin_url: None,
            issuer_name: None,
            issuer_organization: None,
            issuer_email: None,
            expires_unix_time: 0,
            proof_token: None,
        }
    }

    /// The public catalog projection of this definition.
    pub fn summary(&self) -> BadgeSummary {
        BadgeSummary {
            badge_id: self.badge_id.to_string(),
            badge_name: self.badge_name.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            criteria_url: self.criteria_url.clone(),
            issuer_origin_url: self.issuer_origin_url.clone(),
            issuer_name: self.issuer_name.clone(),
            issuer_organization: self.issuer_organization.clone(),
            issuer_email: self.issuer_email.clone(),
            expires_unix_time: self.expires_unix_time,
        }
    }
}

/// Public catalog projection of a badge definition.
///
/// Field names match the catalog JSON consumed by existing clients
/// (`badgeID`, `badgeName`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeSummary {
    #[serde(rename = "badgeID")]
    pub badge_id: String,
    pub badge_name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    #[serde(rename = "criteriaURL")]
    pub criteria_url: Option<String>,
    #[serde(rename = "issuerOriginURL")]
    pub issuer_origin_url: Option<String>,
    pub issuer_name: Option<String>,
    pub issuer_organization: Option<String>,
    pub issuer_email: Option<String>,
    pub expires_unix_time: i64,
}

/// One issuance of a badge to one recipient.
///
/// The assertion builder fills in derived fields (defaults, qualified URLs)
/// on `definition` and stores the rendered document in `assertion_json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeInstance {
    /// The badge fields, copied from the catalog definition.
    pub definition: BadgeDefinition,
    /// Identifier of this issued instance.
    pub issued_id: IssuedId,
    /// Recipient identifier. Required before an assertion can be built.
    pub user_id: Option<UserId>,
    /// Issue time as a Unix timestamp; `0` means "use the current time".
    pub issued_unix_time: i64,
    /// User-specific page describing how this recipient earned the badge.
    pub evidence_url: Option<String>,
    /// The serialized assertion document, once built.
    pub assertion_json: Option<String>,
}

impl BadgeInstance {
    /// Create an instance of `definition`.
    ///
    /// A missing `issued_id` is generated from the badge and recipient; a
    /// missing issue time defaults to now.
    pub fn new(
        definition: BadgeDefinition,
        issued_id: Option<IssuedId>,
        user_id: Option<UserId>,
        issued_unix_time: Option<i64>,
        evidence_url: Option<String>,
    ) -> Self {
        let issued_id = issued_id
            .or_else(|| create_issued_id(definition.badge_id.as_str(), user_id.as_ref()))
            .unwrap_or_else(|| IssuedId::new(""));
        let issued_unix_time = issued_unix_time.filter(|t| *t != 0).unwrap_or_else(now_unix);
        Self {
            definition,
            issued_id,
            user_id,
            issued_unix_time,
            evidence_url,
            assertion_json: None,
        }
    }

    /// The badge identifier of this instance.
    pub fn badge_id(&self) -> &BadgeId {
        &self.definition.badge_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> BadgeDefinition {
        BadgeDefinition {
            badge_name: Some("Example Badge".into()),
            proof_token: Some("secret".into()),
            ..BadgeDefinition::empty(BadgeId::new("abc"))
        }
    }

    #[test]
    fn summary_uses_catalog_field_names_and_hides_proof() {
        let json = serde_json::to_value(definition().summary()).unwrap();
        assert_eq!(json["badgeID"], "abc");
        assert_eq!(json["badgeName"], "Example Badge");
        assert!(json.get("imageURL").is_some());
        assert!(json.get("issuerOriginURL").is_some());
        assert_eq!(json["expiresUnixTime"], 0);
        assert!(json.get("proofToken").is_none());
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn instance_generates_id_and_time() {
        let inst = BadgeInstance::new(definition(), None, None, None, None);
        assert!(inst.issued_id.is_well_formed());
        assert!(inst.issued_unix_time > 0);
        assert!(inst.assertion_json.is_none());
    }

    #[test]
    fn instance_keeps_supplied_values() {
        let inst = BadgeInstance::new(
            definition(),
            Some(IssuedId::new("0123456789abcdef0123456789abcdef")),
            Some(UserId::new("sha256$00")),
            Some(1_339_761_600),
            Some("evidence/1.html".into()),
        );
        assert_eq!(inst.issued_id.as_str(), "0123456789abcdef0123456789abcdef");
        assert_eq!(inst.issued_unix_time, 1_339_761_600);
        assert_eq!(inst.evidence_url.as_deref(), Some("evidence/1.html"));
        assert_eq!(inst.badge_id().as_str(), "abc");
    }
}
