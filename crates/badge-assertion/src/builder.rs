//! # Assertion Builder
//!
//! Completes a [`BadgeInstance`] and renders its [`AssertionDocument`].
//!
//! Building mutates the instance: unset fields receive their defaults, URLs
//! are replaced by their qualified forms and the rendered JSON is stored in
//! `assertion_json`. Qualification uses the [`UrlContext`] of the current
//! request.

use badge_core::{format_date, now_unix, BadgeInstance, UrlContext, APPLICATION_SALT};

use crate::document::{AssertionDocument, BadgeClass, IssuerInfo, ASSERTION_VERSION};
use crate::error::AssertionError;

const DEFAULT_BADGE_NAME: &str = "Default Name";
const DEFAULT_DESCRIPTION: &str = "Default Description";
const DEFAULT_ISSUER_NAME: &str = "Example Issuer";
const FALLBACK_BADGE_DIR: &str = "example";

/// Builds assertion documents for one request.
#[derive(Debug, Clone, Copy)]
pub struct AssertionBuilder<'a> {
    ctx: &'a UrlContext,
}

impl<'a> AssertionBuilder<'a> {
    /// A builder qualifying URLs against `ctx`.
    pub fn new(ctx: &'a UrlContext) -> Self {
        Self { ctx }
    }

    /// The request context used for qualification.
    pub fn context(&self) -> &'a UrlContext {
        self.ctx
    }

    /// Complete `instance` and render its assertion.
    ///
    /// With `include_root_prefix`, the image URL becomes root-relative and
    /// the criteria and evidence URLs become absolute.
    ///
    /// # Errors
    ///
    /// [`AssertionError::MissingRecipient`] when the instance has no user
    /// id; nothing on the instance changes in that case.
    pub fn create_assertion_json(
        &self,
        instance: &mut BadgeInstance,
        include_root_prefix: bool,
    ) -> Result<AssertionDocument, AssertionError> {
        let recipient = match &instance.user_id {
            Some(user) if !user.is_empty() => user.clone(),
            _ => return Err(AssertionError::MissingRecipient),
        };

        if instance.issued_unix_time == 0 {
            instance.issued_unix_time = now_unix();
        }

        let badge_dir = if instance.definition.badge_id.is_empty() {
            FALLBACK_BADGE_DIR.to_string()
        } else {
            instance.definition.badge_id.to_string()
        };

        let def = &mut instance.definition;
        fill(&mut def.badge_name, || DEFAULT_BADGE_NAME.to_string());
        fill(&mut def.description, || DEFAULT_DESCRIPTION.to_string());
        fill(&mut def.image_url, || format!("data/badges/{badge_dir}/badge.png"));
        fill(&mut def.criteria_url, || {
            format!("data/badges/{badge_dir}/criteria.html")
        });

        def.image_url = self
            .ctx
            .qualify(def.image_url.as_deref(), include_root_prefix, false);
        def.criteria_url = self.ctx.qualify(
            def.criteria_url.as_deref(),
            include_root_prefix,
            include_root_prefix,
        );
        instance.evidence_url = self.ctx.qualify(
            instance.evidence_url.as_deref(),
            include_root_prefix,
            include_root_prefix,
        );

        fill(&mut def.issuer_origin_url, || self.ctx.origin().to_string());
        fill(&mut def.issuer_name, || DEFAULT_ISSUER_NAME.to_string());

        let expires = match def.expires_unix_time {
            0 => None,
            t => Some(format_date(t)?),
        };
        let issued_on = format_date(instance.issued_unix_time)?;

        let document = AssertionDocument {
            salt: recipient
                .is_salted_hash()
                .then(|| APPLICATION_SALT.to_string()),
            recipient: recipient.to_string(),
            evidence: present(&instance.evidence_url),
            expires,
            issued_on,
            badge: BadgeClass {
                version: ASSERTION_VERSION.to_string(),
                name: present(&def.badge_name).unwrap_or_default(),
                image: present(&def.image_url).unwrap_or_default(),
                description: present(&def.description).unwrap_or_default(),
                criteria: present(&def.criteria_url).unwrap_or_default(),
                issuer: IssuerInfo {
                    origin: present(&def.issuer_origin_url).unwrap_or_default(),
                    name: present(&def.issuer_name).unwrap_or_default(),
                    org: present(&def.issuer_organization),
                    contact: present(&def.issuer_email),
                },
            },
        };

        instance.assertion_json = Some(serde_json::to_string(&document)?);
        Ok(document)
    }
}

/// Replace an unset or empty value with `default()`.
fn fill(slot: &mut Option<String>, default: impl FnOnce() -> String) {
    if slot.as_deref().map_or(true, str::is_empty) {
        *slot = Some(default());
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use badge_core::{BadgeDefinition, BadgeId, IssuedId, UserId};

    use super::*;

    fn ctx() -> UrlContext {
        UrlContext::new("http://example.com", "/badge-issuer")
    }

    fn instance(badge_id: &str, user: Option<&str>) -> BadgeInstance {
        BadgeInstance::new(
            BadgeDefinition::empty(BadgeId::new(badge_id)),
            Some(IssuedId::new("0123456789abcdef0123456789abcdef")),
            user.map(UserId::new),
            Some(1_339_761_600),
            None,
        )
    }

    #[test]
    fn missing_recipient_is_a_validation_error() {
        let ctx = ctx();
        let builder = AssertionBuilder::new(&ctx);
        for user in [None, Some("")] {
            let mut inst = instance("b", user);
            let before = inst.clone();
            let err = builder.create_assertion_json(&mut inst, true).unwrap_err();
            assert!(matches!(err, AssertionError::MissingRecipient));
            assert_eq!(inst, before);
        }
    }

    #[test]
    fn defaults_fill_every_mandatory_field() {
        let ctx = ctx();
        let mut inst = instance("b", Some("sha256$abc"));
        let doc = AssertionBuilder::new(&ctx)
            .create_assertion_json(&mut inst, false)
            .unwrap();

        assert_eq!(doc.recipient, "sha256$abc");
        assert_eq!(doc.salt.as_deref(), Some("projectwhitecard"));
        assert_eq!(doc.issued_on, "2012-06-15");
        assert_eq!(doc.expires, None);
        assert_eq!(doc.evidence, None);
        assert_eq!(doc.badge.version, "0.5.0");
        assert_eq!(doc.badge.name, "Default Name");
        assert_eq!(doc.badge.description, "Default Description");
        assert_eq!(doc.badge.image, "data/badges/b/badge.png");
        assert_eq!(doc.badge.criteria, "data/badges/b/criteria.html");
        assert_eq!(doc.badge.issuer.origin, "http://example.com");
        assert_eq!(doc.badge.issuer.name, "Example Issuer");

        let stored: AssertionDocument =
            serde_json::from_str(inst.assertion_json.as_deref().unwrap()).unwrap();
        assert_eq!(stored, doc);
    }

    #[test]
    fn empty_badge_id_falls_back_to_example_assets() {
        let ctx = ctx();
        let mut inst = instance("", Some("u"));
        let doc = AssertionBuilder::new(&ctx)
            .create_assertion_json(&mut inst, false)
            .unwrap();
        assert_eq!(doc.badge.image, "data/badges/example/badge.png");
        assert_eq!(doc.badge.criteria, "data/badges/example/criteria.html");
    }

    #[test]
    fn plain_recipient_has_no_salt() {
        let ctx = ctx();
        let mut inst = instance("b", Some("someone@example.com"));
        let doc = AssertionBuilder::new(&ctx)
            .create_assertion_json(&mut inst, false)
            .unwrap();
        assert_eq!(doc.salt, None);
    }

    #[test]
    fn root_prefix_qualification() {
        let ctx = ctx();
        let mut inst = instance("b", Some("sha256$abc"));
        inst.evidence_url = Some("evidence/42.html".into());
        inst.definition.expires_unix_time = 1_583_020_799;
        inst.definition.issuer_organization = Some("Org".into());
        inst.definition.issuer_email = Some(String::new());

        let doc = AssertionBuilder::new(&ctx)
            .create_assertion_json(&mut inst, true)
            .unwrap();
        assert_eq!(doc.badge.image, "/badge-issuer/data/badges/b/badge.png");
        assert_eq!(
            doc.badge.criteria,
            "http://example.com/badge-issuer/data/badges/b/criteria.html"
        );
        assert_eq!(
            doc.evidence.as_deref(),
            Some("http://example.com/badge-issuer/evidence/42.html")
        );
        assert_eq!(doc.expires.as_deref(), Some("2020-02-29"));
        assert_eq!(doc.badge.issuer.org.as_deref(), Some("Org"));
        assert_eq!(doc.badge.issuer.contact, None);
    }

    #[test]
    fn explicit_values_are_kept() {
        let ctx = ctx();
        let mut inst = instance("b", Some("sha256$abc"));
        inst.definition.badge_name = Some("Named".into());
        inst.definition.image_url = Some("https://cdn.example.org/b.png".into());
        inst.definition.issuer_origin_url = Some("https://academy.example".into());

        let doc = AssertionBuilder::new(&ctx)
            .create_assertion_json(&mut inst, true)
            .unwrap();
        assert_eq!(doc.badge.name, "Named");
        assert_eq!(doc.badge.image, "https://cdn.example.org/b.png");
        assert_eq!(doc.badge.issuer.origin, "https://academy.example");
    }
}
