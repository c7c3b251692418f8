//! # Template Manifests
//!
//! A template badge is described by one manifest file in its directory:
//! `manifest.json` when present, otherwise `manifest.xml`. Both formats
//! reduce to the same flat field → value map.
//!
//! ```json
//! { "badgeName": "Rust Reviewer", "proof": "s3cret", "expiresUnixTime": 0 }
//! ```
//!
//! ```xml
//! <manifest>
//!   <badgeName>Rust Reviewer</badgeName>
//!   <proof>s3cret</proof>
//! </manifest>
//! ```
//!
//! ## Format rules
//!
//! - JSON must be UTF-8 without a byte-order mark and must be an object
//!   whose values are strings, numbers or booleans. `null` means absent;
//!   arrays and nested objects are rejected.
//! - XML contributes one field per direct child element of the root: the
//!   element name and its text content, whitespace included. A repeated
//!   element keeps its last value.
//! - Empty values count as unset, except a declared `proof` or `proofToken`,
//!   which then requires an empty proof.
//!
//! ## Recognized fields
//!
//! `badgeID`, `badgeName`, `description`, `imageURL`, `criteriaURL`,
//! `issuerOriginURL`, `issuerName`, `issuerOrganization`, `issuerEmail`,
//! `expiresUnixTime`, and `proof` (alias `proofToken`). Other fields are
//! kept in the map but ignored by [`Manifest::apply_to`].

use std::collections::BTreeMap;
use std::path::Path;

use badge_core::{BadgeDefinition, BadgeId};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;
use thiserror::Error;

use crate::error::CatalogError;

/// File name of a JSON manifest inside a template directory.
pub const JSON_FILE: &str = "manifest.json";

/// File name of an XML manifest inside a template directory.
pub const XML_FILE: &str = "manifest.xml";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reasons a manifest file is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest starts with a UTF-8 byte-order mark")]
    Bom,
    #[error("manifest is not valid UTF-8")]
    NotUtf8,
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("manifest root must be a JSON object")]
    NotAnObject,
    #[error("field {0:?} must be a string, number or boolean")]
    NonScalar(String),
    #[error("invalid XML: {0}")]
    Xml(String),
    #[error("expiresUnixTime is not an integer: {0:?}")]
    InvalidExpiry(String),
}

/// Flat field map loaded from a template manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    fields: BTreeMap<String, String>,
}

impl Manifest {
    /// Load the manifest from a template directory.
    ///
    /// # Errors
    ///
    /// [`CatalogError::ManifestMissing`] when neither file exists,
    /// [`CatalogError::Manifest`] when the chosen file is malformed.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        for (file, parse) in [
            (JSON_FILE, Self::from_json_bytes as fn(&[u8]) -> Result<Self, ManifestError>),
            (XML_FILE, Self::from_xml_bytes),
        ] {
            let path = dir.join(file);
            match std::fs::read(&path) {
                Ok(bytes) => {
                    tracing::debug!(path = %path.display(), "loading badge manifest");
                    return parse(&bytes).map_err(|source| CatalogError::Manifest { path, source });
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => return Err(CatalogError::Io { path, source }),
            }
        }
        Err(CatalogError::ManifestMissing(dir.to_path_buf()))
    }

    /// Parse a JSON manifest.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, ManifestError> {
        if bytes.starts_with(UTF8_BOM) {
            return Err(ManifestError::Bom);
        }
        let text = std::str::from_utf8(bytes).map_err(|_| ManifestError::NotUtf8)?;
        let value: Value =
            serde_json::from_str(text).map_err(|e| ManifestError::Json(e.to_string()))?;
        let Value::Object(object) = value else {
            return Err(ManifestError::NotAnObject);
        };

        let mut fields = BTreeMap::new();
        for (key, value) in object {
            let scalar = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => return Err(ManifestError::NonScalar(key)),
            };
            fields.insert(key, scalar);
        }
        Ok(Self { fields })
    }

    /// Parse an XML manifest.
    pub fn from_xml_bytes(bytes: &[u8]) -> Result<Self, ManifestError> {
        if bytes.starts_with(UTF8_BOM) {
            return Err(ManifestError::Bom);
        }
        let text = std::str::from_utf8(bytes).map_err(|_| ManifestError::NotUtf8)?;
        let xml_err = |e: quick_xml::Error| ManifestError::Xml(e.to_string());

        let mut reader = Reader::from_str(text);

        let mut fields = BTreeMap::new();
        let mut depth = 0usize;
        let mut seen_root = false;
        let mut current: Option<(String, String)> = None;

        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Start(e) => {
                    if depth == 0 {
                        if seen_root {
                            return Err(ManifestError::Xml("multiple root elements".into()));
                        }
                        seen_root = true;
                    } else if depth == 1 {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        current = Some((name, String::new()));
                    }
                    depth += 1;
                }
                Event::Empty(e) => {
                    if depth == 0 {
                        if seen_root {
                            return Err(ManifestError::Xml("multiple root elements".into()));
                        }
                        seen_root = true;
                    } else if depth == 1 {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        fields.insert(name, String::new());
                    }
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 1 {
                        if let Some((name, value)) = current.take() {
                            fields.insert(name, value);
                        }
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(xml_err)?;
                    match current.as_mut() {
                        Some((_, value)) => value.push_str(&text),
                        None if depth == 0 && !text.trim().is_empty() => {
                            return Err(ManifestError::Xml("text outside the root element".into()));
                        }
                        None => {}
                    }
                }
                Event::CData(c) => {
                    if let Some((_, value)) = current.as_mut() {
                        let text = std::str::from_utf8(&c).map_err(|_| ManifestError::NotUtf8)?;
                        value.push_str(text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(ManifestError::Xml("no root element".into()));
        }
        if depth != 0 {
            return Err(ManifestError::Xml("unclosed element at end of input".into()));
        }
        Ok(Self { fields })
    }

    /// The value of `field`, when present and non-empty.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The value of `field` as declared, empty or not.
    pub fn raw(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// The proof token, from `proof` or its alias `proofToken`.
    ///
    /// A declared empty token is returned as `Some("")`; only a missing (or
    /// JSON `null`) field means no token.
    pub fn proof_token(&self) -> Option<&str> {
        self.raw("proof").or_else(|| self.raw("proofToken"))
    }

    /// Number of fields, including empty ones.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the manifest has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Merge this manifest over `defaults`.
    ///
    /// Every recognized, non-empty field replaces the default, `badgeID`
    /// included.
    pub fn apply_to(&self, defaults: BadgeDefinition) -> Result<BadgeDefinition, ManifestError> {
        let mut def = defaults;

        if let Some(id) = self.get("badgeID") {
            def.badge_id = BadgeId::new(id);
        }
        for (field, slot) in [
            ("badgeName", &mut def.badge_name),
            ("description", &mut def.description),
            ("imageURL", &mut def.image_url),
            ("criteriaURL", &mut def.criteria_url),
            ("issuerOriginURL", &mut def.issuer_origin_url),
            ("issuerName", &mut def.issuer_name),
            ("issuerOrganization", &mut def.issuer_organization),
            ("issuerEmail", &mut def.issuer_email),
        ] {
            if let Some(value) = self.get(field) {
                *slot = Some(value.to_string());
            }
        }
        if let Some(raw) = self.get("expiresUnixTime") {
            def.expires_unix_time = raw
                .trim()
                .parse()
                .map_err(|_| ManifestError::InvalidExpiry(raw.to_string()))?;
        }
        if let Some(token) = self.proof_token() {
            def.proof_token = Some(token.to_string());
        }

        Ok(def)
    }
}
