//! # Assertion Store
//!
//! Issued assertions are plain JSON files named after their issued id:
//! `<app_root>/data/assertions/<issuedID>.json`. Badge viewers fetch them by
//! URL, so the relative path doubles as the public location.
//!
//! ## Write protocol
//!
//! A document is written to a hidden temporary file in the same directory
//! and hard-linked into place, so readers see either nothing or the complete
//! document. Linking fails when the target exists: a stored assertion is
//! never replaced, and a second save under the same issued id is an error.
//! Issued ids are unique, so writers never contend for a name and no lock
//! is taken.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use badge_core::layout::ASSERTIONS_RELATIVE_DIR;
use badge_core::{BadgeInstance, DataLayout, IssuedId};

use crate::builder::AssertionBuilder;
use crate::error::AssertionError;

/// Filesystem store for issued assertions.
#[derive(Debug, Clone)]
pub struct AssertionStore {
    dir: PathBuf,
}

impl AssertionStore {
    /// A store writing into `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store for an application layout.
    pub fn from_layout(layout: &DataLayout) -> Self {
        Self::new(layout.assertions_dir())
    }

    /// The directory holding assertion files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Application-relative URL of the assertion for `issued_id`.
    pub fn relative_url(issued_id: &IssuedId) -> String {
        format!("{ASSERTIONS_RELATIVE_DIR}/{issued_id}.json")
    }

    fn path_for(&self, issued_id: &IssuedId) -> Result<PathBuf, AssertionError> {
        if !issued_id.is_well_formed() {
            return Err(AssertionError::InvalidIssuedId(issued_id.to_string()));
        }
        Ok(self.dir.join(format!("{issued_id}.json")))
    }

    /// Persist the assertion of `instance` and return its URL.
    ///
    /// The document is built first when the instance has none yet, passing
    /// `include_absolute_url` as the root-prefix flag. The returned URL is
    /// `data/assertions/<issuedID>.json`, or its absolute form when
    /// `include_absolute_url` is set.
    pub fn save(
        &self,
        instance: &mut BadgeInstance,
        builder: &AssertionBuilder<'_>,
        include_absolute_url: bool,
    ) -> Result<String, AssertionError> {
        let json = match instance.assertion_json.clone().filter(|j| !j.is_empty()) {
            Some(json) => json,
            None => {
                let document = builder.create_assertion_json(instance, include_absolute_url)?;
                serde_json::to_string(&document)?
            }
        };

        let path = self.path_for(&instance.issued_id)?;
        self.write_atomically(&path, json.as_bytes())?;
        tracing::info!(
            badge = %instance.definition.badge_id,
            issued_id = %instance.issued_id,
            "assertion saved"
        );

        let relative = Self::relative_url(&instance.issued_id);
        Ok(if include_absolute_url {
            builder.context().qualify_str(&relative, true, true)
        } else {
            relative
        })
    }

    /// The stored bytes of an assertion, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// [`AssertionError::InvalidIssuedId`] for identifiers that are not 32
    /// lowercase hex characters.
    pub fn load(&self, issued_id: &IssuedId) -> Result<Option<Vec<u8>>, AssertionError> {
        let path = self.path_for(issued_id)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(AssertionError::Io { path, source }),
        }
    }

    fn write_atomically(&self, path: &Path, bytes: &[u8]) -> Result<(), AssertionError> {
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = self.dir.join(format!(".{file_name}.tmp"));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)
            .map_err(io_err(&tmp))?;
        let published = file
            .write_all(bytes)
            .and_then(|()| file.sync_all())
            .and_then(|()| fs::hard_link(&tmp, path));
        drop(file);
        let _ = fs::remove_file(&tmp);

        published.map_err(io_err(path))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> AssertionError {
    let path = path.to_path_buf();
    move |source| AssertionError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use badge_core::{BadgeDefinition, BadgeId, UrlContext, UserId};

    use super::*;

    fn instance(user: Option<&str>) -> BadgeInstance {
        BadgeInstance::new(
            BadgeDefinition::empty(BadgeId::new("b")),
            None,
            user.map(UserId::new),
            None,
            None,
        )
    }

    #[test]
    fn save_writes_document_and_returns_relative_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssertionStore::new(dir.path().join("data/assertions"));
        let ctx = UrlContext::new("http://example.com", "");
        let mut inst = instance(Some("sha256$abc"));

        let url = store
            .save(&mut inst, &AssertionBuilder::new(&ctx), false)
            .unwrap();
        assert_eq!(url, format!("data/assertions/{}.json", inst.issued_id));

        let bytes = store.load(&inst.issued_id).unwrap().unwrap();
        assert_eq!(Some(String::from_utf8(bytes).unwrap()), inst.assertion_json);

        let leftovers: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with('.'))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn absolute_url_is_fully_qualified() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssertionStore::new(dir.path());
        let ctx = UrlContext::new("https://badges.example.com", "/issuer");
        let mut inst = instance(Some("sha256$abc"));

        let url = store
            .save(&mut inst, &AssertionBuilder::new(&ctx), true)
            .unwrap();
        assert_eq!(
            url,
            format!(
                "https://badges.example.com/issuer/data/assertions/{}.json",
                inst.issued_id
            )
        );
    }

    #[test]
    fn missing_recipient_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssertionStore::new(dir.path().join("assertions"));
        let ctx = UrlContext::new("http://example.com", "");
        let mut inst = instance(None);

        let err = store
            .save(&mut inst, &AssertionBuilder::new(&ctx), false)
            .unwrap_err();
        assert!(matches!(err, AssertionError::MissingRecipient));
        assert!(!store.dir().exists());
    }

    #[test]
    fn second_save_under_same_id_keeps_first_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssertionStore::new(dir.path());
        let ctx = UrlContext::new("http://example.com", "");
        let builder = AssertionBuilder::new(&ctx);
        let id = IssuedId::new("0123456789abcdef0123456789abcdef");

        let mut first = instance(Some("sha256$first"));
        first.issued_id = id.clone();
        store.save(&mut first, &builder, false).unwrap();

        let mut second = instance(Some("sha256$second"));
        second.issued_id = id.clone();
        let err = store.save(&mut second, &builder, false).unwrap_err();
        assert!(matches!(
            err,
            AssertionError::Io { ref source, .. } if source.kind() == std::io::ErrorKind::AlreadyExists
        ));

        let stored = String::from_utf8(store.load(&id).unwrap().unwrap()).unwrap();
        assert!(stored.contains("sha256$first"));
        assert!(!stored.contains("sha256$second"));
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 1);
    }

    #[test]
    fn load_rejects_malformed_ids_and_misses_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssertionStore::new(dir.path());
        assert!(matches!(
            store.load(&IssuedId::new("../../etc/passwd")),
            Err(AssertionError::InvalidIssuedId(_))
        ));
        assert_eq!(
            store
                .load(&IssuedId::new("0123456789abcdef0123456789abcdef"))
                .unwrap(),
            None
        );
    }
}
