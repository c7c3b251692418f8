//! # Issuer Configuration
//!
//! Where the application lives on disk and how clients reach it. Loaded
//! from environment variables by the service binary, or from a YAML file
//! by the CLI.
//!
//! Variables:
//! - `BADGE_APP_ROOT` (default: `.`): directory containing `data/`.
//! - `BADGE_ROOT_PREFIX` (default: empty): path the application is mounted
//!   under, e.g. `/badge-issuer`.
//! - `BADGE_PUBLIC_ORIGIN` (optional): fixed public origin such as
//!   `https://badges.example.com`. When absent, the origin is taken from
//!   each request's `Host` header.
//! - `BADGE_DEBUG` (default: off): include debug messages in issue
//!   responses. Accepts `1`, `true`, `yes`, `on`.
//! - `PORT` (default: 8080).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::layout::DataLayout;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

/// Runtime configuration for the issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerConfig {
    /// Application root; `data/` lives directly beneath it.
    pub app_root: PathBuf,
    /// Root-relative mount path used when qualifying URLs.
    pub root_prefix: String,
    /// Fixed public origin. `None` means derive it per request.
    pub public_origin: Option<Url>,
    /// Whether issue responses carry debug text on failure.
    pub debug: bool,
    /// Port to bind the HTTP server to.
    pub port: u16,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            app_root: PathBuf::from("."),
            root_prefix: String::new(),
            public_origin: None,
            debug: false,
            port: 8080,
        }
    }
}

/// YAML file shape; every field is optional and falls back to the default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    app_root: Option<PathBuf>,
    root_prefix: Option<String>,
    public_origin: Option<String>,
    debug: Option<bool>,
    port: Option<u16>,
}

impl IssuerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".into(), raw.clone()))?,
            None => defaults.port,
        };

        let debug = match lookup("BADGE_DEBUG") {
            Some(raw) => parse_flag("BADGE_DEBUG", &raw)?,
            None => defaults.debug,
        };

        Ok(Self {
            app_root: lookup("BADGE_APP_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.app_root),
            root_prefix: lookup("BADGE_ROOT_PREFIX").unwrap_or_default(),
            public_origin: lookup("BADGE_PUBLIC_ORIGIN")
                .map(|raw| parse_origin("BADGE_PUBLIC_ORIGIN", &raw))
                .transpose()?,
            debug,
            port,
        })
    }

    /// Load configuration from a YAML file.
    ///
    /// A relative `app_root` in the file is resolved against the file's
    /// own directory.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = serde_yaml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let defaults = Self::default();
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let app_root = match file.app_root {
            Some(root) if root.is_relative() => base.join(root),
            Some(root) => root,
            None => base.to_path_buf(),
        };

        Ok(Self {
            app_root,
            root_prefix: file.root_prefix.unwrap_or(defaults.root_prefix),
            public_origin: file
                .public_origin
                .map(|raw| parse_origin("public_origin", &raw))
                .transpose()?,
            debug: file.debug.unwrap_or(defaults.debug),
            port: file.port.unwrap_or(defaults.port),
        })
    }

    /// The storage layout under [`IssuerConfig::app_root`].
    pub fn layout(&self) -> DataLayout {
        DataLayout::new(&self.app_root)
    }
}

fn parse_origin(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ConfigError::InvalidUrl(
            var.to_string(),
            format!("expected an http(s) origin, got {raw}"),
        )),
    }
}

fn parse_flag(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(var.to_string(), raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = IssuerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg, IssuerConfig::default());
    }

    #[test]
    fn environment_overrides() {
        let cfg = IssuerConfig::from_lookup(lookup_from(&[
            ("BADGE_APP_ROOT", "/srv/issuer"),
            ("BADGE_ROOT_PREFIX", "/badge-issuer"),
            ("BADGE_PUBLIC_ORIGIN", "https://badges.example.com"),
            ("BADGE_DEBUG", "yes"),
            ("PORT", "9090"),
        ]))
        .unwrap();
        assert_eq!(cfg.app_root, PathBuf::from("/srv/issuer"));
        assert_eq!(cfg.root_prefix, "/badge-issuer");
        assert_eq!(
            cfg.public_origin.as_ref().map(Url::as_str),
            Some("https://badges.example.com/")
        );
        assert!(cfg.debug);
        assert_eq!(cfg.port, 9090);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(IssuerConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
        assert!(IssuerConfig::from_lookup(lookup_from(&[("BADGE_DEBUG", "maybe")])).is_err());
        assert!(
            IssuerConfig::from_lookup(lookup_from(&[("BADGE_PUBLIC_ORIGIN", "ftp://x")]))
                .is_err()
        );
    }

    #[test]
    fn yaml_file_resolves_relative_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issuer.yaml");
        std::fs::write(
            &path,
            "app_root: site\nroot_prefix: /issuer\ndebug: true\nport: 8181\n",
        )
        .unwrap();

        let cfg = IssuerConfig::from_yaml_file(&path).unwrap();
        assert_eq!(cfg.app_root, dir.path().join("site"));
        assert_eq!(cfg.root_prefix, "/issuer");
        assert!(cfg.debug);
        assert_eq!(cfg.port, 8181);
        assert_eq!(cfg.layout().assertions_dir(), dir.path().join("site/data/assertions"));
    }

    #[test]
    fn yaml_unknown_field_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issuer.yaml");
        std::fs::write(&path, "salt: hunter2\n").unwrap();
        assert!(matches!(
            IssuerConfig::from_yaml_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = IssuerConfig::from_yaml_file(Path::new("/nonexistent/issuer.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
