//! # badge-cli: CLI Tool for the Badge Issuer
//!
//! Provides the `badge` command-line interface for operators: inspect the
//! catalog an issuer would serve, issue a badge without going through HTTP,
//! and derive the recipient identifier for an email address.
//!
//! ## Subcommands
//!
//! - `badge list`: Catalog listing, as a table or JSON.
//! - `badge issue`: Run the full issue sequence and write the assertion.
//! - `badge user-id`: Print the salted recipient hash of an email.
//!
//! ```bash
//! badge --app-root /srv/issuer list --json
//! badge issue --email somebody@example.com --badge rust-reviewer --proof lgtm --absolute
//! badge user-id Somebody@Example.com --algorithm sha512
//! ```

pub mod catalog;
pub mod identity;
pub mod issue;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use badge_core::IssuerConfig;

/// Build the issuer configuration for a CLI run.
///
/// A YAML file, when given, replaces the environment as the base, so
/// `BADGE_*` variables are ignored; an explicit `--app-root` wins over both.
pub fn resolve_config(config_file: Option<&Path>, app_root: Option<PathBuf>) -> Result<IssuerConfig> {
    let mut config = match config_file {
        Some(path) => IssuerConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => IssuerConfig::from_env().context("invalid issuer environment")?,
    };
    if let Some(root) = app_root {
        config.app_root = root;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_root_flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("issuer.yaml");
        std::fs::write(&file, "app_root: site\nroot_prefix: /issuer\ndebug: true\n").unwrap();

        let cfg = resolve_config(Some(&file), None).unwrap();
        assert_eq!(cfg.app_root, dir.path().join("site"));
        assert_eq!(cfg.root_prefix, "/issuer");
        assert!(cfg.debug);

        let cfg = resolve_config(Some(&file), Some(PathBuf::from("/srv/other"))).unwrap();
        assert_eq!(cfg.app_root, PathBuf::from("/srv/other"));
        assert_eq!(cfg.root_prefix, "/issuer");
    }

    #[test]
    fn unreadable_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_config(Some(&dir.path().join("missing.yaml")), None).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }
}
