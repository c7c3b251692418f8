//! # Issue Subcommand
//!
//! Runs the same issue sequence as the HTTP endpoint against the local
//! application root and prints where the assertion was written.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use badge_assertion::{AssertionStore, IssueRequest, Issuer};
use badge_catalog::BadgeCatalog;
use badge_core::{IssuerConfig, UrlContext};
use clap::Args;
use url::Url;

/// Origin used when neither `--origin` nor a configured public origin is set.
pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// Arguments for the `badge issue` subcommand.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Recipient email address.
    #[arg(long)]
    pub email: String,

    /// Badge identifier.
    #[arg(long)]
    pub badge: String,

    /// Proof that the recipient earned the badge.
    #[arg(long, default_value = "")]
    pub proof: String,

    /// Recipient-specific evidence URL.
    #[arg(long)]
    pub evidence: Option<String>,

    /// Public origin the assertion will be served from (e.g. https://badges.example.org).
    #[arg(long)]
    pub origin: Option<String>,

    /// Write root-prefixed, absolute URLs and print an absolute assertion URL.
    #[arg(long)]
    pub absolute: bool,
}

/// Execute the issue subcommand, writing to stdout.
pub fn run_issue(args: &IssueArgs, config: &IssuerConfig) -> Result<u8> {
    let stdout = std::io::stdout();
    run_issue_to(args, config, &mut stdout.lock())
}

/// Execute the issue subcommand against an arbitrary writer.
///
/// A rejected claim prints the failed stage and exits with status 1.
pub fn run_issue_to(args: &IssueArgs, config: &IssuerConfig, out: &mut impl Write) -> Result<u8> {
    let ctx = url_context(args, config)?;
    let layout = config.layout();
    let catalog = Arc::new(BadgeCatalog::new(&layout));
    let issuer = Issuer::new(catalog, AssertionStore::from_layout(&layout));

    let request = IssueRequest {
        email: Some(args.email.clone()),
        badge_id: Some(args.badge.clone()),
        proof: Some(args.proof.clone()),
        evidence_url: args.evidence.clone(),
    };

    match issuer.issue(&request, &ctx, args.absolute) {
        Ok(issued) => {
            writeln!(out, "OK: issued {} to {}", issued.issued_id, issued.user_id)?;
            writeln!(out, "{}", issued.assertion_url)?;
            Ok(0)
        }
        Err(e) => {
            tracing::debug!(error = %e, "issue failed");
            writeln!(out, "FAILED: {}", e.debug_message())?;
            Ok(1)
        }
    }
}

fn url_context(args: &IssueArgs, config: &IssuerConfig) -> Result<UrlContext> {
    let prefix = &config.root_prefix;
    if let Some(origin) = &args.origin {
        let url: Url = origin
            .parse()
            .with_context(|| format!("invalid --origin: {origin}"))?;
        return Ok(UrlContext::from_url(&url, prefix)?);
    }
    match &config.public_origin {
        Some(url) => Ok(UrlContext::from_url(url, prefix)?),
        None => Ok(UrlContext::new(DEFAULT_ORIGIN, prefix)),
    }
}
