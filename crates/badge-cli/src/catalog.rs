//! # List Subcommand
//!
//! Prints the catalog an issuer rooted at the configured application root
//! would serve.

use std::io::Write;

use anyhow::{Context, Result};
use badge_catalog::BadgeCatalog;
use badge_core::IssuerConfig;
use clap::Args;

/// Arguments for the `badge list` subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print full badge summaries as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Execute the list subcommand, writing to stdout.
pub fn run_list(args: &ListArgs, config: &IssuerConfig) -> Result<u8> {
    let stdout = std::io::stdout();
    run_list_to(args, config, &mut stdout.lock())
}

/// Execute the list subcommand against an arbitrary writer.
pub fn run_list_to(args: &ListArgs, config: &IssuerConfig, out: &mut impl Write) -> Result<u8> {
    let catalog = BadgeCatalog::new(&config.layout());

    if args.json {
        let badges = catalog.list_badges().context("failed to list badges")?;
        serde_json::to_writer_pretty(&mut *out, &badges)?;
        writeln!(out)?;
        return Ok(0);
    }

    let names = catalog.list_badge_names().context("failed to list badges")?;
    let width = names
        .iter()
        .map(|n| n.badge_id.as_str().len())
        .max()
        .unwrap_or(0);
    for entry in &names {
        writeln!(
            out,
            "{:<width$}  {}",
            entry.badge_id.as_str(),
            entry.badge_name.as_deref().unwrap_or("-"),
        )?;
    }
    tracing::debug!(count = names.len(), "listed catalog");
    Ok(0)
}
