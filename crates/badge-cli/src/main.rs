//! # badge CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use badge_cli::catalog::{run_list, ListArgs};
use badge_cli::identity::{run_user_id, UserIdArgs};
use badge_cli::issue::{run_issue, IssueArgs};

/// Badge issuer CLI
///
/// Lists the badge catalog, issues badges offline into the local assertion
/// store, and derives recipient identifiers.
#[derive(Parser, Debug)]
#[command(name = "badge", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Application root containing `data/`. Without it, `BADGE_APP_ROOT`
    /// applies unless `--config` is given.
    #[arg(long, global = true)]
    app_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the badges this issuer can award.
    List(ListArgs),

    /// Issue a badge and write its assertion.
    Issue(IssueArgs),

    /// Print the recipient identifier for an email address.
    UserId(UserIdArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::UserId(args) => run_user_id(&args),
        command => badge_cli::resolve_config(cli.config.as_deref(), cli.app_root).and_then(
            |config| {
                tracing::debug!(app_root = %config.app_root.display(), "resolved configuration");
                match command {
                    Commands::List(args) => run_list(&args, &config),
                    Commands::Issue(args) => run_issue(&args, &config),
                    Commands::UserId(args) => run_user_id(&args),
                }
            },
        ),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
