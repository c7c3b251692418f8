//! # User-Id Subcommand
//!
//! Prints the recipient identifier an assertion would carry for an email.

use std::io::Write;

use anyhow::{bail, Result};
use badge_core::{email_to_user_id_with, HashAlgorithm};
use clap::Args;

/// Arguments for the `badge user-id` subcommand.
#[derive(Args, Debug)]
pub struct UserIdArgs {
    /// Email address to hash.
    #[arg(value_name = "EMAIL")]
    pub email: String,

    /// Hash algorithm: sha256, sha384, or sha512.
    #[arg(long, default_value = "sha256")]
    pub algorithm: HashAlgorithm,
}

/// Execute the user-id subcommand, writing to stdout.
pub fn run_user_id(args: &UserIdArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    run_user_id_to(args, &mut stdout.lock())
}

/// Execute the user-id subcommand against an arbitrary writer.
pub fn run_user_id_to(args: &UserIdArgs, out: &mut impl Write) -> Result<u8> {
    let Some(user_id) = email_to_user_id_with(args.email.as_str(), args.algorithm) else {
        bail!("email is empty");
    };
    writeln!(out, "{user_id}")?;
    Ok(0)
}
