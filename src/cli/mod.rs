//! CLI module for the user validator
//!
//! Provides subcommands:
//! - `validate`: validate a user payload read from a file or stdin

pub mod validate;

use clap::{Parser, Subcommand};

/// User validator - checks and normalizes user payloads
#[derive(Parser)]
#[command(name = "user-validator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a JSON user payload
    Validate(validate::ValidateArgs),
}
