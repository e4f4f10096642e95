//! Validate command - checks a single user payload

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::user::{UserValidator, ValidateJsonError};
use crate::infrastructure::logging;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON file holding the payload; reads stdin when omitted
    pub file: Option<PathBuf>,

    /// Indent JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Outcome of validating one payload, ready to print
#[derive(Debug, PartialEq)]
pub struct Report {
    pub body: String,
    pub valid: bool,
}

impl Report {
    pub fn exit_code(&self) -> ExitCode {
        if self.valid {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Run the validate command
pub fn run(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let raw = read_input(args.file.as_deref())?;
    let pretty = args.pretty || config.output.pretty;

    let report = validate_payload(&UserValidator::new(), &raw, pretty)?;
    println!("{}", report.body);

    Ok(report.exit_code())
}

/// Validate a raw payload and render the user or the error list as JSON
///
/// Malformed JSON is an error rather than a report.
pub fn validate_payload(
    validator: &UserValidator,
    raw: &str,
    pretty: bool,
) -> anyhow::Result<Report> {
    match validator.validate_json(raw) {
        Ok(user) => {
            info!(role = %user.role(), "User payload is valid");
            Ok(Report {
                body: render(&user, pretty)?,
                valid: true,
            })
        }
        Err(ValidateJsonError::Invalid(errors)) => {
            warn!(error_count = errors.len(), "User payload rejected");
            Ok(Report {
                body: render(&errors, pretty)?,
                valid: false,
            })
        }
        Err(ValidateJsonError::Malformed(err)) => {
            Err(err).context("Input is not a valid JSON document")
        }
    }
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn render<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    Ok(rendered)
}
