//! `validate` command: check tax identifiers.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use face_relations::nif::{IdentifierClass, TaxId, TaxIdError};

use crate::cli::OutputFormat;

/// Outcome for one identifier
#[derive(Debug, Serialize)]
pub struct IdentifierReport {
    pub input: String,
    /// Body without country prefix, when the input was well formed
    pub normalized: Option<String>,
    pub class: Option<IdentifierClass>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IdentifierReport {
    pub fn check(input: &str) -> Self {
        let (normalized, class, error) = match TaxId::parse(input) {
            Ok(id) => (Some(id.as_str().to_string()), Some(id.class()), None),
            Err(e) => {
                let message = e.to_string();
                match e {
                    TaxIdError::Malformed(_) => (None, None, Some(message)),
                    TaxIdError::Unrecognized(body) => (Some(body), None, Some(message)),
                    TaxIdError::CheckMismatch { id, class, .. } => {
                        (Some(id), Some(class), Some(message))
                    }
                }
            }
        };

        Self {
            input: input.to_string(),
            normalized,
            class,
            valid: error.is_none(),
            error,
        }
    }
}

/// Validate every identifier and print the results.
///
/// Exits with status 1 when any identifier is invalid.
pub fn cmd_validate(ids: &[String], format: OutputFormat, quiet: bool) -> Result<()> {
    let reports: Vec<IdentifierReport> = ids.iter().map(|id| IdentifierReport::check(id)).collect();
    let invalid = reports.iter().filter(|r| !r.valid).count();

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&reports).context("Failed to serialize results")?;
            println!("{}", json);
        }
        OutputFormat::Text if !quiet => {
            for report in &reports {
                print_report(report);
            }
            if reports.len() > 1 {
                println!(
                    "\n{} valid, {} invalid",
                    reports.len() - invalid,
                    invalid
                );
            }
        }
        OutputFormat::Text => {}
    }

    if invalid > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(report: &IdentifierReport) {
    let shown = report.normalized.as_deref().unwrap_or(report.input.trim());
    match (&report.class, &report.error) {
        (Some(class), None) => println!("{} {} ({})", "✓".green(), shown.bold(), class),
        (_, Some(error)) => println!("{} {}", "✗".red(), error),
        (None, None) => println!("{} {}", "✗".red(), shown),
    }
}
