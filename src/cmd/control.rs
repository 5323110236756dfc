//! `control` command: compute the check character for an identifier prefix.

use anyhow::{Context, Result};
use serde_json::json;

use face_relations::nif::{control_characters, ControlCharacters};

use crate::cli::OutputFormat;

pub fn cmd_control(prefix: &str, format: OutputFormat) -> Result<()> {
    let Some(control) = control_characters(prefix) else {
        anyhow::bail!(
            "'{}' is not the first 8 characters of a NIF, NIE or CIF",
            prefix.trim()
        );
    };

    match format {
        OutputFormat::Text => println!("{}", control),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&control_json(prefix, control))
                .context("Failed to serialize result")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn control_json(prefix: &str, control: ControlCharacters) -> serde_json::Value {
    match control {
        ControlCharacters::Letter(letter) => json!({
            "prefix": prefix.trim(),
            "letter": letter.to_string(),
        }),
        ControlCharacters::DigitOrLetter { digit, letter } => json!({
            "prefix": prefix.trim(),
            "digit": digit.to_string(),
            "letter": letter.to_string(),
        }),
    }
}
