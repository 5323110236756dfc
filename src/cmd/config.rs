//! Effective configuration display.

use anyhow::Result;
use colored::Colorize;

use std::path::PathBuf;

use face_relations::config::{expand_path, global_config_path, PROJECT_CONFIG_PATH};

/// Config files in merge order, each with whether it exists.
fn config_sources(explicit: Option<&str>) -> Vec<(PathBuf, bool)> {
    global_config_path()
        .into_iter()
        .chain(std::iter::once(PathBuf::from(PROJECT_CONFIG_PATH)))
        .chain(explicit.map(expand_path))
        .map(|path| {
            let found = path.exists();
            (path, found)
        })
        .collect()
}

/// Print the merged configuration and where it was looked up
pub fn cmd_config(explicit: Option<&str>) -> Result<()> {
    let config = super::load_config(explicit)?;

    eprintln!("{}", "Config sources (later overrides earlier):".bold());
    for (path, found) in config_sources(explicit) {
        eprintln!("  {} {}", source_marker(found), path.display());
    }
    eprintln!();

    print!("{}", config.to_markdown()?);
    Ok(())
}

fn source_marker(found: bool) -> colored::ColoredString {
    if found {
        "✓".green()
    } else {
        "-".dimmed()
    }
}
