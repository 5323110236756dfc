//! `version`, `completion` and `man`: commands that describe the tool itself.

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use face_relations::config::DEFAULT_ENDPOINT;

use crate::cli::Cli;

const BIN_NAME: &str = "face-relations";

/// Lines printed by `version`; build metadata and the default endpoint only
/// with `-v`.
fn version_lines(verbose: bool) -> Vec<String> {
    let mut lines = vec![format!("{} {}", BIN_NAME, env!("CARGO_PKG_VERSION"))];
    if verbose {
        lines.push(format!("commit: {}", env!("GIT_SHA")));
        lines.push(format!("built: {}", env!("BUILD_DATE")));
        lines.push(format!("default endpoint: {}", DEFAULT_ENDPOINT));
    }
    lines
}

pub fn cmd_version(verbose: bool) -> Result<()> {
    for line in version_lines(verbose) {
        println!("{}", line);
    }
    Ok(())
}

/// Where `man` writes its page: `<out_dir>/face-relations.1`, or the current
/// directory.
fn man_page_path(out_dir: Option<&Path>) -> PathBuf {
    out_dir
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{}.1", BIN_NAME))
}

fn render_man_page() -> Result<Vec<u8>> {
    let mut page = Vec::new();
    clap_mangen::Man::new(Cli::command())
        .render(&mut page)
        .context("Failed to render man page")?;
    Ok(page)
}

pub fn cmd_man(out_dir: Option<&PathBuf>) -> Result<()> {
    let path = man_page_path(out_dir.map(PathBuf::as_path));
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    std::fs::write(&path, render_man_page()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Man page written to: {}", path.display());
    Ok(())
}

fn write_completion(shell: Shell, out: &mut dyn Write) {
    generate(shell, &mut Cli::command(), BIN_NAME, out);
}

pub fn cmd_completion(shell: Shell) -> Result<()> {
    write_completion(shell, &mut io::stdout());
    Ok(())
}
