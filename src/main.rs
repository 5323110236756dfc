//! CLI entry point and command handlers for face-relations.

mod cli;
mod cmd;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use cmd::query::QueryArgs;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Validate { ids, format } => cmd::validate::cmd_validate(&ids, format, cli.quiet),
        Commands::Control { prefix, format } => cmd::control::cmd_control(&prefix, format),
        Commands::Query {
            cif,
            oc,
            og,
            ut,
            params,
            endpoint,
            max_attempts,
            format,
        } => {
            let config = cmd::load_config(config_path)?;
            cmd::query::cmd_query(
                QueryArgs {
                    cif,
                    oc,
                    og,
                    ut,
                    params,
                    endpoint,
                    max_attempts,
                    format,
                },
                &config,
                cli.quiet,
            )
        }
        Commands::Config => cmd::config::cmd_config(config_path),
        Commands::Version => cmd::util::cmd_version(cli.verbose > 0),
        Commands::Completion { shell } => cmd::util::cmd_completion(shell),
        Commands::Man { out_dir } => cmd::util::cmd_man(out_dir.as_ref()),
    }
}

/// Log to stderr. `-v` flags take precedence over `RUST_LOG`; the default
/// only shows warnings.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        (false, 1) => EnvFilter::new("face_relations=debug"),
        (false, _) => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
