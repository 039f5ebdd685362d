//! Partition CLI - split block spans read from stdin into subvolumes

use partition::cli::{self, Cli};
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse_normalized(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    init_logging(cli.verbose)?;

    if let Err(e) = cli::run(&cli, io::stdin().lock(), io::stdout().lock()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}
