mod cli;
mod commands;
mod error;
mod logging;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        error!("command failed: {}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet);

    info!("crystmap v{}", env!("CARGO_PKG_VERSION"));
    debug!("parsed arguments: {:?}", &cli);

    match cli.command {
        Commands::Info(args) => commands::info(args),
        Commands::Extract(args) => commands::extract(args),
    }
}
