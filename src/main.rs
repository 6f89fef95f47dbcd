//! patternscan CLI entry point.

use std::io;

use clap::Parser;
use patternscan::cli::{self, Cli, Commands, LogLevel, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let result = match &cli.command {
        Commands::Scan(args) => cli::run_scan(args),
        Commands::Init(args) => cli::run_init(args),
        Commands::Rules => cli::run_rules(),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

/// Initialize tracing to stderr. `RUST_LOG` takes precedence over `--log-level`.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
