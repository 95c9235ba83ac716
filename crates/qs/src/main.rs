//! Command-line interface for the `qs` quick switcher.

use std::{io, process::ExitCode};

use qs::cli::{
    CommandContext,
    args::{Commands, parse_cli},
    commands::run,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a stderr log subscriber. `RUST_LOG` overrides the verbosity flag.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = parse_cli();
    init_tracing(cli.verbose);

    let loaded = match &cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        Commands::Search(cmd) => CommandContext::load(&cmd.config.files),
        Commands::Check(args) | Commands::Config(args) => CommandContext::load(&args.files),
    };
    let mut ctx = match loaded {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    run(cli.command, &mut ctx)
}
