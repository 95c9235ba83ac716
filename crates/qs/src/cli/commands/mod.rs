//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod init;
pub mod search;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &mut CommandContext) -> ExitCode {
    match command {
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::Check(_) => check::run(ctx),
        Commands::Config(_) => config::run(ctx),
        Commands::Init(cmd) => init::run(ctx, &cmd),
    }
}
