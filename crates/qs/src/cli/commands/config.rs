//! Implementation of `qs config`.

use std::process::ExitCode;

use qs_highlight::Highlighter;

use crate::cli::context::CommandContext;

/// Shows the effective settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let toml = match ctx.config.settings.to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: failed to render settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    let highlighter = Highlighter::new();
    print!("{}", highlighter.highlight_toml(&toml));
    ExitCode::SUCCESS
}
