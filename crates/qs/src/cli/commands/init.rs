//! Implementation of `qs init`.

use std::{fs, process::ExitCode};

use qs_config::{CONFIG_FILENAME, settings_template};
use qs_highlight::{Highlighter, header};

use crate::cli::{args::InitCommand, context::CommandContext};

/// Writes a commented `.qs.toml` with every setting at its default.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let path = ctx.cwd.join(CONFIG_FILENAME);

    if path.exists() && !cmd.force {
        eprintln!("error: settings file already exists: {}", path.display());
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = settings_template();
    if let Err(e) = fs::write(&path, &template) {
        eprintln!("error: failed to write {}: {e}", path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", path.display());
    println!();
    println!("{}", header("Settings written:"));
    print!("{}", Highlighter::new().highlight_toml(&template));

    ExitCode::SUCCESS
}
