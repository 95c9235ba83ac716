//! Implementation of `qs check`.

use std::process::ExitCode;

use qs_config::ConfigWarning;
use qs_highlight::{dim, header, warning};

use crate::cli::context::CommandContext;

/// Lists the settings files in effect and reports problems with them.
///
/// Exits with failure when there are warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    if config.sources.is_empty() {
        println!("{}", dim("No settings files found, using defaults."));
    } else {
        println!("{}", header("Settings files:"));
        for path in &config.sources {
            let shown = path.strip_prefix(&ctx.cwd).unwrap_or(path);
            println!("   {}", shown.display());
        }
    }
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", header(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Prints one hint per kind of warning present.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings.iter().map(hint).collect();
    hints.dedup();
    if hints.is_empty() {
        return;
    }
    println!("{}", header("Hints:"));
    for h in hints {
        println!("   {}", dim(h));
    }
}

/// A fix for a kind of warning.
fn hint(w: &ConfigWarning) -> &'static str {
    match w {
        ConfigWarning::InvalidValue { .. } => "run 'qs config' to see the value in effect",
        ConfigWarning::InvalidPattern { .. } => "glob patterns use '*', '**', '?' and '{a,b}'",
        ConfigWarning::UnknownAdjustmentKey { .. } => {
            "priority keys are match types, flags or kinds such as 'primary' or 'isRecent'"
        }
        ConfigWarning::UnknownFacet { .. } => {
            "facet ids are listed under [facets] in the output of 'qs init'"
        }
        ConfigWarning::DuplicateTrigger { .. } => "give every mode its own trigger",
        ConfigWarning::TriggerShadowedByEscape { .. } => {
            "change the trigger or general.escape_cmd_char"
        }
        ConfigWarning::OverlappingExclusiveGroups { .. } => {
            "a facet may belong to only one exclusive group"
        }
    }
}
