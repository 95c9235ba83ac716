//! Implementation of `qs search`.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
    sync::Arc,
};

use qs_core::{ChooseEvent, Session, SessionOpts, SourceContext};
use qs_vault::DirectoryVault;
use tracing::debug;

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{print_action, print_suggestions_json, print_suggestions_table},
};

/// Runs one query against a vault and prints the ranked suggestions, or the action for
/// choosing one of them.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let mut settings = ctx.config.settings.clone();
    if let Some(limit) = cmd.limit {
        settings.general.limit = limit;
    }

    let vault = match ctx.open_vault(
        cmd.root.as_deref(),
        cmd.active.as_deref(),
        cmd.vaults.as_deref(),
    ) {
        Ok(vault) => vault,
        Err(code) => return code,
    };
    let mut session = Session::new(vault, Arc::new(settings));
    let input = run_query(&mut session, cmd);

    for id in &cmd.facets {
        if !session.toggle_facet(id) {
            eprintln!("warning: facet '{id}' is unknown or not available in this mode");
        }
    }

    let suggestions = session.suggestions();
    if let Some(position) = cmd.choose {
        if position == 0 || position > suggestions.len() {
            eprintln!(
                "error: cannot choose suggestion {position}, there are {}",
                suggestions.len()
            );
            return ExitCode::FAILURE;
        }
        let event = ChooseEvent::with(&cmd.modifiers, "Enter");
        return match session.choose(position - 1, &event) {
            Some(action) => print_action(&action),
            None => {
                eprintln!("error: suggestion {position} has no action");
                ExitCode::FAILURE
            }
        };
    }

    if cmd.json {
        return print_suggestions_json(&input, session.mode(), &suggestions);
    }
    print_suggestions_table(&suggestions, io::stdout().is_terminal());
    ExitCode::SUCCESS
}

/// Opens the session in the requested mode, types the query and commits the pass.
///
/// Returns the full input text, trigger included.
fn run_query(session: &mut Session<DirectoryVault>, cmd: &SearchCommand) -> String {
    let input = match cmd.mode {
        Some(mode) => {
            let opts = SessionOpts {
                use_active_editor_as_source: cmd.active.is_some(),
                ..SessionOpts::default()
            };
            let prefill = session.open(mode, &opts, SourceContext::default());
            format!("{prefill}{}", cmd.query)
        }
        None => cmd.query.clone(),
    };

    if let Some(request) = session.set_query(&input) {
        let result = request.execute(session.source());
        debug!(elapsed = ?result.elapsed, "search pass");
        session.commit(result);
    }
    input
}
