//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
use qs_config::Mode;
use qs_core::{Action, Suggestion};
use qs_highlight::{dim, emphasize};
use serde::Serialize;

/// JSON output for `qs search`.
#[derive(Serialize)]
struct JsonSearchOutput<'a> {
    /// Input text the pass ran for, trigger included.
    input: &'a str,
    /// Mode whose suggestions are shown.
    mode: Mode,
    /// Number of suggestions.
    total: usize,
    /// Ranked suggestions.
    suggestions: &'a [Suggestion],
}

/// Prints ranked suggestions as JSON.
pub fn print_suggestions_json(input: &str, mode: Mode, suggestions: &[Suggestion]) -> ExitCode {
    print_json(&JsonSearchOutput {
        input,
        mode,
        total: suggestions.len(),
        suggestions,
    })
}

/// Prints an action as JSON.
pub fn print_action(action: &Action) -> ExitCode {
    print_json(action)
}

/// Serializes `value` to stdout, reporting serialization failures.
fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints ranked suggestions as a table.
///
/// With `color`, the matched characters of each title are emphasized.
pub fn print_suggestions_table(suggestions: &[Suggestion], color: bool) {
    if suggestions.is_empty() {
        println!("{}", dim("No suggestions."));
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Kind", "Title", "Path", "Match", "Score"]);
    for (i, s) in suggestions.iter().enumerate() {
        let ranking = s.ranking();
        let mut match_type = ranking
            .match_type
            .adjustment_key()
            .unwrap_or("none")
            .to_string();
        if ranking.downranked {
            match_type.push_str(" (down)");
        }
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(s.kind()),
            Cell::new(title_cell(s, color)),
            Cell::new(s.file().map(|f| f.path.as_str()).unwrap_or_default()),
            Cell::new(match_type),
            Cell::new(format!("{:.1}", ranking.score)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}

/// The title of a suggestion, emphasized where the query matched it.
fn title_cell(s: &Suggestion, color: bool) -> String {
    let ranking = s.ranking();
    match &ranking.fuzzy {
        Some(m) if color && ranking.match_text == s.title() => emphasize(s.title(), &m.ranges),
        _ => s.title().to_string(),
    }
}
