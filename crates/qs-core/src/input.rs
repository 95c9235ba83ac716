//! Input parsing: which modes a typed query selects.
//!
//! A query may start with a prefix trigger (`@`, `#`, `>` and so on) that selects a mode.
//! Inside a source-capable mode a second, embedded trigger may follow the search text, e.g.
//! `plan@goals`: the files matching `plan` supply the source file for a symbol search for
//! `goals`. Typing the escape character first turns trigger parsing off.

use qs_config::{Mode, ModeSet, Settings};
use serde::Serialize;

/// The part of an embedded query that picks the source item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixQuery {
    /// Mode searched for the source item.
    pub mode: Mode,
    /// Query for that mode.
    pub query: String,
}

/// The result of parsing the input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedInput {
    /// Mode whose results are shown.
    pub mode: Mode,
    /// Every mode contributing to the results.
    pub modes: ModeSet,
    /// Query for `mode`, with triggers removed.
    pub query: String,
    /// Source query of an embedded trigger.
    pub prefix: Option<PrefixQuery>,
    /// The listing is for the active editor rather than a chosen source.
    pub use_active_editor: bool,
    /// The input started with the escape character.
    pub escaped: bool,
}

impl ParsedInput {
    /// Plain file search for `query`.
    pub fn standard(query: &str) -> Self {
        Self {
            mode: Mode::Standard,
            modes: ModeSet::single(Mode::Standard),
            query: query.to_string(),
            prefix: None,
            use_active_editor: false,
            escaped: false,
        }
    }
}

/// Modes whose selected suggestion can supply a source file for `target`.
fn is_source_mode(mode: Mode, target: Mode) -> bool {
    match mode {
        Mode::Standard | Mode::EditorList | Mode::HeadingsList | Mode::BookmarksList => true,
        Mode::RelatedItemsList => target == Mode::SymbolList,
        _ => false,
    }
}

/// Parses input text against the configured triggers.
pub fn parse_input(text: &str, settings: &Settings) -> ParsedInput {
    let escape = settings.general.escape_cmd_char.as_str();
    if !escape.is_empty() {
        if let Some(rest) = text.strip_prefix(escape) {
            return ParsedInput {
                escaped: true,
                ..ParsedInput::standard(rest)
            };
        }
    }

    let triggers = settings.triggers.prefix_triggers();
    let prefix = triggers
        .iter()
        .filter(|(trigger, _, _)| !trigger.is_empty() && text.starts_with(trigger))
        .max_by_key(|(trigger, _, _)| trigger.len());

    let mut parsed = match prefix {
        Some((trigger, mode, active)) => ParsedInput {
            mode: *mode,
            modes: ModeSet::single(*mode),
            query: text[trigger.len()..].to_string(),
            prefix: None,
            use_active_editor: *active,
            escaped: false,
        },
        None => ParsedInput::standard(text),
    };

    if !parsed.use_active_editor {
        if let Some((index, trigger_len, target)) = find_embedded(&parsed, settings) {
            let source_mode = parsed.mode;
            let source_query = parsed.query[..index].to_string();
            parsed.query = parsed.query[index + trigger_len..].to_string();
            parsed.mode = target;
            parsed.modes = [source_mode, target].into_iter().collect();
            parsed.prefix = Some(PrefixQuery {
                mode: source_mode,
                query: source_query,
            });
        }
    }
    parsed
}

/// Finds the earliest embedded symbol or related-items trigger in the query.
///
/// Returns its byte index, its length and the mode it opens.
fn find_embedded(parsed: &ParsedInput, settings: &Settings) -> Option<(usize, usize, Mode)> {
    let triggers = &settings.triggers;
    [
        (triggers.symbol_list.as_str(), Mode::SymbolList),
        (triggers.related_items_list.as_str(), Mode::RelatedItemsList),
    ]
    .into_iter()
    .filter(|(trigger, target)| {
        !trigger.is_empty() && *target != parsed.mode && is_source_mode(parsed.mode, *target)
    })
    .filter_map(|(trigger, target)| {
        parsed
            .query
            .find(trigger)
            .map(|index| (index, trigger.len(), target))
    })
    .min_by_key(|(index, _, _)| *index)
}

/// Returns the trigger that opens `mode`, empty for standard mode.
pub fn trigger_for(mode: Mode, active_editor: bool, settings: &Settings) -> String {
    settings
        .triggers
        .prefix_triggers()
        .into_iter()
        .find(|(_, m, active)| *m == mode && *active == active_editor)
        .or_else(|| {
            settings
                .triggers
                .prefix_triggers()
                .into_iter()
                .find(|(_, m, _)| *m == mode)
        })
        .map(|(trigger, _, _)| trigger.to_string())
        .unwrap_or_default()
}
