//! Command palette entries.

use qs_config::{Mode, facet_ids};

use super::{Collector, PassContext};
use crate::{CommandSuggestion, SourceError, Suggestion};

/// Commands, with pinned and recent ones first when nothing is typed.
#[derive(Debug)]
pub struct CommandCollector;

impl Collector for CommandCollector {
    fn mode(&self) -> Mode {
        Mode::CommandList
    }

    fn candidates(&self, cx: &PassContext<'_>) -> Result<Vec<Suggestion>, SourceError> {
        let mut commands = cx.source.commands()?;
        let pinned = cx.source.pinned_commands().unwrap_or_default();
        let recent = cx.source.recent_commands().unwrap_or_default();

        if !cx.has_search_term() {
            let position = |ids: &[String], id: &str| ids.iter().position(|p| p == id);
            commands.sort_by_key(|c| {
                match (position(&pinned, &c.id), position(&recent, &c.id)) {
                    (Some(p), _) => (0, p),
                    (None, Some(r)) => (1, r),
                    (None, None) => (2, 0),
                }
            });
        }

        Ok(commands
            .into_iter()
            .filter_map(|command| {
                let mut ranking = cx.match_primary(&command.name)?;
                let is_pinned = pinned.contains(&command.id);
                let is_recent = recent.contains(&command.id);
                ranking.flags.is_recent = is_recent;
                Some(Suggestion::Command(CommandSuggestion {
                    command,
                    is_pinned,
                    is_recent,
                    ranking,
                }))
            })
            .collect())
    }

    fn facet_matches(&self, id: &str, suggestion: &Suggestion) -> Option<bool> {
        let Suggestion::Command(c) = suggestion else {
            return match id {
                facet_ids::PINNED_COMMANDS | facet_ids::RECENT_COMMANDS => Some(false),
                _ => None,
            };
        };
        match id {
            facet_ids::PINNED_COMMANDS => Some(c.is_pinned),
            facet_ids::RECENT_COMMANDS => Some(c.is_recent),
            _ => None,
        }
    }
}
