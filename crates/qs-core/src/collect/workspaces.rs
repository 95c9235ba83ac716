//! Saved workspaces.

use qs_config::Mode;

use super::{Collector, PassContext};
use crate::{SourceError, Suggestion, WorkspaceSuggestion};

/// Workspace layouts, matched on their id.
#[derive(Debug)]
pub struct WorkspaceCollector;

impl Collector for WorkspaceCollector {
    fn mode(&self) -> Mode {
        Mode::WorkspaceList
    }

    fn candidates(&self, cx: &PassContext<'_>) -> Result<Vec<Suggestion>, SourceError> {
        Ok(cx
            .source
            .workspaces()?
            .into_iter()
            .filter_map(|w| {
                let ranking = cx.match_primary(&w.id)?;
                Some(Suggestion::Workspace(WorkspaceSuggestion { id: w.id, ranking }))
            })
            .collect())
    }
}
