//! Open editors.

use std::cmp::Reverse;

use qs_config::Mode;

use super::{Collector, FileFlags, PassContext};
use crate::{EditorSuggestion, SourceError, Suggestion};

/// Open editor panes, matched on title then file.
#[derive(Debug)]
pub struct EditorCollector;

impl Collector for EditorCollector {
    fn mode(&self) -> Mode {
        Mode::EditorList
    }

    fn candidates(&self, cx: &PassContext<'_>) -> Result<Vec<Suggestion>, SourceError> {
        let opts = &cx.settings.editors;
        let flags = FileFlags::load(cx);

        let mut leaves: Vec<_> = cx
            .source
            .open_leaves()?
            .into_iter()
            .filter(|leaf| !opts.exclude_view_types.contains(&leaf.view_type))
            .filter(|leaf| {
                !leaf.is_side_panel || opts.include_side_panel_view_types.contains(&leaf.view_type)
            })
            .collect();
        if !cx.has_search_term() && opts.order_by_access_time {
            leaves.sort_by_key(|leaf| Reverse(leaf.last_active));
        }

        Ok(leaves
            .into_iter()
            .filter_map(|leaf| {
                let mut ranking = cx.match_text_or_file(&leaf.title, leaf.file.as_ref())?;
                if let Some(file) = &leaf.file {
                    ranking.flags = flags.of(file);
                }
                ranking.flags.is_open_in_editor = true;
                Some(Suggestion::Editor(EditorSuggestion { leaf, ranking }))
            })
            .collect())
    }
}
