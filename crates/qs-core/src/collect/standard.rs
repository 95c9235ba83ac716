//! File search.

use std::collections::BTreeSet;

use qs_config::Mode;

use super::{Collector, FileFlags, PassContext};
use crate::{
    AliasSuggestion, FileSuggestion, Ranking, SourceError, Suggestion, UnresolvedSuggestion,
    VaultFile,
};

/// Vault files, frontmatter aliases and unresolved links.
#[derive(Debug)]
pub struct StandardCollector;

impl Collector for StandardCollector {
    fn mode(&self) -> Mode {
        Mode::Standard
    }

    fn candidates(&self, cx: &PassContext<'_>) -> Result<Vec<Suggestion>, SourceError> {
        let opts = &cx.settings.standard;
        let excluded = cx.path_filter(&opts.exclude_folders, "standard.exclude_folders");
        let ignored = cx.path_filter(&opts.ignored_paths, "standard.ignored_paths");
        let flags = FileFlags::load(cx);

        let files: Vec<VaultFile> = cx
            .source
            .files()?
            .into_iter()
            .filter(|f| !excluded.is_match(&f.path))
            .filter(|f| !(opts.exclude_ignored_files && ignored.is_match(&f.path)))
            .collect();

        let file_suggestion = |file: VaultFile, mut ranking: Ranking| {
            ranking.flags = flags.of(&file);
            ranking.downranked = ignored.is_match(&file.path);
            Suggestion::File(FileSuggestion { file, ranking })
        };

        if !cx.has_search_term() {
            if !opts.override_standard_mode_behaviors {
                return Ok(Vec::new());
            }
            return Ok(cx
                .recent_paths()
                .into_iter()
                .filter_map(|path| files.iter().find(|f| f.path == path).cloned())
                .take(opts.max_recent_file_suggestions_on_init)
                .map(|file| {
                    let ranking = Ranking::unmatched(&file.basename);
                    file_suggestion(file, ranking)
                })
                .collect());
        }

        let mut out = Vec::new();
        for file in &files {
            if let Some(ranking) = cx.match_file(file) {
                out.push(file_suggestion(file.clone(), ranking));
            }
        }

        if opts.show_aliases {
            for file in files.iter().filter(|f| f.is_markdown()) {
                let Ok(metadata) = cx.source.metadata(&file.path) else {
                    continue;
                };
                for alias in &metadata.aliases {
                    if let Some(mut ranking) = cx.match_primary(alias) {
                        ranking.flags = flags.of(file);
                        ranking.downranked = ignored.is_match(&file.path);
                        out.push(Suggestion::Alias(AliasSuggestion {
                            alias: alias.clone(),
                            file: file.clone(),
                            ranking,
                        }));
                    }
                }
            }
        }

        if !opts.show_existing_only {
            let linktexts: BTreeSet<String> = cx
                .source
                .unresolved_links()
                .unwrap_or_default()
                .into_values()
                .flat_map(|targets| targets.into_keys())
                .collect();
            for linktext in linktexts {
                if let Some(ranking) = cx.match_primary(&linktext) {
                    out.push(Suggestion::Unresolved(UnresolvedSuggestion { linktext, ranking }));
                }
            }
        }

        Ok(out)
    }
}
