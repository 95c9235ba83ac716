//! Headings across the vault.

use std::collections::BTreeSet;

use qs_config::{Mode, facet_ids};

use super::{Collector, FileFlags, PassContext};
use crate::{FileSuggestion, HeadingSuggestion, Ranking, SourceError, Suggestion, VaultFile};

/// Headings of every note, with file names as a fallback.
#[derive(Debug)]
pub struct HeadingsCollector;

impl Collector for HeadingsCollector {
    fn mode(&self) -> Mode {
        Mode::HeadingsList
    }

    fn candidates(&self, cx: &PassContext<'_>) -> Result<Vec<Suggestion>, SourceError> {
        let opts = &cx.settings.headings;
        let excluded = cx.path_filter(
            &cx.settings.standard.exclude_folders,
            "standard.exclude_folders",
        );
        let flags = FileFlags::load(cx);
        let file_suggestion = |file: VaultFile, mut ranking: Ranking| {
            ranking.flags = flags.of(&file);
            Suggestion::File(FileSuggestion { file, ranking })
        };

        if !cx.has_search_term() {
            let mut paths = Vec::new();
            if opts.should_search_recent_files {
                paths.extend(cx.recent_paths());
            }
            if opts.should_search_bookmarks {
                paths.extend(cx.bookmarked_paths());
            }
            let mut seen = BTreeSet::new();
            return Ok(paths
                .into_iter()
                .filter(|p| seen.insert(p.clone()) && !excluded.is_match(p))
                .map(|p| {
                    let file = VaultFile::new(&p);
                    let ranking = Ranking::unmatched(&file.basename);
                    file_suggestion(file, ranking)
                })
                .collect());
        }

        let files = cx.source.files()?;
        let mut out = Vec::new();
        for file in files.iter().filter(|f| !excluded.is_match(&f.path)) {
            let mut heading_matched = false;
            if opts.should_search_headings && file.is_markdown() {
                let headings = cx
                    .source
                    .metadata(&file.path)
                    .map(|m| m.headings)
                    .unwrap_or_default();
                for heading in headings
                    .into_iter()
                    .filter(|h| opts.search_all_headings || h.level == 1)
                {
                    if let Some(mut ranking) = cx.match_primary(&heading.heading) {
                        ranking.flags = flags.of(file);
                        heading_matched = true;
                        out.push(Suggestion::Heading(HeadingSuggestion {
                            heading,
                            file: file.clone(),
                            ranking,
                        }));
                    }
                }
            }

            let search_filename = opts.should_search_filenames
                || !opts.should_search_headings
                || (!heading_matched && !opts.strict_headings_only);
            if search_filename {
                if let Some(ranking) = cx.match_file(file) {
                    out.push(file_suggestion(file.clone(), ranking));
                }
            }
        }
        Ok(out)
    }

    fn facet_matches(&self, id: &str, suggestion: &Suggestion) -> Option<bool> {
        let flags = suggestion.ranking().flags;
        match id {
            facet_ids::RECENT_FILES => Some(flags.is_recent),
            facet_ids::BOOKMARKS => Some(flags.is_bookmarked),
            facet_ids::FILENAMES => Some(matches!(suggestion, Suggestion::File(_))),
            facet_ids::HEADINGS => Some(matches!(suggestion, Suggestion::Heading(_))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use qs_config::Settings;
    use qs_match::Matcher;

    use super::*;
    use crate::{FileMetadata, HeadingCache, SourceContext, VaultSource};

    struct Notes;

    impl VaultSource for Notes {
        fn files(&self) -> Result<Vec<VaultFile>, SourceError> {
            Ok(["plan.md", "notes/ideas.md", "pic.png"]
                .into_iter()
                .map(VaultFile::new)
                .collect())
        }

        fn metadata(&self, path: &str) -> Result<FileMetadata, SourceError> {
            let headings = match path {
                "plan.md" => vec![("Plan", 1), ("Goals", 2)],
                "notes/ideas.md" => vec![("Ideas", 1), ("Plane trip", 3)],
                _ => Vec::new(),
            };
            Ok(FileMetadata {
                headings: headings
                    .into_iter()
                    .enumerate()
                    .map(|(line, (text, level))| HeadingCache {
                        heading: text.to_string(),
                        level,
                        line,
                    })
                    .collect(),
                ..FileMetadata::default()
            })
        }

        fn recent_files(&self) -> Result<Vec<String>, SourceError> {
            Ok(vec!["notes/ideas.md".to_string()])
        }
    }

    fn run(settings: &Settings, query: &str) -> Vec<Suggestion> {
        let matcher = Matcher::new();
        let context = SourceContext::default();
        let cx = PassContext {
            query,
            settings,
            source: &Notes,
            matcher: &matcher,
            context: &context,
        };
        HeadingsCollector.candidates(&cx).unwrap()
    }

    fn describe(list: &[Suggestion]) -> Vec<String> {
        list.iter()
            .map(|s| format!("{}:{}", s.kind(), s.title()))
            .collect()
    }

    #[test]
    fn headings_then_filename_fallback() {
        let list = run(&Settings::default(), "plan");
        assert_eq!(describe(&list), vec!["heading:Plan", "heading:Plane trip"]);

        let list = run(&Settings::default(), "ideas");
        assert_eq!(describe(&list), vec!["heading:Ideas"]);

        let list = run(&Settings::default(), "pic");
        assert_eq!(describe(&list), vec!["file:pic"]);
    }

    #[test]
    fn h1_only_and_strict() {
        let mut settings = Settings::default();
        settings.headings.search_all_headings = false;
        settings.headings.strict_headings_only = true;
        let list = run(&settings, "goals");
        assert!(list.is_empty());
    }

    #[test]
    fn filenames_when_enabled() {
        let mut settings = Settings::default();
        settings.headings.should_search_filenames = true;
        let list = run(&settings, "ideas");
        assert_eq!(describe(&list), vec!["heading:Ideas", "file:ideas"]);
    }

    #[test]
    fn recent_files_without_search_term() {
        let list = run(&Settings::default(), "");
        assert_eq!(describe(&list), vec!["file:ideas"]);
        assert!(list[0].ranking().flags.is_recent);
        assert_eq!(HeadingsCollector.facet_matches("recentFiles", &list[0]), Some(true));
        assert_eq!(HeadingsCollector.facet_matches("headings", &list[0]), Some(false));
    }
}
