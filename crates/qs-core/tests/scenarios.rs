//! End-to-end ranking scenarios driven through sessions and the public pipeline.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    cell::Cell,
    collections::BTreeMap,
    sync::Arc,
    time::{Duration, Instant},
};

use qs_config::{FacetDefinition, MatchPriorityData, Mode, ModeSet, Settings};
use qs_core::{
    CustomPredicate, EditorLeaf, FacetFilter, FileMetadata, FileSuggestion, HeadingCache,
    MatchType, Ranking, Session, SessionOpts, SourceContext, SourceError, Suggestion, VaultFile,
    VaultSource, rank,
};
use qs_match::FuzzyMatch;

/// A vault with a fixed file list and one multi-level note.
struct Vault {
    paths: Vec<&'static str>,
    file_calls: Cell<usize>,
}

impl Vault {
    fn new(paths: &[&'static str]) -> Self {
        Self {
            paths: paths.to_vec(),
            file_calls: Cell::new(0),
        }
    }
}

impl VaultSource for Vault {
    fn files(&self) -> Result<Vec<VaultFile>, SourceError> {
        self.file_calls.set(self.file_calls.get() + 1);
        Ok(self.paths.iter().map(|p| VaultFile::new(p)).collect())
    }

    fn metadata(&self, path: &str) -> Result<FileMetadata, SourceError> {
        if path != "outline.md" {
            return Ok(FileMetadata::default());
        }
        let headings = [("Overview", 1), ("Details", 2), ("Footnotes", 3)]
            .into_iter()
            .enumerate()
            .map(|(line, (text, level))| HeadingCache {
                heading: text.to_string(),
                level,
                line: line * 2,
            })
            .collect();
        Ok(FileMetadata {
            headings,
            ..FileMetadata::default()
        })
    }

    fn active_leaf(&self) -> Option<EditorLeaf> {
        Some(EditorLeaf {
            id: "main".to_string(),
            view_type: "markdown".to_string(),
            title: "outline".to_string(),
            file: Some(VaultFile::new("outline.md")),
            last_active: 1,
            is_side_panel: false,
        })
    }
}

fn paths(suggestions: &[Suggestion]) -> Vec<String> {
    suggestions
        .iter()
        .filter_map(|s| s.file().map(|f| f.path.clone()))
        .collect()
}

fn search(vault: Vault, settings: Settings, query: &str) -> Vec<Suggestion> {
    let mut session = Session::new(vault, Arc::new(settings));
    session.on_query_change(query, Instant::now());
    session.suggestions().to_vec()
}

#[test]
fn non_matching_files_are_omitted() {
    let files = ["foobar.md", "barfoo.md", "zzz.md"];
    let first = search(Vault::new(&files), Settings::default(), "foo");
    let second = search(Vault::new(&files), Settings::default(), "foo");

    assert_eq!(first.len(), 2);
    assert!(first.iter().all(|s| s.match_type() == MatchType::Basename));
    assert!(!paths(&first).contains(&"zzz.md".to_string()));
    assert_eq!(paths(&first), paths(&second));
}

#[test]
fn downranked_ties_rank_second() {
    let mut settings = Settings::default();
    settings.standard.ignored_paths = vec!["archive".to_string()];
    let ranked = search(
        Vault::new(&["archive/note.md", "current/note.md"]),
        settings,
        "note",
    );

    assert_eq!(paths(&ranked), vec!["current/note.md", "archive/note.md"]);
    assert!(ranked[1].ranking().downranked);
    assert_eq!(ranked[0].score(), ranked[1].score());
}

#[test]
fn custom_facet_narrows_and_restores() {
    let mut session = Session::new(Vault::new(&["outline.md"]), Arc::new(Settings::default()));
    let opts = SessionOpts {
        use_active_editor_as_source: true,
        ..SessionOpts::default()
    };
    session.open(Mode::SymbolList, &opts, SourceContext::default());
    assert_eq!(session.suggestions().len(), 3);

    let shallow: CustomPredicate =
        Arc::new(|s: &Suggestion| s.heading_level().is_some_and(|l| l <= 2));
    session.register_facet(
        FacetDefinition::new("shallow-headings", Mode::SymbolList, "H1 and H2"),
        shallow,
    );

    assert!(session.toggle_facet("shallow-headings"));
    let levels: Vec<_> = session
        .suggestions()
        .iter()
        .filter_map(Suggestion::heading_level)
        .collect();
    assert_eq!(levels, vec![1, 2]);

    assert!(session.toggle_facet("shallow-headings"));
    assert_eq!(session.suggestions().len(), 3);
}

#[test]
fn match_type_beats_priority_adjustment() {
    let mut settings = Settings::default();
    settings.priority.is_enabled = true;
    settings.priority.adjustments.insert(
        "basename".to_string(),
        MatchPriorityData {
            value: 10.0,
            label: "Basename match".to_string(),
            desc: None,
        },
    );

    let candidate = |path: &str, match_type, score| {
        let fuzzy = FuzzyMatch {
            score,
            ranges: Vec::new(),
        };
        Suggestion::File(FileSuggestion {
            file: VaultFile::new(path),
            ranking: Ranking::matched(match_type, fuzzy, path),
        })
    };

    let modes = ModeSet::single(Mode::Standard);
    let custom = BTreeMap::new();
    let filter = FacetFilter::new(&modes, &[], &custom);
    let ranked = rank(
        vec![
            candidate("deep/path/match.md", MatchType::Path, 50),
            candidate("base.md", MatchType::Basename, 5),
        ],
        &filter,
        &settings,
    );

    assert_eq!(paths(&ranked), vec!["base.md", "deep/path/match.md"]);
    assert!((ranked[0].score() - 15.0).abs() < f64::EPSILON);
    assert!((ranked[1].score() - 50.0).abs() < f64::EPSILON);
}

#[test]
fn mode_change_discards_cache_and_requeries() {
    let vault = Vault::new(&["plan.md", "outline.md"]);
    let mut session = Session::new(vault, Arc::new(Settings::default()));
    let start = Instant::now();

    assert!(session.on_query_change("plan", start));
    assert_eq!(session.cached_modes(), vec![Mode::Standard]);
    assert_eq!(session.source().file_calls.get(), 1);

    session.on_query_change("#over", start);
    assert!(session.cached_modes().is_empty());
    assert!(session.suggestions().is_empty());
    assert!(session.poll(start + Duration::from_secs(1)));
    assert_eq!(session.cached_modes(), vec![Mode::HeadingsList]);
    assert_eq!(session.source().file_calls.get(), 2);

    assert!(session.on_query_change("plan", start + Duration::from_secs(2)));
    assert_eq!(session.cached_modes(), vec![Mode::Standard]);
    assert_eq!(session.source().file_calls.get(), 3);
    assert_eq!(paths(&session.suggestions()), vec!["plan.md"]);
}

#[test]
fn symbol_listing_keeps_line_order_with_adjustments() {
    let mut settings = Settings::default();
    settings.priority.is_enabled = true;
    settings.priority.adjustments.insert(
        "h3".to_string(),
        MatchPriorityData {
            value: 5.0,
            label: "H3 headings".to_string(),
            desc: None,
        },
    );
    let mut session = Session::new(Vault::new(&["outline.md"]), Arc::new(settings));
    let opts = SessionOpts {
        use_active_editor_as_source: true,
        ..SessionOpts::default()
    };
    session.open(Mode::SymbolList, &opts, SourceContext::default());

    let titles: Vec<String> = session
        .suggestions()
        .iter()
        .map(|s| s.title().to_string())
        .collect();
    assert_eq!(titles, vec!["Overview", "Details", "Footnotes"]);
}
