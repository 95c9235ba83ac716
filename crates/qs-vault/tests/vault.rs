//! Sessions driven against a vault on disk.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};

use qs_config::{Mode, RelationType, Settings};
use qs_core::{
    Action, ChooseEvent, RelatedItemSuggestion, Session, SessionOpts, SourceContext, Suggestion,
};
use qs_vault::DirectoryVault;
use tempfile::TempDir;

const ROADMAP: &str = "---
aliases: [Plan 2024]
---
# Roadmap

## Milestones

- [[daily]] review
- [[Planning ideas]]

#work
";

const DAILY: &str = "# Today

See [[Projects/roadmap#Milestones]] and [[roadmap]].
";

const BOOKMARKS: &str = r#"{"items": [
    {"type": "file", "path": "Projects/roadmap.md"},
    {"type": "group", "title": "Inbox", "items": [{"type": "file", "path": "daily.md"}]}
]}"#;

fn write(root: &Path, path: &str, content: &str) {
    let abs = root.join(path);
    fs::create_dir_all(abs.parent().unwrap()).unwrap();
    fs::write(abs, content).unwrap();
}

fn vault_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Projects/roadmap.md", ROADMAP);
    write(dir.path(), "daily.md", DAILY);
    write(dir.path(), "assets/diagram.png", "");
    write(dir.path(), ".obsidian/bookmarks.json", BOOKMARKS);
    dir
}

fn session(vault: DirectoryVault) -> Session<DirectoryVault> {
    Session::new(vault, Arc::new(Settings::default()))
}

fn titles(session: &Session<DirectoryVault>) -> Vec<(String, String)> {
    session
        .suggestions()
        .iter()
        .map(|s| (s.kind().to_string(), s.title().to_string()))
        .collect()
}

fn active_editor() -> SessionOpts {
    SessionOpts {
        use_active_editor_as_source: true,
        ..SessionOpts::default()
    }
}

#[test]
fn standard_search_finds_aliases_and_unresolved_links() {
    let dir = vault_dir();
    let mut session = session(DirectoryVault::open(dir.path()).unwrap());

    assert!(session.on_query_change("plan", Instant::now()));
    let found = titles(&session);
    assert!(found.contains(&("alias".to_string(), "Plan 2024".to_string())));
    assert!(found.contains(&("unresolved".to_string(), "Planning ideas".to_string())));
    assert!(found.iter().all(|(_, title)| title != "daily"));
}

#[test]
fn symbols_of_the_active_note_in_line_order() {
    let dir = vault_dir();
    let vault = DirectoryVault::open(dir.path())
        .unwrap()
        .with_active_file("Projects/roadmap.md");
    let mut session = session(vault);
    session.open(Mode::SymbolList, &active_editor(), SourceContext::default());

    let symbols: Vec<_> = titles(&session).into_iter().map(|(_, title)| title).collect();
    let position = |text: &str| symbols.iter().position(|s| s == text);
    assert!(position("Roadmap") < position("Milestones"));
    assert!(position("Milestones") < position("#work"));
    assert!(position("daily").is_some());
}

#[test]
fn headings_search_waits_for_the_debounce() {
    let dir = vault_dir();
    let mut session = session(DirectoryVault::open(dir.path()).unwrap());
    let start = Instant::now();

    assert!(!session.on_query_change("#miles", start));
    assert!(session.is_pending());
    assert!(!session.poll(start + Duration::from_millis(10)));
    assert!(session.poll(start + Duration::from_secs(1)));

    let suggestions = session.suggestions();
    let top = &suggestions[0];
    assert_eq!(top.kind(), "heading");
    assert_eq!(top.title(), "Milestones");
    assert_eq!(top.file().map(|f| f.path.as_str()), Some("Projects/roadmap.md"));
}

#[test]
fn backlinks_of_the_active_note() {
    let dir = vault_dir();
    let vault = DirectoryVault::open(dir.path())
        .unwrap()
        .with_active_file("Projects/roadmap.md");
    let mut session = session(vault);
    session.open(Mode::RelatedItemsList, &active_editor(), SourceContext::default());

    let backlink = session.suggestions().iter().find_map(|s| match s {
        Suggestion::RelatedItem(RelatedItemSuggestion { item, file, .. })
            if item.relation_type == RelationType::Backlink =>
        {
            Some((file.as_ref().map(|f| f.path.clone()), item.count))
        }
        _ => None,
    });
    assert_eq!(backlink, Some((Some("daily.md".to_string()), Some(2))));
}

#[test]
fn bookmarks_list_and_open_action() {
    let dir = vault_dir();
    let mut session = session(DirectoryVault::open(dir.path()).unwrap());
    let prefill = session.open(
        Mode::BookmarksList,
        &SessionOpts::default(),
        SourceContext::default(),
    );
    assert_eq!(prefill, "'");

    let found = titles(&session);
    assert!(found.contains(&("bookmark".to_string(), "roadmap".to_string())));
    assert!(found.contains(&("bookmark".to_string(), "daily".to_string())));

    let index = found.iter().position(|(_, t)| t == "daily").unwrap();
    let action = session.choose(index, &ChooseEvent::enter()).unwrap();
    assert!(matches!(action, Action::OpenFile { ref path, .. } if path == "daily.md"));
}

#[test]
fn commands_are_unavailable_from_a_directory() {
    let dir = vault_dir();
    let mut session = session(DirectoryVault::open(dir.path()).unwrap());
    session.open(Mode::CommandList, &SessionOpts::default(), SourceContext::default());
    assert!(session.suggestions().is_empty());
}
