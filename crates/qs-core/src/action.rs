//! What choosing a suggestion does.
//!
//! The core never performs actions itself; it describes them for the host.

use qs_config::{Modifier, Settings};
use serde::Serialize;

use crate::{BookmarkKind, EditorLeaf, Suggestion, Symbol};

/// The key press that chose a suggestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChooseEvent {
    /// The key, e.g. `Enter`.
    pub key: String,
    /// Modifiers held.
    pub modifiers: Vec<Modifier>,
}

impl ChooseEvent {
    /// Plain Enter.
    pub fn enter() -> Self {
        Self::with(&[], "Enter")
    }

    /// A key with modifiers.
    pub fn with(modifiers: &[Modifier], key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: modifiers.to_vec(),
        }
    }

    /// Returns true if the platform command key was held.
    fn has_mod(&self) -> bool {
        self.modifiers.contains(&Modifier::Mod)
    }
}

/// An action for the host to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// Open a file, optionally at a line or subpath.
    OpenFile {
        /// Vault-relative path.
        path: String,
        /// Open in a new tab.
        new_tab: bool,
        /// Zero-based line to scroll to.
        line: Option<usize>,
        /// Heading or block reference, e.g. `#Intro`.
        subpath: Option<String>,
    },
    /// Focus an open editor.
    ActivateLeaf {
        /// Leaf id.
        id: String,
    },
    /// Load a saved workspace.
    LoadWorkspace {
        /// Workspace id.
        id: String,
    },
    /// Run a command.
    ExecuteCommand {
        /// Command id.
        id: String,
    },
    /// Pin or unpin a command.
    TogglePinnedCommand {
        /// Command id.
        id: String,
    },
    /// Switch to another vault.
    OpenVault {
        /// Absolute vault path.
        path: String,
    },
    /// Create a note for unresolved link text.
    CreateFile {
        /// The link text.
        linktext: String,
        /// Open in a new tab.
        new_tab: bool,
    },
    /// Insert a link into the active editor.
    InsertLink {
        /// Link markup.
        text: String,
    },
    /// Run a saved search.
    OpenSearch {
        /// Search query.
        query: String,
    },
    /// Reveal a folder in the file explorer.
    RevealFolder {
        /// Vault-relative folder path.
        path: String,
    },
    /// Nothing to do.
    Nothing,
}

/// Decides the action for choosing `suggestion` with `event`.
///
/// `active_leaf` is the editor the switcher was opened from; it receives inserted links.
pub fn dispatch(
    suggestion: &Suggestion,
    event: &ChooseEvent,
    settings: &Settings,
    active_leaf: Option<&EditorLeaf>,
) -> Action {
    if let Some(text) = insert_link_text(suggestion, event, settings, active_leaf) {
        return Action::InsertLink { text };
    }

    let already_open = suggestion.ranking().flags.is_open_in_editor;
    let new_tab = event.has_mod() || (settings.general.on_open_prefer_new_tab && !already_open);
    let open = |path: &str, line: Option<usize>, subpath: Option<String>| Action::OpenFile {
        path: path.to_string(),
        new_tab,
        line,
        subpath,
    };

    match suggestion {
        Suggestion::File(s) => open(&s.file.path, None, None),
        Suggestion::Alias(s) => open(&s.file.path, None, None),
        Suggestion::Unresolved(s) => Action::CreateFile {
            linktext: s.linktext.clone(),
            new_tab,
        },
        Suggestion::Editor(s) => Action::ActivateLeaf {
            id: s.leaf.id.clone(),
        },
        Suggestion::Symbol(s) => {
            let in_active = active_leaf
                .and_then(|leaf| leaf.file.as_ref())
                .is_some_and(|f| f.path == s.file.path);
            Action::OpenFile {
                path: s.file.path.clone(),
                new_tab: event.has_mod()
                    || (settings.symbols.always_new_tab_for_symbols && !in_active),
                line: s.item.symbol.line(),
                subpath: None,
            }
        }
        Suggestion::Workspace(s) => Action::LoadWorkspace { id: s.id.clone() },
        Suggestion::Heading(s) => open(
            &s.file.path,
            Some(s.heading.line),
            Some(format!("#{}", s.heading.heading)),
        ),
        Suggestion::Bookmark(s) => match (s.item.kind, &s.item.path) {
            (BookmarkKind::File, Some(path)) => open(path, None, None),
            (BookmarkKind::Heading, Some(path)) => open(path, None, s.item.subpath.clone()),
            (BookmarkKind::Folder, Some(path)) => Action::RevealFolder { path: path.clone() },
            (BookmarkKind::Search, _) => Action::OpenSearch {
                query: s.item.query.clone().unwrap_or_default(),
            },
            _ => Action::Nothing,
        },
        Suggestion::Command(s) => {
            let id = s.command.id.clone();
            if settings
                .commands
                .toggle_pinned_keys
                .matches(&event.key, &event.modifiers)
            {
                Action::TogglePinnedCommand { id }
            } else {
                Action::ExecuteCommand { id }
            }
        }
        Suggestion::RelatedItem(s) => match (&s.file, &s.item.unresolved_text) {
            (Some(file), _) => open(&file.path, None, None),
            (None, Some(linktext)) => Action::CreateFile {
                linktext: linktext.clone(),
                new_tab,
            },
            (None, None) => Action::Nothing,
        },
        Suggestion::Vault(s) => Action::OpenVault {
            path: s.vault.path.clone(),
        },
    }
}

/// Returns link markup when the insert-link keymap was pressed in an insertable editor.
fn insert_link_text(
    suggestion: &Suggestion,
    event: &ChooseEvent,
    settings: &Settings,
    active_leaf: Option<&EditorLeaf>,
) -> Option<String> {
    let opts = &settings.insert_link;
    if !opts.is_enabled || !opts.keymap.matches(&event.key, &event.modifiers) {
        return None;
    }
    let leaf = active_leaf?;
    if !opts.insertable_editor_types.contains(&leaf.view_type) {
        return None;
    }

    let file = suggestion.file()?;
    let heading = match suggestion {
        Suggestion::Heading(s) => Some(s.heading.heading.as_str()),
        Suggestion::Symbol(s) => match &s.item.symbol {
            Symbol::Heading(h) => Some(h.heading.as_str()),
            _ => None,
        },
        _ => None,
    };

    let alias = match suggestion {
        Suggestion::Alias(s) => Some(s.alias.as_str()),
        _ if opts.use_heading_as_alias && heading.is_some() => heading,
        _ if opts.use_basename_as_alias && file.link_path() != file.basename => {
            Some(file.basename.as_str())
        }
        _ => None,
    };

    let mut text = format!("[[{}", file.link_path());
    if let Some(sub) = heading {
        text.push('#');
        text.push_str(sub);
    }
    if let Some(alias) = alias {
        text.push('|');
        text.push_str(alias);
    }
    text.push_str("]]");
    Some(text)
}
