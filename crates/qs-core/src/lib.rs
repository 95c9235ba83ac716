//! Suggestion ranking and mode routing for the qs quick switcher.
//!
//! The switcher has several modes (files, open editors, symbols of one file, headings,
//! bookmarks, commands, related items, workspaces, vaults). For a typed query this crate
//! decides which modes are active, collects candidates from a [`VaultSource`], scores them
//! with the fuzzy matcher, filters them through the active [`Facet`]s, adjusts scores with
//! the [`PriorityResolver`] and sorts them.
//!
//! Most hosts drive a [`Session`]: feed it keystrokes, read [`Session::suggestions`], and
//! turn a chosen suggestion into an [`Action`]. The pieces are public for hosts that need to
//! run passes themselves:
//!
//! ```text
//! input text ──parse_input──▶ ParsedInput ──ModeController──▶ active modes
//!                                   │
//!                                   ▼
//!                 collect (per mode) ──▶ candidates ──rank──▶ published list
//!                                                   ▲
//!                                FacetFilter + PriorityResolver
//! ```

#![warn(missing_docs)]

mod action;
mod collect;
mod controller;
mod debounce;
mod display;
mod error;
mod facet;
mod input;
mod priority;
mod session;
mod source;
mod suggestion;

pub use action::{Action, ChooseEvent, dispatch};
pub use collect::{
    Collector, CustomPredicate, FacetFilter, FileFlags, PassContext, SourceContext, collect,
    collector_for, flatten_bookmarks, rank,
};
pub use controller::{ModeController, SessionOpts, Transition, parse_mode};
pub use debounce::Debouncer;
pub use display::{file_title, format_path};
pub use error::SourceError;
pub use facet::{Facet, FacetManager, apply_filters};
pub use input::{ParsedInput, PrefixQuery, parse_input, trigger_for};
pub use priority::PriorityResolver;
pub use session::{PassRequest, PassResult, Session};
pub use source::{
    BookmarkItem, BookmarkKind, CalloutCache, CanvasNode, Command, EditorLeaf, FileMetadata,
    HeadingCache, LinkCache, LinkMap, TagCache, VaultEntry, VaultFile, VaultSource,
    WorkspaceEntry,
};
pub use suggestion::{
    AliasSuggestion, BookmarkSuggestion, CommandSuggestion, EditorSuggestion, FileSuggestion,
    Flags, HeadingSuggestion, MatchType, Ranking, RelatedItem, RelatedItemSuggestion,
    Suggestion, Symbol, SymbolInfo, SymbolSuggestion, UnresolvedSuggestion, VaultSuggestion,
    WorkspaceSuggestion,
};
