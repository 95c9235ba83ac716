//! Per-mode suggestion collection and the shared ranking pipeline.
//!
//! A collection pass has two halves. [`collect`] asks the mode's [`Collector`] for its
//! candidates: everything that matches the query, unfiltered and unsorted, in source order.
//! [`rank`] then filters the candidates through the active facets, resolves final scores,
//! sorts and truncates. Sessions cache the first half so that toggling a facet only reruns the
//! second.

mod bookmarks;
mod commands;
mod editors;
mod headings;
mod related;
mod standard;
mod symbols;
mod vaults;
mod workspaces;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt, mem,
    sync::Arc,
};

use qs_config::{Mode, ModeSet, PathFilter, Settings};
use qs_match::Matcher;
use tracing::{debug, warn};

use crate::{
    BookmarkItem, BookmarkKind, EditorLeaf, Flags, MatchType, PriorityResolver, Ranking,
    SourceError, Suggestion, VaultFile, VaultSource, apply_filters,
};

/// A predicate for a facet that no collector knows about.
pub type CustomPredicate = Arc<dyn Fn(&Suggestion) -> bool + Send + Sync>;

/// The file a symbol or related-items listing is built for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceContext {
    /// The source file.
    pub file: Option<VaultFile>,
    /// The editor showing it, if any.
    pub leaf: Option<EditorLeaf>,
    /// Zero-based cursor line in that editor.
    pub cursor_line: Option<usize>,
}

impl SourceContext {
    /// A context for a file with no editor.
    pub fn for_file(file: VaultFile) -> Self {
        Self {
            file: Some(file),
            ..Self::default()
        }
    }

    /// A context for an editor leaf.
    pub fn for_leaf(leaf: EditorLeaf, cursor_line: Option<usize>) -> Self {
        Self {
            file: leaf.file.clone(),
            leaf: Some(leaf),
            cursor_line,
        }
    }

    /// Resolves the source file, falling back to the host's active editor.
    fn resolve_file(
        &self,
        source: &dyn VaultSource,
        mode: Mode,
    ) -> Result<VaultFile, SourceError> {
        self.file
            .clone()
            .or_else(|| source.active_leaf().and_then(|leaf| leaf.file))
            .ok_or(SourceError::NoSourceFile(mode))
    }
}

/// Everything a collector reads during one pass.
#[derive(Clone, Copy)]
pub struct PassContext<'a> {
    /// The query with any trigger removed.
    pub query: &'a str,
    /// Settings snapshot for the pass.
    pub settings: &'a Settings,
    /// Data provider.
    pub source: &'a dyn VaultSource,
    /// Fuzzy matcher.
    pub matcher: &'a Matcher,
    /// Source file context.
    pub context: &'a SourceContext,
}

impl fmt::Debug for PassContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassContext")
            .field("query", &self.query)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl PassContext<'_> {
    /// Returns true when the query holds something to match.
    pub fn has_search_term(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Matches the query against a suggestion's own text.
    ///
    /// Without a search term every text passes with an unmatched ranking.
    pub fn match_primary(&self, text: &str) -> Option<Ranking> {
        self.match_as(text, MatchType::Primary)
    }

    /// Matches the query against `text`, reporting `match_type` on success.
    pub fn match_as(&self, text: &str, match_type: MatchType) -> Option<Ranking> {
        if !self.has_search_term() {
            return Some(Ranking::unmatched(text));
        }
        self.matcher
            .fuzzy_match(self.query, text)
            .map(|m| Ranking::matched(match_type, m, text))
    }

    /// Matches the query against a file: the basename first, then the full path.
    pub fn match_file(&self, file: &VaultFile) -> Option<Ranking> {
        if !self.has_search_term() {
            return Some(Ranking::unmatched(&file.basename));
        }
        self.match_as(&file.basename, MatchType::Basename)
            .or_else(|| self.match_as(&file.path, MatchType::Path))
    }

    /// Matches the query against a primary text, falling back to a file.
    pub fn match_text_or_file(&self, text: &str, file: Option<&VaultFile>) -> Option<Ranking> {
        if !self.has_search_term() {
            return Some(Ranking::unmatched(text));
        }
        self.match_primary(text)
            .or_else(|| file.and_then(|f| self.match_file(f)))
    }

    /// Compiles a glob option, logging and ignoring patterns that do not compile.
    pub fn path_filter(&self, patterns: &[String], key: &str) -> PathFilter {
        PathFilter::compile(patterns).unwrap_or_else(|e| {
            warn!(key, error = %e, "ignoring invalid path patterns");
            PathFilter::default()
        })
    }

    /// Paths of files open in editors. Empty when the provider has no editors.
    pub fn open_paths(&self) -> BTreeSet<String> {
        self.source
            .open_leaves()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|leaf| leaf.file.map(|f| f.path))
            .collect()
    }

    /// Paths of bookmarked files. Empty when the provider has no bookmarks.
    pub fn bookmarked_paths(&self) -> BTreeSet<String> {
        let mut paths = BTreeSet::new();
        let mut stack = self.source.bookmarks().unwrap_or_default();
        while let Some(item) = stack.pop() {
            if matches!(item.kind, BookmarkKind::File | BookmarkKind::Heading) {
                if let Some(path) = &item.path {
                    paths.insert(path.clone());
                }
            }
            stack.extend(item.children);
        }
        paths
    }

    /// Recently opened paths, most recent first. Empty when unavailable.
    pub fn recent_paths(&self) -> Vec<String> {
        self.source.recent_files().unwrap_or_default()
    }
}

/// Indicator lookups shared by file-based collectors.
#[derive(Debug, Default)]
pub struct FileFlags {
    /// Paths open in editors.
    open: BTreeSet<String>,
    /// Bookmarked paths.
    bookmarked: BTreeSet<String>,
    /// Recent paths.
    recent: BTreeSet<String>,
    /// Extensions listed as notes besides markdown.
    allowed_ext: BTreeSet<String>,
}

impl FileFlags {
    /// Loads the lookups for one pass.
    pub fn load(cx: &PassContext<'_>) -> Self {
        Self {
            open: cx.open_paths(),
            bookmarked: cx.bookmarked_paths(),
            recent: cx.recent_paths().into_iter().collect(),
            allowed_ext: cx
                .settings
                .standard
                .file_ext_allow_list
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Flags for one file.
    pub fn of(&self, file: &VaultFile) -> Flags {
        Flags {
            is_open_in_editor: self.open.contains(&file.path),
            is_bookmarked: self.bookmarked.contains(&file.path),
            is_recent: self.recent.contains(&file.path),
            is_attachment: !file.is_markdown() && !self.allowed_ext.contains(&file.extension),
        }
    }
}

/// A per-mode candidate source.
pub trait Collector: Sync {
    /// The mode this collector serves.
    fn mode(&self) -> Mode;

    /// Returns every candidate matching the query, in source order.
    fn candidates(&self, cx: &PassContext<'_>) -> Result<Vec<Suggestion>, SourceError>;

    /// Decides whether a suggestion passes one of this collector's facets.
    ///
    /// Returns `None` for facet ids the collector does not define.
    fn facet_matches(&self, _id: &str, _suggestion: &Suggestion) -> Option<bool> {
        None
    }
}

/// Returns the collector for a mode.
pub fn collector_for(mode: Mode) -> &'static dyn Collector {
    match mode {
        Mode::Standard => &standard::StandardCollector,
        Mode::EditorList => &editors::EditorCollector,
        Mode::SymbolList => &symbols::SymbolCollector,
        Mode::WorkspaceList => &workspaces::WorkspaceCollector,
        Mode::HeadingsList => &headings::HeadingsCollector,
        Mode::BookmarksList => &bookmarks::BookmarkCollector,
        Mode::CommandList => &commands::CommandCollector,
        Mode::RelatedItemsList => &related::RelatedCollector,
        Mode::VaultList => &vaults::VaultCollector,
    }
}

/// Collects the candidates for `mode`.
///
/// A provider failure is logged and yields an empty list; it never aborts the pass.
pub fn collect(mode: Mode, cx: &PassContext<'_>) -> Vec<Suggestion> {
    match collector_for(mode).candidates(cx) {
        Ok(candidates) => {
            debug!(%mode, count = candidates.len(), "collected candidates");
            candidates
        }
        Err(e) => {
            warn!(%mode, error = %e, "source unavailable, no suggestions for mode");
            Vec::new()
        }
    }
}

/// Facet predicates for one pass.
pub struct FacetFilter<'a> {
    /// Modes whose collectors define built-in facets.
    modes: &'a ModeSet,
    /// Ids of the active facets.
    active: &'a [String],
    /// Predicates for facets no collector defines.
    custom: &'a BTreeMap<String, CustomPredicate>,
}

impl fmt::Debug for FacetFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetFilter")
            .field("modes", &self.modes)
            .field("active", &self.active)
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a> FacetFilter<'a> {
    /// Creates a filter.
    pub fn new(
        modes: &'a ModeSet,
        active: &'a [String],
        custom: &'a BTreeMap<String, CustomPredicate>,
    ) -> Self {
        Self {
            modes,
            active,
            custom,
        }
    }

    /// Returns true if `suggestion` passes the facet `id`.
    ///
    /// Built-in predicates are tried first, then custom ones. A facet with no predicate lets
    /// everything through.
    pub fn passes(&self, id: &str, suggestion: &Suggestion) -> bool {
        self.modes
            .iter()
            .find_map(|mode| collector_for(mode).facet_matches(id, suggestion))
            .or_else(|| self.custom.get(id).map(|p| p(suggestion)))
            .unwrap_or(true)
    }

    /// Keeps the candidates passing every active facet.
    pub fn apply(&self, candidates: Vec<Suggestion>) -> Vec<Suggestion> {
        apply_filters(candidates, self.active, |id, s| self.passes(id, s))
    }
}

/// Filters, scores, sorts and truncates candidates.
///
/// Ordering is by match type, then final score, then non-downranked first; the sort is stable
/// so exact ties keep source order. Priority adjustments only apply to matched candidates, so
/// an unfiltered listing keeps the order its collector produced.
pub fn rank(
    candidates: Vec<Suggestion>,
    filter: &FacetFilter<'_>,
    settings: &Settings,
) -> Vec<Suggestion> {
    let limit = settings.general.limit;
    if limit == 0 {
        return Vec::new();
    }

    let resolver = PriorityResolver::new(&settings.priority);
    let mut ranked = filter.apply(candidates);
    for suggestion in &mut ranked {
        if suggestion.match_type() != MatchType::None {
            resolver.apply(suggestion);
        }
    }

    ranked.sort_by(|a, b| {
        let (ra, rb) = (a.ranking(), b.ranking());
        rb.match_type
            .cmp(&ra.match_type)
            .then_with(|| rb.score.total_cmp(&ra.score))
            .then_with(|| ra.downranked.cmp(&rb.downranked))
    });
    ranked.truncate(limit);
    ranked
}

/// Flattens a bookmark tree depth first, pairing each item with its slash-joined path.
pub fn flatten_bookmarks(items: Vec<BookmarkItem>) -> Vec<(BookmarkItem, String)> {
    /// Appends `items` below `prefix`.
    fn walk(items: Vec<BookmarkItem>, prefix: &str, out: &mut Vec<(BookmarkItem, String)>) {
        for mut item in items {
            let path = if prefix.is_empty() {
                item.title.clone()
            } else {
                format!("{prefix}/{}", item.title)
            };
            let children = mem::take(&mut item.children);
            out.push((item, path.clone()));
            walk(children, &path, out);
        }
    }

    let mut out = Vec::new();
    walk(items, "", &mut out);
    out
}
