//! Sessions: one open-to-close interaction with the switcher.
//!
//! A [`Session`] owns the mode controller, the facet working copy, the per-mode candidate
//! cache and the published suggestion list. Every query change bumps a generation counter;
//! a [`PassRequest`] carries the generation it was issued for, and [`Session::commit`] drops
//! results whose generation is no longer current, so the last query always wins.
//!
//! Passes can run detached from the session. A host that awaits providers elsewhere takes
//! the request from [`Session::set_query`], executes it, and commits the result when it is
//! ready. [`Session::on_query_change`] and [`Session::poll`] do both steps inline.

use std::{
    collections::BTreeMap,
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use qs_config::{FacetDefinition, Mode, ModeSet, Modifier, Settings};
use qs_match::Matcher;
use tracing::{debug, trace};

use crate::{
    Action, ChooseEvent, CustomPredicate, Debouncer, EditorLeaf, FacetFilter, FacetManager,
    ModeController, ParsedInput, PassContext, SessionOpts, SourceContext, Suggestion,
    VaultSource, action::dispatch, collect, parse_input, rank,
};

/// A collection pass detached from its session.
#[derive(Debug, Clone)]
pub struct PassRequest {
    /// Query generation the pass was issued for.
    pub generation: u64,
    /// Settings snapshot for the pass.
    pub settings: Arc<Settings>,
    /// The parsed input.
    pub parsed: ParsedInput,
    /// Source context for symbol and related listings.
    pub context: SourceContext,
}

/// The outcome of a pass, ready to be committed.
#[derive(Debug, Clone)]
pub struct PassResult {
    /// Query generation the pass was issued for.
    pub generation: u64,
    /// Unfiltered candidates per contributing mode.
    pub candidates: BTreeMap<Mode, Vec<Suggestion>>,
    /// The context the shown mode was collected for. For embedded queries this is the top
    /// result of the prefix query.
    pub context: SourceContext,
    /// Time spent collecting.
    pub elapsed: Duration,
}

impl PassRequest {
    /// Runs the pass against `source`.
    ///
    /// For an embedded query the prefix mode runs first and its top result becomes the
    /// source of the shown mode. When the prefix query matches nothing the shown mode has no
    /// source and yields nothing.
    pub fn execute(&self, source: &dyn VaultSource) -> PassResult {
        let start = Instant::now();
        let matcher = Matcher::new();
        let mut context = self.context.clone();
        let mut candidates = BTreeMap::new();

        let mut has_source = true;
        if let Some(prefix) = &self.parsed.prefix {
            let cx = PassContext {
                query: &prefix.query,
                settings: &self.settings,
                source,
                matcher: &matcher,
                context: &context,
            };
            let found = collect(prefix.mode, &cx);
            let modes = ModeSet::single(prefix.mode);
            let custom = BTreeMap::new();
            let ranked = rank(
                found.clone(),
                &FacetFilter::new(&modes, &[], &custom),
                &self.settings,
            );
            match ranked.first().and_then(source_context_of) {
                Some(top) => context = top,
                None => has_source = false,
            }
            candidates.insert(prefix.mode, found);
        }

        let shown = if has_source {
            let cx = PassContext {
                query: &self.parsed.query,
                settings: &self.settings,
                source,
                matcher: &matcher,
                context: &context,
            };
            collect(self.parsed.mode, &cx)
        } else {
            debug!(mode = %self.parsed.mode, "prefix query matched nothing, no source");
            Vec::new()
        };
        candidates.insert(self.parsed.mode, shown);

        let elapsed = start.elapsed();
        debug!(
            generation = self.generation,
            mode = %self.parsed.mode,
            ?elapsed,
            "pass complete"
        );
        PassResult {
            generation: self.generation,
            candidates,
            context,
            elapsed,
        }
    }
}

/// The source context a chosen or top-ranked suggestion supplies, if any.
fn source_context_of(suggestion: &Suggestion) -> Option<SourceContext> {
    match suggestion {
        Suggestion::Editor(s) if s.leaf.file.is_some() => {
            Some(SourceContext::for_leaf(s.leaf.clone(), None))
        }
        other => other.file().cloned().map(SourceContext::for_file),
    }
}

/// A switcher session over a data provider.
pub struct Session<S> {
    /// Data provider.
    source: S,
    /// Settings snapshot shared with passes.
    settings: Arc<Settings>,
    /// Mode state machine.
    controller: ModeController,
    /// Facet working copy.
    facets: FacetManager,
    /// Predicates for registered facets.
    custom: BTreeMap<String, CustomPredicate>,
    /// Current query generation.
    generation: u64,
    /// Last input text seen.
    input: Option<String>,
    /// Parse of `input`.
    parsed: ParsedInput,
    /// Unfiltered candidates of the last committed pass, per mode.
    cache: BTreeMap<Mode, Vec<Suggestion>>,
    /// Ranked suggestions shown to the user.
    published: Arc<Vec<Suggestion>>,
    /// Index of the selected suggestion.
    selected: Option<usize>,
    /// Context supplied when the session opened or by a chosen suggestion.
    base_context: SourceContext,
    /// Context of the last committed pass.
    context: SourceContext,
    /// Pending debounced pass.
    debouncer: Debouncer<PassRequest>,
}

impl<S> fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("generation", &self.generation)
            .field("parsed", &self.parsed)
            .field("cached", &self.cache.keys().collect::<Vec<_>>())
            .field("published", &self.published.len())
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl<S: VaultSource> Session<S> {
    /// Creates a session in standard mode with no query.
    pub fn new(source: S, settings: Arc<Settings>) -> Self {
        let controller = ModeController::new();
        let mut facets = FacetManager::new(&settings.facets);
        facets.set_modes(controller.modes());
        let debouncer = Debouncer::new(Duration::from_millis(settings.headings.debounce_ms));
        Self {
            source,
            settings,
            controller,
            facets,
            custom: BTreeMap::new(),
            generation: 0,
            input: None,
            parsed: ParsedInput::standard(""),
            cache: BTreeMap::new(),
            published: Arc::new(Vec::new()),
            selected: None,
            base_context: SourceContext::default(),
            context: SourceContext::default(),
            debouncer,
        }
    }

    /// Opens the switcher in `mode` and runs the first pass immediately.
    ///
    /// Returns the text the input box should be prefilled with.
    pub fn open(&mut self, mode: Mode, opts: &SessionOpts, context: SourceContext) -> String {
        self.base_context = context;
        let text = self.controller.open(mode, opts, &self.settings);
        self.input = None;
        if let Some(request) = self.set_query(&text) {
            self.debouncer.cancel();
            let result = request.execute(&self.source);
            self.commit(result);
        }
        text
    }

    /// Records new input text and returns the pass to run for it.
    ///
    /// Returns `None` when the text did not change. A mode transition discards every cached
    /// candidate list and the published list, and updates facet availability.
    pub fn set_query(&mut self, text: &str) -> Option<PassRequest> {
        if self.input.as_deref() == Some(text) {
            return None;
        }
        self.input = Some(text.to_string());
        self.generation += 1;
        self.parsed = parse_input(text, &self.settings);

        if self.controller.apply(&self.parsed).is_changed() {
            let dropped: Vec<Mode> = self.cache.keys().copied().collect();
            debug!(?dropped, "discarding cached candidates");
            self.cache.clear();
            self.published = Arc::new(Vec::new());
            self.selected = None;
            self.facets.set_modes(self.controller.modes());
        }

        Some(PassRequest {
            generation: self.generation,
            settings: Arc::clone(&self.settings),
            parsed: self.parsed.clone(),
            context: self.context_for(&self.parsed),
        })
    }

    /// Handles a keystroke.
    ///
    /// Heading searches are debounced and run from [`Session::poll`]; everything else runs
    /// now. Returns true if the published list was replaced.
    pub fn on_query_change(&mut self, text: &str, now: Instant) -> bool {
        let Some(request) = self.set_query(text) else {
            return false;
        };
        if request.parsed.modes.contains(Mode::HeadingsList)
            && !self.debouncer.delay().is_zero()
        {
            self.debouncer.schedule(now, request);
            return false;
        }
        self.debouncer.cancel();
        let result = request.execute(&self.source);
        self.commit(result)
    }

    /// Runs a debounced pass whose quiet period has elapsed.
    ///
    /// Returns true if the published list was replaced.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.ready(now) {
            Some(request) => {
                let result = request.execute(&self.source);
                self.commit(result)
            }
            None => false,
        }
    }

    /// Returns true while a debounced pass is waiting.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Commits a pass result, unless a newer query has been typed since it was issued.
    ///
    /// Returns true if the published list was replaced.
    pub fn commit(&mut self, result: PassResult) -> bool {
        if result.generation != self.generation {
            trace!(
                stale = result.generation,
                current = self.generation,
                "discarding stale pass"
            );
            return false;
        }
        self.cache = result.candidates;
        self.context = result.context;
        self.publish();
        true
    }

    /// Re-ranks the cached candidates for the shown mode and replaces the published list.
    fn publish(&mut self) {
        let candidates = self
            .cache
            .get(&self.controller.mode())
            .cloned()
            .unwrap_or_default();
        let active = self.facets.active_ids();
        let filter = FacetFilter::new(self.controller.modes(), &active, &self.custom);
        let ranked = rank(candidates, &filter, &self.settings);
        self.selected = (!ranked.is_empty()).then_some(0);
        self.published = Arc::new(ranked);
    }

    /// Toggles a facet and re-ranks from the cache without querying the provider.
    ///
    /// Returns false if the facet is unknown or unavailable in the active modes.
    pub fn toggle_facet(&mut self, id: &str) -> bool {
        if !self.facets.toggle(id) {
            return false;
        }
        self.publish();
        true
    }

    /// Switches every available facet off. Returns true if any was on.
    pub fn reset_facets(&mut self) -> bool {
        if !self.facets.reset() {
            return false;
        }
        self.publish();
        true
    }

    /// Handles a facet hotkey: the reset key or a facet's key.
    ///
    /// Returns true if the published list changed.
    pub fn on_facet_key(&mut self, key: &str, modifiers: &[Modifier]) -> bool {
        if self.facets.is_reset_key(key, modifiers) {
            return self.reset_facets();
        }
        match self.facets.facet_for_key(key, modifiers).map(str::to_string) {
            Some(id) => self.toggle_facet(&id),
            None => false,
        }
    }

    /// Adds a facet with its predicate.
    pub fn register_facet(&mut self, def: FacetDefinition, predicate: CustomPredicate) {
        self.custom.insert(def.id.clone(), predicate);
        self.facets.register(def);
        self.publish();
    }

    /// The facet working copy.
    pub fn facets(&self) -> &FacetManager {
        &self.facets
    }

    /// The published suggestions.
    pub fn suggestions(&self) -> Arc<Vec<Suggestion>> {
        Arc::clone(&self.published)
    }

    /// Moves the selection. Returns false if `index` is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.published.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    /// The selected suggestion.
    pub fn selected(&self) -> Option<&Suggestion> {
        self.selected.and_then(|i| self.published.get(i))
    }

    /// Chooses the suggestion at `index` and returns the action for the host.
    ///
    /// A chosen file or editor becomes the source for later symbol and related listings.
    pub fn choose(&mut self, index: usize, event: &ChooseEvent) -> Option<Action> {
        let suggestion = self.published.get(index)?.clone();
        let active_leaf = self.source.active_leaf();
        let action = dispatch(&suggestion, event, &self.settings, active_leaf.as_ref());
        if !matches!(action, Action::InsertLink { .. }) {
            if let Some(context) = source_context_of(&suggestion) {
                self.base_context = context;
            }
        }
        debug!(kind = suggestion.kind(), ?action, "chose suggestion");
        Some(action)
    }

    /// Settings carrying the session's facet state, for the explicit save path.
    pub fn save_facets(&self) -> Settings {
        let mut settings = Settings::clone(&self.settings);
        settings.facets = self.facets.snapshot();
        settings
    }

    /// Mode whose results are shown.
    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    /// Modes contributing to the results.
    pub fn modes(&self) -> &ModeSet {
        self.controller.modes()
    }

    /// The parsed input.
    pub fn parsed(&self) -> &ParsedInput {
        &self.parsed
    }

    /// Current query generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Modes with cached candidates.
    pub fn cached_modes(&self) -> Vec<Mode> {
        self.cache.keys().copied().collect()
    }

    /// Context of the last committed pass.
    pub fn context(&self) -> &SourceContext {
        &self.context
    }

    /// The data provider.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The settings snapshot.
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Picks the source context for a pass.
    fn context_for(&self, parsed: &ParsedInput) -> SourceContext {
        if self.controller.wants_active_editor(parsed) || self.base_context.file.is_none() {
            if let Some(context) = self.active_editor_context() {
                return context;
            }
        }
        self.base_context.clone()
    }

    /// Context for the host's active editor.
    ///
    /// When the active view is a reference view (backlinks, outline and the like) the most
    /// recently active editor showing a file is used instead.
    fn active_editor_context(&self) -> Option<SourceContext> {
        let reference = &self.settings.editors.reference_view_types;
        let is_reference = |leaf: &EditorLeaf| reference.contains(&leaf.view_type);

        let active = self.source.active_leaf()?;
        let leaf = if is_reference(&active) {
            self.source
                .open_leaves()
                .unwrap_or_default()
                .into_iter()
                .filter(|l| !is_reference(l) && l.file.is_some())
                .max_by_key(|l| l.last_active)?
        } else {
            active
        };
        leaf.file.as_ref()?;

        let cursor = self
            .base_context
            .leaf
            .as_ref()
            .filter(|l| l.id == leaf.id)
            .and(self.base_context.cursor_line);
        Some(SourceContext::for_leaf(leaf, cursor))
    }
}
