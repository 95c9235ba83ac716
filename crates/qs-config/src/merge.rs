//! Settings merging.
//!
//! Layers parsed `RawSettings` on top of the defaults. Values that cannot be used are dropped
//! with a `ConfigWarning`, leaving the value from the next lower layer (ultimately the default)
//! in place.

use std::{path::PathBuf, str::FromStr};

use crate::{
    ConfigWarning, FacetDefinition, Hotkey, MatchPriorityData, Mode, ModeSet, Modifier, Settings,
    TitleSource, UnknownVariant,
    parse::{
        RawEditors, RawFacet, RawFacets, RawGeneral, RawHeadings, RawHotkey, RawInsertLink,
        RawPriority, RawPriorityValue, RawRelated, RawSettings, RawStandard, RawSymbols,
        RawTriggers,
    },
    patterns::compile_glob,
};

/// A parsed settings file with its source path.
#[derive(Debug, Clone)]
pub struct ParsedSettings {
    /// Path to the file.
    pub path: PathBuf,
    /// Parsed contents.
    pub settings: RawSettings,
}

/// Merges settings files into effective settings.
///
/// Files are given highest precedence first; for every field the first file that sets a
/// usable value wins.
pub fn merge_settings(configs: &[ParsedSettings]) -> (Settings, Vec<ConfigWarning>) {
    let mut merger = Merger::default();
    let mut result = Settings::default();

    // Lowest precedence first so higher layers overwrite.
    for parsed in configs.iter().rev() {
        merger.apply(&mut result, &parsed.settings);
    }

    (result, merger.warnings)
}

/// Accumulates warnings while applying layers.
#[derive(Default)]
struct Merger {
    /// Warnings so far.
    warnings: Vec<ConfigWarning>,
}

impl Merger {
    /// Applies every section of one layer.
    fn apply(&mut self, result: &mut Settings, raw: &RawSettings) {
        if let Some(general) = &raw.general {
            self.apply_general(result, general);
        }
        if let Some(triggers) = &raw.triggers {
            self.apply_triggers(result, triggers);
        }
        if let Some(standard) = &raw.standard {
            self.apply_standard(result, standard);
        }
        if let Some(editors) = &raw.editors {
            apply_editors(result, editors);
        }
        if let Some(symbols) = &raw.symbols {
            self.apply_symbols(result, symbols);
        }
        if let Some(headings) = &raw.headings {
            self.apply_headings(result, headings);
        }
        if let Some(related) = &raw.related {
            self.apply_related(result, related);
        }
        if let Some(commands) = &raw.commands
            && let Some(hotkey) = &commands.toggle_pinned_keys
        {
            result.commands.toggle_pinned_keys = self.hotkey(
                "commands.toggle_pinned_keys",
                hotkey,
                &result.commands.toggle_pinned_keys,
            );
        }
        if let Some(insert_link) = &raw.insert_link {
            self.apply_insert_link(result, insert_link);
        }
        if let Some(priority) = &raw.priority {
            self.apply_priority(result, priority);
        }
        if let Some(facets) = &raw.facets {
            self.apply_facets(result, facets);
        }
    }

    /// Applies `[general]`.
    fn apply_general(&mut self, result: &mut Settings, raw: &RawGeneral) {
        let general = &mut result.general;
        if let Some(v) = raw.limit
            && let Some(limit) = self.non_negative("general.limit", v)
        {
            general.limit = limit;
        }
        if let Some(v) = raw.on_open_prefer_new_tab {
            general.on_open_prefer_new_tab = v;
        }
        if let Some(v) = &raw.path_display_format
            && let Some(format) = self.variant("general.path_display_format", v)
        {
            general.path_display_format = format;
        }
        if let Some(v) = raw.hide_path_if_root {
            general.hide_path_if_root = v;
        }
        if let Some(v) = &raw.preferred_source_for_title {
            match v.to_ascii_lowercase().as_str() {
                "default" | "basename" => general.preferred_source_for_title = TitleSource::Default,
                "h1" => general.preferred_source_for_title = TitleSource::H1,
                _ => self.invalid(
                    "general.preferred_source_for_title",
                    v,
                    "expected 'default' or 'h1'",
                ),
            }
        }
        if let Some(v) = &raw.escape_cmd_char {
            if v.chars().count() == 1 {
                general.escape_cmd_char.clone_from(v);
            } else {
                self.invalid("general.escape_cmd_char", v, "must be a single character");
            }
        }
        if let Some(v) = &raw.enabled_ribbon_commands {
            general.enabled_ribbon_commands = self.variants("general.enabled_ribbon_commands", v);
        }
    }

    /// Applies `[triggers]`. Empty triggers are rejected.
    fn apply_triggers(&mut self, result: &mut Settings, raw: &RawTriggers) {
        let t = &mut result.triggers;
        let fields = [
            ("editor_list", &raw.editor_list, &mut t.editor_list),
            ("symbol_list", &raw.symbol_list, &mut t.symbol_list),
            (
                "symbol_list_active_editor",
                &raw.symbol_list_active_editor,
                &mut t.symbol_list_active_editor,
            ),
            ("workspace_list", &raw.workspace_list, &mut t.workspace_list),
            ("headings_list", &raw.headings_list, &mut t.headings_list),
            ("bookmarks_list", &raw.bookmarks_list, &mut t.bookmarks_list),
            ("command_list", &raw.command_list, &mut t.command_list),
            ("vault_list", &raw.vault_list, &mut t.vault_list),
            (
                "related_items_list",
                &raw.related_items_list,
                &mut t.related_items_list,
            ),
            (
                "related_items_list_active_editor",
                &raw.related_items_list_active_editor,
                &mut t.related_items_list_active_editor,
            ),
        ];

        for (name, value, target) in fields {
            let Some(value) = value else { continue };
            if value.trim().is_empty() {
                self.warnings.push(ConfigWarning::InvalidValue {
                    key: format!("triggers.{name}"),
                    value: value.clone(),
                    reason: "trigger must not be empty".to_string(),
                });
            } else {
                target.clone_from(value);
            }
        }
    }

    /// Applies `[standard]`.
    fn apply_standard(&mut self, result: &mut Settings, raw: &RawStandard) {
        let s = &mut result.standard;
        if let Some(v) = raw.show_aliases {
            s.show_aliases = v;
        }
        if let Some(v) = raw.show_existing_only {
            s.show_existing_only = v;
        }
        if let Some(v) = &raw.exclude_folders {
            s.exclude_folders = self.patterns("standard.exclude_folders", v);
        }
        if let Some(v) = &raw.ignored_paths {
            s.ignored_paths = self.patterns("standard.ignored_paths", v);
        }
        if let Some(v) = raw.exclude_ignored_files {
            s.exclude_ignored_files = v;
        }
        if let Some(v) = &raw.file_ext_allow_list {
            s.file_ext_allow_list = v
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(v) = raw.max_recent_file_suggestions_on_init
            && let Some(n) = self.non_negative("standard.max_recent_file_suggestions_on_init", v)
        {
            s.max_recent_file_suggestions_on_init = n;
        }
        if let Some(v) = raw.override_standard_mode_behaviors {
            s.override_standard_mode_behaviors = v;
        }
    }

    /// Applies `[symbols]`.
    fn apply_symbols(&mut self, result: &mut Settings, raw: &RawSymbols) {
        let s = &mut result.symbols;
        if let Some(v) = &raw.enabled_types {
            s.enabled_types = self.variants("symbols.enabled_types", v);
        }
        if let Some(v) = &raw.exclude_link_sub_types {
            s.exclude_link_sub_types = self.variants("symbols.exclude_link_sub_types", v);
        }
        if let Some(v) = raw.symbols_in_line_order {
            s.symbols_in_line_order = v;
        }
        if let Some(v) = raw.select_nearest_heading {
            s.select_nearest_heading = v;
        }
        if let Some(v) = raw.always_new_tab_for_symbols {
            s.always_new_tab_for_symbols = v;
        }
    }

    /// Applies `[headings]`.
    fn apply_headings(&mut self, result: &mut Settings, raw: &RawHeadings) {
        let h = &mut result.headings;
        if let Some(v) = raw.should_search_headings {
            h.should_search_headings = v;
        }
        if let Some(v) = raw.search_all_headings {
            h.search_all_headings = v;
        }
        if let Some(v) = raw.strict_headings_only {
            h.strict_headings_only = v;
        }
        if let Some(v) = raw.should_search_filenames {
            h.should_search_filenames = v;
        }
        if let Some(v) = raw.should_search_bookmarks {
            h.should_search_bookmarks = v;
        }
        if let Some(v) = raw.should_search_recent_files {
            h.should_search_recent_files = v;
        }
        if let Some(v) = raw.debounce_ms
            && let Some(ms) = self.non_negative("headings.debounce_ms", v)
        {
            h.debounce_ms = ms as u64;
        }
    }

    /// Applies `[related]`.
    fn apply_related(&mut self, result: &mut Settings, raw: &RawRelated) {
        let r = &mut result.related;
        if let Some(v) = &raw.enabled_types {
            r.enabled_types = self.variants("related.enabled_types", v);
        }
        if let Some(v) = &raw.exclude_folders {
            r.exclude_folders = self.patterns("related.exclude_folders", v);
        }
        if let Some(v) = raw.exclude_open_files {
            r.exclude_open_files = v;
        }
    }

    /// Applies `[insert_link]`.
    fn apply_insert_link(&mut self, result: &mut Settings, raw: &RawInsertLink) {
        let i = &mut result.insert_link;
        if let Some(v) = raw.is_enabled {
            i.is_enabled = v;
        }
        if let Some(v) = &raw.insertable_editor_types {
            i.insertable_editor_types.clone_from(v);
        }
        if let Some(v) = raw.use_basename_as_alias {
            i.use_basename_as_alias = v;
        }
        if let Some(v) = raw.use_heading_as_alias {
            i.use_heading_as_alias = v;
        }
        if let Some(v) = &raw.keymap {
            i.keymap = self.hotkey("insert_link.keymap", v, &i.keymap);
        }
    }

    /// Applies `[priority]`. Adjustments merge per key.
    fn apply_priority(&mut self, result: &mut Settings, raw: &RawPriority) {
        let p = &mut result.priority;
        if let Some(v) = raw.is_enabled {
            p.is_enabled = v;
        }
        if let Some(adjustments) = &raw.adjustments {
            for (key, value) in adjustments {
                if let Some(data) =
                    self.adjustment("priority.adjustments", key, value, p.adjustments.get(key))
                {
                    p.adjustments.insert(key.clone(), data);
                }
            }
        }
        if let Some(adjustments) = &raw.file_ext_adjustments {
            for (ext, value) in adjustments {
                let ext = ext.trim_start_matches('.').to_ascii_lowercase();
                if let Some(data) = self.adjustment(
                    "priority.file_ext_adjustments",
                    &ext,
                    value,
                    p.file_ext_adjustments.get(&ext),
                ) {
                    p.file_ext_adjustments.insert(ext, data);
                }
            }
        }
    }

    /// Applies `[facets]`.
    fn apply_facets(&mut self, result: &mut Settings, raw: &RawFacets) {
        let f = &mut result.facets;
        if let Some(v) = &raw.reset_key {
            if v.is_empty() {
                self.invalid("facets.reset_key", v, "key must not be empty");
            } else {
                f.reset_key.clone_from(v);
            }
        }
        if let Some(v) = &raw.reset_modifiers {
            f.reset_modifiers = Some(self.variants("facets.reset_modifiers", v));
        }
        if let Some(v) = &raw.key_list {
            f.key_list = v.iter().filter(|k| !k.is_empty()).cloned().collect();
        }
        if let Some(v) = &raw.modifiers {
            f.modifiers = self.variants("facets.modifiers", v);
        }
        if let Some(v) = raw.should_reset_active_facets {
            f.should_reset_active_facets = v;
        }
        if let Some(v) = raw.should_show_facet_instructions {
            f.should_show_facet_instructions = v;
        }
        if let Some(v) = &raw.exclusive_groups {
            f.exclusive_groups = v.iter().filter(|g| g.len() > 1).cloned().collect();
        }
        if let Some(list) = &raw.facet_list {
            for (id, raw_facet) in list {
                if let Some(facet) = f.facet_list.get(id).cloned() {
                    let updated = self.apply_facet(facet, raw_facet);
                    f.facet_list.insert(id.clone(), updated);
                } else if let Some(facet) = self.custom_facet(id, raw_facet) {
                    f.facet_list.insert(id.clone(), facet);
                }
            }
        }
    }

    /// Applies an override to a known facet.
    fn apply_facet(&mut self, mut facet: FacetDefinition, raw: &RawFacet) -> FacetDefinition {
        if let Some(v) = raw.is_active {
            facet.is_active = v;
        }
        if let Some(v) = &raw.label {
            facet.label.clone_from(v);
        }
        if let Some(v) = &raw.key {
            facet.key = (!v.is_empty()).then(|| v.clone());
        }
        if let Some(v) = &raw.modifiers {
            let key = format!("facets.facet_list.{}.modifiers", facet.id);
            facet.modifiers = Some(self.variants(&key, v));
        }
        if let Some(v) = &raw.modes {
            let key = format!("facets.facet_list.{}.modes", facet.id);
            let modes: ModeSet = self.variants::<Mode>(&key, v).into_iter().collect();
            if !modes.is_empty() {
                facet.modes = modes;
            }
        }
        facet
    }

    /// Creates a facet that is not built in. It must name at least one mode.
    fn custom_facet(&mut self, id: &str, raw: &RawFacet) -> Option<FacetDefinition> {
        let key = format!("facets.facet_list.{id}");
        let modes: ModeSet = match &raw.modes {
            Some(v) => self
                .variants::<Mode>(&format!("{key}.modes"), v)
                .into_iter()
                .collect(),
            None => ModeSet::new(),
        };
        if modes.is_empty() {
            self.warnings.push(ConfigWarning::UnknownFacet {
                key,
                id: id.to_string(),
            });
            return None;
        }
        let facet = FacetDefinition {
            id: id.to_string(),
            modes,
            label: id.to_string(),
            is_active: false,
            key: None,
            modifiers: None,
        };
        Some(self.apply_facet(facet, raw))
    }

    /// Converts a signed value to `usize`, rejecting negatives.
    fn non_negative(&mut self, key: &str, value: i64) -> Option<usize> {
        match usize::try_from(value) {
            Ok(v) => Some(v),
            Err(_) => {
                self.invalid(key, &value.to_string(), "must not be negative");
                None
            }
        }
    }

    /// Parses one enumerated value.
    fn variant<T>(&mut self, key: &str, value: &str) -> Option<T>
    where
        T: FromStr<Err = UnknownVariant>,
    {
        match value.parse() {
            Ok(v) => Some(v),
            Err(e) => {
                self.invalid(key, value, &e.to_string());
                None
            }
        }
    }

    /// Parses a list of enumerated values, dropping the ones that do not parse.
    fn variants<T>(&mut self, key: &str, values: &[String]) -> Vec<T>
    where
        T: FromStr<Err = UnknownVariant> + PartialEq,
    {
        let mut out = Vec::new();
        for value in values {
            if let Some(v) = self.variant(key, value)
                && !out.contains(&v)
            {
                out.push(v);
            }
        }
        out
    }

    /// Keeps the glob patterns that compile.
    fn patterns(&mut self, key: &str, patterns: &[String]) -> Vec<String> {
        let mut out = Vec::new();
        for pattern in patterns {
            match compile_glob(pattern) {
                Ok(_) => out.push(pattern.clone()),
                Err(e) => self.warnings.push(ConfigWarning::InvalidPattern {
                    key: key.to_string(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                }),
            }
        }
        out
    }

    /// Merges a hotkey field by field over `current`.
    fn hotkey(&mut self, key: &str, raw: &RawHotkey, current: &Hotkey) -> Hotkey {
        let mut hotkey = current.clone();
        if let Some(k) = &raw.key {
            if k.is_empty() {
                self.invalid(&format!("{key}.key"), k, "key must not be empty");
            } else {
                hotkey.key.clone_from(k);
            }
        }
        if let Some(m) = &raw.modifiers {
            hotkey.modifiers = self.variants::<Modifier>(&format!("{key}.modifiers"), m);
        }
        hotkey
    }

    /// Builds an adjustment entry, keeping an existing label when none is given.
    fn adjustment(
        &mut self,
        section: &str,
        key: &str,
        raw: &RawPriorityValue,
        existing: Option<&MatchPriorityData>,
    ) -> Option<MatchPriorityData> {
        let value = raw.value();
        if !value.is_finite() {
            self.invalid(&format!("{section}.{key}"), &value.to_string(), "must be finite");
            return None;
        }

        let mut data = existing
            .cloned()
            .unwrap_or_else(|| MatchPriorityData::labeled(key, None));
        data.value = value;
        if let RawPriorityValue::Data { label, desc, .. } = raw {
            if let Some(label) = label {
                data.label.clone_from(label);
            }
            if desc.is_some() {
                data.desc.clone_from(desc);
            }
        }
        Some(data)
    }

    /// Records an invalid value.
    fn invalid(&mut self, key: &str, value: &str, reason: &str) {
        self.warnings.push(ConfigWarning::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        });
    }
}

/// Applies `[editors]`.
fn apply_editors(result: &mut Settings, raw: &RawEditors) {
    let e = &mut result.editors;
    if let Some(v) = &raw.exclude_view_types {
        e.exclude_view_types.clone_from(v);
    }
    if let Some(v) = &raw.include_side_panel_view_types {
        e.include_side_panel_view_types.clone_from(v);
    }
    if let Some(v) = &raw.reference_view_types {
        e.reference_view_types.clone_from(v);
    }
    if let Some(v) = raw.order_by_access_time {
        e.order_by_access_time = v;
    }
}
