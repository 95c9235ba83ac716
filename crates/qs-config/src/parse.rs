//! Settings file parsing.
//!
//! Parses individual `.qs.toml` files into `RawSettings`. Every field is optional so partial
//! files can be layered, and enumerated values are kept as strings so a bad value can be
//! reported and defaulted instead of rejecting the whole file.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Settings as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// When true, stop discovery here and ignore parent and global files.
    pub root: Option<bool>,
    /// `[general]`
    pub general: Option<RawGeneral>,
    /// `[triggers]`
    pub triggers: Option<RawTriggers>,
    /// `[standard]`
    pub standard: Option<RawStandard>,
    /// `[editors]`
    pub editors: Option<RawEditors>,
    /// `[symbols]`
    pub symbols: Option<RawSymbols>,
    /// `[headings]`
    pub headings: Option<RawHeadings>,
    /// `[related]`
    pub related: Option<RawRelated>,
    /// `[commands]`
    pub commands: Option<RawCommands>,
    /// `[insert_link]`
    pub insert_link: Option<RawInsertLink>,
    /// `[priority]`
    pub priority: Option<RawPriority>,
    /// `[facets]`
    pub facets: Option<RawFacets>,
}

/// Raw `[general]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGeneral {
    /// Signed so a negative value can be reported.
    pub limit: Option<i64>,
    /// Overrides `on_open_prefer_new_tab`.
    pub on_open_prefer_new_tab: Option<bool>,
    /// Overrides `path_display_format`.
    pub path_display_format: Option<String>,
    /// Overrides `hide_path_if_root`.
    pub hide_path_if_root: Option<bool>,
    /// Overrides `preferred_source_for_title`.
    pub preferred_source_for_title: Option<String>,
    /// Overrides `escape_cmd_char`.
    pub escape_cmd_char: Option<String>,
    /// Overrides `enabled_ribbon_commands`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub enabled_ribbon_commands: Option<Vec<String>>,
}

/// Raw `[triggers]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTriggers {
    /// Overrides `editor_list`.
    pub editor_list: Option<String>,
    /// Overrides `symbol_list`.
    pub symbol_list: Option<String>,
    /// Overrides `symbol_list_active_editor`.
    pub symbol_list_active_editor: Option<String>,
    /// Overrides `workspace_list`.
    pub workspace_list: Option<String>,
    /// Overrides `headings_list`.
    pub headings_list: Option<String>,
    /// Overrides `bookmarks_list`.
    pub bookmarks_list: Option<String>,
    /// Overrides `command_list`.
    pub command_list: Option<String>,
    /// Overrides `vault_list`.
    pub vault_list: Option<String>,
    /// Overrides `related_items_list`.
    pub related_items_list: Option<String>,
    /// Overrides `related_items_list_active_editor`.
    pub related_items_list_active_editor: Option<String>,
}

/// Raw `[standard]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStandard {
    /// Overrides `show_aliases`.
    pub show_aliases: Option<bool>,
    /// Overrides `show_existing_only`.
    pub show_existing_only: Option<bool>,
    /// Accepts either a single pattern or a list.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub exclude_folders: Option<Vec<String>>,
    /// Overrides `ignored_paths`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub ignored_paths: Option<Vec<String>>,
    /// Overrides `exclude_ignored_files`.
    pub exclude_ignored_files: Option<bool>,
    /// Overrides `file_ext_allow_list`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub file_ext_allow_list: Option<Vec<String>>,
    /// Overrides `max_recent_file_suggestions_on_init`.
    pub max_recent_file_suggestions_on_init: Option<i64>,
    /// Overrides `override_standard_mode_behaviors`.
    pub override_standard_mode_behaviors: Option<bool>,
}

/// Raw `[editors]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEditors {
    /// Overrides `exclude_view_types`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub exclude_view_types: Option<Vec<String>>,
    /// Overrides `include_side_panel_view_types`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub include_side_panel_view_types: Option<Vec<String>>,
    /// Overrides `reference_view_types`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub reference_view_types: Option<Vec<String>>,
    /// Overrides `order_by_access_time`.
    pub order_by_access_time: Option<bool>,
}

/// Raw `[symbols]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSymbols {
    /// Overrides `enabled_types`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub enabled_types: Option<Vec<String>>,
    /// Overrides `exclude_link_sub_types`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub exclude_link_sub_types: Option<Vec<String>>,
    /// Overrides `symbols_in_line_order`.
    pub symbols_in_line_order: Option<bool>,
    /// Overrides `select_nearest_heading`.
    pub select_nearest_heading: Option<bool>,
    /// Overrides `always_new_tab_for_symbols`.
    pub always_new_tab_for_symbols: Option<bool>,
}

/// Raw `[headings]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHeadings {
    /// Overrides `should_search_headings`.
    pub should_search_headings: Option<bool>,
    /// Overrides `search_all_headings`.
    pub search_all_headings: Option<bool>,
    /// Overrides `strict_headings_only`.
    pub strict_headings_only: Option<bool>,
    /// Overrides `should_search_filenames`.
    pub should_search_filenames: Option<bool>,
    /// Overrides `should_search_bookmarks`.
    pub should_search_bookmarks: Option<bool>,
    /// Overrides `should_search_recent_files`.
    pub should_search_recent_files: Option<bool>,
    /// Overrides `debounce_ms`.
    pub debounce_ms: Option<i64>,
}

/// Raw `[related]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRelated {
    /// Overrides `enabled_types`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub enabled_types: Option<Vec<String>>,
    /// Overrides `exclude_folders`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub exclude_folders: Option<Vec<String>>,
    /// Overrides `exclude_open_files`.
    pub exclude_open_files: Option<bool>,
}

/// A hotkey as written in TOML.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHotkey {
    /// Overrides `modifiers`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub modifiers: Option<Vec<String>>,
    /// Overrides `key`.
    pub key: Option<String>,
}

/// Raw `[commands]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCommands {
    /// Overrides `toggle_pinned_keys`.
    pub toggle_pinned_keys: Option<RawHotkey>,
}

/// Raw `[insert_link]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawInsertLink {
    /// Overrides `is_enabled`.
    pub is_enabled: Option<bool>,
    /// Overrides `insertable_editor_types`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub insertable_editor_types: Option<Vec<String>>,
    /// Overrides `use_basename_as_alias`.
    pub use_basename_as_alias: Option<bool>,
    /// Overrides `use_heading_as_alias`.
    pub use_heading_as_alias: Option<bool>,
    /// Overrides `keymap`.
    pub keymap: Option<RawHotkey>,
}

/// One adjustment entry. Either a bare number or a table with a label.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPriorityValue {
    /// `basename = 0.5`
    Value(f64),
    /// `basename = { value = 0.5, label = "..." }`
    Data {
        /// Amount added to the score.
        value: f64,
        /// Optional replacement label.
        label: Option<String>,
        /// Optional replacement description.
        desc: Option<String>,
    },
}

impl RawPriorityValue {
    /// The numeric adjustment.
    pub fn value(&self) -> f64 {
        match self {
            Self::Value(v) | Self::Data { value: v, .. } => *v,
        }
    }
}

/// Raw `[priority]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPriority {
    /// Overrides `is_enabled`.
    pub is_enabled: Option<bool>,
    /// Overrides `adjustments`.
    pub adjustments: Option<BTreeMap<String, RawPriorityValue>>,
    /// Overrides `file_ext_adjustments`.
    pub file_ext_adjustments: Option<BTreeMap<String, RawPriorityValue>>,
}

/// Raw per-facet entry under `[facets.facet_list.<id>]`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFacet {
    /// Overrides `is_active`.
    pub is_active: Option<bool>,
    /// Overrides `label`.
    pub label: Option<String>,
    /// Overrides `key`.
    pub key: Option<String>,
    /// Overrides `modifiers`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub modifiers: Option<Vec<String>>,
    /// Only meaningful for facets that are not built in.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub modes: Option<Vec<String>>,
}

/// Raw `[facets]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFacets {
    /// Overrides `reset_key`.
    pub reset_key: Option<String>,
    /// Overrides `reset_modifiers`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub reset_modifiers: Option<Vec<String>>,
    /// Overrides `key_list`.
    pub key_list: Option<Vec<String>>,
    /// Overrides `modifiers`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub modifiers: Option<Vec<String>>,
    /// Overrides `should_reset_active_facets`.
    pub should_reset_active_facets: Option<bool>,
    /// Overrides `should_show_facet_instructions`.
    pub should_show_facet_instructions: Option<bool>,
    /// Overrides `exclusive_groups`.
    pub exclusive_groups: Option<Vec<Vec<String>>>,
    /// Overrides `facet_list`.
    pub facet_list: Option<BTreeMap<String, RawFacet>>,
}

/// Parses a settings file from disk.
pub fn parse_settings_file(path: &Path) -> Result<RawSettings, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings_str(&contents, path)
}

/// Parses settings from a string, attributing errors to `path`.
pub fn parse_settings_str(contents: &str, path: &Path) -> Result<RawSettings, ConfigError> {
    parse_settings(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses settings from a string.
pub fn parse_settings(contents: &str) -> Result<RawSettings, TomlError> {
    toml::from_str(contents)
}

/// Returns true if the file at `path` parses and sets `root = true`.
pub fn is_root_config(path: &Path) -> bool {
    parse_settings_file(path)
        .ok()
        .and_then(|s| s.root)
        .unwrap_or(false)
}
