//! Settings for the qs quick switcher.
//!
//! Settings live in TOML files named `.qs.toml`. Files are discovered by walking up the
//! directory tree from the current working directory, then `~/.qs.toml` is loaded as the global
//! file with lowest precedence. Every option has a default; values that cannot be used fall
//! back to their default and produce a [`ConfigWarning`].

#![warn(missing_docs)]

mod discovery;
mod error;
mod facets;
mod merge;
mod parse;
mod patterns;
mod priority;
mod templates;
mod types;
mod validate;

#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path};
pub use error::ConfigError;
pub use facets::{
    FacetDefinition, FacetSettings, builtin_facets, default_exclusive_groups, ids as facet_ids,
    symbol_facet_id,
};
pub use merge::{ParsedSettings, merge_settings};
pub use parse::{RawSettings, parse_settings, parse_settings_file, parse_settings_str};
pub use patterns::PathFilter;
pub use priority::{MatchPriorityAdjustments, MatchPriorityData, is_known_adjustment_key};
use serde::{Deserialize, Serialize};
pub use templates::settings_template;
pub use types::{
    Hotkey, LinkType, Mode, ModeSet, Modifier, PathDisplayFormat, RelationType, SymbolType,
    TitleSource, UnknownVariant, same_modifiers,
};
pub use validate::{ConfigWarning, validate_settings};

/// Loaded settings together with where they came from and what was wrong with them.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// The effective settings.
    pub settings: Settings,
    /// Files that contributed, highest precedence first.
    pub sources: Vec<PathBuf>,
    /// Problems found while merging; each one was repaired with a default.
    pub warnings: Vec<ConfigWarning>,
}

impl Config {
    /// Discovers and merges every `.qs.toml` relevant to `cwd`.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let files = discover_config_files(cwd);
        Self::load_from_files(&files)
    }

    /// Loads settings from an explicit list of files, highest precedence first.
    ///
    /// Returns defaults if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                let settings = parse_settings_file(path)?;
                Ok(ParsedSettings {
                    path: path.clone(),
                    settings,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let (settings, warnings) = merge_settings(&parsed);
        for warning in &warnings {
            tracing::warn!(%warning, "using default for invalid setting");
        }

        Ok(Self {
            settings,
            sources: files.to_vec(),
            warnings,
        })
    }

    /// Returns merge warnings plus warnings from validating the effective settings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = self.warnings.clone();
        for warning in validate_settings(&self.settings) {
            if !warnings.contains(&warning) {
                warnings.push(warning);
            }
        }
        warnings
    }
}

/// The complete, effective settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Options shared by every mode.
    pub general: GeneralSettings,
    /// Mode trigger strings.
    pub triggers: TriggerSettings,
    /// File search.
    pub standard: StandardSettings,
    /// Open editor listing.
    pub editors: EditorSettings,
    /// Symbol listing.
    pub symbols: SymbolSettings,
    /// Vault-wide heading search.
    pub headings: HeadingsSettings,
    /// Related items listing.
    pub related: RelatedSettings,
    /// Command palette listing.
    pub commands: CommandSettings,
    /// Inserting links instead of opening.
    pub insert_link: InsertLinkSettings,
    /// Score adjustments.
    pub priority: MatchPriorityAdjustments,
    /// Facets and their hotkeys.
    pub facets: FacetSettings,
}

impl Settings {
    /// Serializes the settings to TOML.
    ///
    /// This is the save path for facet state and any other edits made during a session.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Options shared by every mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Maximum number of suggestions per pass.
    pub limit: usize,
    /// Open chosen files in a new tab unless the file is already open.
    pub on_open_prefer_new_tab: bool,
    /// How paths are rendered next to suggestions.
    pub path_display_format: PathDisplayFormat,
    /// Hide the path for files in the vault root.
    pub hide_path_if_root: bool,
    /// Where file titles come from.
    pub preferred_source_for_title: TitleSource,
    /// Leading character that disables trigger parsing.
    pub escape_cmd_char: String,
    /// Modes offered as quick actions.
    pub enabled_ribbon_commands: Vec<Mode>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            limit: 50,
            on_open_prefer_new_tab: true,
            path_display_format: PathDisplayFormat::default(),
            hide_path_if_root: true,
            preferred_source_for_title: TitleSource::default(),
            escape_cmd_char: "!".to_string(),
            enabled_ribbon_commands: vec![Mode::HeadingsList, Mode::SymbolList],
        }
    }
}

/// Strings that switch modes when typed at the start of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    /// Editor list.
    pub editor_list: String,
    /// Symbol list for the selected suggestion or active editor.
    pub symbol_list: String,
    /// Symbol list for the active editor.
    pub symbol_list_active_editor: String,
    /// Workspace list.
    pub workspace_list: String,
    /// Headings list.
    pub headings_list: String,
    /// Bookmarks list.
    pub bookmarks_list: String,
    /// Command list.
    pub command_list: String,
    /// Vault list.
    pub vault_list: String,
    /// Related items for the selected suggestion or active editor.
    pub related_items_list: String,
    /// Related items for the active editor.
    pub related_items_list_active_editor: String,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            editor_list: "edt ".to_string(),
            symbol_list: "@".to_string(),
            symbol_list_active_editor: "$ ".to_string(),
            workspace_list: "+".to_string(),
            headings_list: "#".to_string(),
            bookmarks_list: "'".to_string(),
            command_list: ">".to_string(),
            vault_list: "vault ".to_string(),
            related_items_list: "~".to_string(),
            related_items_list_active_editor: "^ ".to_string(),
        }
    }
}

impl TriggerSettings {
    /// Returns every prefix trigger with the mode it opens and whether it targets the active
    /// editor.
    pub fn prefix_triggers(&self) -> Vec<(&str, Mode, bool)> {
        vec![
            (self.editor_list.as_str(), Mode::EditorList, false),
            (self.symbol_list.as_str(), Mode::SymbolList, false),
            (self.symbol_list_active_editor.as_str(), Mode::SymbolList, true),
            (self.workspace_list.as_str(), Mode::WorkspaceList, false),
            (self.headings_list.as_str(), Mode::HeadingsList, false),
            (self.bookmarks_list.as_str(), Mode::BookmarksList, false),
            (self.command_list.as_str(), Mode::CommandList, false),
            (self.vault_list.as_str(), Mode::VaultList, false),
            (self.related_items_list.as_str(), Mode::RelatedItemsList, false),
            (
                self.related_items_list_active_editor.as_str(),
                Mode::RelatedItemsList,
                true,
            ),
        ]
    }
}

/// File search options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardSettings {
    /// Offer frontmatter aliases.
    pub show_aliases: bool,
    /// Hide unresolved links.
    pub show_existing_only: bool,
    /// Glob patterns for folders whose files are never listed.
    pub exclude_folders: Vec<String>,
    /// Glob patterns for files that are downranked.
    pub ignored_paths: Vec<String>,
    /// Drop files matching `ignored_paths` instead of downranking them.
    pub exclude_ignored_files: bool,
    /// Non-markdown extensions listed as regular files.
    pub file_ext_allow_list: Vec<String>,
    /// Number of recent files shown for an empty query.
    pub max_recent_file_suggestions_on_init: usize,
    /// Apply the switcher's own ranking to plain file search.
    pub override_standard_mode_behaviors: bool,
}

impl Default for StandardSettings {
    fn default() -> Self {
        Self {
            show_aliases: true,
            show_existing_only: false,
            exclude_folders: Vec::new(),
            ignored_paths: Vec::new(),
            exclude_ignored_files: false,
            file_ext_allow_list: vec!["canvas".to_string()],
            max_recent_file_suggestions_on_init: 25,
            override_standard_mode_behaviors: true,
        }
    }
}

/// Open editor listing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// View types never listed.
    pub exclude_view_types: Vec<String>,
    /// Side panel view types that are listed.
    pub include_side_panel_view_types: Vec<String>,
    /// View types that show another file rather than their own.
    pub reference_view_types: Vec<String>,
    /// With an empty query, most recently active first.
    pub order_by_access_time: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        let strings = |v: &[&str]| v.iter().map(|s| (*s).to_string()).collect();
        Self {
            exclude_view_types: strings(&["empty"]),
            include_side_panel_view_types: strings(&["backlink", "image", "markdown", "pdf"]),
            reference_view_types: strings(&["backlink", "localgraph", "outgoing-link", "outline"]),
            order_by_access_time: true,
        }
    }
}

/// Symbol listing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolSettings {
    /// Symbol types that are listed.
    pub enabled_types: Vec<SymbolType>,
    /// Link kinds hidden from the list.
    pub exclude_link_sub_types: Vec<LinkType>,
    /// With an empty query, keep document order.
    pub symbols_in_line_order: bool,
    /// Mark the heading nearest the cursor as selected.
    pub select_nearest_heading: bool,
    /// Open symbols from another file in a new tab.
    pub always_new_tab_for_symbols: bool,
}

impl Default for SymbolSettings {
    fn default() -> Self {
        Self {
            enabled_types: SymbolType::ALL.to_vec(),
            exclude_link_sub_types: Vec::new(),
            symbols_in_line_order: true,
            select_nearest_heading: true,
            always_new_tab_for_symbols: false,
        }
    }
}

impl SymbolSettings {
    /// Returns true if symbols of `symbol_type` are listed.
    pub fn is_enabled(&self, symbol_type: SymbolType) -> bool {
        self.enabled_types.contains(&symbol_type)
    }
}

/// Vault-wide heading search options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingsSettings {
    /// Search headings at all.
    pub should_search_headings: bool,
    /// Search every heading level rather than H1 only.
    pub search_all_headings: bool,
    /// Never fall back to file names.
    pub strict_headings_only: bool,
    /// Also search file names.
    pub should_search_filenames: bool,
    /// With an empty query, list bookmarked files.
    pub should_search_bookmarks: bool,
    /// With an empty query, list recent files.
    pub should_search_recent_files: bool,
    /// Delay before an expensive heading pass runs.
    pub debounce_ms: u64,
}

impl Default for HeadingsSettings {
    fn default() -> Self {
        Self {
            should_search_headings: true,
            search_all_headings: true,
            strict_headings_only: false,
            should_search_filenames: false,
            should_search_bookmarks: false,
            should_search_recent_files: true,
            debounce_ms: 250,
        }
    }
}

/// Related items listing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedSettings {
    /// Relation types that are listed.
    pub enabled_types: Vec<RelationType>,
    /// Glob patterns for folders whose files are never listed.
    pub exclude_folders: Vec<String>,
    /// Hide files already open in an editor.
    pub exclude_open_files: bool,
}

impl Default for RelatedSettings {
    fn default() -> Self {
        Self {
            enabled_types: RelationType::ALL.to_vec(),
            exclude_folders: Vec::new(),
            exclude_open_files: false,
        }
    }
}

/// Command listing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSettings {
    /// Hotkey that pins or unpins the selected command.
    pub toggle_pinned_keys: Hotkey,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            toggle_pinned_keys: Hotkey::new(&[Modifier::Ctrl], "p"),
        }
    }
}

/// Options for inserting a link to the chosen suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertLinkSettings {
    /// Allow inserting links at all.
    pub is_enabled: bool,
    /// View types that accept an inserted link.
    pub insertable_editor_types: Vec<String>,
    /// Use the file basename as the link alias.
    pub use_basename_as_alias: bool,
    /// Use the heading text as the alias for heading links.
    pub use_heading_as_alias: bool,
    /// Hotkey that inserts instead of opening.
    pub keymap: Hotkey,
}

impl Default for InsertLinkSettings {
    fn default() -> Self {
        Self {
            is_enabled: true,
            insertable_editor_types: vec!["markdown".to_string()],
            use_basename_as_alias: true,
            use_heading_as_alias: true,
            keymap: Hotkey::new(&[Modifier::Mod, Modifier::Shift], "Enter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_round_trip_through_toml() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn default_triggers_are_distinct() {
        let triggers = TriggerSettings::default();
        let mut all: Vec<_> = triggers.prefix_triggers().iter().map(|t| t.0).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn load_from_no_files_is_default() {
        let config = Config::load_from_files(&[]).unwrap();
        assert_eq!(config.settings, Settings::default());
        assert!(config.warnings.is_empty());
    }
}
