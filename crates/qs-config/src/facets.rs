//! Facet catalogue and persisted facet settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Mode, ModeSet, Modifier, RelationType, SymbolType};

/// Stable ids of the built-in facets.
pub mod ids {
    /// Symbol list: headings.
    pub const SYMBOL_HEADING: &str = "symbollist-heading";
    /// Symbol list: tags.
    pub const SYMBOL_TAG: &str = "symbollist-tag";
    /// Symbol list: callouts.
    pub const SYMBOL_CALLOUT: &str = "symbollist-callout";
    /// Symbol list: links.
    pub const SYMBOL_LINK: &str = "symbollist-link";
    /// Symbol list: embeds.
    pub const SYMBOL_EMBED: &str = "symbollist-embed";
    /// Symbol list: canvas nodes.
    pub const SYMBOL_CANVAS_NODE: &str = "symbollist-canvasnode";
    /// Related items: backlinks.
    pub const BACKLINK: &str = "backlink";
    /// Related items: files in the same folder.
    pub const DISK_LOCATION: &str = "disk-location";
    /// Related items: outgoing links.
    pub const OUTGOING_LINK: &str = "outgoing-link";
    /// Bookmarks: files.
    pub const BOOKMARKS_FILE: &str = "bookmarks-file";
    /// Bookmarks: folders.
    pub const BOOKMARKS_FOLDER: &str = "bookmarks-folder";
    /// Bookmarks: searches.
    pub const BOOKMARKS_SEARCH: &str = "bookmarks-search";
    /// Bookmarks: groups.
    pub const BOOKMARKS_GROUP: &str = "bookmarks-group";
    /// Commands: pinned.
    pub const PINNED_COMMANDS: &str = "pinnedCommands";
    /// Commands: recently used.
    pub const RECENT_COMMANDS: &str = "recentCommands";
    /// Headings mode: recent files.
    pub const RECENT_FILES: &str = "recentFiles";
    /// Headings mode: bookmarked files.
    pub const BOOKMARKS: &str = "bookmarks";
    /// Headings mode: file names.
    pub const FILENAMES: &str = "filenames";
    /// Headings mode: headings.
    pub const HEADINGS: &str = "headings";
}

/// A facet as configured: identity, the modes it applies to, and its persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetDefinition {
    /// Stable identifier.
    pub id: String,
    /// Modes in which the facet is available.
    pub modes: ModeSet,
    /// Label shown to the user.
    pub label: String,
    /// Whether the facet starts active.
    #[serde(default)]
    pub is_active: bool,
    /// Explicit hotkey, overriding the positional key list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Modifiers for the explicit hotkey; the shared modifiers are used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Vec<Modifier>>,
}

impl FacetDefinition {
    /// Creates an inactive facet available in one mode.
    pub fn new(id: &str, mode: Mode, label: &str) -> Self {
        Self {
            id: id.to_string(),
            modes: ModeSet::single(mode),
            label: label.to_string(),
            is_active: false,
            key: None,
            modifiers: None,
        }
    }
}

/// Returns the facet id for a symbol type.
pub fn symbol_facet_id(symbol_type: SymbolType) -> &'static str {
    match symbol_type {
        SymbolType::Heading => ids::SYMBOL_HEADING,
        SymbolType::Tag => ids::SYMBOL_TAG,
        SymbolType::Callout => ids::SYMBOL_CALLOUT,
        SymbolType::Link => ids::SYMBOL_LINK,
        SymbolType::Embed => ids::SYMBOL_EMBED,
        SymbolType::CanvasNode => ids::SYMBOL_CANVAS_NODE,
    }
}

/// Returns the built-in facets in display order.
pub fn builtin_facets() -> Vec<FacetDefinition> {
    let mut facets = Vec::new();

    for (symbol_type, label) in [
        (SymbolType::Heading, "headings"),
        (SymbolType::Tag, "tags"),
        (SymbolType::Callout, "callouts"),
        (SymbolType::Link, "links"),
        (SymbolType::Embed, "embeds"),
        (SymbolType::CanvasNode, "canvas nodes"),
    ] {
        facets.push(FacetDefinition::new(
            symbol_facet_id(symbol_type),
            Mode::SymbolList,
            label,
        ));
    }

    for (relation, label) in [
        (RelationType::Backlink, "backlinks"),
        (RelationType::DiskLocation, "disk location"),
        (RelationType::OutgoingLink, "outgoing links"),
    ] {
        facets.push(FacetDefinition::new(
            relation.name(),
            Mode::RelatedItemsList,
            label,
        ));
    }

    for (id, label) in [
        (ids::BOOKMARKS_FILE, "files"),
        (ids::BOOKMARKS_FOLDER, "folders"),
        (ids::BOOKMARKS_SEARCH, "searches"),
        (ids::BOOKMARKS_GROUP, "groups"),
    ] {
        facets.push(FacetDefinition::new(id, Mode::BookmarksList, label));
    }

    facets.push(FacetDefinition::new(
        ids::PINNED_COMMANDS,
        Mode::CommandList,
        "pinned",
    ));
    facets.push(FacetDefinition::new(
        ids::RECENT_COMMANDS,
        Mode::CommandList,
        "recent",
    ));

    for (id, label) in [
        (ids::RECENT_FILES, "recent files"),
        (ids::BOOKMARKS, "bookmarks"),
        (ids::FILENAMES, "filenames"),
        (ids::HEADINGS, "headings"),
    ] {
        facets.push(FacetDefinition::new(id, Mode::HeadingsList, label));
    }

    facets
}

/// One exclusive group per built-in categorical dimension.
pub fn default_exclusive_groups() -> Vec<Vec<String>> {
    let group = |ids: &[&str]| ids.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
    vec![
        group(&[
            ids::SYMBOL_HEADING,
            ids::SYMBOL_TAG,
            ids::SYMBOL_CALLOUT,
            ids::SYMBOL_LINK,
            ids::SYMBOL_EMBED,
            ids::SYMBOL_CANVAS_NODE,
        ]),
        group(&[ids::BACKLINK, ids::DISK_LOCATION, ids::OUTGOING_LINK]),
        group(&[
            ids::BOOKMARKS_FILE,
            ids::BOOKMARKS_FOLDER,
            ids::BOOKMARKS_SEARCH,
            ids::BOOKMARKS_GROUP,
        ]),
        group(&[ids::PINNED_COMMANDS, ids::RECENT_COMMANDS]),
        group(&[
            ids::RECENT_FILES,
            ids::BOOKMARKS,
            ids::FILENAMES,
            ids::HEADINGS,
        ]),
    ]
}

/// Persisted facet configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetSettings {
    /// Key that deactivates every facet.
    pub reset_key: String,
    /// Modifiers for the reset key; the shared modifiers are used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_modifiers: Option<Vec<Modifier>>,
    /// Keys assigned positionally to the facets available in the current mode.
    pub key_list: Vec<String>,
    /// Modifiers shared by the positional keys.
    pub modifiers: Vec<Modifier>,
    /// Reset active facets whenever the mode changes.
    pub should_reset_active_facets: bool,
    /// Show facet hotkey hints.
    pub should_show_facet_instructions: bool,
    /// Groups of facet ids of which at most one may be active.
    pub exclusive_groups: Vec<Vec<String>>,
    /// Facet catalogue with persisted state, keyed by id.
    pub facet_list: BTreeMap<String, FacetDefinition>,
}

impl Default for FacetSettings {
    fn default() -> Self {
        Self {
            reset_key: "0".to_string(),
            reset_modifiers: None,
            key_list: (1..=9).map(|n| n.to_string()).collect(),
            modifiers: vec![Modifier::Ctrl, Modifier::Shift],
            should_reset_active_facets: false,
            should_show_facet_instructions: true,
            exclusive_groups: default_exclusive_groups(),
            facet_list: builtin_facets()
                .into_iter()
                .map(|f| (f.id.clone(), f))
                .collect(),
        }
    }
}

impl FacetSettings {
    /// Returns the facets in catalogue order: built-ins first, then custom facets by id.
    pub fn ordered_facets(&self) -> Vec<FacetDefinition> {
        let builtin = builtin_facets();
        let mut ordered: Vec<FacetDefinition> = builtin
            .iter()
            .filter_map(|b| self.facet_list.get(&b.id).cloned())
            .collect();
        ordered.extend(
            self.facet_list
                .values()
                .filter(|f| !builtin.iter().any(|b| b.id == f.id))
                .cloned(),
        );
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_are_unique() {
        let facets = builtin_facets();
        let mut ids: Vec<_> = facets.iter().map(|f| f.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), facets.len());
    }

    #[test]
    fn every_builtin_is_in_exactly_one_group() {
        let groups = default_exclusive_groups();
        for facet in builtin_facets() {
            let count = groups.iter().filter(|g| g.contains(&facet.id)).count();
            assert_eq!(count, 1, "{}", facet.id);
        }
    }

    #[test]
    fn ordered_facets_keeps_catalogue_order_then_custom() {
        let mut settings = FacetSettings::default();
        settings.facet_list.insert(
            "aaa-custom".to_string(),
            FacetDefinition::new("aaa-custom", Mode::Standard, "custom"),
        );
        let ordered = settings.ordered_facets();
        assert_eq!(ordered[0].id, ids::SYMBOL_HEADING);
        assert_eq!(ordered.last().unwrap().id, "aaa-custom");
    }

    #[test]
    fn relation_facet_ids_match_relation_names() {
        for relation in RelationType::ALL {
            assert!(builtin_facets().iter().any(|f| f.id == relation.name()));
        }
    }
}
