//! Match priority adjustment tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Adjustment keys for the three scored match types.
pub const MATCH_TYPE_KEYS: &[&str] = &["primary", "basename", "path"];

/// Adjustment keys for suggestion indicator flags.
pub const FLAG_KEYS: &[&str] = &["isOpenInEditor", "isBookmarked", "isRecent", "isAttachment"];

/// Adjustment keys for suggestion kinds.
pub const KIND_KEYS: &[&str] = &[
    "file",
    "alias",
    "unresolved",
    "editor",
    "symbol",
    "workspace",
    "heading",
    "bookmark",
    "command",
    "related-item",
    "vault",
];

/// Adjustment keys for heading levels.
pub const HEADING_KEYS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Returns true if `key` is understood by the priority resolver.
pub fn is_known_adjustment_key(key: &str) -> bool {
    MATCH_TYPE_KEYS
        .iter()
        .chain(FLAG_KEYS)
        .chain(KIND_KEYS)
        .chain(HEADING_KEYS)
        .any(|k| *k == key)
}

/// A named score adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPriorityData {
    /// Amount added to the score. Zero disables the adjustment.
    pub value: f64,
    /// Human readable name.
    pub label: String,
    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl MatchPriorityData {
    /// Creates a disabled adjustment with a label.
    pub fn labeled(label: &str, desc: Option<&str>) -> Self {
        Self {
            value: 0.0,
            label: label.to_string(),
            desc: desc.map(str::to_string),
        }
    }

    /// Returns true if the adjustment contributes anything.
    pub fn is_enabled(&self) -> bool {
        self.value != 0.0
    }
}

/// User configured score adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPriorityAdjustments {
    /// Master switch; when false scores are left untouched.
    pub is_enabled: bool,
    /// Adjustments keyed by match type, indicator flag, suggestion kind or heading level.
    pub adjustments: BTreeMap<String, MatchPriorityData>,
    /// Adjustments keyed by lowercase file extension (without the dot).
    pub file_ext_adjustments: BTreeMap<String, MatchPriorityData>,
}

impl Default for MatchPriorityAdjustments {
    fn default() -> Self {
        let mut adjustments = BTreeMap::new();
        let labeled = [
            ("primary", "Primary match", Some("Matched the suggestion's own text")),
            ("basename", "Basename match", Some("Matched the file name")),
            ("path", "Path match", Some("Matched the folder path")),
            ("isOpenInEditor", "Open items", Some("Items already open in an editor")),
            ("isBookmarked", "Bookmarked items", None),
            ("isRecent", "Recent items", Some("Recently opened files")),
            ("isAttachment", "Attachments", Some("Files that are not notes")),
            ("file", "Filenames", None),
            ("alias", "Aliases", None),
            ("unresolved", "Unresolved links", None),
        ];
        for (key, label, desc) in labeled {
            adjustments.insert(key.to_string(), MatchPriorityData::labeled(label, desc));
        }
        for level in 1..=6 {
            adjustments.insert(
                format!("h{level}"),
                MatchPriorityData::labeled(&format!("H{level} headings"), None),
            );
        }

        let mut file_ext_adjustments = BTreeMap::new();
        file_ext_adjustments.insert(
            "canvas".to_string(),
            MatchPriorityData::labeled("Canvas files", None),
        );

        Self {
            is_enabled: false,
            adjustments,
            file_ext_adjustments,
        }
    }
}

impl MatchPriorityAdjustments {
    /// Returns the value for an adjustment key, or zero.
    pub fn value(&self, key: &str) -> f64 {
        self.adjustments.get(key).map_or(0.0, |d| d.value)
    }

    /// Returns the value for a file extension, or zero. Extensions compare case-insensitively.
    pub fn ext_value(&self, ext: &str) -> f64 {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.file_ext_adjustments.get(&ext).map_or(0.0, |d| d.value)
    }
}
