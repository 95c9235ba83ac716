//! Enumerations shared between settings and the switcher core.

use std::{collections::BTreeSet, error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// An operating context selecting which suggestion source is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// File search (the default mode).
    Standard,
    /// Open editors.
    EditorList,
    /// Symbols inside one file.
    SymbolList,
    /// Saved workspace layouts.
    WorkspaceList,
    /// Headings across the vault.
    HeadingsList,
    /// Bookmarks.
    BookmarksList,
    /// Command palette entries.
    CommandList,
    /// Items related to one file.
    RelatedItemsList,
    /// Known vaults.
    VaultList,
}

impl Mode {
    /// Every mode, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Standard,
        Self::EditorList,
        Self::SymbolList,
        Self::WorkspaceList,
        Self::HeadingsList,
        Self::BookmarksList,
        Self::CommandList,
        Self::RelatedItemsList,
        Self::VaultList,
    ];

    /// Returns the canonical name of the mode.
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::EditorList => "editor-list",
            Self::SymbolList => "symbol-list",
            Self::WorkspaceList => "workspace-list",
            Self::HeadingsList => "headings-list",
            Self::BookmarksList => "bookmarks-list",
            Self::CommandList => "command-list",
            Self::RelatedItemsList => "related-items-list",
            Self::VaultList => "vault-list",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = UnknownVariant;

    /// Parses a mode name. Case, `-`, `_` and a trailing `list` are ignored, so
    /// `EditorList`, `editor-list` and `editor` all name the same mode.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let stem = normalized.strip_suffix("list").unwrap_or(&normalized);

        let mode = match stem {
            "standard" | "files" => Self::Standard,
            "editor" | "editors" => Self::EditorList,
            "symbol" | "symbols" => Self::SymbolList,
            "workspace" | "workspaces" => Self::WorkspaceList,
            "heading" | "headings" => Self::HeadingsList,
            "bookmark" | "bookmarks" => Self::BookmarksList,
            "command" | "commands" => Self::CommandList,
            "relateditem" | "relateditems" | "related" => Self::RelatedItemsList,
            "vault" | "vaults" => Self::VaultList,
            _ => return Err(UnknownVariant::new("mode", s)),
        };
        Ok(mode)
    }
}

/// A set of modes.
///
/// Several modes may contribute to one session at the same time, for example an editor
/// list supplying the source file of an embedded symbol query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeSet(BTreeSet<Mode>);

impl ModeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding a single mode.
    pub fn single(mode: Mode) -> Self {
        Self(BTreeSet::from([mode]))
    }

    /// Creates a set holding every mode.
    pub fn all() -> Self {
        Self(Mode::ALL.into_iter().collect())
    }

    /// Adds a mode, returning `true` if it was not already present.
    pub fn insert(&mut self, mode: Mode) -> bool {
        self.0.insert(mode)
    }

    /// Returns true if the set holds `mode`.
    pub fn contains(&self, mode: Mode) -> bool {
        self.0.contains(&mode)
    }

    /// Returns the union of both sets.
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }

    /// Returns true if both sets share at least one mode.
    pub fn intersects(&self, other: &Self) -> bool {
        self.0.iter().any(|m| other.0.contains(m))
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of modes in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates the modes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Mode> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Mode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = Mode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Mode> for ModeSet {
    fn from(mode: Mode) -> Self {
        Self::single(mode)
    }
}

/// Kind of a symbol found inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolType {
    /// `[[wiki]]` or `[md](links)`.
    Link,
    /// `![[embeds]]`.
    Embed,
    /// `#tags`.
    Tag,
    /// Markdown headings.
    Heading,
    /// `> [!note]` callouts.
    Callout,
    /// Nodes on a canvas.
    CanvasNode,
}

impl SymbolType {
    /// Every symbol type.
    pub const ALL: [Self; 6] = [
        Self::Link,
        Self::Embed,
        Self::Tag,
        Self::Heading,
        Self::Callout,
        Self::CanvasNode,
    ];

    /// Returns the canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Embed => "embed",
            Self::Tag => "tag",
            Self::Heading => "heading",
            Self::Callout => "callout",
            Self::CanvasNode => "canvas-node",
        }
    }

    /// Short marker rendered in front of a symbol.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Link => "🔗",
            Self::Embed => "!",
            Self::Tag => "#",
            Self::Heading => "H",
            Self::Callout => "\u{203A}",
            Self::CanvasNode => "\u{25A1}",
        }
    }
}

impl FromStr for SymbolType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|t| t.name() == normalized || t.name().replace('-', "") == normalized)
            .ok_or_else(|| UnknownVariant::new("symbol type", s))
    }
}

/// Sub-kind of a link, used to hide some links from the symbol list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkType {
    /// A link to a whole file.
    Normal,
    /// A link to a heading (`[[file#heading]]`).
    Heading,
    /// A link to a block (`[[file#^block]]`).
    Block,
}

impl LinkType {
    /// Classifies raw link text.
    pub fn of(link: &str) -> Self {
        match link.split_once('#') {
            Some((_, sub)) if sub.starts_with('^') => Self::Block,
            Some(_) => Self::Heading,
            None => Self::Normal,
        }
    }
}

impl FromStr for LinkType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "heading" => Ok(Self::Heading),
            "block" => Ok(Self::Block),
            _ => Err(UnknownVariant::new("link type", s)),
        }
    }
}

/// How an item is related to the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    /// Lives in the same folder.
    DiskLocation,
    /// Links to the source file.
    Backlink,
    /// Is linked from the source file.
    OutgoingLink,
}

impl RelationType {
    /// Every relation type.
    pub const ALL: [Self; 3] = [Self::DiskLocation, Self::Backlink, Self::OutgoingLink];

    /// Returns the canonical name, which doubles as the facet id.
    pub fn name(self) -> &'static str {
        match self {
            Self::DiskLocation => "disk-location",
            Self::Backlink => "backlink",
            Self::OutgoingLink => "outgoing-link",
        }
    }
}

impl FromStr for RelationType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| UnknownVariant::new("relation type", s))
    }
}

/// How a file path is shown next to a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathDisplayFormat {
    /// No path.
    None,
    /// The full path.
    Full,
    /// Only the parent folder path.
    FolderOnly,
    /// The parent folder name and file name.
    FolderWithFilename,
    /// The folder path, plus the file name when it differs from the title.
    #[default]
    FolderPathFilenameOptional,
}

impl FromStr for PathDisplayFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "none" => Ok(Self::None),
            "full" => Ok(Self::Full),
            "folderonly" => Ok(Self::FolderOnly),
            "folderwithfilename" => Ok(Self::FolderWithFilename),
            "folderpathfilenameoptional" => Ok(Self::FolderPathFilenameOptional),
            _ => Err(UnknownVariant::new("path display format", s)),
        }
    }
}

/// Where the display title of a file comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleSource {
    /// The file basename.
    #[default]
    Default,
    /// The first H1 heading, falling back to the basename.
    H1,
}

/// A keyboard modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// Platform command key (Cmd on macOS, Ctrl elsewhere).
    Mod,
    /// Control.
    Ctrl,
    /// Meta / Cmd / Win.
    Meta,
    /// Shift.
    Shift,
    /// Alt / Option.
    Alt,
}

impl FromStr for Modifier {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mod" => Ok(Self::Mod),
            "ctrl" | "control" => Ok(Self::Ctrl),
            "meta" | "cmd" | "command" | "super" => Ok(Self::Meta),
            "shift" => Ok(Self::Shift),
            "alt" | "option" => Ok(Self::Alt),
            _ => Err(UnknownVariant::new("modifier", s)),
        }
    }
}

/// A key with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotkey {
    /// Modifiers that must be held.
    pub modifiers: Vec<Modifier>,
    /// The key, compared case-insensitively.
    pub key: String,
}

impl Hotkey {
    /// Creates a hotkey.
    pub fn new(modifiers: &[Modifier], key: &str) -> Self {
        Self {
            modifiers: modifiers.to_vec(),
            key: key.to_string(),
        }
    }

    /// Returns true if `key` pressed with exactly `modifiers` triggers this hotkey.
    pub fn matches(&self, key: &str, modifiers: &[Modifier]) -> bool {
        self.key.eq_ignore_ascii_case(key) && same_modifiers(&self.modifiers, modifiers)
    }
}

/// Compares two modifier lists as sets.
pub fn same_modifiers(a: &[Modifier], b: &[Modifier]) -> bool {
    let a: BTreeSet<_> = a.iter().collect();
    let b: BTreeSet<_> = b.iter().collect();
    a == b
}

/// A string that does not name any variant of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    /// What kind of value was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownVariant {
    /// Creates the error.
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: '{}'", self.kind, self.value)
    }
}

impl Error for UnknownVariant {}
