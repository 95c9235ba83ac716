//! The suggestion model.
//!
//! Every candidate the switcher can show is one variant of [`Suggestion`]. Each variant owns
//! its payload and a shared [`Ranking`] record, so the tag alone determines which fields exist.

use qs_config::{RelationType, SymbolType};
use qs_match::FuzzyMatch;
use serde::Serialize;

use crate::source::{
    BookmarkItem, CalloutCache, CanvasNode, Command, EditorLeaf, HeadingCache, LinkCache,
    TagCache, VaultEntry, VaultFile,
};

/// How a query matched a suggestion.
///
/// Variants are declared in ascending precedence, so `Ord` gives
/// `Primary > Basename > Path > None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    /// No search term; the suggestion is listed unfiltered.
    #[default]
    None,
    /// Matched the folder path of the file.
    Path,
    /// Matched the file name.
    Basename,
    /// Matched the suggestion's own text.
    Primary,
}

impl MatchType {
    /// Key of this match type in the priority adjustment table.
    pub fn adjustment_key(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Path => Some("path"),
            Self::Basename => Some("basename"),
            Self::Primary => Some("primary"),
        }
    }
}

/// Indicators attached to a suggestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    /// The file is open in an editor.
    pub is_open_in_editor: bool,
    /// The file is bookmarked.
    pub is_bookmarked: bool,
    /// The file was opened recently.
    pub is_recent: bool,
    /// The file is not a note.
    pub is_attachment: bool,
}

impl Flags {
    /// Adjustment keys of the flags that are set.
    pub fn adjustment_keys(self) -> impl Iterator<Item = &'static str> {
        [
            (self.is_open_in_editor, "isOpenInEditor"),
            (self.is_bookmarked, "isBookmarked"),
            (self.is_recent, "isRecent"),
            (self.is_attachment, "isAttachment"),
        ]
        .into_iter()
        .filter_map(|(set, key)| set.then_some(key))
    }
}

/// Ranking fields shared by every suggestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    /// How the query matched.
    pub match_type: MatchType,
    /// Fuzzy result; absent when `match_type` is `None`.
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub fuzzy: Option<FuzzyMatch>,
    /// The exact text the match was scored against.
    pub match_text: String,
    /// Ranks below equal peers without being excluded.
    pub downranked: bool,
    /// Indicators.
    pub flags: Flags,
    /// Final score after priority adjustments.
    pub score: f64,
}

impl Ranking {
    /// A ranking for a listing without a search term.
    pub fn unmatched(match_text: &str) -> Self {
        Self {
            match_text: match_text.to_string(),
            ..Self::default()
        }
    }

    /// A ranking for a successful match.
    pub fn matched(match_type: MatchType, fuzzy: FuzzyMatch, match_text: &str) -> Self {
        let score = fuzzy.score as f64;
        Self {
            match_type,
            fuzzy: Some(fuzzy),
            match_text: match_text.to_string(),
            score,
            ..Self::default()
        }
    }

    /// Raw fuzzy score, zero without a match.
    pub fn base_score(&self) -> f64 {
        self.fuzzy.as_ref().map_or(0.0, |m| m.score as f64)
    }
}

/// One symbol of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Symbol {
    /// A heading.
    Heading(HeadingCache),
    /// A link.
    Link(LinkCache),
    /// An embed.
    Embed(LinkCache),
    /// A tag.
    Tag(TagCache),
    /// A callout.
    Callout(CalloutCache),
    /// A canvas node.
    CanvasNode(CanvasNode),
}

impl Symbol {
    /// Kind of symbol.
    pub fn symbol_type(&self) -> SymbolType {
        match self {
            Self::Heading(_) => SymbolType::Heading,
            Self::Link(_) => SymbolType::Link,
            Self::Embed(_) => SymbolType::Embed,
            Self::Tag(_) => SymbolType::Tag,
            Self::Callout(_) => SymbolType::Callout,
            Self::CanvasNode(_) => SymbolType::CanvasNode,
        }
    }

    /// Text the symbol is matched and shown by.
    pub fn text(&self) -> &str {
        match self {
            Self::Heading(h) => &h.heading,
            Self::Link(l) | Self::Embed(l) => l.display_text.as_deref().unwrap_or(&l.link),
            Self::Tag(t) => &t.tag,
            Self::Callout(c) if c.title.is_empty() => &c.callout_type,
            Self::Callout(c) => &c.title,
            Self::CanvasNode(n) => &n.text,
        }
    }

    /// Zero-based line, if the symbol has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Heading(h) => Some(h.line),
            Self::Link(l) | Self::Embed(l) => Some(l.line),
            Self::Tag(t) => Some(t.line),
            Self::Callout(c) => Some(c.line),
            Self::CanvasNode(_) => None,
        }
    }
}

/// A symbol with its rendering hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolInfo {
    /// The symbol.
    pub symbol: Symbol,
    /// Kind of symbol.
    pub symbol_type: SymbolType,
    /// Nesting depth for headings, relative to the shallowest heading.
    pub indent_level: usize,
    /// The heading nearest to the cursor.
    pub is_selected: bool,
}

impl SymbolInfo {
    /// Wraps a symbol with no indent and no selection.
    pub fn new(symbol: Symbol) -> Self {
        let symbol_type = symbol.symbol_type();
        Self {
            symbol,
            symbol_type,
            indent_level: 0,
            is_selected: false,
        }
    }
}

/// A related item descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedItem {
    /// How the item relates to the source file.
    pub relation_type: RelationType,
    /// Number of links, for backlinks and outgoing links.
    pub count: Option<usize>,
    /// Link text of an unresolved outgoing link.
    pub unresolved_text: Option<String>,
}

/// A file in the vault.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSuggestion {
    /// The file.
    pub file: VaultFile,
    /// Ranking.
    pub ranking: Ranking,
}

/// A frontmatter alias of a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasSuggestion {
    /// The alias text.
    pub alias: String,
    /// The file declaring it.
    pub file: VaultFile,
    /// Ranking.
    pub ranking: Ranking,
}

/// A link target that does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedSuggestion {
    /// The link text.
    pub linktext: String,
    /// Ranking.
    pub ranking: Ranking,
}

/// An open editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorSuggestion {
    /// The editor pane.
    pub leaf: EditorLeaf,
    /// Ranking.
    pub ranking: Ranking,
}

/// A symbol inside the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolSuggestion {
    /// The symbol.
    pub item: SymbolInfo,
    /// The file containing it.
    pub file: VaultFile,
    /// Ranking.
    pub ranking: Ranking,
}

/// A saved workspace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceSuggestion {
    /// Workspace id.
    pub id: String,
    /// Ranking.
    pub ranking: Ranking,
}

/// A heading anywhere in the vault.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingSuggestion {
    /// The heading.
    pub heading: HeadingCache,
    /// The file containing it.
    pub file: VaultFile,
    /// Ranking.
    pub ranking: Ranking,
}

/// A bookmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkSuggestion {
    /// The bookmark, without its children.
    pub item: BookmarkItem,
    /// Slash-joined titles of the enclosing groups and the bookmark itself.
    pub bookmark_path: String,
    /// Target file for file and heading bookmarks.
    pub file: Option<VaultFile>,
    /// Ranking.
    pub ranking: Ranking,
}

/// A command palette entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSuggestion {
    /// The command.
    pub command: Command,
    /// The command is pinned.
    pub is_pinned: bool,
    /// The command ran recently.
    pub is_recent: bool,
    /// Ranking.
    pub ranking: Ranking,
}

/// An item related to the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedItemSuggestion {
    /// The relation.
    pub item: RelatedItem,
    /// The related file; absent for unresolved links.
    pub file: Option<VaultFile>,
    /// Ranking.
    pub ranking: Ranking,
}

/// A known vault.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaultSuggestion {
    /// The vault.
    pub vault: VaultEntry,
    /// Components of the vault path.
    pub path_segments: Vec<String>,
    /// Ranking.
    pub ranking: Ranking,
}

/// Every kind of candidate the switcher can show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Suggestion {
    /// A vault file.
    File(FileSuggestion),
    /// A frontmatter alias.
    Alias(AliasSuggestion),
    /// An unresolved link.
    Unresolved(UnresolvedSuggestion),
    /// An open editor.
    Editor(EditorSuggestion),
    /// A symbol in the source file.
    Symbol(SymbolSuggestion),
    /// A workspace.
    Workspace(WorkspaceSuggestion),
    /// A heading in the vault.
    Heading(HeadingSuggestion),
    /// A bookmark.
    Bookmark(BookmarkSuggestion),
    /// A command.
    Command(CommandSuggestion),
    /// An item related to the source file.
    RelatedItem(RelatedItemSuggestion),
    /// A vault.
    Vault(VaultSuggestion),
}

impl Suggestion {
    /// Kind name, which doubles as the priority adjustment key.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Alias(_) => "alias",
            Self::Unresolved(_) => "unresolved",
            Self::Editor(_) => "editor",
            Self::Symbol(_) => "symbol",
            Self::Workspace(_) => "workspace",
            Self::Heading(_) => "heading",
            Self::Bookmark(_) => "bookmark",
            Self::Command(_) => "command",
            Self::RelatedItem(_) => "related-item",
            Self::Vault(_) => "vault",
        }
    }

    /// Ranking fields.
    pub fn ranking(&self) -> &Ranking {
        match self {
            Self::File(s) => &s.ranking,
            Self::Alias(s) => &s.ranking,
            Self::Unresolved(s) => &s.ranking,
            Self::Editor(s) => &s.ranking,
            Self::Symbol(s) => &s.ranking,
            Self::Workspace(s) => &s.ranking,
            Self::Heading(s) => &s.ranking,
            Self::Bookmark(s) => &s.ranking,
            Self::Command(s) => &s.ranking,
            Self::RelatedItem(s) => &s.ranking,
            Self::Vault(s) => &s.ranking,
        }
    }

    /// Mutable ranking fields.
    pub fn ranking_mut(&mut self) -> &mut Ranking {
        match self {
            Self::File(s) => &mut s.ranking,
            Self::Alias(s) => &mut s.ranking,
            Self::Unresolved(s) => &mut s.ranking,
            Self::Editor(s) => &mut s.ranking,
            Self::Symbol(s) => &mut s.ranking,
            Self::Workspace(s) => &mut s.ranking,
            Self::Heading(s) => &mut s.ranking,
            Self::Bookmark(s) => &mut s.ranking,
            Self::Command(s) => &mut s.ranking,
            Self::RelatedItem(s) => &mut s.ranking,
            Self::Vault(s) => &mut s.ranking,
        }
    }

    /// The associated vault file, when there is one.
    pub fn file(&self) -> Option<&VaultFile> {
        match self {
            Self::File(s) => Some(&s.file),
            Self::Alias(s) => Some(&s.file),
            Self::Editor(s) => s.leaf.file.as_ref(),
            Self::Symbol(s) => Some(&s.file),
            Self::Heading(s) => Some(&s.file),
            Self::Bookmark(s) => s.file.as_ref(),
            Self::RelatedItem(s) => s.file.as_ref(),
            Self::Unresolved(_) | Self::Workspace(_) | Self::Command(_) | Self::Vault(_) => None,
        }
    }

    /// Primary display text.
    pub fn title(&self) -> &str {
        match self {
            Self::File(s) => &s.file.basename,
            Self::Alias(s) => &s.alias,
            Self::Unresolved(s) => &s.linktext,
            Self::Editor(s) => &s.leaf.title,
            Self::Symbol(s) => s.item.symbol.text(),
            Self::Workspace(s) => &s.id,
            Self::Heading(s) => &s.heading.heading,
            Self::Bookmark(s) => &s.item.title,
            Self::Command(s) => &s.command.name,
            Self::RelatedItem(s) => s
                .item
                .unresolved_text
                .as_deref()
                .or(s.file.as_ref().map(|f| f.basename.as_str()))
                .unwrap_or_default(),
            Self::Vault(s) => &s.vault.name,
        }
    }

    /// Heading level for heading suggestions and heading symbols.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Self::Heading(s) => Some(s.heading.level),
            Self::Symbol(SymbolSuggestion {
                item:
                    SymbolInfo {
                        symbol: Symbol::Heading(h),
                        ..
                    },
                ..
            }) => Some(h.level),
            _ => None,
        }
    }

    /// Convenience accessor for the match type.
    pub fn match_type(&self) -> MatchType {
        self.ranking().match_type
    }

    /// Convenience accessor for the final score.
    pub fn score(&self) -> f64 {
        self.ranking().score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_type_precedence() {
        assert!(MatchType::Primary > MatchType::Basename);
        assert!(MatchType::Basename > MatchType::Path);
        assert!(MatchType::Path > MatchType::None);
    }

    #[test]
    fn flags_report_keys() {
        let flags = Flags {
            is_recent: true,
            is_attachment: true,
            ..Flags::default()
        };
        let keys: Vec<_> = flags.adjustment_keys().collect();
        assert_eq!(keys, vec!["isRecent", "isAttachment"]);
    }

    #[test]
    fn heading_level_for_symbols_and_headings() {
        let heading = HeadingCache {
            heading: "Intro".to_string(),
            level: 2,
            line: 0,
        };
        let file = VaultFile::new("a.md");
        let symbol = Suggestion::Symbol(SymbolSuggestion {
            item: SymbolInfo::new(Symbol::Heading(heading.clone())),
            file: file.clone(),
            ranking: Ranking::unmatched("Intro"),
        });
        let vault_heading = Suggestion::Heading(HeadingSuggestion {
            heading,
            file,
            ranking: Ranking::unmatched("Intro"),
        });
        assert_eq!(symbol.heading_level(), Some(2));
        assert_eq!(vault_heading.heading_level(), Some(2));
        assert_eq!(symbol.kind(), "symbol");
        assert_eq!(symbol.title(), "Intro");
    }

    #[test]
    fn callout_without_title_uses_type() {
        let symbol = Symbol::Callout(CalloutCache {
            callout_type: "warning".to_string(),
            title: String::new(),
            line: 3,
        });
        assert_eq!(symbol.text(), "warning");
        assert_eq!(symbol.line(), Some(3));
    }

    #[test]
    fn serializes_with_type_tag() {
        let s = Suggestion::Workspace(WorkspaceSuggestion {
            id: "writing".to_string(),
            ranking: Ranking::unmatched("writing"),
        });
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["type"], "workspace");
        assert_eq!(json["ranking"]["match_type"], "none");
    }
}
