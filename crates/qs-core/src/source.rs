//! Read-only data supplied by the host, and the provider trait collectors read it through.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::SourceError;

/// A file in the vault. Paths are vault relative with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VaultFile {
    /// Full vault-relative path, e.g. `Projects/plan.md`.
    pub path: String,
    /// File name without extension, e.g. `plan`.
    pub basename: String,
    /// Extension without the dot, lowercase, e.g. `md`. Empty when there is none.
    pub extension: String,
}

impl VaultFile {
    /// Creates a file from its vault-relative path.
    pub fn new(path: &str) -> Self {
        let path = path.trim_start_matches('/').to_string();
        let name = path.rsplit('/').next().unwrap_or(&path);
        let (basename, extension) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), ext.to_ascii_lowercase()),
            _ => (name.to_string(), String::new()),
        };
        Self {
            path,
            basename,
            extension,
        }
    }

    /// File name including the extension.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Parent folder path, empty for files in the vault root.
    pub fn parent(&self) -> &str {
        self.path.rsplit_once('/').map_or("", |(parent, _)| parent)
    }

    /// Returns true for files in the vault root.
    pub fn is_root(&self) -> bool {
        self.parent().is_empty()
    }

    /// Returns true for markdown notes.
    pub fn is_markdown(&self) -> bool {
        self.extension == "md"
    }

    /// Path used in wiki links: the full path without a `.md` extension.
    pub fn link_path(&self) -> &str {
        if self.is_markdown() {
            self.path.strip_suffix(".md").unwrap_or(&self.path)
        } else {
            &self.path
        }
    }
}

/// A heading in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingCache {
    /// Heading text without the leading `#`s.
    pub heading: String,
    /// Level, 1 through 6.
    pub level: u8,
    /// Zero-based line number.
    pub line: usize,
}

/// A link or embed in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCache {
    /// Link target as written, e.g. `note#Heading`.
    pub link: String,
    /// Alias text, if any.
    pub display_text: Option<String>,
    /// Zero-based line number.
    pub line: usize,
}

/// A tag in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCache {
    /// Tag including the leading `#`.
    pub tag: String,
    /// Zero-based line number.
    pub line: usize,
}

/// A callout block in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalloutCache {
    /// Callout type, e.g. `note` or `warning`.
    pub callout_type: String,
    /// Title text, possibly empty.
    pub title: String,
    /// Zero-based line number.
    pub line: usize,
}

/// A node on a canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasNode {
    /// Node id.
    pub id: String,
    /// `text`, `file`, `link` or `group`.
    pub node_type: String,
    /// Text shown for the node.
    pub text: String,
}

/// Parsed metadata for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    /// Headings in document order.
    pub headings: Vec<HeadingCache>,
    /// Links in document order.
    pub links: Vec<LinkCache>,
    /// Embeds in document order.
    pub embeds: Vec<LinkCache>,
    /// Tags in document order.
    pub tags: Vec<TagCache>,
    /// Callouts in document order.
    pub callouts: Vec<CalloutCache>,
    /// Canvas nodes, for canvas files.
    pub canvas_nodes: Vec<CanvasNode>,
    /// Frontmatter aliases.
    pub aliases: Vec<String>,
}

impl FileMetadata {
    /// The first H1 heading, if any.
    pub fn first_h1(&self) -> Option<&HeadingCache> {
        self.headings.iter().find(|h| h.level == 1)
    }
}

/// An open editor pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorLeaf {
    /// Stable leaf id.
    pub id: String,
    /// View type, e.g. `markdown`, `pdf`, `graph`.
    pub view_type: String,
    /// Title shown on the tab.
    pub title: String,
    /// File shown in the view, if any.
    pub file: Option<VaultFile>,
    /// Monotonic activation stamp; larger is more recent.
    pub last_active: u64,
    /// Lives in a side panel rather than the main area.
    pub is_side_panel: bool,
}

/// Kind of bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookmarkKind {
    /// A file.
    File,
    /// A folder.
    Folder,
    /// A saved search.
    Search,
    /// A heading or block inside a file.
    Heading,
    /// A group of bookmarks.
    Group,
}

/// A node of the bookmark tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkItem {
    /// Kind of bookmark.
    pub kind: BookmarkKind,
    /// User title, or the target name when untitled.
    pub title: String,
    /// Target path for file, folder and heading bookmarks.
    pub path: Option<String>,
    /// Heading or block reference for heading bookmarks, e.g. `#Intro`.
    pub subpath: Option<String>,
    /// Query text for search bookmarks.
    pub query: Option<String>,
    /// Children of a group.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BookmarkItem>,
}

impl BookmarkItem {
    /// Creates a file bookmark.
    pub fn file(path: &str, title: Option<&str>) -> Self {
        let title = title.map_or_else(|| VaultFile::new(path).basename, str::to_string);
        Self {
            kind: BookmarkKind::File,
            title,
            path: Some(path.to_string()),
            subpath: None,
            query: None,
            children: Vec::new(),
        }
    }

    /// Creates a group holding `children`.
    pub fn group(title: &str, children: Vec<Self>) -> Self {
        Self {
            kind: BookmarkKind::Group,
            title: title.to_string(),
            path: None,
            subpath: None,
            query: None,
            children,
        }
    }
}

/// A command palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Command id.
    pub id: String,
    /// Human readable name.
    pub name: String,
}

/// A saved workspace layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceEntry {
    /// Workspace name.
    pub id: String,
}

/// A known vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultEntry {
    /// Vault name.
    pub name: String,
    /// Absolute path on disk.
    pub path: String,
    /// The vault is currently open.
    pub is_open: bool,
}

/// Link counts keyed by source path, then by target.
pub type LinkMap = BTreeMap<String, BTreeMap<String, usize>>;

/// Read access to the host's data.
///
/// Every method has a default that reports [`SourceError::Unavailable`], so a provider only
/// implements what it has.
pub trait VaultSource {
    /// Every file in the vault.
    fn files(&self) -> Result<Vec<VaultFile>, SourceError> {
        Err(SourceError::Unavailable("files"))
    }

    /// Parsed metadata for the file at `path`.
    fn metadata(&self, _path: &str) -> Result<FileMetadata, SourceError> {
        Err(SourceError::Unavailable("file metadata"))
    }

    /// Resolved links: source path to target path to count.
    fn resolved_links(&self) -> Result<LinkMap, SourceError> {
        Err(SourceError::Unavailable("resolved links"))
    }

    /// Unresolved links: source path to link text to count.
    fn unresolved_links(&self) -> Result<LinkMap, SourceError> {
        Err(SourceError::Unavailable("unresolved links"))
    }

    /// Recently opened file paths, most recent first.
    fn recent_files(&self) -> Result<Vec<String>, SourceError> {
        Err(SourceError::Unavailable("recent files"))
    }

    /// Open editor panes.
    fn open_leaves(&self) -> Result<Vec<EditorLeaf>, SourceError> {
        Err(SourceError::Unavailable("open editors"))
    }

    /// The focused editor pane.
    fn active_leaf(&self) -> Option<EditorLeaf> {
        None
    }

    /// The bookmark tree.
    fn bookmarks(&self) -> Result<Vec<BookmarkItem>, SourceError> {
        Err(SourceError::Unavailable("bookmarks"))
    }

    /// The command registry.
    fn commands(&self) -> Result<Vec<Command>, SourceError> {
        Err(SourceError::Unavailable("commands"))
    }

    /// Ids of pinned commands, in pinned order.
    fn pinned_commands(&self) -> Result<Vec<String>, SourceError> {
        Err(SourceError::Unavailable("pinned commands"))
    }

    /// Ids of recently run commands, most recent first.
    fn recent_commands(&self) -> Result<Vec<String>, SourceError> {
        Err(SourceError::Unavailable("recent commands"))
    }

    /// Saved workspaces.
    fn workspaces(&self) -> Result<Vec<WorkspaceEntry>, SourceError> {
        Err(SourceError::Unavailable("workspaces"))
    }

    /// Known vaults.
    fn vaults(&self) -> Result<Vec<VaultEntry>, SourceError> {
        Err(SourceError::Unavailable("vaults"))
    }
}
