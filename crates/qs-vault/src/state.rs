//! Application state stored under the vault's `.obsidian` folder.
//!
//! Each file is optional. A missing file leaves the matching source unavailable; a file that
//! cannot be read or parsed is logged and treated as missing.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use qs_core::{BookmarkItem, BookmarkKind, EditorLeaf, VaultEntry, VaultFile, WorkspaceEntry};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::VaultError;

/// Folder holding the state files, relative to the vault root.
pub const STATE_DIR: &str = ".obsidian";

/// Open panes and recent files, from `workspace.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceState {
    /// Every leaf in the layout.
    pub leaves: Vec<EditorLeaf>,
    /// Id of the focused leaf.
    pub active: Option<String>,
    /// Recently opened paths, most recent first.
    pub recent_files: Vec<String>,
}

impl WorkspaceState {
    /// The focused leaf.
    pub fn active_leaf(&self) -> Option<&EditorLeaf> {
        let id = self.active.as_deref()?;
        self.leaves.iter().find(|l| l.id == id)
    }
}

/// Everything loaded from the state folder.
#[derive(Debug, Clone, Default)]
pub struct VaultState {
    /// Layout and recent files.
    pub workspace: Option<WorkspaceState>,
    /// Bookmark tree.
    pub bookmarks: Option<Vec<BookmarkItem>>,
    /// Saved workspace layouts.
    pub workspaces: Option<Vec<WorkspaceEntry>>,
}

impl VaultState {
    /// Loads every state file under `root`.
    pub fn load(root: &Path) -> Self {
        let dir = root.join(STATE_DIR);
        Self {
            workspace: read_state(&dir.join("workspace.json"), parse_workspace),
            bookmarks: read_state(&dir.join("bookmarks.json"), parse_bookmarks),
            workspaces: read_state(&dir.join("workspaces.json"), parse_workspaces),
        }
    }
}

/// Reads and parses one state file. None when it is absent or unusable.
fn read_state<T>(
    path: &Path,
    parse: impl FnOnce(&str) -> Result<T, serde_json::Error>,
) -> Option<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no state file");
            return None;
        }
        Err(source) => {
            let error = VaultError::ReadFile {
                path: path.to_path_buf(),
                source,
            };
            warn!(%error, "ignoring state file");
            return None;
        }
    };
    parse(&content)
        .map_err(|source| {
            let error = VaultError::ParseState {
                path: path.to_path_buf(),
                source,
            };
            warn!(%error, "ignoring state file");
        })
        .ok()
}

/// Layout file contents.
#[derive(Debug, Deserialize)]
struct RawWorkspace {
    /// Main editing area.
    #[serde(default)]
    main: Value,
    /// Left side panel.
    #[serde(default)]
    left: Value,
    /// Right side panel.
    #[serde(default)]
    right: Value,
    /// Focused leaf id.
    active: Option<String>,
    /// Recent file paths.
    #[serde(default, rename = "lastOpenFiles")]
    last_open_files: Vec<String>,
}

/// Parses `workspace.json`.
///
/// Leaves are ordered main area first, then the side panels. Activation stamps follow the
/// recent file list, with the focused leaf above all others.
pub fn parse_workspace(content: &str) -> Result<WorkspaceState, serde_json::Error> {
    let raw: RawWorkspace = serde_json::from_str(content)?;
    let mut leaves = Vec::new();
    collect_leaves(&raw.main, false, &mut leaves);
    collect_leaves(&raw.left, true, &mut leaves);
    collect_leaves(&raw.right, true, &mut leaves);

    let recent = &raw.last_open_files;
    let top = recent.len() as u64 + 1;
    for leaf in &mut leaves {
        leaf.last_active = if raw.active.as_deref() == Some(leaf.id.as_str()) {
            top
        } else {
            leaf.file
                .as_ref()
                .and_then(|f| recent.iter().position(|p| *p == f.path))
                .map_or(0, |i| top - 1 - i as u64)
        };
    }

    Ok(WorkspaceState {
        leaves,
        active: raw.active,
        recent_files: raw.last_open_files,
    })
}

/// Walks a layout node, collecting its leaves in order.
fn collect_leaves(node: &Value, is_side_panel: bool, out: &mut Vec<EditorLeaf>) {
    if node.get("type").and_then(Value::as_str) == Some("leaf") {
        out.extend(leaf_from(node, is_side_panel));
        return;
    }
    let children = node.get("children").and_then(Value::as_array);
    for child in children.into_iter().flatten() {
        collect_leaves(child, is_side_panel, out);
    }
}

/// Builds an editor leaf from a `leaf` node.
fn leaf_from(node: &Value, is_side_panel: bool) -> Option<EditorLeaf> {
    let id = node.get("id")?.as_str()?.to_string();
    let state = node.get("state");
    let str_at = |ptr: &str| state.and_then(|s| s.pointer(ptr)).and_then(Value::as_str);

    let view_type = str_at("/type").unwrap_or("empty").to_string();
    let file = str_at("/state/file").map(VaultFile::new);
    let title = str_at("/title")
        .map(str::to_string)
        .or_else(|| file.as_ref().map(|f| f.basename.clone()))
        .unwrap_or_else(|| view_type.clone());
    Some(EditorLeaf {
        id,
        view_type,
        title,
        file,
        last_active: 0,
        is_side_panel,
    })
}

/// Bookmark file contents.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBookmarks {
    /// Top level items.
    items: Vec<RawBookmark>,
}

/// A stored bookmark.
#[derive(Debug, Deserialize)]
struct RawBookmark {
    /// Bookmark type.
    #[serde(rename = "type")]
    kind: String,
    /// User title.
    title: Option<String>,
    /// Target path.
    path: Option<String>,
    /// Heading or block subpath.
    subpath: Option<String>,
    /// Search query.
    query: Option<String>,
    /// Group children.
    #[serde(default)]
    items: Vec<RawBookmark>,
}

impl RawBookmark {
    /// Converts to a bookmark item. Types the switcher cannot open are dropped.
    fn into_item(self) -> Option<BookmarkItem> {
        let kind = match self.kind.as_str() {
            "file" => BookmarkKind::File,
            "folder" => BookmarkKind::Folder,
            "search" => BookmarkKind::Search,
            "heading" | "block" => BookmarkKind::Heading,
            "group" => BookmarkKind::Group,
            other => {
                debug!(kind = other, "skipping unsupported bookmark");
                return None;
            }
        };
        let title = match self.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self.default_title(kind),
        };
        Some(BookmarkItem {
            kind,
            title,
            path: self.path,
            subpath: self.subpath,
            query: self.query,
            children: self.items.into_iter().filter_map(Self::into_item).collect(),
        })
    }

    /// Title for an untitled bookmark.
    fn default_title(&self, kind: BookmarkKind) -> String {
        let path = self.path.as_deref().unwrap_or_default();
        match kind {
            BookmarkKind::File => VaultFile::new(path).basename,
            BookmarkKind::Folder => path.rsplit('/').next().unwrap_or(path).to_string(),
            BookmarkKind::Search => self.query.clone().unwrap_or_default(),
            BookmarkKind::Heading => {
                let subpath = self.subpath.as_deref().unwrap_or_default();
                subpath.trim_start_matches(['#', '^']).to_string()
            }
            BookmarkKind::Group => String::new(),
        }
    }
}

/// Parses `bookmarks.json`.
pub fn parse_bookmarks(content: &str) -> Result<Vec<BookmarkItem>, serde_json::Error> {
    let raw: RawBookmarks = serde_json::from_str(content)?;
    Ok(raw.items.into_iter().filter_map(RawBookmark::into_item).collect())
}

/// Saved layouts file contents.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWorkspaces {
    /// Layouts keyed by name.
    workspaces: BTreeMap<String, Value>,
}

/// Parses `workspaces.json`, sorted by name.
pub fn parse_workspaces(content: &str) -> Result<Vec<WorkspaceEntry>, serde_json::Error> {
    let raw: RawWorkspaces = serde_json::from_str(content)?;
    Ok(raw
        .workspaces
        .into_keys()
        .map(|id| WorkspaceEntry { id })
        .collect())
}

/// Registry file contents.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRegistry {
    /// Vaults keyed by id.
    vaults: BTreeMap<String, RawVault>,
}

/// A registered vault.
#[derive(Debug, Deserialize)]
struct RawVault {
    /// Absolute path.
    path: PathBuf,
    /// Open in the application.
    #[serde(default)]
    open: bool,
}

/// Parses the application's vault registry (`obsidian.json`), sorted by name.
pub fn parse_vault_registry(content: &str) -> Result<Vec<VaultEntry>, serde_json::Error> {
    let raw: RawRegistry = serde_json::from_str(content)?;
    let mut vaults: Vec<_> = raw
        .vaults
        .into_values()
        .map(|v| VaultEntry {
            name: v
                .path
                .file_name()
                .map_or_else(|| v.path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            path: v.path.display().to_string(),
            is_open: v.open,
        })
        .collect();
    vaults.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(vaults)
}

/// Loads a vault registry file.
pub fn load_vault_registry(path: &Path) -> Result<Vec<VaultEntry>, VaultError> {
    let content = fs::read_to_string(path).map_err(|source| VaultError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_vault_registry(&content).map_err(|source| VaultError::ParseState {
        path: path.to_path_buf(),
        source,
    })
}
