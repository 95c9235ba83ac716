//! A vault source backed by a directory on disk.

use std::{
    collections::BTreeMap,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use qs_core::{
    BookmarkItem, EditorLeaf, FileMetadata, LinkMap, SourceError, VaultEntry, VaultFile,
    VaultSource, WorkspaceEntry,
};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    VaultError, VaultState, WorkspaceState, build_link_maps, extract_metadata, parse_canvas,
};

/// Id given to the leaf added by [`DirectoryVault::with_active_file`].
pub const ACTIVE_LEAF_ID: &str = "qs-active";

/// Every file under a vault root, with parsed metadata, link maps and application state.
///
/// Everything is read once by [`DirectoryVault::open`]; the source does not watch the disk.
#[derive(Debug)]
pub struct DirectoryVault {
    /// Vault root.
    root: PathBuf,
    /// Files, sorted by path.
    files: Vec<VaultFile>,
    /// Metadata for notes and canvases, keyed by path.
    metadata: BTreeMap<String, FileMetadata>,
    /// Resolved link counts.
    resolved: LinkMap,
    /// Unresolved link counts.
    unresolved: LinkMap,
    /// State from the `.obsidian` folder.
    state: VaultState,
    /// Known vaults, when a registry was supplied.
    vaults: Option<Vec<VaultEntry>>,
}

impl DirectoryVault {
    /// Walks `root` and parses every note and canvas in it.
    ///
    /// Hidden files and folders are skipped. A file that cannot be read is listed without
    /// metadata.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, VaultError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(VaultError::NotADirectory { path: root });
        }
        let started = Instant::now();

        let mut files = Vec::new();
        let mut metadata = BTreeMap::new();
        for (abs_path, file) in discover(&root)? {
            if let Some(meta) = read_metadata(&abs_path, &file) {
                metadata.insert(file.path.clone(), meta);
            }
            files.push(file);
        }
        files.sort();

        let (resolved, unresolved) = build_link_maps(&files, &metadata);
        let state = VaultState::load(&root);
        debug!(
            root = %root.display(),
            files = files.len(),
            parsed = metadata.len(),
            elapsed = ?started.elapsed(),
            "opened vault"
        );
        Ok(Self {
            root,
            files,
            metadata,
            resolved,
            unresolved,
            state,
            vaults: None,
        })
    }

    /// Focuses the editor showing `path`, adding one when no editor shows it.
    ///
    /// The file also moves to the front of the recent files.
    pub fn with_active_file(mut self, path: &str) -> Self {
        let file = VaultFile::new(path);
        let workspace = self.state.workspace.get_or_insert_with(WorkspaceState::default);
        let top = workspace.leaves.iter().map(|l| l.last_active).max().unwrap_or(0) + 1;

        let existing = workspace
            .leaves
            .iter_mut()
            .find(|l| !l.is_side_panel && l.file.as_ref() == Some(&file));
        let id = match existing {
            Some(leaf) => {
                leaf.last_active = top;
                leaf.id.clone()
            }
            None => {
                workspace.leaves.push(EditorLeaf {
                    id: ACTIVE_LEAF_ID.to_string(),
                    view_type: view_type_of(&file).to_string(),
                    title: file.basename.clone(),
                    file: Some(file.clone()),
                    last_active: top,
                    is_side_panel: false,
                });
                ACTIVE_LEAF_ID.to_string()
            }
        };
        workspace.active = Some(id);
        workspace.recent_files.retain(|p| *p != file.path);
        workspace.recent_files.insert(0, file.path);
        self
    }

    /// Supplies the list of known vaults. The entry whose path resolves to this vault's root
    /// is marked open.
    pub fn with_vault_registry(mut self, mut vaults: Vec<VaultEntry>) -> Self {
        for vault in &mut vaults {
            if same_dir(Path::new(&vault.path), &self.root) {
                vault.is_open = true;
            }
        }
        self.vaults = Some(vaults);
        self
    }

    /// Vault root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loaded application state.
    pub fn state(&self) -> &VaultState {
        &self.state
    }

    /// The workspace state, or an unavailable error naming `what`.
    fn workspace(&self, what: &'static str) -> Result<&WorkspaceState, SourceError> {
        self.state
            .workspace
            .as_ref()
            .ok_or(SourceError::Unavailable(what))
    }
}

/// Lists the files under `root` with their vault paths.
fn discover(root: &Path) -> Result<Vec<(PathBuf, VaultFile)>, VaultError> {
    let mut found = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(VaultError::Walk {
                    path: root.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        found.push((entry.path().to_path_buf(), VaultFile::new(&path)));
    }
    Ok(found)
}

/// Checks if a file name is hidden (starts with '.').
fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// Parses a note or canvas. None for other files and for files that cannot be used.
fn read_metadata(abs_path: &Path, file: &VaultFile) -> Option<FileMetadata> {
    if !matches!(file.extension.as_str(), "md" | "canvas") {
        return None;
    }
    let content = match fs::read_to_string(abs_path) {
        Ok(content) => content,
        Err(source) => {
            let error = VaultError::ReadFile {
                path: abs_path.to_path_buf(),
                source,
            };
            warn!(%error, "skipping metadata");
            return None;
        }
    };
    if file.is_markdown() {
        return Some(extract_metadata(&content));
    }
    match parse_canvas(&content) {
        Ok(canvas_nodes) => Some(FileMetadata {
            canvas_nodes,
            ..FileMetadata::default()
        }),
        Err(source) => {
            let error = VaultError::ParseState {
                path: abs_path.to_path_buf(),
                source,
            };
            warn!(%error, "skipping canvas metadata");
            None
        }
    }
}

/// View type an editor uses for `file`.
fn view_type_of(file: &VaultFile) -> &'static str {
    match file.extension.as_str() {
        "md" => "markdown",
        "canvas" => "canvas",
        "pdf" => "pdf",
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "svg" | "webp" => "image",
        "mp3" | "wav" | "m4a" | "ogg" | "flac" => "audio",
        "mp4" | "webm" | "mov" | "mkv" => "video",
        _ => "empty",
    }
}

impl VaultSource for DirectoryVault {
    fn files(&self) -> Result<Vec<VaultFile>, SourceError> {
        Ok(self.files.clone())
    }

    fn metadata(&self, path: &str) -> Result<FileMetadata, SourceError> {
        if let Some(meta) = self.metadata.get(path) {
            return Ok(meta.clone());
        }
        if self.files.iter().any(|f| f.path == path) {
            return Ok(FileMetadata::default());
        }
        Err(SourceError::NotFound(path.to_string()))
    }

    fn resolved_links(&self) -> Result<LinkMap, SourceError> {
        Ok(self.resolved.clone())
    }

    fn unresolved_links(&self) -> Result<LinkMap, SourceError> {
        Ok(self.unresolved.clone())
    }

    fn recent_files(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.workspace("recent files")?.recent_files.clone())
    }

    fn open_leaves(&self) -> Result<Vec<EditorLeaf>, SourceError> {
        Ok(self.workspace("open editors")?.leaves.clone())
    }

    fn active_leaf(&self) -> Option<EditorLeaf> {
        self.state.workspace.as_ref()?.active_leaf().cloned()
    }

    fn bookmarks(&self) -> Result<Vec<BookmarkItem>, SourceError> {
        self.state
            .bookmarks
            .clone()
            .ok_or(SourceError::Unavailable("bookmarks"))
    }

    fn workspaces(&self) -> Result<Vec<WorkspaceEntry>, SourceError> {
        self.state
            .workspaces
            .clone()
            .ok_or(SourceError::Unavailable("workspaces"))
    }

    fn vaults(&self) -> Result<Vec<VaultEntry>, SourceError> {
        self.vaults.clone().ok_or(SourceError::Unavailable("vaults"))
    }
}

/// Whether two paths name the same directory once `.`, `..` and symlinks are resolved. Paths
/// that cannot be resolved compare as written.
fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault_with(files: &[(&str, &str)]) -> (tempfile::TempDir, DirectoryVault) {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let abs = dir.path().join(path);
            fs::create_dir_all(abs.parent().unwrap()).unwrap();
            fs::write(abs, content).unwrap();
        }
        let vault = DirectoryVault::open(dir.path()).unwrap();
        (dir, vault)
    }

    #[test]
    fn lists_files_with_slash_paths_and_skips_hidden() {
        let (_dir, vault) = vault_with(&[
            ("b.md", "# B"),
            ("notes/a.md", "# A"),
            ("img/pic.png", ""),
            (".trash/old.md", ""),
            (".obsidian/app.json", "{}"),
        ]);
        let paths: Vec<_> = vault.files().unwrap().into_iter().map(|f| f.path).collect();
        assert_eq!(paths, vec!["b.md", "img/pic.png", "notes/a.md"]);
    }

    #[test]
    fn metadata_for_notes_canvases_and_attachments() {
        let (_dir, vault) = vault_with(&[
            ("a.md", "# Title\n[[b]]"),
            ("b.md", ""),
            ("board.canvas", r#"{"nodes": [{"id": "n", "type": "text", "text": "Hi"}]}"#),
            ("pic.png", ""),
        ]);
        assert_eq!(vault.metadata("a.md").unwrap().headings[0].heading, "Title");
        assert_eq!(vault.metadata("board.canvas").unwrap().canvas_nodes[0].text, "Hi");
        assert_eq!(vault.metadata("pic.png").unwrap(), FileMetadata::default());
        assert!(matches!(
            vault.metadata("missing.md"),
            Err(SourceError::NotFound(_))
        ));
        assert_eq!(vault.resolved_links().unwrap()["a.md"]["b.md"], 1);
    }

    #[test]
    fn state_sources_are_unavailable_without_state_files() {
        let (_dir, vault) = vault_with(&[("a.md", "")]);
        assert!(matches!(vault.open_leaves(), Err(SourceError::Unavailable(_))));
        assert!(matches!(vault.bookmarks(), Err(SourceError::Unavailable(_))));
        assert!(matches!(vault.vaults(), Err(SourceError::Unavailable(_))));
        assert!(vault.active_leaf().is_none());
    }

    #[test]
    fn active_file_adds_a_focused_leaf() {
        let (_dir, vault) = vault_with(&[("notes/a.md", ""), ("b.md", "")]);
        let vault = vault.with_active_file("notes/a.md");

        let leaf = vault.active_leaf().unwrap();
        assert_eq!(leaf.id, ACTIVE_LEAF_ID);
        assert_eq!(leaf.view_type, "markdown");
        assert_eq!(leaf.title, "a");
        assert_eq!(vault.recent_files().unwrap(), vec!["notes/a.md"]);
    }

    #[test]
    fn active_file_reuses_an_open_leaf() {
        let workspace = r#"{
            "main": {"type": "tabs", "children": [
                {"id": "x", "type": "leaf",
                 "state": {"type": "markdown", "state": {"file": "a.md"}}},
                {"id": "y", "type": "leaf",
                 "state": {"type": "markdown", "state": {"file": "b.md"}}}
            ]},
            "active": "y",
            "lastOpenFiles": ["b.md", "a.md"]
        }"#;
        let (_dir, vault) = vault_with(&[
            ("a.md", ""),
            ("b.md", ""),
            (".obsidian/workspace.json", workspace),
        ]);
        let vault = vault.with_active_file("a.md");

        let active = vault.active_leaf().unwrap();
        assert_eq!(active.id, "x");
        let leaves = vault.open_leaves().unwrap();
        assert!(leaves.iter().all(|l| l.id == "x" || l.last_active < active.last_active));
        assert_eq!(vault.recent_files().unwrap(), vec!["a.md", "b.md"]);
    }

    #[test]
    fn registry_marks_this_vault_open() {
        let (dir, vault) = vault_with(&[("a.md", "")]);
        let entry = |name: &str, path: &Path| VaultEntry {
            name: name.to_string(),
            path: path.display().to_string(),
            is_open: false,
        };
        let vault = vault.with_vault_registry(vec![
            entry("this", dir.path()),
            entry("other", Path::new("/elsewhere")),
        ]);
        let open: Vec<_> = vault.vaults().unwrap().into_iter().map(|v| v.is_open).collect();
        assert_eq!(open, vec![true, false]);
    }

    #[test]
    fn registry_matches_an_unnormalized_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.md"), "").unwrap();
        let vault = DirectoryVault::open(dir.path().join("sub").join(".."))
            .unwrap()
            .with_vault_registry(vec![VaultEntry {
                name: "this".to_string(),
                path: format!("{}/", dir.path().display()),
                is_open: false,
            }]);
        assert!(vault.vaults().unwrap()[0].is_open);
    }

    #[test]
    fn root_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.md");
        fs::write(&file, "").unwrap();
        assert!(matches!(
            DirectoryVault::open(&file),
            Err(VaultError::NotADirectory { .. })
        ));
    }
}
