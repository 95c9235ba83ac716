//! Link resolution and the resolved/unresolved link maps.
//!
//! A link target is resolved the way wiki links are resolved in a vault:
//!
//! 1. `./` and `../` targets are joined to the linking file's folder.
//! 2. An exact vault path, with or without the `.md` extension, wins.
//! 3. Otherwise any file whose path ends with the target matches. A file in the linking
//!    file's folder is preferred, then the shortest path.
//!
//! Matching ignores case.

use std::collections::{BTreeMap, HashMap};

use qs_core::{FileMetadata, LinkMap, VaultFile};

/// Strips the `#heading` or `#^block` subpath from a link.
pub fn link_target(link: &str) -> &str {
    link.split_once('#').map_or(link, |(target, _)| target).trim()
}

/// Resolves link text to vault files.
#[derive(Debug)]
pub struct LinkResolver<'a> {
    /// Files keyed by lowercase path.
    by_path: HashMap<String, &'a VaultFile>,
    /// Files keyed by lowercase file name.
    by_name: HashMap<String, Vec<&'a VaultFile>>,
}

impl<'a> LinkResolver<'a> {
    /// Indexes `files` for resolution.
    pub fn new(files: &'a [VaultFile]) -> Self {
        let mut by_path = HashMap::new();
        let mut by_name: HashMap<String, Vec<&VaultFile>> = HashMap::new();
        for file in files {
            by_path.insert(file.path.to_lowercase(), file);
            by_name
                .entry(file.name().to_lowercase())
                .or_default()
                .push(file);
        }
        Self { by_path, by_name }
    }

    /// Resolves `link`, written in the file at `source_path`.
    pub fn resolve(&self, link: &str, source_path: &str) -> Option<&'a VaultFile> {
        let target = link_target(link);
        if target.is_empty() {
            return None;
        }
        let target = target.trim_start_matches('/').to_lowercase();
        let source_dir = VaultFile::new(source_path).parent().to_lowercase();

        if target.starts_with("./") || target.starts_with("../") {
            let joined = normalize(&source_dir, &target)?;
            return self.exact(&joined);
        }
        self.exact(&target).or_else(|| self.by_suffix(&target, &source_dir))
    }

    /// A file at exactly `path`, or at `path.md`.
    fn exact(&self, path: &str) -> Option<&'a VaultFile> {
        self.by_path
            .get(path)
            .or_else(|| self.by_path.get(&format!("{path}.md")))
            .copied()
    }

    /// The best file whose path ends with `target`.
    fn by_suffix(&self, target: &str, source_dir: &str) -> Option<&'a VaultFile> {
        let name = target.rsplit('/').next().unwrap_or(target);
        let with_md = format!("{name}.md");
        let suffix_md = format!("{target}.md");
        self.by_name
            .get(&with_md)
            .into_iter()
            .flatten()
            .filter(|f| ends_with_segment(&f.path.to_lowercase(), &suffix_md))
            .chain(
                self.by_name
                    .get(name)
                    .into_iter()
                    .flatten()
                    .filter(|f| ends_with_segment(&f.path.to_lowercase(), target)),
            )
            .min_by_key(|f| (f.parent().to_lowercase() != source_dir, f.path.len()))
            .copied()
    }
}

/// True if `path` ends with `suffix` at a folder boundary.
fn ends_with_segment(path: &str, suffix: &str) -> bool {
    path == suffix || path.ends_with(&format!("/{suffix}"))
}

/// Joins a relative target to a folder, resolving `.` and `..`. Returns None when the
/// target climbs above the vault root.
fn normalize(dir: &str, target: &str) -> Option<String> {
    let mut parts: Vec<&str> = dir.split('/').filter(|p| !p.is_empty()).collect();
    for part in target.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

/// Builds the resolved and unresolved link maps from parsed metadata.
///
/// Links and embeds both count. Resolved entries are keyed by target path; unresolved entries
/// by the link text without its subpath. Links a file makes to itself are left out of the
/// resolved map.
pub fn build_link_maps(
    files: &[VaultFile],
    metadata: &BTreeMap<String, FileMetadata>,
) -> (LinkMap, LinkMap) {
    let resolver = LinkResolver::new(files);
    let mut resolved = LinkMap::new();
    let mut unresolved = LinkMap::new();

    for (source, meta) in metadata {
        for link in meta.links.iter().chain(&meta.embeds) {
            let target = link_target(&link.link);
            if target.is_empty() {
                continue;
            }
            match resolver.resolve(target, source) {
                Some(file) if file.path == *source => {}
                Some(file) => {
                    *resolved
                        .entry(source.clone())
                        .or_default()
                        .entry(file.path.clone())
                        .or_default() += 1;
                }
                None => {
                    *unresolved
                        .entry(source.clone())
                        .or_default()
                        .entry(target.to_string())
                        .or_default() += 1;
                }
            }
        }
    }
    (resolved, unresolved)
}
