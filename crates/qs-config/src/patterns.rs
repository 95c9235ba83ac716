//! Folder and path glob matching.
//!
//! Folder exclusion options hold glob patterns. A pattern excludes a path when it matches the
//! path itself or any of its ancestor folders, so `Archive` excludes `Archive/2024/note.md`.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::ConfigError;

/// A compiled set of path patterns.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    /// Compiled patterns; `None` when no patterns were given.
    set: Option<GlobSet>,
}

impl PathFilter {
    /// Compiles the patterns. An empty list yields a filter that matches nothing.
    pub fn compile(patterns: &[String]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(compile_glob(pattern)?);
        }
        let set = builder.build().map_err(|e| ConfigError::InvalidPattern {
            pattern: patterns.join(", "),
            source: e,
        })?;

        Ok(Self { set: Some(set) })
    }

    /// Returns true if no patterns were compiled.
    pub fn is_empty(&self) -> bool {
        self.set.is_none()
    }

    /// Returns true if `path`, or any folder containing it, matches a pattern.
    ///
    /// `path` is vault relative and uses `/` separators.
    pub fn is_match(&self, path: &str) -> bool {
        let Some(set) = &self.set else {
            return false;
        };
        let path = path.trim_start_matches('/');
        Path::new(path)
            .ancestors()
            .filter(|p| !p.as_os_str().is_empty())
            .any(|p| set.is_match(p))
    }
}

/// Compiles a single glob pattern.
pub fn compile_glob(pattern: &str) -> Result<Glob, ConfigError> {
    Glob::new(pattern.trim_end_matches('/')).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str]) -> PathFilter {
        let patterns: Vec<String> = patterns.iter().map(|s| (*s).to_string()).collect();
        PathFilter::compile(&patterns).unwrap()
    }

    #[test]
    fn empty_filter_matches_nothing() {
        let f = filter(&[]);
        assert!(f.is_empty());
        assert!(!f.is_match("anything.md"));
    }

    #[test]
    fn folder_name_excludes_descendants() {
        let f = filter(&["Archive"]);
        assert!(f.is_match("Archive/2024/note.md"));
        assert!(f.is_match("Archive"));
        assert!(!f.is_match("Notes/Archive.md"));
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let f = filter(&["Templates/"]);
        assert!(f.is_match("Templates/daily.md"));
    }

    #[test]
    fn wildcard_patterns() {
        let f = filter(&["**/drafts", "*.excalidraw.md"]);
        assert!(f.is_match("blog/drafts/post.md"));
        assert!(f.is_match("sketch.excalidraw.md"));
        assert!(!f.is_match("blog/post.md"));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = PathFilter::compile(&["a[".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }
}
