//! YAML frontmatter parsing for notes.
//!
//! Frontmatter is optional metadata at the start of a note, delimited by `---`:
//!
//! ```markdown
//! ---
//! aliases: [Roadmap, Plan 2024]
//! tags: [planning]
//! ---
//!
//! # Content starts here
//! ```

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
use tracing::warn;

/// Parsed frontmatter from a note.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    /// Alternative names for the note. Accepts `alias` too, and a single string.
    #[serde(alias = "alias")]
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub aliases: Option<Vec<String>>,
    /// Note tags, without the leading `#`.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub tags: Option<Vec<String>>,
}

impl Frontmatter {
    /// Non-empty aliases, trimmed.
    pub fn alias_list(&self) -> Vec<String> {
        self.aliases
            .iter()
            .flatten()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Parses YAML frontmatter from note content.
///
/// Returns the parsed frontmatter, if valid, and the byte offset where the body starts. When
/// the delimiters are present but the YAML is malformed the body still starts after the
/// closing delimiter; without a complete frontmatter block it starts at zero.
pub fn parse_frontmatter(content: &str) -> (Option<Frontmatter>, usize) {
    let Some((yaml, body_start)) = split_frontmatter(content) else {
        return (None, 0);
    };
    match serde_yaml::from_str::<Frontmatter>(yaml) {
        Ok(fm) => (Some(fm), body_start),
        Err(error) => {
            warn!(%error, "ignoring malformed frontmatter");
            (None, body_start)
        }
    }
}

/// Locates the YAML block and the offset just past its closing delimiter line.
fn split_frontmatter(content: &str) -> Option<(&str, usize)> {
    let rest = content.strip_prefix('\u{feff}').unwrap_or(content);
    let bom = content.len() - rest.len();
    let first_line_end = rest.find('\n')?;
    if rest[..first_line_end].trim_end_matches('\r') != "---" {
        return None;
    }

    let yaml_start = bom + first_line_end + 1;
    let mut pos = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Some((&content[yaml_start..pos], pos + line.len()));
        }
        pos += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_list() {
        let content = "---\naliases: [Roadmap, \"Plan: 2024\"]\ntags: [planning]\n---\n# Plan\n";
        let (fm, body) = parse_frontmatter(content);
        let fm = fm.expect("should parse frontmatter");
        assert_eq!(fm.alias_list(), vec!["Roadmap", "Plan: 2024"]);
        assert_eq!(fm.tags, Some(vec!["planning".to_string()]));
        assert!(content[body..].starts_with("# Plan"));
    }

    #[test]
    fn single_alias_string() {
        let (fm, _) = parse_frontmatter("---\nalias: Roadmap\n---\nbody");
        assert_eq!(fm.expect("should parse").alias_list(), vec!["Roadmap"]);
    }

    #[test]
    fn multiline_aliases() {
        let content = "---\naliases:\n  - One\n  - Two\n---\n";
        let (fm, body) = parse_frontmatter(content);
        assert_eq!(fm.expect("should parse").alias_list(), vec!["One", "Two"]);
        assert_eq!(body, content.len());
    }

    #[test]
    fn empty_and_null_fields() {
        let (fm, _) = parse_frontmatter("---\naliases:\n---\n");
        assert!(fm.expect("should parse").alias_list().is_empty());
        let (fm, _) = parse_frontmatter("---\n---\ntext");
        assert!(fm.expect("should parse empty block").aliases.is_none());
    }

    #[test]
    fn no_frontmatter() {
        let (fm, body) = parse_frontmatter("# Just a heading\n\n---\nnot: yaml\n---\n");
        assert!(fm.is_none());
        assert_eq!(body, 0);
    }

    #[test]
    fn malformed_yaml_still_skips_block() {
        let content = "---\naliases: [unclosed\n---\nBody";
        let (fm, body) = parse_frontmatter(content);
        assert!(fm.is_none());
        assert_eq!(&content[body..], "Body");
    }

    #[test]
    fn wrongly_typed_fields_are_dropped_with_the_block() {
        let content = "---\naliases: {nested: map}\ntags: [a]\n---\n# Title\n";
        let (fm, body) = parse_frontmatter(content);
        assert!(fm.is_none());
        assert_eq!(&content[body..], "# Title\n");
    }

    #[test]
    fn unclosed_block() {
        let (fm, body) = parse_frontmatter("---\naliases: [a]\n\n# Heading");
        assert!(fm.is_none());
        assert_eq!(body, 0);
    }

    #[test]
    fn bom_and_crlf() {
        let content = "\u{feff}---\r\naliases: [Win]\r\n---\r\nContent";
        let (fm, body) = parse_frontmatter(content);
        assert_eq!(fm.expect("should handle BOM and CRLF").alias_list(), vec!["Win"]);
        assert_eq!(&content[body..], "Content");
    }
}
