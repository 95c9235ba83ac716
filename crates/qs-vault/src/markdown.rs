//! Symbol extraction from markdown notes.
//!
//! Headings, markdown links and images come from the CommonMark parser. Wiki links
//! (`[[note|alias]]`, `![[embed]]`) and tags (`#tag`) are not CommonMark syntax, so they are
//! found by scanning the source text, skipping code blocks and inline code.

use std::{iter, ops::Range};

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use qs_core::{CalloutCache, FileMetadata, HeadingCache, LinkCache, TagCache};

use crate::parse_frontmatter;

/// Converts byte offsets into zero-based line numbers.
struct LineIndex {
    /// Byte offset of the start of every line.
    starts: Vec<usize>,
}

impl LineIndex {
    /// Indexes the line starts of `content`.
    fn new(content: &str) -> Self {
        let starts = iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// Line containing `offset`.
    fn line_of(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }
}

/// A link or image whose text is still being collected.
struct OpenLink {
    /// Image syntax, i.e. an embed.
    embed: bool,
    /// Byte offset of the link.
    start: usize,
    /// Destination as written.
    dest: String,
    /// Link text.
    text: String,
}

/// Extracts headings, links, embeds, tags, callouts and aliases from a note.
pub fn extract_metadata(content: &str) -> FileMetadata {
    let (frontmatter, body_start) = parse_frontmatter(content);
    let lines = LineIndex::new(content);

    let mut metadata = FileMetadata {
        aliases: frontmatter.map(|fm| fm.alias_list()).unwrap_or_default(),
        ..FileMetadata::default()
    };
    let mut code: Vec<Range<usize>> = Vec::new();
    let mut links: Vec<(usize, LinkCache)> = Vec::new();
    let mut embeds: Vec<(usize, LinkCache)> = Vec::new();
    let mut heading: Option<(HeadingLevel, usize, String)> = None;
    let mut link: Option<OpenLink> = None;

    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(&content[body_start..], options);
    for (event, range) in parser.into_offset_iter() {
        let range = (range.start + body_start)..(range.end + body_start);
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((level, range.start, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, start, text)) = heading.take() {
                    metadata.headings.push(HeadingCache {
                        heading: text.trim().to_string(),
                        level: heading_level_to_u8(level),
                        line: lines.line_of(start),
                    });
                }
            }
            Event::Start(Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. }) => {
                link = Some(OpenLink {
                    embed: content[range.start..].starts_with('!'),
                    start: range.start,
                    dest: dest_url.to_string(),
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Link | TagEnd::Image) => {
                if let Some(open) = link.take().filter(|l| is_internal(&l.dest)) {
                    let cache = LinkCache {
                        link: decode_spaces(&open.dest),
                        display_text: (!open.text.is_empty()).then_some(open.text),
                        line: lines.line_of(open.start),
                    };
                    let list = if open.embed { &mut embeds } else { &mut links };
                    list.push((open.start, cache));
                }
            }
            Event::Start(Tag::CodeBlock(_)) => code.push(range),
            Event::Start(Tag::BlockQuote(_)) => {
                let first_line = content[range.start..].lines().next().unwrap_or_default();
                if let Some((callout_type, title)) = parse_callout(first_line) {
                    metadata.callouts.push(CalloutCache {
                        callout_type,
                        title,
                        line: lines.line_of(range.start),
                    });
                }
            }
            Event::Code(text) => {
                code.push(range);
                append_text(heading.as_mut(), link.as_mut(), &text);
            }
            Event::Text(text) => append_text(heading.as_mut(), link.as_mut(), &text),
            _ => {}
        }
    }

    scan_wikilinks(content, body_start, &code, &lines, &mut links, &mut embeds);
    links.sort_by_key(|(start, _)| *start);
    embeds.sort_by_key(|(start, _)| *start);
    metadata.links = links.into_iter().map(|(_, l)| l).collect();
    metadata.embeds = embeds.into_iter().map(|(_, l)| l).collect();
    metadata.tags = scan_tags(content, body_start, &code, &lines);
    metadata
}

/// Adds inline text to the heading or link being collected.
fn append_text(
    heading: Option<&mut (HeadingLevel, usize, String)>,
    link: Option<&mut OpenLink>,
    text: &str,
) {
    if let Some((_, _, heading_text)) = heading {
        heading_text.push_str(text);
    }
    if let Some(open) = link {
        open.text.push_str(text);
    }
}

/// Converts a pulldown_cmark HeadingLevel to a u8 (1-6).
fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Returns true for links into the vault rather than to the web.
fn is_internal(dest: &str) -> bool {
    !dest.is_empty() && !dest.contains("://") && !dest.starts_with("mailto:")
}

/// Decodes the `%20` escapes markdown links use for spaces.
fn decode_spaces(dest: &str) -> String {
    dest.replace("%20", " ")
}

/// Returns true if `offset` lies inside code.
fn in_code(code: &[Range<usize>], offset: usize) -> bool {
    code.iter().any(|r| r.contains(&offset))
}

/// Parses the `[!type] title` line that opens a callout.
fn parse_callout(line: &str) -> Option<(String, String)> {
    let line = line.trim_start_matches(|c: char| c == '>' || c.is_whitespace());
    let (kind, rest) = line.strip_prefix("[!")?.split_once(']')?;
    if kind.is_empty() || kind.contains(char::is_whitespace) {
        return None;
    }
    let title = rest.trim_start_matches(['+', '-']).trim();
    Some((kind.to_lowercase(), title.to_string()))
}

/// Finds `[[target|alias]]` links and `![[target]]` embeds outside code.
fn scan_wikilinks(
    content: &str,
    from: usize,
    code: &[Range<usize>],
    lines: &LineIndex,
    links: &mut Vec<(usize, LinkCache)>,
    embeds: &mut Vec<(usize, LinkCache)>,
) {
    let mut pos = from;
    while let Some(found) = content[pos..].find("[[") {
        let start = pos + found;
        let inner_start = start + 2;
        let Some(len) = content[inner_start..].find("]]") else {
            break;
        };
        let inner = &content[inner_start..inner_start + len];
        if inner.contains('\n') || inner.trim().is_empty() || in_code(code, start) {
            pos = inner_start;
            continue;
        }
        pos = inner_start + len + 2;

        let (target, alias) = match inner.split_once('|') {
            Some((target, alias)) => (target.trim(), Some(alias.trim().to_string())),
            None => (inner.trim(), None),
        };
        let cache = LinkCache {
            link: target.to_string(),
            display_text: alias.filter(|a| !a.is_empty()),
            line: lines.line_of(start),
        };
        if start > from && content[..start].ends_with('!') {
            embeds.push((start - 1, cache));
        } else {
            links.push((start, cache));
        }
    }
}

/// Characters allowed in a tag name.
fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '/')
}

/// Finds `#tags` outside code. A tag starts a line or follows whitespace and needs at least
/// one character that is not a digit.
fn scan_tags(
    content: &str,
    from: usize,
    code: &[Range<usize>],
    lines: &LineIndex,
) -> Vec<TagCache> {
    let body = &content[from..];
    let mut tags = Vec::new();
    let mut prev: Option<char> = None;
    for (i, c) in body.char_indices() {
        let at_boundary = prev.is_none_or(char::is_whitespace);
        prev = Some(c);
        if c != '#' || !at_boundary || in_code(code, from + i) {
            continue;
        }
        let rest = &body[i + 1..];
        let end = rest.find(|ch: char| !is_tag_char(ch)).unwrap_or(rest.len());
        let name = rest[..end].trim_end_matches('/');
        if name.chars().any(|ch| !ch.is_ascii_digit()) {
            tags.push(TagCache {
                tag: format!("#{name}"),
                line: lines.line_of(from + i),
            });
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "---
aliases: [Roadmap]
---
# Plan

Intro with #planning and [[Goals|our goals]].

## Milestones #q1

- see [budget](Finance/budget.md) and [site](https://example.com)
- ![[diagram.png]]
- ![chart](img/chart.png)

> [!warning]- Careful here
> body

```rust
// #not-a-tag [[not a link]]
```

Inline `#code` and #123 but #2024-review counts.
";

    #[test]
    fn headings_with_lines() {
        let meta = extract_metadata(NOTE);
        let headings: Vec<_> = meta
            .headings
            .iter()
            .map(|h| (h.heading.as_str(), h.level, h.line))
            .collect();
        assert_eq!(headings, vec![("Plan", 1, 3), ("Milestones #q1", 2, 7)]);
    }

    #[test]
    fn aliases_from_frontmatter() {
        assert_eq!(extract_metadata(NOTE).aliases, vec!["Roadmap"]);
    }

    #[test]
    fn links_in_document_order() {
        let meta = extract_metadata(NOTE);
        let links: Vec<_> = meta
            .links
            .iter()
            .map(|l| (l.link.as_str(), l.display_text.as_deref(), l.line))
            .collect();
        assert_eq!(
            links,
            vec![
                ("Goals", Some("our goals"), 5),
                ("Finance/budget.md", Some("budget"), 9),
            ]
        );
    }

    #[test]
    fn embeds_from_both_syntaxes() {
        let meta = extract_metadata(NOTE);
        let embeds: Vec<_> = meta.embeds.iter().map(|l| (l.link.as_str(), l.line)).collect();
        assert_eq!(embeds, vec![("diagram.png", 10), ("img/chart.png", 11)]);
    }

    #[test]
    fn tags_skip_code_and_numbers() {
        let meta = extract_metadata(NOTE);
        let tags: Vec<_> = meta.tags.iter().map(|t| (t.tag.as_str(), t.line)).collect();
        assert_eq!(
            tags,
            vec![("#planning", 5), ("#q1", 7), ("#2024-review", 20)]
        );
    }

    #[test]
    fn callouts() {
        let meta = extract_metadata(NOTE);
        assert_eq!(meta.callouts.len(), 1);
        assert_eq!(meta.callouts[0].callout_type, "warning");
        assert_eq!(meta.callouts[0].title, "Careful here");
        assert_eq!(meta.callouts[0].line, 13);
    }

    #[test]
    fn plain_quote_is_not_a_callout() {
        let meta = extract_metadata("> just a quote\n");
        assert!(meta.callouts.is_empty());
    }

    #[test]
    fn unclosed_wikilink_is_ignored() {
        let meta = extract_metadata("[[open\nand [[closed]]\n");
        let links: Vec<_> = meta.links.iter().map(|l| l.link.as_str()).collect();
        assert_eq!(links, vec!["closed"]);
    }

    #[test]
    fn escaped_spaces_in_markdown_links() {
        let meta = extract_metadata("[x](My%20Note.md)\n");
        assert_eq!(meta.links[0].link, "My Note.md");
    }
}
