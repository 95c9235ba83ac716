//! Syntax highlighting, match emphasis and terminal colors for qs.
//!
//! TOML highlighting is used to show settings files; [`emphasize`] marks the characters a
//! query matched inside a suggestion's text.

#![warn(missing_docs)]

use std::ops::Range;

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions, including TOML from the two-face extras.
    syntax_set: SyntaxSet,
    /// Color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme in use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML content.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights content as the language with the given extension or name.
    ///
    /// Unknown languages are rendered as plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI color codes.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text, for headers.
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow text, for warnings and matched characters.
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text, for errors.
    pub const RED: &str = "\x1b[31m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Wraps the byte `ranges` of `text` in bold yellow.
///
/// Ranges must be sorted and disjoint, as match results are. Ranges that fall outside `text`
/// or split a character are skipped.
pub fn emphasize(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len() + ranges.len() * 12);
    let mut pos = 0;
    for range in ranges {
        if range.start < pos
            || range.end > text.len()
            || range.is_empty()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            continue;
        }
        out.push_str(&text[pos..range.start]);
        out.push_str(colors::BOLD);
        out.push_str(colors::YELLOW);
        out.push_str(&text[range.clone()]);
        out.push_str(colors::RESET);
        pos = range.end;
    }
    out.push_str(&text[pos..]);
    out
}

/// Formats a header in bold cyan.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as dimmed.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Formats text as an error (red).
pub fn error(text: &str) -> String {
    format!("{}{}{}", colors::RED, text, colors::RESET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_is_highlighted() {
        let output = Highlighter::new().highlight_toml("[general]\nlimit = 50\n");
        assert!(output.contains("\x1b["));
        assert!(output.ends_with(colors::RESET));
    }

    #[test]
    fn unknown_syntax_falls_back_to_plain_text() {
        let output = Highlighter::new().highlight("just words\n", "no-such-language");
        assert!(output.contains("just words"));
    }

    #[test]
    fn toml_syntax_available() {
        assert!(extra_syntaxes().find_syntax_by_extension("toml").is_some());
    }

    #[test]
    fn emphasize_wraps_ranges() {
        let out = emphasize("foobar", &[0..1, 3..4]);
        let marked = format!("{}{}", colors::BOLD, colors::YELLOW);
        assert_eq!(
            out,
            format!("{marked}f{r}oo{marked}b{r}ar", r = colors::RESET)
        );
    }

    #[test]
    fn emphasize_skips_bad_ranges() {
        assert_eq!(emphasize("héllo", &[2..3]), "héllo");
        assert_eq!(emphasize("abc", &[1..9]), "abc");
        assert_eq!(emphasize("abc", &[]), "abc");
    }

    #[test]
    fn styles_reset() {
        for styled in [header("h"), dim("d"), warning("w"), error("e")] {
            assert!(styled.ends_with(colors::RESET));
        }
    }
}
