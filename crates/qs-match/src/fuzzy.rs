//! Fuzzy scoring built on the skim v2 algorithm.

use std::{fmt, ops::Range};

use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use serde::Serialize;

use crate::ranges::char_indices_to_ranges;

/// The outcome of a successful match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FuzzyMatch {
    /// Higher is better. Zero for an empty query.
    pub score: i64,
    /// Matched byte ranges of the candidate, sorted and merged.
    pub ranges: Vec<Range<usize>>,
}

/// Case-insensitive fuzzy matcher.
pub struct Matcher {
    /// Underlying scorer.
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher").finish_non_exhaustive()
    }
}

impl Matcher {
    /// Creates a matcher.
    pub fn new() -> Self {
        Self {
            inner: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Matches `query` against `text`.
    ///
    /// Returns `None` when the query's characters do not occur in order in `text`. Whitespace
    /// in the query only separates words and is never required in `text`. An empty query
    /// matches everything with a score of zero and no ranges.
    pub fn fuzzy_match(&self, query: &str, text: &str) -> Option<FuzzyMatch> {
        let pattern = normalize_query(query);
        if pattern.is_empty() {
            return Some(FuzzyMatch::default());
        }

        let (score, indices) = self.inner.fuzzy_indices(text, &pattern)?;
        Some(FuzzyMatch {
            score,
            ranges: char_indices_to_ranges(text, &indices),
        })
    }

    /// Returns true if `query` matches `text`.
    pub fn is_match(&self, query: &str, text: &str) -> bool {
        self.fuzzy_match(query, text).is_some()
    }
}

/// Removes whitespace from a query, joining its words into one pattern.
pub fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect()
}
