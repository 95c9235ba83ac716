//! Match priority adjustments.
//!
//! Adjustments are additive offsets looked up by name in the settings table. They reorder
//! suggestions within a match type class only: the collector sorts by match type before score,
//! so no adjustment can lift a path match above a basename match.

use qs_config::MatchPriorityAdjustments;

use crate::{MatchType, Suggestion};

/// Resolves final scores from raw fuzzy scores.
#[derive(Debug, Clone, Copy)]
pub struct PriorityResolver<'a> {
    /// Adjustment tables.
    adjustments: &'a MatchPriorityAdjustments,
}

impl<'a> PriorityResolver<'a> {
    /// Creates a resolver over the given tables.
    pub fn new(adjustments: &'a MatchPriorityAdjustments) -> Self {
        Self { adjustments }
    }

    /// Returns true when adjustments are applied at all.
    pub fn is_enabled(&self) -> bool {
        self.adjustments.is_enabled
    }

    /// Computes the final score for a raw score, match type and optional file extension.
    ///
    /// When adjustments are disabled the base score is returned unchanged.
    pub fn resolve(&self, base: f64, match_type: MatchType, extension: Option<&str>) -> f64 {
        if !self.is_enabled() {
            return base;
        }

        let mut score = base;
        if let Some(key) = match_type.adjustment_key() {
            score += self.adjustments.value(key);
        }
        if let Some(ext) = extension.filter(|e| !e.is_empty()) {
            score += self.adjustments.ext_value(ext);
        }
        score
    }

    /// Computes the final score for a suggestion.
    ///
    /// On top of [`resolve`](Self::resolve) this adds the adjustments for the indicator flags
    /// that are set, for the suggestion kind, and for the heading level of heading suggestions.
    pub fn resolve_suggestion(&self, suggestion: &Suggestion) -> f64 {
        let ranking = suggestion.ranking();
        let extension = suggestion.file().map(|f| f.extension.as_str());
        let mut score = self.resolve(ranking.base_score(), ranking.match_type, extension);
        if !self.is_enabled() {
            return score;
        }

        score += ranking
            .flags
            .adjustment_keys()
            .map(|key| self.adjustments.value(key))
            .sum::<f64>();
        score += self.adjustments.value(suggestion.kind());
        if let Some(level) = suggestion.heading_level() {
            score += self.adjustments.value(&format!("h{level}"));
        }
        score
    }

    /// Stores the resolved score on the suggestion.
    pub fn apply(&self, suggestion: &mut Suggestion) {
        let score = self.resolve_suggestion(suggestion);
        suggestion.ranking_mut().score = score;
    }
}

#[cfg(test)]
mod tests {
    use qs_match::FuzzyMatch;

    use super::*;
    use crate::{FileSuggestion, Flags, Ranking, VaultFile};

    fn adjustments(entries: &[(&str, f64)]) -> MatchPriorityAdjustments {
        let mut adj = MatchPriorityAdjustments {
            is_enabled: true,
            ..MatchPriorityAdjustments::default()
        };
        for (key, value) in entries {
            if let Some(data) = adj.adjustments.get_mut(*key) {
                data.value = *value;
            } else if let Some(data) = adj.file_ext_adjustments.get_mut(*key) {
                data.value = *value;
            }
        }
        adj
    }

    fn file_suggestion(path: &str, score: i64, match_type: MatchType) -> Suggestion {
        let fuzzy = FuzzyMatch {
            score,
            ranges: Vec::new(),
        };
        Suggestion::File(FileSuggestion {
            file: VaultFile::new(path),
            ranking: Ranking::matched(match_type, fuzzy, path),
        })
    }

    #[test]
    fn disabled_returns_base() {
        let adj = MatchPriorityAdjustments::default();
        let resolver = PriorityResolver::new(&adj);
        assert_eq!(resolver.resolve(42.0, MatchType::Basename, Some("md")), 42.0);
    }

    #[test]
    fn match_type_and_extension_add() {
        let adj = adjustments(&[("basename", 10.0), ("canvas", 3.5)]);
        let resolver = PriorityResolver::new(&adj);
        assert_eq!(resolver.resolve(5.0, MatchType::Basename, None), 15.0);
        assert_eq!(
            resolver.resolve(5.0, MatchType::Basename, Some("CANVAS")),
            18.5
        );
        assert_eq!(resolver.resolve(5.0, MatchType::None, Some("md")), 5.0);
    }

    #[test]
    fn zero_adjustments_change_nothing() {
        let adj = adjustments(&[]);
        let resolver = PriorityResolver::new(&adj);
        let s = file_suggestion("a.md", 7, MatchType::Primary);
        assert_eq!(resolver.resolve_suggestion(&s), 7.0);
    }

    #[test]
    fn flags_kind_and_heading_levels_add() {
        let adj = adjustments(&[("isRecent", 2.0), ("file", 1.0), ("path", -4.0)]);
        let resolver = PriorityResolver::new(&adj);
        let mut s = file_suggestion("dir/a.md", 10, MatchType::Path);
        s.ranking_mut().flags = Flags {
            is_recent: true,
            ..Flags::default()
        };
        resolver.apply(&mut s);
        assert_eq!(s.score(), 9.0);
    }
}
