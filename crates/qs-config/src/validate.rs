//! Settings validation.
//!
//! Non-fatal problems are reported as `ConfigWarning`s. Problems found while merging have
//! already been repaired with a default; problems found by [`validate_settings`] are left in
//! place and only reported.

use std::fmt;

use globset::Glob;

use crate::{Mode, Settings, is_known_adjustment_key};

/// A non-fatal problem with the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A value could not be used; the default was kept.
    InvalidValue {
        /// Dotted settings key.
        key: String,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A glob pattern does not compile.
    InvalidPattern {
        /// Dotted settings key.
        key: String,
        /// The rejected pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
    /// A priority adjustment key names nothing the resolver knows.
    UnknownAdjustmentKey {
        /// The key.
        key: String,
    },
    /// A facet id does not name any facet in the catalogue.
    UnknownFacet {
        /// Dotted settings key where the id appeared.
        key: String,
        /// The unknown id.
        id: String,
    },
    /// Two modes share a trigger string.
    DuplicateTrigger {
        /// The shared trigger.
        trigger: String,
        /// First mode using it.
        first: Mode,
        /// Second mode using it.
        second: Mode,
    },
    /// A trigger starts with the escape character and can never fire.
    TriggerShadowedByEscape {
        /// The trigger.
        trigger: String,
        /// The mode it opens.
        mode: Mode,
    },
    /// A facet appears in more than one exclusive group.
    OverlappingExclusiveGroups {
        /// The facet id.
        id: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "{key}: invalid value '{value}' ({reason}), using default")
            }
            Self::InvalidPattern {
                key,
                pattern,
                reason,
            } => write!(f, "{key}: invalid glob pattern '{pattern}': {reason}"),
            Self::UnknownAdjustmentKey { key } => {
                write!(f, "priority.adjustments: unknown key '{key}' is ignored")
            }
            Self::UnknownFacet { key, id } => write!(f, "{key}: unknown facet '{id}'"),
            Self::DuplicateTrigger {
                trigger,
                first,
                second,
            } => write!(
                f,
                "triggers: '{trigger}' is used by both {first} and {second}"
            ),
            Self::TriggerShadowedByEscape { trigger, mode } => write!(
                f,
                "triggers: '{trigger}' for {mode} starts with the escape character"
            ),
            Self::OverlappingExclusiveGroups { id } => write!(
                f,
                "facets.exclusive_groups: facet '{id}' appears in more than one group"
            ),
        }
    }
}

/// Validates effective settings and returns any warnings.
///
/// This checks for:
/// - Triggers shared by two modes or hidden behind the escape character
/// - Glob patterns that do not compile
/// - Priority adjustment keys the resolver does not understand
/// - Exclusive groups naming unknown facets or overlapping each other
pub fn validate_settings(settings: &Settings) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    warnings.extend(validate_triggers(settings));
    warnings.extend(validate_patterns(settings));

    for key in settings.priority.adjustments.keys() {
        if !is_known_adjustment_key(key) {
            warnings.push(ConfigWarning::UnknownAdjustmentKey { key: key.clone() });
        }
    }

    warnings.extend(validate_exclusive_groups(settings));
    warnings
}

/// Checks trigger strings for collisions.
fn validate_triggers(settings: &Settings) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let triggers = settings.triggers.prefix_triggers();
    let escape = settings.general.escape_cmd_char.as_str();

    for (i, (trigger, mode, _)) in triggers.iter().enumerate() {
        if !escape.is_empty() && trigger.starts_with(escape) {
            warnings.push(ConfigWarning::TriggerShadowedByEscape {
                trigger: (*trigger).to_string(),
                mode: *mode,
            });
        }
        for (other, other_mode, _) in &triggers[i + 1..] {
            if trigger == other {
                warnings.push(ConfigWarning::DuplicateTrigger {
                    trigger: (*trigger).to_string(),
                    first: *mode,
                    second: *other_mode,
                });
            }
        }
    }

    warnings
}

/// Checks that every glob option compiles.
fn validate_patterns(settings: &Settings) -> Vec<ConfigWarning> {
    let options = [
        ("standard.exclude_folders", &settings.standard.exclude_folders),
        ("standard.ignored_paths", &settings.standard.ignored_paths),
        ("related.exclude_folders", &settings.related.exclude_folders),
    ];

    let mut warnings = Vec::new();
    for (key, patterns) in options {
        for pattern in patterns {
            if let Err(e) = Glob::new(pattern) {
                warnings.push(ConfigWarning::InvalidPattern {
                    key: key.to_string(),
                    pattern: pattern.clone(),
                    reason: e.kind().to_string(),
                });
            }
        }
    }
    warnings
}

/// Checks exclusive groups against the facet catalogue.
fn validate_exclusive_groups(settings: &Settings) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for group in &settings.facets.exclusive_groups {
        for id in group {
            if !settings.facets.facet_list.contains_key(id) {
                warnings.push(ConfigWarning::UnknownFacet {
                    key: "facets.exclusive_groups".to_string(),
                    id: id.clone(),
                });
            }
            if seen.contains(&id.as_str()) {
                warnings.push(ConfigWarning::OverlappingExclusiveGroups { id: id.clone() });
            } else {
                seen.push(id);
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchPriorityData;

    #[test]
    fn defaults_are_clean() {
        assert!(validate_settings(&Settings::default()).is_empty());
    }

    #[test]
    fn duplicate_trigger_is_reported() {
        let mut settings = Settings::default();
        settings.triggers.vault_list = settings.triggers.command_list.clone();
        let warnings = validate_settings(&settings);
        assert!(warnings.contains(&ConfigWarning::DuplicateTrigger {
            trigger: ">".to_string(),
            first: Mode::CommandList,
            second: Mode::VaultList,
        }));
    }

    #[test]
    fn trigger_behind_escape_is_reported() {
        let mut settings = Settings::default();
        settings.triggers.headings_list = "!h".to_string();
        let warnings = validate_settings(&settings);
        assert!(matches!(
            warnings.as_slice(),
            [ConfigWarning::TriggerShadowedByEscape {
                mode: Mode::HeadingsList,
                ..
            }]
        ));
    }

    #[test]
    fn unknown_adjustment_key_is_reported() {
        let mut settings = Settings::default();
        settings
            .priority
            .adjustments
            .insert("h9".to_string(), MatchPriorityData::labeled("h9", None));
        let warnings = validate_settings(&settings);
        assert_eq!(
            warnings,
            vec![ConfigWarning::UnknownAdjustmentKey {
                key: "h9".to_string()
            }]
        );
    }

    #[test]
    fn bad_glob_is_reported() {
        let mut settings = Settings::default();
        settings.related.exclude_folders = vec!["[oops".to_string()];
        let warnings = validate_settings(&settings);
        assert!(matches!(
            &warnings[..],
            [ConfigWarning::InvalidPattern { key, .. }] if key == "related.exclude_folders"
        ));
    }

    #[test]
    fn exclusive_group_problems_are_reported() {
        let mut settings = Settings::default();
        settings
            .facets
            .exclusive_groups
            .push(vec!["backlink".to_string(), "nope".to_string()]);
        let warnings = validate_settings(&settings);
        assert!(warnings.contains(&ConfigWarning::OverlappingExclusiveGroups {
            id: "backlink".to_string()
        }));
        assert!(warnings.contains(&ConfigWarning::UnknownFacet {
            key: "facets.exclusive_groups".to_string(),
            id: "nope".to_string(),
        }));
    }

    #[test]
    fn warning_display() {
        let w = ConfigWarning::InvalidValue {
            key: "general.limit".to_string(),
            value: "-1".to_string(),
            reason: "must not be negative".to_string(),
        };
        assert_eq!(
            w.to_string(),
            "general.limit: invalid value '-1' (must not be negative), using default"
        );
    }
}
