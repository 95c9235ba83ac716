//! Settings template for `qs init`.

/// Annotated settings template (valid TOML).
const SETTINGS_TEMPLATE: &str = include_str!("../templates/settings.toml");

/// Returns the settings template as a commented-out example.
pub fn settings_template() -> String {
    comment_template(SETTINGS_TEMPLATE)
}

/// Converts a valid TOML template into a commented-out example.
///
/// Comment lines and empty lines are preserved; every other line gets a "# " prefix.
fn comment_template(template: &str) -> String {
    let mut result = String::with_capacity(template.len() + template.lines().count() * 2);
    for line in template.lines() {
        if !line.is_empty() && !line.starts_with('#') {
            result.push_str("# ");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Settings,
        merge::{ParsedSettings, merge_settings},
        parse::parse_settings,
    };

    #[test]
    fn template_parses_without_warnings() {
        let raw = parse_settings(SETTINGS_TEMPLATE).unwrap();
        let (_, warnings) = merge_settings(&[ParsedSettings {
            path: "template.toml".into(),
            settings: raw,
        }]);
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn template_mirrors_defaults() {
        let raw = parse_settings(SETTINGS_TEMPLATE).unwrap();
        let (settings, _) = merge_settings(&[ParsedSettings {
            path: "template.toml".into(),
            settings: raw,
        }]);
        let defaults = Settings::default();
        assert_eq!(settings.general, defaults.general);
        assert_eq!(settings.triggers, defaults.triggers);
        assert_eq!(settings.standard, defaults.standard);
        assert_eq!(settings.symbols, defaults.symbols);
        assert_eq!(settings.headings, defaults.headings);
        assert_eq!(settings.insert_link, defaults.insert_link);
    }

    #[test]
    fn commented_template_is_all_comments() {
        let text = settings_template();
        assert!(
            text.lines()
                .all(|line| line.is_empty() || line.starts_with('#'))
        );
        let raw = parse_settings(&text).unwrap();
        assert!(raw.general.is_none());
    }

    #[test]
    fn comment_template_handles_section_headers() {
        let result = comment_template("[section]\nkey = \"value\"\n");
        assert_eq!(result, "# [section]\n# key = \"value\"\n");
    }
}
