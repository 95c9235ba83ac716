//! Text shown next to suggestions.

use qs_config::{PathDisplayFormat, TitleSource};

use crate::{FileMetadata, VaultFile};

/// Formats the path shown under a file suggestion.
///
/// `title` is the text the suggestion is displayed with; the optional-filename format only
/// repeats the file name when it differs from the title. Returns `None` when nothing should
/// be shown.
pub fn format_path(
    file: &VaultFile,
    format: PathDisplayFormat,
    hide_if_root: bool,
    title: &str,
) -> Option<String> {
    if hide_if_root && file.is_root() {
        return None;
    }

    let parent = file.parent();
    let text = match format {
        PathDisplayFormat::None => return None,
        PathDisplayFormat::Full => file.path.clone(),
        PathDisplayFormat::FolderOnly => parent.to_string(),
        PathDisplayFormat::FolderWithFilename => match parent.rsplit('/').next() {
            Some(folder) if !folder.is_empty() => format!("{folder}/{}", file.name()),
            _ => file.name().to_string(),
        },
        PathDisplayFormat::FolderPathFilenameOptional => {
            if file.basename == title {
                parent.to_string()
            } else if parent.is_empty() {
                file.name().to_string()
            } else {
                format!("{parent}/{}", file.name())
            }
        }
    };
    (!text.is_empty()).then_some(text)
}

/// Returns the display title of a file.
pub fn file_title(
    file: &VaultFile,
    source: TitleSource,
    metadata: Option<&FileMetadata>,
) -> String {
    match source {
        TitleSource::H1 => metadata
            .and_then(FileMetadata::first_h1)
            .map_or_else(|| file.basename.clone(), |h| h.heading.clone()),
        TitleSource::Default => file.basename.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeadingCache;

    #[test]
    fn formats() {
        let f = VaultFile::new("Projects/2024/plan.md");
        let fmt = |format| format_path(&f, format, true, "plan");
        assert_eq!(fmt(PathDisplayFormat::None), None);
        assert_eq!(fmt(PathDisplayFormat::Full).as_deref(), Some("Projects/2024/plan.md"));
        assert_eq!(fmt(PathDisplayFormat::FolderOnly).as_deref(), Some("Projects/2024"));
        assert_eq!(
            fmt(PathDisplayFormat::FolderWithFilename).as_deref(),
            Some("2024/plan.md")
        );
        assert_eq!(
            fmt(PathDisplayFormat::FolderPathFilenameOptional).as_deref(),
            Some("Projects/2024")
        );
        assert_eq!(
            format_path(&f, PathDisplayFormat::FolderPathFilenameOptional, true, "Plan A")
                .as_deref(),
            Some("Projects/2024/plan.md")
        );
    }

    #[test]
    fn root_files() {
        let f = VaultFile::new("inbox.md");
        assert_eq!(format_path(&f, PathDisplayFormat::Full, true, "inbox"), None);
        assert_eq!(
            format_path(&f, PathDisplayFormat::Full, false, "inbox").as_deref(),
            Some("inbox.md")
        );
        assert_eq!(format_path(&f, PathDisplayFormat::FolderOnly, false, "inbox"), None);
    }

    #[test]
    fn h1_title() {
        let f = VaultFile::new("a.md");
        let meta = FileMetadata {
            headings: vec![HeadingCache {
                heading: "Alpha".to_string(),
                level: 1,
                line: 0,
            }],
            ..FileMetadata::default()
        };
        assert_eq!(file_title(&f, TitleSource::H1, Some(&meta)), "Alpha");
        assert_eq!(file_title(&f, TitleSource::H1, None), "a");
        assert_eq!(file_title(&f, TitleSource::Default, Some(&meta)), "a");
    }
}
