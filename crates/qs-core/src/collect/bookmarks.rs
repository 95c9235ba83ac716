//! Bookmarks.

use qs_config::{Mode, facet_ids};

use super::{Collector, FileFlags, PassContext, flatten_bookmarks};
use crate::{BookmarkKind, BookmarkSuggestion, MatchType, SourceError, Suggestion, VaultFile};

/// The flattened bookmark tree.
#[derive(Debug)]
pub struct BookmarkCollector;

impl Collector for BookmarkCollector {
    fn mode(&self) -> Mode {
        Mode::BookmarksList
    }

    fn candidates(&self, cx: &PassContext<'_>) -> Result<Vec<Suggestion>, SourceError> {
        let flags = FileFlags::load(cx);
        let items = flatten_bookmarks(cx.source.bookmarks()?);

        Ok(items
            .into_iter()
            .filter_map(|(item, bookmark_path)| {
                let file = match item.kind {
                    BookmarkKind::File | BookmarkKind::Heading => {
                        item.path.as_deref().map(VaultFile::new)
                    }
                    _ => None,
                };
                let mut ranking = cx.match_primary(&item.title).or_else(|| {
                    item.path
                        .as_deref()
                        .and_then(|p| cx.match_as(p, MatchType::Path))
                })?;
                if let Some(file) = &file {
                    ranking.flags = flags.of(file);
                }
                ranking.flags.is_bookmarked = true;
                Some(Suggestion::Bookmark(BookmarkSuggestion {
                    item,
                    bookmark_path,
                    file,
                    ranking,
                }))
            })
            .collect())
    }

    fn facet_matches(&self, id: &str, suggestion: &Suggestion) -> Option<bool> {
        let kind = match id {
            facet_ids::BOOKMARKS_FILE => BookmarkKind::File,
            facet_ids::BOOKMARKS_FOLDER => BookmarkKind::Folder,
            facet_ids::BOOKMARKS_SEARCH => BookmarkKind::Search,
            facet_ids::BOOKMARKS_GROUP => BookmarkKind::Group,
            _ => return None,
        };
        Some(matches!(suggestion, Suggestion::Bookmark(b) if b.item.kind == kind))
    }
}

#[cfg(test)]
mod tests {
    use qs_config::Settings;
    use qs_match::Matcher;

    use super::*;
    use crate::{BookmarkItem, SourceContext, VaultSource};

    struct Marks;

    impl VaultSource for Marks {
        fn bookmarks(&self) -> Result<Vec<BookmarkItem>, SourceError> {
            let search = BookmarkItem {
                kind: BookmarkKind::Search,
                title: "Open tasks".to_string(),
                path: None,
                subpath: None,
                query: Some("task:open".to_string()),
                children: Vec::new(),
            };
            Ok(vec![
                BookmarkItem::group("Reading", vec![BookmarkItem::file("books/dune.md", None)]),
                search,
            ])
        }
    }

    fn run(query: &str) -> Vec<Suggestion> {
        let settings = Settings::default();
        let matcher = Matcher::new();
        let context = SourceContext::default();
        let cx = PassContext {
            query,
            settings: &settings,
            source: &Marks,
            matcher: &matcher,
            context: &context,
        };
        BookmarkCollector.candidates(&cx).unwrap()
    }

    #[test]
    fn lists_every_node_with_group_path() {
        let list = run("");
        let described: Vec<_> = list
            .iter()
            .map(|s| match s {
                Suggestion::Bookmark(b) => b.bookmark_path.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(described, vec!["Reading", "Reading/dune", "Open tasks"]);
        assert!(list.iter().all(|s| s.ranking().flags.is_bookmarked));
    }

    #[test]
    fn falls_back_to_path_match() {
        let list = run("books");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].match_type(), MatchType::Path);
        assert_eq!(list[0].file().map(|f| f.path.as_str()), Some("books/dune.md"));
    }

    #[test]
    fn facets_by_kind() {
        let list = run("");
        let files = list
            .iter()
            .filter(|s| BookmarkCollector.facet_matches("bookmarks-file", s) == Some(true))
            .count();
        assert_eq!(files, 1);
    }
}
