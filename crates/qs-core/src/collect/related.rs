//! Items related to the source file.

use qs_config::{Mode, RelationType};

use super::{Collector, FileFlags, PassContext};
use crate::{RelatedItem, RelatedItemSuggestion, SourceError, Suggestion, VaultFile};

/// Files in the same folder, backlinks and outgoing links of the source file.
#[derive(Debug)]
pub struct RelatedCollector;

impl Collector for RelatedCollector {
    fn mode(&self) -> Mode {
        Mode::RelatedItemsList
    }

    fn candidates(&self, cx: &PassContext<'_>) -> Result<Vec<Suggestion>, SourceError> {
        let source_file = cx.context.resolve_file(cx.source, self.mode())?;
        let opts = &cx.settings.related;
        let excluded = cx.path_filter(&opts.exclude_folders, "related.exclude_folders");
        let open = if opts.exclude_open_files {
            cx.open_paths()
        } else {
            Default::default()
        };
        let keep = |path: &str| !excluded.is_match(path) && !open.contains(path);

        let mut items = Vec::new();
        for relation in RelationType::ALL {
            if !opts.enabled_types.contains(&relation) {
                continue;
            }
            match relation {
                RelationType::DiskLocation => items.extend(disk_location(cx, &source_file)?),
                RelationType::Backlink => items.extend(backlinks(cx, &source_file)?),
                RelationType::OutgoingLink => items.extend(outgoing_links(cx, &source_file)?),
            }
        }
        items.retain(|(_, file)| file.as_ref().is_none_or(|f| keep(&f.path)));

        let flags = FileFlags::load(cx);
        Ok(items
            .into_iter()
            .filter_map(|(item, file)| {
                let mut ranking = match (&item.unresolved_text, &file) {
                    (Some(text), _) => cx.match_primary(text)?,
                    (None, Some(file)) => cx.match_file(file)?,
                    (None, None) => return None,
                };
                if let Some(file) = &file {
                    ranking.flags = flags.of(file);
                }
                Some(Suggestion::RelatedItem(RelatedItemSuggestion {
                    item,
                    file,
                    ranking,
                }))
            })
            .collect())
    }

    fn facet_matches(&self, id: &str, suggestion: &Suggestion) -> Option<bool> {
        let relation = RelationType::ALL.into_iter().find(|r| r.name() == id)?;
        Some(matches!(
            suggestion,
            Suggestion::RelatedItem(r) if r.item.relation_type == relation
        ))
    }
}

/// A related item with no unresolved text.
fn related(relation_type: RelationType, count: Option<usize>) -> RelatedItem {
    RelatedItem {
        relation_type,
        count,
        unresolved_text: None,
    }
}

/// Other files in the source file's folder.
fn disk_location(
    cx: &PassContext<'_>,
    source_file: &VaultFile,
) -> Result<Vec<(RelatedItem, Option<VaultFile>)>, SourceError> {
    let parent = source_file.parent();
    Ok(cx
        .source
        .files()?
        .into_iter()
        .filter(|f| f.parent() == parent && f.path != source_file.path)
        .map(|f| (related(RelationType::DiskLocation, None), Some(f)))
        .collect())
}

/// Files linking to the source file, with their link counts.
fn backlinks(
    cx: &PassContext<'_>,
    source_file: &VaultFile,
) -> Result<Vec<(RelatedItem, Option<VaultFile>)>, SourceError> {
    Ok(cx
        .source
        .resolved_links()?
        .into_iter()
        .filter(|(from, _)| *from != source_file.path)
        .filter_map(|(from, targets)| {
            let count = targets.get(&source_file.path).copied().filter(|c| *c > 0)?;
            Some((
                related(RelationType::Backlink, Some(count)),
                Some(VaultFile::new(&from)),
            ))
        })
        .collect())
}

/// Links from the source file, resolved ones first, then unresolved link texts.
fn outgoing_links(
    cx: &PassContext<'_>,
    source_file: &VaultFile,
) -> Result<Vec<(RelatedItem, Option<VaultFile>)>, SourceError> {
    let mut resolved = cx.source.resolved_links()?;
    let mut items: Vec<_> = resolved
        .remove(&source_file.path)
        .unwrap_or_default()
        .into_iter()
        .map(|(to, count)| {
            (
                related(RelationType::OutgoingLink, Some(count)),
                Some(VaultFile::new(&to)),
            )
        })
        .collect();

    let mut unresolved = cx.source.unresolved_links().unwrap_or_default();
    items.extend(
        unresolved
            .remove(&source_file.path)
            .unwrap_or_default()
            .into_iter()
            .map(|(text, count)| {
                let item = RelatedItem {
                    unresolved_text: Some(text),
                    ..related(RelationType::OutgoingLink, Some(count))
                };
                (item, None)
            }),
    );
    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use qs_config::Settings;
    use qs_match::Matcher;

    use super::*;
    use crate::{EditorLeaf, LinkMap, SourceContext, VaultSource};

    struct Graph;

    fn links(entries: &[(&str, &str, usize)]) -> LinkMap {
        let mut map: LinkMap = BTreeMap::new();
        for (from, to, count) in entries {
            map.entry((*from).to_string())
                .or_default()
                .insert((*to).to_string(), *count);
        }
        map
    }

    impl VaultSource for Graph {
        fn files(&self) -> Result<Vec<VaultFile>, SourceError> {
            Ok(["proj/a.md", "proj/b.md", "proj/c.md", "other/d.md"]
                .into_iter()
                .map(VaultFile::new)
                .collect())
        }

        fn resolved_links(&self) -> Result<LinkMap, SourceError> {
            Ok(links(&[
                ("other/d.md", "proj/a.md", 2),
                ("proj/a.md", "other/d.md", 1),
                ("proj/b.md", "proj/c.md", 1),
            ]))
        }

        fn unresolved_links(&self) -> Result<LinkMap, SourceError> {
            Ok(links(&[("proj/a.md", "Someday", 1)]))
        }

        fn open_leaves(&self) -> Result<Vec<EditorLeaf>, SourceError> {
            Ok(vec![EditorLeaf {
                id: "1".to_string(),
                view_type: "markdown".to_string(),
                title: "b".to_string(),
                file: Some(VaultFile::new("proj/b.md")),
                last_active: 1,
                is_side_panel: false,
            }])
        }
    }

    fn run(settings: &Settings) -> Vec<Suggestion> {
        let matcher = Matcher::new();
        let context = SourceContext::for_file(VaultFile::new("proj/a.md"));
        let cx = PassContext {
            query: "",
            settings,
            source: &Graph,
            matcher: &matcher,
            context: &context,
        };
        RelatedCollector.candidates(&cx).unwrap()
    }

    fn describe(list: &[Suggestion]) -> Vec<String> {
        list.iter()
            .filter_map(|s| match s {
                Suggestion::RelatedItem(r) => Some(format!(
                    "{}:{}:{}",
                    r.item.relation_type.name(),
                    s.title(),
                    r.item.count.unwrap_or(0)
                )),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn all_relations() {
        let list = run(&Settings::default());
        assert_eq!(
            describe(&list),
            vec![
                "disk-location:b:0",
                "disk-location:c:0",
                "backlink:d:2",
                "outgoing-link:d:1",
                "outgoing-link:Someday:1",
            ]
        );
        assert!(list.last().unwrap().file().is_none());
    }

    #[test]
    fn exclusions_apply() {
        let mut settings = Settings::default();
        settings.related.exclude_open_files = true;
        settings.related.exclude_folders = vec!["other".to_string()];
        settings.related.enabled_types = vec![RelationType::DiskLocation, RelationType::Backlink];
        assert_eq!(describe(&run(&settings)), vec!["disk-location:c:0"]);
    }
}
