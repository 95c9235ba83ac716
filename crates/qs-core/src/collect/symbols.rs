//! Symbols inside the source file.

use qs_config::{LinkType, Mode, SymbolSettings, SymbolType, symbol_facet_id};

use super::{Collector, PassContext};
use crate::{FileMetadata, SourceError, Suggestion, Symbol, SymbolInfo, SymbolSuggestion};

/// Headings, links, embeds, tags, callouts and canvas nodes of one file.
#[derive(Debug)]
pub struct SymbolCollector;

impl Collector for SymbolCollector {
    fn mode(&self) -> Mode {
        Mode::SymbolList
    }

    fn candidates(&self, cx: &PassContext<'_>) -> Result<Vec<Suggestion>, SourceError> {
        let file = cx.context.resolve_file(cx.source, self.mode())?;
        let metadata = cx.source.metadata(&file.path)?;
        let opts = &cx.settings.symbols;

        let mut symbols = symbol_infos(&metadata, opts);
        if opts.select_nearest_heading {
            if let Some(line) = cx.context.cursor_line {
                mark_nearest_heading(&mut symbols, line);
            }
        }
        if !cx.has_search_term() && opts.symbols_in_line_order {
            // Canvas nodes have no line and stay after everything else.
            symbols.sort_by_key(|s| s.symbol.line().unwrap_or(usize::MAX));
        }

        Ok(symbols
            .into_iter()
            .filter_map(|item| {
                let ranking = cx.match_primary(item.symbol.text())?;
                Some(Suggestion::Symbol(SymbolSuggestion {
                    item,
                    file: file.clone(),
                    ranking,
                }))
            })
            .collect())
    }

    fn facet_matches(&self, id: &str, suggestion: &Suggestion) -> Option<bool> {
        let symbol_type = SymbolType::ALL
            .into_iter()
            .find(|t| symbol_facet_id(*t) == id)?;
        Some(matches!(suggestion, Suggestion::Symbol(s) if s.item.symbol_type == symbol_type))
    }
}

/// Builds the enabled symbols grouped by type, each group in document order.
fn symbol_infos(metadata: &FileMetadata, opts: &SymbolSettings) -> Vec<SymbolInfo> {
    let min_level = metadata.headings.iter().map(|h| h.level).min().unwrap_or(1);
    let mut out = Vec::new();

    for symbol_type in SymbolType::ALL {
        if !opts.is_enabled(symbol_type) {
            continue;
        }
        match symbol_type {
            SymbolType::Heading => out.extend(metadata.headings.iter().map(|h| SymbolInfo {
                indent_level: usize::from(h.level.saturating_sub(min_level)),
                ..SymbolInfo::new(Symbol::Heading(h.clone()))
            })),
            SymbolType::Link => out.extend(
                metadata
                    .links
                    .iter()
                    .filter(|l| !opts.exclude_link_sub_types.contains(&LinkType::of(&l.link)))
                    .map(|l| SymbolInfo::new(Symbol::Link(l.clone()))),
            ),
            SymbolType::Embed => out.extend(
                metadata
                    .embeds
                    .iter()
                    .map(|l| SymbolInfo::new(Symbol::Embed(l.clone()))),
            ),
            SymbolType::Tag => out.extend(
                metadata
                    .tags
                    .iter()
                    .map(|t| SymbolInfo::new(Symbol::Tag(t.clone()))),
            ),
            SymbolType::Callout => out.extend(
                metadata
                    .callouts
                    .iter()
                    .map(|c| SymbolInfo::new(Symbol::Callout(c.clone()))),
            ),
            SymbolType::CanvasNode => out.extend(
                metadata
                    .canvas_nodes
                    .iter()
                    .map(|n| SymbolInfo::new(Symbol::CanvasNode(n.clone()))),
            ),
        }
    }
    out
}

/// Flags the last heading at or above `line`.
fn mark_nearest_heading(symbols: &mut [SymbolInfo], line: usize) {
    let nearest = symbols
        .iter_mut()
        .filter(|s| matches!(s.symbol, Symbol::Heading(_)))
        .filter(|s| s.symbol.line().is_some_and(|l| l <= line))
        .max_by_key(|s| s.symbol.line());
    if let Some(symbol) = nearest {
        symbol.is_selected = true;
    }
}
