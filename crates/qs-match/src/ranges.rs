//! Range utilities for merging and converting highlight spans.

use std::ops::Range;

/// Merges two sets of byte ranges, combining overlapping or adjacent ranges.
///
/// The result is sorted by start position with no overlaps.
pub fn merge_ranges(mut a: Vec<Range<usize>>, b: Vec<Range<usize>>) -> Vec<Range<usize>> {
    a.extend(b);
    if a.is_empty() {
        return a;
    }

    a.sort_by_key(|r| r.start);

    let mut merged = Vec::with_capacity(a.len());
    let mut current = a[0].clone();

    for range in a.into_iter().skip(1) {
        if range.start <= current.end {
            current.end = current.end.max(range.end);
        } else {
            merged.push(current);
            current = range;
        }
    }
    merged.push(current);

    merged
}

/// Converts matched character indices into merged byte ranges of `text`.
///
/// Indices past the end of `text` are ignored.
pub fn char_indices_to_ranges(text: &str, indices: &[usize]) -> Vec<Range<usize>> {
    if indices.is_empty() {
        return Vec::new();
    }

    let mut wanted = indices.to_vec();
    wanted.sort_unstable();
    wanted.dedup();

    let mut ranges = Vec::with_capacity(wanted.len());
    let mut next = wanted.iter().peekable();
    for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
        let Some(&&target) = next.peek() else { break };
        if char_idx == target {
            ranges.push(byte_idx..byte_idx + ch.len_utf8());
            next.next();
        }
    }

    merge_ranges(ranges, Vec::new())
}

/// Moves every range right by `offset` bytes.
pub fn shift_ranges(ranges: &[Range<usize>], offset: usize) -> Vec<Range<usize>> {
    ranges
        .iter()
        .map(|r| r.start + offset..r.end + offset)
        .collect()
}
