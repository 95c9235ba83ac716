//! Fuzzy matching for the qs quick switcher.
//!
//! A [`Matcher`] scores a query against a candidate text and reports the matched byte ranges.
//! It holds no state between calls, so one matcher can serve a whole session.

#![warn(missing_docs)]

mod fuzzy;
mod ranges;

pub use fuzzy::{FuzzyMatch, Matcher, normalize_query};
pub use ranges::{char_indices_to_ranges, merge_ranges, shift_ranges};
