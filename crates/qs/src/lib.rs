//! qs: a multi-mode quick switcher for folders of notes.
//!
//! The binary loads `.qs.toml` settings, reads a vault directory, runs one query through a
//! switcher session and prints the ranked suggestions.

#![warn(missing_docs)]

pub mod cli;
