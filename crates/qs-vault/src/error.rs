//! Error types for loading a vault from disk.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when loading a vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The vault root is missing or not a directory.
    #[error("vault root is not a directory: {path}")]
    NotADirectory {
        /// The path given as the root.
        path: PathBuf,
    },

    /// Walking the vault directory failed.
    #[error("failed to walk vault {path}: {source}")]
    Walk {
        /// The vault root.
        path: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },

    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A JSON state file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    ParseState {
        /// Path to the state file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
