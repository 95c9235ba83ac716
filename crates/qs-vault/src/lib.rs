//! A directory-backed vault source for the qs quick switcher.
//!
//! [`DirectoryVault`] walks a folder of notes and implements [`qs_core::VaultSource`]:
//! - Markdown metadata: headings, links, embeds, tags, callouts and frontmatter aliases
//! - Canvas nodes
//! - Resolved and unresolved link counts
//! - Open editors, recent files, bookmarks and saved workspaces from the `.obsidian` folder

#![warn(missing_docs)]

mod canvas;
mod error;
mod frontmatter;
mod links;
mod markdown;
mod state;
mod vault;

pub use canvas::parse_canvas;
pub use error::VaultError;
pub use frontmatter::{Frontmatter, parse_frontmatter};
pub use links::{LinkResolver, build_link_maps, link_target};
pub use markdown::extract_metadata;
pub use state::{
    STATE_DIR, VaultState, WorkspaceState, load_vault_registry, parse_bookmarks,
    parse_vault_registry, parse_workspace, parse_workspaces,
};
pub use vault::{ACTIVE_LEAF_ID, DirectoryVault};
