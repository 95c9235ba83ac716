//! Settings file discovery.
//!
//! Walks up from a starting directory collecting `.qs.toml` files, then appends the global
//! `~/.qs.toml`. A file with `root = true` ends the walk and suppresses the global file.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The settings filename.
pub const CONFIG_FILENAME: &str = ".qs.toml";

/// Discovers every settings file relevant to `cwd`, closest first and global last.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    let mut found_root = false;

    let mut current = Some(cwd);
    while let Some(dir) = current {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            let is_root = is_root_config(&config_path);
            configs.push(config_path);
            if is_root {
                found_root = true;
                break;
            }
        }
        current = dir.parent();
    }

    if !found_root
        && let Some(global_path) = global_config_path()
        && global_path.is_file()
        && !configs.contains(&global_path)
    {
        configs.push(global_path);
    }

    configs
}

/// Returns the path of the global settings file, if a home directory is known.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global settings file.
fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
