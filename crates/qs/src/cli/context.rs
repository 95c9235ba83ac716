//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use qs_config::Config;
use qs_vault::{DirectoryVault, load_vault_registry};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded settings (defaults if no settings files were found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and settings.
    ///
    /// Explicit `files` replace discovery; otherwise every `.qs.toml` from the current
    /// directory up, plus the global file, is merged.
    pub fn load(files: &[PathBuf]) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd, files)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping settings parsing.
    ///
    /// Used by `init`, which must work even when an existing settings file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Opens the vault at `root` (relative to the working directory), or the working
    /// directory itself.
    pub fn open_vault(
        &self,
        root: Option<&Path>,
        active: Option<&str>,
        registry: Option<&Path>,
    ) -> Result<DirectoryVault, ExitCode> {
        let root = root.map_or_else(|| self.cwd.clone(), |r| self.cwd.join(r));
        let mut vault = DirectoryVault::open(&root).map_err(|e| {
            eprintln!("error: failed to open vault {}: {e}", root.display());
            ExitCode::FAILURE
        })?;
        if let Some(path) = active {
            vault = vault.with_active_file(path);
        }
        if let Some(path) = registry {
            let vaults = load_vault_registry(&self.cwd.join(path)).map_err(|e| {
                eprintln!("error: failed to read vault registry: {e}");
                ExitCode::FAILURE
            })?;
            vault = vault.with_vault_registry(vaults);
        }
        Ok(vault)
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads settings from explicit files, or discovers them from `cwd`.
fn load_config_or_failure(cwd: &Path, files: &[PathBuf]) -> Result<Config, ExitCode> {
    let loaded = if files.is_empty() {
        Config::load(cwd)
    } else {
        let files: Vec<PathBuf> = files.iter().map(|f| cwd.join(f)).collect();
        Config::load_from_files(&files)
    };
    loaded.map_err(|e| {
        eprintln!("error: failed to load settings: {e}");
        ExitCode::FAILURE
    })
}
