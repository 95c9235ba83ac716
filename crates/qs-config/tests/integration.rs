//! Integration tests for qs-config.
//!
//! Exercises the full loading pipeline: discovery, parsing, layered merge and validation.

#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use qs_config::{
    CONFIG_FILENAME, Config, ConfigError, ConfigWarning, Mode, PathFilter, Settings,
    settings_template,
};

/// Temporary directory holding settings files.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn layered_files_merge_by_precedence() {
    let env = TestEnv::new();
    let global = env.create_file(
        "global.toml",
        r#"
[general]
limit = 20
hide_path_if_root = false

[triggers]
command_list = ":"
"#,
    );
    let local = env.create_file(
        "local.toml",
        r#"
[general]
limit = 5
"#,
    );

    let config = Config::load_from_files(&[local.clone(), global.clone()]).unwrap();
    assert_eq!(config.settings.general.limit, 5);
    assert!(!config.settings.general.hide_path_if_root);
    assert_eq!(config.settings.triggers.command_list, ":");
    assert_eq!(config.sources, vec![local, global]);
    assert!(config.validate().is_empty());
}

#[test]
fn discovery_stops_at_root_file() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, "[general]\nlimit = 1\n");
    env.create_file(
        &format!("vault/{CONFIG_FILENAME}"),
        "root = true\n[general]\nlimit = 7\n",
    );
    let cwd = env.path().join("vault/notes");
    fs::create_dir_all(&cwd).unwrap();

    let config = Config::load(&cwd).unwrap();
    assert_eq!(config.sources.len(), 1);
    assert_eq!(config.settings.general.limit, 7);
}

#[test]
fn invalid_values_become_warnings() {
    let env = TestEnv::new();
    let file = env.create_file(
        "bad.toml",
        r#"
[general]
limit = -1
path_display_format = "diagonal"

[triggers]
headings_list = ""
"#,
    );

    let config = Config::load_from_files(&[file]).unwrap();
    assert_eq!(config.settings, Settings::default());
    assert_eq!(config.warnings.len(), 3);
    assert!(
        config
            .warnings
            .iter()
            .all(|w| matches!(w, ConfigWarning::InvalidValue { .. }))
    );
}

#[test]
fn duplicate_triggers_are_reported_by_validate() {
    let env = TestEnv::new();
    let file = env.create_file("dup.toml", "[triggers]\neditor_list = \"@\"\n");

    let config = Config::load_from_files(&[file]).unwrap();
    assert!(config.warnings.is_empty());
    let warnings = config.validate();
    assert_eq!(
        warnings,
        vec![ConfigWarning::DuplicateTrigger {
            trigger: "@".to_string(),
            first: Mode::EditorList,
            second: Mode::SymbolList,
        }]
    );
}

#[test]
fn unreadable_and_malformed_files_are_errors() {
    let env = TestEnv::new();
    let missing = env.path().join("missing.toml");
    let err = Config::load_from_files(&[missing]).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));

    let malformed = env.create_file("broken.toml", "[general\nlimit = 3\n");
    let err = Config::load_from_files(&[malformed]).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
}

#[test]
fn saved_settings_load_back_identically() {
    let env = TestEnv::new();
    let mut settings = Settings::default();
    settings.general.limit = 12;
    settings.priority.is_enabled = true;
    if let Some(facet) = settings.facets.facet_list.get_mut("backlink") {
        facet.is_active = true;
    }

    let file = env.create_file("saved.toml", &settings.to_toml().unwrap());
    let config = Config::load_from_files(&[file]).unwrap();
    assert!(config.warnings.is_empty(), "{:?}", config.warnings);
    assert_eq!(config.settings, settings);
}

#[test]
fn init_template_loads_as_defaults() {
    let env = TestEnv::new();
    let file = env.create_file("init.toml", &settings_template());
    let config = Config::load_from_files(&[file]).unwrap();
    assert_eq!(config.settings, Settings::default());
}

#[test]
fn folder_filters_compile_from_settings() {
    let env = TestEnv::new();
    let file = env.create_file(
        "filters.toml",
        "[standard]\nexclude_folders = \"Archive\"\nignored_paths = [\"**/*.excalidraw.md\"]\n",
    );
    let config = Config::load_from_files(&[file]).unwrap();

    let excluded = PathFilter::compile(&config.settings.standard.exclude_folders).unwrap();
    assert!(excluded.is_match("Archive/old.md"));
    assert!(!excluded.is_match("Projects/new.md"));

    let ignored = PathFilter::compile(&config.settings.standard.ignored_paths).unwrap();
    assert!(ignored.is_match("art/sketch.excalidraw.md"));
}
