use std::collections::HashMap;
use std::fs;

use solstice_config::{
    ConfigGuardRailError, ConfigLoadError, ConfigLoader, ConfigSource,
    GalleryConfig,
};
use tempfile::TempDir;

fn isolated(root: &TempDir, vars: &[(&str, &str)]) -> ConfigLoader {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ConfigLoader::new()
        .with_search_root(root.path())
        .with_env_lookup(move |key| vars.get(key).cloned())
}

#[test]
fn empty_directory_yields_defaults() {
    let root = TempDir::new().expect("tempdir");
    let load = isolated(&root, &[]).load().expect("defaults load");

    assert_eq!(load.config, GalleryConfig::default());
    assert_eq!(load.metadata.source, ConfigSource::Default);
    assert!(!load.metadata.env_file_loaded);
    assert!(load.metadata.overrides.is_empty());
    assert!(load.warnings.is_empty());
}

#[test]
fn default_file_under_search_root_is_found() {
    let root = TempDir::new().expect("tempdir");
    fs::create_dir(root.path().join("config")).expect("mkdir");
    let path = root.path().join("config/solstice.toml");
    fs::write(
        &path,
        "[visibility]\ndebounce_window_ms = 60\n\n[messages]\ndefault_duration_ms = 5000\n",
    )
    .expect("write config");

    let load = isolated(&root, &[]).load().expect("file load");
    assert_eq!(load.metadata.source, ConfigSource::File(path));
    assert_eq!(load.config.visibility.debounce_window_ms, 60);
    assert_eq!(load.config.visibility.settle_delay_ms, 100);
    assert_eq!(load.config.messages.default_duration_ms, 5_000);
}

#[test]
fn env_path_beats_inline_json_and_default_file() {
    let root = TempDir::new().expect("tempdir");
    fs::write(
        root.path().join("solstice.toml"),
        "[loading]\nshow_delay_ms = 10\n",
    )
    .expect("write default");
    let custom = root.path().join("custom.json");
    fs::write(&custom, r#"{ "loading": { "show_delay_ms": 400 } }"#)
        .expect("write custom");

    let custom_str = custom.display().to_string();
    let load = isolated(
        &root,
        &[
            ("SOLSTICE_CONFIG_PATH", custom_str.as_str()),
            ("SOLSTICE_CONFIG_JSON", r#"{ "loading": { "show_delay_ms": 1 } }"#),
        ],
    )
    .load()
    .expect("env path load");

    assert_eq!(load.metadata.source, ConfigSource::EnvPath(custom));
    assert_eq!(load.config.loading.show_delay_ms, 400);
}

#[test]
fn inline_json_beats_default_file() {
    let root = TempDir::new().expect("tempdir");
    fs::write(root.path().join("solstice.json"), r#"{ "logging": { "filter": "debug" } }"#)
        .expect("write default");

    let load = isolated(
        &root,
        &[("SOLSTICE_CONFIG_JSON", r#"{ "messages": { "stack_offset_px": 48 } }"#)],
    )
    .load()
    .expect("inline load");

    assert_eq!(load.metadata.source, ConfigSource::EnvInline);
    assert_eq!(load.config.messages.stack_offset_px, 48);
    assert_eq!(load.config.logging.filter, "info");
}

#[test]
fn explicit_path_must_exist() {
    let root = TempDir::new().expect("tempdir");
    let err = isolated(&root, &[])
        .with_config_path(root.path().join("missing.toml"))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Io { .. }));
}

#[test]
fn env_file_supplies_overrides() {
    let root = TempDir::new().expect("tempdir");
    fs::write(
        root.path().join(".env"),
        "SOLSTICE_DEBOUNCE_WINDOW=250ms\nSOLSTICE_LOG=solstice_core=debug\n",
    )
    .expect("write env");

    let load = isolated(&root, &[("SOLSTICE_SETTLE_DELAY", "1s")])
        .load()
        .expect("load with env file");

    assert!(load.metadata.env_file_loaded);
    assert_eq!(load.config.visibility.debounce_window_ms, 250);
    assert_eq!(load.config.visibility.settle_delay_ms, 1_000);
    assert_eq!(load.config.logging.filter, "solstice_core=debug");
    assert_eq!(
        load.metadata.overrides,
        vec!["SOLSTICE_DEBOUNCE_WINDOW", "SOLSTICE_SETTLE_DELAY", "SOLSTICE_LOG"]
    );
}

#[test]
fn process_environment_wins_over_env_file() {
    let root = TempDir::new().expect("tempdir");
    fs::write(root.path().join(".env"), "SOLSTICE_MESSAGE_DURATION=9s\n")
        .expect("write env");

    let load = isolated(&root, &[("SOLSTICE_MESSAGE_DURATION", "4s")])
        .load()
        .expect("load");
    assert_eq!(load.config.messages.default_duration_ms, 4_000);
}

#[test]
fn guard_rail_failure_aborts_load() {
    let root = TempDir::new().expect("tempdir");
    let err = isolated(&root, &[("SOLSTICE_LOADING_WATCHDOG", "100ms")])
        .load()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::WatchdogTooShort {
            watchdog_ms: 100,
            show_delay_ms: 200,
        })
    ));
}

#[test]
fn short_settle_delay_is_a_warning() {
    let root = TempDir::new().expect("tempdir");
    let load = isolated(
        &root,
        &[("SOLSTICE_CONFIG_JSON", r#"{ "visibility": { "settle_delay_ms": 20 } }"#)],
    )
    .load()
    .expect("warnings only");
    assert_eq!(load.warnings.len(), 1);
}

#[test]
fn loaded_config_drives_runtime_configs() {
    let root = TempDir::new().expect("tempdir");
    let load = isolated(&root, &[("SOLSTICE_DEBOUNCE_WINDOW", "0ms")])
        .load()
        .expect("load");

    let tracker = solstice_core::TrackerConfig::from(load.config.visibility);
    assert_eq!(tracker.debounce_window, std::time::Duration::from_millis(1));
}
