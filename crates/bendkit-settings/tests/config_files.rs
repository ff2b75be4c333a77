use bendkit_core::{MaterialDetails, Punch};
use bendkit_settings::{ConfigError, EngineConfig, SettingsError};
use std::fs;

fn customized() -> EngineConfig {
    let mut config = EngineConfig::new();
    config.limits.bend.max_radius = 50.0;
    config.defaults.job_name = "Enclosure".to_string();
    config.defaults.die = Some("D12.90.R2".to_string());
    config.executor.queue_capacity = 4;
    config
        .materials
        .push(MaterialDetails::new("Brass", 8500.0, 200.0, 100.0, 1.0).unwrap());
    config.punches.push(Punch::new("P45", 70.0, 45.0, 0.8));
    config
}

#[test]
fn test_toml_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = customized();
    config.save_to_file(&path).unwrap();
    let loaded = EngineConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = customized();
    config.save_to_file(&path).unwrap();
    assert_eq!(EngineConfig::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[limits.bend]
max_angle = 150.0

[defaults]
material = "Aluminum"
"#,
    )
    .unwrap();

    let config = EngineConfig::load_from_file(&path).unwrap();
    assert_eq!(config.limits.bend.max_angle, 150.0);
    assert_eq!(config.limits.bend.min_angle, 1.0);
    assert_eq!(config.defaults.material, "Aluminum");
    assert_eq!(config.defaults.sheet_length, 300.0);
    assert_eq!(config.executor.queue_capacity, 16);
}

#[test]
fn test_invalid_file_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "executor": { "queue_capacity": 0 } }"#).unwrap();

    let err = EngineConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::ValueOutOfRange { ref key, .. }) if key == "executor.queue_capacity"
    ));
}

#[test]
fn test_malformed_file_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "limits = [").unwrap();
    assert!(matches!(
        EngineConfig::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));

    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        EngineConfig::load_from_file(&missing),
        Err(SettingsError::IoError(_))
    ));
}
