//! Integration tests for settings and configuration directories.

use badger::config::{ConfigDir, Settings};
use badger::file::directory::{Directory, DirPath};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_settings_round_trip_through_toml() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(&path, "color = false\noutput = \"json\"\n").unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert!(!settings.color);
    assert_eq!(settings.output, "json");
    assert_eq!(settings.indent, 2);
}

#[test]
fn test_settings_invalid_toml() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(&path, "color = [").unwrap();
    assert!(Settings::load_from(&path).is_err());
}

#[test]
fn test_config_searches_dirs_in_order() {
    let tmp = TempDir::new().unwrap();
    let local = Directory::new(tmp.path()).dir("local");
    let global = Directory::new(tmp.path()).dir("global");
    local.create().unwrap();
    global.create().unwrap();

    fs::write(global.path().join("site.yaml"), "name: Global\nport: 80\n").unwrap();
    fs::write(local.path().join("site.json"), r#"{"name": "Local"}"#).unwrap();

    let config = ConfigDir::new(DirPath::new(vec![
        Directory::new(tmp.path().join("absent")),
        local.clone(),
        global.clone(),
    ]));

    assert_eq!(config.config("site#name", None).unwrap(), json!("Local"));
    assert_eq!(
        config.config("site#port", None).unwrap_err().to_string(),
        "No value for data at path: port"
    );
    assert_eq!(config.config("site#port?", None).unwrap(), Value::Null);

    let file = config.file("site").unwrap();
    assert_eq!(file.path(), local.path().join("site.json"));
}

#[test]
fn test_config_nested_uri() {
    let tmp = TempDir::new().unwrap();
    let dir = Directory::new(tmp.path());
    dir.dir("db").create().unwrap();
    fs::write(
        dir.dir("db").path().join("main.yaml"),
        "hosts:\n  - alpha\n  - beta\n",
    )
    .unwrap();

    let config = ConfigDir::new(dir);
    assert_eq!(config.config("db/main#hosts/1", None).unwrap(), json!("beta"));
    assert_eq!(
        config.config("db/other", Some(json!({ "x": 1 }))).unwrap(),
        json!({ "x": 1 })
    );
}
