//! Integration tests for workspaces and their config directories.

use badger::workspace::{Workspace, WorkspaceOptions};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A workspace root holding `config/animal.yaml` and `config2/animals.yaml`.
fn setup() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("config")).unwrap();
    fs::create_dir(tmp.path().join("config2")).unwrap();
    fs::write(
        tmp.path().join("config/animal.yaml"),
        "name: Bobby\nanimal: Badger\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("config2/animals.yaml"),
        "- name: Bobby\n  animal: Badger\n- name: Frankie\n  animal: Ferret\n",
    )
    .unwrap();
    tmp
}

fn animals() -> serde_json::Value {
    json!([
        { "name": "Bobby", "animal": "Badger" },
        { "name": "Frankie", "animal": "Ferret" },
    ])
}

#[test]
fn test_default_config_dir() {
    let tmp = setup();
    let space = Workspace::new(tmp.path());
    assert_eq!(
        space.config("animal", None).unwrap(),
        json!({ "name": "Bobby", "animal": "Badger" })
    );
    assert!(space.config("animals", None).is_err());
}

#[test]
fn test_second_config_dir_by_name() {
    let tmp = setup();
    let options = WorkspaceOptions {
        config_dirs: vec!["config2".into()],
        ..WorkspaceOptions::default()
    };
    let space = Workspace::with_options(tmp.path(), options).unwrap();
    assert_eq!(space.config("animals", None).unwrap(), animals());
    assert!(space.config("animal", None).is_err());
}

#[test]
fn test_both_config_dirs() {
    let tmp = setup();
    let options = WorkspaceOptions {
        config_dirs: vec!["config".into(), "config2".into()],
        ..WorkspaceOptions::default()
    };
    let space = Workspace::with_options(tmp.path(), options).unwrap();
    assert_eq!(space.config("animal#animal", None).unwrap(), json!("Badger"));
    assert_eq!(space.config("animals#1/name", None).unwrap(), json!("Frankie"));
    assert_eq!(space.config_dirs().len(), 2);
}

#[test]
fn test_absolute_config_dirs() {
    let tmp = setup();
    let elsewhere = TempDir::new().unwrap();
    let options = WorkspaceOptions {
        config_dirs: vec![tmp.path().join("config"), tmp.path().join("config2")],
        ..WorkspaceOptions::default()
    };
    let space = Workspace::with_options(elsewhere.path(), options).unwrap();
    assert_eq!(space.config("animal#name", None).unwrap(), json!("Bobby"));
    assert_eq!(space.config("animals", None).unwrap(), animals());
    assert_eq!(space.root().path(), elsewhere.path());
}

#[test]
fn test_codec_option_limits_search() {
    let tmp = setup();
    let options = WorkspaceOptions {
        config_dirs: vec![PathBuf::from("config")],
        codecs: Some("json".to_string()),
    };
    let space = Workspace::with_options(tmp.path(), options).unwrap();
    assert!(space.config("animal", None).is_err());
    assert_eq!(
        space.config("animal", Some(json!({ "name": "Nobody" }))).unwrap(),
        json!({ "name": "Nobody" })
    );
}

#[test]
fn test_write_then_read_data() {
    let tmp = TempDir::new().unwrap();
    let space = Workspace::new(tmp.path());
    space.dir("data").create().unwrap();
    space.write("data/pets.json", r#"{"pets": ["Bobby"]}"#).unwrap();
    let data = space.file("data/pets.json").read_data().unwrap();
    assert_eq!(data, json!({ "pets": ["Bobby"] }));
}
