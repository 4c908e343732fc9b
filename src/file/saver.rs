//! Data file saving functionality.
//!
//! This module encodes values with a [`Codec`] and writes them to files with
//! atomic write operations, optional gzip compression and optional backups.

use crate::codec::Codec;
use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Options controlling how a file is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOptions {
    /// Copy an existing file to `<name>.bak` before overwriting it.
    pub create_backup: bool,
    /// Write indented, human friendly output.
    pub pretty: bool,
}

/// Copies an existing file to `<name>.bak`.
fn create_backup(path: &Path) -> Result<()> {
    let backup = sibling_path(path, "bak");
    fs::copy(path, &backup)
        .with_context(|| format!("Failed to create backup: {}", backup.display()))?;
    Ok(())
}

/// Writes text to a file atomically.
///
/// The text is gzipped when the target name ends in `.gz`.
///
/// Fails if the backup copy, the temp file or the final rename fails.
pub fn write_text<P: AsRef<Path>>(path: P, text: &str, options: SaveOptions) -> Result<()> {
    let path = path.as_ref();
    if options.create_backup && path.exists() {
        create_backup(path)?;
    }
    let gzip = path.to_string_lossy().ends_with(".gz");
    write_file_atomic(path, text.as_bytes(), gzip)
}

/// Encodes `data` and saves it to `path`.
///
/// When `codec` is `None` the codec is inferred from the file extension.
///
/// # Examples
///
/// ```no_run
/// use badger::file::saver::{save_data_file, SaveOptions};
/// use serde_json::json;
///
/// let data = json!({ "message": "Hello World" });
/// save_data_file("hello.yaml", &data, None, SaveOptions::default()).unwrap();
/// ```
///
/// # Errors
///
/// Returns an error if no codec can be determined, if the data cannot be
/// encoded in the chosen format, or if writing fails.
pub fn save_data_file<P: AsRef<Path>>(
    path: P,
    data: &Value,
    codec: Option<Codec>,
    options: SaveOptions,
) -> Result<()> {
    let path = path.as_ref();
    let codec = match codec {
        Some(codec) => codec,
        None => Codec::from_path(path)
            .with_context(|| format!("Cannot determine codec for file: {}", path.display()))?,
    };

    let mut text = if options.pretty {
        codec.encode_pretty(data)?
    } else {
        codec.encode(data)?
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }

    debug!("saving {} data to {}", codec, path.display());
    write_text(path, &text, options)
}

/// Writes bytes to a temp file beside `path`, gzipped if `compress` is set,
/// then renames it over the target.
fn write_file_atomic(path: &Path, bytes: &[u8], compress: bool) -> Result<()> {
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    let temp = sibling_path(path, "tmp");
    let written = if compress {
        fs::File::create(&temp).and_then(|file| {
            let mut gz = GzEncoder::new(file, Compression::default());
            gz.write_all(bytes)?;
            gz.finish().map(drop)
        })
    } else {
        fs::write(&temp, bytes)
    };
    written.with_context(|| format!("Failed to write {}", temp.display()))?;

    fs::rename(&temp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))
}

/// `data.json` -> `data.json.<suffix>`, in the same directory.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::loader::{load_data_file, read_text};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_sibling_path_keeps_extension() {
        assert_eq!(
            sibling_path(Path::new("dir/data.json"), "tmp"),
            Path::new("dir/data.json.tmp")
        );
    }

    #[test]
    fn test_save_and_reload_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hello.yaml");
        let data = json!({ "message": "Hello World" });

        save_data_file(&path, &data, None, SaveOptions::default()).unwrap();

        assert_eq!(read_text(&path).unwrap(), "message: Hello World\n");
        assert_eq!(load_data_file(&path, None).unwrap(), data);
        assert!(!dir.path().join("hello.yaml.tmp").exists());
    }

    #[test]
    fn test_save_gzipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json.gz");
        let data = json!({ "list": [1, 2, 3] });

        save_data_file(&path, &data, None, SaveOptions::default()).unwrap();

        let raw = fs::read(&path).unwrap();
        assert!(raw.starts_with(&[0x1f, 0x8b]));
        assert_eq!(load_data_file(&path, None).unwrap(), data);
    }

    #[test]
    fn test_save_creates_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{\"old\":true}\n").unwrap();

        let options = SaveOptions {
            create_backup: true,
            ..SaveOptions::default()
        };
        save_data_file(&path, &json!({ "new": true }), None, options).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("data.json.bak")).unwrap(),
            "{\"old\":true}\n"
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"new\":true}\n");
    }

    #[test]
    fn test_save_pretty_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        let options = SaveOptions {
            pretty: true,
            ..SaveOptions::default()
        };
        save_data_file(&path, &json!({ "a": 1 }), None, options).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_save_unknown_codec() {
        let dir = TempDir::new().unwrap();
        let err = save_data_file(
            dir.path().join("data.bin"),
            &json!({}),
            None,
            SaveOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Cannot determine codec"));
    }
}
