//! Data file loading functionality.
//!
//! This module reads text files (transparently decompressing `.gz` files) and
//! decodes them into `serde_json::Value` data with a [`Codec`].

use crate::codec::Codec;
use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Reads a text file, decompressing it first if the name ends in `.gz`.
///
/// # Errors
///
/// This function will return an error if:
/// - The file path does not exist or cannot be read
/// - A `.gz` file is not valid gzip data
/// - The contents are not valid UTF-8
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path_ref = path.as_ref();

    if is_gzipped(path_ref) {
        read_gzipped_file(path_ref)
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read file: {}", path_ref.display()))
    }
}

/// Loads and decodes a data file from the filesystem.
///
/// When `codec` is `None` the codec is inferred from the file extension,
/// e.g. `config.yaml` or `data.json.gz`.
///
/// # Examples
///
/// ```no_run
/// use badger::codec::Codec;
/// use badger::file::loader::load_data_file;
///
/// let data = load_data_file("config/site.yaml", None).unwrap();
/// let same = load_data_file("config/site.yaml", Some(Codec::Yaml)).unwrap();
/// assert_eq!(data, same);
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - No codec was given and none can be inferred from the extension
/// - The file cannot be read
/// - The file contents cannot be decoded
pub fn load_data_file<P: AsRef<Path>>(path: P, codec: Option<Codec>) -> Result<Value> {
    let path_ref = path.as_ref();
    let codec = match codec {
        Some(codec) => codec,
        None => Codec::from_path(path_ref).with_context(|| {
            format!("Cannot determine codec for file: {}", path_ref.display())
        })?,
    };

    debug!("loading {} data from {}", codec, path_ref.display());

    let content = read_text(path_ref)?;
    codec
        .decode(&content)
        .with_context(|| format!("Failed to parse {}", path_ref.display()))
}

/// Loads and decodes data from standard input.
///
/// Gzipped input is detected by its magic bytes and decompressed first.
///
/// # Errors
///
/// This function will return an error if:
/// - Reading from stdin fails
/// - The input is not valid UTF-8 or gzip data
/// - The input cannot be decoded with `codec`
pub fn load_from_stdin(codec: Codec) -> Result<Value> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    decode_bytes(&buffer, codec).context("Failed to parse data from stdin")
}

/// Decodes raw bytes, which may be gzipped, with `codec`.
pub fn decode_bytes(bytes: &[u8], codec: Codec) -> Result<Value> {
    let content = if bytes.starts_with(&GZIP_MAGIC) {
        decompress_gzip_bytes(bytes)?
    } else {
        String::from_utf8(bytes.to_vec()).context("Invalid UTF-8 in input")?
    };

    Ok(codec.decode(&content)?)
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Reads gzip data from any source into a string.
fn gunzip<R: std::io::Read>(source: R) -> std::io::Result<String> {
    use std::io::Read;

    let mut text = String::new();
    flate2::read::GzDecoder::new(source).read_to_string(&mut text)?;
    Ok(text)
}

fn read_gzipped_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    gunzip(file).with_context(|| format!("Failed to decompress {}", path.display()))
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    gunzip(bytes).context("Failed to decompress gzipped input")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn gzip(text: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("data.json.gz")));
        assert!(!is_gzipped(Path::new("data.json")));
        assert!(!is_gzipped(Path::new("gz")));
    }

    #[test]
    fn test_read_gzipped_file() {
        let dir = TempDir::new().unwrap();
        let gz_path = dir.path().join("data.json.gz");
        fs::write(&gz_path, gzip(r#"{"test": "value"}"#)).unwrap();

        assert_eq!(read_text(&gz_path).unwrap(), r#"{"test": "value"}"#);
    }

    #[test]
    fn test_read_corrupt_gzip_fails() {
        let dir = TempDir::new().unwrap();
        let gz_path = dir.path().join("data.json.gz");
        fs::write(&gz_path, b"not gzip data").unwrap();

        let err = read_text(&gz_path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to decompress"));
    }

    #[test]
    fn test_load_infers_codec() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("animals.yaml");
        fs::write(&path, "animal:\n  - aardvark\n  - badger\n").unwrap();

        let data = load_data_file(&path, None).unwrap();
        assert_eq!(data, json!({ "animal": ["aardvark", "badger"] }));
    }

    #[test]
    fn test_load_gzipped_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.json.gz");
        fs::write(&path, gzip(r#"{"name": "Alice", "age": 30}"#)).unwrap();

        let data = load_data_file(&path, None).unwrap();
        assert_eq!(data, json!({ "name": "Alice", "age": 30 }));
    }

    #[test]
    fn test_load_unknown_extension_needs_codec() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, r#"{"a": 1}"#).unwrap();

        let err = load_data_file(&path, None).unwrap_err();
        assert!(err.to_string().contains("Cannot determine codec"));
        assert_eq!(load_data_file(&path, Some(Codec::Json)).unwrap(), json!({ "a": 1 }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_data_file(dir.path().join("nope.json"), None).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_decode_bytes_detects_gzip() {
        let data = decode_bytes(&gzip("a: 1\n"), Codec::Yaml).unwrap();
        assert_eq!(data, json!({ "a": 1 }));
        let data = decode_bytes(b"a: 2\n", Codec::Yaml).unwrap();
        assert_eq!(data, json!({ "a": 2 }));
    }
}
