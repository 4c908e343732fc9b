//! Codecs for encoding and decoding structured data.
//!
//! Every codec decodes into and encodes from [`serde_json::Value`], so data
//! read from a YAML file can be written back out as JSON or TOML. Codec names
//! are case-insensitive: `"yaml"`, `"YAML"` and `"Yaml"` all name the same
//! codec.
//!
//! # Examples
//!
//! ```
//! use badger::codec::{codec, Codec};
//!
//! let yaml = codec("YAML").unwrap();
//! assert_eq!(yaml, Codec::Yaml);
//!
//! let data = yaml.decode("message: Hello World").unwrap();
//! assert_eq!(Codec::Json.encode(&data).unwrap(), r#"{"message":"Hello World"}"#);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while looking up, encoding or decoding with a codec.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Unknown codec: {0}")]
    Unknown(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("TOML encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
}

/// A serialisation format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Json,
    Yaml,
    Toml,
}

impl Codec {
    /// All known codecs, in lookup order.
    pub const ALL: [Codec; 3] = [Codec::Json, Codec::Yaml, Codec::Toml];

    /// Looks up a codec by name, ignoring case.
    pub fn from_name(name: &str) -> Result<Self, CodecError> {
        match name.trim().to_lowercase().as_str() {
            "json" => Ok(Codec::Json),
            "yaml" | "yml" => Ok(Codec::Yaml),
            "toml" => Ok(Codec::Toml),
            _ => Err(CodecError::Unknown(name.to_string())),
        }
    }

    /// Infers a codec from a file extension, looking through a trailing `.gz`.
    ///
    /// Returns `None` when the extension is missing or unknown.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        let path = match path.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => path.file_stem().map(Path::new)?,
            _ => path,
        };
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| Self::from_name(ext).ok())
    }

    /// The canonical lower case name of the codec.
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Json => "json",
            Codec::Yaml => "yaml",
            Codec::Toml => "toml",
        }
    }

    /// The file extension used for this codec.
    pub fn extension(&self) -> &'static str {
        self.name()
    }

    /// Decodes text into a value.
    pub fn decode(&self, text: &str) -> Result<Value, CodecError> {
        Ok(match self {
            Codec::Json => serde_json::from_str(text)?,
            Codec::Yaml => serde_yaml::from_str(text)?,
            Codec::Toml => toml::from_str(text)?,
        })
    }

    /// Encodes a value as compact text where the format has a compact form.
    pub fn encode(&self, data: &Value) -> Result<String, CodecError> {
        Ok(match self {
            Codec::Json => serde_json::to_string(data)?,
            Codec::Yaml => serde_yaml::to_string(data)?,
            Codec::Toml => toml::to_string(data)?,
        })
    }

    /// Encodes a value as human friendly, indented text.
    pub fn encode_pretty(&self, data: &Value) -> Result<String, CodecError> {
        Ok(match self {
            Codec::Json => serde_json::to_string_pretty(data)?,
            Codec::Yaml => serde_yaml::to_string(data)?,
            Codec::Toml => toml::to_string_pretty(data)?,
        })
    }
}

impl FromStr for Codec {
    type Err = CodecError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the codec registered under `name`.
pub fn codec(name: &str) -> Result<Codec, CodecError> {
    Codec::from_name(name)
}
