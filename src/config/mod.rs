//! Configuration for badger.
//!
//! [`Settings`] holds the user's preferences for the `badger` command, read
//! from `~/.config/badger/config.toml`. [`ConfigDir`] loads configuration
//! data files from one or more directories and can pick a value out of
//! them with a data path fragment.
//!
//! # Example
//!
//! ```
//! use badger::config::Settings;
//!
//! let settings = Settings::default();
//! assert_eq!(settings.output, "yaml");
//! assert_eq!(settings.indent, 2);
//!
//! let custom = Settings {
//!     color: false,
//!     ..Settings::default()
//! };
//! assert!(!custom.color);
//! ```

use crate::codec::Codec;
use crate::datapath::data_path;
use crate::file::directory::{DataFile, DirPath};
use crate::text::split_list;
use anyhow::{bail, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// User settings for the `badger` command.
///
/// # Fields
///
/// * `color` - Color error messages and progress output (default: true)
/// * `output` - Codec used to print results (default: "yaml")
/// * `indent` - Indentation for pretty printed JSON (default: 2)
/// * `progress_size` - Default number of steps for a progress bar (default: 100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Color output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Codec name used to print results
    #[serde(default = "default_output")]
    pub output: String,

    /// Spaces per indentation level for JSON output
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Steps in a progress bar
    #[serde(default = "default_progress_size")]
    pub progress_size: usize,
}

fn default_color() -> bool {
    true
}

fn default_output() -> String {
    "yaml".to_string()
}

fn default_indent() -> usize {
    2
}

fn default_progress_size() -> usize {
    100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: default_color(),
            output: default_output(),
            indent: default_indent(),
            progress_size: default_progress_size(),
        }
    }
}

impl Settings {
    /// Returns the path to the settings file.
    ///
    /// Uses `~/.config/badger/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("badger");
            path.push("config.toml");
            path
        })
    }

    /// Loads settings from the default settings file.
    ///
    /// Returns the defaults if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|err| {
                log::warn!("Ignoring settings file {}: {:#}", path.display(), err);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Loads settings from a specific TOML file.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings = toml::from_str(&contents)
            .with_context(|| format!("Invalid settings: {}", path.display()))?;
        Ok(settings)
    }

    /// Saves settings to the default settings file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// The output codec named by `output`.
    pub fn output_codec(&self) -> Result<Codec> {
        Ok(Codec::from_name(&self.output)?)
    }
}

/// Loads configuration data files from a list of directories.
///
/// A configuration uri such as `database#connection/host` names a file
/// (`database.yaml`, `database.json`, ...) and an optional data path
/// fragment that selects a value inside it.
///
/// ```no_run
/// use badger::config::ConfigDir;
///
/// let config = ConfigDir::new("config");
/// let host = config.config("database#connection/host", None).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigDir {
    dirs: DirPath,
    codecs: Vec<Codec>,
}

impl ConfigDir {
    /// Creates a loader searching `dirs` for YAML and then JSON files.
    pub fn new(dirs: impl Into<DirPath>) -> Self {
        Self {
            dirs: dirs.into(),
            codecs: vec![Codec::Yaml, Codec::Json],
        }
    }

    /// Sets the codecs to look for from a comma and/or whitespace separated list.
    pub fn with_codecs(mut self, codecs: &str) -> Result<Self> {
        self.codecs = split_list(codecs)
            .iter()
            .map(|name| Codec::from_name(name))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    pub fn codecs(&self) -> &[Codec] {
        &self.codecs
    }

    /// Finds the first `<dir>/<uri>.<ext>` that exists, trying each codec
    /// in each directory.
    pub fn file(&self, uri: &str) -> Option<DataFile> {
        for dir in self.dirs.dirs() {
            for codec in &self.codecs {
                let file = dir
                    .file(format!("{}.{}", uri, codec.extension()))
                    .with_codec(*codec);
                debug!("looking for config file: {}", file.path().display());
                if file.exists() {
                    debug!("config file exists: {}", file.path().display());
                    return Some(file);
                }
            }
        }
        None
    }

    /// Loads the configuration for `uri`.
    ///
    /// Anything after a `#` is a data path resolved inside the loaded data.
    /// When no file exists, `defaults` is used instead, or an error returned
    /// if there are none. A fragment that resolves to nothing through an
    /// optional segment gives `Value::Null`.
    pub fn config(&self, uri: &str, defaults: Option<Value>) -> Result<Value> {
        let (base, fragment) = match uri.split_once('#') {
            Some((base, fragment)) => (base, Some(fragment)),
            None => (uri, None),
        };

        let data = match (self.file(base), defaults) {
            (Some(file), _) => file.read_data()?,
            (None, Some(defaults)) => {
                debug!("using defaults for config: {}", base);
                defaults
            }
            (None, None) => bail!("No configuration file for {}", base),
        };

        match fragment {
            Some(fragment) if !fragment.is_empty() => {
                Ok(data_path(&data, fragment)?.cloned().unwrap_or(Value::Null))
            }
            _ => Ok(data),
        }
    }
}
