//! badger: utilities for loading, navigating and printing structured data.
//!
//! The heart of the crate is [`datapath`], a small language for walking into
//! nested data (`animal/0/name`, `?maybe/here`, `perhaps?`). Around it sit
//! codecs for JSON, YAML and TOML, file and directory helpers, a
//! configuration directory loader, `.env` file handling, ANSI colors, a
//! picture-drawing progress bar, date stamps, a [`workspace`] that ties a
//! project root to its config directories and a few text helpers.
//!
//! # Example
//!
//! ```
//! use badger::codec::Codec;
//! use badger::datapath::data_path;
//!
//! let data = Codec::Yaml.decode("animal:\n  - name: Derek\n").unwrap();
//! assert_eq!(data_path(&data, "animal/0/name").unwrap().unwrap(), "Derek");
//! ```

pub mod codec;
pub mod color;
pub mod config;
pub mod datapath;
pub mod dotenv;
pub mod file;
pub mod params;
pub mod progress;
pub mod text;
pub mod timestamp;
pub mod workspace;
