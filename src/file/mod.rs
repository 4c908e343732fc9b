//! File I/O for data files.
//!
//! This module loads data files from disk or stdin, saves values back with
//! atomic writes and optional backups, and wraps directories and files in
//! small types for navigating and searching the filesystem.

pub mod directory;
pub mod loader;
pub mod saver;
