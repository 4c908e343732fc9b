//! Directory and file wrappers.
//!
//! [`Directory`] and [`DataFile`] wrap a filesystem path with convenience
//! methods for navigating, creating and removing directories and for reading
//! and writing files through a [`Codec`]. [`DirPath`] holds a search list of
//! directories.

use crate::codec::Codec;
use crate::file::loader::{load_data_file, read_text};
use crate::file::saver::{save_data_file, write_text, SaveOptions};
use crate::text::split_list;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

/// What [`Directory::must_exist`] does when the directory is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MustExist {
    /// Return an error.
    #[default]
    Fail,
    /// Create the directory; its parent must already exist.
    Mkdir,
    /// Create the directory and any missing parents.
    Create,
}

/// A directory on the filesystem. The directory need not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    path: PathBuf,
}

impl Directory {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// The current working directory.
    pub fn cwd() -> Result<Self> {
        let path = std::env::current_dir().context("Cannot determine current directory")?;
        Ok(Self::new(path))
    }

    /// The user's home directory.
    pub fn home() -> Option<Self> {
        dirs::home_dir().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// A file inside this directory.
    pub fn file<P: AsRef<Path>>(&self, name: P) -> DataFile {
        DataFile::new(self.path.join(name))
    }

    /// A sub-directory of this directory.
    pub fn dir<P: AsRef<Path>>(&self, name: P) -> Directory {
        Directory::new(self.path.join(name))
    }

    /// The parent directory. The root is its own parent.
    pub fn parent(&self) -> Directory {
        match self.path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => self.dir(".."),
            Some(parent) => Directory::new(parent),
            None if self.path.as_os_str().is_empty() => Directory::new(".."),
            None => self.clone(),
        }
    }

    /// Names of the entries in the directory, sorted.
    pub fn read(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.path)
            .with_context(|| format!("Failed to read directory: {}", self.path.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Creates the directory. The parent must exist.
    pub fn mkdir(&self) -> Result<&Self> {
        fs::create_dir(&self.path)
            .with_context(|| format!("Failed to create directory: {}", self.path.display()))?;
        Ok(self)
    }

    /// Creates the directory and any missing parents.
    pub fn create(&self) -> Result<&Self> {
        fs::create_dir_all(&self.path)
            .with_context(|| format!("Failed to create directory: {}", self.path.display()))?;
        Ok(self)
    }

    /// Removes everything inside the directory, leaving it empty.
    pub fn empty(&self) -> Result<&Self> {
        if !self.exists() {
            return Ok(self);
        }
        for name in self.read()? {
            let path = self.path.join(&name);
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(self)
    }

    /// Removes the directory, which must be empty. Does nothing if it is missing.
    pub fn rmdir(&self) -> Result<&Self> {
        if self.exists() {
            fs::remove_dir(&self.path)
                .with_context(|| format!("Failed to remove directory: {}", self.path.display()))?;
        }
        Ok(self)
    }

    /// Empties and removes the directory.
    pub fn destroy(&self) -> Result<&Self> {
        self.empty()?.rmdir()
    }

    /// Ensures the directory exists, creating it if `mode` allows.
    pub fn must_exist(&self, mode: MustExist) -> Result<&Self> {
        if self.exists() {
            return Ok(self);
        }
        match mode {
            MustExist::Fail => bail!("Directory does not exist: {}", self.path.display()),
            MustExist::Mkdir => self.mkdir(),
            MustExist::Create => self.create(),
        }
    }
}

/// A file, optionally paired with the codec used to read and write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    path: PathBuf,
    codec: Option<Codec>,
}

impl DataFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            codec: None,
        }
    }

    /// Sets the codec used by [`read_data`](Self::read_data) and
    /// [`write_data`](Self::write_data).
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn codec(&self) -> Option<Codec> {
        self.codec
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// The directory containing the file.
    pub fn directory(&self) -> Directory {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Directory::new(parent),
            _ => Directory::new("."),
        }
    }

    pub fn read(&self) -> Result<String> {
        read_text(&self.path)
    }

    pub fn write(&self, text: &str) -> Result<&Self> {
        write_text(&self.path, text, SaveOptions::default())?;
        Ok(self)
    }

    /// Reads and decodes the file with its codec, or one inferred from its name.
    pub fn read_data(&self) -> Result<Value> {
        load_data_file(&self.path, self.codec)
    }

    /// Encodes and writes data with the file's codec, or one inferred from its name.
    pub fn write_data(&self, data: &Value) -> Result<&Self> {
        let options = SaveOptions {
            pretty: true,
            ..SaveOptions::default()
        };
        save_data_file(&self.path, data, self.codec, options)?;
        Ok(self)
    }

    /// Deletes the file. A missing file is an error unless `force` is set.
    pub fn delete(&self, force: bool) -> Result<&Self> {
        if force && !self.path.exists() {
            return Ok(self);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to delete file: {}", self.path.display()))?;
        Ok(self)
    }
}

/// An ordered list of directories to search.
#[derive(Debug, Clone)]
pub struct DirPath {
    dirs: Vec<Directory>,
    existing: OnceCell<Vec<Directory>>,
}

impl DirPath {
    pub fn new(dirs: Vec<Directory>) -> Self {
        Self {
            dirs,
            existing: OnceCell::new(),
        }
    }

    /// Builds a search list from a comma and/or whitespace separated string.
    pub fn parse(dirs: &str) -> Self {
        Self::new(split_list(dirs).into_iter().map(Directory::new).collect())
    }

    /// All configured directories, whether or not they exist.
    pub fn all(&self) -> &[Directory] {
        &self.dirs
    }

    /// The configured directories that exist.
    ///
    /// Existence is checked on the first call only.
    pub fn dirs(&self) -> &[Directory] {
        self.existing
            .get_or_init(|| self.dirs.iter().filter(|d| d.exists()).cloned().collect())
    }
}

impl From<Directory> for DirPath {
    fn from(dir: Directory) -> Self {
        Self::new(vec![dir])
    }
}

impl From<&str> for DirPath {
    fn from(dirs: &str) -> Self {
        Self::parse(dirs)
    }
}
