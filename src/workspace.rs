//! A project directory with its own configuration directories.
//!
//! A [`Workspace`] is rooted at a directory. Relative paths given to it are
//! resolved against that root, and configuration is loaded from one or
//! more config directories beneath it (`config` by default).
//!
//! ```no_run
//! use badger::workspace::Workspace;
//!
//! let space = Workspace::new("/srv/app");
//! let port = space.config("server#port", None).unwrap();
//! let readme = space.read("README.md").unwrap();
//! ```

use crate::config::ConfigDir;
use crate::file::directory::{DataFile, DirPath, Directory};
use anyhow::Result;
use log::debug;
use serde_json::Value;
use std::path::PathBuf;

/// How a [`Workspace`] finds its configuration.
#[derive(Debug, Clone)]
pub struct WorkspaceOptions {
    /// Config directories, searched in order. Relative paths are taken from
    /// the workspace root; absolute paths are used as they are.
    pub config_dirs: Vec<PathBuf>,
    /// Codec names to look for, e.g. `"yaml json"`. `None` keeps the
    /// [`ConfigDir`] default.
    pub codecs: Option<String>,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            config_dirs: vec![PathBuf::from("config")],
            codecs: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Workspace {
    root: Directory,
    config_dirs: Vec<Directory>,
    config: ConfigDir,
}

impl Workspace {
    /// Creates a workspace with a single `config` directory.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let root = Directory::new(root);
        let config_dirs = vec![root.dir("config")];
        let config = ConfigDir::new(DirPath::new(config_dirs.clone()));
        Self::assemble(root, config_dirs, config)
    }

    /// Creates a workspace with custom config directories and codecs.
    ///
    /// # Errors
    ///
    /// Returns an error if `options.codecs` names an unknown codec.
    pub fn with_options<P: Into<PathBuf>>(root: P, options: WorkspaceOptions) -> Result<Self> {
        let root = Directory::new(root);
        let config_dirs: Vec<Directory> = options
            .config_dirs
            .iter()
            .map(|dir| root.dir(dir))
            .collect();
        let mut config = ConfigDir::new(DirPath::new(config_dirs.clone()));
        if let Some(codecs) = &options.codecs {
            config = config.with_codecs(codecs)?;
        }
        Ok(Self::assemble(root, config_dirs, config))
    }

    fn assemble(root: Directory, config_dirs: Vec<Directory>, config: ConfigDir) -> Self {
        debug!("workspace root dir: {}", root.path().display());
        for dir in &config_dirs {
            debug!("workspace config dir: {}", dir.path().display());
        }
        Self {
            root,
            config_dirs,
            config,
        }
    }

    /// The workspace root.
    pub fn root(&self) -> &Directory {
        &self.root
    }

    /// A directory relative to the root. An empty path is the root itself.
    pub fn dir(&self, path: &str) -> Directory {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.dir(path)
        }
    }

    /// A file relative to the root.
    pub fn file(&self, path: &str) -> DataFile {
        self.root.file(path)
    }

    pub fn read(&self, path: &str) -> Result<String> {
        debug!("workspace read: {}", path);
        self.file(path).read()
    }

    pub fn write(&self, path: &str, text: &str) -> Result<DataFile> {
        debug!("workspace write: {}", path);
        let file = self.file(path);
        file.write(text)?;
        Ok(file)
    }

    /// The config directories, in search order.
    pub fn config_dirs(&self) -> &[Directory] {
        &self.config_dirs
    }

    /// The loader behind [`config`](Self::config).
    pub fn config_loader(&self) -> &ConfigDir {
        &self.config
    }

    /// Loads configuration for `uri`, which may end in a `#data/path`
    /// fragment. See [`ConfigDir::config`].
    pub fn config(&self, uri: &str, defaults: Option<Value>) -> Result<Value> {
        debug!("workspace config: {}", uri);
        self.config.config(uri, defaults)
    }
}
