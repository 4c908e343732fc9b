//! Error types for data path parsing and evaluation.

use thiserror::Error;

/// Errors that can occur while parsing or evaluating a data path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataPathError {
    /// The path string does not follow the path grammar.
    #[error("Cannot parse data path at: {remainder}")]
    Parse { remainder: String },

    /// A segment without a `?` modifier found no value.
    #[error("No value for data at path: {path}")]
    Traversal { path: String },
}

impl DataPathError {
    pub(crate) fn parse(remainder: &str) -> Self {
        DataPathError::Parse {
            remainder: remainder.to_string(),
        }
    }

    pub(crate) fn traversal(visited: &[&str]) -> Self {
        DataPathError::Traversal {
            path: visited.join("/"),
        }
    }
}
