//! Data paths for plucking values out of nested data.
//!
//! A data path is a slash-delimited list of keys and indexes, resolved one
//! segment at a time against a JSON or YAML value.
//!
//! # Supported Syntax
//!
//! - `foo/bar` - Named keys, separated by one or more slashes
//! - `animal/0` - Sequence index
//! - `'a/b'` or `"a/b"` - Quoted keys, which may contain `/` and `?`
//! - `foo?` - Optional: stop with no value if `foo` is missing
//! - `?foo` - Maybe: stop with the node reached so far if `foo` is missing
//!
//! Quoted keys understand `\\`, `\b`, `\f`, `\n`, `\r`, `\t`, `\v` and an
//! escaped copy of their own quote character. Any other escape is kept as is.
//!
//! # Examples
//!
//! ```
//! use badger::datapath::data_path;
//! use serde_json::json;
//!
//! let data = json!({ "bar": { "baz": "X" }, "animal": ["aardvark", "badger"] });
//! assert_eq!(data_path(&data, "bar/baz").unwrap(), Some(&json!("X")));
//! assert_eq!(data_path(&data, "/animal/1/").unwrap(), Some(&json!("badger")));
//! assert_eq!(data_path(&data, "bar/wibble?").unwrap(), None);
//! assert_eq!(data_path(&data, "bar/?wibble").unwrap(), Some(&data["bar"]));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{DataPath, Modifier, Segment};
pub use error::DataPathError;
pub use evaluator::{data_path, Evaluator, Indexable};
pub use parser::{split_data_path, unquote_double, unquote_single, Parser};
