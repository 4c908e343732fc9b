//! Reading and writing `.env` files.
//!
//! A `.env` file holds one `KEY=value` assignment per line:
//!
//! ```text
//! # comments are ignored
//! export DATABASE=postgres://localhost/app
//! NAME: badger
//! GREETING="Hello\nWorld"
//! LITERAL='no $expansion here'
//! ```
//!
//! Values may be single, double or backtick quoted. Double quoted values
//! expand `\n`, `\r` and `\"`; other quoted values are taken literally.
//! Unquoted values end at a `#` comment and are trimmed.

use crate::file::directory::Directory;
use crate::file::loader::read_text;
use crate::file::saver::{write_text, SaveOptions};
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use log::{debug, info};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DOT_ENV: &str = ".env";

/// Where to look for a `.env` file and what to do with it.
#[derive(Debug, Clone)]
pub struct DotenvOptions {
    /// Explicit file to load; skips the search when set.
    pub path: Option<PathBuf>,
    /// Name of the file to search for.
    pub filename: String,
    /// Directories to search, in order. Empty means the current directory.
    pub dirs: Vec<PathBuf>,
    /// Also search the parents of each directory.
    pub walkup: bool,
    /// Copy the loaded variables into the process environment.
    pub apply_to_env: bool,
}

impl Default for DotenvOptions {
    fn default() -> Self {
        Self {
            path: None,
            filename: DOT_ENV.to_string(),
            dirs: Vec::new(),
            walkup: true,
            apply_to_env: true,
        }
    }
}

fn is_key_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.' | '-')
}

fn is_blank(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Scans `.env` text one assignment at a time.
struct Scanner<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> Scanner<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest.find(|ch: char| !pred(ch)).unwrap_or(rest.len());
        self.position += end;
        &rest[..end]
    }

    fn skip_line(&mut self) {
        self.skip_while(|ch| ch != '\n');
        if self.peek() == Some('\n') {
            self.position += 1;
        }
    }

    /// Parses the next assignment, returning `None` at the end of input.
    fn next_entry(&mut self) -> Option<Option<(String, String)>> {
        self.skip_while(char::is_whitespace);
        if self.position >= self.text.len() {
            return None;
        }
        let entry = self.parse_entry();
        self.skip_line();
        Some(entry)
    }

    fn parse_entry(&mut self) -> Option<(String, String)> {
        if self.rest().starts_with("export") {
            let after = &self.rest()["export".len()..];
            if after.starts_with(is_blank) {
                self.position += "export".len();
                self.skip_while(is_blank);
            }
        }

        let key = self.skip_while(is_key_char);
        if key.is_empty() {
            return None;
        }

        self.skip_while(is_blank);
        match self.peek() {
            Some('=') => {
                self.position += 1;
            }
            Some(':') => {
                self.position += 1;
                // `KEY: value` needs the space
                if !self.rest().starts_with(|ch: char| ch.is_whitespace()) {
                    return None;
                }
            }
            _ => return None,
        }
        self.skip_while(is_blank);

        Some((key.to_string(), self.parse_value()))
    }

    fn parse_value(&mut self) -> String {
        if let Some(quote @ ('\'' | '"' | '`')) = self.peek() {
            if let Some(value) = self.parse_quoted(quote) {
                return value;
            }
        }
        self.skip_while(|ch| ch != '#' && ch != '\n').trim().to_string()
    }

    /// Parses a quoted value, which may span lines. Returns `None` if the
    /// closing quote is missing. A backslash stops the next character from
    /// closing the value; only double quoted values expand escapes.
    fn parse_quoted(&mut self, quote: char) -> Option<String> {
        let body = &self.rest()[1..];
        let mut escaped = false;
        let mut end = None;
        for (i, ch) in body.char_indices() {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                end = Some(i);
                break;
            }
        }
        let end = end?;
        self.position += 1 + end + 1;

        let raw = &body[..end];
        Some(if quote == '"' {
            unescape_double(raw)
        } else {
            raw.to_string()
        })
    }
}

/// Expands `\n`, `\r`, `\"` and `\\` in one pass; other escapes are kept.
fn unescape_double(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('"') => value.push('"'),
            Some('\\') => value.push('\\'),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}

/// Parses the contents of a `.env` file. Later assignments override earlier ones.
///
/// ```
/// use badger::dotenv::parse_dotenv;
///
/// let env = parse_dotenv("NAME=badger # a comment\nexport GREETING=\"Hello\\nWorld\"\n");
/// assert_eq!(env["NAME"], "badger");
/// assert_eq!(env["GREETING"], "Hello\nWorld");
/// ```
pub fn parse_dotenv(text: &str) -> IndexMap<String, String> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut scanner = Scanner {
        text: &text,
        position: 0,
    };

    let mut env = IndexMap::new();
    while let Some(entry) = scanner.next_entry() {
        if let Some((key, value)) = entry {
            env.insert(key, value);
        }
    }
    env
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Searches for a `.env` file, walking up through parent directories if
/// `options.walkup` is set. Returns the path of the first file found.
pub fn find_dotenv(options: &DotenvOptions) -> Result<PathBuf> {
    let dirs = if options.dirs.is_empty() {
        vec![Directory::cwd()?.path().to_path_buf()]
    } else {
        options.dirs.clone()
    };

    let mut looked_in = HashSet::new();
    for start in &dirs {
        let mut next = Some(absolute(start));
        while let Some(dir) = next {
            if !looked_in.insert(dir.clone()) {
                break;
            }
            let candidate = Directory::new(&dir).file(&options.filename);
            debug!("looking for {}", candidate.path().display());
            if candidate.exists() {
                return Ok(candidate.path().to_path_buf());
            }
            next = if options.walkup {
                dir.parent().map(Path::to_path_buf)
            } else {
                None
            };
        }
    }

    let searched: Vec<String> = dirs.iter().map(|d| d.display().to_string()).collect();
    let scope = if options.walkup {
        "any parent directory of"
    } else {
        "directory"
    };
    bail!(
        "Cannot locate {} file in {} {}",
        options.filename,
        scope,
        searched.join(", ")
    )
}

/// Loads a `.env` file, optionally adding its variables to the process
/// environment, and returns the variables it defines.
pub fn load_dotenv(options: &DotenvOptions) -> Result<IndexMap<String, String>> {
    let path = match &options.path {
        Some(path) => path.clone(),
        None => find_dotenv(options)?,
    };
    if !path.is_file() {
        bail!("Specified environment file does not exist: {}", path.display());
    }

    info!("Loading environment from {}", path.display());
    let text = read_text(&path)?;
    let env = parse_dotenv(&text);
    debug!("loaded {} variables", env.len());

    if options.apply_to_env {
        for (key, value) in &env {
            std::env::set_var(key, value);
        }
        debug!("added environment to process");
    }

    Ok(env)
}

fn needs_quotes(value: &str) -> bool {
    value.trim() != value
        || value.contains(['#', '\n', '\r'])
        || value.starts_with(['\'', '"', '`'])
}

fn format_value(value: &str) -> String {
    if !needs_quotes(value) {
        value.to_string()
    } else if !value.contains(['\'', '\\', '\n', '\r']) {
        format!("'{}'", value)
    } else {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r");
        format!("\"{}\"", escaped)
    }
}

/// Formats variables as `.env` text that [`parse_dotenv`] reads back.
///
/// # Errors
///
/// Returns an error if a key contains characters other than letters,
/// digits, `_`, `.` and `-`.
pub fn format_dotenv(env: &IndexMap<String, String>) -> Result<String> {
    let mut text = String::new();
    for (key, value) in env {
        if key.is_empty() || !key.chars().all(is_key_char) {
            bail!("Invalid environment variable name: {:?}", key);
        }
        text.push_str(key);
        text.push('=');
        text.push_str(&format_value(value));
        text.push('\n');
    }
    Ok(text)
}

/// Writes variables to a `.env` file.
pub fn write_dotenv<P: AsRef<Path>>(path: P, env: &IndexMap<String, String>) -> Result<()> {
    let path = path.as_ref();
    let text = format_dotenv(env)?;
    write_text(path, &text, SaveOptions::default())
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_simple() {
        let env = parse_dotenv("FOO=bar\nBAZ = qux\n");
        assert_eq!(env["FOO"], "bar");
        assert_eq!(env["BAZ"], "qux");
    }

    #[test]
    fn test_parse_export_and_colon() {
        let env = parse_dotenv("export FOO=bar\nNAME: badger\nexported=yes\n");
        assert_eq!(env["FOO"], "bar");
        assert_eq!(env["NAME"], "badger");
        assert_eq!(env["exported"], "yes");
    }

    #[test]
    fn test_parse_colon_needs_space() {
        let env = parse_dotenv("URL:http://example.com\n");
        assert!(env.is_empty());
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let env = parse_dotenv("# comment\n\n  FOO=bar # trailing\nEMPTY=\nHASH=# nothing\n");
        assert_eq!(env.len(), 3);
        assert_eq!(env["FOO"], "bar");
        assert_eq!(env["EMPTY"], "");
        assert_eq!(env["HASH"], "");
    }

    #[test]
    fn test_parse_quoted_values() {
        let env = parse_dotenv(
            "SINGLE='it is # not a comment'\nDOUBLE=\"line\\none\"\nBACK=`tick`\nRAW='a\\nb'\n",
        );
        assert_eq!(env["SINGLE"], "it is # not a comment");
        assert_eq!(env["DOUBLE"], "line\none");
        assert_eq!(env["BACK"], "tick");
        assert_eq!(env["RAW"], "a\\nb");
    }

    #[test]
    fn test_parse_multiline_quoted() {
        let env = parse_dotenv("KEY=\"first\nsecond\"\nNEXT=1\n");
        assert_eq!(env["KEY"], "first\nsecond");
        assert_eq!(env["NEXT"], "1");
    }

    #[test]
    fn test_parse_unterminated_quote_is_literal() {
        let env = parse_dotenv("KEY='oops\nNEXT=1\n");
        assert_eq!(env["KEY"], "'oops");
        assert_eq!(env["NEXT"], "1");
    }

    #[test]
    fn test_parse_crlf_and_override() {
        let env = parse_dotenv("A=1\r\nB=2\r\nA=3\r\n");
        assert_eq!(env["A"], "3");
        assert_eq!(env["B"], "2");
        assert_eq!(env.keys().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_format_round_trip() {
        let mut env = IndexMap::new();
        env.insert("PLAIN".to_string(), "hello world".to_string());
        env.insert("HASH".to_string(), "a # b".to_string());
        env.insert("LINES".to_string(), "it's\n\"two\"".to_string());
        env.insert("PADDED".to_string(), " x ".to_string());
        env.insert("EMPTY".to_string(), String::new());

        let text = format_dotenv(&env).unwrap();
        assert!(text.starts_with("PLAIN=hello world\nHASH='a # b'\n"));
        assert_eq!(parse_dotenv(&text), env);
    }

    #[test]
    fn test_format_rejects_bad_key() {
        let mut env = IndexMap::new();
        env.insert("NO SPACES".to_string(), "x".to_string());
        assert!(format_dotenv(&env).is_err());
    }

    #[test]
    fn test_format_round_trip_backslashes() {
        let mut env = IndexMap::new();
        env.insert("DRIVE".to_string(), "it's #C:\\new".to_string());
        env.insert("TRAILING".to_string(), "it's # a\\".to_string());
        env.insert("ESCAPES".to_string(), "it's\nC:\\rest".to_string());
        env.insert("COMMENT".to_string(), "# path\\".to_string());
        env.insert("BARE".to_string(), "C:\\temp".to_string());

        let text = format_dotenv(&env).unwrap();
        assert!(text.contains("TRAILING=\"it's # a\\\\\"\n"));
        assert!(text.contains("BARE=C:\\temp\n"));
        assert_eq!(parse_dotenv(&text), env);
    }

    #[test]
    fn test_parse_double_quoted_escapes() {
        let env = parse_dotenv(r#"A="x\\ny" B="tab\t" C="end\\""#.replace(' ', "\n").as_str());
        assert_eq!(env["A"], "x\\ny");
        assert_eq!(env["B"], "tab\\t");
        assert_eq!(env["C"], "end\\");
    }

    #[test]
    fn test_find_walks_up() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join("a/.env"), "FOUND=yes\n").unwrap();

        let options = DotenvOptions {
            dirs: vec![nested.clone()],
            ..DotenvOptions::default()
        };
        let found = find_dotenv(&options).unwrap();
        assert_eq!(found, absolute(&tmp.path().join("a/.env")));

        let no_walk = DotenvOptions {
            dirs: vec![nested],
            walkup: false,
            ..DotenvOptions::default()
        };
        let err = find_dotenv(&no_walk).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Cannot locate .env file in directory "));
    }

    #[test]
    fn test_find_walkup_error_names_parents() {
        let tmp = TempDir::new().unwrap();
        let options = DotenvOptions {
            filename: ".env.never-created".to_string(),
            dirs: vec![tmp.path().to_path_buf()],
            ..DotenvOptions::default()
        };
        let err = find_dotenv(&options).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Cannot locate .env.never-created file in any parent directory of "));
    }

    #[test]
    fn test_load_without_applying() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.env");
        fs::write(&path, "BADGER_TEST_UNAPPLIED=1\n").unwrap();

        let options = DotenvOptions {
            path: Some(path),
            apply_to_env: false,
            ..DotenvOptions::default()
        };
        let env = load_dotenv(&options).unwrap();
        assert_eq!(env["BADGER_TEST_UNAPPLIED"], "1");
        assert!(std::env::var("BADGER_TEST_UNAPPLIED").is_err());
    }

    #[test]
    fn test_load_applies_to_env() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".env"), "BADGER_TEST_APPLIED=hello\n").unwrap();

        let options = DotenvOptions {
            dirs: vec![tmp.path().to_path_buf()],
            walkup: false,
            ..DotenvOptions::default()
        };
        load_dotenv(&options).unwrap();
        assert_eq!(std::env::var("BADGER_TEST_APPLIED").unwrap(), "hello");
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let options = DotenvOptions {
            path: Some(tmp.path().join("missing.env")),
            ..DotenvOptions::default()
        };
        let err = load_dotenv(&options).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Specified environment file does not exist"));
    }

    #[test]
    fn test_write_dotenv() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env");
        let mut env = IndexMap::new();
        env.insert("A".to_string(), "1".to_string());
        write_dotenv(&path, &env).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "A=1\n");
    }
}
