//! Data path tokenizer.

use super::ast::{Modifier, Segment};
use super::error::DataPathError;

/// Tokenizer for slash-delimited data path strings.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given path string.
    pub fn new(path: &'a str) -> Self {
        Self {
            input: path,
            position: 0,
        }
    }

    /// Parses the path string into its segments.
    pub fn parse(path: &str) -> Result<Vec<Segment>, DataPathError> {
        Parser::new(path).parse_segments()
    }

    fn parse_segments(&mut self) -> Result<Vec<Segment>, DataPathError> {
        let mut segments = Vec::new();

        loop {
            self.skip_separators();
            if self.is_eof() {
                break;
            }

            let start = self.position;
            let maybe = self.eat('?');
            let token = self.parse_token(start)?;
            let optional = self.eat('?');

            // A leading `?` wins over a trailing one.
            let modifier = if maybe {
                Modifier::Maybe
            } else if optional {
                Modifier::Optional
            } else {
                Modifier::None
            };

            // '' and "" name nothing
            if !token.is_empty() {
                segments.push(Segment::with_modifier(token, modifier));
            }
        }

        Ok(segments)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Advances past `expected` if it is the next character.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    fn skip_separators(&mut self) {
        while self.eat('/') {}
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    fn remainder_from(&self, start: usize) -> DataPathError {
        DataPathError::parse(&self.input[start..])
    }

    /// Parses one quoted or unquoted token.
    fn parse_token(&mut self, start: usize) -> Result<String, DataPathError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.next();
                self.parse_quoted(quote, start)
            }
            Some(ch) if ch != '/' && ch != '?' => Ok(self.parse_unquoted()),
            _ => Err(self.remainder_from(start)),
        }
    }

    /// Parses the body of a quoted string after its opening quote.
    fn parse_quoted(&mut self, quote: char, start: usize) -> Result<String, DataPathError> {
        let mut value = String::new();
        loop {
            match self.next() {
                Some(ch) if ch == quote => return Ok(value),
                Some('\\') => match self.next() {
                    Some(escaped) => match unescape(quote, escaped) {
                        Some(ch) => value.push(ch),
                        None => {
                            value.push('\\');
                            value.push(escaped);
                        }
                    },
                    None => break,
                },
                Some(ch) => value.push(ch),
                None => break,
            }
        }
        Err(self.remainder_from(start))
    }

    /// Parses the longest run of characters other than `/` and `?`.
    fn parse_unquoted(&mut self) -> String {
        let rest = &self.input[self.position..];
        let end = rest.find(['/', '?']).unwrap_or(rest.len());
        self.position += end;
        rest[..end].to_string()
    }
}

/// Maps the character after a backslash to its replacement.
///
/// Returns `None` for escapes that are kept literally.
fn unescape(quote: char, escaped: char) -> Option<char> {
    match escaped {
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{0B}'),
        '\\' => Some('\\'),
        ch if ch == quote => Some(ch),
        _ => None,
    }
}

fn unquote(text: &str, quote: char) -> Option<String> {
    let mut parser = Parser::new(text);
    if !parser.eat(quote) {
        return None;
    }
    let value = parser.parse_quoted(quote, 0).ok()?;
    parser.is_eof().then_some(value)
}

/// Returns the unescaped content of a string that is exactly one
/// single-quoted string, e.g. `'it\'s'`.
pub fn unquote_single(text: &str) -> Option<String> {
    unquote(text, '\'')
}

/// Returns the unescaped content of a string that is exactly one
/// double-quoted string, e.g. `"say \"hi\""`.
pub fn unquote_double(text: &str) -> Option<String> {
    unquote(text, '"')
}

/// Splits a data path into its segments.
///
/// ```
/// use badger::datapath::{split_data_path, Segment};
///
/// let segments = split_data_path("/animal/0/name?").unwrap();
/// assert_eq!(
///     segments,
///     vec![Segment::new("animal"), Segment::new("0"), Segment::optional("name")]
/// );
/// ```
pub fn split_data_path(path: &str) -> Result<Vec<Segment>, DataPathError> {
    Parser::parse(path)
}
