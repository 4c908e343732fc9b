//! ANSI terminal colors.
//!
//! Colors are named with an optional shade prefix, e.g. `red`, `bright red`
//! or `dark green`. A [`ColorSpec`] pairs a foreground with an optional
//! background, written as `"bright yellow on blue"`.
//!
//! ```
//! use badger::color::{ansi_escape_code, color, Base};
//!
//! assert_eq!(ansi_escape_code("red", Base::Fg).unwrap(), "\x1b[31m");
//! assert_eq!(ansi_escape_code("bright red", Base::Bg).unwrap(), "\x1b[41;1m");
//!
//! let warn = color("bright yellow").unwrap();
//! assert_eq!(warn.paint("careful"), "\x1b[33;1mcareful\x1b[0m");
//! ```

use std::str::FromStr;
use thiserror::Error;

const ANSI_START: &str = "\x1b[";
const ANSI_END: &str = "m";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid color: {0}")]
    Invalid(String),
}

/// Which part of the text a color code applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Fg,
    Bg,
    /// Raw attribute codes such as `reset` or `bold`.
    None,
}

impl Base {
    fn offset(self) -> u8 {
        match self {
            Base::Fg => 30,
            Base::Bg => 40,
            Base::None => 0,
        }
    }
}

/// Maps a color or attribute name to its ANSI number.
fn ansi_code(name: &str) -> Option<u8> {
    Some(match name {
        "reset" => 0,
        "bold" | "bright" => 1,
        "dark" => 2,
        "black" => 0,
        "red" => 1,
        "green" => 2,
        "yellow" => 3,
        "blue" => 4,
        "magenta" => 5,
        "cyan" => 6,
        "grey" | "gray" | "white" => 7,
        _ => return None,
    })
}

fn is_shade(name: &str) -> bool {
    matches!(name, "bold" | "bright" | "dark")
}

/// Returns the escape sequence for a color name with an optional shade.
pub fn ansi_escape_code(color: &str, base: Base) -> Result<String, ColorError> {
    let invalid = || ColorError::Invalid(color.to_string());
    let words: Vec<&str> = color.split_whitespace().collect();

    let (shade, hue) = match words.as_slice() {
        [hue] => (None, *hue),
        [shade, hue] if is_shade(shade) => (Some(*shade), *hue),
        _ => return Err(invalid()),
    };

    let mut codes = vec![(base.offset() + ansi_code(hue).ok_or_else(invalid)?).to_string()];
    if let Some(shade) = shade {
        codes.push(ansi_code(shade).ok_or_else(invalid)?.to_string());
    }

    Ok(format!("{}{}{}", ANSI_START, codes.join(";"), ANSI_END))
}

/// The escape sequence that resets all colors and attributes.
pub fn ansi_reset() -> String {
    format!("{}0{}", ANSI_START, ANSI_END)
}

/// A foreground color with an optional background color.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorSpec {
    pub fg: Option<String>,
    pub bg: Option<String>,
}

impl ColorSpec {
    pub fn fg(color: &str) -> Self {
        Self {
            fg: Some(color.to_string()),
            bg: None,
        }
    }

    pub fn on(mut self, bg: &str) -> Self {
        self.bg = Some(bg.to_string());
        self
    }
}

impl FromStr for ColorSpec {
    type Err = ColorError;

    /// Parses `"red"`, `"bright red on blue"` or `"on blue"`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let (fg, bg) = match text.split_once(" on ") {
            Some((fg, bg)) => (fg.trim(), Some(bg.trim())),
            None => match text.strip_prefix("on ") {
                Some(bg) => ("", Some(bg.trim())),
                None => (text, None),
            },
        };
        let spec = ColorSpec {
            fg: (!fg.is_empty()).then(|| fg.to_string()),
            bg: bg.map(str::to_string),
        };
        // validate now so painting can't fail later
        ansi_escape(&spec)?;
        Ok(spec)
    }
}

/// Returns the escape sequence for a color spec, background first.
pub fn ansi_escape(spec: &ColorSpec) -> Result<String, ColorError> {
    let mut escapes = String::new();
    if let Some(bg) = &spec.bg {
        escapes.push_str(&ansi_escape_code(bg, Base::Bg)?);
    }
    if let Some(fg) = &spec.fg {
        escapes.push_str(&ansi_escape_code(fg, Base::Fg)?);
    }
    Ok(escapes)
}

/// Whether the environment allows colored output (`NO_COLOR` is unset).
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
}

/// Wraps text in a fixed set of color escapes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Painter {
    start: String,
}

impl Painter {
    pub fn new(spec: &ColorSpec) -> Result<Self, ColorError> {
        Ok(Self {
            start: ansi_escape(spec)?,
        })
    }

    /// A painter that leaves text unchanged.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Returns a plain painter unless `enabled`.
    pub fn enabled(self, enabled: bool) -> Self {
        if enabled {
            self
        } else {
            Self::plain()
        }
    }

    pub fn paint(&self, text: &str) -> String {
        if self.start.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.start, text, ansi_reset())
        }
    }
}

/// Returns a painter for a color spec such as `"bright red on black"`.
pub fn color(spec: &str) -> Result<Painter, ColorError> {
    Painter::new(&spec.parse()?)
}
