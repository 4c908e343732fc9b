//! A text progress bar that draws a picture as work completes.
//!
//! Each call to [`Progress::progress`] returns the next slice of the picture
//! in proportion to how much of the work is done. Printing the slices in
//! order draws the whole picture by the time the work is finished.
//!
//! ```
//! use badger::progress::{Progress, ProgressConfig};
//!
//! let mut progress = Progress::new(ProgressConfig {
//!     size: 4,
//!     picture: Some("abcd".to_string()),
//!     color: false,
//!     ..ProgressConfig::default()
//! })
//! .unwrap();
//!
//! assert_eq!(progress.progress(1), "a");
//! assert_eq!(progress.progress(2), "bc");
//! assert_eq!(progress.remains(), "d\n");
//! ```

use crate::color::{color, ColorError, Painter};
use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Instant;

const DEFAULT_PICTURE: &str = "
┌──────────────────────────────────────┐
│ ∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙ │
│ ∙∙ ●●●●●●●●●●●●●●●●●●●●●●●●●●●●●● ∙∙ │
│ ∙∙ ●● ****************************●● ∙∙ │
│ ∙∙ ●● ◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦ ●● ∙∙ │
│ ∙∙ ●● ◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦◦ ●● ∙∙ │
│ ∙∙ ●● ****************************●● ∙∙ │
│ ∙∙ ●●●●●●●●●●●●●●●●●●●●●●●●●●●●●● ∙∙ │
│ ∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙∙ │
└──────────────────────────────────────┘
";

/// What a character in the picture depicts, which decides its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharType {
    Border,
    Background,
    Fill,
    Foreground,
}

/// Characters of each type; anything unlisted is foreground.
#[derive(Debug, Clone)]
pub struct CharTypes {
    pub border: String,
    pub background: String,
    pub fill: String,
}

impl Default for CharTypes {
    fn default() -> Self {
        Self {
            border: "┌─┐│└─┘|-".to_string(),
            background: "+∙".to_string(),
            fill: "*".to_string(),
        }
    }
}

impl CharTypes {
    fn lookup_table(&self) -> HashMap<char, CharType> {
        let mut table = HashMap::new();
        for (chars, kind) in [
            (&self.border, CharType::Border),
            (&self.background, CharType::Background),
            (&self.fill, CharType::Fill),
        ] {
            for ch in chars.chars() {
                table.insert(ch, kind);
            }
        }
        table
    }
}

/// Color specs for each character type, e.g. `"bright yellow"`.
#[derive(Debug, Clone)]
pub struct ProgressColors {
    pub border: String,
    pub background: String,
    pub foreground: String,
    pub fill: String,
}

impl Default for ProgressColors {
    fn default() -> Self {
        Self {
            border: "green".to_string(),
            background: "dark grey".to_string(),
            foreground: "blue".to_string(),
            fill: "bright yellow".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Number of steps that make up the whole job.
    pub size: usize,
    /// Picture to draw; `None` uses the built-in one.
    pub picture: Option<String>,
    pub char_types: CharTypes,
    pub colors: ProgressColors,
    /// Append the elapsed time to each completed line.
    pub show_elapsed: bool,
    /// Color the output.
    pub color: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            size: 100,
            picture: None,
            char_types: CharTypes::default(),
            colors: ProgressColors::default(),
            show_elapsed: false,
            color: true,
        }
    }
}

impl From<usize> for ProgressConfig {
    fn from(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

/// Renders `secs` as `HH:MM:SS`.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

pub struct Progress {
    size: usize,
    pixels: Vec<char>,
    char_types: HashMap<char, CharType>,
    painters: HashMap<CharType, Painter>,
    elapsed_painter: Painter,
    show_elapsed: bool,
    count: usize,
    last_pixel: usize,
    started: Instant,
}

impl Progress {
    pub fn new(config: impl Into<ProgressConfig>) -> Result<Self, ColorError> {
        let config = config.into();
        let source = config.picture.as_deref().unwrap_or(DEFAULT_PICTURE);
        let picture = format!("{}\n", source.trim());

        let painter = |spec: &str| -> Result<Painter, ColorError> {
            Ok(color(spec)?.enabled(config.color))
        };
        let painters = HashMap::from([
            (CharType::Border, painter(&config.colors.border)?),
            (CharType::Background, painter(&config.colors.background)?),
            (CharType::Foreground, painter(&config.colors.foreground)?),
            (CharType::Fill, painter(&config.colors.fill)?),
        ]);

        Ok(Self {
            size: config.size.max(1),
            pixels: picture.chars().collect(),
            char_types: config.char_types.lookup_table(),
            painters,
            elapsed_painter: painter("dark grey")?,
            show_elapsed: config.show_elapsed,
            count: 0,
            last_pixel: 0,
            started: Instant::now(),
        })
    }

    /// Total number of characters in the picture.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Records `n` more steps and returns the newly revealed part of the
    /// picture, which may be empty.
    pub fn progress(&mut self, n: usize) -> String {
        self.count = self.count.saturating_add(n);
        let end = (self.len() * self.count.min(self.size)) / self.size;
        if end > self.last_pixel {
            let start = self.last_pixel;
            self.last_pixel = end;
            log::trace!("count {}/{}: pixels {} to {}", self.count, self.size, start, end);
            self.segment(start, end)
        } else {
            String::new()
        }
    }

    /// Marks the job complete and returns the rest of the picture.
    pub fn remains(&mut self) -> String {
        self.count = self.size;
        let start = self.last_pixel;
        let end = self.len();
        if end > start {
            self.last_pixel = end;
            self.segment(start, end)
        } else {
            String::new()
        }
    }

    pub fn print_progress(&mut self, n: usize) -> io::Result<()> {
        let slice = self.progress(n);
        write_flush(&slice)
    }

    pub fn print_remains(&mut self) -> io::Result<()> {
        let slice = self.remains();
        write_flush(&slice)
    }

    fn char_type(&self, ch: char) -> CharType {
        self.char_types
            .get(&ch)
            .copied()
            .unwrap_or(CharType::Foreground)
    }

    fn paint_run(&self, run: &str, kind: Option<CharType>) -> String {
        match kind.and_then(|k| self.painters.get(&k)) {
            Some(painter) => painter.paint(run),
            None => run.to_string(),
        }
    }

    fn segment(&self, start: usize, end: usize) -> String {
        let mut output = String::new();
        let mut run = String::new();
        let mut run_kind: Option<CharType> = None;

        // newlines are never colored
        for &ch in &self.pixels[start..end] {
            let kind = if ch == '\n' || ch == ' ' {
                None
            } else {
                Some(self.char_type(ch))
            };
            if kind != run_kind && !run.is_empty() {
                output.push_str(&self.paint_run(&run, run_kind));
                run.clear();
            }
            run_kind = kind;
            if ch == '\n' && self.show_elapsed {
                output.push_str(&run);
                run.clear();
                output.push(' ');
                let elapsed = format_elapsed(self.started.elapsed().as_secs());
                output.push_str(&self.elapsed_painter.paint(&elapsed));
            }
            run.push(ch);
        }
        if !run.is_empty() {
            output.push_str(&self.paint_run(&run, run_kind));
        }
        output
    }
}

fn write_flush(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}
