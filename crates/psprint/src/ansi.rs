//! ANSI color, gloss and effect primitives.
//!
//! The terminal capabilities used by marks are deliberately small: sixteen
//! foreground/background colors, four gloss (intensity) levels and a reset.
//! An [`AnsiEffect`] folds the three attributes into a single SGR sequence so
//! that later effects fully override earlier ones without an intermediate
//! reset.
//!
//! Colors and glosses can be addressed by index, short alias or full name:
//!
//! | Index | Alias | Name |
//! |-------|-------|------|
//! | 0-7 | `k r g y b m c w` | `black` .. `white` |
//! | 8-15 | `lk lr lg ly lb lm lc lw` | `light black` .. `light white` |
//!
//! | Index | Alias | Name |
//! |-------|-------|------|
//! | 0 | `r` | `reset` |
//! | 1 | `n` | `normal` |
//! | 2 | `d` | `dim` |
//! | 3 | `b` | `bright` |

use serde::Deserialize;
use std::fmt;

/// Escape sequence that clears every attribute.
pub const RESET: &str = "\x1b[0m";

/// A raw, not yet validated color or gloss argument.
///
/// Configuration files and call sites may supply either an integer index or
/// a textual alias; resolution into [`AnsiColor`] or [`Gloss`] happens when a
/// mark is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StyleArg {
    Index(i64),
    Text(String),
}

impl fmt::Display for StyleArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleArg::Index(i) => write!(f, "{}", i),
            StyleArg::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StyleArg {
    fn from(value: i64) -> Self {
        StyleArg::Index(value)
    }
}

impl From<i32> for StyleArg {
    fn from(value: i32) -> Self {
        StyleArg::Index(i64::from(value))
    }
}

impl From<u8> for StyleArg {
    fn from(value: u8) -> Self {
        StyleArg::Index(i64::from(value))
    }
}

impl From<&str> for StyleArg {
    fn from(value: &str) -> Self {
        StyleArg::Text(value.to_string())
    }
}

impl From<String> for StyleArg {
    fn from(value: String) -> Self {
        StyleArg::Text(value)
    }
}

impl StyleArg {
    /// Returns the integer index, parsing numeric text if needed.
    fn as_index(&self) -> Option<i64> {
        match self {
            StyleArg::Index(i) => Some(*i),
            StyleArg::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Returns the text lower-cased with `_`/`-` read as spaces.
    fn normalized(&self) -> Option<String> {
        match self {
            StyleArg::Index(_) => None,
            StyleArg::Text(s) => Some(
                s.trim()
                    .to_lowercase()
                    .replace(['_', '-'], " ")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }
}

/// One of the sixteen terminal colors, or the terminal's own default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnsiColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    LightBlack,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
    LightWhite,
    /// Whatever the terminal uses when no color is set.
    #[default]
    Default,
}

/// `(color, alias, name)` in index order.
const COLOR_TABLE: [(AnsiColor, &str, &str); 16] = [
    (AnsiColor::Black, "k", "black"),
    (AnsiColor::Red, "r", "red"),
    (AnsiColor::Green, "g", "green"),
    (AnsiColor::Yellow, "y", "yellow"),
    (AnsiColor::Blue, "b", "blue"),
    (AnsiColor::Magenta, "m", "magenta"),
    (AnsiColor::Cyan, "c", "cyan"),
    (AnsiColor::White, "w", "white"),
    (AnsiColor::LightBlack, "lk", "light black"),
    (AnsiColor::LightRed, "lr", "light red"),
    (AnsiColor::LightGreen, "lg", "light green"),
    (AnsiColor::LightYellow, "ly", "light yellow"),
    (AnsiColor::LightBlue, "lb", "light blue"),
    (AnsiColor::LightMagenta, "lm", "light magenta"),
    (AnsiColor::LightCyan, "lc", "light cyan"),
    (AnsiColor::LightWhite, "lw", "light white"),
];

impl AnsiColor {
    /// Returns the color at `index` in `0..=15`.
    pub fn from_index(index: i64) -> Option<Self> {
        let index = usize::try_from(index).ok()?;
        COLOR_TABLE.get(index).map(|(color, _, _)| *color)
    }

    /// Resolves an index, alias or name. `"default"` selects the terminal default.
    pub fn lookup(arg: &StyleArg) -> Option<Self> {
        if let Some(index) = arg.as_index() {
            return Self::from_index(index);
        }
        let needle = arg.normalized()?;
        if needle == "default" {
            return Some(AnsiColor::Default);
        }
        COLOR_TABLE
            .iter()
            .find(|(_, alias, name)| *alias == needle || *name == needle)
            .map(|(color, _, _)| *color)
    }

    /// Returns the palette index, or `None` for [`AnsiColor::Default`].
    pub fn index(self) -> Option<u8> {
        COLOR_TABLE
            .iter()
            .position(|(color, _, _)| *color == self)
            .and_then(|i| u8::try_from(i).ok())
    }

    /// SGR parameter selecting this color as foreground.
    pub fn fg_code(self) -> u8 {
        match self.index() {
            Some(i) if i < 8 => 30 + i,
            Some(i) => 90 + (i - 8),
            None => 39,
        }
    }

    /// SGR parameter selecting this color as background.
    pub fn bg_code(self) -> u8 {
        self.fg_code() + 10
    }
}

/// Intensity attribute of styled text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gloss {
    Reset,
    #[default]
    Normal,
    Dim,
    Bright,
}

const GLOSS_TABLE: [(Gloss, &[&str]); 4] = [
    (Gloss::Reset, &["r", "reset"]),
    (Gloss::Normal, &["n", "c", "normal"]),
    (Gloss::Dim, &["d", "dim"]),
    (Gloss::Bright, &["b", "bright", "bold"]),
];

impl Gloss {
    /// Returns the gloss at `index` in `0..=3`.
    pub fn from_index(index: i64) -> Option<Self> {
        let index = usize::try_from(index).ok()?;
        GLOSS_TABLE.get(index).map(|(gloss, _)| *gloss)
    }

    /// Resolves an index, alias or name.
    pub fn lookup(arg: &StyleArg) -> Option<Self> {
        if let Some(index) = arg.as_index() {
            return Self::from_index(index);
        }
        let needle = arg.normalized()?;
        GLOSS_TABLE
            .iter()
            .find(|(_, names)| names.contains(&needle.as_str()))
            .map(|(gloss, _)| *gloss)
    }

    /// SGR parameters for this gloss.
    ///
    /// Dim and bright clear the intensity first: SGR 1 and 2 do not cancel
    /// each other.
    pub fn sgr(self) -> &'static str {
        match self {
            Gloss::Reset => "0",
            Gloss::Normal => "22",
            Gloss::Dim => "22;2",
            Gloss::Bright => "22;1",
        }
    }
}

/// Foreground color, gloss and background color applied together.
///
/// # Example
///
/// ```rust
/// use psprint::{AnsiColor, AnsiEffect, Gloss};
///
/// let effect = AnsiEffect::new(AnsiColor::Red, Gloss::Bright, AnsiColor::Default);
/// assert_eq!(effect.combine(), "\x1b[22;1;31;49m");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AnsiEffect {
    pub color: AnsiColor,
    pub gloss: Gloss,
    pub bgcol: AnsiColor,
}

impl AnsiEffect {
    pub fn new(color: AnsiColor, gloss: Gloss, bgcol: AnsiColor) -> Self {
        Self {
            color,
            gloss,
            bgcol,
        }
    }

    /// Renders the effect as one escape sequence.
    pub fn combine(&self) -> String {
        format!(
            "\x1b[{};{};{}m",
            self.gloss.sgr(),
            self.color.fg_code(),
            self.bgcol.bg_code()
        )
    }
}

impl fmt::Display for AnsiEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.combine())
    }
}
