//! # Psprint - Prefixed, styled console printing
//!
//! Psprint prints lines behind a colored marker such as `[ERROR]` or
//! `[INFO]`. Markers come from a registry of named **marks**, each with its
//! own style for the prefix and for the text that follows.
//!
//! ## Quick Start
//!
//! ```rust
//! use psprint::{Call, PrintSpace};
//!
//! let space = PrintSpace::new();
//! let line = space
//!     .psfmt_joined(["disk", "almost full"], &Call::new().mark("warn").bland(true), " ")
//!     .unwrap();
//! assert_eq!(line, "[WARNING] disk almost full");
//! ```
//!
//! ## Concepts
//!
//! - [`Mark`]: a named [`PrintPrefix`] plus the [`AnsiEffect`] of the text
//! - [`PrintSpace`]: ordered registry of marks, switches and print defaults
//! - [`MarkRef`]: how a call picks its mark (name, index, ready mark, none)
//! - [`MarkSpec`]: partial mark definition used for configuration files and
//!   on-the-fly overrides
//! - [`Switches`]: `pad`, `short`, `bland` and `disabled`
//!
//! ## Built-in marks
//!
//! | Index | Name | Prefix |
//! |-------|------|--------|
//! | 0 | `cont` | *(none)* |
//! | 1 | `info` | `[INFO]` |
//! | 2 | `act` | `[ACTION]` |
//! | 3 | `list` | `[LIST]` |
//! | 4 | `warn` | `[WARNING]` |
//! | 5 | `err` | `[ERROR]` |
//! | 6 | `bug` | `[DEBUG]` |
//!
//! ## Configuration
//!
//! Further marks and switches are read from YAML files; see [`config`] for
//! the format and the places searched by [`PrintSpace::discover`].
//!
//! ## Default instance
//!
//! [`psprint()`] and [`psfmt()`] use a process-wide [`PrintSpace`] created on
//! first use from the discovered configuration. Independent instances can be
//! created freely with [`PrintSpace::new`].

pub mod ansi;
pub mod config;
mod error;
mod format;
mod mark;
mod prefix;
mod space;

use once_cell::sync::Lazy;
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use ansi::{AnsiColor, AnsiEffect, Gloss, StyleArg, RESET};
pub use error::{PsprintError, Result, ValidationError};
pub use format::{Formatter, Switches};
pub use mark::{Mark, MarkRules, MarkSpec, DEFAULT_PREF_MAX_LEN};
pub use prefix::{PrefixForm, PrintPrefix};
pub use space::{Call, MarkRef, PrintDefaults, PrintSpace, CONT};

static DEFAULT_SPACE: Lazy<Mutex<PrintSpace>> = Lazy::new(|| {
    let space = PrintSpace::discover().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring configuration, using built-in marks");
        PrintSpace::new()
    });
    Mutex::new(space)
});

/// Returns the process-wide print space.
///
/// It is built on first access from the configuration files found by
/// [`config::discover_paths`]; a configuration that fails to load is logged
/// and replaced by the built-in marks.
pub fn default_space() -> &'static Mutex<PrintSpace> {
    &DEFAULT_SPACE
}

fn lock_default() -> MutexGuard<'static, PrintSpace> {
    DEFAULT_SPACE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Prints `args` with the default print space.
///
/// # Errors
///
/// See [`PrintSpace::psprint`].
pub fn psprint<I, T>(args: I, call: &Call) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    lock_default().psprint(args, call)
}

/// Formats `args` with the default print space.
///
/// # Errors
///
/// See [`PrintSpace::psfmt`].
pub fn psfmt<I, T>(args: I, call: &Call) -> Result<Vec<String>>
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    lock_default().psfmt(args, call)
}

/// Defines a mark in the default print space.
///
/// # Errors
///
/// See [`PrintSpace::edit_style`].
pub fn edit_style(name: Option<&str>, spec: &MarkSpec, index: Option<usize>) -> Result<String> {
    lock_default().edit_style(name, spec, index)
}

/// Removes a mark from the default print space.
///
/// # Errors
///
/// See [`PrintSpace::remove_style`].
pub fn remove_style(name: Option<&str>, index: Option<usize>) -> Result<String> {
    lock_default().remove_style(name, index)
}
