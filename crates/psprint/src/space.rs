//! The mark registry and the print calls built on it.
//!
//! A [`PrintSpace`] owns an ordered list of [`Mark`]s. The position of a mark
//! in that list is its index, so marks can be referenced either by name or by
//! number. The continuation mark `cont` always sits at index 0 and is the
//! fallback whenever a reference cannot be resolved while printing.
//!
//! # Resolution
//!
//! A call names its mark with a [`MarkRef`]:
//!
//! | Reference | Result |
//! |-----------|--------|
//! | `None` | `cont` |
//! | `Index(i)` | the mark at `i`, or `cont` if out of range |
//! | `Name(s)` | the mark named `s`, or `cont` if unknown |
//! | `Ready(m)` | `m` itself |
//!
//! If the call also carries style overrides, the resolved mark is used as the
//! parent of a freshly derived mark. Derived marks are never stored.
//!
//! # Thread Safety
//!
//! A `PrintSpace` has no internal locking. Callers sharing one between
//! threads must serialize mutation, e.g. behind a `Mutex` as
//! [`default_space`](crate::default_space) does.

use console::Term;
use std::borrow::Cow;
use std::fmt::{self, Display};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::ansi::{AnsiColor, AnsiEffect, Gloss, StyleArg};
use crate::config::{discover_paths, ConfigFile, Flags, MarkBlock};
use crate::error::{PsprintError, Result, ValidationError};
use crate::format::{Formatter, Switches};
use crate::mark::{Mark, MarkRules, MarkSpec};
use crate::prefix::{PrefixForm, PrintPrefix};

/// Name of the continuation mark.
pub const CONT: &str = "cont";

/// `(name, long, short, prefix color)` of the marks every space starts with.
const BUILTIN_MARKS: [(&str, &str, &str, AnsiColor); 7] = [
    (CONT, "", "", AnsiColor::Default),
    ("info", "INFO", "i", AnsiColor::Green),
    ("act", "ACTION", "a", AnsiColor::Yellow),
    ("list", "LIST", "l", AnsiColor::Blue),
    ("warn", "WARNING", "!", AnsiColor::Magenta),
    ("err", "ERROR", "x", AnsiColor::Red),
    ("bug", "DEBUG", "b", AnsiColor::Cyan),
];

/// Defaults for how a formatted line is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDefaults {
    /// Joins the formatted arguments.
    pub sep: String,
    /// Written after the line.
    pub end: String,
    /// Flush the destination after every line.
    pub flush: bool,
    /// Append to this file instead of writing to stdout.
    pub file: Option<PathBuf>,
}

impl Default for PrintDefaults {
    fn default() -> Self {
        Self {
            sep: "\t".to_string(),
            end: "\n".to_string(),
            flush: false,
            file: None,
        }
    }
}

/// How a call refers to its mark.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MarkRef {
    #[default]
    None,
    Name(String),
    Index(i64),
    Ready(Mark),
}

impl From<&str> for MarkRef {
    fn from(name: &str) -> Self {
        MarkRef::Name(name.to_string())
    }
}

impl From<String> for MarkRef {
    fn from(name: String) -> Self {
        MarkRef::Name(name)
    }
}

impl From<i64> for MarkRef {
    fn from(index: i64) -> Self {
        MarkRef::Index(index)
    }
}

impl From<i32> for MarkRef {
    fn from(index: i32) -> Self {
        MarkRef::Index(i64::from(index))
    }
}

impl From<usize> for MarkRef {
    fn from(index: usize) -> Self {
        MarkRef::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl From<Mark> for MarkRef {
    fn from(mark: Mark) -> Self {
        MarkRef::Ready(mark)
    }
}

impl From<&Mark> for MarkRef {
    fn from(mark: &Mark) -> Self {
        MarkRef::Ready(mark.clone())
    }
}

/// Per-call options: the mark, style overrides, switches and print settings.
///
/// Anything left unset falls back to the [`PrintSpace`]'s own settings.
///
/// # Example
///
/// ```rust
/// use psprint::{Call, PrintSpace};
///
/// let space = PrintSpace::new();
/// let call = Call::new().mark("err").bland(true).pref("fatal");
/// assert_eq!(space.psfmt(["disk full"], &call).unwrap(), vec!["[FATAL] disk full"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Call {
    pub mark: MarkRef,
    pub style: MarkSpec,
    pub pad: Option<bool>,
    pub short: Option<bool>,
    pub bland: Option<bool>,
    pub disabled: Option<bool>,
    pub sep: Option<String>,
    pub end: Option<String>,
    pub flush: Option<bool>,
    pub file: Option<PathBuf>,
}

impl Call {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(mut self, mark: impl Into<MarkRef>) -> Self {
        self.mark = mark.into();
        self
    }

    /// Replaces all style overrides at once.
    pub fn style(mut self, style: MarkSpec) -> Self {
        self.style = style;
        self
    }

    pub fn pref(mut self, label: impl Into<String>) -> Self {
        self.style = self.style.pref(label);
        self
    }

    pub fn pref_s(mut self, label: impl Into<String>) -> Self {
        self.style = self.style.pref_s(label);
        self
    }

    pub fn pref_color(mut self, value: impl Into<StyleArg>) -> Self {
        self.style = self.style.pref_color(value);
        self
    }

    pub fn pref_gloss(mut self, value: impl Into<StyleArg>) -> Self {
        self.style = self.style.pref_gloss(value);
        self
    }

    pub fn pref_bgcol(mut self, value: impl Into<StyleArg>) -> Self {
        self.style = self.style.pref_bgcol(value);
        self
    }

    pub fn text_color(mut self, value: impl Into<StyleArg>) -> Self {
        self.style = self.style.text_color(value);
        self
    }

    pub fn text_gloss(mut self, value: impl Into<StyleArg>) -> Self {
        self.style = self.style.text_gloss(value);
        self
    }

    pub fn text_bgcol(mut self, value: impl Into<StyleArg>) -> Self {
        self.style = self.style.text_bgcol(value);
        self
    }

    pub fn pad(mut self, on: bool) -> Self {
        self.pad = Some(on);
        self
    }

    pub fn short(mut self, on: bool) -> Self {
        self.short = Some(on);
        self
    }

    pub fn bland(mut self, on: bool) -> Self {
        self.bland = Some(on);
        self
    }

    pub fn disabled(mut self, on: bool) -> Self {
        self.disabled = Some(on);
        self
    }

    pub fn sep(mut self, sep: impl Into<String>) -> Self {
        self.sep = Some(sep.into());
        self
    }

    pub fn end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn flush(mut self, on: bool) -> Self {
        self.flush = Some(on);
        self
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    fn switches(&self, base: Switches) -> Switches {
        Switches {
            pad: self.pad.unwrap_or(base.pad),
            short: self.short.unwrap_or(base.short),
            bland: self.bland.unwrap_or(base.bland),
            disabled: self.disabled.unwrap_or(base.disabled),
        }
    }
}

/// A registry of marks together with the settings used to print with them.
#[derive(Debug, Clone)]
pub struct PrintSpace {
    /// Index order; `marks[0]` is always `cont`.
    marks: Vec<Mark>,
    switches: Switches,
    defaults: PrintDefaults,
    rules: MarkRules,
}

impl Default for PrintSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl PrintSpace {
    /// Creates a space holding only the built-in marks.
    pub fn new() -> Self {
        let marks = BUILTIN_MARKS
            .iter()
            .map(|(name, long, short, color)| {
                let effect = AnsiEffect::new(*color, Gloss::Bright, AnsiColor::Default);
                Mark::from_parts(name, PrintPrefix::new(long, short, effect), AnsiEffect::default())
            })
            .collect();
        Self {
            marks,
            switches: Switches::default(),
            defaults: PrintDefaults::default(),
            rules: MarkRules::default(),
        }
    }

    /// Creates a space and layers the given configuration files over the
    /// built-ins, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be read or applied.
    pub fn from_config_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut space = Self::new();
        for path in paths {
            space.load_config(path.as_ref())?;
        }
        Ok(space)
    }

    /// Creates a space from the configuration files found by
    /// [`discover_paths`].
    ///
    /// # Errors
    ///
    /// See [`PrintSpace::from_config_paths`].
    pub fn discover() -> Result<Self> {
        Self::from_config_paths(&discover_paths())
    }

    pub fn switches(&self) -> Switches {
        self.switches
    }

    pub fn set_switches(&mut self, switches: Switches) {
        self.switches = switches;
    }

    pub fn print_defaults(&self) -> &PrintDefaults {
        &self.defaults
    }

    pub fn set_print_defaults(&mut self, defaults: PrintDefaults) {
        self.defaults = defaults;
    }

    pub fn rules(&self) -> MarkRules {
        self.rules
    }

    pub fn set_rules(&mut self, rules: MarkRules) {
        self.rules = rules;
    }

    /// All marks in index order.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Mark names in index order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.marks.iter().map(Mark::name)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Always `false`: `cont` cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Mark> {
        self.marks.iter().find(|m| m.name() == name)
    }

    /// Index of the mark called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.marks.iter().position(|m| m.name() == name)
    }

    /// The continuation mark.
    pub fn cont(&self) -> &Mark {
        &self.marks[0]
    }

    /// Width long labels are padded to: the widest registered label.
    pub fn pad_width(&self) -> usize {
        self.marks
            .iter()
            .map(|m| m.prefix().label_width(PrefixForm::Long))
            .max()
            .unwrap_or(0)
    }

    /// Resolves a mark reference for printing.
    ///
    /// Unknown names and out-of-range indices fall back to `cont`. When
    /// `overrides` sets any field, a new mark is derived from the resolved
    /// one and returned owned; the registry is not modified.
    ///
    /// # Errors
    ///
    /// Returns [`PsprintError::Validation`] if the derived mark is invalid.
    pub fn resolve<'a>(&'a self, mark: &'a MarkRef, overrides: &MarkSpec) -> Result<Cow<'a, Mark>> {
        let base = match mark {
            MarkRef::None => self.cont(),
            MarkRef::Ready(mark) => mark,
            MarkRef::Index(index) => usize::try_from(*index)
                .ok()
                .and_then(|i| self.marks.get(i))
                .unwrap_or_else(|| self.cont()),
            MarkRef::Name(name) => self.get(name).unwrap_or_else(|| {
                tracing::debug!(mark = %name, "unknown mark, using cont");
                self.cont()
            }),
        };

        if overrides.is_empty() {
            return Ok(Cow::Borrowed(base));
        }
        Ok(Cow::Owned(Mark::derive(base, overrides, &self.rules)?))
    }

    /// Defines or redefines a mark and returns the updated listing.
    ///
    /// Without `name`, the first four characters of `spec.pref` name the
    /// mark. An existing mark of that name is the base the spec is applied
    /// to; otherwise the mark is built from defaults. A new mark is inserted
    /// at `index` when it lies in `1..=len`, else appended; an existing mark
    /// only moves when `index` is given.
    ///
    /// # Errors
    ///
    /// - [`PsprintError::MissingArgument`] if neither `name` nor `spec.pref`
    ///   is given
    /// - [`PsprintError::BadMark`] if the definition fails validation
    pub fn edit_style(&mut self, name: Option<&str>, spec: &MarkSpec, index: Option<usize>) -> Result<String> {
        let name = match (name, spec.pref.as_deref()) {
            (Some(name), _) => name.to_string(),
            (None, Some(pref)) => pref.chars().take(4).collect(),
            (None, None) => {
                return Err(PsprintError::MissingArgument(
                    "edit_style needs a mark name or a prefix".to_string(),
                ))
            }
        };
        let mark = self
            .define(&name, spec, &self.rules)
            .map_err(|e| PsprintError::bad_mark(&name, "edit_style", e))?;
        self.insert(mark, index);
        Ok(self.to_string())
    }

    /// Removes a mark by name, or by index when no name is given, and
    /// returns the updated listing.
    ///
    /// # Errors
    ///
    /// - [`PsprintError::MissingArgument`] if both are `None`
    /// - [`PsprintError::BadMark`] if no such mark exists or it is `cont`
    pub fn remove_style(&mut self, name: Option<&str>, index: Option<usize>) -> Result<String> {
        let position = match (name, index) {
            (Some(name), _) => self
                .position(name)
                .ok_or_else(|| PsprintError::bad_mark(name, "remove_style", "no such mark"))?,
            (None, Some(index)) => {
                if index >= self.marks.len() {
                    return Err(PsprintError::bad_mark(
                        index.to_string(),
                        "remove_style",
                        format!("index out of range 0..{}", self.marks.len()),
                    ));
                }
                index
            }
            (None, None) => {
                return Err(PsprintError::MissingArgument(
                    "remove_style needs a mark name or an index".to_string(),
                ))
            }
        };
        if position == 0 {
            return Err(PsprintError::bad_mark(
                CONT,
                "remove_style",
                "the continuation mark cannot be removed",
            ));
        }
        let removed = self.marks.remove(position);
        tracing::debug!(mark = %removed.name(), "removed mark");
        Ok(self.to_string())
    }

    /// Applies a configuration file.
    ///
    /// # Errors
    ///
    /// I/O and YAML failures, or the first malformed mark block as
    /// [`PsprintError::BadMark`]. On error nothing is applied.
    pub fn load_config(&mut self, path: &Path) -> Result<()> {
        let config = ConfigFile::read(path)?;
        self.apply_config(&config)
    }

    /// Applies configuration text; `origin` is used in error messages.
    ///
    /// # Errors
    ///
    /// See [`PrintSpace::load_config`].
    pub fn load_config_str(&mut self, text: &str, origin: &str) -> Result<()> {
        let config = ConfigFile::parse(text, origin)?;
        self.apply_config(&config)
    }

    /// Applies a parsed configuration atomically.
    ///
    /// Every mark block is built before anything changes; the first failure
    /// in document order is returned and the space is left untouched.
    ///
    /// # Errors
    ///
    /// [`PsprintError::BadMark`] naming the block and `config.origin`.
    pub fn apply_config(&mut self, config: &ConfigFile) -> Result<()> {
        let mut staged = self.clone();
        if let Some(flags) = &config.flags {
            staged.apply_flags(flags);
        }

        for (name, block) in &config.marks {
            let mark = match block {
                MarkBlock::Spec(spec) => staged.define(name, spec, &staged.rules),
                MarkBlock::Malformed(reason) => {
                    return Err(PsprintError::bad_mark(name, &config.origin, reason));
                }
            }
            .map_err(|e| PsprintError::bad_mark(name, &config.origin, e))?;
            staged.insert(mark, None);
        }

        if let Some(order) = &config.order {
            staged.reorder(order);
        }

        tracing::debug!(origin = %config.origin, marks = staged.len(), "applied configuration");
        *self = staged;
        Ok(())
    }

    fn apply_flags(&mut self, flags: &Flags) {
        let s = &mut self.switches;
        s.pad = flags.pad.unwrap_or(s.pad);
        s.short = flags.short.unwrap_or(s.short);
        s.bland = flags.bland.unwrap_or(s.bland);
        s.disabled = flags.disabled.unwrap_or(s.disabled);

        self.rules.permissive = flags.permissive.unwrap_or(self.rules.permissive);
        self.rules.max_label_len = flags.pref_max_len.unwrap_or(self.rules.max_label_len);

        let d = &mut self.defaults;
        if let Some(sep) = &flags.sep {
            d.sep.clone_from(sep);
        }
        if let Some(end) = &flags.end {
            d.end.clone_from(end);
        }
        d.flush = flags.flush.unwrap_or(d.flush);
        if let Some(file) = &flags.file {
            d.file = Some(file.clone());
        }
    }

    /// Builds the mark `name` on top of its current definition, if any.
    fn define(&self, name: &str, spec: &MarkSpec, rules: &MarkRules) -> Result<Mark, ValidationError> {
        match self.get(name) {
            Some(existing) => Mark::derive(existing, spec, rules),
            None => Mark::construct(name, spec, rules),
        }
        .map(|m| m.renamed(name))
    }

    fn insert(&mut self, mark: Mark, index: Option<usize>) {
        let existing = self.position(mark.name());
        tracing::debug!(mark = %mark.name(), replace = existing.is_some(), "defining mark");
        match existing {
            Some(0) => self.marks[0] = mark,
            Some(pos) => {
                self.marks.remove(pos);
                let at = index.filter(|i| (1..=self.marks.len()).contains(i)).unwrap_or(pos);
                self.marks.insert(at.min(self.marks.len()), mark);
            }
            None => match index.filter(|i| (1..=self.marks.len()).contains(i)) {
                Some(at) => self.marks.insert(at, mark),
                None => self.marks.push(mark),
            },
        }
    }

    /// Moves the named marks to the front in the given order. Unknown names
    /// are dropped, unlisted marks keep their relative order after them and
    /// `cont` stays first.
    fn reorder(&mut self, order: &[String]) {
        let mut rest = std::mem::take(&mut self.marks);
        let mut ordered = vec![rest.remove(0)];
        for name in order {
            if let Some(pos) = rest.iter().position(|m| m.name() == name) {
                ordered.push(rest.remove(pos));
            }
        }
        ordered.append(&mut rest);
        self.marks = ordered;
    }

    /// Formats `args` for `call` without writing them.
    ///
    /// With no arguments, or when disabled, the mark is not resolved and the
    /// arguments come back as plain strings.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the call's style overrides are invalid.
    pub fn psfmt<I, T>(&self, args: I, call: &Call) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let switches = call.switches(self.switches);
        let parts: Vec<String> = args.into_iter().map(|a| a.to_string()).collect();
        if switches.disabled || parts.is_empty() {
            return Ok(parts);
        }
        let mark = self.resolve(&call.mark, &call.style)?;
        let formatter = Formatter::new(switches).pad_width(self.pad_width());
        Ok(formatter.render(parts, &mark))
    }

    /// Formats `args` for `call` and joins them with `sep`.
    ///
    /// # Errors
    ///
    /// See [`PrintSpace::psfmt`].
    pub fn psfmt_joined<I, T>(&self, args: I, call: &Call, sep: &str) -> Result<String>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        Ok(self.psfmt(args, call)?.join(sep))
    }

    /// Formats `args` and writes one line to `writer`.
    ///
    /// # Errors
    ///
    /// Validation errors from [`PrintSpace::psfmt`], or the writer's I/O
    /// error unchanged.
    pub fn psprint_to<W, I, T>(&self, writer: &mut W, args: I, call: &Call) -> Result<()>
    where
        W: Write + ?Sized,
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let parts = self.psfmt(args, call)?;
        let sep = call.sep.as_deref().unwrap_or(&self.defaults.sep);
        let end = call.end.as_deref().unwrap_or(&self.defaults.end);
        write!(writer, "{}{}", parts.join(sep), end)?;
        if call.flush.unwrap_or(self.defaults.flush) {
            writer.flush()?;
        }
        Ok(())
    }

    /// Formats `args` and writes one line to the configured destination:
    /// the call's or the space's `file` (appended), else stdout.
    ///
    /// # Errors
    ///
    /// See [`PrintSpace::psprint_to`]; opening the file may also fail.
    pub fn psprint<I, T>(&self, args: I, call: &Call) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        match call.file.as_ref().or(self.defaults.file.as_ref()) {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                self.psprint_to(&mut file, args, call)
            }
            None => {
                let mut term = Term::stdout();
                self.psprint_to(&mut term, args, call)
            }
        }
    }
}

impl fmt::Display for PrintSpace {
    /// Lists every mark, one tab-separated line each.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "mark\tlong\tshort\ttext")?;
        writeln!(f)?;
        for (i, mark) in self.marks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", mark)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bland() -> Call {
        Call::new().bland(true)
    }

    #[test]
    fn test_builtin_marks_in_order() {
        let space = PrintSpace::new();
        let names: Vec<_> = space.names().collect();
        assert_eq!(names, vec!["cont", "info", "act", "list", "warn", "err", "bug"]);
        assert_eq!(space.get("warn").unwrap().prefix().long(), "WARNING");
        assert_eq!(space.cont().prefix().long(), "");
    }

    #[test]
    fn test_resolve_none_is_cont() {
        let space = PrintSpace::new();
        let reference = MarkRef::None;
        let mark = space.resolve(&reference, &MarkSpec::new()).unwrap();
        assert_eq!(mark.name(), CONT);
    }

    #[test]
    fn test_resolve_by_index() {
        let space = PrintSpace::new();
        let reference = MarkRef::Index(5);
        let mark = space.resolve(&reference, &MarkSpec::new()).unwrap();
        assert_eq!(mark.name(), "err");
    }

    #[test]
    fn test_resolve_out_of_range_index_is_cont() {
        let space = PrintSpace::new();
        for index in [88, 7, -1, i64::MAX] {
            let reference = MarkRef::Index(index);
            let mark = space.resolve(&reference, &MarkSpec::new()).unwrap();
            assert_eq!(mark.name(), CONT, "index {}", index);
        }
    }

    #[test]
    fn test_resolve_unknown_name_is_cont() {
        let space = PrintSpace::new();
        let reference = MarkRef::from("nope");
        let mark = space.resolve(&reference, &MarkSpec::new()).unwrap();
        assert_eq!(mark.name(), CONT);
    }

    #[test]
    fn test_resolve_ready_mark_borrowed() {
        let space = PrintSpace::new();
        let ready = Mark::construct("x", &MarkSpec::new().pref("prepref"), &MarkRules::default())
            .unwrap();
        let reference = MarkRef::from(&ready);
        let mark = space.resolve(&reference, &MarkSpec::new()).unwrap();
        assert!(matches!(mark, Cow::Borrowed(_)));
        assert_eq!(*mark, ready);
    }

    #[test]
    fn test_resolve_with_overrides_is_not_persisted() {
        let space = PrintSpace::new();
        let reference = MarkRef::Index(2);
        let derived = space
            .resolve(&reference, &MarkSpec::new().pref_color("lg"))
            .unwrap();
        assert!(matches!(derived, Cow::Owned(_)));
        assert_eq!(derived.prefix().effect().color, AnsiColor::LightGreen);
        assert_eq!(derived.prefix().long(), "ACTION");
        assert_eq!(
            space.get("act").unwrap().prefix().effect().color,
            AnsiColor::Yellow
        );
    }

    #[test]
    fn test_resolve_bad_override_fails() {
        let space = PrintSpace::new();
        let err = space
            .resolve(&MarkRef::None, &MarkSpec::new().pref_color(77))
            .unwrap_err();
        assert!(matches!(err, PsprintError::Validation(_)));
    }

    #[test]
    fn test_edit_style_then_resolve() {
        let mut space = PrintSpace::new();
        space
            .edit_style(Some("X"), &MarkSpec::new().pref("testmark"), None)
            .unwrap();
        let reference = MarkRef::from("X");
        let mark = space.resolve(&reference, &MarkSpec::new()).unwrap();
        assert_eq!(mark.prefix().long(), "TESTMARK");
        assert_eq!(space.names().last(), Some("X"));
    }

    #[test]
    fn test_edit_style_unknown_name_creates_entry() {
        let mut space = PrintSpace::new();
        let before = space.len();
        space
            .edit_style(None, &MarkSpec::new().pref("my_test"), Some(4))
            .unwrap();
        assert_eq!(space.len(), before + 1);
        assert_eq!(space.position("my_t"), Some(4));
        assert_eq!(space.position("warn"), Some(5));
    }

    #[test]
    fn test_edit_style_overwrite_keeps_single_entry() {
        let mut space = PrintSpace::new();
        space
            .edit_style(Some("info"), &MarkSpec::new().pref_color("r"), None)
            .unwrap();
        assert_eq!(space.len(), 7);
        assert_eq!(space.position("info"), Some(1));
        let info = space.get("info").unwrap();
        assert_eq!(info.prefix().long(), "INFO");
        assert_eq!(info.prefix().effect().color, AnsiColor::Red);
    }

    #[test]
    fn test_edit_style_overwrite_with_index_moves() {
        let mut space = PrintSpace::new();
        space
            .edit_style(Some("bug"), &MarkSpec::new(), Some(1))
            .unwrap();
        assert_eq!(space.position("bug"), Some(1));
        assert_eq!(space.position("info"), Some(2));
        assert_eq!(space.len(), 7);
    }

    #[test]
    fn test_edit_style_index_zero_appends() {
        let mut space = PrintSpace::new();
        space
            .edit_style(Some("new"), &MarkSpec::new().pref("new"), Some(0))
            .unwrap();
        assert_eq!(space.position(CONT), Some(0));
        assert_eq!(space.position("new"), Some(7));
    }

    #[test]
    fn test_edit_style_invalid_is_bad_mark() {
        let mut space = PrintSpace::new();
        let err = space
            .edit_style(Some("loud"), &MarkSpec::new().pref("SOME LONG TEXT"), None)
            .unwrap_err();
        let PsprintError::BadMark { name, origin, .. } = err else {
            panic!("expected BadMark");
        };
        assert_eq!(name, "loud");
        assert_eq!(origin, "edit_style");
        assert!(space.get("loud").is_none());
    }

    #[test]
    fn test_edit_style_needs_a_name() {
        let mut space = PrintSpace::new();
        let err = space.edit_style(None, &MarkSpec::new(), None).unwrap_err();
        assert!(matches!(err, PsprintError::MissingArgument(_)));
    }

    #[test]
    fn test_remove_style_by_name() {
        let mut space = PrintSpace::new();
        let listing = space.remove_style(Some("warn"), None).unwrap();
        assert!(!listing.contains("warn:"));
        assert!(space.names().all(|n| n != "warn"));
        let reference = MarkRef::from("warn");
        let mark = space.resolve(&reference, &MarkSpec::new()).unwrap();
        assert_eq!(mark.name(), CONT);
    }

    #[test]
    fn test_remove_style_by_index() {
        let mut space = PrintSpace::new();
        space.remove_style(None, Some(4)).unwrap();
        assert!(space.get("warn").is_none());
        assert_eq!(space.position("err"), Some(4));
    }

    #[test]
    fn test_remove_style_errors() {
        let mut space = PrintSpace::new();
        assert!(matches!(
            space.remove_style(None, None),
            Err(PsprintError::MissingArgument(_))
        ));
        assert!(matches!(
            space.remove_style(Some("missing"), None),
            Err(PsprintError::BadMark { .. })
        ));
        assert!(matches!(
            space.remove_style(None, Some(99)),
            Err(PsprintError::BadMark { .. })
        ));
        assert!(matches!(
            space.remove_style(Some(CONT), None),
            Err(PsprintError::BadMark { .. })
        ));
        assert_eq!(space.len(), 7);
    }

    #[test]
    fn test_builtins_pass_validation() {
        let space = PrintSpace::new();
        assert_eq!(space.cont().name(), CONT);
        for (mark, (name, long, short, color)) in space.marks().iter().zip(BUILTIN_MARKS) {
            let spec = MarkSpec::new()
                .pref(long)
                .pref_s(short)
                .pref_color(color.index().map_or_else(|| "default".to_string(), |i| i.to_string()))
                .pref_gloss("bright");
            let checked = Mark::construct(name, &spec, &MarkRules::default()).unwrap();
            assert_eq!(*mark, checked);
        }
    }

    #[test]
    fn test_lower_label_limit_keeps_builtins_usable() {
        let mut space = PrintSpace::new();
        space.load_config_str("FLAGS:\n  pref_max_len: 5\n", "inline").unwrap();
        let call = Call::new().mark("warn").pref_color("r").bland(true);
        assert_eq!(space.psfmt(["x"], &call).unwrap(), vec!["[WARNING] x"]);
        assert!(space
            .edit_style(Some("long"), &MarkSpec::new().pref("toolong"), None)
            .is_err());
    }

    #[test]
    fn test_edit_style_twice_with_expanding_label() {
        let mut space = PrintSpace::new();
        space
            .edit_style(Some("es"), &MarkSpec::new().pref("ßßßßß"), None)
            .unwrap();
        space
            .edit_style(Some("es"), &MarkSpec::new().pref_color("r"), None)
            .unwrap();
        assert_eq!(space.get("es").unwrap().prefix().long(), "SSSSSSSSSS");
        assert!(space
            .edit_style(Some("es2"), &MarkSpec::new().pref("ß".repeat(10)), None)
            .is_err());
    }

    #[test]
    fn test_psfmt_end_to_end_warn_padded() {
        let space = PrintSpace::new();
        let call = Call::new().mark("warn").pad(true).short(false);
        let parts = space.psfmt(["hello"], &call).unwrap();
        assert_eq!(parts.len(), 1);
        let line = &parts[0];
        assert_eq!(line, "\x1b[22;1;35;49m[WARNING] \x1b[22;39;49mhello\x1b[0m");
    }

    #[test]
    fn test_psfmt_text_gloss_clears_prefix_gloss() {
        let space = PrintSpace::new();
        let call = Call::new().mark("warn").text_gloss("d");
        let parts = space.psfmt(["hello"], &call).unwrap();
        assert_eq!(parts, vec!["\x1b[22;1;35;49m[WARNING] \x1b[22;2;39;49mhello\x1b[0m"]);
    }

    #[test]
    fn test_psfmt_no_args_skips_mark_resolution() {
        let space = PrintSpace::new();
        let call = Call::new().mark("warn").pref_color(77);
        assert_eq!(space.psfmt(Vec::<String>::new(), &call).unwrap(), Vec::<String>::new());
        assert!(space.psfmt(["x"], &call).is_err());

        let mut out = Vec::new();
        space.psprint_to(&mut out, Vec::<String>::new(), &call).unwrap();
        assert_eq!(out, b"\n");
    }

    #[test]
    fn test_psfmt_padding_aligns_builtins() {
        let space = PrintSpace::new();
        let widths: Vec<usize> = space
            .names()
            .map(|name| {
                let call = bland().mark(name).pad(true);
                let line = space.psfmt(["x"], &call).unwrap().remove(0);
                line.find('x').unwrap()
            })
            .collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{:?}", widths);
        assert_eq!(widths[0], "[WARNING] ".len());
    }

    #[test]
    fn test_psfmt_padding_widens_for_on_the_fly_label() {
        let space = PrintSpace::new();
        let call = bland().pad(true).pref("longerlab");
        let line = space.psfmt(["x"], &call).unwrap().remove(0);
        assert_eq!(line, "[LONGERLAB] x");
    }

    #[test]
    fn test_psfmt_disabled_passthrough() {
        let space = PrintSpace::new();
        let call = Call::new().mark("err").disabled(true);
        assert_eq!(space.psfmt(["Disabled"], &call).unwrap(), vec!["Disabled"]);
    }

    #[test]
    fn test_psfmt_space_switches_apply() {
        let mut space = PrintSpace::new();
        space.set_switches(Switches {
            short: true,
            bland: true,
            ..Switches::default()
        });
        let parts = space.psfmt(["x"], &Call::new().mark("info")).unwrap();
        assert_eq!(parts, vec!["[I] x"]);
        let parts = space.psfmt(["x"], &Call::new().mark("info").short(false)).unwrap();
        assert_eq!(parts, vec!["[INFO] x"]);
    }

    #[test]
    fn test_psfmt_joined() {
        let space = PrintSpace::new();
        let call = bland().mark(1);
        assert_eq!(space.psfmt_joined(["a", "b"], &call, "-").unwrap(), "[INFO] a-b");
    }

    #[test]
    fn test_psprint_to_uses_sep_and_end() {
        let space = PrintSpace::new();
        let mut out: Vec<u8> = Vec::new();
        space
            .psprint_to(&mut out, ["a", "b"], &bland().mark("list"))
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[LIST] a\tb\n");

        let mut out: Vec<u8> = Vec::new();
        space
            .psprint_to(&mut out, ["a", "b"], &bland().sep(", ").end("!\n"))
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a, b!\n");
    }

    #[test]
    fn test_psprint_to_no_args_is_blank_line() {
        let space = PrintSpace::new();
        let mut out: Vec<u8> = Vec::new();
        space
            .psprint_to(&mut out, Vec::<String>::new(), &Call::new().mark("err"))
            .unwrap();
        assert_eq!(out, b"\n");
    }

    #[test]
    fn test_psprint_to_propagates_io_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let space = PrintSpace::new();
        let err = space.psprint_to(&mut Broken, ["x"], &Call::new()).unwrap_err();
        let PsprintError::Io(io) = err else {
            panic!("expected Io error");
        };
        assert_eq!(io.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_display_lists_every_mark() {
        let space = PrintSpace::new();
        let listing = console::strip_ansi_codes(&space.to_string()).to_string();
        assert!(listing.starts_with("\nmark\tlong\tshort\ttext\n\n"));
        assert!(listing.contains("err:\t[ERROR]\t[X]\t<CUSTOM>"));
        assert_eq!(listing.lines().filter(|l| l.contains(':')).count(), 7);
    }

    #[test]
    fn test_order_override() {
        let mut space = PrintSpace::new();
        space.reorder(&["bug".to_string(), "ghost".to_string(), "info".to_string()]);
        let names: Vec<_> = space.names().collect();
        assert_eq!(names, vec!["cont", "bug", "info", "act", "list", "warn", "err"]);
    }
}
