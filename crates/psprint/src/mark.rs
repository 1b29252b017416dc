//! Marks: named prefix and text styles.
//!
//! A [`Mark`] is immutable. Customizing one means building a new mark with
//! [`Mark::derive`], which copies the parent's fields, applies a
//! [`MarkSpec`] on top and validates the result again. The parent is never
//! touched and the derived mark keeps no reference to it.

use serde::Deserialize;
use std::fmt;

use crate::ansi::{AnsiColor, AnsiEffect, Gloss, StyleArg, RESET};
use crate::error::ValidationError;
use crate::prefix::{PrefixForm, PrintPrefix};

/// Default maximum length of a long label.
pub const DEFAULT_PREF_MAX_LEN: usize = 10;

/// Short label used when none is given.
pub const DEFAULT_SHORT_LABEL: &str = ">";

/// Partial mark definition.
///
/// Every field is optional: absent fields fall back to the defaults (for
/// [`Mark::construct`]) or to the parent (for [`Mark::derive`]). This is the
/// shape of a mark block in a configuration file and of the per-call style
/// overrides.
///
/// # Example
///
/// ```rust
/// use psprint::{Mark, MarkRules, MarkSpec};
///
/// let spec = MarkSpec::new().pref("note").pref_s("n").pref_color("c");
/// let mark = Mark::construct("note", &spec, &MarkRules::default()).unwrap();
/// assert_eq!(mark.prefix().long(), "NOTE");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkSpec {
    pub pref: Option<String>,
    pub pref_s: Option<String>,
    pub pref_color: Option<StyleArg>,
    pub pref_gloss: Option<StyleArg>,
    pub pref_bgcol: Option<StyleArg>,
    pub text_color: Option<StyleArg>,
    pub text_gloss: Option<StyleArg>,
    pub text_bgcol: Option<StyleArg>,
}

impl MarkSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pref(mut self, label: impl Into<String>) -> Self {
        self.pref = Some(label.into());
        self
    }

    pub fn pref_s(mut self, label: impl Into<String>) -> Self {
        self.pref_s = Some(label.into());
        self
    }

    pub fn pref_color(mut self, value: impl Into<StyleArg>) -> Self {
        self.pref_color = Some(value.into());
        self
    }

    pub fn pref_gloss(mut self, value: impl Into<StyleArg>) -> Self {
        self.pref_gloss = Some(value.into());
        self
    }

    pub fn pref_bgcol(mut self, value: impl Into<StyleArg>) -> Self {
        self.pref_bgcol = Some(value.into());
        self
    }

    pub fn text_color(mut self, value: impl Into<StyleArg>) -> Self {
        self.text_color = Some(value.into());
        self
    }

    pub fn text_gloss(mut self, value: impl Into<StyleArg>) -> Self {
        self.text_gloss = Some(value.into());
        self
    }

    pub fn text_bgcol(mut self, value: impl Into<StyleArg>) -> Self {
        self.text_bgcol = Some(value.into());
        self
    }

    /// Returns `true` when no field is set, i.e. applying it changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Validation limits applied when a mark is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkRules {
    /// Maximum number of characters in a long label.
    pub max_label_len: usize,
    /// Trim or substitute bad values with a warning instead of failing.
    pub permissive: bool,
}

impl Default for MarkRules {
    fn default() -> Self {
        Self {
            max_label_len: DEFAULT_PREF_MAX_LEN,
            permissive: false,
        }
    }
}

impl MarkRules {
    fn check_long(&self, label: &str) -> Result<String, ValidationError> {
        if label.chars().count() <= self.max_label_len {
            return Ok(label.to_string());
        }
        if self.permissive {
            let trimmed: String = label.chars().take(self.max_label_len).collect();
            tracing::warn!(label, trimmed = %trimmed, "prefix too long, trimming");
            return Ok(trimmed);
        }
        Err(ValidationError::LabelTooLong {
            label: label.to_string(),
            max: self.max_label_len,
        })
    }

    fn check_short(&self, label: &str) -> Result<String, ValidationError> {
        if label.chars().count() <= 1 {
            return Ok(label.to_string());
        }
        if self.permissive {
            let trimmed: String = label.chars().take(1).collect();
            tracing::warn!(label, trimmed = %trimmed, "short prefix too long, trimming");
            return Ok(trimmed);
        }
        Err(ValidationError::ShortLabelTooLong {
            label: label.to_string(),
        })
    }

    fn color(
        &self,
        arg: Option<&StyleArg>,
        current: AnsiColor,
        error: fn(String) -> ValidationError,
    ) -> Result<AnsiColor, ValidationError> {
        let Some(arg) = arg else {
            return Ok(current);
        };
        match AnsiColor::lookup(arg) {
            Some(color) => Ok(color),
            None if self.permissive => {
                tracing::warn!(value = %arg, "unknown color, using terminal default");
                Ok(AnsiColor::Default)
            }
            None => Err(error(arg.to_string())),
        }
    }

    fn gloss(&self, arg: Option<&StyleArg>, current: Gloss) -> Result<Gloss, ValidationError> {
        let Some(arg) = arg else {
            return Ok(current);
        };
        match Gloss::lookup(arg) {
            Some(gloss) => Ok(gloss),
            None if self.permissive => {
                tracing::warn!(value = %arg, "unknown gloss, using normal");
                Ok(Gloss::Normal)
            }
            None => Err(ValidationError::BadGloss {
                value: arg.to_string(),
            }),
        }
    }

    fn effect(
        &self,
        base: AnsiEffect,
        color: Option<&StyleArg>,
        gloss: Option<&StyleArg>,
        bgcol: Option<&StyleArg>,
    ) -> Result<AnsiEffect, ValidationError> {
        Ok(AnsiEffect {
            color: self.color(color, base.color, |value| ValidationError::BadColor { value })?,
            gloss: self.gloss(gloss, base.gloss)?,
            bgcol: self.color(bgcol, base.bgcol, |value| ValidationError::BadBgCol { value })?,
        })
    }
}

/// A named prefix plus the style of the text that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mark {
    name: String,
    prefix: PrintPrefix,
    text: AnsiEffect,
}

impl Mark {
    /// Builds a mark from defaults overlaid with `spec`.
    ///
    /// Defaults: empty long label, `>` short label, terminal-default colors
    /// with normal gloss for both prefix and text.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] met while checking labels and
    /// styles.
    pub fn construct(
        name: impl Into<String>,
        spec: &MarkSpec,
        rules: &MarkRules,
    ) -> Result<Self, ValidationError> {
        let base = Mark {
            name: name.into(),
            prefix: PrintPrefix::new("", DEFAULT_SHORT_LABEL, AnsiEffect::default()),
            text: AnsiEffect::default(),
        };
        base.merge(base.name.clone(), spec, rules)
    }

    /// Builds a new mark from `parent` with the fields present in `spec`
    /// replaced. The result keeps the parent's name.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the merged mark is invalid under
    /// `rules`.
    pub fn derive(parent: &Mark, spec: &MarkSpec, rules: &MarkRules) -> Result<Self, ValidationError> {
        parent.merge(parent.name.clone(), spec, rules)
    }

    fn merge(&self, name: String, spec: &MarkSpec, rules: &MarkRules) -> Result<Self, ValidationError> {
        // Inherited labels were checked when they were set.
        let long = match &spec.pref {
            Some(label) => rules.check_long(&label.to_uppercase())?,
            None => self.prefix.long().to_string(),
        };
        let short = match &spec.pref_s {
            Some(label) => rules.check_short(&label.to_uppercase())?,
            None => self.prefix.short().to_string(),
        };
        let pref_effect = rules.effect(
            self.prefix.effect(),
            spec.pref_color.as_ref(),
            spec.pref_gloss.as_ref(),
            spec.pref_bgcol.as_ref(),
        )?;
        let text = rules.effect(
            self.text,
            spec.text_color.as_ref(),
            spec.text_gloss.as_ref(),
            spec.text_bgcol.as_ref(),
        )?;
        Ok(Mark {
            name,
            prefix: PrintPrefix::new(&long, &short, pref_effect),
            text,
        })
    }

    /// Assembles a mark from parts that are already valid.
    pub(crate) fn from_parts(name: &str, prefix: PrintPrefix, text: AnsiEffect) -> Self {
        Mark {
            name: name.to_string(),
            prefix,
            text,
        }
    }

    /// Returns a copy of this mark registered under another name.
    pub(crate) fn renamed(&self, name: &str) -> Self {
        Mark {
            name: name.to_string(),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &PrintPrefix {
        &self.prefix
    }

    pub fn text_effect(&self) -> AnsiEffect {
        self.text
    }
}

impl fmt::Display for Mark {
    /// Tab-separated diagnostic line: name, long and short prefix in their
    /// style, and a sample of the text style.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let long = self.prefix.render(PrefixForm::Long, None, false);
        let short = self.prefix.render(PrefixForm::Short, None, false);
        write!(
            f,
            "{}:\t{}{}\t{}{}\t{}<CUSTOM>{}",
            self.name,
            long.trim_end(),
            RESET,
            short.trim_end(),
            RESET,
            self.text,
            RESET
        )
    }
}
