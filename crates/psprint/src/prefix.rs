//! Bracketed prefix labels.

use unicode_width::UnicodeWidthStr;

use crate::ansi::AnsiEffect;

/// Which of a prefix's two labels to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixForm {
    #[default]
    Long,
    Short,
}

impl PrefixForm {
    /// Picks the form selected by the `short` switch.
    pub fn from_short(short: bool) -> Self {
        if short {
            PrefixForm::Short
        } else {
            PrefixForm::Long
        }
    }
}

/// The label shown in front of a printed line, e.g. `[WARNING]` or `[!]`.
///
/// Labels are stored upper-cased. An empty label renders no brackets at all,
/// which is how the continuation mark stays invisible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PrintPrefix {
    long: String,
    short: String,
    effect: AnsiEffect,
}

impl PrintPrefix {
    /// Creates a prefix. Length limits are enforced by [`Mark`](crate::Mark).
    pub fn new(long: &str, short: &str, effect: AnsiEffect) -> Self {
        Self {
            long: long.to_uppercase(),
            short: short.to_uppercase(),
            effect,
        }
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn effect(&self) -> AnsiEffect {
        self.effect
    }

    /// Returns the label text for `form`.
    pub fn label(&self, form: PrefixForm) -> &str {
        match form {
            PrefixForm::Long => &self.long,
            PrefixForm::Short => &self.short,
        }
    }

    /// Display width of the label for `form`, brackets excluded.
    pub fn label_width(&self, form: PrefixForm) -> usize {
        self.label(form).width()
    }

    /// Renders the prefix.
    ///
    /// A non-empty label becomes `[LABEL]` followed by a one-column separator.
    /// With `pad_to`, the result is right-padded so that it always takes
    /// `pad_to + 3` columns (brackets plus separator), including when the
    /// label is empty. Unless `bland`, the prefix effect is emitted first; no
    /// reset is appended, the caller decides what follows.
    pub fn render(&self, form: PrefixForm, pad_to: Option<usize>, bland: bool) -> String {
        let label = self.label(form);
        let mut out = String::new();
        if !bland {
            out.push_str(&self.effect.combine());
        }

        let used = if label.is_empty() {
            0
        } else {
            out.push('[');
            out.push_str(label);
            out.push(']');
            label.width() + 2
        };

        let spaces = match pad_to {
            Some(width) => (width + 2).saturating_sub(used) + 1,
            None if used > 0 => 1,
            None => 0,
        };
        out.extend(std::iter::repeat(' ').take(spaces));
        out
    }
}
