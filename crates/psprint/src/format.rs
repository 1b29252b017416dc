//! Assembling a marked line from its arguments.

use std::fmt::Display;

use crate::ansi::RESET;
use crate::mark::Mark;
use crate::prefix::PrefixForm;

/// Display switches for a printed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Switches {
    /// Pad prefixes so that text starts in the same column.
    pub pad: bool,
    /// Show the one-character label.
    pub short: bool,
    /// Omit all escape codes.
    pub bland: bool,
    /// Behave like a plain print: no prefix, no styling.
    pub disabled: bool,
}

/// Turns arguments plus a resolved mark into styled strings.
///
/// The prefix and both effects are attached to the first argument and a
/// reset is appended to the last, so joining the result with any separator
/// yields one styled line.
///
/// # Example
///
/// ```rust
/// use psprint::{Formatter, PrintSpace, Switches};
///
/// let space = PrintSpace::new();
/// let mark = space.get("warn").unwrap();
/// let switches = Switches { bland: true, ..Switches::default() };
/// let parts = Formatter::new(switches).render(["careful"], mark);
/// assert_eq!(parts, vec!["[WARNING] careful".to_string()]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    switches: Switches,
    pad_width: usize,
}

impl Formatter {
    pub fn new(switches: Switches) -> Self {
        Self {
            switches,
            pad_width: 0,
        }
    }

    /// Sets the label width long prefixes are padded to.
    ///
    /// A mark whose own label is wider is padded to its own width instead.
    #[must_use]
    pub fn pad_width(mut self, width: usize) -> Self {
        self.pad_width = width;
        self
    }

    pub fn switches(&self) -> Switches {
        self.switches
    }

    /// Renders `args` with `mark`.
    ///
    /// Disabled formatting returns the arguments as plain strings. No
    /// arguments yield no strings, leaving a blank line to the caller.
    pub fn render<I, T>(&self, args: I, mark: &Mark) -> Vec<String>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let mut parts: Vec<String> = args.into_iter().map(|a| a.to_string()).collect();
        if self.switches.disabled || parts.is_empty() {
            return parts;
        }

        let form = PrefixForm::from_short(self.switches.short);
        let pad_to = self.switches.pad.then(|| match form {
            PrefixForm::Long => self.pad_width.max(mark.prefix().label_width(form)),
            PrefixForm::Short => 1,
        });
        let mut head = mark.prefix().render(form, pad_to, self.switches.bland);

        if !self.switches.bland {
            head.push_str(&mark.text_effect().combine());
            if let Some(last) = parts.last_mut() {
                last.push_str(RESET);
            }
        }
        if let Some(first) = parts.first_mut() {
            first.insert_str(0, &head);
        }
        parts
    }

    /// Renders `args` and joins them with `sep`.
    pub fn render_joined<I, T>(&self, args: I, mark: &Mark, sep: &str) -> String
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.render(args, mark).join(sep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::{MarkRules, MarkSpec};

    fn warn_mark() -> Mark {
        let spec = MarkSpec::new()
            .pref("warning")
            .pref_s("!")
            .pref_color("m")
            .pref_gloss("b");
        Mark::construct("warn", &spec, &MarkRules::default()).unwrap()
    }

    #[test]
    fn test_disabled_is_passthrough() {
        let switches = Switches {
            disabled: true,
            ..Switches::default()
        };
        let parts = Formatter::new(switches).render(["a", "b"], &warn_mark());
        assert_eq!(parts, vec!["a", "b"]);
    }

    #[test]
    fn test_no_args_no_prefix() {
        let parts = Formatter::new(Switches::default()).render(Vec::<String>::new(), &warn_mark());
        assert!(parts.is_empty());
    }

    #[test]
    fn test_styled_single_arg() {
        let parts = Formatter::new(Switches::default()).render(["hello"], &warn_mark());
        assert_eq!(parts, vec!["\x1b[22;1;35;49m[WARNING] \x1b[22;39;49mhello\x1b[0m"]);
    }

    #[test]
    fn test_styled_many_args_reset_only_on_last() {
        let parts = Formatter::new(Switches::default()).render(["a", "b", "c"], &warn_mark());
        assert!(parts[0].ends_with('a'));
        assert_eq!(parts[1], "b");
        assert_eq!(parts[2], "c\x1b[0m");
    }

    #[test]
    fn test_bland_has_no_escapes() {
        let switches = Switches {
            bland: true,
            ..Switches::default()
        };
        let line = Formatter::new(switches).render_joined(["x", 42.to_string().as_str()], &warn_mark(), " ");
        assert_eq!(line, "[WARNING] x 42");
    }

    #[test]
    fn test_short_form() {
        let switches = Switches {
            short: true,
            bland: true,
            ..Switches::default()
        };
        let parts = Formatter::new(switches).render(["x"], &warn_mark());
        assert_eq!(parts, vec!["[!] x"]);
    }

    #[test]
    fn test_pad_width_applies_to_long_form() {
        let info = Mark::construct("info", &MarkSpec::new().pref("info"), &MarkRules::default())
            .unwrap();
        let switches = Switches {
            pad: true,
            bland: true,
            ..Switches::default()
        };
        let formatter = Formatter::new(switches).pad_width(7);
        assert_eq!(formatter.render(["x"], &info), vec!["[INFO]    x"]);
        assert_eq!(formatter.render(["x"], &warn_mark()), vec!["[WARNING] x"]);
    }

    #[test]
    fn test_display_values() {
        let switches = Switches {
            bland: true,
            ..Switches::default()
        };
        let parts = Formatter::new(switches).render([1.5, 2.0], &warn_mark());
        assert_eq!(parts, vec!["[WARNING] 1.5", "2"]);
    }
}
