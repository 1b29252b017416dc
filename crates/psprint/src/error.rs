//! Error types for mark validation and registry operations.

use thiserror::Error;

/// Error returned when a mark's label or style fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A foreground color is neither an index in `0..=15` nor a known alias.
    #[error("bad color '{value}': expected 0-15, an alias like 'r' or 'lg', or a color name")]
    BadColor { value: String },
    /// A gloss is neither an index in `0..=3` nor a known alias.
    #[error("bad gloss '{value}': expected 0-3, one of r/n/d/b, or reset/normal/dim/bright")]
    BadGloss { value: String },
    /// A background color is neither an index in `0..=15` nor a known alias.
    #[error("bad background color '{value}': expected 0-15, an alias like 'b' or 'lw', or a color name")]
    BadBgCol { value: String },
    /// The long label is longer than the configured maximum.
    #[error("prefix '{label}' is longer than {max} characters")]
    LabelTooLong { label: String, max: usize },
    /// The short label is longer than one character.
    #[error("short prefix '{label}' is longer than 1 character")]
    ShortLabelTooLong { label: String },
}

/// Error returned by [`PrintSpace`](crate::PrintSpace) operations.
#[derive(Debug, Error)]
pub enum PsprintError {
    /// An ad-hoc mark failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A mark definition could not produce a valid mark.
    ///
    /// `origin` names where the definition came from: a configuration
    /// file path or the registry call that attempted it.
    #[error("bad mark '{name}' in {origin}: {reason}")]
    BadMark {
        name: String,
        origin: String,
        reason: String,
    },

    /// A required argument was not supplied.
    #[error("missing argument: {0}")]
    MissingArgument(String),

    /// A configuration document is not valid YAML.
    #[error("failed to parse configuration {origin}: {source}")]
    Config {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Reading a configuration file or writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PsprintError {
    pub(crate) fn bad_mark(
        name: impl Into<String>,
        origin: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        PsprintError::BadMark {
            name: name.into(),
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias for results in this crate.
pub type Result<T, E = PsprintError> = std::result::Result<T, E>;
