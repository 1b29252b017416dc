//! Configuration documents and their discovery on disk.
//!
//! A configuration is a YAML mapping. Two keys are reserved:
//!
//! - `FLAGS`: global switches and print defaults
//! - `order`: the index order of marks
//!
//! Every other key defines a mark, with the fields of [`MarkSpec`]:
//!
//! ```yaml
//! FLAGS:
//!   pad: Yes
//!   short: No
//!
//! order:
//!   - cont
//!   - info
//!
//! TEST:
//!   pref: TEST
//!   pref_s: t
//!   pref_color: y
//!   text_bgcol: 7
//! ```
//!
//! Parsing here is purely structural; marks are validated when the document
//! is applied to a [`PrintSpace`](crate::PrintSpace).

use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{PsprintError, Result};
use crate::mark::MarkSpec;

/// Environment variable naming an extra, highest-priority configuration file.
pub const CONFIG_ENV_VAR: &str = "PSPRINTRC";

/// File name looked up in the home and working directories.
pub const RC_FILE_NAME: &str = ".psprintrc";

/// The `FLAGS` section. Absent keys leave the current setting alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Flags {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub pad: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub short: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub bland: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub disabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub permissive: Option<bool>,
    pub pref_max_len: Option<usize>,
    pub sep: Option<String>,
    pub end: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub flush: Option<bool>,
    pub file: Option<PathBuf>,
}

/// Accepts YAML booleans as well as the YAML 1.1 words (`Yes`, `off`, ...).
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Text(String),
    }

    match Option::<BoolLike>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolLike::Bool(b)) => Ok(Some(b)),
        Some(BoolLike::Text(s)) => match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "on" | "true" => Ok(Some(true)),
            "no" | "n" | "off" | "false" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean, found '{}'",
                other
            ))),
        },
    }
}

/// A mark block as written, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkBlock {
    Spec(MarkSpec),
    /// The block could not be read as a mark definition.
    Malformed(String),
}

/// A parsed configuration document.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    /// Human-readable origin, usually the file path.
    pub origin: String,
    pub flags: Option<Flags>,
    pub order: Option<Vec<String>>,
    /// Mark blocks in document order.
    pub marks: Vec<(String, MarkBlock)>,
}

impl ConfigFile {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`PsprintError::Config`] if the text is not YAML, is not a
    /// mapping, or if `FLAGS`/`order` have the wrong shape. Broken mark
    /// blocks are kept as [`MarkBlock::Malformed`] so the caller can report
    /// them by name.
    pub fn parse(text: &str, origin: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        let config_err = |source| PsprintError::Config {
            origin: origin.clone(),
            source,
        };

        let doc: Option<Mapping> = serde_yaml::from_str(text).map_err(config_err)?;
        let mut config = ConfigFile {
            origin: origin.clone(),
            ..ConfigFile::default()
        };

        for (key, value) in doc.unwrap_or_default() {
            match key.as_str() {
                Some("FLAGS") => {
                    let flags = serde_yaml::from_value(value).map_err(config_err)?;
                    config.flags = Some(flags);
                }
                Some("order") => {
                    let order = serde_yaml::from_value(value).map_err(config_err)?;
                    config.order = Some(order);
                }
                Some(name) => {
                    config.marks.push((name.to_string(), read_block(value)));
                }
                None => {
                    let name = describe_key(&key);
                    config
                        .marks
                        .push((name, MarkBlock::Malformed("mark names must be strings".into())));
                }
            }
        }

        tracing::debug!(
            origin = %config.origin,
            marks = config.marks.len(),
            "parsed configuration"
        );
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// I/O failures are returned unchanged as [`PsprintError::Io`].
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, path.display().to_string())
    }
}

fn read_block(value: Value) -> MarkBlock {
    if !value.is_mapping() {
        return MarkBlock::Malformed("expected a mapping of style keys".into());
    }
    match serde_yaml::from_value::<MarkSpec>(value) {
        Ok(spec) => MarkBlock::Spec(spec),
        Err(err) => MarkBlock::Malformed(err.to_string()),
    }
}

fn describe_key(key: &Value) -> String {
    match key {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "~".to_string(),
        _ => "<complex key>".to_string(),
    }
}

/// Returns the existing configuration files, lowest priority first.
///
/// Candidates, in order:
///
/// 1. `$XDG_CONFIG_HOME/psprint/style.yml` (or `$HOME/.config/psprint/style.yml`)
/// 2. `$HOME/.psprintrc`
/// 3. `./.psprintrc`
/// 4. the file named by `$PSPRINTRC`
pub fn discover_paths() -> Vec<PathBuf> {
    let home = env::var_os("HOME").map(PathBuf::from);
    let config_home = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| home.as_ref().map(|h| h.join(".config")));

    let mut candidates = Vec::new();
    if let Some(dir) = config_home {
        candidates.push(dir.join("psprint").join("style.yml"));
    }
    if let Some(home) = home {
        candidates.push(home.join(RC_FILE_NAME));
    }
    if let Ok(cwd) = env::current_dir() {
        candidates.push(cwd.join(RC_FILE_NAME));
    }
    if let Some(explicit) = env::var_os(CONFIG_ENV_VAR) {
        candidates.push(PathBuf::from(explicit));
    }

    let mut found: Vec<PathBuf> = Vec::new();
    for path in candidates {
        if path.is_file() && !found.contains(&path) {
            tracing::debug!(path = %path.display(), "found configuration");
            found.push(path);
        }
    }
    found
}
