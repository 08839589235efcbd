//! Loading configuration from TOML with environment expansion.

use super::AppConfig;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The expanded content is not valid TOML for [`AppConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range or missing.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Matches `${NAME}` and `${NAME:-default}`. A default runs to the first `}`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(placeholder_pattern);

#[expect(clippy::expect_used, reason = "the pattern is a literal checked by tests")]
fn placeholder_pattern() -> Regex {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("placeholder pattern should compile")
}

/// Expands `${VAR}` and `${VAR:-default}` placeholders using `lookup`.
///
/// A variable that `lookup` does not know expands to its default, or to an
/// empty string when there is none. Looked-up values and defaults alike are
/// escaped for use inside TOML basic strings. Text that is not a well-formed
/// placeholder, such as an unterminated `${`, is left as written.
///
/// ```
/// use taskmanager::config::expand_placeholders;
///
/// let expanded = expand_placeholders("port = ${PORT:-6379}", |_| None);
/// assert_eq!(expanded, "port = 6379");
/// ```
pub fn expand_placeholders<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    PLACEHOLDER
        .replace_all(content, |caps: &Captures<'_>| {
            let value = caps
                .get(1)
                .and_then(|name| lookup(name.as_str()))
                .or_else(|| caps.get(2).map(|fallback| fallback.as_str().to_owned()))
                .unwrap_or_default();
            escape_toml_string(&value)
        })
        .into_owned()
}

fn escape_toml_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

impl AppConfig {
    /// Parses and validates configuration, expanding placeholders from the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Parses and validates configuration, expanding placeholders with
    /// `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expanded = expand_placeholders(content, lookup);
        let config: Self = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, expands, parses and validates the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`AppConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let content = std::fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %file.display(), "configuration loaded");
        Ok(config)
    }
}
