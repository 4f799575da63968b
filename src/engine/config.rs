//! Engine configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::result::ConfigError;

/// Limits and switches applied to every execution.
///
/// Read from the `script:` section of the host's YAML configuration:
///
/// ```yaml
/// script:
///   max-commands: 10
///   timeout: 1000
///   allow-console-commands: true
///   max-include-depth: 16
/// ```
///
/// Missing keys keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScriptConfig {
    /// Command-like actions allowed per execution; 0 disables the limit.
    pub max_commands: u32,
    /// Wall-clock limit in milliseconds; 0 or negative disables it.
    pub timeout: i64,
    /// Whether `console:` may dispatch anything.
    pub allow_console_commands: bool,
    /// Deepest allowed `include` nesting; 0 disables the limit.
    pub max_include_depth: u32,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            max_commands: super::builder::DEFAULT_MAX_COMMANDS,
            timeout: super::builder::DEFAULT_TIMEOUT_MS,
            allow_console_commands: true,
            max_include_depth: super::builder::DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

#[derive(Deserialize, Default)]
struct Document {
    #[serde(default)]
    script: ScriptConfig,
}

impl ScriptConfig {
    /// The wall-clock limit, if one is set.
    pub fn timeout(&self) -> Option<Duration> {
        u64::try_from(self.timeout)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Parse a host configuration document, reading its `script:` section.
    ///
    /// # Examples
    ///
    /// ```
    /// use guiscript::ScriptConfig;
    ///
    /// let config = ScriptConfig::from_yaml_str("script:\n  max-commands: 3\n").unwrap();
    /// assert_eq!(config.max_commands, 3);
    /// assert_eq!(config.timeout, 1000);
    /// ```
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let document: Option<Document> = serde_yaml::from_str(text)?;
        Ok(document.unwrap_or_default().script)
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScriptConfig::default();
        assert_eq!(config.max_commands, 10);
        assert_eq!(config.timeout(), Some(Duration::from_millis(1000)));
        assert!(config.allow_console_commands);
        assert_eq!(config.max_include_depth, 16);
    }

    #[test]
    fn test_partial_section() {
        let yaml = "\
prefix: '&8[&bGUI&8]'
script:
  allow-console-commands: false
  timeout: 0
";
        let config = ScriptConfig::from_yaml_str(yaml).unwrap();
        assert!(!config.allow_console_commands);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.max_commands, 10);
    }

    #[test]
    fn test_missing_section_and_empty_input() {
        assert_eq!(
            ScriptConfig::from_yaml_str("other: 1\n").unwrap(),
            ScriptConfig::default()
        );
        assert_eq!(ScriptConfig::from_yaml_str("").unwrap(), ScriptConfig::default());
    }

    #[test]
    fn test_negative_timeout_disables_deadline() {
        let config = ScriptConfig::from_yaml_str("script:\n  timeout: -5\n").unwrap();
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_mistyped_value_is_error() {
        let err = ScriptConfig::from_yaml_str("script:\n  max-commands: lots\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
