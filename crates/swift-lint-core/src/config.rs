//! Configuration types for swift-lint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for swift-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (`"default"` or `"all"`).
    #[serde(default)]
    pub preset: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule identifier.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled. Rules without an entry follow `default`.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str, default: bool) -> bool {
        self.rules
            .get(rule_name)
            .and_then(|c| c.enabled)
            .unwrap_or(default)
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<crate::Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration section for a rule.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of files analyzed in parallel (default: one per CPU).
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_excludes(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_excludes() -> Vec<String> {
    vec![
        "**/.build/**".to_string(),
        "**/Pods/**".to_string(),
        "**/Carthage/**".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<crate::Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Deserializes the rule-specific options into a typed configuration.
    ///
    /// `rule` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if an option has the wrong
    /// shape or an unknown key is rejected by `T`.
    pub fn options<T: DeserializeOwned>(&self, rule: &str) -> Result<T, ConfigError> {
        let table: toml::Table = self
            .options
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::InvalidOption {
                rule: rule.to_string(),
                message: e.message().to_string(),
            })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A rule option is missing, malformed, or unknown.
    #[error("Invalid configuration for rule '{rule}': {message}")]
    InvalidOption {
        /// Rule identifier.
        rule: String,
        /// What was wrong.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(config.analyzer.exclude.iter().any(|e| e.contains("Pods")));
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "all"

[analyzer]
root = "./Sources"
exclude = ["**/Generated/**"]

[rules.deployment-target]
severity = "error"
ios_deployment_target = "9.0"

[rules.no-extension-access-modifier]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("all"));
        assert_eq!(config.analyzer.root, PathBuf::from("./Sources"));
        assert_eq!(config.analyzer.exclude, vec!["**/Generated/**"]);
        assert!(config.is_rule_enabled("deployment-target", true));
        assert!(!config.is_rule_enabled("no-extension-access-modifier", true));
        assert!(!config.is_rule_enabled("unknown-rule", false));
        assert_eq!(
            config.rule_severity("deployment-target"),
            Some(crate::Severity::Error)
        );

        let rule = config.rule("deployment-target").expect("section exists");
        assert!(rule.options.contains_key("ios_deployment_target"));
        assert!(!rule.options.contains_key("severity"));
    }

    #[test]
    fn typed_options_report_rule_name() {
        #[derive(Debug, Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Options {
            #[allow(dead_code)]
            limit: u32,
        }

        let config = Config::parse("[rules.sample]\nlimit = \"ten\"").expect("valid toml");
        let err = config
            .rule("sample")
            .expect("section exists")
            .options::<Options>("sample")
            .expect_err("string is not a u32");
        assert!(err.to_string().contains("'sample'"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::parse("[analyzer").expect_err("broken toml");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
