//! Lint configuration: per-rule severity and options.
//!
//! Configuration is YAML, searched upward from the working directory:
//!
//! ```yaml
//! rules:
//!   unused-fields:
//!     severity: warning
//!     options:
//!       edgesAndNodesWhiteListFunctionName: collectConnectionNodes
//!   must-colocate-fragment-spreads: error
//! ```
//!
//! Unknown rule names and unknown option keys are rejected when the config
//! is loaded, before any file is analyzed.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
const CONFIG_FILES: &[&str] = &["relay-lint.yml", ".relaylintrc.yml", ".relaylintrc.yaml"];

/// Errors produced while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file is not valid YAML for the expected shape
    #[error("invalid config: {0}")]
    Yaml(String),

    /// Config names a rule that does not exist
    #[error("unknown lint rule '{0}'")]
    UnknownRule(String),

    /// Rule options failed validation
    #[error("invalid options for rule '{rule}': {message}")]
    InvalidOptions {
        /// Rule the options were supplied for
        rule: String,
        /// What was wrong
        message: String,
    },
}

/// Diagnostic severity, configurable per rule. `Off` disables a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// Rule is disabled
    Off,
    /// Informational finding
    Info,
    /// Non-fatal finding
    #[serde(alias = "warn")]
    Warning,
    /// Finding that fails the lint run
    Error,
}

/// Configuration for a single rule: either a bare severity or a severity
/// with rule-specific options.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LintRuleConfig {
    /// `rule-name: warning`
    Severity(LintSeverity),
    /// `rule-name: { severity: ..., options: ... }`
    Detailed {
        /// Severity override
        severity: LintSeverity,
        /// Rule-specific options, validated by the rule itself
        #[serde(default)]
        options: Option<serde_json::Value>,
    },
}

impl LintRuleConfig {
    /// The configured severity.
    #[must_use]
    pub const fn severity(&self) -> LintSeverity {
        match self {
            Self::Severity(severity) | Self::Detailed { severity, .. } => *severity,
        }
    }

    /// The configured options, if any.
    #[must_use]
    pub const fn options(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Severity(_) => None,
            Self::Detailed { options, .. } => options.as_ref(),
        }
    }
}

/// Whole-tool lint configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Per-rule configuration, keyed by rule name
    #[serde(default)]
    pub rules: HashMap<String, LintRuleConfig>,
}

impl LintConfig {
    /// Parse a config from YAML text and validate it against the registry.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_saphyr::from_str(text).map_err(|err| ConfigError::Yaml(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    #[tracing::instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&contents)?;
        tracing::info!(rules = config.rules.len(), "config loaded");
        Ok(config)
    }

    /// Find a config file by walking up the directory tree from `start_dir`.
    #[must_use]
    pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = start_dir.to_path_buf();
        loop {
            for file_name in CONFIG_FILES {
                let config_path = current_dir.join(file_name);
                if config_path.is_file() {
                    tracing::debug!(path = %config_path.display(), "found config file");
                    return Some(config_path);
                }
            }
            if !current_dir.pop() {
                return None;
            }
        }
    }

    /// Fail fast on unknown rules or malformed rule options.
    ///
    /// Runs at load time, before any file is analyzed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, rule_config) in &self.rules {
            let rule = crate::registry::rule_by_name(name)
                .ok_or_else(|| ConfigError::UnknownRule(name.clone()))?;
            rule.validate_options(rule_config.options())?;
        }
        Ok(())
    }

    /// Effective severity for a rule, falling back to the rule's default.
    #[must_use]
    pub fn severity_for(&self, name: &str, default: LintSeverity) -> LintSeverity {
        self.rules
            .get(name)
            .map_or(default, LintRuleConfig::severity)
    }

    /// Configured options for a rule, if any.
    #[must_use]
    pub fn options_for(&self, name: &str) -> Option<&serde_json::Value> {
        self.rules.get(name).and_then(LintRuleConfig::options)
    }
}
