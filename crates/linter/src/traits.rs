//! Rule trait definitions.

use crate::config::{ConfigError, LintSeverity};
use crate::diagnostics::LintDiagnostic;
use relay_extract::SourceAnalysis;

/// Metadata common to all lint rules.
pub trait LintRule {
    /// Short rule identifier, used in config keys and diagnostics
    /// (e.g., `"unused-fields"`).
    fn name(&self) -> &'static str;

    /// One-line description shown by `relay-lint rules`.
    fn description(&self) -> &'static str;

    /// Severity applied when the config does not override it.
    fn default_severity(&self) -> LintSeverity;

    /// Validate rule options before any file is analyzed.
    ///
    /// The default implementation rejects any supplied options; rules that
    /// accept options override this with a strict (unknown-keys-rejecting)
    /// deserialization.
    fn validate_options(&self, options: Option<&serde_json::Value>) -> Result<(), ConfigError> {
        match options {
            None => Ok(()),
            Some(_) => Err(ConfigError::InvalidOptions {
                rule: self.name().to_string(),
                message: "this rule accepts no options".to_string(),
            }),
        }
    }
}

/// A rule that checks one analyzed JS/TS source file.
///
/// Rules run after the file's traversal is complete: the whole
/// [`SourceAnalysis`] is available, so usage and declaration order inside
/// the file are unconstrained.
pub trait SourceLintRule: LintRule + Send + Sync {
    /// Produce diagnostics for one file. Never fails; a template that cannot
    /// be parsed is the syntax rule's concern and is skipped here.
    fn check(
        &self,
        analysis: &SourceAnalysis,
        options: Option<&serde_json::Value>,
    ) -> Vec<LintDiagnostic>;
}
