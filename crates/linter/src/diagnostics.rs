//! Lint diagnostics with byte-offset ranges.

use crate::config::LintSeverity;
use relay_types::OffsetRange;

/// One lint finding, anchored at a byte range in the host file.
///
/// Offsets are host-file coordinates; templates map their internal offsets
/// before constructing a diagnostic. Conversion to line/column happens at
/// display time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintDiagnostic {
    /// Byte range of the offending name in the host file
    pub range: OffsetRange,
    /// Severity (from rule default or config override)
    pub severity: LintSeverity,
    /// Human-readable message
    pub message: String,
    /// Rule identifier (e.g., `"unused-fields"`)
    pub rule: String,
}

impl LintDiagnostic {
    /// Create a new lint diagnostic.
    #[must_use]
    pub fn new(
        range: OffsetRange,
        severity: LintSeverity,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            range,
            severity,
            message: message.into(),
            rule: rule.into(),
        }
    }

    /// Create a warning diagnostic.
    #[must_use]
    pub fn warning(range: OffsetRange, message: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::new(range, LintSeverity::Warning, message, rule)
    }

    /// Create an error diagnostic.
    #[must_use]
    pub fn error(range: OffsetRange, message: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::new(range, LintSeverity::Error, message, rule)
    }
}
