mod config;
mod diagnostics;
mod document;
mod registry;
mod rules;
mod traits;

pub use config::{ConfigError, LintConfig, LintRuleConfig, LintSeverity};
pub use diagnostics::LintDiagnostic;
pub use registry::{all_rule_names, rule_by_name, source_rules};
pub use rules::{MustColocateOptions, UnusedFieldsOptions};
pub use traits::{LintRule, SourceLintRule};

use relay_extract::SourceAnalysis;

/// Run every enabled rule over one analyzed source file.
///
/// Config severities override rule defaults; `off` skips the rule entirely.
/// Diagnostics come back grouped by rule registration order, each rule's
/// findings in source order.
#[must_use]
pub fn lint_source(analysis: &SourceAnalysis, config: &LintConfig) -> Vec<LintDiagnostic> {
    let mut diagnostics = Vec::new();
    for rule in source_rules() {
        let severity = config.severity_for(rule.name(), rule.default_severity());
        if severity == LintSeverity::Off {
            continue;
        }
        let options = config.options_for(rule.name());
        for mut diagnostic in rule.check(analysis, options) {
            diagnostic.severity = severity;
            diagnostics.push(diagnostic);
        }
    }
    diagnostics
}

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types for working with
/// the linter. Import with:
///
/// ```rust,ignore
/// use relay_linter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{LintConfig, LintSeverity};
    pub use crate::diagnostics::LintDiagnostic;
    pub use crate::traits::{LintRule, SourceLintRule};
    pub use crate::{lint_source, source_rules};
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_extract::analyze_source;
    use std::path::Path;

    #[test]
    fn severity_override_is_applied() {
        let config = LintConfig::from_yaml("rules:\n  unused-fields: error\n").unwrap();
        let analysis =
            analyze_source(Path::new("test.js"), "graphql`fragment f on Page { unused1 }`;")
                .unwrap();
        let diagnostics = lint_source(&analysis, &config);
        assert!(!diagnostics.is_empty());
        assert!(diagnostics
            .iter()
            .filter(|d| d.rule == "unused-fields")
            .all(|d| d.severity == LintSeverity::Error));
    }

    #[test]
    fn off_disables_a_rule() {
        let config = LintConfig::from_yaml("rules:\n  unused-fields: \"off\"\n").unwrap();
        let analysis =
            analyze_source(Path::new("test.js"), "graphql`fragment f on Page { unused1 }`;")
                .unwrap();
        let diagnostics = lint_source(&analysis, &config);
        assert!(diagnostics.iter().all(|d| d.rule != "unused-fields"));
    }

    #[test]
    fn default_severities_apply_without_config() {
        let config = LintConfig::default();
        let analysis =
            analyze_source(Path::new("test.js"), "graphql`fragment f on Page { unused1 }`;")
                .unwrap();
        let diagnostics = lint_source(&analysis, &config);
        assert!(diagnostics
            .iter()
            .any(|d| d.rule == "unused-fields" && d.severity == LintSeverity::Warning));
    }

    #[test]
    fn rule_options_are_forwarded() {
        let yaml = "rules:\n  unused-fields:\n    severity: warning\n    options:\n      edgesAndNodesWhiteListFunctionName: collectConnectionNodes\n";
        let config = LintConfig::from_yaml(yaml).unwrap();
        let source = "graphql`fragment foo on Page {\n  fields {\n    edges {\n      node {\n        id\n      }\n    }\n  }\n}`;\nconst nodes = collectConnectionNodes(data.fields);\nconst ids = nodes.map((node) => node.id);\nconst all = data.fields;";
        let analysis = analyze_source(Path::new("test.js"), source).unwrap();
        let diagnostics = lint_source(&analysis, &config);
        assert!(diagnostics.iter().all(|d| d.rule != "unused-fields"));
    }
}
