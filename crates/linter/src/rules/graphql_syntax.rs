use crate::config::LintSeverity;
use crate::diagnostics::LintDiagnostic;
use crate::traits::{LintRule, SourceLintRule};
use apollo_parser::Parser;
use relay_extract::SourceAnalysis;
use relay_types::OffsetRange;

const RULE_NAME: &str = "graphql-syntax";

/// Reports GraphQL syntax errors in embedded templates.
///
/// The other rules silently skip templates that fail to parse; this rule
/// surfaces the parse errors themselves so a broken template is not
/// invisibly unchecked.
pub struct GraphQLSyntaxRuleImpl;

impl LintRule for GraphQLSyntaxRuleImpl {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Detects GraphQL syntax errors in embedded templates"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Error
    }
}

impl SourceLintRule for GraphQLSyntaxRuleImpl {
    fn check(
        &self,
        analysis: &SourceAnalysis,
        _options: Option<&serde_json::Value>,
    ) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();
        for template in &analysis.templates {
            let tree = Parser::new(&template.source).parse();
            for error in tree.errors() {
                let start = error.index();
                let len = error.data().len().max(1);
                diagnostics.push(LintDiagnostic::error(
                    template.file_range(OffsetRange::new(start, start + len)),
                    format!("GraphQL syntax error: {}", error.message()),
                    RULE_NAME,
                ));
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_extract::analyze_source;
    use std::path::Path;

    fn check(source: &str) -> Vec<LintDiagnostic> {
        let analysis = analyze_source(Path::new("test.js"), source).unwrap();
        GraphQLSyntaxRuleImpl.check(&analysis, None)
    }

    #[test]
    fn valid_template_has_no_errors() {
        assert!(check("graphql`fragment foo on Page { name }`;").is_empty());
    }

    #[test]
    fn broken_template_reports_error() {
        let diagnostics = check("graphql`fragment foo on { name }`;");
        assert!(!diagnostics.is_empty());
        assert!(diagnostics
            .iter()
            .all(|d| d.severity == LintSeverity::Error && d.rule == RULE_NAME));
    }

    #[test]
    fn error_range_is_anchored_in_host_file() {
        let source = "const x = 1;\ngraphql`fragment foo on { name }`;";
        let template_offset = source.find('`').unwrap() + 1;
        let diagnostics = check(source);
        assert!(diagnostics.iter().all(|d| d.range.start >= template_offset));
    }

    #[test]
    fn non_template_source_has_no_errors() {
        assert!(check("const x = someOtherTag`not graphql`;").is_empty());
    }
}
