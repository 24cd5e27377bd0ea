use crate::config::{ConfigError, LintSeverity};
use crate::diagnostics::LintDiagnostic;
use crate::document::{has_preceding_disable_comment, parse_template};
use crate::traits::{LintRule, SourceLintRule};
use apollo_parser::cst::{self, CstNode};
use relay_extract::SourceAnalysis;
use relay_types::OffsetRange;
use serde::Deserialize;
use std::collections::HashSet;

const RULE_NAME: &str = "unused-fields";
const QUALIFIED_NAME: &str = "relay/unused-fields";

/// Options for the `unused-fields` rule
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UnusedFieldsOptions {
    /// Name of a trusted connection-helper function. Calls to it consume a
    /// connection field's `edges`/`node` wrappers on the caller's behalf,
    /// exempting those wrapper fields. Absent means no exemption applies.
    pub edges_and_nodes_white_list_function_name: Option<String>,
}

impl UnusedFieldsOptions {
    fn from_json(value: Option<&serde_json::Value>) -> Self {
        value
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// Warns about queried GraphQL fields the file never reads.
///
/// Every field queried by an embedded `graphql` template is correlated
/// against the property names the surrounding code dereferences; fields
/// with no matching access are reported, subject to the pagination-metadata
/// and connection-helper exemptions.
pub struct UnusedFieldsRuleImpl;

impl LintRule for UnusedFieldsRuleImpl {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Detects queried GraphQL fields that the file does not use"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Warning
    }

    fn validate_options(&self, options: Option<&serde_json::Value>) -> Result<(), ConfigError> {
        if let Some(value) = options {
            serde_json::from_value::<UnusedFieldsOptions>(value.clone()).map_err(|err| {
                ConfigError::InvalidOptions {
                    rule: RULE_NAME.to_string(),
                    message: err.to_string(),
                }
            })?;
        }
        Ok(())
    }
}

impl SourceLintRule for UnusedFieldsRuleImpl {
    fn check(
        &self,
        analysis: &SourceAnalysis,
        options: Option<&serde_json::Value>,
    ) -> Vec<LintDiagnostic> {
        let opts = UnusedFieldsOptions::from_json(options);
        let helper_arguments: &[String] = opts
            .edges_and_nodes_white_list_function_name
            .as_ref()
            .and_then(|name| analysis.call_arguments.get(name))
            .map_or(&[], Vec::as_slice);

        let mut diagnostics = Vec::new();
        for template in &analysis.templates {
            let Some(tree) = parse_template(template) else {
                continue;
            };
            let extraction = extract_queried_fields(&tree.document(), &template.source);

            // A call to the helper whose argument names this template's
            // connection field exempts the generic edges/node wrappers.
            let connection_exempt = helper_arguments
                .iter()
                .any(|argument| extraction.edges_parents.contains(argument));

            for field in &extraction.fields {
                if is_page_info_field(&field.name) {
                    continue;
                }
                // Unused __typename is a deliberate existence-only probe.
                if field.name == "__typename" {
                    continue;
                }
                if connection_exempt && (field.name == "edges" || field.name == "node") {
                    continue;
                }
                if analysis.is_accessed(&field.name) {
                    continue;
                }
                diagnostics.push(LintDiagnostic::warning(
                    template.file_range(field.range),
                    unused_field_message(&field.name),
                    RULE_NAME,
                ));
            }
        }
        diagnostics
    }
}

fn unused_field_message(field: &str) -> String {
    format!(
        "This queries for the field `{field}` but this file does not seem to use it directly. \
         If a different file needs this information that file should export a fragment and \
         colocate the query for the data with the usage.\n\
         If only interested in the existence of a record, __typename can be used without \
         this warning."
    )
}

/// A queried field's effective name (alias if present) and the location of
/// the token it was named by, in template-local offsets.
struct QueriedField {
    name: String,
    range: OffsetRange,
}

#[derive(Default)]
struct FieldExtraction {
    /// Queried fields in first-seen order, unique by effective name.
    fields: Vec<QueriedField>,
    /// Raw names of fields whose immediate selections contain `edges`.
    edges_parents: HashSet<String>,
}

impl FieldExtraction {
    /// Ordinary mapping semantics: a duplicate effective name keeps its
    /// original position but takes the last occurrence's location.
    fn record(&mut self, name: String, range: OffsetRange) {
        if let Some(existing) = self.fields.iter_mut().find(|field| field.name == name) {
            existing.range = range;
        } else {
            self.fields.push(QueriedField { name, range });
        }
    }
}

/// Walk one parsed document and produce the queried-field set plus the
/// connection parents.
fn extract_queried_fields(document: &cst::Document, source: &str) -> FieldExtraction {
    let mut extraction = FieldExtraction::default();
    for definition in document.definitions() {
        match definition {
            cst::Definition::OperationDefinition(op) => {
                // Mutation and subscription roots are never candidates, and
                // a suppressed operation contributes nothing.
                if is_mutation_or_subscription(&op) {
                    continue;
                }
                let op_start: usize = op.syntax().text_range().start().into();
                if has_preceding_disable_comment(source, op_start, QUALIFIED_NAME) {
                    continue;
                }
                if let Some(selection_set) = op.selection_set() {
                    // Operation root fields are re-exported through response
                    // helpers: traversed for nesting, never recorded.
                    for selection in selection_set.selections() {
                        collect_selection(&selection, source, true, &mut extraction);
                    }
                }
            }
            cst::Definition::FragmentDefinition(fragment) => {
                if let Some(selection_set) = fragment.selection_set() {
                    collect_selection_set(&selection_set, source, &mut extraction);
                }
            }
            _ => {}
        }
    }
    extraction
}

fn collect_selection_set(
    selection_set: &cst::SelectionSet,
    source: &str,
    out: &mut FieldExtraction,
) {
    for selection in selection_set.selections() {
        collect_selection(&selection, source, false, out);
    }
}

fn collect_selection(
    selection: &cst::Selection,
    source: &str,
    at_operation_root: bool,
    out: &mut FieldExtraction,
) {
    match selection {
        cst::Selection::Field(field) => {
            if !at_operation_root {
                let field_start: usize = field.syntax().text_range().start().into();
                // Suppression covers the whole subtree.
                if has_preceding_disable_comment(source, field_start, QUALIFIED_NAME) {
                    return;
                }
                let name_node = field
                    .alias()
                    .and_then(|alias| alias.name())
                    .or_else(|| field.name());
                if let Some(name) = name_node {
                    out.record(name.text().to_string(), node_range(name.syntax()));
                }
                if let (Some(name), Some(selection_set)) = (field.name(), field.selection_set()) {
                    if contains_edges(&selection_set) {
                        out.edges_parents.insert(name.text().to_string());
                    }
                }
            }
            if let Some(nested) = field.selection_set() {
                collect_selection_set(&nested, source, out);
            }
        }
        cst::Selection::InlineFragment(inline) => {
            if let Some(nested) = inline.selection_set() {
                collect_selection_set(&nested, source, out);
            }
        }
        // Spread names are not fields; the colocation rule owns them.
        cst::Selection::FragmentSpread(_) => {}
    }
}

fn is_mutation_or_subscription(op: &cst::OperationDefinition) -> bool {
    // Shorthand operations (bare selection set) are queries.
    op.operation_type()
        .is_some_and(|ty| ty.mutation_token().is_some() || ty.subscription_token().is_some())
}

fn contains_edges(selection_set: &cst::SelectionSet) -> bool {
    selection_set.selections().any(|selection| match selection {
        cst::Selection::Field(field) => field.name().is_some_and(|name| name.text() == "edges"),
        cst::Selection::FragmentSpread(spread) => spread
            .fragment_name()
            .and_then(|name| name.name())
            .is_some_and(|name| name.text() == "edges"),
        cst::Selection::InlineFragment(_) => false,
    })
}

fn node_range(node: &apollo_parser::SyntaxNode) -> OffsetRange {
    let range = node.text_range();
    OffsetRange::new(range.start().into(), range.end().into())
}

/// Pagination metadata, exempt in both Facebook and OSS spellings.
fn is_page_info_field(field: &str) -> bool {
    matches!(
        field,
        "pageInfo"
            | "page_info"
            | "hasNextPage"
            | "has_next_page"
            | "hasPreviousPage"
            | "has_previous_page"
            | "startCursor"
            | "start_cursor"
            | "endCursor"
            | "end_cursor"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_extract::analyze_source;
    use std::path::Path;

    fn check(source: &str) -> Vec<LintDiagnostic> {
        check_with_options(source, None)
    }

    fn check_with_options(source: &str, options: Option<serde_json::Value>) -> Vec<LintDiagnostic> {
        let analysis = analyze_source(Path::new("test.js"), source).unwrap();
        UnusedFieldsRuleImpl.check(&analysis, options.as_ref())
    }

    fn helper_options() -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "edgesAndNodesWhiteListFunctionName": "collectConnectionNodes"
        }))
    }

    fn reported_fields(diagnostics: &[LintDiagnostic]) -> Vec<&str> {
        diagnostics
            .iter()
            .map(|d| {
                let start = d.message.find('`').unwrap() + 1;
                let end = d.message[start..].find('`').unwrap() + start;
                &d.message[start..end]
            })
            .collect()
    }

    #[test]
    fn used_field_is_not_reported() {
        let diagnostics = check("graphql`fragment foo on Page { name2 }`;\nprops.page.name;\nfoo.name2;");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unused_field_is_reported() {
        let source = "graphql`\n  fragment Test on Page {\n    name\n    name2\n  }\n`;\nprops.page.name;";
        let diagnostics = check(source);
        assert_eq!(reported_fields(&diagnostics), ["name2"]);
        // anchored at the field's own location
        let range = diagnostics[0].range;
        assert_eq!(&source[range.start..range.end], "name2");
    }

    #[test]
    fn multiple_unused_fields_each_reported() {
        let diagnostics = check("graphql`fragment Test on Page { unused1, unused2 }`;");
        assert_eq!(reported_fields(&diagnostics), ["unused1", "unused2"]);
    }

    #[test]
    fn typename_is_never_reported() {
        assert!(check("graphql`fragment foo on Page { __typename }`;").is_empty());
    }

    #[test]
    fn template_with_syntax_error_is_skipped() {
        assert!(check("graphql`fragment Test { name2 }`;").is_empty());
    }

    #[test]
    fn alias_is_the_effective_name() {
        let diagnostics = check(
            "graphql`fragment Test on InternalTask {\n  owner: task_owner {\n    name: full_name\n  }\n}`;\nnode.owner.name;",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn fragment_spread_names_are_not_fields() {
        assert!(check("graphql`fragment Test on Page { ...Other_x }`;").is_empty());
    }

    #[test]
    fn mutation_root_fields_are_not_candidates() {
        assert!(check("graphql`mutation { page_unlike(data: $input) }`;").is_empty());
    }

    #[test]
    fn subscription_root_fields_are_not_candidates() {
        assert!(check("graphql`subscription { page_updated { __typename } }`;").is_empty());
    }

    #[test]
    fn query_root_fields_ignored_but_nested_fields_checked() {
        let diagnostics = check("graphql`query Root { viewer { unusedNested } }`;");
        assert_eq!(reported_fields(&diagnostics), ["unusedNested"]);
    }

    #[test]
    fn page_info_fields_facebook_naming_exempt() {
        let source = "graphql`\n  fragment foo on Page {\n    page_info {\n      has_next_page\n      has_previous_page\n      end_cursor\n      start_cursor\n    }\n  }\n`;";
        assert!(check(source).is_empty());
    }

    #[test]
    fn page_info_fields_oss_naming_exempt() {
        let source = "graphql`\n  fragment foo on Page {\n    pageInfo {\n      hasNextPage\n      hasPreviousPage\n      endCursor\n      startCursor\n    }\n  }\n`;";
        assert!(check(source).is_empty());
    }

    #[test]
    fn disable_comment_suppresses_field() {
        let source = "graphql`fragment foo on Page {\n  # eslint-disable-next-line relay/unused-fields\n  name\n}`;";
        assert!(check(source).is_empty());
    }

    #[test]
    fn disable_comment_suppresses_only_that_field() {
        let source = "graphql`fragment foo on Page {\n  # eslint-disable-next-line relay/unused-fields\n  name\n  other\n}`;";
        assert_eq!(reported_fields(&check(source)), ["other"]);
    }

    #[test]
    fn get_by_path_satisfies_usage() {
        let diagnostics = check(
            "graphql`fragment Test on Page { unused1, used1, used2 }`;\nalert(getByPath(obj, ['foo', 'used1', 'used2']))",
        );
        assert_eq!(reported_fields(&diagnostics), ["unused1"]);
    }

    #[test]
    fn optional_chaining_satisfies_usage() {
        let diagnostics = check(
            "graphql`fragment Test on Page { unused1, used1, used2 }`;\nobj?.foo?.used1?.used2;",
        );
        assert_eq!(reported_fields(&diagnostics), ["unused1"]);
    }

    #[test]
    fn dot_access_satisfies_usage() {
        let diagnostics = check(
            "graphql`fragment Test on Page { unused1, used1, used2 }`;\nalert(dotAccess(obj, 'foo.used1.used2'))",
        );
        assert_eq!(reported_fields(&diagnostics), ["unused1"]);
    }

    #[test]
    fn destructuring_keys_satisfy_usage() {
        let diagnostics = check(
            "graphql`fragment Test on Page {\n  unused1\n  unused2\n  used1\n  used2\n  used3\n  used4\n}`;\nvar { used1: unused1, used2: {used3} } = node;\nfunction test({used4}) {\n  return x;\n}",
        );
        assert_eq!(reported_fields(&diagnostics), ["unused1", "unused2"]);
    }

    #[test]
    fn connection_helper_exempts_edges_and_node() {
        let source = "graphql`fragment foo on Page {\n  fields {\n    edges {\n      node {\n        __typename\n        id\n      }\n    }\n  }\n}`;\nconst nodes = collectConnectionNodes(data.fields);\nconst ids = nodes.map((node) => node.id);";
        assert!(check_with_options(source, helper_options()).is_empty());
    }

    #[test]
    fn connection_helper_applies_per_template() {
        let source = "graphql`fragment foo on Page {\n  fields {\n    edges {\n      node {\n        id\n      }\n    }\n  }\n}`;\ngraphql`fragment bar on Page {\n  items {\n    edges {\n      node {\n        id\n      }\n    }\n  }\n}`;\nconst nodes = collectConnectionNodes(data.fields);\nconst ids = nodes.map((node) => node.id);\nconst otherNodes = collectConnectionNodes(data.items);\nconst otherIds = otherNodes.map((node) => node.id);";
        assert!(check_with_options(source, helper_options()).is_empty());
    }

    #[test]
    fn optional_chained_helper_argument_resolves() {
        let source = "graphql`fragment foo on Page {\n  fields {\n    __id\n    edges {\n      node {\n        id\n      }\n    }\n  }\n}`;\nconst nodes = collectConnectionNodes(data?.fields);\nconst firstNode = nodes[0].id;\nconst connectionId = data.fields.__id;";
        assert!(check_with_options(source, helper_options()).is_empty());
    }

    #[test]
    fn destructured_helper_argument_resolves() {
        let source = "graphql`fragment foo on Page {\n  fields {\n    __id\n    edges {\n      node {\n        id\n      }\n    }\n  }\n}`;\nconst { fields } = data;\nconst nodes = collectConnectionNodes(fields);\nconst firstNode = nodes[0].id;\nconst connectionId = fields.__id;";
        assert!(check_with_options(source, helper_options()).is_empty());
    }

    #[test]
    fn helper_on_nested_query_connection_resolves() {
        let source = "graphql`query fields($id: ID!) {\n  node(id: $id) {\n    fields {\n      __id\n      edges {\n        node {\n          id\n        }\n      }\n    }\n  }\n}`;\nconst nodes = collectConnectionNodes(data.node.fields);\nconst firstNode = nodes[0].id;\nconst connectionId = data.fields.__id;";
        assert!(check_with_options(source, helper_options()).is_empty());
    }

    #[test]
    fn unconfigured_helper_does_not_exempt() {
        let source = "graphql`fragment foo on Page {\n  fields {\n    edges {\n      node {\n        __typename\n        id\n      }\n    }\n  }\n}`;\nconst nodes = filterSomeData(data.fields);\nconst ids = nodes.map((node) => node.id);";
        assert_eq!(reported_fields(&check(source)), ["edges", "node"]);
    }

    #[test]
    fn misspelled_helper_does_not_exempt() {
        let source = "graphql`fragment foo on Page {\n  fields {\n    edges {\n      node {\n        __typename\n        id\n      }\n    }\n  }\n}`;\nconst nodes = collectConnectionNodes_TYPO(data.fields);\nconst ids = nodes.map((node) => node.id);";
        assert_eq!(
            reported_fields(&check_with_options(source, helper_options())),
            ["edges", "node"]
        );
    }

    #[test]
    fn helper_does_not_excuse_non_connection_fields() {
        let source = "graphql`fragment foo on Page {\n  fields {\n    name\n  }\n}`;\nconst nodes = collectConnectionNodes(data.fields);\nconst ids = nodes.map((node) => node.id);";
        assert_eq!(
            reported_fields(&check_with_options(source, helper_options())),
            ["name"]
        );
    }

    #[test]
    fn helper_argument_must_name_the_connection_field() {
        let source = "graphql`fragment foo on Page {\n  fields {\n    name\n  }\n}`;\nconst nodes = collectConnectionNodes(data.unrelatedData);";
        assert_eq!(
            reported_fields(&check_with_options(source, helper_options())),
            ["fields", "name"]
        );
    }

    #[test]
    fn templates_inside_get_configs_are_exempt() {
        let source = "class C {\n  getConfigs() {\n    return graphql`fragment foo on Page { reflective }`;\n  }\n}";
        assert!(check(source).is_empty());
    }

    #[test]
    fn duplicate_alias_keeps_last_location() {
        let source = "graphql`fragment foo on Page { a: one a: two }`;";
        let diagnostics = check(source);
        assert_eq!(reported_fields(&diagnostics), ["a"]);
        let range = diagnostics[0].range;
        let last_alias = source.rfind("a:").unwrap();
        assert_eq!(range.start, last_alias);
    }

    #[test]
    fn detector_is_deterministic() {
        let source = "graphql`fragment Test on Page { z, a, m }`;";
        let first = check(source);
        let second = check(source);
        assert_eq!(first, second);
        assert_eq!(reported_fields(&first), ["z", "a", "m"]);
    }
}
