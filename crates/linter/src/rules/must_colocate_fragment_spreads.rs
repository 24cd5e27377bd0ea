use crate::config::{ConfigError, LintSeverity};
use crate::diagnostics::LintDiagnostic;
use crate::document::{has_preceding_disable_comment, parse_template};
use crate::traits::{LintRule, SourceLintRule};
use apollo_parser::cst::{self, CstNode};
use relay_extract::SourceAnalysis;
use relay_types::OffsetRange;
use serde::Deserialize;

const RULE_NAME: &str = "must-colocate-fragment-spreads";
const QUALIFIED_NAME: &str = "relay/must-colocate-fragment-spreads";

/// Options for the `must-colocate-fragment-spreads` rule
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct MustColocateOptions {
    /// Also match spreads against the local names of named value imports
    /// (`import { someComponent } from '...'`), not only module paths.
    #[serde(default)]
    pub allow_named_imports: bool,
}

impl MustColocateOptions {
    fn from_json(value: Option<&serde_json::Value>) -> Self {
        value
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// Warns about fragment spreads whose owning component module is not
/// imported by the file.
///
/// A spread `...someComponent_prop` expects the spreading file to also
/// import the module that renders the data, per the `<module>_<prop>`
/// fragment naming convention. Spreads resolved by a local fragment
/// definition, or exempted by `@module(...)` or `@relay(mask: false)`,
/// are accepted.
pub struct MustColocateFragmentSpreadsRuleImpl;

impl LintRule for MustColocateFragmentSpreadsRuleImpl {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn description(&self) -> &'static str {
        "Detects fragment spreads not colocated with an import of the defining module"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Warning
    }

    fn validate_options(&self, options: Option<&serde_json::Value>) -> Result<(), ConfigError> {
        if let Some(value) = options {
            serde_json::from_value::<MustColocateOptions>(value.clone()).map_err(|err| {
                ConfigError::InvalidOptions {
                    rule: RULE_NAME.to_string(),
                    message: err.to_string(),
                }
            })?;
        }
        Ok(())
    }
}

impl SourceLintRule for MustColocateFragmentSpreadsRuleImpl {
    fn check(
        &self,
        analysis: &SourceAnalysis,
        options: Option<&serde_json::Value>,
    ) -> Vec<LintDiagnostic> {
        let opts = MustColocateOptions::from_json(options);

        let mut candidate_names: Vec<String> = analysis
            .imported_modules
            .iter()
            .map(|source| module_name_from_path(source))
            .collect();
        if opts.allow_named_imports {
            candidate_names.extend(analysis.named_import_bindings.iter().cloned());
        }
        let candidate_names: Vec<String> = candidate_names
            .into_iter()
            .map(|name| name.to_lowercase())
            .collect();

        let mut spreads = Vec::new();
        let mut local_fragments = Vec::new();
        for template in &analysis.templates {
            let Some(tree) = parse_template(template) else {
                continue;
            };
            collect_template(
                &tree.document(),
                &template.source,
                template,
                &mut spreads,
                &mut local_fragments,
            );
        }

        spreads
            .into_iter()
            .filter(|spread| !local_fragments.contains(&spread.name))
            .filter(|spread| {
                let lowered = spread.name.to_lowercase();
                !candidate_names
                    .iter()
                    .any(|module| lowered.starts_with(module.as_str()))
            })
            .map(|spread| {
                LintDiagnostic::warning(spread.range, missing_import_message(&spread.name), RULE_NAME)
            })
            .collect()
    }
}

fn missing_import_message(fragment: &str) -> String {
    format!(
        "This spreads the fragment `{fragment}` but no module imported by this file appears \
         to define it. A fragment spread should be colocated with the module that uses the \
         data: import that module here, or remove the spread."
    )
}

/// A spread occurrence, in host-file offsets.
struct SpreadSite {
    name: String,
    range: OffsetRange,
}

fn collect_template(
    document: &cst::Document,
    source: &str,
    template: &relay_extract::GraphQLTemplate,
    spreads: &mut Vec<SpreadSite>,
    local_fragments: &mut Vec<String>,
) {
    for definition in document.definitions() {
        match definition {
            cst::Definition::OperationDefinition(op) => {
                // Mutations and subscriptions spread fragments on behalf of
                // other files' responses; they are not colocation sites.
                if op.operation_type().is_some_and(|ty| {
                    ty.mutation_token().is_some() || ty.subscription_token().is_some()
                }) {
                    continue;
                }
                if let Some(selection_set) = op.selection_set() {
                    collect_spreads(&selection_set, source, template, spreads);
                }
            }
            cst::Definition::FragmentDefinition(fragment) => {
                if let Some(name) = fragment.fragment_name().and_then(|f| f.name()) {
                    local_fragments.push(name.text().to_string());
                }
                if let Some(selection_set) = fragment.selection_set() {
                    collect_spreads(&selection_set, source, template, spreads);
                }
            }
            _ => {}
        }
    }
}

fn collect_spreads(
    selection_set: &cst::SelectionSet,
    source: &str,
    template: &relay_extract::GraphQLTemplate,
    out: &mut Vec<SpreadSite>,
) {
    for selection in selection_set.selections() {
        match selection {
            cst::Selection::FragmentSpread(spread) => {
                let Some(name) = spread.fragment_name().and_then(|f| f.name()) else {
                    continue;
                };
                let spread_start: usize = spread.syntax().text_range().start().into();
                if has_preceding_disable_comment(source, spread_start, QUALIFIED_NAME) {
                    continue;
                }
                if is_exempt_spread(&spread) {
                    continue;
                }
                let range = name.syntax().text_range();
                out.push(SpreadSite {
                    name: name.text().to_string(),
                    range: template
                        .file_range(OffsetRange::new(range.start().into(), range.end().into())),
                });
            }
            cst::Selection::Field(field) => {
                if let Some(nested) = field.selection_set() {
                    collect_spreads(&nested, source, template, out);
                }
            }
            cst::Selection::InlineFragment(inline) => {
                if let Some(nested) = inline.selection_set() {
                    collect_spreads(&nested, source, template, out);
                }
            }
        }
    }
}

/// `@module(...)` spreads are resolved by the data layer, and
/// `@relay(mask: false)` spreads inline the data into this file's own
/// response shape. Neither needs a colocated import.
fn is_exempt_spread(spread: &cst::FragmentSpread) -> bool {
    let Some(directives) = spread.directives() else {
        return false;
    };
    directives.directives().any(|directive| {
        let Some(name) = directive.name() else {
            return false;
        };
        if name.text() == "module" {
            return true;
        }
        name.text() == "relay" && has_false_mask_argument(&directive)
    })
}

fn has_false_mask_argument(directive: &cst::Directive) -> bool {
    let Some(arguments) = directive.arguments() else {
        return false;
    };
    arguments.arguments().any(|argument| {
        argument.name().is_some_and(|name| name.text() == "mask")
            && matches!(
                argument.value(),
                Some(cst::Value::BooleanValue(ref value))
                    if matches!(bool::try_from(value), Ok(false))
            )
    })
}

/// Infer the component name an import source refers to: the last path
/// segment, extension stripped, kebab/snake separators camelized.
fn module_name_from_path(source: &str) -> String {
    let segment = source.rsplit('/').next().unwrap_or(source);
    let stem = segment.split('.').next().unwrap_or(segment);
    let mut name = String::with_capacity(stem.len());
    let mut uppercase_next = false;
    for ch in stem.chars() {
        if ch == '-' || ch == '_' {
            uppercase_next = true;
        } else if uppercase_next {
            name.extend(ch.to_uppercase());
            uppercase_next = false;
        } else {
            name.push(ch);
        }
    }
    name
}
