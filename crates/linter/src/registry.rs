/// Registry of all available lint rules
use crate::rules::{
    GraphQLSyntaxRuleImpl, MustColocateFragmentSpreadsRuleImpl, UnusedFieldsRuleImpl,
};
use crate::traits::SourceLintRule;
use std::sync::{Arc, LazyLock};

/// Lazily initialized source rules.
/// Rules are created once and reused across all calls.
static SOURCE_RULES: LazyLock<Vec<Arc<dyn SourceLintRule>>> = LazyLock::new(|| {
    vec![
        Arc::new(GraphQLSyntaxRuleImpl),
        Arc::new(MustColocateFragmentSpreadsRuleImpl),
        Arc::new(UnusedFieldsRuleImpl),
    ]
});

#[must_use]
pub fn source_rules() -> &'static [Arc<dyn SourceLintRule>] {
    &SOURCE_RULES
}

#[must_use]
pub fn rule_by_name(name: &str) -> Option<&'static Arc<dyn SourceLintRule>> {
    source_rules().iter().find(|rule| rule.name() == name)
}

#[must_use]
pub fn all_rule_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = source_rules().iter().map(|rule| rule.name()).collect();
    names.sort_unstable();
    names
}
