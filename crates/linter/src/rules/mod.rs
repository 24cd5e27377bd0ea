//! Lint rule implementations.

mod graphql_syntax;
mod must_colocate_fragment_spreads;
mod unused_fields;

pub use graphql_syntax::GraphQLSyntaxRuleImpl;
pub use must_colocate_fragment_spreads::{
    MustColocateFragmentSpreadsRuleImpl, MustColocateOptions,
};
pub use unused_fields::{UnusedFieldsOptions, UnusedFieldsRuleImpl};
