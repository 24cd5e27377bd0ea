//! Per-file JavaScript/TypeScript source analysis.
//!
//! One call to [`analyze_source`] parses a JS/TS file with swc and runs a
//! single visitor pass over the owned AST, producing a [`SourceAnalysis`]:
//! the embedded `graphql` tagged templates, the set of property names the
//! code dereferences, call-site facts for the allow-list resolver, and
//! import facts for the fragment colocation rule.
//!
//! The analysis is created fresh per file and carries no state across files.

mod analysis;
mod collector;
mod error;
mod parse;

pub use analysis::{GraphQLTemplate, SourceAnalysis};
pub use error::{ExtractError, Result};
pub use parse::analyze_source;

// Re-export foundation types for convenience
pub use relay_types::{Language, OffsetRange};
