//! The per-file analysis accumulator.

use relay_types::OffsetRange;
use std::collections::{HashMap, HashSet};

/// One `graphql` tagged template literal found in a source file.
#[derive(Debug, Clone)]
pub struct GraphQLTemplate {
    /// The raw template text, exactly as written between the backticks.
    ///
    /// The raw (not cooked) text is kept so that byte offsets inside the
    /// parsed GraphQL document line up with the original source.
    pub source: String,
    /// Byte offset of the start of the template text in the host file.
    pub offset: usize,
}

impl GraphQLTemplate {
    /// Map a range inside the template text into host-file coordinates.
    #[must_use]
    pub const fn file_range(&self, local: OffsetRange) -> OffsetRange {
        local.offset_by(self.offset)
    }
}

/// Everything one visitor pass learns about a single JS/TS file.
///
/// Built incrementally during traversal, consumed by the lint rules once
/// traversal is complete, then discarded. Rules never mutate it.
#[derive(Debug, Default)]
pub struct SourceAnalysis {
    /// Embedded `graphql` templates, in source order.
    pub templates: Vec<GraphQLTemplate>,
    /// Every identifier used as a property/field name anywhere in the file:
    /// member access, optional chaining, destructuring keys, and the
    /// `getByPath`/`dotAccess` path-accessor call forms.
    pub accessed_names: HashSet<String>,
    /// For every direct `name(...)` call, the argument names that resolve
    /// statically (identifier, `.prop`, or `?.prop`). Keyed by callee name.
    /// The allow-list resolver looks up the configured helper here.
    pub call_arguments: HashMap<String, Vec<String>>,
    /// Module sources of value imports, `require(...)` calls, and dynamic
    /// `import(...)` calls with a literal argument.
    pub imported_modules: Vec<String>,
    /// Local binding names introduced by named value imports
    /// (`import { Foo } from ...`). Only consulted when the colocation
    /// rule runs with `allowNamedImports`.
    pub named_import_bindings: Vec<String>,
}

impl SourceAnalysis {
    /// Whether `name` was dereferenced anywhere in the file.
    #[must_use]
    pub fn is_accessed(&self, name: &str) -> bool {
        self.accessed_names.contains(name)
    }
}
