//! Shared helpers for working with embedded GraphQL documents.

use apollo_parser::SyntaxTree;
use relay_extract::GraphQLTemplate;

/// Parse one embedded template's GraphQL text.
///
/// Returns `None` when the document has syntax errors: broken templates are
/// the `graphql-syntax` rule's concern and the correlation rules skip them.
#[must_use]
pub fn parse_template(template: &GraphQLTemplate) -> Option<SyntaxTree> {
    let tree = apollo_parser::Parser::new(&template.source).parse();
    if tree.errors().next().is_some() {
        tracing::debug!(offset = template.offset, "skipping template with syntax errors");
        return None;
    }
    Some(tree)
}

/// Check for a suppression comment on the line immediately preceding
/// `node_start` (a byte offset into `source`).
///
/// The directive must be a GraphQL line comment whose text is exactly
/// `eslint-disable-next-line <qualified-rule-name>`, e.g.
/// `# eslint-disable-next-line relay/unused-fields`.
#[must_use]
pub fn has_preceding_disable_comment(source: &str, node_start: usize, qualified_name: &str) -> bool {
    let node_start = node_start.min(source.len());
    let line_start = source[..node_start].rfind('\n').map_or(0, |i| i + 1);
    if line_start == 0 {
        return false;
    }
    let prev_line_start = source[..line_start - 1].rfind('\n').map_or(0, |i| i + 1);
    let prev_line = source[prev_line_start..line_start - 1].trim();

    let Some(comment) = prev_line.strip_prefix('#') else {
        return false;
    };
    let mut parts = comment.trim().split_whitespace();
    parts.next() == Some("eslint-disable-next-line")
        && parts.next() == Some(qualified_name)
        && parts.next().is_none()
}
