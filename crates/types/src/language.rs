//! Source language detection.

use std::path::Path;

/// Source language of a file (determines parsing strategy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// JavaScript (.js, .jsx, .mjs, .cjs)
    JavaScript,
    /// TypeScript (.ts, .tsx, .mts, .cts)
    TypeScript,
}

impl Language {
    /// Detect language from a file path based on its extension.
    ///
    /// Returns `None` for files relay-lint does not analyze.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    /// Whether JSX/TSX syntax should be enabled for this path.
    ///
    /// Plain `.ts` files must not be parsed with TSX enabled: `<T>expr`
    /// type assertions are ambiguous with JSX elements.
    #[must_use]
    pub fn jsx(path: &Path) -> bool {
        !matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("ts" | "mts" | "cts")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_javascript_and_typescript() {
        assert_eq!(
            Language::from_path(Path::new("a/b.jsx")),
            Some(Language::JavaScript)
        );
        assert_eq!(
            Language::from_path(Path::new("c.tsx")),
            Some(Language::TypeScript)
        );
        assert_eq!(Language::from_path(Path::new("schema.graphql")), None);
        assert_eq!(Language::from_path(Path::new("README")), None);
    }

    #[test]
    fn jsx_disabled_for_plain_ts() {
        assert!(!Language::jsx(Path::new("a.ts")));
        assert!(Language::jsx(Path::new("a.tsx")));
        assert!(Language::jsx(Path::new("a.jsx")));
        assert!(Language::jsx(Path::new("a.js")));
    }
}
