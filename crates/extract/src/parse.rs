//! JS/TS parsing entry point.

use crate::collector::Collector;
use crate::{ExtractError, Result, SourceAnalysis};
use relay_types::Language;
use std::path::Path;
use swc_common::BytePos;
use swc_core::ecma::ast::EsVersion;
use swc_core::ecma::parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_core::ecma::visit::VisitWith;

/// Parse `source` as the language indicated by `path`'s extension and run
/// the analysis pass over it.
///
/// Spans produced by the parser are byte offsets into `source`, so every
/// offset recorded in the returned [`SourceAnalysis`] indexes directly into
/// the original text.
pub fn analyze_source(path: &Path, source: &str) -> Result<SourceAnalysis> {
    let language =
        Language::from_path(path).ok_or_else(|| ExtractError::UnsupportedFileType {
            path: path.to_path_buf(),
        })?;

    let jsx = Language::jsx(path);
    let syntax = match language {
        Language::JavaScript => Syntax::Es(EsSyntax {
            jsx,
            ..EsSyntax::default()
        }),
        Language::TypeScript => Syntax::Typescript(TsSyntax {
            tsx: jsx,
            ..TsSyntax::default()
        }),
    };

    let input = StringInput::new(source, BytePos(0), BytePos(source.len() as u32));
    let lexer = Lexer::new(syntax, EsVersion::latest(), input, None);
    let mut parser = Parser::new_from(lexer);

    let module = parser.parse_module().map_err(|err| ExtractError::Parse {
        path: path.to_path_buf(),
        message: err.kind().msg().to_string(),
    })?;

    // Recovered errors do not abort analysis; the tree is still usable.
    for err in parser.take_errors() {
        tracing::debug!(path = %path.display(), error = %err.kind().msg(), "recovered parse error");
    }

    let mut collector = Collector::default();
    module.visit_with(&mut collector);
    Ok(collector.into_analysis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(source: &str) -> SourceAnalysis {
        analyze_source(Path::new("test.js"), source).unwrap()
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = analyze_source(Path::new("schema.graphql"), "type Query").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFileType { .. }));
    }

    #[test]
    fn rejects_broken_javascript() {
        let err = analyze_source(Path::new("broken.js"), "const = ;").unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
    }

    #[test]
    fn parses_typescript_without_jsx_ambiguity() {
        let analysis =
            analyze_source(Path::new("a.ts"), "const x = <string>someValue; x.field;").unwrap();
        assert!(analysis.is_accessed("field"));
    }

    #[test]
    fn template_offset_points_into_source() {
        let source = "graphql`fragment foo on Page { name }`;";
        let analysis = analyze(source);
        assert_eq!(analysis.templates.len(), 1);
        let template = &analysis.templates[0];
        assert_eq!(
            &source[template.offset..template.offset + template.source.len()],
            template.source
        );
        assert_eq!(template.source, "fragment foo on Page { name }");
    }
}
