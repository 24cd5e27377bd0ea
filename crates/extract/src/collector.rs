//! The single visitor pass that feeds a [`SourceAnalysis`].
//!
//! Four independent producers feed the usage set: plain member access,
//! optional member access (reached through the same visitor hook),
//! destructuring-pattern keys, and the two whitelisted dynamic-path
//! accessor call forms. Order is traversal order; the set is idempotent so
//! ordering has no effect on results.

use crate::analysis::{GraphQLTemplate, SourceAnalysis};
use swc_core::ecma::ast as js;
use swc_core::ecma::visit::{Visit, VisitWith};

/// Tag identifier that marks an embedded GraphQL template.
const GRAPHQL_TAG: &str = "graphql";

/// `getByPath(thing, ['field', 'nestedField'])` records each path segment.
const GET_BY_PATH: &str = "getByPath";

/// `dotAccess(thing, 'field.nestedField')` records each dot-separated segment.
const DOT_ACCESS: &str = "dotAccess";

/// Method name whose body consumes queried fields reflectively; templates
/// inside it cannot be statically correlated and are not registered.
const GET_CONFIGS_METHOD: &str = "getConfigs";

#[derive(Default)]
pub(crate) struct Collector {
    analysis: SourceAnalysis,
    /// Names of the enclosing class methods, innermost last.
    method_stack: Vec<String>,
}

impl Collector {
    pub(crate) fn into_analysis(self) -> SourceAnalysis {
        self.analysis
    }

    fn record_access(&mut self, name: &str) {
        self.analysis.accessed_names.insert(name.to_string());
    }

    fn visit_get_by_path_call(&mut self, call: &js::CallExpr) {
        let Some(arg) = call.args.get(1) else { return };
        let js::Expr::Array(array) = &*arg.expr else {
            return;
        };
        for element in array.elems.iter().flatten() {
            if let Some(segment) = string_literal(&element.expr) {
                self.record_access(segment);
            }
        }
    }

    fn visit_dot_access_call(&mut self, call: &js::CallExpr) {
        let Some(arg) = call.args.get(1) else { return };
        let Some(path) = string_literal(&arg.expr) else {
            return;
        };
        for segment in path.split('.') {
            self.record_access(segment);
        }
    }

    /// Retain, per callee, the argument names that resolve statically.
    /// The allow-list resolver later looks up the configured helper here;
    /// unresolvable argument shapes contribute nothing.
    fn record_call_arguments(&mut self, callee: &str, call: &js::CallExpr) {
        let resolved: Vec<String> = call
            .args
            .iter()
            .filter_map(|arg| resolve_argument_name(&arg.expr))
            .collect();
        if !resolved.is_empty() {
            self.analysis
                .call_arguments
                .entry(callee.to_string())
                .or_default()
                .extend(resolved);
        }
    }

    fn record_require_call(&mut self, call: &js::CallExpr) {
        if let Some(arg) = call.args.first() {
            if let Some(source) = string_literal(&arg.expr) {
                self.analysis.imported_modules.push(source.to_string());
            }
        }
    }
}

impl Visit for Collector {
    fn visit_member_expr(&mut self, n: &js::MemberExpr) {
        if let js::MemberProp::Ident(prop) = &n.prop {
            self.record_access(prop.sym.as_ref());
        }
        n.visit_children_with(self);
    }

    fn visit_object_pat(&mut self, n: &js::ObjectPat) {
        for prop in &n.props {
            match prop {
                // `{ aliased: local }` records the source key, not the
                // local rebinding; computed keys cannot be resolved.
                js::ObjectPatProp::KeyValue(kv) => match &kv.key {
                    js::PropName::Ident(ident) => self.record_access(ident.sym.as_ref()),
                    js::PropName::Str(s) => {
                        if let Some(key) = s.value.as_str() {
                            self.record_access(key);
                        }
                    }
                    _ => {}
                },
                js::ObjectPatProp::Assign(assign) => {
                    self.record_access(assign.key.id.sym.as_ref());
                }
                js::ObjectPatProp::Rest(_) => {}
            }
        }
        n.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, n: &js::CallExpr) {
        match &n.callee {
            js::Callee::Expr(callee) => {
                if let js::Expr::Ident(ident) = &**callee {
                    match ident.sym.as_ref() {
                        GET_BY_PATH => self.visit_get_by_path_call(n),
                        DOT_ACCESS => self.visit_dot_access_call(n),
                        "require" => self.record_require_call(n),
                        _ => {}
                    }
                    self.record_call_arguments(ident.sym.as_ref(), n);
                }
            }
            // Dynamic `import(...)` with a literal source counts as an
            // imported module; non-literal sources are ignored.
            js::Callee::Import(_) => self.record_require_call(n),
            js::Callee::Super(_) => {}
        }
        n.visit_children_with(self);
    }

    fn visit_tagged_tpl(&mut self, n: &js::TaggedTpl) {
        let inside_get_configs = self
            .method_stack
            .last()
            .is_some_and(|name| name == GET_CONFIGS_METHOD);
        if !inside_get_configs {
            if let Some(template) = graphql_template(n) {
                self.analysis.templates.push(template);
            }
        }
        n.visit_children_with(self);
    }

    fn visit_class_method(&mut self, n: &js::ClassMethod) {
        let name = prop_name(&n.key);
        if let Some(name) = &name {
            self.method_stack.push(name.clone());
        }
        n.visit_children_with(self);
        if name.is_some() {
            self.method_stack.pop();
        }
    }

    fn visit_import_decl(&mut self, n: &js::ImportDecl) {
        if !n.type_only {
            self.analysis
                .imported_modules
                .push(n.src.value.to_string_lossy().into_owned());
            for specifier in &n.specifiers {
                if let js::ImportSpecifier::Named(named) = specifier {
                    if !named.is_type_only {
                        self.analysis
                            .named_import_bindings
                            .push(named.local.sym.to_string());
                    }
                }
            }
        }
        n.visit_children_with(self);
    }
}

/// Recognize `graphql`-tagged single-quasi templates.
fn graphql_template(n: &js::TaggedTpl) -> Option<GraphQLTemplate> {
    let tag = n.tag.as_ident()?;
    if tag.sym.as_ref() != GRAPHQL_TAG || n.tpl.quasis.len() != 1 {
        return None;
    }
    let quasi = &n.tpl.quasis[0];
    Some(GraphQLTemplate {
        source: quasi.raw.to_string(),
        offset: quasi.span.lo.0 as usize,
    })
}

fn string_literal(expr: &js::Expr) -> Option<&str> {
    match expr {
        // Non-UTF-8 literals (lone surrogates) cannot name a GraphQL field.
        js::Expr::Lit(js::Lit::Str(s)) => s.value.as_str(),
        _ => None,
    }
}

fn prop_name(key: &js::PropName) -> Option<String> {
    match key {
        js::PropName::Ident(ident) => Some(ident.sym.to_string()),
        js::PropName::Str(s) => Some(s.value.to_string_lossy().into_owned()),
        _ => None,
    }
}

/// Best-effort resolution of a call argument to the field name it consumes:
/// a bare identifier, the property of a member access, or the property of
/// an optional-chained member access. Anything else resolves to nothing.
fn resolve_argument_name(expr: &js::Expr) -> Option<String> {
    match expr {
        js::Expr::Ident(ident) => Some(ident.sym.to_string()),
        js::Expr::Member(member) => match &member.prop {
            js::MemberProp::Ident(prop) => Some(prop.sym.to_string()),
            _ => None,
        },
        js::Expr::OptChain(chain) => match &*chain.base {
            js::OptChainBase::Member(member) => match &member.prop {
                js::MemberProp::Ident(prop) => Some(prop.sym.to_string()),
                _ => None,
            },
            js::OptChainBase::Call(_) => None,
        },
        _ => None,
    }
}
