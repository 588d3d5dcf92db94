//! Script adapter.
//!
//! Finds calls to the translation function and reads the key from the first
//! argument and the default value from the third:
//!
//! ```js
//! i18next.t("home.title", null, "Welcome");
//! this.i18next.t("home.intro");
//! ```
//!
//! Both arguments must be literals. A call with any other argument is
//! reported and skipped.

use std::collections::HashSet;

use swc_common::SourceMap;
use swc_ecma_ast::{CallExpr, Callee, Expr, ExprOrSpread, Lit, MemberProp};
use swc_ecma_visit::{Visit, VisitWith};

use crate::{
    config::Config,
    core::{SourceLocation, TranslationObservation, parsers::script::ParsedScript},
    issues::NonLiteralArgumentIssue,
};

use super::Extraction;

/// Strip wrappers that do not change a literal's value.
fn unwrap_paren(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_paren(&paren.expr),
        Expr::TsAs(ts_as) => unwrap_paren(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_paren(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_paren(&ts_sat.expr),
        _ => expr,
    }
}

/// Dotted path of a callee (`i18next.t`, `this.i18n.tr`), if it is a plain
/// chain of identifiers.
pub fn callee_path(expr: &Expr) -> Option<String> {
    match unwrap_paren(expr) {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::This(_) => Some("this".to_string()),
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            let object = callee_path(&member.obj)?;
            Some(format!("{}.{}", object, prop.sym))
        }
        _ => None,
    }
}

/// Reads a string from a literal argument.
///
/// Returns `None` for anything that is not a literal, `Some(None)` for `null`.
fn literal_string(arg: &ExprOrSpread) -> Option<Option<String>> {
    if arg.spread.is_some() {
        return None;
    }
    match unwrap_paren(&arg.expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|v| Some(v.to_string())),
        Expr::Lit(Lit::Null(_)) => Some(None),
        Expr::Lit(Lit::Num(n)) => Some(Some(n.value.to_string())),
        Expr::Lit(Lit::Bool(b)) => Some(Some(b.value.to_string())),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|quasi| quasi.cooked.as_ref())
            .and_then(|cooked| cooked.as_str())
            .map(|v| Some(v.to_string())),
        _ => None,
    }
}

/// Which callees count as translation calls.
#[derive(Debug, Clone)]
pub struct ScriptExtractor {
    function_name: String,
    names: HashSet<String>,
}

impl ScriptExtractor {
    pub fn new(config: &Config) -> Self {
        let function_name = config.i18n_function_name.clone();
        let mut names = HashSet::new();
        names.insert(function_name.clone());
        names.insert(format!("this.{}", function_name));
        names.extend(config.function_aliases.iter().cloned());
        Self {
            function_name,
            names,
        }
    }

    pub fn matches(&self, callee: &str) -> bool {
        self.names.contains(callee)
    }
}

struct CallVisitor<'a> {
    extractor: &'a ScriptExtractor,
    source_map: &'a SourceMap,
    document: &'a str,
    extraction: Extraction,
}

impl CallVisitor<'_> {
    fn location(&self, node: &CallExpr) -> SourceLocation {
        let loc = self.source_map.lookup_char_pos(node.span.lo);
        SourceLocation::new(self.document, loc.line, loc.col_display + 1)
    }

    fn handle_call(&mut self, node: &CallExpr) {
        let Some(key_arg) = node.args.first() else {
            return;
        };

        let key = literal_string(key_arg).flatten();
        let value = match node.args.get(2) {
            Some(arg) => literal_string(arg),
            None => Some(None),
        };

        match (key, value) {
            (Some(key), Some(value)) => {
                let location = self.location(node);
                self.extraction
                    .observations
                    .push(TranslationObservation::new(key, value, location));
            }
            _ => {
                let location = self.location(node);
                self.extraction.issues.push(
                    NonLiteralArgumentIssue {
                        function: self.extractor.function_name.clone(),
                        location,
                    }
                    .into(),
                );
            }
        }
    }
}

impl Visit for CallVisitor<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(expr) = &node.callee
            && let Some(path) = callee_path(expr)
            && self.extractor.matches(&path)
        {
            self.handle_call(node);
        }
        node.visit_children_with(self);
    }
}

/// Extract observations from a parsed script, in source order.
pub fn extract_script(document: &str, parsed: &ParsedScript, extractor: &ScriptExtractor) -> Extraction {
    let mut visitor = CallVisitor {
        extractor,
        source_map: &parsed.source_map,
        document,
        extraction: Extraction::default(),
    };
    parsed.program.visit_with(&mut visitor);
    visitor.extraction
}
