//! `old(expr)` capture.
//!
//! Inside postconditions and invariants, `old(expr)` means "the value `expr`
//! had when the function was entered". Each distinct `expr` is bound once,
//! to a fresh constant declared at the top of the function body, and every
//! `old(expr)` with the same printed shape is replaced by that constant.

use indexmap::IndexMap;
use pact_core::ast::{Expr, Function, Stmt};
use pact_core::builder::const_decl;
use pact_core::print_expr;
use pact_core::visit::{walk_expr_mut, VisitMut};

use super::names::NameGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct OldBinding {
    pub name: String,
    pub init: Expr,
}

/// The `old` bindings of one function, in capture order.
#[derive(Debug, Clone, Default)]
pub struct OldCaptures {
    bindings: IndexMap<String, OldBinding>,
}

impl OldCaptures {
    pub fn new() -> Self {
        OldCaptures::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> impl Iterator<Item = &OldBinding> {
        self.bindings.values()
    }

    /// Replaces every `marker(expr)` call in `expr` with a captured
    /// constant. Returns the number of calls replaced.
    ///
    /// Only calls with exactly one argument are captured; the caller is
    /// responsible for skipping this entirely when `marker` is shadowed.
    pub fn rewrite(&mut self, expr: &mut Expr, marker: &str, names: &mut NameGenerator) -> usize {
        let mut rewriter = OldRewriter {
            captures: self,
            marker,
            names,
            replaced: 0,
        };
        rewriter.visit_expr_mut(expr);
        rewriter.replaced
    }

    /// `const <name> = <expr>;` for every binding, in capture order.
    pub fn into_declarations(self) -> Vec<Stmt> {
        self.bindings
            .into_values()
            .map(|binding| const_decl(&binding.name, binding.init))
            .collect()
    }
}

struct OldRewriter<'a> {
    captures: &'a mut OldCaptures,
    marker: &'a str,
    names: &'a mut NameGenerator,
    replaced: usize,
}

impl OldRewriter<'_> {
    fn capture(&mut self, argument: Expr) -> String {
        let shape = print_expr(&argument);
        if let Some(existing) = self.captures.bindings.get(&shape) {
            return existing.name.clone();
        }
        let name = self.names.generate_for(&argument);
        self.captures.bindings.insert(
            shape,
            OldBinding {
                name: name.clone(),
                init: argument,
            },
        );
        name
    }
}

impl VisitMut for OldRewriter<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let Expr::Call { callee, arguments } = expr {
            if callee.as_identifier() == Some(self.marker) && arguments.len() == 1 {
                let argument = arguments.pop().unwrap_or_default();
                let name = self.capture(argument);
                *expr = Expr::Identifier(name);
                self.replaced += 1;
                return;
            }
        }
        walk_expr_mut(self, expr);
    }

    fn visit_function_mut(&mut self, _func: &mut Function) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_core::builder::*;
    use pact_core::ops::BinaryOp;
    use pact_core::{print_expr, print_stmt};

    fn price() -> Expr {
        member(ident("input"), "price")
    }

    #[test]
    fn captures_and_deduplicates_by_shape() {
        let mut first = binary(
            BinaryOp::StrictEq,
            member(ident("it"), "price"),
            binary(BinaryOp::Add, call(ident("old"), vec![price()]), num(5.0)),
        );
        let mut second = binary(
            BinaryOp::Gt,
            member(ident("it"), "price"),
            call(ident("old"), vec![price()]),
        );
        let mut names = NameGenerator::default();
        let mut captures = OldCaptures::new();
        let replaced = captures.rewrite(&mut first, "old", &mut names)
            + captures.rewrite(&mut second, "old", &mut names);
        assert_eq!(replaced, 2);
        assert_eq!(captures.len(), 1);
        assert_eq!(print_expr(&first), "it.price === _inputPrice + 5");
        assert_eq!(print_expr(&second), "it.price > _inputPrice");
        let decls = captures.into_declarations();
        assert_eq!(decls.len(), 1);
        assert_eq!(print_stmt(&decls[0]), "const _inputPrice = input.price;");
    }

    #[test]
    fn distinct_expressions_get_distinct_bindings() {
        let mut body = binary(
            BinaryOp::Lt,
            call(ident("old"), vec![ident("a")]),
            call(ident("old"), vec![member(ident("b"), "length")]),
        );
        let mut names = NameGenerator::default();
        let mut captures = OldCaptures::new();
        captures.rewrite(&mut body, "old", &mut names);
        let names: Vec<_> = captures.bindings().map(|b| b.name.clone()).collect();
        assert_eq!(names, vec!["_a", "_bLength"]);
    }

    #[test]
    fn other_arities_and_markers_are_left_alone() {
        let original = logical_pair();
        let mut body = original.clone();
        let mut names = NameGenerator::default();
        let mut captures = OldCaptures::new();
        assert_eq!(captures.rewrite(&mut body, "old", &mut names), 0);
        assert_eq!(body, original);
        assert!(captures.is_empty());
    }

    #[test]
    fn custom_marker() {
        let mut body = call(ident("before"), vec![ident("count")]);
        let mut names = NameGenerator::default();
        let mut captures = OldCaptures::new();
        assert_eq!(captures.rewrite(&mut body, "before", &mut names), 1);
        assert_eq!(body, ident("_count"));
    }

    fn logical_pair() -> Expr {
        binary(
            BinaryOp::Add,
            call(ident("old"), vec![]),
            call(ident("old"), vec![ident("a"), ident("b")]),
        )
    }
}
