//! Checker helpers and return rewriting.
//!
//! Postconditions and invariants are checked through a helper
//!
//! ```text
//! const _demoPostcondition = (it) => {
//!   if (!(it > 0)) {
//!     throw new Error('...');
//!   }
//!   return it;
//! };
//! ```
//!
//! which every `return e;` in the governing block is routed through, as
//! `return _demoPostcondition(e);`. Nested functions are never entered:
//! their returns belong to them.

use pact_core::ast::{Expr, Function, Stmt};
use pact_core::builder::{arrow, call, const_decl, expr_stmt, ident, ret, undefined};
use pact_core::visit::{walk_stmt_mut, walk_stmts_mut, VisitMut};

/// A synthesized checker: a name and the guards it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerHelper {
    pub name: String,
    pub guards: Vec<Stmt>,
}

impl CheckerHelper {
    pub fn new(name: String, guards: Vec<Stmt>) -> Self {
        CheckerHelper { name, guards }
    }

    /// `const <name> = (<param>) => { guards; return <param>; };`
    pub fn declaration(&self, param: &str) -> Stmt {
        let mut body = self.guards.clone();
        body.push(ret(Some(ident(param))));
        const_decl(&self.name, arrow(&[param], body))
    }

    /// `<name>(argument)`, or `<name>()` for a bare check.
    pub fn call(&self, argument: Option<Expr>) -> Expr {
        call(ident(&self.name), argument.into_iter().collect())
    }

    /// `<name>();`
    pub fn check(&self) -> Stmt {
        expr_stmt(self.call(None))
    }
}

/// Routes every `return` in `stmts`, outside nested functions, through
/// `helper`. A bare `return;` becomes `return helper(undefined);`.
///
/// Returns the number of return statements rewritten.
pub fn rewrite_returns(stmts: &mut [Stmt], helper: &CheckerHelper) -> usize {
    let mut rewriter = ReturnRewriter { helper, count: 0 };
    walk_stmts_mut(&mut rewriter, stmts);
    rewriter.count
}

struct ReturnRewriter<'a> {
    helper: &'a CheckerHelper,
    count: usize,
}

impl VisitMut for ReturnRewriter<'_> {
    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        if let Stmt::Return { argument } = stmt {
            let value = argument.take().unwrap_or_else(undefined);
            *argument = Some(self.helper.call(Some(value)));
            self.count += 1;
            return;
        }
        walk_stmt_mut(self, stmt);
    }

    // Expressions cannot contain statements except through functions.
    fn visit_expr_mut(&mut self, _expr: &mut Expr) {}

    fn visit_function_mut(&mut self, _func: &mut Function) {}
}

/// Appends `helper();` unless the list already ends in a return.
///
/// Returns whether a check was appended.
pub fn append_exit_check(stmts: &mut Vec<Stmt>, helper: &CheckerHelper) -> bool {
    if stmts.last().is_some_and(Stmt::is_return) {
        return false;
    }
    stmts.push(helper.check());
    true
}

/// Wires an invariant helper into its governing block: the declaration
/// first, an entry check second, every return routed through the helper,
/// and a trailing check if control can fall off the end.
///
/// Returns the number of return statements rewritten.
pub fn attach_invariant(stmts: &mut Vec<Stmt>, helper: &CheckerHelper, param: &str) -> usize {
    stmts.insert(0, helper.declaration(param));
    stmts.insert(1, helper.check());
    let rewritten = rewrite_returns(stmts, helper);
    append_exit_check(stmts, helper);
    rewritten
}
