//! Binding lookups over the syntax tree.
//!
//! Scoping is approximated at function granularity: a name declared anywhere
//! in a function body (outside nested functions) counts as bound for the
//! whole function, together with its parameters. This over-approximates
//! block scoping, which is the safe direction for shadow detection.

use std::collections::HashSet;

use crate::ast::*;
use crate::visit::{walk_expr, walk_stmt, walk_stmts, Visit};

/// Names bound directly by a list of statements: `var`/`let`/`const`
/// declarators and function declaration names, at any depth except inside
/// nested functions.
pub fn declared_names(stmts: &[Stmt]) -> HashSet<String> {
    let mut collector = Declarations::default();
    walk_stmts(&mut collector, stmts);
    collector.names
}

/// Every name bound inside `func`'s own scope: its parameters, its own name
/// and its body's declarations. A declaration's name really lives in the
/// enclosing scope, where it is visible as well.
pub fn function_scope(func: &Function) -> HashSet<String> {
    let mut names: HashSet<String> = func.params.iter().cloned().collect();
    if let Some(id) = &func.id {
        names.insert(id.clone());
    }
    if let Some(body) = func.block() {
        names.extend(declared_names(body));
    }
    names
}

#[derive(Default)]
struct Declarations {
    names: HashSet<String>,
}

impl Visit for Declarations {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Variable(decl) => {
                self.names
                    .extend(decl.declarations.iter().map(|d| d.name.clone()));
            }
            Stmt::For {
                init: Some(ForInit::Variable(decl)),
                ..
            } => {
                self.names
                    .extend(decl.declarations.iter().map(|d| d.name.clone()));
            }
            Stmt::FunctionDecl(func) => {
                if let Some(id) = &func.id {
                    self.names.insert(id.clone());
                }
                // The body belongs to the nested function's own scope.
                return;
            }
            _ => {}
        }
        walk_stmt(self, stmt);
    }

    fn visit_function(&mut self, _func: &Function) {}
}

/// Every identifier-like name that appears anywhere in the program:
/// references, declarations, parameters, function names, labels and
/// property names. Generated names must avoid all of them.
pub fn all_names(program: &Program) -> HashSet<String> {
    let mut collector = AllNames::default();
    walk_stmts(&mut collector, &program.body);
    collector.names
}

#[derive(Default)]
struct AllNames {
    names: HashSet<String>,
}

impl Visit for AllNames {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Variable(decl)
            | Stmt::For {
                init: Some(ForInit::Variable(decl)),
                ..
            } => {
                self.names
                    .extend(decl.declarations.iter().map(|d| d.name.clone()));
            }
            Stmt::Labeled { label, .. } => {
                self.names.insert(label.clone());
            }
            _ => {}
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifier(name) => {
                self.names.insert(name.clone());
            }
            Expr::Member {
                property: MemberProperty::Named(name),
                ..
            } => {
                self.names.insert(name.clone());
            }
            _ => {}
        }
        walk_expr(self, expr);
    }

    fn visit_function(&mut self, func: &Function) {
        if let Some(id) = &func.id {
            self.names.insert(id.clone());
        }
        self.names.extend(func.params.iter().cloned());
        crate::visit::walk_function(self, func);
    }
}

/// A stack of lexical scopes, innermost last.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<HashSet<String>>,
}

impl ScopeStack {
    /// Starts a stack whose outermost frame is the program's top level.
    pub fn for_program(program: &Program) -> Self {
        ScopeStack {
            frames: vec![declared_names(&program.body)],
        }
    }

    pub fn push(&mut self, names: HashSet<String>) {
        self.frames.push(names);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Whether `name` is bound in any enclosing scope.
    pub fn is_bound(&self, name: &str) -> bool {
        self.frames.iter().any(|frame| frame.contains(name))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
