//! Explicit, ordered traversal over the syntax tree.
//!
//! [`Visit`] and [`VisitMut`] have one hook per node family. The default
//! implementation of each hook calls the matching `walk_*` function, which
//! visits children left to right in source order. Overriding
//! `visit_function` without calling `walk_function` is how a pass stops at
//! nested function boundaries.

use crate::ast::*;

pub trait Visit {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_function(&mut self, func: &Function) {
        walk_function(self, func);
    }
}

pub fn walk_stmts<V: Visit + ?Sized>(v: &mut V, stmts: &[Stmt]) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_function<V: Visit + ?Sized>(v: &mut V, func: &Function) {
    match &func.body {
        FunctionBody::Block(body) => walk_stmts(v, body),
        FunctionBody::Expression(expr) => v.visit_expr(expr),
    }
}

fn walk_declaration<V: Visit + ?Sized>(v: &mut V, decl: &VariableDeclaration) {
    for declarator in &decl.declarations {
        if let Some(init) = &declarator.init {
            v.visit_expr(init);
        }
    }
}

pub fn walk_stmt<V: Visit + ?Sized>(v: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Expression { expression } => v.visit_expr(expression),
        Stmt::Block { body } => walk_stmts(v, body),
        Stmt::Labeled { body, .. } => v.visit_stmt(body),
        Stmt::Return { argument } => {
            if let Some(arg) = argument {
                v.visit_expr(arg);
            }
        }
        Stmt::If {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_stmt(consequent);
            if let Some(alt) = alternate {
                v.visit_stmt(alt);
            }
        }
        Stmt::While { test, body } => {
            v.visit_expr(test);
            v.visit_stmt(body);
        }
        Stmt::DoWhile { body, test } => {
            v.visit_stmt(body);
            v.visit_expr(test);
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Variable(decl)) => walk_declaration(v, decl),
                Some(ForInit::Expression(expr)) => v.visit_expr(expr),
                None => {}
            }
            if let Some(test) = test {
                v.visit_expr(test);
            }
            if let Some(update) = update {
                v.visit_expr(update);
            }
            v.visit_stmt(body);
        }
        Stmt::Variable(decl) => walk_declaration(v, decl),
        Stmt::FunctionDecl(func) => v.visit_function(func),
        Stmt::Throw { argument } => v.visit_expr(argument),
        Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Empty => {}
    }
}

pub fn walk_expr<V: Visit + ?Sized>(v: &mut V, expr: &Expr) {
    match expr {
        Expr::Literal(_) | Expr::Identifier(_) | Expr::This => {}
        Expr::Array { elements } => {
            for element in elements {
                v.visit_expr(element);
            }
        }
        Expr::Object { properties } => {
            for property in properties {
                v.visit_expr(&property.value);
            }
        }
        Expr::Function(func) => v.visit_function(func),
        Expr::Unary { argument, .. } | Expr::Update { argument, .. } => v.visit_expr(argument),
        Expr::Await { argument } => v.visit_expr(argument),
        Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_expr(consequent);
            v.visit_expr(alternate);
        }
        Expr::Call { callee, arguments } | Expr::New { callee, arguments } => {
            v.visit_expr(callee);
            for arg in arguments {
                v.visit_expr(arg);
            }
        }
        Expr::Member { object, property } => {
            v.visit_expr(object);
            if let MemberProperty::Computed(key) = property {
                v.visit_expr(key);
            }
        }
        Expr::Sequence { expressions } => {
            for e in expressions {
                v.visit_expr(e);
            }
        }
        Expr::Yield { argument, .. } => {
            if let Some(arg) = argument {
                v.visit_expr(arg);
            }
        }
    }
}

pub trait VisitMut {
    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_function_mut(&mut self, func: &mut Function) {
        walk_function_mut(self, func);
    }
}

pub fn walk_stmts_mut<V: VisitMut + ?Sized>(v: &mut V, stmts: &mut [Stmt]) {
    for stmt in stmts {
        v.visit_stmt_mut(stmt);
    }
}

pub fn walk_function_mut<V: VisitMut + ?Sized>(v: &mut V, func: &mut Function) {
    match &mut func.body {
        FunctionBody::Block(body) => walk_stmts_mut(v, body),
        FunctionBody::Expression(expr) => v.visit_expr_mut(expr),
    }
}

fn walk_declaration_mut<V: VisitMut + ?Sized>(v: &mut V, decl: &mut VariableDeclaration) {
    for declarator in &mut decl.declarations {
        if let Some(init) = &mut declarator.init {
            v.visit_expr_mut(init);
        }
    }
}

pub fn walk_stmt_mut<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Expression { expression } => v.visit_expr_mut(expression),
        Stmt::Block { body } => walk_stmts_mut(v, body),
        Stmt::Labeled { body, .. } => v.visit_stmt_mut(body),
        Stmt::Return { argument } => {
            if let Some(arg) = argument {
                v.visit_expr_mut(arg);
            }
        }
        Stmt::If {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr_mut(test);
            v.visit_stmt_mut(consequent);
            if let Some(alt) = alternate {
                v.visit_stmt_mut(alt);
            }
        }
        Stmt::While { test, body } => {
            v.visit_expr_mut(test);
            v.visit_stmt_mut(body);
        }
        Stmt::DoWhile { body, test } => {
            v.visit_stmt_mut(body);
            v.visit_expr_mut(test);
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Variable(decl)) => walk_declaration_mut(v, decl),
                Some(ForInit::Expression(expr)) => v.visit_expr_mut(expr),
                None => {}
            }
            if let Some(test) = test {
                v.visit_expr_mut(test);
            }
            if let Some(update) = update {
                v.visit_expr_mut(update);
            }
            v.visit_stmt_mut(body);
        }
        Stmt::Variable(decl) => walk_declaration_mut(v, decl),
        Stmt::FunctionDecl(func) => v.visit_function_mut(func),
        Stmt::Throw { argument } => v.visit_expr_mut(argument),
        Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Empty => {}
    }
}

pub fn walk_expr_mut<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Literal(_) | Expr::Identifier(_) | Expr::This => {}
        Expr::Array { elements } => {
            for element in elements {
                v.visit_expr_mut(element);
            }
        }
        Expr::Object { properties } => {
            for property in properties {
                v.visit_expr_mut(&mut property.value);
            }
        }
        Expr::Function(func) => v.visit_function_mut(func),
        Expr::Unary { argument, .. } | Expr::Update { argument, .. } => {
            v.visit_expr_mut(argument)
        }
        Expr::Await { argument } => v.visit_expr_mut(argument),
        Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
            v.visit_expr_mut(left);
            v.visit_expr_mut(right);
        }
        Expr::Assign { target, value, .. } => {
            v.visit_expr_mut(target);
            v.visit_expr_mut(value);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr_mut(test);
            v.visit_expr_mut(consequent);
            v.visit_expr_mut(alternate);
        }
        Expr::Call { callee, arguments } | Expr::New { callee, arguments } => {
            v.visit_expr_mut(callee);
            for arg in arguments {
                v.visit_expr_mut(arg);
            }
        }
        Expr::Member { object, property } => {
            v.visit_expr_mut(object);
            if let MemberProperty::Computed(key) = property {
                v.visit_expr_mut(key);
            }
        }
        Expr::Sequence { expressions } => {
            for e in expressions {
                v.visit_expr_mut(e);
            }
        }
        Expr::Yield { argument, .. } => {
            if let Some(arg) = argument {
                v.visit_expr_mut(arg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;
    use crate::ops::BinaryOp;

    struct Identifiers(Vec<String>);

    impl Visit for Identifiers {
        fn visit_expr(&mut self, expr: &Expr) {
            if let Expr::Identifier(name) = expr {
                self.0.push(name.clone());
            }
            walk_expr(self, expr);
        }
    }

    struct ShallowIdentifiers(Vec<String>);

    impl Visit for ShallowIdentifiers {
        fn visit_expr(&mut self, expr: &Expr) {
            if let Expr::Identifier(name) = expr {
                self.0.push(name.clone());
            }
            walk_expr(self, expr);
        }

        fn visit_function(&mut self, _func: &Function) {}
    }

    fn sample() -> Vec<Stmt> {
        vec![
            expr_stmt(binary(BinaryOp::Add, ident("a"), ident("b"))),
            expr_stmt(arrow(&["x"], vec![ret(Some(ident("inner")))])),
            ret(Some(ident("c"))),
        ]
    }

    #[test]
    fn visits_in_source_order() {
        let mut v = Identifiers(Vec::new());
        walk_stmts(&mut v, &sample());
        assert_eq!(v.0, vec!["a", "b", "inner", "c"]);
    }

    #[test]
    fn overriding_visit_function_stops_at_boundary() {
        let mut v = ShallowIdentifiers(Vec::new());
        walk_stmts(&mut v, &sample());
        assert_eq!(v.0, vec!["a", "b", "c"]);
    }

    struct Rename;

    impl VisitMut for Rename {
        fn visit_expr_mut(&mut self, expr: &mut Expr) {
            if let Expr::Identifier(name) = expr {
                name.make_ascii_uppercase();
            }
            walk_expr_mut(self, expr);
        }
    }

    #[test]
    fn visit_mut_rewrites_in_place() {
        let mut stmts = sample();
        walk_stmts_mut(&mut Rename, &mut stmts);
        let mut v = Identifiers(Vec::new());
        walk_stmts(&mut v, &stmts);
        assert_eq!(v.0, vec!["A", "B", "INNER", "C"]);
    }
}
