//! Terse constructors for syntax tree nodes.
//!
//! Used by the contract transformation to synthesize guards and helpers, and
//! by tests to write trees without a parser.

use crate::ast::*;
use crate::literal::Literal;
use crate::ops::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp, VarKind};

pub fn ident(name: &str) -> Expr {
    Expr::Identifier(name.to_string())
}

pub fn num(value: f64) -> Expr {
    Expr::Literal(Literal::Number(value))
}

pub fn str_lit(value: &str) -> Expr {
    Expr::Literal(Literal::String(value.to_string()))
}

pub fn bool_lit(value: bool) -> Expr {
    Expr::Literal(Literal::Bool(value))
}

pub fn null() -> Expr {
    Expr::Literal(Literal::Null)
}

pub fn undefined() -> Expr {
    Expr::Literal(Literal::Undefined)
}

pub fn member(object: Expr, name: &str) -> Expr {
    Expr::Member {
        object: Box::new(object),
        property: MemberProperty::Named(name.to_string()),
    }
}

pub fn index(object: Expr, key: Expr) -> Expr {
    Expr::Member {
        object: Box::new(object),
        property: MemberProperty::Computed(Box::new(key)),
    }
}

pub fn call(callee: Expr, arguments: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        arguments,
    }
}

pub fn new_expr(callee: Expr, arguments: Vec<Expr>) -> Expr {
    Expr::New {
        callee: Box::new(callee),
        arguments,
    }
}

pub fn unary(op: UnaryOp, argument: Expr) -> Expr {
    Expr::Unary {
        op,
        argument: Box::new(argument),
    }
}

pub fn not(argument: Expr) -> Expr {
    unary(UnaryOp::Not, argument)
}

pub fn type_of(argument: Expr) -> Expr {
    unary(UnaryOp::TypeOf, argument)
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
    Expr::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn assign(op: AssignOp, target: Expr, value: Expr) -> Expr {
    Expr::Assign {
        op,
        target: Box::new(target),
        value: Box::new(value),
    }
}

pub fn update(op: UpdateOp, prefix: bool, argument: Expr) -> Expr {
    Expr::Update {
        op,
        prefix,
        argument: Box::new(argument),
    }
}

pub fn conditional(test: Expr, consequent: Expr, alternate: Expr) -> Expr {
    Expr::Conditional {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    }
}

pub fn seq(expressions: Vec<Expr>) -> Expr {
    Expr::Sequence { expressions }
}

pub fn array(elements: Vec<Expr>) -> Expr {
    Expr::Array { elements }
}

pub fn object(properties: Vec<(&str, Expr)>) -> Expr {
    Expr::Object {
        properties: properties
            .into_iter()
            .map(|(key, value)| Property {
                key: key.to_string(),
                value,
            })
            .collect(),
    }
}

fn params(names: &[&str]) -> Vec<String> {
    names.iter().map(|p| p.to_string()).collect()
}

/// `(params) => { body }`
pub fn arrow(names: &[&str], body: Vec<Stmt>) -> Expr {
    Expr::Function(Box::new(Function {
        id: None,
        params: params(names),
        body: FunctionBody::Block(body),
        is_arrow: true,
        is_async: false,
        is_generator: false,
    }))
}

/// `(params) => expression`
pub fn arrow_expr(names: &[&str], body: Expr) -> Expr {
    Expr::Function(Box::new(Function {
        id: None,
        params: params(names),
        body: FunctionBody::Expression(Box::new(body)),
        is_arrow: true,
        is_async: false,
        is_generator: false,
    }))
}

/// `function name?(params) { body }` in expression position.
pub fn function_expr(name: Option<&str>, names: &[&str], body: Vec<Stmt>) -> Expr {
    Expr::Function(Box::new(Function {
        id: name.map(str::to_string),
        params: params(names),
        body: FunctionBody::Block(body),
        is_arrow: false,
        is_async: false,
        is_generator: false,
    }))
}

pub fn function_decl(name: &str, names: &[&str], body: Vec<Stmt>) -> Stmt {
    Stmt::FunctionDecl(Function {
        id: Some(name.to_string()),
        params: params(names),
        body: FunctionBody::Block(body),
        is_arrow: false,
        is_async: false,
        is_generator: false,
    })
}

pub fn expr_stmt(expression: Expr) -> Stmt {
    Stmt::Expression { expression }
}

pub fn block(body: Vec<Stmt>) -> Stmt {
    Stmt::Block { body }
}

pub fn labeled(label: &str, body: Stmt) -> Stmt {
    Stmt::Labeled {
        label: label.to_string(),
        body: Box::new(body),
    }
}

pub fn ret(argument: Option<Expr>) -> Stmt {
    Stmt::Return { argument }
}

pub fn if_stmt(test: Expr, consequent: Stmt, alternate: Option<Stmt>) -> Stmt {
    Stmt::If {
        test,
        consequent: Box::new(consequent),
        alternate: alternate.map(Box::new),
    }
}

pub fn while_stmt(test: Expr, body: Stmt) -> Stmt {
    Stmt::While {
        test,
        body: Box::new(body),
    }
}

pub fn for_stmt(init: Option<ForInit>, test: Option<Expr>, update: Option<Expr>, body: Stmt) -> Stmt {
    Stmt::For {
        init,
        test,
        update,
        body: Box::new(body),
    }
}

pub fn declaration(kind: VarKind, name: &str, init: Option<Expr>) -> VariableDeclaration {
    VariableDeclaration {
        kind,
        declarations: vec![Declarator {
            name: name.to_string(),
            init,
        }],
    }
}

pub fn var_decl(kind: VarKind, name: &str, init: Option<Expr>) -> Stmt {
    Stmt::Variable(declaration(kind, name, init))
}

pub fn const_decl(name: &str, init: Expr) -> Stmt {
    var_decl(VarKind::Const, name, Some(init))
}

pub fn let_decl(name: &str, init: Expr) -> Stmt {
    var_decl(VarKind::Let, name, Some(init))
}

pub fn throw(argument: Expr) -> Stmt {
    Stmt::Throw { argument }
}
