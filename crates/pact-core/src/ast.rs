//! Syntax tree for the scripting language.
//!
//! The tree is a pair of tagged unions, [`Stmt`] and [`Expr`], plus
//! [`Function`] and [`Program`]. It is the interchange format between a
//! parser, the contract transformation, and the printer: every type derives
//! serde so a frontend can hand over a unit as JSON.
//!
//! A tree owns its nodes. Code that moves a node to a new position either
//! takes it out of its old slot (`std::mem::take`/`replace`) or clones it;
//! nothing is shared between two positions.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::literal::Literal;
use crate::ops::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp, VarKind};

/// A whole compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program { body }
    }

    /// Decodes a unit from its JSON interchange form.
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Finds a top-level function declaration by name.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.body.iter().find_map(|stmt| match stmt {
            Stmt::FunctionDecl(func) if func.id.as_deref() == Some(name) => Some(func),
            _ => None,
        })
    }

    /// Like [`Program::function`], but a missing function is an error.
    pub fn require_function(&self, name: &str) -> Result<&Function, CoreError> {
        self.function(name).ok_or_else(|| CoreError::FunctionNotFound {
            name: name.to_string(),
        })
    }
}

/// A function declaration, function expression, or arrow function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub id: Option<String>,
    #[serde(default)]
    pub params: Vec<String>,
    pub body: FunctionBody,
    #[serde(default)]
    pub is_arrow: bool,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_generator: bool,
}

impl Function {
    /// Statements of a block body; `None` for an arrow function with an
    /// expression body.
    pub fn block(&self) -> Option<&Vec<Stmt>> {
        match &self.body {
            FunctionBody::Block(body) => Some(body),
            FunctionBody::Expression(_) => None,
        }
    }

    pub fn block_mut(&mut self) -> Option<&mut Vec<Stmt>> {
        match &mut self.body {
            FunctionBody::Block(body) => Some(body),
            FunctionBody::Expression(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    /// Body of a naked arrow function: `(x) => x + 1`.
    Expression(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub kind: VarKind,
    pub declarations: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    Variable(VariableDeclaration),
    Expression(Expr),
}

/// Statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expression {
        expression: Expr,
    },
    Block {
        body: Vec<Stmt>,
    },
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
    Return {
        argument: Option<Expr>,
    },
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        test: Expr,
    },
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    Variable(VariableDeclaration),
    FunctionDecl(Function),
    Throw {
        argument: Expr,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
    Empty,
}

impl Default for Stmt {
    fn default() -> Self {
        Stmt::Empty
    }
}

impl Stmt {
    /// Short node-kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Expression { .. } => "expression statement",
            Stmt::Block { .. } => "block",
            Stmt::Labeled { .. } => "labeled statement",
            Stmt::Return { .. } => "return statement",
            Stmt::If { .. } => "if statement",
            Stmt::While { .. } => "while loop",
            Stmt::DoWhile { .. } => "do-while loop",
            Stmt::For { .. } => "for loop",
            Stmt::Variable(_) => "variable declaration",
            Stmt::FunctionDecl(_) => "function declaration",
            Stmt::Throw { .. } => "throw statement",
            Stmt::Break { .. } => "break statement",
            Stmt::Continue { .. } => "continue statement",
            Stmt::Empty => "empty statement",
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Stmt::Return { .. })
    }

    /// The label of a labeled statement.
    pub fn label(&self) -> Option<&str> {
        match self {
            Stmt::Labeled { label, .. } => Some(label),
            _ => None,
        }
    }
}

/// A property of an object literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: Expr,
}

/// The right-hand side of a member access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberProperty {
    /// `object.name`
    Named(String),
    /// `object[expr]`
    Computed(Box<Expr>),
}

/// Expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    Identifier(String),
    This,
    Array {
        elements: Vec<Expr>,
    },
    Object {
        properties: Vec<Property>,
    },
    Function(Box<Function>),
    Unary {
        op: UnaryOp,
        argument: Box<Expr>,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        argument: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    New {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: MemberProperty,
    },
    Sequence {
        expressions: Vec<Expr>,
    },
    Yield {
        argument: Option<Box<Expr>>,
        delegate: bool,
    },
    Await {
        argument: Box<Expr>,
    },
}

impl Default for Expr {
    fn default() -> Self {
        Expr::Literal(Literal::Undefined)
    }
}

impl Expr {
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Expr::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;

    #[test]
    fn finds_top_level_function_by_name() {
        let program = Program::new(vec![
            expr_stmt(ident("setup")),
            function_decl("demo", &["input"], vec![ret(Some(ident("input")))]),
        ]);
        assert!(program.function("demo").is_some());
        assert!(program.function("setup").is_none());
        assert!(matches!(
            program.require_function("missing"),
            Err(CoreError::FunctionNotFound { .. })
        ));
    }

    #[test]
    fn label_accessor() {
        let stmt = labeled("pre", expr_stmt(ident("x")));
        assert_eq!(stmt.label(), Some("pre"));
        assert_eq!(Stmt::Empty.label(), None);
    }

    #[test]
    fn tree_survives_json_roundtrip() {
        let program = Program::new(vec![function_decl(
            "demo",
            &["input"],
            vec![
                labeled(
                    "pre",
                    block(vec![expr_stmt(binary(
                        BinaryOp::Gt,
                        member(ident("input"), "length"),
                        num(0.0),
                    ))]),
                ),
                ret(Some(ident("input"))),
            ],
        )]);
        let json = program.to_json_pretty().unwrap();
        let back = Program::from_json(&json).unwrap();
        assert_eq!(back, program);
        assert!(Program::from_json("{\"body\": 3}").is_err());
    }
}
