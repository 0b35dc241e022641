//! Syntax tree, operator semantics and printing for pact.
//!
//! This crate is the frontend/backend surface the contract transformation
//! consumes: a serde-serializable tree ([`ast`]), the primitive semantics of
//! its operators ([`literal`], [`ops`]), ordered traversal ([`visit`]),
//! binding lookups ([`scope`]), and a precedence-aware [`printer`].

pub mod ast;
pub mod builder;
pub mod error;
pub mod literal;
pub mod ops;
pub mod printer;
pub mod scope;
pub mod visit;

// Re-export commonly used types
pub use ast::{Expr, Function, FunctionBody, MemberProperty, Program, Stmt};
pub use error::CoreError;
pub use literal::Literal;
pub use printer::{print_expr, print_program, print_stmt};
