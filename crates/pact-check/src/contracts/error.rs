//! Static contract errors.
//!
//! Any of these aborts the transformation of the whole unit; no partially
//! rewritten tree is ever handed back.

use serde::Serialize;
use thiserror::Error;

use super::ContractKind;

/// A construct that may not appear inside a contract body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SideEffect {
    Declaration,
    FunctionDeclaration,
    Return,
    Assignment,
    Update,
    Function,
    Yield,
    Await,
}

impl std::fmt::Display for SideEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SideEffect::Declaration => "variable declaration",
            SideEffect::FunctionDeclaration => "function declaration",
            SideEffect::Return => "return statement",
            SideEffect::Assignment => "assignment",
            SideEffect::Update => "update expression",
            SideEffect::Function => "function expression",
            SideEffect::Yield => "yield",
            SideEffect::Await => "await",
        };
        f.write_str(text)
    }
}

/// Errors raised while transforming contracts.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum ContractError {
    /// A condition folds to a falsy constant, so the guard could never
    /// pass.
    #[error("Contract always fails: {condition}")]
    AlwaysFails {
        kind: ContractKind,
        /// The function owning the contract, when it has a name.
        function: Option<String>,
        /// The condition as printed source.
        condition: String,
    },

    /// A contract body contains a declaration, assignment, update,
    /// function, yield, await or return.
    #[error("{} cannot have side effects (found {construct})", .kind.plural())]
    SideEffect {
        kind: ContractKind,
        function: Option<String>,
        construct: SideEffect,
    },

    /// A block-form contract contains a statement that is not an
    /// expression statement.
    #[error("{} may only contain expressions (found {statement})", .kind.plural())]
    UnsupportedStatement {
        kind: ContractKind,
        function: Option<String>,
        statement: &'static str,
    },
}

impl ContractError {
    /// The kind of contract that was rejected.
    pub fn kind(&self) -> ContractKind {
        match self {
            ContractError::AlwaysFails { kind, .. }
            | ContractError::SideEffect { kind, .. }
            | ContractError::UnsupportedStatement { kind, .. } => *kind,
        }
    }

    pub fn function(&self) -> Option<&str> {
        match self {
            ContractError::AlwaysFails { function, .. }
            | ContractError::SideEffect { function, .. }
            | ContractError::UnsupportedStatement { function, .. } => function.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_effect_message_names_the_kind() {
        let err = ContractError::SideEffect {
            kind: ContractKind::Postcondition,
            function: Some("demo".into()),
            construct: SideEffect::Declaration,
        };
        assert_eq!(
            err.to_string(),
            "Postconditions cannot have side effects (found variable declaration)"
        );
        assert_eq!(err.kind(), ContractKind::Postcondition);
        assert_eq!(err.function(), Some("demo"));
    }

    #[test]
    fn always_fails_message() {
        let err = ContractError::AlwaysFails {
            kind: ContractKind::Precondition,
            function: None,
            condition: "1 > 2".into(),
        };
        assert_eq!(err.to_string(), "Contract always fails: 1 > 2");
    }
}
