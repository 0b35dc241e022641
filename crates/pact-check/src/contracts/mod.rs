//! Design-by-contract transformation.
//!
//! Functions state their contracts as labeled statements:
//!
//! ```text
//! function withdraw(account, amount) {
//!   pre: amount > 0, 'amount must be positive';
//!   post: account.balance === old(account.balance) - amount;
//!   account.balance -= amount;
//!   return account;
//! }
//! ```
//!
//! [`transform_program`] turns every such label into plain code:
//! preconditions and assertions become guard clauses in place,
//! postconditions become a checker helper wrapped around every return,
//! and invariants become a helper called on entry and on every exit of the
//! governing block. `old(expr)` inside postconditions and invariants is
//! captured once at function entry.
//!
//! Contracts whose condition folds to a falsy constant are rejected before
//! any code is emitted, as are contracts containing side effects.
//!
//! # Modules
//!
//! - [`config`]: user options and the resolved, immutable [`Settings`]
//! - [`assemble`]: condition flattening, messages and guard clauses
//! - [`verify`]: static evaluation of conditions
//! - [`old`]: `old(expr)` capture
//! - [`materialize`]: checker helpers and return rewriting
//! - [`env`]: environment-labeled blocks
//! - [`names`]: collision-free generated identifiers
//! - [`transform`]: the per-program and per-function passes

pub mod assemble;
pub mod config;
pub mod env;
pub mod error;
pub mod materialize;
pub mod names;
pub mod old;
pub mod transform;
pub mod verify;

use serde::{Deserialize, Serialize};

pub use config::{ActiveEnvironment, ContractNames, ContractOptions, EnvOverride, LabelRole, Settings};
pub use error::{ContractError, SideEffect};
pub use transform::{transform_program, TransformSummary};

/// The four contract keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    /// Checked at function entry, in place.
    Precondition,
    /// Checked against the return value at every exit.
    Postcondition,
    /// Checked on entry to and on every exit from the enclosing block.
    Invariant,
    /// Checked in place, anywhere.
    Assertion,
}

impl ContractKind {
    /// Lower-case singular, as used in failure messages.
    pub fn noun(self) -> &'static str {
        match self {
            ContractKind::Precondition => "precondition",
            ContractKind::Postcondition => "postcondition",
            ContractKind::Invariant => "invariant",
            ContractKind::Assertion => "assertion",
        }
    }

    /// Capitalized plural, as used in static error messages.
    pub fn plural(self) -> &'static str {
        match self {
            ContractKind::Precondition => "Preconditions",
            ContractKind::Postcondition => "Postconditions",
            ContractKind::Invariant => "Invariants",
            ContractKind::Assertion => "Assertions",
        }
    }
}

impl std::fmt::Display for ContractKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun())
    }
}

/// Where a contract sits: its kind and the name of the function that owns
/// it, if the function is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site<'a> {
    pub kind: ContractKind,
    pub function: Option<&'a str>,
}

impl<'a> Site<'a> {
    pub fn new(kind: ContractKind, function: Option<&'a str>) -> Self {
        Site { kind, function }
    }
}
