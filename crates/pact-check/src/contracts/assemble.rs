//! Turning a contract body into guard clauses.
//!
//! A contract body is either a single expression statement or a block of
//! them. Each expression is one condition; a two-element sequence
//! `condition, message` carries a custom failure message. Every condition
//! becomes
//!
//! ```text
//! if (!condition) {
//!   throw new Error(message);
//! }
//! ```
//!
//! in source order.

use pact_core::ast::{Expr, Function, Stmt};
use pact_core::builder::{block, ident, new_expr, not, str_lit, throw};
use pact_core::print_expr;
use pact_core::visit::{walk_expr, walk_stmt, Visit};

use super::error::{ContractError, SideEffect};
use super::verify::{verify, Verdict};
use super::{ContractKind, Site};

/// One condition of a contract, with its custom message if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionEntry {
    pub condition: Expr,
    pub message: Option<Expr>,
}

/// Rejects bodies containing declarations, assignments, updates, functions,
/// yields, awaits or returns.
pub fn check_side_effects(site: Site<'_>, body: &Stmt) -> Result<(), ContractError> {
    let mut scan = SideEffectScan { found: None };
    scan.visit_stmt(body);
    match scan.found {
        Some(construct) => Err(ContractError::SideEffect {
            kind: site.kind,
            function: site.function.map(str::to_string),
            construct,
        }),
        None => Ok(()),
    }
}

struct SideEffectScan {
    found: Option<SideEffect>,
}

impl Visit for SideEffectScan {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        if self.found.is_some() {
            return;
        }
        match stmt {
            Stmt::Variable(_) => self.found = Some(SideEffect::Declaration),
            Stmt::FunctionDecl(_) => self.found = Some(SideEffect::FunctionDeclaration),
            Stmt::Return { .. } => self.found = Some(SideEffect::Return),
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if self.found.is_some() {
            return;
        }
        match expr {
            Expr::Assign { .. } => self.found = Some(SideEffect::Assignment),
            Expr::Update { .. } => self.found = Some(SideEffect::Update),
            Expr::Yield { .. } => self.found = Some(SideEffect::Yield),
            Expr::Await { .. } => self.found = Some(SideEffect::Await),
            _ => walk_expr(self, expr),
        }
    }

    fn visit_function(&mut self, _func: &Function) {
        if self.found.is_none() {
            self.found = Some(SideEffect::Function);
        }
    }
}

/// Flattens a contract body into its conditions, in source order.
///
/// Nested blocks are flattened and empty statements skipped; any other
/// statement kind is an error.
pub fn condition_entries(site: Site<'_>, body: Stmt) -> Result<Vec<ConditionEntry>, ContractError> {
    let mut entries = Vec::new();
    flatten(site, body, &mut entries)?;
    Ok(entries)
}

fn flatten(site: Site<'_>, stmt: Stmt, entries: &mut Vec<ConditionEntry>) -> Result<(), ContractError> {
    match stmt {
        Stmt::Expression { expression } => {
            entries.push(split_message(expression));
            Ok(())
        }
        Stmt::Block { body } => {
            for inner in body {
                flatten(site, inner, entries)?;
            }
            Ok(())
        }
        Stmt::Empty => Ok(()),
        other => Err(ContractError::UnsupportedStatement {
            kind: site.kind,
            function: site.function.map(str::to_string),
            statement: other.kind_name(),
        }),
    }
}

impl ConditionEntry {
    /// Fills in the default message from the condition as it reads now.
    pub fn with_default_message(self, site: Site<'_>) -> ConditionEntry {
        match self.message {
            Some(_) => self,
            None => {
                let message = str_lit(&default_message(site, &self.condition));
                ConditionEntry {
                    condition: self.condition,
                    message: Some(message),
                }
            }
        }
    }
}

fn split_message(expression: Expr) -> ConditionEntry {
    match expression {
        Expr::Sequence { mut expressions } if expressions.len() == 2 => {
            let message = expressions.pop();
            let condition = expressions.pop().unwrap_or_default();
            ConditionEntry { condition, message }
        }
        condition => ConditionEntry {
            condition,
            message: None,
        },
    }
}

/// The message used when a condition carries none of its own.
pub fn default_message(site: Site<'_>, condition: &Expr) -> String {
    let source = print_expr(condition);
    match (site.kind, site.function) {
        (ContractKind::Assertion, Some(name)) => {
            format!("Function \"{}\" assertion failed: {}", name, source)
        }
        (ContractKind::Assertion, None) => format!("Assertion failed: {}", source),
        (kind, Some(name)) => format!("Function \"{}\" {} failed: {}", name, kind.noun(), source),
        (kind, None) => format!("Function {} failed: {}", kind.noun(), source),
    }
}

/// Builds the guard for one condition, rejecting it if it provably fails.
pub fn guard(site: Site<'_>, entry: ConditionEntry) -> Result<Stmt, ContractError> {
    if let Verdict::Fails(_) = verify(&entry.condition) {
        return Err(ContractError::AlwaysFails {
            kind: site.kind,
            function: site.function.map(str::to_string),
            condition: print_expr(&entry.condition),
        });
    }
    let message = entry
        .message
        .unwrap_or_else(|| str_lit(&default_message(site, &entry.condition)));
    Ok(guard_clause(entry.condition, message))
}

/// `if (!condition) { throw new Error(message); }`
pub fn guard_clause(condition: Expr, message: Expr) -> Stmt {
    Stmt::If {
        test: not(condition),
        consequent: Box::new(block(vec![throw(new_expr(ident("Error"), vec![message]))])),
        alternate: None,
    }
}

/// Side-effect check and flattening, with every entry carrying its final
/// message. Default messages quote the condition as written, so callers
/// that rewrite conditions afterwards do so on prepared entries.
pub fn prepare(site: Site<'_>, body: Stmt) -> Result<Vec<ConditionEntry>, ContractError> {
    check_side_effects(site, &body)?;
    Ok(condition_entries(site, body)?
        .into_iter()
        .map(|entry| entry.with_default_message(site))
        .collect())
}

/// Guards for every prepared entry, in order.
pub fn guards(site: Site<'_>, entries: Vec<ConditionEntry>) -> Result<Vec<Stmt>, ContractError> {
    entries.into_iter().map(|entry| guard(site, entry)).collect()
}

/// [`prepare`] followed by [`guards`].
pub fn assemble(site: Site<'_>, body: Stmt) -> Result<Vec<Stmt>, ContractError> {
    guards(site, prepare(site, body)?)
}
