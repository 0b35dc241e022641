//! The contract passes.
//!
//! One module-level pass handles labels outside every function. Then every
//! function with a block body gets exactly one pass over its own statements,
//! at any depth, stopping at nested function boundaries. Nested functions
//! are transformed afterwards, by their own pass, over the tree their
//! enclosing pass produced.
//!
//! Inside a pass, statements are handled left to right:
//!
//! - preconditions and assertions are replaced by their guards in place;
//! - a postcondition is removed and recorded; when the pass finishes, every
//!   return of the function is routed through its helper, and the helpers
//!   and `old` bindings are declared at the top of the body;
//! - an invariant is removed and its helper is wired into the enclosing
//!   statement list immediately;
//! - environment labels are kept, removed or inlined.

use std::collections::HashSet;

use pact_core::ast::{Function, FunctionBody, Program, Stmt};
use pact_core::scope::{function_scope, ScopeStack};
use pact_core::visit::{walk_function_mut, walk_stmt_mut, walk_stmts_mut, VisitMut};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::assemble;
use super::config::{LabelRole, Settings};
use super::env::{self, EnvAction};
use super::error::ContractError;
use super::materialize::{self, CheckerHelper};
use super::names::NameGenerator;
use super::old::OldCaptures;
use super::{ContractKind, Site};

/// Counts of what a transformation did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformSummary {
    /// Functions with a block body that received a pass.
    pub functions: usize,
    /// Guard clauses emitted, including those inside helpers.
    pub guards: usize,
    /// Checker helpers declared.
    pub helpers: usize,
    /// `old` bindings declared.
    pub old_bindings: usize,
    /// Return statements routed through a helper.
    pub returns_rewritten: usize,
    /// Labeled statements deleted by stripping or extraction.
    pub stripped: usize,
    /// Environment blocks spliced into their parent.
    pub inlined: usize,
}

/// Transforms every contract and environment label in `program`.
///
/// On error `program` is left exactly as it was.
pub fn transform_program(
    program: &mut Program,
    settings: &Settings,
) -> Result<TransformSummary, ContractError> {
    let mut working = program.clone();
    let mut unit = Unit::new(&working, settings);
    debug!(
        environment = settings.environment(),
        retained = ?settings.retained_label(),
        strip = settings.strips_contracts(),
        extract = settings.extracts_environment(),
        "transforming unit"
    );

    Pass::module(&mut unit).walk_block(&mut working.body)?;
    unit.transform_nested(&mut working.body)?;

    *program = working;
    let summary = unit.summary;
    info!(
        functions = summary.functions,
        guards = summary.guards,
        helpers = summary.helpers,
        old_bindings = summary.old_bindings,
        stripped = summary.stripped,
        inlined = summary.inlined,
        "contracts transformed"
    );
    Ok(summary)
}

/// State shared by every pass over one unit.
struct Unit<'s> {
    settings: &'s Settings,
    names: NameGenerator,
    scopes: ScopeStack,
    /// Names of synthesized helpers; their arrows are never given a pass.
    helpers: HashSet<String>,
    summary: TransformSummary,
}

impl<'s> Unit<'s> {
    fn new(program: &Program, settings: &'s Settings) -> Self {
        Unit {
            settings,
            names: NameGenerator::for_program(program),
            scopes: ScopeStack::for_program(program),
            helpers: HashSet::new(),
            summary: TransformSummary::default(),
        }
    }

    fn transform_function(&mut self, func: &mut Function) -> Result<(), ContractError> {
        self.scopes.push(function_scope(func));
        let result = self.transform_function_in_scope(func);
        self.scopes.pop();
        result
    }

    fn transform_function_in_scope(&mut self, func: &mut Function) -> Result<(), ContractError> {
        // Naked arrow functions cannot contain labeled statements.
        if let FunctionBody::Block(body) = &mut func.body {
            debug!(function = func.id.as_deref().unwrap_or("<anonymous>"), "contract pass");
            self.summary.functions += 1;
            let mut pass = Pass::function(self, func.id.clone());
            pass.walk_block(body)?;
            pass.finish(body);
        }
        let mut nested = NestedFunctions {
            unit: self,
            error: None,
        };
        walk_function_mut(&mut nested, func);
        nested.error.map_or(Ok(()), Err)
    }

    /// Gives every function reachable from `stmts` (but not inside another
    /// function) its pass.
    fn transform_nested(&mut self, stmts: &mut [Stmt]) -> Result<(), ContractError> {
        let mut nested = NestedFunctions {
            unit: self,
            error: None,
        };
        walk_stmts_mut(&mut nested, stmts);
        nested.error.map_or(Ok(()), Err)
    }

    /// Names and registers a checker helper, e.g. `_demoPostcondition`.
    fn helper(&mut self, site: Site<'_>, suffix: &str, guards: Vec<Stmt>) -> CheckerHelper {
        let base = format!("{}{}", site.function.unwrap_or("check"), suffix);
        let name = self.names.generate(&base);
        self.helpers.insert(name.clone());
        self.summary.helpers += 1;
        CheckerHelper::new(name, guards)
    }
}

struct NestedFunctions<'a, 's> {
    unit: &'a mut Unit<'s>,
    error: Option<ContractError>,
}

impl VisitMut for NestedFunctions<'_, '_> {
    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        if self.error.is_some() {
            return;
        }
        if let Stmt::Variable(decl) = stmt {
            if decl
                .declarations
                .iter()
                .all(|d| self.unit.helpers.contains(&d.name))
            {
                return;
            }
        }
        walk_stmt_mut(self, stmt);
    }

    fn visit_function_mut(&mut self, func: &mut Function) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.unit.transform_function(func) {
            self.error = Some(err);
        }
    }
}

/// Per-function bookkeeping that outlives a single statement.
struct FunctionState {
    name: Option<String>,
    old: OldCaptures,
    postconditions: Vec<CheckerHelper>,
}

/// One pass over one function body, or over the module top level when
/// `function` is `None`.
struct Pass<'u, 's> {
    unit: &'u mut Unit<'s>,
    function: Option<FunctionState>,
}

impl<'u, 's> Pass<'u, 's> {
    fn module(unit: &'u mut Unit<'s>) -> Self {
        Pass {
            unit,
            function: None,
        }
    }

    fn function(unit: &'u mut Unit<'s>, name: Option<String>) -> Self {
        Pass {
            unit,
            function: Some(FunctionState {
                name,
                old: OldCaptures::new(),
                postconditions: Vec::new(),
            }),
        }
    }

    fn function_name(&self) -> Option<String> {
        self.function.as_ref().and_then(|state| state.name.clone())
    }

    fn walk_block(&mut self, stmts: &mut Vec<Stmt>) -> Result<(), ContractError> {
        let mut index = 0;
        while index < stmts.len() {
            let role = stmts[index]
                .label()
                .map(|label| (label.to_string(), self.unit.settings.classify(label)));
            index = match role {
                Some((_, LabelRole::Contract(kind))) => self.contract(stmts, index, kind)?,
                Some((label, LabelRole::Environment)) => self.environment(stmts, index, &label)?,
                _ => {
                    self.walk_children(&mut stmts[index])?;
                    index + 1
                }
            };
        }
        Ok(())
    }

    /// Walks the statement lists nested in `stmt` without entering
    /// functions.
    fn walk_children(&mut self, stmt: &mut Stmt) -> Result<(), ContractError> {
        match stmt {
            Stmt::Block { body } => self.walk_block(body),
            Stmt::If {
                consequent,
                alternate,
                ..
            } => {
                self.walk_slot(consequent)?;
                if let Some(alternate) = alternate {
                    self.walk_slot(alternate)?;
                }
                Ok(())
            }
            Stmt::While { body, .. }
            | Stmt::DoWhile { body, .. }
            | Stmt::For { body, .. }
            | Stmt::Labeled { body, .. } => self.walk_slot(body),
            _ => Ok(()),
        }
    }

    /// A single-statement slot holding a recognized label is wrapped in a
    /// block first, so the label always sits in a statement list.
    fn walk_slot(&mut self, slot: &mut Stmt) -> Result<(), ContractError> {
        let recognized = slot
            .label()
            .is_some_and(|label| self.unit.settings.classify(label) != LabelRole::Other);
        if recognized {
            let inner = std::mem::take(slot);
            *slot = Stmt::Block { body: vec![inner] };
        }
        self.walk_children(slot)
    }

    /// Handles the contract label at `stmts[index]`; returns the index of
    /// the next statement to look at.
    fn contract(
        &mut self,
        stmts: &mut Vec<Stmt>,
        index: usize,
        kind: ContractKind,
    ) -> Result<usize, ContractError> {
        let settings = self.unit.settings;
        // Only assertions are contracts at module level, stripped or not.
        if self.function.is_none() && kind != ContractKind::Assertion {
            warn!(%kind, "contract label outside a function left untouched");
            return Ok(index + 1);
        }
        if settings.strips_contracts() {
            stmts.remove(index);
            self.unit.summary.stripped += 1;
            debug!(%kind, "contract stripped");
            return Ok(index);
        }

        let name = self.function_name();
        let site = Site::new(kind, name.as_deref());
        let body = labeled_body(stmts.remove(index));
        debug!(%kind, function = ?site.function, "assembling contract");

        match kind {
            ContractKind::Precondition | ContractKind::Assertion => {
                let guards = assemble::assemble(site, body)?;
                let count = guards.len();
                self.unit.summary.guards += count;
                stmts.splice(index..index, guards);
                Ok(index + count)
            }
            ContractKind::Postcondition => {
                let guards = self.checked_guards(site, body)?;
                let helper = self.unit.helper(site, "Postcondition", guards);
                if let Some(state) = &mut self.function {
                    state.postconditions.push(helper);
                }
                Ok(index)
            }
            ContractKind::Invariant => {
                let guards = self.checked_guards(site, body)?;
                let helper = self.unit.helper(site, "Invariant", guards);
                let rewritten =
                    materialize::attach_invariant(stmts, &helper, &settings.names().return_value);
                self.unit.summary.returns_rewritten += rewritten;
                Ok(index + 2)
            }
        }
    }

    /// Guards for a postcondition or invariant, with `old(expr)` captured.
    fn checked_guards(&mut self, site: Site<'_>, body: Stmt) -> Result<Vec<Stmt>, ContractError> {
        let settings = self.unit.settings;
        let mut entries = assemble::prepare(site, body)?;
        let marker = &settings.names().old;
        if let Some(state) = &mut self.function {
            if self.unit.scopes.is_bound(marker) {
                debug!(marker = %marker, "old marker is shadowed, not capturing");
            } else {
                for entry in &mut entries {
                    state
                        .old
                        .rewrite(&mut entry.condition, marker, &mut self.unit.names);
                    if let Some(message) = &mut entry.message {
                        state.old.rewrite(message, marker, &mut self.unit.names);
                    }
                }
            }
        }
        let guards = assemble::guards(site, entries)?;
        self.unit.summary.guards += guards.len();
        Ok(guards)
    }

    fn environment(
        &mut self,
        stmts: &mut Vec<Stmt>,
        index: usize,
        label: &str,
    ) -> Result<usize, ContractError> {
        match env::action_for(self.unit.settings, label) {
            EnvAction::Keep => {
                self.walk_children(&mut stmts[index])?;
                Ok(index + 1)
            }
            EnvAction::Remove => {
                stmts.remove(index);
                self.unit.summary.stripped += 1;
                debug!(label, "environment block removed");
                Ok(index)
            }
            EnvAction::Inline => {
                let inner = env::unwrap_labeled(stmts.remove(index));
                self.unit.summary.inlined += 1;
                debug!(label, statements = inner.len(), "environment block inlined");
                stmts.splice(index..index, inner);
                // The spliced statements are visited next.
                Ok(index)
            }
        }
    }

    /// Routes returns through the recorded postcondition helpers and
    /// declares the helpers and `old` bindings at the top of `body`.
    fn finish(mut self, body: &mut Vec<Stmt>) {
        let Some(state) = self.function.take() else {
            return;
        };
        let settings = self.unit.settings;
        let param = &settings.names().return_value;
        for helper in &state.postconditions {
            self.unit.summary.returns_rewritten += materialize::rewrite_returns(body, helper);
            materialize::append_exit_check(body, helper);
        }
        self.unit.summary.old_bindings += state.old.len();

        let mut prologue: Vec<Stmt> = state
            .postconditions
            .iter()
            .map(|helper| helper.declaration(param))
            .collect();
        prologue.extend(state.old.into_declarations());
        body.splice(0..0, prologue);
    }
}

fn labeled_body(stmt: Stmt) -> Stmt {
    match stmt {
        Stmt::Labeled { body, .. } => *body,
        other => other,
    }
}
