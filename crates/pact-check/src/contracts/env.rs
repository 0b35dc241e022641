//! Environment-labeled blocks.
//!
//! With extraction mode on, exactly one environment label survives: the
//! retained one, whose body is spliced into the parent without its label.
//! Every other environment-labeled statement is deleted. With extraction
//! mode off, environment labels are kept as they are.

use pact_core::ast::Stmt;

use super::config::Settings;

/// What to do with an environment-labeled statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvAction {
    /// Leave the labeled statement in place.
    Keep,
    /// Delete the labeled statement.
    Remove,
    /// Replace the labeled statement by its body's statements.
    Inline,
}

pub fn action_for(settings: &Settings, label: &str) -> EnvAction {
    if !settings.extracts_environment() {
        return EnvAction::Keep;
    }
    match settings.retained_label() {
        Some(retained) if retained == label => EnvAction::Inline,
        _ => EnvAction::Remove,
    }
}

/// The statements a labeled statement contributes when its label is
/// dropped: a block body yields its statements, anything else yields itself.
pub fn unwrap_labeled(stmt: Stmt) -> Vec<Stmt> {
    match stmt {
        Stmt::Labeled { body, .. } => match *body {
            Stmt::Block { body } => body,
            other => vec![other],
        },
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::config::{ActiveEnvironment, ContractOptions};
    use pact_core::builder::*;

    fn extracting(environment: &str) -> Settings {
        let options = ContractOptions {
            env_strip: true,
            ..ContractOptions::default()
        };
        Settings::resolve(&options, ActiveEnvironment::new(environment))
    }

    #[test]
    fn extraction_keeps_only_the_active_environment() {
        let settings = extracting("production");
        assert_eq!(action_for(&settings, "prod"), EnvAction::Inline);
        assert_eq!(action_for(&settings, "dev"), EnvAction::Remove);
        assert_eq!(action_for(&settings, "test"), EnvAction::Remove);
    }

    #[test]
    fn without_extraction_everything_is_kept() {
        let settings = Settings::default();
        assert_eq!(action_for(&settings, "prod"), EnvAction::Keep);
        assert_eq!(action_for(&settings, "dev"), EnvAction::Keep);
    }

    #[test]
    fn unknown_environment_removes_every_branch() {
        let settings = extracting("qa");
        assert_eq!(action_for(&settings, "dev"), EnvAction::Remove);
        assert_eq!(action_for(&settings, "prod"), EnvAction::Remove);
    }

    #[test]
    fn unwrap_splices_block_statements() {
        let stmt = labeled("prod", block(vec![expr_stmt(ident("a")), expr_stmt(ident("b"))]));
        assert_eq!(
            unwrap_labeled(stmt),
            vec![expr_stmt(ident("a")), expr_stmt(ident("b"))]
        );
        let single = labeled("prod", expr_stmt(ident("a")));
        assert_eq!(unwrap_labeled(single), vec![expr_stmt(ident("a"))]);
    }
}
