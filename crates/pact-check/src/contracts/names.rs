//! Collision-free generated identifiers.
//!
//! Every generated name starts with `_` and is checked against every name
//! already present in the program, plus every name generated so far, so two
//! requests for the same stem yield `_stem` and then `_stem2`.

use std::collections::HashSet;

use pact_core::ast::{Expr, MemberProperty, Program};
use pact_core::literal::number_to_string;
use pact_core::scope::all_names;
use pact_core::Literal;

/// Longest stem derived from an expression.
const MAX_EXPRESSION_STEM: usize = 20;

/// Stem used when nothing better can be derived.
const FALLBACK_STEM: &str = "ref";

#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    taken: HashSet<String>,
}

impl NameGenerator {
    pub fn new(taken: HashSet<String>) -> Self {
        NameGenerator { taken }
    }

    pub fn for_program(program: &Program) -> Self {
        NameGenerator::new(all_names(program))
    }

    /// A fresh identifier derived from `base`.
    pub fn generate(&mut self, base: &str) -> String {
        let ident = to_identifier(base);
        let stem = ident
            .trim_start_matches('_')
            .trim_end_matches(|c: char| c.is_ascii_digit());
        let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };

        let mut counter = 1usize;
        loop {
            let candidate = if counter > 1 {
                format!("_{}{}", stem, counter)
            } else {
                format!("_{}", stem)
            };
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// A fresh identifier derived from the shape of `expr`:
    /// `input.price` gives `_inputPrice`.
    pub fn generate_for(&mut self, expr: &Expr) -> String {
        let mut parts = Vec::new();
        gather_parts(expr, &mut parts);
        let joined = to_identifier(&parts.join("-"));
        let stem: String = joined
            .trim_start_matches('_')
            .chars()
            .take(MAX_EXPRESSION_STEM)
            .collect();
        self.generate(&stem)
    }
}

fn gather_parts(expr: &Expr, parts: &mut Vec<String>) {
    match expr {
        Expr::Identifier(name) => parts.push(name.clone()),
        Expr::This => parts.push("this".into()),
        Expr::Literal(Literal::String(value)) => parts.push(value.clone()),
        Expr::Literal(Literal::Number(value)) => parts.push(number_to_string(*value)),
        Expr::Literal(Literal::Bool(value)) => parts.push(value.to_string()),
        Expr::Member { object, property } => {
            gather_parts(object, parts);
            match property {
                MemberProperty::Named(name) => parts.push(name.clone()),
                MemberProperty::Computed(key) => gather_parts(key, parts),
            }
        }
        Expr::Call { callee, .. } | Expr::New { callee, .. } => gather_parts(callee, parts),
        Expr::Unary { argument, .. } | Expr::Update { argument, .. } | Expr::Await { argument } => {
            gather_parts(argument, parts)
        }
        Expr::Assign { target, .. } => gather_parts(target, parts),
        _ => {}
    }
}

/// Turns arbitrary text into an identifier: characters outside
/// `[A-Za-z0-9$_]` become word breaks, leading digits and breaks are
/// dropped, and the words are joined in camelCase.
pub fn to_identifier(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut break_pending = false;
    for c in text.chars() {
        let word_char = c.is_ascii_alphanumeric() || c == '$' || c == '_';
        if !word_char {
            break_pending = true;
            continue;
        }
        if out.is_empty() {
            if c.is_ascii_digit() {
                continue;
            }
            out.push(c);
        } else if break_pending {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        break_pending = false;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_core::builder::*;

    fn generator(taken: &[&str]) -> NameGenerator {
        NameGenerator::new(taken.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn to_identifier_camel_cases_words() {
        assert_eq!(to_identifier("input-price"), "inputPrice");
        assert_eq!(to_identifier("9lives left"), "livesLeft");
        assert_eq!(to_identifier("a.b.c"), "aBC");
        assert_eq!(to_identifier("$el"), "$el");
        assert_eq!(to_identifier("---"), "");
    }

    #[test]
    fn avoids_existing_and_generated_names() {
        let mut names = generator(&["_demoPostcondition"]);
        assert_eq!(names.generate("demoPostcondition"), "_demoPostcondition2");
        assert_eq!(names.generate("demoPostcondition"), "_demoPostcondition3");
        assert_eq!(names.generate("checkInvariant"), "_checkInvariant");
    }

    #[test]
    fn strips_leading_underscores_and_trailing_digits() {
        let mut names = generator(&[]);
        assert_eq!(names.generate("__value12"), "_value");
        assert_eq!(names.generate(""), "_ref");
    }

    #[test]
    fn expression_based_names() {
        let mut names = generator(&[]);
        assert_eq!(names.generate_for(&member(ident("input"), "price")), "_inputPrice");
        assert_eq!(names.generate_for(&ident("count")), "_count");
        assert_eq!(names.generate_for(&ident("count")), "_count2");
        assert_eq!(
            names.generate_for(&call(member(ident("items"), "slice"), vec![])),
            "_itemsSlice"
        );
        assert_eq!(names.generate_for(&binary_sum()), "_ref");
    }

    #[test]
    fn expression_stems_are_truncated() {
        let mut names = generator(&[]);
        let long = member(ident("configuration"), "maximumRetries");
        assert_eq!(names.generate_for(&long), "_configurationMaximum");
    }

    #[test]
    fn program_names_are_reserved() {
        let program = pact_core::Program::new(vec![function_decl(
            "f",
            &["_x"],
            vec![ret(Some(ident("_x")))],
        )]);
        let mut names = NameGenerator::for_program(&program);
        assert_eq!(names.generate("x"), "_x2");
    }

    fn binary_sum() -> Expr {
        binary(pact_core::ops::BinaryOp::Add, ident("a"), ident("b"))
    }
}
