//! Static evaluation of contract conditions.
//!
//! Only literals and the unary, binary and logical operators fold; every
//! other expression form makes the result unknown. A logical operator whose
//! left operand already decides the outcome folds without looking at the
//! right operand.

use pact_core::ast::Expr;
use pact_core::Literal;

/// Outcome of statically evaluating a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The condition is a constant with the given truthy value.
    Holds(Literal),
    /// The condition is a constant with the given falsy value.
    Fails(Literal),
    /// The condition depends on something only known at run time.
    Unknown,
}

/// Folds `expr` to a constant, or `None` when that is not possible with
/// confidence.
pub fn fold(expr: &Expr) -> Option<Literal> {
    match expr {
        Expr::Literal(value) => Some(value.clone()),
        Expr::Unary { op, argument } => fold(argument).map(|value| op.apply(&value)),
        Expr::Binary { op, left, right } => {
            let left = fold(left)?;
            let right = fold(right)?;
            op.apply(&left, &right)
        }
        Expr::Logical { op, left, right } => {
            let left = fold(left)?;
            if op.short_circuits(&left) {
                Some(left)
            } else {
                fold(right)
            }
        }
        _ => None,
    }
}

pub fn verify(condition: &Expr) -> Verdict {
    match fold(condition) {
        Some(value) if value.is_truthy() => Verdict::Holds(value),
        Some(value) => Verdict::Fails(value),
        None => Verdict::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_core::builder::*;
    use pact_core::ops::{BinaryOp, LogicalOp, UnaryOp};
    use proptest::prelude::*;

    #[test]
    fn literal_comparisons_fold() {
        assert_eq!(
            verify(&binary(BinaryOp::Gt, num(1.0), num(2.0))),
            Verdict::Fails(Literal::Bool(false))
        );
        assert_eq!(
            verify(&binary(BinaryOp::StrictEq, str_lit("a"), str_lit("a"))),
            Verdict::Holds(Literal::Bool(true))
        );
        assert_eq!(verify(&num(0.0)), Verdict::Fails(Literal::Number(0.0)));
        assert_eq!(verify(&str_lit("")), Verdict::Fails(Literal::String(String::new())));
        assert_eq!(verify(&null()), Verdict::Fails(Literal::Null));
    }

    #[test]
    fn identifiers_and_calls_are_unknown() {
        assert_eq!(verify(&ident("x")), Verdict::Unknown);
        assert_eq!(verify(&call(ident("fail"), vec![])), Verdict::Unknown);
        assert_eq!(
            verify(&binary(BinaryOp::Gt, member(ident("a"), "length"), num(3.0))),
            Verdict::Unknown
        );
        assert_eq!(verify(&type_of(ident("x"))), Verdict::Unknown);
    }

    #[test]
    fn unary_folds() {
        assert_eq!(verify(&not(bool_lit(true))), Verdict::Fails(Literal::Bool(false)));
        assert_eq!(
            verify(&type_of(num(1.0))),
            Verdict::Holds(Literal::String("number".into()))
        );
        assert_eq!(
            verify(&unary(UnaryOp::Void, num(1.0))),
            Verdict::Fails(Literal::Undefined)
        );
    }

    #[test]
    fn logical_short_circuit_ignores_unknown_right() {
        assert_eq!(
            verify(&logical(LogicalOp::And, bool_lit(false), call(ident("f"), vec![]))),
            Verdict::Fails(Literal::Bool(false))
        );
        assert_eq!(
            verify(&logical(LogicalOp::Or, num(1.0), ident("x"))),
            Verdict::Holds(Literal::Number(1.0))
        );
        assert_eq!(
            verify(&logical(LogicalOp::And, bool_lit(true), ident("x"))),
            Verdict::Unknown
        );
        assert_eq!(
            verify(&logical(LogicalOp::Nullish, null(), num(0.0))),
            Verdict::Fails(Literal::Number(0.0))
        );
    }

    #[test]
    fn in_and_instanceof_never_fold() {
        assert_eq!(
            verify(&binary(BinaryOp::In, str_lit("a"), str_lit("b"))),
            Verdict::Unknown
        );
    }

    proptest! {
        #[test]
        fn folding_matches_native_arithmetic(a in -1.0e6f64..1.0e6, b in -1.0e6f64..1.0e6) {
            let sum = fold(&binary(BinaryOp::Add, num(a), num(b)));
            prop_assert_eq!(sum, Some(Literal::Number(a + b)));
            let lt = fold(&binary(BinaryOp::Lt, num(a), num(b)));
            prop_assert_eq!(lt, Some(Literal::Bool(a < b)));
            let product = fold(&binary(BinaryOp::Mul, num(a), num(b)));
            prop_assert_eq!(product, Some(Literal::Number(a * b)));
        }

        #[test]
        fn integer_bitwise_matches_native(a in any::<i32>(), b in any::<i32>()) {
            let and = fold(&binary(BinaryOp::BitAnd, num(a as f64), num(b as f64)));
            prop_assert_eq!(and, Some(Literal::Number((a & b) as f64)));
            let xor = fold(&binary(BinaryOp::BitXor, num(a as f64), num(b as f64)));
            prop_assert_eq!(xor, Some(Literal::Number((a ^ b) as f64)));
        }
    }
}
