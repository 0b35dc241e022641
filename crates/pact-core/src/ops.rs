//! Operator vocabulary for expressions.
//!
//! Each operator enum knows its source token and, where the operation is
//! defined on primitives alone, how to apply itself to [`Literal`] operands.
//! Operators that need object identity or property lookup (`in`,
//! `instanceof`) return `None` from [`BinaryOp::apply`] and are left to the
//! evaluator.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::literal::{to_int32, to_uint32, Literal};

/// Prefix unary operators without side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
    BitNot,
    TypeOf,
    Void,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::TypeOf => "typeof",
            UnaryOp::Void => "void",
        }
    }

    /// Applies the operator to a primitive operand.
    pub fn apply(self, operand: &Literal) -> Literal {
        match self {
            UnaryOp::Not => Literal::Bool(!operand.is_truthy()),
            UnaryOp::Minus => Literal::Number(-operand.to_number()),
            UnaryOp::Plus => Literal::Number(operand.to_number()),
            UnaryOp::BitNot => Literal::Number(f64::from(!to_int32(operand.to_number()))),
            UnaryOp::TypeOf => Literal::String(operand.type_of().to_string()),
            UnaryOp::Void => Literal::Undefined,
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    In,
    InstanceOf,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Exp => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        }
    }

    /// Binding strength used by the printer (higher binds tighter).
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::BitOr => 6,
            BinaryOp::BitXor => 7,
            BinaryOp::BitAnd => 8,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 9,
            BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq
            | BinaryOp::In
            | BinaryOp::InstanceOf => 10,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 11,
            BinaryOp::Add | BinaryOp::Sub => 12,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 13,
            BinaryOp::Exp => 14,
        }
    }

    /// `**` is the only right-associative binary operator.
    pub fn is_right_associative(self) -> bool {
        matches!(self, BinaryOp::Exp)
    }

    /// Applies the operator to primitive operands.
    ///
    /// Returns `None` for operators whose result depends on objects.
    pub fn apply(self, left: &Literal, right: &Literal) -> Option<Literal> {
        let number = |n: f64| Some(Literal::Number(n));
        let boolean = |b: bool| Some(Literal::Bool(b));
        match self {
            BinaryOp::Add => match (left, right) {
                (Literal::String(_), _) | (_, Literal::String(_)) => Some(Literal::String(
                    format!("{}{}", left.to_js_string(), right.to_js_string()),
                )),
                _ => number(left.to_number() + right.to_number()),
            },
            BinaryOp::Sub => number(left.to_number() - right.to_number()),
            BinaryOp::Mul => number(left.to_number() * right.to_number()),
            BinaryOp::Div => number(left.to_number() / right.to_number()),
            BinaryOp::Rem => number(left.to_number() % right.to_number()),
            BinaryOp::Exp => number(exponentiate(left.to_number(), right.to_number())),
            BinaryOp::Eq => boolean(left.loose_equals(right)),
            BinaryOp::NotEq => boolean(!left.loose_equals(right)),
            BinaryOp::StrictEq => boolean(left.strict_equals(right)),
            BinaryOp::StrictNotEq => boolean(!left.strict_equals(right)),
            BinaryOp::Lt => boolean(compare(left, right) == Some(Ordering::Less)),
            BinaryOp::Gt => boolean(compare(left, right) == Some(Ordering::Greater)),
            BinaryOp::LtEq => boolean(matches!(
                compare(left, right),
                Some(Ordering::Less | Ordering::Equal)
            )),
            BinaryOp::GtEq => boolean(matches!(
                compare(left, right),
                Some(Ordering::Greater | Ordering::Equal)
            )),
            BinaryOp::BitAnd => int32_op(left, right, |a, b| a & b),
            BinaryOp::BitOr => int32_op(left, right, |a, b| a | b),
            BinaryOp::BitXor => int32_op(left, right, |a, b| a ^ b),
            BinaryOp::Shl => {
                let shift = to_uint32(right.to_number()) & 31;
                number(f64::from(to_int32(left.to_number()).wrapping_shl(shift)))
            }
            BinaryOp::Shr => {
                let shift = to_uint32(right.to_number()) & 31;
                number(f64::from(to_int32(left.to_number()) >> shift))
            }
            BinaryOp::UShr => {
                let shift = to_uint32(right.to_number()) & 31;
                number(f64::from(to_uint32(left.to_number()) >> shift))
            }
            BinaryOp::In | BinaryOp::InstanceOf => None,
        }
    }
}

fn int32_op(left: &Literal, right: &Literal, f: impl Fn(i32, i32) -> i32) -> Option<Literal> {
    let a = to_int32(left.to_number());
    let b = to_int32(right.to_number());
    Some(Literal::Number(f64::from(f(a, b))))
}

fn exponentiate(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// Abstract relational comparison. `None` means "undefined" (a NaN operand).
fn compare(left: &Literal, right: &Literal) -> Option<Ordering> {
    if let (Literal::String(a), Literal::String(b)) = (left, right) {
        return Some(a.encode_utf16().cmp(b.encode_utf16()));
    }
    left.to_number().partial_cmp(&right.to_number())
}

/// Short-circuiting logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::Nullish => "??",
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            LogicalOp::Nullish | LogicalOp::Or => 4,
            LogicalOp::And => 5,
        }
    }

    /// Whether the left operand alone decides the result.
    pub fn short_circuits(self, left: &Literal) -> bool {
        match self {
            LogicalOp::And => !left.is_truthy(),
            LogicalOp::Or => left.is_truthy(),
            LogicalOp::Nullish => !left.is_nullish(),
        }
    }
}

/// Assignment operators, plain and compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::RemAssign => "%=",
        }
    }

    /// The binary operator a compound assignment applies, if any.
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::AddAssign => Some(BinaryOp::Add),
            AssignOp::SubAssign => Some(BinaryOp::Sub),
            AssignOp::MulAssign => Some(BinaryOp::Mul),
            AssignOp::DivAssign => Some(BinaryOp::Div),
            AssignOp::RemAssign => Some(BinaryOp::Rem),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }

    pub fn delta(self) -> f64 {
        match self {
            UpdateOp::Increment => 1.0,
            UpdateOp::Decrement => -1.0,
        }
    }
}

/// Declaration keyword of a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn keyword(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}
