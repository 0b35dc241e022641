//! Primitive literal values and their conversion rules.
//!
//! [`Literal`] is the compile-time counterpart of the scripting language's
//! primitive values. The conversions here (`ToBoolean`, `ToNumber`,
//! `ToString`, equality) are shared by the constant folder and the evaluator
//! so that a statically folded condition and the same condition executed at
//! runtime can never disagree.

use serde::{Deserialize, Serialize};

/// A primitive value as it appears in source or results from folding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Literal {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Literal {
    /// `ToBoolean`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Literal::Undefined | Literal::Null => false,
            Literal::Bool(b) => *b,
            Literal::Number(n) => *n != 0.0 && !n.is_nan(),
            Literal::String(s) => !s.is_empty(),
        }
    }

    /// True for `null` and `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Literal::Undefined | Literal::Null)
    }

    /// `ToNumber`.
    pub fn to_number(&self) -> f64 {
        match self {
            Literal::Undefined => f64::NAN,
            Literal::Null => 0.0,
            Literal::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Literal::Number(n) => *n,
            Literal::String(s) => string_to_number(s),
        }
    }

    /// `ToString`.
    pub fn to_js_string(&self) -> String {
        match self {
            Literal::Undefined => "undefined".to_string(),
            Literal::Null => "null".to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Number(n) => number_to_string(*n),
            Literal::String(s) => s.clone(),
        }
    }

    /// The result of the `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Literal::Undefined => "undefined",
            Literal::Null => "object",
            Literal::Bool(_) => "boolean",
            Literal::Number(_) => "number",
            Literal::String(_) => "string",
        }
    }

    /// `===` on primitives.
    pub fn strict_equals(&self, other: &Literal) -> bool {
        match (self, other) {
            (Literal::Undefined, Literal::Undefined) => true,
            (Literal::Null, Literal::Null) => true,
            (Literal::Bool(a), Literal::Bool(b)) => a == b,
            // NaN != NaN and 0 == -0 fall out of IEEE comparison.
            (Literal::Number(a), Literal::Number(b)) => a == b,
            (Literal::String(a), Literal::String(b)) => a == b,
            _ => false,
        }
    }

    /// `==` on primitives.
    pub fn loose_equals(&self, other: &Literal) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (Literal::Number(_), Literal::String(_))
            | (Literal::String(_), Literal::Number(_))
            | (Literal::Bool(_), _)
            | (_, Literal::Bool(_)) => self.to_number() == other.to_number(),
            _ => self.strict_equals(other),
        }
    }
}

/// `ToInt32`.
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// `ToUint32`.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let modulus = 4_294_967_296.0_f64;
    let wrapped = n.trunc().rem_euclid(modulus);
    wrapped as u32
}

/// Formats a number the way the language's `ToString` does for the common
/// cases: integral values print without a fraction, non-finite values by name.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for prefix in ["0x", "0X"] {
        if let Some(hex) = trimmed.strip_prefix(prefix) {
            return u64::from_str_radix(hex, 16)
                .map(|v| v as f64)
                .unwrap_or(f64::NAN);
        }
    }
    // Rust accepts "inf" and "nan" spellings the language does not.
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_of_primitives() {
        assert!(!Literal::Undefined.is_truthy());
        assert!(!Literal::Null.is_truthy());
        assert!(!Literal::Number(0.0).is_truthy());
        assert!(!Literal::Number(f64::NAN).is_truthy());
        assert!(!Literal::String(String::new()).is_truthy());
        assert!(Literal::String("0".into()).is_truthy());
        assert!(Literal::Number(-1.0).is_truthy());
    }

    #[test]
    fn string_to_number_conversions() {
        assert_eq!(Literal::String("  42 ".into()).to_number(), 42.0);
        assert_eq!(Literal::String("".into()).to_number(), 0.0);
        assert_eq!(Literal::String("0x1f".into()).to_number(), 31.0);
        assert!(Literal::String("inf".into()).to_number().is_nan());
        assert!(Literal::String("abc".into()).to_number().is_nan());
        assert_eq!(Literal::String("1e3".into()).to_number(), 1000.0);
        assert_eq!(Literal::String("-Infinity".into()).to_number(), f64::NEG_INFINITY);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(number_to_string(5.0), "5");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn loose_equality_coerces() {
        assert!(Literal::Null.loose_equals(&Literal::Undefined));
        assert!(!Literal::Null.loose_equals(&Literal::Number(0.0)));
        assert!(Literal::String("1".into()).loose_equals(&Literal::Number(1.0)));
        assert!(Literal::Bool(true).loose_equals(&Literal::Number(1.0)));
        assert!(!Literal::String("1".into()).strict_equals(&Literal::Number(1.0)));
    }

    #[test]
    fn int32_wraps() {
        assert_eq!(to_int32(4_294_967_295.0), -1);
        assert_eq!(to_int32(-1.5), -1);
        assert_eq!(to_uint32(-1.0), 4_294_967_295);
        assert_eq!(to_int32(f64::NAN), 0);
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_string(&Literal::Number(1.5)).unwrap();
        assert_eq!(json, r#"{"kind":"number","value":1.5}"#);
        let back: Literal = serde_json::from_str(r#"{"kind":"null"}"#).unwrap();
        assert_eq!(back, Literal::Null);
    }
}
