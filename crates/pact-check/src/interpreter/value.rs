//! Runtime value representation for the evaluator.
//!
//! Primitives reuse the operator semantics of [`Literal`]; arrays, objects
//! and functions are reference values shared through `Rc`, so two bindings
//! can observe the same mutation just as scripts expect.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use pact_core::ast::Function;
use pact_core::Literal;

use super::env::Env;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<Object>>),
    Function(Rc<Closure>),
    Native(Native),
}

/// A plain object or an error instance.
#[derive(Debug, Clone, Default)]
pub struct Object {
    pub properties: IndexMap<String, Value>,
    pub class: ObjectClass,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectClass {
    #[default]
    Plain,
    Error,
}

/// A function value: its syntax and the scope it closes over.
pub struct Closure {
    pub func: Rc<Function>,
    pub env: Env,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The captured scope may refer back to this closure.
        f.debug_struct("Closure")
            .field("name", &self.func.id)
            .field("params", &self.func.params)
            .finish_non_exhaustive()
    }
}

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Native {
    /// `Error(message)` / `new Error(message)`.
    ErrorConstructor,
    /// `console.log(...)`.
    ConsoleLog,
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Array(items) => f.debug_list().entries(items.borrow().iter()).finish(),
            Value::Object(object) => {
                let object = object.borrow();
                f.debug_map().entries(object.properties.iter()).finish()
            }
            Value::Function(closure) => fmt::Debug::fmt(&**closure, f),
            Value::Native(native) => fmt::Debug::fmt(native, f),
        }
    }
}

/// Strict equality: primitives by value, reference values by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Undefined => Value::Undefined,
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(b),
            Literal::Number(n) => Value::Number(n),
            Literal::String(s) => Value::String(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Value {
    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(properties: IndexMap<String, Value>) -> Value {
        Value::Object(Rc::new(RefCell::new(Object {
            properties,
            class: ObjectClass::Plain,
        })))
    }

    /// An error instance carrying `message`.
    pub fn error(message: Value) -> Value {
        let mut properties = IndexMap::new();
        properties.insert("name".to_string(), Value::from("Error"));
        properties.insert("message".to_string(), message);
        Value::Object(Rc::new(RefCell::new(Object {
            properties,
            class: ObjectClass::Error,
        })))
    }

    /// The primitive itself, or `None` for reference values.
    pub fn as_literal(&self) -> Option<Literal> {
        match self {
            Value::Undefined => Some(Literal::Undefined),
            Value::Null => Some(Literal::Null),
            Value::Bool(b) => Some(Literal::Bool(*b)),
            Value::Number(n) => Some(Literal::Number(*n)),
            Value::String(s) => Some(Literal::String(s.clone())),
            _ => None,
        }
    }

    /// ToPrimitive with the default (string) hint.
    pub fn to_primitive(&self) -> Literal {
        match self.as_literal() {
            Some(literal) => literal,
            None => Literal::String(self.to_display()),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self.as_literal() {
            Some(literal) => literal.is_truthy(),
            None => true,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_))
    }

    pub fn to_number(&self) -> f64 {
        self.to_primitive().to_number()
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Array(_) | Value::Object(_) => "object",
            Value::Function(_) | Value::Native(_) => "function",
            primitive => primitive.to_primitive().type_of(),
        }
    }

    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a == b,
            _ => match (self.as_literal(), other.as_literal()) {
                (Some(a), Some(b)) => a.strict_equals(&b),
                _ => false,
            },
        }
    }

    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self.as_literal(), other.as_literal()) {
            (Some(a), Some(b)) => a.loose_equals(&b),
            (None, None) => self.strict_equals(other),
            (Some(primitive), None) | (None, Some(primitive)) => {
                if primitive.is_nullish() {
                    return false;
                }
                let reference = if self.as_literal().is_none() { self } else { other };
                primitive.loose_equals(&reference.to_primitive())
            }
        }
    }

    /// String conversion as `String(value)` performs it.
    pub fn to_display(&self) -> String {
        match self {
            Value::Array(items) => items
                .borrow()
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_display()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(object) => {
                let object = object.borrow();
                match object.class {
                    ObjectClass::Error => {
                        let message = object
                            .properties
                            .get("message")
                            .map(Value::to_display)
                            .unwrap_or_default();
                        if message.is_empty() {
                            "Error".to_string()
                        } else {
                            format!("Error: {}", message)
                        }
                    }
                    ObjectClass::Plain => "[object Object]".to_string(),
                }
            }
            Value::Function(closure) => match &closure.func.id {
                Some(name) => format!("function {}() {{ [code] }}", name),
                None => "function () { [code] }".to_string(),
            },
            Value::Native(_) => "function () { [native code] }".to_string(),
            primitive => primitive.to_primitive().to_js_string(),
        }
    }

    /// The message of an error instance, or the display form of anything
    /// else. Used to report uncaught exceptions.
    pub fn error_message(&self) -> String {
        if let Value::Object(object) = self {
            let object = object.borrow();
            if object.class == ObjectClass::Error {
                return object
                    .properties
                    .get("message")
                    .map(Value::to_display)
                    .unwrap_or_default();
            }
        }
        self.to_display()
    }

    pub fn is_error(&self) -> bool {
        match self {
            Value::Object(object) => object.borrow().class == ObjectClass::Error,
            _ => false,
        }
    }

    /// Decodes a JSON value into fresh runtime values.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Encodes as JSON. Values JSON cannot express (`undefined`, non-finite
    /// numbers, functions) become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null | Value::Function(_) | Value::Native(_) => {
                serde_json::Value::Null
            }
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(|number| {
                    if n.fract() == 0.0 && n.abs() < 9.0e15 {
                        serde_json::Value::from(*n as i64)
                    } else {
                        serde_json::Value::Number(number)
                    }
                })
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.borrow().iter().map(Value::to_json).collect())
            }
            Value::Object(object) => serde_json::Value::Object(
                object
                    .borrow()
                    .properties
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}
