//! Runtime errors raised while evaluating a program.

use super::value::Value;

/// Errors produced by the evaluator. Each one halts the current call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    /// A `throw` that nothing caught. Failed guards end up here.
    #[error("uncaught {}", render_thrown(.value))]
    Thrown { value: Value },

    #[error("ReferenceError: {name} is not defined")]
    ReferenceError { name: String },

    #[error("TypeError: {message}")]
    TypeError { message: String },

    #[error("RangeError: {message}")]
    RangeError { message: String },

    #[error("recursion depth limit ({limit}) exceeded")]
    RecursionLimitExceeded { limit: usize },

    #[error("function not found: '{name}'")]
    FunctionNotFound { name: String },

    /// Syntax the evaluator does not execute, such as `yield` and `await`.
    #[error("unsupported at runtime: {what}")]
    Unsupported { what: &'static str },
}

fn render_thrown(value: &Value) -> String {
    value.to_display()
}

impl RuntimeError {
    pub fn type_error(message: impl Into<String>) -> Self {
        RuntimeError::TypeError {
            message: message.into(),
        }
    }

    /// The message of a thrown value, if this is an uncaught throw.
    pub fn thrown_message(&self) -> Option<String> {
        match self {
            RuntimeError::Thrown { value } => Some(value.error_message()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thrown_error_reports_its_message() {
        let err = RuntimeError::Thrown {
            value: Value::error(Value::from("Assertion failed: ready()")),
        };
        assert_eq!(err.to_string(), "uncaught Error: Assertion failed: ready()");
        assert_eq!(err.thrown_message().as_deref(), Some("Assertion failed: ready()"));
    }

    #[test]
    fn thrown_primitive() {
        let err = RuntimeError::Thrown {
            value: Value::from(42.0),
        };
        assert_eq!(err.to_string(), "uncaught 42");
        assert_eq!(RuntimeError::type_error("x").thrown_message(), None);
    }
}
