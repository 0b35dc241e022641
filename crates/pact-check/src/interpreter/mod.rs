//! Tree-walking evaluator for transformed programs.
//!
//! Runs a [`Program`](pact_core::Program) directly from its syntax tree so a
//! transformed unit can be exercised without an external engine. Failed
//! guards surface as [`RuntimeError::Thrown`] carrying the guard's error
//! object.
//!
//! # Architecture
//!
//! - [`Interpreter`] owns the global scope, the call depth counter and the
//!   lines written through `console.log`.
//! - [`Env`] is a chain of scope frames shared by closures.
//! - [`Value`] is the runtime representation of all values. Arrays and
//!   objects are shared by reference.
//! - [`RuntimeError`] covers uncaught throws, reference and type errors,
//!   and the recursion limit.
//!
//! # Usage
//!
//! ```ignore
//! let mut interp = Interpreter::default();
//! interp.load(&program)?;
//! let result = interp.call_global("add5", vec![Value::from_json(&input)])?;
//! ```

pub mod env;
pub mod error;
pub mod eval;
pub mod state;
pub mod value;

pub use env::Env;
pub use error::RuntimeError;
pub use state::{run_function, Interpreter, InterpreterConfig};
pub use value::Value;
