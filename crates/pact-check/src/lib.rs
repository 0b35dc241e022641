//! Contract transformation and evaluation for pact.
//!
//! # Modules
//!
//! - [`contracts`]: rewrites `pre`/`post`/`invariant`/`assert` labeled
//!   blocks into runtime guards, rejects contracts that provably fail, and
//!   strips or extracts environment-labeled blocks.
//! - [`interpreter`]: a tree-walking evaluator used to run transformed
//!   programs, so guard behavior can be observed end to end.

pub mod contracts;
pub mod interpreter;

pub use contracts::{transform_program, ContractError, ContractKind, ContractOptions, Settings, TransformSummary};
pub use interpreter::{run_function, Interpreter, RuntimeError, Value};
