//! Interpreter state: globals, call depth and captured console output.

use std::rc::Rc;

use indexmap::IndexMap;
use pact_core::ast::{Function, Program};
use tracing::debug;

use super::env::Env;
use super::error::RuntimeError;
use super::eval::Completion;
use super::value::{Closure, Native, Value};

/// Configuration for the interpreter.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Maximum nesting of function calls. Default: 64.
    ///
    /// Every script call recurses through the evaluator, so the limit has to
    /// fit the host thread's stack; 64 stays well inside a 2 MiB thread.
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: 64,
        }
    }
}

/// A tree-walking evaluator for one program.
///
/// [`Interpreter::load`] runs the program's top level, which declares its
/// functions; [`Interpreter::call_global`] then invokes one of them.
pub struct Interpreter {
    pub(crate) globals: Env,
    pub(crate) config: InterpreterConfig,
    pub(crate) depth: usize,
    pub(crate) output: Vec<String>,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        let globals = Env::root();
        globals.declare("undefined", Value::Undefined, false);
        globals.declare("NaN", Value::Number(f64::NAN), false);
        globals.declare("Infinity", Value::Number(f64::INFINITY), false);
        globals.declare("Error", Value::Native(Native::ErrorConstructor), false);
        let mut console = IndexMap::new();
        console.insert("log".to_string(), Value::Native(Native::ConsoleLog));
        globals.declare("console", Value::object(console), false);
        Interpreter {
            globals,
            config,
            depth: 0,
            output: Vec::new(),
        }
    }

    /// Executes the program's top-level statements in the global scope.
    pub fn load(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let globals = self.globals.clone();
        match self.exec_stmts(&program.body, &globals)? {
            Completion::Normal | Completion::Return(_) => Ok(()),
            Completion::Break(_) | Completion::Continue(_) => {
                Err(RuntimeError::type_error("Illegal break or continue at top level"))
            }
        }
    }

    /// Calls the global function `name`.
    pub fn call_global(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let callee = self
            .globals
            .lookup(name)
            .filter(Value::is_callable)
            .ok_or_else(|| RuntimeError::FunctionNotFound {
                name: name.to_string(),
            })?;
        debug!(function = name, args = args.len(), "calling global function");
        self.call(&callee, Value::Undefined, args)
    }

    /// Calls any callable value.
    pub fn call(&mut self, callee: &Value, this: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(closure) => self.call_closure(closure.clone(), this, args),
            Value::Native(Native::ErrorConstructor) => {
                Ok(Value::error(args.into_iter().next().unwrap_or(Value::Undefined)))
            }
            Value::Native(Native::ConsoleLog) => {
                let line = args
                    .iter()
                    .map(Value::to_display)
                    .collect::<Vec<_>>()
                    .join(" ");
                debug!(target: "pact::console", "{}", line);
                self.output.push(line);
                Ok(Value::Undefined)
            }
            other => Err(RuntimeError::type_error(format!(
                "{} is not a function",
                other.to_display()
            ))),
        }
    }

    fn call_closure(&mut self, closure: Rc<Closure>, this: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let func = &closure.func;
        if func.is_async {
            return Err(RuntimeError::Unsupported { what: "async function" });
        }
        if func.is_generator {
            return Err(RuntimeError::Unsupported { what: "generator function" });
        }
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::RecursionLimitExceeded {
                limit: self.config.max_call_depth,
            });
        }

        let scope = closure.env.child();
        if !func.is_arrow {
            scope.declare("this", this, false);
        }
        let mut args = args.into_iter();
        for param in &func.params {
            scope.declare(param, args.next().unwrap_or(Value::Undefined), true);
        }

        self.depth += 1;
        let result = self.run_body(func, &scope);
        self.depth -= 1;
        result
    }

    fn run_body(&mut self, func: &Function, scope: &Env) -> Result<Value, RuntimeError> {
        match &func.body {
            pact_core::FunctionBody::Block(body) => match self.exec_stmts(body, scope)? {
                Completion::Return(value) => Ok(value),
                _ => Ok(Value::Undefined),
            },
            pact_core::FunctionBody::Expression(expr) => self.eval(expr, scope),
        }
    }

    /// Lines written through `console.log`, in order.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn globals(&self) -> &Env {
        &self.globals
    }

    /// Current call nesting.
    pub fn call_depth(&self) -> usize {
        self.depth
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(InterpreterConfig::default())
    }
}

/// Loads `program` and calls its global function `name` with `args`.
pub fn run_function(program: &Program, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let mut interpreter = Interpreter::default();
    interpreter.load(program)?;
    interpreter.call_global(name, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_core::builder::*;
    use pact_core::ops::BinaryOp;

    #[test]
    fn config_default_values() {
        let config = InterpreterConfig::default();
        assert_eq!(config.max_call_depth, 64);
    }

    #[test]
    fn calls_a_loaded_function() {
        let program = Program::new(vec![function_decl(
            "add",
            &["a", "b"],
            vec![ret(Some(binary(BinaryOp::Add, ident("a"), ident("b"))))],
        )]);
        let result = run_function(&program, "add", vec![Value::from(3.0), Value::from(5.0)]).unwrap();
        assert_eq!(result, Value::from(8.0));
    }

    #[test]
    fn missing_function() {
        let program = Program::new(vec![const_decl("notAFunction", num(1.0))]);
        assert!(matches!(
            run_function(&program, "notAFunction", vec![]),
            Err(RuntimeError::FunctionNotFound { .. })
        ));
    }

    #[test]
    fn recursion_limit() {
        let program = Program::new(vec![function_decl(
            "forever",
            &[],
            vec![ret(Some(call(ident("forever"), vec![])))],
        )]);
        let mut interpreter = Interpreter::new(InterpreterConfig { max_call_depth: 16 });
        interpreter.load(&program).unwrap();
        assert!(matches!(
            interpreter.call_global("forever", vec![]),
            Err(RuntimeError::RecursionLimitExceeded { limit: 16 })
        ));
        assert_eq!(interpreter.call_depth(), 0);
    }

    #[test]
    fn deep_recursion_hits_the_default_limit() {
        // function r(n) { if (n === 0) return 0; return r(n - 1); }
        let program = Program::new(vec![function_decl(
            "r",
            &["n"],
            vec![
                if_stmt(
                    binary(BinaryOp::StrictEq, ident("n"), num(0.0)),
                    ret(Some(num(0.0))),
                    None,
                ),
                ret(Some(call(
                    ident("r"),
                    vec![binary(BinaryOp::Sub, ident("n"), num(1.0))],
                ))),
            ],
        )]);
        let shallow = run_function(&program, "r", vec![Value::from(60.0)]).unwrap();
        assert_eq!(shallow, Value::from(0.0));
        assert!(matches!(
            run_function(&program, "r", vec![Value::from(10_000.0)]),
            Err(RuntimeError::RecursionLimitExceeded { limit: 64 })
        ));
    }

    #[test]
    fn missing_arguments_are_undefined() {
        let program = Program::new(vec![function_decl(
            "first",
            &["a", "b"],
            vec![ret(Some(type_of(ident("b"))))],
        )]);
        let result = run_function(&program, "first", vec![Value::from(1.0)]).unwrap();
        assert_eq!(result, Value::from("undefined"));
    }

    #[test]
    fn console_log_is_captured() {
        let program = Program::new(vec![expr_stmt(call(
            member(ident("console"), "log"),
            vec![str_lit("hello"), num(1.0)],
        ))]);
        let mut interpreter = Interpreter::default();
        interpreter.load(&program).unwrap();
        assert_eq!(interpreter.output(), ["hello 1".to_string()]);
    }
}
