//! Statement execution and expression evaluation.
//!
//! Evaluation is a direct recursive walk. Statements produce a
//! [`Completion`] so `return`, `break` and `continue` unwind to the right
//! construct; a `throw` unwinds as [`RuntimeError::Thrown`] all the way out,
//! since the language subset has no `try`.

use std::rc::Rc;

use indexmap::IndexMap;
use pact_core::ast::{Expr, ForInit, Function, MemberProperty, Stmt, VariableDeclaration};
use pact_core::ops::{BinaryOp, LogicalOp, UnaryOp, VarKind};
use pact_core::print_expr;

use super::env::Env;
use super::error::RuntimeError;
use super::state::Interpreter;
use super::value::{Closure, Native, Value};

/// How a statement finished.
#[derive(Debug, Clone)]
pub(crate) enum Completion {
    Normal,
    Return(Value),
    Break(Option<String>),
    Continue(Option<String>),
}

/// What a loop does after one execution of its body.
enum LoopControl {
    Next,
    Exit(Completion),
}

/// An assignable location.
enum Place {
    Binding(String),
    Property { object: Value, key: String },
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

impl Interpreter {
    /// Runs a statement list in `env`, with its function declarations
    /// hoisted to the top.
    pub(crate) fn exec_stmts(&mut self, stmts: &[Stmt], env: &Env) -> Result<Completion, RuntimeError> {
        for stmt in stmts {
            if let Stmt::FunctionDecl(func) = stmt {
                if let Some(name) = &func.id {
                    env.declare(name, closure(func, env), true);
                }
            }
        }
        for stmt in stmts {
            match self.exec(stmt, env)? {
                Completion::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal)
    }

    fn exec(&mut self, stmt: &Stmt, env: &Env) -> Result<Completion, RuntimeError> {
        match stmt {
            Stmt::Expression { expression } => {
                self.eval(expression, env)?;
                Ok(Completion::Normal)
            }
            Stmt::Block { body } => self.exec_stmts(body, &env.child()),
            Stmt::Labeled { label, body } => {
                let completion = match body.as_ref() {
                    Stmt::While { .. } | Stmt::DoWhile { .. } | Stmt::For { .. } => {
                        self.exec_loop(body, Some(label), env)?
                    }
                    other => self.exec(other, env)?,
                };
                match completion {
                    Completion::Break(Some(target)) if target == *label => Ok(Completion::Normal),
                    other => Ok(other),
                }
            }
            Stmt::Return { argument } => {
                let value = match argument {
                    Some(expr) => self.eval(expr, env)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(test, env)?.is_truthy() {
                    self.exec(consequent, env)
                } else if let Some(alternate) = alternate {
                    self.exec(alternate, env)
                } else {
                    Ok(Completion::Normal)
                }
            }
            Stmt::While { .. } | Stmt::DoWhile { .. } | Stmt::For { .. } => {
                self.exec_loop(stmt, None, env)
            }
            Stmt::Variable(decl) => {
                self.declare(decl, env)?;
                Ok(Completion::Normal)
            }
            // Hoisted by `exec_stmts`.
            Stmt::FunctionDecl(_) => Ok(Completion::Normal),
            Stmt::Throw { argument } => {
                let value = self.eval(argument, env)?;
                Err(RuntimeError::Thrown { value })
            }
            Stmt::Break { label } => Ok(Completion::Break(label.clone())),
            Stmt::Continue { label } => Ok(Completion::Continue(label.clone())),
            Stmt::Empty => Ok(Completion::Normal),
        }
    }

    fn exec_loop(&mut self, stmt: &Stmt, label: Option<&str>, env: &Env) -> Result<Completion, RuntimeError> {
        match stmt {
            Stmt::While { test, body } => {
                while self.eval(test, env)?.is_truthy() {
                    if let LoopControl::Exit(completion) = self.iterate(body, label, env)? {
                        return Ok(completion);
                    }
                }
            }
            Stmt::DoWhile { body, test } => loop {
                if let LoopControl::Exit(completion) = self.iterate(body, label, env)? {
                    return Ok(completion);
                }
                if !self.eval(test, env)?.is_truthy() {
                    break;
                }
            },
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                let scope = env.child();
                match init {
                    Some(ForInit::Variable(decl)) => self.declare(decl, &scope)?,
                    Some(ForInit::Expression(expr)) => {
                        self.eval(expr, &scope)?;
                    }
                    None => {}
                }
                loop {
                    if let Some(test) = test {
                        if !self.eval(test, &scope)?.is_truthy() {
                            break;
                        }
                    }
                    if let LoopControl::Exit(completion) = self.iterate(body, label, &scope)? {
                        return Ok(completion);
                    }
                    if let Some(update) = update {
                        self.eval(update, &scope)?;
                    }
                }
            }
            other => return self.exec(other, env),
        }
        Ok(Completion::Normal)
    }

    fn iterate(&mut self, body: &Stmt, label: Option<&str>, env: &Env) -> Result<LoopControl, RuntimeError> {
        let control = match self.exec(body, env)? {
            Completion::Normal | Completion::Continue(None) => LoopControl::Next,
            Completion::Continue(Some(target)) if Some(target.as_str()) == label => LoopControl::Next,
            Completion::Break(None) => LoopControl::Exit(Completion::Normal),
            Completion::Break(Some(target)) if Some(target.as_str()) == label => {
                LoopControl::Exit(Completion::Normal)
            }
            other => LoopControl::Exit(other),
        };
        Ok(control)
    }

    fn declare(&mut self, decl: &VariableDeclaration, env: &Env) -> Result<(), RuntimeError> {
        for declarator in &decl.declarations {
            let value = match &declarator.init {
                Some(init) => self.eval(init, env)?,
                None => Value::Undefined,
            };
            env.declare(&declarator.name, value, decl.kind != VarKind::Const);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

impl Interpreter {
    pub(crate) fn eval(&mut self, expr: &Expr, env: &Env) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal.clone())),
            Expr::Identifier(name) => env.get(name),
            Expr::This => Ok(env.lookup("this").unwrap_or(Value::Undefined)),
            Expr::Array { elements } => Ok(Value::array(self.eval_list(elements, env)?)),
            Expr::Object { properties } => {
                let mut map = IndexMap::new();
                for property in properties {
                    let value = self.eval(&property.value, env)?;
                    map.insert(property.key.clone(), value);
                }
                Ok(Value::object(map))
            }
            Expr::Function(func) => Ok(function_value(func, env)),
            Expr::Unary { op, argument } => self.eval_unary(*op, argument, env),
            Expr::Update {
                op,
                prefix,
                argument,
            } => {
                let place = self.place(argument, env)?;
                let old = self.read(&place, env)?.to_number();
                let new = old + op.delta();
                self.write(&place, Value::Number(new), env)?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                apply_binary(*op, &left, &right)
            }
            Expr::Logical { op, left, right } => {
                let left = self.eval(left, env)?;
                let decided = match op {
                    LogicalOp::And => !left.is_truthy(),
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::Nullish => !left.is_nullish(),
                };
                if decided {
                    Ok(left)
                } else {
                    self.eval(right, env)
                }
            }
            Expr::Assign { op, target, value } => {
                let place = self.place(target, env)?;
                let value = match op.binary() {
                    None => self.eval(value, env)?,
                    Some(bin) => {
                        let current = self.read(&place, env)?;
                        let rhs = self.eval(value, env)?;
                        apply_binary(bin, &current, &rhs)?
                    }
                };
                self.write(&place, value.clone(), env)?;
                Ok(value)
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(test, env)?.is_truthy() {
                    self.eval(consequent, env)
                } else {
                    self.eval(alternate, env)
                }
            }
            Expr::Call { callee, arguments } => {
                let (function, this) = match callee.as_ref() {
                    Expr::Member { object, property } => {
                        let object = self.eval(object, env)?;
                        let key = self.property_key(property, env)?;
                        (get_property(&object, &key)?, object)
                    }
                    other => (self.eval(other, env)?, Value::Undefined),
                };
                let args = self.eval_list(arguments, env)?;
                if !function.is_callable() {
                    return Err(RuntimeError::type_error(format!(
                        "{} is not a function",
                        print_expr(callee)
                    )));
                }
                self.call(&function, this, args)
            }
            Expr::New { callee, arguments } => {
                let constructor = self.eval(callee, env)?;
                let args = self.eval_list(arguments, env)?;
                self.construct(&constructor, args, callee)
            }
            Expr::Member { object, property } => {
                let object = self.eval(object, env)?;
                let key = self.property_key(property, env)?;
                get_property(&object, &key)
            }
            Expr::Sequence { expressions } => {
                let mut last = Value::Undefined;
                for e in expressions {
                    last = self.eval(e, env)?;
                }
                Ok(last)
            }
            Expr::Yield { .. } => Err(RuntimeError::Unsupported { what: "yield" }),
            Expr::Await { .. } => Err(RuntimeError::Unsupported { what: "await" }),
        }
    }

    fn eval_list(&mut self, exprs: &[Expr], env: &Env) -> Result<Vec<Value>, RuntimeError> {
        exprs.iter().map(|e| self.eval(e, env)).collect()
    }

    fn eval_unary(&mut self, op: UnaryOp, argument: &Expr, env: &Env) -> Result<Value, RuntimeError> {
        if op == UnaryOp::TypeOf {
            // `typeof` of an undeclared name is not an error.
            if let Expr::Identifier(name) = argument {
                if !env.is_bound(name) {
                    return Ok(Value::from("undefined"));
                }
            }
            let value = self.eval(argument, env)?;
            return Ok(Value::from(value.type_of()));
        }
        let value = self.eval(argument, env)?;
        let result = match op {
            UnaryOp::Not => Value::Bool(!value.is_truthy()),
            UnaryOp::Void => Value::Undefined,
            _ => Value::from(op.apply(&value.to_primitive())),
        };
        Ok(result)
    }

    fn construct(&mut self, constructor: &Value, args: Vec<Value>, callee: &Expr) -> Result<Value, RuntimeError> {
        match constructor {
            Value::Native(Native::ErrorConstructor) => {
                Ok(Value::error(args.into_iter().next().unwrap_or(Value::Undefined)))
            }
            Value::Function(closure) if !closure.func.is_arrow => {
                let instance = Value::object(IndexMap::new());
                let result = self.call(constructor, instance.clone(), args)?;
                match result {
                    Value::Object(_) | Value::Array(_) => Ok(result),
                    _ => Ok(instance),
                }
            }
            _ => Err(RuntimeError::type_error(format!(
                "{} is not a constructor",
                print_expr(callee)
            ))),
        }
    }

    fn property_key(&mut self, property: &MemberProperty, env: &Env) -> Result<String, RuntimeError> {
        match property {
            MemberProperty::Named(name) => Ok(name.clone()),
            MemberProperty::Computed(key) => {
                Ok(self.eval(key, env)?.to_primitive().to_js_string())
            }
        }
    }

    fn place(&mut self, target: &Expr, env: &Env) -> Result<Place, RuntimeError> {
        match target {
            Expr::Identifier(name) => Ok(Place::Binding(name.clone())),
            Expr::Member { object, property } => {
                let object = self.eval(object, env)?;
                let key = self.property_key(property, env)?;
                Ok(Place::Property { object, key })
            }
            _ => Err(RuntimeError::type_error(format!(
                "Invalid assignment target: {}",
                print_expr(target)
            ))),
        }
    }

    fn read(&mut self, place: &Place, env: &Env) -> Result<Value, RuntimeError> {
        match place {
            Place::Binding(name) => env.get(name),
            Place::Property { object, key } => get_property(object, key),
        }
    }

    fn write(&mut self, place: &Place, value: Value, env: &Env) -> Result<(), RuntimeError> {
        match place {
            Place::Binding(name) => env.set(name, value),
            Place::Property { object, key } => set_property(object, key, value),
        }
    }
}

/// The closure a function declaration hoists.
fn closure(func: &Function, env: &Env) -> Value {
    Value::Function(Rc::new(Closure {
        func: Rc::new(func.clone()),
        env: env.clone(),
    }))
}

/// A function expression's value. A named, non-arrow function expression
/// can refer to itself by name.
fn function_value(func: &Function, env: &Env) -> Value {
    match &func.id {
        Some(name) if !func.is_arrow => {
            let scope = env.child();
            let value = closure(func, &scope);
            scope.declare(name, value.clone(), false);
            value
        }
        _ => closure(func, env),
    }
}

fn apply_binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let result = match op {
        BinaryOp::StrictEq => Value::Bool(left.strict_equals(right)),
        BinaryOp::StrictNotEq => Value::Bool(!left.strict_equals(right)),
        BinaryOp::Eq => Value::Bool(left.loose_equals(right)),
        BinaryOp::NotEq => Value::Bool(!left.loose_equals(right)),
        BinaryOp::In => {
            let key = left.to_primitive().to_js_string();
            match right {
                Value::Object(object) => Value::Bool(object.borrow().properties.contains_key(&key)),
                Value::Array(items) => Value::Bool(
                    key == "length" || array_index(&key).is_some_and(|i| i < items.borrow().len()),
                ),
                other => {
                    return Err(RuntimeError::type_error(format!(
                        "Cannot use 'in' operator to search for '{}' in {}",
                        key,
                        other.to_display()
                    )))
                }
            }
        }
        BinaryOp::InstanceOf => match right {
            Value::Native(Native::ErrorConstructor) => Value::Bool(left.is_error()),
            Value::Function(_) | Value::Native(_) => Value::Bool(false),
            _ => {
                return Err(RuntimeError::type_error(
                    "Right-hand side of 'instanceof' is not callable",
                ))
            }
        },
        _ => {
            let left = left.to_primitive();
            let right = right.to_primitive();
            match op.apply(&left, &right) {
                Some(value) => Value::from(value),
                None => {
                    return Err(RuntimeError::type_error(format!(
                        "unsupported operator {}",
                        op.symbol()
                    )))
                }
            }
        }
    };
    Ok(result)
}

/// Largest valid array index, 2^32 - 2.
const MAX_ARRAY_INDEX: usize = u32::MAX as usize - 1;

/// Arrays are stored densely; writes past this length are rejected.
const MAX_DENSE_LENGTH: usize = 1 << 24;

/// Canonical array index: `"3"` but not `"03"`, `"-1"` or `"4294967295"`.
fn array_index(key: &str) -> Option<usize> {
    key.parse::<usize>()
        .ok()
        .filter(|index| *index <= MAX_ARRAY_INDEX && index.to_string() == key)
}

fn range_error(message: String) -> RuntimeError {
    RuntimeError::RangeError { message }
}

fn get_property(object: &Value, key: &str) -> Result<Value, RuntimeError> {
    let value = match object {
        Value::Undefined | Value::Null => {
            return Err(RuntimeError::type_error(format!(
                "Cannot read properties of {} (reading '{}')",
                object.to_display(),
                key
            )))
        }
        Value::String(s) => {
            if key == "length" {
                Value::Number(s.encode_utf16().count() as f64)
            } else if let Some(unit) = array_index(key).and_then(|i| s.encode_utf16().nth(i)) {
                Value::String(String::from_utf16_lossy(&[unit]))
            } else {
                Value::Undefined
            }
        }
        Value::Array(items) => {
            let items = items.borrow();
            if key == "length" {
                Value::Number(items.len() as f64)
            } else {
                array_index(key)
                    .and_then(|i| items.get(i).cloned())
                    .unwrap_or(Value::Undefined)
            }
        }
        Value::Object(object) => object
            .borrow()
            .properties
            .get(key)
            .cloned()
            .unwrap_or(Value::Undefined),
        Value::Function(closure) => match key {
            "name" => Value::String(closure.func.id.clone().unwrap_or_default()),
            "length" => Value::Number(closure.func.params.len() as f64),
            _ => Value::Undefined,
        },
        Value::Bool(_) | Value::Number(_) | Value::Native(_) => Value::Undefined,
    };
    Ok(value)
}

fn set_property(object: &Value, key: &str, value: Value) -> Result<(), RuntimeError> {
    match object {
        Value::Undefined | Value::Null => Err(RuntimeError::type_error(format!(
            "Cannot set properties of {} (setting '{}')",
            object.to_display(),
            key
        ))),
        Value::Array(items) => {
            let mut items = items.borrow_mut();
            if key == "length" {
                let length = value.to_number();
                if length < 0.0 || length.fract() != 0.0 || length > f64::from(u32::MAX) {
                    return Err(range_error("Invalid array length".to_string()));
                }
                let length = length as usize;
                if length > MAX_DENSE_LENGTH {
                    return Err(range_error(format!(
                        "Array length {} exceeds the supported maximum of {}",
                        length, MAX_DENSE_LENGTH
                    )));
                }
                items.resize(length, Value::Undefined);
            } else if let Some(index) = array_index(key) {
                if index >= MAX_DENSE_LENGTH {
                    return Err(range_error(format!(
                        "Array index {} exceeds the supported maximum length of {}",
                        index, MAX_DENSE_LENGTH
                    )));
                }
                if index >= items.len() {
                    items.resize(index + 1, Value::Undefined);
                }
                items[index] = value;
            }
            // Other keys on arrays are not stored.
            Ok(())
        }
        Value::Object(object) => {
            object.borrow_mut().properties.insert(key.to_string(), value);
            Ok(())
        }
        // Writes to primitives and functions are silently dropped.
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_core::ast::Program;
    use pact_core::builder::*;
    use pact_core::ops::{AssignOp, UpdateOp};

    use crate::interpreter::state::run_function;

    fn run(body: Vec<Stmt>, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let program = Program::new(vec![function_decl("main", &["a", "b"], body)]);
        run_function(&program, "main", args)
    }

    #[test]
    fn string_concatenation_and_arithmetic() {
        let result = run(
            vec![ret(Some(binary(
                BinaryOp::Add,
                str_lit("n="),
                binary(BinaryOp::Mul, ident("a"), num(2.0)),
            )))],
            vec![Value::from(21.0)],
        )
        .unwrap();
        assert_eq!(result, Value::from("n=42"));
    }

    #[test]
    fn for_loop_with_continue_and_break() {
        // let total = 0; for (let i = 0; i < 10; i++) { if (i === 2) continue; if (i === 5) break; total += i; } return total;
        let body = vec![
            let_decl("total", num(0.0)),
            for_stmt(
                Some(ForInit::Variable(declaration(VarKind::Let, "i", Some(num(0.0))))),
                Some(binary(BinaryOp::Lt, ident("i"), num(10.0))),
                Some(update(UpdateOp::Increment, false, ident("i"))),
                block(vec![
                    if_stmt(
                        binary(BinaryOp::StrictEq, ident("i"), num(2.0)),
                        Stmt::Continue { label: None },
                        None,
                    ),
                    if_stmt(
                        binary(BinaryOp::StrictEq, ident("i"), num(5.0)),
                        Stmt::Break { label: None },
                        None,
                    ),
                    expr_stmt(assign(AssignOp::AddAssign, ident("total"), ident("i"))),
                ]),
            ),
            ret(Some(ident("total"))),
        ];
        assert_eq!(run(body, vec![]).unwrap(), Value::from(8.0));
    }

    #[test]
    fn labeled_break_leaves_outer_loop() {
        let body = vec![
            let_decl("count", num(0.0)),
            labeled(
                "outer",
                while_stmt(
                    bool_lit(true),
                    block(vec![
                        while_stmt(
                            bool_lit(true),
                            block(vec![
                                expr_stmt(update(UpdateOp::Increment, false, ident("count"))),
                                Stmt::Break {
                                    label: Some("outer".into()),
                                },
                            ]),
                        ),
                    ]),
                ),
            ),
            ret(Some(ident("count"))),
        ];
        assert_eq!(run(body, vec![]).unwrap(), Value::from(1.0));
    }

    #[test]
    fn labeled_block_break() {
        let body = vec![
            let_decl("x", num(1.0)),
            labeled(
                "skip",
                block(vec![
                    Stmt::Break {
                        label: Some("skip".into()),
                    },
                    expr_stmt(assign(AssignOp::Assign, ident("x"), num(2.0))),
                ]),
            ),
            ret(Some(ident("x"))),
        ];
        assert_eq!(run(body, vec![]).unwrap(), Value::from(1.0));
    }

    #[test]
    fn closures_share_state() {
        // const make = () => { let n = 0; return () => ++n; }; const next = make(); next(); return next();
        let body = vec![
            const_decl(
                "make",
                arrow(
                    &[],
                    vec![
                        let_decl("n", num(0.0)),
                        ret(Some(arrow_expr(&[], update(UpdateOp::Increment, true, ident("n"))))),
                    ],
                ),
            ),
            const_decl("next", call(ident("make"), vec![])),
            expr_stmt(call(ident("next"), vec![])),
            ret(Some(call(ident("next"), vec![]))),
        ];
        assert_eq!(run(body, vec![]).unwrap(), Value::from(2.0));
    }

    #[test]
    fn member_access_and_mutation() {
        let body = vec![
            expr_stmt(assign(AssignOp::AddAssign, member(ident("a"), "price"), num(5.0))),
            ret(Some(member(ident("a"), "price"))),
        ];
        let input = Value::from_json(&serde_json::json!({"price": 5}));
        assert_eq!(run(body, vec![input.clone()]).unwrap(), Value::from(10.0));
        assert_eq!(input.to_json(), serde_json::json!({"price": 10}));
    }

    #[test]
    fn lengths_use_utf16_units() {
        let body = vec![ret(Some(member(ident("a"), "length")))];
        assert_eq!(run(body.clone(), vec![Value::from("héllo")]).unwrap(), Value::from(5.0));
        assert_eq!(run(body.clone(), vec![Value::from("😀")]).unwrap(), Value::from(2.0));
        let arr = Value::array(vec![Value::Null, Value::Null]);
        assert_eq!(run(body, vec![arr]).unwrap(), Value::from(2.0));
    }

    #[test]
    fn array_index_writes_extend() {
        let body = vec![
            const_decl("xs", array(vec![])),
            expr_stmt(assign(AssignOp::Assign, index(ident("xs"), num(2.0)), str_lit("c"))),
            ret(Some(member(ident("xs"), "length"))),
        ];
        assert_eq!(run(body, vec![]).unwrap(), Value::from(3.0));
    }

    #[test]
    fn keys_past_the_index_range_are_not_indices() {
        let huge = "18446744073709551615";
        let body = vec![
            const_decl("xs", array(vec![])),
            expr_stmt(assign(AssignOp::Assign, index(ident("xs"), str_lit(huge)), num(1.0))),
            expr_stmt(assign(AssignOp::Assign, index(ident("xs"), str_lit("4294967295")), num(1.0))),
            ret(Some(array(vec![
                member(ident("xs"), "length"),
                index(ident("xs"), str_lit(huge)),
            ]))),
        ];
        assert_eq!(run(body, vec![]).unwrap().to_json(), serde_json::json!([0, null]));
    }

    #[test]
    fn oversized_array_lengths_are_range_errors() {
        let set_length = |length: f64| {
            vec![
                const_decl("xs", array(vec![])),
                expr_stmt(assign(AssignOp::Assign, member(ident("xs"), "length"), num(length))),
            ]
        };
        for length in [1e15, 4294967296.0, -1.0, 1.5, f64::INFINITY] {
            assert!(
                matches!(run(set_length(length), vec![]), Err(RuntimeError::RangeError { .. })),
                "length {}",
                length
            );
        }
        let far_index = vec![
            const_decl("xs", array(vec![])),
            expr_stmt(assign(AssignOp::Assign, index(ident("xs"), num(4294967294.0)), num(1.0))),
        ];
        assert!(matches!(run(far_index, vec![]), Err(RuntimeError::RangeError { .. })));
        let shrink = vec![
            const_decl("xs", array(vec![num(1.0), num(2.0), num(3.0)])),
            expr_stmt(assign(AssignOp::Assign, member(ident("xs"), "length"), num(1.0))),
            ret(Some(ident("xs"))),
        ];
        assert_eq!(run(shrink, vec![]).unwrap().to_json(), serde_json::json!([1]));
    }

    #[test]
    fn thrown_error_carries_message() {
        let body = vec![throw(new_expr(ident("Error"), vec![str_lit("boom")]))];
        let err = run(body, vec![]).unwrap_err();
        assert_eq!(err.thrown_message().as_deref(), Some("boom"));
    }

    #[test]
    fn const_reassignment_is_a_type_error() {
        let body = vec![
            const_decl("k", num(1.0)),
            expr_stmt(assign(AssignOp::Assign, ident("k"), num(2.0))),
        ];
        assert!(matches!(run(body, vec![]), Err(RuntimeError::TypeError { .. })));
    }

    #[test]
    fn typeof_undeclared_and_reference_error() {
        assert_eq!(
            run(vec![ret(Some(type_of(ident("nope"))))], vec![]).unwrap(),
            Value::from("undefined")
        );
        assert!(matches!(
            run(vec![ret(Some(ident("nope")))], vec![]),
            Err(RuntimeError::ReferenceError { .. })
        ));
    }

    #[test]
    fn reading_from_undefined_is_a_type_error() {
        let body = vec![ret(Some(member(ident("b"), "x")))];
        let err = run(body, vec![]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: Cannot read properties of undefined (reading 'x')"
        );
    }

    #[test]
    fn constructors_and_instanceof() {
        let body = vec![
            function_decl(
                "Point",
                &["x"],
                vec![expr_stmt(assign(AssignOp::Assign, member(Expr::This, "x"), ident("x")))],
            ),
            const_decl("p", new_expr(ident("Point"), vec![num(3.0)])),
            const_decl("e", new_expr(ident("Error"), vec![str_lit("m")])),
            ret(Some(array(vec![
                member(ident("p"), "x"),
                binary(BinaryOp::InstanceOf, ident("e"), ident("Error")),
                binary(BinaryOp::In, str_lit("x"), ident("p")),
            ]))),
        ];
        let result = run(body, vec![]).unwrap();
        assert_eq!(result.to_json(), serde_json::json!([3, true, true]));
    }

    #[test]
    fn logical_operators_return_operands() {
        let body = vec![ret(Some(array(vec![
            logical(LogicalOp::Or, num(0.0), str_lit("x")),
            logical(LogicalOp::And, num(1.0), num(2.0)),
            logical(LogicalOp::Nullish, null(), num(3.0)),
            logical(LogicalOp::Nullish, num(0.0), num(3.0)),
        ])))];
        assert_eq!(
            run(body, vec![]).unwrap().to_json(),
            serde_json::json!(["x", 2, 3, 0])
        );
    }

    #[test]
    fn calling_a_non_function() {
        let body = vec![expr_stmt(call(member(ident("a"), "missing"), vec![]))];
        let err = run(body, vec![Value::object(IndexMap::new())]).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: a.missing is not a function");
    }
}
