//! Pretty-printer from syntax tree back to source text.
//!
//! Parenthesization is driven by operator precedence: every expression has a
//! binding strength, and a child printed in a context that requires a
//! stronger binding is wrapped in parentheses. The printer never inserts
//! redundant parentheses around a child that binds tightly enough, so the
//! output of [`print_expr`] is also what contract failure messages quote.

use crate::ast::*;
use crate::literal::{number_to_string, Literal};
use crate::ops::{LogicalOp, UnaryOp};

const INDENT: &str = "  ";

// Binding strengths. Binary and logical operators report their own through
// `BinaryOp::precedence` / `LogicalOp::precedence` (4..=14).
const SEQUENCE: u8 = 1;
const ASSIGNMENT: u8 = 2;
const CONDITIONAL: u8 = 3;
const PREFIX: u8 = 15;
const POSTFIX: u8 = 16;
const CALL: u8 = 18;
const MEMBER: u8 = 19;
const PRIMARY: u8 = 20;
/// Forces parentheses around any expression.
const ALWAYS: u8 = PRIMARY + 1;

/// Prints a single expression.
pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::new(0);
    printer.expr(expr, SEQUENCE);
    printer.out
}

/// Prints a single statement at indentation level zero.
pub fn print_stmt(stmt: &Stmt) -> String {
    let mut printer = Printer::new(0);
    printer.stmt(stmt);
    printer.out
}

/// Prints a whole program, one top-level statement per line.
pub fn print_program(program: &Program) -> String {
    let mut printer = Printer::new(0);
    for (i, stmt) in program.body.iter().enumerate() {
        if i > 0 {
            printer.out.push('\n');
        }
        printer.stmt(stmt);
    }
    printer.out.push('\n');
    printer.out
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Literal(Literal::Number(n)) if n.is_sign_negative() && *n != 0.0 => PREFIX,
        Expr::Literal(_)
        | Expr::Identifier(_)
        | Expr::This
        | Expr::Array { .. }
        | Expr::Object { .. } => PRIMARY,
        Expr::Function(func) if func.is_arrow => ASSIGNMENT,
        Expr::Function(_) => PRIMARY,
        Expr::Sequence { .. } => SEQUENCE,
        Expr::Assign { .. } | Expr::Yield { .. } => ASSIGNMENT,
        Expr::Conditional { .. } => CONDITIONAL,
        Expr::Logical { op, .. } => op.precedence(),
        Expr::Binary { op, .. } => op.precedence(),
        Expr::Unary { .. } | Expr::Await { .. } => PREFIX,
        Expr::Update { prefix: true, .. } => PREFIX,
        Expr::Update { prefix: false, .. } => POSTFIX,
        Expr::Call { .. } | Expr::New { .. } => CALL,
        Expr::Member { .. } => MEMBER,
    }
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Quotes a string literal, preferring single quotes unless that would need
/// more escapes than double quotes.
pub fn quote(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn literal_source(literal: &Literal) -> String {
    match literal {
        Literal::Undefined => "undefined".to_string(),
        Literal::Null => "null".to_string(),
        Literal::Bool(b) => b.to_string(),
        Literal::Number(n) => number_to_string(*n),
        Literal::String(s) => quote(s),
    }
}

struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn new(indent: usize) -> Self {
        Printer {
            out: String::new(),
            indent,
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Renders a sub-expression at the current indentation without writing it.
    fn render(&self, expr: &Expr, min: u8) -> String {
        let mut child = Printer::new(self.indent);
        child.expr(expr, min);
        child.out
    }

    fn expr(&mut self, expr: &Expr, min: u8) {
        let wrap = precedence(expr) < min;
        if wrap {
            self.push("(");
        }
        match expr {
            Expr::Literal(literal) => self.push(&literal_source(literal)),
            Expr::Identifier(name) => self.push(name),
            Expr::This => self.push("this"),
            Expr::Array { elements } => {
                self.push("[");
                self.list(elements);
                self.push("]");
            }
            Expr::Object { properties } => {
                if properties.is_empty() {
                    self.push("{}");
                } else {
                    self.push("{ ");
                    for (i, property) in properties.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        if is_identifier_name(&property.key) {
                            self.push(&property.key);
                        } else {
                            self.push(&quote(&property.key));
                        }
                        self.push(": ");
                        self.expr(&property.value, ASSIGNMENT);
                    }
                    self.push(" }");
                }
            }
            Expr::Function(func) => self.function(func),
            Expr::Unary { op, argument } => {
                let operand = self.render(argument, PREFIX);
                self.push(op.symbol());
                let needs_space = match op {
                    UnaryOp::TypeOf | UnaryOp::Void => true,
                    UnaryOp::Minus => operand.starts_with('-'),
                    UnaryOp::Plus => operand.starts_with('+'),
                    UnaryOp::Not | UnaryOp::BitNot => false,
                };
                if needs_space {
                    self.push(" ");
                }
                self.push(&operand);
            }
            Expr::Update {
                op,
                prefix,
                argument,
            } => {
                if *prefix {
                    self.push(op.symbol());
                    self.expr(argument, PREFIX);
                } else {
                    self.expr(argument, POSTFIX);
                    self.push(op.symbol());
                }
            }
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                let (left_min, right_min) = if op.is_right_associative() {
                    // `(-2) ** 2`: a unary operand of `**` must be parenthesized.
                    (POSTFIX, prec)
                } else {
                    (prec, prec + 1)
                };
                self.expr(left, left_min);
                self.push(" ");
                self.push(op.symbol());
                self.push(" ");
                self.expr(right, right_min);
            }
            Expr::Logical { op, left, right } => {
                let prec = op.precedence();
                self.expr(left, logical_operand_min(*op, left, prec));
                self.push(" ");
                self.push(op.symbol());
                self.push(" ");
                self.expr(right, logical_operand_min(*op, right, prec + 1));
            }
            Expr::Assign { op, target, value } => {
                self.expr(target, POSTFIX);
                self.push(" ");
                self.push(op.symbol());
                self.push(" ");
                self.expr(value, ASSIGNMENT);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test, CONDITIONAL + 1);
                self.push(" ? ");
                self.expr(consequent, ASSIGNMENT);
                self.push(" : ");
                self.expr(alternate, ASSIGNMENT);
            }
            Expr::Call { callee, arguments } => {
                self.expr(callee, CALL);
                self.push("(");
                self.list(arguments);
                self.push(")");
            }
            Expr::New { callee, arguments } => {
                self.push("new ");
                self.expr(callee, MEMBER);
                self.push("(");
                self.list(arguments);
                self.push(")");
            }
            Expr::Member { object, property } => {
                // `1.x` would read as a decimal point.
                let integer_object = matches!(
                    (object.as_ref(), property),
                    (Expr::Literal(Literal::Number(n)), MemberProperty::Named(_))
                        if number_to_string(*n).bytes().all(|b| b.is_ascii_digit())
                );
                if integer_object {
                    self.push("(");
                    self.expr(object, SEQUENCE);
                    self.push(")");
                } else {
                    self.expr(object, CALL);
                }
                match property {
                    MemberProperty::Named(name) => {
                        self.push(".");
                        self.push(name);
                    }
                    MemberProperty::Computed(key) => {
                        self.push("[");
                        self.expr(key, SEQUENCE);
                        self.push("]");
                    }
                }
            }
            Expr::Sequence { expressions } => {
                for (i, e) in expressions.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(e, ASSIGNMENT);
                }
            }
            Expr::Yield { argument, delegate } => {
                self.push("yield");
                if *delegate {
                    self.push("*");
                }
                if let Some(arg) = argument {
                    self.push(" ");
                    self.expr(arg, ASSIGNMENT);
                }
            }
            Expr::Await { argument } => {
                self.push("await ");
                self.expr(argument, PREFIX);
            }
        }
        if wrap {
            self.push(")");
        }
    }

    fn list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(item, ASSIGNMENT);
        }
    }

    fn function(&mut self, func: &Function) {
        if func.is_async {
            self.push("async ");
        }
        if func.is_arrow {
            self.push("(");
            self.push(&func.params.join(", "));
            self.push(") => ");
            match &func.body {
                FunctionBody::Block(body) => self.block(body),
                FunctionBody::Expression(expr) => {
                    let min = if matches!(**expr, Expr::Object { .. }) {
                        ALWAYS
                    } else {
                        ASSIGNMENT
                    };
                    self.expr(expr, min);
                }
            }
            return;
        }
        self.push("function");
        if func.is_generator {
            self.push("*");
        }
        if let Some(id) = &func.id {
            self.push(" ");
            self.push(id);
        }
        self.push("(");
        self.push(&func.params.join(", "));
        self.push(") ");
        match &func.body {
            FunctionBody::Block(body) => self.block(body),
            FunctionBody::Expression(expr) => {
                // Only arrows have expression bodies; print an equivalent block.
                self.block(&[Stmt::Return {
                    argument: Some((**expr).clone()),
                }]);
            }
        }
    }

    fn block(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{");
        self.indent += 1;
        for stmt in body {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn declaration(&mut self, decl: &VariableDeclaration) {
        self.push(decl.kind.keyword());
        self.push(" ");
        for (i, declarator) in decl.declarations.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(&declarator.name);
            if let Some(init) = &declarator.init {
                self.push(" = ");
                self.expr(init, ASSIGNMENT);
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression { expression } => {
                let text = self.render(expression, SEQUENCE);
                // A statement may not start with `function`, `async function` or `{`.
                if text.starts_with("function")
                    || text.starts_with("async function")
                    || text.starts_with('{')
                {
                    self.push("(");
                    self.push(&text);
                    self.push(")");
                } else {
                    self.push(&text);
                }
                self.push(";");
            }
            Stmt::Block { body } => self.block(body),
            Stmt::Labeled { label, body } => {
                self.push(label);
                self.push(": ");
                self.stmt(body);
            }
            Stmt::Return { argument } => {
                self.push("return");
                if let Some(arg) = argument {
                    self.push(" ");
                    self.expr(arg, SEQUENCE);
                }
                self.push(";");
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.push("if (");
                self.expr(test, SEQUENCE);
                self.push(") ");
                match alternate {
                    None => self.stmt(consequent),
                    Some(alt) => {
                        if matches!(**consequent, Stmt::Block { .. }) {
                            self.stmt(consequent);
                        } else {
                            self.block(std::slice::from_ref(&**consequent));
                        }
                        self.push(" else ");
                        self.stmt(alt);
                    }
                }
            }
            Stmt::While { test, body } => {
                self.push("while (");
                self.expr(test, SEQUENCE);
                self.push(") ");
                self.stmt(body);
            }
            Stmt::DoWhile { body, test } => {
                self.push("do ");
                self.stmt(body);
                self.push(" while (");
                self.expr(test, SEQUENCE);
                self.push(");");
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                self.push("for (");
                match init {
                    Some(ForInit::Variable(decl)) => self.declaration(decl),
                    Some(ForInit::Expression(expr)) => self.expr(expr, SEQUENCE),
                    None => {}
                }
                self.push(";");
                if let Some(test) = test {
                    self.push(" ");
                    self.expr(test, SEQUENCE);
                }
                self.push(";");
                if let Some(update) = update {
                    self.push(" ");
                    self.expr(update, SEQUENCE);
                }
                self.push(") ");
                self.stmt(body);
            }
            Stmt::Variable(decl) => {
                self.declaration(decl);
                self.push(";");
            }
            Stmt::FunctionDecl(func) => self.function(func),
            Stmt::Throw { argument } => {
                self.push("throw ");
                self.expr(argument, SEQUENCE);
                self.push(";");
            }
            Stmt::Break { label } => {
                self.push("break");
                if let Some(label) = label {
                    self.push(" ");
                    self.push(label);
                }
                self.push(";");
            }
            Stmt::Continue { label } => {
                self.push("continue");
                if let Some(label) = label {
                    self.push(" ");
                    self.push(label);
                }
                self.push(";");
            }
            Stmt::Empty => self.push(";"),
        }
    }
}

/// `??` cannot be mixed with `&&`/`||` without parentheses.
fn logical_operand_min(op: LogicalOp, operand: &Expr, default: u8) -> u8 {
    match operand {
        Expr::Logical { op: inner, .. }
            if (op == LogicalOp::Nullish) != (*inner == LogicalOp::Nullish) =>
        {
            ALWAYS
        }
        _ => default,
    }
}
