//! Lexical scopes.
//!
//! An [`Env`] is a shared handle to one scope frame; closures keep the
//! frame they were created in alive. `const` bindings reject assignment.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::error::RuntimeError;
use super::value::Value;

#[derive(Clone)]
pub struct Env(Rc<RefCell<Frame>>);

struct Frame {
    bindings: HashMap<String, Binding>,
    parent: Option<Env>,
}

struct Binding {
    value: Value,
    mutable: bool,
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0.borrow();
        let mut names: Vec<&String> = frame.bindings.keys().collect();
        names.sort();
        f.debug_struct("Env")
            .field("bindings", &names)
            .field("has_parent", &frame.parent.is_some())
            .finish()
    }
}

impl Env {
    /// A scope with no parent.
    pub fn root() -> Env {
        Env(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            parent: None,
        })))
    }

    pub fn child(&self) -> Env {
        Env(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    /// Binds `name` in this frame, replacing any binding it already has.
    pub fn declare(&self, name: &str, value: Value, mutable: bool) {
        self.0
            .borrow_mut()
            .bindings
            .insert(name.to_string(), Binding { value, mutable });
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let frame = self.0.borrow();
        match frame.bindings.get(name) {
            Some(binding) => Some(binding.value.clone()),
            None => frame.parent.as_ref().and_then(|parent| parent.lookup(name)),
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        self.lookup(name).ok_or_else(|| RuntimeError::ReferenceError {
            name: name.to_string(),
        })
    }

    /// Assigns to the nearest binding of `name`.
    pub fn set(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let mut frame = self.0.borrow_mut();
        if let Some(binding) = frame.bindings.get_mut(name) {
            if !binding.mutable {
                return Err(RuntimeError::type_error("Assignment to constant variable."));
            }
            binding.value = value;
            return Ok(());
        }
        match &frame.parent {
            Some(parent) => parent.set(name, value),
            None => Err(RuntimeError::ReferenceError {
                name: name.to_string(),
            }),
        }
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_parents() {
        let root = Env::root();
        root.declare("x", Value::from(1.0), true);
        let child = root.child();
        assert_eq!(child.get("x").unwrap(), Value::from(1.0));
        child.declare("x", Value::from(2.0), true);
        assert_eq!(child.get("x").unwrap(), Value::from(2.0));
        assert_eq!(root.get("x").unwrap(), Value::from(1.0));
    }

    #[test]
    fn assignment_reaches_the_declaring_frame() {
        let root = Env::root();
        root.declare("count", Value::from(0.0), true);
        let child = root.child();
        child.set("count", Value::from(5.0)).unwrap();
        assert_eq!(root.get("count").unwrap(), Value::from(5.0));
    }

    #[test]
    fn const_and_undeclared() {
        let root = Env::root();
        root.declare("k", Value::from(1.0), false);
        assert!(matches!(
            root.set("k", Value::from(2.0)),
            Err(RuntimeError::TypeError { .. })
        ));
        assert!(matches!(
            root.get("missing"),
            Err(RuntimeError::ReferenceError { .. })
        ));
        assert!(!root.is_bound("missing"));
    }
}
