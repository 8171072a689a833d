use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

struct Scope {
    values: HashMap<String, Value>,
    outer: Option<Environment>,
}

/// A chain of variable scopes.
///
/// `Environment` is a shared handle: clones see and mutate the same scope.
/// Functions capture the environment they were defined in, and every call
/// evaluates its body in a fresh scope nested inside the captured one.
#[derive(Clone)]
pub struct Environment(Rc<RefCell<Scope>>);

impl Environment {
    /// An empty outermost scope.
    pub fn new() -> Self {
        Environment(Rc::new(RefCell::new(Scope {
            values: HashMap::new(),
            outer: None,
        })))
    }

    /// An empty scope nested inside `outer`.
    pub fn nested(outer: &Environment) -> Self {
        Environment(Rc::new(RefCell::new(Scope {
            values: HashMap::new(),
            outer: Some(outer.clone()),
        })))
    }

    pub fn outer(&self) -> Option<Environment> {
        self.0.borrow().outer.clone()
    }

    /// Looks `name` up from this scope outwards.
    pub fn get(&self, name: &str) -> Option<Value> {
        let scope = self.0.borrow();
        match scope.values.get(name) {
            Some(value) => Some(value.clone()),
            None => scope.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn put_new(&self, name: &str, value: Value) {
        self.0.borrow_mut().values.insert(name.to_string(), value);
    }

    /// Updates `name` in the innermost scope that binds it, or binds it in
    /// this scope if none does.
    pub fn put(&self, name: &str, value: Value) {
        let target = self.locate(name).unwrap_or_else(|| self.clone());
        target.put_new(name, value);
    }

    /// The innermost scope binding `name`.
    pub fn locate(&self, name: &str) -> Option<Environment> {
        if self.0.borrow().values.contains_key(name) {
            return Some(self.clone());
        }
        self.outer().and_then(|outer| outer.locate(name))
    }

    /// Names bound directly in this scope, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.borrow().values.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

// Scopes hold functions that hold scopes, so only names are printed.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scopes = f.debug_list();
        let mut current = Some(self.clone());
        while let Some(env) = current {
            scopes.entry(&env.names());
            current = env.outer();
        }
        scopes.finish()
    }
}
