use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::Value;

/// Shared mutable symbol table. A scope is a frame of name/value bindings
/// with an optional parent; reads fall through the chain, writes always land
/// in the frame they are issued against. Cloning a `Scope` clones the handle,
/// not the bindings, which is what gives function assignments their
/// by-reference capture semantics.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    inner: Rc<RefCell<Frame>>,
}

#[derive(Debug, Default)]
struct Frame {
    vars: HashMap<String, Value>,
    parent: Option<Scope>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A call frame layered over `parent`. Parameters set in the child shadow
    /// the parent; the parent stays visible for everything else.
    pub fn child(parent: &Scope) -> Self {
        Scope {
            inner: Rc::new(RefCell::new(Frame {
                vars: HashMap::new(),
                parent: Some(parent.clone()),
            })),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let frame = self.inner.borrow();
        if let Some(v) = frame.vars.get(name) {
            return Some(v.clone());
        }
        frame.parent.as_ref().and_then(|p| p.get(name))
    }

    pub fn set(&self, name: &str, value: Value) {
        self.inner.borrow_mut().vars.insert(name.to_string(), value);
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.inner.borrow_mut().vars.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        let frame = self.inner.borrow();
        frame.vars.contains_key(name)
            || frame
                .parent
                .as_ref()
                .map(|p| p.contains(name))
                .unwrap_or(false)
    }

    /// Names bound in this frame only, unsorted.
    pub fn local_names(&self) -> Vec<String> {
        self.inner.borrow().vars.keys().cloned().collect()
    }

    /// Two scopes are the same frame (not merely equal contents).
    pub fn same_frame(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_reads_fall_through_and_writes_stay_local() {
        let root = Scope::new();
        root.set("a", Value::Num(1.0));
        let frame = Scope::child(&root);
        assert_eq!(frame.get("a"), Some(Value::Num(1.0)));
        frame.set("a", Value::Num(2.0));
        assert_eq!(frame.get("a"), Some(Value::Num(2.0)));
        assert_eq!(root.get("a"), Some(Value::Num(1.0)));
    }

    #[test]
    fn clone_shares_bindings() {
        let scope = Scope::new();
        let alias = scope.clone();
        alias.set("x", Value::Num(5.0));
        assert_eq!(scope.get("x"), Some(Value::Num(5.0)));
        assert!(scope.same_frame(&alias));
    }
}
