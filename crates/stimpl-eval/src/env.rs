//! Persistent variable environment for the STIMPL evaluator.
//!
//! The environment is a singly-linked chain of frames, each holding one
//! binding. Frames are never mutated: [`Environment::extend`] allocates a new
//! head that shares the existing chain as its tail, so every older
//! environment stays valid and can be inspected after newer bindings exist.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use stimpl_types::{Type, Value};

/// A single binding frame.
#[derive(Debug)]
pub struct Frame {
    name: String,
    value: Value,
    next: Environment,
}

impl Frame {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn ty(&self) -> Type {
        self.value.ty()
    }
}

/// Binding chain: either the empty terminal or a frame with a tail.
///
/// Lookup walks from the head toward the tail and returns the first frame
/// with a matching name, so newer bindings shadow older ones.
#[derive(Debug, Clone, Default)]
pub enum Environment {
    #[default]
    Empty,
    Frame(Rc<Frame>),
}

impl Environment {
    /// The zero-binding chain.
    pub fn empty() -> Self {
        Self::Empty
    }

    /// A new chain with `name = value` at the head and `self` as the tail.
    ///
    /// Existing bindings of `name` further down are shadowed, not replaced.
    pub fn extend(&self, name: impl Into<String>, value: Value) -> Self {
        Self::Frame(Rc::new(Frame {
            name: name.into(),
            value,
            next: self.clone(),
        }))
    }

    /// Nearest binding of `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.iter()
            .find(|frame| frame.name == name)
            .map(|frame| &frame.value)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Number of frames, shadowed ones included.
    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    /// Frames from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter { cursor: self }
    }

    /// Visible bindings: the nearest frame for every name in the chain.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        let mut bindings = BTreeMap::new();
        for frame in self.iter() {
            bindings
                .entry(frame.name.clone())
                .or_insert_with(|| frame.value.clone());
        }
        bindings
    }

    /// Whether both handles refer to the same chain.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Frame(a), Self::Frame(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Iterator over the frames of an [`Environment`], head first.
pub struct Iter<'a> {
    cursor: &'a Environment,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Frame;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor {
            Environment::Empty => None,
            Environment::Frame(frame) => {
                self.cursor = &frame.next;
                Some(frame.as_ref())
            }
        }
    }
}

impl<'a> IntoIterator for &'a Environment {
    type Item = &'a Frame;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Unlinks uniquely owned frames one at a time. The derived drop would recurse
// once per frame, and long loops build chains deep enough to blow the stack.
impl Drop for Frame {
    fn drop(&mut self) {
        let mut next = std::mem::take(&mut self.next);
        while let Environment::Frame(rc) = next {
            match Rc::try_unwrap(rc) {
                Ok(mut frame) => next = std::mem::take(&mut frame.next),
                Err(_) => break,
            }
        }
    }
}

/// `x: (1, Integer), y: (hi, String)`, head first.
impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: ({}, {})", frame.name, frame.value, frame.ty())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lookup() {
        let env = Environment::empty();
        assert!(env.is_empty());
        assert_eq!(env.lookup("x"), None);
        assert_eq!(env.depth(), 0);
        assert_eq!(env.to_string(), "");
    }

    #[test]
    fn test_extend_and_lookup() {
        let env = Environment::empty()
            .extend("x", Value::Integer(1))
            .extend("y", Value::from("hi"));
        assert_eq!(env.lookup("x"), Some(&Value::Integer(1)));
        assert_eq!(env.lookup("y"), Some(&Value::from("hi")));
        assert_eq!(env.lookup("z"), None);
    }

    #[test]
    fn test_shadowing_keeps_old_snapshot() {
        let old = Environment::empty().extend("x", Value::Integer(1));
        let new = old.extend("x", Value::Integer(2));
        assert_eq!(new.lookup("x"), Some(&Value::Integer(2)));
        assert_eq!(old.lookup("x"), Some(&Value::Integer(1)));
        assert_eq!(new.depth(), 2);
        assert_eq!(new.snapshot().len(), 1);
    }

    #[test]
    fn test_display_head_first() {
        let env = Environment::empty()
            .extend("x", Value::Integer(1))
            .extend("s", Value::from("a"));
        assert_eq!(env.to_string(), "s: (a, String), x: (1, Integer)");
    }

    #[test]
    fn test_ptr_eq() {
        let a = Environment::empty().extend("x", Value::Unit);
        let b = a.clone();
        let c = Environment::empty().extend("x", Value::Unit);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert!(Environment::empty().ptr_eq(&Environment::Empty));
    }

    #[test]
    fn test_drop_long_chain() {
        let mut env = Environment::empty();
        for i in 0..200_000 {
            env = env.extend("i", Value::Integer(i));
        }
        assert_eq!(env.lookup("i"), Some(&Value::Integer(199_999)));
        drop(env);
    }

    #[test]
    fn test_drop_stops_at_shared_tail() {
        let base = Environment::empty().extend("a", Value::Integer(1));
        let branch = base.extend("b", Value::Integer(2));
        drop(branch);
        assert_eq!(base.lookup("a"), Some(&Value::Integer(1)));
    }
}
