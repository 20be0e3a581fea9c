//! Arena-allocated lexical environments.
//!
//! Frames live in a single `IndexVec` owned by the `Evaluator`; a `Function`
//! value only stores the `Copy`-able [`EnvId`] of its declaring frame, never
//! an `Rc` pointing back into the arena. That keeps a closure and the
//! environment it captures from forming a reference cycle, which an
//! `Rc<RefCell<Environment>>`-per-frame design would risk.

use indexmap::IndexMap;
use zygon_util::{Idx, IndexVec, Symbol};

use crate::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnvId(usize);

impl Idx for EnvId {
    fn from_usize(index: usize) -> Self {
        EnvId(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

pub struct Frame {
    pub bindings: IndexMap<Symbol, Value>,
    pub parent: Option<EnvId>,
}

/// The reserved binding name a block stores its trailing expression's value
/// under.
pub const BLOCK_VALUE: &str = "_";

pub struct Environment {
    frames: IndexVec<EnvId, Frame>,
}

impl Environment {
    pub fn new() -> Self {
        let mut frames = IndexVec::new();
        frames.push(Frame {
            bindings: IndexMap::new(),
            parent: None,
        });
        Environment { frames }
    }

    pub fn root(&self) -> EnvId {
        EnvId(0)
    }

    pub fn new_child(&mut self, parent: EnvId) -> EnvId {
        self.frames.push(Frame {
            bindings: IndexMap::new(),
            parent: Some(parent),
        })
    }

    /// Allocates a fresh frame with no parent, used for the top-level scope
    /// of a freshly loaded module: a module never sees the importer's
    /// bindings, only its own and the builtin registry it `using`s itself.
    pub fn new_isolated_root(&mut self) -> EnvId {
        self.frames.push(Frame {
            bindings: IndexMap::new(),
            parent: None,
        })
    }

    /// Iterates the bindings stored directly in `env`, without walking
    /// outward. Backs `publicToTable`: collecting every `"pub <name>"` entry
    /// out of a just-executed module's top-level frame.
    pub fn local_bindings(&self, env: EnvId) -> impl Iterator<Item = (Symbol, &Value)> {
        self.frames[env].bindings.iter().map(|(k, v)| (*k, v))
    }

    /// Walks the outer chain, as ordinary identifier lookup does.
    pub fn get(&self, env: EnvId, name: Symbol) -> Option<Value> {
        let mut cursor = Some(env);
        while let Some(id) = cursor {
            let frame = self.frames.get(id)?;
            if let Some(value) = frame.bindings.get(&name) {
                return Some(value.clone());
            }
            cursor = frame.parent;
        }
        None
    }

    /// Looks up a name in exactly this frame, without walking outward.
    /// Backs the assignment-statement rebind check: `name: value` rebinds
    /// only when `name` is already bound in the *current* frame, unlike the
    /// reference implementation's full-chain lookup.
    pub fn get_local(&self, env: EnvId, name: Symbol) -> Option<Value> {
        self.frames.get(env)?.bindings.get(&name).cloned()
    }

    pub fn bind(&mut self, env: EnvId, name: Symbol, value: Value) {
        if let Some(frame) = self.frames.get_mut(env) {
            frame.bindings.insert(name, value);
        }
    }

    pub fn parent_of(&self, env: EnvId) -> Option<EnvId> {
        self.frames.get(env).and_then(|f| f.parent)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_lookup_falls_through_to_parent() {
        let mut env = Environment::new();
        let root = env.root();
        env.bind(root, Symbol::intern("x"), Value::Number(1.0));
        let child = env.new_child(root);
        assert_eq!(env.get(child, Symbol::intern("x")), Some(Value::Number(1.0)));
    }

    #[test]
    fn local_lookup_does_not_see_parent_bindings() {
        let mut env = Environment::new();
        let root = env.root();
        env.bind(root, Symbol::intern("x"), Value::Number(1.0));
        let child = env.new_child(root);
        assert_eq!(env.get_local(child, Symbol::intern("x")), None);
    }

    #[test]
    fn rebinding_in_child_does_not_affect_parent() {
        let mut env = Environment::new();
        let root = env.root();
        env.bind(root, Symbol::intern("x"), Value::Number(1.0));
        let child = env.new_child(root);
        env.bind(child, Symbol::intern("x"), Value::Number(2.0));
        assert_eq!(env.get(root, Symbol::intern("x")), Some(Value::Number(1.0)));
        assert_eq!(env.get(child, Symbol::intern("x")), Some(Value::Number(2.0)));
    }
}
