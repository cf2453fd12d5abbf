//! Scoped context lookup.
//!
//! Each component owns a [`Scope`] created from its parent's. Values provided
//! in a scope are visible to that scope and every descendant; lookups walk up
//! the parent chain and return the nearest match.
//!
//! # Invariants
//!
//! 1. A lookup never sees values provided in sibling or descendant scopes.
//! 2. Providing a value under a key already provided in the same scope
//!    replaces it; ancestor values are shadowed, never modified.
//! 3. Values are keyed by both key name and value type.

use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;
use std::collections::HashMap;
use std::sync::Arc;

use spin::Mutex;

/// Well-known name under which a context value is provided.
pub struct ContextKey<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> ContextKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for ContextKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ContextKey<T> {}

impl<T> fmt::Debug for ContextKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextKey").field(&self.name).finish()
    }
}

type Slot = (&'static str, TypeId);

struct ScopeNode {
    parent: Option<Arc<ScopeNode>>,
    values: Mutex<HashMap<Slot, Arc<dyn Any + Send + Sync>>>,
}

/// A position in the component tree that can provide and resolve values.
///
/// Cloning a `Scope` creates a new handle to the **same** position.
#[derive(Clone)]
pub struct Scope {
    node: Arc<ScopeNode>,
}

impl Scope {
    /// A scope with no ancestors.
    pub fn root() -> Self {
        Self {
            node: Arc::new(ScopeNode {
                parent: None,
                values: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// A new scope below this one.
    pub fn child(&self) -> Self {
        Self {
            node: Arc::new(ScopeNode {
                parent: Some(Arc::clone(&self.node)),
                values: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Make `value` visible to this scope and its descendants.
    pub fn provide<T: Send + Sync + 'static>(&self, key: ContextKey<T>, value: Arc<T>) {
        self.node
            .values
            .lock()
            .insert((key.name, TypeId::of::<T>()), value);
    }

    /// Remove a value provided in this scope, returning whether one existed.
    pub fn revoke<T: Send + Sync + 'static>(&self, key: ContextKey<T>) -> bool {
        self.node
            .values
            .lock()
            .remove(&(key.name, TypeId::of::<T>()))
            .is_some()
    }

    /// Resolve the nearest value provided under `key`.
    pub fn get<T: Send + Sync + 'static>(&self, key: ContextKey<T>) -> Option<Arc<T>> {
        let slot = (key.name, TypeId::of::<T>());
        let mut node = Some(&self.node);

        while let Some(current) = node {
            let found = current.values.lock().get(&slot).cloned();
            if let Some(value) = found {
                return value.downcast::<T>().ok();
            }
            node = current.parent.as_ref();
        }

        None
    }

    /// Whether both handles refer to the same position.
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0;
        let mut node = self.node.parent.as_ref();
        while let Some(parent) = node {
            depth += 1;
            node = parent.parent.as_ref();
        }
        f.debug_struct("Scope")
            .field("depth", &depth)
            .field("values", &self.node.values.lock().len())
            .finish()
    }
}
