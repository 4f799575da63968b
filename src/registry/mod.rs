//! Named functions callable from scripts.

pub(crate) mod builtins;
mod effects;

pub use builtins::MAX_DELAY_MS;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::result::ScriptError;
use crate::script::{ScriptContext, Value};

/// A callable registered under a name.
///
/// Arguments arrive with placeholders already resolved. Returning `Err`
/// aborts the whole script; soft failures should return `Ok(false)`.
pub type ScriptFunction =
    Arc<dyn Fn(&mut ScriptContext, &[Value]) -> Result<Value, ScriptError> + Send + Sync>;

/// Process-wide name → function table.
///
/// Registration and removal may race with lookups from scripts running on
/// other threads. Lookups hand out a clone of the function, so no lock is
/// held while it runs.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: RwLock<HashMap<String, ScriptFunction>>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in function.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        builtins::install(&registry);
        registry
    }

    /// Register `function` under `name`.
    ///
    /// Returns `false` and leaves the table untouched if the name is taken.
    pub fn register<F>(&self, name: impl Into<String>, function: F) -> bool
    where
        F: Fn(&mut ScriptContext, &[Value]) -> Result<Value, ScriptError> + Send + Sync + 'static,
    {
        self.register_shared(name, Arc::new(function))
    }

    /// Register an already shared function.
    pub fn register_shared(&self, name: impl Into<String>, function: ScriptFunction) -> bool {
        let name = name.into();
        match self.functions.write().entry(name) {
            Entry::Occupied(entry) => {
                info!(name = %entry.key(), "function already registered");
                false
            }
            Entry::Vacant(entry) => {
                debug!(name = %entry.key(), "registered function");
                entry.insert(function);
                true
            }
        }
    }

    /// Remove a function, reporting whether it existed.
    pub fn unregister(&self, name: &str) -> bool {
        self.functions.write().remove(name).is_some()
    }

    /// Look up a function by name.
    pub fn lookup(&self, name: &str) -> Option<ScriptFunction> {
        self.functions.read().get(name).cloned()
    }

    /// Whether a function is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.functions.read().is_empty()
    }
}
