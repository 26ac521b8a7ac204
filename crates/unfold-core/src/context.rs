//! Callable and variable registries, and the expansion context.
//!
//! These replace ambient global lookups: everything a macro can reach by
//! name is passed in explicitly through a [`Context`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::story::SectionStore;

/// A zero-argument callable producing text.
pub type Callable = Box<dyn Fn() -> String>;

/// Named callables reachable from `{#name}` macros and `data-call-function` links.
#[derive(Default)]
pub struct Callables {
    entries: HashMap<String, Callable>,
}

impl fmt::Debug for Callables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callables")
            .field("names", &self.names())
            .finish()
    }
}

impl Callables {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callable, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, f: impl Fn() -> String + 'static) {
        self.entries.insert(name.into(), Box::new(f));
    }

    /// Builder form of [`Callables::register`].
    pub fn with(mut self, name: impl Into<String>, f: impl Fn() -> String + 'static) -> Self {
        self.register(name, f);
        self
    }

    /// Invoke a callable by name. `None` if it is not registered.
    pub fn invoke(&self, name: &str) -> Option<String> {
        self.entries.get(name).map(|f| f())
    }

    /// Whether a callable is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Named string values reachable from `{$name}` macros.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from JSON values, using each value's string representation.
    pub fn from_json<'a>(
        values: impl IntoIterator<Item = (&'a String, &'a serde_json::Value)>,
    ) -> Self {
        let mut vars = Self::new();
        for (name, value) in values {
            vars.set(name.clone(), display_value(value));
        }
        vars
    }

    /// Set a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`Variables::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Look up a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Remove a variable, returning its old value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// String form of a JSON value as substituted into markup.
fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Everything expansion may read: sections, callables, and variables.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    sections: &'a dyn SectionStore,
    callables: &'a Callables,
    variables: &'a Variables,
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("sections", &self.sections.section_ids().len())
            .field("callables", self.callables)
            .field("variables", self.variables)
            .finish()
    }
}

impl<'a> Context<'a> {
    /// Bundle a store and registries.
    pub fn new(
        sections: &'a dyn SectionStore,
        callables: &'a Callables,
        variables: &'a Variables,
    ) -> Self {
        Self {
            sections,
            callables,
            variables,
        }
    }

    /// The section store.
    pub fn sections(&self) -> &'a dyn SectionStore {
        self.sections
    }

    /// The callable registry.
    pub fn callables(&self) -> &'a Callables {
        self.callables
    }

    /// The variable registry.
    pub fn variables(&self) -> &'a Variables {
        self.variables
    }
}
