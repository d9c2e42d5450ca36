//! Named template and style registries.
//!
//! [`Site`] is the embedding layer around the transpilers: it turns trees
//! into text once, at registration, and serves the text by name afterwards.
//! Registration names arrive as nodes from the host runtime and must be
//! string atoms.

use std::collections::BTreeMap;

use rhizome_quill_ir::{Node, StructureError};
use thiserror::Error;
use tracing::debug;

use crate::markup::to_markup;
use crate::resolve::string_of;
use crate::style::to_style;
use crate::vars::VarStore;

/// Errors from registration and lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{kind} '{name}' not registered")]
    NotFound { kind: &'static str, name: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Malformed(#[from] StructureError),
}

/// A name to text map for one kind of entry.
#[derive(Debug, Clone)]
pub struct Registry {
    kind: &'static str,
    entries: BTreeMap<String, String>,
}

impl Registry {
    /// Creates an empty registry. `kind` names the entries in errors.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Stores `text` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, text: impl Into<String>) -> String {
        let name = name.into();
        let replaced = self.entries.insert(name.clone(), text.into()).is_some();
        debug!(kind = self.kind, name = %name, replaced, "registered");
        name
    }

    /// Looks up the text stored under `name`.
    pub fn get(&self, name: &str) -> Result<&str, RegistryError> {
        self.entries
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RegistryError::NotFound {
                kind: self.kind,
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Templates, styles and the variables styles are resolved against.
#[derive(Debug, Clone)]
pub struct Site {
    templates: Registry,
    styles: Registry,
    vars: VarStore,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            templates: Registry::new("template"),
            styles: Registry::new("style"),
            vars: VarStore::new(),
        }
    }
}

fn name_arg(name: &Node, operation: &str) -> Result<String, RegistryError> {
    name.as_str()
        .map(str::to_string)
        .ok_or_else(|| RegistryError::InvalidArgument(format!("{} requires a name string", operation)))
}

impl Site {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transpiles `tree` to markup and stores it under `name`.
    pub fn register_template(&mut self, name: &Node, tree: &Node) -> Result<String, RegistryError> {
        let name = name_arg(name, "register_template")?;
        let markup = to_markup(tree)?;
        Ok(self.templates.register(name, markup))
    }

    /// Stores already-written scriptlet text under `name`.
    pub fn register_template_source(
        &mut self,
        name: &Node,
        source: &Node,
    ) -> Result<String, RegistryError> {
        let name = name_arg(name, "register_template_source")?;
        let source = string_of(source).into_owned();
        Ok(self.templates.register(name, source))
    }

    pub fn template(&self, name: &str) -> Result<&str, RegistryError> {
        self.templates.get(name)
    }

    /// Transpiles `rules` to CSS against the current variables and stores it
    /// under `name`. Later variable changes do not affect stored styles.
    pub fn register_style(&mut self, name: &Node, rules: &Node) -> Result<String, RegistryError> {
        let name = name_arg(name, "register_style")?;
        let css = to_style(rules, Some(&self.vars))?;
        Ok(self.styles.register(name, css))
    }

    pub fn style(&self, name: &str) -> Result<&str, RegistryError> {
        self.styles.get(name)
    }

    /// Binds a style variable. The value is stored as its display string.
    pub fn define_var(&mut self, name: &Node, value: &Node) -> Result<String, RegistryError> {
        let name = name_arg(name, "define_var")?;
        let value = string_of(value).into_owned();
        debug!(name = %name, value = %value, "defined variable");
        self.vars.define(name.clone(), value);
        Ok(name)
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name)
    }

    pub fn templates(&self) -> &Registry {
        &self.templates
    }

    pub fn styles(&self) -> &Registry {
        &self.styles
    }

    pub fn vars(&self) -> &VarStore {
        &self.vars
    }
}
