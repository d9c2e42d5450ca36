//! S-expression to scriptlet markup and CSS transpilers.
//!
//! Two pure tree-to-text transpilers:
//!
//! - [`to_markup`] turns a template tree into scriptlet markup, using
//!   `<% %>` for control flow, `<%= %>` for escaped and `<%- %>` for raw
//!   interpolation.
//! - [`to_style`] turns a list of rule trees into CSS, substituting
//!   `var(name)` and `--name` references from a [`Variables`] source.
//!
//! The [`registry`] and [`manifest`] modules hold the embedding layer that
//! feeds transpiler output into named registries.
//!
//! ```
//! use rhizome_quill_core::{VarStore, to_markup, to_style};
//! use rhizome_quill_ir::read;
//!
//! let page = read("(p (@ class \"lead\") ($ user.name))").unwrap();
//! assert_eq!(
//!     to_markup(&page).unwrap(),
//!     "<p class=\"lead\"><%= user.name %></p>"
//! );
//!
//! let mut vars = VarStore::new();
//! vars.define("primary", "#667eea");
//! let rules = read("((body (color \"var(primary)\")))").unwrap();
//! assert_eq!(
//!     to_style(&rules, Some(&vars)).unwrap(),
//!     "body {\n  color: #667eea;\n}\n"
//! );
//! ```

pub mod manifest;
pub mod markup;
pub mod registry;
pub mod resolve;
pub mod style;
pub mod vars;

pub use manifest::{Manifest, ManifestError};
pub use markup::{Form, to_markup};
pub use registry::{Registry, RegistryError, Site};
pub use resolve::{escape_html, resolve, resolve_vars, string_of};
pub use style::{RuleKind, render_rules, to_style};
pub use vars::{VarStore, Variables};
