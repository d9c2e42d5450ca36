//! S-expression node types for Quill.
//!
//! This crate defines the tree representation consumed by the Quill
//! transpilers, together with the pieces that produce and normalize it:
//!
//! - [`Node`]: an atom (string, symbol, number, boolean), an array-form list,
//!   a chain of head/tail [`Pair`] cells, or the empty-list marker.
//! - [`seq`]: the sequence adapter that flattens both list representations
//!   into one ordered slice.
//! - [`reader`]: reads S-expression source text into nodes.
//! - [`json`]: converts nodes to and from JSON.
//!
//! # Example
//!
//! ```
//! use rhizome_quill_ir::{reader, seq};
//!
//! let node = reader::read("(p (@ class \"lead\") \"hello\")").unwrap();
//! let items = seq::sequence(&node).unwrap();
//! assert_eq!(items.len(), 3);
//! assert_eq!(items[0].as_symbol(), Some("p"));
//! ```

mod node;
pub mod json;
pub mod reader;
pub mod seq;

pub use node::{Atom, Node, Pair};
pub use reader::{ReadError, read, read_all, read_document};
pub use seq::{StructureError, sequence};

/// Maximum number of cells read from a single head/tail chain.
///
/// Chains longer than this are treated as cyclic and rejected.
pub const MAX_CHAIN_LENGTH: usize = 1 << 16;

/// Maximum list nesting accepted when walking a node tree.
///
/// A cell whose tail is later pointed back at an ancestor forms a cycle
/// through the tree rather than through one chain; this bound catches it.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Maximum nesting depth accepted by the reader.
pub const MAX_PARSE_DEPTH: usize = 256;
