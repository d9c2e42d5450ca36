//! Node types.

use std::fmt;
use std::mem;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{MAX_CHAIN_LENGTH, MAX_NESTING_DEPTH};

/// A scalar leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// String literal
    String(String),
    /// Symbol (identifier)
    Symbol(String),
    /// Number
    Number(f64),
    /// Boolean
    Bool(bool),
}

/// A node in an S-expression tree.
///
/// Lists come in two shapes: array-form ([`Node::List`]) as produced by the
/// reader and JSON decoding, and chain-form ([`Node::Pair`]) as built by host
/// runtimes out of head/tail cells. Code that walks children should go
/// through [`crate::seq::sequence`] rather than matching on either shape.
#[derive(Debug, Clone, Default)]
pub enum Node {
    Atom(Atom),
    List(Vec<Node>),
    Pair(Arc<Pair>),
    /// The empty list, also the terminator of a proper chain.
    #[default]
    Nil,
}

/// A head/tail cell.
///
/// The head is fixed at construction. The tail can be replaced with
/// [`Pair::set_cdr`], which is how host runtimes build improper and
/// cyclic chains.
pub struct Pair {
    car: Node,
    cdr: RwLock<Node>,
}

impl Pair {
    /// Returns the head of the cell.
    pub fn car(&self) -> &Node {
        &self.car
    }

    /// Returns the tail of the cell.
    pub fn cdr(&self) -> Node {
        self.cdr
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the tail of the cell.
    pub fn set_cdr(&self, tail: Node) {
        *self.cdr.write().unwrap_or_else(PoisonError::into_inner) = tail;
    }
}

/// Unlinks the tail cell by cell, so dropping a long chain does not
/// recurse once per cell. Stops at the first cell still shared elsewhere.
impl Drop for Pair {
    fn drop(&mut self) {
        let mut tail = mem::take(self.cdr.get_mut().unwrap_or_else(PoisonError::into_inner));
        while let Node::Pair(cell) = tail {
            let Some(mut pair) = Arc::into_inner(cell) else {
                break;
            };
            tail = mem::take(pair.cdr.get_mut().unwrap_or_else(PoisonError::into_inner));
        }
    }
}

impl fmt::Debug for Pair {
    // The tail is left out: it may lead back to this cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pair")
            .field("car", &self.car)
            .finish_non_exhaustive()
    }
}

impl Node {
    /// Creates a string atom.
    pub fn string(value: impl Into<String>) -> Self {
        Node::Atom(Atom::String(value.into()))
    }

    /// Creates a symbol atom.
    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Atom(Atom::Symbol(name.into()))
    }

    /// Creates a number atom.
    pub fn number(value: impl Into<f64>) -> Self {
        Node::Atom(Atom::Number(value.into()))
    }

    /// Creates a boolean atom.
    pub fn bool(value: bool) -> Self {
        Node::Atom(Atom::Bool(value))
    }

    /// Creates an array-form list.
    pub fn list(items: Vec<Node>) -> Self {
        Node::List(items)
    }

    /// Creates a single cell.
    pub fn cons(car: Node, cdr: Node) -> Self {
        Node::Pair(Arc::new(Pair {
            car,
            cdr: RwLock::new(cdr),
        }))
    }

    /// Creates a proper chain of cells terminated by [`Node::Nil`].
    pub fn chain(items: impl IntoIterator<Item = Node>) -> Self {
        Self::improper(items, Node::Nil)
    }

    /// Creates a chain of cells whose last tail is `tail`.
    ///
    /// With no items this is just `tail`.
    pub fn improper(items: impl IntoIterator<Item = Node>, tail: Node) -> Self {
        let items: Vec<Node> = items.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(tail, |rest, item| Node::cons(item, rest))
    }

    /// Returns true if this is the empty-list marker.
    pub fn is_nil(&self) -> bool {
        matches!(self, Node::Nil)
    }

    /// Returns true if this is a list of either shape, including `Nil`.
    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_) | Node::Pair(_) | Node::Nil)
    }

    /// Returns the atom if this is one.
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Node::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    /// Returns the inner string if this is a string atom.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Atom(Atom::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the symbol name if this is a symbol atom.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Node::Atom(Atom::Symbol(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner number if this is a number atom.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Node::Atom(Atom::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Returns the inner boolean if this is a boolean atom.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Atom(Atom::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Returns the items if this is an array-form list.
    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the cell if this is chain-form.
    pub fn as_pair(&self) -> Option<&Arc<Pair>> {
        match self {
            Node::Pair(pair) => Some(pair),
            _ => None,
        }
    }
}

/// Equality is structural for atoms and array-form lists and by identity
/// for cells, so comparing cyclic chains terminates.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Atom(a), Node::Atom(b)) => a == b,
            (Node::List(a), Node::List(b)) => a == b,
            (Node::Pair(a), Node::Pair(b)) => Arc::ptr_eq(a, b),
            (Node::Nil, Node::Nil) => true,
            _ => false,
        }
    }
}

/// Formats a number the way the scriptlet host prints it.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n != 0.0 && (n.abs() >= 1e21 || n.abs() < 1e-6) {
        // exponent form, with an explicit sign on positive exponents
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
            Atom::Symbol(name) => f.write_str(name),
            Atom::Number(n) => f.write_str(&format_number(*n)),
            Atom::Bool(b) => f.write_str(if *b { "#t" } else { "#f" }),
        }
    }
}

/// Prints the node as S-expression source that [`crate::reader::read`]
/// accepts back.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, 0)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
    if depth > MAX_NESTING_DEPTH {
        return f.write_str("...");
    }
    match node {
        Node::Atom(atom) => write!(f, "{}", atom),
        Node::Nil => f.write_str("()"),
        Node::List(items) => {
            f.write_str("(")?;
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    f.write_str(" ")?;
                }
                write_node(f, item, depth + 1)?;
            }
            f.write_str(")")
        }
        Node::Pair(first) => {
            f.write_str("(")?;
            write_node(f, first.car(), depth + 1)?;
            let mut rest = first.cdr();
            let mut cells = 1;
            loop {
                match rest {
                    Node::Nil => break,
                    Node::Pair(pair) => {
                        if cells == MAX_CHAIN_LENGTH {
                            f.write_str(" ...")?;
                            break;
                        }
                        f.write_str(" ")?;
                        write_node(f, pair.car(), depth + 1)?;
                        rest = pair.cdr();
                        cells += 1;
                    }
                    tail => {
                        f.write_str(" . ")?;
                        write_node(f, &tail, depth + 1)?;
                        break;
                    }
                }
            }
            f.write_str(")")
        }
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::bool(value)
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::number(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::number(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::string(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::string(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::list(value)
    }
}
