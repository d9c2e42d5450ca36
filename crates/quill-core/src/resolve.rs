//! Value resolver: display strings for nodes and variable substitution.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use rhizome_quill_ir::{Atom, Node};

use crate::vars::Variables;

/// The whole string is `var(NAME)`.
static WHOLE_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^var\(([^)]+)\)$").expect("valid pattern"));

/// Any `var(NAME)` inside the string.
static ANY_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var\(([^)]+)\)").expect("valid pattern"));

/// The whole string is `--NAME`.
static CUSTOM_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--([A-Za-z0-9_-]+)$").expect("valid pattern"));

/// Returns the display string of a node.
///
/// Strings and symbols yield their text, numbers and booleans the way the
/// scriptlet host prints them, and lists their S-expression source.
pub fn string_of(node: &Node) -> Cow<'_, str> {
    match node {
        Node::Atom(Atom::String(s)) | Node::Atom(Atom::Symbol(s)) => Cow::Borrowed(s),
        Node::Atom(Atom::Bool(b)) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Node::Atom(atom @ Atom::Number(_)) => Cow::Owned(atom.to_string()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Substitutes variable references in `text`.
///
/// In order:
/// 1. a string that is entirely `var(NAME)` becomes the value of `NAME`;
/// 2. otherwise every `var(NAME)` inside it is replaced;
/// 3. a result that is entirely `--NAME` becomes the value of `NAME`.
///
/// References to unbound names are left as written. Without a variable
/// source the text is returned unchanged.
pub fn resolve_vars(text: &str, vars: Option<&dyn Variables>) -> String {
    let Some(vars) = vars else {
        return text.to_string();
    };

    if let Some(caps) = WHOLE_VAR.captures(text) {
        return vars.get(&caps[1]).unwrap_or(text).to_string();
    }

    let replaced = ANY_VAR.replace_all(text, |caps: &Captures<'_>| {
        vars.get(&caps[1]).unwrap_or(&caps[0]).to_string()
    });

    if let Some(caps) = CUSTOM_PROPERTY.captures(&replaced) {
        if let Some(value) = vars.get(&caps[1]) {
            return value.to_string();
        }
    }

    replaced.into_owned()
}

/// [`string_of`] followed by [`resolve_vars`].
pub fn resolve(node: &Node, vars: Option<&dyn Variables>) -> String {
    resolve_vars(&string_of(node), vars)
}

/// Escapes `& < > " '` as HTML entities.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
