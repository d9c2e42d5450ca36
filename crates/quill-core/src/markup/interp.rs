//! `$` and `$raw` interpolation.
//!
//! A string literal is known at transpile time, so it is written out
//! directly (escaped for `$`). Anything else is an expression for the
//! template engine and goes inside a scriptlet tag as written.

use rhizome_quill_ir::{Atom, Node};
use tracing::trace;

use crate::resolve::{escape_html, string_of};

/// `($ expr)`
pub(super) fn escaped(args: &[Node]) -> String {
    match args.first() {
        None => {
            trace!("empty $ form");
            String::new()
        }
        Some(Node::Atom(Atom::String(literal))) => escape_html(literal),
        Some(expr) => format!("<%= {} %>", string_of(expr)),
    }
}

/// `($raw expr)`
pub(super) fn raw(args: &[Node]) -> String {
    match args.first() {
        None => {
            trace!("empty $raw form");
            String::new()
        }
        Some(Node::Atom(Atom::String(literal))) => literal.clone(),
        Some(expr) => format!("<%- {} %>", string_of(expr)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaped_literal() {
        assert_eq!(escaped(&[Node::string("a<b")]), "a&lt;b");
        assert_eq!(escaped(&[Node::string("\"q\" & 'a'")]), "&quot;q&quot; &amp; &#39;a&#39;");
    }

    #[test]
    fn test_escaped_expression() {
        assert_eq!(escaped(&[Node::symbol("user.name")]), "<%= user.name %>");
        assert_eq!(escaped(&[Node::number(3)]), "<%= 3 %>");
        let call = Node::list(vec![Node::symbol("f"), Node::string("x")]);
        assert_eq!(escaped(&[call]), "<%= (f \"x\") %>");
    }

    #[test]
    fn test_raw() {
        assert_eq!(raw(&[Node::string("a<b")]), "a<b");
        assert_eq!(raw(&[Node::symbol("body")]), "<%- body %>");
    }

    #[test]
    fn test_extra_arguments_ignored() {
        assert_eq!(escaped(&[Node::symbol("a"), Node::symbol("b")]), "<%= a %>");
    }

    #[test]
    fn test_empty() {
        assert_eq!(escaped(&[]), "");
        assert_eq!(raw(&[]), "");
    }
}
