//! S-expression to scriptlet markup.
//!
//! A list `(head ...rest)` is dispatched on the text of its head:
//!
//! | Head | Output |
//! |------|--------|
//! | `$` | escaped interpolation, `<%= expr %>` |
//! | `$raw` | raw interpolation, `<%- expr %>` |
//! | `if` | `<% if (cond) { %>...<% } else { %>...<% } %>` |
//! | `for` | `<% for (const x of xs) { %>...<% } %>` |
//! | `@` | attribute list, `key="value" ...` |
//! | anything else | an element named by the head |
//!
//! Incomplete forms produce partial or empty output instead of errors. The
//! only failure is a [`StructureError`] for cyclic or over-deep input.

mod control;
mod element;
mod interp;

use rhizome_quill_ir::seq::check_depth;
use rhizome_quill_ir::{Node, StructureError, sequence};

use crate::resolve::string_of;

/// The special forms recognized at the head of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Escaped,
    Raw,
    If,
    For,
    Attributes,
    Element,
}

impl Form {
    /// Classifies a head token. Anything unrecognized is an element.
    pub fn from_head(head: &str) -> Self {
        match head {
            "$" => Form::Escaped,
            "$raw" => Form::Raw,
            "if" => Form::If,
            "for" => Form::For,
            "@" => Form::Attributes,
            _ => Form::Element,
        }
    }
}

/// Transpile a template tree to scriptlet markup.
pub fn to_markup(node: &Node) -> Result<String, StructureError> {
    markup_at(node, 0)
}

pub(crate) fn markup_at(node: &Node, depth: usize) -> Result<String, StructureError> {
    check_depth(depth)?;

    if let Node::Atom(_) = node {
        return Ok(string_of(node).into_owned());
    }

    let items = sequence(node)?;
    let Some((head, rest)) = items.split_first() else {
        return Ok(String::new());
    };

    let head = string_of(head);
    match Form::from_head(&head) {
        Form::Escaped => Ok(interp::escaped(rest)),
        Form::Raw => Ok(interp::raw(rest)),
        Form::If => control::compile_if(rest, depth),
        Form::For => control::compile_for(rest, depth),
        Form::Attributes => element::compile_attributes(rest, depth),
        Form::Element => element::compile_element(&head, rest, depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_from_head() {
        assert_eq!(Form::from_head("$"), Form::Escaped);
        assert_eq!(Form::from_head("$raw"), Form::Raw);
        assert_eq!(Form::from_head("if"), Form::If);
        assert_eq!(Form::from_head("for"), Form::For);
        assert_eq!(Form::from_head("@"), Form::Attributes);
        assert_eq!(Form::from_head("div"), Form::Element);
        assert_eq!(Form::from_head("IF"), Form::Element);
    }

    #[test]
    fn test_atoms() {
        assert_eq!(to_markup(&Node::string("<b>")).unwrap(), "<b>");
        assert_eq!(to_markup(&Node::symbol("name")).unwrap(), "name");
        assert_eq!(to_markup(&Node::number(7)).unwrap(), "7");
        assert_eq!(to_markup(&Node::bool(true)).unwrap(), "true");
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(to_markup(&Node::Nil).unwrap(), "");
        assert_eq!(to_markup(&Node::list(vec![])).unwrap(), "");
    }

    #[test]
    fn test_depth_limit() {
        let mut node = Node::string("leaf");
        for _ in 0..rhizome_quill_ir::MAX_NESTING_DEPTH + 2 {
            node = Node::list(vec![Node::symbol("div"), node]);
        }
        assert!(matches!(
            to_markup(&node),
            Err(StructureError::NestingTooDeep { .. })
        ));
    }
}
