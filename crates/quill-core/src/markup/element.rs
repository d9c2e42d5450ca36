//! Elements and `@` attribute lists.

use rhizome_quill_ir::seq::head_of;
use rhizome_quill_ir::{Node, StructureError};
use tracing::trace;

use super::{Form, markup_at};
use crate::resolve::string_of;

/// Elements written as `<tag />` when they have no content.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}

/// Returns true if `node` is a list headed by `@`.
fn is_attribute_list(node: &Node) -> bool {
    head_of(node).is_some_and(|head| Form::from_head(&string_of(head)) == Form::Attributes)
}

/// `(@ key value ...)`
pub(super) fn compile_attributes(args: &[Node], depth: usize) -> Result<String, StructureError> {
    if args.len() % 2 == 1 {
        trace!("dropping attribute key without a value");
    }

    let mut attrs = Vec::with_capacity(args.len() / 2);
    for pair in args.chunks_exact(2) {
        let key = markup_at(&pair[0], depth + 1)?;
        let value = markup_at(&pair[1], depth + 1)?;
        attrs.push(format!("{}=\"{}\"", key, value));
    }
    Ok(attrs.join(" "))
}

/// `(tag [(@ ...)] children...)`
pub(super) fn compile_element(
    tag: &str,
    args: &[Node],
    depth: usize,
) -> Result<String, StructureError> {
    let mut attrs = String::new();
    let mut children = args;
    if let Some((first, rest)) = args.split_first() {
        if is_attribute_list(first) {
            attrs = format!(" {}", markup_at(first, depth + 1)?);
            children = rest;
        }
    }

    let mut content = String::new();
    for child in children {
        content.push_str(&markup_at(child, depth + 1)?);
    }

    if content.is_empty() && is_void(tag) {
        return Ok(format!("<{}{} />", tag, attrs));
    }
    Ok(format!("<{tag}{attrs}>{content}</{tag}>"))
}
