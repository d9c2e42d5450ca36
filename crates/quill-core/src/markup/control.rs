//! `if` and `for` forms.
//!
//! Conditions and iterables are copied into the output as written; they
//! are script for the template engine, not checked here.

use rhizome_quill_ir::{Node, StructureError};
use tracing::trace;

use super::markup_at;
use crate::resolve::string_of;

/// `(if cond then [else])`
pub(super) fn compile_if(args: &[Node], depth: usize) -> Result<String, StructureError> {
    let Some((cond, branches)) = args.split_first() else {
        trace!("if form without a condition");
        return Ok(String::new());
    };

    let mut code = format!("<% if ({}) {{ %>", string_of(cond));
    if let Some(then_branch) = branches.first() {
        code.push_str(&markup_at(then_branch, depth + 1)?);
    }
    if let Some(else_branch) = branches.get(1) {
        code.push_str("<% } else { %>");
        code.push_str(&markup_at(else_branch, depth + 1)?);
    }
    code.push_str("<% } %>");
    Ok(code)
}

/// `(for name in iterable body...)`
pub(super) fn compile_for(args: &[Node], depth: usize) -> Result<String, StructureError> {
    if args.len() < 3 {
        trace!(got = args.len(), "for form needs at least 3 arguments");
        return Ok(String::new());
    }

    // args[1] is the `in` keyword
    let mut code = format!(
        "<% for (const {} of {}) {{ %>",
        string_of(&args[0]),
        string_of(&args[2])
    );
    for item in &args[3..] {
        code.push_str(&markup_at(item, depth + 1)?);
    }
    code.push_str("<% } %>");
    Ok(code)
}
