//! `@media` and `@keyframes` rules.

use rhizome_quill_ir::{Node, StructureError, sequence};
use tracing::trace;

use super::{nested, render_properties, rules_at};
use crate::resolve::resolve;
use crate::vars::Variables;

/// `(@media query rule...)`
pub(super) fn compile_media(
    args: &[Node],
    indent: &str,
    vars: Option<&dyn Variables>,
    depth: usize,
) -> Result<String, StructureError> {
    let [query, rules @ ..] = args else {
        trace!("@media rule without a query");
        return Ok(String::new());
    };
    if rules.is_empty() {
        trace!("@media rule without nested rules");
        return Ok(String::new());
    }

    let mut css = format!("{}@media {} {{\n", indent, resolve(query, vars));
    css.push_str(&rules_at(rules, &nested(indent), vars, depth + 1)?);
    css.push_str(&format!("{}}}\n", indent));
    Ok(css)
}

/// `(@keyframes name (label (prop value)...)...)`
pub(super) fn compile_keyframes(
    args: &[Node],
    indent: &str,
    vars: Option<&dyn Variables>,
) -> Result<String, StructureError> {
    let [name, frames @ ..] = args else {
        trace!("@keyframes rule without a name");
        return Ok(String::new());
    };

    let frame_indent = nested(indent);
    let prop_indent = nested(&frame_indent);

    let mut css = format!("{}@keyframes {} {{\n", indent, resolve(name, vars));
    for frame in frames {
        let items = sequence(frame)?;
        let Some((label, props)) = items.split_first() else {
            continue;
        };
        css.push_str(&format!("{}{} {{\n", frame_indent, resolve(label, vars)));
        css.push_str(&render_properties(props, &prop_indent, vars)?);
        css.push_str(&format!("{}}}\n", frame_indent));
    }
    css.push_str(&format!("{}}}\n", indent));
    Ok(css)
}
