//! S-expression to CSS.
//!
//! Input is a list of rules. Each rule is a list whose head picks its kind:
//!
//! ```text
//! ("body" ("margin" "0"))                         ; selector block
//! ("@media" "screen" ("p" ("color" "red")))       ; media query, nested rules
//! ("keyframes" "fade" ("from" ("opacity" "0")))   ; keyframes, one block per frame
//! ```
//!
//! Heads, queries, names, property names and values all go through
//! variable resolution. Each nesting level indents by two spaces.

mod at_rule;

use rhizome_quill_ir::seq::check_depth;
use rhizome_quill_ir::{Node, StructureError, sequence};
use tracing::trace;

use crate::resolve::resolve;
use crate::vars::Variables;

const INDENT_STEP: &str = "  ";

/// The rule kinds recognized at the head of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Media,
    Keyframes,
    Selector,
}

impl RuleKind {
    /// Classifies a resolved head. Anything unrecognized is a selector.
    pub fn from_head(head: &str) -> Self {
        match head {
            "@media" | "@" => RuleKind::Media,
            "@keyframes" | "keyframes" => RuleKind::Keyframes,
            _ => RuleKind::Selector,
        }
    }
}

/// Transpile a list of rules to CSS.
pub fn to_style(rules: &Node, vars: Option<&dyn Variables>) -> Result<String, StructureError> {
    render_rules(&sequence(rules)?, "", vars)
}

/// Render a sequence of rules, each line prefixed with `indent`.
pub fn render_rules(
    rules: &[Node],
    indent: &str,
    vars: Option<&dyn Variables>,
) -> Result<String, StructureError> {
    rules_at(rules, indent, vars, 0)
}

fn nested(indent: &str) -> String {
    format!("{}{}", indent, INDENT_STEP)
}

pub(crate) fn rules_at(
    rules: &[Node],
    indent: &str,
    vars: Option<&dyn Variables>,
    depth: usize,
) -> Result<String, StructureError> {
    check_depth(depth)?;

    let mut css = String::new();
    for rule in rules {
        let items = sequence(rule)?;
        let Some((head, rest)) = items.split_first() else {
            trace!("skipping non-list rule");
            continue;
        };

        let head = resolve(head, vars);
        match RuleKind::from_head(&head) {
            RuleKind::Media => css.push_str(&at_rule::compile_media(rest, indent, vars, depth)?),
            RuleKind::Keyframes => css.push_str(&at_rule::compile_keyframes(rest, indent, vars)?),
            RuleKind::Selector => {
                css.push_str(&format!("{}{} {{\n", indent, head));
                css.push_str(&render_properties(rest, &nested(indent), vars)?);
                css.push_str(&format!("{}}}\n", indent));
            }
        }
    }
    Ok(css)
}

/// Render `(name value)` declarations. Entries with fewer than two items
/// are skipped.
pub(crate) fn render_properties(
    props: &[Node],
    indent: &str,
    vars: Option<&dyn Variables>,
) -> Result<String, StructureError> {
    let mut css = String::new();
    for prop in props {
        let items = sequence(prop)?;
        if let [name, value, ..] = items.as_ref() {
            css.push_str(&format!(
                "{}{}: {};\n",
                indent,
                resolve(name, vars),
                resolve(value, vars)
            ));
        } else {
            trace!("skipping malformed property");
        }
    }
    Ok(css)
}
