//! Sequence adapter.
//!
//! Both list representations (array-form and head/tail chains) are
//! flattened into one ordered slice here, so downstream code never
//! branches on representation.

use std::borrow::Cow;
use std::sync::Arc;

use thiserror::Error;

use crate::{MAX_CHAIN_LENGTH, MAX_NESTING_DEPTH, Node, Pair};

/// Errors raised for input that cannot be walked to completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("malformed input: list chain exceeds {limit} cells")]
    ChainTooLong { limit: usize },

    #[error("malformed input: nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Returns the ordered children of a list-shaped node.
///
/// Atoms and `Nil` have no children. Chains are read head to tail and stop
/// at the first tail that is not a cell, so an improper tail is dropped.
pub fn sequence(node: &Node) -> Result<Cow<'_, [Node]>, StructureError> {
    match node {
        Node::List(items) => Ok(Cow::Borrowed(items.as_slice())),
        Node::Pair(first) => collect_chain(first).map(Cow::Owned),
        Node::Atom(_) | Node::Nil => Ok(Cow::Borrowed(&[])),
    }
}

/// Returns the first item of a list-shaped node without walking the rest.
pub fn head_of(node: &Node) -> Option<&Node> {
    match node {
        Node::List(items) => items.first(),
        Node::Pair(first) => Some(first.car()),
        Node::Atom(_) | Node::Nil => None,
    }
}

fn collect_chain(first: &Arc<Pair>) -> Result<Vec<Node>, StructureError> {
    let mut items = Vec::new();
    let mut current = Node::Pair(Arc::clone(first));
    while let Node::Pair(pair) = current {
        if items.len() == MAX_CHAIN_LENGTH {
            return Err(StructureError::ChainTooLong {
                limit: MAX_CHAIN_LENGTH,
            });
        }
        items.push(pair.car().clone());
        current = pair.cdr();
    }
    Ok(items)
}

/// Fails once `depth` passes [`MAX_NESTING_DEPTH`].
///
/// Recursive walkers call this on entry to each level.
pub fn check_depth(depth: usize) -> Result<(), StructureError> {
    if depth > MAX_NESTING_DEPTH {
        Err(StructureError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        })
    } else {
        Ok(())
    }
}
