use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Bound satisfied by every node handle the engine can order.
///
/// Handles are compared by identity only; the engine never looks inside them.
pub trait NodeHandle: Clone + Eq + Hash + fmt::Debug {}

impl<T> NodeHandle for T where T: Clone + Eq + Hash + fmt::Debug {}

/// Declared predecessor of a result entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predecessor<N> {
    Root,
    Node(N),
}

impl<N> From<Option<N>> for Predecessor<N> {
    fn from(value: Option<N>) -> Self {
        value.map_or(Self::Root, Self::Node)
    }
}

/// One `(node, predecessor)` pair produced by the change filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPair<N> {
    pub node: N,
    pub predecessor: Predecessor<N>,
}

impl<N> LinkPair<N> {
    pub fn new(node: N, predecessor: Predecessor<N>) -> Self {
        Self { node, predecessor }
    }

    pub fn root(node: N) -> Self {
        Self::new(node, Predecessor::Root)
    }

    pub fn after(node: N, predecessor: N) -> Self {
        Self::new(node, Predecessor::Node(predecessor))
    }
}

/// One raw batch record from the host tree: nodes added after `previous_sibling`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord<N> {
    pub added: Vec<N>,
    #[serde(default)]
    pub previous_sibling: Option<N>,
}

impl<N> MutationRecord<N> {
    pub fn new(added: Vec<N>, previous_sibling: Option<N>) -> Self {
        Self {
            added,
            previous_sibling,
        }
    }
}
