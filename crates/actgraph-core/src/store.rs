//! Directed value-graph storage.
//!
//! # Overview
//!
//! The engines in this crate never touch a concrete graph type. They work
//! against [`GraphStore`], the minimal capability set they need: node
//! enumeration, successor/predecessor enumeration, degree queries, and
//! edge-value lookup and insertion. `Clone` stands in for "copy of" and must
//! produce a structurally independent container.
//!
//! [`DiGraphStore`] is the bundled implementation, a petgraph [`DiGraph`]
//! paired with a node index map.
//!
//! ## Ordering
//!
//! Every tie-break in the reachability and distance engines follows the
//! store's enumeration order. `DiGraphStore` enumerates nodes in insertion
//! order and neighbors in edge insertion order, so results are reproducible
//! for a given construction sequence.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::hash::Hash;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

/// Capability set of a directed graph holding at most one value per ordered
/// node pair.
pub trait GraphStore: Clone {
    /// Vertex identity.
    type Node: Clone + Eq + Hash;
    /// Value attached to a directed edge.
    type Action;

    /// All nodes, in enumeration order.
    fn nodes(&self) -> Vec<Self::Node>;

    /// Whether `node` is a member of the node set.
    fn contains_node(&self, node: &Self::Node) -> bool;

    /// Direct successors of `node`. Empty for unknown nodes.
    fn successors(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Direct predecessors of `node`. Empty for unknown nodes.
    fn predecessors(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn in_degree(&self, node: &Self::Node) -> usize;

    fn out_degree(&self, node: &Self::Node) -> usize;

    /// Whether an edge `from → to` exists.
    fn has_edge(&self, from: &Self::Node, to: &Self::Node) -> bool;

    /// Value of the edge `from → to`, if present.
    fn edge_value(&self, from: &Self::Node, to: &Self::Node) -> Option<&Self::Action>;

    /// Insert or replace the value of `from → to`, adding missing endpoints.
    ///
    /// Returns the previous value when the edge already existed.
    fn put_edge_value(
        &mut self,
        from: Self::Node,
        to: Self::Node,
        action: Self::Action,
    ) -> Option<Self::Action>;

    /// Add `node` to the node set. Returns `false` if it was already present.
    fn add_node(&mut self, node: Self::Node) -> bool;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;
}

// ---------------------------------------------------------------------------
// DiGraphStore
// ---------------------------------------------------------------------------

/// petgraph-backed [`GraphStore`].
#[derive(Debug, Clone)]
pub struct DiGraphStore<N, A> {
    graph: DiGraph<N, A>,
    node_map: HashMap<N, NodeIndex>,
}

impl<N, A> Default for DiGraphStore<N, A>
where
    N: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, A> DiGraphStore<N, A>
where
    N: Clone + Eq + Hash,
{
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Build a store from a node list and an edge list.
    ///
    /// Edge endpoints missing from `nodes` are added on first use. A repeated
    /// `(source, target)` pair keeps the last value.
    #[must_use]
    pub fn from_parts<I, E>(nodes: I, edges: E) -> Self
    where
        I: IntoIterator<Item = N>,
        E: IntoIterator<Item = (N, N, A)>,
    {
        let mut store = Self::new();
        for node in nodes {
            store.insert_node(node);
        }
        for (source, target, action) in edges {
            store.put_edge(source, target, action);
        }
        store
    }

    /// Underlying petgraph graph.
    #[must_use]
    pub const fn graph(&self) -> &DiGraph<N, A> {
        &self.graph
    }

    /// Look up the petgraph index of `node`.
    #[must_use]
    pub fn node_index(&self, node: &N) -> Option<NodeIndex> {
        self.node_map.get(node).copied()
    }

    fn insert_node(&mut self, node: N) -> (NodeIndex, bool) {
        if let Some(idx) = self.node_map.get(&node) {
            return (*idx, false);
        }
        let idx = self.graph.add_node(node.clone());
        self.node_map.insert(node, idx);
        (idx, true)
    }

    fn put_edge(&mut self, from: N, to: N, action: A) -> Option<A> {
        let (from_idx, _) = self.insert_node(from);
        let (to_idx, _) = self.insert_node(to);

        // petgraph allows parallel edges; keep one value per ordered pair.
        if let Some(edge) = self.graph.find_edge(from_idx, to_idx) {
            return self
                .graph
                .edge_weight_mut(edge)
                .map(|weight| std::mem::replace(weight, action));
        }
        self.graph.add_edge(from_idx, to_idx, action);
        None
    }

    fn neighbors(&self, node: &N, direction: Direction) -> Vec<N> {
        let Some(idx) = self.node_index(node) else {
            return Vec::new();
        };
        // petgraph lists the most recently added edge first.
        let mut out: Vec<N> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].clone())
            .collect();
        out.reverse();
        out
    }

    fn degree(&self, node: &N, direction: Direction) -> usize {
        self.node_index(node)
            .map_or(0, |idx| self.graph.neighbors_directed(idx, direction).count())
    }
}

impl<N, A> GraphStore for DiGraphStore<N, A>
where
    N: Clone + Eq + Hash,
    A: Clone,
{
    type Node = N;
    type Action = A;

    fn nodes(&self) -> Vec<N> {
        self.graph.node_weights().cloned().collect()
    }

    fn contains_node(&self, node: &N) -> bool {
        self.node_map.contains_key(node)
    }

    fn successors(&self, node: &N) -> Vec<N> {
        self.neighbors(node, Direction::Outgoing)
    }

    fn predecessors(&self, node: &N) -> Vec<N> {
        self.neighbors(node, Direction::Incoming)
    }

    fn in_degree(&self, node: &N) -> usize {
        self.degree(node, Direction::Incoming)
    }

    fn out_degree(&self, node: &N) -> usize {
        self.degree(node, Direction::Outgoing)
    }

    fn has_edge(&self, from: &N, to: &N) -> bool {
        match (self.node_index(from), self.node_index(to)) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    fn edge_value(&self, from: &N, to: &N) -> Option<&A> {
        let edge = self
            .graph
            .find_edge(self.node_index(from)?, self.node_index(to)?)?;
        self.graph.edge_weight(edge)
    }

    fn put_edge_value(&mut self, from: N, to: N, action: A) -> Option<A> {
        self.put_edge(from, to, action)
    }

    fn add_node(&mut self, node: N) -> bool {
        self.insert_node(node).1
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
