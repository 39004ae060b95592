//! The value graph: a [`GraphStore`] paired with its initial state.
//!
//! # Overview
//!
//! [`ValueGraph`] owns the container and references one designated initial
//! node, the root of every reachability and distance computation. The
//! engines are implemented as inherent methods in sibling modules:
//!
//! - [`crate::reachability`]: orphan detection and reachability repair
//! - [`crate::distance`]: relax-and-descend distance estimates
//! - [`crate::matrix`]: dense adjacency export
//!
//! ## Diagnostics
//!
//! Each graph carries its own [`tracing::Span`]. Engine entry points open
//! their spans under it, so a batch pipeline can tell instances apart
//! without any global logger state. The default span is a disabled one.

use tracing::{Span, error};

use crate::action::Action;
use crate::error::GraphError;
use crate::matrix::AdjacencyMatrix;
use crate::random::RandomSource;
use crate::store::GraphStore;

/// A directed value graph rooted at an initial state.
#[derive(Debug)]
pub struct ValueGraph<S: GraphStore> {
    store: S,
    initial: S::Node,
    span: Span,
}

impl<S: GraphStore> ValueGraph<S> {
    /// Pair `store` with its initial state.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InitialStateMissing`] if `initial` is not a node
    /// of `store`.
    pub fn new(store: S, initial: S::Node) -> Result<Self, GraphError> {
        if !store.contains_node(&initial) {
            return Err(GraphError::InitialStateMissing);
        }
        Ok(Self {
            store,
            initial,
            span: Span::none(),
        })
    }

    /// Scope this graph's diagnostics under `span`.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    #[must_use]
    pub const fn initial_state(&self) -> &S::Node {
        &self.initial
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the container.
    ///
    /// The store has no removal primitive, so the initial state stays a
    /// member.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Structurally independent duplicate sharing the same initial state.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            store: self.store.clone(),
            initial: self.initial.clone(),
            span: self.span.clone(),
        }
    }

    #[must_use]
    pub fn total_nodes(&self) -> usize {
        self.store.node_count()
    }

    #[must_use]
    pub fn total_edges(&self) -> usize {
        self.store.edge_count()
    }

    /// `(in_degree, out_degree)` for every node, in node enumeration order.
    #[must_use]
    pub fn degrees(&self) -> Vec<(usize, usize)> {
        self.store
            .nodes()
            .iter()
            .map(|n| (self.store.in_degree(n), self.store.out_degree(n)))
            .collect()
    }

    /// Largest out-degree over all nodes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyGraph`] when there are no nodes.
    pub fn max_out_degree(&self) -> Result<usize, GraphError> {
        let max = self
            .store
            .nodes()
            .iter()
            .map(|n| self.store.out_degree(n))
            .max();
        max.ok_or_else(|| {
            let _entered = self.span.enter();
            error!("max out-degree requested on an empty graph");
            GraphError::EmptyGraph
        })
    }

    /// Pick one successor of `from` uniformly at random, with its edge value.
    ///
    /// Returns `None` when `from` has no successors.
    pub fn random_successor<R>(&self, from: &S::Node, random: &mut R) -> Option<(S::Node, &S::Action)>
    where
        R: RandomSource + ?Sized,
    {
        let successors = self.store.successors(from);
        if successors.is_empty() {
            return None;
        }
        let next = successors.get(random.uniform_index(successors.len()))?.clone();
        let action = self.store.edge_value(from, &next)?;
        Some((next, action))
    }
}

impl<S> ValueGraph<S>
where
    S: GraphStore,
    S::Action: Action,
{
    /// Dense adjacency matrix over the current node enumeration.
    #[must_use]
    pub fn adjacency_matrix(&self) -> AdjacencyMatrix<S::Node> {
        AdjacencyMatrix::from_store(&self.store)
    }
}
