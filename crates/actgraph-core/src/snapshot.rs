//! Loading persisted graph snapshots.
//!
//! # Format
//!
//! A snapshot is a JSON array of tagged element records written by an
//! external producer, in any interleaving:
//!
//! ```json
//! [
//!   {"node": "start"},
//!   {"node": "end"},
//!   {"edge": {"source": "start", "target": "end", "action": {"cost": 1.5}}}
//! ]
//! ```
//!
//! [`load`] reads the whole file, splits the records into nodes and edges
//! (each keeping its original order) and hands both to a
//! [`GraphAssembler`]. There is no versioning: a record that does not match
//! the expected node/action shape fails the whole load.
//!
//! ## Failure handling
//!
//! `load` never returns an error. Missing files, malformed records and
//! assembly failures are logged and reported as `None`, so batch callers
//! can skip a bad snapshot and continue. [`read_elements`] exposes the
//! typed error for callers that want it.

#![allow(clippy::module_name_repetitions)]

use std::hash::Hash;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::error::{GraphError, SnapshotError};
use crate::graph::ValueGraph;
use crate::store::{DiGraphStore, GraphStore};

/// One persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element<N, A> {
    Node(N),
    Edge { source: N, target: N, action: A },
}

/// A `(source, target, action)` edge record.
pub type EdgeRecord<N, A> = (N, N, A);

/// Builds a [`ValueGraph`] from the node and edge records of a snapshot.
pub trait GraphAssembler<S: GraphStore> {
    /// # Errors
    ///
    /// Implementations decide what makes a snapshot unusable.
    fn assemble(
        &mut self,
        nodes: Vec<S::Node>,
        edges: Vec<EdgeRecord<S::Node, S::Action>>,
    ) -> Result<ValueGraph<S>, GraphError>;
}

impl<S, F> GraphAssembler<S> for F
where
    S: GraphStore,
    F: FnMut(Vec<S::Node>, Vec<EdgeRecord<S::Node, S::Action>>) -> Result<ValueGraph<S>, GraphError>,
{
    fn assemble(
        &mut self,
        nodes: Vec<S::Node>,
        edges: Vec<EdgeRecord<S::Node, S::Action>>,
    ) -> Result<ValueGraph<S>, GraphError> {
        self(nodes, edges)
    }
}

/// Assembles a [`DiGraphStore`] whose initial state is the first node record.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstNodeAssembler;

impl<N, A> GraphAssembler<DiGraphStore<N, A>> for FirstNodeAssembler
where
    N: Clone + Eq + Hash,
    A: Clone,
{
    fn assemble(
        &mut self,
        nodes: Vec<N>,
        edges: Vec<EdgeRecord<N, A>>,
    ) -> Result<ValueGraph<DiGraphStore<N, A>>, GraphError> {
        let initial = nodes.first().cloned().ok_or(GraphError::EmptyGraph)?;
        ValueGraph::new(DiGraphStore::from_parts(nodes, edges), initial)
    }
}

/// Split records into node and edge subsequences, preserving order.
#[must_use]
pub fn partition_elements<N, A>(elements: Vec<Element<N, A>>) -> (Vec<N>, Vec<EdgeRecord<N, A>>) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for element in elements {
        match element {
            Element::Node(node) => nodes.push(node),
            Element::Edge {
                source,
                target,
                action,
            } => edges.push((source, target, action)),
        }
    }
    (nodes, edges)
}

/// Read and parse every record in the snapshot at `path`.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the file cannot be read and
/// [`SnapshotError::Parse`] if its contents are not a valid record list.
pub fn read_elements<N, A>(path: &Path) -> Result<Vec<Element<N, A>>, SnapshotError>
where
    N: DeserializeOwned,
    A: DeserializeOwned,
{
    let bytes = std::fs::read(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the snapshot `identifier` stored under `location`.
///
/// Returns `None` on any read, parse, or assembly failure; the cause is
/// logged.
#[instrument(skip(location, assembler), fields(location = %location.as_ref().display()))]
pub fn load<S, G>(identifier: &str, location: impl AsRef<Path>, assembler: &mut G) -> Option<ValueGraph<S>>
where
    S: GraphStore,
    S::Node: DeserializeOwned,
    S::Action: DeserializeOwned,
    G: GraphAssembler<S> + ?Sized,
{
    let path = location.as_ref().join(identifier);

    let elements = match read_elements::<S::Node, S::Action>(&path) {
        Ok(elements) => elements,
        Err(err) => {
            warn!(error = %err, "snapshot not loaded");
            return None;
        }
    };

    let (nodes, edges) = partition_elements(elements);
    debug!(nodes = nodes.len(), edges = edges.len(), "snapshot parsed");

    match assembler.assemble(nodes, edges) {
        Ok(graph) => Some(graph),
        Err(err) => {
            error!(path = %path.display(), error = %err, "snapshot assembly failed");
            None
        }
    }
}
