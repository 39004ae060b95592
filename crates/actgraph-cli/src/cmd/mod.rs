pub mod distances;
pub mod inspect;
pub mod matrix;
pub mod repair;

use std::collections::HashSet;
use std::hash::BuildHasher;
use std::path::Path;

use actgraph_core::{CostAction, DiGraphStore, FirstNodeAssembler, GraphStore, ValueGraph, snapshot};

use tracing::info_span;

use crate::output::{CliError, OutputMode, render_error};

/// Graph shape every subcommand operates on.
pub type SnapshotGraph = ValueGraph<DiGraphStore<String, CostAction>>;

/// Load the snapshot at `path`, reporting a failure through `output`.
///
/// The path is split into its parent directory and file name; the first
/// node record becomes the initial state. The graph's diagnostics are
/// scoped under a `graph` span naming the snapshot.
pub fn open_snapshot(path: &Path, output: OutputMode) -> anyhow::Result<SnapshotGraph> {
    let identifier = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let location = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    match snapshot::load(identifier, location, &mut FirstNodeAssembler) {
        Some(graph) => Ok(graph.with_span(info_span!("graph", snapshot = %path.display()))),
        None => {
            render_error(
                output,
                &CliError::with_details(
                    format!("snapshot {} could not be loaded", path.display()),
                    "check that the file exists and holds a JSON array of node/edge records",
                    "snapshot_not_loaded",
                ),
            )?;
            anyhow::bail!("snapshot not loaded: {}", path.display());
        }
    }
}

/// `set` in graph node order.
pub fn in_node_order<H: BuildHasher>(graph: &SnapshotGraph, set: &HashSet<String, H>) -> Vec<String> {
    graph
        .store()
        .nodes()
        .into_iter()
        .filter(|node| set.contains(node))
        .collect()
}
