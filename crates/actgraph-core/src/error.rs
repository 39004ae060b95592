//! Error types for the value graph engines.

use std::path::PathBuf;

/// Failures raised by graph construction and the analysis engines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// The designated initial node is not a member of the node set.
    #[error("initial state is not a node of the graph")]
    InitialStateMissing,

    /// A query that needs at least one node ran on an empty graph.
    #[error("graph has no nodes")]
    EmptyGraph,

    /// Edge probability must be a number in `[0, 1]`.
    #[error("edge probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    /// Cost range bounds must be finite with `min <= max`.
    #[error("cost range must be finite with min <= max, got [{min}, {max}]")]
    InvalidCostRange { min: f64, max: f64 },

    /// Repair hit its configured pass limit with orphans left.
    #[error("reachability repair did not converge after {passes} passes ({remaining} orphans left)")]
    RepairDidNotConverge { passes: usize, remaining: usize },

    /// Relaxation re-entered a node on the active descent path.
    #[error("negative-cost cycle reachable from the initial state")]
    NegativeCycle,
}

/// Failures reading a persisted graph snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = GraphError::RepairDidNotConverge {
            passes: 4,
            remaining: 2,
        };
        assert_eq!(
            err.to_string(),
            "reachability repair did not converge after 4 passes (2 orphans left)"
        );
        assert!(GraphError::InvalidProbability(1.5).to_string().contains("1.5"));
    }

    #[test]
    fn snapshot_io_error_names_path() {
        let err = SnapshotError::Io {
            path: PathBuf::from("/tmp/missing.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/tmp/missing.json"));
    }
}
