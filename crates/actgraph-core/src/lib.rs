#![forbid(unsafe_code)]
//! actgraph-core library.
//!
//! A directed, cost-labeled value graph rooted at an initial state, with
//! reachability repair, relax-and-descend distances, adjacency matrix export
//! and snapshot loading.
//!
//! # Conventions
//!
//! - **Errors**: Engines return [`error::GraphError`]; configuration loading
//!   uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Typical Usage
//!
//! ```rust,ignore
//! use actgraph_core::{FirstNodeAssembler, FixedCost, RepairConfig, RngSource, snapshot};
//!
//! let mut graph = snapshot::load("level-3.json", "/var/lib/actgraph", &mut FirstNodeAssembler)
//!     .ok_or_else(|| anyhow::anyhow!("snapshot not loaded"))?;
//! let report = graph.force_reachability(
//!     &mut FixedCost(1.0),
//!     &mut RngSource::seeded(7),
//!     &RepairConfig::default(),
//! )?;
//! println!("{}", graph.adjacency_matrix().to_delimited_text());
//! ```

pub mod action;
pub mod config;
pub mod distance;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod random;
pub mod reachability;
pub mod snapshot;
pub mod store;

pub use action::{Action, ActionFactory, CostAction, FixedCost, UniformCost};
pub use config::{ActgraphConfig, CostConfig, RepairConfig, load_config};
pub use error::{GraphError, SnapshotError};
pub use graph::ValueGraph;
pub use matrix::{AdjacencyMatrix, NO_EDGE, to_delimited_text};
pub use random::{RandomSource, RngSource};
pub use reachability::{Reachability, RepairReport};
pub use snapshot::{Element, FirstNodeAssembler, GraphAssembler};
pub use store::{DiGraphStore, GraphStore};
