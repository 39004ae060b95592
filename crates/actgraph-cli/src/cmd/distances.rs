//! `actg distances` — relax-and-descend distances from the initial state.

use std::io::Write;
use std::path::PathBuf;

use actgraph_core::GraphStore;
use clap::Args;
use serde::Serialize;

use super::open_snapshot;
use crate::output::{OutputMode, format_cost, render};

/// Arguments for `actg distances`.
#[derive(Args, Debug)]
pub struct DistancesArgs {
    /// Snapshot file to load.
    pub snapshot: PathBuf,
}

#[derive(Debug, Serialize)]
struct DistanceEntry {
    node: String,
    /// `None` when the node is unreachable.
    distance: Option<f64>,
}

#[derive(Debug, Serialize)]
struct DistancesOutput {
    initial_state: String,
    distances: Vec<DistanceEntry>,
}

/// Execute `actg distances`.
pub fn run_distances(args: &DistancesArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = open_snapshot(&args.snapshot, output)?;
    let dist = graph.distances()?;

    let distances = graph
        .store()
        .nodes()
        .into_iter()
        .map(|node| {
            let distance = dist.get(&node).copied().filter(|d| d.is_finite());
            DistanceEntry { node, distance }
        })
        .collect();

    let payload = DistancesOutput {
        initial_state: graph.initial_state().clone(),
        distances,
    };

    render(output, &payload, render_distances_human)
}

fn render_distances_human(report: &DistancesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for entry in &report.distances {
        let value = format_cost(entry.distance.unwrap_or(f64::INFINITY));
        writeln!(w, "{}\t{value}", entry.node)?;
    }
    Ok(())
}
