//! `actg inspect` — structural summary of a snapshot.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use super::{in_node_order, open_snapshot};
use crate::output::{OutputMode, pretty_kv, render};

/// Arguments for `actg inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Snapshot file to load.
    pub snapshot: PathBuf,
}

#[derive(Debug, Serialize)]
struct InspectOutput {
    initial_state: String,
    nodes: usize,
    edges: usize,
    max_out_degree: usize,
    orphans: Vec<String>,
    loop_count: usize,
}

/// Execute `actg inspect`.
pub fn run_inspect(args: &InspectArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = open_snapshot(&args.snapshot, output)?;
    let reachability = graph.unreachable_nodes();

    let payload = InspectOutput {
        initial_state: graph.initial_state().clone(),
        nodes: graph.total_nodes(),
        edges: graph.total_edges(),
        max_out_degree: graph.max_out_degree()?,
        orphans: in_node_order(&graph, &reachability.orphans),
        loop_count: reachability.loop_count,
    };

    render(output, &payload, render_inspect_human)
}

fn render_inspect_human(report: &InspectOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_kv(w, "initial", &report.initial_state)?;
    pretty_kv(w, "nodes", report.nodes.to_string())?;
    pretty_kv(w, "edges", report.edges.to_string())?;
    pretty_kv(w, "max out", report.max_out_degree.to_string())?;
    pretty_kv(w, "loops", report.loop_count.to_string())?;
    if report.orphans.is_empty() {
        pretty_kv(w, "orphans", "none")
    } else {
        pretty_kv(w, "orphans", report.orphans.join(", "))
    }
}
