//! `actg repair` — force every node reachable from the initial state.
//!
//! Bridges one orphan per pass from the most sparsely connected reachable
//! node and randomly links orphan pairs, then prints the repaired matrix.
//! New edge costs are drawn uniformly from the configured `[cost]` range.

use std::io::Write;
use std::path::PathBuf;

use actgraph_core::{ActgraphConfig, RepairConfig, RngSource, UniformCost};
use clap::Args;
use serde::Serialize;
use tracing::info;

use super::matrix::{MatrixOutput, render_matrix_human};
use super::{in_node_order, open_snapshot};
use crate::output::{OutputMode, pretty_kv, render};

/// Arguments for `actg repair`.
#[derive(Args, Debug)]
pub struct RepairArgs {
    /// Snapshot file to load.
    pub snapshot: PathBuf,

    /// Seed for reproducible repair. Uses OS entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override `repair.edge_probability` from the config file.
    #[arg(long)]
    pub edge_probability: Option<f64>,

    /// Override `repair.max_passes` from the config file.
    #[arg(long)]
    pub max_passes: Option<usize>,
}

impl RepairArgs {
    fn repair_config(&self, config: &ActgraphConfig) -> RepairConfig {
        let mut repair = config.repair.clone();
        if let Some(p) = self.edge_probability {
            repair.edge_probability = p;
        }
        if self.max_passes.is_some() {
            repair.max_passes = self.max_passes;
        }
        repair
    }
}

#[derive(Debug, Serialize)]
struct RepairOutput {
    passes: usize,
    bridges: Vec<(String, String)>,
    random_edges: Vec<(String, String)>,
    orphans: Vec<String>,
    unanchored: bool,
    matrix: MatrixOutput,
}

/// Execute `actg repair`.
pub fn run_repair(
    args: &RepairArgs,
    config: &ActgraphConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let repair = args.repair_config(config);
    repair.validate()?;
    config.cost.validate()?;
    let costs = config.cost.range();

    let mut graph = open_snapshot(&args.snapshot, output)?;

    let (mut factory, mut random) = match args.seed {
        Some(seed) => (UniformCost::seeded(costs, seed), RngSource::seeded(seed)),
        None => (UniformCost::from_entropy(costs), RngSource::from_entropy()),
    };

    let report = graph.force_reachability(&mut factory, &mut random, &repair)?;
    info!(
        passes = report.passes,
        inserted = report.inserted(),
        "repair finished"
    );

    let payload = RepairOutput {
        passes: report.passes,
        orphans: in_node_order(&graph, &report.orphans),
        bridges: report.bridges,
        random_edges: report.random_edges,
        unanchored: report.unanchored,
        matrix: MatrixOutput::from_matrix(&graph.adjacency_matrix()),
    };

    render(output, &payload, render_repair_human)
}

fn render_repair_human(report: &RepairOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_kv(w, "passes", report.passes.to_string())?;
    pretty_kv(w, "bridges", format_edges(&report.bridges))?;
    pretty_kv(w, "random", format_edges(&report.random_edges))?;
    if report.unanchored {
        pretty_kv(w, "unanchored", "no reachable node could anchor a bridge")?;
    }
    if !report.orphans.is_empty() {
        pretty_kv(w, "orphans", report.orphans.join(", "))?;
    }
    writeln!(w)?;
    render_matrix_human(&report.matrix, w)
}

fn format_edges(edges: &[(String, String)]) -> String {
    if edges.is_empty() {
        return "none".to_string();
    }
    edges
        .iter()
        .map(|(from, to)| format!("{from}->{to}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(edge_probability: Option<f64>, max_passes: Option<usize>) -> RepairArgs {
        RepairArgs {
            snapshot: PathBuf::from("level.json"),
            seed: None,
            edge_probability,
            max_passes,
        }
    }

    #[test]
    fn flags_override_config() {
        let mut config = ActgraphConfig::default();
        config.repair.max_passes = Some(9);

        let repair = args(Some(0.4), None).repair_config(&config);
        assert!((repair.edge_probability - 0.4).abs() < f64::EPSILON);
        assert_eq!(repair.max_passes, Some(9));

        let repair = args(None, Some(2)).repair_config(&config);
        assert!((repair.edge_probability - 0.1).abs() < f64::EPSILON);
        assert_eq!(repair.max_passes, Some(2));
    }

    #[test]
    fn format_edges_lists_arrows() {
        assert_eq!(format_edges(&[]), "none");
        assert_eq!(
            format_edges(&[("a".into(), "b".into()), ("b".into(), "c".into())]),
            "a->b, b->c"
        );
    }
}
