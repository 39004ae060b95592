//! `actg matrix` — adjacency matrix export.

use std::io::Write;
use std::path::PathBuf;

use actgraph_core::AdjacencyMatrix;
use clap::Args;
use serde::Serialize;

use super::open_snapshot;
use crate::output::{OutputMode, render};

/// Arguments for `actg matrix`.
#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Snapshot file to load.
    pub snapshot: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct MatrixOutput {
    pub nodes: Vec<String>,
    /// Row-major costs; `None` where there is no edge.
    pub cells: Vec<Vec<Option<f64>>>,
    pub text: String,
}

impl MatrixOutput {
    pub fn from_matrix(matrix: &AdjacencyMatrix<String>) -> Self {
        let cells = matrix
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&cell| Some(cell).filter(|c| c.is_finite()))
                    .collect()
            })
            .collect();
        Self {
            nodes: matrix.nodes.clone(),
            cells,
            text: matrix.to_delimited_text(),
        }
    }
}

/// Execute `actg matrix`.
pub fn run_matrix(args: &MatrixArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = open_snapshot(&args.snapshot, output)?;
    let payload = MatrixOutput::from_matrix(&graph.adjacency_matrix());
    render(output, &payload, render_matrix_human)
}

/// Node-order header, then the delimited rows.
pub fn render_matrix_human(report: &MatrixOutput, w: &mut dyn Write) -> std::io::Result<()> {
    write!(w, "{}", report.nodes.join(","))?;
    writeln!(w, "{}", report.text)
}
