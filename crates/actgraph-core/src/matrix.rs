//! Dense adjacency matrix export and its delimited-text rendering.
//!
//! Cell `(i, j)` holds the cost of edge `nodes[i] → nodes[j]`, or
//! [`NO_EDGE`] (positive infinity) when the pair has no edge. The node
//! order is the store's enumeration order at build time; it is recorded in
//! the matrix because it is not guaranteed to be stable across builds.
//!
//! ## Text format
//!
//! ```text
//! \n-,1.000,-
//! \n-,-,2.500
//! \n-,-,-
//! ```
//!
//! Each row is preceded by a newline, cells are comma-separated with three
//! decimals, and [`NO_EDGE`] is written as a single `-`.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::action::Action;
use crate::store::GraphStore;

/// Sentinel stored in cells with no edge.
pub const NO_EDGE: f64 = f64::INFINITY;

/// Placeholder written for [`NO_EDGE`] cells.
pub const NO_EDGE_TEXT: &str = "-";

/// Square cost matrix together with the node order it was built over.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix<N> {
    /// Row/column order.
    pub nodes: Vec<N>,
    /// `cells[i][j]` = cost of `nodes[i] → nodes[j]`.
    pub cells: Vec<Vec<f64>>,
}

impl<N> AdjacencyMatrix<N>
where
    N: Clone + Eq + std::hash::Hash,
{
    /// Build the matrix over the current contents of `store`.
    #[must_use]
    pub fn from_store<S>(store: &S) -> Self
    where
        S: GraphStore<Node = N>,
        S::Action: Action,
    {
        let nodes = store.nodes();
        let position: HashMap<&N, usize> = nodes.iter().enumerate().map(|(i, n)| (n, i)).collect();

        let mut cells = vec![vec![NO_EDGE; nodes.len()]; nodes.len()];
        for (i, from) in nodes.iter().enumerate() {
            for to in store.successors(from) {
                let Some(&j) = position.get(&to) else {
                    continue;
                };
                if let Some(action) = store.edge_value(from, &to) {
                    cells[i][j] = action.cost();
                }
            }
        }

        Self { nodes, cells }
    }

    /// Position of `node` in the row/column order.
    #[must_use]
    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.nodes.iter().position(|n| n == node)
    }

    /// Cost of `from → to`, or `None` when the pair has no edge.
    #[must_use]
    pub fn cost(&self, from: &N, to: &N) -> Option<f64> {
        let cell = self.cells[self.index_of(from)?][self.index_of(to)?];
        (!is_no_edge(cell)).then_some(cell)
    }
}

impl<N> AdjacencyMatrix<N> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Render the cells with [`to_delimited_text`].
    #[must_use]
    pub fn to_delimited_text(&self) -> String {
        to_delimited_text(&self.cells)
    }
}

/// Whether `cell` is the [`NO_EDGE`] sentinel.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_no_edge(cell: f64) -> bool {
    cell == NO_EDGE
}

/// Render a cost matrix as newline-led, comma-delimited rows.
#[must_use]
pub fn to_delimited_text(cells: &[Vec<f64>]) -> String {
    let mut out = String::new();
    for row in cells {
        out.push('\n');
        for (j, &cell) in row.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            if is_no_edge(cell) {
                out.push_str(NO_EDGE_TEXT);
            } else {
                // Writing to a String cannot fail.
                let _ = write!(out, "{cell:.3}");
            }
        }
    }
    out
}
