//! Relax-and-descend distance estimates from the initial state.
//!
//! # Algorithm
//!
//! Starting at the initial state (distance 0), each node relaxes its
//! outgoing edges in successor order. When `dist[v] > dist[u] + cost(u, v)`
//! the distance of `v` is lowered and the walk descends into `v`
//! immediately, before `u`'s remaining successors are relaxed. Edges whose
//! cost is `NaN` are skipped.
//!
//! This is not Dijkstra. There is no priority frontier, so the result
//! depends on successor order and a node can settle on a value that a path
//! found later would have beaten. Callers get an estimate that is exact on
//! trees and chains and an upper bound elsewhere.
//!
//! ## Stack depth
//!
//! The descent runs on an explicit frame stack, one frame per active node,
//! so deep graphs do not exhaust the call stack. Relaxation is strict,
//! which means a node can only re-enter the active path through a
//! negative-cost cycle; that case is reported as
//! [`GraphError::NegativeCycle`].

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::action::Action;
use crate::error::GraphError;
use crate::graph::ValueGraph;
use crate::store::GraphStore;

impl<S> ValueGraph<S>
where
    S: GraphStore,
    S::Action: Action,
{
    /// Distance estimate for every node; unreached nodes get `f64::INFINITY`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NegativeCycle`] if relaxation loops back into a
    /// node still being descended.
    #[instrument(skip_all, parent = self.span())]
    pub fn distances(&self) -> Result<HashMap<S::Node, f64>, GraphError> {
        let store = self.store();
        let initial = self.initial_state();

        let mut dist: HashMap<S::Node, f64> = store
            .nodes()
            .into_iter()
            .map(|n| (n, f64::INFINITY))
            .collect();
        dist.insert(initial.clone(), 0.0);

        let mut on_path: HashSet<S::Node> = HashSet::from([initial.clone()]);
        // Each frame: (node, its successors, next successor to relax).
        let mut frames: Vec<(S::Node, Vec<S::Node>, usize)> =
            vec![(initial.clone(), store.successors(initial), 0)];
        let mut relaxations = 0usize;

        while let Some((u, successors, next)) = frames.last_mut() {
            let Some(v) = successors.get(*next).cloned() else {
                on_path.remove(&*u);
                frames.pop();
                continue;
            };
            *next += 1;
            let u = u.clone();

            let Some(cost) = store
                .edge_value(&u, &v)
                .map(Action::cost)
                .filter(|c| !c.is_nan())
            else {
                continue;
            };

            let candidate = dist.get(&u).copied().unwrap_or(f64::INFINITY) + cost;
            let current = dist.get(&v).copied().unwrap_or(f64::INFINITY);
            if current > candidate {
                if !on_path.insert(v.clone()) {
                    return Err(GraphError::NegativeCycle);
                }
                dist.insert(v.clone(), candidate);
                relaxations += 1;
                let succ = store.successors(&v);
                frames.push((v, succ, 0));
            }
        }

        let reached = dist.values().filter(|d| d.is_finite()).count();
        debug!(nodes = dist.len(), reached, relaxations, "distances computed");
        Ok(dist)
    }
}
