//! Orphan detection and reachability repair.
//!
//! # Orphans
//!
//! An orphan is a node that a forward walk from the initial state never
//! reaches. [`ValueGraph::unreachable_nodes`] walks depth-first with an
//! explicit stack seeded with the initial state's successors. A popped node
//! that was already visited counts as a loop and is not expanded again;
//! otherwise it is marked visited and its unvisited successors are pushed.
//! `loop_count` therefore counts re-encounters during the walk, not distinct
//! cycles. The initial state is never reported as an orphan.
//!
//! # Repair
//!
//! [`ValueGraph::force_reachability`] runs passes until no orphans remain.
//! One pass:
//!
//! 1. Find the orphans. None left means done.
//! 2. Sort reachable nodes by out-degree ascending, then in-degree
//!    descending, and take the head as the anchor: a well-fed node that is
//!    not yet a hub.
//! 3. Take the orphan with the lowest in-degree (first in node order on
//!    ties).
//! 4. Link anchor → orphan.
//! 5. For each ordered orphan pair draw one probability (the stream holds
//!    `|orphans|²` values, diagonal included). Below `edge_probability`,
//!    link the pair unless an edge already exists in either direction.
//!
//! Step 4 brings at least one orphan into reach per pass. Whether the rest
//! converge depends on the random linking, so
//! [`RepairConfig::max_passes`] bounds the loop when the caller needs it.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::{debug, error, info, instrument, warn};

use crate::action::ActionFactory;
use crate::config::RepairConfig;
use crate::error::GraphError;
use crate::graph::ValueGraph;
use crate::random::RandomSource;
use crate::store::GraphStore;

/// Result of a forward walk from the initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachability<N: Eq + Hash> {
    /// Nodes the walk never reached, excluding the initial state.
    pub orphans: HashSet<N>,
    /// Pops of nodes that were already visited.
    pub loop_count: usize,
}

/// Outcome of [`ValueGraph::force_reachability`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairReport<N: Eq + Hash> {
    /// Orphans left when repair stopped. Empty on success and on an
    /// unanchored early exit.
    pub orphans: HashSet<N>,
    /// Repair passes that inserted edges.
    pub passes: usize,
    /// Anchor → orphan edges, one per pass.
    pub bridges: Vec<(N, N)>,
    /// Edges added by random orphan linking.
    pub random_edges: Vec<(N, N)>,
    /// Repair stopped because no reachable node could anchor a bridge.
    pub unanchored: bool,
}

impl<N: Eq + Hash> Default for RepairReport<N> {
    fn default() -> Self {
        Self {
            orphans: HashSet::new(),
            passes: 0,
            bridges: Vec::new(),
            random_edges: Vec::new(),
            unanchored: false,
        }
    }
}

impl<N: Eq + Hash> RepairReport<N> {
    /// Total number of edges inserted.
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.bridges.len() + self.random_edges.len()
    }
}

enum PassOutcome {
    Bridged,
    NoAnchor,
}

impl<S: GraphStore> ValueGraph<S> {
    /// Nodes not reachable from the initial state, and the walk's loop count.
    #[must_use]
    pub fn unreachable_nodes(&self) -> Reachability<S::Node> {
        let store = self.store();
        let mut visited: HashSet<S::Node> = HashSet::new();
        let mut loop_count = 0usize;

        // Reversed so pops follow successor order.
        let mut stack: Vec<S::Node> = store.successors(self.initial_state());
        stack.reverse();

        while let Some(node) = stack.pop() {
            if visited.contains(&node) {
                loop_count += 1;
                continue;
            }
            let mut next: Vec<S::Node> = store
                .successors(&node)
                .into_iter()
                .filter(|succ| *succ != node && !visited.contains(succ))
                .collect();
            visited.insert(node);
            next.reverse();
            stack.extend(next);
        }

        let initial = self.initial_state();
        let orphans = store
            .nodes()
            .into_iter()
            .filter(|n| n != initial && !visited.contains(n))
            .collect();

        Reachability {
            orphans,
            loop_count,
        }
    }

    /// Insert edges until every node is reachable from the initial state.
    ///
    /// New edge values come from `factory`; random linking draws from
    /// `random`. If no reachable node can anchor a bridge the condition is
    /// logged and an empty orphan set is returned with
    /// [`RepairReport::unanchored`] set.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidProbability`] if the configured probability is
    ///   not in `[0, 1]`.
    /// - [`GraphError::RepairDidNotConverge`] if `max_passes` passes ran and
    ///   orphans remain.
    #[instrument(
        skip_all,
        parent = self.span(),
        fields(edge_probability = config.edge_probability, max_passes = ?config.max_passes)
    )]
    pub fn force_reachability<F, R>(
        &mut self,
        factory: &mut F,
        random: &mut R,
        config: &RepairConfig,
    ) -> Result<RepairReport<S::Node>, GraphError>
    where
        F: ActionFactory<S::Node, S::Action> + ?Sized,
        R: RandomSource + ?Sized,
    {
        config.validate()?;
        let mut report = RepairReport::default();

        loop {
            let Reachability { orphans, .. } = self.unreachable_nodes();
            if orphans.is_empty() {
                info!(
                    passes = report.passes,
                    inserted = report.inserted(),
                    "graph fully reachable"
                );
                return Ok(report);
            }

            if config.max_passes.is_some_and(|limit| report.passes >= limit) {
                warn!(passes = report.passes, remaining = orphans.len(), "repair pass limit reached");
                return Err(GraphError::RepairDidNotConverge {
                    passes: report.passes,
                    remaining: orphans.len(),
                });
            }

            match self.repair_pass(&orphans, factory, random, config.edge_probability, &mut report) {
                PassOutcome::Bridged => report.passes += 1,
                PassOutcome::NoAnchor => {
                    error!(
                        orphans = orphans.len(),
                        "no reachable node to anchor repair; giving up"
                    );
                    report.unanchored = true;
                    return Ok(report);
                }
            }
        }
    }

    fn repair_pass<F, R>(
        &mut self,
        orphans: &HashSet<S::Node>,
        factory: &mut F,
        random: &mut R,
        edge_probability: f64,
        report: &mut RepairReport<S::Node>,
    ) -> PassOutcome
    where
        F: ActionFactory<S::Node, S::Action> + ?Sized,
        R: RandomSource + ?Sized,
    {
        let (ordered_orphans, mut reachable): (Vec<S::Node>, Vec<S::Node>) = self
            .store()
            .nodes()
            .into_iter()
            .partition(|n| orphans.contains(n));

        let store = self.store();
        // Stable sort: ties keep node order.
        reachable.sort_by(|a, b| {
            store
                .out_degree(a)
                .cmp(&store.out_degree(b))
                .then_with(|| store.in_degree(b).cmp(&store.in_degree(a)))
        });

        let Some(anchor) = reachable.into_iter().next() else {
            return PassOutcome::NoAnchor;
        };
        let Some(target) = ordered_orphans
            .iter()
            .min_by_key(|n| store.in_degree(n))
            .cloned()
        else {
            return PassOutcome::NoAnchor;
        };

        let action = factory.create_action(&anchor, &target);
        self.store_mut()
            .put_edge_value(anchor.clone(), target.clone(), action);
        report.bridges.push((anchor, target));

        let n = ordered_orphans.len();
        let mut linked = 0usize;
        let mut stream = random.probability_stream(n * n);
        'pairs: for node in &ordered_orphans {
            for orphan in &ordered_orphans {
                let Some(p) = stream.next() else {
                    break 'pairs;
                };
                if node == orphan || p >= edge_probability {
                    continue;
                }
                let store = self.store();
                if store.has_edge(node, orphan) || store.has_edge(orphan, node) {
                    continue;
                }
                let action = factory.create_action(node, orphan);
                self.store_mut()
                    .put_edge_value(node.clone(), orphan.clone(), action);
                report.random_edges.push((node.clone(), orphan.clone()));
                linked += 1;
            }
        }

        debug!(
            pass = report.passes + 1,
            orphans = n,
            linked,
            "repair pass bridged one orphan"
        );
        PassOutcome::Bridged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{CostAction, FixedCost};
    use crate::store::DiGraphStore;

    type Store = DiGraphStore<&'static str, CostAction>;

    /// Replays a fixed probability, never runs dry.
    struct Constant(f64);

    impl RandomSource for Constant {
        fn probability_stream(&mut self, count: usize) -> Box<dyn Iterator<Item = f64> + '_> {
            Box::new(std::iter::repeat_n(self.0, count))
        }

        fn uniform_index(&mut self, _max_exclusive: usize) -> usize {
            0
        }
    }

    fn graph(nodes: &[&'static str], edges: &[(&'static str, &'static str)]) -> ValueGraph<Store> {
        let store = DiGraphStore::from_parts(
            nodes.iter().copied(),
            edges.iter().map(|&(a, b)| (a, b, CostAction::new(1.0))),
        );
        ValueGraph::new(store, nodes[0]).expect("initial state present")
    }

    fn set(ids: &[&'static str]) -> HashSet<&'static str> {
        ids.iter().copied().collect()
    }

    #[test]
    fn lone_initial_state_has_no_orphans() {
        let g = graph(&["a"], &[]);
        let r = g.unreachable_nodes();
        assert!(r.orphans.is_empty());
        assert_eq!(r.loop_count, 0);
    }

    #[test]
    fn chain_is_fully_reachable() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let r = g.unreachable_nodes();
        assert!(r.orphans.is_empty());
        assert_eq!(r.loop_count, 0);
    }

    #[test]
    fn initial_state_excluded_even_when_revisited() {
        // a → b → a: the walk reaches a again but a is never an orphan.
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "a")]);
        let r = g.unreachable_nodes();
        assert_eq!(r.orphans, set(&["c"]));
    }

    #[test]
    fn diamond_counts_one_reencounter() {
        // Stack after seeding: [b, c] (b on top).
        // pop b → push c; pop c → visit; pop c → loop.
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("a", "c"), ("b", "c")]);
        let r = g.unreachable_nodes();
        assert!(r.orphans.is_empty());
        assert_eq!(r.loop_count, 1);
    }

    #[test]
    fn self_loop_is_not_a_reencounter() {
        let g = graph(&["a", "b"], &[("a", "b"), ("b", "b")]);
        assert_eq!(g.unreachable_nodes().loop_count, 0);
    }

    #[test]
    fn orphans_downstream_of_orphans_stay_orphans() {
        let g = graph(&["a", "b", "c", "d"], &[("a", "b"), ("c", "d")]);
        assert_eq!(g.unreachable_nodes().orphans, set(&["c", "d"]));
    }

    #[test]
    fn repair_without_orphans_is_a_no_op() {
        let mut g = graph(&["a", "b"], &[("a", "b")]);
        let report = g
            .force_reachability(&mut FixedCost(1.0), &mut Constant(0.0), &RepairConfig::new(1.0))
            .expect("repair");
        assert_eq!(report.passes, 0);
        assert_eq!(report.inserted(), 0);
        assert_eq!(g.total_edges(), 1);
    }

    #[test]
    fn zero_probability_bridges_one_orphan_per_pass() {
        let mut g = graph(&["a", "b", "c", "d"], &[("a", "b")]);
        let report = g
            .force_reachability(&mut FixedCost(2.0), &mut Constant(0.5), &RepairConfig::new(0.0))
            .expect("repair");

        assert!(report.orphans.is_empty());
        assert_eq!(report.passes, 2);
        assert!(report.random_edges.is_empty());
        // Pass 1: b (out 0, in 1) anchors, c is the first zero in-degree orphan.
        // Pass 2: c is now the only out-degree 0 node and anchors d.
        assert_eq!(report.bridges[0], ("b", "c"));
        assert_eq!(report.bridges[1], ("c", "d"));
        assert!(g.unreachable_nodes().orphans.is_empty());
    }

    #[test]
    fn anchor_prefers_low_out_degree() {
        // Reachable: a(out 2), b(out 1, in 1), c(out 0, in 2).
        let mut g = graph(
            &["a", "b", "c", "x"],
            &[("a", "b"), ("a", "c"), ("b", "c")],
        );
        let report = g
            .force_reachability(&mut FixedCost(1.0), &mut Constant(0.9), &RepairConfig::new(0.0))
            .expect("repair");
        assert_eq!(report.bridges, vec![("c", "x")]);
    }

    #[test]
    fn anchor_ties_on_out_degree_prefer_high_in_degree() {
        // b and c both have out-degree 0; c has in-degree 2 and wins even
        // though b comes first in node order.
        let mut g = graph(
            &["a", "b", "c", "d", "x"],
            &[("a", "b"), ("a", "c"), ("a", "d"), ("d", "c")],
        );
        let report = g
            .force_reachability(&mut FixedCost(1.0), &mut Constant(0.9), &RepairConfig::new(0.0))
            .expect("repair");
        assert_eq!(report.bridges, vec![("c", "x")]);
    }

    #[test]
    fn target_is_lowest_in_degree_orphan() {
        // Orphans x (in 1 from y) and y (in 0): y is bridged first.
        let mut g = graph(&["a", "x", "y"], &[("y", "x")]);
        let report = g
            .force_reachability(&mut FixedCost(1.0), &mut Constant(0.9), &RepairConfig::new(0.0))
            .expect("repair");
        assert_eq!(report.bridges, vec![("a", "y")]);
        assert_eq!(report.passes, 1);
    }

    #[test]
    fn certain_linking_connects_every_orphan_pair_once() {
        let mut g = graph(&["a", "x", "y", "z"], &[]);
        let report = g
            .force_reachability(&mut FixedCost(1.0), &mut Constant(0.0), &RepairConfig::new(1.0))
            .expect("repair");

        assert_eq!(report.passes, 1);
        assert_eq!(report.bridges, vec![("a", "x")]);
        assert_eq!(
            report.random_edges,
            vec![("x", "y"), ("x", "z"), ("y", "z")]
        );
        for &(u, v) in &report.random_edges {
            assert!(!g.store().has_edge(&v, &u), "both directions for {u}/{v}");
        }
    }

    #[test]
    fn pass_limit_reports_non_convergence() {
        let mut g = graph(&["a", "x", "y", "z"], &[]);
        let config = RepairConfig::new(0.0).with_max_passes(1);
        let err = g
            .force_reachability(&mut FixedCost(1.0), &mut Constant(0.5), &config)
            .expect_err("limit");
        assert_eq!(
            err,
            GraphError::RepairDidNotConverge {
                passes: 1,
                remaining: 2
            }
        );
    }

    #[test]
    fn invalid_probability_is_rejected_before_mutation() {
        let mut g = graph(&["a", "x"], &[]);
        let err = g
            .force_reachability(&mut FixedCost(1.0), &mut Constant(0.5), &RepairConfig::new(-0.1))
            .expect_err("invalid");
        assert_eq!(err, GraphError::InvalidProbability(-0.1));
        assert_eq!(g.total_edges(), 0);
    }

    #[test]
    fn bridge_edges_use_factory_values() {
        let mut g = graph(&["a", "x"], &[]);
        let mut factory = |_: &&'static str, to: &&'static str| {
            CostAction::new(if *to == "x" { 4.5 } else { 0.0 })
        };
        g.force_reachability(&mut factory, &mut Constant(0.9), &RepairConfig::default())
            .expect("repair");
        let cost = g.store().edge_value(&"a", &"x").map(|a| a.cost);
        assert_eq!(cost, Some(4.5));
    }
}
