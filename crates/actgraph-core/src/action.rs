//! Edge values ("actions") and the factory used to mint new ones.
//!
//! Repair inserts edges the caller never supplied, so it needs an
//! [`ActionFactory`] to produce a cost-bearing value for each new
//! `(from, to)` pair. Any `FnMut(&N, &N) -> A` closure is a factory.

use std::ops::Range;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// A directed edge value carrying a numeric cost.
pub trait Action {
    /// Cost of traversing the edge. `NaN` marks the cost as absent.
    fn cost(&self) -> f64;
}

impl Action for f64 {
    fn cost(&self) -> f64 {
        *self
    }
}

/// Plain cost-only action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostAction {
    pub cost: f64,
}

impl CostAction {
    #[must_use]
    pub const fn new(cost: f64) -> Self {
        Self { cost }
    }
}

impl Action for CostAction {
    fn cost(&self) -> f64 {
        self.cost
    }
}

/// Produces the value for a newly inserted edge `from → to`.
pub trait ActionFactory<N, A> {
    fn create_action(&mut self, from: &N, to: &N) -> A;
}

impl<N, A, F> ActionFactory<N, A> for F
where
    F: FnMut(&N, &N) -> A,
{
    fn create_action(&mut self, from: &N, to: &N) -> A {
        self(from, to)
    }
}

/// Factory handing out the same cost for every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCost(pub f64);

impl<N> ActionFactory<N, CostAction> for FixedCost {
    fn create_action(&mut self, _from: &N, _to: &N) -> CostAction {
        CostAction::new(self.0)
    }
}

/// Factory drawing each cost uniformly from `range`.
#[derive(Debug, Clone)]
pub struct UniformCost<R = StdRng> {
    range: Range<f64>,
    rng: R,
}

impl UniformCost<StdRng> {
    /// Reproducible factory seeded with `seed`.
    #[must_use]
    pub fn seeded(range: Range<f64>, seed: u64) -> Self {
        Self::with_rng(range, StdRng::seed_from_u64(seed))
    }

    /// Factory seeded from OS entropy.
    #[must_use]
    pub fn from_entropy(range: Range<f64>) -> Self {
        Self::with_rng(range, StdRng::from_entropy())
    }
}

impl<R: Rng> UniformCost<R> {
    #[must_use]
    pub const fn with_rng(range: Range<f64>, rng: R) -> Self {
        Self { range, rng }
    }
}

impl<N, R: Rng> ActionFactory<N, CostAction> for UniformCost<R> {
    fn create_action(&mut self, _from: &N, _to: &N) -> CostAction {
        // An empty or unbounded range degenerates to its start.
        if self.range.start < self.range.end && (self.range.end - self.range.start).is_finite() {
            CostAction::new(self.rng.gen_range(self.range.clone()))
        } else {
            CostAction::new(self.range.start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_cost_ignores_endpoints() {
        let mut factory = FixedCost(2.5);
        let a = factory.create_action(&"a", &"b");
        let b = factory.create_action(&"x", &"y");
        assert_eq!(a, CostAction::new(2.5));
        assert_eq!(a, b);
    }

    #[test]
    fn closures_are_factories() {
        let mut calls = 0;
        let mut factory = |from: &u32, to: &u32| {
            calls += 1;
            f64::from(from + to)
        };
        assert!((factory.create_action(&1, &2) - 3.0).abs() < f64::EPSILON);
        drop(factory);
        assert_eq!(calls, 1);
    }

    #[test]
    fn uniform_cost_stays_in_range() {
        let mut factory = UniformCost::seeded(1.0..5.0, 7);
        for _ in 0..200 {
            let action: CostAction = factory.create_action(&0u8, &1u8);
            assert!((1.0..5.0).contains(&action.cost));
        }
    }

    #[test]
    fn uniform_cost_is_reproducible() {
        let mut a = UniformCost::seeded(0.0..10.0, 42);
        let mut b = UniformCost::seeded(0.0..10.0, 42);
        for _ in 0..10 {
            let x: CostAction = a.create_action(&0u8, &1u8);
            let y: CostAction = b.create_action(&0u8, &1u8);
            assert_eq!(x, y);
        }
    }

    #[test]
    fn empty_range_degenerates_to_start() {
        let mut factory = UniformCost::seeded(3.0..3.0, 1);
        let action: CostAction = factory.create_action(&0u8, &1u8);
        assert!((action.cost - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unbounded_range_degenerates_to_start() {
        let mut factory = UniformCost::seeded(1.0..f64::INFINITY, 1);
        let action: CostAction = factory.create_action(&0u8, &1u8);
        assert!((action.cost - 1.0).abs() < f64::EPSILON);
    }
}
