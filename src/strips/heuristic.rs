use std::collections::BTreeSet;

use super::{fact::Fact, state::State};

/// Estimated remaining cost from `state` to any state satisfying `goal`.
///
/// The search never reopens closed states, so an estimate that is not consistent can
/// cost plan optimality.
pub trait Heuristic {
    fn estimate(&self, state: &State, goal: &BTreeSet<Fact>) -> u32;
}

impl<F> Heuristic for F
where
    F: Fn(&State, &BTreeSet<Fact>) -> u32,
{
    fn estimate(&self, state: &State, goal: &BTreeSet<Fact>) -> u32 {
        self(state, goal)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Zero;

impl Heuristic for Zero {
    fn estimate(&self, _: &State, _: &BTreeSet<Fact>) -> u32 {
        0
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GoalCount;

impl Heuristic for GoalCount {
    fn estimate(&self, state: &State, goal: &BTreeSet<Fact>) -> u32 {
        goal.iter().filter(|f| !state.contains(f)).count() as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HeuristicKind {
    #[default]
    Zero,
    GoalCount,
}

impl HeuristicKind {
    pub fn build(self) -> Box<dyn Heuristic> {
        match self {
            HeuristicKind::Zero => Box::new(Zero),
            HeuristicKind::GoalCount => Box::new(GoalCount),
        }
    }
}
