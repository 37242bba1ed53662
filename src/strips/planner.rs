use tracing::info;

use super::{
    environment::Environment,
    grounding::BindingMode,
    heuristic::HeuristicKind,
    search::{Search, SearchOutcome, SearchStats},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlannerConfig {
    pub binding: BindingMode,
    pub heuristic: HeuristicKind,
    /// Expansion budget. `None` searches until the frontier is exhausted.
    pub max_expansions: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

#[derive(Debug, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn plan(&self, env: &Environment) -> PlanReport {
        let actions = env.ground(self.config.binding);
        let heuristic = self.config.heuristic.build();
        let mut search = Search::new(&actions, env.goal(), &*heuristic).with_max_expansions(self.config.max_expansions);
        let outcome = search.run(env.initial_state());
        let stats = search.stats();
        match &outcome {
            SearchOutcome::Solved(plan) => info!(grounded = stats.grounded_actions, expanded = stats.expanded, length = plan.len(), "plan found"),
            SearchOutcome::Unsolvable => info!(grounded = stats.grounded_actions, expanded = stats.expanded, "no plan exists"),
            SearchOutcome::Exhausted => info!(grounded = stats.grounded_actions, expanded = stats.expanded, "no plan within expansion budget"),
        }
        PlanReport { outcome, stats }
    }
}

pub fn plan(env: &Environment) -> SearchOutcome {
    Planner::new().plan(env).outcome
}
