pub mod strips;

pub use strips::{
    environment::Environment,
    error::{Error, ParseError},
    fact::{Condition, Fact, Symbol, Term},
    grounding::BindingMode,
    heuristic::{Heuristic, HeuristicKind},
    plan::Plan,
    planner::{plan, PlanReport, Planner, PlannerConfig},
    schema::{ActionSchema, GroundedAction},
    search::{SearchOutcome, SearchStats},
    state::State,
};
