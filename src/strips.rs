pub mod environment;
pub mod error;
pub mod fact;
pub mod grounding;
pub mod heuristic;
pub mod parser;
pub mod plan;
pub mod planner;
pub mod schema;
pub mod search;
pub mod state;
