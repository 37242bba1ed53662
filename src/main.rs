use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strips_planner::{BindingMode, Environment, HeuristicKind, Planner, PlannerConfig, SearchOutcome};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Binding {
    /// Each parameter bound to a different symbol
    Distinct,
    /// Parameters may share a symbol
    Repeated,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Estimate {
    /// Uniform-cost search
    Zero,
    /// Count of unsatisfied goal facts
    GoalCount,
}

#[derive(Parser)]
#[command(name = "strips-planner")]
#[command(about = "Grounds a STRIPS problem and searches for a plan", long_about = None)]
struct Cli {
    /// Problem description file
    file: String,
    #[arg(long, value_enum, default_value = "distinct")]
    binding: Binding,
    #[arg(long, value_enum, default_value = "zero")]
    heuristic: Estimate,
    /// Give up after this many node expansions
    #[arg(long)]
    max_expansions: Option<usize>,
    /// Print the parsed environment before planning
    #[arg(long)]
    show_environment: bool,
}

impl Cli {
    fn config(&self) -> PlannerConfig {
        PlannerConfig {
            binding: match self.binding {
                Binding::Distinct => BindingMode::Distinct,
                Binding::Repeated => BindingMode::Repeated,
            },
            heuristic: match self.heuristic {
                Estimate::Zero => HeuristicKind::Zero,
                Estimate::GoalCount => HeuristicKind::GoalCount,
            },
            max_expansions: self.max_expansions,
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "strips_planner=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let env = Environment::from_file(&cli.file).with_context(|| format!("Unable to load problem {}", cli.file))?;
    if cli.show_environment {
        println!("{}", env);
    }

    let report = Planner::with_config(cli.config()).plan(&env);
    match report.outcome {
        SearchOutcome::Solved(plan) => {
            println!("Plan:");
            print!("{}", plan);
            Ok(ExitCode::SUCCESS)
        }
        SearchOutcome::Unsolvable => {
            println!("No plan found.");
            Ok(ExitCode::from(2))
        }
        SearchOutcome::Exhausted => {
            println!("No plan found within {} expansions.", report.stats.expanded);
            Ok(ExitCode::from(3))
        }
    }
}
