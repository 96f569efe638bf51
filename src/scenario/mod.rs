//! Scenario-file runner: narrative feature files bound to step handlers.
//!
//! Features are discovered under a directory, parsed into [`Feature`]
//! values, filtered by tag and executed by a [`ScenarioRunner`], which
//! produces a [`ScenarioReport`].

mod feature;
mod filter;
mod report;
mod runner;

pub use feature::{Feature, Scenario, Step, discover, load_feature, parse_feature};
pub use filter::TagFilter;
pub use report::{ScenarioReport, ScenarioResult, StepResult, StepStatus};
pub use runner::ScenarioRunner;
