//! Executes parsed features against the service.
//!
//! Every selected scenario runs in its own task with its own [`World`].
//! A semaphore bounds how many scenarios are in flight; steps inside a
//! scenario run strictly in order.

use std::sync::Arc;
use std::time::Instant;

use camino::Utf8Path;
use tokio::sync::Semaphore;

use super::feature::{Feature, Scenario, Step, discover, load_feature};
use super::filter::TagFilter;
use super::report::{ScenarioReport, ScenarioResult, StepResult, StepStatus};
use crate::error::HarnessError;
use crate::evidence::{EvidenceSink, NoopEvidenceSink};
use crate::petstore::ContextSettings;
use crate::report::elapsed_ms;
use crate::session::World;
use crate::steps::{StepMatch, StepRegistry};

const DEFAULT_WORKERS: usize = 4;

/// Runs scenarios from feature files.
#[derive(Clone)]
pub struct ScenarioRunner {
    registry: Arc<StepRegistry>,
    settings: ContextSettings,
    workers: usize,
    sink: Arc<dyn EvidenceSink>,
    filter: TagFilter,
}

impl std::fmt::Debug for ScenarioRunner {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ScenarioRunner")
            .field("bindings", &self.registry.len())
            .field("settings", &self.settings)
            .field("workers", &self.workers)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl ScenarioRunner {
    /// Creates a runner with four workers, no evidence sink and no tag
    /// filter.
    #[must_use]
    pub fn new(registry: Arc<StepRegistry>, settings: ContextSettings) -> Self {
        Self {
            registry,
            settings,
            workers: DEFAULT_WORKERS,
            sink: Arc::new(NoopEvidenceSink),
            filter: TagFilter::all(),
        }
    }

    /// Sets the number of scenarios run concurrently; zero is treated as one.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Forwards every captured exchange to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EvidenceSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Only runs scenarios whose tags satisfy `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: TagFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Discovers, parses and runs every feature below `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] when discovery or reading fails and
    /// [`HarnessError::FeatureParse`] for an invalid feature file. Scenario
    /// failures are reported, never returned.
    pub async fn run_dir(&self, dir: &Utf8Path) -> Result<ScenarioReport, HarnessError> {
        let paths = discover(dir)?;
        tracing::info!(dir = %dir, files = paths.len(), "feature files discovered");
        let features = paths
            .iter()
            .map(|path| load_feature(path))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.run_features(&features).await)
    }

    /// Runs the selected scenarios of `features`.
    pub async fn run_features(&self, features: &[Feature]) -> ScenarioReport {
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut pending = Vec::new();
        for feature in features {
            for scenario in &feature.scenarios {
                if !self.filter.matches(&scenario.tags) {
                    tracing::debug!(scenario = %scenario.name, "scenario filtered out by tags");
                    continue;
                }
                let unit = ScenarioUnit {
                    feature: feature.name.clone(),
                    feature_path: feature.path.clone(),
                    scenario: scenario.clone(),
                };
                let task = tokio::spawn(run_scenario(
                    Arc::clone(&permits),
                    Arc::clone(&self.registry),
                    self.settings.clone(),
                    Arc::clone(&self.sink),
                    unit.clone(),
                ));
                pending.push((unit, task));
            }
        }

        let mut results = Vec::with_capacity(pending.len());
        for (unit, task) in pending {
            match task.await {
                Ok(result) => results.push(result),
                Err(error) => {
                    tracing::error!(scenario = %unit.scenario.name, %error, "scenario task aborted");
                    results.push(unit.aborted(format!("scenario task aborted: {error}")));
                }
            }
        }
        ScenarioReport::new(self.settings.base_url().as_str(), results)
    }
}

#[derive(Debug, Clone)]
struct ScenarioUnit {
    feature: String,
    feature_path: String,
    scenario: Scenario,
}

impl ScenarioUnit {
    fn result(self, steps: Vec<StepResult>, error: Option<String>, started: Instant) -> ScenarioResult {
        let passed = error.is_none() && steps.iter().all(|step| step.status == StepStatus::Passed);
        ScenarioResult {
            feature: self.feature,
            feature_path: self.feature_path,
            name: self.scenario.name,
            tags: self.scenario.tags,
            line: self.scenario.line,
            passed,
            error,
            steps,
            final_evidence: None,
            duration_ms: elapsed_ms(started),
        }
    }

    fn aborted(self, error: String) -> ScenarioResult {
        let steps = self.scenario.steps.iter().map(skipped).collect();
        self.result(steps, Some(error), Instant::now())
    }
}

async fn run_scenario(
    permits: Arc<Semaphore>,
    registry: Arc<StepRegistry>,
    settings: ContextSettings,
    sink: Arc<dyn EvidenceSink>,
    unit: ScenarioUnit,
) -> ScenarioResult {
    let _permit = permits
        .acquire_owned()
        .await
        .inspect_err(|error| tracing::warn!(%error, "worker pool closed; running unbounded"))
        .ok();
    let started = Instant::now();
    tracing::info!(feature = %unit.feature, scenario = %unit.scenario.name, "scenario started");

    let mut world = World::new(sink);
    let (steps, error) = match world.start(&settings) {
        Ok(()) => (run_steps(&registry, &mut world, &unit.scenario.steps).await, None),
        Err(error) => (
            unit.scenario.steps.iter().map(skipped).collect(),
            Some(format!("scenario could not start: {error}")),
        ),
    };
    let evidence = world.finish().await;

    let mut result = unit.result(steps, error, started);
    result.final_evidence = evidence.last().cloned();
    if result.passed {
        tracing::info!(scenario = %result.name, duration_ms = result.duration_ms, "scenario passed");
    } else {
        tracing::warn!(scenario = %result.name, duration_ms = result.duration_ms, "scenario failed");
    }
    result
}

async fn run_steps(registry: &StepRegistry, world: &mut World, steps: &[Step]) -> Vec<StepResult> {
    let mut results = Vec::with_capacity(steps.len());
    let mut halted = false;
    for step in steps {
        if halted {
            results.push(skipped(step));
            continue;
        }
        let started = Instant::now();
        let before = world.evidence().len();
        let (status, error) = match registry.resolve(&step.text) {
            StepMatch::Matched { handler, args, .. } => match handler(world, args).await {
                Ok(()) => (StepStatus::Passed, None),
                Err(error) => (StepStatus::Failed, Some(error.to_string())),
            },
            StepMatch::Undefined => (
                StepStatus::Undefined,
                Some(format!("no step binding matches `{}`", step.text)),
            ),
            StepMatch::Ambiguous(candidates) => (
                StepStatus::Ambiguous,
                Some(format!("step matches several bindings: {}", candidates.join("; "))),
            ),
        };
        halted = status != StepStatus::Passed;
        if let Some(detail) = &error {
            tracing::debug!(step = %step.text, ?status, %detail, "step did not pass");
        }
        results.push(StepResult {
            keyword: step.keyword.clone(),
            text: step.text.clone(),
            line: step.line,
            status,
            duration_ms: elapsed_ms(started),
            error,
            evidence: world.evidence().get(before..).unwrap_or_default().to_vec(),
        });
    }
    results
}

fn skipped(step: &Step) -> StepResult {
    StepResult {
        keyword: step.keyword.clone(),
        text: step.text.clone(),
        line: step.line,
        status: StepStatus::Skipped,
        duration_ms: 0,
        error: None,
        evidence: Vec::new(),
    }
}
