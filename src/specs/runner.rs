//! Executes spec cases, each with a fresh World.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;

use super::SpecCase;
use super::report::{SpecReport, SpecResult};
use crate::evidence::{Evidence, EvidenceSink, NoopEvidenceSink};
use crate::petstore::ContextSettings;
use crate::report::elapsed_ms;
use crate::scenario::TagFilter;
use crate::session::World;

const DEFAULT_WORKERS: usize = 4;

/// Runs spec cases in parallel up to a worker limit.
#[derive(Clone)]
pub struct SpecRunner {
    settings: ContextSettings,
    workers: usize,
    sink: Arc<dyn EvidenceSink>,
    filter: TagFilter,
}

impl std::fmt::Debug for SpecRunner {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SpecRunner")
            .field("settings", &self.settings)
            .field("workers", &self.workers)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl SpecRunner {
    /// Creates a runner with four workers, no evidence sink and no filter.
    #[must_use]
    pub fn new(settings: ContextSettings) -> Self {
        Self {
            settings,
            workers: DEFAULT_WORKERS,
            sink: Arc::new(NoopEvidenceSink),
            filter: TagFilter::all(),
        }
    }

    /// Sets the number of cases run concurrently; zero is treated as one.
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

    /// Only runs cases whose tags, including the suite name, satisfy
    /// `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: TagFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Runs the selected `cases`; a failing case never stops the others.
    pub async fn run(&self, cases: &[SpecCase]) -> SpecReport {
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut pending = Vec::new();
        for case in cases {
            if !self.filter.matches(&case.effective_tags()) {
                tracing::debug!(suite = case.suite, case = case.name, "case filtered out by tags");
                continue;
            }
            let task = tokio::spawn(run_case(
                Arc::clone(&permits),
                self.settings.clone(),
                Arc::clone(&self.sink),
                *case,
            ));
            pending.push((*case, task));
        }

        let mut results = Vec::with_capacity(pending.len());
        for (case, task) in pending {
            match task.await {
                Ok(result) => results.push(result),
                Err(error) => {
                    tracing::error!(case = case.name, %error, "case task aborted");
                    results.push(outcome(
                        case,
                        Some(format!("case task aborted: {error}")),
                        Vec::new(),
                        0,
                    ));
                }
            }
        }
        SpecReport::new(self.settings.base_url().as_str(), results)
    }
}

async fn run_case(
    permits: Arc<Semaphore>,
    settings: ContextSettings,
    sink: Arc<dyn EvidenceSink>,
    case: SpecCase,
) -> SpecResult {
    let _permit = permits
        .acquire_owned()
        .await
        .inspect_err(|error| tracing::warn!(%error, "worker pool closed; running unbounded"))
        .ok();
    let started = Instant::now();
    tracing::info!(suite = case.suite, case = case.name, "case started");

    let mut world = World::new(sink);
    let error = match world.start(&settings) {
        Ok(()) => (case.run)(&mut world).await.err().map(|error| error.to_string()),
        Err(error) => Some(format!("case could not start: {error}")),
    };
    let evidence = world.finish().await;

    let result = outcome(case, error, evidence, elapsed_ms(started));
    if result.passed {
        tracing::info!(case = case.name, duration_ms = result.duration_ms, "case passed");
    } else {
        tracing::warn!(case = case.name, error = ?result.error, "case failed");
    }
    result
}

fn outcome(
    case: SpecCase,
    error: Option<String>,
    evidence: Vec<Evidence>,
    duration_ms: u64,
) -> SpecResult {
    SpecResult {
        suite: case.suite.to_owned(),
        name: case.name.to_owned(),
        tags: case
            .effective_tags()
            .into_iter()
            .map(str::to_owned)
            .collect(),
        passed: error.is_none(),
        error,
        evidence,
        duration_ms,
    }
}
