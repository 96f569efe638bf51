//! Runs the configured runners and writes their reports.

use std::sync::Arc;

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::evidence::{EvidenceSink, JsonlEvidenceSink, NoopEvidenceSink};
use crate::report::ReportPaths;
use crate::scenario::{ScenarioReport, ScenarioRunner};
use crate::specs::{SpecReport, SpecRunner, catalogue};
use crate::steps::StepRegistry;

/// Reports produced by one harness invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Scenario report and where it was written, when scenarios ran.
    pub scenarios: Option<(ScenarioReport, ReportPaths)>,
    /// Spec report and where it was written, when specs ran.
    pub specs: Option<(SpecReport, ReportPaths)>,
}

impl RunOutcome {
    /// Returns true when no scenario or case failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        let scenarios_ok = self
            .scenarios
            .as_ref()
            .is_none_or(|(report, _)| report.summary.is_success());
        let specs_ok = self
            .specs
            .as_ref()
            .is_none_or(|(report, _)| report.summary.is_success());
        scenarios_ok && specs_ok
    }
}

/// Runs the runners selected by `config.mode` and writes their reports.
///
/// # Errors
///
/// Returns [`HarnessError`] for configuration problems, invalid feature
/// files, or reports that cannot be written. Test failures are not errors;
/// inspect [`RunOutcome::is_success`].
pub async fn run(config: &HarnessConfig) -> Result<RunOutcome, HarnessError> {
    let mode = config.runner_mode()?;
    let settings = config.context_settings()?;
    let filter = config.tag_filter()?;
    let sink = evidence_sink(config)?;
    tracing::info!(%mode, base_url = %settings.base_url(), workers = config.worker_count(), "harness starting");

    let mut outcome = RunOutcome::default();
    if mode.runs_scenarios() {
        let registry = Arc::new(StepRegistry::standard()?);
        let report = ScenarioRunner::new(registry, settings.clone())
            .with_workers(config.worker_count())
            .with_sink(Arc::clone(&sink))
            .with_filter(filter.clone())
            .run_dir(config.features_dir())
            .await?;
        let paths = report.write(config.report_dir())?;
        tracing::info!(
            total = report.summary.total,
            passed = report.summary.passed,
            failed = report.summary.failed,
            "scenario run complete"
        );
        outcome.scenarios = Some((report, paths));
    }
    if mode.runs_specs() {
        let report = SpecRunner::new(settings)
            .with_workers(config.worker_count())
            .with_sink(sink)
            .with_filter(filter)
            .run(&catalogue())
            .await;
        let paths = report.write(config.report_dir())?;
        tracing::info!(
            total = report.summary.total,
            passed = report.summary.passed,
            failed = report.summary.failed,
            "spec run complete"
        );
        outcome.specs = Some((report, paths));
    }
    Ok(outcome)
}

fn evidence_sink(config: &HarnessConfig) -> Result<Arc<dyn EvidenceSink>, HarnessError> {
    let Some(path) = config.evidence_log() else {
        return Ok(Arc::new(NoopEvidenceSink));
    };
    tracing::info!(path = %path, "appending evidence to log");
    Ok(Arc::new(JsonlEvidenceSink::open(path)?))
}
