//! Results of a scenario run and the reports written from them.

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;
use crate::evidence::Evidence;
use crate::report::{ReportPaths, Summary, write_report};

const REPORT_STEM: &str = "scenario-report";

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Scenario report</title>
<style>
body { font-family: sans-serif; margin: 2em; }
.passed { color: #1a7f37; }
.failed, .undefined, .ambiguous { color: #cf222e; }
.skipped { color: #6e7781; }
pre { background: #f6f8fa; padding: 0.5em; overflow-x: auto; }
</style>
</head>
<body>
<h1>Scenario report</h1>
<p>Service: {{ base_url }} &middot; generated {{ generated_at }}</p>
<p>{{ summary.total }} scenarios: <span class="passed">{{ summary.passed }} passed</span>, <span class="failed">{{ summary.failed }} failed</span></p>
{% for scenario in scenarios %}
<section>
<h2 class="{{ 'passed' if scenario.passed else 'failed' }}">{{ scenario.feature }}: {{ scenario.name }}</h2>
<p>{{ scenario.feature_path }}:{{ scenario.line }}{% if scenario.tags %} &middot; {% for tag in scenario.tags %}@{{ tag }} {% endfor %}{% endif %} &middot; {{ scenario.duration_ms }} ms</p>
{% if scenario.error %}<p class="failed">{{ scenario.error }}</p>{% endif %}
<ol>
{% for step in scenario.steps %}
<li class="{{ step.status }}">{{ step.keyword }} {{ step.text }} <em>({{ step.status }})</em>
{% if step.error %}<pre>{{ step.error }}</pre>{% endif %}
{% for item in step.evidence %}
<details><summary>{{ item.method }} {{ item.url }} &rarr; {{ item.status }}</summary><pre>{{ item.body }}</pre></details>
{% endfor %}
</li>
{% endfor %}
</ol>
{% if scenario.final_evidence %}
<details><summary>Final response: {{ scenario.final_evidence.method }} {{ scenario.final_evidence.url }} &rarr; {{ scenario.final_evidence.status }}</summary><pre>{{ scenario.final_evidence.body }}</pre></details>
{% endif %}
</section>
{% endfor %}
</body>
</html>
"#;

/// Outcome of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The handler returned successfully.
    Passed,
    /// The handler returned an error.
    Failed,
    /// Not run because an earlier step did not pass.
    Skipped,
    /// No binding matched the step text.
    Undefined,
    /// More than one binding matched the step text.
    Ambiguous,
}

/// Report entry for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Keyword as written in the feature file.
    pub keyword: String,
    /// Step text.
    pub text: String,
    /// Line in the feature file.
    pub line: usize,
    /// Outcome.
    pub status: StepStatus,
    /// Wall-clock duration.
    pub duration_ms: u64,
    /// Failure detail for non-passing steps.
    pub error: Option<String>,
    /// Exchanges captured while the step ran.
    pub evidence: Vec<Evidence>,
}

/// Report entry for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Feature title.
    pub feature: String,
    /// Feature file path.
    pub feature_path: String,
    /// Scenario title.
    pub name: String,
    /// Effective tags.
    pub tags: Vec<String>,
    /// Line of the scenario keyword.
    pub line: usize,
    /// True when every step passed and the scenario was not aborted.
    pub passed: bool,
    /// Failure outside any step, such as a World that could not start.
    pub error: Option<String>,
    /// Step outcomes in order.
    pub steps: Vec<StepResult>,
    /// Last exchange of the scenario, attached by the after hook.
    pub final_evidence: Option<Evidence>,
    /// Wall-clock duration.
    pub duration_ms: u64,
}

/// Full scenario-run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// Service the scenarios ran against.
    pub base_url: String,
    /// Pass/fail counts over scenarios.
    pub summary: Summary,
    /// Scenario outcomes in discovery order.
    pub scenarios: Vec<ScenarioResult>,
}

impl ScenarioReport {
    /// Builds a report and tallies the summary.
    #[must_use]
    pub fn new(base_url: impl Into<String>, scenarios: Vec<ScenarioResult>) -> Self {
        Self {
            generated_at: Utc::now(),
            base_url: base_url.into(),
            summary: Summary::tally(scenarios.iter().map(|scenario| scenario.passed)),
            scenarios,
        }
    }

    /// Writes `scenario-report.json` and `scenario-report.html` under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] or [`HarnessError::Report`] when either
    /// file cannot be produced.
    pub fn write(&self, dir: &Utf8Path) -> Result<ReportPaths, HarnessError> {
        write_report(dir, REPORT_STEM, REPORT_TEMPLATE, self)
    }
}
