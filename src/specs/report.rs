//! Results of a spec run and the reports written from them.

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;
use crate::evidence::Evidence;
use crate::report::{ReportPaths, Summary, write_report};

const REPORT_STEM: &str = "spec-report";

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Spec report</title>
<style>
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; width: 100%; }
td, th { border: 1px solid #d0d7de; padding: 0.4em; text-align: left; vertical-align: top; }
.passed { color: #1a7f37; }
.failed { color: #cf222e; }
pre { background: #f6f8fa; padding: 0.5em; overflow-x: auto; }
</style>
</head>
<body>
<h1>Spec report</h1>
<p>Service: {{ base_url }} &middot; generated {{ generated_at }}</p>
<p>{{ summary.total }} cases: <span class="passed">{{ summary.passed }} passed</span>, <span class="failed">{{ summary.failed }} failed</span></p>
<table>
<tr><th>Suite</th><th>Case</th><th>Tags</th><th>Result</th><th>Evidence</th></tr>
{% for case in cases %}
<tr>
<td>{{ case.suite }}</td>
<td>{{ case.name }}</td>
<td>{% for tag in case.tags %}@{{ tag }} {% endfor %}</td>
<td class="{{ 'passed' if case.passed else 'failed' }}">{{ 'passed' if case.passed else 'failed' }} ({{ case.duration_ms }} ms){% if case.error %}<pre>{{ case.error }}</pre>{% endif %}</td>
<td>{% for item in case.evidence %}<details><summary>{{ item.label }}: {{ item.method }} {{ item.url }} &rarr; {{ item.status }}</summary><pre>{{ item.body }}</pre></details>{% endfor %}</td>
</tr>
{% endfor %}
</table>
</body>
</html>
"#;

/// Report entry for one spec case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecResult {
    /// Suite name.
    pub suite: String,
    /// Case name.
    pub name: String,
    /// Effective tags.
    pub tags: Vec<String>,
    /// True when the case body returned successfully.
    pub passed: bool,
    /// Failure detail.
    pub error: Option<String>,
    /// Exchanges captured by the case, in order.
    pub evidence: Vec<Evidence>,
    /// Wall-clock duration.
    pub duration_ms: u64,
}

/// Full spec-run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecReport {
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// Service the cases ran against.
    pub base_url: String,
    /// Pass/fail counts over cases.
    pub summary: Summary,
    /// Case outcomes in catalogue order.
    pub cases: Vec<SpecResult>,
}

impl SpecReport {
    /// Builds a report and tallies the summary.
    #[must_use]
    pub fn new(base_url: impl Into<String>, cases: Vec<SpecResult>) -> Self {
        Self {
            generated_at: Utc::now(),
            base_url: base_url.into(),
            summary: Summary::tally(cases.iter().map(|case| case.passed)),
            cases,
        }
    }

    /// Writes `spec-report.json` and `spec-report.html` under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] or [`HarnessError::Report`] when either
    /// file cannot be produced.
    pub fn write(&self, dir: &Utf8Path) -> Result<ReportPaths, HarnessError> {
        write_report(dir, REPORT_STEM, REPORT_TEMPLATE, self)
    }
}
