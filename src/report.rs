//! Helpers shared by the scenario and spec reports.
//!
//! Both runners write a machine-readable JSON report and an HTML report
//! rendered with `minijinja`. The HTML templates are registered under names
//! ending in `.html` and rendered with HTML auto-escaping, so response bodies
//! embedded as evidence cannot inject markup.

use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};
use minijinja::{AutoEscape, Environment};
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Pass/fail counts for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Units executed.
    pub total: usize,
    /// Units that passed.
    pub passed: usize,
    /// Units that failed.
    pub failed: usize,
}

impl Summary {
    /// Tallies pass flags.
    #[must_use]
    pub fn tally(outcomes: impl IntoIterator<Item = bool>) -> Self {
        outcomes.into_iter().fold(Self::default(), |summary, passed| Self {
            total: summary.total + 1,
            passed: summary.passed + usize::from(passed),
            failed: summary.failed + usize::from(!passed),
        })
    }

    /// Returns true when nothing failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Files written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// Machine-readable report.
    pub json: Utf8PathBuf,
    /// Rich HTML report.
    pub html: Utf8PathBuf,
}

/// Milliseconds since `started`, saturating.
pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Writes `report` as `<stem>.json` and `<stem>.html` under `dir`.
pub(crate) fn write_report<T>(
    dir: &Utf8Path,
    stem: &str,
    template: &str,
    report: &T,
) -> Result<ReportPaths, HarnessError>
where
    T: Serialize,
{
    std::fs::create_dir_all(dir).map_err(|error| HarnessError::io(dir, &error))?;

    let json = dir.join(format!("{stem}.json"));
    let serialised = serde_json::to_string_pretty(report).map_err(|error| HarnessError::Report {
        message: format!("failed to serialise {stem}: {error}"),
    })?;
    std::fs::write(&json, serialised).map_err(|error| HarnessError::io(&json, &error))?;

    let html_name = format!("{stem}.html");
    let rendered = render_html(&html_name, template, report)?;
    let html = dir.join(&html_name);
    std::fs::write(&html, rendered).map_err(|error| HarnessError::io(&html, &error))?;

    tracing::info!(json = %json, html = %html, "report written");
    Ok(ReportPaths { json, html })
}

pub(crate) fn render_html<T>(name: &str, template: &str, report: &T) -> Result<String, HarnessError>
where
    T: Serialize,
{
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_template(name, template)
        .map_err(|error| HarnessError::Report {
            message: format!("invalid template {name}: {error}"),
        })?;
    let compiled = env.get_template(name).map_err(|error| HarnessError::Report {
        message: format!("failed to retrieve template {name}: {error}"),
    })?;
    compiled
        .render(minijinja::Value::from_serialize(report))
        .map_err(|error| HarnessError::Report {
            message: format!("template rendering failed for {name}: {error}"),
        })
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use serde::Serialize;

    use super::{Summary, render_html, write_report};

    #[derive(Serialize)]
    struct Sample {
        title: String,
    }

    #[rstest]
    #[case::all_pass(vec![true, true], Summary { total: 2, passed: 2, failed: 0 })]
    #[case::mixed(vec![true, false, false], Summary { total: 3, passed: 1, failed: 2 })]
    #[case::empty(vec![], Summary::default())]
    fn tallies_outcomes(#[case] outcomes: Vec<bool>, #[case] expected: Summary) {
        assert_eq!(Summary::tally(outcomes), expected);
    }

    #[test]
    fn html_output_is_escaped() {
        let sample = Sample {
            title: "<script>alert(1)</script>".to_owned(),
        };

        let html = render_html("sample.html", "<h1>{{ title }}</h1>", &sample)
            .expect("template should render");

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;&#x2f;script&gt;"));
    }

    #[test]
    fn writes_json_and_html_side_by_side() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().join("reports")).expect("utf-8 path");
        let sample = Sample {
            title: "pets".to_owned(),
        };

        let paths = write_report(&root, "sample-report", "<p>{{ title }}</p>", &sample)
            .expect("report should be written");

        assert_eq!(paths.json, root.join("sample-report.json"));
        let json = std::fs::read_to_string(&paths.json).expect("json report");
        assert!(json.contains("\"title\": \"pets\""));
        let html = std::fs::read_to_string(&paths.html).expect("html report");
        assert_eq!(html, "<p>pets</p>");
    }
}
