//! Harness configuration loaded from CLI, environment, and files.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in harness defaults
//! 2. **Configuration file** – `.petstore-harness.toml` in the current
//!    directory, home directory, or XDG config directory
//! 3. **Environment variables** – `PETSTORE_BASE_URL`, `PETSTORE_TIMEOUT_MS`,
//!    and friends; the legacy `API_BASE_URL` and `API_TIMEOUT` are read only
//!    when no layer sets the corresponding value
//! 4. **Command-line arguments** – `--base-url`/`-b`, `--timeout-ms`/`-T`,
//!    `--tags`/`-t`, `--mode`/`-m`, ...
//!
//! # Configuration File
//!
//! ```toml
//! base_url = "http://localhost:8080/v2"
//! timeout_ms = 10000
//! workers = 8
//! mode = "scenarios"
//! features_dir = "features"
//! report_dir = "reports"
//! tags = "@smoke and not @slow"
//! evidence_log = "reports/evidence.jsonl"
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use camino::Utf8Path;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;
use crate::petstore::{ContextSettings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::scenario::TagFilter;

/// Legacy variable naming the service base URL.
pub const LEGACY_BASE_URL_VAR: &str = "API_BASE_URL";

/// Legacy variable naming the per-request timeout in milliseconds.
pub const LEGACY_TIMEOUT_VAR: &str = "API_TIMEOUT";

const DEFAULT_WORKERS: usize = 4;
const DEFAULT_FEATURES_DIR: &str = "features";
const DEFAULT_REPORT_DIR: &str = "reports";

/// Which runners a harness invocation executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunnerMode {
    /// Feature files only.
    Scenarios,
    /// Code-style spec suites only.
    Specs,
    /// Both runners, scenarios first.
    #[default]
    All,
}

impl RunnerMode {
    /// Returns true when the scenario runner should execute.
    #[must_use]
    pub const fn runs_scenarios(self) -> bool {
        matches!(self, Self::Scenarios | Self::All)
    }

    /// Returns true when the spec runner should execute.
    #[must_use]
    pub const fn runs_specs(self) -> bool {
        matches!(self, Self::Specs | Self::All)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Scenarios => "scenarios",
            Self::Specs => "specs",
            Self::All => "all",
        }
    }
}

impl fmt::Display for RunnerMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RunnerMode {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scenarios" => Ok(Self::Scenarios),
            "specs" => Ok(Self::Specs),
            "all" => Ok(Self::All),
            other => Err(HarnessError::Configuration {
                message: format!("unknown mode '{other}' (expected scenarios, specs or all)"),
            }),
        }
    }
}

/// Harness configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use petstore_harness::HarnessConfig;
///
/// let config = HarnessConfig::load().expect("failed to load configuration");
/// let settings = config.context_settings().expect("valid base URL");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PETSTORE",
    discovery(
        dotfile_name = ".petstore-harness.toml",
        config_file_name = "petstore-harness.toml",
        app_name = "petstore-harness"
    )
)]
pub struct HarnessConfig {
    /// Base URL of the service, including the API prefix.
    ///
    /// Can be provided via:
    /// - CLI: `--base-url <URL>` or `-b <URL>`
    /// - Environment: `PETSTORE_BASE_URL`, or legacy `API_BASE_URL`
    /// - Config file: `base_url = "..."`
    #[ortho_config(cli_short = 'b')]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    ///
    /// Falls back to the legacy `API_TIMEOUT` variable, then 30000.
    #[ortho_config(cli_short = 'T')]
    pub timeout_ms: Option<u64>,

    /// Number of scenarios or cases run concurrently.
    #[ortho_config(cli_short = 'w')]
    pub workers: usize,

    /// `scenarios`, `specs` or `all`.
    #[ortho_config(cli_short = 'm')]
    pub mode: String,

    /// Directory searched recursively for `*.feature` files.
    #[ortho_config(cli_short = 'f')]
    pub features_dir: String,

    /// Directory receiving the JSON and HTML reports.
    #[ortho_config(cli_short = 'r')]
    pub report_dir: String,

    /// Tag expression selecting scenarios and cases, e.g. `@smoke`.
    #[ortho_config(cli_short = 't')]
    pub tags: Option<String>,

    /// Optional JSON-lines file receiving every evidence record as it is
    /// captured.
    #[ortho_config(cli_short = 'e')]
    pub evidence_log: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: None,
            workers: DEFAULT_WORKERS,
            mode: RunnerMode::All.to_string(),
            features_dir: DEFAULT_FEATURES_DIR.to_owned(),
            report_dir: DEFAULT_REPORT_DIR.to_owned(),
            tags: None,
            evidence_log: None,
        }
    }
}

impl HarnessConfig {
    /// Resolves the base URL from configuration, then `API_BASE_URL`, then
    /// the public demo service.
    #[must_use]
    pub fn resolve_base_url(&self) -> String {
        self.base_url
            .clone()
            .or_else(|| env::var(LEGACY_BASE_URL_VAR).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
    }

    /// Resolves the request timeout from configuration, then `API_TIMEOUT`,
    /// then 30 seconds.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] when `API_TIMEOUT` is set but
    /// is not a whole number of milliseconds.
    pub fn resolve_timeout(&self) -> Result<Duration, HarnessError> {
        if let Some(millis) = self.timeout_ms {
            return Ok(Duration::from_millis(millis));
        }
        let Ok(raw) = env::var(LEGACY_TIMEOUT_VAR) else {
            return Ok(DEFAULT_TIMEOUT);
        };
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|error| HarnessError::Configuration {
                message: format!("{LEGACY_TIMEOUT_VAR}='{raw}' is not a number of milliseconds: {error}"),
            })
    }

    /// Parses the configured mode.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] for an unknown mode.
    pub fn runner_mode(&self) -> Result<RunnerMode, HarnessError> {
        self.mode.parse()
    }

    /// Worker count, never less than one.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.max(1)
    }

    /// Parses the configured tag expression.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] for a malformed expression.
    pub fn tag_filter(&self) -> Result<TagFilter, HarnessError> {
        TagFilter::from_option(self.tags.as_deref())
    }

    /// Directory holding feature files.
    #[must_use]
    pub fn features_dir(&self) -> &Utf8Path {
        Utf8Path::new(&self.features_dir)
    }

    /// Directory receiving reports.
    #[must_use]
    pub fn report_dir(&self) -> &Utf8Path {
        Utf8Path::new(&self.report_dir)
    }

    /// Optional evidence log path.
    #[must_use]
    pub fn evidence_log(&self) -> Option<&Utf8Path> {
        self.evidence_log.as_deref().map(Utf8Path::new)
    }

    /// HTTP context settings derived from the resolved base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] for a bad timeout and
    /// [`HarnessError::Api`] when the base URL is not an absolute URL.
    pub fn context_settings(&self) -> Result<ContextSettings, HarnessError> {
        let timeout = self.resolve_timeout()?;
        Ok(ContextSettings::new(&self.resolve_base_url(), timeout)?)
    }
}

#[cfg(test)]
mod tests;
