//! Pet-store harness entrypoint.
//!
//! Loads layered configuration, installs the log subscriber, runs the
//! selected runners and exits non-zero when any scenario or case failed or
//! the harness itself could not complete.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use petstore_harness::{HarnessConfig, HarnessError, harness, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(error) = telemetry::init() {
        report_error(&error);
    }
    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            tracing::error!(%error, "harness run failed");
            report_error(&error);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<bool, HarnessError> {
    let config = load_config()?;
    let outcome = harness::run(&config).await?;
    Ok(outcome.is_success())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`HarnessError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<HarnessConfig, HarnessError> {
    HarnessConfig::load().map_err(|error| HarnessError::Configuration {
        message: error.to_string(),
    })
}

fn report_error(error: &HarnessError) {
    let _ignored = writeln!(io::stderr().lock(), "{error}");
}
