//! Shared fixtures for configuration tests.
//!
//! Every helper that touches the process environment holds the `env_lock`
//! guard for as long as the code under test runs, so the legacy `API_*`
//! fallbacks and the `PETSTORE_*` layer never leak between tests.

use std::ffi::OsString;

use ortho_config::{MergeComposer, OrthoConfig};
use serde_json::Value;

use crate::HarnessConfig;
use crate::config::{LEGACY_BASE_URL_VAR, LEGACY_TIMEOUT_VAR};

/// Layer a JSON fragment is pushed as when merging.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    Defaults,
    File,
    Environment,
    Cli,
}

/// Merges `(source, fragment)` pairs in order, lowest precedence first.
pub fn merge_layers(layers: &[(Source, Value)]) -> HarnessConfig {
    let mut composer = MergeComposer::new();
    for (source, fragment) in layers {
        let fragment = fragment.clone();
        match source {
            Source::Defaults => composer.push_defaults(fragment),
            Source::File => composer.push_file(fragment, None),
            Source::Environment => composer.push_environment(fragment),
            Source::Cli => composer.push_cli(fragment),
        }
    }
    HarnessConfig::merge_from_layers(composer.layers()).expect("layers should merge")
}

/// Runs `check` with the legacy `API_BASE_URL` and `API_TIMEOUT` variables
/// pinned to the given values; `None` unsets the variable.
pub fn with_legacy_env<R>(
    base_url: Option<&str>,
    timeout: Option<&str>,
    check: impl FnOnce() -> R,
) -> R {
    let _guard = env_lock::lock_env([
        (LEGACY_BASE_URL_VAR, base_url),
        (LEGACY_TIMEOUT_VAR, timeout),
    ]);
    check()
}

/// Loads a config from `args` as the binary would see them.
///
/// Home and XDG directories point at an empty temporary directory and the
/// `PETSTORE_*` variables are unset, so only defaults and the arguments
/// contribute.
pub fn load_from_args(args: &[&str]) -> HarnessConfig {
    let home = tempfile::TempDir::new().expect("temp dir should be created");
    let home_path = home.path().to_string_lossy().to_string();
    let _guard = env_lock::lock_env([
        ("HOME", Some(home_path.as_str())),
        ("XDG_CONFIG_HOME", Some(home_path.as_str())),
        ("PETSTORE_BASE_URL", None),
        ("PETSTORE_TIMEOUT_MS", None),
        ("PETSTORE_WORKERS", None),
        ("PETSTORE_MODE", None),
        ("PETSTORE_FEATURES_DIR", None),
        ("PETSTORE_REPORT_DIR", None),
        ("PETSTORE_TAGS", None),
        ("PETSTORE_EVIDENCE_LOG", None),
    ]);

    let argv = std::iter::once(OsString::from("petstore-harness"))
        .chain(args.iter().map(OsString::from))
        .collect::<Vec<_>>();
    HarnessConfig::load_from_iter(argv).expect("config should load")
}
