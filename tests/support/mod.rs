//! Shared test utilities.

use std::time::Duration;

use camino::Utf8PathBuf;
use petstore_harness::ContextSettings;
use tempfile::TempDir;
use wiremock::MockServer;

pub mod fake_petstore;

/// Per-request timeout used against local servers.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates a temporary directory for report and feature files.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
pub fn create_temp_dir() -> TempDir {
    TempDir::new().unwrap_or_else(|error| panic!("failed to create temporary directory: {error}"))
}

/// UTF-8 path of `dir`.
///
/// # Panics
///
/// Panics if the temporary path is not valid UTF-8.
pub fn utf8_path(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("temporary path is not UTF-8: {}", path.display()))
}

/// Context settings pointing at the `/v2` prefix of `server`.
///
/// # Panics
///
/// Panics if the server URI is not a valid base URL.
pub fn settings_for(server: &MockServer) -> ContextSettings {
    ContextSettings::new(&format!("{}/v2", server.uri()), TEST_TIMEOUT)
        .unwrap_or_else(|error| panic!("mock server URI rejected: {error}"))
}

/// Base URL of a port that nothing listens on.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap_or_else(|error| panic!("failed to bind a local port: {error}"));
    let address = listener
        .local_addr()
        .unwrap_or_else(|error| panic!("failed to read the bound address: {error}"));
    drop(listener);
    format!("http://{address}/v2")
}
