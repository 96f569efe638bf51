//! Request and response evidence attached to reports.
//!
//! Every captured response produces one [`Evidence`] record. Records are
//! handed to an [`EvidenceSink`] as they are produced and also kept by the
//! World so that each runner can embed them in its own report. Sinks are
//! best effort: a failing sink never fails a test.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// One request/response exchange recorded for a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Step text or case name that produced the exchange.
    pub label: String,
    /// HTTP method.
    pub method: String,
    /// Absolute request URL.
    pub url: String,
    /// Response status code.
    pub status: u16,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Raw response body.
    pub body: String,
}

impl Evidence {
    /// Short `METHOD url -> status` summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} {} -> {}", self.method, self.url, self.status)
    }
}

/// Destination for evidence records.
#[cfg_attr(test, mockall::automock)]
pub trait EvidenceSink: Send + Sync {
    /// Records one exchange. Implementations must not panic.
    fn attach(&self, evidence: &Evidence);
}

/// Sink that drops all evidence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvidenceSink;

impl EvidenceSink for NoopEvidenceSink {
    fn attach(&self, _evidence: &Evidence) {}
}

/// Appends evidence to a file as JSON lines.
#[derive(Debug)]
pub struct JsonlEvidenceSink {
    file: Mutex<File>,
}

impl JsonlEvidenceSink {
    /// Opens `path` for appending, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] when the file cannot be opened.
    pub fn open(path: &Utf8Path) -> Result<Self, HarnessError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|error| HarnessError::io(parent, &error))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|error| HarnessError::io(path, &error))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EvidenceSink for JsonlEvidenceSink {
    fn attach(&self, evidence: &Evidence) {
        let Ok(serialised) = serde_json::to_string(evidence) else {
            return;
        };
        let Ok(mut file) = self.file.lock() else {
            return;
        };
        if let Err(error) = writeln!(file, "{serialised}") {
            tracing::warn!(%error, "failed to append evidence");
        }
    }
}
