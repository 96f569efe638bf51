//! Runner-level errors.

use thiserror::Error;

use crate::petstore::ApiError;

/// Failures that stop a runner rather than a single scenario or case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HarnessError {
    /// Configuration could not be loaded or resolved.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// A feature file is not valid.
    #[error("{path}:{line}: {message}")]
    FeatureParse {
        /// Path of the offending file.
        path: String,
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// A step pattern could not be registered.
    #[error("invalid step pattern `{pattern}`: {message}")]
    InvalidPattern {
        /// The pattern as written.
        pattern: String,
        /// Why it was rejected.
        message: String,
    },

    /// Local I/O failed while discovering features or writing reports.
    #[error("I/O error on {path}: {message}")]
    Io {
        /// File or directory involved.
        path: String,
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// A report could not be serialised or rendered.
    #[error("report error: {message}")]
    Report {
        /// Serialisation or template failure detail.
        message: String,
    },

    /// The HTTP layer could not be set up.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl HarnessError {
    pub(crate) fn io(path: impl AsRef<str>, error: &std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_owned(),
            message: error.to_string(),
        }
    }
}
