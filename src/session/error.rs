//! Step-level error taxonomy.

use thiserror::Error;

use crate::petstore::ApiError;

/// Why a step, or a spec case, failed.
///
/// Every variant terminates only the scenario or case that raised it; the
/// runner still tears the World down.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    /// A value the step depends on was never set in this scenario.
    #[error("precondition not met: no {missing} recorded in this scenario")]
    Precondition {
        /// Name of the missing piece of state.
        missing: String,
    },

    /// A response was captured but its body is missing or not JSON.
    #[error("response from {url} has no JSON body")]
    NoJsonBody {
        /// URL of the captured response.
        url: String,
    },

    /// The request could not be completed.
    #[error(transparent)]
    Transport(#[from] ApiError),

    /// An expectation did not hold.
    #[error("{subject}: expected {expected}, got {actual}")]
    Assertion {
        /// What was being checked.
        subject: String,
        /// Expected value.
        expected: String,
        /// Observed value.
        actual: String,
    },

    /// A step argument could not be interpreted.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Details about the rejected argument.
        message: String,
    },

    /// The World has no open context.
    #[error("no HTTP context is open; the World has not been started")]
    Inactive,

    /// The World was started twice without finishing.
    #[error("the World is already active")]
    AlreadyActive,
}

impl StepError {
    /// Builds a [`StepError::Precondition`].
    #[must_use]
    pub fn precondition(missing: impl Into<String>) -> Self {
        Self::Precondition {
            missing: missing.into(),
        }
    }

    /// Builds a [`StepError::Assertion`].
    #[must_use]
    pub fn assertion(
        subject: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::Assertion {
            subject: subject.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Builds a [`StepError::InvalidArgument`].
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
