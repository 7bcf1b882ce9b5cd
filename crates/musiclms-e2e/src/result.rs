//! Result and error types for the MusicLMS suite.

use std::time::Duration;
use thiserror::Error;

/// Result type for suite operations
pub type E2eResult<T> = Result<T, E2eError>;

/// Errors that can occur while driving the application under test
#[derive(Debug, Error)]
pub enum E2eError {
    /// A wait condition never became true
    #[error("Timed out after {elapsed_ms}ms waiting for {condition}")]
    Timeout {
        /// Name of the predicate that was polled
        condition: String,
        /// Time spent polling
        elapsed_ms: u64,
    },

    /// An element vanished or became unclickable mid-action
    #[error("Could not {action} {target}: {message}")]
    Interaction {
        /// Action being attempted (click, type, select)
        action: &'static str,
        /// Element description
        target: String,
        /// Error message
        message: String,
    },

    /// Required setting missing or unsupported option given
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Backing data file unreadable or malformed
    #[error("Data source '{set}' failed: {message}")]
    DataSource {
        /// Name of the parameter set
        set: String,
        /// Error message
        message: String,
    },

    /// Browser driver failure outside of element interaction
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Caller passed a value the suite does not know
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Test assertion failed
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// Screenshot capture failed
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Test body opted out at runtime
    #[error("Skipped: {reason}")]
    Skipped {
        /// Why the test did not run
        reason: String,
    },

    /// Report lifecycle or rendering failure
    #[error("Report error: {message}")]
    Report {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl E2eError {
    /// Create a timeout error
    #[must_use]
    pub fn timeout(condition: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            condition: condition.into(),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// Create an interaction error
    #[must_use]
    pub fn interaction(
        action: &'static str,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Interaction {
            action,
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data source error
    #[must_use]
    pub fn data_source(set: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            set: set.into(),
            message: message.into(),
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an assertion error
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Create a report error
    #[must_use]
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    /// Create a skip marker
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Whether this error must abort the whole run before any test executes
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
