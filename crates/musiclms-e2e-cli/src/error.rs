//! CLI errors; `main` prints them as `Error: ...` and exits non-zero

use musiclms_e2e::E2eError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Flag or file combination the suite cannot run with
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// The run completed but at least one iteration failed
    #[error("{failed} test(s) failed")]
    TestsFailed {
        /// Failed iterations
        failed: usize,
    },

    /// Runtime or terminal I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything the suite library reports, shown unchanged
    #[error(transparent)]
    Suite(#[from] E2eError),

    /// Listing could not be encoded
    #[error("cannot encode listing: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the run itself worked and only tests failed
    #[must_use]
    pub const fn is_test_failure(&self) -> bool {
        matches!(self, Self::TestsFailed { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tests_failed() {
        let err = CliError::TestsFailed { failed: 3 };
        assert_eq!(err.to_string(), "3 test(s) failed");
        assert!(err.is_test_failure());
        assert!(!CliError::config("x").is_test_failure());
    }

    #[test]
    fn test_suite_error_is_transparent() {
        let err: CliError = E2eError::configuration("Browser not supported: safari").into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Browser not supported: safari"
        );
    }

    #[test]
    fn test_missing_runtime_io() {
        let err: CliError =
            std::io::Error::new(std::io::ErrorKind::Other, "no threads left").into();
        assert_eq!(err.to_string(), "I/O error: no threads left");
    }
}
