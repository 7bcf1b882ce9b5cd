//! Assertions for test bodies.
//!
//! Every helper returns an [`AssertionResult`]; `.check()?` turns a failing
//! one into `E2eError::Assertion` and ends the iteration.

use crate::result::{E2eError, E2eResult};
use std::fmt::Debug;

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// `Ok(())` when passed, `E2eError::Assertion` otherwise
    ///
    /// # Errors
    ///
    /// Returns the failure message as an assertion error
    pub fn check(self) -> E2eResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(E2eError::assertion(self.message))
        }
    }
}

/// Assertion helpers for test bodies
#[derive(Debug)]
pub struct Assertion;

impl Assertion {
    /// Assert two values are equal
    #[must_use]
    pub fn equals<T: PartialEq + Debug>(expected: &T, actual: &T, message: &str) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("{message}: expected {expected:?}, got {actual:?}"))
        }
    }

    /// Assert a string contains a substring
    #[must_use]
    pub fn contains(haystack: &str, needle: &str) -> AssertionResult {
        if haystack.contains(needle) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected '{haystack}' to contain '{needle}'"))
        }
    }

    /// Assert a string does not contain a substring
    #[must_use]
    pub fn not_contains(haystack: &str, needle: &str) -> AssertionResult {
        if haystack.contains(needle) {
            AssertionResult::fail(format!("expected '{haystack}' not to contain '{needle}'"))
        } else {
            AssertionResult::pass()
        }
    }

    /// Assert a condition is true
    #[must_use]
    pub fn is_true(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(message)
        }
    }

    /// Assert a condition is false
    #[must_use]
    pub fn is_false(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::fail(message)
        } else {
            AssertionResult::pass()
        }
    }

    /// Assert a string is non-empty after trimming
    #[must_use]
    pub fn not_blank(value: &str, message: &str) -> AssertionResult {
        Self::is_false(value.trim().is_empty(), message)
    }
}
