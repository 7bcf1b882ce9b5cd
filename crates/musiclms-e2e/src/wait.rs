//! Explicit waits.
//!
//! Every wait polls a predicate at a fixed interval until it holds or the
//! timeout elapses. A missing or stale element counts as "not yet"; any other
//! driver failure ends the wait immediately.

use crate::driver::{DriverResult, SharedDriver};
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (15 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 15_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Outcome of a successful wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult {
    /// Time spent polling
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

// =============================================================================
// WAITER
// =============================================================================

/// Polls the live page through a shared session
#[derive(Debug, Clone)]
pub struct Waiter {
    driver: SharedDriver,
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter over `driver`
    #[must_use]
    pub const fn new(driver: SharedDriver, options: WaitOptions) -> Self {
        Self { driver, options }
    }

    /// Options in effect
    #[must_use]
    pub const fn options(&self) -> WaitOptions {
        self.options
    }

    /// Same session, different budget
    #[must_use]
    pub fn with_options(&self, options: WaitOptions) -> Self {
        Self {
            driver: self.driver.clone(),
            options,
        }
    }

    /// Wait until the element is displayed
    pub async fn until_visible(&self, locator: &Locator) -> E2eResult<WaitResult> {
        let driver = &self.driver;
        self.until(&format!("visibility of {locator}"), move || async move {
            driver.inspect(locator).await.map(|s| s.displayed)
        })
        .await
    }

    /// Wait until the element is displayed and enabled
    pub async fn until_clickable(&self, locator: &Locator) -> E2eResult<WaitResult> {
        let driver = &self.driver;
        self.until(&format!("clickability of {locator}"), move || async move {
            driver.inspect(locator).await.map(|s| s.is_clickable())
        })
        .await
    }

    /// Wait until the current URL contains `fragment`
    pub async fn until_url_contains(&self, fragment: &str) -> E2eResult<WaitResult> {
        let driver = &self.driver;
        self.until(&format!("URL containing '{fragment}'"), move || async move {
            driver.current_url().await.map(|url| url.contains(fragment))
        })
        .await
    }

    /// Poll `check` until it returns `Ok(true)` or the timeout elapses
    pub async fn until<F, Fut>(&self, description: &str, mut check: F) -> E2eResult<WaitResult>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DriverResult<bool>>,
    {
        let start = Instant::now();
        let timeout = self.options.timeout();
        let poll_interval = self.options.poll_interval();

        loop {
            match check().await {
                Ok(true) => {
                    tracing::debug!(condition = description, elapsed = ?start.elapsed(), "wait satisfied");
                    return Ok(WaitResult {
                        elapsed: start.elapsed(),
                        waited_for: description.to_string(),
                    });
                }
                Ok(false) => {}
                Err(err) if err.is_transient() => {}
                Err(err) => return Err(E2eError::from(err)),
            }
            if start.elapsed() >= timeout {
                break;
            }
            tokio::time::sleep(poll_interval).await;
        }

        Err(E2eError::timeout(description, start.elapsed()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{Driver, MockDriver, MockElement};
    use std::sync::Arc;

    const FIELD: Locator = Locator::id("field");

    fn waiter(mock: MockDriver, timeout_ms: u64) -> (Arc<MockDriver>, Waiter) {
        let mock = Arc::new(mock);
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_poll_interval(100);
        (mock.clone(), Waiter::new(mock, options))
    }

    mod options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout(), Duration::from_secs(15));
            assert_eq!(opts.poll_interval(), Duration::from_millis(500));
        }

        #[test]
        fn test_builders() {
            let opts = WaitOptions::new().with_timeout(1_000).with_poll_interval(10);
            assert_eq!(opts.timeout_ms, 1_000);
            assert_eq!(opts.poll_interval_ms, 10);
        }
    }

    mod visibility_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_visible_after_render_delay() {
            let (mock, waiter) = waiter(
                MockDriver::new().with_page(
                    "/",
                    "",
                    [(FIELD, MockElement::visible().appearing_after(3))],
                ),
                5_000,
            );
            mock.navigate("http://app/").await.unwrap();
            let result = waiter.until_visible(&FIELD).await.unwrap();
            assert!(result.waited_for.contains("id=field"));
            assert!(result.elapsed >= Duration::from_millis(300));
        }

        #[tokio::test(start_paused = true)]
        async fn test_hidden_element_times_out() {
            let (mock, waiter) = waiter(
                MockDriver::new().with_page("/", "", [(FIELD, MockElement::hidden())]),
                1_000,
            );
            mock.navigate("http://app/").await.unwrap();
            let err = waiter.until_visible(&FIELD).await.unwrap_err();
            match err {
                E2eError::Timeout {
                    condition,
                    elapsed_ms,
                } => {
                    assert_eq!(condition, "visibility of id=field");
                    assert!(elapsed_ms >= 1_000);
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }
    }

    mod clickable_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_disabled_is_not_clickable() {
            let (mock, waiter) = waiter(
                MockDriver::new().with_page(
                    "/",
                    "",
                    [(FIELD, MockElement::visible().disabled())],
                ),
                500,
            );
            mock.navigate("http://app/").await.unwrap();
            assert!(waiter.until_visible(&FIELD).await.is_ok());
            assert!(matches!(
                waiter.until_clickable(&FIELD).await,
                Err(E2eError::Timeout { .. })
            ));
        }
    }

    mod url_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_url_contains() {
            let (mock, waiter) = waiter(MockDriver::new(), 500);
            mock.navigate("http://app/dashboard").await.unwrap();
            assert!(waiter.until_url_contains("/dashboard").await.is_ok());
            assert!(waiter.until_url_contains("/login").await.is_err());
        }
    }

    mod custom_condition_tests {
        use super::*;
        use crate::driver::DriverError;

        #[tokio::test(start_paused = true)]
        async fn test_session_error_is_not_retried() {
            let (_mock, waiter) = waiter(MockDriver::new(), 5_000);
            let mut calls = 0;
            let result = waiter
                .until("broken session", || {
                    calls += 1;
                    async { Err(DriverError::Session("gone".into())) }
                })
                .await;
            assert!(matches!(result, Err(E2eError::Driver { .. })));
            assert_eq!(calls, 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_zero_timeout_checks_once() {
            let (_mock, waiter) = waiter(MockDriver::new(), 0);
            let result = waiter.until("always", || async { Ok(true) }).await;
            assert!(result.is_ok());
        }
    }
}
