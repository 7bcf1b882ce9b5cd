//! Browser driver boundary.
//!
//! Everything above this module talks to a browser through [`Driver`] only.
//! Implementations:
//!
//! - [`MockDriver`] - scripted in-memory DOM for unit tests
//! - `WebDriverSession` - real browser over WebDriver (feature `webdriver`)

use crate::locator::Locator;
use crate::result::E2eError;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

mod mock;
#[cfg(feature = "webdriver")]
mod webdriver;

pub use mock::{MockDriver, MockElement, Reaction, PNG_SIGNATURE};
#[cfg(feature = "webdriver")]
pub use webdriver::WebDriverSession;

/// Result type for raw driver calls
pub type DriverResult<T> = Result<T, DriverError>;

/// Low-level failures reported by a driver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// Locator matched nothing in the current DOM
    #[error("no such element: {0}")]
    NoSuchElement(String),

    /// Element was detached from the DOM between lookup and use
    #[error("stale element reference: {0}")]
    StaleElement(String),

    /// Element exists but cannot receive the action
    #[error("element not interactable: {0}")]
    NotInteractable(String),

    /// Session-level failure (connection lost, script error, ...)
    #[error("{0}")]
    Session(String),
}

impl DriverError {
    /// Whether the failure means "not there (yet)" rather than a broken session
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::NoSuchElement(_) | Self::StaleElement(_))
    }
}

impl From<DriverError> for E2eError {
    fn from(err: DriverError) -> Self {
        Self::driver(err.to_string())
    }
}

/// Snapshot of the readiness of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementState {
    /// Rendered and visible
    pub displayed: bool,
    /// Accepts input
    pub enabled: bool,
}

impl ElementState {
    /// Visible and enabled
    #[must_use]
    pub const fn is_clickable(self) -> bool {
        self.displayed && self.enabled
    }
}

/// Operations the suite needs from a browser session.
///
/// Element methods take a [`Locator`] and resolve it on every call.
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Navigate to an absolute URL
    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// URL of the current page
    async fn current_url(&self) -> DriverResult<String>;

    /// Document title
    async fn title(&self) -> DriverResult<String>;

    /// Look up an element and report whether it is displayed and enabled
    async fn inspect(&self, locator: &Locator) -> DriverResult<ElementState>;

    /// Click an element
    async fn click(&self, locator: &Locator) -> DriverResult<()>;

    /// Clear an input's value
    async fn clear(&self, locator: &Locator) -> DriverResult<()>;

    /// Type into an element
    async fn send_keys(&self, locator: &Locator, text: &str) -> DriverResult<()>;

    /// Read an attribute or DOM property
    async fn attribute(&self, locator: &Locator, name: &str) -> DriverResult<Option<String>>;

    /// Visible text of an element
    async fn text(&self, locator: &Locator) -> DriverResult<String>;

    /// Run a script; `target` is passed as `arguments[0]` when given
    async fn execute_script(
        &self,
        script: &str,
        target: Option<&Locator>,
    ) -> DriverResult<serde_json::Value>;

    /// Capture the viewport as PNG bytes
    async fn screenshot_png(&self) -> DriverResult<Vec<u8>>;

    /// Drop every cookie of the session
    async fn delete_all_cookies(&self) -> DriverResult<()>;

    /// Maximize the browser window
    async fn maximize_window(&self) -> DriverResult<()>;

    /// End the session and close the browser
    async fn quit(&self) -> DriverResult<()>;
}

/// Shared handle to a session
pub type SharedDriver = Arc<dyn Driver>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(DriverError::NoSuchElement("id=x".into()).is_transient());
        assert!(DriverError::StaleElement("id=x".into()).is_transient());
        assert!(!DriverError::NotInteractable("id=x".into()).is_transient());
        assert!(!DriverError::Session("gone".into()).is_transient());
    }

    #[test]
    fn test_clickable_requires_both() {
        let visible_only = ElementState {
            displayed: true,
            enabled: false,
        };
        assert!(!visible_only.is_clickable());
        let ready = ElementState {
            displayed: true,
            enabled: true,
        };
        assert!(ready.is_clickable());
    }

    #[test]
    fn test_driver_error_into_e2e() {
        let err: E2eError = DriverError::Session("connection refused".into()).into();
        assert!(matches!(err, E2eError::Driver { .. }));
        assert!(err.to_string().contains("connection refused"));
    }
}
