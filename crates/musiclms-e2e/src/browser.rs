//! Browser selection and session lifecycle.
//!
//! A [`Launcher`] turns a validated [`SuiteConfig`] into a live session.
//! With the `webdriver` feature, [`WebDriverLauncher`] starts Chrome, Firefox
//! or Edge through a WebDriver endpoint. Without it, only injected launchers
//! (tests, custom drivers) are available.

use crate::config::SuiteConfig;
use crate::driver::SharedDriver;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Script that wipes web storage of the current origin
pub const CLEAR_STORAGE_SCRIPT: &str =
    "window.localStorage.clear(); window.sessionStorage.clear(); return true;";

/// Supported browsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserKind {
    /// Google Chrome / Chromium
    Chrome,
    /// Mozilla Firefox
    Firefox,
    /// Microsoft Edge
    Edge,
}

impl BrowserKind {
    /// Every supported browser
    pub const ALL: [Self; 3] = [Self::Chrome, Self::Firefox, Self::Edge];

    /// Lower-case name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
        }
    }

    /// Command-line arguments passed to the browser binary
    #[must_use]
    pub fn launch_args(self, headless: bool) -> Vec<&'static str> {
        let mut args = Vec::new();
        match self {
            Self::Chrome => {
                if headless {
                    args.push("--headless=new");
                }
                args.push("--no-sandbox");
                args.push("--disable-dev-shm-usage");
            }
            Self::Firefox | Self::Edge => {
                if headless {
                    args.push("--headless");
                }
            }
        }
        args
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrowserKind {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            "edge" => Ok(Self::Edge),
            _ => Err(E2eError::configuration(format!("Browser not supported: {s}"))),
        }
    }
}

/// Starts browser sessions
#[async_trait]
pub trait Launcher: Send + Sync + fmt::Debug {
    /// Launch a session for `config`.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Configuration` for an unsupported browser or an
    /// unreachable endpoint.
    async fn launch(&self, config: &SuiteConfig) -> E2eResult<SharedDriver>;
}

/// Launcher returned when no real backend is compiled in
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLauncher;

#[async_trait]
impl Launcher for UnavailableLauncher {
    async fn launch(&self, config: &SuiteConfig) -> E2eResult<SharedDriver> {
        Err(E2eError::configuration(format!(
            "cannot launch {}: built without the `webdriver` feature",
            config.browser
        )))
    }
}

/// The launcher for this build
#[must_use]
pub fn default_launcher() -> Arc<dyn Launcher> {
    #[cfg(feature = "webdriver")]
    {
        Arc::new(WebDriverLauncher)
    }
    #[cfg(not(feature = "webdriver"))]
    {
        Arc::new(UnavailableLauncher)
    }
}

/// First-use setup of a new session: clean cookies, maximize the window
pub async fn prepare_session(driver: &SharedDriver) -> E2eResult<()> {
    driver.delete_all_cookies().await?;
    if let Err(err) = driver.maximize_window().await {
        debug!(error = %err, "window could not be maximized");
    }
    Ok(())
}

/// Return a reused session to a logged-out state and load the application.
///
/// Web storage is per origin, so the application is loaded before it is
/// cleared and loaded again afterwards.
pub async fn reset_session(driver: &SharedDriver, app_url: &str) -> E2eResult<()> {
    driver.navigate(app_url).await?;
    if let Err(err) = driver.execute_script(CLEAR_STORAGE_SCRIPT, None).await {
        warn!(error = %err, "web storage could not be cleared");
    }
    driver.delete_all_cookies().await?;
    driver.navigate(app_url).await?;
    Ok(())
}

/// End a session, logging instead of failing
pub async fn release_session(driver: SharedDriver) {
    match driver.quit().await {
        Ok(()) => debug!("session closed"),
        Err(err) => warn!(error = %err, "session did not close cleanly"),
    }
}

// ============================================================================
// WebDriver launcher (when `webdriver` feature is enabled)
// ============================================================================

#[cfg(feature = "webdriver")]
pub use remote::WebDriverLauncher;

#[cfg(feature = "webdriver")]
mod remote {
    use super::{info, BrowserKind, E2eError, E2eResult, Launcher, SharedDriver, SuiteConfig};
    use crate::driver::WebDriverSession;
    use async_trait::async_trait;
    use std::sync::Arc;
    use thirtyfour::prelude::*;
    use thirtyfour::ChromiumLikeCapabilities;

    /// Launches sessions on a WebDriver endpoint (chromedriver, geckodriver,
    /// msedgedriver or a Selenium grid)
    #[derive(Debug, Clone, Copy, Default)]
    pub struct WebDriverLauncher;

    fn launch_error(kind: BrowserKind, err: &WebDriverError) -> E2eError {
        E2eError::configuration(format!("failed to start {kind}: {err}"))
    }

    #[async_trait]
    impl Launcher for WebDriverLauncher {
        async fn launch(&self, config: &SuiteConfig) -> E2eResult<SharedDriver> {
            let kind = config.browser_kind()?;
            let args = kind.launch_args(config.headless);
            let url = config.webdriver_url.as_str();
            info!(browser = %kind, headless = config.headless, endpoint = url, "launching browser");

            let driver = match kind {
                BrowserKind::Chrome => {
                    let mut caps = DesiredCapabilities::chrome();
                    for arg in &args {
                        caps.add_arg(arg).map_err(|e| launch_error(kind, &e))?;
                    }
                    WebDriver::new(url, caps).await
                }
                BrowserKind::Edge => {
                    let mut caps = DesiredCapabilities::edge();
                    for arg in &args {
                        caps.add_arg(arg).map_err(|e| launch_error(kind, &e))?;
                    }
                    WebDriver::new(url, caps).await
                }
                BrowserKind::Firefox => {
                    let mut caps = DesiredCapabilities::firefox();
                    if config.headless {
                        caps.set_headless().map_err(|e| launch_error(kind, &e))?;
                    }
                    WebDriver::new(url, caps).await
                }
            }
            .map_err(|e| launch_error(kind, &e))?;

            Ok(Arc::new(WebDriverSession::new(driver)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{Driver, MockDriver};

    mod kind_tests {
        use super::*;

        #[test]
        fn test_parse_case_insensitive() {
            assert_eq!("Chrome".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
            assert_eq!(" FIREFOX ".parse::<BrowserKind>().unwrap(), BrowserKind::Firefox);
            assert_eq!("edge".parse::<BrowserKind>().unwrap(), BrowserKind::Edge);
        }

        #[test]
        fn test_every_name_parses_or_is_configuration_error() {
            for name in ["chrome", "firefox", "edge", "safari", "opera", ""] {
                match name.parse::<BrowserKind>() {
                    Ok(kind) => assert_eq!(kind.name(), name),
                    Err(err) => {
                        assert!(err.is_fatal());
                        assert_eq!(
                            err.to_string(),
                            format!("Configuration error: Browser not supported: {name}")
                        );
                    }
                }
            }
        }

        #[test]
        fn test_chrome_headless_args() {
            let args = BrowserKind::Chrome.launch_args(true);
            assert_eq!(
                args,
                vec!["--headless=new", "--no-sandbox", "--disable-dev-shm-usage"]
            );
            assert!(!BrowserKind::Chrome.launch_args(false).contains(&"--headless=new"));
        }

        #[test]
        fn test_firefox_edge_headless_args() {
            assert_eq!(BrowserKind::Firefox.launch_args(true), vec!["--headless"]);
            assert_eq!(BrowserKind::Edge.launch_args(true), vec!["--headless"]);
            assert!(BrowserKind::Edge.launch_args(false).is_empty());
        }
    }

    mod session_tests {
        use super::*;

        #[tokio::test]
        async fn test_prepare_deletes_cookies_and_maximizes() {
            let mock = Arc::new(MockDriver::new());
            let driver: SharedDriver = mock.clone();
            prepare_session(&driver).await.unwrap();
            assert_eq!(mock.history(), vec!["delete_all_cookies", "maximize_window"]);
        }

        #[tokio::test]
        async fn test_reset_clears_state_and_reloads() {
            let mock = Arc::new(MockDriver::new());
            let driver: SharedDriver = mock.clone();
            reset_session(&driver, "http://app/").await.unwrap();
            assert_eq!(mock.call_count("navigate:http://app/"), 2);
            assert!(mock.was_called("script:"));
            assert!(mock.was_called("delete_all_cookies"));
            assert_eq!(driver.current_url().await.unwrap(), "http://app/");
        }

        #[tokio::test]
        async fn test_release_quits() {
            let mock = Arc::new(MockDriver::new());
            release_session(mock.clone()).await;
            assert!(mock.was_called("quit"));
        }

        #[tokio::test]
        async fn test_unavailable_launcher_is_configuration_error() {
            let err = UnavailableLauncher
                .launch(&SuiteConfig::new("http://app"))
                .await
                .unwrap_err();
            assert!(err.is_fatal());
        }
    }
}
