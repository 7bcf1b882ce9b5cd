//! Suite configuration.
//!
//! One [`SuiteConfig`] is built at start-up (defaults, then an optional YAML
//! file, then environment and command-line overrides), validated once, and
//! shared read-only by every worker.

use crate::browser::BrowserKind;
use crate::result::{E2eError, E2eResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default WebDriver endpoint
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Prefix of the environment variables that override file settings
pub const ENV_PREFIX: &str = "MUSICLMS_";

/// How browser sessions map onto tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPolicy {
    /// One session per test class, state reset before every test
    #[default]
    PerClass,
    /// Fresh session for every test iteration
    PerTest,
}

impl SessionPolicy {
    /// Name as written in configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerClass => "per-class",
            Self::PerTest => "per-test",
        }
    }
}

impl fmt::Display for SessionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionPolicy {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-class" | "class" => Ok(Self::PerClass),
            "per-test" | "test" => Ok(Self::PerTest),
            other => Err(E2eError::configuration(format!(
                "Unknown session policy: {other} (expected per-class or per-test)"
            ))),
        }
    }
}

/// Settings for one suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuiteConfig {
    /// Base URL of the application under test
    pub app_url: String,
    /// Run the browser without a window
    pub headless: bool,
    /// Account used by login scenarios
    pub test_email: String,
    /// Password of `test_email`
    pub test_password: String,
    /// Browser name (chrome, firefox, edge)
    pub browser: String,
    /// WebDriver endpoint
    pub webdriver_url: String,
    /// Explicit wait budget in milliseconds
    pub wait_timeout_ms: u64,
    /// Poll interval of explicit waits in milliseconds
    pub poll_interval_ms: u64,
    /// Where HTML/JSON/XML reports go
    pub reports_dir: PathBuf,
    /// Where failure screenshots go
    pub screenshots_dir: PathBuf,
    /// Directory holding the tabular data files
    pub data_dir: PathBuf,
    /// Number of test classes run concurrently
    pub parallel: usize,
    /// Session reuse policy
    pub session_policy: SessionPolicy,
    /// Environment label shown in the report
    pub environment: String,
    /// Valid student invite token; invite registration tests skip without it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_token: Option<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            app_url: String::new(),
            headless: false,
            test_email: "teacher@musiclms.test".to_string(),
            test_password: "SecurePass123!".to_string(),
            browser: "chrome".to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            reports_dir: PathBuf::from("reports"),
            screenshots_dir: PathBuf::from("screenshots"),
            data_dir: PathBuf::from("testdata"),
            parallel: 1,
            session_policy: SessionPolicy::PerClass,
            environment: "QA".to_string(),
            invite_token: None,
        }
    }
}

impl SuiteConfig {
    /// Configuration pointing at `app_url`, everything else default
    #[must_use]
    pub fn new(app_url: impl Into<String>) -> Self {
        Self {
            app_url: app_url.into(),
            ..Self::default()
        }
    }

    /// Parse YAML; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> E2eResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Read and parse a YAML file
    pub fn load(path: &Path) -> E2eResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            E2eError::configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Serialize as YAML
    pub fn to_yaml(&self) -> E2eResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply `MUSICLMS_*` overrides obtained through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> E2eResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(&format!("{ENV_PREFIX}{key}"));

        if let Some(url) = var("APP_URL") {
            self.app_url = url;
        }
        if let Some(browser) = var("BROWSER") {
            self.browser = browser;
        }
        if let Some(headless) = var("HEADLESS") {
            self.headless = parse_flag("MUSICLMS_HEADLESS", &headless)?;
        }
        if let Some(email) = var("TEST_EMAIL") {
            self.test_email = email;
        }
        if let Some(password) = var("TEST_PASSWORD") {
            self.test_password = password;
        }
        if let Some(url) = var("WEBDRIVER_URL") {
            self.webdriver_url = url;
        }
        if let Some(token) = var("INVITE_TOKEN") {
            self.invite_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(environment) = var("ENVIRONMENT") {
            self.environment = environment;
        }
        Ok(())
    }

    /// Check every setting; runs before any browser is launched
    pub fn validate(&self) -> E2eResult<()> {
        let url = self.app_url.trim();
        if url.is_empty() {
            return Err(E2eError::configuration("appUrl is required"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(E2eError::configuration(format!(
                "appUrl must start with http:// or https://, got {url}"
            )));
        }
        self.browser_kind()?;
        if self.test_email.trim().is_empty() || self.test_password.is_empty() {
            return Err(E2eError::configuration(
                "testEmail and testPassword must not be empty",
            ));
        }
        if self.wait_timeout_ms == 0 {
            return Err(E2eError::configuration("waitTimeoutMs must be positive"));
        }
        if self.poll_interval_ms == 0 || self.poll_interval_ms > self.wait_timeout_ms {
            return Err(E2eError::configuration(format!(
                "pollIntervalMs must be between 1 and waitTimeoutMs ({})",
                self.wait_timeout_ms
            )));
        }
        if self.parallel == 0 {
            return Err(E2eError::configuration("parallel must be at least 1"));
        }
        Ok(())
    }

    /// Parsed browser name
    pub fn browser_kind(&self) -> E2eResult<BrowserKind> {
        self.browser.parse()
    }

    /// Wait budget for interactions
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.wait_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Set the browser name
    #[must_use]
    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = browser.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the wait budget
    #[must_use]
    pub const fn with_wait(mut self, timeout_ms: u64, poll_interval_ms: u64) -> Self {
        self.wait_timeout_ms = timeout_ms;
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the number of concurrent classes
    #[must_use]
    pub const fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the session policy
    #[must_use]
    pub const fn with_session_policy(mut self, policy: SessionPolicy) -> Self {
        self.session_policy = policy;
        self
    }

    /// Set the report directory
    #[must_use]
    pub fn with_reports_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reports_dir = dir.into();
        self
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_screenshots_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshots_dir = dir.into();
        self
    }

    /// Set the data directory
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the invite token
    #[must_use]
    pub fn with_invite_token(mut self, token: impl Into<String>) -> Self {
        self.invite_token = Some(token.into());
        self
    }
}

fn parse_flag(key: &str, value: &str) -> E2eResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(E2eError::configuration(format!(
            "{key} must be a boolean, got {other}"
        ))),
    }
}
