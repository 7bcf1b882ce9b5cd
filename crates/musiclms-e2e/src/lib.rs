//! MusicLMS E2E: page-object browser tests for the MusicLMS web application
//!
//! Drives a real browser through a WebDriver server, runs the authentication,
//! invite and assignment test classes against a deployed instance, and writes
//! an HTML, JSON and JUnit report with screenshots of every failure.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐   ┌────────────┐
//! │ SuiteRunner  │──►│ TestContext │──►│ Page objects │──►│ Interactor │
//! │ (one worker  │   │ (session +  │   │ (Login, ...) │   │ + Waiter   │
//! │  per class)  │   │  data row)  │   └──────────────┘   └─────┬──────┘
//! └──────┬───────┘   └─────────────┘                            │
//!        │ WorkerReport                                  ┌──────▼──────┐
//!        ▼                                               │ dyn Driver  │
//! ┌──────────────┐                                       │ (WebDriver  │
//! │ ReportSink   │── HTML / JSON / JUnit                 │  or Mock)   │
//! └──────────────┘                                       └─────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use musiclms_e2e::{default_launcher, suites, SuiteConfig, SuiteRunner};
//!
//! # async fn run() -> musiclms_e2e::E2eResult<()> {
//! let config = SuiteConfig::new("https://qa.musiclms.example").with_headless(true);
//! let runner = SuiteRunner::new(config, default_launcher())?;
//! let outcome = runner.run(&suites::catalog()).await?;
//! println!("{} passed, {} failed", outcome.counts.passed, outcome.counts.failed);
//! # Ok(())
//! # }
//! ```

mod assertion;
pub mod browser;
mod case;
pub mod config;
pub mod data;
pub mod driver;
mod interact;
mod locator;
pub mod pages;
pub mod report;
mod result;
pub mod runner;
pub mod suites;
pub mod unique;
pub mod wait;

pub use assertion::{Assertion, AssertionResult};
pub use browser::{default_launcher, BrowserKind, Launcher, UnavailableLauncher};
#[cfg(feature = "webdriver")]
pub use browser::WebDriverLauncher;
pub use case::{
    Selection, TestCase, TestClass, TestContext, TestFn, TestFuture, SETTLE_WINDOW_MS,
};
pub use config::{SessionPolicy, SuiteConfig};
pub use data::{DataSource, DataValue, TestDataRow};
pub use driver::{Driver, DriverError, ElementState, SharedDriver};
pub use interact::Interactor;
pub use locator::{xpath_literal, Locator, Strategy};
pub use pages::{
    AssignmentsPage, DashboardPage, DashboardSection, InvitePage, LoginPage, PageInfo, PageObject,
    SignupPage,
};
pub use report::{
    Counts, ReportFiles, ReportSink, TestRecord, TestStatus, WorkerId, WorkerReport,
};
pub use result::{E2eError, E2eResult};
pub use runner::{ProgressHook, SuiteOutcome, SuiteRunner};
pub use wait::{WaitOptions, Waiter};

/// Everything a test body usually needs
pub mod prelude {
    pub use super::assertion::*;
    pub use super::case::{TestCase, TestClass, TestContext, TestFuture};
    pub use super::pages::*;
    pub use super::result::{E2eError, E2eResult};
    pub use super::unique::*;
}
