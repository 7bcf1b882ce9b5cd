//! Test cases, test classes and the context a test body runs in.

use crate::config::SuiteConfig;
use crate::data::TestDataRow;
use crate::interact::Interactor;
use crate::pages::{AssignmentsPage, DashboardPage, InvitePage, LoginPage, SignupPage};
use crate::report::TestMeta;
use crate::result::E2eResult;
use crate::wait::WaitOptions;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Upper bound on how long a "nothing should happen" check watches the page
pub const SETTLE_WINDOW_MS: u64 = 3_000;

/// Future returned by a test body
pub type TestFuture = BoxFuture<'static, E2eResult<()>>;

/// A test body
pub type TestFn = fn(TestContext) -> TestFuture;

// =============================================================================
// CONTEXT
// =============================================================================

/// Everything a test body gets: configuration, the session toolkit and its
/// data row.
///
/// Page objects are created fresh from the context for every iteration.
#[derive(Debug, Clone)]
pub struct TestContext {
    config: Arc<SuiteConfig>,
    ui: Interactor,
    row: TestDataRow,
    name: String,
}

impl TestContext {
    /// Bind a context to a session
    #[must_use]
    pub fn new(
        config: Arc<SuiteConfig>,
        ui: Interactor,
        row: TestDataRow,
        name: impl Into<String>,
    ) -> Self {
        Self {
            config,
            ui,
            row,
            name: name.into(),
        }
    }

    /// Suite configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Interaction toolkit of the session
    #[must_use]
    pub const fn ui(&self) -> &Interactor {
        &self.ui
    }

    /// Data row of this iteration; empty for plain tests
    #[must_use]
    pub const fn row(&self) -> &TestDataRow {
        &self.row
    }

    /// Display name of this iteration
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Application base URL
    #[must_use]
    pub fn app_url(&self) -> &str {
        &self.config.app_url
    }

    #[must_use]
    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(self.ui.clone(), self.app_url())
    }

    #[must_use]
    pub fn signup_page(&self) -> SignupPage {
        SignupPage::new(self.ui.clone(), self.app_url())
    }

    #[must_use]
    pub fn dashboard_page(&self) -> DashboardPage {
        DashboardPage::new(self.ui.clone(), self.app_url())
    }

    #[must_use]
    pub fn invite_page(&self) -> InvitePage {
        InvitePage::new(self.ui.clone(), self.app_url())
    }

    #[must_use]
    pub fn assignments_page(&self) -> AssignmentsPage {
        AssignmentsPage::new(self.ui.clone(), self.app_url())
    }

    /// Watch the page for the settle window; `true` if the URL still
    /// contains `fragment` afterwards
    pub async fn stays_on(&self, fragment: &str) -> bool {
        let driver = self.ui.driver();
        let left = self
            .ui
            .waiter()
            .with_options(self.settle_options())
            .until(&format!("navigation away from '{fragment}'"), move || async move {
                driver.current_url().await.map(|url| !url.contains(fragment))
            })
            .await
            .is_ok();
        !left && self.ui.current_url().await.contains(fragment)
    }

    /// Whether the URL comes to contain `fragment` within the settle window
    pub async fn reaches_quickly(&self, fragment: &str) -> bool {
        self.ui
            .waiter()
            .with_options(self.settle_options())
            .until_url_contains(fragment)
            .await
            .is_ok()
    }

    fn settle_options(&self) -> WaitOptions {
        let timeout = SETTLE_WINDOW_MS.min(self.config.wait_timeout_ms);
        WaitOptions::new()
            .with_timeout(timeout)
            .with_poll_interval(self.config.poll_interval_ms.min(timeout).max(1))
    }
}

// =============================================================================
// CASES AND CLASSES
// =============================================================================

/// One test: metadata plus body
#[derive(Debug, Clone, Copy)]
pub struct TestCase {
    /// Stable identifier (`TC_Auth_001`)
    pub id: &'static str,
    /// Method-style name
    pub name: &'static str,
    pub description: &'static str,
    pub groups: &'static [&'static str],
    /// Lower runs first within a class
    pub priority: i32,
    /// Named parameter set; one iteration per row
    pub data_set: Option<&'static str>,
    pub run: TestFn,
}

impl TestCase {
    /// Case with no description, groups or data
    #[must_use]
    pub const fn new(id: &'static str, name: &'static str, run: TestFn) -> Self {
        Self {
            id,
            name,
            description: "",
            groups: &[],
            priority: 0,
            data_set: None,
            run,
        }
    }

    /// Set description
    #[must_use]
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Set groups
    #[must_use]
    pub const fn groups(mut self, groups: &'static [&'static str]) -> Self {
        self.groups = groups;
        self
    }

    /// Set priority
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Run once per row of `set`
    #[must_use]
    pub const fn data(mut self, set: &'static str) -> Self {
        self.data_set = Some(set);
        self
    }

    /// Member of `group` (case-insensitive)
    #[must_use]
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g.eq_ignore_ascii_case(group))
    }

    /// `ID name`, with `[n]` appended for data iterations
    #[must_use]
    pub fn display_name(&self, iteration: Option<usize>) -> String {
        match iteration {
            Some(n) => format!("{} {}[{n}]", self.id, self.name),
            None => format!("{} {}", self.id, self.name),
        }
    }

    /// Report metadata for one iteration
    #[must_use]
    pub fn meta(&self, class: &str, iteration: Option<usize>) -> TestMeta {
        TestMeta::new(self.display_name(iteration), class)
            .with_description(self.description)
            .with_groups(self.groups.iter().copied())
    }
}

/// Ordered cases sharing one session
#[derive(Debug, Clone)]
pub struct TestClass {
    pub name: &'static str,
    pub cases: Vec<TestCase>,
}

impl TestClass {
    /// Class with `cases`
    #[must_use]
    pub fn new(name: &'static str, cases: impl IntoIterator<Item = TestCase>) -> Self {
        Self {
            name,
            cases: cases.into_iter().collect(),
        }
    }

    /// Admitted cases in priority order; `None` if nothing is admitted
    #[must_use]
    pub fn select(&self, selection: &Selection) -> Option<Self> {
        let mut cases: Vec<TestCase> = self
            .cases
            .iter()
            .filter(|case| selection.admits(case))
            .copied()
            .collect();
        if cases.is_empty() {
            return None;
        }
        cases.sort_by_key(|case| case.priority);
        Some(Self {
            name: self.name,
            cases,
        })
    }
}

/// Which cases to run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    groups: Vec<String>,
    filter: Option<String>,
}

impl Selection {
    /// Every case
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Only cases in at least one of `groups`
    #[must_use]
    pub fn with_groups(mut self, groups: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.groups = groups
            .into_iter()
            .map(Into::into)
            .filter(|g: &String| !g.trim().is_empty())
            .collect();
        self
    }

    /// Only cases whose id or name contains `filter` (case-insensitive)
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into().to_lowercase());
        self
    }

    /// Whether `case` is selected
    #[must_use]
    pub fn admits(&self, case: &TestCase) -> bool {
        let in_groups =
            self.groups.is_empty() || self.groups.iter().any(|g| case.in_group(g.trim()));
        let matches = self.filter.as_ref().map_or(true, |f| {
            case.id.to_lowercase().contains(f) || case.name.to_lowercase().contains(f)
        });
        in_groups && matches
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn noop(_ctx: TestContext) -> TestFuture {
        async { Ok(()) }.boxed()
    }

    const LOGIN: TestCase = TestCase::new("TC_Auth_001", "verify_login_page_display", noop)
        .groups(&["sanity", "regression"])
        .priority(1);
    const DDT: TestCase = TestCase::new("TC_Auth_DDT_001", "login_with_multiple_credentials", noop)
        .groups(&["dataDriven", "master"])
        .data("LoginData");

    mod case_tests {
        use super::*;

        #[test]
        fn test_display_name() {
            assert_eq!(LOGIN.display_name(None), "TC_Auth_001 verify_login_page_display");
            assert_eq!(
                DDT.display_name(Some(2)),
                "TC_Auth_DDT_001 login_with_multiple_credentials[2]"
            );
        }

        #[test]
        fn test_meta() {
            let meta = LOGIN.describe("Verify login page").meta("LoginTests", None);
            assert_eq!(meta.class, "LoginTests");
            assert_eq!(meta.description, "Verify login page");
            assert_eq!(meta.groups, vec!["sanity", "regression"]);
        }

        #[test]
        fn test_in_group_case_insensitive() {
            assert!(DDT.in_group("datadriven"));
            assert!(!DDT.in_group("sanity"));
        }
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_all_admits_everything() {
            assert!(Selection::all().admits(&LOGIN));
            assert!(Selection::all().admits(&DDT));
        }

        #[test]
        fn test_groups() {
            let sel = Selection::all().with_groups(["sanity", ""]);
            assert!(sel.admits(&LOGIN));
            assert!(!sel.admits(&DDT));
        }

        #[test]
        fn test_filter_matches_id_or_name() {
            assert!(Selection::all().with_filter("ddt").admits(&DDT));
            assert!(Selection::all().with_filter("LOGIN_PAGE").admits(&LOGIN));
            assert!(!Selection::all().with_filter("signup").admits(&LOGIN));
        }

        #[test]
        fn test_class_select_orders_by_priority() {
            let late = TestCase::new("B", "b", noop).priority(5);
            let early = TestCase::new("A", "a", noop).priority(-1);
            let class = TestClass::new("X", [late, LOGIN, early]);
            let selected = class.select(&Selection::all()).unwrap();
            let ids: Vec<_> = selected.cases.iter().map(|c| c.id).collect();
            assert_eq!(ids, vec!["A", "TC_Auth_001", "B"]);
            assert!(class.select(&Selection::all().with_filter("zzz")).is_none());
        }
    }
}
