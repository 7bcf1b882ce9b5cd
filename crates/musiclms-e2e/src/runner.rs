//! Suite execution.
//!
//! Each selected [`TestClass`] runs on its own worker task with its own
//! browser session and report partition; at most `parallel` classes run at
//! once. Within a class, tests run one after another. A session is always
//! released when its class ends, whatever happened to the tests.

use crate::browser::{prepare_session, release_session, reset_session, Launcher};
use crate::case::{Selection, TestCase, TestClass, TestContext};
use crate::config::{SessionPolicy, SuiteConfig};
use crate::data::{self, TestDataRow};
use crate::driver::SharedDriver;
use crate::interact::Interactor;
use crate::report::{
    Counts, LogLevel, ReportFiles, ReportSink, ScreenshotStore, SystemInfo, TestRecord, WorkerId,
    WorkerReport,
};
use crate::result::{E2eError, E2eResult};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, OnceLock};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Called with every record as soon as its test finishes
pub type ProgressHook = Arc<dyn Fn(&TestRecord) + Send + Sync>;

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub counts: Counts,
    pub files: ReportFiles,
    pub records: Vec<TestRecord>,
}

impl SuiteOutcome {
    /// Check if every executed test passed
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.counts.all_passed()
    }
}

/// Runs test classes against browser sessions
pub struct SuiteRunner {
    config: Arc<SuiteConfig>,
    launcher: Arc<dyn Launcher>,
    selection: Selection,
    progress: Option<ProgressHook>,
}

impl std::fmt::Debug for SuiteRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteRunner")
            .field("config", &self.config)
            .field("launcher", &self.launcher)
            .field("selection", &self.selection)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl SuiteRunner {
    /// Validate `config` and create a runner.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Configuration` if the configuration is invalid; no
    /// browser has been launched at that point.
    pub fn new(config: SuiteConfig, launcher: Arc<dyn Launcher>) -> E2eResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            launcher,
            selection: Selection::all(),
            progress: None,
        })
    }

    /// Restrict the run
    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Observe records as they complete
    #[must_use]
    pub fn with_progress(mut self, hook: ProgressHook) -> Self {
        self.progress = Some(hook);
        self
    }

    /// Configuration in effect
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Classes and cases this runner would execute
    #[must_use]
    pub fn plan(&self, classes: &[TestClass]) -> Vec<TestClass> {
        classes
            .iter()
            .filter_map(|class| class.select(&self.selection))
            .collect()
    }

    /// Number of selected cases (data iterations not expanded)
    #[must_use]
    pub fn planned_cases(&self, classes: &[TestClass]) -> usize {
        self.plan(classes).iter().map(|class| class.cases.len()).sum()
    }

    /// Run `classes` and write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written, or the
    /// `E2eError::Configuration` that stopped the run when a browser could
    /// not be launched. The report holds whatever ran before that point.
    /// Test failures are part of the outcome.
    pub async fn run(&self, classes: &[TestClass]) -> E2eResult<SuiteOutcome> {
        let mut sink = ReportSink::new(
            &self.config.reports_dir,
            SystemInfo::from_config(&self.config),
        );
        sink.on_start()?;

        let plan = self.plan(classes);
        info!(
            classes = plan.len(),
            parallel = self.config.parallel,
            policy = %self.config.session_policy,
            "running suite"
        );

        let abort = Arc::new(AbortSignal::default());
        let permits = Arc::new(Semaphore::new(self.config.parallel.max(1)));
        let mut workers = JoinSet::new();
        for (index, class) in plan.into_iter().enumerate() {
            let worker = ClassWorker {
                config: self.config.clone(),
                launcher: self.launcher.clone(),
                screenshots: ScreenshotStore::new(&self.config.screenshots_dir),
                progress: self.progress.clone(),
                report: sink.partition(WorkerId(index))?,
                driver: None,
                launch_failure: None,
                abort: abort.clone(),
                started: HashSet::new(),
            };
            let permits = permits.clone();
            workers.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                worker.run(class).await
            });
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(report) => sink.absorb(report)?,
                Err(err) => error!(error = %err, "worker task aborted"),
            }
        }

        let files = sink.on_finish().await?;
        if let Some(reason) = abort.reason() {
            error!(report = %files.html.display(), "run aborted: {reason}");
            return Err(E2eError::configuration(reason));
        }
        Ok(SuiteOutcome {
            counts: sink.counts(),
            files,
            records: sink.records().cloned().collect(),
        })
    }
}

/// First fatal error of a run; once tripped, no worker starts another test
#[derive(Debug, Default)]
struct AbortSignal {
    reason: OnceLock<String>,
}

impl AbortSignal {
    fn trip(&self, reason: String) {
        let _ = self.reason.set(reason);
    }

    fn reason(&self) -> Option<&str> {
        self.reason.get().map(String::as_str)
    }
}

/// Executes one class on one session
struct ClassWorker {
    config: Arc<SuiteConfig>,
    launcher: Arc<dyn Launcher>,
    screenshots: ScreenshotStore,
    progress: Option<ProgressHook>,
    report: WorkerReport,
    driver: Option<SharedDriver>,
    launch_failure: Option<String>,
    abort: Arc<AbortSignal>,
    /// Ids of cases that have produced at least one record
    started: HashSet<&'static str>,
}

impl ClassWorker {
    /// Run every case of `class`; the partition comes back and the session
    /// is released even if the worker itself panics
    async fn run(mut self, class: TestClass) -> WorkerReport {
        info!(class = class.name, worker = %self.report.worker(), tests = class.cases.len(), "class started");
        let finished = AssertUnwindSafe(self.run_cases(&class))
            .catch_unwind()
            .await;
        if let Err(payload) = finished {
            let cause = format!("worker aborted: {}", panic_message(payload.as_ref()));
            error!(class = class.name, "{cause}");
            self.abandon(&class, &cause).await;
        }
        self.discard_session().await;
        info!(class = class.name, "class finished");
        self.report
    }

    async fn run_cases(&mut self, class: &TestClass) {
        for case in &class.cases {
            self.run_case(class.name, case).await;
        }
    }

    /// Close the open record and fail every case that never started
    async fn abandon(&mut self, class: &TestClass, cause: &str) {
        if self.report.current_test().is_some() {
            note(self.report.on_test_failure(cause, None).await);
        }
        let pending: Vec<&TestCase> = class
            .cases
            .iter()
            .filter(|case| !self.started.contains(case.id))
            .collect();
        for case in pending {
            note(self.report.on_test_start(case.meta(class.name, None)));
            note(self.report.on_test_failure(cause, None).await);
        }
    }

    async fn run_case(&mut self, class: &str, case: &TestCase) {
        self.started.insert(case.id);
        let Some(set) = case.data_set else {
            self.run_iteration(class, case, None, TestDataRow::default())
                .await;
            return;
        };

        let rows = data::source(set, &self.config.data_dir).and_then(|source| source.rows());
        match rows {
            Ok(rows) => {
                if rows.is_empty() {
                    warn!(test = case.id, set, "data set has no rows");
                }
                for (index, row) in rows.into_iter().enumerate() {
                    self.run_iteration(class, case, Some(index + 1), row).await;
                }
            }
            Err(err) => {
                note(self.report.on_test_start(case.meta(class, None)));
                note(self.report.on_test_failure(err.to_string(), None).await);
                self.completed();
            }
        }
    }

    async fn run_iteration(
        &mut self,
        class: &str,
        case: &TestCase,
        iteration: Option<usize>,
        row: TestDataRow,
    ) {
        let meta = case.meta(class, iteration);
        let name = meta.name.clone();
        note(self.report.on_test_start(meta));
        if iteration.is_some() {
            note(self.report.log(LogLevel::Info, format!("Data: {row}")));
        }

        if let Some(reason) = self.abort.reason() {
            let reason = format!("run aborted: {reason}");
            note(self.report.on_test_skipped(reason));
            self.completed();
            return;
        }

        let driver = match self.acquire().await {
            Ok(driver) => driver,
            Err(err) => {
                note(
                    self.report
                        .on_test_failure(format!("browser session unavailable: {err}"), None)
                        .await,
                );
                self.completed();
                return;
            }
        };

        if let Err(err) = reset_session(&driver, &self.config.app_url).await {
            note(
                self.report
                    .on_test_failure(
                        format!("session reset failed: {err}"),
                        Some((driver.as_ref(), &self.screenshots)),
                    )
                    .await,
            );
            self.completed();
            self.discard_session().await;
            return;
        }

        let ui = Interactor::new(driver.clone(), self.config.wait_options());
        let context = TestContext::new(self.config.clone(), ui, row, name);
        let outcome = AssertUnwindSafe((case.run)(context)).catch_unwind().await;

        match outcome {
            Ok(Ok(())) => note(self.report.on_test_success()),
            Ok(Err(E2eError::Skipped { reason })) => note(self.report.on_test_skipped(reason)),
            Ok(Err(err)) => note(
                self.report
                    .on_test_failure(err.to_string(), Some((driver.as_ref(), &self.screenshots)))
                    .await,
            ),
            Err(payload) => note(
                self.report
                    .on_test_failure(
                        format!("test panicked: {}", panic_message(payload.as_ref())),
                        Some((driver.as_ref(), &self.screenshots)),
                    )
                    .await,
            ),
        }
        self.completed();

        if self.config.session_policy == SessionPolicy::PerTest {
            self.discard_session().await;
        }
    }

    /// Live session, launching one if needed
    async fn acquire(&mut self) -> E2eResult<SharedDriver> {
        if let Some(driver) = &self.driver {
            return Ok(driver.clone());
        }
        if let Some(reason) = &self.launch_failure {
            return Err(E2eError::configuration(reason.clone()));
        }

        let driver = match self.launcher.launch(&self.config).await {
            Ok(driver) => driver,
            Err(err) => {
                error!(error = %err, "browser launch failed");
                if let E2eError::Configuration { message } = &err {
                    self.abort.trip(message.clone());
                }
                self.launch_failure = Some(err.to_string());
                return Err(err);
            }
        };
        if let Err(err) = prepare_session(&driver).await {
            release_session(driver).await;
            return Err(err);
        }
        self.driver = Some(driver.clone());
        Ok(driver)
    }

    async fn discard_session(&mut self) {
        if let Some(driver) = self.driver.take() {
            release_session(driver).await;
        }
    }

    /// Tell the observer about the record that just closed
    fn completed(&self) {
        if let (Some(hook), Some(record)) = (&self.progress, self.report.records().last()) {
            hook(record);
        }
    }
}

/// Report bookkeeping errors are programming errors; log and keep going
fn note<T>(result: E2eResult<T>) {
    if let Err(err) = result {
        error!(error = %err, "report bookkeeping failed");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::assertion::Assertion;
    use crate::case::TestFuture;
    use crate::driver::{MockDriver, PNG_SIGNATURE};
    use crate::report::TestStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Hands out fresh mocks and keeps them for inspection
    #[derive(Debug, Default)]
    struct MockLauncher {
        launched: Mutex<Vec<Arc<MockDriver>>>,
        attempts: AtomicUsize,
        /// Launch attempts from this index on fail
        fail_from: Option<usize>,
        /// Fail with a driver error instead of a configuration error
        transient: bool,
    }

    impl MockLauncher {
        fn sessions(&self) -> Vec<Arc<MockDriver>> {
            self.launched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Launcher for MockLauncher {
        async fn launch(&self, _config: &SuiteConfig) -> E2eResult<SharedDriver> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail_from.is_some_and(|first| attempt >= first) {
                return Err(if self.transient {
                    E2eError::driver("session not created: chrome crashed")
                } else {
                    E2eError::configuration("failed to start chrome: refused")
                });
            }
            let mock = Arc::new(MockDriver::new());
            self.launched.lock().unwrap().push(mock.clone());
            Ok(mock)
        }
    }

    fn passing(_ctx: TestContext) -> TestFuture {
        async { Ok(()) }.boxed()
    }

    fn failing(_ctx: TestContext) -> TestFuture {
        async { Assertion::is_true(false, "URL should contain /dashboard").check() }.boxed()
    }

    fn skipping(_ctx: TestContext) -> TestFuture {
        async { Err::<(), _>(E2eError::skipped("inviteToken not configured")) }.boxed()
    }

    fn explode() -> E2eResult<()> {
        panic!("boom")
    }

    fn panicking(_ctx: TestContext) -> TestFuture {
        async { explode() }.boxed()
    }

    fn reads_row(ctx: TestContext) -> TestFuture {
        async move {
            Assertion::not_blank(ctx.row().text(0), "first column should be set").check()
        }
        .boxed()
    }

    fn config(dir: &TempDir) -> SuiteConfig {
        SuiteConfig::new("http://app.test")
            .with_reports_dir(dir.path().join("reports"))
            .with_screenshots_dir(dir.path().join("screenshots"))
            .with_data_dir(dir.path().join("data"))
            .with_wait(1_000, 50)
    }

    fn runner(dir: &TempDir, launcher: Arc<MockLauncher>) -> SuiteRunner {
        SuiteRunner::new(config(dir), launcher).unwrap()
    }

    mod lifecycle_tests {
        use super::*;

        #[tokio::test]
        async fn test_invalid_config_rejected_before_launch() {
            let dir = TempDir::new().unwrap();
            let launcher = Arc::new(MockLauncher::default());
            let err = SuiteRunner::new(config(&dir).with_browser("safari"), launcher.clone())
                .unwrap_err();
            assert!(err.is_fatal());
            assert!(launcher.sessions().is_empty());
        }

        #[tokio::test]
        async fn test_one_session_per_class_and_always_quit() {
            let dir = TempDir::new().unwrap();
            let launcher = Arc::new(MockLauncher::default());
            let classes = [
                TestClass::new(
                    "A",
                    [
                        TestCase::new("A1", "pass", passing),
                        TestCase::new("A2", "fail", failing),
                        TestCase::new("A3", "panic", panicking),
                    ],
                ),
                TestClass::new("B", [TestCase::new("B1", "pass", passing)]),
            ];
            let outcome = runner(&dir, launcher.clone()).run(&classes).await.unwrap();

            assert_eq!(outcome.counts.passed, 2);
            assert_eq!(outcome.counts.failed, 2);
            assert!(!outcome.all_passed());

            let sessions = launcher.sessions();
            assert_eq!(sessions.len(), 2);
            for session in &sessions {
                assert_eq!(session.call_count("quit"), 1);
                assert!(session.was_called("maximize_window"));
            }
            let class_a = sessions
                .iter()
                .find(|s| s.call_count("screenshot") > 0)
                .unwrap();
            assert_eq!(class_a.call_count("screenshot"), 2);
            assert!(outcome.files.html.exists());
        }

        #[tokio::test]
        async fn test_per_test_policy_launches_per_iteration() {
            let dir = TempDir::new().unwrap();
            let launcher = Arc::new(MockLauncher::default());
            let runner = SuiteRunner::new(
                config(&dir).with_session_policy(SessionPolicy::PerTest),
                launcher.clone(),
            )
            .unwrap();
            let classes = [TestClass::new(
                "A",
                [
                    TestCase::new("A1", "one", passing),
                    TestCase::new("A2", "two", passing),
                ],
            )];
            runner.run(&classes).await.unwrap();
            let sessions = launcher.sessions();
            assert_eq!(sessions.len(), 2);
            assert!(sessions.iter().all(|s| s.call_count("quit") == 1));
        }

        #[tokio::test]
        async fn test_reset_before_every_test() {
            let dir = TempDir::new().unwrap();
            let launcher = Arc::new(MockLauncher::default());
            let classes = [TestClass::new(
                "A",
                [
                    TestCase::new("A1", "one", passing),
                    TestCase::new("A2", "two", passing),
                ],
            )];
            runner(&dir, launcher.clone()).run(&classes).await.unwrap();
            let session = &launcher.sessions()[0];
            assert_eq!(session.call_count("delete_all_cookies"), 3);
            assert_eq!(session.call_count("script:window.localStorage.clear()"), 2);
        }

        fn report_file(dir: &TempDir, extension: &str) -> String {
            let path = std::fs::read_dir(dir.path().join("reports"))
                .unwrap()
                .map(|entry| entry.unwrap().path())
                .find(|path| path.extension().is_some_and(|ext| ext == extension))
                .unwrap();
            std::fs::read_to_string(path).unwrap()
        }

        #[tokio::test]
        async fn test_launch_failure_aborts_run() {
            let dir = TempDir::new().unwrap();
            let launcher = Arc::new(MockLauncher {
                fail_from: Some(0),
                ..MockLauncher::default()
            });
            let classes = [TestClass::new(
                "A",
                [
                    TestCase::new("A1", "one", passing),
                    TestCase::new("A2", "two", passing),
                ],
            )];
            let err = runner(&dir, launcher).run(&classes).await.unwrap_err();
            assert!(err.is_fatal());
            assert_eq!(
                err.to_string(),
                "Configuration error: failed to start chrome: refused"
            );
            let html = report_file(&dir, "html");
            assert!(html.contains("browser session unavailable"));
            assert!(html.contains("run aborted: failed to start chrome: refused"));
        }

        #[tokio::test]
        async fn test_later_launch_failure_stops_remaining_classes() {
            let dir = TempDir::new().unwrap();
            let launcher = Arc::new(MockLauncher {
                fail_from: Some(1),
                ..MockLauncher::default()
            });
            let classes = [
                TestClass::new("A", [TestCase::new("A1", "one", passing)]),
                TestClass::new(
                    "B",
                    [
                        TestCase::new("B1", "one", passing),
                        TestCase::new("B2", "two", passing),
                    ],
                ),
                TestClass::new("C", [TestCase::new("C1", "one", passing)]),
            ];
            let err = runner(&dir, launcher.clone())
                .run(&classes)
                .await
                .unwrap_err();
            assert!(matches!(err, E2eError::Configuration { .. }));

            let sessions = launcher.sessions();
            assert_eq!(sessions.len(), 1);
            assert_eq!(sessions[0].call_count("quit"), 1);

            let json: serde_json::Value =
                serde_json::from_str(&report_file(&dir, "json")).unwrap();
            let tests = json["tests"].as_array().unwrap();
            assert_eq!(tests.len(), 4);
            let skipped = tests
                .iter()
                .filter(|t| t["outcome"]["status"] == "SKIP")
                .count();
            assert_eq!(skipped, 2);
        }

        #[tokio::test]
        async fn test_transient_launch_failure_fails_class_tests() {
            let dir = TempDir::new().unwrap();
            let launcher = Arc::new(MockLauncher {
                fail_from: Some(0),
                transient: true,
                ..MockLauncher::default()
            });
            let classes = [TestClass::new(
                "A",
                [
                    TestCase::new("A1", "one", passing),
                    TestCase::new("A2", "two", passing),
                ],
            )];
            let outcome = runner(&dir, launcher.clone()).run(&classes).await.unwrap();
            assert_eq!(outcome.counts.failed, 2);
            assert!(outcome
                .records
                .iter()
                .all(|r| r.cause().unwrap().contains("browser session unavailable")));
            assert_eq!(launcher.attempts.load(Ordering::SeqCst), 1);
        }
    }

    mod outcome_tests {
        use super::*;

        #[tokio::test]
        async fn test_skip_and_failure_records() {
            let dir = TempDir::new().unwrap();
            let launcher = Arc::new(MockLauncher::default());
            let classes = [TestClass::new(
                "Invite",
                [
                    TestCase::new("I1", "skip", skipping),
                    TestCase::new("I2", "fail", failing),
                    TestCase::new("I3", "panic", panicking),
                ],
            )];
            let outcome = runner(&dir, launcher).run(&classes).await.unwrap();
            let by_name = |name: &str| {
                outcome
                    .records
                    .iter()
                    .find(|r| r.name.starts_with(name))
                    .unwrap()
                    .clone()
            };

            let skipped = by_name("I1");
            assert_eq!(skipped.status(), TestStatus::Skip);
            assert_eq!(skipped.cause(), Some("inviteToken not configured"));

            let failed = by_name("I2");
            assert_eq!(failed.status(), TestStatus::Fail);
            assert_eq!(
                failed.cause(),
                Some("Assertion failed: URL should contain /dashboard")
            );
            let shot = failed.screenshot().unwrap();
            assert_eq!(std::fs::read(shot).unwrap(), PNG_SIGNATURE.to_vec());
            assert_eq!(
                failed
                    .logs
                    .iter()
                    .filter(|l| l.level == LogLevel::Fail && l.message.starts_with("Test failed"))
                    .count(),
                1
            );

            let panicked = by_name("I3");
            assert_eq!(panicked.cause(), Some("test panicked: boom"));
        }

        #[tokio::test]
        async fn test_progress_hook_sees_every_record() {
            let dir = TempDir::new().unwrap();
            let seen = Arc::new(AtomicUsize::new(0));
            let counter = seen.clone();
            let runner = runner(&dir, Arc::new(MockLauncher::default())).with_progress(Arc::new(
                move |_record: &TestRecord| {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
            ));
            let classes = [TestClass::new(
                "A",
                [
                    TestCase::new("A1", "one", passing),
                    TestCase::new("A2", "two", failing),
                ],
            )];
            runner.run(&classes).await.unwrap();
            assert_eq!(seen.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn test_worker_panic_keeps_partition_and_quits_session() {
            let dir = TempDir::new().unwrap();
            let launcher = Arc::new(MockLauncher::default());
            let runner = runner(&dir, launcher.clone()).with_progress(Arc::new(
                |record: &TestRecord| {
                    if record.name.starts_with("A1") {
                        panic!("progress hook exploded");
                    }
                },
            ));
            let classes = [TestClass::new(
                "A",
                [
                    TestCase::new("A1", "one", passing),
                    TestCase::new("A2", "two", passing),
                    TestCase::new("A3", "three", passing),
                ],
            )];
            let outcome = runner.run(&classes).await.unwrap();

            assert_eq!(outcome.records.len(), 3);
            assert_eq!(outcome.counts.passed, 1);
            assert_eq!(outcome.counts.failed, 2);
            for record in outcome.records.iter().filter(|r| !r.name.starts_with("A1")) {
                assert_eq!(
                    record.cause(),
                    Some("worker aborted: progress hook exploded")
                );
            }
            assert_eq!(launcher.sessions()[0].call_count("quit"), 1);
        }

        #[tokio::test]
        async fn test_selection_limits_run() {
            let dir = TempDir::new().unwrap();
            let runner = runner(&dir, Arc::new(MockLauncher::default()))
                .with_selection(Selection::all().with_groups(["sanity"]));
            let classes = [TestClass::new(
                "A",
                [
                    TestCase::new("A1", "one", passing).groups(&["sanity"]),
                    TestCase::new("A2", "two", passing).groups(&["regression"]),
                ],
            )];
            assert_eq!(runner.planned_cases(&classes), 1);
            let outcome = runner.run(&classes).await.unwrap();
            assert_eq!(outcome.records.len(), 1);
        }
    }

    mod data_tests {
        use super::*;

        #[tokio::test]
        async fn test_one_iteration_per_row() {
            let dir = TempDir::new().unwrap();
            std::fs::create_dir_all(dir.path().join("data")).unwrap();
            std::fs::write(
                dir.path().join("data/login_data.csv"),
                "email,password,expected\na@x.io,p1,true\n,p2,false\nc@x.io,p3,true\n",
            )
            .unwrap();
            let classes = [TestClass::new(
                "DataDriven",
                [TestCase::new("DDT", "rows", reads_row).data(data::LOGIN_DATA)],
            )];
            let outcome = runner(&dir, Arc::new(MockLauncher::default()))
                .run(&classes)
                .await
                .unwrap();
            let names: Vec<_> = outcome.records.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["DDT rows[1]", "DDT rows[2]", "DDT rows[3]"]);
            assert_eq!(outcome.counts.passed, 2);
            assert_eq!(outcome.counts.failed, 1);
        }

        #[tokio::test]
        async fn test_missing_data_fails_only_that_case() {
            let dir = TempDir::new().unwrap();
            let classes = [TestClass::new(
                "DataDriven",
                [
                    TestCase::new("DDT", "rows", reads_row).data(data::LOGIN_DATA),
                    TestCase::new("P", "plain", passing),
                ],
            )];
            let outcome = runner(&dir, Arc::new(MockLauncher::default()))
                .run(&classes)
                .await
                .unwrap();
            assert_eq!(outcome.counts.failed, 1);
            assert_eq!(outcome.counts.passed, 1);
            let failed = outcome.records.iter().find(|r| r.name == "DDT rows").unwrap();
            assert!(failed.cause().unwrap().contains("LoginData"));
            assert!(failed.screenshot().is_none());
        }
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
