//! Test reporting.
//!
//! The [`ReportSink`] owns a run: `Idle → SuiteRunning → SuiteFinished`.
//! While the suite runs, every worker records into its own [`WorkerReport`]
//! partition (`TestRunning` per test) and hands it back to the sink when the
//! worker is done. Nothing is shared between workers, so no locking is needed.
//!
//! On finish the sink writes, once:
//! - `MusicLMS_Report_<yyyy-MM-dd_HH-mm-ss-SSS>_<run>.html`, where `<run>` is
//!   the first eight hex digits of the run id
//! - a JSON summary with the same stem
//! - JUnit XML with the same stem

use crate::config::SuiteConfig;
use crate::driver::Driver;
use crate::result::{E2eError, E2eResult};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

mod render;
mod screenshot;

pub use render::escape_html;
pub use screenshot::ScreenshotStore;

/// Document title of the HTML report
pub const REPORT_TITLE: &str = "MusicLMS Test Report";

/// Report name shown in the header
pub const REPORT_NAME: &str = "Authentication Test Results";

// =============================================================================
// RECORD TYPES
// =============================================================================

/// Final status of one test iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    /// Test passed
    Pass,
    /// Test failed
    Fail,
    /// Test did not run
    Skip,
}

impl TestStatus {
    /// Check if passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Check if failed
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Fail)
    }

    /// Upper-case label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity of a report log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Pass,
    Fail,
    Skip,
    Warning,
}

impl LogLevel {
    /// Upper-case label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
            Self::Warning => "WARNING",
        }
    }
}

/// One line of a test's log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub at: DateTime<Local>,
}

/// Identifies the worker that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// Final result attached to a record exactly once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub status: TestStatus,
    /// Failure cause or skip reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// Saved failure screenshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

/// Static description of a test iteration about to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMeta {
    /// Display name (`ID name` or `ID name[n]`)
    pub name: String,
    pub description: String,
    /// Owning test class
    pub class: String,
    pub groups: Vec<String>,
}

impl TestMeta {
    /// Meta with no description or groups
    #[must_use]
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            class: class.into(),
            groups: Vec::new(),
        }
    }

    /// Set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set groups
    #[must_use]
    pub fn with_groups(mut self, groups: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

/// Everything recorded about one test iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRecord {
    pub name: String,
    pub description: String,
    pub class: String,
    pub groups: Vec<String>,
    pub worker: WorkerId,
    pub started_at: DateTime<Local>,
    pub duration_ms: u64,
    /// `None` only while the test is running
    pub outcome: Option<TestOutcome>,
    pub logs: Vec<LogEntry>,
}

impl TestRecord {
    /// Status, `Skip` while no outcome is set
    #[must_use]
    pub fn status(&self) -> TestStatus {
        self.outcome.as_ref().map_or(TestStatus::Skip, |o| o.status)
    }

    /// Failure cause or skip reason
    #[must_use]
    pub fn cause(&self) -> Option<&str> {
        self.outcome.as_ref().and_then(|o| o.cause.as_deref())
    }

    /// Saved screenshot
    #[must_use]
    pub fn screenshot(&self) -> Option<&Path> {
        self.outcome.as_ref().and_then(|o| o.screenshot.as_deref())
    }

    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push(LogEntry {
            level,
            message: message.into(),
            at: Local::now(),
        });
    }
}

/// Pass/fail/skip totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Counts {
    /// Tally `records`
    #[must_use]
    pub fn of<'a>(records: impl IntoIterator<Item = &'a TestRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut counts, record| {
                match record.status() {
                    TestStatus::Pass => counts.passed += 1,
                    TestStatus::Fail => counts.failed += 1,
                    TestStatus::Skip => counts.skipped += 1,
                }
                counts
            })
    }

    /// Total number of records
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// Passed share of executed tests (0.0 to 1.0)
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            return 1.0;
        }
        self.passed as f64 / executed as f64
    }

    /// Check if nothing failed
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Environment table of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub application: String,
    pub module: String,
    pub environment: String,
    pub browser: String,
    pub os: String,
    pub user: String,
}

impl SystemInfo {
    /// Describe a run of `config` on this machine
    #[must_use]
    pub fn from_config(config: &SuiteConfig) -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            application: "MusicLMS".to_string(),
            module: "Authentication".to_string(),
            environment: config.environment.clone(),
            browser: config.browser.clone(),
            os: std::env::consts::OS.to_string(),
            user,
        }
    }

    /// Rows of the table, in display order
    #[must_use]
    pub fn rows(&self) -> [(&'static str, &str); 6] {
        [
            ("Application", &self.application),
            ("Module", &self.module),
            ("Environment", &self.environment),
            ("Browser", &self.browser),
            ("OS", &self.os),
            ("User", &self.user),
        ]
    }
}

// =============================================================================
// WORKER PARTITION
// =============================================================================

/// Report partition owned by one worker.
///
/// At most one test is running at a time; its outcome is set exactly once by
/// one of `on_test_success`, `on_test_failure` or `on_test_skipped`.
#[derive(Debug)]
pub struct WorkerReport {
    worker: WorkerId,
    current: Option<(TestRecord, Instant)>,
    finished: Vec<TestRecord>,
}

impl WorkerReport {
    /// Empty partition for `worker`
    #[must_use]
    pub const fn new(worker: WorkerId) -> Self {
        Self {
            worker,
            current: None,
            finished: Vec::new(),
        }
    }

    /// Owning worker
    #[must_use]
    pub const fn worker(&self) -> WorkerId {
        self.worker
    }

    /// Name of the running test, if any
    #[must_use]
    pub fn current_test(&self) -> Option<&str> {
        self.current.as_ref().map(|(record, _)| record.name.as_str())
    }

    /// Completed records, in execution order
    #[must_use]
    pub fn records(&self) -> &[TestRecord] {
        &self.finished
    }

    /// Open a record for `meta`.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Report` if another test of this worker is still open.
    pub fn on_test_start(&mut self, meta: TestMeta) -> E2eResult<()> {
        if let Some(running) = self.current_test() {
            return Err(E2eError::report(format!(
                "{}: cannot start '{}' while '{running}' is running",
                self.worker, meta.name
            )));
        }
        info!(test = %meta.name, worker = %self.worker, "Starting test");
        let mut record = TestRecord {
            name: meta.name,
            description: meta.description,
            class: meta.class,
            groups: meta.groups,
            worker: self.worker,
            started_at: Local::now(),
            duration_ms: 0,
            outcome: None,
            logs: Vec::new(),
        };
        record.log(LogLevel::Info, format!("Starting test: {}", record.name));
        self.current = Some((record, Instant::now()));
        Ok(())
    }

    /// Add a log line to the running test.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Report` if no test is running.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) -> E2eResult<()> {
        let (record, _) = self.running_mut("log")?;
        record.log(level, message);
        Ok(())
    }

    /// Close the running test as passed.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Report` if no test is running.
    pub fn on_test_success(&mut self) -> E2eResult<&TestRecord> {
        let (record, _) = self.running_mut("pass")?;
        info!(test = %record.name, "Test passed");
        let line = format!("Test passed: {}", record.name);
        record.log(LogLevel::Pass, line);
        self.close(TestOutcome {
            status: TestStatus::Pass,
            cause: None,
            screenshot: None,
        })
    }

    /// Close the running test as failed.
    ///
    /// When `capture` is given, the current page is saved first and linked to
    /// the record. A capture failure is logged as a warning and never replaces
    /// `cause`.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Report` if no test is running.
    pub async fn on_test_failure(
        &mut self,
        cause: impl Into<String>,
        capture: Option<(&dyn Driver, &ScreenshotStore)>,
    ) -> E2eResult<&TestRecord> {
        let cause = cause.into();
        let name = {
            let (record, _) = self.running_mut("fail")?;
            warn!(test = %record.name, cause = %cause, "Test failed");
            let line = format!("Test failed: {}", record.name);
            record.log(LogLevel::Fail, line);
            record.log(LogLevel::Fail, cause.clone());
            record.name.clone()
        };

        let mut screenshot = None;
        if let Some((driver, store)) = capture {
            match store.capture(driver, &name).await {
                Ok(path) => screenshot = Some(path),
                Err(err) => {
                    warn!(test = %name, error = %err, "screenshot capture failed");
                    self.log(
                        LogLevel::Warning,
                        format!("Failed to capture screenshot: {err}"),
                    )?;
                }
            }
        }

        self.close(TestOutcome {
            status: TestStatus::Fail,
            cause: Some(cause),
            screenshot,
        })
    }

    /// Close the running test as skipped.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Report` if no test is running.
    pub fn on_test_skipped(&mut self, reason: impl Into<String>) -> E2eResult<&TestRecord> {
        let reason = reason.into();
        let (record, _) = self.running_mut("skip")?;
        info!(test = %record.name, reason = %reason, "Test skipped");
        let line = format!("Test skipped: {}", record.name);
        record.log(LogLevel::Skip, line);
        record.log(LogLevel::Skip, reason.clone());
        self.close(TestOutcome {
            status: TestStatus::Skip,
            cause: Some(reason),
            screenshot: None,
        })
    }

    /// Finished records; a test left open is closed as skipped
    #[must_use]
    pub fn into_records(mut self) -> Vec<TestRecord> {
        if self.current.is_some() {
            // Cannot fail: a test is open.
            let _ = self.on_test_skipped("no outcome recorded before the worker finished");
        }
        self.finished
    }

    fn running_mut(&mut self, action: &str) -> E2eResult<&mut (TestRecord, Instant)> {
        let worker = self.worker;
        self.current
            .as_mut()
            .ok_or_else(|| E2eError::report(format!("{worker}: no running test to {action}")))
    }

    fn close(&mut self, outcome: TestOutcome) -> E2eResult<&TestRecord> {
        let (mut record, started) = self
            .current
            .take()
            .ok_or_else(|| E2eError::report(format!("{}: no running test", self.worker)))?;
        record.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        record.outcome = Some(outcome);
        self.finished.push(record);
        self.finished
            .last()
            .ok_or_else(|| E2eError::report("record vanished"))
    }
}

// =============================================================================
// SINK
// =============================================================================

/// Lifecycle of a [`ReportSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Idle,
    SuiteRunning,
    SuiteFinished,
}

/// Files written by a flush
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub html: PathBuf,
    pub json: PathBuf,
    pub junit: PathBuf,
}

/// Collects worker partitions and writes the run's report once
#[derive(Debug)]
pub struct ReportSink {
    state: SinkState,
    reports_dir: PathBuf,
    info: SystemInfo,
    run_id: uuid::Uuid,
    started_at: Option<DateTime<Local>>,
    finished_at: Option<DateTime<Local>>,
    partitions: BTreeMap<WorkerId, Vec<TestRecord>>,
    embed_screenshots: bool,
    written: Option<ReportFiles>,
}

impl ReportSink {
    /// Idle sink writing into `reports_dir`
    #[must_use]
    pub fn new(reports_dir: impl Into<PathBuf>, info: SystemInfo) -> Self {
        Self {
            state: SinkState::Idle,
            reports_dir: reports_dir.into(),
            info,
            run_id: uuid::Uuid::new_v4(),
            started_at: None,
            finished_at: None,
            partitions: BTreeMap::new(),
            embed_screenshots: true,
            written: None,
        }
    }

    /// Link screenshots by path instead of embedding them
    #[must_use]
    pub const fn with_linked_screenshots(mut self) -> Self {
        self.embed_screenshots = false;
        self
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> SinkState {
        self.state
    }

    /// System info table
    #[must_use]
    pub const fn info(&self) -> &SystemInfo {
        &self.info
    }

    /// Unique id of this run
    #[must_use]
    pub const fn run_id(&self) -> uuid::Uuid {
        self.run_id
    }

    /// `Idle → SuiteRunning`.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Report` unless the sink is idle.
    pub fn on_start(&mut self) -> E2eResult<()> {
        self.expect_state(SinkState::Idle, "start")?;
        let now = Local::now();
        info!(run_id = %self.run_id, reports_dir = %self.reports_dir.display(), "suite started");
        self.started_at = Some(now);
        self.state = SinkState::SuiteRunning;
        Ok(())
    }

    /// Hand out an empty partition for `worker`.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Report` unless the suite is running or if the
    /// worker already returned a partition.
    pub fn partition(&self, worker: WorkerId) -> E2eResult<WorkerReport> {
        self.expect_state(SinkState::SuiteRunning, "open a partition")?;
        if self.partitions.contains_key(&worker) {
            return Err(E2eError::report(format!("{worker} already reported")));
        }
        Ok(WorkerReport::new(worker))
    }

    /// Take back a worker's partition.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Report` unless the suite is running.
    pub fn absorb(&mut self, report: WorkerReport) -> E2eResult<()> {
        self.expect_state(SinkState::SuiteRunning, "absorb")?;
        let worker = report.worker();
        let records = report.into_records();
        self.partitions.entry(worker).or_default().extend(records);
        Ok(())
    }

    /// `SuiteRunning → SuiteFinished`, then flush.
    ///
    /// Calling it again after the suite finished returns the files already
    /// written.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Report` if the suite never started, or an IO error
    /// if the files cannot be written.
    pub async fn on_finish(&mut self) -> E2eResult<ReportFiles> {
        match self.state {
            SinkState::Idle => Err(E2eError::report("cannot finish a suite that never started")),
            SinkState::SuiteRunning => {
                self.finished_at = Some(Local::now());
                self.state = SinkState::SuiteFinished;
                let counts = self.counts();
                info!(
                    passed = counts.passed,
                    failed = counts.failed,
                    skipped = counts.skipped,
                    "suite finished"
                );
                self.flush().await
            }
            SinkState::SuiteFinished => self.flush().await,
        }
    }

    /// Write the report files; only the first call touches the disk.
    ///
    /// # Errors
    ///
    /// Returns `E2eError::Report` before the suite finished, or an IO error.
    pub async fn flush(&mut self) -> E2eResult<ReportFiles> {
        self.expect_state(SinkState::SuiteFinished, "flush")?;
        if let Some(files) = &self.written {
            return Ok(files.clone());
        }

        let files = self.file_paths();
        let html = self.render_html();
        let json = self.render_json()?;
        let junit = self.render_junit();

        tokio::fs::create_dir_all(&self.reports_dir).await?;
        tokio::fs::write(&files.html, html).await?;
        tokio::fs::write(&files.json, json).await?;
        tokio::fs::write(&files.junit, junit).await?;

        info!(report = %files.html.display(), "report written");
        self.written = Some(files.clone());
        Ok(files)
    }

    /// All records, grouped by worker in worker order
    pub fn records(&self) -> impl Iterator<Item = &TestRecord> {
        self.partitions.values().flatten()
    }

    /// Totals over all absorbed records
    #[must_use]
    pub fn counts(&self) -> Counts {
        Counts::of(self.records())
    }

    /// Wall-clock duration of the run, once finished
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => {
                u64::try_from((end - start).num_milliseconds()).unwrap_or_default()
            }
            _ => 0,
        }
    }

    /// Paths the report files get, derived from the start time and run id
    #[must_use]
    pub fn file_paths(&self) -> ReportFiles {
        let stamp = self
            .started_at
            .unwrap_or_else(Local::now)
            .format("%Y-%m-%d_%H-%M-%S-%3f");
        let stem = format!("MusicLMS_Report_{stamp}_{:08x}", self.run_id.as_fields().0);
        ReportFiles {
            html: self.reports_dir.join(format!("{stem}.html")),
            json: self.reports_dir.join(format!("{stem}.json")),
            junit: self.reports_dir.join(format!("{stem}.xml")),
        }
    }

    fn expect_state(&self, wanted: SinkState, action: &str) -> E2eResult<()> {
        if self.state == wanted {
            Ok(())
        } else {
            Err(E2eError::report(format!(
                "cannot {action} in state {:?}",
                self.state
            )))
        }
    }
}
