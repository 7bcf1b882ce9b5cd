//! Suite runner wiring for the `run` command

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use musiclms_e2e::{
    default_launcher, suites, Launcher, Selection, SuiteConfig, SuiteOutcome, SuiteRunner,
    TestRecord,
};
use std::sync::Arc;
use std::time::Instant;

/// Runs the catalog with console progress
#[derive(Debug)]
pub struct TestRunner {
    config: CliConfig,
    launcher: Arc<dyn Launcher>,
}

impl TestRunner {
    /// Runner using the launcher of this build
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        Self {
            config,
            launcher: default_launcher(),
        }
    }

    /// Use a different launcher
    #[must_use]
    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Run every selected test, print progress and a summary.
    ///
    /// # Errors
    ///
    /// Returns the configuration error that prevented or stopped the run
    /// (invalid settings, a browser that cannot be launched), an error if
    /// the report cannot be written, or `TestsFailed` when any test failed.
    pub fn run(&self, suite: SuiteConfig, selection: Selection) -> CliResult<SuiteOutcome> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run_async(suite, selection))
    }

    async fn run_async(&self, suite: SuiteConfig, selection: Selection) -> CliResult<SuiteOutcome> {
        let runner = SuiteRunner::new(suite, self.launcher.clone())?.with_selection(selection);
        let catalog = suites::catalog();
        let planned = runner.planned_cases(&catalog);

        let mut reporter = ProgressReporter::new(
            self.config.color.should_color(),
            self.config.verbosity.is_quiet(),
        );
        reporter.header(&format!(
            "MusicLMS E2E ({} on {})",
            runner.config().browser,
            runner.config().app_url
        ));
        if planned == 0 {
            reporter.info("No tests match the selection");
        }
        reporter.start_progress(planned as u64, "Running tests");

        let reporter = Arc::new(reporter);
        let hook = reporter.clone();
        let runner = runner.with_progress(Arc::new(move |record: &TestRecord| {
            hook.record(record);
        }));

        let started = Instant::now();
        let result = runner.run(&catalog).await;
        reporter.finish();
        let outcome = result?;
        reporter.summary(outcome.counts, started.elapsed());
        reporter.info(&format!("HTML report: {}", outcome.files.html.display()));
        reporter.info(&format!("JSON report: {}", outcome.files.json.display()));
        reporter.info(&format!("JUnit report: {}", outcome.files.junit.display()));

        if outcome.counts.failed > 0 {
            return Err(CliError::TestsFailed {
                failed: outcome.counts.failed,
            });
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use musiclms_e2e::UnavailableLauncher;
    use tempfile::TempDir;

    fn suite(dir: &TempDir) -> SuiteConfig {
        SuiteConfig::new("http://app.test")
            .with_reports_dir(dir.path().join("reports"))
            .with_screenshots_dir(dir.path().join("screenshots"))
            .with_wait(100, 10)
    }

    fn quiet() -> CliConfig {
        CliConfig::new().with_verbosity(crate::config::Verbosity::Quiet)
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let runner = TestRunner::new(quiet()).with_launcher(Arc::new(UnavailableLauncher));
        let err = runner
            .run(suite(&dir).with_browser("netscape"), Selection::all())
            .unwrap_err();
        assert!(err.to_string().contains("Browser not supported: netscape"));
        assert!(!dir.path().join("reports").exists());
    }

    #[test]
    fn test_unlaunchable_browser_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let runner = TestRunner::new(quiet()).with_launcher(Arc::new(UnavailableLauncher));
        let err = runner
            .run(suite(&dir), Selection::all().with_filter("TC_Auth_00"))
            .unwrap_err();
        assert!(!err.is_test_failure());
        assert!(matches!(err, CliError::Suite(ref e) if e.is_fatal()));
        assert!(err.to_string().contains("built without the `webdriver` feature"));
        assert!(dir.path().join("reports").is_dir());
    }

    #[test]
    fn test_empty_selection_passes() {
        let dir = TempDir::new().unwrap();
        let runner = TestRunner::new(quiet()).with_launcher(Arc::new(UnavailableLauncher));
        let outcome = runner
            .run(suite(&dir), Selection::all().with_filter("no-such-test"))
            .unwrap();
        assert_eq!(outcome.counts.total(), 0);
        assert!(outcome.files.html.exists());
    }
}
