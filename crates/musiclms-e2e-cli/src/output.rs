//! Console progress for suite runs
//!
//! Everything goes to stderr so listings and `--format json` output on
//! stdout stay machine-readable.

use console::{style, StyledObject, Term};
use indicatif::{ProgressBar, ProgressStyle};
use musiclms_e2e::{Counts, TestRecord, TestStatus};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Aligned text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Streams finished tests to the terminal behind an optional progress bar
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    bar: Option<ProgressBar>,
    /// Style labels with color
    pub use_color: bool,
    /// Only failures and the failing summary are printed
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            bar: None,
            use_color,
            quiet,
        }
    }

    /// Show a bar sized for `planned` tests; a no-op when quiet
    pub fn start_progress(&mut self, planned: u64, message: &str) {
        if self.quiet {
            return;
        }
        let bar = ProgressBar::new(planned);
        let bar_style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(bar_style);
        bar.set_message(message.to_string());
        self.bar = Some(bar);
    }

    /// Print one finished test and advance the bar.
    ///
    /// Data iterations can outnumber the planned cases, so the bar grows
    /// when it would overflow.
    pub fn record(&self, record: &TestRecord) {
        let line = self.status_line(record);
        if let Some(bar) = &self.bar {
            if bar.length().is_some_and(|len| bar.position() >= len) {
                bar.inc_length(1);
            }
            bar.println(line);
            bar.inc(1);
        } else if !self.quiet || record.status().is_failed() {
            self.emit(&line);
        }
    }

    /// `PASS name (12ms)`, with the cause for failures and skips
    #[must_use]
    pub fn status_line(&self, record: &TestRecord) -> String {
        let status = record.status();
        let label = self.paint(status.label(), |s| match status {
            TestStatus::Pass => s.green().bold(),
            TestStatus::Fail => s.red().bold(),
            TestStatus::Skip => s.yellow(),
        });
        let mut line = format!("{label} {} ({}ms)", record.name, record.duration_ms);
        if let Some(cause) = record.cause() {
            line.push_str("\n     ");
            line.push_str(cause);
        }
        line
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Informational line, hidden when quiet
    pub fn info(&self, message: &str) {
        if !self.quiet {
            let prefix = self.paint("INFO", |s| s.blue().bold());
            self.emit(&format!("{prefix} {message}"));
        }
    }

    /// Blank line and a title
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        self.emit("");
        if self.use_color {
            self.emit(&style(title).bold().underlined().to_string());
        } else {
            self.emit(&format!("=== {title} ==="));
        }
    }

    /// `PASSED 12 tests in 3.40s (...)`; printed when quiet only if
    /// something failed
    pub fn summary(&self, counts: Counts, elapsed: Duration) {
        if self.quiet && counts.failed == 0 {
            return;
        }
        self.emit("");
        self.emit(&self.summary_line(counts, elapsed));
    }

    #[must_use]
    pub fn summary_line(&self, counts: Counts, elapsed: Duration) -> String {
        let verdict = if counts.failed > 0 {
            self.paint("FAILED", |s| s.red().bold())
        } else {
            self.paint("PASSED", |s| s.green().bold())
        };
        let failed = if counts.failed > 0 {
            self.paint(counts.failed, |s| s.red().bold())
        } else {
            counts.failed.to_string()
        };
        format!(
            "{verdict} {} tests in {:.2}s ({} passed, {failed} failed, {} skipped, {:.1}% pass rate)",
            counts.total(),
            elapsed.as_secs_f64(),
            self.paint(counts.passed, |s| s.green().bold()),
            self.paint(counts.skipped, |s| s.yellow()),
            counts.pass_rate() * 100.0
        )
    }

    fn paint<D: std::fmt::Display>(
        &self,
        value: D,
        styler: impl FnOnce(StyledObject<D>) -> StyledObject<D>,
    ) -> String {
        if self.use_color {
            styler(style(value)).to_string()
        } else {
            value.to_string()
        }
    }

    fn emit(&self, line: &str) {
        let _ = self.term.write_line(line);
    }
}
