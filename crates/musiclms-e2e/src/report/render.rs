//! HTML, JSON and JUnit renderings of a finished run.

use super::{Counts, ReportSink, SystemInfo, TestRecord, TestStatus, REPORT_NAME, REPORT_TITLE};
use crate::result::E2eResult;
use base64::Engine;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// JSON summary document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDocument<'a> {
    run_id: String,
    title: &'static str,
    name: &'static str,
    system_info: &'a SystemInfo,
    started_at: Option<DateTime<Local>>,
    finished_at: Option<DateTime<Local>>,
    duration_ms: u64,
    counts: Counts,
    tests: Vec<&'a TestRecord>,
}

impl ReportSink {
    /// Render the JSON summary
    ///
    /// # Errors
    ///
    /// Returns a JSON error if serialization fails
    pub fn render_json(&self) -> E2eResult<String> {
        let document = SummaryDocument {
            run_id: self.run_id.to_string(),
            title: REPORT_TITLE,
            name: REPORT_NAME,
            system_info: &self.info,
            started_at: self.started_at,
            finished_at: self.finished_at,
            duration_ms: self.elapsed_ms(),
            counts: self.counts(),
            tests: self.records().collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Render HTML report content
    #[must_use]
    pub fn render_html(&self) -> String {
        let counts = self.counts();
        let mut html = String::new();

        // Header
        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{REPORT_TITLE}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }}
        .summary {{ background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }}
        .progress-bar {{ background: #ddd; height: 20px; border-radius: 10px; overflow: hidden; }}
        .passed {{ background: #4caf50; height: 100%; }}
        .system-info td {{ padding: 2px 12px 2px 0; }}
        .test {{ padding: 10px; margin: 5px 0; border-radius: 4px; }}
        .test.pass {{ background: #e8f5e9; border-left: 4px solid #4caf50; }}
        .test.fail {{ background: #ffebee; border-left: 4px solid #f44336; }}
        .test.skip {{ background: #fff3e0; border-left: 4px solid #ff9800; }}
        .meta {{ color: #666; font-size: 0.9em; }}
        .log {{ font-family: monospace; font-size: 0.9em; margin: 6px 0; }}
        .log .warning {{ color: #e65100; }}
        .error {{ color: #d32f2f; font-family: monospace; white-space: pre-wrap; }}
        .screenshot img {{ max-width: 640px; border: 1px solid #ddd; margin-top: 8px; }}
    </style>
</head>
<body>
"#
        );

        // Summary
        let _ = write!(
            html,
            r#"<div class="summary">
    <h1>{REPORT_NAME}</h1>
    <h2>Results: {}/{} passed ({:.1}%), {} failed, {} skipped</h2>
    <div class="progress-bar">
        <div class="passed" style="width: {:.1}%"></div>
    </div>
    <p>Duration: {:.2}s</p>
    <table class="system-info">
"#,
            counts.passed,
            counts.total(),
            counts.pass_rate() * 100.0,
            counts.failed,
            counts.skipped,
            counts.pass_rate() * 100.0,
            self.elapsed_ms() as f64 / 1000.0,
        );
        for (label, value) in self.info.rows() {
            let _ = writeln!(
                html,
                "        <tr><td><strong>{label}</strong></td><td>{}</td></tr>",
                escape_html(value)
            );
        }
        html.push_str("    </table>\n</div>\n");

        // Test results
        html.push_str("<h2>Test Results</h2>\n");
        for record in self.records() {
            self.render_record(&mut html, record);
        }

        // Footer
        let _ = write!(
            html,
            r#"
<footer>
    <p>Run {}</p>
</footer>
</body>
</html>
"#,
            self.run_id
        );

        html
    }

    fn render_record(&self, html: &mut String, record: &TestRecord) {
        let class = match record.status() {
            TestStatus::Pass => "pass",
            TestStatus::Fail => "fail",
            TestStatus::Skip => "skip",
        };

        let _ = write!(
            html,
            r#"<div class="test {class}">
    <strong>{}</strong> - {} ({} ms)
    <div class="meta">{} &middot; {} &middot; {}</div>
"#,
            escape_html(&record.name),
            record.status(),
            record.duration_ms,
            escape_html(&record.class),
            escape_html(&record.groups.join(", ")),
            record.worker,
        );
        if !record.description.is_empty() {
            let _ = writeln!(html, "    <p>{}</p>", escape_html(&record.description));
        }

        html.push_str("    <div class=\"log\">\n");
        for entry in &record.logs {
            let _ = writeln!(
                html,
                r#"        <div class="{}">{} [{}] {}</div>"#,
                entry.level.label().to_ascii_lowercase(),
                entry.at.format("%H:%M:%S"),
                entry.level.label(),
                escape_html(&entry.message)
            );
        }
        html.push_str("    </div>\n");

        if record.status().is_failed() {
            if let Some(cause) = record.cause() {
                let _ = writeln!(html, r#"    <div class="error">{}</div>"#, escape_html(cause));
            }
        }

        if let Some(path) = record.screenshot() {
            let _ = writeln!(
                html,
                r#"    <div class="screenshot"><img alt="{}" src="{}"></div>"#,
                escape_html(&record.name),
                self.screenshot_src(path)
            );
        }

        html.push_str("</div>\n");
    }

    /// Data URI when embedding, otherwise the file path
    fn screenshot_src(&self, path: &Path) -> String {
        if self.embed_screenshots {
            if let Ok(bytes) = std::fs::read(path) {
                return format!(
                    "data:image/png;base64,{}",
                    base64::engine::general_purpose::STANDARD.encode(bytes)
                );
            }
        }
        let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        escape_html(&absolute.display().to_string())
    }

    /// Render JUnit XML content
    #[must_use]
    pub fn render_junit(&self) -> String {
        let counts = self.counts();
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        let _ = writeln!(
            xml,
            r#"<testsuite name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
            escape_html(REPORT_NAME),
            counts.total(),
            counts.failed,
            counts.skipped,
            self.elapsed_ms() as f64 / 1000.0
        );

        for record in self.records() {
            let _ = writeln!(
                xml,
                r#"  <testcase classname="{}" name="{}" time="{:.3}">"#,
                escape_html(&record.class),
                escape_html(&record.name),
                record.duration_ms as f64 / 1000.0
            );
            match record.status() {
                TestStatus::Fail => {
                    let cause = escape_html(record.cause().unwrap_or_default());
                    let _ = writeln!(xml, r#"    <failure message="{cause}">{cause}</failure>"#);
                }
                TestStatus::Skip => {
                    let _ = writeln!(
                        xml,
                        r#"    <skipped message="{}"/>"#,
                        escape_html(record.cause().unwrap_or_default())
                    );
                }
                TestStatus::Pass => {}
            }
            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }
}

/// Escape HTML/XML special characters
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
