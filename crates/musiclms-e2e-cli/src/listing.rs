//! Text and JSON renderings for the `list`, `pages` and `data` commands

use crate::error::CliResult;
use crate::output::OutputFormat;
use musiclms_e2e::data;
use musiclms_e2e::pages::inventory;
use musiclms_e2e::{Selection, TestClass};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseEntry<'a> {
    class: &'a str,
    id: &'a str,
    name: &'a str,
    description: &'a str,
    groups: &'a [&'a str],
    priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_set: Option<&'a str>,
}

/// Selected cases of `classes`, in run order
pub fn render_cases(
    classes: &[TestClass],
    selection: &Selection,
    format: OutputFormat,
) -> CliResult<String> {
    let selected: Vec<TestClass> = classes
        .iter()
        .filter_map(|class| class.select(selection))
        .collect();

    if format == OutputFormat::Json {
        let entries: Vec<CaseEntry<'_>> = selected
            .iter()
            .flat_map(|class| {
                class.cases.iter().map(|case| CaseEntry {
                    class: class.name,
                    id: case.id,
                    name: case.name,
                    description: case.description,
                    groups: case.groups,
                    priority: case.priority,
                    data_set: case.data_set,
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&entries)?);
    }

    let mut out = String::new();
    let mut total = 0;
    for class in &selected {
        let _ = writeln!(out, "{}", class.name);
        for case in &class.cases {
            total += 1;
            let data = case
                .data_set
                .map(|set| format!(" <{set}>"))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<16} {:<40} [{}]{data}",
                case.id,
                case.name,
                case.groups.join(", ")
            );
        }
    }
    let _ = writeln!(out, "{total} test(s)");
    Ok(out)
}

/// Locator inventory of every page object
#[must_use]
pub fn render_pages() -> String {
    let mut out = String::new();
    for page in inventory() {
        let _ = writeln!(out, "{} ({})", page.name, page.path);
        for (name, locator) in page.elements {
            let _ = writeln!(out, "  {name:<28} {locator}");
        }
    }
    out
}

/// Rows of the data set `set`
pub fn render_data(set: &str, data_dir: &Path, format: OutputFormat) -> CliResult<String> {
    let rows = data::source(set, data_dir)?.rows()?;
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&rows)?);
    }

    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        let _ = writeln!(out, "{:>3}  {row}", index + 1);
    }
    let _ = writeln!(out, "{} row(s) in {set}", rows.len());
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use musiclms_e2e::suites;
    use tempfile::TempDir;

    #[test]
    fn test_cases_text_respects_groups() {
        let sel = Selection::all().with_groups(["dataDriven"]);
        let text = render_cases(&suites::catalog(), &sel, OutputFormat::Text).unwrap();
        assert!(text.contains("DataDrivenTests"));
        assert!(text.contains("TC_Auth_DDT_001"));
        assert!(text.contains("<LoginData>"));
        assert!(!text.contains("LoginTests\n"));
        assert!(text.ends_with("3 test(s)\n"));
    }

    #[test]
    fn test_cases_json() {
        let sel = Selection::all().with_filter("TC_Auth_015");
        let json = render_cases(&suites::catalog(), &sel, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["class"], "SignupTests");
        assert_eq!(value[0]["priority"], 8);
        assert!(value[0].get("dataSet").is_none());
    }

    #[test]
    fn test_pages_lists_every_page() {
        let text = render_pages();
        for page in ["Login (/login)", "Signup (/signup)", "Dashboard (/dashboard)", "Invite (/invite)"] {
            assert!(text.contains(page), "{page}");
        }
        assert!(text.contains("id=email"));
    }

    #[test]
    fn test_inline_data() {
        let text = render_data("EmailValidation", Path::new("unused"), OutputFormat::Text).unwrap();
        assert!(text.contains("[\"user@domain.com\", true, \"Valid email\"]"));
        assert!(text.ends_with("8 row(s) in EmailValidation\n"));
    }

    #[test]
    fn test_tabular_data_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("login_data.csv"),
            "Email,Password,Expected\na@b.test,pw,true\n",
        )
        .unwrap();
        let json = render_data("LoginData", dir.path(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!([["a@b.test", "pw", "true"]]));
    }

    #[test]
    fn test_unknown_set() {
        let err = render_data("Nope", Path::new("."), OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("unknown data set"));
    }
}
