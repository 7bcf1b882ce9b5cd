//! Parameter sets for data-driven tests.
//!
//! A [`DataSource`] yields an ordered list of [`TestDataRow`]s for one named
//! set. Rows are independent; a test iteration consumes exactly one.

use crate::result::{E2eError, E2eResult};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One primitive value of a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DataValue {
    /// String cell
    Text(String),
    /// Boolean cell
    Flag(bool),
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

/// Ordered tuple of values for one test iteration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TestDataRow(Vec<DataValue>);

impl TestDataRow {
    /// Create a row from values
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = impl Into<DataValue>>) -> Self {
        Self(values.into_iter().map(Into::into).collect())
    }

    /// Number of values
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row holds no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All values
    #[must_use]
    pub fn values(&self) -> &[DataValue] {
        &self.0
    }

    /// Text at `index`; missing cells read as an empty string
    #[must_use]
    pub fn text(&self, index: usize) -> &str {
        match self.0.get(index) {
            Some(DataValue::Text(text)) => text,
            Some(DataValue::Flag(true)) => "true",
            Some(DataValue::Flag(false)) => "false",
            None => "",
        }
    }

    /// Boolean at `index`; text cells count as true when they read "true"
    #[must_use]
    pub fn flag(&self, index: usize) -> bool {
        match self.0.get(index) {
            Some(DataValue::Flag(flag)) => *flag,
            Some(DataValue::Text(text)) => text.trim().eq_ignore_ascii_case("true"),
            None => false,
        }
    }
}

impl fmt::Display for TestDataRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self
            .0
            .iter()
            .map(|v| match v {
                DataValue::Text(text) => format!("{text:?}"),
                DataValue::Flag(flag) => flag.to_string(),
            })
            .collect();
        write!(f, "[{}]", cells.join(", "))
    }
}

/// Supplies the rows of one named parameter set
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Name of the parameter set
    fn name(&self) -> &str;

    /// Produce every row, in order
    fn rows(&self) -> E2eResult<Vec<TestDataRow>>;
}

/// CSV file whose first row is a header
#[derive(Debug, Clone)]
pub struct TabularSource {
    name: String,
    path: PathBuf,
}

impl TabularSource {
    /// Create a source reading `path`
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// File backing the set
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for TabularSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn rows(&self) -> E2eResult<Vec<TestDataRow>> {
        let fail = |message: String| E2eError::data_source(&self.name, message);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_path(&self.path)
            .map_err(|e| fail(format!("{}: {e}", self.path.display())))?;

        let width = reader
            .headers()
            .map_err(|e| fail(format!("{}: {e}", self.path.display())))?
            .len();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record
                .map_err(|e| fail(format!("{} row {}: {e}", self.path.display(), index + 1)))?;
            let mut cells: Vec<DataValue> = record.iter().map(DataValue::from).collect();
            if cells.len() < width {
                cells.resize(width, DataValue::Text(String::new()));
            }
            rows.push(TestDataRow(cells));
        }

        tracing::debug!(set = %self.name, rows = rows.len(), "loaded tabular data");
        Ok(rows)
    }
}

/// Rows declared in code
#[derive(Debug, Clone)]
pub struct InlineSource {
    name: &'static str,
    rows: Vec<TestDataRow>,
}

impl InlineSource {
    /// Create an inline source
    #[must_use]
    pub const fn new(name: &'static str, rows: Vec<TestDataRow>) -> Self {
        Self { name, rows }
    }
}

impl DataSource for InlineSource {
    fn name(&self) -> &str {
        self.name
    }

    fn rows(&self) -> E2eResult<Vec<TestDataRow>> {
        Ok(self.rows.clone())
    }
}

// =============================================================================
// NAMED SETS
// =============================================================================

/// email, password, expected ("true" / "false")
pub const LOGIN_DATA: &str = "LoginData";
/// full name, email, password, expected ("true" / "false")
pub const SIGNUP_DATA: &str = "SignupData";
/// email, password
pub const INVALID_LOGIN_DATA: &str = "InvalidLoginData";
/// email, password, name, role
pub const VALID_CREDENTIALS: &str = "ValidCredentials";
/// password, valid, description
pub const PASSWORD_VALIDATION: &str = "PasswordValidation";
/// email, valid, reason
pub const EMAIL_VALIDATION: &str = "EmailValidation";
/// name, email, password, instrument, level, valid
pub const STUDENT_INVITE_DATA: &str = "StudentInviteData";

/// Every set name, tabular ones first
pub const DATA_SETS: [&str; 7] = [
    LOGIN_DATA,
    SIGNUP_DATA,
    INVALID_LOGIN_DATA,
    VALID_CREDENTIALS,
    PASSWORD_VALIDATION,
    EMAIL_VALIDATION,
    STUDENT_INVITE_DATA,
];

/// Resolve a set name to its source; tabular sets read from `data_dir`
pub fn source(name: &str, data_dir: &Path) -> E2eResult<Box<dyn DataSource>> {
    let tabular = |file: &str| -> Box<dyn DataSource> {
        Box::new(TabularSource::new(name, data_dir.join(file)))
    };
    Ok(match name {
        LOGIN_DATA => tabular("login_data.csv"),
        SIGNUP_DATA => tabular("signup_data.csv"),
        INVALID_LOGIN_DATA => tabular("invalid_login_data.csv"),
        VALID_CREDENTIALS => Box::new(InlineSource::new(VALID_CREDENTIALS, valid_credentials())),
        PASSWORD_VALIDATION => Box::new(InlineSource::new(
            PASSWORD_VALIDATION,
            password_validation(),
        )),
        EMAIL_VALIDATION => Box::new(InlineSource::new(EMAIL_VALIDATION, email_validation())),
        STUDENT_INVITE_DATA => Box::new(InlineSource::new(
            STUDENT_INVITE_DATA,
            student_invite_data(),
        )),
        other => {
            return Err(E2eError::data_source(
                other,
                format!("unknown data set (known: {})", DATA_SETS.join(", ")),
            ))
        }
    })
}

fn valid_credentials() -> Vec<TestDataRow> {
    vec![
        TestDataRow::new(["teacher@musiclms.test", "SecurePass123!", "Test Teacher", "teacher"]),
        TestDataRow::new(["student@musiclms.test", "SecurePass456!", "Test Student", "student"]),
    ]
}

fn password_validation() -> Vec<TestDataRow> {
    [
        ("12345", false, "Too short (less than 6 chars)"),
        ("123456", true, "Minimum length (6 chars)"),
        ("password", true, "Valid length, no special chars"),
        ("P@ssw0rd!", true, "Strong password"),
        ("", false, "Empty password"),
        ("   ", false, "Whitespace only"),
    ]
    .into_iter()
    .map(|(password, valid, description)| {
        TestDataRow(vec![password.into(), valid.into(), description.into()])
    })
    .collect()
}

fn email_validation() -> Vec<TestDataRow> {
    [
        ("user@domain.com", true, "Valid email"),
        ("user.name@domain.com", true, "Email with dot in local part"),
        ("user@sub.domain.com", true, "Email with subdomain"),
        ("invalid-email", false, "Missing @ and domain"),
        ("@domain.com", false, "Missing local part"),
        ("user@", false, "Missing domain"),
        ("", false, "Empty email"),
        ("user@domain", false, "Missing TLD"),
    ]
    .into_iter()
    .map(|(email, valid, reason)| {
        TestDataRow(vec![email.into(), valid.into(), reason.into()])
    })
    .collect()
}

fn student_invite_data() -> Vec<TestDataRow> {
    [
        ("Alice Johnson", "alice@test.com", "Pass123!", "Piano", "Beginner"),
        ("Bob Williams", "bob@test.com", "Pass456!", "Guitar", "Intermediate"),
        ("Carol Davis", "carol@test.com", "Pass789!", "Violin", "Advanced"),
    ]
    .into_iter()
    .map(|(name, email, password, instrument, level)| {
        TestDataRow(vec![
            name.into(),
            email.into(),
            password.into(),
            instrument.into(),
            level.into(),
            true.into(),
        ])
    })
    .collect()
}
