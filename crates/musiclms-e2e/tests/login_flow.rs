//! Runs the login class end to end against a scripted in-memory application.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use musiclms_e2e::driver::{MockDriver, MockElement, Reaction};
use musiclms_e2e::suites::{data_driven, login};
use musiclms_e2e::{
    DashboardPage, E2eError, E2eResult, Launcher, Locator, LoginPage, PageObject, SharedDriver,
    SignupPage, SuiteConfig, SuiteRunner, TestStatus,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const APP: &str = "http://mock.test";
const EMAIL: &str = "teacher@musiclms.test";
const PASSWORD: &str = "SecurePass123!";

fn element<P: PageObject>(name: &str) -> Locator {
    P::locator(name)
        .unwrap_or_else(|| panic!("{} has no element {name}", P::NAME))
        .clone()
}

/// Login, signup and dashboard screens wired together by click reactions
fn mock_app() -> MockDriver {
    let error = element::<LoginPage>("error_message");
    let rejected = Reaction::Show(
        error.clone(),
        MockElement::visible().with_text("Invalid login credentials"),
    );
    let submit = Reaction::when(
        element::<LoginPage>("email"),
        EMAIL,
        Reaction::when(
            element::<LoginPage>("password"),
            PASSWORD,
            Reaction::Navigate(format!("{APP}/dashboard")),
            rejected.clone(),
        ),
        rejected,
    );

    MockDriver::new()
        .with_page(
            "/login",
            "MusicLMS",
            [
                (element::<LoginPage>("heading"), MockElement::visible().with_text("Welcome back")),
                (element::<LoginPage>("email"), MockElement::visible()),
                (element::<LoginPage>("password"), MockElement::visible()),
                (element::<LoginPage>("login_button"), MockElement::visible()),
                (element::<LoginPage>("sign_up_link"), MockElement::visible()),
            ],
        )
        .with_page(
            "/signup",
            "MusicLMS",
            [(element::<SignupPage>("heading"), MockElement::visible())],
        )
        .with_page(
            "/dashboard",
            "MusicLMS",
            [(element::<DashboardPage>("heading"), MockElement::visible())],
        )
        .on_click(element::<LoginPage>("login_button"), submit)
        .on_click(
            element::<LoginPage>("sign_up_link"),
            Reaction::Navigate(format!("{APP}/signup")),
        )
}

#[derive(Debug, Default)]
struct MockAppLauncher {
    sessions: Mutex<Vec<Arc<MockDriver>>>,
    /// What `checkValidity()` answers in every launched session
    email_valid: Option<bool>,
}

#[async_trait]
impl Launcher for MockAppLauncher {
    async fn launch(&self, _config: &SuiteConfig) -> E2eResult<SharedDriver> {
        let mut app = mock_app();
        if let Some(valid) = self.email_valid {
            app = app.with_script_result("checkValidity", serde_json::json!(valid));
        }
        let driver = Arc::new(app);
        self.sessions.lock().unwrap().push(driver.clone());
        Ok(driver)
    }
}

fn config(dir: &TempDir) -> SuiteConfig {
    SuiteConfig::new(APP)
        .with_reports_dir(dir.path().join("reports"))
        .with_screenshots_dir(dir.path().join("screenshots"))
        .with_wait(300, 10)
}

#[tokio::test]
async fn test_login_class_passes_against_mock_app() {
    let dir = TempDir::new().unwrap();
    let launcher = Arc::new(MockAppLauncher::default());
    let runner = SuiteRunner::new(config(&dir), launcher.clone()).unwrap();

    let outcome = runner.run(&[login::class()]).await.unwrap();

    let failures: Vec<_> = outcome
        .records
        .iter()
        .filter(|r| r.status().is_failed())
        .map(|r| format!("{}: {:?}", r.name, r.cause()))
        .collect();
    assert!(failures.is_empty(), "{failures:?}");
    assert_eq!(outcome.counts.passed, 7);
    assert!(outcome.all_passed());

    let sessions = launcher.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].call_count("quit"), 1);
    assert!(!sessions[0].was_called("screenshot"));
}

#[tokio::test]
async fn test_wrong_password_fails_with_one_screenshot() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir);
    config.test_password = "NotTheRightOne1!".to_string();
    let runner = SuiteRunner::new(config, Arc::new(MockAppLauncher::default()))
        .unwrap()
        .with_selection(musiclms_e2e::Selection::all().with_filter("TC_Auth_002"));

    let outcome = runner.run(&[login::class()]).await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(record.status(), TestStatus::Fail);
    assert!(record.cause().unwrap().contains("Login should redirect to dashboard"));
    let shot = record.screenshot().unwrap();
    assert!(shot.exists());
    assert_eq!(
        std::fs::read_dir(dir.path().join("screenshots")).unwrap().count(),
        1
    );

    let html = std::fs::read_to_string(&outcome.files.html).unwrap();
    assert!(html.contains("TC_Auth_002 verify_valid_login"));
    assert!(html.contains("data:image/png;base64,"));
    let junit = std::fs::read_to_string(&outcome.files.junit).unwrap();
    assert!(junit.contains("failures=\"1\""));
}

#[tokio::test]
async fn test_unsupported_browser_rejected_before_launch() {
    let dir = TempDir::new().unwrap();
    let launcher = Arc::new(MockAppLauncher::default());
    let err = SuiteRunner::new(config(&dir).with_browser("safari"), launcher.clone()).unwrap_err();

    assert!(matches!(err, E2eError::Configuration { .. }));
    assert!(err.to_string().contains("Browser not supported: safari"));
    assert!(launcher.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_email_validation_checks_login_form() {
    let dir = TempDir::new().unwrap();
    let launcher = Arc::new(MockAppLauncher {
        email_valid: Some(false),
        ..MockAppLauncher::default()
    });
    let runner = SuiteRunner::new(config(&dir), launcher.clone())
        .unwrap()
        .with_selection(musiclms_e2e::Selection::all().with_filter("TC_Auth_DDT_003"));

    let outcome = runner.run(&[data_driven::class()]).await.unwrap();

    assert_eq!(outcome.records.len(), 8);
    assert_eq!(outcome.counts.passed, 5);
    assert_eq!(outcome.counts.failed, 3);
    let first = &outcome.records[0];
    assert_eq!(first.status(), TestStatus::Fail);
    assert!(first
        .cause()
        .unwrap()
        .contains("Email validation mismatch for 'user@domain.com' (Valid email)"));
    let last = &outcome.records[7];
    assert_eq!(last.status(), TestStatus::Pass);
    assert!(last.logs.iter().any(|log| log.message.contains("Missing TLD")));

    let sessions = launcher.sessions.lock().unwrap();
    let history = sessions[0].history();
    assert!(history.iter().any(|call| call == &format!("navigate:{APP}/login")));
    assert!(!history.iter().any(|call| call.contains("/signup")));
}
