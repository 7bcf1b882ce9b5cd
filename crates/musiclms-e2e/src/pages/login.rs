//! Login screen (`/login`).

use super::PageObject;
use crate::interact::Interactor;
use crate::locator::Locator;
use crate::result::E2eResult;
use tracing::info;

const EMAIL: Locator = Locator::id("email");
const PASSWORD: Locator = Locator::id("password");
const LOGIN_BUTTON: Locator = Locator::xpath("//button[contains(text(),'Log in')]");
const GOOGLE_BUTTON: Locator = Locator::xpath("//button[contains(text(),'Continue with Google')]");
const MAGIC_LINK_BUTTON: Locator = Locator::xpath("//button[contains(text(),'magic link')]");
const SIGN_UP_LINK: Locator = Locator::xpath("//a[contains(text(),'Sign up')]");
const ERROR_MESSAGE: Locator = Locator::css(".text-destructive");
const HEADING: Locator = Locator::xpath("//h2[contains(text(),'Welcome back')]");

/// HTML5 constraint check of the email input
const EMAIL_VALID_SCRIPT: &str = "return arguments[0].checkValidity();";

/// Page object for the login form
#[derive(Debug, Clone)]
pub struct LoginPage {
    ui: Interactor,
    base_url: String,
}

impl PageObject for LoginPage {
    const NAME: &'static str = "Login";
    const PATH: &'static str = "/login";
    const ELEMENTS: &'static [(&'static str, Locator)] = &[
        ("email", EMAIL),
        ("password", PASSWORD),
        ("login_button", LOGIN_BUTTON),
        ("google_button", GOOGLE_BUTTON),
        ("magic_link_button", MAGIC_LINK_BUTTON),
        ("sign_up_link", SIGN_UP_LINK),
        ("error_message", ERROR_MESSAGE),
        ("heading", HEADING),
    ];

    fn ui(&self) -> &Interactor {
        &self.ui
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl LoginPage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(ui: Interactor, base_url: impl Into<String>) -> Self {
        Self {
            ui,
            base_url: base_url.into(),
        }
    }

    pub async fn enter_email(&self, email: &str) -> E2eResult<&Self> {
        self.ui.type_text(&EMAIL, email).await?;
        Ok(self)
    }

    pub async fn enter_password(&self, password: &str) -> E2eResult<&Self> {
        self.ui.type_text(&PASSWORD, password).await?;
        Ok(self)
    }

    pub async fn click_login(&self) -> E2eResult<&Self> {
        self.ui.click(&LOGIN_BUTTON).await?;
        Ok(self)
    }

    pub async fn click_google_login(&self) -> E2eResult<&Self> {
        self.ui.click(&GOOGLE_BUTTON).await?;
        Ok(self)
    }

    pub async fn click_magic_link(&self) -> E2eResult<&Self> {
        self.ui.click(&MAGIC_LINK_BUTTON).await?;
        Ok(self)
    }

    pub async fn click_sign_up_link(&self) -> E2eResult<&Self> {
        self.ui.click(&SIGN_UP_LINK).await?;
        Ok(self)
    }

    /// Fill both fields and submit
    pub async fn login(&self, email: &str, password: &str) -> E2eResult<&Self> {
        info!(email, "logging in");
        self.enter_email(email)
            .await?
            .enter_password(password)
            .await?
            .click_login()
            .await
    }

    /// Log in, then wait for the dashboard URL; `false` if it never appears
    pub async fn login_and_verify(&self, email: &str, password: &str) -> E2eResult<bool> {
        self.login(email, password).await?;
        Ok(self.ui.wait_for_url("/dashboard").await)
    }

    /// Heading "Welcome back" is shown
    pub async fn is_page_displayed(&self) -> bool {
        self.ui.appears(&HEADING).await
    }

    pub async fn is_error_message_displayed(&self) -> bool {
        self.ui.is_displayed(&ERROR_MESSAGE).await
    }

    /// Error banner text, empty when there is none
    pub async fn error_message_text(&self) -> String {
        self.ui.text_of(&ERROR_MESSAGE).await
    }

    pub async fn is_email_field_empty(&self) -> bool {
        self.ui.is_displayed(&EMAIL).await && self.ui.value_of(&EMAIL).await.is_empty()
    }

    pub async fn is_login_button_enabled(&self) -> bool {
        self.ui.is_enabled(&LOGIN_BUTTON).await
    }

    /// Browser-side `checkValidity()` of the email input; `None` when the
    /// script fails or returns something other than a boolean
    pub async fn is_email_valid(&self) -> Option<bool> {
        self.ui
            .script_on(EMAIL_VALID_SCRIPT, &EMAIL)
            .await
            .ok()
            .and_then(|v| v.as_bool())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{Driver, MockDriver, MockElement};
    use crate::wait::WaitOptions;
    use std::sync::Arc;

    fn page(mock: MockDriver) -> (Arc<MockDriver>, LoginPage) {
        let mock = Arc::new(mock);
        let options = WaitOptions::new().with_timeout(200).with_poll_interval(10);
        let ui = Interactor::new(mock.clone(), options);
        (mock, LoginPage::new(ui, "http://app"))
    }

    #[tokio::test]
    async fn test_email_validity_runs_on_login_email() {
        let mock = MockDriver::new()
            .with_page("/login", "", [(EMAIL, MockElement::visible())])
            .with_script_result("checkValidity", serde_json::json!(false));
        let (mock, login) = page(mock);
        login.open().await.unwrap();
        login.enter_email("user@domain").await.unwrap();

        assert_eq!(login.is_email_valid().await, Some(false));
        assert!(mock
            .history()
            .iter()
            .any(|call| call == &format!("script:{EMAIL_VALID_SCRIPT}")));
        assert_eq!(mock.current_url().await.unwrap(), "http://app/login");
    }

    #[tokio::test]
    async fn test_email_validity_unknown_without_input() {
        let mock = MockDriver::new().with_script_result("checkValidity", serde_json::json!(true));
        let (_mock, login) = page(mock);
        assert_eq!(login.is_email_valid().await, None);
    }
}
