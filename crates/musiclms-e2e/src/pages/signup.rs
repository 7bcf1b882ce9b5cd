//! Signup screen (`/signup`).

use super::PageObject;
use crate::interact::Interactor;
use crate::locator::Locator;
use crate::result::E2eResult;

const FULL_NAME: Locator = Locator::id("fullName");
const EMAIL: Locator = Locator::id("email");
const PASSWORD: Locator = Locator::id("password");
const CREATE_ACCOUNT_BUTTON: Locator =
    Locator::xpath("//button[contains(text(),'Create Account')]");
const GOOGLE_BUTTON: Locator = Locator::xpath("//button[contains(text(),'Continue with Google')]");
const LOGIN_LINK: Locator = Locator::xpath("//a[contains(text(),'Log in')]");
const HEADING: Locator = Locator::xpath("//h2[contains(text(),'Create your account')]");
const TERMS_TEXT: Locator = Locator::xpath("//p[contains(text(),'Terms of Service')]");

/// Page object for teacher self-registration
#[derive(Debug, Clone)]
pub struct SignupPage {
    ui: Interactor,
    base_url: String,
}

impl PageObject for SignupPage {
    const NAME: &'static str = "Signup";
    const PATH: &'static str = "/signup";
    const ELEMENTS: &'static [(&'static str, Locator)] = &[
        ("full_name", FULL_NAME),
        ("email", EMAIL),
        ("password", PASSWORD),
        ("create_account_button", CREATE_ACCOUNT_BUTTON),
        ("google_button", GOOGLE_BUTTON),
        ("login_link", LOGIN_LINK),
        ("heading", HEADING),
        ("terms_text", TERMS_TEXT),
    ];

    fn ui(&self) -> &Interactor {
        &self.ui
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SignupPage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(ui: Interactor, base_url: impl Into<String>) -> Self {
        Self {
            ui,
            base_url: base_url.into(),
        }
    }

    pub async fn enter_full_name(&self, name: &str) -> E2eResult<&Self> {
        self.ui.type_text(&FULL_NAME, name).await?;
        Ok(self)
    }

    pub async fn enter_email(&self, email: &str) -> E2eResult<&Self> {
        self.ui.type_text(&EMAIL, email).await?;
        Ok(self)
    }

    pub async fn enter_password(&self, password: &str) -> E2eResult<&Self> {
        self.ui.type_text(&PASSWORD, password).await?;
        Ok(self)
    }

    pub async fn click_create_account(&self) -> E2eResult<&Self> {
        self.ui.click(&CREATE_ACCOUNT_BUTTON).await?;
        Ok(self)
    }

    pub async fn click_google_signup(&self) -> E2eResult<&Self> {
        self.ui.click(&GOOGLE_BUTTON).await?;
        Ok(self)
    }

    pub async fn click_login_link(&self) -> E2eResult<&Self> {
        self.ui.click(&LOGIN_LINK).await?;
        Ok(self)
    }

    /// Fill the form and submit
    pub async fn signup(&self, full_name: &str, email: &str, password: &str) -> E2eResult<&Self> {
        self.enter_full_name(full_name)
            .await?
            .enter_email(email)
            .await?
            .enter_password(password)
            .await?
            .click_create_account()
            .await
    }

    /// Sign up with `teacher_<millis>@test.com` and return that address
    pub async fn signup_with_random_email(
        &self,
        full_name: &str,
        password: &str,
    ) -> E2eResult<String> {
        let email = format!("teacher_{}@test.com", chrono::Utc::now().timestamp_millis());
        self.signup(full_name, &email, password).await?;
        Ok(email)
    }

    /// Heading "Create your account" is shown
    pub async fn is_page_displayed(&self) -> bool {
        self.ui.appears(&HEADING).await
    }

    pub async fn is_create_account_button_enabled(&self) -> bool {
        self.ui.is_enabled(&CREATE_ACCOUNT_BUTTON).await
    }

    pub async fn is_terms_text_displayed(&self) -> bool {
        self.ui.is_displayed(&TERMS_TEXT).await
    }

    pub async fn email_value(&self) -> String {
        self.ui.value_of(&EMAIL).await
    }

    pub async fn full_name_value(&self) -> String {
        self.ui.value_of(&FULL_NAME).await
    }
}
