//! Student invite acceptance (`/invite/<token>`).
//!
//! The route renders one of three states: the registration form, an
//! "Invalid Invite" notice, or an "Already Logged In" notice when a session
//! exists. Instrument and skill level are custom dropdowns.

use super::{join_url, PageObject};
use crate::interact::Interactor;
use crate::locator::Locator;
use crate::result::E2eResult;
use tracing::debug;

const FULL_NAME: Locator = Locator::id("fullName");
const EMAIL: Locator = Locator::id("email");
const PASSWORD: Locator = Locator::id("password");
const INSTRUMENT_TRIGGER: Locator = Locator::xpath(
    "//label[contains(text(),'Primary Instrument')]/following-sibling::button[@role='combobox']",
);
const INSTRUMENT_VALUE: Locator = Locator::xpath(
    "//label[contains(text(),'Primary Instrument')]/following-sibling::button[@role='combobox']/span",
);
const SKILL_LEVEL_TRIGGER: Locator = Locator::xpath(
    "//label[contains(text(),'Skill Level')]/following-sibling::button[@role='combobox']",
);
const SKILL_LEVEL_VALUE: Locator = Locator::xpath(
    "//label[contains(text(),'Skill Level')]/following-sibling::button[@role='combobox']/span",
);
const CREATE_ACCOUNT_BUTTON: Locator =
    Locator::xpath("//button[contains(text(),'Create Student Account')]");
const LOGIN_LINK: Locator = Locator::xpath("//a[contains(text(),'Log in')]");
const JOIN_HEADING: Locator = Locator::xpath("//h2[contains(text(),'Join as a Student')]");
const INVALID_HEADING: Locator = Locator::xpath("//h2[contains(text(),'Invalid Invite')]");
const INVALID_MESSAGE: Locator = Locator::xpath("//p[contains(text(),'invalid or has expired')]");
const GO_HOME_BUTTON: Locator = Locator::xpath("//button[contains(text(),'Go to Homepage')]");
const ALREADY_LOGGED_IN_HEADING: Locator =
    Locator::xpath("//h2[contains(text(),'Already Logged In')]");
const LOGOUT_AND_ACCEPT_BUTTON: Locator =
    Locator::xpath("//button[contains(text(),'Log Out & Accept Invite')]");
const GO_TO_DASHBOARD_BUTTON: Locator =
    Locator::xpath("//button[contains(text(),'Go to Dashboard')]");

/// Page object for the student invite flow
#[derive(Debug, Clone)]
pub struct InvitePage {
    ui: Interactor,
    base_url: String,
}

impl PageObject for InvitePage {
    const NAME: &'static str = "Invite";
    const PATH: &'static str = "/invite";
    const ELEMENTS: &'static [(&'static str, Locator)] = &[
        ("full_name", FULL_NAME),
        ("email", EMAIL),
        ("password", PASSWORD),
        ("instrument_trigger", INSTRUMENT_TRIGGER),
        ("instrument_value", INSTRUMENT_VALUE),
        ("skill_level_trigger", SKILL_LEVEL_TRIGGER),
        ("skill_level_value", SKILL_LEVEL_VALUE),
        ("create_account_button", CREATE_ACCOUNT_BUTTON),
        ("login_link", LOGIN_LINK),
        ("join_heading", JOIN_HEADING),
        ("invalid_heading", INVALID_HEADING),
        ("invalid_message", INVALID_MESSAGE),
        ("go_home_button", GO_HOME_BUTTON),
        ("already_logged_in_heading", ALREADY_LOGGED_IN_HEADING),
        ("logout_and_accept_button", LOGOUT_AND_ACCEPT_BUTTON),
        ("go_to_dashboard_button", GO_TO_DASHBOARD_BUTTON),
    ];

    fn ui(&self) -> &Interactor {
        &self.ui
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl InvitePage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(ui: Interactor, base_url: impl Into<String>) -> Self {
        Self {
            ui,
            base_url: base_url.into(),
        }
    }

    /// Navigate to the invite identified by `token`
    pub async fn open_token(&self, token: &str) -> E2eResult<&Self> {
        let url = join_url(&join_url(&self.base_url, Self::PATH), token);
        self.ui.open(&url).await?;
        Ok(self)
    }

    pub async fn enter_full_name(&self, name: &str) -> E2eResult<&Self> {
        self.ui.type_text(&FULL_NAME, name).await?;
        Ok(self)
    }

    /// Type the email unless the invite locked it to a pre-filled address
    pub async fn enter_email(&self, email: &str) -> E2eResult<&Self> {
        if self.ui.is_enabled(&EMAIL).await {
            self.ui.type_text(&EMAIL, email).await?;
        } else {
            debug!("email field locked by invite, keeping pre-filled value");
        }
        Ok(self)
    }

    pub async fn enter_password(&self, password: &str) -> E2eResult<&Self> {
        self.ui.type_text(&PASSWORD, password).await?;
        Ok(self)
    }

    pub async fn select_instrument(&self, instrument: &str) -> E2eResult<&Self> {
        self.ui.select_option(&INSTRUMENT_TRIGGER, instrument).await?;
        Ok(self)
    }

    pub async fn select_skill_level(&self, level: &str) -> E2eResult<&Self> {
        self.ui.select_option(&SKILL_LEVEL_TRIGGER, level).await?;
        Ok(self)
    }

    pub async fn click_create_account(&self) -> E2eResult<&Self> {
        self.ui.click(&CREATE_ACCOUNT_BUTTON).await?;
        Ok(self)
    }

    pub async fn click_login_link(&self) -> E2eResult<&Self> {
        self.ui.click(&LOGIN_LINK).await?;
        Ok(self)
    }

    pub async fn click_go_to_homepage(&self) -> E2eResult<&Self> {
        self.ui.click(&GO_HOME_BUTTON).await?;
        Ok(self)
    }

    pub async fn click_logout_and_accept(&self) -> E2eResult<&Self> {
        self.ui.click(&LOGOUT_AND_ACCEPT_BUTTON).await?;
        Ok(self)
    }

    pub async fn click_go_to_dashboard(&self) -> E2eResult<&Self> {
        self.ui.click(&GO_TO_DASHBOARD_BUTTON).await?;
        Ok(self)
    }

    /// Fill the whole registration form and submit
    pub async fn register_as_student(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        instrument: &str,
        skill_level: &str,
    ) -> E2eResult<&Self> {
        self.enter_full_name(full_name)
            .await?
            .enter_email(email)
            .await?
            .enter_password(password)
            .await?
            .select_instrument(instrument)
            .await?
            .select_skill_level(skill_level)
            .await?
            .click_create_account()
            .await
    }

    pub async fn is_valid_invite_form_displayed(&self) -> bool {
        self.ui.is_displayed(&JOIN_HEADING).await
    }

    pub async fn is_invalid_invite_displayed(&self) -> bool {
        self.ui.is_displayed(&INVALID_HEADING).await
    }

    pub async fn is_already_logged_in_displayed(&self) -> bool {
        self.ui.is_displayed(&ALREADY_LOGGED_IN_HEADING).await
    }

    /// Email field exists and is locked
    pub async fn is_email_field_disabled(&self) -> bool {
        self.ui.is_displayed(&EMAIL).await && !self.ui.is_enabled(&EMAIL).await
    }

    pub async fn email_value(&self) -> String {
        self.ui.value_of(&EMAIL).await
    }

    /// Text shown in the instrument dropdown
    pub async fn instrument_value(&self) -> String {
        self.ui.text_of(&INSTRUMENT_VALUE).await
    }

    /// Text shown in the skill level dropdown
    pub async fn skill_level_value(&self) -> String {
        self.ui.text_of(&SKILL_LEVEL_VALUE).await
    }

    pub async fn is_create_account_button_enabled(&self) -> bool {
        self.ui.is_enabled(&CREATE_ACCOUNT_BUTTON).await
    }

    /// Wait until any of the three invite states has rendered
    pub async fn wait_for_page_to_load(&self) -> bool {
        let ui = &self.ui;
        ui.waiter()
            .until("invite page state", move || async move {
                Ok(ui.is_displayed(&JOIN_HEADING).await
                    || ui.is_displayed(&INVALID_HEADING).await
                    || ui.is_displayed(&ALREADY_LOGGED_IN_HEADING).await)
            })
            .await
            .is_ok()
    }
}
