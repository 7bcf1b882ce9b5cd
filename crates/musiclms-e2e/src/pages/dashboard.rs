//! Dashboard shell (`/dashboard`): brand, sidebar navigation and user menu.

use super::{join_url, PageObject};
use crate::interact::Interactor;
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use std::fmt;
use std::str::FromStr;

const BRAND_LOGO: Locator = Locator::xpath("//span[contains(text(),'MusicLMS')]");
const USER_NAV: Locator = Locator::css("[data-testid='user-nav']");
const LOGOUT_BUTTON: Locator = Locator::xpath("//*[@role='menuitem'][contains(.,'Log out')]");
const HEADING: Locator = Locator::xpath("//h1[contains(text(),'Dashboard')]");

/// Sidebar destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardSection {
    Students,
    Schedule,
    Assignments,
    Library,
    Messages,
    Submissions,
    Practice,
    Feedback,
    Settings,
}

impl DashboardSection {
    /// Every section, in sidebar order
    pub const ALL: [Self; 9] = [
        Self::Students,
        Self::Schedule,
        Self::Assignments,
        Self::Library,
        Self::Messages,
        Self::Submissions,
        Self::Practice,
        Self::Feedback,
        Self::Settings,
    ];

    /// Sidebar label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Students => "Students",
            Self::Schedule => "Schedule",
            Self::Assignments => "Assignments",
            Self::Library => "Library",
            Self::Messages => "Messages",
            Self::Submissions => "Submissions",
            Self::Practice => "Practice Log",
            Self::Feedback => "Feedback",
            Self::Settings => "Settings",
        }
    }

    /// Route of the section
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Students => "/dashboard/students",
            Self::Schedule => "/dashboard/schedule",
            Self::Assignments => "/dashboard/assignments",
            Self::Library => "/dashboard/library",
            Self::Messages => "/dashboard/messages",
            Self::Submissions => "/dashboard/submissions",
            Self::Practice => "/dashboard/practice",
            Self::Feedback => "/dashboard/feedback",
            Self::Settings => "/dashboard/settings",
        }
    }

    /// Sidebar link of the section
    #[must_use]
    pub const fn nav_link(self) -> Locator {
        Locator::css(match self {
            Self::Students => "a[href='/dashboard/students']",
            Self::Schedule => "a[href='/dashboard/schedule']",
            Self::Assignments => "a[href='/dashboard/assignments']",
            Self::Library => "a[href='/dashboard/library']",
            Self::Messages => "a[href='/dashboard/messages']",
            Self::Submissions => "a[href='/dashboard/submissions']",
            Self::Practice => "a[href='/dashboard/practice']",
            Self::Feedback => "a[href='/dashboard/feedback']",
            Self::Settings => "a[href='/dashboard/settings']",
        })
    }
}

impl fmt::Display for DashboardSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DashboardSection {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|section| {
                section.label().eq_ignore_ascii_case(wanted)
                    || section.path().rsplit('/').next() == Some(&*wanted.to_ascii_lowercase())
            })
            .ok_or_else(|| E2eError::invalid_argument(format!("Unknown dashboard section: {s}")))
    }
}

/// Page object for the authenticated dashboard shell
#[derive(Debug, Clone)]
pub struct DashboardPage {
    ui: Interactor,
    base_url: String,
}

impl PageObject for DashboardPage {
    const NAME: &'static str = "Dashboard";
    const PATH: &'static str = "/dashboard";
    const ELEMENTS: &'static [(&'static str, Locator)] = &[
        ("brand_logo", BRAND_LOGO),
        ("user_nav", USER_NAV),
        ("logout_button", LOGOUT_BUTTON),
        ("heading", HEADING),
        ("nav_students", DashboardSection::Students.nav_link()),
        ("nav_schedule", DashboardSection::Schedule.nav_link()),
        ("nav_assignments", DashboardSection::Assignments.nav_link()),
        ("nav_library", DashboardSection::Library.nav_link()),
        ("nav_messages", DashboardSection::Messages.nav_link()),
        ("nav_submissions", DashboardSection::Submissions.nav_link()),
        ("nav_practice", DashboardSection::Practice.nav_link()),
        ("nav_feedback", DashboardSection::Feedback.nav_link()),
        ("nav_settings", DashboardSection::Settings.nav_link()),
    ];

    fn ui(&self) -> &Interactor {
        &self.ui
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl DashboardPage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(ui: Interactor, base_url: impl Into<String>) -> Self {
        Self {
            ui,
            base_url: base_url.into(),
        }
    }

    /// Click the sidebar link of `section`
    pub async fn navigate_to(&self, section: DashboardSection) -> E2eResult<&Self> {
        self.ui.click(&section.nav_link()).await?;
        Ok(self)
    }

    /// Click the sidebar link and wait for its route; `false` on timeout
    pub async fn navigate_and_verify(&self, section: DashboardSection) -> E2eResult<bool> {
        self.navigate_to(section).await?;
        Ok(self.ui.wait_for_url(section.path()).await)
    }

    /// Load a section by URL, skipping the sidebar
    pub async fn open_section(&self, section: DashboardSection) -> E2eResult<()> {
        self.ui
            .open(&join_url(&self.base_url, section.path()))
            .await
    }

    pub async fn open_user_nav(&self) -> E2eResult<&Self> {
        self.ui.click(&USER_NAV).await?;
        Ok(self)
    }

    /// Open the user menu and log out
    pub async fn logout(&self) -> E2eResult<&Self> {
        self.open_user_nav().await?;
        self.ui.click(&LOGOUT_BUTTON).await?;
        Ok(self)
    }

    /// Log out and wait for the login route; `false` on timeout
    pub async fn logout_and_verify(&self) -> E2eResult<bool> {
        self.logout().await?;
        Ok(self.ui.wait_for_url("/login").await)
    }

    /// Current URL is under `/dashboard`
    pub async fn is_page_displayed(&self) -> bool {
        self.ui.current_url().await.contains("/dashboard")
    }

    pub async fn is_brand_logo_displayed(&self) -> bool {
        self.ui.is_displayed(&BRAND_LOGO).await
    }

    pub async fn is_user_nav_displayed(&self) -> bool {
        self.ui.is_displayed(&USER_NAV).await
    }

    /// Wait for the dashboard route and its heading
    pub async fn wait_for_dashboard_load(&self) -> bool {
        self.ui.wait_for_url("/dashboard").await && self.ui.appears(&HEADING).await
    }

    pub async fn title(&self) -> E2eResult<String> {
        self.ui.title().await
    }
}
