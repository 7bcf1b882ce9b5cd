//! Page objects.
//!
//! One struct per screen of the application. Each holds a clone of the
//! session's [`Interactor`] and the application base URL; nothing else
//! survives between calls, so locators are resolved fresh every time.
//!
//! Action methods return `E2eResult<&Self>` so calls chain with `?`.
//! Verification methods return `bool` and never fail.

use crate::interact::Interactor;
use crate::locator::Locator;
use crate::result::E2eResult;
use async_trait::async_trait;

mod assignments;
mod dashboard;
mod invite;
mod login;
mod signup;

pub use assignments::AssignmentsPage;
pub use dashboard::{DashboardPage, DashboardSection};
pub use invite::InvitePage;
pub use login::LoginPage;
pub use signup::SignupPage;

/// Trait for page objects representing one screen of the application
#[async_trait]
pub trait PageObject: Sync {
    /// Page name for logging and listings
    const NAME: &'static str;

    /// Path relative to the application base URL
    const PATH: &'static str;

    /// Semantic element names and their locators
    const ELEMENTS: &'static [(&'static str, Locator)];

    /// Interaction toolkit of the session
    fn ui(&self) -> &Interactor;

    /// Application base URL
    fn base_url(&self) -> &str;

    /// Absolute URL of the page
    fn url(&self) -> String {
        join_url(self.base_url(), Self::PATH)
    }

    /// Navigate straight to the page
    async fn open(&self) -> E2eResult<()> {
        self.ui().open(&self.url()).await
    }

    /// Locator registered under `name`
    fn locator(name: &str) -> Option<&'static Locator> {
        Self::ELEMENTS
            .iter()
            .find(|(element, _)| *element == name)
            .map(|(_, locator)| locator)
    }
}

/// Static description of a page object, for listings
#[derive(Debug, Clone, Copy)]
pub struct PageInfo {
    /// Page name
    pub name: &'static str,
    /// Path relative to the base URL
    pub path: &'static str,
    /// Named locators
    pub elements: &'static [(&'static str, Locator)],
}

impl PageInfo {
    /// Describe page type `P`
    #[must_use]
    pub const fn of<P: PageObject>() -> Self {
        Self {
            name: P::NAME,
            path: P::PATH,
            elements: P::ELEMENTS,
        }
    }
}

/// Every page object of the suite
#[must_use]
pub fn inventory() -> [PageInfo; 5] {
    [
        PageInfo::of::<LoginPage>(),
        PageInfo::of::<SignupPage>(),
        PageInfo::of::<DashboardPage>(),
        PageInfo::of::<InvitePage>(),
        PageInfo::of::<AssignmentsPage>(),
    ]
}

/// Join a base URL and an absolute path without doubling the slash
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
