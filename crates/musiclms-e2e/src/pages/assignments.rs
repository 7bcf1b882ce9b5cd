//! Teacher assignment list and the "Create Assignment" dialog.

use super::PageObject;
use crate::interact::Interactor;
use crate::locator::{xpath_literal, Locator, Strategy};
use crate::result::E2eResult;
use tracing::info;

const HEADING: Locator = Locator::xpath("//h1[contains(text(),'Assignments')]");
const NEW_ASSIGNMENT_BUTTON: Locator = Locator::xpath("//button[contains(.,'New Assignment')]");
const DIALOG_TITLE: Locator = Locator::xpath("//h2[contains(text(),'Create Assignment')]");
const TITLE_INPUT: Locator = Locator::name("title");
const DESCRIPTION_INPUT: Locator = Locator::name("description");
const SUBMIT_BUTTON: Locator = Locator::css("[role='dialog'] button[type='submit']");
const EMPTY_STATE: Locator = Locator::xpath("//h3[contains(text(),'No assignments created')]");

/// Checkbox label of a student in the dialog
fn student_checkbox(name: &str) -> Locator {
    Locator::dynamic(
        Strategy::XPath,
        format!(
            "//label[starts-with(@for,'student-')][contains(normalize-space(.),{})]",
            xpath_literal(name)
        ),
    )
}

/// Checkbox label of a library resource in the dialog
fn resource_checkbox(title: &str) -> Locator {
    Locator::dynamic(
        Strategy::XPath,
        format!(
            "//label[starts-with(@for,'resource-')][contains(normalize-space(.),{})]",
            xpath_literal(title)
        ),
    )
}

/// Link to an assignment in the list
fn assignment_link(title: &str) -> Locator {
    Locator::dynamic(
        Strategy::XPath,
        format!(
            "//a[contains(@href,'/dashboard/assignments/')][contains(normalize-space(.),{})]",
            xpath_literal(title)
        ),
    )
}

/// Page object for `/dashboard/assignments`
#[derive(Debug, Clone)]
pub struct AssignmentsPage {
    ui: Interactor,
    base_url: String,
}

impl PageObject for AssignmentsPage {
    const NAME: &'static str = "Assignments";
    const PATH: &'static str = "/dashboard/assignments";
    const ELEMENTS: &'static [(&'static str, Locator)] = &[
        ("heading", HEADING),
        ("new_assignment_button", NEW_ASSIGNMENT_BUTTON),
        ("dialog_title", DIALOG_TITLE),
        ("title_input", TITLE_INPUT),
        ("description_input", DESCRIPTION_INPUT),
        ("submit_button", SUBMIT_BUTTON),
        ("empty_state", EMPTY_STATE),
    ];

    fn ui(&self) -> &Interactor {
        &self.ui
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl AssignmentsPage {
    /// Bind the page to a session
    #[must_use]
    pub fn new(ui: Interactor, base_url: impl Into<String>) -> Self {
        Self {
            ui,
            base_url: base_url.into(),
        }
    }

    pub async fn click_new_assignment(&self) -> E2eResult<&Self> {
        self.ui.click(&NEW_ASSIGNMENT_BUTTON).await?;
        Ok(self)
    }

    pub async fn enter_title(&self, title: &str) -> E2eResult<&Self> {
        self.ui.type_text(&TITLE_INPUT, title).await?;
        Ok(self)
    }

    pub async fn enter_description(&self, description: &str) -> E2eResult<&Self> {
        self.ui.type_text(&DESCRIPTION_INPUT, description).await?;
        Ok(self)
    }

    /// Tick the student whose name contains `name`
    pub async fn select_student(&self, name: &str) -> E2eResult<&Self> {
        self.ui.click(&student_checkbox(name)).await?;
        Ok(self)
    }

    /// Tick the library resource whose title contains `title`
    pub async fn attach_resource(&self, title: &str) -> E2eResult<&Self> {
        self.ui.click(&resource_checkbox(title)).await?;
        Ok(self)
    }

    pub async fn submit(&self) -> E2eResult<&Self> {
        self.ui.click(&SUBMIT_BUTTON).await?;
        Ok(self)
    }

    /// Open the dialog, fill it, tick `students` and submit
    pub async fn create_assignment(
        &self,
        title: &str,
        description: &str,
        students: &[&str],
    ) -> E2eResult<&Self> {
        info!(title, students = students.len(), "creating assignment");
        self.click_new_assignment()
            .await?
            .enter_title(title)
            .await?
            .enter_description(description)
            .await?;
        for student in students {
            self.select_student(student).await?;
        }
        self.submit().await
    }

    pub async fn is_page_displayed(&self) -> bool {
        self.ui.appears(&HEADING).await
    }

    pub async fn is_create_dialog_displayed(&self) -> bool {
        self.ui.is_displayed(&DIALOG_TITLE).await
    }

    /// Wait for a list entry titled `title`
    pub async fn is_assignment_visible(&self, title: &str) -> bool {
        self.ui.appears(&assignment_link(title)).await
    }

    pub async fn is_empty_state_displayed(&self) -> bool {
        self.ui.is_displayed(&EMPTY_STATE).await
    }
}
