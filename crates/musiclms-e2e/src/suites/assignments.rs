//! Teacher assignment creation.

use crate::assertion::Assertion;
use crate::case::{TestCase, TestClass, TestContext, TestFuture};
use crate::pages::{DashboardSection, PageObject};
use crate::unique::unique_title;
use futures::FutureExt;

pub const CLASS: &str = "AssignmentTests";

/// Cases of [`CLASS`]
#[must_use]
pub fn class() -> TestClass {
    TestClass::new(
        CLASS,
        [TestCase::new("TC_Assign_001", "verify_create_assignment", verify_create_assignment)
            .describe("Verify a teacher can create an assignment")
            .groups(&["regression", "assignments"])
            .priority(1)],
    )
}

fn verify_create_assignment(ctx: TestContext) -> TestFuture {
    async move {
        let login = ctx.login_page();
        login.open().await?;
        let logged_in = login
            .login_and_verify(&ctx.config().test_email, &ctx.config().test_password)
            .await?;
        Assertion::is_true(logged_in, "Teacher should reach the dashboard").check()?;

        let dashboard = ctx.dashboard_page();
        Assertion::is_true(
            dashboard
                .navigate_and_verify(DashboardSection::Assignments)
                .await?,
            "Assignments section should open",
        )
        .check()?;

        let assignments = ctx.assignments_page();
        Assertion::is_true(
            assignments.is_page_displayed().await,
            "Assignments page should be displayed",
        )
        .check()?;

        let title = unique_title("E2E Assignment");
        assignments
            .create_assignment(&title, "Practice scales for ten minutes daily", &[])
            .await?;
        Assertion::is_true(
            assignments.is_assignment_visible(&title).await,
            &format!("Assignment '{title}' should be listed"),
        )
        .check()
    }
    .boxed()
}
