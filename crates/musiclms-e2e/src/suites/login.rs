//! Login screen: display, valid and invalid credentials, navigation.

use crate::assertion::Assertion;
use crate::case::{TestCase, TestClass, TestContext, TestFuture};
use crate::pages::PageObject;
use crate::unique::random_number;
use futures::FutureExt;
use tracing::info;

pub const CLASS: &str = "LoginTests";

const WRONG_PASSWORD: &str = "WrongPassword123!";

/// Cases of [`CLASS`]
#[must_use]
pub fn class() -> TestClass {
    TestClass::new(
        CLASS,
        [
            TestCase::new("TC_Auth_001", "verify_login_page_display", verify_login_page_display)
                .describe("Verify login page is displayed correctly")
                .groups(&["sanity", "master"])
                .priority(1),
            TestCase::new("TC_Auth_002", "verify_valid_login", verify_valid_login)
                .describe("Verify login with valid credentials")
                .groups(&["sanity", "regression", "master"])
                .priority(2),
            TestCase::new("TC_Auth_003", "verify_invalid_password", verify_invalid_password)
                .describe("Verify login fails with invalid password")
                .groups(&["regression", "master"])
                .priority(3),
            TestCase::new("TC_Auth_004", "verify_nonexistent_email", verify_nonexistent_email)
                .describe("Verify login fails with non-existent email")
                .groups(&["regression", "master"])
                .priority(4),
            TestCase::new("TC_Auth_005", "verify_empty_fields", verify_empty_fields)
                .describe("Verify login fails with empty fields")
                .groups(&["regression", "master"])
                .priority(5),
            TestCase::new("TC_Auth_006", "verify_signup_navigation", verify_signup_navigation)
                .describe("Verify navigation from login to signup page")
                .groups(&["sanity", "master"])
                .priority(6),
            TestCase::new("TC_Auth_007", "verify_login_button_enabled", verify_login_button_enabled)
                .describe("Verify login button is enabled")
                .groups(&["sanity", "master"])
                .priority(7),
        ],
    )
}

fn verify_login_page_display(ctx: TestContext) -> TestFuture {
    async move {
        let login = ctx.login_page();
        login.open().await?;
        let displayed = login.is_page_displayed().await;
        info!(displayed, "login page displayed");
        Assertion::is_true(displayed, "Login page should be displayed").check()
    }
    .boxed()
}

fn verify_valid_login(ctx: TestContext) -> TestFuture {
    async move {
        let login = ctx.login_page();
        login.open().await?;
        login
            .login(&ctx.config().test_email, &ctx.config().test_password)
            .await?;

        let dashboard = ctx.dashboard_page();
        Assertion::is_true(
            dashboard.wait_for_dashboard_load().await,
            "Login should redirect to dashboard",
        )
        .check()?;
        Assertion::is_true(
            dashboard.is_page_displayed().await,
            "Dashboard should be displayed after login",
        )
        .check()
    }
    .boxed()
}

fn verify_invalid_password(ctx: TestContext) -> TestFuture {
    async move {
        let login = ctx.login_page();
        login.open().await?;
        login.login(&ctx.config().test_email, WRONG_PASSWORD).await?;

        Assertion::is_true(
            ctx.stays_on("/login").await,
            "User should remain on login page after invalid password",
        )
        .check()?;
        let error_shown = login.is_error_message_displayed().await;
        info!(error_shown, "invalid password rejected");
        Ok(())
    }
    .boxed()
}

fn verify_nonexistent_email(ctx: TestContext) -> TestFuture {
    async move {
        let login = ctx.login_page();
        login.open().await?;
        let email = format!("nonexistent_{}@test.com", random_number());
        login.login(&email, "SomePassword123!").await?;

        Assertion::is_true(
            ctx.stays_on("/login").await,
            "User should remain on login page with non-existent email",
        )
        .check()
    }
    .boxed()
}

fn verify_empty_fields(ctx: TestContext) -> TestFuture {
    async move {
        let login = ctx.login_page();
        login.open().await?;
        login.click_login().await?;

        Assertion::is_true(
            ctx.stays_on("/login").await,
            "User should remain on login page with empty fields",
        )
        .check()?;
        Assertion::is_true(
            login.is_email_field_empty().await,
            "Email field should still be empty",
        )
        .check()
    }
    .boxed()
}

fn verify_signup_navigation(ctx: TestContext) -> TestFuture {
    async move {
        let login = ctx.login_page();
        login.open().await?;
        login.click_sign_up_link().await?;

        Assertion::is_true(
            ctx.ui().wait_for_url("/signup").await,
            "URL should contain /signup",
        )
        .check()?;
        Assertion::is_true(
            ctx.signup_page().is_page_displayed().await,
            "Signup page should be displayed",
        )
        .check()
    }
    .boxed()
}

fn verify_login_button_enabled(ctx: TestContext) -> TestFuture {
    async move {
        let login = ctx.login_page();
        login.open().await?;
        Assertion::is_true(
            login.is_login_button_enabled().await,
            "Login button should be enabled",
        )
        .check()
    }
    .boxed()
}
