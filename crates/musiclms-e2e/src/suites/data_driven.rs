//! Tests that run once per row of a named data set.

use crate::assertion::Assertion;
use crate::case::{TestCase, TestClass, TestContext, TestFuture};
use crate::data::{EMAIL_VALIDATION, LOGIN_DATA, PASSWORD_VALIDATION};
use crate::pages::PageObject;
use crate::result::E2eError;
use crate::unique::random_email;
use futures::FutureExt;
use tracing::{info, warn};

pub const CLASS: &str = "DataDrivenTests";

/// Minimum password length enforced by the signup form
pub const MIN_PASSWORD_LEN: usize = 6;

/// Cases of [`CLASS`]
#[must_use]
pub fn class() -> TestClass {
    TestClass::new(
        CLASS,
        [
            TestCase::new(
                "TC_Auth_DDT_001",
                "login_with_multiple_credentials",
                login_with_multiple_credentials,
            )
            .describe("Test login with multiple credential sets")
            .groups(&["dataDriven", "master"])
            .data(LOGIN_DATA),
            TestCase::new("TC_Auth_DDT_002", "password_validation", password_validation)
                .describe("Test various password validation scenarios")
                .groups(&["dataDriven", "regression"])
                .data(PASSWORD_VALIDATION),
            TestCase::new("TC_Auth_DDT_003", "email_validation", email_validation)
                .describe("Test various email validation scenarios")
                .groups(&["dataDriven", "regression"])
                .data(EMAIL_VALIDATION),
        ],
    )
}

/// Whether a password satisfies the form's length rule
#[must_use]
pub fn meets_password_rule(password: &str) -> bool {
    password.trim().chars().count() >= MIN_PASSWORD_LEN
}

fn login_with_multiple_credentials(ctx: TestContext) -> TestFuture {
    async move {
        let email = ctx.row().text(0).to_string();
        let password = ctx.row().text(1).to_string();
        let should_succeed = ctx.row().text(2).trim().eq_ignore_ascii_case("true");

        let login = ctx.login_page();
        login.open().await?;
        login.login(&email, &password).await?;

        if should_succeed {
            Assertion::is_true(
                ctx.ui().wait_for_url("/dashboard").await,
                &format!("Login should succeed for {email}"),
            )
            .check()?;
            if !ctx.dashboard_page().logout_and_verify().await? {
                warn!(%email, "logout did not return to /login");
            }
        } else {
            Assertion::is_true(
                ctx.stays_on("/login").await,
                &format!("Login should fail for {email}"),
            )
            .check()?;
        }
        Ok(())
    }
    .boxed()
}

fn password_validation(ctx: TestContext) -> TestFuture {
    async move {
        let password = ctx.row().text(0).to_string();
        let expected = ctx.row().flag(1);
        let reason = ctx.row().text(2).to_string();

        let signup = ctx.signup_page();
        signup.open().await?;
        signup
            .enter_full_name("Test User")
            .await?
            .enter_email(&random_email())
            .await?
            .enter_password(&password)
            .await?;

        let valid = meets_password_rule(&password);
        info!(valid, expected, %reason, "password checked");
        Assertion::equals(
            &expected,
            &valid,
            &format!("Password validation mismatch ({reason})"),
        )
        .check()
    }
    .boxed()
}

fn email_validation(ctx: TestContext) -> TestFuture {
    async move {
        let email = ctx.row().text(0).to_string();
        let expected = ctx.row().flag(1);
        let reason = ctx.row().text(2).to_string();

        let login = ctx.login_page();
        login.open().await?;
        login.enter_email(&email).await?;

        let Some(valid) = login.is_email_valid().await else {
            return Err(E2eError::driver(format!(
                "email validity unavailable for '{email}' ({reason})"
            )));
        };
        info!(valid, expected, %reason, "email checked");
        Assertion::equals(
            &expected,
            &valid,
            &format!("Email validation mismatch for '{email}' ({reason})"),
        )
        .check()
    }
    .boxed()
}
