//! Student invite acceptance.
//!
//! Only the invalid-token case runs unconditionally. The others need a live
//! invite token (`inviteToken` / `MUSICLMS_INVITE_TOKEN`) and are skipped
//! without one. A token is consumed by a successful registration, so the
//! form checks run before the single submitting case.

use crate::assertion::Assertion;
use crate::case::{TestCase, TestClass, TestContext, TestFuture};
use crate::data::STUDENT_INVITE_DATA;
use crate::result::{E2eError, E2eResult};
use crate::unique::{random_email, random_string};
use futures::FutureExt;
use tracing::info;

pub const CLASS: &str = "InviteTests";

const BOGUS_TOKEN: &str = "invalid-token-00000000";

/// Cases of [`CLASS`]
#[must_use]
pub fn class() -> TestClass {
    TestClass::new(
        CLASS,
        [
            TestCase::new("TC_Invite_001", "verify_invalid_invite", verify_invalid_invite)
                .describe("Verify an unknown invite token shows Invalid Invite")
                .groups(&["sanity", "invite", "master"])
                .priority(1),
            TestCase::new("TC_Invite_002", "verify_student_form", verify_student_form)
                .describe("Verify the student form accepts each instrument and skill level")
                .groups(&["dataDriven", "invite"])
                .priority(2)
                .data(STUDENT_INVITE_DATA),
            TestCase::new("TC_Invite_003", "verify_student_registration", verify_student_registration)
                .describe("Verify a student can register through an invite")
                .groups(&["regression", "invite"])
                .priority(3),
        ],
    )
}

/// Configured invite token, or a skip
fn invite_token(ctx: &TestContext) -> E2eResult<String> {
    ctx.config()
        .invite_token
        .clone()
        .ok_or_else(|| E2eError::skipped("inviteToken not configured"))
}

fn verify_invalid_invite(ctx: TestContext) -> TestFuture {
    async move {
        let invite = ctx.invite_page();
        invite.open_token(BOGUS_TOKEN).await?;
        Assertion::is_true(
            invite.wait_for_page_to_load().await,
            "Invite page should render",
        )
        .check()?;
        Assertion::is_true(
            invite.is_invalid_invite_displayed().await,
            "Invalid Invite should be displayed for an unknown token",
        )
        .check()
    }
    .boxed()
}

fn verify_student_form(ctx: TestContext) -> TestFuture {
    async move {
        let token = invite_token(&ctx)?;
        let row = ctx.row().clone();
        let (name, email, password) = (row.text(0), row.text(1), row.text(2));
        let (instrument, level) = (row.text(3), row.text(4));

        let invite = ctx.invite_page();
        invite.open_token(&token).await?;
        invite.wait_for_page_to_load().await;
        Assertion::is_true(
            invite.is_valid_invite_form_displayed().await,
            "Invite form should be displayed for the configured token",
        )
        .check()?;

        invite
            .enter_full_name(name)
            .await?
            .enter_email(email)
            .await?
            .enter_password(password)
            .await?
            .select_instrument(instrument)
            .await?
            .select_skill_level(level)
            .await?;

        Assertion::equals(
            &instrument.to_string(),
            &invite.instrument_value().await,
            "Instrument selection",
        )
        .check()?;
        Assertion::equals(
            &level.to_string(),
            &invite.skill_level_value().await,
            "Skill level selection",
        )
        .check()?;
        Assertion::is_true(
            invite.is_create_account_button_enabled().await,
            "Create Student Account should be enabled",
        )
        .check()
    }
    .boxed()
}

fn verify_student_registration(ctx: TestContext) -> TestFuture {
    async move {
        let token = invite_token(&ctx)?;
        let invite = ctx.invite_page();
        invite.open_token(&token).await?;
        invite.wait_for_page_to_load().await;
        if invite.is_invalid_invite_displayed().await {
            return Err(E2eError::skipped("invite token already used or expired"));
        }

        let name = format!("Test Student {}", random_string());
        let email = random_email();
        info!(%name, %email, "registering student");
        invite
            .register_as_student(&name, &email, "Pass123!", "Piano", "Beginner")
            .await?;

        Assertion::is_true(
            ctx.ui().wait_for_url("/login").await,
            "Registration should redirect to login",
        )
        .check()
    }
    .boxed()
}
