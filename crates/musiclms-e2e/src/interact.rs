//! Wait-guarded element interactions shared by every page object.

use crate::driver::SharedDriver;
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use crate::wait::{WaitOptions, Waiter};
use tracing::debug;

/// Interaction toolkit bound to one browser session.
///
/// Cloning is cheap; every page object of a session holds its own clone.
#[derive(Debug, Clone)]
pub struct Interactor {
    driver: SharedDriver,
    waiter: Waiter,
}

impl Interactor {
    /// Bind to `driver` with the given wait budget
    #[must_use]
    pub fn new(driver: SharedDriver, options: WaitOptions) -> Self {
        let waiter = Waiter::new(driver.clone(), options);
        Self { driver, waiter }
    }

    /// Underlying session
    #[must_use]
    pub const fn driver(&self) -> &SharedDriver {
        &self.driver
    }

    /// Waiter using this session's budget
    #[must_use]
    pub const fn waiter(&self) -> &Waiter {
        &self.waiter
    }

    /// Navigate to an absolute URL
    pub async fn open(&self, url: &str) -> E2eResult<()> {
        debug!(url, "navigate");
        self.driver.navigate(url).await.map_err(E2eError::from)
    }

    /// Wait for clickability, then click
    pub async fn click(&self, locator: &Locator) -> E2eResult<()> {
        debug!(%locator, "click");
        self.waiter
            .until_clickable(locator)
            .await
            .map_err(|e| as_interaction("click", locator, e))?;
        self.driver
            .click(locator)
            .await
            .map_err(|e| as_interaction("click", locator, e.into()))
    }

    /// Wait for visibility, clear, then type `text`
    pub async fn type_text(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        debug!(%locator, chars = text.chars().count(), "type");
        self.waiter
            .until_visible(locator)
            .await
            .map_err(|e| as_interaction("type into", locator, e))?;
        self.driver
            .clear(locator)
            .await
            .map_err(|e| as_interaction("clear", locator, e.into()))?;
        self.driver
            .send_keys(locator, text)
            .await
            .map_err(|e| as_interaction("type into", locator, e.into()))
    }

    /// Open a custom dropdown and pick the option showing `option_text`.
    ///
    /// The option list renders after the trigger is clicked, so options are
    /// awaited like any other element. An option reading exactly
    /// `option_text` wins; the first option containing it is the fallback.
    pub async fn select_option(&self, trigger: &Locator, option_text: &str) -> E2eResult<()> {
        self.click(trigger).await?;
        let exact = Locator::dropdown_option(option_text);
        let partial = Locator::dropdown_option_containing(option_text);

        let driver = &self.driver;
        let candidates = [&exact, &partial];
        self.waiter
            .until(&format!("option '{option_text}'"), move || async move {
                for locator in candidates {
                    if driver.inspect(locator).await.is_ok_and(|s| s.displayed) {
                        return Ok(true);
                    }
                }
                Ok(false)
            })
            .await
            .map_err(|e| as_interaction("select", &exact, e))?;

        if self.is_displayed(&exact).await {
            self.click(&exact).await
        } else {
            debug!(option = option_text, "no exact option, selecting first partial match");
            self.click(&partial).await
        }
    }

    /// Whether the element is currently displayed; any failure reads as `false`
    pub async fn is_displayed(&self, locator: &Locator) -> bool {
        self.driver
            .inspect(locator)
            .await
            .is_ok_and(|state| state.displayed)
    }

    /// Whether the element is currently enabled; any failure reads as `false`
    pub async fn is_enabled(&self, locator: &Locator) -> bool {
        self.driver
            .inspect(locator)
            .await
            .is_ok_and(|state| state.enabled)
    }

    /// Wait up to the session budget for the element to show; `false` on timeout
    pub async fn appears(&self, locator: &Locator) -> bool {
        self.waiter.until_visible(locator).await.is_ok()
    }

    /// Current input value, empty when absent
    pub async fn value_of(&self, locator: &Locator) -> String {
        self.attribute(locator, "value").await.unwrap_or_default()
    }

    /// Attribute or property, `None` when absent
    pub async fn attribute(&self, locator: &Locator, name: &str) -> Option<String> {
        self.driver.attribute(locator, name).await.ok().flatten()
    }

    /// Visible text after waiting for the element, empty when it never shows
    pub async fn text_of(&self, locator: &Locator) -> String {
        if self.waiter.until_visible(locator).await.is_err() {
            return String::new();
        }
        self.driver.text(locator).await.unwrap_or_default()
    }

    /// Block until the URL contains `fragment`; `false` on timeout
    pub async fn wait_for_url(&self, fragment: &str) -> bool {
        self.waiter.until_url_contains(fragment).await.is_ok()
    }

    /// URL of the current page, empty if the session cannot answer
    pub async fn current_url(&self) -> String {
        self.driver.current_url().await.unwrap_or_default()
    }

    /// Document title
    pub async fn title(&self) -> E2eResult<String> {
        self.driver.title().await.map_err(E2eError::from)
    }

    /// Run a script against an element
    pub async fn script_on(
        &self,
        script: &str,
        locator: &Locator,
    ) -> E2eResult<serde_json::Value> {
        self.driver
            .execute_script(script, Some(locator))
            .await
            .map_err(E2eError::from)
    }
}

/// Fold wait and driver failures into an interaction error for `locator`
fn as_interaction(action: &'static str, locator: &Locator, err: E2eError) -> E2eError {
    let message = match &err {
        E2eError::Timeout { elapsed_ms, .. } => format!("not ready after {elapsed_ms}ms"),
        E2eError::Driver { message } => message.clone(),
        other => other.to_string(),
    };
    E2eError::interaction(action, locator.to_string(), message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{Driver, MockDriver, MockElement, Reaction};
    use std::sync::Arc;

    const INPUT: Locator = Locator::id("email");
    const BUTTON: Locator = Locator::css("button[type='submit']");
    const TRIGGER: Locator = Locator::xpath("//button[@role='combobox']");
    const TRIGGER_LABEL: Locator = Locator::xpath("//button[@role='combobox']/span");

    async fn interactor(mock: MockDriver) -> (Arc<MockDriver>, Interactor) {
        let mock = Arc::new(mock);
        mock.navigate("http://app/form").await.unwrap();
        let options = WaitOptions::new().with_timeout(1_000).with_poll_interval(50);
        (mock.clone(), Interactor::new(mock, options))
    }

    mod click_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_click_waits_for_enabled() {
            let (mock, ui) = interactor(
                MockDriver::new().with_page("/form", "", [(BUTTON, MockElement::visible())]),
            )
            .await;
            ui.click(&BUTTON).await.unwrap();
            assert!(mock.was_called("click:css=button"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_click_timeout_becomes_interaction_error() {
            let (mock, ui) = interactor(MockDriver::new().with_page(
                "/form",
                "",
                [(BUTTON, MockElement::visible().disabled())],
            ))
            .await;
            let err = ui.click(&BUTTON).await.unwrap_err();
            match err {
                E2eError::Interaction { action, target, .. } => {
                    assert_eq!(action, "click");
                    assert_eq!(target, "css=button[type='submit']");
                }
                other => panic!("expected interaction error, got {other:?}"),
            }
            assert!(!mock.was_called("click"));
        }
    }

    mod type_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_type_replaces_existing_value() {
            let (mock, ui) = interactor(MockDriver::new().with_page(
                "/form",
                "",
                [(INPUT, MockElement::visible().with_value("stale@x.y"))],
            ))
            .await;
            ui.type_text(&INPUT, "teacher@musiclms.test").await.unwrap();
            assert_eq!(
                mock.value_of(&INPUT).as_deref(),
                Some("teacher@musiclms.test")
            );
            assert_eq!(ui.value_of(&INPUT).await, "teacher@musiclms.test");
        }

        #[tokio::test(start_paused = true)]
        async fn test_type_into_missing_field_fails() {
            let (_mock, ui) = interactor(MockDriver::new()).await;
            assert!(matches!(
                ui.type_text(&INPUT, "x").await,
                Err(E2eError::Interaction { .. })
            ));
        }
    }

    mod state_tests {
        use super::*;

        #[tokio::test]
        async fn test_absent_element_is_not_displayed() {
            let (_mock, ui) = interactor(MockDriver::new()).await;
            assert!(!ui.is_displayed(&INPUT).await);
            assert!(!ui.is_enabled(&INPUT).await);
            assert_eq!(ui.value_of(&INPUT).await, "");
        }

        #[tokio::test(start_paused = true)]
        async fn test_text_of_absent_is_empty() {
            let (_mock, ui) = interactor(MockDriver::new()).await;
            assert_eq!(ui.text_of(&INPUT).await, "");
        }

        #[tokio::test(start_paused = true)]
        async fn test_wait_for_url() {
            let (_mock, ui) = interactor(MockDriver::new()).await;
            assert!(ui.wait_for_url("/form").await);
            assert!(!ui.wait_for_url("/dashboard").await);
        }
    }

    mod dropdown_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_select_option_tolerates_render_delay() {
            let piano = Locator::dropdown_option("Piano");
            let mock = MockDriver::new()
                .with_page(
                    "/form",
                    "",
                    [
                        (TRIGGER, MockElement::visible()),
                        (
                            TRIGGER_LABEL,
                            MockElement::visible().with_text("Select your instrument"),
                        ),
                    ],
                )
                .on_click(
                    TRIGGER,
                    Reaction::Show(piano.clone(), MockElement::visible().appearing_after(2)),
                )
                .on_click(
                    piano.clone(),
                    Reaction::All(vec![
                        Reaction::SetText(TRIGGER_LABEL, "Piano".into()),
                        Reaction::Remove(piano.clone()),
                    ]),
                );
            let (mock, ui) = interactor(mock).await;
            ui.select_option(&TRIGGER, "Piano").await.unwrap();
            assert_eq!(ui.text_of(&TRIGGER_LABEL).await, "Piano");
            assert!(!ui.is_displayed(&piano).await);
            assert_eq!(mock.call_count("click"), 2);
        }

        fn instrument_menu(options: Vec<(Locator, &'static str)>) -> MockDriver {
            let shown = options
                .iter()
                .map(|(option, _)| Reaction::Show(option.clone(), MockElement::visible()))
                .collect();
            options.into_iter().fold(
                MockDriver::new()
                    .with_page(
                        "/form",
                        "",
                        [
                            (TRIGGER, MockElement::visible()),
                            (TRIGGER_LABEL, MockElement::visible()),
                        ],
                    )
                    .on_click(TRIGGER, Reaction::All(shown)),
                |mock, (option, label)| {
                    mock.on_click(option, Reaction::SetText(TRIGGER_LABEL, label.into()))
                },
            )
        }

        #[tokio::test(start_paused = true)]
        async fn test_exact_option_beats_longer_match() {
            // contains(., 'Guitar') would land on "Bass Guitar" first
            let mock = instrument_menu(vec![
                (Locator::dropdown_option_containing("Guitar"), "Bass Guitar"),
                (Locator::dropdown_option("Guitar"), "Guitar"),
            ]);
            let (mock, ui) = interactor(mock).await;
            ui.select_option(&TRIGGER, "Guitar").await.unwrap();
            assert_eq!(ui.text_of(&TRIGGER_LABEL).await, "Guitar");
            assert!(mock.was_called("click:xpath=//div[@role='option'][normalize-space(.)='Guitar']"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_partial_option_is_fallback() {
            let mock = instrument_menu(vec![(
                Locator::dropdown_option_containing("Guitar"),
                "Electric Guitar",
            )]);
            let (_mock, ui) = interactor(mock).await;
            ui.select_option(&TRIGGER, "Guitar").await.unwrap();
            assert_eq!(ui.text_of(&TRIGGER_LABEL).await, "Electric Guitar");
        }

        #[tokio::test(start_paused = true)]
        async fn test_missing_option_fails() {
            let mock = MockDriver::new().with_page("/form", "", [(TRIGGER, MockElement::visible())]);
            let (_mock, ui) = interactor(mock).await;
            assert!(matches!(
                ui.select_option(&TRIGGER, "Theremin").await,
                Err(E2eError::Interaction { .. })
            ));
        }
    }
}
