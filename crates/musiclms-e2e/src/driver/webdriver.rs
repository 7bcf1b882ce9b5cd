//! WebDriver backend built on `thirtyfour`.

use super::{Driver, DriverError, DriverResult, ElementState};
use crate::locator::{Locator, Strategy};
use async_trait::async_trait;
use std::fmt;
use thirtyfour::error::{WebDriverError, WebDriverErrorInner};
use thirtyfour::prelude::*;

/// A live browser session behind a WebDriver server
pub struct WebDriverSession {
    driver: WebDriver,
}

impl fmt::Debug for WebDriverSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDriverSession").finish_non_exhaustive()
    }
}

impl WebDriverSession {
    /// Wrap an already connected session
    #[must_use]
    pub const fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    async fn find(&self, locator: &Locator) -> DriverResult<WebElement> {
        self.driver
            .find(by(locator))
            .await
            .map_err(|e| element_error(e, locator))
    }
}

fn by(locator: &Locator) -> By {
    let value = locator.value().to_string();
    match locator.strategy() {
        Strategy::Id => By::Id(value),
        Strategy::Name => By::Name(value),
        Strategy::Css => By::Css(value),
        Strategy::XPath => By::XPath(value),
        Strategy::LinkText => By::LinkText(value),
    }
}

fn element_error(err: WebDriverError, locator: &Locator) -> DriverError {
    match err.as_inner() {
        WebDriverErrorInner::NoSuchElement(..) => DriverError::NoSuchElement(locator.to_string()),
        WebDriverErrorInner::StaleElementReference(..) => {
            DriverError::StaleElement(locator.to_string())
        }
        WebDriverErrorInner::ElementNotInteractable(..) | WebDriverErrorInner::ElementClickIntercepted(..) => {
            DriverError::NotInteractable(locator.to_string())
        }
        _ => DriverError::Session(err.to_string()),
    }
}

fn session_error(err: WebDriverError) -> DriverError {
    DriverError::Session(err.to_string())
}

#[async_trait]
impl Driver for WebDriverSession {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.driver.goto(url).await.map_err(session_error)
    }

    async fn current_url(&self) -> DriverResult<String> {
        let url = self.driver.current_url().await.map_err(session_error)?;
        Ok(url.to_string())
    }

    async fn title(&self) -> DriverResult<String> {
        self.driver.title().await.map_err(session_error)
    }

    async fn inspect(&self, locator: &Locator) -> DriverResult<ElementState> {
        let element = self.find(locator).await?;
        let displayed = element
            .is_displayed()
            .await
            .map_err(|e| element_error(e, locator))?;
        let enabled = element
            .is_enabled()
            .await
            .map_err(|e| element_error(e, locator))?;
        Ok(ElementState { displayed, enabled })
    }

    async fn click(&self, locator: &Locator) -> DriverResult<()> {
        let element = self.find(locator).await?;
        element.click().await.map_err(|e| element_error(e, locator))
    }

    async fn clear(&self, locator: &Locator) -> DriverResult<()> {
        let element = self.find(locator).await?;
        element.clear().await.map_err(|e| element_error(e, locator))
    }

    async fn send_keys(&self, locator: &Locator, text: &str) -> DriverResult<()> {
        let element = self.find(locator).await?;
        element
            .send_keys(text)
            .await
            .map_err(|e| element_error(e, locator))
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> DriverResult<Option<String>> {
        let element = self.find(locator).await?;
        // Input state lives in DOM properties; fall back to the markup attribute.
        let property = element
            .prop(name)
            .await
            .map_err(|e| element_error(e, locator))?;
        match property {
            Some(value) => Ok(Some(value)),
            None => element
                .attr(name)
                .await
                .map_err(|e| element_error(e, locator)),
        }
    }

    async fn text(&self, locator: &Locator) -> DriverResult<String> {
        let element = self.find(locator).await?;
        element.text().await.map_err(|e| element_error(e, locator))
    }

    async fn execute_script(
        &self,
        script: &str,
        target: Option<&Locator>,
    ) -> DriverResult<serde_json::Value> {
        let mut args = Vec::new();
        if let Some(locator) = target {
            let element = self.find(locator).await?;
            args.push(element.to_json().map_err(session_error)?);
        }
        let ret = self
            .driver
            .execute(script, args)
            .await
            .map_err(session_error)?;
        Ok(ret.json().clone())
    }

    async fn screenshot_png(&self) -> DriverResult<Vec<u8>> {
        self.driver.screenshot_as_png().await.map_err(session_error)
    }

    async fn delete_all_cookies(&self) -> DriverResult<()> {
        self.driver.delete_all_cookies().await.map_err(session_error)
    }

    async fn maximize_window(&self) -> DriverResult<()> {
        self.driver.maximize_window().await.map_err(session_error)
    }

    async fn quit(&self) -> DriverResult<()> {
        self.driver.clone().quit().await.map_err(session_error)
    }
}
