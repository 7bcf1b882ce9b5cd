//! Scripted in-memory driver.
//!
//! Pages are registered per URL fragment; navigating loads the elements of the
//! longest matching fragment. Clicks can trigger [`Reaction`]s, which is enough
//! to model form submission, dropdowns and delayed rendering without a browser.

use super::{Driver, DriverError, DriverResult, ElementState};
use crate::locator::Locator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// First eight bytes of every PNG file
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// One element of the mock DOM
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockElement {
    /// Rendered and visible
    pub displayed: bool,
    /// Accepts input
    pub enabled: bool,
    /// Visible text
    pub text: String,
    /// Input value
    pub value: String,
    /// Extra attributes
    pub attributes: HashMap<String, String>,
    /// Lookups that still miss before the element renders
    pub absent_for: u32,
}

impl MockElement {
    /// Visible, enabled element
    #[must_use]
    pub fn visible() -> Self {
        Self {
            displayed: true,
            enabled: true,
            ..Self::default()
        }
    }

    /// Present in the DOM but not rendered
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            displayed: false,
            enabled: true,
            ..Self::default()
        }
    }

    /// Set visible text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set input value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Mark as disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Miss the first `lookups` lookups, simulating render delay
    #[must_use]
    pub const fn appearing_after(mut self, lookups: u32) -> Self {
        self.absent_for = lookups;
        self
    }
}

/// DOM change triggered by clicking an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Load the page registered for this URL
    Navigate(String),
    /// Insert or replace an element
    Show(Locator, MockElement),
    /// Remove an element
    Remove(Locator),
    /// Replace an element's visible text
    SetText(Locator, String),
    /// Branch on an input's current value
    When {
        /// Input to inspect
        field: Locator,
        /// Expected value
        equals: String,
        /// Applied when the value matches
        then: Box<Reaction>,
        /// Applied otherwise
        otherwise: Box<Reaction>,
    },
    /// Apply several reactions in order
    All(Vec<Reaction>),
}

impl Reaction {
    /// Branch on `field == equals`
    #[must_use]
    pub fn when(field: Locator, equals: impl Into<String>, then: Self, otherwise: Self) -> Self {
        Self::When {
            field,
            equals: equals.into(),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }
}

#[derive(Debug)]
struct MockPage {
    fragment: String,
    title: String,
    elements: Vec<(Locator, MockElement)>,
}

#[derive(Debug)]
struct MockState {
    url: String,
    title: String,
    pages: Vec<MockPage>,
    elements: HashMap<Locator, MockElement>,
    on_click: HashMap<Locator, Reaction>,
    scripts: Vec<(String, serde_json::Value)>,
    screenshot: Option<Vec<u8>>,
    history: Vec<String>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            title: String::new(),
            pages: Vec::new(),
            elements: HashMap::new(),
            on_click: HashMap::new(),
            scripts: Vec::new(),
            screenshot: Some(PNG_SIGNATURE.to_vec()),
            history: Vec::new(),
        }
    }
}

impl MockState {
    fn load(&mut self, url: &str) {
        self.url = url.to_string();
        let page = self
            .pages
            .iter()
            .filter(|p| url.contains(&p.fragment))
            .max_by_key(|p| p.fragment.len());
        match page {
            Some(page) => {
                self.title = page.title.clone();
                self.elements = page.elements.iter().cloned().collect();
            }
            None => {
                self.title.clear();
                self.elements.clear();
            }
        }
    }

    fn lookup(&mut self, locator: &Locator) -> DriverResult<&mut MockElement> {
        match self.elements.get_mut(locator) {
            None => Err(DriverError::NoSuchElement(locator.to_string())),
            Some(el) if el.absent_for > 0 => {
                el.absent_for -= 1;
                Err(DriverError::NoSuchElement(locator.to_string()))
            }
            Some(el) => Ok(el),
        }
    }

    fn interactable(&mut self, locator: &Locator) -> DriverResult<&mut MockElement> {
        let el = self.lookup(locator)?;
        if el.displayed && el.enabled {
            Ok(el)
        } else {
            Err(DriverError::NotInteractable(locator.to_string()))
        }
    }

    fn apply(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::Navigate(url) => self.load(&url),
            Reaction::Show(locator, el) => {
                self.elements.insert(locator, el);
            }
            Reaction::Remove(locator) => {
                self.elements.remove(&locator);
            }
            Reaction::SetText(locator, text) => {
                if let Some(el) = self.elements.get_mut(&locator) {
                    el.text = text;
                }
            }
            Reaction::When {
                field,
                equals,
                then,
                otherwise,
            } => {
                let matched = self
                    .elements
                    .get(&field)
                    .is_some_and(|el| el.value == equals);
                self.apply(if matched { *then } else { *otherwise });
            }
            Reaction::All(reactions) => {
                for r in reactions {
                    self.apply(r);
                }
            }
        }
    }

    fn click(&mut self, locator: &Locator) -> DriverResult<()> {
        self.history.push(format!("click:{locator}"));
        self.interactable(locator)?;
        if let Some(reaction) = self.on_click.get(locator).cloned() {
            self.apply(reaction);
        }
        Ok(())
    }

    fn attribute(&mut self, locator: &Locator, name: &str) -> DriverResult<Option<String>> {
        let el = self.lookup(locator)?;
        Ok(match name {
            "value" => Some(el.value.clone()),
            "disabled" if !el.enabled => Some("true".to_string()),
            _ => el.attributes.get(name).cloned(),
        })
    }

    fn execute(
        &mut self,
        script: &str,
        target: Option<&Locator>,
    ) -> DriverResult<serde_json::Value> {
        self.history.push(format!("script:{script}"));
        if let Some(locator) = target {
            self.lookup(locator)?;
        }
        Ok(self
            .scripts
            .iter()
            .find(|(pattern, _)| script.contains(pattern.as_str()))
            .map_or(serde_json::Value::Null, |(_, value)| value.clone()))
    }
}

/// Mock driver for unit testing
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Create an empty mock on `about:blank`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut MockState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a page served for URLs containing `fragment`
    #[must_use]
    pub fn with_page(
        mut self,
        fragment: impl Into<String>,
        title: impl Into<String>,
        elements: impl IntoIterator<Item = (Locator, MockElement)>,
    ) -> Self {
        self.state_mut().pages.push(MockPage {
            fragment: fragment.into(),
            title: title.into(),
            elements: elements.into_iter().collect(),
        });
        self
    }

    /// Trigger `reaction` whenever `locator` is clicked
    #[must_use]
    pub fn on_click(mut self, locator: Locator, reaction: Reaction) -> Self {
        self.state_mut().on_click.insert(locator, reaction);
        self
    }

    /// Return `value` from scripts containing `pattern`
    #[must_use]
    pub fn with_script_result(
        mut self,
        pattern: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        self.state_mut().scripts.push((pattern.into(), value));
        self
    }

    /// Make every screenshot attempt fail
    #[must_use]
    pub fn without_screenshots(mut self) -> Self {
        self.state_mut().screenshot = None;
        self
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state().history.iter().any(|c| c.starts_with(method))
    }

    /// Number of recorded calls starting with `method`
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .history
            .iter()
            .filter(|c| c.starts_with(method))
            .count()
    }

    /// Current value of an input, ignoring render delay
    #[must_use]
    pub fn value_of(&self, locator: &Locator) -> Option<String> {
        self.state().elements.get(locator).map(|el| el.value.clone())
    }

    /// Current text of an element, ignoring render delay
    #[must_use]
    pub fn text_of(&self, locator: &Locator) -> Option<String> {
        self.state().elements.get(locator).map(|el| el.text.clone())
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn navigate(&self, url: &str) -> DriverResult<()> {
        let mut state = self.state();
        state.history.push(format!("navigate:{url}"));
        state.load(url);
        Ok(())
    }

    async fn current_url(&self) -> DriverResult<String> {
        Ok(self.state().url.clone())
    }

    async fn title(&self) -> DriverResult<String> {
        Ok(self.state().title.clone())
    }

    async fn inspect(&self, locator: &Locator) -> DriverResult<ElementState> {
        let mut state = self.state();
        let el = state.lookup(locator)?;
        Ok(ElementState {
            displayed: el.displayed,
            enabled: el.enabled,
        })
    }

    async fn click(&self, locator: &Locator) -> DriverResult<()> {
        self.state().click(locator)
    }

    async fn clear(&self, locator: &Locator) -> DriverResult<()> {
        let mut state = self.state();
        state.history.push(format!("clear:{locator}"));
        state.interactable(locator)?.value.clear();
        Ok(())
    }

    async fn send_keys(&self, locator: &Locator, text: &str) -> DriverResult<()> {
        let mut state = self.state();
        state.history.push(format!("send_keys:{locator}:{text}"));
        state.interactable(locator)?.value.push_str(text);
        Ok(())
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> DriverResult<Option<String>> {
        self.state().attribute(locator, name)
    }

    async fn text(&self, locator: &Locator) -> DriverResult<String> {
        let mut state = self.state();
        Ok(state.lookup(locator)?.text.clone())
    }

    async fn execute_script(
        &self,
        script: &str,
        target: Option<&Locator>,
    ) -> DriverResult<serde_json::Value> {
        self.state().execute(script, target)
    }

    async fn screenshot_png(&self) -> DriverResult<Vec<u8>> {
        let mut state = self.state();
        state.history.push("screenshot".to_string());
        state
            .screenshot
            .clone()
            .ok_or_else(|| DriverError::Session("screenshot unavailable".to_string()))
    }

    async fn delete_all_cookies(&self) -> DriverResult<()> {
        self.state().history.push("delete_all_cookies".to_string());
        Ok(())
    }

    async fn maximize_window(&self) -> DriverResult<()> {
        self.state().history.push("maximize_window".to_string());
        Ok(())
    }

    async fn quit(&self) -> DriverResult<()> {
        self.state().history.push("quit".to_string());
        Ok(())
    }
}
