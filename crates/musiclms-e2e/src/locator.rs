//! Element locators.
//!
//! A [`Locator`] names *how* to find one element, never the element itself.
//! Every interaction re-resolves its locator against the live DOM, so a page
//! that re-rendered or navigated never hands back a cached handle.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Strategy used to resolve a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Element `id` attribute
    Id,
    /// Element `name` attribute
    Name,
    /// CSS selector
    Css,
    /// XPath expression (text matches live here)
    XPath,
    /// Exact anchor text
    LinkText,
}

impl Strategy {
    /// Short prefix used when printing a locator
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::LinkText => "link",
        }
    }
}

/// Identifies a single UI element by strategy and value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: Cow<'static, str>,
}

impl Locator {
    /// Locate by `id`
    #[must_use]
    pub const fn id(value: &'static str) -> Self {
        Self::borrowed(Strategy::Id, value)
    }

    /// Locate by `name`
    #[must_use]
    pub const fn name(value: &'static str) -> Self {
        Self::borrowed(Strategy::Name, value)
    }

    /// Locate by CSS selector
    #[must_use]
    pub const fn css(value: &'static str) -> Self {
        Self::borrowed(Strategy::Css, value)
    }

    /// Locate by XPath expression
    #[must_use]
    pub const fn xpath(value: &'static str) -> Self {
        Self::borrowed(Strategy::XPath, value)
    }

    /// Locate an anchor by its exact text
    #[must_use]
    pub const fn link_text(value: &'static str) -> Self {
        Self::borrowed(Strategy::LinkText, value)
    }

    const fn borrowed(strategy: Strategy, value: &'static str) -> Self {
        Self {
            strategy,
            value: Cow::Borrowed(value),
        }
    }

    /// Build a locator from a runtime value
    #[must_use]
    pub fn dynamic(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: Cow::Owned(value.into()),
        }
    }

    /// `<tag>` whose own text contains `text`
    #[must_use]
    pub fn tag_containing(tag: &str, text: &str) -> Self {
        Self::dynamic(
            Strategy::XPath,
            format!("//{tag}[contains(text(),{})]", xpath_literal(text)),
        )
    }

    /// Option of an open custom dropdown whose visible text is exactly `text`
    #[must_use]
    pub fn dropdown_option(text: &str) -> Self {
        Self::dynamic(
            Strategy::XPath,
            format!(
                "//div[@role='option'][normalize-space(.)={}]",
                xpath_literal(text.trim())
            ),
        )
    }

    /// Option of an open custom dropdown whose visible text contains `text`
    #[must_use]
    pub fn dropdown_option_containing(text: &str) -> Self {
        Self::dynamic(
            Strategy::XPath,
            format!(
                "//div[@role='option'][contains(normalize-space(.),{})]",
                xpath_literal(text.trim())
            ),
        )
    }

    /// Anchor whose `href` ends with `path`
    #[must_use]
    pub fn link_to(path: &str) -> Self {
        Self::dynamic(Strategy::Css, format!("a[href$='{path}']"))
    }

    /// Resolution strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Raw selector value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.prefix(), self.value)
    }
}

/// Quote `text` as an XPath 1.0 string literal.
///
/// XPath has no escape syntax, so text holding both quote kinds is split
/// into a `concat()` of single-quoted and double-quoted pieces.
#[must_use]
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    let parts: Vec<String> = text
        .split('\'')
        .map(|piece| format!("'{piece}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod constructor_tests {
        use super::*;

        const EMAIL: Locator = Locator::id("email");

        #[test]
        fn test_const_locator() {
            assert_eq!(EMAIL.strategy(), Strategy::Id);
            assert_eq!(EMAIL.value(), "email");
            assert_eq!(EMAIL.to_string(), "id=email");
        }

        #[test]
        fn test_tag_containing() {
            let loc = Locator::tag_containing("button", "Log in");
            assert_eq!(loc.strategy(), Strategy::XPath);
            assert_eq!(loc.value(), "//button[contains(text(),'Log in')]");
        }

        #[test]
        fn test_dropdown_option() {
            let loc = Locator::dropdown_option("Guitar");
            assert_eq!(loc.value(), "//div[@role='option'][normalize-space(.)='Guitar']");
            let loc = Locator::dropdown_option_containing(" Guitar ");
            assert_eq!(
                loc.value(),
                "//div[@role='option'][contains(normalize-space(.),'Guitar')]"
            );
        }

        #[test]
        fn test_link_to() {
            let loc = Locator::link_to("/dashboard/assignments");
            assert_eq!(loc.to_string(), "css=a[href$='/dashboard/assignments']");
        }

        #[test]
        fn test_dynamic_equals_const() {
            assert_eq!(
                Locator::dynamic(Strategy::Name, "title"),
                Locator::name("title")
            );
        }
    }

    mod xpath_literal_tests {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn test_plain_text() {
            assert_eq!(xpath_literal("Piano"), "'Piano'");
        }

        #[test]
        fn test_single_quote() {
            assert_eq!(xpath_literal("Don't"), "\"Don't\"");
        }

        #[test]
        fn test_both_quotes() {
            assert_eq!(
                xpath_literal("it's \"fine\""),
                "concat('it', \"'\", 's \"fine\"')"
            );
        }

        proptest! {
            #[test]
            fn prop_literal_is_quoted(text in "[a-zA-Z0-9 '\"]{0,24}") {
                let lit = xpath_literal(&text);
                let quoted = (lit.starts_with('\'') && lit.ends_with('\''))
                    || (lit.starts_with('"') && lit.ends_with('"'))
                    || (lit.starts_with("concat(") && lit.ends_with(')'));
                prop_assert!(quoted);
            }
        }
    }
}
