//! Browser capabilities the collector relies on.
//!
//! [`BrowserSession`] is implemented over a live WebDriver client and over
//! saved HTML pages, so the same pass can run against a real browser or a
//! snapshot.

pub mod snapshot;
pub mod webdriver;

pub use snapshot::SnapshotSession;
pub use webdriver::WebDriverSession;

use crate::error::SessionError;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// How to find an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
    Id(String),
    Tag(String),
    Class(String),
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Locator::Css(selector.to_string())
    }

    pub fn id(id: &str) -> Self {
        Locator::Id(id.to_string())
    }

    pub fn tag(tag: &str) -> Self {
        Locator::Tag(tag.to_string())
    }

    pub fn class(class: &str) -> Self {
        Locator::Class(class.to_string())
    }

    /// The equivalent CSS selector, None for XPath
    pub fn to_css(&self) -> Option<String> {
        match self {
            Locator::Css(selector) => Some(selector.clone()),
            Locator::XPath(_) => None,
            Locator::Id(id) => Some(format!("#{}", id)),
            Locator::Tag(tag) => Some(tag.clone()),
            Locator::Class(class) => Some(format!(".{}", class)),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css `{}`", selector),
            Locator::XPath(path) => write!(f, "xpath `{}`", path),
            Locator::Id(id) => write!(f, "id `{}`", id),
            Locator::Tag(tag) => write!(f, "tag `{}`", tag),
            Locator::Class(class) => write!(f, "class `{}`", class),
        }
    }
}

/// Condition a session can wait for
#[derive(Debug)]
pub enum Condition<'a, E> {
    /// An element matching the locator is in the page
    Present(&'a Locator),
    /// The element is displayed and enabled
    Clickable(&'a E),
}

impl<E> fmt::Display for Condition<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Present(locator) => write!(f, "presence of {}", locator),
            Condition::Clickable(_) => write!(f, "element to be clickable"),
        }
    }
}

/// A controllable browser tab
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Handle to an element of the current page
    type Element: Clone + Send + Sync;

    async fn goto(&self, url: &str) -> Result<(), SessionError>;

    async fn current_url(&self) -> Result<String, SessionError>;

    /// First element of the page matching the locator
    async fn find(&self, locator: &Locator) -> Result<Self::Element, SessionError>;

    /// All elements of the page matching the locator, in document order
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, SessionError>;

    /// First descendant of `parent` matching the locator
    async fn find_in(
        &self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Self::Element, SessionError>;

    /// All descendants of `parent` matching the locator
    async fn find_all_in(
        &self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Vec<Self::Element>, SessionError>;

    /// Rendered text of the element
    async fn text(&self, element: &Self::Element) -> Result<String, SessionError>;

    /// Attribute value, resolved the way the browser reports it (e.g. absolute `href`)
    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, SessionError>;

    async fn click(&self, element: &Self::Element) -> Result<(), SessionError>;

    /// Waits until the condition holds, failing with [`SessionError::Timeout`] after `timeout`
    async fn wait_until(
        &self,
        condition: Condition<'_, Self::Element>,
        timeout: Duration,
    ) -> Result<(), SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_to_css() {
        assert_eq!(Locator::id("btn").to_css().unwrap(), "#btn");
        assert_eq!(Locator::class("media-body").to_css().unwrap(), ".media-body");
        assert_eq!(Locator::tag("h3").to_css().unwrap(), "h3");
        assert_eq!(Locator::css("h3 small").to_css().unwrap(), "h3 small");
        assert!(Locator::XPath("//article".to_string()).to_css().is_none());
    }

    #[test]
    fn test_condition_display() {
        let locator = Locator::class("publication");
        let condition: Condition<'_, ()> = Condition::Present(&locator);
        assert_eq!(condition.to_string(), "presence of class `publication`");
    }
}
