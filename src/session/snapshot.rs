use crate::error::SessionError;
use crate::parsers::text::normalize_whitespace_in_segment;
use crate::session::{BrowserSession, Condition, Locator};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Handle to an element of a snapshot page: child indices from the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotElement {
    page: String,
    path: Vec<usize>,
}

/// Browser session replaying saved HTML pages.
///
/// Pages never change, so an element missing when a wait starts is reported
/// as a timeout right away. Clicks are recorded but have no effect.
#[derive(Debug, Default)]
pub struct SnapshotSession {
    pages: HashMap<String, String>,
    current: Mutex<Option<String>>,
    clicks: Mutex<Vec<String>>,
}

impl SnapshotSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` when navigating to `url`
    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Texts of the clicked elements, in click order
    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn current_page(&self) -> Result<(String, &str), SessionError> {
        let current = self
            .current
            .lock()
            .map_err(|_| SessionError::StaleElement)?
            .clone();
        let url = current.ok_or_else(|| SessionError::Navigation {
            url: String::new(),
            reason: "no page loaded".to_string(),
        })?;
        let html = self
            .pages
            .get(&url)
            .ok_or_else(|| SessionError::StaleElement)?;
        Ok((url, html.as_str()))
    }

    /// Runs `f` against the parsed current page
    fn with_document<R>(
        &self,
        f: impl FnOnce(&str, &Html) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let (url, html) = self.current_page()?;
        let document = Html::parse_document(html);
        f(&url, &document)
    }

    /// Runs `f` against an element of the current page
    fn with_element<R>(
        &self,
        element: &SnapshotElement,
        f: impl FnOnce(&str, ElementRef<'_>) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        self.with_document(|url, document| {
            if url != element.page {
                return Err(SessionError::StaleElement);
            }
            let element_ref = resolve(document, &element.path).ok_or(SessionError::StaleElement)?;
            f(url, element_ref)
        })
    }

    fn select(
        &self,
        parent: Option<&SnapshotElement>,
        locator: &Locator,
    ) -> Result<Vec<SnapshotElement>, SessionError> {
        let selector = selector_for(locator)?;
        match parent {
            Some(parent) => self.with_element(parent, |url, element| {
                Ok(handles(url, element.select(&selector)))
            }),
            None => self.with_document(|url, document| {
                Ok(handles(url, document.select(&selector)))
            }),
        }
    }

    fn first(matches: Vec<SnapshotElement>, locator: &Locator) -> Result<SnapshotElement, SessionError> {
        matches
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::NoSuchElement(locator.to_string()))
    }
}

fn selector_for(locator: &Locator) -> Result<Selector, SessionError> {
    let css = locator
        .to_css()
        .ok_or_else(|| SessionError::UnsupportedLocator(locator.to_string()))?;
    Selector::parse(&css).map_err(|_| SessionError::UnsupportedLocator(locator.to_string()))
}

fn handles<'a>(url: &str, matches: impl Iterator<Item = ElementRef<'a>>) -> Vec<SnapshotElement> {
    matches
        .map(|m| SnapshotElement {
            page: url.to_string(),
            path: path_of(m),
        })
        .collect()
}

/// Child indices leading from the document root to the element
fn path_of(element: ElementRef<'_>) -> Vec<usize> {
    let mut path = Vec::new();
    let mut node = *element;
    while let Some(parent) = node.parent() {
        path.push(node.prev_siblings().count());
        node = parent;
    }
    path.reverse();
    path
}

fn resolve<'a>(document: &'a Html, path: &[usize]) -> Option<ElementRef<'a>> {
    let mut node = document.tree.root();
    for index in path {
        node = node.children().nth(*index)?;
    }
    ElementRef::wrap(node)
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    let value = element.value();
    let inline_hidden = value
        .attr("style")
        .map(|style| style.replace(' ', "").contains("display:none"))
        .unwrap_or(false);
    value.attr("hidden").is_some() || value.attr("disabled").is_some() || inline_hidden
}

#[async_trait]
impl BrowserSession for SnapshotSession {
    type Element = SnapshotElement;

    async fn goto(&self, url: &str) -> Result<(), SessionError> {
        if !self.pages.contains_key(url) {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                reason: "no snapshot for this url".to_string(),
            });
        }
        let mut current = self.current.lock().map_err(|_| SessionError::StaleElement)?;
        *current = Some(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        Ok(self.current_page()?.0)
    }

    async fn find(&self, locator: &Locator) -> Result<SnapshotElement, SessionError> {
        Self::first(self.select(None, locator)?, locator)
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<SnapshotElement>, SessionError> {
        self.select(None, locator)
    }

    async fn find_in(
        &self,
        parent: &SnapshotElement,
        locator: &Locator,
    ) -> Result<SnapshotElement, SessionError> {
        Self::first(self.select(Some(parent), locator)?, locator)
    }

    async fn find_all_in(
        &self,
        parent: &SnapshotElement,
        locator: &Locator,
    ) -> Result<Vec<SnapshotElement>, SessionError> {
        self.select(Some(parent), locator)
    }

    async fn text(&self, element: &SnapshotElement) -> Result<String, SessionError> {
        self.with_element(element, |_, element| {
            let raw = element.text().collect::<String>();
            Ok(normalize_whitespace_in_segment(&raw))
        })
    }

    async fn attribute(
        &self,
        element: &SnapshotElement,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        self.with_element(element, |_, element| {
            Ok(element.value().attr(name).map(|v| v.to_string()))
        })
    }

    async fn click(&self, element: &SnapshotElement) -> Result<(), SessionError> {
        let label = self.text(element).await?;
        self.clicks
            .lock()
            .map_err(|_| SessionError::StaleElement)?
            .push(label);
        Ok(())
    }

    async fn wait_until(
        &self,
        condition: Condition<'_, SnapshotElement>,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let satisfied = match &condition {
            Condition::Present(locator) => !self.select(None, locator)?.is_empty(),
            Condition::Clickable(element) => {
                self.with_element(element, |_, element| Ok(!is_hidden(element)))?
            }
        };

        if satisfied {
            Ok(())
        } else {
            Err(SessionError::Timeout {
                condition: condition.to_string(),
                timeout,
            })
        }
    }
}
