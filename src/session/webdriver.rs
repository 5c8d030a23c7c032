use crate::error::SessionError;
use crate::session::{BrowserSession, Condition, Locator};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Interval between two checks of a wait condition
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Browser options for a new WebDriver session
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

impl BrowserOptions {
    /// Chrome capabilities for these options
    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut args = vec![
            format!("--window-size={},{}", self.window_width, self.window_height),
            "--disable-gpu".to_string(),
        ];
        if self.headless {
            args.push("--headless".to_string());
        }

        let mut caps = serde_json::Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }
}

/// Browser session driven through a WebDriver server
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Connects to the WebDriver instance and opens a new browser window
    pub async fn connect(
        webdriver_url: &str,
        options: &BrowserOptions,
    ) -> Result<Self, SessionError> {
        let client = ClientBuilder::native()
            .capabilities(options.capabilities())
            .connect(webdriver_url)
            .await
            .map_err(|e| SessionError::Navigation {
                url: webdriver_url.to_string(),
                reason: e.to_string(),
            })?;

        ::log::debug!("Connected to WebDriver at {}", webdriver_url);
        Ok(Self { client })
    }

    /// Wraps an already connected client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Ends the browser session
    pub async fn close(self) -> Result<(), SessionError> {
        self.client.close().await?;
        Ok(())
    }

    async fn is_clickable(element: &Element) -> Result<bool, SessionError> {
        Ok(element.is_displayed().await? && element.is_enabled().await?)
    }
}

/// Owned form of a locator, borrowed as a fantoccini locator per command
enum Query {
    Css(String),
    XPath(String),
}

impl Query {
    fn from_locator(locator: &Locator) -> Self {
        match locator {
            Locator::XPath(path) => Query::XPath(path.clone()),
            other => Query::Css(other.to_css().unwrap_or_default()),
        }
    }

    fn as_fantoccini(&self) -> fantoccini::Locator<'_> {
        match self {
            Query::Css(selector) => fantoccini::Locator::Css(selector),
            Query::XPath(path) => fantoccini::Locator::XPath(path),
        }
    }
}

/// Maps a lookup failure, keeping "not found" distinct from transport errors
fn lookup_error(error: CmdError, locator: &Locator) -> SessionError {
    if error.is_no_such_element() {
        SessionError::NoSuchElement(locator.to_string())
    } else {
        SessionError::WebDriver(error)
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    type Element = Element;

    async fn goto(&self, url: &str) -> Result<(), SessionError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| SessionError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn find(&self, locator: &Locator) -> Result<Element, SessionError> {
        let query = Query::from_locator(locator);
        self.client
            .find(query.as_fantoccini())
            .await
            .map_err(|e| lookup_error(e, locator))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Element>, SessionError> {
        let query = Query::from_locator(locator);
        self.client
            .find_all(query.as_fantoccini())
            .await
            .map_err(|e| lookup_error(e, locator))
    }

    async fn find_in(&self, parent: &Element, locator: &Locator) -> Result<Element, SessionError> {
        let query = Query::from_locator(locator);
        parent
            .find(query.as_fantoccini())
            .await
            .map_err(|e| lookup_error(e, locator))
    }

    async fn find_all_in(
        &self,
        parent: &Element,
        locator: &Locator,
    ) -> Result<Vec<Element>, SessionError> {
        let query = Query::from_locator(locator);
        parent
            .find_all(query.as_fantoccini())
            .await
            .map_err(|e| lookup_error(e, locator))
    }

    async fn text(&self, element: &Element) -> Result<String, SessionError> {
        Ok(element.text().await?)
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>, SessionError> {
        // The DOM property carries the resolved value (absolute href)
        if let Some(value) = element.prop(name).await? {
            return Ok(Some(value));
        }
        Ok(element.attr(name).await?)
    }

    async fn click(&self, element: &Element) -> Result<(), SessionError> {
        element.click().await?;
        Ok(())
    }

    async fn wait_until(
        &self,
        condition: Condition<'_, Element>,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            let satisfied = match &condition {
                Condition::Present(locator) => match self.find(locator).await {
                    Ok(_) => true,
                    Err(e) if e.is_missing() => false,
                    Err(e) => return Err(e),
                },
                Condition::Clickable(element) => Self::is_clickable(element).await?,
            };
            if satisfied {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(SessionError::Timeout {
                    condition: condition.to_string(),
                    timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities() {
        let caps = BrowserOptions::default().capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless")));
        assert!(args.contains(&json!("--window-size=1920,1080")));

        let headed = BrowserOptions {
            headless: false,
            ..BrowserOptions::default()
        };
        let caps = headed.capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.contains(&json!("--headless")));
    }

    #[test]
    fn test_lookup_error_keeps_missing_apart() {
        use fantoccini::error::{ErrorStatus, WebDriver};

        let locator = Locator::id("onetrust-accept-btn-handler");
        let missing = CmdError::Standard(WebDriver::new(
            ErrorStatus::NoSuchElement,
            "no such element",
        ));
        let err = lookup_error(missing, &locator);
        assert!(err.is_missing());
        assert!(matches!(err, SessionError::NoSuchElement(ref l) if l.contains("onetrust")));

        let transport = CmdError::NotW3C(json!({ "status": 13 }));
        let err = lookup_error(transport, &locator);
        assert!(!err.is_missing());
        assert!(matches!(err, SessionError::WebDriver(_)));
    }

    #[test]
    fn test_query_from_locator() {
        let query = Query::from_locator(&Locator::class("publication"));
        assert!(matches!(query.as_fantoccini(), fantoccini::Locator::Css(".publication")));

        let query = Query::from_locator(&Locator::XPath("//article".to_string()));
        assert!(matches!(query.as_fantoccini(), fantoccini::Locator::XPath("//article")));
    }
}
