use crate::browser::{Browser, ClassSelector, PageElement};
use crate::error::{MirrorError, Result};
use crate::session::CookieRecord;
use fantoccini::cookies::Cookie;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder, Locator};

/// Browser session on a WebDriver server
pub struct WebDriverBrowser {
    client: Client,
}

/// Element handle from a WebDriver session
pub struct WebDriverElement {
    element: Element,
}

impl WebDriverBrowser {
    /// Connects to the WebDriver instance, trying the usual local ports if
    /// the configured one does not answer
    pub async fn connect(webdriver_url: &str) -> Result<Self> {
        match ClientBuilder::native().connect(webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self { client });
            }
            Err(e) => {
                ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            }
        }

        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://localhost:4444", // Selenium / geckodriver default
            "http://127.0.0.1:4444", // Try with IP instead of localhost
        ];

        for url in fallback_urls.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = ClientBuilder::native().connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(MirrorError::Connect {
            url: webdriver_url.to_string(),
        })
    }
}

/// Wraps a WebDriver command error with the action that failed
fn command_error(context: impl Into<String>, error: CmdError) -> MirrorError {
    let context = context.into();
    let stale = matches!(
        &error,
        CmdError::Standard(w) if matches!(w.error, ErrorStatus::StaleElementReference)
    );
    if stale {
        return MirrorError::StaleElement { context };
    }
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while {}", context);
    }
    MirrorError::browser(context, error.to_string())
}

fn is_invalid_cookie_domain(error: &CmdError) -> bool {
    matches!(error, CmdError::Standard(w) if matches!(w.error, ErrorStatus::InvalidCookieDomain))
}

impl PageElement for WebDriverElement {
    async fn text(&self) -> Result<String> {
        self.element
            .text()
            .await
            .map_err(|e| command_error("reading element text", e))
    }

    async fn click(&self) -> Result<()> {
        self.element
            .click()
            .await
            .map_err(|e| command_error("clicking element", e))
    }

    async fn inner_html(&self) -> Result<String> {
        let html = self
            .element
            .prop("innerHTML")
            .await
            .map_err(|e| command_error("reading innerHTML", e))?;
        Ok(html.unwrap_or_default())
    }
}

impl Browser for WebDriverBrowser {
    type Element = WebDriverElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        ::log::debug!("GOTO: {}", url);
        self.client
            .goto(url)
            .await
            .map_err(|e| command_error(format!("accessing {}", url), e))
    }

    async fn current_url(&self) -> Result<String> {
        let url = self
            .client
            .current_url()
            .await
            .map_err(|e| command_error("reading current URL", e))?;
        Ok(url.to_string())
    }

    async fn find_all(&self, selector: &ClassSelector) -> Result<Vec<WebDriverElement>> {
        let css = selector.css();
        let elements = self
            .client
            .find_all(Locator::Css(&css))
            .await
            .map_err(|e| command_error(format!("querying {}", css), e))?;
        Ok(elements
            .into_iter()
            .map(|element| WebDriverElement { element })
            .collect())
    }

    async fn add_cookie(&self, record: &CookieRecord) -> Result<()> {
        let mut cookie = Cookie::new(record.name.clone(), record.value.clone());
        if let Some(domain) = &record.domain {
            cookie.set_domain(domain.clone());
        }
        if let Some(path) = &record.path {
            cookie.set_path(path.clone());
        }
        if let Some(secure) = record.secure {
            cookie.set_secure(secure);
        }
        if let Some(http_only) = record.http_only {
            cookie.set_http_only(http_only);
        }

        match self.client.add_cookie(cookie).await {
            Ok(()) => Ok(()),
            Err(e) if is_invalid_cookie_domain(&e) => Err(MirrorError::DomainMismatch {
                name: record.name.clone(),
                domain: record.domain.clone().unwrap_or_default(),
            }),
            Err(e) => Err(command_error(format!("adding cookie {}", record.name), e)),
        }
    }

    async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| command_error("closing session", e))
    }
}
