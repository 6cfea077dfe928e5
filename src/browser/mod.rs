//! Browser-automation seam.
//!
//! The crawl only needs a handful of operations from the browser: load a URL,
//! list the elements matching a query, and click or read one of them. Element
//! handles are only valid until the next navigation, so callers must query
//! again after every click instead of keeping handles around.

pub mod webdriver;

use crate::config::WaitConfig;
use crate::error::{MirrorError, Result};
use crate::session::CookieRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::{Instant, sleep};

/// Query for elements whose class attribute begins with a prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSelector {
    /// Element tag name
    pub tag: String,

    /// Leading part of the class attribute
    pub class_prefix: String,
}

impl ClassSelector {
    pub fn new(tag: &str, class_prefix: &str) -> Self {
        Self {
            tag: tag.to_string(),
            class_prefix: class_prefix.to_string(),
        }
    }

    /// CSS form of the query
    pub fn css(&self) -> String {
        format!(r#"{}[class^="{}"]"#, self.tag, self.class_prefix)
    }
}

impl fmt::Display for ClassSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

/// A live element of the current page
#[allow(async_fn_in_trait)]
pub trait PageElement {
    /// Rendered text of the element
    async fn text(&self) -> Result<String>;

    /// Click the element; this may navigate and invalidate every handle
    async fn click(&self) -> Result<()>;

    /// Markup inside the element
    async fn inner_html(&self) -> Result<String>;
}

/// A browser session driving the site
#[allow(async_fn_in_trait)]
pub trait Browser {
    type Element: PageElement;

    /// Load a URL in the current window
    async fn navigate(&self, url: &str) -> Result<()>;

    /// URL of the page currently shown
    async fn current_url(&self) -> Result<String>;

    /// All elements matching the query, in document order
    async fn find_all(&self, selector: &ClassSelector) -> Result<Vec<Self::Element>>;

    /// Install a cookie for the current domain.
    ///
    /// Fails with `MirrorError::DomainMismatch` when the cookie belongs to
    /// another domain.
    async fn add_cookie(&self, cookie: &CookieRecord) -> Result<()>;

    /// End the session
    async fn close(self) -> Result<()>;
}

/// Poll until at least one element matches the query.
///
/// Queries every `poll_interval` and gives up with `NavigationTimeout` once
/// `timeout` has elapsed. Dropping the returned future cancels the wait.
pub async fn wait_for_elements<B: Browser>(
    browser: &B,
    selector: &ClassSelector,
    wait: &WaitConfig,
) -> Result<Vec<B::Element>> {
    let started = Instant::now();
    let timeout = wait.timeout();
    let mut polls = 0u32;

    loop {
        let found = browser.find_all(selector).await?;
        polls += 1;
        if !found.is_empty() {
            ::log::trace!("{} ready after {} polls", selector, polls);
            return Ok(found);
        }

        let waited = started.elapsed();
        if waited >= timeout {
            ::log::warn!("Gave up waiting for {} after {:?}", selector, waited);
            return Err(MirrorError::NavigationTimeout {
                selector: selector.to_string(),
                waited,
            });
        }
        sleep(wait.poll_interval().min(timeout - waited)).await;
    }
}

/// The view shown before a click: one element of it and its markup
pub struct ViewMarker<E> {
    element: E,
    html: String,
}

/// Remember the current view by its first `selector` match.
///
/// Returns `None` when nothing matches, or when the match is already going
/// away, since there is then no old view to wait out.
pub async fn mark_view<B: Browser>(
    browser: &B,
    selector: &ClassSelector,
) -> Result<Option<ViewMarker<B::Element>>> {
    let Some(element) = browser.find_all(selector).await?.into_iter().next() else {
        return Ok(None);
    };
    match element.inner_html().await {
        Ok(html) => Ok(Some(ViewMarker { element, html })),
        Err(MirrorError::StaleElement { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Poll until the marked view has been replaced.
///
/// The view is gone once its element is stale or shows different markup.
/// Until then, every query still sees the previous view, so this must
/// finish before the next level's lists are read.
pub async fn wait_for_departure<E: PageElement>(
    marker: &ViewMarker<E>,
    selector: &ClassSelector,
    wait: &WaitConfig,
) -> Result<()> {
    let started = Instant::now();
    let timeout = wait.timeout();

    loop {
        match marker.element.inner_html().await {
            Err(MirrorError::StaleElement { .. }) => return Ok(()),
            Err(e) => return Err(e),
            Ok(html) if html != marker.html => return Ok(()),
            Ok(_) => {}
        }

        let waited = started.elapsed();
        if waited >= timeout {
            ::log::warn!("{} still shows the previous view after {:?}", selector, waited);
            return Err(MirrorError::NavigationTimeout {
                selector: selector.to_string(),
                waited,
            });
        }
        sleep(wait.poll_interval().min(timeout - waited)).await;
    }
}
