use crate::browser::{Browser, ClassSelector, PageElement};
use crate::error::{MirrorError, Result};

/// Reads the markup of the content viewer on the page currently shown
pub async fn extract_content<B: Browser>(browser: &B, viewer: &ClassSelector) -> Result<String> {
    let found = browser.find_all(viewer).await?;
    let Some(element) = found.first() else {
        return Err(MirrorError::ElementNotFound {
            selector: viewer.to_string(),
        });
    };

    if found.len() > 1 {
        ::log::warn!(
            "{} content viewers match {}, using the first",
            found.len(),
            viewer
        );
    }

    let html = element.inner_html().await?;
    ::log::debug!("Extracted {} bytes of content", html.len());
    Ok(html)
}
