use crate::browser::Browser;
use crate::error::{MirrorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A captured cookie, in the shape WebDriver reports cookies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Unix timestamp in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

impl CookieRecord {
    pub fn new(name: &str, value: &str, domain: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            domain: Some(domain.to_string()),
            path: Some("/".to_string()),
            expiry: None,
            secure: None,
            http_only: None,
            same_site: None,
        }
    }
}

/// Outcome of replaying a cookie jar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CookieLoad {
    pub loaded: usize,
    pub skipped: usize,
}

/// Read a captured cookie jar (a JSON array of cookie records)
pub fn read_cookies<P: AsRef<Path>>(path: P) -> Result<Vec<CookieRecord>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        MirrorError::Config(format!("cannot read cookies {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        MirrorError::Config(format!("invalid cookies {}: {}", path.display(), e))
    })
}

/// Replay captured cookies into the browser.
///
/// Cookies only install on the domain currently loaded, so the start URL is
/// opened first. Cookies for other domains are skipped; any other failure
/// aborts.
pub async fn apply_cookies<B: Browser>(
    browser: &B,
    start_url: &str,
    cookies: &[CookieRecord],
) -> Result<CookieLoad> {
    browser.navigate(start_url).await?;

    let mut load = CookieLoad::default();
    for cookie in cookies {
        match browser.add_cookie(cookie).await {
            Ok(()) => load.loaded += 1,
            Err(MirrorError::DomainMismatch { name, domain }) => {
                ::log::debug!("Skipping cookie {} for domain {}", name, domain);
                load.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    ::log::info!(
        "Loaded {} cookies ({} skipped for other domains)",
        load.loaded,
        load.skipped
    );
    Ok(load)
}
