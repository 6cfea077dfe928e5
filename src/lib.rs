pub mod browser;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod fetch;
pub mod parsers;
pub mod results;
pub mod session;
pub mod utils;
pub mod writer;

// Re-export commonly used types for convenience
pub use config::MirrorConfig;
pub use error::{MirrorError, Result};
pub use results::{MirrorStats, PageDocument};

use browser::Browser;
use browser::webdriver::WebDriverBrowser;
use crawlers::NavigationIndexer;
use fetch::{Fetcher, HttpFetcher, RetryingFetcher};
use session::CookieRecord;
use std::path::PathBuf;

/// Builder for a mirror run
pub struct Mirror {
    config: MirrorConfig,
}

impl Mirror {
    /// Create a new Mirror for the given course URL with default settings
    pub fn new(start_url: &str) -> Self {
        Self {
            config: MirrorConfig::new(start_url),
        }
    }

    /// Use a complete configuration
    pub fn with_config(mut self, config: MirrorConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = MirrorConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set the course URL
    pub fn with_start_url(mut self, url: &str) -> Self {
        self.config.start_url = url.to_string();
        self
    }

    /// Set the captured cookie file
    pub fn with_cookies_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cookies_path = path.into();
        self
    }

    /// Set the directory the mirror is written to
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set the WebDriver server URL
    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self
    }

    /// Set how long to wait for a view to render
    pub fn with_wait_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.wait.timeout_ms = timeout_seconds.saturating_mul(1000);
        self
    }

    /// Set how many times a failed image download is retried
    pub fn with_download_retries(mut self, retries: u32) -> Self {
        self.config.download_retries = retries;
        self
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Connect to WebDriver, restore the session and mirror the course.
    ///
    /// Ctrl-C stops the crawl; the browser session is closed either way.
    pub async fn run(mut self) -> Result<MirrorStats> {
        self.config.apply_env();
        if url::Url::parse(&self.config.start_url).is_err() {
            return Err(MirrorError::Config(format!(
                "invalid start URL {:?}",
                self.config.start_url
            )));
        }

        let cookies = session::read_cookies(&self.config.cookies_path)?;
        let fetcher = RetryingFetcher::new(
            HttpFetcher::new(),
            self.config.download_retries,
            self.config.retry_backoff(),
        );
        let browser = WebDriverBrowser::connect(&self.config.webdriver_url).await?;

        let interrupt = async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
            ::log::warn!("Interrupted, closing the browser session");
        };
        run_session(browser, &fetcher, &self.config, &cookies, interrupt).await
    }
}

/// Replay the cookies and crawl with an open browser session.
///
/// The session is closed on every exit path: success, fault, or `interrupt`
/// resolving first.
pub async fn run_session<B, F, S>(
    browser: B,
    fetcher: &F,
    config: &MirrorConfig,
    cookies: &[CookieRecord],
    interrupt: S,
) -> Result<MirrorStats>
where
    B: Browser,
    F: Fetcher,
    S: Future<Output = ()>,
{
    let result = tokio::select! {
        result = crawl(&browser, fetcher, config, cookies) => result,
        _ = interrupt => Err(MirrorError::Interrupted),
    };

    if let Err(e) = browser.close().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }
    result
}

async fn crawl<B: Browser, F: Fetcher>(
    browser: &B,
    fetcher: &F,
    config: &MirrorConfig,
    cookies: &[CookieRecord],
) -> Result<MirrorStats> {
    session::apply_cookies(browser, &config.start_url, cookies).await?;
    NavigationIndexer::new(browser, fetcher, config).run().await
}
