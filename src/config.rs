use crate::browser::ClassSelector;
use crate::error::{MirrorError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for a mirror run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Course page whose sidebar lists the titles
    pub start_url: String,

    /// JSON file with the captured session cookies
    #[serde(default = "default_cookies_path")]
    pub cookies_path: PathBuf,

    /// Directory the title folders are created in
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Element queries for each navigation level
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Readiness polling after navigation
    #[serde(default)]
    pub wait: WaitConfig,

    /// Extra attempts for a failed image download (0 = fail on first error)
    #[serde(default)]
    pub download_retries: u32,

    /// Base backoff between download attempts, doubled on every retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

/// Element queries for the course navigation.
///
/// The site appends build-specific suffixes to its class names, so each
/// query matches on a class prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_title_selector")]
    pub title: ClassSelector,

    #[serde(default = "default_section_selector")]
    pub section: ClassSelector,

    #[serde(default = "default_page_selector")]
    pub page: ClassSelector,

    #[serde(default = "default_content_selector")]
    pub content: ClassSelector,
}

/// Bounded wait used after every navigation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Give up after this many milliseconds
    #[serde(default = "default_wait_timeout_ms")]
    pub timeout_ms: u64,

    /// Time between two queries
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl WaitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_wait_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            title: default_title_selector(),
            section: default_section_selector(),
            page: default_page_selector(),
            content: default_content_selector(),
        }
    }
}

impl MirrorConfig {
    /// Create a new configuration with default values
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            cookies_path: default_cookies_path(),
            output_dir: default_output_dir(),
            webdriver_url: default_webdriver_url(),
            selectors: SelectorConfig::default(),
            wait: WaitConfig::default(),
            download_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            MirrorError::Config(format!("cannot open {}: {}", path.display(), e))
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| MirrorError::Config(format!("cannot read {}: {}", path.display(), e)))?;

        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MirrorError::Config(e.to_string()))
    }

    /// Override the WebDriver URL with the WEBDRIVER_URL environment variable if set
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

fn default_cookies_path() -> PathBuf {
    PathBuf::from("../cookies.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_wait_timeout_ms() -> u64 {
    15_000
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_retry_backoff_ms() -> u64 {
    2_000
}

fn default_title_selector() -> ClassSelector {
    ClassSelector::new("a", "sidebar-lesson__title")
}

fn default_section_selector() -> ClassSelector {
    ClassSelector::new("a", "section-link")
}

fn default_page_selector() -> ClassSelector {
    ClassSelector::new("a", "page-item")
}

fn default_content_selector() -> ClassSelector {
    ClassSelector::new("div", "step__viewer")
}
