use serde::{Deserialize, Serialize};
use std::fmt;

/// Navigation level of the course hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Title,
    Section,
    Page,
}

/// Where the crawl currently is, by ordinal at each level.
///
/// Element handles do not survive a click, so this is the only thing carried
/// across navigations; every step re-queries the live page to find the
/// element at these ordinals again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlPosition {
    pub title: usize,
    pub section: Option<usize>,
    pub page: Option<usize>,
}

impl CrawlPosition {
    pub fn at_title(title: usize) -> Self {
        Self {
            title,
            section: None,
            page: None,
        }
    }

    pub fn with_section(self, section: usize) -> Self {
        Self {
            section: Some(section),
            page: None,
            ..self
        }
    }

    pub fn with_page(self, page: usize) -> Self {
        Self {
            page: Some(page),
            ..self
        }
    }
}

impl fmt::Display for CrawlPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "title {}", self.title)?;
        if let Some(section) = self.section {
            write!(f, " / section {}", section)?;
        }
        if let Some(page) = self.page {
            write!(f, " / page {}", page)?;
        }
        Ok(())
    }
}

/// One saved page of the mirror
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDocument {
    /// Sanitized title directory name
    pub title_slug: String,

    /// Section directory name
    pub section_label: String,

    /// Page number within the section
    pub ordinal: usize,

    /// Rewritten content-viewer markup
    pub html: String,
}

impl PageDocument {
    pub fn new(title_slug: &str, section_label: &str, ordinal: usize, html: String) -> Self {
        Self {
            title_slug: title_slug.to_string(),
            section_label: section_label.to_string(),
            ordinal,
            html,
        }
    }

    /// File name the page is stored under
    pub fn file_name(&self) -> String {
        format!("page_{}.html", self.ordinal)
    }
}

/// Counters for a finished crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorStats {
    pub titles: usize,
    pub sections: usize,
    pub pages: usize,
    pub images: usize,
}
