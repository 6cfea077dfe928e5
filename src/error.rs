use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::results::{CrawlPosition, Level};

/// Boxed error used for collaborator failures whose concrete type depends on the backend
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while mirroring a course
#[derive(Error, Debug)]
pub enum MirrorError {
    /// The browser refused a cookie whose domain does not match the current page
    #[error("cookie {name} does not match the current domain ({domain})")]
    DomainMismatch { name: String, domain: String },

    /// A query that had to return something came back empty
    #[error("no element matches {selector}")]
    ElementNotFound { selector: String },

    /// An element handle outlived the view it was queried from
    #[error("stale element reference while {context}")]
    StaleElement { context: String },

    /// Elements never showed up within the bounded wait
    #[error("timed out after {waited:?} waiting for {selector}")]
    NavigationTimeout { selector: String, waited: Duration },

    /// The freshly queried list is shorter than the index being visited
    #[error("{level:?} index {index} out of range (list has {len} items) at {position}")]
    IndexOutOfRange {
        level: Level,
        index: usize,
        len: usize,
        position: CrawlPosition,
    },

    /// A label cannot be turned into a directory name
    #[error("malformed label {label:?}")]
    MalformedLabel { label: String },

    /// Image download failed
    #[error("failed to download {url}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    /// Directory or file write failed
    #[error("filesystem error at {}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A WebDriver command failed
    #[error("browser command failed while {context}")]
    Browser {
        context: String,
        #[source]
        source: BoxError,
    },

    /// No WebDriver server could be reached
    #[error("could not connect to a WebDriver server at {url}")]
    Connect { url: String },

    /// The run was stopped before the traversal finished
    #[error("interrupted")]
    Interrupted,

    /// Configuration or cookie file problem
    #[error("configuration error: {0}")]
    Config(String),
}

impl MirrorError {
    /// Wrap a browser backend failure with what we were doing at the time
    pub fn browser(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Browser {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Wrap an I/O failure with the path it happened at
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;
