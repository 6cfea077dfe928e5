use crate::error::{MirrorError, Result};
use crate::results::PageDocument;
use std::path::{Path, PathBuf};

/// Stores pages under `<root>/<title>/<section>/page_<n>.html`
#[derive(Debug, Clone)]
pub struct PageWriter {
    root: PathBuf,
}

impl PageWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory for a title if it does not exist yet
    pub async fn ensure_title_dir(&self, title_slug: &str) -> Result<PathBuf> {
        let dir = self.root.join(title_slug);
        create_dir(&dir).await?;
        Ok(dir)
    }

    /// Create the directory for a section if it does not exist yet
    pub async fn ensure_section_dir(&self, title_slug: &str, section_label: &str) -> Result<PathBuf> {
        let dir = self.root.join(title_slug).join(section_label);
        create_dir(&dir).await?;
        Ok(dir)
    }

    /// Write one page, replacing any earlier copy. Not atomic.
    pub async fn write(&self, page: &PageDocument) -> Result<PathBuf> {
        let dir = self
            .ensure_section_dir(&page.title_slug, &page.section_label)
            .await?;
        let path = dir.join(page.file_name());
        tokio::fs::write(&path, page.html.as_bytes())
            .await
            .map_err(|e| MirrorError::filesystem(&path, e))?;
        ::log::info!("Saved {}", path.display());
        Ok(path)
    }
}

async fn create_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| MirrorError::filesystem(dir, e))
}
