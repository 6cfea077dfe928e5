use crate::error::{MirrorError, Result};
use crate::fetch::Fetcher;
use crate::utils::image_filename;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use url::Url;

// First-level `<img ...>` opening up to the quoted src value
static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<\s*img [^>]*src="([^"]+)"#).expect("static regex"));

/// An embedded image and the file it is saved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub source_url: String,
    pub local_filename: String,
}

/// Finds every `<img>` source in an HTML fragment, in document order
pub fn find_images(html: &str) -> Vec<ImageReference> {
    IMG_SRC
        .captures_iter(html)
        .map(|caps| {
            let src = &caps[1];
            ImageReference {
                source_url: src.to_string(),
                local_filename: image_filename(src),
            }
        })
        .collect()
}

/// Downloads the images of a page and points the markup at the local copies
pub struct ImageRewriter<'a, F> {
    fetcher: &'a F,
    base_url: Option<Url>,
}

impl<'a, F: Fetcher> ImageRewriter<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            base_url: None,
        }
    }

    /// Resolve relative image sources against this URL before downloading
    pub fn with_base_url(mut self, base_url: Option<Url>) -> Self {
        self.base_url = base_url;
        self
    }

    fn download_url(&self, src: &str) -> String {
        match &self.base_url {
            Some(base) => base
                .join(src)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| src.to_string()),
            None => src.to_string(),
        }
    }

    /// Download every image of `html` into `target_dir` and return the
    /// markup with each `src` pointing at the downloaded file.
    ///
    /// Every match is fetched and written, duplicates included; a later image
    /// whose file name collides with an earlier one overwrites it. Only the
    /// URL inside the quotes is replaced, the closing quote is kept.
    pub async fn rewrite(&self, html: &str, target_dir: &Path) -> Result<String> {
        let mut out = String::with_capacity(html.len());
        let mut last = 0;

        for caps in IMG_SRC.captures_iter(html) {
            let (Some(tag), Some(src)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let local_filename = image_filename(src.as_str());

            let url = self.download_url(src.as_str());
            let bytes = self.fetcher.get(&url).await?;
            let path = target_dir.join(&local_filename);
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| MirrorError::filesystem(&path, e))?;
            ::log::debug!("Saved image {} as {}", url, path.display());

            // `src="` sits right before the captured URL
            let attr_start = src.start() - r#"src=""#.len();
            out.push_str(&html[last..attr_start]);
            out.push_str(r#"src=""#);
            out.push_str(&local_filename);
            last = tag.end();
        }

        out.push_str(&html[last..]);
        Ok(out)
    }
}
