use crate::browser::{Browser, PageElement, mark_view, wait_for_departure, wait_for_elements};
use crate::config::MirrorConfig;
use crate::crawlers::extract::extract_content;
use crate::error::{MirrorError, Result};
use crate::fetch::Fetcher;
use crate::parsers::{ImageRewriter, find_images};
use crate::results::{CrawlPosition, Level, MirrorStats, PageDocument};
use crate::utils::{sanitize_label, section_dir_name};
use crate::writer::PageWriter;
use url::Url;

/// Walks titles, sections and pages of a course and saves every page.
///
/// Every click re-renders the page, so no element handle outlives the step
/// that queried it: each level records how many entries it has, then looks
/// the list up again before touching entry `i`. A click only counts as done
/// once the view it left has been replaced.
pub struct NavigationIndexer<'a, B, F> {
    browser: &'a B,
    fetcher: &'a F,
    config: &'a MirrorConfig,
    writer: PageWriter,
    stats: MirrorStats,
}

/// Picks entry `index` from a freshly queried list
fn select<E>(elements: &[E], index: usize, level: Level, position: CrawlPosition) -> Result<&E> {
    elements.get(index).ok_or(MirrorError::IndexOutOfRange {
        level,
        index,
        len: elements.len(),
        position,
    })
}

impl<'a, B: Browser, F: Fetcher> NavigationIndexer<'a, B, F> {
    pub fn new(browser: &'a B, fetcher: &'a F, config: &'a MirrorConfig) -> Self {
        Self {
            browser,
            fetcher,
            config,
            writer: PageWriter::new(&config.output_dir),
            stats: MirrorStats::default(),
        }
    }

    /// Mirror the whole course
    pub async fn run(mut self) -> Result<MirrorStats> {
        let title_count = self.open_course().await?.len();
        ::log::info!("Found {} titles at {}", title_count, self.config.start_url);

        for index in 0..title_count {
            self.visit_title(index, title_count).await?;
        }

        ::log::info!(
            "Mirrored {} titles, {} sections, {} pages, {} images",
            self.stats.titles,
            self.stats.sections,
            self.stats.pages,
            self.stats.images
        );
        Ok(self.stats)
    }

    /// Click a navigation entry and wait until the previous view is gone
    async fn click(&self, element: &B::Element) -> Result<()> {
        let config = self.config;
        let viewer = &config.selectors.content;
        let marker = mark_view(self.browser, viewer).await?;
        element.click().await?;
        if let Some(marker) = marker {
            wait_for_departure(&marker, viewer, &config.wait).await?;
        }
        Ok(())
    }

    /// Load the course page and wait for its title list
    async fn open_course(&self) -> Result<Vec<B::Element>> {
        self.browser.navigate(&self.config.start_url).await?;
        wait_for_elements(self.browser, &self.config.selectors.title, &self.config.wait).await
    }

    async fn visit_title(&mut self, index: usize, count: usize) -> Result<()> {
        let position = CrawlPosition::at_title(index);

        let slug = {
            let titles = self.open_course().await?;
            let title = select(&titles, index, Level::Title, position)?;
            let text = title.text().await?;
            let slug = sanitize_label(&text)?;
            self.writer.ensure_title_dir(&slug).await?;
            ::log::info!("Title {}/{}: {} -> {}", index + 1, count, text.trim(), slug);
            self.click(title).await?;
            slug
        };
        self.stats.titles += 1;

        self.visit_sections(&slug, position).await
    }

    async fn visit_sections(&mut self, slug: &str, position: CrawlPosition) -> Result<()> {
        let config = self.config;
        let section = &config.selectors.section;

        // The first section is already open after the title click
        let (section_count, first_label) = {
            let sections = wait_for_elements(self.browser, section, &config.wait).await?;
            let first = select(&sections, 0, Level::Section, position.with_section(0))?;
            (sections.len(), section_dir_name(&first.text().await?)?)
        };
        ::log::debug!("{} sections under {}", section_count, slug);

        self.writer.ensure_section_dir(slug, &first_label).await?;
        self.stats.sections += 1;
        self.save_page(slug, &first_label, 0, position.with_section(0).with_page(0))
            .await?;

        for index in 1..section_count {
            let position = position.with_section(index);
            let label = {
                let sections = self.browser.find_all(section).await?;
                let current = select(&sections, index, Level::Section, position)?;
                let label = section_dir_name(&current.text().await?)?;
                self.writer.ensure_section_dir(slug, &label).await?;
                self.click(current).await?;
                label
            };
            self.stats.sections += 1;
            self.visit_pages(slug, &label, position).await?;
        }
        Ok(())
    }

    async fn visit_pages(&mut self, slug: &str, label: &str, position: CrawlPosition) -> Result<()> {
        let config = self.config;
        let page = &config.selectors.page;

        // The old view is gone; once the new viewer is there the page list
        // (if the section has one) is rendered too
        wait_for_elements(self.browser, &config.selectors.content, &config.wait).await?;
        let page_count = self.browser.find_all(page).await?.len();

        if page_count == 0 {
            ::log::debug!("Section {} has no pages, saving the section view", label);
            return self.save_page(slug, label, 0, position.with_page(0)).await;
        }

        for index in 0..page_count {
            let position = position.with_page(index);
            {
                let pages = self.browser.find_all(page).await?;
                self.click(select(&pages, index, Level::Page, position)?)
                    .await?;
            }
            self.save_page(slug, label, index, position).await?;
        }
        Ok(())
    }

    /// Extract the current view, localize its images and write it out
    async fn save_page(
        &mut self,
        slug: &str,
        label: &str,
        ordinal: usize,
        position: CrawlPosition,
    ) -> Result<()> {
        let config = self.config;
        let content = &config.selectors.content;
        wait_for_elements(self.browser, content, &config.wait).await?;
        let html = extract_content(self.browser, content).await?;

        let dir = self.writer.ensure_section_dir(slug, label).await?;
        let base_url = Url::parse(&self.browser.current_url().await?).ok();
        let image_count = find_images(&html).len();
        let html = ImageRewriter::new(self.fetcher)
            .with_base_url(base_url)
            .rewrite(&html, &dir)
            .await?;

        self.writer
            .write(&PageDocument::new(slug, label, ordinal, html))
            .await?;
        ::log::debug!("Saved {} with {} images", position, image_count);

        self.stats.pages += 1;
        self.stats.images += image_count;
        Ok(())
    }
}
