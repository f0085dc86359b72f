use super::config::BrowserConfig;
use super::manager::{BrowserError, BrowserManager};
use super::scraper::BrowserScraper;
use crate::fetch::{FetchError, PageSource};

/// One browser and one tab held for a whole scrape run.
///
/// Every page is loaded into the same tab; Chrome is shut down when the
/// session is dropped.
pub struct BrowserSession {
    // field order matters: the tab goes before its browser
    scraper: BrowserScraper,
    _manager: BrowserManager,
    pages_fetched: std::cell::Cell<usize>,
}

impl BrowserSession {
    pub fn start(config: BrowserConfig) -> Result<Self, BrowserError> {
        let timeout = config.timeout();
        let manager = BrowserManager::new(config)?;
        let scraper = BrowserScraper::with_timeout(manager.new_tab()?, timeout);
        log::info!("Browser session started");

        Ok(Self {
            scraper,
            _manager: manager,
            pages_fetched: std::cell::Cell::new(0),
        })
    }

    /// Number of pages successfully captured so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched.get()
    }

    fn render(&self, url: &str) -> Result<String, BrowserError> {
        self.scraper.open(url)?;
        self.scraper.wait_for_element("body")?;
        self.scraper.page_source()
    }
}

impl PageSource for BrowserSession {
    fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        log::debug!("Browser navigating to: {}", url);
        let html = self.render(url)?;
        self.pages_fetched.set(self.pages_fetched.get() + 1);
        Ok(html)
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        log::info!(
            "Browser session closed after {} page(s)",
            self.pages_fetched.get()
        );
    }
}
