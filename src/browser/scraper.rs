use super::manager::BrowserError;
use headless_chrome::Tab;
use std::sync::Arc;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Loads craigslist pages into one tab and reads back the rendered DOM
pub struct BrowserScraper {
    tab: Arc<Tab>,
    wait_timeout: Duration,
}

impl BrowserScraper {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self::with_timeout(tab, Duration::from_secs(30))
    }

    /// `timeout` bounds both page loads and element waits
    pub fn with_timeout(tab: Arc<Tab>, timeout: Duration) -> Self {
        tab.set_default_timeout(timeout);
        Self {
            tab,
            wait_timeout: timeout,
        }
    }

    /// Load `url` and block until the tab reports the load finished
    pub fn open(&self, url: &str) -> Result<(), BrowserError> {
        self.tab
            .navigate_to(url)
            .map_err(|e| BrowserError::NavigationError(format!("could not open {}: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| BrowserError::NavigationError(format!("{} did not finish loading: {}", url, e)))?;
        Ok(())
    }

    pub fn wait_for_element(&self, css: &str) -> Result<(), BrowserError> {
        self.wait_for_element_within(css, self.wait_timeout)
    }

    /// Poll the DOM until `css` matches something or `limit` runs out
    pub fn wait_for_element_within(&self, css: &str, limit: Duration) -> Result<(), BrowserError> {
        let probe = format!("document.querySelector('{}') !== null", css.replace('\'', "\\'"));
        let deadline = Instant::now() + limit;

        while Instant::now() < deadline {
            let present = self
                .tab
                .evaluate(&probe, false)
                .ok()
                .and_then(|r| r.value)
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if present {
                return Ok(());
            }
            std::thread::sleep(POLL_INTERVAL);
        }

        Err(BrowserError::Timeout(format!(
            "no element matched {} within {:?}",
            css, limit
        )))
    }

    /// Rendered HTML of the current page; an empty capture is an error
    pub fn page_source(&self) -> Result<String, BrowserError> {
        let html = self
            .tab
            .get_content()
            .map_err(|e| BrowserError::HtmlExtractionError(e.to_string()))?;

        if html.trim().is_empty() {
            return Err(BrowserError::HtmlExtractionError(
                "page source is empty".to_string(),
            ));
        }
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{BrowserConfig, BrowserManager};

    fn scraper() -> (BrowserManager, BrowserScraper) {
        let manager = BrowserManager::new(BrowserConfig::default()).unwrap();
        let scraper = BrowserScraper::with_timeout(manager.new_tab().unwrap(), Duration::from_secs(10));
        (manager, scraper)
    }

    #[test]
    #[ignore] // Requires Chrome to be installed
    fn test_open_and_capture() {
        let (_manager, scraper) = scraper();

        scraper.open("https://example.com").unwrap();
        scraper.wait_for_element("h1").unwrap();
        let html = scraper.page_source().unwrap();

        assert!(html.contains("Example Domain"));
    }

    #[test]
    #[ignore] // Requires Chrome to be installed
    fn test_wait_for_missing_element_times_out() {
        let (_manager, scraper) = scraper();
        scraper.open("https://example.com").unwrap();

        let err = scraper
            .wait_for_element_within("span.totalcount", Duration::from_millis(300))
            .unwrap_err();

        assert!(matches!(err, BrowserError::Timeout(_)));
        assert!(err.is_retryable());
    }
}
