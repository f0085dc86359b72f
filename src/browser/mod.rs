//! Browser automation for rendering craigslist pages
//!
//! craigslist renders its search results with JavaScript, so pages are loaded
//! in headless Chrome and the final DOM is captured as HTML.
//!
//! # Example
//!
//! ```no_run
//! use craigslist_scraper::browser::{BrowserConfig, BrowserSession};
//! use craigslist_scraper::fetch::PageSource;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = BrowserSession::start(BrowserConfig::default())?;
//! let html = session.fetch_html("https://sfbay.craigslist.org/search/cto?s=0&query=tesla")?;
//!
//! println!("Extracted {} bytes of HTML", html.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod manager;
pub mod scraper;
pub mod session;

// Re-export main types for convenience
pub use config::BrowserConfig;
pub use manager::{BrowserError, BrowserManager};
pub use scraper::BrowserScraper;
pub use session::BrowserSession;
