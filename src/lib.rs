// Library interface for craigslist_scraper
// The binary and the integration tests both go through these modules

pub mod browser;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod models;
pub mod parse;
pub mod progress;
pub mod query;
pub mod table;

pub use error::ScrapeError;
pub use extractor::{Extractor, ItemSelection};
pub use query::{SearchQuery, SellerType};
