//! Search query model and result-page URL synthesis
//!
//! A craigslist search is addressed by a sub-site, a seller category and a
//! free-text term. Result pages are paged with the `s=` offset parameter.
//!
//! # Examples
//!
//! ```
//! use craigslist_scraper::query::{SearchQuery, SellerType};
//!
//! let query = SearchQuery::new("sfbay", SellerType::Owner, "tesla model s");
//! assert_eq!(
//!     query.compose_url(0),
//!     "https://sfbay.craigslist.org/search/cto?s=0&query=tesla%20model%20s"
//! );
//! ```

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Number of results craigslist renders on one search page
pub const PAGE_SIZE: usize = 120;

/// Sub-site used when none is configured
pub const DEFAULT_SITE: &str = "sfbay";

/// Seller category of a vehicle search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum SellerType {
    All,
    Owner,
    Dealer,
}

impl SellerType {
    /// Category code as it appears in the search path
    pub fn code(&self) -> &'static str {
        match self {
            SellerType::All => "cta",
            SellerType::Owner => "cto",
            SellerType::Dealer => "ctd",
        }
    }
}

impl fmt::Display for SellerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SellerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cta" | "all" => Ok(SellerType::All),
            "cto" | "owner" => Ok(SellerType::Owner),
            "ctd" | "dealer" => Ok(SellerType::Dealer),
            other => Err(format!(
                "unknown seller type '{}' (expected all/owner/dealer or cta/cto/ctd)",
                other
            )),
        }
    }
}

impl TryFrom<String> for SellerType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Immutable description of one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    site: String,
    seller_type: SellerType,
    search_term: String,
}

impl SearchQuery {
    pub fn new(site: impl Into<String>, seller_type: SellerType, search_term: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            seller_type,
            search_term: search_term.into(),
        }
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn seller_type(&self) -> SellerType {
        self.seller_type
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Build the URL of the result page starting at `offset`.
    ///
    /// Whitespace in the term is collapsed to `%20`; nothing else is escaped,
    /// so `&` or `#` in the term end up in the query string verbatim.
    pub fn compose_url(&self, offset: usize) -> String {
        let term = self.search_term.split_whitespace().collect::<Vec<_>>().join("%20");
        format!(
            "https://{}.craigslist.org/search/{}?s={}&query={}",
            self.site,
            self.seller_type.code(),
            offset,
            term
        )
    }
}

/// Offsets of every result page after the first one.
///
/// Pages start at each multiple of [`PAGE_SIZE`] below `total_count`; the
/// first page (offset 0) is fetched separately, and later pages are requested
/// one past the multiple (`121`, `241`, ...).
pub fn additional_page_offsets(total_count: usize) -> Vec<usize> {
    (0..total_count)
        .step_by(PAGE_SIZE)
        .filter(|&i| i != 0)
        .map(|i| i + 1)
        .collect()
}
