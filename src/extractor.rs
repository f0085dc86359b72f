//! Search-result discovery and per-listing extraction
//!
//! An [`Extractor`] crawls every result page of a search as soon as it is
//! built and keeps the listing URLs in memory. Listings are only visited when
//! [`Extractor::get_all_item_info`] asks for them.

use crate::error::ScrapeError;
use crate::fetch::PageSource;
use crate::models::{ItemOutcome, ResultTable};
use crate::parse;
use crate::progress::Progress;
use crate::query::{additional_page_offsets, SearchQuery};
use crate::table::{list_to_table, FailurePolicy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scraper::Html;

/// Seed used for random sampling when none is given
pub const DEFAULT_SEED: u64 = 123;

/// Which of the discovered listings to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemSelection {
    /// `None` extracts every discovered listing
    pub n: Option<usize>,
    /// Draw `n` listings at random (with replacement) instead of the first `n`
    pub random: bool,
    /// Seed for random draws, [`DEFAULT_SEED`] when `None`
    pub seed: Option<u64>,
}

impl ItemSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn first(n: usize) -> Self {
        Self {
            n: Some(n),
            ..Self::default()
        }
    }

    pub fn random(n: usize, seed: Option<u64>) -> Self {
        Self {
            n: Some(n),
            random: true,
            seed,
        }
    }
}

/// `n` indices drawn uniformly from `0..total`, with replacement.
///
/// The same `(total, n, seed)` always produces the same sequence, duplicates
/// included. An empty population yields nothing.
pub fn sample_indices(total: usize, n: usize, seed: u64) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..total)).collect()
}

fn fetch_document<S: PageSource>(source: &S, url: &str) -> Result<Html, ScrapeError> {
    let html = source.fetch_html(url).map_err(|source| ScrapeError::Fetch {
        url: url.to_string(),
        source,
    })?;
    Ok(parse::parse_document(&html))
}

fn page_urls(document: &Html, url: &str) -> Result<Vec<String>, ScrapeError> {
    parse::page_item_urls(document).map_err(|source| ScrapeError::Parse {
        url: url.to_string(),
        source,
    })
}

/// Collect the listing URLs of every result page of `query`.
///
/// The first page gives the total result count, which decides how many more
/// pages are fetched. URLs keep page order and in-page order; duplicates are
/// kept.
pub fn discover_urls<S: PageSource>(query: &SearchQuery, source: &S) -> Result<Vec<String>, ScrapeError> {
    let first_url = query.compose_url(0);
    log::info!("Fetching first result page: {}", first_url);
    let first_page = fetch_document(source, &first_url)?;

    let total = parse::total_count(&first_page).map_err(|source| ScrapeError::Parse {
        url: first_url.clone(),
        source,
    })?;
    let mut urls = page_urls(&first_page, &first_url)?;
    drop(first_page);

    let offsets = additional_page_offsets(total);
    log::info!(
        "Search reports {} result(s); {} more page(s) to fetch",
        total,
        offsets.len()
    );

    for offset in offsets {
        let url = query.compose_url(offset);
        log::debug!("Fetching result page: {}", url);
        let page = fetch_document(source, &url)?;
        urls.extend(page_urls(&page, &url)?);
    }

    Ok(urls)
}

/// Owns a search, its page source and the listing URLs discovered for it
pub struct Extractor<S> {
    query: SearchQuery,
    source: S,
    item_urls: Vec<String>,
}

impl<S: PageSource> Extractor<S> {
    /// Run discovery for `query`; any failure aborts construction.
    pub fn new(query: SearchQuery, source: S) -> Result<Self, ScrapeError> {
        let item_urls = discover_urls(&query, &source)?;
        log::info!("Discovered {} listing URL(s)", item_urls.len());
        Ok(Self {
            query,
            source,
            item_urls,
        })
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn item_urls(&self) -> &[String] {
        &self.item_urls
    }

    pub fn total_extracted_items(&self) -> usize {
        self.item_urls.len()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch one listing and pull its fields. Never fails: problems come back
    /// as [`ItemOutcome::Failed`].
    pub fn extract_page_info(&self, url: &str) -> ItemOutcome {
        let result = fetch_document(&self.source, url).and_then(|document| {
            parse::listing_record(&document, url).map_err(|source| ScrapeError::Parse {
                url: url.to_string(),
                source,
            })
        });

        match result {
            Ok(record) => ItemOutcome::Extracted(record),
            Err(e) => {
                log::warn!("Extraction failed: {}", e);
                ItemOutcome::Failed {
                    url: url.to_string(),
                    cause: e.to_string(),
                }
            }
        }
    }

    /// URLs picked by `selection`, in extraction order
    pub fn select_urls(&self, selection: &ItemSelection) -> Vec<String> {
        match selection.n {
            None => self.item_urls.clone(),
            Some(n) if selection.random => {
                let seed = selection.seed.unwrap_or(DEFAULT_SEED);
                sample_indices(self.item_urls.len(), n, seed)
                    .into_iter()
                    .map(|i| self.item_urls[i].clone())
                    .collect()
            }
            Some(n) => self.item_urls.iter().take(n).cloned().collect(),
        }
    }

    /// Extract the selected listings one after another
    pub fn extract_items(&self, selection: &ItemSelection, progress: &mut dyn Progress) -> Vec<ItemOutcome> {
        let urls = self.select_urls(selection);
        progress.begin(urls.len());

        let outcomes = urls
            .iter()
            .enumerate()
            .map(|(idx, url)| {
                let outcome = self.extract_page_info(url);
                progress.item_done(idx, url, outcome.is_extracted());
                outcome
            })
            .collect();

        progress.finish();
        outcomes
    }

    /// Extract the selected listings and tabulate them
    pub fn get_all_item_info(
        &self,
        selection: &ItemSelection,
        policy: FailurePolicy,
        progress: &mut dyn Progress,
    ) -> ResultTable {
        list_to_table(&self.extract_items(selection, progress), policy)
    }
}
