//! HTML extraction for craigslist search and listing pages
//!
//! All selectors are fixed to the craigslist markup; a page that does not
//! match yields a [`ParseError`] naming the element that was missing.

use crate::models::ListingRecord;
use scraper::{ElementRef, Html, Selector};

/// Boilerplate craigslist injects at the top of every posting body
const QR_CODE_BOILERPLATE: &str = "QR Code Link to This Post";

/// Key used for attribute spans that carry no `name: value` label
pub const UNLABELED_ATTRIBUTE_KEY: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid selector {0}")]
    Selector(String),

    #[error("Element not found: {0}")]
    MissingElement(&'static str),

    #[error("Result row {0} has no link")]
    MissingLink(usize),

    #[error("Total count is not a number: {0:?}")]
    InvalidCount(String),
}

fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector(format!("{}: {:?}", css, e)))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn first_in<'a>(scope: ElementRef<'a>, css: &'static str) -> Result<ElementRef<'a>, ParseError> {
    let sel = selector(css)?;
    scope.select(&sel).next().ok_or(ParseError::MissingElement(css))
}

fn first_in_document<'a>(document: &'a Html, css: &'static str) -> Result<ElementRef<'a>, ParseError> {
    let sel = selector(css)?;
    document.select(&sel).next().ok_or(ParseError::MissingElement(css))
}

/// Parse raw page source into a queryable document
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Total number of results reported on a search page
pub fn total_count(document: &Html) -> Result<usize, ParseError> {
    let raw = text_of(first_in_document(document, "span.totalcount")?);
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidCount(raw))
}

/// Listing URLs on one search page, in page order
pub fn page_item_urls(document: &Html) -> Result<Vec<String>, ParseError> {
    let list = first_in_document(document, "ul.rows")?;
    let row_sel = selector("li.result-row")?;
    let link_sel = selector("a[href]")?;

    list.select(&row_sel)
        .enumerate()
        .map(|(idx, row)| {
            row.select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|href| href.to_string())
                .ok_or(ParseError::MissingLink(idx))
        })
        .collect()
}

/// Split one attribute span into its field name and value.
///
/// Text with exactly one `:` becomes `(name, value)` with a single leading
/// space dropped from the value; anything else lands under
/// [`UNLABELED_ATTRIBUTE_KEY`] untouched.
pub fn split_attribute(text: &str) -> (String, String) {
    let parts: Vec<&str> = text.split(':').collect();
    if let [name, value] = parts[..] {
        let value = value.strip_prefix(' ').unwrap_or(value);
        (name.to_string(), value.to_string())
    } else {
        (UNLABELED_ATTRIBUTE_KEY.to_string(), text.to_string())
    }
}

/// Extract the field map of a listing page.
///
/// Keys come out as `url`, `title`, `price`, `location`, the attribute
/// names in page order, then `content`. A later key equal to an earlier one
/// overwrites the earlier value.
pub fn listing_record(document: &Html, url: &str) -> Result<ListingRecord, ParseError> {
    let mut record = ListingRecord::new();
    record.insert("url", url);

    // title block
    let title_block = first_in_document(document, "span.postingtitletext")?;
    let title = text_of(first_in(title_block, "span#titletextonly")?);
    let price = text_of(first_in(title_block, "span.price")?);
    let location = text_of(first_in(title_block, "small")?)
        .replace(" (", "")
        .replace(')', "");
    record.insert("title", title);
    record.insert("price", price);
    record.insert("location", location);

    // attribute block: the second group holds the vehicle attributes
    let attrs = first_in_document(document, "div.mapAndAttrs")?;
    let group_sel = selector("p.attrgroup")?;
    let group = attrs
        .select(&group_sel)
        .nth(1)
        .ok_or(ParseError::MissingElement("p.attrgroup"))?;
    let span_sel = selector("span")?;
    for span in group.select(&span_sel) {
        let (name, value) = split_attribute(&text_of(span));
        record.insert(name, value);
    }

    let body = text_of(first_in_document(document, "section#postingbody")?);
    record.insert("content", body.replace(QR_CODE_BOILERPLATE, ""));

    Ok(record)
}
