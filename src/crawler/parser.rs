//! HTML extraction for listing and product pages
//!
//! This module turns parsed documents into data:
//! - Product links from a listing page (`extract_links`)
//! - The text of a single field (`extract_text`)
//! - One record per product block (`parse_products`)
//!
//! Link and product extraction are lazy iterators borrowed from the document,
//! so a caller can stop early without materializing the rest.

use crate::config::CompiledSelectors;
use crate::record::{CaptureStamp, FieldValue, ProductRecord};
use scraper::{ElementRef, Html, Selector};

/// Yields the `href` of every element matching `selector`, in document order
///
/// Values are passed through untouched: empty or malformed hrefs are yielded
/// as they are, and an element without `href` yields an empty string. A
/// selector that matches nothing yields an empty sequence.
///
/// # Example
///
/// ```
/// use scraper::{Html, Selector};
/// use shelf_scraper::crawler::extract_links;
///
/// let html = Html::parse_document(r#"<a class="p" href="/a">A</a><a class="p" href="/b">B</a>"#);
/// let selector = Selector::parse("a.p").unwrap();
/// let links: Vec<String> = extract_links(&html, &selector).collect();
/// assert_eq!(links, vec!["/a", "/b"]);
/// ```
pub fn extract_links<'a>(
    document: &'a Html,
    selector: &'a Selector,
) -> impl Iterator<Item = String> + 'a {
    document
        .select(selector)
        .map(|element| element.value().attr("href").unwrap_or_default().to_string())
}

/// Returns the normalized text of the first element under `scope` matching `selector`
///
/// Never fails: no match gives `FieldValue::Missing`.
pub fn extract_text(scope: ElementRef<'_>, selector: &Selector) -> FieldValue {
    scope
        .select(selector)
        .next()
        .map(|element| FieldValue::Text(normalize_text(element.text())))
        .unwrap_or(FieldValue::Missing)
}

/// Same as [`extract_text`], searching the whole document
pub fn extract_document_text(document: &Html, selector: &Selector) -> FieldValue {
    extract_text(document.root_element(), selector)
}

/// Joins text nodes and collapses whitespace runs into single spaces
fn normalize_text<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    let joined: String = fragments.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds one record per `home_product` block of a product page
///
/// Each field is read from its own block's subtree only, so a block without a
/// price never picks up its neighbour's. Every record carries `captured_at`.
/// With `sequential_ids`, records are numbered by block position, from 1.
pub fn parse_products<'a>(
    document: &'a Html,
    selectors: &'a CompiledSelectors,
    captured_at: &'a CaptureStamp,
    sequential_ids: bool,
) -> impl Iterator<Item = ProductRecord> + 'a {
    document
        .select(&selectors.home_product)
        .enumerate()
        .map(move |(index, block)| ProductRecord {
            id: sequential_ids.then_some(index + 1),
            product_name: extract_text(block, &selectors.product_name),
            review: extract_text(block, &selectors.review),
            price: extract_text(block, &selectors.price),
            discount_price: extract_text(block, &selectors.discount_price),
            date: captured_at.as_str().to_string(),
        })
}
