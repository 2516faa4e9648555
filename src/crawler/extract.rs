//! Link and field extraction from fetched pages
//!
//! Three specialized link rules, one per traversal level, plus the
//! category/text extraction step for document pages. All rules operate on
//! visible anchor text and resolve hrefs against the site base URL; order is
//! always document order.
//!
//! The category lives at a fixed offset inside a fixed-width identifier
//! suffix (e.g. `[stat.ML]` → `ML`). The offsets are a site contract and are
//! preserved exactly, but a format guard turns anything that does not fit
//! the fixed width into a structural error rather than a garbage category.

use crate::crawler::Page;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// Prefix identifying the metadata cell that carries the category
const IDENTIFIER_PREFIX: &str = "arXiv";

/// Length of the scheme prefix stripped from a listing identifier
/// ("arXiv:1910.00006" → "1910.00006")
const IDENTIFIER_SCHEME_LEN: usize = 6;

/// Path template for a document page, joined with the bare id
const DOCUMENT_PATH: &str = "/abs/";

/// Width of the identifier tail that carries the category
/// (e.g. "[stat.ML]")
const CATEGORY_TAIL_LEN: usize = 9;

/// Offset of the 2-character category code within the tail
const CATEGORY_OFFSET: std::ops::Range<usize> = 6..8;

/// Structural problems found while extracting from a page
///
/// These are branch-local: the orchestrator logs them and continues with
/// sibling pages.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No 'all' link on month page {url}")]
    MissingAllLink { url: String },

    #[error("Listing entry on {url} has fewer than two anchors")]
    MalformedEntry { url: String },

    #[error("Malformed listing identifier '{text}' on {url}")]
    MalformedListingId { url: String, text: String },

    #[error("No abstract element on document page {url}")]
    MissingAbstract { url: String },

    #[error("No identifier cell on document page {url}")]
    MissingIdentifier { url: String },

    #[error("Identifier '{text}' on {url} does not match the fixed-width format")]
    MalformedIdentifier { url: String, text: String },

    #[error("Could not resolve link '{href}' on {url}")]
    BadLink { url: String, href: String },
}

/// Extracted raw text and category code of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Raw abstract text, including the boilerplate header word
    pub text: String,

    /// Two-character category code from the identifier cell
    pub category: String,
}

/// Visible text of an element, concatenated across its text nodes
fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element.text().collect()
}

/// Extracts month-page links from the year index page
///
/// Anchors whose visible text begins with the configured 2-character year
/// prefix are month links; their hrefs are resolved against the site base.
/// Order matches document order. Anchors with unresolvable hrefs are
/// ignored.
pub fn month_links(page: &Page, year_prefix: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(&page.body);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let text = element_text(&element);
            if !text.starts_with(year_prefix) {
                continue;
            }
            if let Some(href) = element.value().attr("href") {
                if let Ok(url) = base.join(href) {
                    links.push(url);
                }
            }
        }
    }

    links
}

/// Finds the single all-documents link on a month page
///
/// The first anchor whose visible text is exactly `all` is the link to the
/// consolidated listing for that month.
pub fn all_documents_link(page: &Page, base: &Url) -> Result<Url, ExtractError> {
    let document = Html::parse_document(&page.body);

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if element_text(&element) != "all" {
                continue;
            }
            let href = element.value().attr("href").unwrap_or_default();
            return base.join(href).map_err(|_| ExtractError::BadLink {
                url: page.url.to_string(),
                href: href.to_string(),
            });
        }
    }

    Err(ExtractError::MissingAllLink {
        url: page.url.to_string(),
    })
}

/// Extracts document links from an all-documents listing page
///
/// Each `dt` entry represents one document. Its second anchor carries the
/// identifier text (e.g. "arXiv:1910.00006"); the 6-character scheme prefix
/// is stripped and the document URL built from the `/abs/{id}` template.
/// Order matches listing order, which determines the index used against the
/// per-month cap.
pub fn document_links(page: &Page, base: &Url) -> Result<Vec<Url>, ExtractError> {
    let document = Html::parse_document(&page.body);
    let mut links = Vec::new();

    let entry_selector = Selector::parse("dt");
    let anchor_selector = Selector::parse("a");
    let (entry_selector, anchor_selector) = match (entry_selector, anchor_selector) {
        (Ok(e), Ok(a)) => (e, a),
        _ => return Ok(links),
    };

    for entry in document.select(&entry_selector) {
        let anchor = entry
            .select(&anchor_selector)
            .nth(1)
            .ok_or_else(|| ExtractError::MalformedEntry {
                url: page.url.to_string(),
            })?;

        let identifier = element_text(&anchor);
        if identifier.len() <= IDENTIFIER_SCHEME_LEN
            || !identifier.is_char_boundary(IDENTIFIER_SCHEME_LEN)
        {
            return Err(ExtractError::MalformedListingId {
                url: page.url.to_string(),
                text: identifier,
            });
        }
        let id = &identifier[IDENTIFIER_SCHEME_LEN..];

        let href = format!("{}{}", DOCUMENT_PATH, id);
        let url = base.join(&href).map_err(|_| ExtractError::BadLink {
            url: page.url.to_string(),
            href,
        })?;
        links.push(url);
    }

    Ok(links)
}

/// Extracts the abstract text and category code from a document page
///
/// The abstract is the text of the first `blockquote`. The category comes
/// from the first table cell whose text starts with the identifier prefix:
/// the last nine characters of that cell hold a fixed-width suffix, and the
/// code sits at offset 6..8 within it.
pub fn document_record(page: &Page) -> Result<DocumentRecord, ExtractError> {
    let document = Html::parse_document(&page.body);

    let text = Selector::parse("blockquote")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|element| element_text(&element))
        })
        .ok_or_else(|| ExtractError::MissingAbstract {
            url: page.url.to_string(),
        })?;

    let cell = Selector::parse("td")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .map(|element| element_text(&element))
                .find(|text| text.starts_with(IDENTIFIER_PREFIX))
        })
        .ok_or_else(|| ExtractError::MissingIdentifier {
            url: page.url.to_string(),
        })?;

    let category =
        category_from_identifier(&cell).ok_or_else(|| ExtractError::MalformedIdentifier {
            url: page.url.to_string(),
            text: cell.clone(),
        })?;

    Ok(DocumentRecord { text, category })
}

/// Slices the category code out of an identifier cell's text
///
/// Returns None unless the text is ASCII, at least nine characters long,
/// and the code position holds two alphabetic characters.
fn category_from_identifier(text: &str) -> Option<String> {
    if !text.is_ascii() || text.len() < CATEGORY_TAIL_LEN {
        return None;
    }

    let tail = &text[text.len() - CATEGORY_TAIL_LEN..];
    let code = &tail[CATEGORY_OFFSET];
    if !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(code.to_string())
}
