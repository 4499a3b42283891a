//! Core data models used throughout newswire.
//!
//! These types represent the normalized records and per-page batches that a
//! source connector hands to the hosting ingestion pipeline.

use serde::Serialize;

/// A normalized news article, the atomic unit of the dataset.
///
/// Every field is populated from exactly one upstream document; a document
/// that cannot fill the whole record fails the page fetch rather than
/// producing a partial article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    /// Article headline.
    pub title: String,
    /// Short snippet text.
    pub body: String,
    /// Canonical article URL.
    pub web_url: String,
    /// Publication timestamp, verbatim in the upstream API's native format.
    /// Passed through untouched, never reparsed or validated here.
    pub created_at: String,
    /// Upstream-assigned unique identifier.
    pub id: String,
    /// Article abstract.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Keyword values in upstream order.
    pub keywords: Vec<String>,
}

/// One upstream page's worth of articles, the unit yielded by the batch
/// iterator. Pages are never merged or split.
pub type Batch = Vec<Article>;
