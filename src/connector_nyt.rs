//! NY Times Article Search connector.
//!
//! Issues paginated queries against the Article Search REST API and maps
//! each result document into a flat [`Article`]. One HTTP GET per page, no
//! retry, no caching; the API key travels as the `api-key` query parameter.
//!
//! # Configuration
//!
//! ```toml
//! [sources.nyt.tech]
//! api_key = "${NYT_API_KEY}"
//! query = "Silicon Valley"
//! ```
//!
//! # Upstream contract
//!
//! `GET {endpoint}?api-key=..&q=..&page=N` returns a JSON object whose
//! `response.docs` array holds the page's documents. Each document carries
//! `headline.main`, `snippet`, `web_url`, `pub_date`, `_id`, `abstract`, and
//! a `keywords` array of objects with a `value` field. A response without
//! the `response.docs` path counts as an empty page, which is the normal
//! end-of-results signal; a document missing a mapped field fails the page.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::NytSourceConfig;
use crate::models::{Article, Batch};
use crate::traits::DataSource;

/// Default Article Search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.nytimes.com/svc/search/v2/articlesearch.json";

/// Declared column names of the NY Times dataset.
///
/// This is the column list the hosting pipeline has always been handed for
/// this dataset, kept as-is for compatibility: it names `summary` (which no
/// fetched article populates) and omits `web_url` (which every article
/// carries). Reconciling the two requires a coordinated change on the
/// pipeline side.
pub const NYT_SCHEMA: &[&str] = &[
    "title",
    "body",
    "created_at",
    "id",
    "summary",
    "abstract",
    "keywords",
];

/// An NY Times source instance that implements the [`DataSource`] trait.
///
/// The query configuration is fixed at construction. The only mutable state
/// is the pair of incremental hints recorded by `connect`, which are
/// diagnostic only.
pub struct NytConnector {
    /// Instance name (e.g. `"tech"`).
    name: String,
    /// Configuration for this source instance.
    config: NytSourceConfig,
    /// Incremental hints recorded at connect time. Accepted but never used
    /// to filter requests.
    incremental_column: Option<String>,
    incremental_value: Option<String>,
}

impl NytConnector {
    /// Create a new NY Times source instance.
    pub fn new(name: String, config: NytSourceConfig) -> Self {
        Self {
            name,
            config,
            incremental_column: None,
            incremental_value: None,
        }
    }

    fn endpoint(&self) -> &str {
        self.config.endpoint_url.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl DataSource for NytConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Search NY Times articles matching a fixed query"
    }

    fn source_type(&self) -> &str {
        "nyt"
    }

    fn schema(&self) -> &'static [&'static str] {
        NYT_SCHEMA
    }

    fn connect(&mut self, incremental_column: Option<&str>, incremental_value: Option<&str>) {
        tracing::debug!(
            source = %self.source_label(),
            column = ?incremental_column,
            last_value = ?incremental_value,
            "recorded incremental hints"
        );
        self.incremental_column = incremental_column.map(str::to_string);
        self.incremental_value = incremental_value.map(str::to_string);
    }

    async fn fetch_page(&self, page: usize) -> Result<Batch> {
        let api_key = self.config.resolve_api_key()?;
        if api_key.is_empty() {
            bail!("sources.nyt.{}: api_key resolved to an empty string", self.name);
        }
        if self.config.query.is_empty() {
            bail!("sources.nyt.{}: query must not be empty", self.name);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()?;

        let resp = client
            .get(self.endpoint())
            .query(&[
                ("api-key", api_key.as_str()),
                ("q", self.config.query.as_str()),
                ("page", &page.to_string()),
            ])
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to fetch page {} from {} for source '{}'",
                    page,
                    self.endpoint(),
                    self.source_label()
                )
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!(
                "Article search failed (HTTP {}) on page {}: {}",
                status,
                page,
                body.chars().take(500).collect::<String>()
            );
        }

        let data: Value = resp
            .json()
            .await
            .with_context(|| format!("Malformed JSON body on page {}", page))?;

        parse_search_response(&data)
    }
}

// ============ Wire format ============

/// One document as returned by the Article Search API.
///
/// Every field here is required: serde rejects a document that lacks one,
/// which is what turns a half-shaped upstream document into a page-level
/// error instead of a partial record.
#[derive(Deserialize)]
struct ArticleDoc {
    headline: Headline,
    snippet: String,
    web_url: String,
    pub_date: String,
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "abstract")]
    abstract_text: String,
    keywords: Vec<KeywordEntry>,
}

#[derive(Deserialize)]
struct Headline {
    main: String,
}

#[derive(Deserialize)]
struct KeywordEntry {
    value: String,
}

impl From<ArticleDoc> for Article {
    fn from(doc: ArticleDoc) -> Self {
        Article {
            title: doc.headline.main,
            body: doc.snippet,
            web_url: doc.web_url,
            created_at: doc.pub_date,
            id: doc.id,
            abstract_text: doc.abstract_text,
            keywords: doc.keywords.into_iter().map(|k| k.value).collect(),
        }
    }
}

/// Map a search response body into articles.
///
/// A body without a `response.docs` array yields an empty batch: the
/// upstream signals "no results" by dropping the path rather than by an
/// empty list. A present document that fails to map is an error for the
/// whole page.
pub fn parse_search_response(data: &Value) -> Result<Batch> {
    let docs = match data
        .get("response")
        .and_then(|r| r.get("docs"))
        .and_then(|d| d.as_array())
    {
        Some(docs) => docs,
        None => return Ok(Vec::new()),
    };

    let mut articles = Vec::with_capacity(docs.len());
    for (idx, doc) in docs.iter().enumerate() {
        let doc: ArticleDoc = serde_json::from_value(doc.clone())
            .with_context(|| format!("Malformed article document at index {}", idx))?;
        articles.push(doc.into());
    }

    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source_config() -> NytSourceConfig {
        NytSourceConfig {
            api_key: "test-key".to_string(),
            query: "Silicon Valley".to_string(),
            endpoint_url: None,
            timeout_secs: 30,
        }
    }

    fn sample_doc() -> Value {
        json!({
            "headline": { "main": "Chip Makers Rally", "kicker": "Business" },
            "snippet": "Semiconductor stocks rose sharply.",
            "web_url": "https://www.nytimes.com/2024/01/05/business/chips.html",
            "pub_date": "2024-01-05T12:30:00+0000",
            "_id": "nyt://article/abc-123",
            "abstract": "A rally in semiconductor shares.",
            "keywords": [
                { "name": "subject", "value": "Semiconductors", "rank": 1 },
                { "name": "subject", "value": "Stocks and Bonds", "rank": 2 }
            ],
            "word_count": 742
        })
    }

    #[test]
    fn test_document_maps_field_for_field() {
        let data = json!({ "response": { "docs": [sample_doc()] } });
        let articles = parse_search_response(&data).unwrap();
        assert_eq!(articles.len(), 1);

        let article = &articles[0];
        assert_eq!(article.title, "Chip Makers Rally");
        assert_eq!(article.body, "Semiconductor stocks rose sharply.");
        assert_eq!(
            article.web_url,
            "https://www.nytimes.com/2024/01/05/business/chips.html"
        );
        assert_eq!(article.created_at, "2024-01-05T12:30:00+0000");
        assert_eq!(article.id, "nyt://article/abc-123");
        assert_eq!(article.abstract_text, "A rally in semiconductor shares.");
        assert_eq!(article.keywords, vec!["Semiconductors", "Stocks and Bonds"]);
    }

    #[test]
    fn test_keyword_order_mirrors_upstream() {
        let mut doc = sample_doc();
        doc["keywords"] = json!([
            { "value": "z-last" },
            { "value": "a-first" },
            { "value": "m-middle" }
        ]);
        let data = json!({ "response": { "docs": [doc] } });
        let articles = parse_search_response(&data).unwrap();
        assert_eq!(articles[0].keywords, vec!["z-last", "a-first", "m-middle"]);
    }

    #[test]
    fn test_empty_keywords_is_not_an_error() {
        let mut doc = sample_doc();
        doc["keywords"] = json!([]);
        let data = json!({ "response": { "docs": [doc] } });
        let articles = parse_search_response(&data).unwrap();
        assert!(articles[0].keywords.is_empty());
    }

    #[test]
    fn test_missing_response_key_yields_empty_page() {
        let data = json!({ "status": "OK" });
        assert!(parse_search_response(&data).unwrap().is_empty());
    }

    #[test]
    fn test_missing_docs_key_yields_empty_page() {
        let data = json!({ "response": { "meta": { "hits": 0 } } });
        assert!(parse_search_response(&data).unwrap().is_empty());
    }

    #[test]
    fn test_empty_docs_array_yields_empty_page() {
        let data = json!({ "response": { "docs": [] } });
        assert!(parse_search_response(&data).unwrap().is_empty());
    }

    #[test]
    fn test_document_missing_field_fails_the_page() {
        let mut doc = sample_doc();
        doc.as_object_mut().unwrap().remove("snippet");
        let data = json!({ "response": { "docs": [sample_doc(), doc] } });

        let err = parse_search_response(&data).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_document_missing_headline_main_fails_the_page() {
        let mut doc = sample_doc();
        doc["headline"] = json!({ "kicker": "Business" });
        let data = json!({ "response": { "docs": [doc] } });
        assert!(parse_search_response(&data).is_err());
    }

    #[test]
    fn test_keyword_entry_without_value_fails_the_page() {
        let mut doc = sample_doc();
        doc["keywords"] = json!([{ "name": "subject", "rank": 1 }]);
        let data = json!({ "response": { "docs": [doc] } });
        assert!(parse_search_response(&data).is_err());
    }

    #[test]
    fn test_schema_is_stable_and_constant() {
        let source = NytConnector::new("tech".to_string(), source_config());
        let first = source.schema();
        let second = source.schema();
        assert_eq!(first, second);
        assert_eq!(
            first,
            &["title", "body", "created_at", "id", "summary", "abstract", "keywords"]
        );
    }

    #[test]
    fn test_connect_records_hints_without_io() {
        let mut source = NytConnector::new("tech".to_string(), source_config());
        source.connect(Some("created_at"), Some("2024-01-01"));
        assert_eq!(source.incremental_column.as_deref(), Some("created_at"));
        assert_eq!(source.incremental_value.as_deref(), Some("2024-01-01"));

        source.connect(None, None);
        assert!(source.incremental_column.is_none());
        assert!(source.incremental_value.is_none());

        source.disconnect();
    }

    #[test]
    fn test_default_endpoint_used_without_override() {
        let source = NytConnector::new("tech".to_string(), source_config());
        assert_eq!(source.endpoint(), DEFAULT_ENDPOINT);
    }
}
