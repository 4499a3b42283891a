//! The uniform data-source contract and source registry.
//!
//! Every source the ingestion pipeline can pull from implements
//! [`DataSource`]: a small connect / schema / fetch / disconnect surface.
//! Built-in sources are resolved from the TOML config into a
//! [`SourceRegistry`] and addressed by their `"{type}:{name}"` label.
//!
//! # Example
//!
//! ```rust,no_run
//! # use newswire::config::Config;
//! # use newswire::batches::Batches;
//! # use newswire::traits::{DataSource, SourceRegistry};
//! # async fn example(config: &Config) -> anyhow::Result<()> {
//! let mut registry = SourceRegistry::from_config(config);
//! let source = registry
//!     .find_mut("nyt", "tech")
//!     .ok_or_else(|| anyhow::anyhow!("no such source"))?;
//! source.connect(None, None);
//! let mut batches = Batches::new(&**source, 100);
//! while let Some(batch) = batches.next().await? {
//!     println!("{} articles", batch.len());
//! }
//! source.disconnect();
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use async_trait::async_trait;

use crate::batches::Batches;
use crate::config::Config;
use crate::models::Batch;

/// A data source that produces article batches for ingestion.
///
/// Implement this trait to plug a new upstream into the pipeline. A source
/// holds its immutable query configuration from construction; the only
/// mutable state is the pair of incremental hints recorded by
/// [`connect`](DataSource::connect).
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Returns the source instance name (e.g. `"tech"`).
    fn name(&self) -> &str;

    /// Returns a one-line description of what this source fetches.
    fn description(&self) -> &str;

    /// Returns the source type identifier (e.g. `"nyt"`).
    fn source_type(&self) -> &str {
        "custom"
    }

    /// Returns the label used to address this source: `"{type}:{name}"`.
    fn source_label(&self) -> String {
        format!("{}:{}", self.source_type(), self.name())
    }

    /// Returns the declared column names of the dataset, in order.
    ///
    /// Pure and constant: independent of any fetched data or prior call.
    fn schema(&self) -> &'static [&'static str];

    /// Record optional incremental-sync hints.
    ///
    /// The hints are diagnostic only; no source currently filters requests
    /// by them. Performs no I/O and never fails.
    fn connect(&mut self, incremental_column: Option<&str>, incremental_value: Option<&str>);

    /// Release held resources. No built-in source holds any, so the default
    /// is a no-op. Never fails.
    fn disconnect(&mut self) {}

    /// Fetch one zero-based page of articles from upstream.
    ///
    /// Exactly one outbound call per invocation, no retry. An upstream
    /// response without the expected result path yields an empty batch
    /// rather than an error; a document missing a mapped field fails the
    /// whole call.
    async fn fetch_page(&self, page: usize) -> Result<Batch>;

    /// Pull batches lazily, one upstream page per pull, until the first
    /// empty page or until `row_budget` rows have been covered in
    /// whole-page increments.
    ///
    /// Each call starts over at page 0 with its own counter.
    fn batches(&self, row_budget: usize) -> Batches<'_>
    where
        Self: Sized,
    {
        Batches::new(self, row_budget)
    }
}

/// Registry of configured sources.
///
/// Use [`SourceRegistry::from_config`] to resolve all built-in source
/// instances from the TOML config, then look one up by type and name.
pub struct SourceRegistry {
    sources: Vec<Box<dyn DataSource>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Create a registry pre-loaded with all source instances from the config.
    pub fn from_config(config: &Config) -> Self {
        use crate::connector_nyt::NytConnector;

        let mut registry = Self::new();
        for (name, cfg) in &config.sources.nyt {
            registry.register(Box::new(NytConnector::new(name.clone(), cfg.clone())));
        }
        registry
    }

    /// Register a source.
    pub fn register(&mut self, source: Box<dyn DataSource>) {
        self.sources.push(source);
    }

    /// Get all registered sources.
    pub fn sources(&self) -> &[Box<dyn DataSource>] {
        &self.sources
    }

    /// Find a specific source by type and name.
    pub fn find_mut(&mut self, source_type: &str, name: &str) -> Option<&mut Box<dyn DataSource>> {
        self.sources
            .iter_mut()
            .find(|s| s.source_type() == source_type && s.name() == name)
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Return the count of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
