//! # newswire
//!
//! A pluggable news-source connector for batch ingestion pipelines.
//!
//! newswire fetches news articles from the NY Times Article Search API,
//! normalizes each document into a fixed flat record, and yields them in
//! bounded per-page batches behind a small uniform source contract:
//! connect, declare schema, pull batches, disconnect.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌─────────────────┐
//! │   Sources   │──▶│   Batches    │──▶│ Hosting pipeline │
//! │  nyt:<name> │   │ 1 page = 1   │   │  (or the CLI)    │
//! └─────────────┘   └──────────────┘   └─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export NYT_API_KEY=...
//! newswire sources                   # list configured sources
//! newswire schema nyt:tech           # print the declared columns
//! newswire fetch nyt:tech --limit 30 # pull up to 3 pages of articles
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`traits`] | The [`DataSource`](traits::DataSource) contract and registry |
//! | [`connector_nyt`] | NY Times Article Search source |
//! | [`batches`] | Lazy pull-based batch iteration |
//! | [`sources`] | Source health listing |

pub mod batches;
pub mod config;
pub mod connector_nyt;
pub mod models;
pub mod sources;
pub mod traits;
