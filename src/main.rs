//! # newswire CLI
//!
//! The `newswire` binary drives the source connectors directly: list the
//! configured sources, print a source's declared schema, or pull article
//! batches and print them as JSON lines.
//!
//! ## Usage
//!
//! ```bash
//! newswire --config ./config/newswire.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `newswire sources` | List configured sources and credential health |
//! | `newswire schema <source>` | Print the declared column names |
//! | `newswire fetch <source>` | Pull batches and print each article |
//!
//! ## Examples
//!
//! ```bash
//! # Pull up to 30 rows (3 pages) for the `tech` instance
//! newswire fetch nyt:tech --limit 30 --config ./config/newswire.toml
//!
//! # Show the dataset columns
//! newswire schema nyt:tech --config ./config/newswire.toml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use newswire::batches::Batches;
use newswire::config::load_config;
use newswire::sources::list_sources;
use newswire::traits::{DataSource, SourceRegistry};

/// newswire — a pluggable news-source connector for batch ingestion
/// pipelines.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/newswire.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "newswire",
    about = "newswire — a pluggable news-source connector for batch ingestion pipelines",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/newswire.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List configured sources and their credential health.
    Sources,

    /// Print a source's declared column names, one per line.
    Schema {
        /// Source specifier: `<type>:<name>` (e.g. `nyt:tech`), or a bare
        /// instance name which defaults to the `nyt` type.
        source: String,
    },

    /// Pull article batches from a source and print them.
    ///
    /// Prints one header line per batch and each article as a JSON line.
    /// Stops at the first empty page or once the row limit is covered in
    /// whole-page increments.
    Fetch {
        /// Source specifier: `<type>:<name>` (e.g. `nyt:tech`), or a bare
        /// instance name which defaults to the `nyt` type.
        source: String,

        /// Approximate cap on total rows to fetch, rounded up to a full
        /// upstream page.
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Incremental column hint, recorded at connect time (diagnostic
        /// only; requests are not filtered by it).
        #[arg(long)]
        incremental_column: Option<String>,

        /// Last seen value for the incremental column (diagnostic only).
        #[arg(long)]
        incremental_value: Option<String>,
    },
}

/// Split a `type:name` source specifier. A bare name defaults to `nyt`.
fn parse_source_label(label: &str) -> (&str, &str) {
    match label.split_once(':') {
        Some((source_type, name)) => (source_type, name),
        None => ("nyt", label),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Sources => list_sources(&config),

        Commands::Schema { source } => {
            let (source_type, name) = parse_source_label(&source);
            let mut registry = SourceRegistry::from_config(&config);
            let source = registry.find_mut(source_type, name).with_context(|| {
                format!("Unknown source '{source_type}:{name}' (run `newswire sources`)")
            })?;
            for column in source.schema() {
                println!("{column}");
            }
            Ok(())
        }

        Commands::Fetch {
            source,
            limit,
            incremental_column,
            incremental_value,
        } => {
            let (source_type, name) = parse_source_label(&source);
            let mut registry = SourceRegistry::from_config(&config);
            let source = registry.find_mut(source_type, name).with_context(|| {
                format!("Unknown source '{source_type}:{name}' (run `newswire sources`)")
            })?;

            source.connect(incremental_column.as_deref(), incremental_value.as_deref());

            let mut batches = Batches::new(&**source, limit);
            let mut index = 0usize;
            while let Some(batch) = batches.next().await? {
                println!("{} Batch of {} items", index, batch.len());
                for article in &batch {
                    println!("{}", serde_json::to_string(article)?);
                }
                index += 1;
            }

            source.disconnect();
            Ok(())
        }
    }
}
