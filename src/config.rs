use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SourcesConfig {
    /// NY Times Article Search instances, keyed by instance name.
    #[serde(default)]
    pub nyt: BTreeMap<String, NytSourceConfig>,
}

/// Configuration for one NY Times source instance.
///
/// ```toml
/// [sources.nyt.tech]
/// api_key = "${NYT_API_KEY}"
/// query = "Silicon Valley"
/// # endpoint_url = "http://localhost:9000/articlesearch.json"
/// # timeout_secs = 30
/// ```
#[derive(Debug, Deserialize, Clone)]
pub struct NytSourceConfig {
    /// API key, sent as the `api-key` query parameter. Supports `${ENV_VAR}`
    /// expansion so the credential can stay out of the config file.
    pub api_key: String,
    /// Free-text search string, fixed for the life of the connector.
    pub query: String,
    /// Override the search endpoint (used by tests and proxies).
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Per-request timeout. The upstream call has no other deadline.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl NytSourceConfig {
    /// Resolve the API key, expanding a `${ENV_VAR}` reference if present.
    ///
    /// Resolution happens at fetch time, not load time, so that listing
    /// sources works even when the credential is absent.
    pub fn resolve_api_key(&self) -> Result<String> {
        expand_env(&self.api_key)
    }
}

/// Expand `${VAR}` references in a config value from the environment.
///
/// A value without references is returned unchanged. An unset variable is an
/// error rather than an empty expansion.
pub fn expand_env(value: &str) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .with_context(|| format!("Unclosed ${{ in config value: {value}"))?;
        let var = &after[..end];
        let resolved = std::env::var(var)
            .with_context(|| format!("Environment variable {var} not set"))?;
        out.push_str(&resolved);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    for (name, source) in &config.sources.nyt {
        if source.api_key.is_empty() {
            anyhow::bail!("sources.nyt.{}.api_key must not be empty", name);
        }
        if source.query.is_empty() {
            anyhow::bail!("sources.nyt.{}.query must not be empty", name);
        }
        if source.timeout_secs == 0 {
            anyhow::bail!("sources.nyt.{}.timeout_secs must be > 0", name);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str(
            r#"
[sources.nyt.tech]
api_key = "abc123"
query = "Silicon Valley"
"#,
        )
        .unwrap();

        let source = &config.sources.nyt["tech"];
        assert_eq!(source.api_key, "abc123");
        assert_eq!(source.query, "Silicon Valley");
        assert_eq!(source.timeout_secs, 30);
        assert!(source.endpoint_url.is_none());
    }

    #[test]
    fn test_empty_config_has_no_sources() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.sources.nyt.is_empty());
    }

    #[test]
    fn test_expand_env_passthrough() {
        assert_eq!(expand_env("plain-key").unwrap(), "plain-key");
    }

    #[test]
    fn test_expand_env_substitutes() {
        std::env::set_var("NEWSWIRE_TEST_KEY", "secret");
        assert_eq!(expand_env("${NEWSWIRE_TEST_KEY}").unwrap(), "secret");
        assert_eq!(
            expand_env("pre-${NEWSWIRE_TEST_KEY}-post").unwrap(),
            "pre-secret-post"
        );
    }

    #[test]
    fn test_expand_env_unset_is_error() {
        assert!(expand_env("${NEWSWIRE_DEFINITELY_UNSET_VAR}").is_err());
    }

    #[test]
    fn test_expand_env_unclosed_is_error() {
        assert!(expand_env("${OOPS").is_err());
    }
}
