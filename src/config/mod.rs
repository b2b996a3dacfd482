//! Configuration management.
//!
//! Configuration is read from a TOML file and layered with environment
//! variables prefixed `BIBRESOLVE__` (sections separated by `__`, e.g.
//! `BIBRESOLVE__RESOLVER__SHORT_CIRCUIT=false`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [providers]
//! doi_priority = ["pubmed", "crossref", "arxiv", "chemrxiv", "semantic"]
//! title_search = ["crossref", "semantic"]
//! timeout_secs = 30
//! email = "you@example.org"
//!
//! [[source_rates]]
//! source = "arxiv"
//! requests_per_second = 0.333
//!
//! [resolver]
//! title_similarity_threshold = 0.6
//! short_circuit = true
//!
//! [output]
//! format = "bibtex"
//! wrap_width = 70
//!
//! [logging]
//! level = "warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::CitationFormat;

/// Name of the configuration file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "bibresolve.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Provider selection and identification
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Per-source rate limits
    #[serde(default = "default_source_rates")]
    pub source_rates: Vec<SourceRateConfig>,

    /// Resolution policy
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Rendering defaults
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig::default(),
            source_rates: default_source_rates(),
            resolver: ResolverConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Requests per second allowed for `source`, if limited
    pub fn rate_for(&self, source: &str) -> Option<f64> {
        self.source_rates
            .iter()
            .find(|r| r.source == source)
            .map(|r| r.requests_per_second)
    }

    /// Semantic Scholar API key from the file, else from `SEMANTIC_SCHOLAR_API_KEY`
    pub fn semantic_scholar_api_key(&self) -> Option<String> {
        self.providers
            .semantic_scholar_api_key
            .clone()
            .or_else(|| std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }

    /// Serialize the effective configuration
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }
}

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Source ids queried for DOIs, highest priority first
    #[serde(default = "default_doi_priority")]
    pub doi_priority: Vec<String>,

    /// Source ids asked to search titles, in order
    #[serde(default = "default_title_search")]
    pub title_search: Vec<String>,

    /// Per-provider timeout for one lookup, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Contact address sent to NCBI and Crossref
    #[serde(default)]
    pub email: Option<String>,

    /// Semantic Scholar API key (optional, for higher rate limits)
    #[serde(default)]
    pub semantic_scholar_api_key: Option<String>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            doi_priority: default_doi_priority(),
            title_search: default_title_search(),
            timeout_secs: default_timeout_secs(),
            email: None,
            semantic_scholar_api_key: None,
        }
    }
}

fn default_doi_priority() -> Vec<String> {
    ["pubmed", "crossref", "arxiv", "chemrxiv", "semantic"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_title_search() -> Vec<String> {
    ["crossref", "semantic"].into_iter().map(String::from).collect()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Per-source rate limit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRateConfig {
    pub source: String,
    pub requests_per_second: f64,
}

impl SourceRateConfig {
    fn new(source: &str, requests_per_second: f64) -> Self {
        Self {
            source: source.to_string(),
            requests_per_second,
        }
    }
}

fn default_source_rates() -> Vec<SourceRateConfig> {
    vec![
        SourceRateConfig::new("pubmed", 3.0),
        SourceRateConfig::new("crossref", 50.0),
        SourceRateConfig::new("arxiv", 1.0 / 3.0),
        SourceRateConfig::new("chemrxiv", 5.0),
        SourceRateConfig::new("semantic", 1.0),
    ]
}

/// Resolver policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Below this similarity a title match is reported as suspicious
    #[serde(default = "default_similarity_threshold")]
    pub title_similarity_threshold: f64,

    /// Stop querying DOI providers once every field is known
    #[serde(default = "default_true")]
    pub short_circuit: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            title_similarity_threshold: default_similarity_threshold(),
            short_circuit: true,
        }
    }
}

fn default_similarity_threshold() -> f64 {
    0.6
}

fn default_true() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: CitationFormat,

    /// Column at which BibTeX values are wrapped
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: CitationFormat::default(),
            wrap_width: default_wrap_width(),
        }
    }
}

fn default_wrap_width() -> usize {
    70
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// Locate the configuration file: `./bibresolve.toml`, then the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("bibresolve").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Load configuration from `path`, or from the default locations when `None`.
///
/// An explicit path must exist. Without any file, defaults are layered with
/// environment variables only.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigFileError> {
    let file = match path {
        Some(path) if !path.is_file() => {
            return Err(ConfigFileError::NotFound(path.to_path_buf()))
        }
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(),
    };

    let mut builder = config::Config::builder();
    if let Some(file) = &file {
        tracing::debug!("Loading configuration from {}", file.display());
        builder = builder.add_source(config::File::from(file.as_path()));
    }
    let settings = builder
        .add_source(config::Environment::with_prefix("BIBRESOLVE").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.providers.doi_priority[0], "pubmed");
        assert_eq!(config.providers.title_search, vec!["crossref", "semantic"]);
        assert_eq!(config.resolver.title_similarity_threshold, 0.6);
        assert_eq!(config.output.wrap_width, 70);
        assert_eq!(config.rate_for("pubmed"), Some(3.0));
        assert_eq!(config.rate_for("unknown"), None);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[providers]
doi_priority = ["crossref", "pubmed"]
email = "someone@example.org"

[[source_rates]]
source = "crossref"
requests_per_second = 10.0

[resolver]
short_circuit = false

[output]
format = "markdown"
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.providers.doi_priority, vec!["crossref", "pubmed"]);
        assert_eq!(config.providers.email.as_deref(), Some("someone@example.org"));
        assert_eq!(config.providers.timeout_secs, 30);
        assert_eq!(config.source_rates.len(), 1);
        assert_eq!(config.rate_for("crossref"), Some(10.0));
        assert!(!config.resolver.short_circuit);
        assert_eq!(config.output.format, CitationFormat::Markdown);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/bibresolve.toml")));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[providers]"));
        assert!(text.contains("[[source_rates]]"));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
