//! Search configuration via `compass.toml`
//!
//! All settings have defaults, so an empty file (or no file) is valid. To
//! change settings, edit the file and restart the service.

use crate::error::{Error, Result};
use crate::search_types::ScoreWeights;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "compass.toml";

/// Locations read by the directory document source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding system files and `components/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Directory holding workflow documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_dir: Option<PathBuf>,
}

/// Search configuration loaded from `compass.toml`.
///
/// # Example
///
/// ```toml
/// cache_capacity = 100
/// cache_ttl_secs = 1800
///
/// [weights]
/// exact_match = 0.3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of cached query result sets
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Cache entry time-to-live in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Number of index candidates considered per query
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    /// Results returned when the caller does not say
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Base score a candidate must exceed to be ranked
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Multiply scores by a freshness-based factor
    #[serde(default = "default_boost_recent")]
    pub boost_recent: bool,
    /// Ranking weight vector
    #[serde(default)]
    pub weights: ScoreWeights,
    /// Document locations
    #[serde(default)]
    pub data: DataConfig,
}

fn default_cache_capacity() -> usize {
    100
}

fn default_cache_ttl_secs() -> u64 {
    30 * 60
}

fn default_candidate_limit() -> usize {
    20
}

fn default_max_results() -> usize {
    8
}

fn default_similarity_threshold() -> f64 {
    0.3
}

fn default_boost_recent() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl_secs(),
            candidate_limit: default_candidate_limit(),
            max_results: default_max_results(),
            similarity_threshold: default_similarity_threshold(),
            boost_recent: default_boost_recent(),
            weights: ScoreWeights::default(),
            data: DataConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Cache TTL as a `Duration`
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Check invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for a zero capacity or candidate limit, a
    /// negative or non-finite threshold, or invalid weights.
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(Error::Config("cache_capacity must be greater than 0".into()));
        }
        if self.candidate_limit == 0 {
            return Err(Error::Config("candidate_limit must be greater than 0".into()));
        }
        if !self.similarity_threshold.is_finite() || self.similarity_threshold < 0.0 {
            return Err(Error::Config(format!(
                "similarity_threshold must be a non-negative number, got {}",
                self.similarity_threshold
            )));
        }
        if !self.weights.is_valid() {
            return Err(Error::Config(
                "weights must all be finite and non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Compass search configuration

# Maximum cached query result sets (oldest insertion evicted first)
cache_capacity = 100

# Cache entry time-to-live in seconds (default: 30 minutes)
cache_ttl_secs = 1800

# Index candidates considered per query
candidate_limit = 20

# Results returned when the caller does not specify
max_results = 8

# Base relevance score a candidate must exceed to be ranked
similarity_threshold = 0.3

# Multiply scores by (1 + freshness * 0.2)
boost_recent = true

# Ranking weights
# [weights]
# exact_match = 0.25
# semantic_similarity = 0.20
# context_relevance = 0.20
# intent_alignment = 0.15
# freshness = 0.10
# popularity = 0.05
# type_relevance = 0.05

# Document locations
# [data]
# data_dir = "data"
# docs_dir = "docs"
"#
    }

    /// Parse config from a TOML string and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SearchConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{} ({})", msg, path.display())),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
