//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.patentscope.toml` files.

use crate::analysis::ClassificationLimits;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".patentscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data directory settings.
    #[serde(default)]
    pub data: DataConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Aggregation limits.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Where the CSV exports live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Raw exports, searched second.
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,

    /// Processed exports, searched first.
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            processed_dir: default_processed_dir(),
        }
    }
}

impl DataConfig {
    /// Directories in search order.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        vec![self.processed_dir.clone(), self.raw_dir.clone()]
    }
}

fn default_raw_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared-cache freshness window for successful responses.
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_seconds: u64,

    /// Window during which a stale response may be served while revalidating.
    #[serde(default = "default_stale_while_revalidate")]
    pub stale_while_revalidate_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cache_max_age_seconds: default_cache_max_age(),
            stale_while_revalidate_seconds: default_stale_while_revalidate(),
        }
    }
}

impl ServerConfig {
    /// Value of the `Cache-Control` header sent with successful responses.
    pub fn cache_control(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.cache_max_age_seconds, self.stale_while_revalidate_seconds
        )
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cache_max_age() -> u64 {
    6 * 60 * 60
}

fn default_stale_while_revalidate() -> u64 {
    24 * 60 * 60
}

/// Ranking limits and the plausible filing-year window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Classification codes kept per breakdown.
    #[serde(default = "default_top_classifications")]
    pub top_classifications: usize,

    /// Owners kept in the owner × classification breakdown.
    #[serde(default = "default_top_classification_owners")]
    pub top_classification_owners: usize,

    /// Owners kept in the timeline ranking.
    #[serde(default = "default_top_timeline_owners")]
    pub top_timeline_owners: usize,

    /// First plausible filing year (inclusive).
    #[serde(default = "default_min_year")]
    pub min_year: u16,

    /// Last plausible filing year (inclusive).
    #[serde(default = "default_max_year")]
    pub max_year: u16,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_classifications: default_top_classifications(),
            top_classification_owners: default_top_classification_owners(),
            top_timeline_owners: default_top_timeline_owners(),
            min_year: default_min_year(),
            max_year: default_max_year(),
        }
    }
}

impl AnalysisConfig {
    pub fn year_range(&self) -> RangeInclusive<u16> {
        self.min_year..=self.max_year
    }

    pub fn classification_limits(&self) -> ClassificationLimits {
        ClassificationLimits {
            top_codes: self.top_classifications,
            top_owners: self.top_classification_owners,
            years: self.year_range(),
        }
    }
}

fn default_top_classifications() -> usize {
    5
}

fn default_top_classification_owners() -> usize {
    15
}

fn default_top_timeline_owners() -> usize {
    8
}

fn default_min_year() -> u16 {
    2000
}

fn default_max_year() -> u16 {
    2030
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref raw_dir) = args.raw_dir {
            self.data.raw_dir = raw_dir.clone();
        }
        if let Some(ref processed_dir) = args.processed_dir {
            self.data.processed_dir = processed_dir.clone();
        }

        if let Some(ref host) = args.host {
            self.server.host = host.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Reject settings the aggregators cannot work with.
    pub fn validate(&self) -> Result<()> {
        let analysis = &self.analysis;

        if analysis.min_year > analysis.max_year {
            bail!(
                "analysis.min_year ({}) must not exceed analysis.max_year ({})",
                analysis.min_year,
                analysis.max_year
            );
        }
        if analysis.top_classifications == 0 {
            bail!("analysis.top_classifications must be at least 1");
        }
        if analysis.top_classification_owners == 0 {
            bail!("analysis.top_classification_owners must be at least 1");
        }
        if analysis.top_timeline_owners == 0 {
            bail!("analysis.top_timeline_owners must be at least 1");
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
