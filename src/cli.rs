//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::service::Domain;
use clap::Parser;
use std::path::PathBuf;

/// patentscope - patent landscape analytics over CSV exports
///
/// Serves the dashboard JSON API, or writes a one-off report covering the
/// geographic, entity, classification and timeline breakdowns.
///
/// Examples:
///   patentscope --serve
///   patentscope --serve --port 9000 --processed-dir ./exports/processed
///   patentscope --domain timeline --format markdown --output timeline.md
///   patentscope --dry-run
///   patentscope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Run the HTTP API instead of writing a report
    #[arg(long)]
    pub serve: bool,

    /// Domain to include in the report
    #[arg(long, default_value = "all", value_name = "DOMAIN")]
    pub domain: DomainFilter,

    /// Output format (json, markdown)
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for the report
    ///
    /// Written to stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory holding the raw CSV exports (searched second)
    #[arg(long, value_name = "DIR", env = "PATENTSCOPE_RAW_DIR")]
    pub raw_dir: Option<PathBuf>,

    /// Directory holding the processed CSV exports (searched first)
    #[arg(long, value_name = "DIR", env = "PATENTSCOPE_PROCESSED_DIR")]
    pub processed_dir: Option<PathBuf>,

    /// Address to bind in --serve mode
    #[arg(long, value_name = "HOST", env = "PATENTSCOPE_HOST")]
    pub host: Option<String>,

    /// Port to bind in --serve mode
    #[arg(short, long, value_name = "PORT", env = "PATENTSCOPE_PORT")]
    pub port: Option<u16>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .patentscope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: resolve every dataset and print where it was found
    #[arg(long, conflicts_with = "serve")]
    pub dry_run: bool,

    /// Generate a default .patentscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// Markdown format
    Markdown,
}

/// Domain selection for report mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DomainFilter {
    #[default]
    All,
    Geographic,
    Entity,
    Classification,
    Timeline,
}

impl DomainFilter {
    /// Domains this filter selects, in report order.
    pub fn domains(&self) -> Vec<Domain> {
        match self {
            DomainFilter::All => Domain::ALL.to_vec(),
            DomainFilter::Geographic => vec![Domain::Geographic],
            DomainFilter::Entity => vec![Domain::Entity],
            DomainFilter::Classification => vec![Domain::Classification],
            DomainFilter::Timeline => vec![Domain::Timeline],
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.port == Some(0) {
            return Err("Port must be between 1 and 65535".to_string());
        }

        if self.serve && self.output.is_some() {
            return Err("--output only applies to report mode".to_string());
        }

        if let Some(ref host) = self.host {
            if host.trim().is_empty() {
                return Err("Host must not be empty".to_string());
            }
        }

        for dir in [&self.raw_dir, &self.processed_dir].into_iter().flatten() {
            if dir.exists() && !dir.is_dir() {
                return Err(format!("Data path is not a directory: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        self.log_level_with(self.verbose)
    }

    /// Like [`Args::log_level`], with verbosity also coming from the config
    /// file. `--quiet` still wins.
    pub fn log_level_with(&self, verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
