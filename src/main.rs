//! patentscope - patent landscape analytics backend
//!
//! Reads CSV exports from a patent database, aggregates them into
//! geographic, entity, classification and timeline breakdowns, and either
//! serves them as a JSON API or writes them out as a report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, bind failure, unwritable output, etc.)
//!   2 - None of the requested domains had any data

mod analysis;
mod cli;
mod config;
mod dataset;
mod error;
mod models;
mod report;
mod server;
mod service;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use dataset::Dataset;
use service::{DataSources, Domain};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging starts so `[general] verbose` applies
    let loaded = load_config(&args);
    let verbose = match loaded {
        Ok((ref config, _)) => config.general.verbose || args.verbose,
        Err(_) => args.verbose,
    };

    // Initialize logging
    if let Err(e) = init_logging(args.log_level_with(verbose)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    info!("patentscope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let result = loaded.map(|(config, origin)| {
        origin.log();
        config
    });

    match result {
        Ok(config) => match run(args, config).await {
            Ok(exit_code) => std::process::exit(exit_code),
            Err(e) => fail(e),
        },
        Err(e) => fail(e),
    }
}

fn fail(e: anyhow::Error) -> ! {
    error!("patentscope failed: {:#}", e);
    eprintln!("\nError: {:#}", e);
    std::process::exit(1);
}

/// Handle --init-config: generate a default .patentscope.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to point at your CSV exports and tune the ranking limits.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(level: tracing::Level) -> Result<()> {
    // Logs go to stderr so a report on stdout stays clean.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Dispatch to serve, dry-run or report mode. Returns the exit code.
async fn run(args: Args, mut config: Config) -> Result<i32> {
    config.merge_with_args(&args);
    config.validate()?;

    if args.serve {
        server::start_server(&config, shutdown_signal()).await?;
        info!("Server stopped");
        return Ok(0);
    }

    let sources = DataSources::new(&config.data);

    if args.dry_run {
        return Ok(handle_dry_run(&sources));
    }

    run_report(&args, &config, &sources)
}

/// Build the requested domains and write the report.
fn run_report(args: &Args, config: &Config, sources: &DataSources) -> Result<i32> {
    let domains = args.domain.domains();
    let dashboard = report::build_report(sources, &config.analysis, &domains);

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => println!("{}", output),
    }

    if dashboard.is_empty() {
        warn!("No data found for any requested domain");
        return Ok(2);
    }

    Ok(0)
}

/// Handle --dry-run: resolve every dataset and print where it was found.
fn handle_dry_run(sources: &DataSources) -> i32 {
    println!("Dry run: resolving datasets (no aggregation)...\n");

    println!("   Search order:");
    for dir in sources.search_dirs() {
        println!("     {}", dir.display());
    }
    println!();

    let mut found = 0;
    for domain in Domain::ALL {
        println!("   {}:", domain);
        for &dataset in domain.datasets() {
            match sources.locate(dataset) {
                Ok(path) => {
                    found += 1;
                    println!("     [found]   {:<24} {}", dataset.label(), path.display());
                }
                Err(_) => println!("     [missing] {}", dataset.label()),
            }
        }
    }
    println!("\n   {} of {} datasets found", found, Dataset::ALL.len());
    if found == 0 {
        2
    } else {
        0
    }
}

/// Resolve on Ctrl-C so the server can drain in-flight requests.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

/// Where the configuration came from, logged once tracing is up.
enum ConfigOrigin {
    Explicit(PathBuf),
    Default,
    Builtin,
    Fallback(anyhow::Error),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::Default => info!("Loaded default config from {}", CONFIG_FILE),
            ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
            ConfigOrigin::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::Default)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Builtin)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Fallback(e))),
    }
}
