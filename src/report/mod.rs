//! Offline report mode.
//!
//! Builds the same domain summaries the API serves and renders them into a
//! single JSON or Markdown document.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::config::AnalysisConfig;
use crate::models::{DashboardReport, ReportMetadata, UnavailableDomain};
use crate::service::{self, DataSources, Domain};
use chrono::Utc;
use tracing::{info, warn};

/// Build every requested domain. Failed domains are listed, not fatal.
pub fn build_report(
    sources: &DataSources,
    analysis: &AnalysisConfig,
    domains: &[Domain],
) -> DashboardReport {
    let mut report = DashboardReport {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            data_dirs: sources
                .search_dirs()
                .iter()
                .map(|d| d.display().to_string())
                .collect(),
            domains: domains.iter().map(|d| d.name().to_string()).collect(),
        },
        geographic: None,
        entity: None,
        classification: None,
        timeline: None,
        unavailable: Vec::new(),
    };

    for &domain in domains {
        let outcome = match domain {
            Domain::Geographic => service::geographic(sources).map(|s| report.geographic = Some(s)),
            Domain::Entity => service::entity(sources).map(|s| report.entity = Some(s)),
            Domain::Classification => service::classification(sources, analysis)
                .map(|s| report.classification = Some(s)),
            Domain::Timeline => {
                service::timeline(sources, analysis).map(|s| report.timeline = Some(s))
            }
        };

        match outcome {
            Ok(()) => info!("Built {} summary", domain),
            Err(e) => {
                warn!("Skipping {}: {}", domain, e);
                report.unavailable.push(UnavailableDomain {
                    domain: domain.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}
