//! Markdown and JSON report generation.
//!
//! This module renders a [`DashboardReport`] as a Markdown document with one
//! table per breakdown, or as pretty-printed JSON.

use crate::models::{
    ClassificationSummary, CountryBreakdown, DashboardReport, EntityCount, EntitySummary,
    GeographicSummary, ReportMetadata, TimelineSummary, UnavailableDomain,
};
use anyhow::Result;
use std::collections::BTreeMap;

/// Rows shown per ranking table; the JSON output is never truncated.
const MAX_TABLE_ROWS: usize = 20;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &DashboardReport) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Patent Landscape Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));

    if let Some(ref geographic) = report.geographic {
        output.push_str(&generate_geographic_section(geographic));
    }
    if let Some(ref entity) = report.entity {
        output.push_str(&generate_entity_section(entity));
    }
    if let Some(ref classification) = report.classification {
        output.push_str(&generate_classification_section(classification));
    }
    if let Some(ref timeline) = report.timeline {
        output.push_str(&generate_timeline_section(timeline));
    }

    output.push_str(&generate_unavailable_section(&report.unavailable));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Data Directories:** {}\n",
        metadata
            .data_dirs
            .iter()
            .map(|d| format!("`{}`", d))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    section.push_str(&format!("- **Domains:** {}\n", metadata.domains.join(", ")));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &DashboardReport) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");

    if report.geographic.is_some() {
        toc.push_str("- [Geographic Distribution](#geographic-distribution)\n");
    }
    if report.entity.is_some() {
        toc.push_str("- [Owners and Inventors](#owners-and-inventors)\n");
    }
    if report.classification.is_some() {
        toc.push_str("- [Classifications](#classifications)\n");
    }
    if report.timeline.is_some() {
        toc.push_str("- [Filing Timeline](#filing-timeline)\n");
    }
    if !report.unavailable.is_empty() {
        toc.push_str("- [Unavailable Data](#unavailable-data)\n");
    }

    toc.push('\n');

    toc
}

fn generate_geographic_section(summary: &GeographicSummary) -> String {
    let mut section = String::new();

    section.push_str("## Geographic Distribution\n\n");
    section.push_str(&generate_breakdown_tables("Family Members", &summary.family));
    section.push_str(&generate_breakdown_tables("Priority Filings", &summary.priority));

    section
}

/// Country, regional office and Nordic tables for one breakdown.
fn generate_breakdown_tables(title: &str, breakdown: &CountryBreakdown) -> String {
    let mut section = String::new();

    section.push_str(&format!("### {}\n\n", title));

    if breakdown.is_empty() {
        section.push_str("No data.\n\n");
        return section;
    }

    section.push_str(&format!(
        "*Countries: {} | Country filings: {} | Regional filings: {}*\n\n",
        breakdown.country_count, breakdown.country_filings, breakdown.regional_filings
    ));

    section.push_str("| Code | Country | ISO3 | Filings |\n");
    section.push_str("|:---|:---|:---:|---:|\n");
    for country in breakdown.countries.iter().take(MAX_TABLE_ROWS) {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            country.country_code,
            country.country_name,
            country.iso3.as_deref().unwrap_or("-"),
            country.total
        ));
    }
    section.push_str(&truncation_note(breakdown.countries.len()));
    section.push('\n');

    if !breakdown.special_regions.is_empty() {
        section.push_str("| Office | Name | Filings |\n");
        section.push_str("|:---|:---|---:|\n");
        for region in &breakdown.special_regions {
            section.push_str(&format!(
                "| {} | {} | {} |\n",
                region.code, region.name, region.total
            ));
        }
        section.push('\n');
    }

    section.push_str("**Nordic:** ");
    section.push_str(
        &breakdown
            .nordic
            .iter()
            .map(|c| format!("{} {}", c.country_code, c.total))
            .collect::<Vec<_>>()
            .join(" · "),
    );
    section.push_str("\n\n");

    section
}

fn generate_entity_section(summary: &EntitySummary) -> String {
    let mut section = String::new();

    section.push_str("## Owners and Inventors\n\n");
    section.push_str(&format!(
        "*Owners: {} | Inventors: {}*\n\n",
        summary.owner_count, summary.inventor_count
    ));
    section.push_str(&generate_ranking_table("Top Owners", "Owner", &summary.owners));
    section.push_str(&generate_ranking_table(
        "Top Inventors",
        "Inventor",
        &summary.inventors,
    ));

    section
}

fn generate_ranking_table(title: &str, column: &str, entries: &[EntityCount]) -> String {
    let mut table = String::new();

    table.push_str(&format!("### {}\n\n", title));

    if entries.is_empty() {
        table.push_str("No data.\n\n");
        return table;
    }

    table.push_str(&format!("| # | {} | Patents |\n", column));
    table.push_str("|---:|:---|---:|\n");
    for (i, entry) in entries.iter().take(MAX_TABLE_ROWS).enumerate() {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            i + 1,
            escape_cell(&entry.name),
            entry.count
        ));
    }
    table.push_str(&truncation_note(entries.len()));
    table.push('\n');

    table
}

fn generate_classification_section(summary: &ClassificationSummary) -> String {
    let mut section = String::new();

    section.push_str("## Classifications\n\n");

    section.push_str("### By Owner\n\n");
    let codes: Vec<&str> = summary
        .by_owner
        .codes
        .iter()
        .map(|c| c.code.as_str())
        .collect();
    if summary.by_owner.owners.is_empty() {
        section.push_str("No data.\n\n");
    } else {
        section.push_str(&matrix_header("Owner", &codes, true));
        for owner in &summary.by_owner.owners {
            section.push_str(&format!(
                "| {} | {}{} |\n",
                escape_cell(&owner.current_owner),
                matrix_cells(&codes, &owner.classifications),
                owner.total
            ));
        }
        section.push('\n');
    }

    section.push_str("### By Year\n\n");
    let codes: Vec<&str> = summary
        .by_year
        .codes
        .iter()
        .map(|c| c.code.as_str())
        .collect();
    if summary.by_year.years.is_empty() {
        section.push_str("No data.\n\n");
    } else {
        section.push_str(&matrix_header("Year", &codes, false));
        for year in &summary.by_year.years {
            let mut row = format!("| {} |", year.year);
            for code in &codes {
                let count = year.classifications.get(*code).copied().unwrap_or(0);
                row.push_str(&format!(" {} |", count));
            }
            row.push('\n');
            section.push_str(&row);
        }
        section.push('\n');
    }

    section
}

fn matrix_header(label: &str, codes: &[&str], with_total: bool) -> String {
    let mut header = format!("| {} |", label);
    let mut divider = String::from("|:---|");
    for code in codes {
        header.push_str(&format!(" {} |", code));
        divider.push_str("---:|");
    }
    if with_total {
        header.push_str(" Total |");
        divider.push_str("---:|");
    }
    format!("{}\n{}\n", header, divider)
}

/// Cells for `codes` in order, each followed by a column separator.
fn matrix_cells(codes: &[&str], counts: &BTreeMap<String, u64>) -> String {
    codes
        .iter()
        .map(|code| format!("{} | ", counts.get(*code).copied().unwrap_or(0)))
        .collect()
}

fn generate_timeline_section(summary: &TimelineSummary) -> String {
    let mut section = String::new();
    let stats = &summary.stats;

    section.push_str("## Filing Timeline\n\n");
    section.push_str(&format!("- **Total Filings:** {}\n", stats.total_filings));
    section.push_str(&format!("- **Owners:** {}\n", stats.owner_count));
    if let Some(range) = stats.year_range {
        section.push_str(&format!("- **Years:** {}–{}\n", range.start, range.end));
    }
    if let Some(ref peak) = stats.peak_year {
        section.push_str(&format!(
            "- **Peak Year:** {} ({} filings)\n",
            peak.year, peak.count
        ));
    }
    section.push('\n');

    if !summary.year_totals.is_empty() {
        section.push_str("### Filings per Year\n\n");
        section.push_str("| Year | Filings |\n");
        section.push_str("|:---|---:|\n");
        for total in &summary.year_totals {
            section.push_str(&format!("| {} | {} |\n", total.year, total.count));
        }
        section.push('\n');
    }

    if !summary.top_owners.is_empty() {
        section.push_str("### Most Active Owners\n\n");
        section.push_str("| # | Owner | Filings |\n");
        section.push_str("|---:|:---|---:|\n");
        for (i, owner) in summary.top_owners.iter().enumerate() {
            section.push_str(&format!(
                "| {} | {} | {} |\n",
                i + 1,
                escape_cell(&owner.owner),
                owner.total
            ));
        }
        section.push('\n');
    }

    section
}

fn generate_unavailable_section(unavailable: &[UnavailableDomain]) -> String {
    if unavailable.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Unavailable Data\n\n");
    for entry in unavailable {
        section.push_str(&format!("- **{}:** {}\n", entry.domain, entry.reason));
    }
    section.push('\n');

    section
}

fn truncation_note(len: usize) -> String {
    if len > MAX_TABLE_ROWS {
        format!("\n*{} more not shown.*\n", len - MAX_TABLE_ROWS)
    } else {
        String::new()
    }
}

/// Keep owner names containing `|` from breaking the table.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by patentscope v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
