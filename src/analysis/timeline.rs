//! Owner × filing-year pivot reshaped into long-format facts.

use super::entity::OWNER_COLUMNS;
use super::labels::{clean_label, is_placeholder_owner, is_summary_row, parse_count, parse_year};
use crate::dataset::CsvTable;
use crate::models::{
    OwnerTotal, TimelinePoint, TimelineStats, TimelineSummary, YearRange, YearTotal,
};
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use tracing::debug;

/// Column layout detected from the table headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotLayout {
    pub owner_column: usize,
    /// `(column, year)`, ascending by year.
    pub year_columns: Vec<(usize, u16)>,
}

/// Find the owner column and the year columns.
///
/// A header is a year column when it parses as a year inside `years`. The
/// owner column is the first non-year column named like an owner, falling
/// back to the first non-year column.
pub fn detect_layout(table: &CsvTable, years: &RangeInclusive<u16>) -> Option<PivotLayout> {
    let mut year_columns: Vec<(usize, u16)> = table
        .headers()
        .iter()
        .enumerate()
        .filter_map(|(col, header)| parse_year(header, years).map(|year| (col, year)))
        .collect();

    if year_columns.is_empty() {
        return None;
    }
    year_columns.sort_by_key(|&(_, year)| year);

    let is_year = |col: usize| year_columns.iter().any(|&(c, _)| c == col);
    let owner_column = table
        .find_column(OWNER_COLUMNS)
        .filter(|&col| !is_year(col))
        .or_else(|| (0..table.headers().len()).find(|&col| !is_year(col)))?;

    Some(PivotLayout {
        owner_column,
        year_columns,
    })
}

/// Flatten the wide table into `(owner, year, count)` points.
///
/// Placeholder owners and counts of zero are dropped; repeated
/// `(owner, year)` pairs are summed. Points keep row order, then year order.
pub fn to_long_format(table: &CsvTable, layout: &PivotLayout) -> Vec<TimelinePoint> {
    let mut points: Vec<TimelinePoint> = Vec::new();
    let mut index: HashMap<(String, u16), usize> = HashMap::new();

    for row in table.rows() {
        let owner = clean_label(&row[layout.owner_column]);
        if is_placeholder_owner(&owner) || is_summary_row(&owner) {
            continue;
        }

        for &(col, year) in &layout.year_columns {
            let count = parse_count(&row[col]);
            if count == 0 {
                continue;
            }

            match index.get(&(owner.clone(), year)) {
                Some(&slot) => points[slot].count += count,
                None => {
                    index.insert((owner.clone(), year), points.len());
                    points.push(TimelinePoint {
                        owner: owner.clone(),
                        year,
                        count,
                    });
                }
            }
        }
    }

    points
}

/// Build the full timeline summary from an owner × year table.
pub fn summarize_timeline(
    table: &CsvTable,
    years: &RangeInclusive<u16>,
    top_owner_limit: usize,
) -> TimelineSummary {
    let Some(layout) = detect_layout(table, years) else {
        debug!("Timeline table has no year columns");
        return TimelineSummary::default();
    };

    let points = to_long_format(table, &layout);
    let year_totals = year_totals(&layout, &points);
    let top_owners = top_owners(&points, top_owner_limit);

    let top_names: HashSet<&str> = top_owners.iter().map(|o| o.owner.as_str()).collect();
    let top_owner_points = points
        .iter()
        .filter(|p| top_names.contains(p.owner.as_str()))
        .cloned()
        .collect();

    let stats = timeline_stats(&points, &year_totals);

    TimelineSummary {
        points,
        year_totals,
        top_owners,
        top_owner_points,
        stats,
    }
}

/// Totals for every detected year column, zeros included.
fn year_totals(layout: &PivotLayout, points: &[TimelinePoint]) -> Vec<YearTotal> {
    let mut years: Vec<u16> = layout.year_columns.iter().map(|&(_, year)| year).collect();
    years.dedup();

    years
        .into_iter()
        .map(|year| YearTotal {
            year,
            count: points.iter().filter(|p| p.year == year).map(|p| p.count).sum(),
        })
        .collect()
}

fn top_owners(points: &[TimelinePoint], limit: usize) -> Vec<OwnerTotal> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for point in points {
        *totals.entry(point.owner.as_str()).or_default() += point.count;
    }

    let mut owners: Vec<OwnerTotal> = totals
        .into_iter()
        .map(|(owner, total)| OwnerTotal {
            owner: owner.to_string(),
            total,
        })
        .collect();

    owners.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.owner.cmp(&b.owner)));
    owners.truncate(limit);
    owners
}

fn timeline_stats(points: &[TimelinePoint], year_totals: &[YearTotal]) -> TimelineStats {
    let owners: HashSet<&str> = points.iter().map(|p| p.owner.as_str()).collect();

    let year_range = match (
        points.iter().map(|p| p.year).min(),
        points.iter().map(|p| p.year).max(),
    ) {
        (Some(start), Some(end)) => Some(YearRange { start, end }),
        _ => None,
    };

    // Earliest year wins a tie; year_totals is ascending.
    let peak_year = year_totals
        .iter()
        .filter(|y| y.count > 0)
        .fold(None::<&YearTotal>, |best, y| match best {
            Some(b) if b.count >= y.count => Some(b),
            _ => Some(y),
        })
        .cloned();

    TimelineStats {
        total_filings: points.iter().map(|p| p.count).sum(),
        owner_count: owners.len(),
        year_range,
        peak_year,
    }
}
