//! Country distribution aggregation.

use super::countries::{is_nordic, lookup_country, special_region_name, NORDIC_CODES};
use super::labels::{clean_label, is_summary_row, parse_count};
use crate::dataset::CsvTable;
use crate::models::{CountryBreakdown, CountryRecord, SpecialRegion};
use std::collections::BTreeMap;
use tracing::debug;

/// Header keys accepted for the country code column, in priority order.
pub const COUNTRY_COLUMNS: &[&str] = &[
    "all_family_country",
    "family_country",
    "priority_country",
    "country_code",
    "country",
    "code",
];

pub const TOTAL_COLUMNS: &[&str] = &["total", "count", "families", "patents", "value"];

/// Summarize a geography table into countries, special regions and the
/// zero-padded Nordic subset.
pub fn aggregate_countries(table: &CsvTable) -> CountryBreakdown {
    let (Some(code_col), Some(total_col)) = (
        table.find_column(COUNTRY_COLUMNS),
        table.find_column(TOTAL_COLUMNS),
    ) else {
        debug!("Geography table lacks a country or total column");
        return CountryBreakdown::default();
    };

    // Rows for the same code are summed.
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    for row in table.rows() {
        let code = clean_label(&row[code_col]).to_uppercase();
        if code.is_empty() || is_summary_row(&code) {
            continue;
        }
        *totals.entry(code).or_default() += parse_count(&row[total_col]);
    }

    let mut countries = Vec::new();
    let mut special_regions = Vec::new();

    for (code, total) in totals {
        if let Some(name) = special_region_name(&code) {
            special_regions.push(SpecialRegion {
                code,
                name: name.to_string(),
                total,
            });
        } else {
            countries.push(country_record(code, total));
        }
    }

    countries.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.country_code.cmp(&b.country_code))
    });
    special_regions.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.code.cmp(&b.code)));

    let nordic = nordic_subset(&countries);
    let country_filings = countries.iter().map(|c| c.total).sum();
    let regional_filings = special_regions.iter().map(|r| r.total).sum();
    let country_count = countries.len();

    CountryBreakdown {
        countries,
        special_regions,
        nordic,
        country_filings,
        regional_filings,
        country_count,
    }
}

fn country_record(code: String, total: u64) -> CountryRecord {
    match lookup_country(&code) {
        Some(country) => CountryRecord {
            country_code: code,
            country_name: country.name.to_string(),
            iso3: Some(country.iso3.to_string()),
            total,
        },
        None => CountryRecord {
            country_name: code.clone(),
            country_code: code,
            iso3: None,
            total,
        },
    }
}

/// Every Nordic country, taken from `countries` when present and padded
/// with a zero record otherwise. Sorted by total, then display order.
pub fn nordic_subset(countries: &[CountryRecord]) -> Vec<CountryRecord> {
    let mut nordic: Vec<CountryRecord> = countries
        .iter()
        .filter(|c| is_nordic(&c.country_code))
        .cloned()
        .collect();

    for code in NORDIC_CODES {
        if !nordic.iter().any(|c| c.country_code == code) {
            nordic.push(country_record(code.to_string(), 0));
        }
    }

    nordic.sort_by_key(|c| {
        let position = NORDIC_CODES.iter().position(|code| *code == c.country_code);
        (std::cmp::Reverse(c.total), position)
    });
    nordic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::parse_bytes;

    fn table(csv: &str) -> CsvTable {
        parse_bytes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_norway_and_epo_scenario() {
        let breakdown = aggregate_countries(&table("All Family Country,Total\nNO,12\nEP,5\n"));

        assert_eq!(
            breakdown.countries,
            vec![CountryRecord {
                country_code: "NO".to_string(),
                country_name: "Norway".to_string(),
                iso3: Some("NOR".to_string()),
                total: 12,
            }]
        );
        assert_eq!(
            breakdown.special_regions,
            vec![SpecialRegion {
                code: "EP".to_string(),
                name: "European Patent Office".to_string(),
                total: 5,
            }]
        );

        assert_eq!(breakdown.nordic.len(), 5);
        assert_eq!(breakdown.nordic[0].country_code, "NO");
        assert_eq!(breakdown.nordic[0].total, 12);
        assert!(breakdown.nordic[1..].iter().all(|c| c.total == 0));
    }

    #[test]
    fn test_nordic_padding_when_absent() {
        let breakdown = aggregate_countries(&table("Country,Total\nUS,40\n"));
        let codes: Vec<_> = breakdown
            .nordic
            .iter()
            .map(|c| c.country_code.as_str())
            .collect();
        assert_eq!(codes, NORDIC_CODES);
        assert!(breakdown.nordic.iter().all(|c| c.total == 0));
        assert_eq!(breakdown.nordic[0].iso3.as_deref(), Some("NOR"));
    }

    #[test]
    fn test_totals_are_preserved() {
        let csv = "All Family Country,Total\nUS,40\nDE,15\nJP,22\nSE,3\nWO,9\n";
        let breakdown = aggregate_countries(&table(csv));

        assert_eq!(breakdown.country_filings, 80);
        assert_eq!(breakdown.regional_filings, 9);
        assert_eq!(breakdown.country_count, breakdown.countries.len());
        let sum: u64 = breakdown.countries.iter().map(|c| c.total).sum();
        assert_eq!(sum, 80);
    }

    #[test]
    fn test_sorted_descending_and_duplicates_summed() {
        let csv = "country,total\nde,5\nUS,10\n\"DE\",7\nJP,12\n";
        let breakdown = aggregate_countries(&table(csv));
        let ranked: Vec<_> = breakdown
            .countries
            .iter()
            .map(|c| (c.country_code.as_str(), c.total))
            .collect();
        assert_eq!(ranked, vec![("DE", 12), ("JP", 12), ("US", 10)]);
    }

    #[test]
    fn test_unmapped_code_has_null_iso3() {
        let breakdown = aggregate_countries(&table("Country,Total\nXK,2\n"));
        assert_eq!(breakdown.countries[0].iso3, None);
        assert_eq!(breakdown.countries[0].country_name, "XK");
    }

    #[test]
    fn test_missing_columns_yield_empty_breakdown() {
        let breakdown = aggregate_countries(&table("Owner,Total\nAcme,3\n"));
        assert!(breakdown.is_empty());
        assert!(breakdown.nordic.is_empty());
    }

    #[test]
    fn test_blank_codes_are_skipped() {
        let breakdown = aggregate_countries(&table("Country,Total\n,4\n  ,2\nFI,1\n"));
        assert_eq!(breakdown.countries.len(), 1);
        assert_eq!(breakdown.country_filings, 1);
    }

    #[test]
    fn test_total_row_is_not_a_country() {
        let breakdown = aggregate_countries(&table("Country,Total\nUS,4\nTotal,4\n"));
        assert_eq!(breakdown.countries.len(), 1);
        assert_eq!(breakdown.country_filings, 4);
    }
}
