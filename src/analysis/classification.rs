//! Classification (IPC/CPC) breakdowns by owner and by year.

use super::entity::OWNER_COLUMNS;
use super::labels::{
    classification_code, clean_label, is_placeholder_owner, is_summary_row, parse_count, parse_year,
};
use crate::dataset::CsvTable;
use crate::models::{
    ClassificationSummary, CodeTotal, OwnerAggregate, OwnerClassifications, YearAggregate,
    YearClassifications,
};
use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

pub const YEAR_COLUMNS: &[&str] = &[
    "year",
    "filing_year",
    "priority_year",
    "application_year",
    "publication_year",
];
const ROW_TOTAL_COLUMNS: &[&str] = &["total", "grand_total"];

/// Limits applied when building the classification summary.
#[derive(Debug, Clone)]
pub struct ClassificationLimits {
    pub top_codes: usize,
    pub top_owners: usize,
    pub years: RangeInclusive<u16>,
}

/// A classification code and the table columns that carry it.
#[derive(Debug, Clone)]
struct CodeColumns {
    code: String,
    columns: Vec<usize>,
}

impl CodeColumns {
    fn sum(&self, row: &[String]) -> u64 {
        self.columns.iter().map(|&col| parse_count(&row[col])).sum()
    }
}

pub fn summarize_classifications(
    owner_table: &CsvTable,
    year_table: &CsvTable,
    limits: &ClassificationLimits,
) -> ClassificationSummary {
    ClassificationSummary {
        by_owner: aggregate_by_owner(owner_table, limits.top_codes, limits.top_owners),
        by_year: aggregate_by_year(year_table, limits.top_codes, &limits.years),
    }
}

/// Top owners with counts for the most frequent classification codes.
pub fn aggregate_by_owner(
    table: &CsvTable,
    top_codes: usize,
    top_owners: usize,
) -> OwnerClassifications {
    let Some(owner_col) = table.find_column(OWNER_COLUMNS) else {
        return OwnerClassifications::default();
    };
    let total_col = table.find_column(ROW_TOTAL_COLUMNS);

    let excluded: Vec<usize> = std::iter::once(owner_col).chain(total_col).collect();
    let columns = code_columns(table, &excluded);

    let rows: Vec<(&Vec<String>, String)> = table
        .rows()
        .iter()
        .filter_map(|row| {
            let owner = clean_label(&row[owner_col]);
            let skip = is_placeholder_owner(&owner) || is_summary_row(&owner);
            (!skip).then_some((row, owner))
        })
        .collect();

    let selected = select_top_codes(
        &columns,
        rows.iter().map(|(row, _)| row.as_slice()),
        top_codes,
    );

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut owners: Vec<OwnerAggregate> = Vec::new();

    for (row, owner) in rows {
        let row_total = match total_col {
            Some(col) => parse_count(&row[col]),
            None => columns.iter().map(|c| c.sum(row)).sum(),
        };

        let slot = *index.entry(owner.clone()).or_insert_with(|| {
            owners.push(OwnerAggregate {
                current_owner: owner,
                total: 0,
                classifications: selected.iter().map(|(c, _)| (c.code.clone(), 0)).collect(),
            });
            owners.len() - 1
        });

        let aggregate = &mut owners[slot];
        aggregate.total += row_total;
        for (code, columns) in &selected {
            if let Some(count) = aggregate.classifications.get_mut(&code.code) {
                *count += columns.sum(row);
            }
        }
    }

    owners.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.current_owner.cmp(&b.current_owner))
    });
    owners.truncate(top_owners);

    OwnerClassifications {
        codes: selected.into_iter().map(|(code, _)| code).collect(),
        owners,
    }
}

/// Per-year counts for the most frequent codes, restricted to `years`.
pub fn aggregate_by_year(
    table: &CsvTable,
    top_codes: usize,
    years: &RangeInclusive<u16>,
) -> YearClassifications {
    let Some(year_col) = table.find_column(YEAR_COLUMNS) else {
        return YearClassifications::default();
    };
    let total_col = table.find_column(ROW_TOTAL_COLUMNS);

    let excluded: Vec<usize> = std::iter::once(year_col).chain(total_col).collect();
    let columns = code_columns(table, &excluded);

    let rows: Vec<(&Vec<String>, u16)> = table
        .rows()
        .iter()
        .filter_map(|row| parse_year(&row[year_col], years).map(|year| (row, year)))
        .collect();

    let selected = select_top_codes(
        &columns,
        rows.iter().map(|(row, _)| row.as_slice()),
        top_codes,
    );

    let mut by_year: BTreeMap<u16, BTreeMap<String, u64>> = BTreeMap::new();
    for (row, year) in rows {
        let counts = by_year.entry(year).or_insert_with(|| {
            selected.iter().map(|(c, _)| (c.code.clone(), 0)).collect()
        });
        for (code, columns) in &selected {
            if let Some(count) = counts.get_mut(&code.code) {
                *count += columns.sum(row);
            }
        }
    }

    YearClassifications {
        codes: selected.into_iter().map(|(code, _)| code).collect(),
        years: by_year
            .into_iter()
            .map(|(year, classifications)| YearAggregate {
                year,
                classifications,
            })
            .collect(),
    }
}

/// Group the remaining headers by classification code, in header order.
fn code_columns(table: &CsvTable, excluded: &[usize]) -> Vec<CodeColumns> {
    let mut grouped: Vec<CodeColumns> = Vec::new();

    for (col, header) in table.headers().iter().enumerate() {
        if excluded.contains(&col) {
            continue;
        }
        let code = classification_code(header);
        if code.is_empty() {
            continue;
        }
        match grouped.iter_mut().find(|c| c.code == code) {
            Some(existing) => existing.columns.push(col),
            None => grouped.push(CodeColumns {
                code,
                columns: vec![col],
            }),
        }
    }

    grouped
}

/// Rank codes by column total and keep the first `limit` with a non-zero
/// total. Ties keep header order.
fn select_top_codes<'a>(
    columns: &[CodeColumns],
    rows: impl Iterator<Item = &'a [String]>,
    limit: usize,
) -> Vec<(CodeTotal, CodeColumns)> {
    let mut totals = vec![0u64; columns.len()];
    for row in rows {
        for (total, code) in totals.iter_mut().zip(columns) {
            *total += code.sum(row);
        }
    }

    let mut ranked: Vec<(CodeTotal, CodeColumns)> = columns
        .iter()
        .zip(totals)
        .filter(|(_, total)| *total > 0)
        .map(|(code, total)| {
            (
                CodeTotal {
                    code: code.code.clone(),
                    total,
                },
                code.clone(),
            )
        })
        .collect();

    ranked.sort_by(|a, b| b.0.total.cmp(&a.0.total));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::parse_bytes;

    fn table(csv: &str) -> CsvTable {
        parse_bytes(csv.as_bytes()).unwrap()
    }

    fn wide_owner_table(owners: usize, codes: usize) -> CsvTable {
        let mut csv = String::from("Current Owner");
        for c in 0..codes {
            csv.push_str(&format!(",C{:02}: Description {}", c, c));
        }
        csv.push('\n');
        for o in 0..owners {
            csv.push_str(&format!("Owner {:02}", o));
            for c in 0..codes {
                csv.push_str(&format!(",{}", (o + 1) * (c + 1)));
            }
            csv.push('\n');
        }
        table(&csv)
    }

    #[test]
    fn test_at_most_five_codes_and_fifteen_owners() {
        let result = aggregate_by_owner(&wide_owner_table(30, 12), 5, 15);

        assert_eq!(result.codes.len(), 5);
        assert_eq!(result.owners.len(), 15);
        for owner in &result.owners {
            assert_eq!(owner.classifications.len(), 5);
        }

        let totals: Vec<u64> = result.owners.iter().map(|o| o.total).collect();
        let mut sorted = totals.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(totals, sorted);

        let code_totals: Vec<u64> = result.codes.iter().map(|c| c.total).collect();
        assert!(code_totals.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_highest_column_totals_win() {
        let csv = "Current Owner,A01B: Soil,H01M: Batteries,F03D: Wind\nAcme,1,9,4\nGlobex,0,1,8\n";
        let result = aggregate_by_owner(&table(csv), 2, 15);

        let codes: Vec<_> = result.codes.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["F03D", "H01M"]);
        assert_eq!(result.codes[0].total, 12);

        let acme = &result.owners[0];
        assert_eq!(acme.current_owner, "Acme");
        assert_eq!(acme.total, 14);
        assert_eq!(acme.classifications.get("H01M"), Some(&9));
        assert_eq!(acme.classifications.get("A01B"), None);
    }

    #[test]
    fn test_total_column_is_used_when_present() {
        let csv = "Current Owner,Total,H01M: Batteries\nAcme,100,3\n";
        let result = aggregate_by_owner(&table(csv), 5, 15);
        assert_eq!(result.owners[0].total, 100);
        assert_eq!(result.codes.len(), 1);
    }

    #[test]
    fn test_duplicate_owners_and_codes_merge() {
        let csv = "Owner,H01M: Batteries,H01M: Batteries (cont.)\n\
                   \"Acme\",2,1\nAcme ,3,0\nNone,50,50\n";
        let result = aggregate_by_owner(&table(csv), 5, 15);

        assert_eq!(result.codes.len(), 1);
        assert_eq!(result.owners.len(), 1);
        assert_eq!(result.owners[0].total, 6);
        assert_eq!(result.owners[0].classifications.get("H01M"), Some(&6));
    }

    #[test]
    fn test_by_year_filters_range_and_sorts() {
        let csv = "Year,H01M: Batteries,F03D: Wind\n\
                   2012,3,1\n1985,50,50\n2010,2,2\nTotal,99,99\n2012,1,0\n";
        let result = aggregate_by_year(&table(csv), 5, &(2000..=2030));

        let years: Vec<u16> = result.years.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![2010, 2012]);
        assert_eq!(result.years[1].classifications.get("H01M"), Some(&4));
        assert_eq!(result.codes[0].code, "H01M");
        assert_eq!(result.codes[0].total, 6);
    }

    #[test]
    fn test_missing_key_column_yields_empty() {
        assert!(aggregate_by_owner(&table("Year,H01M\n2010,1\n"), 5, 15)
            .owners
            .is_empty());
        assert!(aggregate_by_year(&table("Owner,H01M\nAcme,1\n"), 5, &(2000..=2030))
            .years
            .is_empty());
    }

    #[test]
    fn test_output_is_deterministic() {
        let owners = wide_owner_table(20, 8);
        let limits = ClassificationLimits {
            top_codes: 5,
            top_owners: 15,
            years: 2000..=2030,
        };
        let years = CsvTable::default();
        let first =
            serde_json::to_string(&summarize_classifications(&owners, &years, &limits)).unwrap();
        let second =
            serde_json::to_string(&summarize_classifications(&owners, &years, &limits)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_grand_total_row_is_not_an_owner() {
        let csv = "Current Owner,H01M: Batteries,F03D: Wind\n\
                   Acme,3,1\nGlobex,1,1\nGrand Total,4,2\n";
        let result = aggregate_by_owner(&table(csv), 5, 15);

        let names: Vec<&str> = result.owners.iter().map(|o| o.current_owner.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Globex"]);
        assert_eq!(result.codes[0].total, 4);
    }
}
