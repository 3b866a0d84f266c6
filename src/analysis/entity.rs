//! Owner and inventor rankings.

use super::labels::{clean_label, is_placeholder_owner, is_summary_row, parse_count};
use crate::dataset::CsvTable;
use crate::models::{EntityCount, EntitySummary};
use std::collections::HashMap;

pub const OWNER_COLUMNS: &[&str] = &["current_owner", "owner", "assignee", "applicant", "name"];
pub const INVENTOR_COLUMNS: &[&str] = &["inventor", "inventors", "inventor_name", "name"];
pub const COUNT_COLUMNS: &[&str] = &[
    "total",
    "count",
    "patents",
    "families",
    "occurrences",
    "frequency",
];

/// Build the entity summary from the owner and inventor tables.
pub fn summarize_entities(owners: &CsvTable, inventors: &CsvTable) -> EntitySummary {
    let owners = rank_owners(owners);
    let inventors = rank_inventors(inventors);

    EntitySummary {
        owner_count: owners.len(),
        inventor_count: inventors.len(),
        owners,
        inventors,
    }
}

/// One entry per owner row, sorted by count.
pub fn rank_owners(table: &CsvTable) -> Vec<EntityCount> {
    let (Some(name_col), Some(count_col)) = (
        table.find_column(OWNER_COLUMNS),
        table.find_column(COUNT_COLUMNS),
    ) else {
        return Vec::new();
    };

    let mut owners: Vec<EntityCount> = table
        .rows()
        .iter()
        .filter_map(|row| {
            let name = clean_label(&row[name_col]);
            if is_placeholder_owner(&name) || is_summary_row(&name) {
                return None;
            }
            Some(EntityCount {
                name,
                count: parse_count(&row[count_col]),
            })
        })
        .collect();

    sort_by_count(&mut owners);
    owners
}

/// Group inventor rows by name and sum their counts.
///
/// Without a count column each row counts as one occurrence.
pub fn rank_inventors(table: &CsvTable) -> Vec<EntityCount> {
    let Some(name_col) = table.find_column(INVENTOR_COLUMNS) else {
        return Vec::new();
    };
    let count_col = table.find_column(COUNT_COLUMNS);

    let mut grouped: HashMap<String, u64> = HashMap::new();
    for row in table.rows() {
        let name = clean_label(&row[name_col]);
        if name.is_empty() || is_summary_row(&name) {
            continue;
        }
        let count = count_col.map_or(1, |col| parse_count(&row[col]));
        *grouped.entry(name).or_default() += count;
    }

    let mut inventors: Vec<EntityCount> = grouped
        .into_iter()
        .map(|(name, count)| EntityCount { name, count })
        .collect();

    sort_by_count(&mut inventors);
    inventors
}

/// Count descending, then name ascending.
fn sort_by_count(entities: &mut [EntityCount]) {
    entities.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::parse_bytes;

    fn table(csv: &str) -> CsvTable {
        parse_bytes(csv.as_bytes()).unwrap()
    }

    fn pairs(entities: &[EntityCount]) -> Vec<(&str, u64)> {
        entities.iter().map(|e| (e.name.as_str(), e.count)).collect()
    }

    #[test]
    fn test_owners_sorted_with_mixed_case_headers() {
        let owners = rank_owners(&table("CURRENT OWNER,COUNT\nGlobex,7\n\"Acme\",10\nInitech,7\n"));
        assert_eq!(pairs(&owners), vec![("Acme", 10), ("Globex", 7), ("Initech", 7)]);
    }

    #[test]
    fn test_owner_placeholders_are_skipped() {
        let owners = rank_owners(&table("Current Owner,Total\n,3\nNone,4\nAcme,1\n"));
        assert_eq!(pairs(&owners), vec![("Acme", 1)]);
    }

    #[test]
    fn test_inventors_are_deduplicated() {
        let csv = "Inventor,Count\nAda Lovelace,2\n Ada Lovelace ,3\nAlan Turing,4\n";
        let inventors = rank_inventors(&table(csv));
        assert_eq!(pairs(&inventors), vec![("Ada Lovelace", 5), ("Alan Turing", 4)]);
    }

    #[test]
    fn test_inventors_without_count_column_count_rows() {
        let csv = "inventor\nGrace Hopper\nGrace Hopper\nEdsger Dijkstra\n";
        let inventors = rank_inventors(&table(csv));
        assert_eq!(
            pairs(&inventors),
            vec![("Grace Hopper", 2), ("Edsger Dijkstra", 1)]
        );
    }

    #[test]
    fn test_summary_counts() {
        let summary = summarize_entities(
            &table("Owner,Total\nAcme,3\nGlobex,2\n"),
            &table("Inventor\nAda\nAda\n"),
        );
        assert_eq!(summary.owner_count, 2);
        assert_eq!(summary.inventor_count, 1);
    }

    #[test]
    fn test_empty_tables() {
        let summary = summarize_entities(&CsvTable::default(), &CsvTable::default());
        assert!(summary.owners.is_empty());
        assert!(summary.inventors.is_empty());
    }

    #[test]
    fn test_total_rows_are_skipped() {
        let owners = rank_owners(&table("Current Owner,Count\nAcme,4\nGlobex,2\nGrand Total,6\n"));
        assert_eq!(pairs(&owners), vec![("Acme", 4), ("Globex", 2)]);

        let inventors = rank_inventors(&table("Inventor,Count\nAda,2\nTotal,2\n"));
        assert_eq!(pairs(&inventors), vec![("Ada", 2)]);
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut inventors = String::from("Inventor\n");
        for i in 0..40 {
            inventors.push_str(&format!("Inventor {}\n", i % 13));
        }
        let owners = table("Owner,Total\nGlobex,2\nAcme,2\nInitech,5\n");
        let inventors = table(&inventors);

        let first = serde_json::to_string(&summarize_entities(&owners, &inventors)).unwrap();
        let second = serde_json::to_string(&summarize_entities(&owners, &inventors)).unwrap();
        assert_eq!(first, second);
    }
}
