//! Domain assembly: load the datasets a domain needs and aggregate them.
//!
//! Missing or unparseable files degrade to empty tables. A domain only fails
//! when every one of its inputs came back empty.

use crate::analysis;
use crate::config::{AnalysisConfig, DataConfig};
use crate::dataset::{load_table, CsvTable, Dataset, FileResolver};
use crate::error::{DashboardError, DataError};
use crate::models::{ClassificationSummary, EntitySummary, GeographicSummary, TimelineSummary};
use std::fmt;
use std::path::PathBuf;
use tracing::{error, warn};

/// The four analysis domains served by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Geographic,
    Entity,
    Classification,
    Timeline,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Geographic,
        Domain::Entity,
        Domain::Classification,
        Domain::Timeline,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Geographic => "geographic",
            Domain::Entity => "entity",
            Domain::Classification => "classification",
            Domain::Timeline => "timeline",
        }
    }

    /// Datasets feeding this domain.
    pub fn datasets(&self) -> &'static [Dataset] {
        match self {
            Domain::Geographic => &[Dataset::FamilyCountries, Dataset::PriorityCountries],
            Domain::Entity => &[Dataset::TopOwners, Dataset::Inventors],
            Domain::Classification => {
                &[Dataset::OwnerClassifications, Dataset::YearClassifications]
            }
            Domain::Timeline => &[Dataset::OwnerTimeline],
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Resolves and loads datasets from the configured directories.
#[derive(Debug, Clone)]
pub struct DataSources {
    resolver: FileResolver,
}

impl DataSources {
    pub fn new(config: &DataConfig) -> Self {
        Self {
            resolver: FileResolver::new(config.search_dirs()),
        }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        self.resolver.search_dirs()
    }

    /// Path a dataset resolves to.
    pub fn locate(&self, dataset: Dataset) -> Result<PathBuf, DataError> {
        self.resolver.resolve(
            dataset.label(),
            dataset.canonical_name(),
            dataset.alternates(),
        )
    }

    /// Resolve and parse a dataset without the degrade policy.
    pub fn try_load(&self, dataset: Dataset) -> Result<CsvTable, DataError> {
        let path = self.locate(dataset)?;
        load_table(&path)
    }

    /// Load a dataset, degrading to an empty table on any error.
    pub fn load(&self, dataset: Dataset) -> CsvTable {
        match self.try_load(dataset) {
            Ok(table) => table,
            Err(e @ DataError::FileNotFound { .. }) => {
                warn!("{}", e);
                CsvTable::default()
            }
            Err(e @ DataError::Parse { .. }) => {
                error!("{}", e);
                CsvTable::default()
            }
        }
    }
}

fn ensure_any(domain: Domain, tables: &[&CsvTable]) -> Result<(), DashboardError> {
    if tables.iter().all(|t| t.is_empty()) {
        return Err(DashboardError::NoData {
            domain: domain.name(),
        });
    }
    Ok(())
}

/// Inputs were present but none of them aggregated into anything.
fn ensure_produced(domain: Domain, empty: bool) -> Result<(), DashboardError> {
    if empty {
        warn!("{} inputs yielded no usable rows", domain);
        return Err(DashboardError::NoData {
            domain: domain.name(),
        });
    }
    Ok(())
}

pub fn geographic(sources: &DataSources) -> Result<GeographicSummary, DashboardError> {
    let family = sources.load(Dataset::FamilyCountries);
    let priority = sources.load(Dataset::PriorityCountries);
    ensure_any(Domain::Geographic, &[&family, &priority])?;

    let summary = GeographicSummary {
        family: analysis::aggregate_countries(&family),
        priority: analysis::aggregate_countries(&priority),
    };
    ensure_produced(
        Domain::Geographic,
        summary.family.is_empty() && summary.priority.is_empty(),
    )?;

    Ok(summary)
}

pub fn entity(sources: &DataSources) -> Result<EntitySummary, DashboardError> {
    let owners = sources.load(Dataset::TopOwners);
    let inventors = sources.load(Dataset::Inventors);
    ensure_any(Domain::Entity, &[&owners, &inventors])?;

    let summary = analysis::summarize_entities(&owners, &inventors);
    ensure_produced(
        Domain::Entity,
        summary.owners.is_empty() && summary.inventors.is_empty(),
    )?;

    Ok(summary)
}

pub fn classification(
    sources: &DataSources,
    config: &AnalysisConfig,
) -> Result<ClassificationSummary, DashboardError> {
    let by_owner = sources.load(Dataset::OwnerClassifications);
    let by_year = sources.load(Dataset::YearClassifications);
    ensure_any(Domain::Classification, &[&by_owner, &by_year])?;

    let summary = analysis::summarize_classifications(
        &by_owner,
        &by_year,
        &config.classification_limits(),
    );
    ensure_produced(
        Domain::Classification,
        summary.by_owner.owners.is_empty() && summary.by_year.years.is_empty(),
    )?;

    Ok(summary)
}

pub fn timeline(
    sources: &DataSources,
    config: &AnalysisConfig,
) -> Result<TimelineSummary, DashboardError> {
    let table = sources.load(Dataset::OwnerTimeline);
    ensure_any(Domain::Timeline, &[&table])?;

    let summary = analysis::summarize_timeline(
        &table,
        &config.year_range(),
        config.top_timeline_owners,
    );
    ensure_produced(Domain::Timeline, summary.points.is_empty())?;

    Ok(summary)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// A processed/raw directory pair under a temp root.
    pub struct DataDirs {
        pub root: TempDir,
    }

    impl DataDirs {
        pub fn new() -> Self {
            let root = TempDir::new().unwrap();
            fs::create_dir_all(root.path().join("processed")).unwrap();
            fs::create_dir_all(root.path().join("raw")).unwrap();
            Self { root }
        }

        pub fn processed(&self) -> std::path::PathBuf {
            self.root.path().join("processed")
        }

        pub fn raw(&self) -> std::path::PathBuf {
            self.root.path().join("raw")
        }

        pub fn write(&self, dir: &Path, name: &str, content: &[u8]) {
            fs::write(dir.join(name), content).unwrap();
        }

        pub fn config(&self) -> DataConfig {
            DataConfig {
                raw_dir: self.raw(),
                processed_dir: self.processed(),
            }
        }

        pub fn sources(&self) -> DataSources {
            DataSources::new(&self.config())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::DataDirs;
    use super::*;

    #[test]
    fn test_every_domain_fails_without_data() {
        let dirs = DataDirs::new();
        let sources = dirs.sources();
        let config = AnalysisConfig::default();

        assert!(matches!(
            geographic(&sources),
            Err(DashboardError::NoData { domain: "geographic" })
        ));
        assert!(entity(&sources).is_err());
        assert!(classification(&sources, &config).is_err());
        assert!(timeline(&sources, &config).is_err());
    }

    #[test]
    fn test_partial_inputs_degrade_to_empty_sections() {
        let dirs = DataDirs::new();
        dirs.write(&dirs.raw(), "Top_Owners.csv", b"Current Owner,Total\nAcme,4\n");

        let summary = entity(&dirs.sources()).unwrap();
        assert_eq!(summary.owners.len(), 1);
        assert!(summary.inventors.is_empty());
    }

    #[test]
    fn test_parse_error_degrades_to_empty() {
        let dirs = DataDirs::new();
        dirs.write(&dirs.processed(), "inventors.csv", b"Inventor\n\xFF\xFF\n");
        dirs.write(&dirs.processed(), "top_owners.csv", b"Owner,Count\nAcme,2\n");

        let sources = dirs.sources();
        assert!(matches!(
            sources.try_load(Dataset::Inventors),
            Err(DataError::Parse { .. })
        ));

        let summary = entity(&sources).unwrap();
        assert!(summary.inventors.is_empty());
        assert_eq!(summary.owners[0].name, "Acme");
    }

    #[test]
    fn test_header_only_file_counts_as_empty() {
        let dirs = DataDirs::new();
        dirs.write(&dirs.processed(), "owner_timeline.csv", b"Current Owner,2020,2021\n");

        let result = timeline(&dirs.sources(), &AnalysisConfig::default());
        assert!(matches!(result, Err(DashboardError::NoData { domain: "timeline" })));
    }

    #[test]
    fn test_geography_without_usable_columns_is_no_data() {
        let dirs = DataDirs::new();
        dirs.write(&dirs.processed(), "family_countries.csv", b"Owner,Total\nAcme,3\n");

        assert!(matches!(
            geographic(&dirs.sources()),
            Err(DashboardError::NoData { domain: "geographic" })
        ));
    }

    #[test]
    fn test_entity_with_only_placeholders_is_no_data() {
        let dirs = DataDirs::new();
        dirs.write(&dirs.processed(), "top_owners.csv", b"Current Owner,Count\nUnknown,3\n");
        dirs.write(&dirs.processed(), "inventors.csv", b"Country\nNO\n");

        assert!(matches!(
            entity(&dirs.sources()),
            Err(DashboardError::NoData { domain: "entity" })
        ));
    }

    #[test]
    fn test_classification_without_owner_or_year_rows_is_no_data() {
        let dirs = DataDirs::new();
        dirs.write(
            &dirs.processed(),
            "owner_classifications.csv",
            b"Current Owner,H01M: Batteries\nnone,4\n",
        );
        dirs.write(
            &dirs.processed(),
            "classifications_by_year.csv",
            b"Year,H01M: Batteries\n1890,4\n",
        );

        let result = classification(&dirs.sources(), &AnalysisConfig::default());
        assert!(matches!(
            result,
            Err(DashboardError::NoData { domain: "classification" })
        ));
    }

    #[test]
    fn test_timeline_with_out_of_range_years_is_no_data() {
        let dirs = DataDirs::new();
        dirs.write(
            &dirs.processed(),
            "owner_timeline.csv",
            b"Current Owner,1990,1991\nAcme,3,4\n",
        );

        let result = timeline(&dirs.sources(), &AnalysisConfig::default());
        assert!(matches!(result, Err(DashboardError::NoData { domain: "timeline" })));
    }

    #[test]
    fn test_processed_directory_takes_precedence() {
        let dirs = DataDirs::new();
        dirs.write(&dirs.raw(), "family_countries.csv", b"Country,Total\nUS,1\n");
        dirs.write(&dirs.processed(), "family_countries.csv", b"Country,Total\nUS,9\n");

        let summary = geographic(&dirs.sources()).unwrap();
        assert_eq!(summary.family.countries[0].total, 9);
        assert!(summary.priority.is_empty());
    }

    #[test]
    fn test_geographic_json_is_byte_identical_across_runs() {
        let dirs = DataDirs::new();
        dirs.write(
            &dirs.processed(),
            "family_countries.csv",
            b"All Family Country,Total\nNO,12\nEP,5\nUS,30\nSE,4\n",
        );
        let sources = dirs.sources();

        let first = serde_json::to_vec(&geographic(&sources).unwrap()).unwrap();
        let second = serde_json::to_vec(&geographic(&sources).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_classification_and_timeline_from_fixtures() {
        let fixtures = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/data");
        let sources = DataSources::new(&DataConfig {
            raw_dir: fixtures.join("raw"),
            processed_dir: fixtures.join("processed"),
        });
        let config = AnalysisConfig::default();

        let classification = classification(&sources, &config).unwrap();
        assert!(classification.by_owner.codes.len() <= 5);
        assert!(classification.by_owner.owners.len() <= 15);
        assert!(!classification.by_year.years.is_empty());

        let timeline = timeline(&sources, &config).unwrap();
        assert!(timeline.top_owners.len() <= 8);
        assert!(timeline.stats.total_filings > 0);

        let geographic = geographic(&sources).unwrap();
        assert!(geographic.family.nordic.iter().any(|c| c.country_code == "NO"));

        let entity = entity(&sources).unwrap();
        assert!(!entity.owners.is_empty());
        assert!(!entity.inventors.is_empty());
    }

    #[test]
    fn test_domain_datasets_cover_catalog() {
        let mut covered: Vec<Dataset> = Domain::ALL
            .iter()
            .flat_map(|d| d.datasets().iter().copied())
            .collect();
        covered.dedup();
        assert_eq!(covered.len(), Dataset::ALL.len());
    }
}
