//! CSV dataset discovery and loading.
//!
//! Every input the dashboard understands is listed in [`Dataset`] together
//! with the file names it may appear under.

pub mod loader;
pub mod resolver;

pub use loader::{load_table, CsvTable};
pub use resolver::FileResolver;

/// One logical CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Family member counts per country (`All Family Country`, `Total`).
    FamilyCountries,
    /// Priority filing counts per country.
    PriorityCountries,
    /// Patent family counts per current owner.
    TopOwners,
    /// Inventor occurrences (possibly repeated per name).
    Inventors,
    /// Owner × classification-code pivot.
    OwnerClassifications,
    /// Year × classification-code pivot.
    YearClassifications,
    /// Owner × filing-year pivot.
    OwnerTimeline,
}

impl Dataset {
    pub const ALL: [Dataset; 7] = [
        Dataset::FamilyCountries,
        Dataset::PriorityCountries,
        Dataset::TopOwners,
        Dataset::Inventors,
        Dataset::OwnerClassifications,
        Dataset::YearClassifications,
        Dataset::OwnerTimeline,
    ];

    /// Human readable name used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Dataset::FamilyCountries => "family countries",
            Dataset::PriorityCountries => "priority countries",
            Dataset::TopOwners => "top owners",
            Dataset::Inventors => "inventors",
            Dataset::OwnerClassifications => "owner classifications",
            Dataset::YearClassifications => "classifications by year",
            Dataset::OwnerTimeline => "owner timeline",
        }
    }

    pub fn canonical_name(&self) -> &'static str {
        match self {
            Dataset::FamilyCountries => "family_countries.csv",
            Dataset::PriorityCountries => "priority_countries.csv",
            Dataset::TopOwners => "top_owners.csv",
            Dataset::Inventors => "inventors.csv",
            Dataset::OwnerClassifications => "owner_classifications.csv",
            Dataset::YearClassifications => "classifications_by_year.csv",
            Dataset::OwnerTimeline => "owner_timeline.csv",
        }
    }

    /// Tolerated alternate spellings, tried in order after the canonical name.
    pub fn alternates(&self) -> &'static [&'static str] {
        match self {
            Dataset::FamilyCountries => &[
                "Family_Countries.csv",
                "family-countries.csv",
                "FamilyCountries.csv",
                "country_distribution.csv",
                "countries.csv",
            ],
            Dataset::PriorityCountries => &[
                "Priority_Countries.csv",
                "priority-countries.csv",
                "priority_country.csv",
            ],
            Dataset::TopOwners => &[
                "Top_Owners.csv",
                "top-owners.csv",
                "current_owners.csv",
                "owners.csv",
            ],
            Dataset::Inventors => &["Inventors.csv", "top_inventors.csv", "top-inventors.csv"],
            Dataset::OwnerClassifications => &[
                "Owner_Classifications.csv",
                "owner-classifications.csv",
                "owners_by_ipc.csv",
                "owners_by_cpc.csv",
            ],
            Dataset::YearClassifications => &[
                "Classifications_By_Year.csv",
                "classifications-by-year.csv",
                "ipc_by_year.csv",
                "cpc_by_year.csv",
            ],
            Dataset::OwnerTimeline => &[
                "Owner_Timeline.csv",
                "owner-timeline.csv",
                "owners_by_year.csv",
                "filing_timeline.csv",
            ],
        }
    }
}
