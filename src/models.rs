//! Data models for the dashboard summaries.
//!
//! Every type here is built fresh per request from CSV rows and serialized
//! straight into the JSON response, so field names follow the camelCase
//! contract the charting front end expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Envelope for every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

// ---------------------------------------------------------------------------
// Geographic
// ---------------------------------------------------------------------------

/// Filing count for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub country_code: String,
    pub country_name: String,
    /// `None` when the code is not in the lookup table.
    pub iso3: Option<String>,
    pub total: u64,
}

/// Filing count for a regional or international office (EP, WO, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialRegion {
    pub code: String,
    pub name: String,
    pub total: u64,
}

/// Countries and offices derived from one geography CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryBreakdown {
    /// Sorted by total, descending.
    pub countries: Vec<CountryRecord>,
    pub special_regions: Vec<SpecialRegion>,
    /// Always contains every Nordic country, zero-padded.
    pub nordic: Vec<CountryRecord>,
    pub country_filings: u64,
    pub regional_filings: u64,
    pub country_count: usize,
}

impl CountryBreakdown {
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.special_regions.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographicSummary {
    /// Family member distribution.
    pub family: CountryBreakdown,
    /// Priority (first) filing distribution.
    pub priority: CountryBreakdown,
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A named entity (owner or inventor) with its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    pub owners: Vec<EntityCount>,
    /// Deduplicated by name.
    pub inventors: Vec<EntityCount>,
    pub owner_count: usize,
    pub inventor_count: usize,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Column total for a classification code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeTotal {
    pub code: String,
    pub total: u64,
}

/// One owner with counts for the selected classification codes.
///
/// Codes are flattened into the object (`{"currentOwner": .., "total": ..,
/// "H01M": 4}`); `BTreeMap` keeps their order stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerAggregate {
    pub current_owner: String,
    pub total: u64,
    #[serde(flatten)]
    pub classifications: BTreeMap<String, u64>,
}

/// One year with counts for the selected classification codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearAggregate {
    pub year: u16,
    #[serde(flatten)]
    pub classifications: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerClassifications {
    /// Selected codes, highest total first.
    pub codes: Vec<CodeTotal>,
    pub owners: Vec<OwnerAggregate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearClassifications {
    pub codes: Vec<CodeTotal>,
    /// Ascending by year.
    pub years: Vec<YearAggregate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationSummary {
    pub by_owner: OwnerClassifications,
    pub by_year: YearClassifications,
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Long-format fact flattened from the owner × year pivot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub owner: String,
    pub year: u16,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTotal {
    pub year: u16,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerTotal {
    pub owner: String,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: u16,
    pub end: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStats {
    pub total_filings: u64,
    pub owner_count: usize,
    pub year_range: Option<YearRange>,
    pub peak_year: Option<YearTotal>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSummary {
    pub points: Vec<TimelinePoint>,
    pub year_totals: Vec<YearTotal>,
    pub top_owners: Vec<OwnerTotal>,
    /// Points restricted to `top_owners`, for the stacked series chart.
    pub top_owner_points: Vec<TimelinePoint>,
    pub stats: TimelineStats,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    /// Directories searched, in order.
    pub data_dirs: Vec<String>,
    /// Domains requested.
    pub domains: Vec<String>,
}

/// All requested domain summaries in one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geographic: Option<GeographicSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntitySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineSummary>,
    /// Requested domains that had no data, with the reason.
    pub unavailable: Vec<UnavailableDomain>,
}

impl DashboardReport {
    /// True when no requested domain produced a summary.
    pub fn is_empty(&self) -> bool {
        self.geographic.is_none()
            && self.entity.is_none()
            && self.classification.is_none()
            && self.timeline.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableDomain {
    pub domain: String,
    pub reason: String,
}
