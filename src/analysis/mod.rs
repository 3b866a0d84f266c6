//! Aggregators turning CSV tables into dashboard summaries.
//!
//! Each submodule is a pure transformation over a [`crate::dataset::CsvTable`];
//! none of them touch the filesystem.

pub mod classification;
pub mod countries;
pub mod entity;
pub mod geographic;
pub mod labels;
pub mod timeline;

pub use classification::{summarize_classifications, ClassificationLimits};
pub use entity::summarize_entities;
pub use geographic::aggregate_countries;
pub use timeline::summarize_timeline;
