//! Error types for dataset loading and domain assembly.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating or reading a single CSV dataset.
///
/// Neither variant is fatal on its own: the service logs it and treats the
/// section as empty.
#[derive(Debug, Error)]
pub enum DataError {
    /// No candidate file name exists in any searched directory.
    #[error("{dataset} not found (searched: {})", display_dirs(.searched))]
    FileNotFound {
        dataset: &'static str,
        searched: Vec<PathBuf>,
    },

    /// The file exists but could not be read or parsed as CSV.
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

impl DataError {
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        DataError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that fail a whole domain response.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Every input for the domain was missing or empty.
    #[error("No {domain} data available")]
    NoData { domain: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_lists_directories() {
        let err = DataError::FileNotFound {
            dataset: "top owners",
            searched: vec![PathBuf::from("data/processed"), PathBuf::from("data/raw")],
        };
        assert_eq!(
            err.to_string(),
            "top owners not found (searched: data/processed, data/raw)"
        );
    }

    #[test]
    fn test_no_data_message() {
        let err = DashboardError::NoData { domain: "timeline" };
        assert_eq!(err.to_string(), "No timeline data available");
    }
}
