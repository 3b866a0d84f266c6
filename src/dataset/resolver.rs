//! Locates dataset files across the configured data directories.

use crate::error::DataError;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Searches an ordered list of directories for a dataset file.
#[derive(Debug, Clone)]
pub struct FileResolver {
    search_dirs: Vec<PathBuf>,
}

impl FileResolver {
    /// Create a resolver. Directories are searched in the given order.
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Return the first existing file for `canonical` or one of `alternates`.
    ///
    /// Exact names are tried first in each directory, in order. If none
    /// exists, the directory listing is matched ignoring case and the
    /// `-`/`_`/space distinction.
    pub fn resolve(
        &self,
        dataset: &'static str,
        canonical: &str,
        alternates: &[&str],
    ) -> Result<PathBuf, DataError> {
        let candidates: Vec<&str> = std::iter::once(canonical)
            .chain(alternates.iter().copied())
            .collect();

        for dir in &self.search_dirs {
            for name in &candidates {
                let path = dir.join(name);
                if path.is_file() {
                    debug!("Resolved {} to {}", dataset, path.display());
                    return Ok(path);
                }
            }

            if let Some(path) = find_loose_match(dir, &candidates) {
                debug!("Resolved {} to {} (loose match)", dataset, path.display());
                return Ok(path);
            }
        }

        Err(DataError::FileNotFound {
            dataset,
            searched: self.search_dirs.clone(),
        })
    }
}

/// Match directory entries against candidates after normalizing names.
fn find_loose_match(dir: &Path, candidates: &[&str]) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }

    let wanted: Vec<String> = candidates.iter().map(|c| normalize_file_name(c)).collect();

    let mut matches: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = normalize_file_name(&entry.file_name().to_string_lossy());
            wanted.contains(&name)
        })
        .map(|entry| entry.into_path())
        .collect();

    // read_dir order is platform dependent
    matches.sort();
    matches.into_iter().next()
}

/// Lowercase and fold `-` and spaces into `_`.
pub fn normalize_file_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "a,b\n1,2\n").unwrap();
    }

    #[test]
    fn test_prefers_canonical_name() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "top_owners.csv");
        touch(dir.path(), "owners.csv");

        let resolver = FileResolver::new(vec![dir.path().to_path_buf()]);
        let path = resolver
            .resolve("top owners", "top_owners.csv", &["owners.csv"])
            .unwrap();
        assert_eq!(path, dir.path().join("top_owners.csv"));
    }

    #[test]
    fn test_falls_back_to_alternate() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "owners.csv");

        let resolver = FileResolver::new(vec![dir.path().to_path_buf()]);
        let path = resolver
            .resolve("top owners", "top_owners.csv", &["Top_Owners.csv", "owners.csv"])
            .unwrap();
        assert_eq!(path, dir.path().join("owners.csv"));
    }

    #[test]
    fn test_loose_match_ignores_case_and_separators() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "TOP-OWNERS.CSV");

        let resolver = FileResolver::new(vec![dir.path().to_path_buf()]);
        let path = resolver
            .resolve("top owners", "top_owners.csv", &[])
            .unwrap();
        assert_eq!(path, dir.path().join("TOP-OWNERS.CSV"));
    }

    #[test]
    fn test_directory_order_wins_over_alternate_order() {
        let processed = TempDir::new().unwrap();
        let raw = TempDir::new().unwrap();
        touch(processed.path(), "owners.csv");
        touch(raw.path(), "top_owners.csv");

        let resolver = FileResolver::new(vec![
            processed.path().to_path_buf(),
            raw.path().to_path_buf(),
        ]);
        let path = resolver
            .resolve("top owners", "top_owners.csv", &["owners.csv"])
            .unwrap();
        assert_eq!(path, processed.path().join("owners.csv"));
    }

    #[test]
    fn test_missing_file_reports_searched_dirs() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let resolver = FileResolver::new(vec![dir.path().to_path_buf(), missing.clone()]);
        match resolver.resolve("inventors", "inventors.csv", &[]) {
            Err(DataError::FileNotFound { dataset, searched }) => {
                assert_eq!(dataset, "inventors");
                assert_eq!(searched, vec![dir.path().to_path_buf(), missing]);
            }
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_directories_are_not_matched() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("inventors.csv")).unwrap();

        let resolver = FileResolver::new(vec![dir.path().to_path_buf()]);
        assert!(resolver.resolve("inventors", "inventors.csv", &[]).is_err());
    }

    #[test]
    fn test_normalize_file_name() {
        assert_eq!(normalize_file_name("Top-Owners.CSV"), "top_owners.csv");
        assert_eq!(normalize_file_name(" owner timeline.csv "), "owner_timeline.csv");
    }
}
