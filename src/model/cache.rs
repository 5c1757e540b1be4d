//! DataCache: tracks file modification times for incremental reloading.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The files that make up a farm data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFile {
    Catalog,
    Membership,
    Profiles,
    Dashboard,
}

impl DataFile {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.file_name().and_then(|f| f.to_str())? {
            "catalog.yaml" | "catalog.yml" | "catalog.json" => Some(Self::Catalog),
            "membership.yaml" | "membership.yml" => Some(Self::Membership),
            "profiles.md" => Some(Self::Profiles),
            "dashboard.json" => Some(Self::Dashboard),
            _ => None,
        }
    }
}

/// Determines what needs to be reloaded when files change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadScope {
    /// The catalog changed: everything is re-read and re-validated.
    Full,
    /// Only these side tables changed.
    Tables(Vec<DataFile>),
}

/// Caches file modification times to enable incremental reloading.
#[derive(Debug, Default)]
pub struct DataCache {
    mtimes: HashMap<PathBuf, SystemTime>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a set of changed file paths into a ReloadScope.
    pub fn classify_changes(&self, paths: &[PathBuf]) -> ReloadScope {
        let mut tables = Vec::new();

        for file in paths.iter().filter_map(|p| DataFile::from_path(p)) {
            if file == DataFile::Catalog {
                return ReloadScope::Full;
            }
            if !tables.contains(&file) {
                tables.push(file);
            }
        }

        ReloadScope::Tables(tables)
    }

    /// Drop paths whose mtime matches what was cached (duplicate watcher
    /// notifications for a single save).
    pub fn retain_changed(&self, paths: Vec<PathBuf>) -> Vec<PathBuf> {
        paths.into_iter().filter(|p| self.has_changed(p)).collect()
    }

    /// Update cached mtime for a path.
    pub fn update_mtime(&mut self, path: &Path) {
        if let Ok(metadata) = std::fs::metadata(path) {
            if let Ok(mtime) = metadata.modified() {
                self.mtimes.insert(path.to_path_buf(), mtime);
            }
        }
    }

    /// Check if a path has changed since last cached mtime. A deleted file
    /// counts as changed once it was known.
    pub fn has_changed(&self, path: &Path) -> bool {
        let current = std::fs::metadata(path)
            .ok()
            .and_then(|m| m.modified().ok());

        match (self.mtimes.get(path), current) {
            (Some(cached), Some(current)) => current > *cached,
            (None, Some(_)) => true,
            (Some(_), None) => true,
            (None, None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_catalog_change() {
        let cache = DataCache::new();
        let paths = vec![PathBuf::from("/farm/catalog.yaml")];
        assert_eq!(cache.classify_changes(&paths), ReloadScope::Full);
    }

    #[test]
    fn test_classify_profile_change() {
        let cache = DataCache::new();
        let paths = vec![PathBuf::from("/farm/profiles.md")];
        assert_eq!(
            cache.classify_changes(&paths),
            ReloadScope::Tables(vec![DataFile::Profiles])
        );
    }

    #[test]
    fn test_classify_mixed_changes() {
        let cache = DataCache::new();
        let paths = vec![
            PathBuf::from("/farm/membership.yaml"),
            PathBuf::from("/farm/catalog.json"),
        ];
        assert_eq!(cache.classify_changes(&paths), ReloadScope::Full);
    }

    #[test]
    fn test_classify_dedupes_tables() {
        let cache = DataCache::new();
        let paths = vec![
            PathBuf::from("/farm/dashboard.json"),
            PathBuf::from("/farm/membership.yaml"),
            PathBuf::from("/farm/dashboard.json"),
            PathBuf::from("/farm/notes.txt"),
        ];
        assert_eq!(
            cache.classify_changes(&paths),
            ReloadScope::Tables(vec![DataFile::Dashboard, DataFile::Membership])
        );
    }

    #[test]
    fn test_unknown_file_is_ignored() {
        assert!(DataFile::from_path(Path::new("/farm/README.md")).is_none());
        assert_eq!(
            DataFile::from_path(Path::new("/farm/catalog.yml")),
            Some(DataFile::Catalog)
        );
    }

    #[test]
    fn test_mtime_tracking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.md");
        std::fs::write(&path, "## Rice\n").unwrap();

        let mut cache = DataCache::new();
        assert!(cache.has_changed(&path));

        cache.update_mtime(&path);
        assert!(!cache.has_changed(&path));
        assert!(cache.retain_changed(vec![path.clone()]).is_empty());

        std::fs::remove_file(&path).unwrap();
        assert!(cache.has_changed(&path));
    }
}
