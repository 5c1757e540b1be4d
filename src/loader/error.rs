use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("catalog.yaml or catalog.json not found in {0}")]
    CatalogNotFound(PathBuf),

    #[error("Invalid {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No crop groups found in {0}")]
    EmptyCatalog(PathBuf),
}

impl LoadError {
    pub(crate) fn invalid(path: &std::path::Path, e: impl std::fmt::Display) -> Self {
        Self::Invalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    }
}

/// Read a file, or `Ok(None)` if it does not exist.
pub(crate) fn read_optional(path: &std::path::Path) -> Result<Option<String>, LoadError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
