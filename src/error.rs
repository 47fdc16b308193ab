// catalog-sorter/src/error.rs

use std::path::PathBuf;

/// Fatal conditions of a catalog run. Validation findings are not errors,
/// see [`crate::validate::Finding`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: top-level value is not an array", path.display())]
    NotAnArray { path: PathBuf },

    #[error("{}: element {index} is not an object", path.display())]
    NotAnObject { path: PathBuf, index: usize },

    #[error("record {index} has no `{field}` field")]
    MissingField { index: usize, field: &'static str },

    #[error("record {index}: `{field}` must be a string, found {found}")]
    InvalidField { index: usize, field: &'static str, found: String },

    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("entity schema: {0}")]
    Schema(String),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::FileNotFound { path };
        }
        Self::Io { path, source }
    }
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
