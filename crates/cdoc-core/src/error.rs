//! Crate-level error type

use std::path::PathBuf;

use thiserror::Error;

use crate::generic::DemangleError;
use crate::report::SortError;
use crate::scanner::ScanError;

/// Everything that can abort scanning, sorting or rendering
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Sort(#[from] SortError),

    #[error(transparent)]
    Demangle(#[from] DemangleError),

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{label}' contains an embedded NUL byte")]
    EmbeddedNul { label: String },

    #[error("'{label}' is too large to scan")]
    SourceTooLarge { label: String },

    #[error("{label}: '{}' includes itself", path.display())]
    IncludeCycle { label: String, path: PathBuf },

    #[error("{label}:{line}: name index {index} is out of range for {len} code tokens")]
    ParamOutOfRange {
        label: String,
        line: u32,
        index: usize,
        len: usize,
    },

    #[error("failed to format output")]
    Render(#[from] std::fmt::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;
