use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("invalid project JSON: {0}")]
    InvalidProject(#[source] serde_json::Error),
    #[error("invalid config JSON: {0}")]
    InvalidConfig(#[source] serde_json::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize analysis: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
