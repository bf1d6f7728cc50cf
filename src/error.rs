use crate::store::RecordId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Record not found: no item with ID {0}")]
    RecordNotFound(RecordId),

    #[error("Catalog file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Duplicate ID: an item with ID {0} already exists")]
    DuplicateId(RecordId),

    #[error("Malformed data at line {line}: {reason}")]
    MalformedData { line: u64, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CLI error: {0}")]
    Cli(String),
}

impl CatalogError {
    /// Shorthand for a malformed-data error at a 1-based line of the durable file
    pub fn malformed(line: u64, reason: impl Into<String>) -> Self {
        CatalogError::MalformedData {
            line,
            reason: reason.into(),
        }
    }

    /// True for errors caused by input the user can correct and retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CatalogError::RecordNotFound(_)
                | CatalogError::DuplicateId(_)
                | CatalogError::Validation(_)
                | CatalogError::Regex(_)
                | CatalogError::Cli(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
