use crate::io::paths::DEFAULT_DATA_FILE;
use crate::store::Schema;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Catalog configuration, usually read from `.catalog/config.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Durable CSV file; relative paths resolve against the config file's
    /// project directory
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Name of the identifier column
    #[serde(default = "default_id_column")]
    pub id_column: String,

    /// Header written when bootstrapping a new file
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,

    /// Start with an empty catalog when the data file is missing instead of
    /// failing
    #[serde(default)]
    pub create_if_missing: bool,
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_id_column() -> String {
    Schema::DEFAULT_ID_COLUMN.to_string()
}

fn default_columns() -> Vec<String> {
    Schema::default().columns().to_vec()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            id_column: default_id_column(),
            columns: default_columns(),
            create_if_missing: false,
        }
    }
}

impl CatalogConfig {
    /// Schema described by `columns` and `id_column`
    pub fn schema(&self) -> Result<Schema> {
        Schema::new(self.columns.as_slice(), &self.id_column)
    }
}
