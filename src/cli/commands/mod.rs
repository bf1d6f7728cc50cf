pub mod batch;
pub mod init;
pub mod menu;
pub mod modify;
pub mod render;
pub mod view;

use crate::config::ResolvedConfig;
use crate::store::CatalogStore;
use crate::Result;

/// Common trait for all command handlers
pub trait CommandHandler {
    /// Execute the command
    fn execute(&self) -> Result<()>;

    /// Get command name for logging
    fn name(&self) -> &'static str;
}

/// Load the configured catalog file.
///
/// A missing file is an error unless the config allows starting empty.
pub fn open_store(resolved: &ResolvedConfig) -> Result<CatalogStore> {
    let config = &resolved.config;
    if config.create_if_missing {
        CatalogStore::load_or_create(&resolved.data_file, config.schema()?)
    } else {
        CatalogStore::load_with_id_column(&resolved.data_file, &config.id_column)
    }
}
