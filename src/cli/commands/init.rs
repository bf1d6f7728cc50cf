use super::CommandHandler;
use crate::config::ResolvedConfig;
use crate::store::{CatalogStore, Record, RecordId, Schema};
use crate::Result;

/// Number of sample items written by `init`
const SAMPLE_ITEMS: RecordId = 3;

/// Handler for the `init` command
pub struct InitCommand {
    pub resolved: ResolvedConfig,
    pub force: bool,
    pub empty: bool,
}

impl CommandHandler for InitCommand {
    fn execute(&self) -> Result<()> {
        let path = &self.resolved.data_file;

        if path.exists() && !self.force {
            println!(
                "Catalog {} already exists. Use --force to overwrite it.",
                path.display()
            );
            return Ok(());
        }

        let schema = self.resolved.config.schema()?;
        let mut store = CatalogStore::new(schema);
        if !self.empty {
            for record in sample_records(store.schema()) {
                store.add(record)?;
            }
        }
        store.save(path)?;

        println!(
            "Initialized catalog {} with {} items.",
            path.display(),
            store.len()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "init"
    }
}

impl InitCommand {
    /// Create new init command
    pub fn new(resolved: ResolvedConfig, force: bool, empty: bool) -> Self {
        Self {
            resolved,
            force,
            empty,
        }
    }
}

/// Sample items `Item1..Item3`: the first field holds the item name, every
/// other field reads "<Column> of <name>"
pub fn sample_records(schema: &Schema) -> Vec<Record> {
    (1..=SAMPLE_ITEMS)
        .map(|id| {
            let item = format!("Item{}", id);
            let fields = schema.field_columns().enumerate().map(|(i, column)| {
                let value = if i == 0 {
                    item.clone()
                } else {
                    format!("{} of {}", column, item)
                };
                (column, value)
            });
            Record::with_fields(id, fields)
        })
        .collect()
}
