pub mod manager;
pub mod query;
pub mod types;

pub use manager::CatalogStore;
pub use query::CatalogQuery;
pub use types::{Record, RecordId, RecordPatch, Schema};
