pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod render;
pub mod store;

pub use error::{CatalogError, Result};
pub use store::{CatalogStore, Record, RecordId, RecordPatch, Schema};
