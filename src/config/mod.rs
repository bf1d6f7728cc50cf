pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, ResolvedConfig};
pub use types::CatalogConfig;
