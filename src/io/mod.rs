pub mod csv_file;
pub mod paths;

pub use csv_file::{read_table, write_table, Table};
pub use paths::CatalogPaths;
