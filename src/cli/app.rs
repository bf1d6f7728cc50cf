use crate::store::RecordId;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// catalog: keep a small CSV catalog of uniquely-identified items
#[derive(Parser)]
#[command(name = "catalog")]
#[command(version = "0.1.0")]
#[command(about = "Flat-file catalog store for uniquely-identified items")]
#[command(
    long_about = "Loads a CSV catalog, lets you view, add, edit and delete items from the command line, an interactive menu or a batch script, and saves the result back to the same file."
)]
pub struct Cli {
    /// Catalog CSV file (overrides the configured data_file)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Configuration file (defaults to .catalog/config.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics written to stderr (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Table,
    Json,
    Csv,
}

/// Output format for a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the catalog file with sample items
    Init {
        /// Overwrite an existing catalog file
        #[arg(long)]
        force: bool,

        /// Write only the header row
        #[arg(long)]
        empty: bool,
    },

    /// View all items
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: ListFormat,
    },

    /// View the details of one item
    Show {
        /// Item ID
        id: RecordId,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ShowFormat,
    },

    /// Add a new item and save
    Add {
        /// Item ID (defaults to one more than the highest existing ID)
        #[arg(long)]
        id: Option<RecordId>,

        /// Field values in column order (Name, Description for the default layout)
        values: Vec<String>,

        /// Set a field by name
        #[arg(long = "field", value_name = "FIELD=VALUE", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },

    /// Edit an existing item and save; blank values keep the current value
    Edit {
        /// Item ID
        id: RecordId,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// Set a field by name
        #[arg(long = "field", value_name = "FIELD=VALUE", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },

    /// Delete an item and save
    Delete {
        /// Item ID
        id: RecordId,
    },

    /// Find items containing text in any field
    Search {
        /// Text to look for (case-insensitive)
        query: String,

        /// Treat the query as a regular expression
        #[arg(long)]
        regex: bool,
    },

    /// List items whose field equals a value
    Filter {
        /// Field name
        field: String,

        /// Value to match (case-insensitive)
        value: String,
    },

    /// Print every value of one column
    Column {
        /// Column name
        field: String,
    },

    /// Render the catalog as an HTML page
    Render {
        /// Write the page to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page heading
        #[arg(long, default_value = "Catalog")]
        title: String,
    },

    /// Interactive numbered menu
    Menu,

    /// Run catalog commands from a script file, one per line
    Batch {
        /// Script file
        script: PathBuf,
    },
}

impl Commands {
    /// Get the command name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::List { .. } => "list",
            Commands::Show { .. } => "show",
            Commands::Add { .. } => "add",
            Commands::Edit { .. } => "edit",
            Commands::Delete { .. } => "delete",
            Commands::Search { .. } => "search",
            Commands::Filter { .. } => "filter",
            Commands::Column { .. } => "column",
            Commands::Render { .. } => "render",
            Commands::Menu => "menu",
            Commands::Batch { .. } => "batch",
        }
    }

    /// Check if this command writes the catalog file on its own
    pub fn modifies_files(&self) -> bool {
        matches!(
            self,
            Commands::Init { .. } | Commands::Add { .. } | Commands::Edit { .. } | Commands::Delete { .. }
        )
    }
}

/// Parse a `FIELD=VALUE` argument; the value may be empty
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
