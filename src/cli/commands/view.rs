use super::{open_store, CommandHandler};
use crate::cli::app::{ListFormat, ShowFormat};
use crate::cli::session::Session;
use crate::config::ResolvedConfig;
use crate::store::RecordId;
use crate::Result;
use std::io;

/// Read-only catalog views
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    List(ListFormat),
    Show(RecordId, ShowFormat),
    Search { query: String, regex: bool },
    Filter { field: String, value: String },
    Column(String),
}

/// Handler for `list`, `show`, `search`, `filter` and `column`
pub struct ViewCommand {
    pub resolved: ResolvedConfig,
    pub action: ViewAction,
}

impl CommandHandler for ViewCommand {
    fn execute(&self) -> Result<()> {
        let store = open_store(&self.resolved)?;
        let mut session = Session::new(store, io::stdout().lock());

        match &self.action {
            ViewAction::List(format) => session.view_all(*format),
            ViewAction::Show(id, format) => session.view_one(*id, *format),
            ViewAction::Search { query, regex } => session.search(query, *regex),
            ViewAction::Filter { field, value } => session.filter(field, value),
            ViewAction::Column(field) => session.column(field),
        }
    }

    fn name(&self) -> &'static str {
        match self.action {
            ViewAction::List(_) => "list",
            ViewAction::Show(..) => "show",
            ViewAction::Search { .. } => "search",
            ViewAction::Filter { .. } => "filter",
            ViewAction::Column(_) => "column",
        }
    }
}

impl ViewCommand {
    /// Create new view command
    pub fn new(resolved: ResolvedConfig, action: ViewAction) -> Self {
        Self { resolved, action }
    }
}
