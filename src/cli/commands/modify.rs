use super::{open_store, CommandHandler};
use crate::cli::session::Session;
use crate::config::ResolvedConfig;
use crate::store::{RecordId, RecordPatch, Schema};
use crate::Result;
use std::io;

/// Single mutations applied to the catalog file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifyAction {
    Add {
        id: Option<RecordId>,
        values: Vec<String>,
        fields: Vec<(String, String)>,
    },
    Edit {
        id: RecordId,
        name: Option<String>,
        description: Option<String>,
        fields: Vec<(String, String)>,
    },
    Delete(RecordId),
}

/// Handler for `add`, `edit` and `delete`: load, apply one change, save
pub struct ModifyCommand {
    pub resolved: ResolvedConfig,
    pub action: ModifyAction,
}

impl CommandHandler for ModifyCommand {
    fn execute(&self) -> Result<()> {
        let store = open_store(&self.resolved)?;
        let mut session = Session::new(store, io::stdout().lock());

        match &self.action {
            ModifyAction::Add { id, values, fields } => {
                let record = session.build_record(*id, values, fields)?;
                session.add(record)?;
            }
            ModifyAction::Edit {
                id,
                name,
                description,
                fields,
            } => {
                session.edit(*id, &edit_patch(name, description, fields))?;
            }
            ModifyAction::Delete(id) => session.delete(*id)?,
        }

        if session.store().is_dirty() {
            session.save()?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        match self.action {
            ModifyAction::Add { .. } => "add",
            ModifyAction::Edit { .. } => "edit",
            ModifyAction::Delete(_) => "delete",
        }
    }
}

impl ModifyCommand {
    /// Create new modify command
    pub fn new(resolved: ResolvedConfig, action: ModifyAction) -> Self {
        Self { resolved, action }
    }
}

fn edit_patch(
    name: &Option<String>,
    description: &Option<String>,
    fields: &[(String, String)],
) -> RecordPatch {
    let mut patch = RecordPatch::new();
    if let Some(name) = name {
        patch.set(Schema::NAME_COLUMN, name.as_str());
    }
    if let Some(description) = description {
        patch.set(Schema::DESCRIPTION_COLUMN, description.as_str());
    }
    for (field, value) in fields {
        patch.set(field.as_str(), value.as_str());
    }
    patch
}
