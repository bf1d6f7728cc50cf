use super::{open_store, CommandHandler};
use crate::cli::app::{ListFormat, ShowFormat};
use crate::cli::session::Session;
use crate::config::ResolvedConfig;
use crate::store::{RecordId, RecordPatch};
use crate::{CatalogError, Result};
use std::io::{self, BufRead, Lines, Write};

const MENU: &str = "\nCatalog Menu:\n\
                    1. View Catalog\n\
                    2. View Item Details\n\
                    3. Add New Item\n\
                    4. Edit Existing Item\n\
                    5. Delete Item\n\
                    6. Search\n\
                    7. Save\n\
                    0. Exit\n";

/// Handler for the `menu` command
pub struct MenuCommand {
    pub resolved: ResolvedConfig,
}

impl CommandHandler for MenuCommand {
    fn execute(&self) -> Result<()> {
        let store = open_store(&self.resolved)?;
        let mut session = Session::new(store, io::stdout().lock());
        Menu::new(&mut session, io::stdin().lock()).run()
    }

    fn name(&self) -> &'static str {
        "menu"
    }
}

impl MenuCommand {
    /// Create new menu command
    pub fn new(resolved: ResolvedConfig) -> Self {
        Self { resolved }
    }
}

/// Whether the loop keeps going after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

/// Interactive loop: read one numbered action, apply it, repeat.
///
/// Failed actions print their error and leave the catalog as it was. The
/// loop ends on `0` or end of input; unsaved changes are not written.
pub struct Menu<'a, R: BufRead, W: Write> {
    session: &'a mut Session<W>,
    input: Lines<R>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(session: &'a mut Session<W>, input: R) -> Self {
        Self {
            session,
            input: input.lines(),
        }
    }

    pub fn run(mut self) -> Result<()> {
        loop {
            write!(self.session.out(), "{}", MENU)?;
            let Some(choice) = self.prompt("Select an option: ")? else {
                break;
            };

            let outcome = match choice.trim() {
                "1" => self.session.view_all(ListFormat::Table).map(|_| Step::Continue),
                "2" => self.view_item(),
                "3" => self.add_item(),
                "4" => self.edit_item(),
                "5" => self.delete_item(),
                "6" => self.search(),
                "7" => self.session.save().map(|_| Step::Continue),
                "0" => break,
                _ => {
                    writeln!(
                        self.session.out(),
                        "Invalid choice. Please select a valid option."
                    )?;
                    Ok(Step::Continue)
                }
            };

            match outcome {
                Ok(Step::Continue) => {}
                Ok(Step::Quit) => break,
                Err(e) => {
                    if e.is_recoverable() {
                        tracing::debug!("Menu action failed: {}", e);
                    } else {
                        tracing::warn!("Menu action failed: {}", e);
                    }
                    writeln!(self.session.out(), "Error: {}", e)?;
                }
            }
        }

        if self.session.store().is_dirty() {
            writeln!(self.session.out(), "Unsaved changes discarded.")?;
        }
        writeln!(self.session.out(), "Exiting the program.")?;
        Ok(())
    }

    fn view_item(&mut self) -> Result<Step> {
        let Some(line) = self.prompt("Enter the item ID to view details: ")? else {
            return Ok(Step::Quit);
        };
        if let Some(id) = self.parse_id(&line)? {
            self.session.view_one(id, ShowFormat::Text)?;
        }
        Ok(Step::Continue)
    }

    fn add_item(&mut self) -> Result<Step> {
        let next = self.session.store().next_id();
        let Some(line) = self.prompt(&format!("Enter new item ID (blank for {}): ", next))? else {
            return Ok(Step::Quit);
        };
        let id = if line.trim().is_empty() {
            next
        } else {
            match self.parse_id(&line)? {
                Some(id) => id,
                None => return Ok(Step::Continue),
            }
        };

        let mut values = Vec::new();
        for column in self.field_columns() {
            let Some(value) = self.prompt(&format!("Enter new item {}: ", column))? else {
                return Ok(Step::Quit);
            };
            values.push(value);
        }

        let record = self.session.build_record(Some(id), &values, &[])?;
        self.session.add(record)?;
        Ok(Step::Continue)
    }

    fn edit_item(&mut self) -> Result<Step> {
        let Some(line) = self.prompt("Enter the item ID to edit: ")? else {
            return Ok(Step::Quit);
        };
        let Some(id) = self.parse_id(&line)? else {
            return Ok(Step::Continue);
        };
        let current = self
            .session
            .store()
            .get(id)
            .cloned()
            .ok_or(CatalogError::RecordNotFound(id))?;

        let mut patch = RecordPatch::new();
        for column in self.field_columns() {
            let text = format!(
                "Enter new {} (current: {}): ",
                column,
                current.field(&column).unwrap_or_default()
            );
            let Some(value) = self.prompt(&text)? else {
                return Ok(Step::Quit);
            };
            patch.set(column, value);
        }

        self.session.edit(id, &patch)?;
        Ok(Step::Continue)
    }

    fn delete_item(&mut self) -> Result<Step> {
        let Some(line) = self.prompt("Enter the item ID to delete: ")? else {
            return Ok(Step::Quit);
        };
        if let Some(id) = self.parse_id(&line)? {
            self.session.delete(id)?;
        }
        Ok(Step::Continue)
    }

    fn search(&mut self) -> Result<Step> {
        let Some(query) = self.prompt("Enter search text: ")? else {
            return Ok(Step::Quit);
        };
        self.session.search(&query, false)?;
        Ok(Step::Continue)
    }

    /// Print `text` and read one line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        let out = self.session.out();
        write!(out, "{}", text)?;
        out.flush()?;
        Ok(self.input.next().transpose()?)
    }

    /// Parse an id; non-numeric input is reported and yields `None`
    fn parse_id(&mut self, line: &str) -> Result<Option<RecordId>> {
        match line.trim().parse::<RecordId>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(
                    self.session.out(),
                    "Invalid input. Please enter a numeric ID."
                )?;
                Ok(None)
            }
        }
    }

    fn field_columns(&self) -> Vec<String> {
        self.session
            .store()
            .schema()
            .field_columns()
            .map(str::to_string)
            .collect()
    }
}
