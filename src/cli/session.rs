use super::app::{ListFormat, ShowFormat};
use super::display;
use crate::store::{CatalogStore, Record, RecordId, RecordPatch};
use crate::{CatalogError, Result};
use std::io::Write;

/// A loaded catalog plus the output its actions report to.
///
/// Every action performs exactly one store operation and writes a
/// human-readable result; failures are returned to the caller untouched.
pub struct Session<W: Write> {
    store: CatalogStore,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(store: CatalogStore, out: W) -> Self {
        Self { store, out }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_parts(self) -> (CatalogStore, W) {
        (self.store, self.out)
    }

    pub fn view_all(&mut self, format: ListFormat) -> Result<()> {
        let records: Vec<&Record> = self.store.list().iter().collect();
        let schema = self.store.schema();
        match format {
            ListFormat::Table => display::write_table(&mut self.out, schema, &records),
            ListFormat::Json => display::write_json(&mut self.out, schema, &records),
            ListFormat::Csv => display::write_csv(&mut self.out, schema, &records),
        }
    }

    pub fn view_one(&mut self, id: RecordId, format: ShowFormat) -> Result<()> {
        let record = self
            .store
            .get(id)
            .ok_or(CatalogError::RecordNotFound(id))?;
        match format {
            ShowFormat::Text => display::write_details(&mut self.out, self.store.schema(), record),
            ShowFormat::Json => display::write_json_record(&mut self.out, self.store.schema(), record),
        }
    }

    pub fn add(&mut self, record: Record) -> Result<()> {
        let id = record.id;
        self.store.add(record)?;
        writeln!(self.out, "Item {} added successfully.", id)?;
        Ok(())
    }

    pub fn edit(&mut self, id: RecordId, patch: &RecordPatch) -> Result<()> {
        let changed = self.store.update(id, patch)?;
        if changed.is_empty() {
            writeln!(self.out, "No changes made to item {}.", id)?;
        } else {
            writeln!(
                self.out,
                "Item {} updated successfully ({}).",
                id,
                changed.join(", ")
            )?;
        }
        Ok(())
    }

    pub fn delete(&mut self, id: RecordId) -> Result<()> {
        self.store.delete(id)?;
        writeln!(self.out, "Item {} deleted.", id)?;
        Ok(())
    }

    pub fn search(&mut self, query: &str, regex: bool) -> Result<()> {
        let found = if regex {
            self.store.search_regex(query)?
        } else {
            self.store.search(query)
        };
        display::write_table(&mut self.out, self.store.schema(), &found)
    }

    pub fn filter(&mut self, field: &str, value: &str) -> Result<()> {
        let found = self.store.filter(field, value)?;
        display::write_table(&mut self.out, self.store.schema(), &found)
    }

    pub fn column(&mut self, field: &str) -> Result<()> {
        for value in self.store.column(field)? {
            writeln!(self.out, "{}", value)?;
        }
        Ok(())
    }

    pub fn save(&mut self) -> Result<()> {
        self.store.save_to_source()?;
        let path = self
            .store
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        writeln!(
            self.out,
            "Catalog saved to {} ({} items).",
            path,
            self.store.len()
        )?;
        Ok(())
    }

    /// Build a record from positional values (filling non-id columns in
    /// order) and named fields; the id defaults to the next free one
    pub fn build_record(
        &self,
        id: Option<RecordId>,
        values: &[String],
        fields: &[(String, String)],
    ) -> Result<Record> {
        let schema = self.store.schema();
        let columns: Vec<&str> = schema.field_columns().collect();
        if values.len() > columns.len() {
            return Err(CatalogError::Validation(format!(
                "Expected at most {} values ({}), got {}",
                columns.len(),
                columns.join(", "),
                values.len()
            )));
        }

        let mut record = Record::with_fields(
            id.unwrap_or_else(|| self.store.next_id()),
            columns.iter().zip(values).map(|(c, v)| (*c, v.as_str())),
        );
        for (field, value) in fields {
            let column = schema.resolve_field(field).unwrap_or(field.as_str());
            if record.fields.contains_key(column) {
                return Err(CatalogError::Validation(format!(
                    "Field '{}' given more than once",
                    column
                )));
            }
            record.fields.insert(column.to_string(), value.clone());
        }
        Ok(record)
    }
}
