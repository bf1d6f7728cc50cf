use crate::store::types::{Record, Schema};
use crate::{CatalogError, Result};
use regex::Regex;

/// Read-only query engine over a slice of catalog records
pub struct CatalogQuery<'a> {
    schema: &'a Schema,
    records: &'a [Record],
}

impl<'a> CatalogQuery<'a> {
    /// Create new query over the given records
    pub fn new(schema: &'a Schema, records: &'a [Record]) -> Self {
        Self { schema, records }
    }

    /// Records where the id or any field contains `query`, ignoring case.
    /// An empty query matches every record.
    pub fn search(&self, query: &str) -> Vec<&'a Record> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().collect();
        }

        self.records
            .iter()
            .filter(|record| {
                record.id.to_string().contains(&needle)
                    || record
                        .fields
                        .values()
                        .any(|value| value.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Records where the id or any field matches a regular expression
    pub fn search_regex(&self, pattern: &str) -> Result<Vec<&'a Record>> {
        let regex = Regex::new(pattern)?;
        Ok(self
            .records
            .iter()
            .filter(|record| {
                regex.is_match(&record.id.to_string())
                    || record.fields.values().any(|value| regex.is_match(value))
            })
            .collect())
    }

    /// Records whose `field` equals `value`, ignoring case and surrounding
    /// whitespace
    pub fn filter(&self, field: &str, value: &str) -> Result<Vec<&'a Record>> {
        let column = self.field(field)?;
        let wanted = value.trim().to_lowercase();

        Ok(self
            .records
            .iter()
            .filter(|record| {
                record
                    .field(column)
                    .is_some_and(|v| v.trim().to_lowercase() == wanted)
            })
            .collect())
    }

    /// Every value of one column in catalog order; the id column is allowed
    pub fn column(&self, field: &str) -> Result<Vec<String>> {
        if self.schema.is_id_column(field) {
            return Ok(self.records.iter().map(|r| r.id.to_string()).collect());
        }

        let column = self.field(field)?;
        Ok(self
            .records
            .iter()
            .map(|record| record.field(column).unwrap_or_default().to_string())
            .collect())
    }

    fn field(&self, name: &str) -> Result<&'a str> {
        self.schema
            .resolve_field(name)
            .ok_or_else(|| CatalogError::Validation(format!("Unknown field '{}'", name)))
    }
}
