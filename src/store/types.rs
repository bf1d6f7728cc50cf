use crate::{CatalogError, Result};
use std::collections::BTreeMap;

/// Caller-assigned record identifier
pub type RecordId = i64;

/// Column layout of the durable file: ordered header names plus the id column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
    id_index: usize,
}

impl Schema {
    pub const DEFAULT_ID_COLUMN: &'static str = "ID";
    pub const NAME_COLUMN: &'static str = "Name";
    pub const DESCRIPTION_COLUMN: &'static str = "Description";

    /// Build a schema from declared column names.
    ///
    /// `id_column` is matched case-insensitively. Column names must be
    /// non-empty and unique, and at least one non-id column is required.
    pub fn new<S: AsRef<str>>(columns: &[S], id_column: &str) -> Result<Self> {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().trim().to_string()).collect();
        let id_index = Self::check_columns(&columns, id_column).map_err(CatalogError::Config)?;
        Ok(Self { columns, id_index })
    }

    /// Build a schema from the header row of a durable file
    pub(crate) fn from_header(header: Vec<String>, id_column: &str) -> Result<Self> {
        let columns: Vec<String> = header.into_iter().map(|c| c.trim().to_string()).collect();
        let id_index =
            Self::check_columns(&columns, id_column).map_err(|reason| CatalogError::malformed(1, reason))?;
        Ok(Self { columns, id_index })
    }

    fn check_columns(columns: &[String], id_column: &str) -> std::result::Result<usize, String> {
        if columns.iter().any(|c| c.is_empty()) {
            return Err("header contains an empty column name".to_string());
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|prev| prev.eq_ignore_ascii_case(column)) {
                return Err(format!("header repeats column '{}'", column));
            }
        }

        let id_index = columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(id_column))
            .ok_or_else(|| format!("header has no '{}' column", id_column))?;

        if columns.len() < 2 {
            return Err("header needs at least one field besides the ID column".to_string());
        }

        Ok(id_index)
    }

    /// All column names in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of the id column within the header
    pub fn id_index(&self) -> usize {
        self.id_index
    }

    pub fn id_column(&self) -> &str {
        &self.columns[self.id_index]
    }

    /// Non-id columns in file order
    pub fn field_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.id_index)
            .map(|(_, c)| c.as_str())
    }

    /// Canonical spelling of a non-id field, matched exactly first and then
    /// case-insensitively
    pub fn resolve_field(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.field_columns()
            .find(|c| *c == name)
            .or_else(|| self.field_columns().find(|c| c.eq_ignore_ascii_case(name)))
    }

    /// True when `name` refers to the id column
    pub fn is_id_column(&self, name: &str) -> bool {
        self.id_column().eq_ignore_ascii_case(name.trim())
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            columns: vec![
                Self::DEFAULT_ID_COLUMN.to_string(),
                Self::NAME_COLUMN.to_string(),
                Self::DESCRIPTION_COLUMN.to_string(),
            ],
            id_index: 0,
        }
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Unique identifier
    pub id: RecordId,
    /// Named text fields, keyed by column name
    pub fields: BTreeMap<String, String>,
}

impl Record {
    /// Create a record with the default `Name` and `Description` fields
    pub fn new(id: RecordId, name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(Schema::NAME_COLUMN.to_string(), name.into());
        fields.insert(Schema::DESCRIPTION_COLUMN.to_string(), description.into());
        Self { id, fields }
    }

    /// Create a record from arbitrary named fields
    pub fn with_fields<K, V, I>(id: RecordId, fields: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            id,
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.field(Schema::NAME_COLUMN)
    }

    pub fn description(&self) -> Option<&str> {
        self.field(Schema::DESCRIPTION_COLUMN)
    }

    /// Values in schema column order, with the id rendered as text
    pub fn to_row(&self, schema: &Schema) -> Vec<String> {
        schema
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                if i == schema.id_index() {
                    self.id.to_string()
                } else {
                    self.field(column).unwrap_or_default().to_string()
                }
            })
            .collect()
    }
}

/// Partial field update; blank values mean "keep the current value"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    fields: Vec<(String, String)>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field by column name
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn name(self, value: impl Into<String>) -> Self {
        self.with(Schema::NAME_COLUMN, value)
    }

    pub fn description(self, value: impl Into<String>) -> Self {
        self.with(Schema::DESCRIPTION_COLUMN, value)
    }

    /// Set a field, replacing an earlier value for the same field
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(f, v)| (f.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
