use crate::io::{read_table, write_table};
use crate::store::query::CatalogQuery;
use crate::store::types::{Record, RecordId, RecordPatch, Schema};
use crate::{CatalogError, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Owns the in-memory catalog and mediates every read and write to it.
///
/// Records keep insertion order; `index` maps each id to its position so
/// lookups and in-place edits don't scan.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    /// Column layout used for validation and for the saved header
    schema: Schema,
    /// Records in catalog order
    records: Vec<Record>,
    /// id -> position in `records`
    index: HashMap<RecordId, usize>,
    /// File this catalog was last loaded from or saved to
    source: Option<PathBuf>,
    /// Unsaved in-memory changes exist
    dirty: bool,
}

impl CatalogStore {
    /// Create an empty store with the given schema
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
            index: HashMap::new(),
            source: None,
            dirty: false,
        }
    }

    /// Load a catalog whose id column is named `ID` (any case)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_id_column(path, Schema::DEFAULT_ID_COLUMN)
    }

    /// Load a catalog from a delimited file, locating the id column by name
    pub fn load_with_id_column(path: impl AsRef<Path>, id_column: &str) -> Result<Self> {
        let path = path.as_ref();
        let table = read_table(path)?;
        let schema = Schema::from_header(table.header, id_column)?;

        let expected = schema.columns().len();
        let mut store = Self::new(schema);

        for (line, row) in table.rows {
            if row.len() != expected {
                return Err(CatalogError::malformed(
                    line,
                    format!("expected {} fields, found {}", expected, row.len()),
                ));
            }

            let record = store.record_from_row(line, row)?;
            if store.index.contains_key(&record.id) {
                return Err(CatalogError::malformed(
                    line,
                    format!("duplicate {} value {}", store.schema.id_column(), record.id),
                ));
            }
            store.push(record);
        }

        tracing::debug!(
            "Loaded {} records from {}",
            store.records.len(),
            path.display()
        );
        store.source = Some(path.to_path_buf());
        Ok(store)
    }

    /// Load `path`, or start an empty catalog with `schema` if the file does
    /// not exist yet
    pub fn load_or_create(path: impl AsRef<Path>, schema: Schema) -> Result<Self> {
        let path = path.as_ref();
        match Self::load_with_id_column(path, schema.id_column()) {
            Ok(store) => {
                if store.schema.columns() != schema.columns() {
                    tracing::warn!(
                        "Header of {} ({}) differs from configured columns ({}); using the file's header",
                        path.display(),
                        store.schema.columns().join(","),
                        schema.columns().join(",")
                    );
                }
                Ok(store)
            }
            Err(CatalogError::FileNotFound(_)) => {
                tracing::info!("Starting new catalog at {}", path.display());
                let mut store = Self::new(schema);
                store.source = Some(path.to_path_buf());
                Ok(store)
            }
            Err(e) => Err(e),
        }
    }

    fn record_from_row(&self, line: u64, row: Vec<String>) -> Result<Record> {
        let mut id = None;
        let mut fields = BTreeMap::new();

        for (i, (column, value)) in self.schema.columns().iter().zip(row).enumerate() {
            if i == self.schema.id_index() {
                let parsed = value.trim().parse::<RecordId>().map_err(|_| {
                    CatalogError::malformed(
                        line,
                        format!("{} value '{}' is not an integer", column, value),
                    )
                })?;
                id = Some(parsed);
            } else {
                fields.insert(column.clone(), value);
            }
        }

        let id = id.ok_or_else(|| CatalogError::malformed(line, "row has no ID field"))?;
        Ok(Record { id, fields })
    }

    fn push(&mut self, record: Record) {
        self.index.insert(record.id, self.records.len());
        self.records.push(record);
    }

    fn rebuild_index_from(&mut self, start: usize) {
        for (pos, record) in self.records.iter().enumerate().skip(start) {
            self.index.insert(record.id, pos);
        }
    }

    /// All records in catalog order
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    /// Look up a record by id; absence is not an error
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.index.contains_key(&id)
    }

    /// Append a new record.
    ///
    /// Every schema field must be present and non-blank; values are stored
    /// trimmed. Fails without touching the catalog on invalid fields or an
    /// id that is already taken.
    pub fn add(&mut self, record: Record) -> Result<()> {
        let mut fields = BTreeMap::new();
        for (name, value) in &record.fields {
            let column = self.resolve_writable_field(name)?;
            if fields.insert(column.to_string(), value.trim().to_string()).is_some() {
                return Err(CatalogError::Validation(format!(
                    "Field '{}' given more than once",
                    column
                )));
            }
        }

        for column in self.schema.field_columns() {
            match fields.get(column) {
                Some(value) if !value.is_empty() => {}
                _ => {
                    return Err(CatalogError::Validation(format!(
                        "{} cannot be empty",
                        column
                    )))
                }
            }
        }

        if self.contains(record.id) {
            return Err(CatalogError::DuplicateId(record.id));
        }

        tracing::info!("Added record {}", record.id);
        self.push(Record {
            id: record.id,
            fields,
        });
        self.dirty = true;
        Ok(())
    }

    /// Overwrite the non-blank fields of `patch` on record `id`.
    ///
    /// Blank values keep the current value. Returns the names of the fields
    /// whose value actually changed.
    pub fn update(&mut self, id: RecordId, patch: &RecordPatch) -> Result<Vec<String>> {
        let pos = *self
            .index
            .get(&id)
            .ok_or(CatalogError::RecordNotFound(id))?;

        let mut changes = Vec::new();
        for (name, value) in patch.iter() {
            let column = self.resolve_writable_field(name)?.to_string();
            let value = value.trim();
            if !value.is_empty() {
                changes.push((column, value.to_string()));
            }
        }

        let record = &mut self.records[pos];
        let mut changed = Vec::new();
        for (column, value) in changes {
            if record.fields.get(&column) != Some(&value) {
                record.fields.insert(column.clone(), value);
                if !changed.contains(&column) {
                    changed.push(column);
                }
            }
        }

        if !changed.is_empty() {
            tracing::info!("Updated record {} ({})", id, changed.join(", "));
            self.dirty = true;
        }
        Ok(changed)
    }

    /// Remove record `id`, keeping the order of the others
    pub fn delete(&mut self, id: RecordId) -> Result<Record> {
        let pos = self
            .index
            .remove(&id)
            .ok_or(CatalogError::RecordNotFound(id))?;

        let record = self.records.remove(pos);
        self.rebuild_index_from(pos);
        self.dirty = true;

        tracing::info!("Deleted record {}", id);
        Ok(record)
    }

    /// Write the catalog to `path` with a header row in schema order
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let schema = &self.schema;
        let rows = self.records.iter().map(|record| record.to_row(schema));
        write_table(path, schema.columns(), rows)?;

        tracing::info!("Saved {} records to {}", self.records.len(), path.display());
        self.source = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    /// Save back to the file this catalog came from
    pub fn save_to_source(&mut self) -> Result<()> {
        let path = self.source.clone().ok_or_else(|| {
            CatalogError::Config("Catalog has no file to save to".to_string())
        })?;
        self.save(path)
    }

    /// Smallest id greater than every id in the catalog
    pub fn next_id(&self) -> RecordId {
        self.records
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    /// Read-only query view over the current records
    pub fn query(&self) -> CatalogQuery<'_> {
        CatalogQuery::new(&self.schema, &self.records)
    }

    pub fn search(&self, query: &str) -> Vec<&Record> {
        self.query().search(query)
    }

    pub fn search_regex(&self, pattern: &str) -> Result<Vec<&Record>> {
        self.query().search_regex(pattern)
    }

    pub fn filter(&self, field: &str, value: &str) -> Result<Vec<&Record>> {
        self.query().filter(field, value)
    }

    pub fn column(&self, field: &str) -> Result<Vec<String>> {
        self.query().column(field)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True if there are changes not yet written by `save`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn resolve_writable_field(&self, name: &str) -> Result<&str> {
        if self.schema.is_id_column(name) {
            return Err(CatalogError::Validation(format!(
                "{} cannot be changed",
                self.schema.id_column()
            )));
        }
        self.schema
            .resolve_field(name)
            .ok_or_else(|| CatalogError::Validation(format!("Unknown field '{}'", name)))
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(Schema::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write_catalog(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("catalog.csv");
        fs::write(&path, content).unwrap();
        path
    }

    fn sample_store() -> CatalogStore {
        let mut store = CatalogStore::default();
        store.add(Record::new(1, "Item1", "Desc1")).unwrap();
        store.add(Record::new(2, "Item2", "Desc2")).unwrap();
        store
    }

    #[test]
    fn test_load_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_catalog(&temp_dir, "ID,Name,Description\n1,Item1,Desc1\n2,Item2,Desc2\n");

        let store = CatalogStore::load(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(2), Some(&Record::new(2, "Item2", "Desc2")));
        assert_eq!(store.get(3), None);
        assert_eq!(store.path(), Some(path.as_path()));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = CatalogStore::load(temp_dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound(_)));
    }

    #[test]
    fn test_load_or_create_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fresh.csv");

        let store = CatalogStore::load_or_create(&path, Schema::default()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.path(), Some(path.as_path()));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_field_count_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_catalog(&temp_dir, "ID,Name,Description\n1,Item1,Desc1\n2,Item2\n");

        let err = CatalogStore::load(&path).unwrap_err();
        match err {
            CatalogError::MalformedData { line, reason } => {
                assert_eq!(line, 3);
                assert_eq!(reason, "expected 3 fields, found 2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_non_integer_id() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_catalog(&temp_dir, "ID,Name,Description\nabc,Item1,Desc1\n");

        let err = CatalogStore::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedData { line: 2, .. }));
    }

    #[test]
    fn test_load_duplicate_ids() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_catalog(&temp_dir, "ID,Name,Description\n1,A,a\n1,B,b\n");

        let err = CatalogStore::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedData { line: 3, .. }));
    }

    #[test]
    fn test_load_tolerates_padded_ids() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_catalog(&temp_dir, "ID,Name,Description\n 7 ,A,a\n");

        let store = CatalogStore::load(&path).unwrap();
        assert!(store.contains(7));
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut store = CatalogStore::default();
        store.add(Record::new(5, "Five", "fifth")).unwrap();
        store.add(Record::new(2, "Two", "second")).unwrap();

        let ids: Vec<RecordId> = store.list().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 2]);
        assert!(store.is_dirty());
    }

    #[test]
    fn test_add_duplicate_id() {
        let mut store = sample_store();
        let before = store.list().to_vec();

        let err = store.add(Record::new(2, "Other", "other")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(2)));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_add_blank_fields() {
        let mut store = sample_store();

        let err = store.add(Record::new(3, "   ", "Desc3")).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(ref m) if m == "Name cannot be empty"));

        let err = store.add(Record::new(3, "Item3", "")).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(ref m) if m == "Description cannot be empty"));

        let err = store
            .add(Record::with_fields(3, [("Name", "Item3")]))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(3), None);
    }

    #[test]
    fn test_add_unknown_field() {
        let mut store = sample_store();
        let err = store
            .add(Record::with_fields(
                3,
                [("Name", "Item3"), ("Description", "Desc3"), ("Price", "4")],
            ))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(ref m) if m == "Unknown field 'Price'"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_trims_and_normalizes_field_names() {
        let mut store = CatalogStore::default();
        store
            .add(Record::with_fields(
                9,
                [("name", "  Lamp "), ("DESCRIPTION", "Desk lamp ")],
            ))
            .unwrap();

        assert_eq!(store.get(9), Some(&Record::new(9, "Lamp", "Desk lamp")));
    }

    #[test]
    fn test_update_blank_keeps_value() {
        let mut store = sample_store();

        let changed = store.update(1, &RecordPatch::new().name("")).unwrap();
        assert!(changed.is_empty());
        assert_eq!(store.get(1).unwrap().name(), Some("Item1"));

        let changed = store.update(1, &RecordPatch::new().name("X")).unwrap();
        assert_eq!(changed, vec!["Name".to_string()]);
        assert_eq!(store.get(1).unwrap().name(), Some("X"));
        assert_eq!(store.get(1).unwrap().description(), Some("Desc1"));
    }

    #[test]
    fn test_update_missing_id() {
        let mut store = sample_store();
        let before = store.list().to_vec();

        let err = store.update(42, &RecordPatch::new().name("X")).unwrap_err();
        assert!(matches!(err, CatalogError::RecordNotFound(42)));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_update_rejects_unknown_field_without_partial_write() {
        let mut store = sample_store();

        let patch = RecordPatch::new().name("Changed").with("Price", "3");
        assert!(matches!(
            store.update(1, &patch),
            Err(CatalogError::Validation(_))
        ));
        assert_eq!(store.get(1).unwrap().name(), Some("Item1"));

        let patch = RecordPatch::new().with("id", "5");
        assert!(matches!(
            store.update(1, &patch),
            Err(CatalogError::Validation(ref m)) if m == "ID cannot be changed"
        ));
    }

    #[test]
    fn test_delete_keeps_order_and_index() {
        let mut store = sample_store();
        store.add(Record::new(3, "Item3", "Desc3")).unwrap();

        let removed = store.delete(1).unwrap();
        assert_eq!(removed.id, 1);

        let ids: Vec<RecordId> = store.list().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(store.get(3).unwrap().name(), Some("Item3"));
        assert!(matches!(store.delete(1), Err(CatalogError::RecordNotFound(1))));
    }

    #[test]
    fn test_next_id() {
        assert_eq!(CatalogStore::default().next_id(), 1);

        let mut store = sample_store();
        store.add(Record::new(10, "Ten", "tenth")).unwrap();
        assert_eq!(store.next_id(), 11);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.csv");

        let mut store = sample_store();
        store
            .add(Record::new(3, "Item, with comma", "Says \"quoted\""))
            .unwrap();
        store.save(&path).unwrap();
        assert!(!store.is_dirty());

        let reloaded = CatalogStore::load(&path).unwrap();
        assert_eq!(reloaded.list(), store.list());
        assert_eq!(reloaded.schema(), store.schema());
    }

    #[test]
    fn test_save_keeps_header_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_catalog(&temp_dir, "Name,Category,id\nBridge,Landmark,4\n");

        let mut store = CatalogStore::load(&path).unwrap();
        store
            .add(Record::with_fields(
                5,
                [("Name", "Falls"), ("Category", "Waterfall")],
            ))
            .unwrap();
        store.save_to_source().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Name,Category,id\nBridge,Landmark,4\nFalls,Waterfall,5\n");
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let original = "ID,Name,Description\n1,Item1,Desc1\n2,Item2,Desc2\n";
        let path = write_catalog(&temp_dir, original);

        let mut store = CatalogStore::load(&path).unwrap();
        store.add(Record::new(3, "Item3", "Desc3")).unwrap();

        // Target is an existing directory, so replacing it fails
        let dir_target = temp_dir.path().join("taken");
        fs::create_dir(&dir_target).unwrap();
        assert!(matches!(store.save(&dir_target), Err(CatalogError::Io(_))));

        // Parent is a regular file, so it cannot be created
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        assert!(store.save(blocker.join("catalog.csv")).is_err());

        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert!(store.is_dirty());
        assert_eq!(store.path(), Some(path.as_path()));
        assert_eq!(store.len(), 3);

        // No temp files left behind next to the catalog
        let mut entries: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        entries.sort();
        assert_eq!(entries, vec!["blocker", "catalog.csv", "taken"]);

        store.save_to_source().unwrap();
        assert!(!store.is_dirty());
        assert_eq!(CatalogStore::load(&path).unwrap().len(), 3);
    }

    #[test]
    fn test_save_to_source_without_file() {
        let mut store = sample_store();
        assert!(matches!(
            store.save_to_source(),
            Err(CatalogError::Config(_))
        ));
    }
}
