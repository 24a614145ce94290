//! In-memory document store with an optional JSON snapshot on disk

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    compare_values, Document, DocumentId, DocumentStore, Order, Query, StoreError,
};
use crate::schema::{Schema, TableDef};

/// Snapshot file layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    last_creation_time: i64,
    tables: HashMap<String, Vec<Document>>,
}

impl Snapshot {
    /// Current snapshot format version
    const VERSION: u32 = 1;
}

#[derive(Debug, Default)]
struct Tables {
    docs: HashMap<String, Vec<Document>>,
    last_creation_time: i64,
}

/// Document store keeping every table in memory
///
/// Documents are kept in insertion order. When a snapshot path is set the
/// whole store is written to it after every successful mutation.
pub struct MemoryStore {
    schema: Schema,
    tables: RwLock<Tables>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store without persistence
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            tables: RwLock::new(Tables::default()),
            snapshot_path: None,
        }
    }

    /// Open a store backed by a snapshot file, loading it if it exists
    pub fn open<P: AsRef<Path>>(schema: Schema, path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let mut tables = Tables::default();

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;
            let snapshot: Snapshot = serde_json::from_str(&content)
                .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;
            if snapshot.version != Snapshot::VERSION {
                return Err(StoreError::Unavailable(format!(
                    "unsupported snapshot version {} in {}",
                    snapshot.version,
                    path.display()
                )));
            }
            for (name, docs) in snapshot.tables {
                if schema.table(&name).is_none() {
                    tracing::warn!("Ignoring unknown table {} in snapshot", name);
                    continue;
                }
                tables.docs.insert(name, docs);
            }
            tables.last_creation_time = snapshot.last_creation_time;
            tracing::debug!("Loaded store snapshot from {:?}", path);
        }

        Ok(Self {
            schema,
            tables: RwLock::new(tables),
            snapshot_path: Some(path),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Write the snapshot file, if one is configured
    pub fn save(&self) -> Result<(), StoreError> {
        let tables = self.read()?;
        self.persist(&tables)
    }

    fn persist(&self, tables: &Tables) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let snapshot = Snapshot {
            version: Snapshot::VERSION,
            last_creation_time: tables.last_creation_time,
            tables: tables.docs.clone(),
        };
        let unavailable = |e: &dyn std::fmt::Display| {
            StoreError::Unavailable(format!("{}: {}", path.display(), e))
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| unavailable(&e))?;
        }
        let content = serde_json::to_string_pretty(&snapshot).map_err(|e| unavailable(&e))?;
        fs::write(path, content).map_err(|e| unavailable(&e))?;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn table_def(&self, table: &str) -> Result<&TableDef, StoreError> {
        self.schema
            .table(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))
    }

    fn check_document(def: &TableDef, fields: &Map<String, Value>) -> Result<(), StoreError> {
        def.document
            .validate(&Value::Object(fields.clone()), "document")
            .map_err(|source| StoreError::SchemaViolation {
                table: def.name.to_string(),
                source,
            })
    }
}

fn check_reserved(fields: &Map<String, Value>) -> Result<(), StoreError> {
    match fields.keys().find(|k| k.starts_with('_')) {
        Some(key) => Err(StoreError::ReservedField(key.clone())),
        None => Ok(()),
    }
}

fn not_found(table: &str, id: &DocumentId) -> StoreError {
    StoreError::NotFound {
        table: table.to_string(),
        id: id.clone(),
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&self, table: &str, fields: Map<String, Value>) -> Result<DocumentId, StoreError> {
        let def = self.table_def(table)?;
        check_reserved(&fields)?;
        Self::check_document(def, &fields)?;

        let mut tables = self.write()?;
        let previous_time = tables.last_creation_time;
        let now = chrono::Utc::now().timestamp_millis();
        let creation_time = now.max(previous_time + 1);
        tables.last_creation_time = creation_time;

        let id = DocumentId::new(uuid::Uuid::new_v4().simple().to_string());
        tables
            .docs
            .entry(table.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                creation_time,
                fields,
            });

        if let Err(e) = self.persist(&tables) {
            if let Some(docs) = tables.docs.get_mut(table) {
                docs.pop();
            }
            tables.last_creation_time = previous_time;
            return Err(e);
        }
        tracing::debug!("Inserted {} into {}", id, table);
        Ok(id)
    }

    fn get(&self, table: &str, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        self.table_def(table)?;
        let tables = self.read()?;
        Ok(tables
            .docs
            .get(table)
            .and_then(|docs| docs.iter().find(|d| &d.id == id))
            .cloned())
    }

    fn patch(
        &self,
        table: &str,
        id: &DocumentId,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let def = self.table_def(table)?;
        check_reserved(&fields)?;

        let mut tables = self.write()?;
        let doc = tables
            .docs
            .get_mut(table)
            .and_then(|docs| docs.iter_mut().find(|d| &d.id == id))
            .ok_or_else(|| not_found(table, id))?;

        let mut merged = doc.fields.clone();
        for (key, value) in fields {
            if value.is_null() {
                merged.remove(&key);
            } else {
                merged.insert(key, value);
            }
        }
        Self::check_document(def, &merged)?;
        let previous = std::mem::replace(&mut doc.fields, merged);

        if let Err(e) = self.persist(&tables) {
            if let Some(doc) = tables
                .docs
                .get_mut(table)
                .and_then(|docs| docs.iter_mut().find(|d| &d.id == id))
            {
                doc.fields = previous;
            }
            return Err(e);
        }
        tracing::debug!("Patched {} in {}", id, table);
        Ok(())
    }

    fn delete(&self, table: &str, id: &DocumentId) -> Result<(), StoreError> {
        self.table_def(table)?;
        let mut tables = self.write()?;
        let docs = tables
            .docs
            .get_mut(table)
            .ok_or_else(|| not_found(table, id))?;
        let pos = docs
            .iter()
            .position(|d| &d.id == id)
            .ok_or_else(|| not_found(table, id))?;
        let removed = docs.remove(pos);

        if let Err(e) = self.persist(&tables) {
            if let Some(docs) = tables.docs.get_mut(table) {
                docs.insert(pos, removed);
            }
            return Err(e);
        }
        tracing::debug!("Deleted {} from {}", id, table);
        Ok(())
    }

    fn query(&self, table: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let def = self.table_def(table)?;
        let tables = self.read()?;
        let mut docs: Vec<Document> = tables.docs.get(table).cloned().unwrap_or_default();

        if let Some((name, constraints)) = &query.index {
            let index = def.find_index(name).ok_or_else(|| StoreError::UnknownIndex {
                table: table.to_string(),
                index: name.clone(),
            })?;
            if constraints.len() > index.fields.len() {
                return Err(StoreError::InvalidIndexRange {
                    index: name.clone(),
                    message: format!(
                        "{} constraints for {} indexed fields",
                        constraints.len(),
                        index.fields.len()
                    ),
                });
            }
            for ((field, _), expected) in constraints.iter().zip(index.fields.iter()) {
                if field != expected {
                    return Err(StoreError::InvalidIndexRange {
                        index: name.clone(),
                        message: format!("expected field {}, got {}", expected, field),
                    });
                }
            }

            docs.retain(|doc| {
                constraints.iter().all(|(field, value)| {
                    let actual = doc.get(field).unwrap_or(Value::Null);
                    compare_values(&actual, value).is_eq()
                })
            });
            // Stable sort: equal keys keep creation order
            docs.sort_by(|a, b| {
                for field in &index.fields {
                    let va = a.get(field).unwrap_or(Value::Null);
                    let vb = b.get(field).unwrap_or(Value::Null);
                    let ord = compare_values(&va, &vb);
                    if !ord.is_eq() {
                        return ord;
                    }
                }
                a.creation_time.cmp(&b.creation_time)
            });
        }

        if query.order == Order::Desc {
            docs.reverse();
        }
        tracing::debug!("Query on {} returned {} documents", table, docs.len());
        Ok(docs)
    }
}
