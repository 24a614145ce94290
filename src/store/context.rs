//! Typed read and write contexts handed to accessors

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Document, DocumentId, DocumentStore, Query};
use crate::error::Result;

/// A stored document decoded into its record type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doc<T> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "_creationTime")]
    pub creation_time: i64,
    #[serde(flatten)]
    pub fields: T,
}

impl<T: DeserializeOwned> Doc<T> {
    fn decode(doc: Document) -> Result<Self> {
        Ok(serde_json::from_value(doc.to_value())?)
    }
}

/// Read access shared by queries and mutations
pub trait Reader {
    fn store(&self) -> &dyn DocumentStore;

    /// Fetch one document; absent ids are `Ok(None)`
    fn get<T: DeserializeOwned>(&self, table: &str, id: &DocumentId) -> Result<Option<Doc<T>>> {
        match self.store().get(table, id)? {
            Some(doc) => Ok(Some(Doc::decode(doc)?)),
            None => Ok(None),
        }
    }

    fn query<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Result<Vec<Doc<T>>> {
        self.store()
            .query(table, query)?
            .into_iter()
            .map(Doc::decode)
            .collect()
    }
}

/// Context for read-only accessors
#[derive(Clone, Copy)]
pub struct QueryCtx<'a> {
    db: &'a dyn DocumentStore,
}

impl<'a> QueryCtx<'a> {
    pub fn new(db: &'a dyn DocumentStore) -> Self {
        Self { db }
    }
}

impl Reader for QueryCtx<'_> {
    fn store(&self) -> &dyn DocumentStore {
        self.db
    }
}

/// Context for read-write accessors
#[derive(Clone, Copy)]
pub struct MutationCtx<'a> {
    db: &'a dyn DocumentStore,
}

impl<'a> MutationCtx<'a> {
    pub fn new(db: &'a dyn DocumentStore) -> Self {
        Self { db }
    }

    pub fn insert<T: Serialize>(&self, table: &str, record: &T) -> Result<DocumentId> {
        Ok(self.db.insert(table, to_fields(record)?)?)
    }

    /// Apply the serialized fields of `patch`; fields it omits are untouched
    pub fn patch<T: Serialize>(&self, table: &str, id: &DocumentId, patch: &T) -> Result<()> {
        Ok(self.db.patch(table, id, to_fields(patch)?)?)
    }

    pub fn delete(&self, table: &str, id: &DocumentId) -> Result<()> {
        Ok(self.db.delete(table, id)?)
    }
}

impl Reader for MutationCtx<'_> {
    fn store(&self) -> &dyn DocumentStore {
        self.db
    }
}

fn to_fields<T: Serialize>(record: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "expected a record, got {}",
            other
        ))
        .into()),
    }
}
