//! Document store boundary
//!
//! The store owns all persisted state. Accessors reach it only through the
//! [`DocumentStore`] primitives, wrapped in a [`QueryCtx`] or [`MutationCtx`]
//! that is passed explicitly into every call.

mod context;
mod memory;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

use crate::schema::ValidationError;

pub use context::{Doc, MutationCtx, QueryCtx, Reader};
pub use memory::MemoryStore;

/// System field holding the document identifier
pub const ID_FIELD: &str = "_id";
/// System field holding the creation time in milliseconds
pub const CREATION_TIME_FIELD: &str = "_creationTime";

/// Opaque identifier assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One persisted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "_creationTime")]
    pub creation_time: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Field value, including the system fields
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            ID_FIELD => Some(Value::String(self.id.0.clone())),
            CREATION_TIME_FIELD => Some(Value::from(self.creation_time)),
            _ => self.fields.get(name).cloned(),
        }
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(ID_FIELD.to_string(), Value::String(self.id.0.clone()));
        map.insert(
            CREATION_TIME_FIELD.to_string(),
            Value::from(self.creation_time),
        );
        for (k, v) in &self.fields {
            map.insert(k.clone(), v.clone());
        }
        Value::Object(map)
    }
}

/// Scan direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// A read over one table
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Named index plus equality constraints on a prefix of its fields
    pub index: Option<(String, Vec<(String, Value)>)>,
    pub order: Order,
}

impl Query {
    /// Full scan in insertion order
    pub fn full_scan() -> Self {
        Self::default()
    }

    /// Scan an index without constraints
    pub fn index(name: &str) -> Self {
        Self {
            index: Some((name.to_string(), Vec::new())),
            order: Order::Asc,
        }
    }

    /// Add an equality constraint; the index must be set first
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        if let Some((_, constraints)) = self.index.as_mut() {
            constraints.push((field.to_string(), value.into()));
        }
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }
}

/// Errors reported by a document store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown index {index} on table {table}")]
    UnknownIndex { table: String, index: String },

    #[error("Invalid range on index {index}: {message}")]
    InvalidIndexRange { index: String, message: String },

    #[error("Document {id} not found in table {table}")]
    NotFound { table: String, id: DocumentId },

    #[error("System field {0} cannot be written")]
    ReservedField(String),

    #[error("Document does not match schema of table {table}: {source}")]
    SchemaViolation {
        table: String,
        source: ValidationError,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read/write primitives of a document store
pub trait DocumentStore: Send + Sync {
    /// Insert a document; the store assigns its id and creation time
    fn insert(&self, table: &str, fields: Map<String, Value>) -> Result<DocumentId, StoreError>;

    /// Fetch a document; an absent id is `Ok(None)`
    fn get(&self, table: &str, id: &DocumentId) -> Result<Option<Document>, StoreError>;

    /// Shallow-merge `fields` into an existing document; `null` removes a field
    fn patch(
        &self,
        table: &str,
        id: &DocumentId,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError>;

    fn delete(&self, table: &str, id: &DocumentId) -> Result<(), StoreError>;

    fn query(&self, table: &str, query: &Query) -> Result<Vec<Document>, StoreError>;
}

/// Total order over JSON values used by index scans
///
/// null < numbers < booleans < strings < arrays < objects
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Number(_) => 1,
            Value::Bool(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (xi, yi) in x.iter().zip(y.iter()) {
                let ord = compare_values(xi, yi);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}
