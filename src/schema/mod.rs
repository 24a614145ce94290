//! Declarative schema: tables, their document shapes and named indexes

mod tables;
mod validator;

use std::collections::HashMap;

pub use tables::*;
pub use validator::{field, optional, FieldDef, ValidationError, Validator};

/// A named lookup path over one or more fields
#[derive(Debug, Clone)]
pub struct IndexDef {
    pub name: &'static str,
    pub fields: Vec<&'static str>,
}

/// One table: its user-field shape and its indexes
#[derive(Debug, Clone)]
pub struct TableDef {
    pub name: &'static str,
    pub document: Validator,
    pub indexes: Vec<IndexDef>,
}

impl TableDef {
    pub fn new(name: &'static str, document: Validator) -> Self {
        Self {
            name,
            document,
            indexes: Vec::new(),
        }
    }

    /// Declare an index
    pub fn index(mut self, name: &'static str, fields: &[&'static str]) -> Self {
        self.indexes.push(IndexDef {
            name,
            fields: fields.to_vec(),
        });
        self
    }

    pub fn find_index(&self, name: &str) -> Option<&IndexDef> {
        self.indexes.iter().find(|i| i.name == name)
    }
}

/// The full set of tables a store accepts
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: HashMap<&'static str, TableDef>,
}

impl Schema {
    pub fn new(tables: Vec<TableDef>) -> Self {
        Self {
            tables: tables.into_iter().map(|t| (t.name, t)).collect(),
        }
    }

    /// The portfolio site schema
    pub fn portfolio() -> Self {
        Self::new(vec![
            projects_table(),
            neon_projects_table(),
            photography_table(),
            pixel_gallery_table(),
            blog_posts_table(),
            page_content_table(),
        ])
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tables.keys().copied()
    }
}
