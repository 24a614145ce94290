//! folio-rs: content store and markdown rendering for a portfolio site
//!
//! This crate provides the data-access layer of a personal portfolio: a
//! declarative schema, a document store, typed per-collection queries and
//! mutations published as named endpoints, and a restricted markdown
//! renderer. A small HTTP server and CLI sit in front of them.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod functions;
pub mod markdown;
pub mod schema;
pub mod server;
pub mod store;

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

pub use error::{Error, Result};

use functions::{FunctionKind, Registry};
use schema::Schema;
use store::MemoryStore;

/// The main application: configuration, store handle and endpoint registry
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Static front-end directory
    pub public_dir: std::path::PathBuf,
    /// Content store
    pub store: Arc<MemoryStore>,
    /// Query and mutation endpoints
    pub registry: Arc<Registry>,
}

impl Folio {
    /// Open a site directory, loading `_config.yml` and the store snapshot
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let data_file = base_dir.join(&config.data_file);
        let store = MemoryStore::open(Schema::portfolio(), &data_file)?;
        tracing::debug!("Opened content store at {:?}", data_file);

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
            store: Arc::new(store),
            registry: Arc::new(Registry::portfolio()),
        })
    }

    /// A site with no files behind it; the store lives only in memory
    pub fn in_memory(config: config::SiteConfig) -> Self {
        let base_dir = std::path::PathBuf::from(".");
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
            store: Arc::new(MemoryStore::new(Schema::portfolio())),
            registry: Arc::new(Registry::portfolio()),
        }
    }

    /// Run a query endpoint
    pub fn query(&self, path: &str, args: Value) -> Result<Value> {
        self.registry
            .call(self.store.as_ref(), FunctionKind::Query, path, args)
    }

    /// Run a mutation endpoint
    pub fn mutation(&self, path: &str, args: Value) -> Result<Value> {
        self.registry
            .call(self.store.as_ref(), FunctionKind::Mutation, path, args)
    }

    /// Render markdown with the site renderer
    pub fn render_markdown(&self, markdown: &str) -> String {
        markdown::render(markdown)
    }
}
