//! Fill an empty projects table with the sample projects

use anyhow::Result;

use crate::content::{projects, testing_data};
use crate::store::{MutationCtx, QueryCtx};
use crate::Folio;

/// Insert the sample projects; returns how many were inserted
///
/// Does nothing when the table already has documents.
pub fn run(folio: &Folio) -> Result<usize> {
    let db = folio.store.as_ref();
    if !projects::get_all(&QueryCtx::new(db))?.is_empty() {
        tracing::info!("Projects table is not empty, skipping seed");
        return Ok(0);
    }

    let ctx = MutationCtx::new(db);
    let samples = testing_data::get_all();
    let count = samples.len();
    for project in samples {
        let id = projects::create(&ctx, project)?;
        tracing::debug!("Seeded project {}", id);
    }
    Ok(count)
}
