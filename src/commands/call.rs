//! Invoke a query or mutation from the command line

use anyhow::{Context, Result};
use serde_json::Value;

use crate::Folio;

/// Run the endpoint at `path` with JSON `args`
///
/// `args` defaults to `{}`. With `mutation` set the path is called through the
/// mutation entry point, otherwise as a query.
pub fn run(folio: &Folio, path: &str, args: Option<&str>, mutation: bool) -> Result<Value> {
    let args: Value = match args {
        Some(raw) => serde_json::from_str(raw).context("--args is not valid JSON")?,
        None => Value::Null,
    };

    let value = if mutation {
        folio.mutation(path, args)?
    } else {
        folio.query(path, args)?
    };
    Ok(value)
}
