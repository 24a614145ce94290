//! Content module - per-collection queries and mutations
//!
//! Each submodule exposes plain Rust accessors taking a [`QueryCtx`] or
//! [`MutationCtx`], plus a `register` function that publishes them in the
//! [`Registry`](crate::functions::Registry) under `<module>:<name>`.

pub mod blog;
pub mod neon;
pub mod page_content;
pub mod photography;
pub mod pixel_gallery;
pub mod projects;
pub mod testing_data;

use serde::Deserialize;

use crate::schema::{field, FieldDef, Validator};
use crate::store::{Doc, DocumentId};

pub use blog::{Author, BlogPost};
pub use neon::{ColorScheme, NeonProject};
pub use page_content::PageSection;
pub use photography::PhotographyItem;
pub use pixel_gallery::{PixelGalleryItem, PixelPattern};
pub use projects::Project;

/// Records carrying a display rank
pub trait Ranked {
    fn rank(&self) -> i64;
}

/// Stable sort by `order`; equal ranks keep their retrieval order
pub fn sort_by_order<T: Ranked>(docs: &mut [Doc<T>]) {
    docs.sort_by_key(|d| d.fields.rank());
}

/// Arguments of endpoints that take none
#[derive(Debug, Deserialize)]
pub struct NoArgs {}

/// Arguments of get-by-id and delete endpoints
#[derive(Debug, Deserialize)]
pub struct IdArgs {
    pub id: DocumentId,
}

/// Arguments of update endpoints: the id plus the supplied fields
#[derive(Debug, Deserialize)]
pub struct UpdateArgs<P> {
    pub id: DocumentId,
    #[serde(flatten)]
    pub patch: P,
}

pub(crate) fn no_args() -> Validator {
    Validator::object(Vec::new())
}

pub(crate) fn id_args(table: &'static str) -> Validator {
    Validator::object(vec![field("id", Validator::Id(table))])
}

/// Record fields minus the server-stamped ones
pub(crate) fn create_args(fields: Vec<FieldDef>, stamped: &[&str]) -> Validator {
    Validator::object(
        fields
            .into_iter()
            .filter(|f| !stamped.contains(&f.name))
            .collect(),
    )
}

/// `id` plus every mutable field as optional
pub(crate) fn update_args(
    table: &'static str,
    fields: Vec<FieldDef>,
    stamped: &[&str],
) -> Validator {
    let mut shape = vec![field("id", Validator::Id(table))];
    if let Validator::Object(partial) = create_args(fields, stamped).partial() {
        shape.extend(partial);
    }
    Validator::object(shape)
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
