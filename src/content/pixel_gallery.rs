//! Pixel-gallery tiles

use serde::{Deserialize, Serialize};

use super::{
    create_args, id_args, no_args, sort_by_order, update_args, IdArgs, NoArgs, Ranked, UpdateArgs,
};
use crate::error::Result;
use crate::functions::Registry;
use crate::schema::{pixel_gallery_fields, FieldDef, Validator, PIXEL_GALLERY};
use crate::store::{Doc, DocumentId, MutationCtx, Query, QueryCtx, Reader};

/// Tile fill pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelPattern {
    Checkerboard,
    Stripes,
    Dots,
    Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelGalleryItem {
    pub title: String,
    pub subtitle: String,
    pub color: String,
    pub pattern: PixelPattern,
    pub order: i64,
    pub active: bool,
}

impl Ranked for PixelGalleryItem {
    fn rank(&self) -> i64 {
        self.order
    }
}

fn default_active() -> bool {
    true
}

/// Fields supplied when creating a tile; `active` defaults to true
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPixelGalleryItem {
    pub title: String,
    pub subtitle: String,
    pub color: String,
    pub pattern: PixelPattern,
    pub order: i64,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelGalleryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PixelPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

pub fn get_all(ctx: &QueryCtx<'_>) -> Result<Vec<Doc<PixelGalleryItem>>> {
    ctx.query(PIXEL_GALLERY, &Query::index("by_order"))
}

/// Active tiles only, by `order`
pub fn get_active(ctx: &QueryCtx<'_>) -> Result<Vec<Doc<PixelGalleryItem>>> {
    let mut items: Vec<Doc<PixelGalleryItem>> =
        ctx.query(PIXEL_GALLERY, &Query::index("by_active").eq("active", true))?;
    sort_by_order(&mut items);
    Ok(items)
}

pub fn get_by_id(ctx: &QueryCtx<'_>, id: &DocumentId) -> Result<Option<Doc<PixelGalleryItem>>> {
    ctx.get(PIXEL_GALLERY, id)
}

pub fn create(ctx: &MutationCtx<'_>, item: NewPixelGalleryItem) -> Result<DocumentId> {
    let record = PixelGalleryItem {
        title: item.title,
        subtitle: item.subtitle,
        color: item.color,
        pattern: item.pattern,
        order: item.order,
        active: item.active,
    };
    ctx.insert(PIXEL_GALLERY, &record)
}

pub fn update(ctx: &MutationCtx<'_>, id: &DocumentId, patch: &PixelGalleryPatch) -> Result<()> {
    ctx.patch(PIXEL_GALLERY, id, patch)
}

pub fn remove(ctx: &MutationCtx<'_>, id: &DocumentId) -> Result<()> {
    ctx.delete(PIXEL_GALLERY, id)
}

fn new_item_args() -> Validator {
    let fields: Vec<FieldDef> = pixel_gallery_fields()
        .into_iter()
        .map(|f| FieldDef {
            optional: f.optional || f.name == "active",
            ..f
        })
        .collect();
    create_args(fields, &[])
}

pub(crate) fn register(registry: &mut Registry) {
    registry.query("pixelGallery:getAll", no_args(), |ctx, _: NoArgs| {
        get_all(ctx)
    });
    registry.query("pixelGallery:getActive", no_args(), |ctx, _: NoArgs| {
        get_active(ctx)
    });
    registry.query(
        "pixelGallery:getById",
        id_args(PIXEL_GALLERY),
        |ctx, args: IdArgs| get_by_id(ctx, &args.id),
    );
    registry.mutation(
        "pixelGallery:create",
        new_item_args(),
        |ctx, item: NewPixelGalleryItem| create(ctx, item),
    );
    registry.mutation(
        "pixelGallery:update",
        update_args(PIXEL_GALLERY, pixel_gallery_fields(), &[]),
        |ctx, args: UpdateArgs<PixelGalleryPatch>| update(ctx, &args.id, &args.patch),
    );
    registry.mutation(
        "pixelGallery:remove",
        id_args(PIXEL_GALLERY),
        |ctx, args: IdArgs| remove(ctx, &args.id),
    );
}
