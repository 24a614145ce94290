//! Photography items and category grouping

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{
    create_args, id_args, no_args, sort_by_order, update_args, IdArgs, NoArgs, Ranked, UpdateArgs,
};
use crate::error::Result;
use crate::functions::Registry;
use crate::schema::{field, photography_fields, Validator, PHOTOGRAPHY};
use crate::store::{Doc, DocumentId, MutationCtx, Query, QueryCtx, Reader};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotographyItem {
    pub title: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub order: i64,
    pub featured: bool,
}

impl Ranked for PhotographyItem {
    fn rank(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotographyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

/// Category name to its items, each group sorted by `order`
pub type PhotographyGroups = IndexMap<String, Vec<Doc<PhotographyItem>>>;

#[derive(Debug, Deserialize)]
pub struct CategoryArgs {
    pub category: String,
}

/// Every item, sorted by `order` after retrieval
pub fn get_all(ctx: &QueryCtx<'_>) -> Result<Vec<Doc<PhotographyItem>>> {
    let mut items: Vec<Doc<PhotographyItem>> = ctx.query(PHOTOGRAPHY, &Query::full_scan())?;
    sort_by_order(&mut items);
    Ok(items)
}

pub fn get_featured(ctx: &QueryCtx<'_>) -> Result<Vec<Doc<PhotographyItem>>> {
    let mut items: Vec<Doc<PhotographyItem>> =
        ctx.query(PHOTOGRAPHY, &Query::index("by_featured").eq("featured", true))?;
    sort_by_order(&mut items);
    Ok(items)
}

pub fn get_by_category(ctx: &QueryCtx<'_>, category: &str) -> Result<Vec<Doc<PhotographyItem>>> {
    let mut items: Vec<Doc<PhotographyItem>> = ctx.query(
        PHOTOGRAPHY,
        &Query::index("by_category").eq("category", category),
    )?;
    sort_by_order(&mut items);
    Ok(items)
}

/// Partition every item by category
///
/// Groups appear in the order of their lowest-ranked item. Categories with
/// no items never appear.
pub fn get_grouped_by_category(ctx: &QueryCtx<'_>) -> Result<PhotographyGroups> {
    Ok(group_by_category(get_all(ctx)?))
}

fn group_by_category(items: Vec<Doc<PhotographyItem>>) -> PhotographyGroups {
    let mut groups = PhotographyGroups::new();
    for item in items {
        groups
            .entry(item.fields.category.clone())
            .or_default()
            .push(item);
    }
    groups
}

pub fn get_by_id(ctx: &QueryCtx<'_>, id: &DocumentId) -> Result<Option<Doc<PhotographyItem>>> {
    ctx.get(PHOTOGRAPHY, id)
}

pub fn create(ctx: &MutationCtx<'_>, item: &PhotographyItem) -> Result<DocumentId> {
    ctx.insert(PHOTOGRAPHY, item)
}

pub fn update(ctx: &MutationCtx<'_>, id: &DocumentId, patch: &PhotographyPatch) -> Result<()> {
    ctx.patch(PHOTOGRAPHY, id, patch)
}

pub fn remove(ctx: &MutationCtx<'_>, id: &DocumentId) -> Result<()> {
    ctx.delete(PHOTOGRAPHY, id)
}

pub(crate) fn register(registry: &mut Registry) {
    registry.query("photography:getAll", no_args(), |ctx, _: NoArgs| {
        get_all(ctx)
    });
    registry.query("photography:getFeatured", no_args(), |ctx, _: NoArgs| {
        get_featured(ctx)
    });
    registry.query(
        "photography:getByCategory",
        Validator::object(vec![field("category", Validator::String)]),
        |ctx, args: CategoryArgs| get_by_category(ctx, &args.category),
    );
    registry.query(
        "photography:getGroupedByCategory",
        no_args(),
        |ctx, _: NoArgs| get_grouped_by_category(ctx),
    );
    registry.query(
        "photography:getById",
        id_args(PHOTOGRAPHY),
        |ctx, args: IdArgs| get_by_id(ctx, &args.id),
    );
    registry.mutation(
        "photography:create",
        create_args(photography_fields(), &[]),
        |ctx, item: PhotographyItem| create(ctx, &item),
    );
    registry.mutation(
        "photography:update",
        update_args(PHOTOGRAPHY, photography_fields(), &[]),
        |ctx, args: UpdateArgs<PhotographyPatch>| update(ctx, &args.id, &args.patch),
    );
    registry.mutation(
        "photography:remove",
        id_args(PHOTOGRAPHY),
        |ctx, args: IdArgs| remove(ctx, &args.id),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::store::MemoryStore;
    use std::collections::HashSet;

    fn photo(title: &str, category: &str, order: i64, featured: bool) -> PhotographyItem {
        PhotographyItem {
            title: title.to_string(),
            image_url: format!("https://img.example.com/{}.jpg", title),
            description: None,
            category: category.to_string(),
            order,
            featured,
        }
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        for item in [
            photo("dunes", "landscape", 4, false),
            photo("portrait-1", "portrait", 2, true),
            photo("ridge", "landscape", 1, true),
            photo("street-1", "street", 5, false),
            photo("portrait-2", "portrait", 3, false),
        ] {
            create(&m, &item).unwrap();
        }
        store
    }

    #[test]
    fn test_get_all_sorted() {
        let store = seeded();
        let orders: Vec<i64> = get_all(&QueryCtx::new(&store))
            .unwrap()
            .iter()
            .map(|d| d.fields.order)
            .collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_grouping_partitions_collection() {
        let store = seeded();
        let ctx = QueryCtx::new(&store);
        let groups = get_grouped_by_category(&ctx).unwrap();

        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["landscape", "portrait", "street"]);

        let mut seen = HashSet::new();
        let mut total = 0;
        for (category, items) in &groups {
            assert!(items.windows(2).all(|w| w[0].fields.order <= w[1].fields.order));
            for item in items {
                assert_eq!(&item.fields.category, category);
                assert!(seen.insert(item.id.clone()));
                total += 1;
            }
        }
        assert_eq!(total, get_all(&ctx).unwrap().len());
    }

    #[test]
    fn test_grouping_empty_collection() {
        let store = MemoryStore::new(Schema::portfolio());
        assert!(get_grouped_by_category(&QueryCtx::new(&store))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_featured_and_category() {
        let store = seeded();
        let ctx = QueryCtx::new(&store);
        let featured: Vec<String> = get_featured(&ctx)
            .unwrap()
            .into_iter()
            .map(|d| d.fields.title)
            .collect();
        assert_eq!(featured, vec!["ridge", "portrait-1"]);

        let portraits = get_by_category(&ctx, "portrait").unwrap();
        assert_eq!(portraits.len(), 2);
        assert_eq!(portraits[0].fields.title, "portrait-1");
    }
}
