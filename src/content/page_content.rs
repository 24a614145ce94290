//! Editable copy blocks keyed by page and section

use serde::{Deserialize, Serialize};

use super::{id_args, sort_by_order, IdArgs, Ranked};
use crate::error::Result;
use crate::functions::Registry;
use crate::schema::{field, optional, Validator, PAGE_CONTENT};
use crate::store::{Doc, DocumentId, MutationCtx, Query, QueryCtx, Reader};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSection {
    pub page: String,
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Markdown source
    pub body: String,
    pub order: i64,
}

impl Ranked for PageSection {
    fn rank(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Deserialize)]
pub struct PageArgs {
    pub page: String,
}

#[derive(Debug, Deserialize)]
pub struct SectionArgs {
    pub page: String,
    pub section: String,
}

/// Upsert arguments; an omitted `order` keeps the stored one (0 for new sections)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertSection {
    pub page: String,
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Serialize)]
struct SectionPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<i64>,
}

/// Sections of one page by `order`
pub fn get_by_page(ctx: &QueryCtx<'_>, page: &str) -> Result<Vec<Doc<PageSection>>> {
    let mut sections: Vec<Doc<PageSection>> =
        ctx.query(PAGE_CONTENT, &Query::index("by_page").eq("page", page))?;
    sort_by_order(&mut sections);
    Ok(sections)
}

pub fn get_section(
    ctx: &QueryCtx<'_>,
    page: &str,
    section: &str,
) -> Result<Option<Doc<PageSection>>> {
    find_section(ctx, page, section)
}

fn find_section<R: Reader>(ctx: &R, page: &str, section: &str) -> Result<Option<Doc<PageSection>>> {
    let found: Vec<Doc<PageSection>> = ctx.query(
        PAGE_CONTENT,
        &Query::index("by_page_section")
            .eq("page", page)
            .eq("section", section),
    )?;
    Ok(found.into_iter().next())
}

/// Patch the (page, section) document if present, otherwise insert it
pub fn upsert(ctx: &MutationCtx<'_>, args: UpsertSection) -> Result<DocumentId> {
    match find_section(ctx, &args.page, &args.section)? {
        Some(existing) => {
            let patch = SectionPatch {
                title: args.title.as_deref(),
                body: &args.body,
                order: args.order,
            };
            ctx.patch(PAGE_CONTENT, &existing.id, &patch)?;
            Ok(existing.id)
        }
        None => {
            let record = PageSection {
                page: args.page,
                section: args.section,
                title: args.title,
                body: args.body,
                order: args.order.unwrap_or(0),
            };
            ctx.insert(PAGE_CONTENT, &record)
        }
    }
}

pub fn remove(ctx: &MutationCtx<'_>, id: &DocumentId) -> Result<()> {
    ctx.delete(PAGE_CONTENT, id)
}

pub(crate) fn register(registry: &mut Registry) {
    registry.query(
        "pageContent:getByPage",
        Validator::object(vec![field("page", Validator::String)]),
        |ctx, args: PageArgs| get_by_page(ctx, &args.page),
    );
    registry.query(
        "pageContent:getSection",
        Validator::object(vec![
            field("page", Validator::String),
            field("section", Validator::String),
        ]),
        |ctx, args: SectionArgs| get_section(ctx, &args.page, &args.section),
    );
    registry.mutation(
        "pageContent:upsert",
        Validator::object(vec![
            field("page", Validator::String),
            field("section", Validator::String),
            optional("title", Validator::String),
            field("body", Validator::String),
            optional("order", Validator::Integer),
        ]),
        |ctx, args: UpsertSection| upsert(ctx, args),
    );
    registry.mutation(
        "pageContent:remove",
        id_args(PAGE_CONTENT),
        |ctx, args: IdArgs| remove(ctx, &args.id),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::store::MemoryStore;

    fn section(page: &str, section: &str, body: &str, order: Option<i64>) -> UpsertSection {
        UpsertSection {
            page: page.to_string(),
            section: section.to_string(),
            title: None,
            body: body.to_string(),
            order,
        }
    }

    #[test]
    fn test_upsert_inserts_then_patches() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        let ctx = QueryCtx::new(&store);

        let id = upsert(&m, section("about", "intro", "Hi", Some(2))).unwrap();
        let again = upsert(&m, section("about", "intro", "Hello", None)).unwrap();
        assert_eq!(id, again);

        let stored = get_section(&ctx, "about", "intro").unwrap().unwrap();
        assert_eq!(stored.fields.body, "Hello");
        assert_eq!(stored.fields.order, 2);
        assert_eq!(get_by_page(&ctx, "about").unwrap().len(), 1);
    }

    #[test]
    fn test_get_by_page_sorted_and_scoped() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        upsert(&m, section("about", "skills", "Rust", Some(2))).unwrap();
        upsert(&m, section("about", "intro", "Hi", Some(1))).unwrap();
        upsert(&m, section("contact", "intro", "Mail me", Some(0))).unwrap();

        let ctx = QueryCtx::new(&store);
        let sections: Vec<String> = get_by_page(&ctx, "about")
            .unwrap()
            .into_iter()
            .map(|d| d.fields.section)
            .collect();
        assert_eq!(sections, vec!["intro", "skills"]);
        assert!(get_section(&ctx, "about", "missing").unwrap().is_none());
    }
}
