//! Blog posts
//!
//! Two rules hold for every stored post: `slug` is unique across the table,
//! and `publishedAt` is present exactly when `published` is true.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{id_args, no_args, now_millis, update_args, IdArgs, NoArgs, UpdateArgs};
use crate::error::{Error, Result};
use crate::functions::Registry;
use crate::schema::{author, blog_post_fields, field, optional, Validator, BLOG_POSTS};
use crate::store::{Doc, DocumentId, MutationCtx, Order, Query, QueryCtx, Reader, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    /// Markdown source
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<i64>,
    /// Estimated minutes
    pub read_time: i64,
    pub author: Author,
}

/// Fields supplied when creating a post; the slug defaults to the slugified title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub read_time: i64,
    pub author: Author,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

#[derive(Debug, Deserialize)]
pub struct SlugArgs {
    pub slug: String,
}

/// Published posts, newest first
pub fn get_published(ctx: &QueryCtx<'_>) -> Result<Vec<Doc<BlogPost>>> {
    let mut posts: Vec<Doc<BlogPost>> =
        ctx.query(BLOG_POSTS, &Query::index("by_published").eq("published", true))?;
    posts.sort_by(|a, b| b.fields.published_at.cmp(&a.fields.published_at));
    Ok(posts)
}

/// Every post including drafts, newest first
pub fn get_all(ctx: &QueryCtx<'_>) -> Result<Vec<Doc<BlogPost>>> {
    ctx.query(BLOG_POSTS, &Query::full_scan().order(Order::Desc))
}

pub fn get_by_slug(ctx: &QueryCtx<'_>, slug: &str) -> Result<Option<Doc<BlogPost>>> {
    find_by_slug(ctx, slug)
}

pub fn get_by_id(ctx: &QueryCtx<'_>, id: &DocumentId) -> Result<Option<Doc<BlogPost>>> {
    ctx.get(BLOG_POSTS, id)
}

fn find_by_slug<R: Reader>(ctx: &R, slug: &str) -> Result<Option<Doc<BlogPost>>> {
    let posts: Vec<Doc<BlogPost>> =
        ctx.query(BLOG_POSTS, &Query::index("by_slug").eq("slug", slug))?;
    Ok(posts.into_iter().next())
}

fn ensure_slug_free(ctx: &MutationCtx<'_>, slug: &str, owner: Option<&DocumentId>) -> Result<()> {
    match find_by_slug(ctx, slug)? {
        Some(existing) if Some(&existing.id) != owner => Err(Error::Conflict(format!(
            "slug \"{}\" is already used by post {}",
            slug, existing.id
        ))),
        _ => Ok(()),
    }
}

/// Insert a post, deriving its slug and stamping `publishedAt` when published
pub fn create(ctx: &MutationCtx<'_>, post: NewBlogPost) -> Result<DocumentId> {
    let slug = match post.slug {
        Some(slug) => slug,
        None => slug::slugify(&post.title),
    };
    ensure_slug_free(ctx, &slug, None)?;

    let record = BlogPost {
        title: post.title,
        slug,
        excerpt: post.excerpt,
        content: post.content,
        cover_image_url: post.cover_image_url,
        tags: post.tags,
        published: post.published,
        published_at: post.published.then(now_millis),
        read_time: post.read_time,
        author: post.author,
    };
    ctx.insert(BLOG_POSTS, &record)
}

/// Apply a partial update, keeping slug uniqueness and the `publishedAt` rule
///
/// Publishing a draft stamps `publishedAt`; unpublishing clears it.
/// Republishing an already published post keeps the original stamp.
pub fn update(ctx: &MutationCtx<'_>, id: &DocumentId, patch: &BlogPostPatch) -> Result<()> {
    let existing: Doc<BlogPost> = ctx.get(BLOG_POSTS, id)?.ok_or_else(|| StoreError::NotFound {
        table: BLOG_POSTS.to_string(),
        id: id.clone(),
    })?;

    if let Some(slug) = &patch.slug {
        ensure_slug_free(ctx, slug, Some(id))?;
    }

    let mut fields: Map<String, Value> = match serde_json::to_value(patch)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    match patch.published {
        Some(true) if !existing.fields.published => {
            fields.insert("publishedAt".to_string(), Value::from(now_millis()));
        }
        Some(false) => {
            fields.insert("publishedAt".to_string(), Value::Null);
        }
        _ => {}
    }

    ctx.patch(BLOG_POSTS, id, &fields)
}

pub fn remove(ctx: &MutationCtx<'_>, id: &DocumentId) -> Result<()> {
    ctx.delete(BLOG_POSTS, id)
}

fn new_post_args() -> Validator {
    Validator::object(vec![
        field("title", Validator::String),
        optional("slug", Validator::String),
        field("excerpt", Validator::String),
        field("content", Validator::String),
        optional("coverImageUrl", Validator::String),
        field("tags", Validator::array(Validator::String)),
        field("published", Validator::Boolean),
        field("readTime", Validator::Integer),
        field("author", author()),
    ])
}

pub(crate) fn register(registry: &mut Registry) {
    registry.query("blog:getPublished", no_args(), |ctx, _: NoArgs| {
        get_published(ctx)
    });
    registry.query("blog:getAll", no_args(), |ctx, _: NoArgs| get_all(ctx));
    registry.query(
        "blog:getBySlug",
        Validator::object(vec![field("slug", Validator::String)]),
        |ctx, args: SlugArgs| get_by_slug(ctx, &args.slug),
    );
    registry.query("blog:getById", id_args(BLOG_POSTS), |ctx, args: IdArgs| {
        get_by_id(ctx, &args.id)
    });
    registry.mutation("blog:create", new_post_args(), |ctx, post: NewBlogPost| {
        create(ctx, post)
    });
    registry.mutation(
        "blog:update",
        update_args(BLOG_POSTS, blog_post_fields(), &["publishedAt"]),
        |ctx, args: UpdateArgs<BlogPostPatch>| update(ctx, &args.id, &args.patch),
    );
    registry.mutation("blog:remove", id_args(BLOG_POSTS), |ctx, args: IdArgs| {
        remove(ctx, &args.id)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::store::MemoryStore;

    fn draft(title: &str) -> NewBlogPost {
        NewBlogPost {
            title: title.to_string(),
            slug: None,
            excerpt: "excerpt".to_string(),
            content: "# Heading\n\nBody".to_string(),
            cover_image_url: None,
            tags: vec!["rust".to_string()],
            published: false,
            read_time: 4,
            author: Author {
                name: "Ada".to_string(),
                avatar_url: None,
            },
        }
    }

    #[test]
    fn test_slug_derived_and_unique() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        let id = create(&m, draft("Hello World")).unwrap();

        let post = get_by_slug(&QueryCtx::new(&store), "hello-world")
            .unwrap()
            .unwrap();
        assert_eq!(post.id, id);

        let err = create(&m, draft("Hello, World!")).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn test_published_at_only_when_published() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        let ctx = QueryCtx::new(&store);

        let id = create(&m, draft("Draft")).unwrap();
        assert_eq!(get_by_id(&ctx, &id).unwrap().unwrap().fields.published_at, None);
        assert!(get_published(&ctx).unwrap().is_empty());

        let publish = BlogPostPatch {
            published: Some(true),
            ..Default::default()
        };
        update(&m, &id, &publish).unwrap();
        let stamped = get_by_id(&ctx, &id).unwrap().unwrap().fields.published_at;
        assert!(stamped.is_some());

        // Republishing keeps the first stamp
        update(&m, &id, &publish).unwrap();
        assert_eq!(
            get_by_id(&ctx, &id).unwrap().unwrap().fields.published_at,
            stamped
        );

        let unpublish = BlogPostPatch {
            published: Some(false),
            ..Default::default()
        };
        update(&m, &id, &unpublish).unwrap();
        let post = get_by_id(&ctx, &id).unwrap().unwrap();
        assert!(!post.fields.published);
        assert_eq!(post.fields.published_at, None);
    }

    #[test]
    fn test_update_slug_conflict_and_self() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        let first = create(&m, draft("First")).unwrap();
        create(&m, draft("Second")).unwrap();

        let same = BlogPostPatch {
            slug: Some("first".to_string()),
            ..Default::default()
        };
        assert!(update(&m, &first, &same).is_ok());

        let taken = BlogPostPatch {
            slug: Some("second".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            update(&m, &first, &taken),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn test_update_missing_post() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        let err = update(&m, &DocumentId::new("gone"), &BlogPostPatch::default()).unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_published_newest_first() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        let mut older = draft("Older");
        older.published = true;
        create(&m, older).unwrap();
        let mut newer = draft("Newer");
        newer.published = true;
        create(&m, newer).unwrap();
        create(&m, draft("Hidden")).unwrap();

        let titles: Vec<String> = get_published(&QueryCtx::new(&store))
            .unwrap()
            .into_iter()
            .map(|d| d.fields.title)
            .collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"Older".to_string()));
        assert!(titles.contains(&"Newer".to_string()));
    }
}
