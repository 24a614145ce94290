//! Table declarations for the portfolio collections

use super::validator::{field, optional, FieldDef, Validator};
use super::TableDef;

pub const PROJECTS: &str = "projects";
pub const NEON_PROJECTS: &str = "neonProjects";
pub const PHOTOGRAPHY: &str = "photography";
pub const PIXEL_GALLERY: &str = "pixelGallery";
pub const BLOG_POSTS: &str = "blogPosts";
pub const PAGE_CONTENT: &str = "pageContent";

/// Tile patterns accepted by the pixel gallery
pub const PIXEL_PATTERNS: &[&str] = &["checkerboard", "stripes", "dots", "grid"];

fn strings() -> Validator {
    Validator::array(Validator::String)
}

pub fn project_fields() -> Vec<FieldDef> {
    vec![
        field("title", Validator::String),
        field("description", Validator::String),
        optional("longDescription", Validator::String),
        optional("imageUrl", Validator::String),
        field("tags", strings()),
        field("category", Validator::String),
        optional("githubUrl", Validator::String),
        optional("liveUrl", Validator::String),
        field("featured", Validator::Boolean),
        field("order", Validator::Integer),
        field("createdAt", Validator::Integer),
    ]
}

pub fn projects_table() -> TableDef {
    TableDef::new(PROJECTS, Validator::object(project_fields()))
        .index("by_featured", &["featured"])
        .index("by_category", &["category"])
        .index("by_order", &["order"])
}

pub fn color_scheme() -> Validator {
    Validator::object(vec![
        field("primary", Validator::String),
        field("secondary", Validator::String),
        field("accent", Validator::String),
    ])
}

pub fn neon_project_fields() -> Vec<FieldDef> {
    vec![
        field("title", Validator::String),
        field("category", Validator::String),
        field("description", Validator::String),
        field("colorScheme", color_scheme()),
        optional("insights", strings()),
        field("order", Validator::Integer),
        field("createdAt", Validator::Integer),
    ]
}

pub fn neon_projects_table() -> TableDef {
    TableDef::new(NEON_PROJECTS, Validator::object(neon_project_fields()))
        .index("by_order", &["order"])
        .index("by_category", &["category"])
}

pub fn photography_fields() -> Vec<FieldDef> {
    vec![
        field("title", Validator::String),
        field("imageUrl", Validator::String),
        optional("description", Validator::String),
        field("category", Validator::String),
        field("order", Validator::Integer),
        field("featured", Validator::Boolean),
    ]
}

pub fn photography_table() -> TableDef {
    TableDef::new(PHOTOGRAPHY, Validator::object(photography_fields()))
        .index("by_category", &["category"])
        .index("by_featured", &["featured"])
        .index("by_order", &["order"])
}

pub fn pixel_gallery_fields() -> Vec<FieldDef> {
    vec![
        field("title", Validator::String),
        field("subtitle", Validator::String),
        field("color", Validator::String),
        field("pattern", Validator::Enum(PIXEL_PATTERNS)),
        field("order", Validator::Integer),
        field("active", Validator::Boolean),
    ]
}

pub fn pixel_gallery_table() -> TableDef {
    TableDef::new(PIXEL_GALLERY, Validator::object(pixel_gallery_fields()))
        .index("by_order", &["order"])
        .index("by_active", &["active"])
}

pub fn author() -> Validator {
    Validator::object(vec![
        field("name", Validator::String),
        optional("avatarUrl", Validator::String),
    ])
}

pub fn blog_post_fields() -> Vec<FieldDef> {
    vec![
        field("title", Validator::String),
        field("slug", Validator::String),
        field("excerpt", Validator::String),
        field("content", Validator::String),
        optional("coverImageUrl", Validator::String),
        field("tags", strings()),
        field("published", Validator::Boolean),
        optional("publishedAt", Validator::Integer),
        field("readTime", Validator::Integer),
        field("author", author()),
    ]
}

pub fn blog_posts_table() -> TableDef {
    TableDef::new(BLOG_POSTS, Validator::object(blog_post_fields()))
        .index("by_slug", &["slug"])
        .index("by_published", &["published"])
        .index("by_published_at", &["publishedAt"])
}

pub fn page_content_fields() -> Vec<FieldDef> {
    vec![
        field("page", Validator::String),
        field("section", Validator::String),
        optional("title", Validator::String),
        field("body", Validator::String),
        field("order", Validator::Integer),
    ]
}

pub fn page_content_table() -> TableDef {
    TableDef::new(PAGE_CONTENT, Validator::object(page_content_fields()))
        .index("by_page", &["page"])
        .index("by_page_section", &["page", "section"])
}
