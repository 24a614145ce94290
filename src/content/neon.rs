//! Curated "neon" showcase projects

use serde::{Deserialize, Serialize};

use super::{
    create_args, id_args, no_args, now_millis, sort_by_order, update_args, IdArgs, NoArgs,
    Ranked, UpdateArgs,
};
use crate::error::Result;
use crate::functions::Registry;
use crate::schema::{field, neon_project_fields, Validator, NEON_PROJECTS};
use crate::store::{Doc, DocumentId, MutationCtx, Query, QueryCtx, Reader};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeonProject {
    pub title: String,
    pub category: String,
    pub description: String,
    pub color_scheme: ColorScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<String>>,
    pub order: i64,
    pub created_at: i64,
}

impl Ranked for NeonProject {
    fn rank(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNeonProject {
    pub title: String,
    pub category: String,
    pub description: String,
    pub color_scheme: ColorScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<String>>,
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeonProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<ColorScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryArgs {
    pub category: String,
}

pub fn get_all(ctx: &QueryCtx<'_>) -> Result<Vec<Doc<NeonProject>>> {
    ctx.query(NEON_PROJECTS, &Query::index("by_order"))
}

pub fn get_by_category(ctx: &QueryCtx<'_>, category: &str) -> Result<Vec<Doc<NeonProject>>> {
    let mut projects: Vec<Doc<NeonProject>> = ctx.query(
        NEON_PROJECTS,
        &Query::index("by_category").eq("category", category),
    )?;
    sort_by_order(&mut projects);
    Ok(projects)
}

pub fn get_by_id(ctx: &QueryCtx<'_>, id: &DocumentId) -> Result<Option<Doc<NeonProject>>> {
    ctx.get(NEON_PROJECTS, id)
}

/// Insert a neon project; `createdAt` is stamped here, never taken from the caller
pub fn create(ctx: &MutationCtx<'_>, project: NewNeonProject) -> Result<DocumentId> {
    let record = NeonProject {
        title: project.title,
        category: project.category,
        description: project.description,
        color_scheme: project.color_scheme,
        insights: project.insights,
        order: project.order,
        created_at: now_millis(),
    };
    ctx.insert(NEON_PROJECTS, &record)
}

pub fn update(ctx: &MutationCtx<'_>, id: &DocumentId, patch: &NeonProjectPatch) -> Result<()> {
    ctx.patch(NEON_PROJECTS, id, patch)
}

pub fn remove(ctx: &MutationCtx<'_>, id: &DocumentId) -> Result<()> {
    ctx.delete(NEON_PROJECTS, id)
}

pub(crate) fn register(registry: &mut Registry) {
    registry.query("neonProjects:getAll", no_args(), |ctx, _: NoArgs| {
        get_all(ctx)
    });
    registry.query(
        "neonProjects:getByCategory",
        Validator::object(vec![field("category", Validator::String)]),
        |ctx, args: CategoryArgs| get_by_category(ctx, &args.category),
    );
    registry.query(
        "neonProjects:getById",
        id_args(NEON_PROJECTS),
        |ctx, args: IdArgs| get_by_id(ctx, &args.id),
    );
    registry.mutation(
        "neonProjects:create",
        create_args(neon_project_fields(), &["createdAt"]),
        |ctx, project: NewNeonProject| create(ctx, project),
    );
    registry.mutation(
        "neonProjects:update",
        update_args(NEON_PROJECTS, neon_project_fields(), &["createdAt"]),
        |ctx, args: UpdateArgs<NeonProjectPatch>| update(ctx, &args.id, &args.patch),
    );
    registry.mutation(
        "neonProjects:remove",
        id_args(NEON_PROJECTS),
        |ctx, args: IdArgs| remove(ctx, &args.id),
    );
}
