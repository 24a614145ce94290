//! Generic portfolio projects

use serde::{Deserialize, Serialize};

use super::{
    create_args, id_args, no_args, now_millis, sort_by_order, IdArgs, NoArgs, Ranked, UpdateArgs,
};
use crate::error::Result;
use crate::functions::Registry;
use crate::schema::{field, project_fields, Validator, PROJECTS};
use crate::store::{Doc, DocumentId, MutationCtx, Query, QueryCtx, Reader};

/// Number of projects shown on the home page
pub const FEATURED_LIMIT: usize = 3;

/// A stored project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    pub featured: bool,
    pub order: i64,
    /// Milliseconds since the epoch, stamped at creation
    pub created_at: i64,
}

impl Ranked for Project {
    fn rank(&self) -> i64 {
        self.order
    }
}

/// Fields supplied when creating a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    pub featured: bool,
    pub order: i64,
}

impl NewProject {
    fn into_project(self, created_at: i64) -> Project {
        Project {
            title: self.title,
            description: self.description,
            long_description: self.long_description,
            image_url: self.image_url,
            tags: self.tags,
            category: self.category,
            github_url: self.github_url,
            live_url: self.live_url,
            featured: self.featured,
            order: self.order,
            created_at,
        }
    }
}

/// Supplied fields of a partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryArgs {
    pub category: String,
}

/// All projects by `order`
pub fn get_all(ctx: &QueryCtx<'_>) -> Result<Vec<Doc<Project>>> {
    ctx.query(PROJECTS, &Query::index("by_order"))
}

/// The first [`FEATURED_LIMIT`] featured projects by `order`
pub fn get_featured(ctx: &QueryCtx<'_>) -> Result<Vec<Doc<Project>>> {
    let mut projects: Vec<Doc<Project>> =
        ctx.query(PROJECTS, &Query::index("by_featured").eq("featured", true))?;
    sort_by_order(&mut projects);
    projects.truncate(FEATURED_LIMIT);
    Ok(projects)
}

pub fn get_by_category(ctx: &QueryCtx<'_>, category: &str) -> Result<Vec<Doc<Project>>> {
    let mut projects: Vec<Doc<Project>> =
        ctx.query(PROJECTS, &Query::index("by_category").eq("category", category))?;
    sort_by_order(&mut projects);
    Ok(projects)
}

pub fn get_by_id(ctx: &QueryCtx<'_>, id: &DocumentId) -> Result<Option<Doc<Project>>> {
    ctx.get(PROJECTS, id)
}

/// Insert a project, stamping `createdAt`
pub fn create(ctx: &MutationCtx<'_>, project: NewProject) -> Result<DocumentId> {
    ctx.insert(PROJECTS, &project.into_project(now_millis()))
}

pub fn update(ctx: &MutationCtx<'_>, id: &DocumentId, patch: &ProjectPatch) -> Result<()> {
    ctx.patch(PROJECTS, id, patch)
}

pub fn remove(ctx: &MutationCtx<'_>, id: &DocumentId) -> Result<()> {
    ctx.delete(PROJECTS, id)
}

pub(crate) fn register(registry: &mut Registry) {
    registry.query("projects:getAll", no_args(), |ctx, _: NoArgs| get_all(ctx));
    registry.query("projects:getFeatured", no_args(), |ctx, _: NoArgs| {
        get_featured(ctx)
    });
    registry.query(
        "projects:getByCategory",
        Validator::object(vec![field("category", Validator::String)]),
        |ctx, args: CategoryArgs| get_by_category(ctx, &args.category),
    );
    registry.query("projects:getById", id_args(PROJECTS), |ctx, args: IdArgs| {
        get_by_id(ctx, &args.id)
    });
    registry.mutation(
        "projects:create",
        create_args(project_fields(), &["createdAt"]),
        |ctx, project: NewProject| create(ctx, project),
    );
    registry.mutation(
        "projects:update",
        super::update_args(PROJECTS, project_fields(), &["createdAt"]),
        |ctx, args: UpdateArgs<ProjectPatch>| update(ctx, &args.id, &args.patch),
    );
    registry.mutation("projects:remove", id_args(PROJECTS), |ctx, args: IdArgs| {
        remove(ctx, &args.id)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::store::MemoryStore;

    fn sample(title: &str, order: i64, featured: bool, category: &str) -> NewProject {
        NewProject {
            title: title.to_string(),
            description: format!("{} description", title),
            long_description: None,
            image_url: None,
            tags: vec!["rust".to_string()],
            category: category.to_string(),
            github_url: Some(format!("https://github.com/example/{}", title)),
            live_url: None,
            featured,
            order,
        }
    }

    #[test]
    fn test_create_then_get() {
        let store = MemoryStore::new(Schema::portfolio());
        let id = create(&MutationCtx::new(&store), sample("alpha", 1, true, "web")).unwrap();

        let doc = get_by_id(&QueryCtx::new(&store), &id).unwrap().unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.fields.title, "alpha");
        assert_eq!(doc.fields.long_description, None);
        assert!(doc.fields.created_at > 0);
    }

    #[test]
    fn test_lists_sorted_by_order() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        for (title, order) in [("c", 30), ("a", 10), ("b", 20)] {
            create(&m, sample(title, order, false, "web")).unwrap();
        }

        let titles: Vec<String> = get_all(&QueryCtx::new(&store))
            .unwrap()
            .into_iter()
            .map(|d| d.fields.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_featured_capped_to_three() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        for order in [5, 1, 4, 2, 3] {
            create(&m, sample(&format!("p{}", order), order, true, "web")).unwrap();
        }
        create(&m, sample("hidden", 0, false, "web")).unwrap();

        let featured = get_featured(&QueryCtx::new(&store)).unwrap();
        let orders: Vec<i64> = featured.iter().map(|d| d.fields.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_by_category() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        create(&m, sample("cli", 2, false, "tools")).unwrap();
        create(&m, sample("site", 1, false, "web")).unwrap();
        create(&m, sample("lint", 1, false, "tools")).unwrap();

        let tools = get_by_category(&QueryCtx::new(&store), "tools").unwrap();
        let titles: Vec<&str> = tools.iter().map(|d| d.fields.title.as_str()).collect();
        assert_eq!(titles, vec!["lint", "cli"]);
        assert!(get_by_category(&QueryCtx::new(&store), "games")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        let id = create(&m, sample("alpha", 1, false, "web")).unwrap();
        let before = get_by_id(&QueryCtx::new(&store), &id).unwrap().unwrap();

        let patch = ProjectPatch {
            featured: Some(true),
            live_url: Some("https://alpha.dev".to_string()),
            ..Default::default()
        };
        update(&m, &id, &patch).unwrap();

        let after = get_by_id(&QueryCtx::new(&store), &id).unwrap().unwrap();
        assert!(after.fields.featured);
        assert_eq!(after.fields.live_url.as_deref(), Some("https://alpha.dev"));
        assert_eq!(after.fields.title, before.fields.title);
        assert_eq!(after.fields.github_url, before.fields.github_url);
        assert_eq!(after.fields.order, before.fields.order);
        assert_eq!(after.fields.created_at, before.fields.created_at);
        assert_eq!(after.creation_time, before.creation_time);
    }

    #[test]
    fn test_remove_then_get_is_none() {
        let store = MemoryStore::new(Schema::portfolio());
        let m = MutationCtx::new(&store);
        let id = create(&m, sample("alpha", 1, false, "web")).unwrap();
        remove(&m, &id).unwrap();
        assert!(get_by_id(&QueryCtx::new(&store), &id).unwrap().is_none());
        assert!(remove(&m, &id).is_err());
    }
}
