//! Static sample projects used to exercise the front end

use super::projects::NewProject;
use super::NoArgs;
use crate::functions::Registry;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Fixed sample projects; no store access
pub fn get_all() -> Vec<NewProject> {
    vec![
        NewProject {
            title: "Terminal Portfolio".to_string(),
            description: "A keyboard-driven portfolio rendered in the browser".to_string(),
            long_description: Some(
                "Command palette navigation, **markdown** project pages and a pixel gallery."
                    .to_string(),
            ),
            image_url: None,
            tags: strings(&["rust", "axum", "markdown"]),
            category: "web".to_string(),
            github_url: Some("https://github.com/example/terminal-portfolio".to_string()),
            live_url: None,
            featured: true,
            order: 1,
        },
        NewProject {
            title: "Neon Shader Lab".to_string(),
            description: "Real-time glow effects for canvas backgrounds".to_string(),
            long_description: None,
            image_url: Some("https://img.example.com/neon-lab.png".to_string()),
            tags: strings(&["webgl", "shaders"]),
            category: "graphics".to_string(),
            github_url: None,
            live_url: Some("https://example.com/neon".to_string()),
            featured: true,
            order: 2,
        },
        NewProject {
            title: "Film Scanner Toolkit".to_string(),
            description: "Batch tools for cataloguing scanned negatives".to_string(),
            long_description: None,
            image_url: None,
            tags: strings(&["cli", "photography"]),
            category: "tools".to_string(),
            github_url: Some("https://github.com/example/film-scanner".to_string()),
            live_url: None,
            featured: false,
            order: 3,
        },
    ]
}

pub(crate) fn register(registry: &mut Registry) {
    registry.query(
        "testingData:getAll",
        super::no_args(),
        |_ctx, _: NoArgs| -> crate::Result<Vec<NewProject>> { Ok(get_all()) },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_orders_are_distinct() {
        let data = get_all();
        let mut orders: Vec<i64> = data.iter().map(|p| p.order).collect();
        orders.dedup();
        assert_eq!(orders.len(), data.len());
        assert!(data.iter().any(|p| p.featured));
    }
}
