//! HTTP front for the query and mutation endpoints

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::functions::FunctionKind;
use crate::store::StoreError;
use crate::{Error, Folio};

/// Body of `/api/query` and `/api/mutation`
#[derive(Debug, Deserialize)]
pub struct CallRequest {
    pub path: String,
    #[serde(default)]
    pub args: Value,
}

/// Outcome of an endpoint call
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CallResponse {
    Success {
        value: Value,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct MarkdownRequest {
    pub markdown: String,
}

#[derive(Debug, Serialize)]
pub struct MarkdownResponse {
    pub html: String,
}

/// HTTP status for a failed call
pub fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::UnknownFunction(_) => StatusCode::NOT_FOUND,
        Error::WrongFunctionKind { .. } => StatusCode::METHOD_NOT_ALLOWED,
        Error::Conflict(_) => StatusCode::CONFLICT,
        Error::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        Error::Store(_) | Error::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the application router
pub fn router(folio: Folio) -> Router {
    let static_files = ServeDir::new(&folio.public_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/query", post(query_handler))
        .route("/api/mutation", post(mutation_handler))
        .route("/api/markdown", post(markdown_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(folio))
}

/// Start the server
pub async fn start(folio: Folio, ip: &str, port: u16) -> Result<()> {
    let app = router(folio);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn query_handler(
    State(folio): State<Arc<Folio>>,
    Json(request): Json<CallRequest>,
) -> Response {
    dispatch(folio, FunctionKind::Query, request).await
}

async fn mutation_handler(
    State(folio): State<Arc<Folio>>,
    Json(request): Json<CallRequest>,
) -> Response {
    dispatch(folio, FunctionKind::Mutation, request).await
}

/// Run the call on the blocking pool; the store locks and writes its snapshot
async fn dispatch(folio: Arc<Folio>, kind: FunctionKind, request: CallRequest) -> Response {
    let CallRequest { path, args } = request;
    let task_path = path.clone();
    let joined = tokio::task::spawn_blocking(move || match kind {
        FunctionKind::Query => folio.query(&task_path, args),
        FunctionKind::Mutation => folio.mutation(&task_path, args),
    })
    .await;

    let result = match joined {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("{} {} did not complete: {}", kind, path, e);
            let body = CallResponse::Error {
                error_message: "Internal server error".to_string(),
            };
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
    };

    match result {
        Ok(value) => (StatusCode::OK, Json(CallResponse::Success { value })).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!("{} {} failed: {}", kind, path, e);
            }
            let body = CallResponse::Error {
                error_message: e.to_string(),
            };
            (status, Json(body)).into_response()
        }
    }
}

async fn markdown_handler(
    State(folio): State<Arc<Folio>>,
    Json(request): Json<MarkdownRequest>,
) -> Json<MarkdownResponse> {
    Json(MarkdownResponse {
        html: folio.render_markdown(&request.markdown),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Folio::in_memory(SiteConfig::default()))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_query_success() {
        let (status, body) = post_json(
            app(),
            "/api/query",
            json!({ "path": "projects:getAll", "args": {} }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "success", "value": [] }));
    }

    #[tokio::test]
    async fn test_mutation_then_query() {
        let folio = Folio::in_memory(SiteConfig::default());
        let (status, body) = post_json(
            router(folio.clone()),
            "/api/mutation",
            json!({
                "path": "photography:create",
                "args": {
                    "title": "Dunes",
                    "imageUrl": "/img/dunes.jpg",
                    "category": "landscape",
                    "order": 1,
                    "featured": true
                }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["value"].is_string());

        let (_, body) = post_json(
            router(folio),
            "/api/query",
            json!({ "path": "photography:getGroupedByCategory" }),
        )
        .await;
        assert_eq!(body["value"]["landscape"][0]["title"], "Dunes");
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let (status, body) = post_json(
            app(),
            "/api/query",
            json!({ "path": "projects:getByCategory", "args": { "category": 7 } }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["errorMessage"]
            .as_str()
            .unwrap()
            .contains("args.category"));
    }

    #[tokio::test]
    async fn test_unknown_and_wrong_kind() {
        let (status, _) = post_json(app(), "/api/query", json!({ "path": "nope:getAll" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            post_json(app(), "/api/mutation", json!({ "path": "projects:getAll" })).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_mutations_over_http() {
        let folio = Folio::in_memory(SiteConfig::default());
        let mut calls = Vec::new();
        for order in 0..4 {
            let app = router(folio.clone());
            calls.push(tokio::spawn(async move {
                post_json(
                    app,
                    "/api/mutation",
                    json!({
                        "path": "pageContent:upsert",
                        "args": { "page": "home", "section": "hero", "body": "hello", "order": order }
                    }),
                )
                .await
            }));
        }
        for call in calls {
            let (status, _) = call.await.unwrap();
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = post_json(
            router(folio),
            "/api/query",
            json!({ "path": "pageContent:getByPage", "args": { "page": "home" } }),
        )
        .await;
        assert_eq!(body["value"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_markdown_endpoint() {
        let (status, body) =
            post_json(app(), "/api/markdown", json!({ "markdown": "# Hi" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "html": "<h1>Hi</h1>" }));
    }
}
