//! Route definitions for the relay server.

use axum::{
    routing::{get, post},
    Json, Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, tower::StreamableHttpService,
};
use rmcp::transport::StreamableHttpServerConfig;
use serde_json::{json, Value};

use super::api;
use crate::mcp::RelayService;
use crate::registry::SharedRegistry;

/// Create the API router.
pub fn create_api_router() -> Router<SharedRegistry> {
    Router::new()
        .route("/register", post(api::register))
        .route("/unregister", post(api::unregister))
}

/// Create the full app router with the MCP service mounted at /mcp.
pub fn create_app_router(registry: SharedRegistry) -> Router {
    let mcp_service = StreamableHttpService::new(
        {
            let registry = registry.clone();
            move || Ok(RelayService::new(registry.clone()))
        },
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    Router::new()
        .nest("/api", create_api_router())
        .route("/health", get(health_check))
        .nest_service("/mcp", mcp_service)
        .with_state(registry)
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "crewd" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_app_router(SharedRegistry::new());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "crewd");
    }

    #[tokio::test]
    async fn test_register_returns_agent_record() {
        let registry = SharedRegistry::new();
        let app = create_app_router(registry.clone());

        let response = app
            .oneshot(post_json(
                "/api/register",
                json!({ "sessionId": "sess-1", "baseFolder": "/home/alice/backend" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["agent"]["sessionId"], "sess-1");
        assert_eq!(body["agent"]["name"], "backend");
        assert_eq!(registry.list_agents().len(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_missing_fields() {
        let app = create_app_router(SharedRegistry::new());

        let response = app
            .oneshot(post_json(
                "/api/register",
                json!({ "sessionId": "sess-1" }),
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_unregister_roundtrip() {
        let registry = SharedRegistry::new();
        registry.register_agent("sess-1", "/work/api", None);
        let app = create_app_router(registry);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/unregister",
                json!({ "sessionId": "sess-1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], true);

        let response = app
            .oneshot(post_json(
                "/api/unregister",
                json!({ "sessionId": "sess-1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Agent not found");
    }
}
