//! REST endpoints for agent registration.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::registry::{Agent, SharedRegistry};
use crate::tools::short_id;

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub session_id: String,
    pub base_folder: String,
    pub name: Option<String>,
}

/// Registration response.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub agent: Agent,
}

/// Unregistration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnregisterRequest {
    pub session_id: String,
}

/// Register an agent session.
pub async fn register(
    State(registry): State<SharedRegistry>,
    Json(payload): Json<RegisterRequest>,
) -> Json<RegisterResponse> {
    let agent = registry.register_agent(
        &payload.session_id,
        &payload.base_folder,
        payload.name.as_deref(),
    );
    tracing::info!(
        "Agent registered: {} ({}) from {}",
        agent.name,
        short_id(&agent.session_id),
        agent.base_folder
    );

    Json(RegisterResponse {
        success: true,
        agent,
    })
}

/// Unregister an agent session.
pub async fn unregister(
    State(registry): State<SharedRegistry>,
    Json(payload): Json<UnregisterRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let agent = registry.get_agent(&payload.session_id);

    if registry.unregister_agent(&payload.session_id) {
        let label = agent
            .map(|a| a.name)
            .unwrap_or_else(|| short_id(&payload.session_id));
        tracing::info!("Agent unregistered: {}", label);
        Ok(Json(json!({ "success": true })))
    } else {
        tracing::warn!(
            "Failed to unregister: {} (not found)",
            short_id(&payload.session_id)
        );
        Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Agent not found" })),
        ))
    }
}
