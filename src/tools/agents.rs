//! Agent lifecycle tools: register, unregister, list.

use std::time::{SystemTime, UNIX_EPOCH};

use super::{short_id, ToolReply};
use crate::registry::SharedRegistry;

/// Register an agent session with the relay.
///
/// Re-registering a session id replaces the prior record; there is no
/// "already exists" error.
pub fn register_agent(
    registry: &SharedRegistry,
    session_id: &str,
    base_folder: &str,
    name: Option<&str>,
) -> ToolReply {
    let agent = registry.register_agent(session_id, base_folder, name);
    tracing::info!(
        "Agent registered: {} ({}) from {}",
        agent.name,
        short_id(&agent.session_id),
        agent.base_folder
    );

    ToolReply::ok(format!(
        "Agent registered successfully:\n- Session ID: {}\n- Name: {}\n- Base Folder: {}",
        agent.session_id, agent.name, agent.base_folder
    ))
}

/// Unregister an agent session.
pub fn unregister_agent(registry: &SharedRegistry, session_id: &str) -> ToolReply {
    let agent = registry.get_agent(session_id);

    if !registry.unregister_agent(session_id) {
        tracing::warn!("Failed to unregister: {} (not found)", short_id(session_id));
        return ToolReply::error(format!(
            "Agent with session ID {} not found",
            session_id
        ));
    }

    let label = agent
        .map(|a| a.name)
        .unwrap_or_else(|| short_id(session_id));
    tracing::info!("Agent unregistered: {}", label);

    ToolReply::ok(format!("Agent {} unregistered successfully", session_id))
}

/// List all registered agents with unread counts and last activity.
pub fn list_agents(registry: &SharedRegistry) -> ToolReply {
    let agents = registry.list_agents();
    tracing::info!("List agents: {} registered", agents.len());

    if agents.is_empty() {
        return ToolReply::ok("No agents currently registered");
    }

    let text = agents
        .iter()
        .map(|agent| {
            let unread = registry.get_unread_count(&agent.session_id);
            format!(
                "{} ({}):\n  Folder: {}\n  Unread: {}\n  Last active: {}m ago",
                agent.name,
                agent.session_id,
                agent.base_folder,
                unread,
                minutes_since(agent.last_activity)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    ToolReply::ok(format!("Registered agents ({}):\n\n{}", agents.len(), text))
}

fn minutes_since(ts_ms: i64) -> i64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64;
    (now - ts_ms).max(0) / 60_000
}
