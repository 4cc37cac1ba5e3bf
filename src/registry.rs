//! In-memory registry of agent sessions and their message queues.
//!
//! The registry is the sole owner of both collections. Operations never
//! fail; absence is reported through `Option`/`bool` returns and the
//! tool layer decides what counts as a user-facing error.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// A registered agent session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Caller-assigned opaque session identifier.
    pub session_id: String,
    /// Display name, derived from the base folder when not supplied.
    pub name: String,
    /// Folder the agent is working in. Purely descriptive.
    pub base_folder: String,
    /// Registration time (unix ms).
    pub registered_at: i64,
    /// Updated on every send/receive/check by this agent (unix ms).
    pub last_activity: i64,
}

/// A relayed message between two sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Registry-assigned id (`msg_<n>`, monotonically increasing).
    pub id: String,
    /// Sender session id.
    pub from: String,
    /// Recipient session id.
    pub to: String,
    /// Message payload.
    pub content: String,
    /// Creation time (unix ms).
    pub timestamp: i64,
    /// Flipped in place when the recipient retrieves with mark-as-read.
    pub read: bool,
}

/// In-memory store of agents and messages.
///
/// Agents keep their first-registration position, so name lookups and
/// listings resolve ties by earliest registration even across
/// re-registrations of the same session id.
#[derive(Debug, Default)]
pub struct Registry {
    agents: Vec<Agent>,
    messages: Vec<Message>,
    message_id_counter: u64,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent, replacing any prior record for the session.
    ///
    /// Always succeeds. The previous `registered_at` is lost on
    /// re-registration.
    pub fn register_agent(
        &mut self,
        session_id: &str,
        base_folder: &str,
        name: Option<&str>,
    ) -> Agent {
        let name = match name {
            Some(n) => n.to_string(),
            None => derive_name_from_folder(base_folder),
        };
        let now = current_timestamp();
        let agent = Agent {
            session_id: session_id.to_string(),
            name,
            base_folder: base_folder.to_string(),
            registered_at: now,
            last_activity: now,
        };

        match self.agents.iter_mut().find(|a| a.session_id == session_id) {
            Some(slot) => *slot = agent.clone(),
            None => self.agents.push(agent.clone()),
        }
        agent
    }

    /// Remove an agent. Returns whether a removal occurred.
    ///
    /// Messages addressed to or sent by the session are untouched.
    pub fn unregister_agent(&mut self, session_id: &str) -> bool {
        let before = self.agents.len();
        self.agents.retain(|a| a.session_id != session_id);
        self.agents.len() < before
    }

    /// Look up an agent by session id.
    pub fn get_agent(&self, session_id: &str) -> Option<Agent> {
        self.agents
            .iter()
            .find(|a| a.session_id == session_id)
            .cloned()
    }

    /// Case-insensitive substring match against registered names.
    ///
    /// Returns the first match in registration order.
    pub fn find_agent_by_name(&self, name: &str) -> Option<Agent> {
        let needle = name.to_lowercase();
        self.agents
            .iter()
            .find(|a| a.name.to_lowercase().contains(&needle))
            .cloned()
    }

    /// All registered agents, in registration order.
    pub fn list_agents(&self) -> Vec<Agent> {
        self.agents.clone()
    }

    fn update_last_activity(&mut self, session_id: &str) {
        if let Some(agent) = self.agents.iter_mut().find(|a| a.session_id == session_id) {
            agent.last_activity = current_timestamp();
        }
    }

    /// Append a message with a freshly allocated id.
    ///
    /// Neither endpoint has to be registered; messages outlive their
    /// agents. Only the sender's `last_activity` is touched.
    pub fn send_message(&mut self, from: &str, to: &str, content: &str) -> Message {
        self.message_id_counter += 1;
        let message = Message {
            id: format!("msg_{}", self.message_id_counter),
            from: from.to_string(),
            to: to.to_string(),
            content: content.to_string(),
            timestamp: current_timestamp(),
            read: false,
        };
        self.messages.push(message.clone());
        self.update_last_activity(from);
        message
    }

    /// All messages addressed to a session, in send order.
    ///
    /// Flips `read` in place when `mark_as_read` is set (idempotent).
    /// Always updates the session's `last_activity`, even for an empty
    /// result.
    pub fn get_messages(&mut self, session_id: &str, mark_as_read: bool) -> Vec<Message> {
        if mark_as_read {
            for message in self.messages.iter_mut().filter(|m| m.to == session_id) {
                message.read = true;
            }
        }
        let messages: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| m.to == session_id)
            .cloned()
            .collect();
        self.update_last_activity(session_id);
        messages
    }

    /// Count of unread messages addressed to a session. No side effects.
    pub fn get_unread_count(&self, session_id: &str) -> usize {
        self.messages
            .iter()
            .filter(|m| m.to == session_id && !m.read)
            .count()
    }

    /// Drop every message the recipient has already read.
    ///
    /// Returns the count removed. Message ids are never reused.
    pub fn clear_read_messages(&mut self) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !m.read);
        before - self.messages.len()
    }
}

/// Shared handle to the one registry instance.
///
/// All callers (REST handlers, MCP service, sweeper) clone this handle;
/// every operation serializes through the lock and completes without
/// suspending.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    /// Create a handle around a fresh registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry::new())),
        }
    }

    pub fn register_agent(
        &self,
        session_id: &str,
        base_folder: &str,
        name: Option<&str>,
    ) -> Agent {
        self.inner
            .lock()
            .unwrap()
            .register_agent(session_id, base_folder, name)
    }

    pub fn unregister_agent(&self, session_id: &str) -> bool {
        self.inner.lock().unwrap().unregister_agent(session_id)
    }

    pub fn get_agent(&self, session_id: &str) -> Option<Agent> {
        self.inner.lock().unwrap().get_agent(session_id)
    }

    pub fn find_agent_by_name(&self, name: &str) -> Option<Agent> {
        self.inner.lock().unwrap().find_agent_by_name(name)
    }

    pub fn list_agents(&self) -> Vec<Agent> {
        self.inner.lock().unwrap().list_agents()
    }

    pub fn send_message(&self, from: &str, to: &str, content: &str) -> Message {
        self.inner.lock().unwrap().send_message(from, to, content)
    }

    pub fn get_messages(&self, session_id: &str, mark_as_read: bool) -> Vec<Message> {
        self.inner
            .lock()
            .unwrap()
            .get_messages(session_id, mark_as_read)
    }

    pub fn get_unread_count(&self, session_id: &str) -> usize {
        self.inner.lock().unwrap().get_unread_count(session_id)
    }

    pub fn clear_read_messages(&self) -> usize {
        self.inner.lock().unwrap().clear_read_messages()
    }
}

/// Last non-empty path segment, or "unknown" when there is none.
fn derive_name_from_folder(base_folder: &str) -> String {
    base_folder
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}
