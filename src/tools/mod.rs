//! Tool layer: the six relay operations exposed to calling agents.
//!
//! Each tool derives its request shape, calls into the registry, and
//! returns a [`ToolReply`] carrying a success flag and a human-readable
//! summary. The registry itself only hands back plain records; all
//! formatting and not-found translation happens here.

pub mod agents;
pub mod messages;

pub use agents::{list_agents, register_agent, unregister_agent};
pub use messages::{broadcast_message, check_messages, send_message};

/// Outcome of a tool invocation.
#[derive(Debug, Clone)]
pub struct ToolReply {
    pub success: bool,
    pub text: String,
}

impl ToolReply {
    /// Successful reply with summary text.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: text.into(),
        }
    }

    /// Failed reply with error text.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            success: false,
            text: text.into(),
        }
    }
}

/// Abbreviated session id for log lines.
pub(crate) fn short_id(session_id: &str) -> String {
    if session_id.chars().count() > 8 {
        format!("{}...", session_id.chars().take(8).collect::<String>())
    } else {
        session_id.to_string()
    }
}
