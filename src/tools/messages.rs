//! Message tools: send, check, broadcast.

use super::{short_id, ToolReply};
use crate::registry::SharedRegistry;

/// Send a message to another agent.
///
/// `to` may be a session id or a (partial) friendly name; the name index
/// is consulted first. The sender does not have to be registered.
pub fn send_message(
    registry: &SharedRegistry,
    from: &str,
    to: &str,
    content: &str,
) -> ToolReply {
    let recipient_id = registry
        .find_agent_by_name(to)
        .map(|a| a.session_id)
        .unwrap_or_else(|| to.to_string());

    let recipient = match registry.get_agent(&recipient_id) {
        Some(agent) => agent,
        None => return ToolReply::error(format!("Recipient not found: {}", to)),
    };

    let message = registry.send_message(from, &recipient.session_id, content);

    let sender_label = registry
        .get_agent(from)
        .map(|a| a.name)
        .unwrap_or_else(|| short_id(from));
    tracing::info!(
        "Message sent: {} -> {} ({})",
        sender_label,
        recipient.name,
        preview(content)
    );

    ToolReply::ok(format!(
        "Message sent to {} ({})\nMessage ID: {}",
        recipient.name, recipient.session_id, message.id
    ))
}

/// Check messages for an agent, marking them as read unless told not to.
pub fn check_messages(
    registry: &SharedRegistry,
    session_id: &str,
    mark_as_read: bool,
) -> ToolReply {
    let messages = registry.get_messages(session_id, mark_as_read);

    let label = registry
        .get_agent(session_id)
        .map(|a| a.name)
        .unwrap_or_else(|| short_id(session_id));
    tracing::info!(
        "Check messages: {} ({} message(s){})",
        label,
        messages.len(),
        if !messages.is_empty() && mark_as_read {
            ", marked as read"
        } else {
            ""
        }
    );

    if messages.is_empty() {
        return ToolReply::ok("No messages");
    }

    let blocks = messages
        .iter()
        .map(|msg| {
            let sender = registry
                .get_agent(&msg.from)
                .map(|a| a.name)
                .unwrap_or_else(|| msg.from.clone());
            let status = if msg.read { "[READ]" } else { "[UNREAD]" };
            format!(
                "{} From: {} ({})\nTime: {}\nMessage: {}\n---",
                status,
                sender,
                msg.from,
                format_timestamp(msg.timestamp),
                msg.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    ToolReply::ok(format!("Messages ({}):\n\n{}", messages.len(), blocks))
}

/// Broadcast a message to every other registered agent.
///
/// Unlike point-to-point sends, broadcasting requires a registered
/// sender; there is no other way to know who "everyone else" is
/// relative to. Zero recipients is a success with count 0.
pub fn broadcast_message(registry: &SharedRegistry, from: &str, content: &str) -> ToolReply {
    let sender = match registry.get_agent(from) {
        Some(agent) => agent,
        None => return ToolReply::error("Sender not found"),
    };

    let recipients: Vec<_> = registry
        .list_agents()
        .into_iter()
        .filter(|a| a.session_id != from)
        .collect();

    for agent in &recipients {
        registry.send_message(from, &agent.session_id, content);
    }

    tracing::info!(
        "Broadcast by {} to {} agent(s) ({})",
        sender.name,
        recipients.len(),
        preview(content)
    );

    ToolReply::ok(format!(
        "Broadcast message sent to {} agent(s)",
        recipients.len()
    ))
}

/// First 50 characters of the content, for log lines.
fn preview(content: &str) -> String {
    let mut taken: String = content.chars().take(50).collect();
    if taken.len() < content.len() {
        taken.push_str("...");
    }
    taken
}

fn format_timestamp(ts_ms: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ts_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts_ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::register_agent;

    fn registry_with(agents: &[(&str, &str)]) -> SharedRegistry {
        let registry = SharedRegistry::new();
        for &(session_id, name) in agents {
            register_agent(&registry, session_id, "/work/x", Some(name));
        }
        registry
    }

    #[test]
    fn test_send_by_session_id() {
        let registry = registry_with(&[("sess-1", "alpha")]);

        let reply = send_message(&registry, "sess-9", "sess-1", "hello");
        assert!(reply.success);
        assert!(reply.text.contains("Message sent to alpha (sess-1)"));
        assert!(reply.text.contains("Message ID: msg_1"));
        assert_eq!(registry.get_unread_count("sess-1"), 1);
    }

    #[test]
    fn test_send_resolves_partial_name() {
        let registry = registry_with(&[("sess-1", "Bobby"), ("sess-2", "Robert")]);

        let reply = send_message(&registry, "sess-2", "bob", "hi there");
        assert!(reply.success);
        assert_eq!(registry.get_unread_count("sess-1"), 1);
        assert_eq!(registry.get_unread_count("sess-2"), 0);
    }

    #[test]
    fn test_send_to_unknown_recipient() {
        let registry = registry_with(&[("sess-1", "alpha")]);

        let reply = send_message(&registry, "sess-1", "nobody", "lost");
        assert!(!reply.success);
        assert_eq!(reply.text, "Recipient not found: nobody");
        assert!(registry.get_messages("nobody", false).is_empty());
    }

    #[test]
    fn test_check_empty_inbox() {
        let registry = registry_with(&[("sess-1", "alpha")]);

        let reply = check_messages(&registry, "sess-1", true);
        assert!(reply.success);
        assert_eq!(reply.text, "No messages");
    }

    #[test]
    fn test_check_marks_read_and_formats() {
        let registry = registry_with(&[("sess-1", "alpha"), ("sess-2", "beta")]);
        send_message(&registry, "sess-1", "sess-2", "first");
        send_message(&registry, "sess-1", "sess-2", "second");

        let reply = check_messages(&registry, "sess-2", true);
        assert!(reply.success);
        assert!(reply.text.contains("Messages (2):"));
        assert!(reply.text.contains("From: alpha (sess-1)"));
        assert!(reply.text.contains("Message: first"));
        // Marked before formatting, so freshly read messages display as read.
        assert!(reply.text.contains("[READ]"));
        assert_eq!(registry.get_unread_count("sess-2"), 0);
    }

    #[test]
    fn test_check_without_marking_keeps_unread() {
        let registry = registry_with(&[("sess-1", "alpha"), ("sess-2", "beta")]);
        send_message(&registry, "sess-1", "sess-2", "keep unread");

        let reply = check_messages(&registry, "sess-2", false);
        assert!(reply.text.contains("[UNREAD]"));
        assert_eq!(registry.get_unread_count("sess-2"), 1);
    }

    #[test]
    fn test_check_names_unregistered_sender_by_id() {
        let registry = registry_with(&[("sess-2", "beta")]);
        registry.send_message("gone-1", "sess-2", "from the past");

        let reply = check_messages(&registry, "sess-2", true);
        assert!(reply.text.contains("From: gone-1 (gone-1)"));
    }

    #[test]
    fn test_broadcast_skips_sender() {
        let registry = registry_with(&[
            ("sess-1", "alpha"),
            ("sess-2", "beta"),
            ("sess-3", "gamma"),
            ("sess-4", "delta"),
        ]);

        let reply = broadcast_message(&registry, "sess-1", "standup in 5");
        assert!(reply.success);
        assert_eq!(reply.text, "Broadcast message sent to 3 agent(s)");
        assert_eq!(registry.get_unread_count("sess-1"), 0);
        for sid in ["sess-2", "sess-3", "sess-4"] {
            assert_eq!(registry.get_unread_count(sid), 1);
        }
    }

    #[test]
    fn test_broadcast_requires_registered_sender() {
        let registry = registry_with(&[("sess-1", "alpha")]);

        let reply = broadcast_message(&registry, "ghost", "anyone?");
        assert!(!reply.success);
        assert_eq!(reply.text, "Sender not found");
    }

    #[test]
    fn test_broadcast_with_no_other_agents() {
        let registry = registry_with(&[("sess-1", "alpha")]);

        let reply = broadcast_message(&registry, "sess-1", "hello?");
        assert!(reply.success);
        assert_eq!(reply.text, "Broadcast message sent to 0 agent(s)");
    }
}
