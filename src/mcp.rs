//! MCP surface for the relay tools, built on the rmcp SDK.
//!
//! Tool-level failures (unknown recipient, unknown sender) are returned
//! as tool results with the error flag set, never as protocol errors.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::registry::SharedRegistry;
use crate::tools::{self, ToolReply};

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAgentParams {
    /// Session ID of the agent
    pub session_id: String,
    /// Base folder path of the agent
    pub base_folder: String,
    /// Optional custom name for the agent
    pub name: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnregisterAgentParams {
    /// Session ID of the agent to unregister
    pub session_id: String,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    /// Session ID of the sender
    pub from: String,
    /// Session ID or name of the recipient
    pub to: String,
    /// Message content
    pub content: String,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckMessagesParams {
    /// Session ID to check messages for
    pub session_id: String,
    /// Mark messages as read after retrieving (default: true)
    pub mark_as_read: Option<bool>,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastMessageParams {
    /// Session ID of the sender
    pub from: String,
    /// Message content to broadcast
    pub content: String,
}

/// Relay tools exposed over MCP.
#[derive(Clone)]
pub struct RelayService {
    registry: SharedRegistry,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RelayService {
    /// Create a service over the shared registry handle.
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "register-agent",
        description = "Register a new agent with the relay"
    )]
    async fn register_agent(
        &self,
        Parameters(params): Parameters<RegisterAgentParams>,
    ) -> Result<CallToolResult, McpError> {
        let reply = tools::register_agent(
            &self.registry,
            &params.session_id,
            &params.base_folder,
            params.name.as_deref(),
        );
        Ok(convert_reply(reply))
    }

    #[tool(
        name = "unregister-agent",
        description = "Unregister an agent from the relay"
    )]
    async fn unregister_agent(
        &self,
        Parameters(params): Parameters<UnregisterAgentParams>,
    ) -> Result<CallToolResult, McpError> {
        let reply = tools::unregister_agent(&self.registry, &params.session_id);
        Ok(convert_reply(reply))
    }

    #[tool(
        name = "list-agents",
        description = "List all registered agents with their status and message counts"
    )]
    async fn list_agents(&self) -> Result<CallToolResult, McpError> {
        Ok(convert_reply(tools::list_agents(&self.registry)))
    }

    #[tool(
        name = "send-message",
        description = "Send a message to another agent (use session ID or friendly name)"
    )]
    async fn send_message(
        &self,
        Parameters(params): Parameters<SendMessageParams>,
    ) -> Result<CallToolResult, McpError> {
        let reply = tools::send_message(&self.registry, &params.from, &params.to, &params.content);
        Ok(convert_reply(reply))
    }

    #[tool(name = "check-messages", description = "Check messages for an agent")]
    async fn check_messages(
        &self,
        Parameters(params): Parameters<CheckMessagesParams>,
    ) -> Result<CallToolResult, McpError> {
        let mark_as_read = params.mark_as_read.unwrap_or(true);
        let reply = tools::check_messages(&self.registry, &params.session_id, mark_as_read);
        Ok(convert_reply(reply))
    }

    #[tool(
        name = "broadcast-message",
        description = "Send a message to all other connected agents"
    )]
    async fn broadcast_message(
        &self,
        Parameters(params): Parameters<BroadcastMessageParams>,
    ) -> Result<CallToolResult, McpError> {
        let reply = tools::broadcast_message(&self.registry, &params.from, &params.content);
        Ok(convert_reply(reply))
    }
}

fn convert_reply(reply: ToolReply) -> CallToolResult {
    if reply.success {
        CallToolResult::success(vec![Content::text(reply.text)])
    } else {
        CallToolResult::error(vec![Content::text(reply.text)])
    }
}

#[tool_handler]
impl ServerHandler for RelayService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "crewd".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("Crewd Message Relay".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Message relay for coordinating coding agents. Register with your session ID, \
                then exchange point-to-point or broadcast messages and poll check-messages \
                for your inbox."
                    .into(),
            ),
        }
    }
}
