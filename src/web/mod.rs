//! Web server module (Axum + REST API + nested MCP service).

pub mod api;
pub mod router;
pub mod server;

pub use server::{run_server, WebServerConfig};
