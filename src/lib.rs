//! crewd library root.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod mcp;
pub mod registry;
pub mod sweep;
pub mod tools;
pub mod web;

pub use cli::Commands;
pub use config::{load_settings, Settings};
pub use error::{Error, Result};
pub use mcp::RelayService;
pub use registry::{Agent, Message, Registry, SharedRegistry};
pub use tools::ToolReply;
pub use web::{run_server, WebServerConfig};
