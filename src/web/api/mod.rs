//! REST API endpoints module.
//!
//! These endpoints bypass the tool layer and call registration on the
//! registry directly, so shell hooks can curl them without speaking MCP.

pub mod agents;

pub use agents::{register, unregister};
