//! CLI commands for crewd using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;

use crate::config::load_settings;
use crate::registry::SharedRegistry;
use crate::web::WebServerConfig;

/// crewd - session-addressed message relay for coding agents.
#[derive(Parser)]
#[command(name = "crewd")]
#[command(version = "0.1.0")]
#[command(about = "crewd - message relay for coordinating coding agents", long_about = None)]
pub struct Commands {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the relay server
    Serve {
        /// Port number (overrides settings)
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind (overrides settings)
        #[arg(long)]
        host: Option<String>,
    },

    /// Check a running relay's health
    Status {
        /// Relay base URL
        #[arg(long, default_value = "http://localhost:3000")]
        url: String,
    },

    /// Register an agent over the REST API
    Register {
        /// Session ID of the agent
        #[arg(long)]
        session_id: String,

        /// Base folder path of the agent
        #[arg(long)]
        base_folder: String,

        /// Optional custom name for the agent
        #[arg(long)]
        name: Option<String>,

        /// Relay base URL
        #[arg(long, default_value = "http://localhost:3000")]
        url: String,
    },

    /// Unregister an agent over the REST API
    Unregister {
        /// Session ID of the agent
        #[arg(long)]
        session_id: String,

        /// Relay base URL
        #[arg(long, default_value = "http://localhost:3000")]
        url: String,
    },
}

impl Commands {
    /// Run the command.
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Command::Serve { port, host } => cmd_serve(*port, host.clone()).await,
            Command::Status { url } => cmd_status(url).await,
            Command::Register {
                session_id,
                base_folder,
                name,
                url,
            } => cmd_register(session_id, base_folder, name.as_deref(), url).await,
            Command::Unregister { session_id, url } => cmd_unregister(session_id, url).await,
        }
    }
}

// Command implementations

async fn cmd_serve(port: Option<u16>, host: Option<String>) -> Result<()> {
    let settings = load_settings()?;

    // Composition root: the one registry instance everything shares.
    let registry = SharedRegistry::new();

    tokio::spawn(crate::sweep::run_sweeper(
        registry.clone(),
        settings.retention.clone(),
    ));

    let config = WebServerConfig {
        port: port.unwrap_or(settings.server.port),
        host: host.unwrap_or(settings.server.host),
    };

    crate::web::run_server(config, registry).await?;
    Ok(())
}

async fn cmd_status(url: &str) -> Result<()> {
    let response = reqwest::get(format!("{}/health", url)).await?;
    let status = response.status();
    let body: serde_json::Value = response.json().await?;

    if status.is_success() {
        println!(
            "Relay at {} is {} (service: {})",
            url,
            body["status"].as_str().unwrap_or("unknown"),
            body["service"].as_str().unwrap_or("unknown")
        );
        Ok(())
    } else {
        anyhow::bail!("Relay at {} returned {}", url, status);
    }
}

async fn cmd_register(
    session_id: &str,
    base_folder: &str,
    name: Option<&str>,
    url: &str,
) -> Result<()> {
    let mut body = json!({
        "sessionId": session_id,
        "baseFolder": base_folder,
    });
    if let Some(name) = name {
        body["name"] = json!(name);
    }

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/register", url))
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        anyhow::bail!("Registration failed: {}", response.status());
    }

    let reply: serde_json::Value = response.json().await?;
    println!(
        "Registered {} as {}",
        session_id,
        reply["agent"]["name"].as_str().unwrap_or(session_id)
    );
    Ok(())
}

async fn cmd_unregister(session_id: &str, url: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/unregister", url))
        .json(&json!({ "sessionId": session_id }))
        .send()
        .await?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        anyhow::bail!("Agent {} not found", session_id);
    }
    if !response.status().is_success() {
        anyhow::bail!("Unregistration failed: {}", response.status());
    }

    println!("Unregistered {}", session_id);
    Ok(())
}
