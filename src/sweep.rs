//! Retention sweeper: periodically drops messages every recipient has
//! already read. Unread messages are never touched.

use std::time::Duration;
use tokio::time::sleep;

use crate::config::RetentionConfig;
use crate::registry::SharedRegistry;

/// Run the sweep loop. Returns immediately when retention is disabled,
/// otherwise loops for the process lifetime.
pub async fn run_sweeper(registry: SharedRegistry, config: RetentionConfig) {
    if !config.enabled {
        tracing::info!("Retention sweeper disabled; read messages are kept indefinitely");
        return;
    }

    tracing::info!(
        "Retention sweeper started (interval: {}s)",
        config.sweep_interval_secs
    );

    loop {
        sleep(Duration::from_secs(config.sweep_interval_secs)).await;

        let removed = registry.clear_read_messages();
        if removed > 0 {
            tracing::info!("Swept {} read message(s)", removed);
        }
    }
}
