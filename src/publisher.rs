//! Periodic publisher — pushes each tenant's full vote bank to its channel.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::model::ServerEvent;
use crate::registry::TenantRegistry;

/// One publish pass: send the complete current vote bank to every tenant
/// whose bank is non-empty. Level-triggered full sync, not a diff. Returns
/// how many tenants were published.
pub async fn publish_once(registry: &TenantRegistry) -> usize {
    let mut published = 0;
    for tenant in registry.tenants() {
        let votes = tenant.state.read().await.votes.clone();
        if votes.is_empty() {
            continue;
        }
        tenant.send(ServerEvent::VotesTick { votes });
        published += 1;
    }
    if published > 0 {
        debug!(tenants = published, "Published vote banks");
    }
    published
}

/// Spawn the recurring publish task. Runs for the process lifetime.
pub fn spawn_publish_ticker(
    registry: Arc<TenantRegistry>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            publish_once(&registry).await;
        }
    })
}
