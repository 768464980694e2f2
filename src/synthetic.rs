//! Synthetic traffic — sinusoidal fake votes for load testing without a
//! telephony provider. Spawned from `main` only when TEST_MODE is set.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::commands;
use crate::registry::TenantRegistry;

/// How many ticks before the sine sweep restarts.
const SWEEP_PERIOD: u32 = 1000;

/// Spawn the fake-vote injector. Each tick feeds one synthetic command
/// through the interpreter for every tenant with a non-empty queue.
pub fn spawn_synthetic_traffic(
    registry: Arc<TenantRegistry>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        let mut idx: u32 = 0;
        loop {
            interval.tick().await;
            let body = synthetic_vote(idx);
            for tenant in registry.tenants() {
                let from = rand::thread_rng().gen_range(0..100).to_string();
                let mut state = tenant.state.write().await;
                if state
                    .current_queue
                    .as_ref()
                    .map_or(true, |q| q.queue.is_empty())
                {
                    continue;
                }
                let reply = commands::dispatch(&body, &from, &mut state, tenant);
                debug!(account = %tenant.account, from = %from, reply = %reply, "Synthetic vote");
            }
            idx = if idx >= SWEEP_PERIOD { 0 } else { idx + 1 };
        }
    })
}

/// Vote text for tick `idx`: a slow sine sweep scaled to roughly 1..=12.
fn synthetic_vote(idx: u32) -> String {
    (((idx as f64) / 1000.0).sin() * 12.0).ceil().to_string()
}
