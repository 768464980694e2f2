//! Tenant registry — immutable-after-init map from routing key to tenant.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tracing::info;

use crate::model::{ServerEvent, TenantState};

/// Default broadcast channel capacity per tenant.
const BROADCAST_CAPACITY: usize = 256;

/// One isolated voting scope: a state bank plus a broadcast channel.
pub struct Tenant {
    /// Tenant identifier (the account the destination number routes to).
    pub account: String,
    /// Destination number voters text; sent to sessions on join.
    pub number: String,
    /// Queue + vote bank, guarded per tenant so tenants never contend.
    pub state: RwLock<TenantState>,
    tx: broadcast::Sender<ServerEvent>,
}

impl Tenant {
    fn new(account: &str, number: &str) -> Self {
        let (tx, _rx) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            account: account.to_string(),
            number: number.to_string(),
            state: RwLock::new(TenantState::default()),
            tx,
        }
    }

    /// Subscribe a session to this tenant's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }

    /// Fire-and-forget send to every connected session.
    pub fn send(&self, event: ServerEvent) {
        // Ok if no sessions are listening.
        let _ = self.tx.send(event);
    }
}

/// All tenants, built once from the routing map at startup.
///
/// Tenants are never added or removed afterwards. The registry is passed by
/// `Arc` into the webhook handler, channel handler, and publisher rather
/// than held globally, so independent registries can coexist in one process.
pub struct TenantRegistry {
    by_number: HashMap<String, Arc<Tenant>>,
    by_account: HashMap<String, Arc<Tenant>>,
}

impl TenantRegistry {
    /// Build the registry: one tenant (state bank + channel) per routing entry.
    pub fn new(routing: &HashMap<String, String>) -> Self {
        let mut by_number = HashMap::new();
        let mut by_account = HashMap::new();
        for (number, account) in routing {
            info!(account = %account, number = %number, "Creating channel for tenant");
            let tenant = Arc::new(Tenant::new(account, number));
            by_number.insert(number.clone(), Arc::clone(&tenant));
            by_account.insert(account.clone(), tenant);
        }
        Self {
            by_number,
            by_account,
        }
    }

    /// Resolve a tenant from a destination number (the webhook routing key).
    pub fn by_number(&self, number: &str) -> Option<&Arc<Tenant>> {
        self.by_number.get(number)
    }

    /// Resolve a tenant from its account id (the channel namespace).
    pub fn by_account(&self, account: &str) -> Option<&Arc<Tenant>> {
        self.by_account.get(account)
    }

    /// All tenants, in no particular order.
    pub fn tenants(&self) -> impl Iterator<Item = &Arc<Tenant>> {
        self.by_number.values()
    }

    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }
}
