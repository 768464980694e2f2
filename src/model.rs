//! Vote data model — candidates, queues, vote banks, and channel event types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An entry in the current voting queue. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
}

/// The ordered candidate list, 1-indexed from the voter's perspective.
///
/// Replaced wholesale on every queue-replace event; never partially mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteQueue {
    pub queue: Vec<Candidate>,
}

/// Current vote assignment per tenant: voter address → candidate id.
///
/// Keys are unique; a voter's new vote overwrites their previous one.
pub type VoteBank = HashMap<String, String>;

/// Mutable state owned by one tenant: the live queue plus the vote bank.
#[derive(Debug, Default)]
pub struct TenantState {
    pub current_queue: Option<VoteQueue>,
    pub votes: VoteBank,
}

impl TenantState {
    /// Candidate at 1-indexed position `v`, if the queue reaches that far.
    pub fn candidate_at(&self, v: u32) -> Option<&Candidate> {
        self.current_queue.as_ref()?.queue.get(v as usize - 1)
    }
}

// ── Wire Events ─────────────────────────────────────────────────────────

/// Events a connected session may send on its tenant channel.
#[derive(Debug, Deserialize)]
#[serde(tag = "event")]
pub enum ClientEvent {
    /// The producing client pushing its current queue state. Overwrites the
    /// tenant's VoteQueue in full.
    #[serde(rename = "playerUpdate", rename_all = "camelCase")]
    PlayerUpdate { current_queue: VoteQueue },
}

/// Events the server pushes to channel sessions.
///
/// `VotesSync` and `VotesTick` share the `votesUpdated` tag but wrap the
/// bank in different keys (`data` on join, `votes` on periodic publish) —
/// that asymmetry is what existing clients expect.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum ServerEvent {
    /// Human-readable notice (welcome / join announcements).
    #[serde(rename = "message")]
    Message { data: String },
    /// The tenant's SMS destination number, sent on join.
    #[serde(rename = "smsNumber")]
    SmsNumber { data: String },
    /// Full vote bank, sent to a session on join.
    #[serde(rename = "votesUpdated")]
    VotesSync { data: VoteBank },
    /// Full vote bank, broadcast by the periodic publisher.
    #[serde(rename = "votesUpdated")]
    VotesTick { votes: VoteBank },
    /// A vote was just recorded.
    #[serde(rename = "newVote")]
    NewVote { uid: String, body: u32 },
}
