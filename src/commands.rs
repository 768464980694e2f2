//! SMS command interpreter — parses inbound commands against tenant state.

use tracing::{debug, info};

use crate::model::{ServerEvent, TenantState};
use crate::registry::Tenant;

/// Highest queue position a vote command may address.
const MAX_VOTE: u32 = 20;

/// Static help reply. Already enveloped; never wrapped a second time.
pub const HELP_RESPONSE: &str =
    "<Response><Message>Commands:\n? - help\n1-10 - vote</Message></Response>";

/// Fallback for anything the grammar does not recognize.
pub const DEFAULT_RESPONSE: &str = "Invalid command... try ? for help";

/// Wrap a reply in the message envelope the telephony provider expects.
pub fn wrap_reply(text: &str) -> String {
    format!("<Response><Message>{text}</Message></Response>")
}

/// Interpret one inbound command and return the full response body.
///
/// Grammar, first match wins: `?` → help, an integer in `[1, MAX_VOTE]` → a
/// vote attempt, anything else → the default response.
pub fn dispatch(body: &str, from: &str, state: &mut TenantState, tenant: &Tenant) -> String {
    let command = body.trim().to_lowercase();

    if command == "?" {
        return HELP_RESPONSE.to_string();
    }

    match command.parse::<u32>() {
        Ok(v) if (1..=MAX_VOTE).contains(&v) => wrap_reply(&set_vote(from, v, state, tenant)),
        _ => {
            debug!(account = %tenant.account, body = %command, "Unrecognized command");
            wrap_reply(DEFAULT_RESPONSE)
        }
    }
}

/// Record a vote for the 1-indexed queue position `v`.
///
/// A position beyond the current queue leaves the vote bank untouched. A
/// successful vote overwrites the voter's previous choice and announces it
/// on the tenant channel, fire-and-forget.
fn set_vote(from: &str, v: u32, state: &mut TenantState, tenant: &Tenant) -> String {
    let Some(candidate) = state.candidate_at(v) else {
        debug!(account = %tenant.account, from = %from, vote = v, "Vote beyond current queue");
        return format!("Invalid vote: {v}");
    };
    let id = candidate.id.clone();
    let name = candidate.name.clone();

    state.votes.insert(from.to_string(), id);
    tenant.send(ServerEvent::NewVote {
        uid: from.to_string(),
        body: v,
    });

    info!(account = %tenant.account, from = %from, vote = v, candidate = %name, "Vote received");
    format!("Vote received: {name}")
}
