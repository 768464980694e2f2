//! Per-tenant realtime channel — WebSocket sessions, join sync, event fan-out.

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::model::{ClientEvent, ServerEvent};
use crate::registry::{Tenant, TenantRegistry};

/// Build the channel routes. Channels are namespaced by tenant account so
/// sessions for different tenants never cross-talk.
pub fn channel_routes(registry: Arc<TenantRegistry>) -> Router {
    Router::new()
        .route("/channel/{account}", get(ws_handler))
        .with_state(registry)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(account): Path<String>,
    State(registry): State<Arc<TenantRegistry>>,
) -> impl IntoResponse {
    let Some(tenant) = registry.by_account(&account) else {
        warn!(account = %account, "Channel connect for unknown tenant");
        return StatusCode::NOT_FOUND.into_response();
    };
    let tenant = Arc::clone(tenant);
    ws.on_upgrade(move |socket| handle_session(socket, tenant))
        .into_response()
}

async fn handle_session(mut socket: WebSocket, tenant: Arc<Tenant>) {
    let session_id = Uuid::new_v4();
    info!(account = %tenant.account, session = %session_id, "Session joined");

    // Announce to everyone already on the channel, then subscribe — the
    // joining session must not see its own join notice.
    tenant.send(ServerEvent::Message {
        data: format!("{session_id} joined"),
    });
    let mut rx = tenant.subscribe();

    // Join-time sync: welcome, the full vote bank, and the SMS number so a
    // client can self-identify which destination to display.
    let votes = tenant.state.read().await.votes.clone();
    let hello = [
        ServerEvent::Message {
            data: format!("welcome {session_id}"),
        },
        ServerEvent::VotesSync { data: votes },
        ServerEvent::SmsNumber {
            data: tenant.number.clone(),
        },
    ];
    for event in hello {
        if send_event(&mut socket, &event).await.is_err() {
            warn!(session = %session_id, "Failed to send join sync, session disconnected");
            return;
        }
    }

    loop {
        tokio::select! {
            // Forward tenant broadcasts to this session.
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if send_event(&mut socket, &event).await.is_err() {
                            debug!(session = %session_id, "Session disconnected during send");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        // Best-effort push; dropped events are not replayed.
                        warn!(session = %session_id, missed = n, "Session lagged behind broadcast");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            // Receive events from the session.
            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_event(&text, &tenant).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(account = %tenant.account, session = %session_id, "Session left");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(session = %session_id, error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

/// Apply an event a session sent on the channel.
///
/// Any connected session may emit a queue replace; nothing distinguishes the
/// producing client from a viewer. Known trust gap.
async fn handle_client_event(text: &str, tenant: &Tenant) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::PlayerUpdate { current_queue }) => {
            debug!(
                account = %tenant.account,
                candidates = current_queue.queue.len(),
                "Queue replaced"
            );
            tenant.state.write().await.current_queue = Some(current_queue);
        }
        Err(e) => {
            debug!(error = %e, text = text, "Unrecognized channel event from session");
        }
    }
}
