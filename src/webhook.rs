//! Inbound SMS webhook — the telephony provider POSTs vote commands here.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Form, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::commands::{self, DEFAULT_RESPONSE, wrap_reply};
use crate::registry::TenantRegistry;

/// Form body the provider delivers for each inbound message.
#[derive(Debug, Deserialize)]
pub struct SmsForm {
    /// Destination address — the routing key.
    #[serde(rename = "To")]
    pub to: String,
    /// Originating voter address.
    #[serde(rename = "From", default)]
    pub from: String,
    /// Raw command text.
    #[serde(rename = "Body", default)]
    pub body: String,
}

/// Build the webhook routes.
pub fn sms_routes(registry: Arc<TenantRegistry>) -> Router {
    Router::new()
        .route("/api/sms", post(sms_handler))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(registry)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "partyline"
    }))
}

/// Resolve the tenant from `To` and run the command interpreter.
///
/// An unmapped destination gets the default envelope without touching any
/// state; the interpreter is never invoked for it.
async fn sms_handler(
    State(registry): State<Arc<TenantRegistry>>,
    Form(form): Form<SmsForm>,
) -> impl IntoResponse {
    let body = match registry.by_number(&form.to) {
        Some(tenant) => {
            // Write lock held for the whole command, so interpreter
            // mutations are atomic with respect to the publisher and the
            // channel handlers.
            let mut state = tenant.state.write().await;
            commands::dispatch(&form.body, &form.from, &mut state, tenant)
        }
        None => {
            warn!(to = %form.to, "No tenant routed for destination");
            wrap_reply(DEFAULT_RESPONSE)
        }
    };
    ([(header::CONTENT_TYPE, "application/xml")], body)
}
