use std::sync::Arc;

use partyline::channel::channel_routes;
use partyline::config::ServerConfig;
use partyline::publisher::spawn_publish_ticker;
use partyline::registry::TenantRegistry;
use partyline::synthetic::spawn_synthetic_traffic;
use partyline::webhook::sms_routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;

    eprintln!("🤖 Partyline v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Tenants: {}", config.routing.len());
    eprintln!("   Webhook: http://0.0.0.0:{}/api/sms", config.port);
    eprintln!(
        "   Channels: ws://0.0.0.0:{}/channel/<account>",
        config.port
    );

    let registry = Arc::new(TenantRegistry::new(&config.routing));

    // Periodic vote publish runs for the process lifetime.
    let _publisher = spawn_publish_ticker(Arc::clone(&registry), config.publish_interval);

    if let Some(ref synthetic) = config.synthetic {
        eprintln!("   Synthetic traffic: every {:?}", synthetic.rate);
        let _injector = spawn_synthetic_traffic(Arc::clone(&registry), synthetic.rate);
    }

    let app = sms_routes(Arc::clone(&registry)).merge(channel_routes(registry));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "🚀 Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
