// Framework bootstrap for the arena server runtime.

use crate::domain::ports::NarrationSink;
use crate::frameworks::config::{self, ServerOptions};
use crate::frameworks::seed;
use crate::interface_adapters::narration::{BroadcastSink, FanoutSink, TracingSink, WebhookSink};
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::{AppState, InMemoryGameStore, SystemClock};
use crate::use_cases::{ArenaEngine, NarrationPublisher};

use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::broadcast;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    serve(listener, ServerOptions::from_env()?).await
}

pub async fn serve(listener: tokio::net::TcpListener, options: ServerOptions) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(options)?;
    let app = app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state(options: ServerOptions) -> Result<Arc<AppState>> {
    let (narration_tx, _) = broadcast::channel(config::NARRATION_BROADCAST_CAPACITY);

    let mut sinks: Vec<Arc<dyn NarrationSink>> = vec![
        Arc::new(TracingSink),
        Arc::new(BroadcastSink::new(narration_tx.clone())),
    ];
    if let Some(url) = options.chat_webhook_url {
        let timeout = options.chat_webhook_timeout;
        let webhook = WebhookSink::new(url.clone(), timeout)
            .map_err(|e| std::io::Error::other(format!("failed to initialize webhook: {e}")))?;
        tracing::debug!(
            webhook_url = %url,
            webhook_timeout_ms = timeout.as_millis(),
            "chat webhook configured"
        );
        sinks.push(Arc::new(webhook));
    }
    let narration = NarrationPublisher::spawn(
        Arc::new(FanoutSink::new(sinks)),
        config::NARRATION_CHANNEL_CAPACITY,
    );

    let admin_token = options.admin_token;
    if admin_token.is_none() {
        tracing::warn!("ARENA_ADMIN_TOKEN is not set; admin routes are disabled");
    }

    let store = Arc::new(InMemoryGameStore::new(
        seed::default_zones(),
        seed::default_catalog(),
    ));
    let engine = ArenaEngine::new(
        store,
        SystemClock,
        options.tuning,
        narration,
        options.rng_seed,
    );

    Ok(Arc::new(AppState {
        engine: Arc::new(engine),
        admin_token: admin_token.map(Arc::from),
        narration: narration_tx,
    }))
}
