//! idea-stream: streaming business-idea generator backend.
//!
//! Serves GET /api, which opens a chat completion against the configured
//! OpenAI-compatible upstream and relays the streamed output to the client
//! as a text event stream.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use idea_stream::config::{Cli, Config};
use idea_stream::server::idea_api::{build_router, AppState};
use idea_stream::upstream::client::{CompletionClient, CompletionSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "idea_stream=debug,tower_http=debug"
    } else {
        "idea_stream=info,tower_http=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true)
        .init();

    info!("idea-stream v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let config = Config::load(&cli.config)?;
    let config = Arc::new(config);

    info!(
        base_url = config.upstream.base_url,
        model = config.upstream.model,
        style = ?config.prompt.style,
        "Configuration loaded"
    );

    if std::env::var(&config.upstream.api_key_env).is_err() {
        warn!(
            var = config.upstream.api_key_env,
            "API key environment variable not set; requests will fail"
        );
    }

    // One pooled upstream client for the process; each request opens its
    // own completion stream over it.
    let client = CompletionClient::from_env(config.upstream.clone())?;
    let source: Arc<dyn CompletionSource> = Arc::new(client);

    // Build application state.
    let state = Arc::new(AppState {
        source,
        config: config.clone(),
        start_time: Instant::now(),
    });

    // Build the HTTP router.
    let app = build_router(state);

    // Start the server.
    let listen_addr = cli
        .listen
        .unwrap_or_else(|| config.server.listen.clone());
    info!(addr = listen_addr, "Starting server");

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
