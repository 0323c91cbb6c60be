use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use huma_api::config::ServerConfig;
use huma_api::router::build_app_router;
use huma_api::state::AppState;
use huma_api::background;
use huma_assistant::{ChatModel, GeminiClient, GeminiConfig};
use huma_db::{SupabaseClient, SupabaseConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "huma_api=debug,huma_db=debug,huma_assistant=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let supabase_config = SupabaseConfig::from_env();
    let supabase = Arc::new(
        SupabaseClient::new(&supabase_config).context("Failed to build the hosted backend client")?,
    );
    tracing::info!(url = %supabase_config.url, table = %supabase_config.table, "Hosted backend configured");

    let gemini_config = GeminiConfig::from_env();
    let gemini = GeminiClient::from_config(&gemini_config).context("Failed to build the chat assistant client")?;
    let assistant: Option<Arc<dyn ChatModel>> = match gemini {
        Some(client) => {
            tracing::info!(model = client.model(), "Chat assistant enabled");
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; chat assistant disabled");
            None
        }
    };

    // --- App state ---
    let state = AppState::new(config.clone(), supabase.clone(), supabase, assistant);

    let initial = state.store.refresh().await;
    tracing::info!(
        projects = initial.records.len(),
        origin = ?initial.origin,
        "Initial project list loaded"
    );

    // --- Background tasks ---
    let cancel = CancellationToken::new();

    let map_handle = tokio::spawn(background::map_render::run(
        state.store.subscribe(),
        Arc::clone(&state.map),
        cancel.clone(),
    ));

    let refresh_handle = (config.refresh_interval_secs > 0).then(|| {
        tokio::spawn(background::refresh::run(
            Arc::clone(&state.store),
            Duration::from_secs(config.refresh_interval_secs),
            cancel.clone(),
        ))
    });

    let sweeper_handle = (config.draft_idle_secs > 0).then(|| {
        let draft_idle = Duration::from_secs(config.draft_idle_secs);
        tokio::spawn(background::draft_sweeper::run(
            Arc::clone(&state.forms),
            draft_idle,
            background::draft_sweeper::sweep_period(draft_idle),
            cancel.clone(),
        ))
    });

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    let _ = tokio::time::timeout(grace, map_handle).await;
    for handle in [refresh_handle, sweeper_handle].into_iter().flatten() {
        let _ = tokio::time::timeout(grace, handle).await;
    }
    tracing::info!("Background tasks stopped");

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
