use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::info;

use super::{
    auth::require_admin_token,
    services::{check_content_type, get_settings, health, save_settings, well_known},
    state::AppState,
};
use crate::config::Config;
use crate::providers::ProviderRegistry;
use crate::settings::FjallConfigStore;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the application router.
///
/// Admin routes are only mounted when `admin.enabled` is set.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_bytes;

    let mut app = Router::new()
        .route("/.well-known/{*suffix}", get(well_known))
        .route("/health", get(health));

    if state.config.admin.enabled {
        let admin = Router::new()
            .route("/admin/settings", get(get_settings).post(save_settings))
            .route("/admin/content-type", post(check_content_type))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_admin_token,
            ));
        app = app.merge(admin);
    } else {
        info!("Admin API disabled");
    }

    app.with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        // Gzip/deflate admin submissions are decoded before the body limit applies
        .layer(RequestDecompressionLayer::new())
}

pub async fn run(config: Config, address: SocketAddr) -> Result<(), AnyError> {
    info!(path = %config.server.store_path.display(), "Opening settings store");
    let store = FjallConfigStore::open(&config.server.store_path)
        .map_err(|e| format!("Failed to open settings store: {}", e))?;

    if config.admin.enabled && config.admin.token.is_none() {
        tracing::warn!("Admin API is enabled without a token");
    }

    let state = AppState::new(config, Arc::new(store), ProviderRegistry::new());
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "Well-known responder listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
