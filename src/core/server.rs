//! Server assembly and startup

use axum::{Router, middleware, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::auth::require_admin;
use crate::core::{AppState, Config};
use crate::notify;
use crate::utils::AppError;

/// Build the full application router
///
/// The admin guard runs as one global layer; which paths it actually
/// enforces is decided in [`require_admin`] by path and method.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::auth::routes())
        .merge(api::health::routes())
        .merge(api::orders::routes())
        .merge(api::products::routes())
        .merge(api::banners::routes())
        .route("/notifications/ws", get(notify::ws::ws_handler))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Initialize state, start background tasks and serve until shutdown
pub async fn run(config: Config) -> Result<(), AppError> {
    if config.is_production() && config.jwt_secret == crate::core::config::DEV_JWT_SECRET {
        return Err(AppError::internal(
            "Refusing to start in production with the development JWT secret; set JWT_SECRET",
        ));
    }

    let state = AppState::initialize(&config).await?;

    tokio::fs::create_dir_all(&config.export_dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create export dir: {e}")))?;

    start_token_purge_task(state.clone());

    let app = build_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Glow server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

/// Periodically drop expired download tokens and their spooled files
fn start_token_purge_task(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            for entry in state.tokens.purge_expired() {
                tracing::debug!(file = %entry.path.display(), "Purging expired export");
                if let Err(e) = tokio::fs::remove_file(&entry.path).await {
                    tracing::warn!(file = %entry.path.display(), error = %e, "Failed to remove expired export file");
                }
            }
        }
    });
}
