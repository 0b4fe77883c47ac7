//! Order API module
//!
//! Public surface: order intake (website and WhatsApp), token download and
//! the self-authenticating synchronous export. Everything else is behind the
//! admin guard.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(handler::list).post(handler::create_web))
        .route("/orders/whatsapp", post(handler::create_whatsapp))
        .route("/orders/prepare-export", post(handler::prepare_export))
        .route("/orders/export", get(handler::export_sync))
        .route("/orders/download/{token}", get(handler::download))
        .route(
            "/orders/{id}",
            get(handler::get_by_id).delete(handler::delete),
        )
        .route("/orders/{id}/status", put(handler::update_status))
}
