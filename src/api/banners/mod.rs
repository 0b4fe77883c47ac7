//! Banner API module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/banners", get(handler::list).post(handler::create))
        .route(
            "/banners/{id}",
            put(handler::update).delete(handler::delete),
        )
}
