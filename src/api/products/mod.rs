//! Product API module

mod handler;

use axum::{Router, routing::get};

use crate::core::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(handler::list).post(handler::create))
        .route(
            "/products/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
