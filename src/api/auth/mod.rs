//! Admin authentication API

mod handler;

use axum::{Router, routing::post};

use crate::core::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(handler::login))
}
