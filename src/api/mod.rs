//! HTTP API modules
//!
//! One module per resource, each exposing a `routes()` router merged into the
//! application router by `core::server`. Handlers stay thin: parse the
//! request, call a repository or service, shape the response.

pub mod auth;
pub mod banners;
pub mod health;
pub mod orders;
pub mod products;
