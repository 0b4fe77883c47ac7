//! Glow Server
//!
//! Backend for a beauty-products storefront and its admin dashboard:
//! bilingual product catalog with per-color stock, promotional banners,
//! order intake from the website and WhatsApp, JWT-authenticated admin
//! operations, real-time order notifications over WebSocket, and order
//! report export to Excel, PDF and Word with one-time download tokens.
//!
//! Module tree:
//! - [`core`]: configuration, shared state, server assembly
//! - [`api`]: HTTP handlers, one module per resource
//! - [`db`]: SQLite pool, models, repositories
//! - [`auth`]: JWT service, password hashing, admin guard
//! - [`notify`]: admin notification channel registry and WebSocket surface
//! - [`export`]: report assembly, renderers, download token store
//! - [`services`]: outbound collaborators (image hosting)
//! - [`utils`]: errors, logging, time, validation

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod export;
pub mod notify;
pub mod services;
pub mod utils;
