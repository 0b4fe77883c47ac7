//! Shared utilities: errors, logging, time, validation helpers.

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResult};
