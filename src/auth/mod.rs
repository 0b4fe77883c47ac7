//! Admin authentication: JWT service, password verification, middleware.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentAdmin, JwtError, JwtService};
pub use middleware::require_admin;
pub use password::{hash_password, verify_password};
