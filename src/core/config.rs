//! Server configuration
//!
//! Every setting can be overridden through an environment variable:
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | HTTP_PORT | 5000 | HTTP service port |
//! | DATABASE_PATH | glow.db | SQLite database file |
//! | JWT_SECRET | dev fallback | HS256 signing secret |
//! | JWT_EXPIRATION_MINUTES | 1440 | Admin token lifetime |
//! | ADMIN_USERNAME | admin | Seeded admin account name |
//! | ADMIN_PASSWORD | (unset) | Seed password; no seeding when unset |
//! | EXPORT_DIR | <tmp>/glow-exports | Deferred export spool directory |
//! | DOWNLOAD_TOKEN_TTL_SECS | 300 | One-time download token lifetime |
//! | IMAGE_UPLOAD_URL | (unset) | Image hosting endpoint |
//! | IMAGE_UPLOAD_KEY | (unset) | Image hosting API key |
//! | ENVIRONMENT | development | development \| production |

/// Development fallback secret; the server refuses to start with it in
/// production
pub const DEV_JWT_SECRET: &str = "glow-server-development-key-change-me!!";

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub database_path: String,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub export_dir: String,
    pub download_token_ttl_secs: u64,
    pub image_upload_url: Option<String>,
    pub image_upload_key: Option<String>,
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development fallback key");
            DEV_JWT_SECRET.to_string()
        });

        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "glow.db".into()),
            jwt_secret,
            jwt_expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1440),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
            export_dir: std::env::var("EXPORT_DIR").unwrap_or_else(|_| {
                std::env::temp_dir()
                    .join("glow-exports")
                    .to_string_lossy()
                    .into_owned()
            }),
            download_token_ttl_secs: std::env::var("DOWNLOAD_TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            image_upload_url: std::env::var("IMAGE_UPLOAD_URL").ok(),
            image_upload_key: std::env::var("IMAGE_UPLOAD_KEY").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
