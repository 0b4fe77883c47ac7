//! Shared application state
//!
//! `AppState` holds every service the handlers need, behind `Arc` where
//! shared ownership matters; cloning it per request is cheap.

use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db;
use crate::db::repository::admin;
use crate::export::token_store::{MemoryTokenStore, TokenStore};
use crate::notify::ChannelRegistry;
use crate::services::BlobClient;
use crate::utils::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt: Arc<JwtService>,
    /// Live admin notification channels
    pub notifier: Arc<ChannelRegistry>,
    /// One-time download token registry
    pub tokens: Arc<dyn TokenStore>,
    pub blob: BlobClient,
}

impl AppState {
    /// Initialize the state: database (with migrations), admin seed, services
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let pool = db::connect(&config.database_path).await?;

        seed_admin(&pool, config).await?;

        let jwt = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_minutes,
        ));
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new(Duration::from_secs(
            config.download_token_ttl_secs,
        )));
        let blob = BlobClient::new(
            config.image_upload_url.clone(),
            config.image_upload_key.clone(),
        );

        Ok(Self {
            config: config.clone(),
            pool,
            jwt,
            notifier: Arc::new(ChannelRegistry::new()),
            tokens,
            blob,
        })
    }
}

/// Seed the admin account on first start, when a password is configured
async fn seed_admin(pool: &SqlitePool, config: &Config) -> Result<(), AppError> {
    if admin::count(pool).await? > 0 {
        return Ok(());
    }

    match &config.admin_password {
        Some(password) => {
            let hash = crate::auth::hash_password(password)
                .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;
            admin::create(pool, &config.admin_username, &hash).await?;
            tracing::info!(username = %config.admin_username, "Seeded admin account");
        }
        None => {
            tracing::warn!("No admin account exists and ADMIN_PASSWORD is unset; admin login is unavailable");
        }
    }
    Ok(())
}
