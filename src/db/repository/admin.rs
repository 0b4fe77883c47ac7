//! Admin Repository

use super::RepoResult;
use crate::db::models::Admin;
use crate::utils::time::now_millis;
use sqlx::SqlitePool;

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>(
        "SELECT id, username, password_hash, created_at FROM admins WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(admin)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn create(pool: &SqlitePool, username: &str, password_hash: &str) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO admins (username, password_hash, created_at) VALUES (?1, ?2, ?3) RETURNING id",
    )
    .bind(username)
    .bind(password_hash)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(id)
}
