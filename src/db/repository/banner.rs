//! Banner Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Banner, BannerCreate, BannerUpdate};
use sqlx::SqlitePool;

const BANNER_SELECT: &str =
    "SELECT id, title, title_ar, subtitle, subtitle_ar, image_url, is_active FROM banners";

/// Active banners, for the storefront
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Banner>> {
    let sql = format!("{BANNER_SELECT} WHERE is_active = 1 ORDER BY id DESC");
    let banners = sqlx::query_as::<_, Banner>(&sql).fetch_all(pool).await?;
    Ok(banners)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Banner>> {
    let sql = format!("{BANNER_SELECT} WHERE id = ?");
    let banner = sqlx::query_as::<_, Banner>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(banner)
}

pub async fn create(pool: &SqlitePool, data: BannerCreate) -> RepoResult<Banner> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO banners (title, title_ar, subtitle, subtitle_ar, image_url, is_active) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
    )
    .bind(&data.title)
    .bind(&data.title_ar)
    .bind(&data.subtitle)
    .bind(&data.subtitle_ar)
    .bind(&data.image_url)
    .bind(data.is_active)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create banner".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: BannerUpdate) -> RepoResult<Banner> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Banner {id} not found")))?;

    let image_url = data.image_url.unwrap_or(existing.image_url);

    sqlx::query(
        "UPDATE banners SET title = ?1, title_ar = ?2, subtitle = ?3, subtitle_ar = ?4, \
         image_url = ?5, is_active = ?6 WHERE id = ?7",
    )
    .bind(&data.title)
    .bind(&data.title_ar)
    .bind(&data.subtitle)
    .bind(&data.subtitle_ar)
    .bind(&image_url)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Banner {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let affected = sqlx::query("DELETE FROM banners WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(affected > 0)
}
