//! Product Repository
//!
//! The save operation reconciles the color collection against the submitted
//! list: entries flagged new (or without a persisted id) are inserted,
//! existing ids absent from the list are deleted, the rest are updated in
//! place. The whole save runs in one transaction.

use super::{RepoError, RepoResult};
use crate::db::models::{
    ColorInput, Product, ProductColor, ProductCreate, ProductUpdate, ProductWithColors,
};
use crate::utils::time::now_millis;
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT id, name, name_ar, description, description_ar, price, discount_percent, category, image_url, stock, created_at FROM products";

const COLOR_SELECT: &str =
    "SELECT id, product_id, name, name_ar, color_code, stock, image_url FROM product_colors";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ProductWithColors>> {
    let sql = format!("{PRODUCT_SELECT} ORDER BY created_at DESC");
    let products = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;

    let mut result = Vec::with_capacity(products.len());
    for product in products {
        let colors = find_colors(pool, product.id).await?;
        result.push(ProductWithColors { product, colors });
    }
    Ok(result)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductWithColors>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match product {
        Some(product) => {
            let colors = find_colors(pool, product.id).await?;
            Ok(Some(ProductWithColors { product, colors }))
        }
        None => Ok(None),
    }
}

pub async fn find_colors(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<ProductColor>> {
    let sql = format!("{COLOR_SELECT} WHERE product_id = ? ORDER BY id");
    let colors = sqlx::query_as::<_, ProductColor>(&sql)
        .bind(product_id)
        .fetch_all(pool)
        .await?;
    Ok(colors)
}

/// Create a product with its colors
pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<ProductWithColors> {
    let mut tx = pool.begin().await?;

    let product_id: i64 = sqlx::query_scalar(
        "INSERT INTO products (name, name_ar, description, description_ar, price, discount_percent, category, image_url, stock, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.name_ar)
    .bind(&data.description)
    .bind(&data.description_ar)
    .bind(data.price)
    .bind(data.discount_percent)
    .bind(&data.category)
    .bind(&data.image_url)
    .bind(data.stock)
    .bind(now_millis())
    .fetch_one(&mut *tx)
    .await?;

    for color in &data.colors {
        insert_color(&mut tx, product_id, color).await?;
    }

    tx.commit().await?;

    find_by_id(pool, product_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Update a product and reconcile its colors
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: ProductUpdate,
) -> RepoResult<ProductWithColors> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;

    // A missing new image preserves the stored one
    let image_url = data.image_url.unwrap_or(existing.product.image_url);

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE products SET name = ?1, name_ar = ?2, description = ?3, description_ar = ?4, \
         price = ?5, discount_percent = ?6, category = ?7, image_url = ?8, stock = ?9 WHERE id = ?10",
    )
    .bind(&data.name)
    .bind(&data.name_ar)
    .bind(&data.description)
    .bind(&data.description_ar)
    .bind(data.price)
    .bind(data.discount_percent)
    .bind(&data.category)
    .bind(&image_url)
    .bind(data.stock)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    // Reconciliation pass: delete absent, insert new, update the rest
    let kept_ids: Vec<i64> = data
        .colors
        .iter()
        .filter(|c| !c.is_insert())
        .filter_map(|c| c.id)
        .collect();

    for color in &existing.colors {
        if !kept_ids.contains(&color.id) {
            sqlx::query("DELETE FROM product_colors WHERE id = ? AND product_id = ?")
                .bind(color.id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
    }

    for color in &data.colors {
        if color.is_insert() {
            insert_color(&mut tx, id, color).await?;
        } else if let Some(color_id) = color.id {
            // An explicitly submitted image replaces the stored one; a
            // missing image preserves it (same rule as the product image)
            match &color.image_url {
                Some(url) => {
                    sqlx::query(
                        "UPDATE product_colors SET name = ?1, name_ar = ?2, color_code = ?3, \
                         stock = ?4, image_url = ?5 WHERE id = ?6 AND product_id = ?7",
                    )
                    .bind(&color.name)
                    .bind(&color.name_ar)
                    .bind(&color.color_code)
                    .bind(color.stock)
                    .bind(url)
                    .bind(color_id)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                }
                None => {
                    sqlx::query(
                        "UPDATE product_colors SET name = ?1, name_ar = ?2, color_code = ?3, \
                         stock = ?4 WHERE id = ?5 AND product_id = ?6",
                    )
                    .bind(&color.name)
                    .bind(&color.name_ar)
                    .bind(&color.color_code)
                    .bind(color.stock)
                    .bind(color_id)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let affected = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(affected > 0)
}

async fn insert_color(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    product_id: i64,
    color: &ColorInput,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO product_colors (product_id, name, name_ar, color_code, stock, image_url) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(product_id)
    .bind(&color.name)
    .bind(&color.name_ar)
    .bind(&color.color_code)
    .bind(color.stock)
    .bind(&color.image_url)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
