//! Order Repository
//!
//! Order creation is one atomic unit of work: validation, order row, line
//! items, and conditional stock decrements either all land or none do.

use super::{RepoError, RepoResult};
use crate::db::models::{Order, OrderCreate, OrderItemDetail, OrderItemInput, OrderSource, OrderStatus};
use crate::utils::time::now_millis;
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, customer_name, customer_phone, customer_address, notes, status, source, order_date, completed_date FROM orders";

/// Fixed customer placeholders for WhatsApp-sourced orders. Whatever the
/// caller supplied is ignored; the real customer data arrives over chat.
pub const WHATSAPP_CUSTOMER_NAME: &str = "Client WhatsApp";
pub const WHATSAPP_CUSTOMER_PHONE: &str = "N/A";
pub const WHATSAPP_CUSTOMER_ADDRESS: &str = "N/A";

/// An item whose conditional stock decrement affected zero rows
/// (insufficient stock, or product-level stock is NULL).
#[derive(Debug, Clone)]
pub struct StockShortfall {
    pub product_id: i64,
    pub color_id: Option<i64>,
    pub quantity: i64,
}

/// Outcome of a successful order creation
#[derive(Debug)]
pub struct CreatedOrder {
    pub id: i64,
    /// Decrements that were skipped. The order itself still succeeded; the
    /// caller decides whether to log or reject.
    pub shortfalls: Vec<StockShortfall>,
}

/// Filters shared by the order listing and the report exporter.
/// All present filters combine with AND; results are newest-first.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub order_id: Option<i64>,
    /// Already narrowed: `None` means no status filter (absent or `all`)
    pub status: Option<String>,
    /// Inclusive day-start boundary, epoch millis
    pub start_millis: Option<i64>,
    /// Inclusive day-end boundary, epoch millis
    pub end_millis: Option<i64>,
}

/// Create an order with its items in one transaction.
///
/// Validation happens before any write. Non-WhatsApp orders decrement stock
/// per item with a `stock >= quantity` guard; WhatsApp orders skip decrements
/// entirely (stock is reconciled when an admin confirms the order).
pub async fn create(
    pool: &SqlitePool,
    data: OrderCreate,
    source: OrderSource,
) -> RepoResult<CreatedOrder> {
    let items: Vec<OrderItemInput> = data.items.unwrap_or_default();
    if items.is_empty() {
        return Err(RepoError::Validation("Order must contain at least one item".into()));
    }
    if items.iter().any(|i| i.quantity <= 0) {
        return Err(RepoError::Validation("Item quantity must be positive".into()));
    }

    let (name, phone, address) = match source {
        OrderSource::Whatsapp => (
            WHATSAPP_CUSTOMER_NAME.to_string(),
            WHATSAPP_CUSTOMER_PHONE.to_string(),
            WHATSAPP_CUSTOMER_ADDRESS.to_string(),
        ),
        OrderSource::Website => {
            let name = data.customer_name.filter(|s| !s.trim().is_empty());
            let phone = data.customer_phone.filter(|s| !s.trim().is_empty());
            let address = data.customer_address.filter(|s| !s.trim().is_empty());
            match (name, phone, address) {
                (Some(n), Some(p), Some(a)) => (n, p, a),
                _ => {
                    return Err(RepoError::Validation(
                        "Customer name, phone and address are required".into(),
                    ));
                }
            }
        }
    };

    let mut tx = pool.begin().await?;

    let order_id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (customer_name, customer_phone, customer_address, notes, status, source, order_date) \
         VALUES (?1, ?2, ?3, ?4, 'pending', ?5, ?6) RETURNING id",
    )
    .bind(&name)
    .bind(&phone)
    .bind(&address)
    .bind(&data.notes)
    .bind(source.as_str())
    .bind(now_millis())
    .fetch_one(&mut *tx)
    .await?;

    let mut shortfalls = Vec::new();

    for item in &items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, color_id, quantity, price) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.color_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;

        if source == OrderSource::Website {
            // Conditional decrement: a no-op when stock is insufficient.
            // NULL product stock compares false, so color-tracked products
            // are untouched at the product level.
            let affected = match item.color_id {
                Some(color_id) => {
                    sqlx::query(
                        "UPDATE product_colors SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1",
                    )
                    .bind(item.quantity)
                    .bind(color_id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected()
                }
                None => {
                    sqlx::query(
                        "UPDATE products SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1",
                    )
                    .bind(item.quantity)
                    .bind(item.product_id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected()
                }
            };

            if affected == 0 {
                shortfalls.push(StockShortfall {
                    product_id: item.product_id,
                    color_id: item.color_id,
                    quantity: item.quantity,
                });
            }
        }
    }

    tx.commit().await?;

    Ok(CreatedOrder {
        id: order_id,
        shortfalls,
    })
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Line items for one order, enriched with the product name and the display
/// image (color image when the item references a color that has one).
pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItemDetail>> {
    let items = sqlx::query_as::<_, OrderItemDetail>(
        "SELECT oi.id, oi.order_id, oi.product_id, oi.color_id, oi.quantity, oi.price, \
                p.name AS product_name, pc.name AS color_name, \
                COALESCE(pc.image_url, p.image_url) AS image_url \
         FROM order_items oi \
         LEFT JOIN products p ON p.id = oi.product_id \
         LEFT JOIN product_colors pc ON pc.id = oi.color_id \
         WHERE oi.order_id = ? \
         ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Orders matching the filter, newest-first
pub async fn find_filtered(pool: &SqlitePool, filter: &OrderFilter) -> RepoResult<Vec<Order>> {
    let mut qb = sqlx::QueryBuilder::new(ORDER_SELECT);
    qb.push(" WHERE 1=1");
    if let Some(id) = filter.order_id {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(status) = &filter.status {
        qb.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(start) = filter.start_millis {
        qb.push(" AND order_date >= ").push_bind(start);
    }
    if let Some(end) = filter.end_millis {
        qb.push(" AND order_date <= ").push_bind(end);
    }
    qb.push(" ORDER BY order_date DESC, id DESC");

    let orders = qb.build_query_as::<Order>().fetch_all(pool).await?;
    Ok(orders)
}

/// Update the order status.
///
/// `completed_date` is set on the first transition into `delivered` and never
/// overwritten afterwards, including on a repeated `delivered` update.
pub async fn update_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<Order> {
    let affected = sqlx::query(
        "UPDATE orders SET status = ?1, \
         completed_date = CASE WHEN ?1 = 'delivered' AND completed_date IS NULL THEN ?2 ELSE completed_date END \
         WHERE id = ?3",
    )
    .bind(status.as_str())
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Delete an order; items cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let affected = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(affected > 0)
}
