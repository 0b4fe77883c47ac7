//! Order report assembly
//!
//! Builds the intermediate value all three renderers consume: the filtered
//! orders (newest-first), their enriched items, a per-order grand total, and
//! the shared status-label lookup. Totals are computed here exactly once.

use crate::db::models::Order;
use crate::db::repository::order::{self, OrderFilter};
use crate::db::repository::RepoResult;
use sqlx::SqlitePool;

/// One line of an order section
#[derive(Debug, Clone)]
pub struct ReportItem {
    pub product_name: String,
    pub color_name: Option<String>,
    pub quantity: i64,
    pub price: f64,
}

impl ReportItem {
    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// Display name, with the color suffixed when present
    pub fn display_name(&self) -> String {
        match &self.color_name {
            Some(color) => format!("{} ({color})", self.product_name),
            None => self.product_name.clone(),
        }
    }
}

/// One order with its items and precomputed grand total
#[derive(Debug, Clone)]
pub struct ReportOrder {
    pub order: Order,
    pub items: Vec<ReportItem>,
    /// `Σ price × quantity` over the items
    pub total: f64,
}

/// The shared renderer input
#[derive(Debug, Clone, Default)]
pub struct OrderReport {
    pub orders: Vec<ReportOrder>,
}

/// Localized status label. Unrecognized values fall back to the
/// `pending` label.
pub fn status_label(status: &str) -> &'static str {
    match status {
        "confirmed" => "Confirmée",
        "delivered" => "Livrée",
        "cancelled" => "Annulée",
        _ => "En attente",
    }
}

/// Spreadsheet highlight color for a status cell (RGB). Same fallback rule
/// as [`status_label`].
pub fn status_color(status: &str) -> u32 {
    match status {
        "confirmed" => 0x00BDD7EE,
        "delivered" => 0x00C6EFCE,
        "cancelled" => 0x00FFC7CE,
        _ => 0x00FFEB9C,
    }
}

/// Query matching orders and assemble the report
pub async fn build_report(pool: &SqlitePool, filter: &OrderFilter) -> RepoResult<OrderReport> {
    let orders = order::find_filtered(pool, filter).await?;

    let mut report = OrderReport::default();
    for ord in orders {
        let items: Vec<ReportItem> = order::find_items(pool, ord.id)
            .await?
            .into_iter()
            .map(|item| ReportItem {
                product_name: item
                    .product_name
                    .unwrap_or_else(|| format!("Produit #{}", item.product_id)),
                color_name: item.color_name,
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        let total = items.iter().map(ReportItem::subtotal).sum();
        report.orders.push(ReportOrder {
            order: ord,
            items,
            total,
        });
    }

    Ok(report)
}
