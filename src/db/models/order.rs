//! Order models

use serde::{Deserialize, Serialize};

/// Order row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub notes: Option<String>,
    /// One of `pending | confirmed | delivered | cancelled`
    pub status: String,
    /// One of `website | whatsapp`
    pub source: String,
    /// Epoch milliseconds
    pub order_date: i64,
    /// Set exactly once, on the first transition into `delivered`
    pub completed_date: Option<i64>,
}

/// Line item joined with product display data.
///
/// `image_url` is the color's own image when the item references a color that
/// has one, otherwise the product image.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItemDetail {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub color_id: Option<i64>,
    pub quantity: i64,
    pub price: f64,
    pub product_name: Option<String>,
    pub color_name: Option<String>,
    pub image_url: Option<String>,
}

/// Order status enum, parsed from the TEXT column at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status value; `None` for anything outside the fixed set
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// Order source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSource {
    Website,
    Whatsapp,
}

impl OrderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSource::Website => "website",
            OrderSource::Whatsapp => "whatsapp",
        }
    }
}

/// Incoming line item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: i64,
    pub color_id: Option<i64>,
    pub quantity: i64,
    pub price: f64,
}

/// Order creation request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub notes: Option<String>,
    pub items: Option<Vec<OrderItemInput>>,
}
