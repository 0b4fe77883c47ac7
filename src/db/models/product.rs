//! Product and color models

use serde::{Deserialize, Serialize};

/// Product row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub name_ar: String,
    pub description: String,
    pub description_ar: String,
    pub price: f64,
    pub discount_percent: f64,
    pub category: String,
    pub image_url: String,
    /// NULL means stock is tracked on the colors
    pub stock: Option<i64>,
    pub created_at: i64,
}

/// Product color row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductColor {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub name_ar: String,
    pub color_code: String,
    pub stock: i64,
    /// Overrides the product image in item listings when present
    pub image_url: Option<String>,
}

/// Product with its colors, as served to the storefront
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithColors {
    #[serde(flatten)]
    pub product: Product,
    pub colors: Vec<ProductColor>,
}

/// Submitted color entry for the save operation.
///
/// An entry is treated as new when it is flagged `isNew`, has no identifier,
/// or carries a temporary client-side identifier (negative).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorInput {
    pub id: Option<i64>,
    #[serde(default)]
    pub is_new: bool,
    pub name: String,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub color_code: String,
    #[serde(default)]
    pub stock: i64,
    /// Resolved image URL (set by the handler after uploading the color file)
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ColorInput {
    pub fn is_insert(&self) -> bool {
        self.is_new || self.id.is_none() || self.id.is_some_and(|id| id < 0)
    }
}

/// Product creation payload (image already uploaded by the handler)
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub name_ar: String,
    pub description: String,
    pub description_ar: String,
    pub price: f64,
    pub discount_percent: f64,
    pub category: String,
    pub image_url: String,
    pub stock: Option<i64>,
    pub colors: Vec<ColorInput>,
}

/// Product update payload; `image_url: None` preserves the stored image
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub name_ar: String,
    pub description: String,
    pub description_ar: String,
    pub price: f64,
    pub discount_percent: f64,
    pub category: String,
    pub image_url: Option<String>,
    pub stock: Option<i64>,
    pub colors: Vec<ColorInput>,
}
