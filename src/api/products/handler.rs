//! Product API handlers
//!
//! Admin product saves arrive as multipart forms: text fields, a `colors`
//! JSON array, the product image under `image`, and per-color images under
//! `colorImage_{index}` (index into the colors array). Field order in the
//! form is not guaranteed, so color images are collected first and attached
//! after the whole form is read.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde_json::{Value, json};
use std::collections::HashMap;

use crate::core::AppState;
use crate::db::models::{ColorInput, ProductCreate, ProductUpdate, ProductWithColors};
use crate::db::repository::{RepoError, product};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// GET /products - full catalog with colors
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ProductWithColors>>> {
    let products = product::find_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductWithColors>> {
    let product = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
    Ok(Json(product))
}

/// POST /products - create from a multipart form; the image is required
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ProductWithColors>> {
    let form = ProductForm::read(&state, multipart).await?;

    let image_url = form
        .image_url
        .clone()
        .ok_or_else(|| AppError::validation("Product image is required"))?;

    let data = ProductCreate {
        name: form.require("name")?,
        name_ar: form.require("nameAr")?,
        description: form.require("description")?,
        description_ar: form.require("descriptionAr")?,
        price: form.price()?,
        discount_percent: form.discount_percent()?,
        category: form.require("category")?,
        image_url,
        stock: form.stock()?,
        colors: form.colors()?,
    };

    let product = product::create(&state.pool, data).await.map_err(map_save_err)?;
    tracing::info!(product = product.product.id, "Product created");
    Ok(Json(product))
}

/// PUT /products/{id} - update from a multipart form; a missing image
/// preserves the stored one
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Json<ProductWithColors>> {
    let form = ProductForm::read(&state, multipart).await?;

    let data = ProductUpdate {
        name: form.require("name")?,
        name_ar: form.require("nameAr")?,
        description: form.require("description")?,
        description_ar: form.require("descriptionAr")?,
        price: form.price()?,
        discount_percent: form.discount_percent()?,
        category: form.require("category")?,
        image_url: form.image_url.clone(),
        stock: form.stock()?,
        colors: form.colors()?,
    };

    let product = product::update(&state.pool, id, data).await.map_err(map_save_err)?;
    Ok(Json(product))
}

/// The save runs in one transaction; a datastore failure after rollback is
/// surfaced as `{error, details}` like the order intake path
fn map_save_err(e: RepoError) -> AppError {
    match e {
        RepoError::Database(details) => {
            AppError::transaction("Erreur lors de l'enregistrement du produit", details)
        }
        other => AppError::from(other),
    }
}

/// DELETE /products/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !product::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Product {id}")));
    }
    Ok(Json(json!({ "msg": "Produit supprimé avec succès" })))
}

/// Accumulated multipart form state
#[derive(Default)]
struct ProductForm {
    text: HashMap<String, String>,
    image_url: Option<String>,
    color_images: HashMap<usize, String>,
}

impl ProductForm {
    /// Drain the multipart stream, uploading file parts as they arrive
    async fn read(state: &AppState, mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == "image" {
                let filename = field.file_name().unwrap_or("image").to_string();
                let bytes = field.bytes().await?.to_vec();
                form.image_url = Some(state.blob.upload(bytes, &filename).await?);
            } else if let Some(index) = name.strip_prefix("colorImage_") {
                let index: usize = index
                    .parse()
                    .map_err(|_| AppError::validation(format!("Invalid color image field: {name}")))?;
                let filename = field.file_name().unwrap_or("color").to_string();
                let bytes = field.bytes().await?.to_vec();
                let url = state.blob.upload(bytes, &filename).await?;
                form.color_images.insert(index, url);
            } else {
                form.text.insert(name, field.text().await?);
            }
        }

        Ok(form)
    }

    fn require(&self, field: &str) -> AppResult<String> {
        let value = self
            .text
            .get(field)
            .ok_or_else(|| AppError::validation(format!("{field} is required")))?;
        let max = if field.starts_with("description") {
            MAX_NOTE_LEN
        } else {
            MAX_NAME_LEN
        };
        validate_required_text(value, field, max)?;
        Ok(value.clone())
    }

    fn price(&self) -> AppResult<f64> {
        let price: f64 = self
            .text
            .get("price")
            .ok_or_else(|| AppError::validation("price is required"))?
            .parse()
            .map_err(|_| AppError::validation("Invalid price"))?;
        if price < 0.0 {
            return Err(AppError::validation("Price must not be negative"));
        }
        Ok(price)
    }

    fn discount_percent(&self) -> AppResult<f64> {
        match self.text.get("discountPercent") {
            None => Ok(0.0),
            Some(v) if v.trim().is_empty() => Ok(0.0),
            Some(v) => {
                let d: f64 = v
                    .parse()
                    .map_err(|_| AppError::validation("Invalid discountPercent"))?;
                if !(0.0..=100.0).contains(&d) {
                    return Err(AppError::validation("discountPercent must be 0..=100"));
                }
                Ok(d)
            }
        }
    }

    /// Product-level stock; empty or absent means color-tracked (NULL)
    fn stock(&self) -> AppResult<Option<i64>> {
        match self.text.get("stock") {
            None => Ok(None),
            Some(v) if v.trim().is_empty() => Ok(None),
            Some(v) => {
                let stock: i64 = v.parse().map_err(|_| AppError::validation("Invalid stock"))?;
                if stock < 0 {
                    return Err(AppError::validation("Stock must not be negative"));
                }
                Ok(Some(stock))
            }
        }
    }

    /// Parse the colors JSON and attach the uploaded color images by index
    fn colors(&self) -> AppResult<Vec<ColorInput>> {
        let mut colors: Vec<ColorInput> = match self.text.get("colors") {
            None => Vec::new(),
            Some(v) if v.trim().is_empty() => Vec::new(),
            Some(v) => serde_json::from_str(v)
                .map_err(|e| AppError::validation(format!("Invalid colors payload: {e}")))?,
        };

        for (index, url) in &self.color_images {
            if let Some(color) = colors.get_mut(*index) {
                color.image_url = Some(url.clone());
            }
        }

        Ok(colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(fields: &[(&str, &str)]) -> ProductForm {
        ProductForm {
            text: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_stock_means_color_tracked() {
        assert_eq!(form_with(&[("stock", "")]).stock().unwrap(), None);
        assert_eq!(form_with(&[]).stock().unwrap(), None);
        assert_eq!(form_with(&[("stock", "12")]).stock().unwrap(), Some(12));
    }

    #[test]
    fn rejects_negative_price_and_stock() {
        assert!(form_with(&[("price", "-1")]).price().is_err());
        assert!(form_with(&[("stock", "-3")]).stock().is_err());
    }

    #[test]
    fn discount_defaults_to_zero_and_is_bounded() {
        assert_eq!(form_with(&[]).discount_percent().unwrap(), 0.0);
        assert!(form_with(&[("discountPercent", "150")]).discount_percent().is_err());
    }

    #[test]
    fn color_images_attach_by_index() {
        let mut form = form_with(&[(
            "colors",
            r#"[{"name":"Rouge","isNew":true},{"name":"Noir","isNew":true}]"#,
        )]);
        form.color_images.insert(1, "https://img/noir.jpg".into());

        let colors = form.colors().unwrap();
        assert_eq!(colors[0].image_url, None);
        assert_eq!(colors[1].image_url.as_deref(), Some("https://img/noir.jpg"));
    }

    #[test]
    fn malformed_colors_json_is_rejected() {
        assert!(form_with(&[("colors", "not json")]).colors().is_err());
    }

    #[test]
    fn save_database_failures_echo_details() {
        let err = map_save_err(RepoError::Database("disk I/O error".into()));
        match err {
            AppError::Transaction { details, .. } => assert_eq!(details, "disk I/O error"),
            other => panic!("expected a transaction error, got {other:?}"),
        }
        // Non-database errors keep their usual mapping
        assert!(matches!(
            map_save_err(RepoError::NotFound("Product 9".into())),
            AppError::NotFound(_)
        ));
    }
}
