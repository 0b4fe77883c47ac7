//! Banner API handlers
//!
//! Saves arrive as multipart forms like products: text fields plus the image
//! under `image`. The image is required on create and optional on update.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde_json::{Value, json};
use std::collections::HashMap;

use crate::core::AppState;
use crate::db::models::{Banner, BannerCreate, BannerUpdate};
use crate::db::repository::{RepoError, banner};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// GET /banners - active banners, for the storefront
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Banner>>> {
    let banners = banner::find_active(&state.pool).await?;
    Ok(Json(banners))
}

/// POST /banners - create from a multipart form; the image is required
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Banner>> {
    let form = BannerForm::read(&state, multipart).await?;

    let image_url = form
        .image_url
        .clone()
        .ok_or_else(|| AppError::validation("Banner image is required"))?;

    let data = BannerCreate {
        title: form.require("title")?,
        title_ar: form.require("titleAr")?,
        subtitle: form.require("subtitle")?,
        subtitle_ar: form.require("subtitleAr")?,
        image_url,
        is_active: form.is_active(),
    };

    let banner = banner::create(&state.pool, data).await.map_err(map_save_err)?;
    tracing::info!(banner = banner.id, "Banner created");
    Ok(Json(banner))
}

/// PUT /banners/{id} - update; a missing image preserves the stored one
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Json<Banner>> {
    let form = BannerForm::read(&state, multipart).await?;

    let data = BannerUpdate {
        title: form.require("title")?,
        title_ar: form.require("titleAr")?,
        subtitle: form.require("subtitle")?,
        subtitle_ar: form.require("subtitleAr")?,
        image_url: form.image_url.clone(),
        is_active: form.is_active(),
    };

    let banner = banner::update(&state.pool, id, data).await.map_err(map_save_err)?;
    Ok(Json(banner))
}

/// Datastore failures in a banner save are surfaced as `{error, details}`
/// like the other transactional write paths
fn map_save_err(e: RepoError) -> AppError {
    match e {
        RepoError::Database(details) => {
            AppError::transaction("Erreur lors de l'enregistrement de la bannière", details)
        }
        other => AppError::from(other),
    }
}

/// DELETE /banners/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !banner::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Banner {id}")));
    }
    Ok(Json(json!({ "msg": "Bannière supprimée avec succès" })))
}

/// Accumulated multipart form state
#[derive(Default)]
struct BannerForm {
    text: HashMap<String, String>,
    image_url: Option<String>,
}

impl BannerForm {
    async fn read(state: &AppState, mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == "image" {
                let filename = field.file_name().unwrap_or("banner").to_string();
                let bytes = field.bytes().await?.to_vec();
                form.image_url = Some(state.blob.upload(bytes, &filename).await?);
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
        validate_required_text(value, field, MAX_NAME_LEN)?;
        Ok(value.clone())
    }

    /// Checkbox semantics: `true`/`1` is active, anything else is not
    fn is_active(&self) -> bool {
        matches!(
            self.text.get("isActive").map(String::as_str),
            Some("true") | Some("1")
        )
    }
}
