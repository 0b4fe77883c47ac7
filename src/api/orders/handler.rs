//! Order API handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::auth::CurrentAdmin;
use crate::core::AppState;
use crate::db::models::{Order, OrderCreate, OrderItemDetail, OrderSource, OrderStatus};
use crate::db::repository::RepoError;
use crate::db::repository::order::{self, OrderFilter};
use crate::export::report::build_report;
use crate::export::token_store::{DownloadEntry, TakeOutcome};
use crate::export::{self, ExportFormat};
use crate::notify::OrderNotification;
use crate::utils::time::{day_end_millis, day_start_millis};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};
use crate::utils::{AppError, AppResult};

/// GET /orders query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub order_id: Option<i64>,
}

/// Export request parameters, shared by the deferred and synchronous paths
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    pub format: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub order_id: Option<i64>,
    /// Bearer token alternative for the synchronous export (browser
    /// navigation cannot set an Authorization header)
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Order detail response (order + enriched items)
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

/// Translate filter request values into millisecond boundaries.
///
/// An absent status or the literal `all` means no status filter; any other
/// value outside the fixed set is rejected. Dates are `YYYY-MM-DD` and expand
/// to inclusive day boundaries.
fn build_filter(
    status: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
    order_id: Option<i64>,
) -> AppResult<OrderFilter> {
    let status = match status {
        None | Some("all") => None,
        Some(s) => Some(
            OrderStatus::parse(s)
                .ok_or_else(|| AppError::validation(format!("Invalid status filter: {s}")))?
                .as_str()
                .to_string(),
        ),
    };

    let start_millis = match start_date {
        Some(d) => Some(
            day_start_millis(d)
                .ok_or_else(|| AppError::validation("Invalid startDate (expected YYYY-MM-DD)"))?,
        ),
        None => None,
    };
    let end_millis = match end_date {
        Some(d) => Some(
            day_end_millis(d)
                .ok_or_else(|| AppError::validation("Invalid endDate (expected YYYY-MM-DD)"))?,
        ),
        None => None,
    };

    Ok(OrderFilter {
        order_id,
        status,
        start_millis,
        end_millis,
    })
}

/// POST /orders - website order intake
pub async fn create_web(
    State(state): State<AppState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Response> {
    create_order(state, payload, OrderSource::Website).await
}

/// POST /orders/whatsapp - WhatsApp order intake
pub async fn create_whatsapp(
    State(state): State<AppState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Response> {
    create_order(state, payload, OrderSource::Whatsapp).await
}

async fn create_order(
    state: AppState,
    payload: OrderCreate,
    source: OrderSource,
) -> AppResult<Response> {
    // Length limits; required-field checks live in the repository where
    // WhatsApp placeholder substitution happens
    if source == OrderSource::Website {
        validate_optional_text(&payload.customer_name, "customerName", MAX_NAME_LEN)?;
        validate_optional_text(&payload.customer_phone, "customerPhone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&payload.customer_address, "customerAddress", MAX_ADDRESS_LEN)?;
    }
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let created = order::create(&state.pool, payload, source)
        .await
        .map_err(|e| match e {
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Database(details) => {
                AppError::transaction("Erreur lors de la création de la commande", details)
            }
        })?;

    for shortfall in &created.shortfalls {
        tracing::warn!(
            order = created.id,
            product = shortfall.product_id,
            color = ?shortfall.color_id,
            quantity = shortfall.quantity,
            "Stock decrement skipped, insufficient stock"
        );
    }

    // Best-effort broadcast to live admin dashboards; never fails the intake
    match order::find_by_id(&state.pool, created.id).await {
        Ok(Some(order)) => {
            let message = match source {
                OrderSource::Whatsapp => "Nouvelle commande WhatsApp reçue",
                OrderSource::Website => "Nouvelle commande reçue",
            };
            state.notifier.broadcast(
                "order",
                &OrderNotification {
                    message: message.to_string(),
                    order,
                },
            );
        }
        Ok(None) => {
            tracing::warn!(order = created.id, "Created order vanished before notification")
        }
        Err(e) => tracing::warn!(order = created.id, error = %e, "Failed to load order for notification"),
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "Commande créée avec succès", "orderId": created.id })),
    )
        .into_response())
}

/// GET /orders - filtered listing, newest-first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let filter = build_filter(
        query.status.as_deref(),
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        query.order_id,
    )?;
    let orders = order::find_filtered(&state.pool, &filter).await?;
    Ok(Json(orders))
}

/// GET /orders/{id} - one order with enriched items
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let order = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;
    let items = order::find_items(&state.pool, id).await?;
    Ok(Json(OrderDetail { order, items }))
}

/// PUT /orders/{id}/status - status transition
pub async fn update_status(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let status = OrderStatus::parse(&payload.status)
        .ok_or_else(|| AppError::validation(format!("Invalid status value: {}", payload.status)))?;
    let order = order::update_status(&state.pool, id, status).await?;
    tracing::info!(order = id, status = status.as_str(), by = %admin.username, "Order status updated");
    Ok(Json(order))
}

/// DELETE /orders/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !order::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Order {id}")));
    }
    tracing::info!(order = id, by = %admin.username, "Order deleted");
    Ok(Json(json!({ "msg": "Commande supprimée avec succès" })))
}

/// POST /orders/prepare-export - deferred export.
///
/// Renders the document now, spools it to disk, and hands back a one-time
/// download URL so the browser can fetch the file without an Authorization
/// header.
pub async fn prepare_export(
    State(state): State<AppState>,
    Json(params): Json<ExportParams>,
) -> AppResult<Json<Value>> {
    let (format, bytes) = render_export(&state, &params).await?;

    tokio::fs::create_dir_all(&state.config.export_dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create export dir: {e}")))?;

    let spool_name = format!("{}.{}", Uuid::new_v4().simple(), format.extension());
    let path = std::path::Path::new(&state.config.export_dir).join(spool_name);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| AppError::internal(format!("Failed to spool export file: {e}")))?;

    let filename = format.attachment_filename();
    let token = state.tokens.put(DownloadEntry {
        path,
        filename: filename.clone(),
        mime_type: format.mime_type().to_string(),
        expires_at: 0,
    });

    Ok(Json(json!({
        "success": true,
        "downloadUrl": format!("/orders/download/{token}"),
        "filename": filename,
        "mimeType": format.mime_type(),
    })))
}

/// GET /orders/download/{token} - one-time download of a prepared export
pub async fn download(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Response> {
    match state.tokens.take(&token) {
        TakeOutcome::Valid(entry) => {
            let bytes = read_spooled_file(&entry.path).await?;
            Ok(attachment_response(&entry.mime_type, &entry.filename, bytes))
        }
        TakeOutcome::Expired(entry) => {
            remove_spooled_file(&entry.path).await;
            Err(AppError::unauthorized("Lien de téléchargement expiré"))
        }
        TakeOutcome::Missing => Err(AppError::unauthorized("Lien de téléchargement invalide")),
    }
}

/// GET /orders/export - synchronous export.
///
/// Authenticates itself from the Authorization header or a `token` query
/// parameter, then streams the rendered document directly.
pub async fn export_sync(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(crate::auth::JwtService::extract_from_header)
        .map(str::to_string);

    let token = bearer
        .or_else(|| params.token.clone())
        .ok_or_else(|| AppError::unauthorized("Missing authorization token"))?;
    state.jwt.validate_token(&token)?;

    let (format, bytes) = render_export(&state, &params).await?;
    Ok(attachment_response(
        format.mime_type(),
        &format.attachment_filename(),
        bytes,
    ))
}

/// Shared render pipeline: filter, report, document bytes
async fn render_export(
    state: &AppState,
    params: &ExportParams,
) -> AppResult<(ExportFormat, Vec<u8>)> {
    let format = params
        .format
        .as_deref()
        .and_then(ExportFormat::parse)
        .ok_or_else(|| AppError::validation("Invalid export format"))?;

    let filter = build_filter(
        params.status.as_deref(),
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        params.order_id,
    )?;

    let report = build_report(&state.pool, &filter).await?;
    let bytes = export::render(format, &report)?;
    Ok((format, bytes))
}

fn attachment_response(mime_type: &str, filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Read a spooled export and remove the file afterwards. The token is
/// already invalidated at this point, so the file is removed on the read
/// failure path too.
async fn read_spooled_file(path: &std::path::Path) -> AppResult<Vec<u8>> {
    let result = tokio::fs::read(path).await;
    remove_spooled_file(path).await;
    result.map_err(|e| AppError::internal(format!("Failed to read export file: {e}")))
}

async fn remove_spooled_file(path: &std::path::Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(file = %path.display(), error = %e, "Failed to remove spooled export file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_treats_all_as_no_status() {
        let f = build_filter(Some("all"), None, None, None).unwrap();
        assert!(f.status.is_none());
        let f = build_filter(None, None, None, None).unwrap();
        assert!(f.status.is_none());
    }

    #[test]
    fn filter_rejects_unknown_status() {
        assert!(build_filter(Some("shipped"), None, None, None).is_err());
    }

    #[test]
    fn filter_expands_dates_to_day_boundaries() {
        let f = build_filter(None, Some("2024-03-15"), Some("2024-03-15"), Some(7)).unwrap();
        assert_eq!(f.order_id, Some(7));
        let (start, end) = (f.start_millis.unwrap(), f.end_millis.unwrap());
        assert_eq!(end - start, 24 * 3600 * 1000 - 1);
    }

    #[test]
    fn filter_rejects_malformed_dates() {
        assert!(build_filter(None, Some("15/03/2024"), None, None).is_err());
        assert!(build_filter(None, None, Some("yesterday"), None).is_err());
    }

    #[tokio::test]
    async fn spooled_file_is_removed_after_a_successful_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        tokio::fs::write(&path, b"PK fake").await.unwrap();

        let bytes = read_spooled_file(&path).await.unwrap();
        assert_eq!(bytes, b"PK fake");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn read_failure_still_reports_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vanished.xlsx");

        // No file behind the entry; the read fails but never panics, and
        // nothing is left to leak
        assert!(read_spooled_file(&path).await.is_err());
        assert!(!path.exists());
    }
}
