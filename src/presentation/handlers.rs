// HTTP request handlers
use crate::application::import_service::CellValue;
use crate::domain::charge::ChargeDraft;
use crate::domain::error::ChargeLogError;
use crate::domain::insight::SortOrder;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

#[derive(Deserialize)]
pub struct InsightsQuery {
    pub capacity: Option<f64>,
    pub order: Option<SortOrder>,
    /// `include=all` keeps insights without a driving interval.
    pub include: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn map_error(err: ChargeLogError) -> Response {
    match &err {
        ChargeLogError::Validation(_) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        ChargeLogError::NotFound(_) => error_response(StatusCode::NOT_FOUND, err.to_string()),
        ChargeLogError::Store(source) => {
            error!("record store failure: {source:#}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "record store unavailable, please retry".to_string(),
            )
        }
    }
}

/// List every charge record. Store order; clients sort for display.
pub async fn list_charges(State(state): State<Arc<AppState>>) -> Response {
    match state.charge_service.list().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => map_error(e),
    }
}

/// Record one charging session. A payload missing a required field is a
/// validation failure like any other: 400 with the error envelope, not the
/// extractor's default 422.
pub async fn create_charge(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChargeDraft>, JsonRejection>,
) -> Response {
    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    match state.charge_service.create(draft).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => map_error(e),
    }
}

/// Delete a single charge record.
pub async fn delete_charge(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.charge_service.delete(&id).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => map_error(e),
    }
}

/// Delete every charge record.
pub async fn delete_all_charges(State(state): State<Arc<AppState>>) -> Response {
    match state.charge_service.delete_all().await {
        Ok(deleted) => Json(json!({ "success": true, "deleted": deleted })).into_response(),
        Err(e) => map_error(e),
    }
}

/// Derived per-session metrics in the requested display order.
pub async fn get_insights(
    Query(query): Query<InsightsQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let order = query.order.unwrap_or_default();
    let include_all = query.include.as_deref() == Some("all");

    match state
        .insights_service
        .insights(query.capacity, order, include_all)
        .await
    {
        Ok(insights) => Json(insights).into_response(),
        Err(e) => map_error(ChargeLogError::Store(e)),
    }
}

/// Import spreadsheet rows (header row first). Always returns the tally;
/// per-row failures never fail the batch.
pub async fn import_charges(
    State(state): State<Arc<AppState>>,
    Json(rows): Json<Vec<Vec<CellValue>>>,
) -> Response {
    Json(state.import_service.import_rows(&rows).await).into_response()
}

/// The full record set as a downloadable indented-JSON snapshot.
pub async fn export_charges(State(state): State<Arc<AppState>>) -> Response {
    match state.charge_service.export_snapshot().await {
        Ok((filename, body)) => (
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => map_error(e),
    }
}
