// src/handlers/reports.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermReportsRead, RequirePermission},
        tenancy::TenantContext,
    },
    models::reports::{DailyMovementReport, LowStockEntry, ProductMovementSummary},
};

#[derive(Debug, Deserialize)]
pub struct DailyReportParams {
    /// Data do relatório (YYYY-MM-DD); padrão: hoje.
    pub date: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/reports/movements/daily",
    params(("date" = Option<String>, Query, description = "Data (YYYY-MM-DD), padrão hoje")),
    responses((status = 200, description = "Movimentação do dia", body = DailyMovementReport)),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn daily_movement_report(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermReportsRead>,
    Query(params): Query<DailyReportParams>,
) -> Result<impl IntoResponse, ApiError> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());

    let report = app_state
        .report_service
        .daily_movement_report(tenant.0, date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/reports/products/{product_id}/summary",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses((status = 200, description = "Resumo de movimentação do produto", body = ProductMovementSummary)),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn product_movement_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermReportsRead>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .report_service
        .product_movement_summary(tenant.0, product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

#[utoipa::path(
    get,
    path = "/api/reports/stock/low",
    responses((status = 200, description = "Pares abaixo do estoque mínimo", body = [LowStockEntry])),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn low_stock_report(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermReportsRead>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = app_state
        .report_service
        .low_stock_report(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(entries)))
}

#[utoipa::path(
    get,
    path = "/api/reports/movements/export",
    responses((status = 200, description = "Extrato de movimentos em CSV (text/csv)")),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn export_movements(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermReportsRead>,
) -> Result<impl IntoResponse, ApiError> {
    let csv_data = app_state
        .report_service
        .export_movements_csv(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"movimientos.csv\"",
            ),
        ],
        csv_data,
    ))
}
