// src/handlers/inventory.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::db_utils::get_rls_connection,
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermInventoryWrite, RequirePermission},
        tenancy::TenantContext,
    },
    models::inventory::{MovementKind, StockLevel, StockMovement},
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMovementPayload {
    pub branch_id: Uuid,
    pub product_id: Uuid,
    pub kind: MovementKind,
    #[validate(range(min = 1, message = "A quantidade deve ser um inteiro positivo."))]
    pub quantity: i32,
    pub comment: Option<String>,
    /// Número/descrição do documento de respaldo (fatura, nota, etc.)
    pub reference_document: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetMinQuantityPayload {
    pub branch_id: Uuid,
    pub product_id: Uuid,
    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    pub min_quantity: i32,
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/inventory/movements",
    request_body = RegisterMovementPayload,
    responses(
        (status = 201, description = "Movimento registrado", body = StockMovement),
        (status = 422, description = "Estoque insuficiente para a saída")
    ),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn register_movement(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermInventoryWrite>,
    Json(payload): Json<RegisterMovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let (movement, _level) = app_state
        .inventory_service
        .register_movement(
            &mut *rls_conn,
            tenant.0,
            user.0.id,
            payload.branch_id,
            payload.product_id,
            payload.kind,
            payload.quantity,
            payload.comment.as_deref(),
            payload.reference_document.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(movement)))
}

#[utoipa::path(
    get,
    path = "/api/inventory/movements",
    responses((status = 200, description = "Movimentos recentes da empresa", body = [StockMovement])),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn list_recent_movements(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let movements = app_state
        .inventory_service
        .list_recent_movements(tenant.0, 20)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(movements)))
}

#[utoipa::path(
    get,
    path = "/api/inventory/branches/{branch_id}/movements",
    params(("branch_id" = Uuid, Path, description = "ID da sucursal")),
    responses((status = 200, description = "Movimentos da sucursal", body = [StockMovement])),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn list_movements_by_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(branch_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let movements = app_state
        .inventory_service
        .list_movements_by_branch(tenant.0, branch_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(movements)))
}

#[utoipa::path(
    get,
    path = "/api/inventory/products/{product_id}/movements",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses((status = 200, description = "Movimentos do produto", body = [StockMovement])),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn list_movements_by_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let movements = app_state
        .inventory_service
        .list_movements_by_product(tenant.0, product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(movements)))
}

#[utoipa::path(
    get,
    path = "/api/inventory/branches/{branch_id}/levels",
    params(("branch_id" = Uuid, Path, description = "ID da sucursal")),
    responses((status = 200, description = "Saldos da sucursal", body = [StockLevel])),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn list_levels_by_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(branch_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let levels = app_state
        .inventory_service
        .list_levels_by_branch(tenant.0, branch_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(levels)))
}

#[utoipa::path(
    put,
    path = "/api/inventory/levels/minimum",
    request_body = SetMinQuantityPayload,
    responses((status = 200, description = "Estoque mínimo definido", body = StockLevel)),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn set_min_quantity(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermInventoryWrite>,
    Json(payload): Json<SetMinQuantityPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let level = app_state
        .inventory_service
        .set_min_quantity(
            &mut *rls_conn,
            tenant.0,
            payload.branch_id,
            payload.product_id,
            payload.min_quantity,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(level)))
}

#[utoipa::path(
    get,
    path = "/api/inventory/levels/low",
    responses((status = 200, description = "Pares abaixo do estoque mínimo", body = [StockLevel])),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn list_low_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let levels = app_state
        .inventory_service
        .list_low_stock(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(levels)))
}
