// src/handlers/transfers.rs

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
        rbac::{PermTransfersConfirm, PermTransfersCreate, RequirePermission},
        tenancy::TenantContext,
    },
    models::inventory::Transfer,
    services::transfer_service::TransferService,
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferPayload {
    pub product_id: Uuid,
    pub origin_branch_id: Uuid,
    pub destination_branch_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser um inteiro positivo."))]
    pub delivered_quantity: i32,
    /// Caminho/identificador do documento de respaldo já armazenado.
    pub document_path: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmTransferPayload {
    #[validate(range(min = 1, message = "A quantidade recebida deve ser um inteiro positivo."))]
    pub received_quantity: i32,
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/transfers",
    request_body = CreateTransferPayload,
    responses(
        (status = 201, description = "Traslado iniciado (pendente)", body = Transfer),
        (status = 400, description = "Origem igual ao destino"),
        (status = 422, description = "Estoque insuficiente na origem")
    ),
    security(("bearer_auth" = [])),
    tag = "transfers"
)]
pub async fn create_transfer(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermTransfersCreate>,
    Json(payload): Json<CreateTransferPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let transfer = app_state
        .transfer_service
        .create_transfer(
            &mut *rls_conn,
            tenant.0,
            user.0.id,
            payload.product_id,
            payload.origin_branch_id,
            payload.destination_branch_id,
            payload.delivered_quantity,
            payload.document_path.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(transfer)))
}

#[utoipa::path(
    post,
    path = "/api/transfers/{transfer_id}/confirm",
    request_body = ConfirmTransferPayload,
    params(("transfer_id" = Uuid, Path, description = "ID do traslado")),
    responses(
        (status = 200, description = "Recepção confirmada", body = Transfer),
        (status = 403, description = "Membro de outra sucursal"),
        (status = 409, description = "Traslado já confirmado")
    ),
    security(("bearer_auth" = [])),
    tag = "transfers"
)]
pub async fn confirm_transfer(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermTransfersConfirm>,
    Path(transfer_id): Path<Uuid>,
    Json(payload): Json<ConfirmTransferPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    // Autorização de recepção fica AQUI, fora do core: quem confirma é a
    // sucursal de destino (membro sem sucursal casa confirma qualquer um).
    let member = app_state
        .tenant_service
        .require_member(user.0.id, tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let transfer = app_state
        .transfer_service
        .get_transfer(tenant.0, transfer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    if !TransferService::can_confirm(&member, &transfer) {
        return Err(
            AppError::Forbidden("confirmar traslados de outra sucursal".into())
                .to_api_error(&locale, &app_state.i18n_store),
        );
    }

    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let confirmed = app_state
        .transfer_service
        .confirm_transfer(
            &mut *rls_conn,
            tenant.0,
            user.0.id,
            transfer_id,
            payload.received_quantity,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(confirmed)))
}

#[utoipa::path(
    get,
    path = "/api/transfers",
    responses((status = 200, description = "Traslados recentes", body = [Transfer])),
    security(("bearer_auth" = [])),
    tag = "transfers"
)]
pub async fn list_transfers(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let transfers = app_state
        .transfer_service
        .list_transfers(tenant.0, 10)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(transfers)))
}

#[utoipa::path(
    get,
    path = "/api/transfers/pending",
    responses((status = 200, description = "Traslados pendentes visíveis ao membro", body = [Transfer])),
    security(("bearer_auth" = [])),
    tag = "transfers"
)]
pub async fn list_pending_transfers(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state
        .tenant_service
        .require_member(user.0.id, tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let transfers = app_state
        .transfer_service
        .list_pending_for_member(tenant.0, &member)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(transfers)))
}

#[utoipa::path(
    get,
    path = "/api/transfers/{transfer_id}",
    params(("transfer_id" = Uuid, Path, description = "ID do traslado")),
    responses((status = 200, description = "O traslado", body = Transfer)),
    security(("bearer_auth" = [])),
    tag = "transfers"
)]
pub async fn get_transfer(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(transfer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let transfer = app_state
        .transfer_service
        .get_transfer(tenant.0, transfer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(transfer)))
}

#[utoipa::path(
    get,
    path = "/api/transfers/branches/{branch_id}",
    params(("branch_id" = Uuid, Path, description = "ID da sucursal")),
    responses((status = 200, description = "Traslados com a sucursal como origem ou destino", body = [Transfer])),
    security(("bearer_auth" = [])),
    tag = "transfers"
)]
pub async fn list_transfers_by_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    Path(branch_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let transfers = app_state
        .transfer_service
        .list_transfers_by_branch(tenant.0, branch_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(transfers)))
}
