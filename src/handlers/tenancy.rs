// src/handlers/tenancy.rs

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
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermTenancyAdmin, RequirePermission},
        tenancy::TenantContext,
    },
    models::tenancy::{Branch, Tenant},
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub ruc: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, max = 3, message = "A abreviatura deve ter de 1 a 3 caracteres."))]
    pub abbreviation: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

// ---
// Empresas
// ---

#[utoipa::path(
    post,
    path = "/api/tenants",
    request_body = CreateTenantPayload,
    responses((status = 201, description = "Empresa criada", body = Tenant)),
    security(("bearer_auth" = [])),
    tag = "tenancy"
)]
pub async fn create_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTenantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let tenant = app_state
        .tenant_service
        .create_tenant_with_owner(
            &payload.name,
            payload.address.as_deref(),
            payload.phone.as_deref(),
            payload.email.as_deref(),
            payload.ruc.as_deref(),
            user.0.id,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tenant)))
}

#[utoipa::path(
    get,
    path = "/api/tenants",
    responses((status = 200, description = "Empresas do usuário", body = [Tenant])),
    security(("bearer_auth" = [])),
    tag = "tenancy"
)]
pub async fn list_my_tenants(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let tenants = app_state
        .tenant_service
        .list_user_tenants(user.0.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tenants)))
}

#[utoipa::path(
    put,
    path = "/api/tenants/current",
    request_body = CreateTenantPayload,
    responses((status = 200, description = "Empresa atualizada", body = Tenant)),
    security(("bearer_auth" = [])),
    tag = "tenancy"
)]
pub async fn update_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermTenancyAdmin>,
    Json(payload): Json<CreateTenantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .tenant_service
        .update_tenant(
            tenant.0,
            &payload.name,
            payload.address.as_deref(),
            payload.phone.as_deref(),
            payload.email.as_deref(),
            payload.ruc.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/tenants/current",
    responses((status = 204, description = "Empresa removida")),
    security(("bearer_auth" = [])),
    tag = "tenancy"
)]
pub async fn delete_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermTenancyAdmin>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .tenant_service
        .delete_tenant(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// Sucursais
// ---

#[utoipa::path(
    post,
    path = "/api/tenants/branches",
    request_body = CreateBranchPayload,
    responses((status = 201, description = "Sucursal criada", body = Branch)),
    security(("bearer_auth" = [])),
    tag = "tenancy"
)]
pub async fn create_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermTenancyAdmin>,
    Json(payload): Json<CreateBranchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let branch = app_state
        .tenant_service
        .create_branch(
            tenant.0,
            &payload.name,
            &payload.abbreviation.to_uppercase(),
            payload.address.as_deref(),
            payload.phone.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(branch)))
}

#[utoipa::path(
    get,
    path = "/api/tenants/branches",
    responses((status = 200, description = "Sucursais da empresa", body = [Branch])),
    security(("bearer_auth" = [])),
    tag = "tenancy"
)]
pub async fn list_branches(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let branches = app_state
        .tenant_service
        .list_branches(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(branches)))
}

#[utoipa::path(
    put,
    path = "/api/tenants/branches/{branch_id}",
    request_body = CreateBranchPayload,
    params(("branch_id" = Uuid, Path, description = "ID da sucursal")),
    responses((status = 200, description = "Sucursal atualizada", body = Branch)),
    security(("bearer_auth" = [])),
    tag = "tenancy"
)]
pub async fn update_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermTenancyAdmin>,
    Path(branch_id): Path<Uuid>,
    Json(payload): Json<CreateBranchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let branch = app_state
        .tenant_service
        .update_branch(
            tenant.0,
            branch_id,
            &payload.name,
            &payload.abbreviation.to_uppercase(),
            payload.address.as_deref(),
            payload.phone.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(branch)))
}

#[utoipa::path(
    delete,
    path = "/api/tenants/branches/{branch_id}",
    params(("branch_id" = Uuid, Path, description = "ID da sucursal")),
    responses((status = 204, description = "Sucursal removida")),
    security(("bearer_auth" = [])),
    tag = "tenancy"
)]
pub async fn delete_branch(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermTenancyAdmin>,
    Path(branch_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .tenant_service
        .delete_branch(tenant.0, branch_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
