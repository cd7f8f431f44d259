// src/handlers/rbac.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use utoipa::ToSchema;
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
    models::rbac::{Permission, Role},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRolePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    /// Slugs de permissão a atribuir ("inventory:write", ...).
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/tenants/roles",
    request_body = CreateRolePayload,
    responses((status = 201, description = "Cargo criado", body = Role)),
    security(("bearer_auth" = [])),
    tag = "rbac"
)]
pub async fn create_role(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermTenancyAdmin>,
    Json(payload): Json<CreateRolePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let role = app_state
        .rbac_service
        .create_role_with_permissions(
            tenant.0,
            &payload.name,
            payload.description.as_deref(),
            &payload.permissions,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(role)))
}

#[utoipa::path(
    get,
    path = "/api/permissions",
    responses((status = 200, description = "Permissões do sistema", body = [Permission])),
    tag = "rbac"
)]
pub async fn list_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let permissions = app_state
        .rbac_service
        .list_permissions()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(permissions)))
}
